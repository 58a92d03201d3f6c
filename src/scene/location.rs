//! Source spans and the editor cursor.

/// A position in the source text (1-based lines, as editors report them).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CursorPosition {
    pub line: u32,
    pub column: u32,
}

impl CursorPosition {
    pub const fn new(line: u32, column: u32) -> Self {
        CursorPosition { line, column }
    }
}

/// Closed span `(first_line, first_column)..=(last_line, last_column)` of the
/// statement that produced a scene node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub first_line: u32,
    pub first_column: u32,
    pub last_line: u32,
    pub last_column: u32,
}

impl Location {
    pub const fn new(first_line: u32, first_column: u32, last_line: u32, last_column: u32) -> Self {
        Location {
            first_line,
            first_column,
            last_line,
            last_column,
        }
    }

    pub const fn start(&self) -> CursorPosition {
        CursorPosition::new(self.first_line, self.first_column)
    }

    pub const fn end(&self) -> CursorPosition {
        CursorPosition::new(self.last_line, self.last_column)
    }

    /// Both ends are inclusive.
    pub fn contains(&self, cursor: CursorPosition) -> bool {
        self.start() <= cursor && cursor <= self.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_ends_are_inclusive() {
        let loc = Location::new(2, 5, 4, 10);
        assert!(loc.contains(CursorPosition::new(2, 5)));
        assert!(loc.contains(CursorPosition::new(4, 10)));
        assert!(loc.contains(CursorPosition::new(3, 0)));
        assert!(!loc.contains(CursorPosition::new(2, 4)));
        assert!(!loc.contains(CursorPosition::new(4, 11)));
        assert!(!loc.contains(CursorPosition::new(1, 99)));
    }

    #[test]
    fn single_line_span() {
        let loc = Location::new(7, 3, 7, 12);
        assert!(loc.contains(CursorPosition::new(7, 3)));
        assert!(!loc.contains(CursorPosition::new(8, 3)));
    }
}
