/// Boolean operator of an operation node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CsgOperator {
    Union,
    Intersection,
    Difference,
}

impl CsgOperator {
    pub const fn name(self) -> &'static str {
        match self {
            CsgOperator::Union => "union",
            CsgOperator::Intersection => "intersection",
            CsgOperator::Difference => "difference",
        }
    }

    /// Infix symbol used when dumping a tree.
    pub const fn symbol(self) -> char {
        match self {
            CsgOperator::Union => '+',
            CsgOperator::Intersection => '*',
            CsgOperator::Difference => '-',
        }
    }
}
