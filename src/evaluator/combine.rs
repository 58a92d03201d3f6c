//! Pairwise combination of two produced subtrees, with the background and highlight
//! tie-break rules.

use crate::csg::{CsgNode, CsgOperator, CsgRef};
use std::rc::Rc;

/// Subtrees pulled out of the main result while folding.
#[derive(Debug, Default)]
pub struct Extracted {
    pub highlight: Vec<CsgRef>,
    pub background: Vec<CsgRef>,
}

/// Combines `t1 <op> t2`.
///
/// Background operands are moved to `extracted.background` instead of taking part,
/// unless `t1` is background and either `t2` is too or `op` is a difference (the
/// result then inherits the minuend's background flag). Highlighted operands that
/// drop out of the result are pushed to `extracted.highlight`; for a union, a lone
/// highlighted operand is extracted and the other one becomes the result.
pub fn combine(op: CsgOperator, t1: CsgRef, t2: CsgRef, extracted: &mut Extracted) -> CsgRef {
    let mut t = if t1.is_background() && (t2.is_background() || op == CsgOperator::Difference) {
        let t = CsgNode::operation(op, Rc::clone(&t1), Rc::clone(&t2));
        t.set_background(true);
        t
    } else if t2.is_background() {
        extracted.background.push(Rc::clone(&t2));
        Rc::clone(&t1)
    } else if t1.is_background() {
        extracted.background.push(Rc::clone(&t1));
        Rc::clone(&t2)
    } else {
        CsgNode::operation(op, Rc::clone(&t1), Rc::clone(&t2))
    };

    let not_t1 = !Rc::ptr_eq(&t, &t1);
    let not_t2 = !Rc::ptr_eq(&t, &t2);
    match op {
        CsgOperator::Difference => {
            if not_t1 && t1.is_highlight() {
                t.set_highlight(true);
            } else if not_t2 && t2.is_highlight() {
                extracted.highlight.push(t2);
            }
        },
        CsgOperator::Intersection => {
            if not_t1 && not_t2 && t1.is_highlight() && t2.is_highlight() {
                t.set_highlight(true);
            } else if not_t1 && t1.is_highlight() {
                extracted.highlight.push(t1);
            } else if not_t2 && t2.is_highlight() {
                extracted.highlight.push(t2);
            }
        },
        CsgOperator::Union => {
            if not_t1 && not_t2 && t1.is_highlight() && t2.is_highlight() {
                t.set_highlight(true);
            } else if not_t1 && t1.is_highlight() {
                extracted.highlight.push(t1);
                t = t2;
            } else if not_t2 && t2.is_highlight() {
                extracted.highlight.push(t2);
                t = t1;
            }
        },
    }
    t
}
