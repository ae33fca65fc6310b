//! Rewrites over boolean expression trees used when planning joins.

use super::{BinaryOp, EvalNode};
use crate::core::common::error::OxiexecError;

/// Flattens nested `AND`s into their conjuncts, left to right.
pub fn to_conjunctive_normal_form_array(node: EvalNode) -> Vec<EvalNode> {
    let mut out = Vec::new();
    flatten_and(node, &mut out);
    out
}

fn flatten_and(node: EvalNode, out: &mut Vec<EvalNode>) {
    match node {
        EvalNode::Binary { op: BinaryOp::And, left, right, .. } => {
            flatten_and(*left, out);
            flatten_and(*right, out);
        }
        other => out.push(other),
    }
}

/// Folds conjuncts back into one left-deep `AND` tree. `None` for an empty list.
pub fn create_singleton_expr_from_cnf(
    conjuncts: Vec<EvalNode>,
) -> Result<Option<EvalNode>, OxiexecError> {
    let mut iter = conjuncts.into_iter();
    let Some(first) = iter.next() else {
        return Ok(None);
    };
    iter.try_fold(first, EvalNode::and).map(Some)
}

/// Column ids of an equality between two plain column references.
fn equi_fields(node: &EvalNode) -> Option<(usize, usize)> {
    match node {
        EvalNode::Binary { op: BinaryOp::Equal, left, right, .. } => match (left.as_ref(), right.as_ref()) {
            (EvalNode::Field { column_id: a, .. }, EvalNode::Field { column_id: b, .. }) => Some((*a, *b)),
            _ => None,
        },
        _ => None,
    }
}

/// True for `a = b` where one column comes from the left input and the other
/// from the right input of a merged `left ++ right` schema.
pub fn is_join_qual(node: &EvalNode, left_width: usize) -> bool {
    equi_fields(node).is_some_and(|(a, b)| (a < left_width) != (b < left_width))
}

/// Extracts `(left_column_id, right_column_id)` pairs from equi-join quals.
/// Right ids are relative to the right input.
pub fn join_key_pairs(quals: &[EvalNode], left_width: usize) -> Result<Vec<(usize, usize)>, OxiexecError> {
    quals
        .iter()
        .map(|qual| match equi_fields(qual) {
            Some((a, b)) if a < left_width && b >= left_width => Ok((a, b - left_width)),
            Some((a, b)) if b < left_width && a >= left_width => Ok((b, a - left_width)),
            _ => Err(OxiexecError::InvalidJoinKeys(format!(
                "'{qual}' is not an equality between a left and a right column"
            ))),
        })
        .collect()
}
