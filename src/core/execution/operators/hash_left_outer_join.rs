//! Hash left outer join.
//!
//! The right input is the build side: on the first pull it is drained into a
//! [`JoinHashTable`](super::JoinHashTable) keyed by the equi-join columns. Left tuples then stream
//! through one at a time. Every left tuple produces at least one output row;
//! a left tuple without a usable match is padded with nulls on the right.

use super::hash_table::{project_key, HashTableLoader};
use crate::core::common::types::{null_padded_tuple, DataType, FrameTuple, Schema, Tuple, Value};
use crate::core::common::OxiexecError;
use crate::core::execution::eval::algebra::{
    create_singleton_expr_from_cnf, is_join_qual, join_key_pairs, to_conjunctive_normal_form_array,
};
use crate::core::execution::eval::EvalNode;
use crate::core::execution::projector::{Projector, Target};
use crate::core::execution::{BoxedOperator, ExecutionOperator, TableStats, TaskContext};
use std::sync::Arc;
use tracing::{debug, warn};

/// What to join on and what to produce.
#[derive(Debug, Clone)]
pub struct JoinSpec {
    /// Boolean expression over `left ++ right`. Must contain at least one
    /// equality between a left and a right column.
    pub condition: EvalNode,
    /// Output expressions over `left ++ right`; `None` emits the joined tuple.
    pub targets: Option<Vec<Target>>,
}

impl JoinSpec {
    pub fn new(condition: EvalNode) -> Self {
        Self { condition, targets: None }
    }

    #[must_use]
    pub fn with_targets(mut self, targets: Vec<Target>) -> Self {
        self.targets = Some(targets);
        self
    }
}

#[derive(Debug)]
enum JoinState {
    AwaitingLeft,
    /// Walking the bucket of right candidates that share `left`'s key.
    Probing { left: Tuple, bucket: usize, next_index: usize },
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Emit {
    Joined,
    NullPadded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ProbeStep {
    emit: Emit,
    continue_streak: bool,
}

/// Outcome of testing one right candidate against the current left tuple.
///
/// A failed residual filter ends the streak for that left tuple. A failed
/// qual alone emits a null-padded row and moves on to the next candidate.
fn probe_step(filter_passed: bool, qual_passed: bool, last: bool) -> ProbeStep {
    let emit = if filter_passed && qual_passed { Emit::Joined } else { Emit::NullPadded };
    ProbeStep { emit, continue_streak: filter_passed && !last }
}

pub struct HashLeftOuterJoinExec {
    ctx: TaskContext,
    left: BoxedOperator,
    right: BoxedOperator,
    in_schema: Arc<Schema>,
    join_qual: EvalNode,
    join_filter: Option<EvalNode>,
    projector: Projector,
    left_key_ids: Vec<usize>,
    loader: HashTableLoader,
    state: JoinState,
    left_key: Tuple,
    null_right: Tuple,
    out: Tuple,
    closed: bool,
}

fn check_columns(node: &EvalNode, width: usize) -> Result<(), OxiexecError> {
    if let EvalNode::Field { column_id, name, .. } = node {
        if *column_id >= width {
            return Err(OxiexecError::ColumnNotFound(format!(
                "{name} (column id {column_id}, join input has {width} columns)"
            )));
        }
    }
    node.children().into_iter().try_for_each(|child| check_columns(child, width))
}

impl HashLeftOuterJoinExec {
    pub fn new(
        ctx: TaskContext,
        spec: JoinSpec,
        left: BoxedOperator,
        right: BoxedOperator,
    ) -> Result<Self, OxiexecError> {
        let left_schema = left.get_output_schema();
        let right_schema = right.get_output_schema();
        let in_schema = Arc::new(Schema::merge(&left_schema, &right_schema));
        let left_width = left_schema.len();

        let cond_type = spec.condition.result_type();
        if cond_type != DataType::Boolean {
            return Err(OxiexecError::type_mismatch("Boolean", &cond_type, "join condition"));
        }
        check_columns(&spec.condition, in_schema.len())?;

        let (quals, residual): (Vec<EvalNode>, Vec<EvalNode>) = to_conjunctive_normal_form_array(spec.condition)
            .into_iter()
            .partition(|conjunct| is_join_qual(conjunct, left_width));
        let pairs = join_key_pairs(&quals, left_width)?;
        if pairs.is_empty() {
            return Err(OxiexecError::InvalidJoinKeys(
                "join condition has no equality between a left and a right column".to_string(),
            ));
        }
        for &(l, r) in &pairs {
            let (Some(lc), Some(rc)) = (left_schema.column(l), right_schema.column(r)) else {
                return Err(OxiexecError::Internal(format!("join key pair ({l}, {r}) out of range")));
            };
            if lc.data_type != rc.data_type {
                return Err(OxiexecError::InvalidJoinKeys(format!(
                    "key types differ: {} is {}, {} is {}",
                    lc.name, lc.data_type, rc.name, rc.data_type
                )));
            }
        }

        let join_qual = create_singleton_expr_from_cnf(quals)?
            .ok_or_else(|| OxiexecError::Internal("empty join qual".to_string()))?;
        let join_filter = create_singleton_expr_from_cnf(residual)?;
        let projector = Projector::from_targets(Arc::clone(&in_schema), spec.targets)?;
        let (left_key_ids, right_key_ids): (Vec<usize>, Vec<usize>) = pairs.into_iter().unzip();
        debug!(
            join_qual = %join_qual,
            join_filter = ?join_filter.as_ref().map(ToString::to_string),
            "planned hash left outer join"
        );

        Ok(Self {
            loader: HashTableLoader::new(right_key_ids, ctx.config().hash_table_capacity),
            ctx,
            left,
            right,
            in_schema,
            join_qual,
            join_filter,
            projector,
            left_key: Tuple::with_capacity(left_key_ids.len()),
            left_key_ids,
            state: JoinState::AwaitingLeft,
            null_right: null_padded_tuple(right_schema.len()),
            out: Tuple::new(),
            closed: false,
        })
    }

    pub fn join_qual(&self) -> &EvalNode {
        &self.join_qual
    }

    pub fn join_filter(&self) -> Option<&EvalNode> {
        self.join_filter.as_ref()
    }

    pub fn hash_table_loader(&self) -> &HashTableLoader {
        &self.loader
    }
}

impl ExecutionOperator for HashLeftOuterJoinExec {
    fn next(&mut self) -> Result<Option<&Tuple>, OxiexecError> {
        if self.ctx.is_stopped() || self.closed {
            return Ok(None);
        }
        if matches!(self.state, JoinState::Finished) {
            return Ok(None);
        }
        if !self.loader.is_hash_table_loaded() {
            self.loader.load_table(self.right.as_mut())?;
        }
        let table = self
            .loader
            .table()
            .ok_or_else(|| OxiexecError::Internal("join hash table missing after load".to_string()))?;

        loop {
            match std::mem::replace(&mut self.state, JoinState::Finished) {
                JoinState::Finished => return Ok(None),
                JoinState::AwaitingLeft => {
                    let Some(left) = self.left.next()? else {
                        return Ok(None);
                    };
                    project_key(left, &self.left_key_ids, &mut self.left_key)?;
                    let bucket = if self.left_key.iter().any(Value::is_null) {
                        None
                    } else {
                        table.find(&self.left_key)
                    };
                    match bucket {
                        Some(bucket) => {
                            self.state = JoinState::Probing { left: left.clone(), bucket, next_index: 0 };
                        }
                        None => {
                            self.projector.eval(&FrameTuple::new(left, &self.null_right), &mut self.out)?;
                            self.state = JoinState::AwaitingLeft;
                            return Ok(Some(&self.out));
                        }
                    }
                }
                JoinState::Probing { left, bucket, next_index } => {
                    let candidates = table.bucket(bucket);
                    let Some(right) = candidates.get(next_index) else {
                        self.state = JoinState::AwaitingLeft;
                        continue;
                    };
                    let frame = FrameTuple::new(&left, right);
                    let filter_passed = match &self.join_filter {
                        Some(filter) => filter.eval_bool(&self.in_schema, &frame)?,
                        None => true,
                    };
                    let qual_passed = self.join_qual.eval_bool(&self.in_schema, &frame)?;

                    let last = next_index + 1 >= candidates.len();
                    let step = probe_step(filter_passed, qual_passed, last);

                    match step.emit {
                        Emit::Joined => self.projector.eval(&frame, &mut self.out)?,
                        Emit::NullPadded => {
                            self.projector.eval(&FrameTuple::new(&left, &self.null_right), &mut self.out)?;
                        }
                    }
                    self.state = if step.continue_streak {
                        JoinState::Probing { left, bucket, next_index: next_index + 1 }
                    } else {
                        JoinState::AwaitingLeft
                    };
                    return Ok(Some(&self.out));
                }
            }
        }
    }

    fn get_output_schema(&self) -> Arc<Schema> {
        Arc::clone(self.projector.output_schema())
    }

    /// Restarts the left side. The hash table is kept, so the right child is
    /// not read again.
    fn rescan(&mut self) -> Result<(), OxiexecError> {
        self.state = JoinState::AwaitingLeft;
        self.left.rescan()
    }

    fn close(&mut self) -> Result<(), OxiexecError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.state = JoinState::Finished;

        let mut first_error = None;
        for (side, result) in [("left", self.left.close()), ("right", self.right.close())] {
            if let Err(e) = result {
                warn!(side, error = %e, "failed to close join input");
                first_error.get_or_insert(e);
            }
        }
        self.loader.release();
        first_error.map_or(Ok(()), Err)
    }

    fn input_stats(&self) -> TableStats {
        self.left.input_stats() + self.right.input_stats()
    }
}
