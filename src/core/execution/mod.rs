// This is the execution module.
// It defines the ExecutionOperator trait every physical operator implements.

pub mod comparator;
pub mod context;
pub mod eval;
pub mod operators;
pub mod projector;
pub mod stats;

pub use crate::core::common::types::Tuple;
pub use context::TaskContext;
pub use stats::TableStats;

use crate::core::common::types::Schema;
use crate::core::common::OxiexecError;
use std::sync::Arc;

/// Pull-based contract shared by every physical operator.
///
/// The tree is driven from the root by repeated calls to [`next`]. The
/// returned tuple is the operator's scratch buffer: its contents are only
/// valid until the next call on the same operator, so a caller that needs to
/// keep a row must clone it.
///
/// [`next`]: ExecutionOperator::next
pub trait ExecutionOperator {
    /// Produces the next tuple, or `None` once the stream is exhausted.
    fn next(&mut self) -> Result<Option<&Tuple>, OxiexecError>;

    /// Returns the schema of the tuples produced by this operator.
    fn get_output_schema(&self) -> Arc<Schema>;

    /// Resets the operator so the stream replays from the start.
    fn rescan(&mut self) -> Result<(), OxiexecError>;

    /// Releases owned resources. Calling it again is a no-op.
    fn close(&mut self) -> Result<(), OxiexecError>;

    /// Cumulative input statistics of this subtree.
    fn input_stats(&self) -> TableStats;
}

/// Child operator handle, movable into a worker thread with its tree.
pub type BoxedOperator = Box<dyn ExecutionOperator + Send>;

/// Pulls every remaining tuple out of `op`, cloning each one.
pub fn collect_all(op: &mut dyn ExecutionOperator) -> Result<Vec<Tuple>, OxiexecError> {
    let mut rows = Vec::new();
    while let Some(tuple) = op.next()? {
        rows.push(tuple.clone());
    }
    Ok(rows)
}
