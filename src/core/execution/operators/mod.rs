// Physical operators. Each one lives in its own file and is re-exported here.

pub mod scan;
pub use scan::SeqScanExec;

pub mod filter;
pub use filter::FilterExec;

pub mod project;
pub use project::ProjectExec;

pub mod limit;
pub use limit::LimitExec;

pub mod sort;
pub use sort::SortExec;

pub mod hash_table;
pub use hash_table::{HashTableLoader, JoinHashTable};

pub mod hash_left_outer_join;
pub use hash_left_outer_join::{HashLeftOuterJoinExec, JoinSpec};

#[cfg(test)]
pub(crate) mod mock;
