use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Input statistics of an operator subtree. Observability only, never on the
/// data path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStats {
    pub num_rows: u64,
    pub num_bytes: u64,
    pub read_bytes: u64,
}

impl TableStats {
    /// Records one row of `bytes` payload as read.
    pub fn record_row(&mut self, bytes: u64) {
        self.num_rows = self.num_rows.saturating_add(1);
        self.num_bytes = self.num_bytes.saturating_add(bytes);
        self.read_bytes = self.read_bytes.saturating_add(bytes);
    }
}

impl Add for TableStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            num_rows: self.num_rows.saturating_add(rhs.num_rows),
            num_bytes: self.num_bytes.saturating_add(rhs.num_bytes),
            read_bytes: self.read_bytes.saturating_add(rhs.read_bytes),
        }
    }
}

impl AddAssign for TableStats {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
