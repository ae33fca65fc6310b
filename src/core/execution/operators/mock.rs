//! Scripted child operator for operator tests.

use crate::core::common::OxiexecError;
use crate::core::common::types::{Schema, Tuple};
use crate::core::execution::{ExecutionOperator, TableStats};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Call counters that stay readable after the mock is boxed into a tree.
#[derive(Debug, Default)]
pub struct MockCounters {
    pub pulls: AtomicUsize,
    pub rescans: AtomicUsize,
    pub closes: AtomicUsize,
}

impl MockCounters {
    pub fn pulls(&self) -> usize {
        self.pulls.load(Ordering::SeqCst)
    }

    pub fn rescans(&self) -> usize {
        self.rescans.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

pub struct MockOperator {
    schema: Arc<Schema>,
    rows: Vec<Tuple>,
    cursor: usize,
    counters: Arc<MockCounters>,
    fail_on_close: bool,
}

impl MockOperator {
    pub fn new(schema: Arc<Schema>, rows: Vec<Tuple>) -> Self {
        Self { schema, rows, cursor: 0, counters: Arc::default(), fail_on_close: false }
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_on_close = true;
        self
    }

    pub fn counters(&self) -> Arc<MockCounters> {
        Arc::clone(&self.counters)
    }
}

impl ExecutionOperator for MockOperator {
    fn next(&mut self) -> Result<Option<&Tuple>, OxiexecError> {
        self.counters.pulls.fetch_add(1, Ordering::SeqCst);
        let row = self.rows.get(self.cursor);
        if row.is_some() {
            self.cursor += 1;
        }
        Ok(row)
    }

    fn get_output_schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    fn rescan(&mut self) -> Result<(), OxiexecError> {
        self.counters.rescans.fetch_add(1, Ordering::SeqCst);
        self.cursor = 0;
        Ok(())
    }

    fn close(&mut self) -> Result<(), OxiexecError> {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_close {
            return Err(OxiexecError::Internal("mock close failure".to_string()));
        }
        Ok(())
    }

    fn input_stats(&self) -> TableStats {
        TableStats { num_rows: self.cursor as u64, ..TableStats::default() }
    }
}
