use crate::core::common::OxiexecError;
use crate::core::common::types::{Schema, Tuple, Value};
use crate::core::execution::{ExecutionOperator, TableStats};
use std::sync::Arc;
use tracing::trace;

/// Sequential scan over an in-memory fragment of rows.
///
/// Stands in for a storage scanner at the leaves of an operator tree. The
/// fragment is shared, so several scans (or several rescans) read the same
/// rows without copying them.
pub struct SeqScanExec {
    schema: Arc<Schema>,
    fragment: Arc<Vec<Tuple>>,
    cursor: usize,
    stats: TableStats,
    closed: bool,
}

impl SeqScanExec {
    /// Every row must have exactly one value per schema column.
    pub fn new(schema: Arc<Schema>, fragment: Arc<Vec<Tuple>>) -> Result<Self, OxiexecError> {
        if let Some((idx, row)) = fragment.iter().enumerate().find(|(_, row)| row.len() != schema.len()) {
            return Err(OxiexecError::TypeMismatch {
                expected: format!("{} columns", schema.len()),
                found: format!("{} columns", row.len()),
                context: format!("row {idx} of scan fragment"),
            });
        }
        Ok(Self { schema, fragment, cursor: 0, stats: TableStats::default(), closed: false })
    }

    pub fn from_rows(schema: Arc<Schema>, rows: Vec<Tuple>) -> Result<Self, OxiexecError> {
        Self::new(schema, Arc::new(rows))
    }
}

impl ExecutionOperator for SeqScanExec {
    fn next(&mut self) -> Result<Option<&Tuple>, OxiexecError> {
        if self.closed {
            return Ok(None);
        }
        let Some(row) = self.fragment.get(self.cursor) else {
            return Ok(None);
        };
        self.cursor += 1;
        self.stats.record_row(row.iter().map(Value::size_bytes).sum());
        Ok(Some(row))
    }

    fn get_output_schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    fn rescan(&mut self) -> Result<(), OxiexecError> {
        trace!(rows_read = self.cursor, "rescanning sequential scan");
        self.cursor = 0;
        Ok(())
    }

    fn close(&mut self) -> Result<(), OxiexecError> {
        self.closed = true;
        Ok(())
    }

    fn input_stats(&self) -> TableStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::common::types::{ColumnDef, DataType};
    use crate::core::execution::collect_all;

    fn schema() -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            ColumnDef::new("id", DataType::Integer, false),
            ColumnDef::new("tag", DataType::Text, true),
        ]))
    }

    #[test]
    fn test_scan_rescan_and_stats() {
        let rows = vec![vec![Value::Integer(1), Value::from("ab")], vec![Value::Integer(2), Value::Null]];
        let mut scan = SeqScanExec::from_rows(schema(), rows.clone()).unwrap();

        assert_eq!(collect_all(&mut scan).unwrap(), rows);
        assert!(scan.next().unwrap().is_none());
        assert_eq!(scan.input_stats(), TableStats { num_rows: 2, num_bytes: 18, read_bytes: 18 });

        scan.rescan().unwrap();
        assert_eq!(collect_all(&mut scan).unwrap().len(), 2);

        scan.close().unwrap();
        scan.close().unwrap();
        assert!(scan.next().unwrap().is_none());
    }

    #[test]
    fn test_rejects_rows_of_wrong_width() {
        let result = SeqScanExec::from_rows(schema(), vec![vec![Value::Integer(1)]]);
        assert!(matches!(result, Err(OxiexecError::TypeMismatch { .. })));
    }
}
