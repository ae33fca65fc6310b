use crate::core::common::types::{Schema, Tuple};
use crate::core::common::OxiexecError;
use crate::core::execution::comparator::{SortSpec, TupleComparator};
use crate::core::execution::{BoxedOperator, ExecutionOperator, TableStats, TaskContext};
use std::sync::Arc;
use tracing::debug;

enum SortState {
    Unsorted,
    Sorted { cursor: usize },
}

/// In-memory sort.
///
/// The first pull drains the whole child into a buffer and sorts it, so peak
/// memory is proportional to the input. Sorting is stable: tuples whose keys
/// all tie come out in input order.
pub struct SortExec {
    ctx: TaskContext,
    input: BoxedOperator,
    comparator: TupleComparator,
    buffer: Vec<Tuple>,
    state: SortState,
    closed: bool,
}

impl SortExec {
    pub fn new(ctx: TaskContext, input: BoxedOperator, sort_specs: &[SortSpec]) -> Result<Self, OxiexecError> {
        let schema = input.get_output_schema();
        let comparator = TupleComparator::new(&schema, sort_specs, ctx.config().nulls_first)?;
        Ok(Self { ctx, input, comparator, buffer: Vec::new(), state: SortState::Unsorted, closed: false })
    }

    pub fn comparator(&self) -> &TupleComparator {
        &self.comparator
    }

    fn materialize(&mut self) -> Result<(), OxiexecError> {
        self.buffer = Vec::with_capacity(self.ctx.config().sort_buffer_capacity);
        while let Some(tuple) = self.input.next()? {
            self.buffer.push(tuple.clone());
        }
        let comparator = &self.comparator;
        self.buffer.sort_by(|a, b| comparator.compare(a, b));
        debug!(rows = self.buffer.len(), keys = comparator.keys().len(), "sort input materialized");
        self.state = SortState::Sorted { cursor: 0 };
        Ok(())
    }
}

impl ExecutionOperator for SortExec {
    fn next(&mut self) -> Result<Option<&Tuple>, OxiexecError> {
        if self.closed || self.ctx.is_stopped() {
            return Ok(None);
        }
        if matches!(self.state, SortState::Unsorted) {
            self.materialize()?;
        }
        let SortState::Sorted { cursor } = &mut self.state else {
            return Ok(None);
        };
        let tuple = self.buffer.get(*cursor);
        if tuple.is_some() {
            *cursor += 1;
        }
        Ok(tuple)
    }

    fn get_output_schema(&self) -> Arc<Schema> {
        self.input.get_output_schema()
    }

    /// Replays the sorted buffer; the child is only re-read if it was never
    /// drained.
    fn rescan(&mut self) -> Result<(), OxiexecError> {
        match &mut self.state {
            SortState::Sorted { cursor } => {
                *cursor = 0;
                Ok(())
            }
            SortState::Unsorted => self.input.rescan(),
        }
    }

    fn close(&mut self) -> Result<(), OxiexecError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.buffer = Vec::new();
        self.state = SortState::Unsorted;
        self.input.close()
    }

    fn input_stats(&self) -> TableStats {
        self.input.input_stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::common::types::{ColumnDef, DataType, Value};
    use crate::core::config::ExecConfig;
    use crate::core::execution::collect_all;
    use crate::core::execution::operators::mock::{MockCounters, MockOperator};
    use proptest::prelude::*;

    fn schema() -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            ColumnDef::new("k", DataType::Integer, true),
            ColumnDef::new("seq", DataType::Integer, false),
        ]))
    }

    fn rows(keys: &[Option<i64>]) -> Vec<Tuple> {
        keys.iter()
            .enumerate()
            .map(|(seq, k)| vec![k.map_or(Value::Null, Value::from), Value::Integer(seq as i64)])
            .collect()
    }

    fn sort(keys: &[Option<i64>], specs: &[SortSpec]) -> (SortExec, Arc<MockCounters>) {
        let mock = MockOperator::new(schema(), rows(keys));
        let counters = mock.counters();
        let exec = SortExec::new(TaskContext::default(), Box::new(mock), specs).unwrap();
        (exec, counters)
    }

    fn column(rows: &[Tuple], idx: usize) -> Vec<Value> {
        rows.iter().map(|r| r[idx].clone()).collect()
    }

    #[test]
    fn test_sort_descending_with_nulls_last() {
        let (mut exec, _) = sort(&[Some(2), None, Some(5), Some(1)], &[SortSpec::desc("k")]);
        let out = collect_all(&mut exec).unwrap();
        assert_eq!(
            column(&out, 0),
            vec![Value::Integer(5), Value::Integer(2), Value::Integer(1), Value::Null]
        );
    }

    #[test]
    fn test_nulls_first_from_config() {
        let ctx = TaskContext::new(ExecConfig::builder().nulls_first(true).build().unwrap());
        let mock = MockOperator::new(schema(), rows(&[Some(3), None, Some(1)]));
        let mut exec = SortExec::new(ctx, Box::new(mock), &[SortSpec::asc("k")]).unwrap();
        let out = collect_all(&mut exec).unwrap();
        assert_eq!(column(&out, 0), vec![Value::Null, Value::Integer(1), Value::Integer(3)]);
    }

    #[test]
    fn test_rescan_replays_buffer_without_pulling_child() {
        let (mut exec, counters) = sort(&[Some(3), Some(1), Some(2)], &[SortSpec::asc("k")]);
        let first = collect_all(&mut exec).unwrap();
        let pulls = counters.pulls();

        exec.rescan().unwrap();
        let second = collect_all(&mut exec).unwrap();
        assert_eq!(first, second);
        assert_eq!(counters.pulls(), pulls);
        assert_eq!(counters.rescans(), 0);
    }

    #[test]
    fn test_close_is_idempotent_and_ends_stream() {
        let (mut exec, counters) = sort(&[Some(1)], &[SortSpec::asc("k")]);
        exec.close().unwrap();
        exec.close().unwrap();
        assert_eq!(counters.closes(), 1);
        assert!(exec.next().unwrap().is_none());
    }

    #[test]
    fn test_unknown_key_is_construction_error() {
        let mock = MockOperator::new(schema(), Vec::new());
        let err = SortExec::new(TaskContext::default(), Box::new(mock), &[SortSpec::asc("zzz")]);
        assert!(matches!(err, Err(OxiexecError::ColumnNotFound(_))));
    }

    proptest! {
        #[test]
        fn prop_sort_is_ordered_and_stable(
            keys in prop::collection::vec(prop::option::of(-5i64..5), 0..60),
            ascending in any::<bool>(),
        ) {
            let spec = if ascending { SortSpec::asc("k") } else { SortSpec::desc("k") };
            let (mut exec, _) = sort(&keys, &[spec]);
            let out = collect_all(&mut exec).unwrap();
            prop_assert_eq!(out.len(), keys.len());

            for pair in out.windows(2) {
                let ord = exec.comparator().compare(&pair[0], &pair[1]);
                prop_assert_ne!(ord, std::cmp::Ordering::Greater);
                if ord == std::cmp::Ordering::Equal {
                    prop_assert!(pair[0][1].compare(&pair[1][1]).is_lt(), "ties must keep input order");
                }
            }
        }
    }
}
