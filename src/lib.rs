#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::panic)]
#![warn(clippy::cast_possible_truncation)]
#![warn(clippy::cast_possible_wrap)]
#![warn(clippy::cast_sign_loss)]
#![forbid(unsafe_code)]
#![deny(deprecated, clippy::todo, clippy::module_inception, clippy::correctness, clippy::perf)]
#![warn(clippy::style, clippy::complexity, clippy::all)]

//! # Oxiexec: pull-based physical query operators
//!
//! `oxiexec` is the execution core of a SQL engine. An operator tree is
//! driven from its root by repeated `next()` calls, each returning one tuple
//! or end of stream. It provides:
//! - A typed expression tree ([`EvalNode`]) with SQL three-valued logic and
//!   scalar function calls resolved through a [`FunctionRegistry`]
//! - A multi-key [`TupleComparator`] and a stable, blocking [`SortExec`]
//! - A [`HashLeftOuterJoinExec`] that emits exactly one null-padded row per
//!   unmatched left tuple
//! - Thin scan, filter, project and limit operators
//!
//! All column names are resolved when a tree is built; evaluation only works
//! with column positions.

pub mod core;

// Re-export key types for easier use by library consumers
pub use crate::core::common::types::{ColumnDef, DataType, Schema, Tuple, Value};
pub use crate::core::common::{EvaluationError, OxiexecError};
pub use crate::core::config::ExecConfig;
pub use crate::core::execution::comparator::{SortSpec, TupleComparator};
pub use crate::core::execution::eval::function::FunctionRegistry;
pub use crate::core::execution::eval::EvalNode;
pub use crate::core::execution::operators::{
    FilterExec, HashLeftOuterJoinExec, JoinSpec, LimitExec, ProjectExec, SeqScanExec, SortExec,
};
pub use crate::core::execution::projector::Target;
pub use crate::core::execution::{collect_all, ExecutionOperator, TaskContext};

/// Core result type for the library
pub type Result<T> = std::result::Result<T, OxiexecError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::execution::eval::BinaryOp;
    use std::sync::Arc;

    fn orders() -> SeqScanExec {
        let schema = Arc::new(Schema::new(vec![
            ColumnDef::new("o.id", DataType::Integer, false),
            ColumnDef::new("o.customer", DataType::Integer, true),
            ColumnDef::new("o.amount", DataType::Float, false),
        ]));
        let rows = vec![
            vec![Value::Integer(1), Value::Integer(10), Value::Float(25.0)],
            vec![Value::Integer(2), Value::Integer(11), Value::Float(5.0)],
            vec![Value::Integer(3), Value::Null, Value::Float(40.0)],
            vec![Value::Integer(4), Value::Integer(10), Value::Float(12.5)],
        ];
        SeqScanExec::from_rows(schema, rows).unwrap()
    }

    fn customers() -> SeqScanExec {
        let schema = Arc::new(Schema::new(vec![
            ColumnDef::new("c.id", DataType::Integer, false),
            ColumnDef::new("c.name", DataType::Text, false),
        ]));
        let rows = vec![vec![Value::Integer(10), Value::from("acme")], vec![Value::Integer(12), Value::from("zeta")]];
        SeqScanExec::from_rows(schema, rows).unwrap()
    }

    #[test]
    fn test_filter_join_sort_limit_tree() -> Result<()> {
        let ctx = TaskContext::default();
        let orders = orders();
        let big = EvalNode::binary(
            BinaryOp::GreaterThan,
            EvalNode::field(&orders.get_output_schema(), "o.amount")?,
            EvalNode::constant(10.0),
        )?;
        let filtered = FilterExec::new(Box::new(orders), big)?;

        let customers = customers();
        let merged = Schema::merge(&filtered.get_output_schema(), &customers.get_output_schema());
        let cond = EvalNode::eq(EvalNode::field(&merged, "o.customer")?, EvalNode::field(&merged, "c.id")?)?;
        let registry = FunctionRegistry::with_builtins();
        let name = EvalNode::func_call(&registry, "coalesce", vec![
            EvalNode::field(&merged, "c.name")?,
            EvalNode::constant("unknown"),
        ])?;
        let spec = JoinSpec::new(cond).with_targets(vec![
            Target::column(&merged, "o.id")?,
            Target::new(name, "customer"),
            Target::column(&merged, "o.amount")?,
        ]);
        let join = HashLeftOuterJoinExec::new(ctx.clone(), spec, Box::new(filtered), Box::new(customers))?;
        let sort = SortExec::new(ctx, Box::new(join), &[SortSpec::asc("customer"), SortSpec::desc("o.amount")])?;
        let mut root = LimitExec::new(Box::new(sort), 2);

        let out = collect_all(&mut root)?;
        assert_eq!(
            out,
            vec![
                vec![Value::Integer(1), Value::from("acme"), Value::Float(25.0)],
                vec![Value::Integer(4), Value::from("acme"), Value::Float(12.5)],
            ]
        );
        assert_eq!(root.input_stats().num_rows, 6);
        root.close()?;
        Ok(())
    }
}
