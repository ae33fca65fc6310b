// src/core/execution/operators/filter/tests.rs
use crate::core::common::types::{ColumnDef, DataType, Schema, Tuple, Value};
use crate::core::common::{EvaluationError, OxiexecError};
use crate::core::execution::eval::{BinaryOp, EvalNode};
use crate::core::execution::operators::filter::FilterExec;
use crate::core::execution::operators::mock::MockOperator;
use crate::core::execution::{collect_all, ExecutionOperator};
use std::sync::Arc;

fn schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        ColumnDef::new("id", DataType::Integer, false),
        ColumnDef::new("fruit", DataType::Text, true),
    ]))
}

fn rows() -> Vec<Tuple> {
    vec![
        vec![Value::Integer(1), Value::from("apple")],
        vec![Value::Integer(2), Value::from("banana")],
        vec![Value::Integer(3), Value::from("apple")],
        vec![Value::Integer(4), Value::Null],
    ]
}

fn filter_with(predicate: impl FnOnce(&Schema) -> EvalNode) -> FilterExec {
    let schema = schema();
    let predicate = predicate(&schema);
    FilterExec::new(Box::new(MockOperator::new(schema, rows())), predicate).unwrap()
}

#[test]
fn test_filter_simple_equals() -> Result<(), OxiexecError> {
    let mut filter = filter_with(|s| {
        EvalNode::eq(EvalNode::field(s, "fruit").unwrap(), EvalNode::constant("apple")).unwrap()
    });

    let first = filter.next()?.cloned();
    assert_eq!(first, Some(vec![Value::Integer(1), Value::from("apple")]));
    let second = filter.next()?.cloned();
    assert_eq!(second, Some(vec![Value::Integer(3), Value::from("apple")]));
    assert!(filter.next()?.is_none());
    Ok(())
}

#[test]
fn test_filter_null_is_not_true() -> Result<(), OxiexecError> {
    let mut filter = filter_with(|s| {
        EvalNode::binary(
            BinaryOp::NotEqual,
            EvalNode::field(s, "fruit").unwrap(),
            EvalNode::constant("banana"),
        )
        .unwrap()
    });
    let ids: Vec<Value> = collect_all(&mut filter)?.into_iter().map(|t| t[0].clone()).collect();
    assert_eq!(ids, vec![Value::Integer(1), Value::Integer(3)]);
    Ok(())
}

#[test]
fn test_filter_and_short_circuit() -> Result<(), OxiexecError> {
    let mut filter = filter_with(|s| {
        let small = EvalNode::binary(BinaryOp::LessThan, EvalNode::field(s, "id").unwrap(), EvalNode::constant(3i64))
            .unwrap();
        let not_apple = EvalNode::not(
            EvalNode::eq(EvalNode::field(s, "fruit").unwrap(), EvalNode::constant("apple")).unwrap(),
        )
        .unwrap();
        EvalNode::and(small, not_apple).unwrap()
    });
    let out = collect_all(&mut filter)?;
    assert_eq!(out, vec![vec![Value::Integer(2), Value::from("banana")]]);

    filter.rescan()?;
    assert_eq!(collect_all(&mut filter)?.len(), 1);
    Ok(())
}

#[test]
fn test_filter_rejects_non_boolean_predicate() {
    let schema = schema();
    let predicate = EvalNode::field(&schema, "id").unwrap();
    let result = FilterExec::new(Box::new(MockOperator::new(schema, rows())), predicate);
    assert!(matches!(result, Err(OxiexecError::TypeMismatch { .. })));
}

#[test]
fn test_filter_evaluation_error_aborts() {
    let mut filter = filter_with(|s| {
        let ratio = EvalNode::binary(BinaryOp::Divide, EvalNode::constant(10i64), EvalNode::field(s, "id").unwrap())
            .unwrap();
        let ratio = EvalNode::binary(BinaryOp::Minus, ratio, EvalNode::constant(10i64)).unwrap();
        let zero_based = EvalNode::binary(BinaryOp::Divide, EvalNode::constant(1i64), ratio).unwrap();
        EvalNode::is_null(zero_based, false).unwrap()
    });
    let err = filter.next().unwrap_err();
    assert!(matches!(err, OxiexecError::Evaluation(EvaluationError::DivisionByZero)));
}
