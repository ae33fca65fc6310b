use crate::core::common::error::{EvaluationError, OxiexecError};
use crate::core::common::types::{ColumnDef, Schema, Tuple, TupleView};
use crate::core::execution::eval::EvalNode;
use std::sync::Arc;

/// One output column: an expression over the input schema and its name.
#[derive(Debug, Clone)]
pub struct Target {
    pub expr: EvalNode,
    pub name: String,
}

impl Target {
    pub fn new(expr: EvalNode, name: impl Into<String>) -> Self {
        Self { expr, name: name.into() }
    }

    /// Passes an input column through under its own name.
    pub fn column(schema: &Schema, name: &str) -> Result<Self, OxiexecError> {
        Ok(Self::new(EvalNode::field(schema, name)?, name))
    }
}

/// Maps input tuples to output tuples, either unchanged or through a list of
/// target expressions.
#[derive(Debug, Clone)]
pub struct Projector {
    input_schema: Arc<Schema>,
    output_schema: Arc<Schema>,
    targets: Option<Vec<Target>>,
}

impl Projector {
    pub fn identity(input_schema: Arc<Schema>) -> Self {
        Self { output_schema: Arc::clone(&input_schema), input_schema, targets: None }
    }

    pub fn new(input_schema: Arc<Schema>, targets: Vec<Target>) -> Result<Self, OxiexecError> {
        if targets.is_empty() {
            return Err(OxiexecError::InvalidExpression("projection needs at least one target".to_string()));
        }
        let columns = targets
            .iter()
            .map(|t| ColumnDef::new(t.name.clone(), t.expr.result_type(), true))
            .collect();
        Ok(Self { input_schema, output_schema: Arc::new(Schema::new(columns)), targets: Some(targets) })
    }

    /// Identity when `targets` is `None`.
    pub fn from_targets(input_schema: Arc<Schema>, targets: Option<Vec<Target>>) -> Result<Self, OxiexecError> {
        match targets {
            Some(targets) => Self::new(input_schema, targets),
            None => Ok(Self::identity(input_schema)),
        }
    }

    pub fn input_schema(&self) -> &Arc<Schema> {
        &self.input_schema
    }

    pub fn output_schema(&self) -> &Arc<Schema> {
        &self.output_schema
    }

    /// Writes the projection of `input` into `out`, reusing its allocation.
    pub fn eval<T: TupleView>(&self, input: &T, out: &mut Tuple) -> Result<(), EvaluationError> {
        out.clear();
        match &self.targets {
            None => {
                for idx in 0..input.width() {
                    let value = input.value(idx).ok_or_else(|| EvaluationError::ColumnOutOfBounds {
                        column_id: idx,
                        width: input.width(),
                    })?;
                    out.push(value.clone());
                }
            }
            Some(targets) => {
                for target in targets {
                    out.push(target.expr.eval(&self.input_schema, input)?);
                }
            }
        }
        Ok(())
    }
}
