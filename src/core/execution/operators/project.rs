use crate::core::common::types::{Schema, Tuple};
use crate::core::common::OxiexecError;
use crate::core::execution::projector::{Projector, Target};
use crate::core::execution::{BoxedOperator, ExecutionOperator, TableStats};
use std::sync::Arc;

pub struct ProjectExec {
    input: BoxedOperator,
    projector: Projector,
    out: Tuple,
}

impl ProjectExec {
    /// Targets are expressions over the input's output schema.
    pub fn new(input: BoxedOperator, targets: Vec<Target>) -> Result<Self, OxiexecError> {
        let projector = Projector::new(input.get_output_schema(), targets)?;
        Ok(Self { input, projector, out: Tuple::new() })
    }
}

impl ExecutionOperator for ProjectExec {
    fn next(&mut self) -> Result<Option<&Tuple>, OxiexecError> {
        match self.input.next()? {
            Some(tuple) => {
                self.projector.eval(tuple, &mut self.out)?;
                Ok(Some(&self.out))
            }
            None => Ok(None),
        }
    }

    fn get_output_schema(&self) -> Arc<Schema> {
        Arc::clone(self.projector.output_schema())
    }

    fn rescan(&mut self) -> Result<(), OxiexecError> {
        self.input.rescan()
    }

    fn close(&mut self) -> Result<(), OxiexecError> {
        self.input.close()
    }

    fn input_stats(&self) -> TableStats {
        self.input.input_stats()
    }
}
