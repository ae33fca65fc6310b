//! Scalar function descriptors and the registry that binds them.

use crate::core::common::error::{EvaluationError, OxiexecError};
use crate::core::common::types::{DataType, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// What a function call does when one of its arguments is null.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullPolicy {
    /// Any null argument makes the result null; the implementation is not invoked.
    ReturnsNullOnNullInput,
    /// The implementation is always invoked and handles nulls itself.
    CalledOnNullInput,
}

/// Resolved signature of a scalar function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDesc {
    pub name: String,
    pub arg_types: Vec<DataType>,
    pub return_type: DataType,
    pub null_policy: NullPolicy,
}

impl FunctionDesc {
    pub fn new(
        name: impl Into<String>,
        arg_types: Vec<DataType>,
        return_type: DataType,
        null_policy: NullPolicy,
    ) -> Self {
        Self { name: name.into().to_lowercase(), arg_types, return_type, null_policy }
    }

    /// e.g. `abs(Integer)`
    pub fn signature(&self) -> String {
        format_signature(&self.name, &self.arg_types)
    }
}

fn format_signature(name: &str, arg_types: &[DataType]) -> String {
    let args: Vec<String> = arg_types.iter().map(ToString::to_string).collect();
    format!("{}({})", name, args.join(", "))
}

/// A bound scalar function implementation.
pub trait ScalarFunction: Send + Sync + fmt::Debug {
    fn invoke(&self, args: &[Value]) -> Result<Value, EvaluationError>;
}

type FnBody = dyn Fn(&[Value]) -> Result<Value, EvaluationError> + Send + Sync;

/// Adapts a closure into a [`ScalarFunction`].
pub struct FnScalar {
    name: String,
    body: Box<FnBody>,
}

impl FnScalar {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, EvaluationError> + Send + Sync + 'static,
    {
        Self { name: name.into(), body: Box::new(body) }
    }
}

impl fmt::Debug for FnScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnScalar").field("name", &self.name).finish_non_exhaustive()
    }
}

impl ScalarFunction for FnScalar {
    fn invoke(&self, args: &[Value]) -> Result<Value, EvaluationError> {
        (self.body)(args)
    }
}

/// A registry entry: the descriptor and its implementation.
pub type BoundFunction = (FunctionDesc, Arc<dyn ScalarFunction>);

/// Maps function signatures to implementations.
///
/// Lookups happen while expressions are built; evaluation only ever sees the
/// bound implementation.
#[derive(Debug, Default, Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, Vec<BoundFunction>>,
}

/// Whether an argument of type `actual` can be passed to a `declared` parameter.
/// Integers widen to floats; a null literal fits any parameter.
pub(crate) fn arg_accepts(declared: DataType, actual: DataType) -> bool {
    declared == actual
        || actual == DataType::Null
        || (declared == DataType::Float && actual == DataType::Integer)
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in scalar functions.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        register_builtins(&mut registry);
        registry
    }

    pub fn register(&mut self, desc: FunctionDesc, function: Arc<dyn ScalarFunction>) {
        self.functions.entry(desc.name.clone()).or_default().push((desc, function));
    }

    pub fn register_fn<F>(
        &mut self,
        name: &str,
        arg_types: Vec<DataType>,
        return_type: DataType,
        null_policy: NullPolicy,
        body: F,
    ) where
        F: Fn(&[Value]) -> Result<Value, EvaluationError> + Send + Sync + 'static,
    {
        let desc = FunctionDesc::new(name, arg_types, return_type, null_policy);
        let function = Arc::new(FnScalar::new(desc.name.clone(), body));
        self.register(desc, function);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_lowercase())
    }

    /// Finds the overload matching `arg_types`, preferring an exact match over
    /// one that needs implicit widening.
    ///
    /// # Errors
    ///
    /// `FunctionNotFound` for an unknown name, `TypeMismatch` when the name is
    /// known but no overload accepts the argument types.
    pub fn resolve(&self, name: &str, arg_types: &[DataType]) -> Result<BoundFunction, OxiexecError> {
        let key = name.to_lowercase();
        let overloads = self.functions.get(&key).ok_or_else(|| OxiexecError::FunctionNotFound {
            signature: format_signature(&key, arg_types),
        })?;

        let exact = overloads.iter().find(|(desc, _)| desc.arg_types == arg_types);
        let coercible = || {
            overloads.iter().find(|(desc, _)| {
                desc.arg_types.len() == arg_types.len()
                    && desc.arg_types.iter().zip(arg_types).all(|(d, a)| arg_accepts(*d, *a))
            })
        };

        exact
            .or_else(coercible)
            .map(|(desc, function)| (desc.clone(), Arc::clone(function)))
            .ok_or_else(|| OxiexecError::TypeMismatch {
                expected: overloads
                    .iter()
                    .map(|(desc, _)| desc.signature())
                    .collect::<Vec<_>>()
                    .join(" | "),
                found: format_signature(&key, arg_types),
                context: format!("call to function '{key}'"),
            })
    }
}

fn failed(name: &str, reason: impl Into<String>) -> EvaluationError {
    EvaluationError::FunctionFailed { name: name.to_string(), reason: reason.into() }
}

fn text_arg<'a>(name: &str, args: &'a [Value], idx: usize) -> Result<&'a str, EvaluationError> {
    match args.get(idx) {
        Some(Value::Text(s)) => Ok(s),
        other => Err(failed(name, format!("expected Text argument {idx}, got {other:?}"))),
    }
}

fn float_arg(name: &str, args: &[Value], idx: usize) -> Result<f64, EvaluationError> {
    match args.get(idx) {
        Some(Value::Float(f)) => Ok(*f),
        other => Err(failed(name, format!("expected Float argument {idx}, got {other:?}"))),
    }
}

fn register_builtins(registry: &mut FunctionRegistry) {
    use DataType::{Blob, Boolean, Date, Float, Integer, Null, Text};
    use NullPolicy::{CalledOnNullInput, ReturnsNullOnNullInput};

    registry.register_fn("abs", vec![Integer], Integer, ReturnsNullOnNullInput, |args| match args {
        [Value::Integer(i)] => i
            .checked_abs()
            .map(Value::Integer)
            .ok_or_else(|| EvaluationError::ArithmeticOverflow { op: "abs".to_string() }),
        other => Err(failed("abs", format!("unexpected arguments {other:?}"))),
    });
    registry.register_fn("abs", vec![Float], Float, ReturnsNullOnNullInput, |args| {
        Ok(Value::Float(float_arg("abs", args, 0)?.abs()))
    });
    registry.register_fn("upper", vec![Text], Text, ReturnsNullOnNullInput, |args| {
        Ok(Value::Text(text_arg("upper", args, 0)?.to_uppercase()))
    });
    registry.register_fn("lower", vec![Text], Text, ReturnsNullOnNullInput, |args| {
        Ok(Value::Text(text_arg("lower", args, 0)?.to_lowercase()))
    });
    registry.register_fn("length", vec![Text], Integer, ReturnsNullOnNullInput, |args| {
        let len = text_arg("length", args, 0)?.chars().count();
        i64::try_from(len)
            .map(Value::Integer)
            .map_err(|_| EvaluationError::ArithmeticOverflow { op: "length".to_string() })
    });
    registry.register_fn("concat", vec![Text, Text], Text, ReturnsNullOnNullInput, |args| {
        let mut out = text_arg("concat", args, 0)?.to_string();
        out.push_str(text_arg("concat", args, 1)?);
        Ok(Value::Text(out))
    });
    registry.register_fn("round", vec![Float], Float, ReturnsNullOnNullInput, |args| {
        Ok(Value::Float(float_arg("round", args, 0)?.round()))
    });
    registry.register_fn("sqrt", vec![Float], Float, ReturnsNullOnNullInput, |args| {
        let x = float_arg("sqrt", args, 0)?;
        if x < 0.0 {
            return Err(failed("sqrt", "cannot take the square root of a negative number"));
        }
        Ok(Value::Float(x.sqrt()))
    });
    for ty in [Null, Boolean, Integer, Float, Text, Date, Blob] {
        registry.register_fn("coalesce", vec![ty, ty], ty, CalledOnNullInput, |args| {
            Ok(args.iter().find(|v| !v.is_null()).cloned().unwrap_or(Value::Null))
        });
    }
}
