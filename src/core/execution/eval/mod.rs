//! Expression trees evaluated once per tuple.
//!
//! Every node kind is a variant of [`EvalNode`] and evaluation is a single
//! `match`. All name resolution and type checking happens in the constructor
//! functions, so a tree that was built successfully only fails at evaluation
//! time for data-dependent reasons (overflow, division by zero, a failing
//! function).

pub mod algebra;
pub mod function;

use crate::core::common::error::{EvaluationError, OxiexecError};
use crate::core::common::types::{DataType, Schema, TupleView, Value};
use function::{arg_accepts, FunctionDesc, FunctionRegistry, NullPolicy, ScalarFunction};
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    And,
    Or,
}

impl BinaryOp {
    pub const fn is_arithmetic(self) -> bool {
        matches!(self, Self::Plus | Self::Minus | Self::Multiply | Self::Divide | Self::Modulo)
    }

    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::NotEqual
                | Self::LessThan
                | Self::LessThanOrEqual
                | Self::GreaterThan
                | Self::GreaterThanOrEqual
        )
    }

    pub const fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// Node kinds this crate does not know about plug in here.
pub trait ExtensionEval: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn result_type(&self) -> DataType;

    fn eval(&self, schema: &Schema, tuple: &dyn TupleView) -> Result<Value, EvaluationError>;
}

/// A call to a resolved scalar function.
#[derive(Debug, Clone)]
pub struct FuncCallEval {
    pub desc: FunctionDesc,
    pub function: Arc<dyn ScalarFunction>,
    pub args: Vec<EvalNode>,
}

impl FuncCallEval {
    fn eval<T: TupleView>(&self, schema: &Schema, tuple: &T) -> Result<Value, EvaluationError> {
        let mut values = Vec::with_capacity(self.args.len());
        for arg in &self.args {
            values.push(arg.eval(schema, tuple)?);
        }
        if self.desc.null_policy == NullPolicy::ReturnsNullOnNullInput
            && values.iter().any(Value::is_null)
        {
            return Ok(Value::Null);
        }
        self.function.invoke(&values)
    }
}

#[derive(Debug, Clone)]
pub enum EvalNode {
    Field { column_id: usize, data_type: DataType, name: String },
    Const(Value),
    /// Only valid as the list operand of `In`.
    RowConst(Vec<Value>),
    Unary { op: UnaryOp, child: Box<EvalNode> },
    Binary { op: BinaryOp, left: Box<EvalNode>, right: Box<EvalNode>, result_type: DataType },
    IsNull { child: Box<EvalNode>, negated: bool },
    Between { predicand: Box<EvalNode>, begin: Box<EvalNode>, end: Box<EvalNode>, negated: bool },
    In { predicand: Box<EvalNode>, row: Box<EvalNode>, negated: bool },
    Like { predicand: Box<EvalNode>, pattern: String, regex: Regex, negated: bool },
    Cast { child: Box<EvalNode>, target: DataType },
    CaseWhen { whens: Vec<(EvalNode, EvalNode)>, else_result: Option<Box<EvalNode>>, result_type: DataType },
    FuncCall(FuncCallEval),
    Extension(Arc<dyn ExtensionEval>),
}

fn scalar(node: EvalNode, context: &str) -> Result<Box<EvalNode>, OxiexecError> {
    if matches!(node, EvalNode::RowConst(_)) {
        return Err(OxiexecError::InvalidExpression(format!(
            "row constant is only allowed as the list of IN, found in {context}"
        )));
    }
    Ok(Box::new(node))
}

fn boolean_operand(node: EvalNode, context: &str) -> Result<Box<EvalNode>, OxiexecError> {
    let ty = node.result_type();
    if ty != DataType::Boolean && ty != DataType::Null {
        return Err(OxiexecError::type_mismatch("Boolean", &ty, context));
    }
    scalar(node, context)
}

/// Translates a SQL LIKE pattern into an anchored regex.
fn like_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push_str("(?s)^");
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => out.push_str(".*"),
            '_' => out.push('.'),
            '\\' => match chars.next() {
                Some(escaped) => out.push_str(&regex::escape(&escaped.to_string())),
                None => out.push_str(&regex::escape("\\")),
            },
            other => out.push_str(&regex::escape(&other.to_string())),
        }
    }
    out.push('$');
    out
}

fn not3(v: Value) -> Value {
    match v {
        Value::Boolean(b) => Value::Boolean(!b),
        _ => Value::Null,
    }
}

fn and3(left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Boolean(false), _) | (_, Value::Boolean(false)) => Value::Boolean(false),
        (Value::Boolean(true), Value::Boolean(true)) => Value::Boolean(true),
        _ => Value::Null,
    }
}

/// Wraps `node` in a cast unless it already yields `target` or a bare null.
fn widen_to(node: EvalNode, target: DataType) -> EvalNode {
    let actual = node.result_type();
    if actual == target || actual == DataType::Null {
        node
    } else {
        EvalNode::Cast { child: Box::new(node), target }
    }
}

fn compare3(left: &Value, right: &Value, accept: impl Fn(Ordering) -> bool) -> Value {
    if left.is_null() || right.is_null() {
        return Value::Null;
    }
    Value::Boolean(accept(left.compare(right)))
}

fn invalid_operands(op: BinaryOp, left: &Value, right: &Value) -> EvaluationError {
    EvaluationError::InvalidOperands {
        op: op.symbol().to_string(),
        left: left.get_type(),
        right: right.get_type(),
    }
}

fn overflow(op: BinaryOp) -> EvaluationError {
    EvaluationError::ArithmeticOverflow { op: op.symbol().to_string() }
}

#[allow(clippy::cast_precision_loss)]
fn as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Integer(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

fn arithmetic(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvaluationError> {
    if left.is_null() || right.is_null() {
        return Ok(Value::Null);
    }
    if let (Value::Integer(a), Value::Integer(b)) = (left, right) {
        let (a, b) = (*a, *b);
        let result = match op {
            BinaryOp::Plus => a.checked_add(b),
            BinaryOp::Minus => a.checked_sub(b),
            BinaryOp::Multiply => a.checked_mul(b),
            BinaryOp::Divide | BinaryOp::Modulo if b == 0 => {
                return Err(EvaluationError::DivisionByZero)
            }
            BinaryOp::Divide => a.checked_div(b),
            BinaryOp::Modulo => a.checked_rem(b),
            _ => return Err(invalid_operands(op, left, right)),
        };
        return result.map(Value::Integer).ok_or_else(|| overflow(op));
    }
    let (Some(a), Some(b)) = (as_f64(left), as_f64(right)) else {
        return Err(invalid_operands(op, left, right));
    };
    let result = match op {
        BinaryOp::Plus => a + b,
        BinaryOp::Minus => a - b,
        BinaryOp::Multiply => a * b,
        BinaryOp::Divide | BinaryOp::Modulo if b == 0.0 => {
            return Err(EvaluationError::DivisionByZero)
        }
        BinaryOp::Divide => a / b,
        BinaryOp::Modulo => a % b,
        _ => return Err(invalid_operands(op, left, right)),
    };
    Ok(Value::Float(result))
}

impl EvalNode {
    /// Column reference resolved by name against `schema`.
    pub fn field(schema: &Schema, name: &str) -> Result<Self, OxiexecError> {
        let column_id = schema.column_id(name)?;
        Self::field_at(schema, column_id)
    }

    /// Column reference by position, checked against `schema`.
    pub fn field_at(schema: &Schema, column_id: usize) -> Result<Self, OxiexecError> {
        let column = schema.column(column_id).ok_or_else(|| {
            OxiexecError::ColumnNotFound(format!(
                "column id {column_id} (schema has {} columns)",
                schema.len()
            ))
        })?;
        Ok(Self::Field { column_id, data_type: column.data_type, name: column.name.clone() })
    }

    pub fn constant(value: impl Into<Value>) -> Self {
        Self::Const(value.into())
    }

    pub const fn null() -> Self {
        Self::Const(Value::Null)
    }

    pub fn row_const(values: Vec<Value>) -> Self {
        Self::RowConst(values)
    }

    pub fn not(child: Self) -> Result<Self, OxiexecError> {
        Ok(Self::Unary { op: UnaryOp::Not, child: boolean_operand(child, "NOT")? })
    }

    pub fn negate(child: Self) -> Result<Self, OxiexecError> {
        let ty = child.result_type();
        if !ty.is_numeric() && ty != DataType::Null {
            return Err(OxiexecError::type_mismatch("numeric", &ty, "unary minus"));
        }
        Ok(Self::Unary { op: UnaryOp::Negate, child: scalar(child, "unary minus")? })
    }

    pub fn binary(op: BinaryOp, left: Self, right: Self) -> Result<Self, OxiexecError> {
        let (lt, rt) = (left.result_type(), right.result_type());
        let context = format!("operator {}", op.symbol());
        let result_type = if op.is_arithmetic() {
            for ty in [lt, rt] {
                if !ty.is_numeric() && ty != DataType::Null {
                    return Err(OxiexecError::type_mismatch("numeric", &ty, &context));
                }
            }
            lt.numeric_result(rt)
        } else if op.is_comparison() {
            if !lt.is_comparable_with(rt) {
                return Err(OxiexecError::type_mismatch(lt.to_string(), &rt, &context));
            }
            DataType::Boolean
        } else {
            return Ok(Self::Binary {
                op,
                left: boolean_operand(left, &context)?,
                right: boolean_operand(right, &context)?,
                result_type: DataType::Boolean,
            });
        };
        Ok(Self::Binary {
            op,
            left: scalar(left, &context)?,
            right: scalar(right, &context)?,
            result_type,
        })
    }

    pub fn eq(left: Self, right: Self) -> Result<Self, OxiexecError> {
        Self::binary(BinaryOp::Equal, left, right)
    }

    pub fn and(left: Self, right: Self) -> Result<Self, OxiexecError> {
        Self::binary(BinaryOp::And, left, right)
    }

    pub fn or(left: Self, right: Self) -> Result<Self, OxiexecError> {
        Self::binary(BinaryOp::Or, left, right)
    }

    pub fn is_null(child: Self, negated: bool) -> Result<Self, OxiexecError> {
        Ok(Self::IsNull { child: scalar(child, "IS NULL")?, negated })
    }

    pub fn between(predicand: Self, begin: Self, end: Self, negated: bool) -> Result<Self, OxiexecError> {
        let pt = predicand.result_type();
        for bound in [&begin, &end] {
            let bt = bound.result_type();
            if !pt.is_comparable_with(bt) {
                return Err(OxiexecError::type_mismatch(pt.to_string(), &bt, "BETWEEN"));
            }
        }
        Ok(Self::Between {
            predicand: scalar(predicand, "BETWEEN")?,
            begin: scalar(begin, "BETWEEN")?,
            end: scalar(end, "BETWEEN")?,
            negated,
        })
    }

    pub fn in_list(predicand: Self, row: Self, negated: bool) -> Result<Self, OxiexecError> {
        let Self::RowConst(values) = &row else {
            return Err(OxiexecError::InvalidExpression(
                "IN expects a row constant as its list".to_string(),
            ));
        };
        let pt = predicand.result_type();
        if let Some(bad) = values.iter().map(Value::get_type).find(|t| !pt.is_comparable_with(*t)) {
            return Err(OxiexecError::type_mismatch(pt.to_string(), &bad, "IN list"));
        }
        Ok(Self::In { predicand: scalar(predicand, "IN")?, row: Box::new(row), negated })
    }

    /// `LIKE` / `ILIKE`. `%` matches any run of characters, `_` exactly one,
    /// and `\` escapes the next character.
    pub fn like(
        predicand: Self,
        pattern: &str,
        negated: bool,
        case_insensitive: bool,
    ) -> Result<Self, OxiexecError> {
        let pt = predicand.result_type();
        if pt != DataType::Text && pt != DataType::Null {
            return Err(OxiexecError::type_mismatch("Text", &pt, "LIKE"));
        }
        let regex = RegexBuilder::new(&like_to_regex(pattern))
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|e| OxiexecError::InvalidExpression(format!("bad LIKE pattern '{pattern}': {e}")))?;
        Ok(Self::Like { predicand: scalar(predicand, "LIKE")?, pattern: pattern.to_string(), regex, negated })
    }

    pub fn cast(child: Self, target: DataType) -> Result<Self, OxiexecError> {
        Ok(Self::Cast { child: scalar(child, "CAST")?, target })
    }

    /// Searched `CASE WHEN cond THEN result ... ELSE result END`.
    pub fn case_when(whens: Vec<(Self, Self)>, else_result: Option<Self>) -> Result<Self, OxiexecError> {
        if whens.is_empty() {
            return Err(OxiexecError::InvalidExpression("CASE needs at least one WHEN".to_string()));
        }
        let mut result_type = DataType::Null;
        let results = whens.iter().map(|(_, r)| r).chain(else_result.as_ref());
        for result in results {
            let ty = result.result_type();
            result_type = match (result_type, ty) {
                (DataType::Null, t) | (t, DataType::Null) => t,
                (a, b) if a == b => a,
                (a, b) if a.is_numeric() && b.is_numeric() => DataType::Float,
                (a, b) => return Err(OxiexecError::type_mismatch(a.to_string(), &b, "CASE result")),
            };
        }
        let mut checked = Vec::with_capacity(whens.len());
        for (cond, result) in whens {
            let result = widen_to(*scalar(result, "CASE THEN")?, result_type);
            checked.push((*boolean_operand(cond, "CASE WHEN")?, result));
        }
        let else_result = else_result
            .map(|e| scalar(e, "CASE ELSE").map(|e| Box::new(widen_to(*e, result_type))))
            .transpose()?;
        Ok(Self::CaseWhen { whens: checked, else_result, result_type })
    }

    /// Resolves `name` against `registry` for the argument types and binds the
    /// implementation. Integer arguments passed to float parameters get an
    /// explicit cast.
    pub fn func_call(registry: &FunctionRegistry, name: &str, args: Vec<Self>) -> Result<Self, OxiexecError> {
        let arg_types: Vec<DataType> = args.iter().map(Self::result_type).collect();
        let (desc, function) = registry.resolve(name, &arg_types)?;
        let mut bound_args = Vec::with_capacity(args.len());
        for (arg, declared) in args.into_iter().zip(&desc.arg_types) {
            let actual = arg.result_type();
            debug_assert!(arg_accepts(*declared, actual));
            let arg = *scalar(arg, &desc.name)?;
            if actual == *declared || actual == DataType::Null {
                bound_args.push(arg);
            } else {
                bound_args.push(Self::Cast { child: Box::new(arg), target: *declared });
            }
        }
        Ok(Self::FuncCall(FuncCallEval { desc, function, args: bound_args }))
    }

    pub fn extension(node: Arc<dyn ExtensionEval>) -> Self {
        Self::Extension(node)
    }

    pub fn result_type(&self) -> DataType {
        match self {
            Self::Field { data_type, .. } => *data_type,
            Self::Const(v) => v.get_type(),
            Self::RowConst(values) => {
                values.iter().map(Value::get_type).find(|t| *t != DataType::Null).unwrap_or(DataType::Null)
            }
            Self::Unary { op: UnaryOp::Not, .. }
            | Self::IsNull { .. }
            | Self::Between { .. }
            | Self::In { .. }
            | Self::Like { .. } => DataType::Boolean,
            Self::Unary { op: UnaryOp::Negate, child } => child.result_type(),
            Self::Binary { result_type, .. } | Self::CaseWhen { result_type, .. } => *result_type,
            Self::Cast { target, .. } => *target,
            Self::FuncCall(call) => call.desc.return_type,
            Self::Extension(ext) => ext.result_type(),
        }
    }

    /// Direct sub-expressions, left to right.
    pub fn children(&self) -> Vec<&Self> {
        match self {
            Self::Field { .. } | Self::Const(_) | Self::RowConst(_) | Self::Extension(_) => Vec::new(),
            Self::Unary { child, .. } | Self::IsNull { child, .. } | Self::Cast { child, .. } => {
                vec![child.as_ref()]
            }
            Self::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Self::Between { predicand, begin, end, .. } => {
                vec![predicand.as_ref(), begin.as_ref(), end.as_ref()]
            }
            Self::In { predicand, row, .. } => vec![predicand.as_ref(), row.as_ref()],
            Self::Like { predicand, .. } => vec![predicand.as_ref()],
            Self::CaseWhen { whens, else_result, .. } => whens
                .iter()
                .flat_map(|(c, r)| [c, r])
                .chain(else_result.as_deref())
                .collect(),
            Self::FuncCall(call) => call.args.iter().collect(),
        }
    }

    /// Evaluates the expression against one tuple laid out by `schema`.
    pub fn eval<T: TupleView>(&self, schema: &Schema, tuple: &T) -> Result<Value, EvaluationError> {
        match self {
            Self::Field { column_id, .. } => tuple.value(*column_id).cloned().ok_or_else(|| {
                EvaluationError::ColumnOutOfBounds { column_id: *column_id, width: tuple.width() }
            }),
            Self::Const(v) => Ok(v.clone()),
            Self::RowConst(_) => Err(EvaluationError::NotScalar { kind: "row constant".to_string() }),
            Self::Unary { op, child } => {
                let v = child.eval(schema, tuple)?;
                match (op, v) {
                    (_, Value::Null) => Ok(Value::Null),
                    (UnaryOp::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
                    (UnaryOp::Negate, Value::Integer(i)) => i
                        .checked_neg()
                        .map(Value::Integer)
                        .ok_or_else(|| EvaluationError::ArithmeticOverflow { op: "-".to_string() }),
                    (UnaryOp::Negate, Value::Float(f)) => Ok(Value::Float(-f)),
                    (_, other) => Err(EvaluationError::InvalidOperands {
                        op: format!("{op:?}"),
                        left: other.get_type(),
                        right: DataType::Null,
                    }),
                }
            }
            Self::Binary { op, left, right, .. } => {
                let lv = left.eval(schema, tuple)?;
                match op {
                    BinaryOp::And if lv == Value::Boolean(false) => return Ok(lv),
                    BinaryOp::Or if lv == Value::Boolean(true) => return Ok(lv),
                    _ => {}
                }
                let rv = right.eval(schema, tuple)?;
                match op {
                    BinaryOp::And => Ok(and3(&lv, &rv)),
                    BinaryOp::Or => Ok(not3(and3(&not3(lv), &not3(rv)))),
                    BinaryOp::Equal => Ok(compare3(&lv, &rv, Ordering::is_eq)),
                    BinaryOp::NotEqual => Ok(compare3(&lv, &rv, Ordering::is_ne)),
                    BinaryOp::LessThan => Ok(compare3(&lv, &rv, Ordering::is_lt)),
                    BinaryOp::LessThanOrEqual => Ok(compare3(&lv, &rv, Ordering::is_le)),
                    BinaryOp::GreaterThan => Ok(compare3(&lv, &rv, Ordering::is_gt)),
                    BinaryOp::GreaterThanOrEqual => Ok(compare3(&lv, &rv, Ordering::is_ge)),
                    arith => arithmetic(*arith, &lv, &rv),
                }
            }
            Self::IsNull { child, negated } => {
                Ok(Value::Boolean(child.eval(schema, tuple)?.is_null() != *negated))
            }
            Self::Between { predicand, begin, end, negated } => {
                let p = predicand.eval(schema, tuple)?;
                let b = begin.eval(schema, tuple)?;
                let e = end.eval(schema, tuple)?;
                let within = and3(&compare3(&p, &b, Ordering::is_ge), &compare3(&p, &e, Ordering::is_le));
                Ok(if *negated { not3(within) } else { within })
            }
            Self::In { predicand, row, negated } => {
                let Self::RowConst(values) = row.as_ref() else {
                    return Err(EvaluationError::NotScalar { kind: "IN list".to_string() });
                };
                let p = predicand.eval(schema, tuple)?;
                let found = if p.is_null() {
                    Value::Null
                } else if values.iter().any(|v| !v.is_null() && p.compare(v).is_eq()) {
                    Value::Boolean(true)
                } else if values.iter().any(Value::is_null) {
                    Value::Null
                } else {
                    Value::Boolean(false)
                };
                Ok(if *negated { not3(found) } else { found })
            }
            Self::Like { predicand, regex, negated, .. } => match predicand.eval(schema, tuple)? {
                Value::Null => Ok(Value::Null),
                Value::Text(s) => Ok(Value::Boolean(regex.is_match(&s) != *negated)),
                other => Err(EvaluationError::InvalidOperands {
                    op: "LIKE".to_string(),
                    left: other.get_type(),
                    right: DataType::Text,
                }),
            },
            Self::Cast { child, target } => child.eval(schema, tuple)?.cast(*target),
            Self::CaseWhen { whens, else_result, .. } => {
                for (cond, result) in whens {
                    if cond.eval(schema, tuple)?.is_true() {
                        return result.eval(schema, tuple);
                    }
                }
                match else_result {
                    Some(e) => e.eval(schema, tuple),
                    None => Ok(Value::Null),
                }
            }
            Self::FuncCall(call) => call.eval(schema, tuple),
            Self::Extension(ext) => ext.eval(schema, tuple),
        }
    }

    /// Evaluates a predicate; only `true` passes, `false` and `NULL` do not.
    pub fn eval_bool<T: TupleView>(&self, schema: &Schema, tuple: &T) -> Result<bool, EvaluationError> {
        Ok(self.eval(schema, tuple)?.is_true())
    }
}

impl fmt::Display for EvalNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field { name, .. } => f.write_str(name),
            Self::Const(Value::Text(s)) => write!(f, "'{s}'"),
            Self::Const(v) => write!(f, "{v}"),
            Self::RowConst(values) => {
                let items: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "({})", items.join(", "))
            }
            Self::Unary { op: UnaryOp::Not, child } => write!(f, "NOT {child}"),
            Self::Unary { op: UnaryOp::Negate, child } => write!(f, "-{child}"),
            Self::Binary { op, left, right, .. } => write!(f, "({left} {} {right})", op.symbol()),
            Self::IsNull { child, negated } => {
                write!(f, "{child} IS {}NULL", if *negated { "NOT " } else { "" })
            }
            Self::Between { predicand, begin, end, negated } => write!(
                f,
                "{predicand} {}BETWEEN {begin} AND {end}",
                if *negated { "NOT " } else { "" }
            ),
            Self::In { predicand, row, negated } => {
                write!(f, "{predicand} {}IN {row}", if *negated { "NOT " } else { "" })
            }
            Self::Like { predicand, pattern, negated, .. } => {
                write!(f, "{predicand} {}LIKE '{pattern}'", if *negated { "NOT " } else { "" })
            }
            Self::Cast { child, target } => write!(f, "CAST({child} AS {target})"),
            Self::CaseWhen { whens, else_result, .. } => {
                f.write_str("CASE")?;
                for (cond, result) in whens {
                    write!(f, " WHEN {cond} THEN {result}")?;
                }
                if let Some(e) = else_result {
                    write!(f, " ELSE {e}")?;
                }
                f.write_str(" END")
            }
            Self::FuncCall(call) => {
                let args: Vec<String> = call.args.iter().map(ToString::to_string).collect();
                write!(f, "{}({})", call.desc.name, args.join(","))
            }
            Self::Extension(ext) => f.write_str(ext.name()),
        }
    }
}
