use super::data_type::DataType;
use crate::core::common::error::EvaluationError;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single scalar datum.
///
/// Equality and hashing are structural: `Integer(1)` and `Float(1.0)` are
/// different hash keys even though [`Value::compare`] orders them as equal.
/// Floats are keyed by their bit pattern with `-0.0` folded into `0.0` and all
/// NaNs folded into one.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Blob(Vec<u8>),
}

/// Folds `-0.0` into `0.0` and every NaN into one positive NaN.
fn normalize_float(f: f64) -> f64 {
    if f == 0.0 {
        0.0
    } else if f.is_nan() {
        f64::NAN
    } else {
        f
    }
}

fn float_key(f: f64) -> u64 {
    normalize_float(f).to_bits()
}

fn cmp_floats(a: f64, b: f64) -> Ordering {
    normalize_float(a).total_cmp(&normalize_float(b))
}

impl Value {
    #[must_use]
    pub const fn get_type(&self) -> DataType {
        match self {
            Self::Null => DataType::Null,
            Self::Boolean(_) => DataType::Boolean,
            Self::Integer(_) => DataType::Integer,
            Self::Float(_) => DataType::Float,
            Self::Text(_) => DataType::Text,
            Self::Date(_) => DataType::Date,
            Self::Blob(_) => DataType::Blob,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// SQL truth test: only `Boolean(true)` is true, `Null` is not.
    #[inline]
    #[must_use]
    pub const fn is_true(&self) -> bool {
        matches!(self, Self::Boolean(true))
    }

    /// Rank used to order values of incompatible types against each other.
    const fn type_rank(&self) -> u8 {
        match self {
            Self::Boolean(_) => 0,
            Self::Integer(_) | Self::Float(_) => 1,
            Self::Text(_) => 2,
            Self::Date(_) => 3,
            Self::Blob(_) => 4,
            Self::Null => 5,
        }
    }

    /// Total ordering over all values.
    ///
    /// Numbers compare numerically across `Integer` and `Float`, `Null`
    /// sorts after every non-null value, and values of unrelated types are
    /// ordered by a fixed type rank. `-0.0` equals `0.0` and NaN sorts after
    /// every other number, matching equality and hashing.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Boolean(a), Self::Boolean(b)) => a.cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => cmp_floats(*a, *b),
            (Self::Integer(a), Self::Float(b)) => cmp_floats(*a as f64, *b),
            (Self::Float(a), Self::Integer(b)) => cmp_floats(*a, *b as f64),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::Blob(a), Self::Blob(b)) => a.cmp(b),
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }

    /// Approximate in-memory payload size, used for scan statistics.
    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        let size = match self {
            Self::Null => 0,
            Self::Boolean(_) => 1,
            Self::Date(_) => 4,
            Self::Integer(_) | Self::Float(_) => 8,
            Self::Text(s) => s.len(),
            Self::Blob(b) => b.len(),
        };
        size as u64
    }

    /// Converts the value to `target`. `Null` casts to `Null` for every type.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn cast(&self, target: DataType) -> Result<Self, EvaluationError> {
        if self.get_type() == target || self.is_null() {
            return Ok(self.clone());
        }
        let invalid = || EvaluationError::InvalidCast { from: self.to_string(), to: target };
        match (self, target) {
            (_, DataType::Null) => Ok(Self::Null),
            (_, DataType::Text) => Ok(Self::Text(self.to_string())),
            (Self::Integer(i), DataType::Float) => Ok(Self::Float(*i as f64)),
            (Self::Float(f), DataType::Integer) => {
                if f.is_finite() && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                    Ok(Self::Integer(f.trunc() as i64))
                } else {
                    Err(invalid())
                }
            }
            (Self::Boolean(b), DataType::Integer) => Ok(Self::Integer(i64::from(*b))),
            (Self::Integer(i), DataType::Boolean) => Ok(Self::Boolean(*i != 0)),
            (Self::Text(s), DataType::Integer) => {
                s.trim().parse().map(Self::Integer).map_err(|_| invalid())
            }
            (Self::Text(s), DataType::Float) => {
                s.trim().parse().map(Self::Float).map_err(|_| invalid())
            }
            (Self::Text(s), DataType::Boolean) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "t" | "1" => Ok(Self::Boolean(true)),
                "false" | "f" | "0" => Ok(Self::Boolean(false)),
                _ => Err(invalid()),
            },
            (Self::Text(s), DataType::Date) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map(Self::Date)
                .map_err(|_| invalid()),
            (Self::Text(s), DataType::Blob) => Ok(Self::Blob(s.as_bytes().to_vec())),
            _ => Err(invalid()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => float_key(*a) == float_key(*b),
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Blob(a), Self::Blob(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Boolean(b) => b.hash(state),
            Self::Integer(i) => i.hash(state),
            Self::Float(f) => float_key(*f).hash(state),
            Self::Text(s) => s.hash(state),
            Self::Date(d) => d.hash(state),
            Self::Blob(b) => b.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Blob(b) => {
                for byte in b {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}
