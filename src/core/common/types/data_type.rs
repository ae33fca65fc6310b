use std::fmt;

/// Logical type of a column or expression result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum DataType {
    Null,
    Boolean,
    Integer,
    Float,
    Text,
    Date,
    Blob,
}

impl DataType {
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    /// Whether values of the two types can be ordered against each other
    /// without a cast. `Null` is comparable with everything.
    #[must_use]
    pub fn is_comparable_with(self, other: Self) -> bool {
        self == other
            || self == Self::Null
            || other == Self::Null
            || (self.is_numeric() && other.is_numeric())
    }

    /// Result type of an arithmetic operation over the two operand types.
    #[must_use]
    pub const fn numeric_result(self, other: Self) -> Self {
        match (self, other) {
            (Self::Integer, Self::Integer) => Self::Integer,
            (Self::Null, Self::Integer) | (Self::Integer, Self::Null) => Self::Integer,
            _ => Self::Float,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "Null",
            Self::Boolean => "Boolean",
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::Text => "Text",
            Self::Date => "Date",
            Self::Blob => "Blob",
        };
        f.write_str(name)
    }
}
