use super::data_type::DataType;
use crate::core::common::error::OxiexecError;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    pub is_nullable: bool,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: DataType, is_nullable: bool) -> Self {
        Self { name: name.into(), data_type, is_nullable }
    }
}

/// Ordered column list describing the shape of a tuple.
///
/// Names are resolved to positions once, when an operator or expression is
/// built. Nothing on the per-tuple path looks a column up by name.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Schema {
    pub columns: Vec<ColumnDef>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        Self { columns }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[inline]
    pub fn column(&self, id: usize) -> Option<&ColumnDef> {
        self.columns.get(id)
    }

    /// First column with the given name, if any.
    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.name == name)
    }

    /// Resolves `name` to a column id, rejecting unknown and ambiguous names.
    pub fn column_id(&self, name: &str) -> Result<usize, OxiexecError> {
        let mut matches = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, col)| col.name == name)
            .map(|(idx, _)| idx);
        let first = matches.next().ok_or_else(|| OxiexecError::ColumnNotFound(name.to_string()))?;
        if matches.next().is_some() {
            return Err(OxiexecError::AmbiguousColumn(name.to_string()));
        }
        Ok(first)
    }

    /// Concatenates `left` and `right` end to end, the shape of a join input.
    #[must_use]
    pub fn merge(left: &Self, right: &Self) -> Self {
        let mut columns = Vec::with_capacity(left.len() + right.len());
        columns.extend(left.columns.iter().cloned());
        columns.extend(right.columns.iter().cloned());
        Self { columns }
    }
}
