//! Multi-key tuple ordering.

use crate::core::common::error::OxiexecError;
use crate::core::common::types::{Schema, TupleView, Value};
use std::cmp::Ordering;

/// A sort key as requested by a plan, still naming its column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub name: String,
    pub ascending: bool,
    /// `None` falls back to [`ExecConfig::nulls_first`](crate::core::config::ExecConfig).
    pub nulls_first: Option<bool>,
}

impl SortSpec {
    pub fn asc(name: impl Into<String>) -> Self {
        Self { name: name.into(), ascending: true, nulls_first: None }
    }

    pub fn desc(name: impl Into<String>) -> Self {
        Self { name: name.into(), ascending: false, nulls_first: None }
    }

    #[must_use]
    pub fn with_nulls_first(mut self, nulls_first: bool) -> Self {
        self.nulls_first = Some(nulls_first);
        self
    }
}

/// A sort key resolved to a column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column_id: usize,
    pub ascending: bool,
    pub nulls_first: bool,
}

/// Lexicographic comparison over a fixed list of sort keys.
///
/// Keys are compared in order and comparison stops at the first key that
/// tells the tuples apart. Null placement follows `nulls_first` regardless of
/// the key's direction.
#[derive(Debug, Clone)]
pub struct TupleComparator {
    keys: Vec<SortKey>,
}

static NULL: Value = Value::Null;

impl TupleComparator {
    pub fn new(schema: &Schema, specs: &[SortSpec], default_nulls_first: bool) -> Result<Self, OxiexecError> {
        if specs.is_empty() {
            return Err(OxiexecError::InvalidExpression("sort needs at least one key".to_string()));
        }
        let keys = specs
            .iter()
            .map(|spec| {
                Ok(SortKey {
                    column_id: schema.column_id(&spec.name)?,
                    ascending: spec.ascending,
                    nulls_first: spec.nulls_first.unwrap_or(default_nulls_first),
                })
            })
            .collect::<Result<Vec<_>, OxiexecError>>()?;
        Ok(Self { keys })
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn compare<A, B>(&self, a: &A, b: &B) -> Ordering
    where
        A: TupleView + ?Sized,
        B: TupleView + ?Sized,
    {
        for key in &self.keys {
            let left = a.value(key.column_id).unwrap_or(&NULL);
            let right = b.value(key.column_id).unwrap_or(&NULL);
            let ord = match (left.is_null(), right.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) if key.nulls_first => Ordering::Less,
                (true, false) => Ordering::Greater,
                (false, true) if key.nulls_first => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) if key.ascending => left.compare(right),
                (false, false) => left.compare(right).reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::common::types::{ColumnDef, DataType};
    use std::cell::Cell;

    fn schema() -> Schema {
        Schema::new(vec![
            ColumnDef::new("dept", DataType::Text, true),
            ColumnDef::new("salary", DataType::Integer, true),
            ColumnDef::new("name", DataType::Text, false),
        ])
    }

    fn row(dept: Option<&str>, salary: Option<i64>, name: &str) -> Vec<Value> {
        vec![dept.map_or(Value::Null, Value::from), salary.map_or(Value::Null, Value::from), name.into()]
    }

    /// Counts how many fields a comparison reads.
    struct CountingTuple<'a> {
        values: &'a [Value],
        reads: &'a Cell<usize>,
    }

    impl TupleView for CountingTuple<'_> {
        fn width(&self) -> usize {
            self.values.len()
        }

        fn value(&self, idx: usize) -> Option<&Value> {
            self.reads.set(self.reads.get() + 1);
            self.values.get(idx)
        }
    }

    #[test]
    fn test_lexicographic_with_direction() {
        let cmp = TupleComparator::new(
            &schema(),
            &[SortSpec::asc("dept"), SortSpec::desc("salary")],
            false,
        )
        .unwrap();
        let a = row(Some("eng"), Some(100), "a");
        let b = row(Some("eng"), Some(200), "b");
        let c = row(Some("ops"), Some(50), "c");

        assert_eq!(cmp.compare(&a, &b), Ordering::Greater);
        assert_eq!(cmp.compare(&b, &c), Ordering::Less);
        assert_eq!(cmp.compare(&a, &a.clone()), Ordering::Equal);
    }

    #[test]
    fn test_null_placement_ignores_direction() {
        let s = schema();
        let with_null = row(None, Some(1), "n");
        let with_value = row(Some("eng"), Some(1), "v");

        for spec in [SortSpec::asc("dept"), SortSpec::desc("dept")] {
            let last = TupleComparator::new(&s, &[spec.clone()], false).unwrap();
            assert_eq!(last.compare(&with_null, &with_value), Ordering::Greater);

            let first = TupleComparator::new(&s, &[spec.with_nulls_first(true)], false).unwrap();
            assert_eq!(first.compare(&with_null, &with_value), Ordering::Less);
        }
    }

    #[test]
    fn test_stops_at_first_distinguishing_key() {
        let cmp = TupleComparator::new(
            &schema(),
            &[SortSpec::asc("dept"), SortSpec::asc("salary"), SortSpec::asc("name")],
            false,
        )
        .unwrap();
        let reads = Cell::new(0);
        let a = row(Some("eng"), Some(1), "x");
        let b = row(Some("ops"), Some(1), "x");

        let ord = cmp.compare(
            &CountingTuple { values: &a, reads: &reads },
            &CountingTuple { values: &b, reads: &reads },
        );
        assert_eq!(ord, Ordering::Less);
        assert_eq!(reads.get(), 2);

        reads.set(0);
        let c = row(Some("eng"), Some(2), "x");
        cmp.compare(&CountingTuple { values: &a, reads: &reads }, &CountingTuple { values: &c, reads: &reads });
        assert_eq!(reads.get(), 4);
    }

    #[test]
    fn test_unknown_sort_column_is_rejected() {
        let err = TupleComparator::new(&schema(), &[SortSpec::asc("missing")], false).unwrap_err();
        assert!(matches!(err, OxiexecError::ColumnNotFound(ref name) if name == "missing"));
        assert!(TupleComparator::new(&schema(), &[], false).is_err());
    }
}
