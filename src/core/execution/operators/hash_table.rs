use crate::core::common::types::{Tuple, Value};
use crate::core::common::{EvaluationError, OxiexecError};
use crate::core::execution::ExecutionOperator;
use std::collections::HashMap;
use tracing::debug;

/// Build side of a hash join: right tuples grouped by their key values.
///
/// Buckets are addressed by index so a probe can remember its position in a
/// bucket across pulls without holding a borrow of the table.
#[derive(Debug, Default)]
pub struct JoinHashTable {
    index: HashMap<Tuple, usize>,
    buckets: Vec<Vec<Tuple>>,
    num_rows: usize,
}

impl JoinHashTable {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { index: HashMap::with_capacity(capacity), buckets: Vec::with_capacity(capacity), num_rows: 0 }
    }

    fn insert(&mut self, key: &[Value], tuple: Tuple) {
        let slot = match self.index.get(key) {
            Some(slot) => *slot,
            None => {
                self.index.insert(key.to_vec(), self.buckets.len());
                self.buckets.push(Vec::new());
                self.buckets.len() - 1
            }
        };
        self.buckets[slot].push(tuple);
        self.num_rows += 1;
    }

    /// Bucket index of `key`.
    pub fn find(&self, key: &[Value]) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn bucket(&self, slot: usize) -> &[Tuple] {
        self.buckets.get(slot).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }
}

/// Copies the values at `key_ids` out of `tuple` into `key`.
pub(crate) fn project_key(tuple: &[Value], key_ids: &[usize], key: &mut Tuple) -> Result<(), EvaluationError> {
    key.clear();
    for &column_id in key_ids {
        let value = tuple
            .get(column_id)
            .ok_or_else(|| EvaluationError::ColumnOutOfBounds { column_id, width: tuple.len() })?;
        key.push(value.clone());
    }
    Ok(())
}

/// Owns the build phase of a hash join and the table it produces.
///
/// The table is built at most once and released at most once; both are
/// observable for callers that need to check it.
#[derive(Debug)]
pub struct HashTableLoader {
    key_ids: Vec<usize>,
    capacity: usize,
    table: Option<JoinHashTable>,
    loads: usize,
    releases: usize,
}

impl HashTableLoader {
    /// `key_ids` are column ids of the build-side tuples.
    pub fn new(key_ids: Vec<usize>, capacity: usize) -> Self {
        Self { key_ids, capacity, table: None, loads: 0, releases: 0 }
    }

    pub fn key_ids(&self) -> &[usize] {
        &self.key_ids
    }

    /// Drains `input` into a fresh table. Tuples whose key contains a null
    /// are left out, since they can never match.
    pub fn load_table(&mut self, input: &mut dyn ExecutionOperator) -> Result<&JoinHashTable, OxiexecError> {
        let mut table = JoinHashTable::with_capacity(self.capacity);
        let mut key = Tuple::with_capacity(self.key_ids.len());
        let mut skipped = 0usize;
        while let Some(tuple) = input.next()? {
            project_key(tuple, &self.key_ids, &mut key)?;
            if key.iter().any(Value::is_null) {
                skipped += 1;
                continue;
            }
            table.insert(&key, tuple.clone());
        }
        debug!(rows = table.num_rows(), keys = table.len(), null_keys = skipped, "join hash table built");
        self.loads += 1;
        Ok(&*self.table.insert(table))
    }

    pub fn is_hash_table_loaded(&self) -> bool {
        self.table.is_some()
    }

    pub fn table(&self) -> Option<&JoinHashTable> {
        self.table.as_ref()
    }

    /// Drops the table. Returns whether there was anything to release.
    pub fn release(&mut self) -> bool {
        match self.table.take() {
            Some(table) => {
                debug!(rows = table.num_rows(), "join hash table released");
                self.releases += 1;
                true
            }
            None => false,
        }
    }

    pub fn load_count(&self) -> usize {
        self.loads
    }

    pub fn release_count(&self) -> usize {
        self.releases
    }
}
