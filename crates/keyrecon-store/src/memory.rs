//! In-memory implementations of the store traits.
//!
//! [`MemoryStore`] is a thin owner of a `HashMap`. The traits are also
//! implemented directly for `HashMap` and `BTreeMap`, so plain maps can take
//! part in a reconciliation without wrapping.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{Result, StoreError};
use crate::traits::{ReadStore, Store};

/// In-memory store.
///
/// All data is lost when the store is dropped.
#[derive(Debug, Clone)]
pub struct MemoryStore<K, V> {
    entries: HashMap<K, V>,
}

impl<K: Eq + Hash, V> MemoryStore<K, V> {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Borrow the underlying map.
    pub fn entries(&self) -> &HashMap<K, V> {
        &self.entries
    }

    /// Take the underlying map.
    pub fn into_inner(self) -> HashMap<K, V> {
        self.entries
    }
}

impl<K: Eq + Hash, V> Default for MemoryStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V: PartialEq> PartialEq for MemoryStore<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Eq + Hash, V: Eq> Eq for MemoryStore<K, V> {}

impl<K: Eq + Hash, V> From<HashMap<K, V>> for MemoryStore<K, V> {
    fn from(entries: HashMap<K, V>) -> Self {
        Self { entries }
    }
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for MemoryStore<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<K, V> ReadStore for MemoryStore<K, V>
where
    K: Clone + Eq + Hash + Debug,
    V: Clone,
{
    type Key = K;
    type Value = V;

    fn keys(&self) -> Result<Vec<K>> {
        ReadStore::keys(&self.entries)
    }

    fn contains(&self, key: &K) -> Result<bool> {
        self.entries.contains(key)
    }

    fn read(&self, key: &K) -> Result<V> {
        self.entries.read(key)
    }
}

impl<K, V> Store for MemoryStore<K, V>
where
    K: Clone + Eq + Hash + Debug,
    V: Clone,
{
    fn write(&mut self, key: &K, value: V) -> Result<()> {
        self.entries.write(key, value)
    }

    fn delete(&mut self, key: &K) -> Result<()> {
        self.entries.delete(key)
    }
}

impl<K, V> ReadStore for HashMap<K, V>
where
    K: Clone + Eq + Hash + Debug,
    V: Clone,
{
    type Key = K;
    type Value = V;

    fn keys(&self) -> Result<Vec<K>> {
        Ok(HashMap::keys(self).cloned().collect())
    }

    fn contains(&self, key: &K) -> Result<bool> {
        Ok(self.contains_key(key))
    }

    fn read(&self, key: &K) -> Result<V> {
        self.get(key)
            .cloned()
            .ok_or_else(|| StoreError::not_found(key))
    }

    fn len(&self) -> Result<usize> {
        Ok(HashMap::len(self))
    }
}

impl<K, V> Store for HashMap<K, V>
where
    K: Clone + Eq + Hash + Debug,
    V: Clone,
{
    fn write(&mut self, key: &K, value: V) -> Result<()> {
        self.insert(key.clone(), value);
        Ok(())
    }

    fn delete(&mut self, key: &K) -> Result<()> {
        self.remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(key))
    }
}

impl<K, V> ReadStore for BTreeMap<K, V>
where
    K: Clone + Ord + Hash + Debug,
    V: Clone,
{
    type Key = K;
    type Value = V;

    fn keys(&self) -> Result<Vec<K>> {
        Ok(BTreeMap::keys(self).cloned().collect())
    }

    fn contains(&self, key: &K) -> Result<bool> {
        Ok(self.contains_key(key))
    }

    fn read(&self, key: &K) -> Result<V> {
        self.get(key)
            .cloned()
            .ok_or_else(|| StoreError::not_found(key))
    }

    fn len(&self) -> Result<usize> {
        Ok(BTreeMap::len(self))
    }
}

impl<K, V> Store for BTreeMap<K, V>
where
    K: Clone + Ord + Hash + Debug,
    V: Clone,
{
    fn write(&mut self, key: &K, value: V) -> Result<()> {
        self.insert(key.clone(), value);
        Ok(())
    }

    fn delete(&mut self, key: &K) -> Result<()> {
        self.remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_memory_store_basic() {
        let mut store: MemoryStore<String, i32> = MemoryStore::new();
        let key = "a".to_string();

        store.write(&key, 1).unwrap();
        assert!(store.contains(&key).unwrap());
        assert_eq!(store.read(&key).unwrap(), 1);

        // Overwrite
        store.write(&key, 2).unwrap();
        assert_eq!(store.read(&key).unwrap(), 2);
        assert_eq!(store.len().unwrap(), 1);

        store.delete(&key).unwrap();
        assert!(!store.contains(&key).unwrap());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_absent_key_is_not_found() {
        let mut store: MemoryStore<&str, i32> = [("a", 1)].into_iter().collect();

        assert!(store.read(&"b").unwrap_err().is_not_found());
        assert!(store.delete(&"b").unwrap_err().is_not_found());
        assert_eq!(store.get(&"b").unwrap(), None);
        assert_eq!(store.get(&"a").unwrap(), Some(1));
    }

    #[test]
    fn test_stores_compare_by_contents() {
        let a: MemoryStore<&str, i32> = [("x", 1), ("y", 2)].into_iter().collect();
        let mut b: MemoryStore<&str, i32> = [("y", 2), ("x", 1)].into_iter().collect();
        assert_eq!(a, b);

        b.write(&"x", 5).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_btree_map_store() {
        let mut store: BTreeMap<u32, &str> = BTreeMap::new();
        store.write(&2, "two").unwrap();
        store.write(&1, "one").unwrap();

        assert_eq!(ReadStore::keys(&store).unwrap(), vec![1, 2]);
        store.delete(&1).unwrap();
        assert!(store.delete(&1).is_err());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Write(u8, u8),
        Delete(u8),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (any::<u8>(), any::<u8>()).prop_map(|(k, v)| Op::Write(k % 16, v)),
            any::<u8>().prop_map(|k| Op::Delete(k % 16)),
        ]
    }

    proptest! {
        #[test]
        fn test_keys_track_writes_and_deletes(ops in prop::collection::vec(op(), 0..64)) {
            let mut store: MemoryStore<u8, u8> = MemoryStore::new();
            let mut model: HashSet<u8> = HashSet::new();

            for op in ops {
                match op {
                    Op::Write(k, v) => {
                        store.write(&k, v).unwrap();
                        model.insert(k);
                    }
                    Op::Delete(k) => {
                        let result = store.delete(&k);
                        prop_assert_eq!(result.is_ok(), model.remove(&k));
                    }
                }
            }

            let keys: Vec<u8> = ReadStore::keys(&store).unwrap();
            prop_assert_eq!(keys.len(), model.len());
            prop_assert_eq!(keys.into_iter().collect::<HashSet<_>>(), model);
        }
    }
}
