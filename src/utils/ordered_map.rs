// insertion-ordered map shared between readers

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Error as _, Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug)]
struct Inner<K, V> {
    values: HashMap<K, V>,
    keys: Vec<K>,
}

/// map that remembers the order in which keys were first inserted
///
/// values live in a hash table, the key order in a separate list; both sit
/// behind one reader-writer lock so a finished document can be inspected from
/// several threads. iteration and serialization always walk the key list.
pub struct OrderedMap<K, V> {
    inner: RwLock<Inner<K, V>>,
}

impl<K, V> OrderedMap<K, V>
where
    K: Eq + Hash + Clone,
{
    /// create an empty map
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                values: HashMap::new(),
                keys: Vec::new(),
            }),
        }
    }

    /// build a map from pairs, in iteration order
    ///
    /// a repeated key updates the value but keeps its first position
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let map = Self::new();
        {
            let mut inner = map.write();
            for (key, value) in entries {
                Self::insert_locked(&mut inner, key, value);
            }
        }
        map
    }

    // a panic while holding the lock cannot leave keys and values out of step,
    // every mutation below touches both before returning
    fn read(&self) -> RwLockReadGuard<'_, Inner<K, V>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner<K, V>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert_locked(inner: &mut Inner<K, V>, key: K, value: V) {
        if inner.values.insert(key.clone(), value).is_none() {
            inner.keys.push(key);
        }
    }

    /// insert or update a value
    ///
    /// updating an existing key keeps its original position
    pub fn set(&self, key: K, value: V) {
        let mut inner = self.write();
        Self::insert_locked(&mut inner, key, value);
    }

    /// remove a key, returning its value if it was present
    pub fn del(&self, key: &K) -> Option<V> {
        let mut inner = self.write();
        let removed = inner.values.remove(key)?;
        inner.keys.retain(|k| k != key);
        Some(removed)
    }

    pub fn has(&self, key: &K) -> bool {
        self.read().values.contains_key(key)
    }

    /// keys in first-insertion order
    pub fn keys(&self) -> Vec<K> {
        self.read().keys.clone()
    }

    pub fn len(&self) -> usize {
        self.read().keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().keys.is_empty()
    }

    /// modify the value stored under `key` in place, inserting `V::default()`
    /// first when the key is missing
    pub fn update<F>(&self, key: K, f: F)
    where
        V: Default,
        F: FnOnce(&mut V),
    {
        let mut inner = self.write();
        if !inner.values.contains_key(&key) {
            Self::insert_locked(&mut inner, key.clone(), V::default());
        }
        if let Some(value) = inner.values.get_mut(&key) {
            f(value);
        }
    }
}

impl<K, V> OrderedMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn get(&self, key: &K) -> Option<V> {
        self.read().values.get(key).cloned()
    }

    /// snapshot of all pairs in insertion order
    pub fn entries(&self) -> Vec<(K, V)> {
        let inner = self.read();
        inner
            .keys
            .iter()
            .map(|key| {
                let value = inner
                    .values
                    .get(key)
                    .expect("ordered map key list out of sync with values");
                (key.clone(), value.clone())
            })
            .collect()
    }

    /// snapshot of all values in insertion order
    pub fn values(&self) -> Vec<V> {
        self.entries().into_iter().map(|(_, v)| v).collect()
    }
}

impl<K, V> Default for OrderedMap<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for OrderedMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        let inner = self.read();
        Self {
            inner: RwLock::new(Inner {
                values: inner.values.clone(),
                keys: inner.keys.clone(),
            }),
        }
    }
}

impl<K, V> fmt::Debug for OrderedMap<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.read();
        f.debug_map()
            .entries(
                inner
                    .keys
                    .iter()
                    .filter_map(|k| inner.values.get(k).map(|v| (k, v))),
            )
            .finish()
    }
}

impl<K, V> PartialEq for OrderedMap<K, V>
where
    K: Eq + Hash + Clone,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        let a = self.read();
        let b = other.read();
        a.keys == b.keys && a.values == b.values
    }
}

impl<K, V> Serialize for OrderedMap<K, V>
where
    K: Eq + Hash + Clone + Serialize,
    V: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let inner = self.read();
        let mut map = serializer.serialize_map(Some(inner.keys.len()))?;
        for key in &inner.keys {
            let value = inner
                .values
                .get(key)
                .ok_or_else(|| S::Error::custom("ordered map key without value"))?;
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct OrderedMapVisitor<K, V> {
    marker: PhantomData<fn() -> OrderedMap<K, V>>,
}

impl<'de, K, V> Visitor<'de> for OrderedMapVisitor<K, V>
where
    K: Eq + Hash + Clone + Deserialize<'de>,
    V: Deserialize<'de>,
{
    type Value = OrderedMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
        let map = OrderedMap::new();
        {
            let mut inner = map.write();
            while let Some((key, value)) = access.next_entry()? {
                OrderedMap::insert_locked(&mut inner, key, value);
            }
        }
        Ok(map)
    }
}

impl<'de, K, V> Deserialize<'de> for OrderedMap<K, V>
where
    K: Eq + Hash + Clone + Deserialize<'de>,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor {
            marker: PhantomData,
        })
    }
}
