use alloc::vec::Vec;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::error::CursorError;
use crate::hash_map::HashMap;

/// A view of a map's entries, backed by a cached snapshot.
///
/// The view holds the map mutably for as long as it lives, so the only way to
/// change the map meanwhile is through the view itself. Size and membership
/// queries always go to the live map. Iteration walks a copy of the entries in
/// slot order, refreshed whenever the map has changed since the last copy.
pub struct EntryView<'a, K, V, S> {
    map: &'a mut HashMap<K, V, S>,
    snapshot: Vec<(K, V)>,
    materialized: bool,
}

impl<'a, K, V, S> EntryView<'a, K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    pub(crate) fn new(map: &'a mut HashMap<K, V, S>) -> Self {
        Self {
            map,
            snapshot: Vec::new(),
            materialized: false,
        }
    }

    fn refresh(&mut self) {
        if !self.map.take_dirty() && self.materialized {
            return;
        }

        self.snapshot.clear();
        self.snapshot
            .extend(self.map.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.materialized = true;
        debug_assert_eq!(self.snapshot.len(), self.map.len());
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns `true` if the map holds `key` associated with `value`.
    pub fn contains(&self, key: &K, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.map.get(key) == Some(value)
    }

    /// Iterates over a snapshot of the entries in slot order.
    pub fn iter(&mut self) -> Iter<'_, K, V> {
        self.refresh();
        Iter {
            inner: self.snapshot.iter(),
        }
    }

    /// Returns a cursor over a snapshot of the entries.
    ///
    /// The cursor keeps walking its own copy even as it removes entries from
    /// the map, so removals and the resizes they trigger never disturb it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use lin_hash::CursorError;
    /// use lin_hash::HashMap;
    ///
    /// let mut map: HashMap<u64, &str> = HashMap::new();
    /// map.insert(1, "one");
    ///
    /// let mut entries = map.entries();
    /// let mut cursor = entries.cursor();
    /// assert_eq!(cursor.remove(), Err(CursorError::NotPositioned));
    ///
    /// let entry = cursor.next().unwrap();
    /// assert_eq!(entry.key(), &1);
    /// assert_eq!(cursor.remove(), Ok("one"));
    /// assert!(!cursor.has_next());
    /// assert!(entries.is_empty());
    /// # }
    /// ```
    pub fn cursor(&mut self) -> Cursor<'_, K, V, S> {
        self.refresh();
        Cursor {
            entries: self.snapshot.clone().into_iter(),
            map: &mut *self.map,
            current: None,
        }
    }

    /// Returns a view of the keys.
    pub fn keys(&mut self) -> KeyView<'_, K, V, S> {
        self.refresh();
        KeyView {
            map: &*self.map,
            snapshot: &self.snapshot,
        }
    }

    /// Returns a view of the values.
    pub fn values(&mut self) -> ValueView<'_, K, V, S> {
        self.refresh();
        ValueView {
            map: &*self.map,
            snapshot: &self.snapshot,
        }
    }

    /// Removes every entry from the map.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

/// An owned copy of one entry, yielded by a [`Cursor`].
///
/// Changing the value here does not touch the map; use
/// [`Cursor::set_value`] for that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry<K, V> {
    key: K,
    value: V,
}

impl<K, V> SnapshotEntry<K, V> {
    /// Returns the key.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns the value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Replaces the copied value and returns the old one.
    pub fn set_value(&mut self, value: V) -> V {
        core::mem::replace(&mut self.value, value)
    }

    /// Splits the entry into its key and value.
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// A cursor over a snapshot of a map's entries.
///
/// Obtained from [`EntryView::cursor`]. Besides iterating, it can remove the
/// entry it last yielded from the map, or overwrite that entry's value.
pub struct Cursor<'v, K, V, S> {
    map: &'v mut HashMap<K, V, S>,
    entries: alloc::vec::IntoIter<(K, V)>,
    current: Option<K>,
}

impl<K, V, S> Cursor<'_, K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    /// Returns `true` if the snapshot has entries left.
    pub fn has_next(&self) -> bool {
        self.entries.len() > 0
    }

    /// Removes the entry last yielded by [`next`](Iterator::next) from the
    /// map and returns its value.
    ///
    /// Returns [`CursorError::NotPositioned`] before the first `next` or when
    /// called twice for the same entry.
    pub fn remove(&mut self) -> Result<V, CursorError> {
        let key = self.current.take().ok_or(CursorError::NotPositioned)?;
        self.map.remove(&key).ok_or(CursorError::Inconsistent)
    }

    /// Replaces the map's value for the entry last yielded and returns the
    /// value it held.
    pub fn set_value(&mut self, value: V) -> Result<V, CursorError> {
        let key = self.current.as_ref().ok_or(CursorError::NotPositioned)?;
        let slot = self.map.get_mut(key).ok_or(CursorError::Inconsistent)?;
        Ok(core::mem::replace(slot, value))
    }
}

impl<K, V, S> Iterator for Cursor<'_, K, V, S>
where
    K: Clone,
{
    type Item = SnapshotEntry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value) = self.entries.next()?;
        self.current = Some(key.clone());
        Some(SnapshotEntry { key, value })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

/// An iterator over an [`EntryView`] snapshot.
pub struct Iter<'v, K, V> {
    inner: core::slice::Iter<'v, (K, V)>,
}

impl<'v, K, V> Iterator for Iter<'v, K, V> {
    type Item = (&'v K, &'v V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// The keys of an [`EntryView`].
pub struct KeyView<'v, K, V, S> {
    map: &'v HashMap<K, V, S>,
    snapshot: &'v [(K, V)],
}

impl<'v, K, V, S> KeyView<'v, K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Iterates over the snapshot's keys.
    pub fn iter(&self) -> impl Iterator<Item = &'v K> + use<'v, K, V, S> {
        self.snapshot.iter().map(|(k, _)| k)
    }
}

/// The values of an [`EntryView`].
pub struct ValueView<'v, K, V, S> {
    map: &'v HashMap<K, V, S>,
    snapshot: &'v [(K, V)],
}

impl<'v, K, V, S> ValueView<'v, K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Returns the number of values.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if there are no values.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns `true` if any key maps to `value`.
    pub fn contains(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.map.contains_value(value)
    }

    /// Iterates over the snapshot's values.
    pub fn iter(&self) -> impl Iterator<Item = &'v V> + use<'v, K, V, S> {
        self.snapshot.iter().map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k1: rng.try_next_u64().unwrap_or(0),
                k2: rng.try_next_u64().unwrap_or(0),
            }
        }
    }

    fn filled(n: u64) -> HashMap<u64, u64, SipHashBuilder> {
        (0..n).map(|k| (k, k * 7)).collect()
    }

    #[test]
    fn len_follows_live_map() {
        let mut map = filled(10);
        let mut view = map.entries();
        assert_eq!(view.len(), 10);
        assert!(!view.is_empty());

        let mut cursor = view.cursor();
        cursor.next();
        cursor.remove().unwrap();
        drop(cursor);

        assert_eq!(view.len(), 9);
        assert_eq!(view.iter().len(), 9);
    }

    #[test]
    fn iter_yields_every_entry_once() {
        let mut map = filled(40);
        let mut view = map.entries();

        let seen: BTreeMap<u64, u64> = view.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(seen.len(), 40);
        for k in 0..40 {
            assert_eq!(seen.get(&k), Some(&(k * 7)));
        }
    }

    #[test]
    fn iter_matches_slot_order() {
        let mut map = filled(25);
        let expected: Vec<u64> = map.keys().copied().collect();

        let mut view = map.entries();
        let keys: Vec<u64> = view.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn contains_checks_key_and_value() {
        let mut map = filled(5);
        let view = map.entries();
        assert!(view.contains(&3, &21));
        assert!(!view.contains(&3, &22));
        assert!(!view.contains(&9, &63));
    }

    #[test]
    fn cursor_removing_everything_empties_the_map() {
        let mut map = filled(100);
        let mut view = map.entries();

        let mut cursor = view.cursor();
        let mut removed = Vec::new();
        while cursor.has_next() {
            let entry = cursor.next().unwrap();
            assert_eq!(cursor.remove(), Ok(*entry.value()));
            removed.push(*entry.key());
        }
        assert_eq!(cursor.next(), None);
        drop(cursor);

        assert_eq!(removed.len(), 100);
        assert!(view.is_empty());
        assert_eq!(view.iter().count(), 0);
        drop(view);

        assert!(map.is_empty());
        assert_eq!(map.capacity(), 13);
        for k in 0..100 {
            assert!(!map.contains_key(&k));
        }
    }

    #[test]
    fn cursor_walks_whole_snapshot_through_shrinks() {
        let mut map = filled(200);
        let capacity = map.capacity();
        let mut view = map.entries();

        let mut cursor = view.cursor();
        let mut yielded = 0;
        while let Some(entry) = cursor.next() {
            yielded += 1;
            if entry.key() % 4 != 0 {
                cursor.remove().unwrap();
            }
        }
        drop(cursor);

        assert_eq!(yielded, 200);
        assert_eq!(view.len(), 50);
        drop(view);

        assert!(map.capacity() < capacity);
        for k in 0..200 {
            assert_eq!(map.contains_key(&k), k % 4 == 0);
        }
    }

    #[test]
    fn remove_requires_a_current_entry() {
        let mut map = filled(3);
        let mut view = map.entries();
        let mut cursor = view.cursor();

        assert_eq!(cursor.remove(), Err(CursorError::NotPositioned));
        assert_eq!(cursor.set_value(1), Err(CursorError::NotPositioned));

        cursor.next();
        assert!(cursor.remove().is_ok());
        assert_eq!(cursor.remove(), Err(CursorError::NotPositioned));
        drop(cursor);

        assert_eq!(view.len(), 2);
    }

    #[test]
    fn set_value_writes_through() {
        let mut map = filled(8);
        let mut view = map.entries();

        let mut cursor = view.cursor();
        while let Some(mut entry) = cursor.next() {
            let old = *entry.value();
            assert_eq!(cursor.set_value(old + 1), Ok(old));
            // Only the map changes through the cursor.
            entry.set_value(0);
        }
        drop(cursor);

        let values: BTreeMap<u64, u64> = view.iter().map(|(k, v)| (*k, *v)).collect();
        for k in 0..8 {
            assert_eq!(values[&k], k * 7 + 1);
        }
    }

    /// Value that counts how often it is cloned.
    struct Tracked {
        id: u64,
        clones: Rc<Cell<usize>>,
    }

    impl Clone for Tracked {
        fn clone(&self) -> Self {
            self.clones.set(self.clones.get() + 1);
            Self {
                id: self.id,
                clones: Rc::clone(&self.clones),
            }
        }
    }

    #[test]
    fn snapshot_is_reused_until_the_map_changes() {
        let clones = Rc::new(Cell::new(0));
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        for id in 0..5u64 {
            let value = Tracked {
                id,
                clones: Rc::clone(&clones),
            };
            map.insert(id, value);
        }
        let mut view = map.entries();

        assert_eq!(view.iter().count(), 5);
        assert_eq!(clones.get(), 5);
        assert!(!view.map.take_dirty());

        // Nothing changed, so walking again copies nothing.
        assert_eq!(view.iter().count(), 5);
        assert_eq!(view.keys().iter().count(), 5);
        assert_eq!(view.values().iter().count(), 5);
        assert_eq!(clones.get(), 5);

        // The cursor works on its own copy of the cached snapshot.
        let mut cursor = view.cursor();
        assert_eq!(clones.get(), 10);
        let entry = cursor.next().unwrap();
        let replaced = cursor
            .set_value(Tracked {
                id: entry.value().id + 100,
                clones: Rc::clone(&clones),
            })
            .unwrap();
        assert_eq!(replaced.id, entry.value().id);
        drop(cursor);

        // The write through the cursor marks the snapshot stale.
        let ids: BTreeMap<u64, u64> = view.iter().map(|(k, v)| (*k, v.id)).collect();
        assert_eq!(clones.get(), 15);
        assert_eq!(ids[entry.key()], entry.key() + 100);
    }

    #[test]
    fn snapshot_entry_accessors() {
        let mut entry = SnapshotEntry {
            key: "k",
            value: 1,
        };
        assert_eq!(entry.key(), &"k");
        assert_eq!(entry.set_value(2), 1);
        assert_eq!(entry.value(), &2);
        assert_eq!(entry.into_parts(), ("k", 2));
    }

    #[test]
    fn key_and_value_views_delegate_to_map() {
        let mut map = filled(6);
        let mut view = map.entries();

        let keys = view.keys();
        assert_eq!(keys.len(), 6);
        assert!(keys.contains(&5));
        assert!(!keys.contains(&6));
        let mut listed: Vec<u64> = keys.iter().copied().collect();
        listed.sort_unstable();
        assert_eq!(listed, [0, 1, 2, 3, 4, 5]);

        let values = view.values();
        assert!(values.contains(&35));
        assert!(!values.contains(&36));
        assert_eq!(values.iter().count(), 6);
    }

    #[test]
    fn clear_empties_the_map() {
        let mut map = filled(30);
        let mut view = map.entries();
        view.clear();
        assert!(view.is_empty());
        assert_eq!(view.iter().count(), 0);
        assert!(!view.keys().contains(&1));
    }
}
