use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::error::PolicyError;

/// Smallest number of slots a table ever allocates.
///
/// Requested capacities below this are rounded up, and a table never shrinks
/// below the capacity it was created with.
pub const MIN_CAPACITY: usize = 13;

/// Grow and shrink thresholds for a [`HashTable`].
///
/// The table doubles its slot count before an insertion when `len() >=
/// capacity * max_load_percent / 100`, and halves it after a removal when
/// `len() == capacity / shrink_divisor`.
///
/// # Examples
///
/// ```rust
/// use lin_hash::hash_table::ResizePolicy;
///
/// let policy = ResizePolicy::new(75, 4).unwrap();
/// assert_eq!(policy.max_load_percent(), 75);
///
/// // A 95% load would leave no empty slot for probes to stop at.
/// assert!(ResizePolicy::new(95, 8).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizePolicy {
    max_load_percent: usize,
    shrink_divisor: usize,
}

impl ResizePolicy {
    /// Grow at half full, shrink at one eighth full.
    pub const DEFAULT: ResizePolicy = ResizePolicy {
        max_load_percent: 50,
        shrink_divisor: 8,
    };

    /// Creates a policy, rejecting thresholds that could fill the table or
    /// make a freshly shrunk table immediately eligible to grow again.
    pub fn new(max_load_percent: usize, shrink_divisor: usize) -> Result<Self, PolicyError> {
        if !(1..=90).contains(&max_load_percent) {
            return Err(PolicyError::LoadOutOfRange(max_load_percent));
        }
        if shrink_divisor < 3 || shrink_divisor.saturating_mul(max_load_percent) <= 200 {
            return Err(PolicyError::ShrinkTooEager {
                shrink_divisor,
                max_load_percent,
            });
        }

        Ok(Self {
            max_load_percent,
            shrink_divisor,
        })
    }

    /// The occupancy percentage at which the table grows.
    pub fn max_load_percent(&self) -> usize {
        self.max_load_percent
    }

    /// The fraction denominator at which the table shrinks.
    pub fn shrink_divisor(&self) -> usize {
        self.shrink_divisor
    }

    #[inline(always)]
    fn grow_threshold(self, capacity: usize) -> usize {
        ((capacity as u128 * self.max_load_percent as u128) / 100) as usize
    }

    #[inline(always)]
    fn shrink_threshold(self, capacity: usize) -> usize {
        capacity / self.shrink_divisor
    }
}

impl Default for ResizePolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone)]
enum Slot<V> {
    Empty,
    Occupied { hash: u64, value: V },
}

impl<V> Slot<V> {
    #[inline(always)]
    fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    #[inline(always)]
    fn value(&self) -> Option<&V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Empty => None,
        }
    }

    #[inline(always)]
    fn value_mut(&mut self) -> Option<&mut V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Empty => None,
        }
    }

    /// Empties the slot, returning what it held.
    #[inline(always)]
    fn take(&mut self) -> Option<(u64, V)> {
        match core::mem::replace(self, Slot::Empty) {
            Slot::Occupied { hash, value } => Some((hash, value)),
            Slot::Empty => None,
        }
    }
}

fn empty_slots<V>(capacity: usize) -> Box<[Slot<V>]> {
    (0..capacity).map(|_| Slot::Empty).collect()
}

/// Outcome of walking a probe sequence.
enum Probe {
    /// Index of the slot holding the matching value.
    Found(usize),
    /// Index of the first empty slot on the sequence.
    Vacant(usize),
}

/// Displacement histogram produced by [`HashTable::probe_histogram`].
///
/// Bin `n` counts the entries stored `n` slots past their home slot.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHistogram {
    /// Entry counts by displacement.
    pub bins: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// Total number of entries counted.
    pub fn total(&self) -> usize {
        self.bins.iter().sum()
    }

    /// Pretty-prints the histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.bins.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        println!("probe histogram ({} entries):", self.total());
        for (displacement, &count) in self.bins.iter().enumerate() {
            let width = (count * max_bar).div_ceil(max);
            println!("{:>3} | {} ({})", displacement, "█".repeat(width), count);
        }
    }
}

/// Occupancy and clustering statistics produced by
/// [`HashTable::debug_stats`].
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of stored entries.
    pub populated: usize,
    /// Number of slots.
    pub capacity: usize,
    /// The table never shrinks below this many slots.
    pub min_capacity: usize,
    /// `populated / capacity`.
    pub load_factor: f64,
    /// Largest distance between an entry and its home slot.
    pub longest_probe: usize,
    /// Mean distance between an entry and its home slot.
    pub mean_probe: f64,
    /// Length of the longest run of occupied slots.
    pub longest_cluster: usize,
    /// Bytes used by the slot array.
    pub total_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Prints the statistics using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Stats ===");
        println!("Populated: {}", self.populated);
        println!(
            "Capacity: {} (minimum {})",
            self.capacity, self.min_capacity
        );
        println!("Load factor: {:.2}%", self.load_factor * 100.0);
        println!("Longest probe: {}", self.longest_probe);
        println!("Mean probe: {:.3}", self.mean_probe);
        println!("Longest cluster: {}", self.longest_cluster);
        println!("Total bytes: {}", self.total_bytes);
    }
}

/// A hash table using open addressing with linear probing.
///
/// Values are stored directly in a slot array together with their hash. A
/// value lives in the first free slot at or after its home slot, `hash %
/// capacity`, wrapping at the end of the array. Lookups walk forward from the
/// home slot until they find the value or an empty slot.
///
/// Removal does not leave tombstones. After emptying a slot, every entry in
/// the occupied run that follows it is lifted out and reinserted from its
/// home slot, so no lookup can be cut short by the hole.
///
/// The table is keyed by `(hash, eq)` pairs rather than by a key type; see
/// [`HashMap`](crate::HashMap) for a key-value interface.
///
/// # Examples
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use lin_hash::hash_table::HashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # fn hash_u64(n: u64) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     n.hash(&mut hasher);
/// #     hasher.finish()
/// # }
/// #
/// let mut table = HashTable::with_capacity(0);
/// table.entry(hash_u64(7), |&n: &u64| n == 7).or_insert(7);
///
/// assert_eq!(table.find(hash_u64(7), |&n| n == 7), Some(&7));
/// assert_eq!(table.remove(hash_u64(7), |&n| n == 7), Some(7));
/// assert!(table.is_empty());
/// ```
pub struct HashTable<V> {
    slots: Box<[Slot<V>]>,
    populated: usize,
    min_capacity: usize,
    policy: ResizePolicy,

    /// Set by every mutation, cleared when a snapshot is taken.
    dirty: bool,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let capacity = self.slots.len();
        f.debug_struct("HashTable")
            .field(
                "slots",
                &self
                    .slots
                    .iter()
                    .enumerate()
                    .map(|(index, slot)| match slot {
                        Slot::Empty => String::from("...."),
                        Slot::Occupied { hash, .. } => {
                            let home = (*hash % capacity as u64) as usize;
                            format!("{home}+{}", (index + capacity - home) % capacity)
                        }
                    })
                    .collect::<Vec<_>>(),
            )
            .field("populated", &self.populated)
            .field("capacity", &capacity)
            .field("min_capacity", &self.min_capacity)
            .finish()
    }
}

impl<V> Clone for HashTable<V>
where
    V: Clone,
{
    fn clone(&self) -> Self {
        // Same capacity, so every entry keeps its slot and its probe chain.
        Self {
            slots: self.slots.clone(),
            populated: self.populated,
            min_capacity: self.min_capacity,
            policy: self.policy,
            dirty: true,
        }
    }
}

impl<V> HashTable<V> {
    /// Creates a new hash table with at least `capacity` slots.
    ///
    /// Capacities below [`MIN_CAPACITY`] are rounded up. The resulting
    /// capacity is also the floor the table will never shrink below.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lin_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_capacity(100);
    /// assert_eq!(table.capacity(), 100);
    ///
    /// let small: HashTable<String> = HashTable::with_capacity(0);
    /// assert_eq!(small.capacity(), 13);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_policy(capacity, ResizePolicy::DEFAULT)
    }

    /// Creates a new hash table with at least `capacity` slots and the given
    /// resize thresholds.
    pub fn with_capacity_and_policy(capacity: usize, policy: ResizePolicy) -> Self {
        let capacity = capacity.max(MIN_CAPACITY);
        Self {
            slots: empty_slots(capacity),
            populated: 0,
            min_capacity: capacity,
            policy,
            dirty: true,
        }
    }

    /// Returns the number of slots in the table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lin_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(13);
    /// for n in 0..7u64 {
    ///     table.entry(n, |&v: &u64| v == n).or_insert(n);
    /// }
    /// // The seventh insertion found six entries in thirteen slots and doubled.
    /// assert_eq!(table.capacity(), 26);
    /// ```
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the resize thresholds in use.
    pub fn policy(&self) -> ResizePolicy {
        self.policy
    }

    /// Returns the number of elements in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table contains no elements.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Removes all elements from the table.
    ///
    /// This operation preserves the table's capacity.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Empty;
        }
        self.populated = 0;
        self.dirty = true;
    }

    /// Returns an iterator over all values in the table, in slot order.
    ///
    /// Slot order depends on the hashes and the current capacity, not on
    /// insertion order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            inner: self.slots.iter(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator that removes and yields all values from the table.
    ///
    /// The table is empty as soon as this is called, whether or not the
    /// iterator is consumed. Capacity is preserved.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lin_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(0);
    /// table.entry(1, |&v: &u32| v == 10).or_insert(10);
    /// table.entry(2, |&v: &u32| v == 20).or_insert(20);
    ///
    /// let mut values: Vec<u32> = table.drain().collect();
    /// values.sort();
    /// assert_eq!(values, [10, 20]);
    /// assert!(table.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, V> {
        let capacity = self.slots.len();
        let slots = core::mem::replace(&mut self.slots, empty_slots(capacity));
        let remaining = core::mem::take(&mut self.populated);
        self.dirty = true;
        Drain {
            inner: slots.into_vec().into_iter(),
            remaining,
            _table: core::marker::PhantomData,
        }
    }

    /// Returns a reference to the value matching `eq`, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lin_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(0);
    /// table.entry(42, |&v: &i32| v == 5).or_insert(5);
    ///
    /// assert_eq!(table.find(42, |&v| v == 5), Some(&5));
    /// assert_eq!(table.find(42, |&v| v == 6), None);
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        match self.probe(hash, eq) {
            Probe::Found(index) => self.slots[index].value(),
            Probe::Vacant(_) => None,
        }
    }

    /// Returns a mutable reference to the value matching `eq`, if any.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        match self.probe(hash, eq) {
            Probe::Found(index) => {
                self.dirty = true;
                self.slots[index].value_mut()
            }
            Probe::Vacant(_) => None,
        }
    }

    /// Removes and returns the value matching `eq`.
    ///
    /// The occupied run after the removed slot is repaired before this
    /// returns, and the table may shrink afterwards.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lin_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(13);
    /// // All three share home slot 0 and sit in slots 0, 1 and 2.
    /// for hash in [0u64, 13, 26] {
    ///     table.entry(hash, |&v: &u64| v == hash).or_insert(hash);
    /// }
    ///
    /// assert_eq!(table.remove(0, |&v| v == 0), Some(0));
    /// assert_eq!(table.find(13, |&v| v == 13), Some(&13));
    /// assert_eq!(table.find(26, |&v| v == 26), Some(&26));
    /// assert_eq!(table.remove(0, |&v| v == 0), None);
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        match self.probe(hash, eq) {
            Probe::Found(index) => {
                let value = self.remove_at(index);
                self.maybe_shrink();
                Some(value)
            }
            Probe::Vacant(_) => None,
        }
    }

    /// Gets an entry for the given hash and equality predicate.
    ///
    /// If the table is at its grow threshold it doubles first, even if the
    /// entry turns out to be occupied.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lin_hash::hash_table::Entry;
    /// # use lin_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(0);
    ///
    /// match table.entry(7, |s: &String| s == "seven") {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert("seven".to_string());
    ///     }
    ///     Entry::Occupied(_) => unreachable!(),
    /// }
    ///
    /// table
    ///     .entry(7, |s: &String| s == "seven")
    ///     .and_modify(|s| s.make_ascii_uppercase());
    /// assert_eq!(table.find(7, |s| s == "SEVEN").map(String::as_str), Some("SEVEN"));
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        self.maybe_grow();
        match self.probe(hash, eq) {
            Probe::Found(index) => Entry::Occupied(OccupiedEntry { table: self, index }),
            Probe::Vacant(index) => Entry::Vacant(VacantEntry {
                table: self,
                hash,
                index,
            }),
        }
    }

    #[inline(always)]
    fn home_index(&self, hash: u64) -> usize {
        (hash % self.slots.len() as u64) as usize
    }

    #[inline(always)]
    fn next_index(&self, index: usize) -> usize {
        if index + 1 == self.slots.len() {
            0
        } else {
            index + 1
        }
    }

    /// Walks the probe sequence for `hash` until a match or an empty slot.
    fn probe(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Probe {
        let mut index = self.home_index(hash);
        loop {
            match &self.slots[index] {
                Slot::Empty => return Probe::Vacant(index),
                Slot::Occupied { hash: stored, value } if *stored == hash && eq(value) => {
                    return Probe::Found(index);
                }
                Slot::Occupied { .. } => index = self.next_index(index),
            }
        }
    }

    /// Stores a value known to be absent in the first empty slot at or after
    /// its home slot.
    fn place(&mut self, hash: u64, value: V) -> usize {
        debug_assert!(self.populated < self.slots.len());

        let mut index = self.home_index(hash);
        while !self.slots[index].is_empty() {
            index = self.next_index(index);
        }

        self.slots[index] = Slot::Occupied { hash, value };
        self.populated += 1;
        index
    }

    /// Empties `index` and repairs the run that follows it. Does not shrink.
    fn remove_at(&mut self, index: usize) -> V {
        let Some((_, value)) = self.slots[index].take() else {
            unreachable!("removing from an empty slot at {index}");
        };
        self.populated -= 1;
        self.dirty = true;

        self.repair_cluster(self.next_index(index));
        value
    }

    /// Reinserts every entry of the occupied run starting at `index`.
    ///
    /// Each entry is placed at the first empty slot from its home, which is
    /// never past its current slot, so the scan visits every entry once and
    /// stops at the first slot that was already empty.
    fn repair_cluster(&mut self, mut index: usize) {
        while let Some((hash, value)) = self.slots[index].take() {
            self.populated -= 1;
            self.place(hash, value);
            index = self.next_index(index);
        }
    }

    fn maybe_grow(&mut self) {
        let capacity = self.slots.len();
        if self.populated >= self.policy.grow_threshold(capacity) {
            self.resize(capacity.saturating_mul(2));
        }
    }

    fn maybe_shrink(&mut self) {
        let capacity = self.slots.len();
        if self.populated > 0 && self.populated == self.policy.shrink_threshold(capacity) {
            let target = (capacity / 2).max(self.min_capacity);
            if target < capacity {
                self.resize(target);
            }
        }
    }

    /// Moves every entry, in slot order, into a fresh array of `capacity`
    /// slots.
    fn resize(&mut self, capacity: usize) {
        let old = core::mem::replace(&mut self.slots, empty_slots(capacity));
        self.populated = 0;
        self.dirty = true;

        for slot in old.into_vec() {
            if let Slot::Occupied { hash, value } = slot {
                self.place(hash, value);
            }
        }
    }

    /// Reports whether the table changed since the last call, and resets the
    /// flag.
    pub(crate) fn take_dirty(&mut self) -> bool {
        core::mem::replace(&mut self.dirty, false)
    }

    #[cfg(any(test, feature = "stats"))]
    fn displacement(&self, index: usize, hash: u64) -> usize {
        let capacity = self.slots.len();
        (index + capacity - self.home_index(hash)) % capacity
    }

    /// Computes a histogram of how far each entry sits from its home slot.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let mut bins = Vec::new();
        for (index, slot) in self.slots.iter().enumerate() {
            if let Slot::Occupied { hash, .. } = slot {
                let displacement = self.displacement(index, *hash);
                if bins.len() <= displacement {
                    bins.resize(displacement + 1, 0);
                }
                bins[displacement] += 1;
            }
        }
        ProbeHistogram { bins }
    }

    /// Returns occupancy and clustering statistics for debugging.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let capacity = self.slots.len();
        let histogram = self.probe_histogram();
        let total_probe: usize = histogram
            .bins
            .iter()
            .enumerate()
            .map(|(displacement, count)| displacement * count)
            .sum();

        let mut longest_cluster = 0;
        let mut run = 0;
        // Walk twice so a run that wraps past the end is measured whole.
        for slot in self.slots.iter().chain(self.slots.iter()) {
            if slot.is_empty() {
                run = 0;
            } else {
                run += 1;
                longest_cluster = longest_cluster.max(run);
            }
        }

        DebugStats {
            populated: self.populated,
            capacity,
            min_capacity: self.min_capacity,
            load_factor: self.populated as f64 / capacity as f64,
            longest_probe: histogram.bins.len().saturating_sub(1),
            mean_probe: if self.populated == 0 {
                0.0
            } else {
                total_probe as f64 / self.populated as f64
            },
            longest_cluster: longest_cluster.min(capacity),
            total_bytes: capacity * core::mem::size_of::<Slot<V>>(),
        }
    }

    /// Checks the structural invariants: the population count matches the
    /// occupied slots, at least one slot is empty, and every entry is
    /// reachable from its home slot without crossing an empty slot.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_chains_intact(&self) -> bool {
        let occupied = self.slots.iter().filter(|slot| !slot.is_empty()).count();
        if occupied != self.populated || occupied == self.slots.len() {
            return false;
        }

        self.slots.iter().enumerate().all(|(index, slot)| match slot {
            Slot::Empty => true,
            Slot::Occupied { hash, .. } => {
                let mut probe = self.home_index(*hash);
                while probe != index {
                    if self.slots[probe].is_empty() {
                        return false;
                    }
                    probe = self.next_index(probe);
                }
                true
            }
        })
    }
}

/// A view into a single entry in the hash table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// A vacant entry - no matching value is present in the table
    Vacant(VacantEntry<'a, V>),
    /// An occupied entry - a matching value is present in the table
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts a default value if the entry is vacant and returns a mutable
    /// reference to the stored value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the stored value.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Applies `f` to an occupied entry and returns a reference to it, or
    /// returns `None` if the entry is vacant.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Option<&'a mut V> {
        match self {
            Entry::Occupied(entry) => {
                let value = entry.into_mut();
                f(value);
                Some(value)
            }
            Entry::Vacant(_) => None,
        }
    }

    /// Inserts the default value if the entry is vacant and returns a mutable
    /// reference to the stored value.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the hash table.
///
/// Holds the index of the first empty slot on the probe sequence, so
/// inserting does not probe again.
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
    index: usize,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Inserts a value into the vacant slot and returns a mutable reference to
    /// it.
    pub fn insert(self, value: V) -> &'a mut V {
        let table = self.table;
        table.populated += 1;
        table.dirty = true;

        let slot = &mut table.slots[self.index];
        *slot = Slot::Occupied {
            hash: self.hash,
            value,
        };
        match slot {
            Slot::Occupied { value, .. } => value,
            Slot::Empty => unreachable!("slot was just filled"),
        }
    }
}

/// A view into an occupied entry in the hash table.
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        match &self.table.slots[self.index] {
            Slot::Occupied { value, .. } => value,
            Slot::Empty => unreachable!("occupied entry at empty slot {}", self.index),
        }
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        self.table.dirty = true;
        match &mut self.table.slots[self.index] {
            Slot::Occupied { value, .. } => value,
            Slot::Empty => unreachable!("occupied entry at empty slot {}", self.index),
        }
    }

    /// Converts the entry into a mutable reference to the value, tied to the
    /// table's lifetime.
    pub fn into_mut(self) -> &'a mut V {
        let table = self.table;
        table.dirty = true;
        match &mut table.slots[self.index] {
            Slot::Occupied { value, .. } => value,
            Slot::Empty => unreachable!("occupied entry at empty slot {}", self.index),
        }
    }

    /// Removes the value from the table, repairing the probe chain and
    /// shrinking if needed.
    pub fn remove(self) -> V {
        let value = self.table.remove_at(self.index);
        self.table.maybe_shrink();
        value
    }
}

/// An iterator over the values in a [`HashTable`], in slot order.
pub struct Iter<'a, V> {
    inner: core::slice::Iter<'a, Slot<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let value = self.inner.by_ref().find_map(Slot::value)?;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

/// A draining iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`]. The slot
/// array it walks has already been detached from the table.
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, V> {
    inner: alloc::vec::IntoIter<Slot<V>>,
    remaining: usize,
    _table: core::marker::PhantomData<&'a mut HashTable<V>>,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        let (_, value) = self.inner.by_ref().find_map(|mut slot| slot.take())?;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}
