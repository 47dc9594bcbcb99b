//! The Robin Hood hashing engine behind [`HashMap`](crate::HashMap) and
//! [`HashSet`](crate::HashSet).
//!
//! [`HashTable`] stores values in a single open-addressed array of nodes.
//! Every value lives at or after its *ideal* slot (`hash % capacity`), and
//! the distance between the two is its *probe distance*. Insertion keeps
//! probe distances balanced by letting an incoming value take the slot of
//! any resident that is closer to home ("robbing the rich"), and removal
//! shifts the rest of a chain back by one instead of leaving tombstones.
//!
//! The table knows nothing about keys: every operation takes the value's
//! hash and an equality predicate.

use core::fmt::Debug;

use crate::buffer::Buffer;
use crate::error::Error;
use crate::error::unwrap_infallible;
use crate::growth::GrowthPolicy;
use crate::node::Node;

const DEFAULT_MAX_LOAD_FACTOR: f32 = 0.5;

#[inline(always)]
fn ideal_index(hash: u64, capacity: usize) -> usize {
    (hash % capacity.max(1) as u64) as usize
}

#[inline(always)]
fn next_index(index: usize, capacity: usize) -> usize {
    let next = index + 1;
    if next == capacity { 0 } else { next }
}

/// Forward circular distance from the ideal slot of `hash` to `index`.
#[inline(always)]
fn probe_distance(hash: u64, index: usize, capacity: usize) -> usize {
    let ideal = ideal_index(hash, capacity);
    if index >= ideal {
        index - ideal
    } else {
        index + capacity - ideal
    }
}

#[inline(always)]
fn fits(entries: usize, capacity: usize, max_load_factor: f32) -> bool {
    entries as f64 <= f64::from(max_load_factor) * capacity as f64
}

/// Deposits `carried` into `buckets`, starting the walk at `index` where the
/// node already sits `distance` slots from home.
///
/// Any resident closer to its ideal slot than the carried node gives up its
/// slot and is carried on in turn. The buffer must contain an empty slot.
fn carry<V>(buckets: &mut [Node<V>], mut index: usize, mut distance: usize, mut carried: Node<V>) {
    let capacity = buckets.len();
    loop {
        let node = &mut buckets[index];
        if node.is_empty() {
            *node = carried;
            return;
        }

        let resident = probe_distance(node.hash(), index, capacity);
        if resident < distance {
            node.swap(&mut carried);
            distance = resident;
        }

        index = next_index(index, capacity);
        distance += 1;
    }
}

/// Outcome of a probe for a hash/predicate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    /// A matching value sits at this index.
    Found(usize),
    /// No match. A new value would be placed at `index`, `distance` slots
    /// from its ideal slot.
    Vacant { index: usize, distance: usize },
}

/// Debug statistics for hash table analysis.
///
/// Requires the `stats` feature outside of tests.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of elements currently in the table
    pub populated: usize,
    /// Total number of slots allocated
    pub capacity: usize,
    /// Number of slots found occupied by a full scan
    pub occupied_slots: usize,
    /// Largest probe distance of any stored element
    pub max_probe_distance: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Total memory in bytes used by the slot array
    pub total_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!("Occupied slots: {}", self.occupied_slots);
        println!("Max probe distance: {}", self.max_probe_distance);
        println!("Total Allocated: {} bytes", self.total_bytes);
    }
}

/// Counts of stored elements per probe distance.
///
/// Index `d` holds the number of elements that sit `d` slots past their
/// ideal slot.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHistogram {
    /// Element counts, indexed by probe distance.
    pub counts: alloc::vec::Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// Pretty-prints the histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let total: usize = self.counts.iter().sum();
        let max = self.counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!("probe histogram ({total} entries):");

        let make_bar = |count: usize| -> alloc::string::String {
            if count == 0 {
                return alloc::string::String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let mut bar = "█".repeat(units / 8);
            let partial = ['▏', '▎', '▍', '▌', '▋', '▊', '▉'];
            if units % 8 > 0 {
                bar.push(partial[units % 8 - 1]);
            }
            bar
        };

        for (distance, &count) in self.counts.iter().enumerate() {
            println!("{distance:>3} | {} ({count})", make_bar(count));
        }
    }
}

/// An open-addressing hash table using Robin Hood hashing with
/// backward-shift deletion.
///
/// `HashTable<V>` stores values of type `V`. Unlike standard hash maps, this
/// type requires you to provide both the hash value and an equality
/// predicate for each operation; [`HashMap`](crate::HashMap) and
/// [`HashSet`](crate::HashSet) wrap it with a key projection and a hasher.
///
/// ## Capacity
///
/// The table's capacity is its number of slots. Before an insertion would
/// push the load factor (`len / capacity`) above the configured maximum, the
/// table grows to the next capacity chosen by its [`GrowthPolicy`] and
/// rehashes every element. The default maximum load factor is `0.5`.
///
/// ## Example
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use robin_hash::hash_table::HashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # #[derive(Debug, PartialEq)]
/// # struct Person {
/// #     id: u64,
/// #     name: String,
/// # }
/// #
/// # fn hash_id(id: u64) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     id.hash(&mut hasher);
/// #     hasher.finish()
/// # }
///
/// let mut table = HashTable::with_capacity(100);
/// let hash = hash_id(123);
///
/// // Insert a person
/// match table.entry(hash, |p: &Person| p.id == 123) {
///     robin_hash::hash_table::Entry::Vacant(entry) => {
///         entry.insert(Person {
///             id: 123,
///             name: "Alice".to_string(),
///         });
///     }
///     robin_hash::hash_table::Entry::Occupied(_) => {
///         println!("Person already exists");
///     }
/// }
///
/// assert_eq!(table.find(hash, |p| p.id == 123).map(|p| p.name.as_str()), Some("Alice"));
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    buckets: Buffer<Node<V>>,
    populated: usize,
    max_load_factor: f32,
    policy: GrowthPolicy,
}

impl<V: Debug> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        struct Slots<'a, V>(&'a HashTable<V>);

        impl<V: Debug> Debug for Slots<'_, V> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                let capacity = self.0.capacity();
                f.debug_map()
                    .entries(self.0.buckets.iter().enumerate().filter_map(|(index, node)| {
                        node.value().map(|value| {
                            (
                                index,
                                (
                                    node.hash(),
                                    probe_distance(node.hash(), index, capacity),
                                    value,
                                ),
                            )
                        })
                    }))
                    .finish()
            }
        }

        f.debug_struct("HashTable")
            .field("len", &self.populated)
            .field("capacity", &self.capacity())
            .field("max_load_factor", &self.max_load_factor)
            .field("policy", &self.policy)
            .field("slots", &Slots(self))
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table without allocating.
    ///
    /// The first insertion grows the table through the default
    /// [`GrowthPolicy::PowerOfTwo`].
    pub const fn new() -> Self {
        Self::with_policy(GrowthPolicy::PowerOfTwo)
    }

    /// Creates an empty table that grows through `policy`.
    pub const fn with_policy(policy: GrowthPolicy) -> Self {
        HashTable {
            buckets: Buffer::new(),
            populated: 0,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            policy,
        }
    }

    /// Creates a new hash table with exactly `capacity` slots.
    ///
    /// With the default maximum load factor of `0.5`, the table holds
    /// `capacity / 2` elements before it grows.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_capacity(100);
    /// assert_eq!(table.capacity(), 100);
    /// assert!(table.is_empty());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_policy(capacity, GrowthPolicy::PowerOfTwo)
    }

    /// Creates a table with exactly `capacity` slots that grows through
    /// `policy`.
    pub fn with_capacity_and_policy(capacity: usize, policy: GrowthPolicy) -> Self {
        unwrap_infallible(Self::try_with_capacity_and_policy(capacity, policy))
    }

    /// Fallible form of [`with_capacity_and_policy`](Self::with_capacity_and_policy).
    pub fn try_with_capacity_and_policy(
        capacity: usize,
        policy: GrowthPolicy,
    ) -> Result<Self, Error> {
        Ok(HashTable {
            buckets: Buffer::try_from_fn(capacity, |_| Node::new())?,
            ..Self::with_policy(policy)
        })
    }

    /// Returns an iterator over all values in the table.
    ///
    /// Values are visited in slot order. The iterator is double-ended, so
    /// `.rev()` walks the slots from the end.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(8);
    /// table.insert(3, "three", |&v| v == "three");
    /// table.insert(1, "one", |&v| v == "one");
    ///
    /// assert_eq!(table.iter().copied().collect::<Vec<_>>(), ["one", "three"]);
    /// assert_eq!(table.iter().rev().copied().collect::<Vec<_>>(), ["three", "one"]);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            nodes: self.buckets.iter(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator over mutable references to all values.
    ///
    /// Values must not be changed in a way that alters their hash.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            nodes: self.buckets.iter_mut(),
            remaining: self.populated,
        }
    }

    /// Removes all values from the table and returns them as an iterator.
    ///
    /// The table keeps its capacity. Values not consumed by the iterator are
    /// dropped when it is dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(8);
    /// table.insert(1, 10, |&v| v == 10);
    /// table.insert(2, 20, |&v| v == 20);
    ///
    /// let mut values: Vec<i32> = table.drain().collect();
    /// values.sort();
    /// assert_eq!(values, [10, 20]);
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), 8);
    /// ```
    pub fn drain(&mut self) -> Drain<'_, V> {
        let nodes = core::mem::take(&mut self.buckets);
        Drain {
            range: 0..nodes.len(),
            remaining: core::mem::take(&mut self.populated),
            nodes,
            table: self,
        }
    }

    /// Returns `true` if the table contains no values.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of values in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Removes all values, keeping the allocated slots.
    pub fn clear(&mut self) {
        if self.populated == 0 {
            return;
        }
        self.populated = 0;
        for node in self.buckets.iter_mut() {
            node.clear();
        }
    }

    /// Keeps only the values for which `keep` returns `true`.
    ///
    /// Each value is visited exactly once.
    pub fn retain(&mut self, mut keep: impl FnMut(&mut V) -> bool) {
        let mut remaining = self.populated;
        let mut index = 0;
        while remaining > 0 && index < self.capacity() {
            let Some(value) = self.buckets[index].value_mut() else {
                index += 1;
                continue;
            };

            remaining -= 1;
            if keep(value) {
                index += 1;
                continue;
            }

            self.remove_index(index);
            // A backward shift may have moved an unvisited value into this
            // slot.
            if self.buckets[index].is_empty() {
                index += 1;
            }
        }
    }

    /// Shrinks the table to the smallest capacity its growth policy offers
    /// that still holds every value under the maximum load factor.
    ///
    /// An empty table releases its slots entirely.
    pub fn shrink_to_fit(&mut self) {
        let Ok(capacity) = self.capacity_for(0, self.populated) else {
            return;
        };
        if capacity < self.capacity() {
            unwrap_infallible(self.try_resize_rehash(capacity));
        }
    }

    /// Reserves room for at least `additional` more values without growing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<u64> = HashTable::new();
    /// table.reserve(100);
    /// assert!(table.capacity() >= 200);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        unwrap_infallible(self.try_reserve(additional))
    }

    /// Fallible form of [`reserve`](Self::reserve). On error the table is
    /// unchanged.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        let entries = self
            .populated
            .checked_add(additional)
            .ok_or(Error::CapacityOverflow)?;
        let capacity = self.capacity_for(self.capacity(), entries)?;
        if capacity > self.capacity() {
            self.try_resize_rehash(capacity)?;
        }
        Ok(())
    }

    /// Grows the table so that its capacity is strictly greater than
    /// `target`, stepping through the growth policy.
    ///
    /// Does nothing if the capacity already exceeds `target` or the policy
    /// cannot grow any further.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::GrowthPolicy;
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<u64> = HashTable::with_policy(GrowthPolicy::Prime);
    /// table.rehash(20);
    /// assert_eq!(table.capacity(), 29);
    /// ```
    pub fn rehash(&mut self, target: usize) {
        unwrap_infallible(self.try_rehash(target))
    }

    /// Fallible form of [`rehash`](Self::rehash). On error the table is
    /// unchanged.
    pub fn try_rehash(&mut self, target: usize) -> Result<(), Error> {
        let capacity = self.policy.next_capacity_above(self.capacity(), target);
        if capacity > self.capacity() {
            self.try_resize_rehash(capacity)?;
        }
        Ok(())
    }

    /// Removes a value from the table.
    ///
    /// Later values of the same chain are shifted back by one slot, so no
    /// tombstone is left behind.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(8);
    /// table.insert(42, 42u64, |&n| n == 42);
    ///
    /// assert_eq!(table.remove(42, |&n| n == 42), Some(42));
    /// assert!(table.is_empty());
    ///
    /// // Removing non-existent value returns None
    /// assert_eq!(table.remove(99, |&n| n == 99), None);
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        match self.find_spot(hash, eq) {
            Probe::Found(index) => Some(self.remove_index(index)),
            Probe::Vacant { .. } => None,
        }
    }

    /// Inserts `value`, replacing and returning an equal value if one is
    /// already stored.
    ///
    /// # Panics
    ///
    /// Panics with "capacity overflow" if the table is full and its growth
    /// policy cannot grow any further.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// assert_eq!(table.insert(7, (7, "a"), |&(k, _)| k == 7), None);
    /// assert_eq!(table.insert(7, (7, "b"), |&(k, _)| k == 7), Some((7, "a")));
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn insert(&mut self, hash: u64, value: V, eq: impl Fn(&V) -> bool) -> Option<V> {
        unwrap_infallible(self.try_insert(hash, value, eq))
    }

    /// Fallible form of [`insert`](Self::insert).
    pub fn try_insert(
        &mut self,
        hash: u64,
        value: V,
        eq: impl Fn(&V) -> bool,
    ) -> Result<Option<V>, Error> {
        Ok(match self.try_entry(hash, eq)? {
            Entry::Occupied(mut entry) => Some(entry.insert(value)),
            Entry::Vacant(entry) => {
                entry.insert(value);
                None
            }
        })
    }

    /// Gets an entry for the given hash and equality predicate.
    ///
    /// When no value matches, the table grows first if one more value would
    /// exceed the maximum load factor, so the returned [`VacantEntry`] can
    /// always be filled without further allocation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use robin_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_str(s: &str) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     s.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// let hash = hash_str("hello");
    ///
    /// // Insert or update pattern
    /// match table.entry(hash, |s: &String| s == "hello") {
    ///     robin_hash::hash_table::Entry::Vacant(entry) => {
    ///         entry.insert("world".to_string());
    ///     }
    ///     robin_hash::hash_table::Entry::Occupied(mut entry) => {
    ///         *entry.get_mut() = "updated".to_string();
    ///     }
    /// }
    ///
    /// // Or use the convenience method
    /// table
    ///     .entry(hash, |s: &String| s == "hello")
    ///     .or_insert("hello".to_string());
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        unwrap_infallible(self.try_entry(hash, eq))
    }

    /// Fallible form of [`entry`](Self::entry).
    ///
    /// Fails with [`Error::CapacityOverflow`] when no value matches, the
    /// table is full, and the growth policy is saturated.
    pub fn try_entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Result<Entry<'_, V>, Error> {
        let probe = self.find_spot(hash, &eq);
        if matches!(probe, Probe::Vacant { .. }) && !self.fits(self.populated + 1) {
            self.try_grow()?;
            return Ok(self.entry_at(self.find_spot(hash, &eq), hash));
        }
        Ok(self.entry_at(probe, hash))
    }

    #[inline]
    fn entry_at(&mut self, probe: Probe, hash: u64) -> Entry<'_, V> {
        match probe {
            Probe::Found(index) => Entry::Occupied(OccupiedEntry { table: self, index }),
            Probe::Vacant { index, distance } => Entry::Vacant(VacantEntry {
                table: self,
                hash,
                index,
                distance,
            }),
        }
    }

    /// Walks the chain of `hash` looking for a value accepted by `eq`.
    ///
    /// The walk stops at an empty slot, or at a resident closer to its ideal
    /// slot than the distance travelled so far: Robin Hood ordering
    /// guarantees a match could not sit beyond either. It never takes more
    /// than `capacity` steps.
    #[inline]
    fn find_spot(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Probe {
        let capacity = self.capacity();
        if capacity == 0 {
            return Probe::Vacant {
                index: 0,
                distance: 0,
            };
        }

        let mut index = ideal_index(hash, capacity);
        for distance in 0..capacity {
            let node = &self.buckets[index];
            let Some(value) = node.value() else {
                return Probe::Vacant { index, distance };
            };
            if probe_distance(node.hash(), index, capacity) < distance {
                return Probe::Vacant { index, distance };
            }
            if node.hash() == hash && eq(value) {
                return Probe::Found(index);
            }
            index = next_index(index, capacity);
        }

        Probe::Vacant {
            index,
            distance: capacity,
        }
    }

    /// Places a new value at `index`, carrying the displaced resident (if
    /// any) further down its chain.
    fn place(&mut self, index: usize, hash: u64, value: V) -> &mut V {
        let capacity = self.capacity();
        debug_assert!(self.populated < capacity);

        let displaced = self.buckets[index].take();
        if !displaced.is_empty() {
            let resident = probe_distance(displaced.hash(), index, capacity);
            carry(
                &mut self.buckets,
                next_index(index, capacity),
                resident + 1,
                displaced,
            );
        }

        self.populated += 1;
        self.buckets[index].construct(hash, value)
    }

    /// Removes the value at `index` and closes the gap with a backward
    /// shift.
    fn remove_index(&mut self, index: usize) -> V {
        let capacity = self.capacity();
        let removed = self.buckets[index].take();

        let mut gap = index;
        loop {
            let next = next_index(gap, capacity);
            let node = &self.buckets[next];
            if node.is_empty() || probe_distance(node.hash(), next, capacity) == 0 {
                break;
            }
            let shifted = self.buckets[next].take();
            self.buckets[gap] = shifted;
            gap = next;
        }

        self.populated -= 1;
        match removed.into_value() {
            Some(value) => value,
            None => unreachable!("removed an empty slot"),
        }
    }

    #[inline]
    fn fits(&self, entries: usize) -> bool {
        fits(entries, self.capacity(), self.max_load_factor)
    }

    /// Steps the growth policy from `start` until `entries` values fit under
    /// the maximum load factor.
    ///
    /// If the policy saturates first, the last capacity is still accepted as
    /// long as it has a slot for every value.
    fn capacity_for(&self, start: usize, entries: usize) -> Result<usize, Error> {
        let mut capacity = start;
        while !fits(entries, capacity, self.max_load_factor) {
            let next = self.policy.next_capacity(capacity);
            if next == capacity {
                log::trace!(
                    "{:?} growth saturated at {capacity} buckets with {entries} entries",
                    self.policy
                );
                return if entries <= capacity {
                    Ok(capacity)
                } else {
                    Err(Error::CapacityOverflow)
                };
            }
            capacity = next;
        }
        Ok(capacity)
    }

    #[cold]
    #[inline(never)]
    fn try_grow(&mut self) -> Result<(), Error> {
        let capacity = self.capacity_for(self.capacity(), self.populated + 1)?;
        if capacity != self.capacity() {
            self.try_resize_rehash(capacity)?;
        }
        Ok(())
    }

    /// Moves every value into a fresh array of `capacity` slots.
    ///
    /// The new array is fully allocated before any value moves, so an
    /// allocation failure leaves the table untouched.
    fn try_resize_rehash(&mut self, capacity: usize) -> Result<(), Error> {
        debug_assert!(self.populated <= capacity);

        if self.populated == 0 {
            self.buckets.try_resize_with(capacity, Node::new)?;
            log::debug!("resized empty table to {capacity} buckets");
            return Ok(());
        }

        let mut buckets = Buffer::try_from_fn(capacity, |_| Node::new())?;
        for node in self.buckets.iter_mut().filter(|node| !node.is_empty()) {
            let node = node.take();
            let ideal = ideal_index(node.hash(), capacity);
            carry(&mut buckets, ideal, 0, node);
        }

        log::debug!(
            "rehashed {} entries from {} to {} buckets",
            self.populated,
            self.capacity(),
            capacity
        );
        self.buckets.swap(&mut buckets);
        Ok(())
    }

    /// Finds a value matching the given hash and equality predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.insert(5, "five", |&v| v == "five");
    ///
    /// assert_eq!(table.find(5, |&v| v == "five"), Some(&"five"));
    /// assert_eq!(table.find(6, |&v| v == "six"), None);
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        match self.find_spot(hash, eq) {
            Probe::Found(index) => Some(self.buckets[index].live()),
            Probe::Vacant { .. } => None,
        }
    }

    /// Finds a value matching the given hash and equality predicate and
    /// returns a mutable reference to it.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        match self.find_spot(hash, eq) {
            Probe::Found(index) => Some(self.buckets[index].live_mut()),
            Probe::Vacant { .. } => None,
        }
    }

    /// Returns `true` if a value matches the given hash and predicate.
    pub fn contains(&self, hash: u64, eq: impl Fn(&V) -> bool) -> bool {
        matches!(self.find_spot(hash, eq), Probe::Found(_))
    }

    /// Returns the number of matching values: `0` or `1`.
    pub fn count(&self, hash: u64, eq: impl Fn(&V) -> bool) -> usize {
        usize::from(self.contains(hash, eq))
    }

    /// Returns a cursor positioned on the first value in slot order, or on
    /// the ghost position if the table is empty.
    pub fn cursor_mut(&mut self) -> CursorMut<'_, V> {
        let index = self.occupied_from(0);
        CursorMut { table: self, index }
    }

    /// Returns a cursor positioned on the value matching the given hash and
    /// predicate, or on the ghost position if there is none.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// for n in 0..4u64 {
    ///     table.insert(n, n, |&v| v == n);
    /// }
    ///
    /// let mut cursor = table.find_cursor_mut(2, |&v| v == 2);
    /// assert_eq!(cursor.remove_current(), Some(2));
    /// drop(cursor);
    /// assert_eq!(table.len(), 3);
    /// assert!(table.find_cursor_mut(9, |&v| v == 9).current().is_none());
    /// ```
    pub fn find_cursor_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> CursorMut<'_, V> {
        let index = match self.find_spot(hash, eq) {
            Probe::Found(index) => index,
            Probe::Vacant { .. } => self.capacity(),
        };
        CursorMut { table: self, index }
    }

    /// First occupied index at or after `start`, or `capacity` if none.
    fn occupied_from(&self, start: usize) -> usize {
        self.buckets
            .get(start..)
            .and_then(|rest| rest.iter().position(|node| !node.is_empty()))
            .map_or(self.capacity(), |offset| start + offset)
    }

    /// Last occupied index before `end`, or `capacity` if none.
    fn occupied_before(&self, end: usize) -> usize {
        self.buckets[..end]
            .iter()
            .rposition(|node| !node.is_empty())
            .unwrap_or(self.capacity())
    }

    /// Returns `true` if both tables hold the same number of values and
    /// every value of `other` has an equal value in `self`.
    ///
    /// `hash` must compute the same hash the values were inserted with.
    pub fn eq_by(
        &self,
        other: &Self,
        hash: impl Fn(&V) -> u64,
        eq: impl Fn(&V, &V) -> bool,
    ) -> bool {
        self.len() == other.len()
            && other
                .iter()
                .all(|theirs| self.contains(hash(theirs), |ours| eq(ours, theirs)))
    }

    /// Returns the number of slots. Same as
    /// [`bucket_count`](Self::bucket_count).
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the number of slots.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Largest slot count this table can reach through its growth policy.
    pub fn max_bucket_count(&self) -> usize {
        let addressable = isize::MAX as usize / core::mem::size_of::<Node<V>>().max(1);
        self.policy.max_capacity().min(addressable)
    }

    /// Current load factor, `len / capacity`, or `0.0` without slots.
    pub fn load_factor(&self) -> f32 {
        if self.capacity() == 0 {
            0.0
        } else {
            self.populated as f32 / self.capacity() as f32
        }
    }

    /// Load factor the table grows to stay under.
    pub fn max_load_factor(&self) -> f32 {
        self.max_load_factor
    }

    /// Sets the maximum load factor, clamped to at most `1.0`.
    ///
    /// Takes effect at the next insertion.
    ///
    /// # Panics
    ///
    /// Panics if `max_load_factor` is not a positive number.
    pub fn set_max_load_factor(&mut self, max_load_factor: f32) {
        assert!(
            max_load_factor > 0.0,
            "max load factor must be positive, got {max_load_factor}"
        );
        self.max_load_factor = max_load_factor.min(1.0);
    }

    /// The policy this table grows through.
    pub fn growth_policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// Computes a histogram of probe distances for the current table state.
    ///
    /// Requires the `stats` feature outside of tests. The histogram has one
    /// bin per distance up to the largest one present.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let capacity = self.capacity();
        let mut counts = alloc::vec::Vec::new();
        for (index, node) in self.buckets.iter().enumerate() {
            if node.is_empty() {
                continue;
            }
            let distance = probe_distance(node.hash(), index, capacity);
            if counts.len() <= distance {
                counts.resize(distance + 1, 0);
            }
            counts[distance] += 1;
        }
        ProbeHistogram { counts }
    }

    /// Returns detailed utilization statistics for debugging.
    ///
    /// Requires the `stats` feature outside of tests.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let histogram = self.probe_histogram();
        DebugStats {
            populated: self.populated,
            capacity: self.capacity(),
            occupied_slots: histogram.counts.iter().sum(),
            max_probe_distance: histogram.counts.len().saturating_sub(1),
            load_factor: f64::from(self.load_factor()),
            total_bytes: self.buckets.allocated_bytes(),
        }
    }

    /// Checks the structural invariants: the entry count matches a scan,
    /// and every slot between a value's ideal slot and its actual slot is
    /// occupied.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let capacity = self.capacity();
        let mut occupied = 0;
        for (index, node) in self.buckets.iter().enumerate() {
            if node.is_empty() {
                assert_eq!(node.hash(), 0, "empty slot {index} caches a hash");
                continue;
            }
            occupied += 1;

            let mut walk = ideal_index(node.hash(), capacity);
            while walk != index {
                assert!(
                    !self.buckets[walk].is_empty(),
                    "gap at {walk} inside the chain of slot {index}"
                );
                walk = next_index(walk, capacity);
            }
        }
        assert_eq!(occupied, self.populated, "len does not match occupied slots");
        assert!(self.populated <= capacity);
    }
}

/// A view into a single entry in the hash table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
///
/// # Examples
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use robin_hash::hash_table::Entry;
/// # use robin_hash::hash_table::HashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # fn hash_str(s: &str) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     s.hash(&mut hasher);
/// #     hasher.finish()
/// # }
///
/// let mut table = HashTable::with_capacity(10);
/// let hash = hash_str("key");
///
/// match table.entry(hash, |s: &String| s == "key") {
///     Entry::Vacant(entry) => {
///         entry.insert("value".to_string());
///     }
///     Entry::Occupied(entry) => {
///         println!("Key already exists with value: {}", entry.get());
///     }
/// }
/// ```
pub enum Entry<'a, V> {
    /// A vacant entry - no stored value matches
    Vacant(VacantEntry<'a, V>),
    /// An occupied entry - a matching value is stored
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
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

    /// Inserts `V::default()` if the entry is vacant.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(V::default)
    }

    /// Applies `f` to the stored value if the entry is occupied.
    pub fn and_modify(mut self, f: impl FnOnce(&mut V)) -> Self {
        if let Entry::Occupied(entry) = &mut self {
            f(entry.get_mut());
        }
        self
    }
}

/// A view into a vacant entry in the hash table.
///
/// The table has already grown if needed, so inserting never reallocates.
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
    index: usize,
    distance: usize,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Inserts a value into the vacant entry and returns a mutable reference
    /// to it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::hash_table::Entry;
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    ///
    /// match table.entry(17, |s: &String| s == "key") {
    ///     Entry::Vacant(entry) => {
    ///         let value_ref = entry.insert("key".to_string());
    ///         assert_eq!(value_ref, "key");
    ///     }
    ///     Entry::Occupied(_) => unreachable!("Entry should be vacant"),
    /// }
    /// ```
    pub fn insert(self, value: V) -> &'a mut V {
        debug_assert_eq!(
            self.distance,
            probe_distance(self.hash, self.index, self.table.capacity())
        );
        self.table.place(self.index, self.hash, value)
    }

    /// The hash this entry was looked up with.
    pub fn hash(&self) -> u64 {
        self.hash
    }
}

/// A view into an occupied entry in the hash table.
///
/// This struct is created by the [`entry`] method on [`HashTable`] when a
/// matching value is present.
///
/// [`entry`]: HashTable::entry
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        self.table.buckets[self.index].live()
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        self.table.buckets[self.index].live_mut()
    }

    /// Converts the entry into a mutable reference bound to the table's
    /// borrow.
    pub fn into_mut(self) -> &'a mut V {
        self.table.buckets[self.index].live_mut()
    }

    /// Replaces the stored value, returning the old one.
    pub fn insert(&mut self, value: V) -> V {
        let node = &mut self.table.buckets[self.index];
        match node.set_data(node.hash(), value) {
            Some(previous) => previous,
            None => unreachable!("occupied entry on an empty slot"),
        }
    }

    /// Removes the value from the table and returns it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use robin_hash::hash_table::Entry;
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.insert(3, 30, |&v| v == 30);
    ///
    /// if let Entry::Occupied(entry) = table.entry(3, |&v| v == 30) {
    ///     assert_eq!(entry.remove(), 30);
    /// }
    /// assert!(table.is_empty());
    /// ```
    pub fn remove(self) -> V {
        self.table.remove_index(self.index)
    }
}

/// A mutable cursor over the slots of a [`HashTable`].
///
/// A cursor rests either on an occupied slot or on the "ghost" position
/// past the last slot. Moving off either end lands on the ghost, and moving
/// from the ghost wraps to the first or last value.
pub struct CursorMut<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<V> CursorMut<'_, V> {
    /// Slot index of the current value, or `None` on the ghost position.
    pub fn index(&self) -> Option<usize> {
        (self.index < self.table.capacity()).then_some(self.index)
    }

    /// The current value, or `None` on the ghost position.
    pub fn current(&self) -> Option<&V> {
        self.table.buckets.get(self.index).and_then(Node::value)
    }

    /// The current value, mutably.
    pub fn current_mut(&mut self) -> Option<&mut V> {
        self.table.buckets.get_mut(self.index).and_then(Node::value_mut)
    }

    /// Advances to the next value in slot order.
    pub fn move_next(&mut self) {
        let start = if self.index >= self.table.capacity() {
            0
        } else {
            self.index + 1
        };
        self.index = self.table.occupied_from(start);
    }

    /// Moves back to the previous value in slot order.
    pub fn move_prev(&mut self) {
        let end = self.index.min(self.table.capacity());
        self.index = self.table.occupied_before(end);
    }

    /// Removes the current value and returns it.
    ///
    /// If the backward shift moved another value into the freed slot, the
    /// cursor stays on that slot; otherwise it advances to the next value.
    /// On the ghost position this does nothing and returns `None`.
    pub fn remove_current(&mut self) -> Option<V> {
        self.index()?;
        let value = self.table.remove_index(self.index);
        if self.table.buckets[self.index].is_empty() {
            self.index = self.table.occupied_from(self.index + 1);
        }
        Some(value)
    }
}

/// An iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`iter`] method on [`HashTable`].
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, V> {
    nodes: core::slice::Iter<'a, Node<V>>,
    remaining: usize,
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Iter {
            nodes: self.nodes.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let value = self.nodes.find_map(Node::value);
        self.remaining -= usize::from(value.is_some());
        value
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> DoubleEndedIterator for Iter<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let value = self.nodes.by_ref().rev().find_map(Node::value);
        self.remaining -= usize::from(value.is_some());
        value
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> core::iter::FusedIterator for Iter<'_, V> {}

/// A mutable iterator over the values in a [`HashTable`].
pub struct IterMut<'a, V> {
    nodes: core::slice::IterMut<'a, Node<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let value = self.nodes.find_map(Node::value_mut);
        self.remaining -= usize::from(value.is_some());
        value
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> DoubleEndedIterator for IterMut<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let value = self.nodes.by_ref().rev().find_map(Node::value_mut);
        self.remaining -= usize::from(value.is_some());
        value
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}
impl<V> core::iter::FusedIterator for IterMut<'_, V> {}

/// A draining iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`].
/// It yields owned `V` values and empties the table as it iterates.
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, V> {
    table: &'a mut HashTable<V>,
    nodes: Buffer<Node<V>>,
    range: core::ops::Range<usize>,
    remaining: usize,
}

impl<V> Drop for Drain<'_, V> {
    fn drop(&mut self) {
        for index in &mut self.range {
            self.nodes[index].clear();
        }
        // The table owns no slots until the cleared buffer is handed back.
        self.table.buckets.swap(&mut self.nodes);
    }
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        for index in &mut self.range {
            if let Some(value) = self.nodes[index].clear() {
                self.remaining -= 1;
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}
impl<V> core::iter::FusedIterator for Drain<'_, V> {}

/// An owning iterator over the values of a [`HashTable`].
pub struct IntoIter<V> {
    nodes: Buffer<Node<V>>,
    range: core::ops::Range<usize>,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        for index in &mut self.range {
            if let Some(value) = self.nodes[index].clear() {
                self.remaining -= 1;
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> DoubleEndedIterator for IntoIter<V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        while let Some(index) = self.range.next_back() {
            if let Some(value) = self.nodes[index].clear() {
                self.remaining -= 1;
                return Some(value);
            }
        }
        None
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}
impl<V> core::iter::FusedIterator for IntoIter<V> {}

impl<V> IntoIterator for HashTable<V> {
    type IntoIter = IntoIter<V>;
    type Item = V;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            range: 0..self.buckets.len(),
            remaining: self.populated,
            nodes: self.buckets,
        }
    }
}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type IntoIter = Iter<'a, V>;
    type Item = &'a V;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, V> IntoIterator for &'a mut HashTable<V> {
    type IntoIter = IterMut<'a, V>;
    type Item = &'a mut V;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
