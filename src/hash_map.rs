use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::ops::Index;

use crate::DefaultHashBuilder;
use crate::error::Error;
use crate::growth::GrowthPolicy;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;

/// A hash map backed by the Robin Hood [`HashTable`].
///
/// `HashMap<K, V, S>` stores key-value pairs where keys implement `Hash + Eq`
/// and uses a configurable hasher builder `S` to hash keys. Every entry is
/// stored inline as a `(K, V)` pair next to its cached hash.
///
/// # Examples
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use robin_hash::HashMap;
///
/// let mut stock: HashMap<&str, u32> = HashMap::new();
/// stock.insert("apples", 3);
/// *stock.entry("pears").or_insert(0) += 5;
///
/// assert_eq!(stock["apples"], 3);
/// assert_eq!(stock.get("pears"), Some(&5));
/// assert!(stock.at("plums").is_err());
/// # }
/// ```
#[derive(Clone)]
pub struct HashMap<K, V, S = DefaultHashBuilder> {
    table: HashTable<(K, V)>,
    hash_builder: S,
}

impl<K, V, S> Debug for HashMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> PartialEq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.table.eq_by(
            &other.table,
            |(k, _)| self.hash_builder.hash_one(k),
            |(k1, v1), (k2, v2)| k1 == k2 && v1 == v2,
        )
    }
}

impl<K, V, S> Eq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> HashMap<K, V, S> {
    /// Creates a new hash map with the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use robin_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let map: HashMap<i32, String, _> = HashMap::with_hasher(SimpleHasher);
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 0);
    /// ```
    pub const fn with_hasher(hash_builder: S) -> Self {
        Self::with_policy_and_hasher(GrowthPolicy::PowerOfTwo, hash_builder)
    }

    /// Creates an empty map that grows through `policy`.
    pub const fn with_policy_and_hasher(policy: GrowthPolicy, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_policy(policy),
            hash_builder,
        }
    }

    /// Creates a new hash map with exactly `capacity` slots and the given
    /// hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use robin_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let map: HashMap<i32, String, _> = HashMap::with_capacity_and_hasher(100, SimpleHasher);
    /// assert_eq!(map.capacity(), 100);
    /// ```
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hash_builder,
        }
    }

    /// Returns a reference to the map's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the underlying table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the number of slots in the underlying table.
    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    /// Largest slot count the map can grow to.
    pub fn max_bucket_count(&self) -> usize {
        self.table.max_bucket_count()
    }

    /// Current load factor, `len / capacity`.
    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    /// Load factor the map grows to stay under.
    pub fn max_load_factor(&self) -> f32 {
        self.table.max_load_factor()
    }

    /// Sets the maximum load factor, clamped to at most `1.0`.
    ///
    /// # Panics
    ///
    /// Panics if `max_load_factor` is not a positive number.
    pub fn set_max_load_factor(&mut self, max_load_factor: f32) {
        self.table.set_max_load_factor(max_load_factor);
    }

    /// The policy the map grows through.
    pub fn growth_policy(&self) -> GrowthPolicy {
        self.table.growth_policy()
    }

    /// Clears the map, removing all key-value pairs and keeping the
    /// allocated slots.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the key-value pairs of the map.
    ///
    /// The iterator yields `(&K, &V)` pairs in slot order and is
    /// double-ended.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the key-value pairs with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Returns an iterator over the keys of the map.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the map.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over mutable references to the values.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Clears the map, returning all key-value pairs as an iterator.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Retains only the entries for which `f` returns `true`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_hash::HashMap;
    ///
    /// let mut map: HashMap<i32, i32> = (0..8).map(|x| (x, x * 10)).collect();
    /// map.retain(|&k, _| k % 2 == 0);
    /// assert_eq!(map.len(), 4);
    /// # }
    /// ```
    pub fn retain(&mut self, mut f: impl FnMut(&K, &mut V) -> bool) {
        self.table.retain(|(k, v)| f(&*k, v));
    }

    /// Returns a cursor on the first entry in slot order.
    pub fn cursor_mut(&mut self) -> CursorMut<'_, K, V> {
        CursorMut {
            inner: self.table.cursor_mut(),
        }
    }

    /// Shrinks the map to the smallest capacity its growth policy offers
    /// that still holds every entry.
    pub fn shrink_to_fit(&mut self) {
        self.table.shrink_to_fit();
    }

    /// Reserves room for at least `additional` more entries.
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Fallible form of [`reserve`](Self::reserve).
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.table.try_reserve(additional)
    }

    /// Grows the map so that its slot count exceeds `target`.
    pub fn rehash(&mut self, target: usize) {
        self.table.rehash(target);
    }

    /// Fallible form of [`rehash`](Self::rehash).
    pub fn try_rehash(&mut self, target: usize) -> Result<(), Error> {
        self.table.try_rehash(target)
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Inserts a key-value pair into the map.
    ///
    /// If the map already had this key present, the value is updated and the
    /// old value is returned. The key itself is not updated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use robin_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map.get(&37), Some(&"b"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(mut entry) => {
                let old_value = core::mem::replace(&mut entry.get_mut().1, value);
                Some(old_value)
            }
            TableEntry::Vacant(entry) => {
                entry.insert((key, value));
                None
            }
        }
    }

    /// Inserts the value produced by `make` only if `key` is absent.
    ///
    /// Returns a reference to the stored value and whether an insertion
    /// happened. `make` is not called when the key is already present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_hash::HashMap;
    ///
    /// let mut map: HashMap<u8, String> = HashMap::new();
    /// let (value, inserted) = map.try_insert_with(1, || "one".to_string());
    /// assert!(inserted);
    /// value.push('!');
    ///
    /// let (value, inserted) = map.try_insert_with(1, || unreachable!());
    /// assert!(!inserted);
    /// assert_eq!(value, "one!");
    /// # }
    /// ```
    pub fn try_insert_with(&mut self, key: K, make: impl FnOnce() -> V) -> (&mut V, bool) {
        match self.entry(key) {
            Entry::Occupied(entry) => (entry.into_mut(), false),
            Entry::Vacant(entry) => (entry.insert(make()), true),
        }
    }

    /// Gets the given key's entry in the map for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use robin_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// map.entry(1).or_insert("a");
    /// map.entry(2).or_insert("b");
    ///
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), Some(&"b"));
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, key }),
        }
    }

    #[inline]
    fn hash_key<Q>(&self, key: &Q) -> u64
    where
        Q: Hash + ?Sized,
    {
        self.hash_builder.hash_one(key)
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key and value corresponding to the key.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_key(key);
        self.table
            .find(hash, |(k, _)| k.borrow() == key)
            .map(|(k, v)| (k, v))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_key(key);
        self.table
            .find_mut(hash, |(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    /// Returns the value for `key`, or [`Error::KeyNotFound`].
    pub fn at<Q>(&self, key: &Q) -> Result<&V, Error>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns the value for `key` mutably, or [`Error::KeyNotFound`].
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V, Error>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_key(key);
        self.table.contains(hash, |(k, _)| k.borrow() == key)
    }

    /// Returns the number of entries with this key: `0` or `1`.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        usize::from(self.contains_key(key))
    }

    /// Removes a key from the map, returning the value if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_key(key);
        self.table.remove(hash, |(k, _)| k.borrow() == key)
    }

    /// Returns a cursor on the entry for `key`, or on the ghost position if
    /// the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_hash::HashMap;
    ///
    /// let mut map: HashMap<i32, &str> = HashMap::from([(1, "a"), (2, "b")]);
    /// let mut cursor = map.find_cursor_mut(&2);
    /// assert_eq!(cursor.key(), Some(&2));
    /// assert_eq!(cursor.remove_current(), Some((2, "b")));
    /// drop(cursor);
    /// assert_eq!(map.len(), 1);
    /// # }
    /// ```
    pub fn find_cursor_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_key(key);
        CursorMut {
            inner: self.table.find_cursor_mut(hash, |(k, _)| k.borrow() == key),
        }
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    S: Default,
{
    /// Creates a new hash map using the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use robin_hash::HashMap;
    /// #
    /// # #[derive(Default)]
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let map: HashMap<i32, String, SimpleHasher> = HashMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates a new hash map with exactly `capacity` slots using the
    /// default hasher builder.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

impl<K, V, S> Default for HashMap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, Q, V, S> Index<&Q> for HashMap<K, V, S>
where
    K: Hash + Eq + Borrow<Q>,
    Q: Hash + Eq + ?Sized,
    S: BuildHasher,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key not found"),
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S, const N: usize> From<[(K, V); N]> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K, V, S> IntoIterator for HashMap<K, V, S> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut HashMap<K, V, S> {
    type IntoIter = IterMut<'a, K, V>;
    type Item = (&'a K, &'a mut V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A view into a single entry in the map, which may either be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashMap`].
///
/// [`entry`]: HashMap::entry
pub enum Entry<'a, K, V> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Inserts a default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts a value computed from a closure if the entry is vacant and
    /// returns a mutable reference.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns a reference to this entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Default,
{
    /// Inserts the default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the map.
pub struct VacantEntry<'a, K, V> {
    entry: crate::hash_table::VacantEntry<'a, (K, V)>,
    key: K,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting a value.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Take ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts the value into the map and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.entry.insert((self.key, value)).1
    }
}

/// A view into an occupied entry in the map.
pub struct OccupiedEntry<'a, K, V> {
    entry: crate::hash_table::OccupiedEntry<'a, (K, V)>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Gets a reference to the key in the entry.
    pub fn key(&self) -> &K {
        &self.entry.get().0
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.entry.get().1
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.entry.get_mut().1
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.entry.into_mut().1
    }

    /// Inserts a value into the entry and returns the old value.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(&mut self.entry.get_mut().1, value)
    }

    /// Removes the entry from the map and returns the value.
    pub fn remove(self) -> V {
        self.entry.remove().1
    }

    /// Removes the entry from the map and returns the key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.entry.remove()
    }
}

/// A mutable cursor over the entries of a [`HashMap`].
///
/// See [`hash_table::CursorMut`](crate::hash_table::CursorMut) for the
/// movement and removal rules.
pub struct CursorMut<'a, K, V> {
    inner: crate::hash_table::CursorMut<'a, (K, V)>,
}

impl<K, V> CursorMut<'_, K, V> {
    /// Key of the current entry, or `None` on the ghost position.
    pub fn key(&self) -> Option<&K> {
        self.inner.current().map(|(k, _)| k)
    }

    /// Value of the current entry.
    pub fn value(&self) -> Option<&V> {
        self.inner.current().map(|(_, v)| v)
    }

    /// Value of the current entry, mutably.
    pub fn value_mut(&mut self) -> Option<&mut V> {
        self.inner.current_mut().map(|(_, v)| v)
    }

    /// Advances to the next entry in slot order.
    pub fn move_next(&mut self) {
        self.inner.move_next();
    }

    /// Moves back to the previous entry in slot order.
    pub fn move_prev(&mut self) {
        self.inner.move_prev();
    }

    /// Removes the current entry and returns it.
    pub fn remove_current(&mut self) -> Option<(K, V)> {
        self.inner.remove_current()
    }
}

/// An iterator over the key-value pairs of a `HashMap`.
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (k, v))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> core::iter::FusedIterator for Iter<'_, K, V> {}

/// A mutable iterator over the key-value pairs of a `HashMap`.
pub struct IterMut<'a, K, V> {
    inner: crate::hash_table::IterMut<'a, (K, V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (&*k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (&*k, v))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> core::iter::FusedIterator for IterMut<'_, K, V> {}

/// An iterator over the keys of a `HashMap`.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// An iterator over the values of a `HashMap`.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// A mutable iterator over the values of a `HashMap`.
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

/// A draining iterator over the key-value pairs of a `HashMap`.
pub struct Drain<'a, K, V> {
    inner: crate::hash_table::Drain<'a, (K, V)>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Drain<'_, K, V> {}

/// An owning iterator over the key-value pairs of a `HashMap`.
pub struct IntoIter<K, V> {
    inner: crate::hash_table::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::hash::BuildHasher;

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

    type Map<K, V> = HashMap<K, V, SipHashBuilder>;

    #[test]
    fn test_new_and_with_hasher() {
        let map: Map<i32, String> = HashMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.capacity(), 0);

        let map: Map<i32, String> = HashMap::with_hasher(SipHashBuilder::default());
        assert!(map.is_empty());
        assert_eq!(map.growth_policy(), GrowthPolicy::PowerOfTwo);
    }

    #[test]
    fn test_with_capacity() {
        let map: Map<i32, String> = HashMap::with_capacity(100);
        assert_eq!(map.capacity(), 100);
        assert_eq!(map.bucket_count(), 100);
        assert_eq!(map.load_factor(), 0.0);
    }

    #[test]
    fn test_insert_and_get() {
        let mut map: Map<i32, String> = HashMap::new();
        assert_eq!(map.insert(1, "one".to_string()), None);
        assert_eq!(map.insert(2, "two".to_string()), None);
        assert_eq!(map.len(), 2);

        assert_eq!(map.get(&1), Some(&"one".to_string()));
        assert_eq!(map.get(&3), None);

        assert_eq!(map.insert(1, "uno".to_string()), Some("one".to_string()));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get_key_value(&1), Some((&1, &"uno".to_string())));
    }

    #[test]
    fn test_borrowed_lookup() {
        let mut map: Map<String, usize> = HashMap::new();
        map.insert("alpha".to_string(), 1);
        assert_eq!(map.get("alpha"), Some(&1));
        assert!(map.contains_key("alpha"));
        assert_eq!(map["alpha"], 1);
        assert_eq!(map.remove("alpha"), Some(1));
        assert!(!map.contains_key("alpha"));
    }

    #[test]
    fn test_get_mut() {
        let mut map: Map<i32, i32> = HashMap::new();
        map.insert(1, 10);
        if let Some(v) = map.get_mut(&1) {
            *v = 20;
        }
        assert_eq!(map.get(&1), Some(&20));
        assert!(map.get_mut(&2).is_none());
    }

    #[test]
    fn test_at() {
        let mut map: Map<i32, i32> = HashMap::new();
        map.insert(1, 10);
        assert_eq!(map.at(&1), Ok(&10));
        assert_eq!(map.at(&2), Err(Error::KeyNotFound));
        *map.at_mut(&1).unwrap() += 1;
        assert_eq!(map.at(&1), Ok(&11));
        assert_eq!(map.at_mut(&2), Err(Error::KeyNotFound));
    }

    #[test]
    #[should_panic(expected = "key not found")]
    fn test_index_missing_panics() {
        let map: Map<i32, i32> = HashMap::new();
        let _ = map[&7];
    }

    #[test]
    fn test_count_and_contains_key() {
        let mut map: Map<i32, &str> = HashMap::new();
        map.insert(1, "one");
        assert!(map.contains_key(&1));
        assert!(!map.contains_key(&2));
        assert_eq!(map.count(&1), 1);
        assert_eq!(map.count(&2), 0);
    }

    #[test]
    fn test_remove() {
        let mut map: Map<i32, String> = HashMap::new();
        map.insert(1, "one".to_string());
        map.insert(2, "two".to_string());

        assert_eq!(map.remove(&1), Some("one".to_string()));
        assert_eq!(map.len(), 1);
        assert_eq!(map.remove(&1), None);
        assert_eq!(map.remove_entry(&2), Some((2, "two".to_string())));
        assert!(map.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut map: Map<i32, i32> = HashMap::new();
        for i in 0..10 {
            map.insert(i, i * 10);
        }
        let capacity = map.capacity();
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.capacity(), capacity);
        assert_eq!(map.get(&5), None);
    }

    #[test]
    fn test_capacity_control() {
        let mut map: Map<i32, i32> = HashMap::new();
        map.reserve(100);
        assert!(map.capacity() >= 200);
        map.insert(1, 1);
        map.shrink_to_fit();
        assert_eq!(map.capacity(), 2);

        map.rehash(50);
        assert_eq!(map.capacity(), 64);
        assert_eq!(map.try_rehash(10), Ok(()));
        assert_eq!(map.try_reserve(usize::MAX), Err(Error::CapacityOverflow));
        assert_eq!(map.get(&1), Some(&1));

        map.set_max_load_factor(0.9);
        assert_eq!(map.max_load_factor(), 0.9);
        assert!(map.max_bucket_count() >= map.capacity());
    }

    #[test]
    fn test_prime_policy() {
        let mut map: Map<u32, u32> =
            HashMap::with_policy_and_hasher(GrowthPolicy::Prime, SipHashBuilder::default());
        for i in 0..100 {
            map.insert(i, i);
        }
        assert_eq!(map.growth_policy(), GrowthPolicy::Prime);
        assert_eq!(map.capacity(), 257);
        assert!((0..100).all(|i| map.get(&i) == Some(&i)));
    }

    #[test]
    fn test_entry_api() {
        let mut map: Map<&str, i32> = HashMap::new();

        *map.entry("a").or_insert(0) += 1;
        *map.entry("a").or_insert(0) += 1;
        map.entry("b").and_modify(|v| *v += 100).or_insert(5);
        map.entry("b").and_modify(|v| *v += 100).or_insert(5);
        *map.entry("c").or_insert_with(|| 7) *= 2;

        assert_eq!(map.get("a"), Some(&2));
        assert_eq!(map.get("b"), Some(&105));
        assert_eq!(map.get("c"), Some(&14));
        assert_eq!(map.entry("z").key(), &"z");
    }

    #[test]
    fn test_entry_or_default() {
        let mut map: Map<&str, Vec<i32>> = HashMap::new();
        map.entry("list").or_default().push(1);
        map.entry("list").or_default().push(2);
        assert_eq!(map.get("list"), Some(&vec![1, 2]));
    }

    #[test]
    fn test_occupied_entry() {
        let mut map: Map<i32, String> = HashMap::new();
        map.insert(1, "one".to_string());

        match map.entry(1) {
            Entry::Occupied(mut entry) => {
                assert_eq!(entry.key(), &1);
                assert_eq!(entry.get(), "one");
                entry.get_mut().push('!');
                assert_eq!(entry.insert("uno".to_string()), "one!");
                assert_eq!(entry.remove_entry(), (1, "uno".to_string()));
            }
            Entry::Vacant(_) => panic!("expected occupied entry"),
        }
        assert!(map.is_empty());
    }

    #[test]
    fn test_vacant_entry() {
        let mut map: Map<i32, String> = HashMap::new();
        match map.entry(5) {
            Entry::Vacant(entry) => {
                assert_eq!(entry.key(), &5);
                entry.insert("five".to_string());
            }
            Entry::Occupied(_) => panic!("expected vacant entry"),
        }
        match map.entry(6) {
            Entry::Vacant(entry) => assert_eq!(entry.into_key(), 6),
            Entry::Occupied(_) => panic!("expected vacant entry"),
        }
        assert_eq!(map.get(&5), Some(&"five".to_string()));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_try_insert_with() {
        let mut map: Map<i32, i32> = HashMap::new();
        let mut calls = 0;
        let (value, inserted) = map.try_insert_with(1, || {
            calls += 1;
            10
        });
        assert!(inserted);
        assert_eq!(*value, 10);

        let (value, inserted) = map.try_insert_with(1, || {
            calls += 1;
            20
        });
        assert!(!inserted);
        assert_eq!(*value, 10);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_iterators() {
        let mut map: Map<i32, i32> = HashMap::new();
        for i in 0..20 {
            map.insert(i, i * 2);
        }

        let mut pairs: Vec<(i32, i32)> = map.iter().map(|(&k, &v)| (k, v)).collect();
        pairs.sort();
        assert_eq!(pairs, (0..20).map(|i| (i, i * 2)).collect::<Vec<_>>());

        let forward: Vec<i32> = map.keys().copied().collect();
        let mut backward: Vec<i32> = map.keys().rev().copied().collect();
        backward.reverse();
        assert_eq!(forward, backward);
        assert_eq!(map.keys().len(), 20);

        let sum: i32 = map.values().sum();
        assert_eq!(sum, (0..20).map(|i| i * 2).sum());

        for v in map.values_mut() {
            *v += 1;
        }
        for (_, v) in &mut map {
            *v += 1;
        }
        for (k, v) in map.iter_mut().rev() {
            assert_eq!(*v, k * 2 + 2);
        }
        assert_eq!((&map).into_iter().count(), 20);

        let mut owned: Vec<(i32, i32)> = map.into_iter().collect();
        owned.sort();
        assert_eq!(owned[19], (19, 40));
    }

    #[test]
    fn test_drain() {
        let mut map: Map<i32, String> = HashMap::new();
        for i in 0..10 {
            map.insert(i, i.to_string());
        }
        let drained: Vec<(i32, String)> = map.drain().collect();
        assert_eq!(drained.len(), 10);
        assert!(map.is_empty());
        map.insert(3, "3".to_string());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_retain() {
        let mut map: Map<i32, i32> = (0..100).map(|i| (i, i)).collect();
        map.retain(|&k, v| {
            *v *= 10;
            k % 3 == 0
        });
        assert_eq!(map.len(), 34);
        assert_eq!(map.get(&9), Some(&90));
        assert_eq!(map.get(&10), None);
    }

    #[test]
    fn test_cursor() {
        let mut map: Map<i32, i32> = (0..50).map(|i| (i, i)).collect();

        let mut cursor = map.cursor_mut();
        let mut removed = 0;
        while let Some(&key) = cursor.key() {
            if key % 2 == 0 {
                let (k, v) = cursor.remove_current().unwrap();
                assert_eq!(k, v);
                removed += 1;
            } else {
                *cursor.value_mut().unwrap() = key + 1000;
                cursor.move_next();
            }
        }
        assert_eq!(removed, 25);
        assert_eq!(map.len(), 25);
        assert!(map.iter().all(|(k, v)| k % 2 == 1 && *v == k + 1000));

        let mut cursor = map.find_cursor_mut(&7);
        assert_eq!(cursor.value(), Some(&1007));
        cursor.move_prev();
        cursor.move_next();
        assert_eq!(cursor.key(), Some(&7));
        assert!(map.find_cursor_mut(&8).key().is_none());
    }

    #[test]
    fn test_equality_compares_values() {
        let a: Map<i32, i32> = (0..10).map(|i| (i, i)).collect();
        let mut b: Map<i32, i32> = (0..10).rev().map(|i| (i, i)).collect();
        assert_eq!(a, b);

        b.insert(3, 300);
        assert_ne!(a, b);
        b.insert(3, 3);
        assert_eq!(a, b);
        b.remove(&3);
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_array_and_extend() {
        let mut map: Map<&str, i32> = HashMap::from([("a", 1), ("b", 2)]);
        map.extend([("c", 3), ("a", 10)]);
        assert_eq!(map.len(), 3);
        assert_eq!(map["a"], 10);
    }

    #[test]
    fn test_debug_and_clone() {
        let mut map: Map<i32, &str> = HashMap::new();
        map.insert(1, "one");
        assert_eq!(alloc::format!("{map:?}"), r#"{1: "one"}"#);

        let copy = map.clone();
        map.insert(2, "two");
        assert_eq!(copy.len(), 1);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_many_insertions() {
        let mut map: Map<u64, u64> = HashMap::new();
        for i in 0..1000 {
            map.insert(i, i * i);
        }
        assert_eq!(map.len(), 1000);
        assert!(map.load_factor() <= map.max_load_factor());
        for i in 0..1000 {
            assert_eq!(map.get(&i), Some(&(i * i)));
        }
        for i in (0..1000).step_by(2) {
            assert_eq!(map.remove(&i), Some(i * i));
        }
        assert_eq!(map.len(), 500);
        assert!(map.keys().all(|k| k % 2 == 1));
    }

    #[cfg(any(feature = "std", feature = "foldhash"))]
    #[test]
    fn test_default_hasher() {
        let mut map: HashMap<i32, i32> = HashMap::default();
        map.insert(1, 2);
        assert_eq!(map[&1], 2);
    }
}
