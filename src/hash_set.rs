use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::DefaultHashBuilder;
use crate::error::Error;
use crate::growth::GrowthPolicy;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;

/// A hash set backed by the Robin Hood [`HashTable`].
///
/// `HashSet<T, S>` stores values of type `T` where `T` implements `Hash + Eq`
/// and uses a configurable hasher builder `S` to hash values.
///
/// # Examples
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use robin_hash::HashSet;
///
/// let mut books: HashSet<&str> = HashSet::new();
/// assert!(books.insert("Dune"));
/// assert!(!books.insert("Dune"));
/// assert!(books.contains("Dune"));
/// assert_eq!(books.count("Emma"), 0);
/// # }
/// ```
#[derive(Clone)]
pub struct HashSet<T, S = DefaultHashBuilder> {
    table: HashTable<T>,
    hash_builder: S,
}

impl<T, S> PartialEq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.table.eq_by(
            &other.table,
            |v| self.hash_builder.hash_one(v),
            |a, b| a == b,
        )
    }
}

impl<T, S> Eq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
}

impl<T, S> Debug for HashSet<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S> HashSet<T, S> {
    /// Creates a new hash set with the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use robin_hash::HashSet;
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
    /// let mut set = HashSet::with_hasher(SimpleHasher);
    /// set.insert(7);
    /// assert!(set.contains(&7));
    /// ```
    pub const fn with_hasher(hash_builder: S) -> Self {
        Self::with_policy_and_hasher(GrowthPolicy::PowerOfTwo, hash_builder)
    }

    /// Creates an empty set that grows through `policy`.
    pub const fn with_policy_and_hasher(policy: GrowthPolicy, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_policy(policy),
            hash_builder,
        }
    }

    /// Creates a new hash set with exactly `capacity` slots and the given
    /// hasher builder.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hash_builder,
        }
    }

    /// Returns a reference to the set's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no elements.
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

    /// Largest slot count the set can grow to.
    pub fn max_bucket_count(&self) -> usize {
        self.table.max_bucket_count()
    }

    /// Current load factor, `len / capacity`.
    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    /// Load factor the set grows to stay under.
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

    /// The policy the set grows through.
    pub fn growth_policy(&self) -> GrowthPolicy {
        self.table.growth_policy()
    }

    /// Clears the set, keeping the allocated slots.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Shrinks the set to the smallest capacity its growth policy offers
    /// that still holds every element.
    pub fn shrink_to_fit(&mut self) {
        self.table.shrink_to_fit();
    }

    /// Reserves room for at least `additional` more elements.
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Fallible form of [`reserve`](Self::reserve).
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.table.try_reserve(additional)
    }

    /// Grows the set so that its slot count exceeds `target`.
    pub fn rehash(&mut self, target: usize) {
        self.table.rehash(target);
    }

    /// Fallible form of [`rehash`](Self::rehash).
    pub fn try_rehash(&mut self, target: usize) -> Result<(), Error> {
        self.table.try_rehash(target)
    }

    /// Returns an iterator over the elements of the set, in slot order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Clears the set, returning all elements as an iterator.
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::from([1, 2, 3, 4]);
    /// set.retain(|&x| x % 2 == 0);
    /// assert_eq!(set.len(), 2);
    /// assert!(set.contains(&2));
    /// assert!(set.contains(&4));
    /// # }
    /// ```
    pub fn retain(&mut self, mut f: impl FnMut(&T) -> bool) {
        self.table.retain(|v| f(v));
    }

    /// Returns a cursor on the first element in slot order.
    pub fn cursor_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut {
            inner: self.table.cursor_mut(),
        }
    }
}

impl<T, S> HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    #[inline]
    fn hash_value<Q>(&self, value: &Q) -> u64
    where
        Q: Hash + ?Sized,
    {
        self.hash_builder.hash_one(value)
    }

    /// Adds a value to the set.
    ///
    /// Returns `true` if the value was not already present. An equal value
    /// already in the set is left untouched.
    pub fn insert(&mut self, value: T) -> bool {
        let hash = self.hash_value(&value);
        match self.table.entry(hash, |v| v == &value) {
            TableEntry::Occupied(_) => false,
            TableEntry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    /// Adds a value to the set, replacing and returning an equal value if
    /// one was present.
    pub fn replace(&mut self, value: T) -> Option<T> {
        let hash = self.hash_value(&value);
        match self.table.entry(hash, |v| v == &value) {
            TableEntry::Occupied(mut entry) => Some(entry.insert(value)),
            TableEntry::Vacant(entry) => {
                entry.insert(value);
                None
            }
        }
    }

    /// Returns `true` if the set contains an element equal to `value`.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_value(value);
        self.table.contains(hash, |v| v.borrow() == value)
    }

    /// Returns the number of elements equal to `value`: `0` or `1`.
    pub fn count<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        usize::from(self.contains(value))
    }

    /// Returns a reference to the stored element equal to `value`.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_value(value);
        self.table.find(hash, |v| v.borrow() == value)
    }

    /// Removes an element from the set. Returns whether it was present.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.take(value).is_some()
    }

    /// Removes and returns the stored element equal to `value`.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_value(value);
        self.table.remove(hash, |v| v.borrow() == value)
    }

    /// Returns a cursor on the element equal to `value`, or on the ghost
    /// position if there is none.
    pub fn find_cursor_mut<Q>(&mut self, value: &Q) -> CursorMut<'_, T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_value(value);
        CursorMut {
            inner: self.table.find_cursor_mut(hash, |v| v.borrow() == value),
        }
    }

    /// Returns `true` if `self` has no elements in common with `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_hash::HashSet;
    ///
    /// let a: HashSet<i32> = HashSet::from([1, 2]);
    /// let b: HashSet<i32> = HashSet::from([3, 4]);
    /// assert!(a.is_disjoint(&b));
    /// # }
    /// ```
    pub fn is_disjoint(&self, other: &HashSet<T, S>) -> bool {
        if self.len() <= other.len() {
            self.iter().all(|v| !other.contains(v))
        } else {
            other.iter().all(|v| !self.contains(v))
        }
    }

    /// Returns `true` if `other` contains at least all the elements in
    /// `self`.
    pub fn is_subset(&self, other: &HashSet<T, S>) -> bool {
        if self.len() > other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }

    /// Returns `true` if `self` contains at least all the elements in
    /// `other`.
    pub fn is_superset(&self, other: &HashSet<T, S>) -> bool {
        other.is_subset(self)
    }

    /// Returns an iterator over the union of `self` and `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use robin_hash::HashSet;
    ///
    /// let a: HashSet<i32> = HashSet::from([1, 2]);
    /// let b: HashSet<i32> = HashSet::from([2, 3]);
    ///
    /// let mut union: Vec<_> = a.union(&b).copied().collect();
    /// union.sort();
    /// assert_eq!(union, [1, 2, 3]);
    /// # }
    /// ```
    pub fn union<'a>(&'a self, other: &'a HashSet<T, S>) -> Union<'a, T, S> {
        Union {
            iter: self.iter(),
            other_iter: other.iter(),
            this: self,
        }
    }

    /// Returns an iterator over the elements in both `self` and `other`.
    pub fn intersection<'a>(&'a self, other: &'a HashSet<T, S>) -> Intersection<'a, T, S> {
        if self.len() <= other.len() {
            Intersection {
                iter: self.iter(),
                other,
            }
        } else {
            Intersection {
                iter: other.iter(),
                other: self,
            }
        }
    }

    /// Returns an iterator over the elements in `self` but not in `other`.
    pub fn difference<'a>(&'a self, other: &'a HashSet<T, S>) -> Difference<'a, T, S> {
        Difference {
            iter: self.iter(),
            other,
        }
    }

    /// Returns an iterator over the elements in exactly one of the sets.
    pub fn symmetric_difference<'a>(
        &'a self,
        other: &'a HashSet<T, S>,
    ) -> SymmetricDifference<'a, T, S> {
        SymmetricDifference {
            iter: self.difference(other).chain(other.difference(self)),
        }
    }
}

impl<T, S> HashSet<T, S>
where
    S: Default,
{
    /// Creates an empty set using the default hasher builder.
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates a set with exactly `capacity` slots using the default hasher
    /// builder.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

impl<T, S> Default for HashSet<T, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> FromIterator<T> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T, S> Extend<T> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, S, const N: usize> From<[T; N]> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T, S> IntoIterator for HashSet<T, S> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a HashSet<T, S> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A mutable cursor over the elements of a [`HashSet`].
///
/// Elements are only exposed by shared reference, since changing them could
/// change their hash.
pub struct CursorMut<'a, T> {
    inner: crate::hash_table::CursorMut<'a, T>,
}

impl<T> CursorMut<'_, T> {
    /// The current element, or `None` on the ghost position.
    pub fn current(&self) -> Option<&T> {
        self.inner.current()
    }

    /// Advances to the next element in slot order.
    pub fn move_next(&mut self) {
        self.inner.move_next();
    }

    /// Moves back to the previous element in slot order.
    pub fn move_prev(&mut self) {
        self.inner.move_prev();
    }

    /// Removes the current element and returns it.
    pub fn remove_current(&mut self) -> Option<T> {
        self.inner.remove_current()
    }
}

/// An iterator over the elements of a `HashSet`.
pub struct Iter<'a, T> {
    inner: crate::hash_table::Iter<'a, T>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> core::iter::FusedIterator for Iter<'_, T> {}

/// A draining iterator over the elements of a `HashSet`.
pub struct Drain<'a, T> {
    inner: crate::hash_table::Drain<'a, T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}

/// An owning iterator over the elements of a `HashSet`.
pub struct IntoIter<T> {
    inner: crate::hash_table::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

/// An iterator over the union of two sets.
pub struct Union<'a, T, S> {
    iter: Iter<'a, T>,
    other_iter: Iter<'a, T>,
    this: &'a HashSet<T, S>,
}

impl<'a, T, S> Iterator for Union<'a, T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(v) = self.iter.next() {
            return Some(v);
        }
        loop {
            let v = self.other_iter.next()?;
            if !self.this.contains(v) {
                return Some(v);
            }
        }
    }
}

/// An iterator over the intersection of two sets.
pub struct Intersection<'a, T, S> {
    iter: Iter<'a, T>,
    other: &'a HashSet<T, S>,
}

impl<'a, T, S> Iterator for Intersection<'a, T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let v = self.iter.next()?;
            if self.other.contains(v) {
                return Some(v);
            }
        }
    }
}

/// An iterator over the difference of two sets.
pub struct Difference<'a, T, S> {
    iter: Iter<'a, T>,
    other: &'a HashSet<T, S>,
}

impl<'a, T, S> Iterator for Difference<'a, T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let v = self.iter.next()?;
            if !self.other.contains(v) {
                return Some(v);
            }
        }
    }
}

/// An iterator over the symmetric difference of two sets.
pub struct SymmetricDifference<'a, T, S> {
    iter: core::iter::Chain<Difference<'a, T, S>, Difference<'a, T, S>>,
}

impl<'a, T, S> Iterator for SymmetricDifference<'a, T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }
}

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
            Self {
                k1: OsRng.try_next_u64().unwrap_or(0),
                k2: OsRng.try_next_u64().unwrap_or(0),
            }
        }
    }

    fn sorted<'a>(values: impl Iterator<Item = &'a i32>) -> Vec<i32> {
        let mut values: Vec<i32> = values.copied().collect();
        values.sort_unstable();
        values
    }

    #[test]
    fn test_new_and_with_hasher() {
        let set: HashSet<i32, SipHashBuilder> = HashSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);

        let set2 = HashSet::<i32, _>::with_hasher(SipHashBuilder::default());
        assert!(set2.is_empty());
        assert_eq!(set2.capacity(), 0);
    }

    #[test]
    fn test_with_capacity() {
        let set: HashSet<i32, SipHashBuilder> = HashSet::with_capacity(100);
        assert_eq!(set.capacity(), 100);
        assert_eq!(set.bucket_count(), 100);
        assert!(set.is_empty());

        let set2 = HashSet::<i32, _>::with_capacity_and_hasher(200, SipHashBuilder::default());
        assert_eq!(set2.capacity(), 200);
    }

    #[test]
    fn test_insert_and_contains() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());

        assert!(set.insert(1));
        assert_eq!(set.len(), 1);
        assert!(!set.is_empty());
        assert!(set.contains(&1));

        assert!(!set.insert(1));
        assert_eq!(set.len(), 1);

        assert!(set.insert(2));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&2));
        assert!(!set.contains(&3));
        assert_eq!(set.count(&2), 1);
        assert_eq!(set.count(&3), 0);
    }

    #[test]
    fn test_remove_and_take() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        set.insert(1);
        set.insert(2);
        set.insert(3);

        assert!(set.remove(&2));
        assert_eq!(set.len(), 2);
        assert!(!set.contains(&2));
        assert!(!set.remove(&2));
        assert!(!set.remove(&4));

        assert_eq!(set.take(&3), Some(3));
        assert_eq!(set.take(&3), None);
        assert_eq!(set.len(), 1);
    }

    /// Equal under `Eq`/`Hash` by `id` only, so replacement is observable.
    #[derive(Debug, Clone)]
    struct Tagged {
        id: u32,
        tag: &'static str,
    }

    impl PartialEq for Tagged {
        fn eq(&self, other: &Self) -> bool {
            self.id == other.id
        }
    }

    impl Eq for Tagged {}

    impl core::hash::Hash for Tagged {
        fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
            self.id.hash(state);
        }
    }

    #[test]
    fn test_insert_keeps_and_replace_swaps() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        assert!(set.insert(Tagged { id: 1, tag: "first" }));
        assert!(!set.insert(Tagged { id: 1, tag: "second" }));
        assert_eq!(set.get(&Tagged { id: 1, tag: "" }).map(|t| t.tag), Some("first"));

        let old = set.replace(Tagged { id: 1, tag: "third" });
        assert_eq!(old.map(|t| t.tag), Some("first"));
        assert_eq!(set.get(&Tagged { id: 1, tag: "" }).map(|t| t.tag), Some("third"));
        assert_eq!(set.replace(Tagged { id: 2, tag: "new" }).map(|t| t.tag), None);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_borrowed_lookup() {
        let mut set: HashSet<String, SipHashBuilder> = HashSet::new();
        set.insert("alpha".to_string());
        assert!(set.contains("alpha"));
        assert_eq!(set.get("alpha").map(String::as_str), Some("alpha"));
        assert!(set.remove("alpha"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        for i in 0..10 {
            set.insert(i);
        }
        let capacity = set.capacity();
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.capacity(), capacity);
        assert!(!set.contains(&5));
    }

    #[test]
    fn test_capacity_control() {
        let mut set: HashSet<i32, SipHashBuilder> = HashSet::new();
        set.reserve(10);
        assert_eq!(set.capacity(), 32);
        set.rehash(40);
        assert_eq!(set.capacity(), 64);
        set.insert(1);
        set.shrink_to_fit();
        assert_eq!(set.capacity(), 2);
        assert_eq!(set.try_reserve(4), Ok(()));
        assert_eq!(set.try_rehash(100), Ok(()));
        assert_eq!(set.capacity(), 128);
        assert!(set.contains(&1));

        set.set_max_load_factor(1.0);
        assert_eq!(set.max_load_factor(), 1.0);
        assert_eq!(set.load_factor(), 1.0 / 128.0);
        assert!(set.max_bucket_count() >= 128);
    }

    #[test]
    fn test_prime_policy() {
        let mut set =
            HashSet::with_policy_and_hasher(GrowthPolicy::Prime, SipHashBuilder::default());
        set.extend(0..10);
        assert_eq!(set.growth_policy(), GrowthPolicy::Prime);
        assert_eq!(set.capacity(), 29);
        assert_eq!(sorted(set.iter()), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_iter_and_into_iter() {
        let set: HashSet<i32, SipHashBuilder> = (0..10).collect();
        assert_eq!(sorted(set.iter()), (0..10).collect::<Vec<_>>());
        assert_eq!(sorted(set.iter().rev()), (0..10).collect::<Vec<_>>());
        assert_eq!(set.iter().len(), 10);
        assert_eq!(sorted((&set).into_iter()), (0..10).collect::<Vec<_>>());

        let forward: Vec<i32> = set.iter().copied().collect();
        let mut backward: Vec<i32> = set.clone().into_iter().rev().collect();
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_drain() {
        let mut set: HashSet<i32, SipHashBuilder> = (0..10).collect();
        let mut drained: Vec<i32> = set.drain().collect();
        drained.sort_unstable();
        assert_eq!(drained, (0..10).collect::<Vec<_>>());
        assert!(set.is_empty());
        set.insert(5);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_retain() {
        let mut set: HashSet<i32, SipHashBuilder> = (0..100).collect();
        set.retain(|&x| x % 5 == 0);
        assert_eq!(set.len(), 20);
        assert!(set.iter().all(|x| x % 5 == 0));
    }

    #[test]
    fn test_cursor() {
        let mut set: HashSet<i32, SipHashBuilder> = (0..30).collect();
        let mut cursor = set.cursor_mut();
        while let Some(&value) = cursor.current() {
            if value >= 10 {
                assert_eq!(cursor.remove_current(), Some(value));
            } else {
                cursor.move_next();
            }
        }
        assert_eq!(sorted(set.iter()), (0..10).collect::<Vec<_>>());

        let mut cursor = set.find_cursor_mut(&3);
        assert_eq!(cursor.current(), Some(&3));
        cursor.move_prev();
        cursor.move_next();
        assert_eq!(cursor.current(), Some(&3));
        assert_eq!(set.find_cursor_mut(&42).current(), None);
    }

    #[test]
    fn test_equality() {
        let a: HashSet<i32, SipHashBuilder> = (0..20).collect();
        let mut b: HashSet<i32, SipHashBuilder> = (0..20).rev().collect();
        assert_eq!(a, b);
        b.remove(&0);
        assert_ne!(a, b);
        b.insert(100);
        assert_ne!(a, b);
    }

    #[test]
    fn test_debug_and_from_array() {
        let set: HashSet<i32, SipHashBuilder> = HashSet::from([7]);
        assert_eq!(alloc::format!("{set:?}"), "{7}");
        let empty: HashSet<i32, SipHashBuilder> = HashSet::default();
        assert_eq!(alloc::format!("{empty:?}"), "{}");
    }

    #[test]
    fn test_string_values() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        for n in 0..100 {
            assert!(set.insert(n.to_string()));
        }
        for n in 0..100 {
            assert!(set.contains(n.to_string().as_str()));
        }
        for n in 0..100 {
            assert!(set.remove(n.to_string().as_str()));
        }
        assert!(set.is_empty());
    }

    #[test]
    fn test_insert_remove_cycle() {
        let mut set = HashSet::with_hasher(SipHashBuilder::default());
        for round in 0..5 {
            for i in 0..200 {
                assert!(set.insert(i + round));
            }
            for i in 0..200 {
                assert!(set.remove(&(i + round)));
            }
            assert!(set.is_empty());
        }
    }

    #[test]
    fn test_is_disjoint() {
        let mut a: HashSet<i32, SipHashBuilder> = HashSet::from([1, 2, 3]);
        let mut b: HashSet<i32, SipHashBuilder> = HashSet::from([4, 5, 6]);
        assert!(a.is_disjoint(&b));
        assert!(b.is_disjoint(&a));

        b.insert(2);
        assert!(!a.is_disjoint(&b));
        a.insert(9);
        assert!(!b.is_disjoint(&a));
    }

    #[test]
    fn test_subset_and_superset() {
        let a: HashSet<i32, SipHashBuilder> = HashSet::from([1, 2]);
        let b: HashSet<i32, SipHashBuilder> = HashSet::from([1, 2, 3]);

        assert!(a.is_subset(&b));
        assert!(!b.is_subset(&a));
        assert!(a.is_subset(&a));
        assert!(b.is_superset(&a));
        assert!(!a.is_superset(&b));
    }

    #[test]
    fn test_set_algebra() {
        let a: HashSet<i32, SipHashBuilder> = HashSet::from([1, 2, 3]);
        let b: HashSet<i32, SipHashBuilder> = HashSet::from([3, 4, 5]);

        assert_eq!(sorted(a.union(&b)), [1, 2, 3, 4, 5]);
        assert_eq!(sorted(a.intersection(&b)), [3]);
        assert_eq!(sorted(b.intersection(&a)), [3]);
        assert_eq!(sorted(a.difference(&b)), [1, 2]);
        assert_eq!(sorted(b.difference(&a)), [4, 5]);
        assert_eq!(sorted(a.symmetric_difference(&b)), [1, 2, 4, 5]);
        assert_eq!(vec![0; 0], sorted(a.difference(&a)));
    }
}
