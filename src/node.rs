use crate::slot::Slot;

/// Cached hash of an empty node.
const EMPTY_HASH: u64 = 0;

/// A single table position: occupancy, the cached hash of the stored value
/// and the value itself.
///
/// The node is occupied exactly when its slot holds a value, and the cached
/// hash is `EMPTY_HASH` whenever it is empty.
#[derive(Clone)]
pub(crate) struct Node<V> {
    hash: u64,
    slot: Slot<V>,
}

impl<V> Node<V> {
    #[inline(always)]
    pub(crate) const fn new() -> Self {
        Node {
            hash: EMPTY_HASH,
            slot: Slot::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn occupied(hash: u64, value: V) -> Self {
        let mut node = Self::new();
        node.set_data(hash, value);
        node
    }

    #[inline(always)]
    pub(crate) fn is_empty(&self) -> bool {
        !self.slot.is_occupied()
    }

    #[inline(always)]
    pub(crate) fn hash(&self) -> u64 {
        self.hash
    }

    #[inline(always)]
    pub(crate) fn value(&self) -> Option<&V> {
        self.slot.get()
    }

    #[inline(always)]
    pub(crate) fn value_mut(&mut self) -> Option<&mut V> {
        self.slot.get_mut()
    }

    /// Stores `value` in an empty node and returns a reference to it.
    #[inline(always)]
    pub(crate) fn construct(&mut self, hash: u64, value: V) -> &mut V {
        self.hash = hash;
        self.slot.construct(value)
    }

    /// Replaces the node's contents, returning the previous value if the
    /// node was occupied.
    ///
    /// The old value is moved out before the new one is stored, so the node
    /// never holds two values and never observes a half-written state.
    #[inline]
    pub(crate) fn set_data(&mut self, hash: u64, value: V) -> Option<V> {
        let previous = self.clear();
        self.construct(hash, value);
        previous
    }

    /// Empties the node, returning its value if it was occupied.
    #[inline]
    pub(crate) fn clear(&mut self) -> Option<V> {
        self.hash = EMPTY_HASH;
        self.slot.destruct()
    }

    /// Moves this node's full state out, leaving it empty.
    #[inline(always)]
    pub(crate) fn take(&mut self) -> Self {
        core::mem::take(self)
    }

    #[inline(always)]
    pub(crate) fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// Borrows the value of a node the caller knows to be occupied.
    #[inline(always)]
    pub(crate) fn live(&self) -> &V {
        match self.slot.get() {
            Some(value) => value,
            None => unreachable!("live access to an empty node"),
        }
    }

    #[inline(always)]
    pub(crate) fn live_mut(&mut self) -> &mut V {
        match self.slot.get_mut() {
            Some(value) => value,
            None => unreachable!("live access to an empty node"),
        }
    }

    #[inline(always)]
    pub(crate) fn into_value(mut self) -> Option<V> {
        self.slot.destruct()
    }
}

impl<V> Default for Node<V> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}
