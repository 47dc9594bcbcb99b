/// Storage for at most one value.
///
/// A `Slot` carries no bookkeeping of its own beyond the presence of the
/// value: whether a value *should* be live here is decided by the owning
/// [`Node`](crate::node::Node), which keeps its cached hash in sync with the
/// slot.
#[derive(Clone)]
pub(crate) struct Slot<V> {
    value: Option<V>,
}

impl<V> Slot<V> {
    #[inline(always)]
    pub(crate) const fn new() -> Self {
        Slot { value: None }
    }

    /// Stores `value` in the slot.
    ///
    /// The slot must be empty; constructing over a live value is a caller
    /// bug.
    #[inline(always)]
    pub(crate) fn construct(&mut self, value: V) -> &mut V {
        debug_assert!(self.value.is_none(), "construct over a live value");
        self.value.insert(value)
    }

    /// Moves the live value out, leaving the slot empty.
    #[inline(always)]
    pub(crate) fn destruct(&mut self) -> Option<V> {
        self.value.take()
    }

    #[inline(always)]
    pub(crate) fn is_occupied(&self) -> bool {
        self.value.is_some()
    }

    #[inline(always)]
    pub(crate) fn get(&self) -> Option<&V> {
        self.value.as_ref()
    }

    #[inline(always)]
    pub(crate) fn get_mut(&mut self) -> Option<&mut V> {
        self.value.as_mut()
    }
}

impl<V> Default for Slot<V> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn construct_then_destruct() {
        let mut slot: Slot<String> = Slot::new();
        assert!(!slot.is_occupied());
        assert_eq!(slot.get(), None);

        slot.construct("value".to_string()).push_str("!");
        assert!(slot.is_occupied());
        assert_eq!(slot.get().map(String::as_str), Some("value!"));

        assert_eq!(slot.destruct(), Some("value!".to_string()));
        assert!(!slot.is_occupied());
        assert_eq!(slot.destruct(), None);
    }

    #[test]
    fn destruct_releases_value() {
        let shared = Rc::new(7);
        let mut slot = Slot::new();
        slot.construct(Rc::clone(&shared));
        assert_eq!(Rc::strong_count(&shared), 2);

        drop(slot.destruct());
        assert_eq!(Rc::strong_count(&shared), 1);

        slot.construct(Rc::clone(&shared));
        drop(slot);
        assert_eq!(Rc::strong_count(&shared), 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "construct over a live value")]
    fn double_construct_is_caught() {
        let mut slot = Slot::new();
        slot.construct(1);
        slot.construct(2);
    }
}
