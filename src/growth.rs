//! Capacity growth policies.

/// Ascending primes used by [`GrowthPolicy::Prime`], sized to the target's
/// address width.
#[cfg(target_pointer_width = "64")]
const PRIMES: &[usize] = &[
    1,
    5,
    17,
    29,
    37,
    53,
    67,
    79,
    97,
    131,
    193,
    257,
    389,
    521,
    769,
    1031,
    1543,
    2053,
    3079,
    6151,
    12289,
    24593,
    49157,
    98317,
    196613,
    393241,
    786433,
    1572869,
    3145739,
    6291469,
    12582917,
    25165843,
    50331653,
    100663319,
    201326611,
    402653189,
    805306457,
    1610612741,
    3221225473,
    4294967291,
    6442450939,
    12884901893,
    25769803751,
    51539607551,
    103079215111,
    206158430209,
    412316860441,
    824633720831,
    1649267441651,
    3298534883309,
    6597069766657,
];

#[cfg(target_pointer_width = "32")]
const PRIMES: &[usize] = &[
    1, 5, 17, 29, 37, 53, 67, 79, 97, 131, 193, 257, 389, 521, 769, 1031, 1543, 2053, 3079, 6151,
    12289, 24593, 49157, 98317, 196613, 393241, 786433, 1572869, 3145739, 6291469, 12582917,
    25165843, 50331653, 100663319, 201326611, 402653189, 805306457, 1610612741,
];

#[cfg(target_pointer_width = "16")]
const PRIMES: &[usize] = &[
    1, 5, 17, 29, 37, 53, 67, 79, 97, 131, 193, 257, 389, 521, 769, 1031, 1543, 2053, 3079, 6151,
    12289, 24593,
];

/// Strategy used to pick the next bucket count when a table grows.
///
/// The policy is fixed when a table is created and carried over to every
/// table it is rehashed into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GrowthPolicy {
    /// Double the bucket count (`max(current, 1) * 2`).
    #[default]
    PowerOfTwo,
    /// Step through a fixed table of primes.
    ///
    /// Growth saturates once the largest tabulated prime is reached: the
    /// policy then returns the current capacity unchanged.
    Prime,
}

impl GrowthPolicy {
    /// Returns the bucket count that follows `current`.
    ///
    /// A return value equal to `current` means the policy cannot grow any
    /// further.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use robin_hash::GrowthPolicy;
    ///
    /// assert_eq!(GrowthPolicy::PowerOfTwo.next_capacity(0), 2);
    /// assert_eq!(GrowthPolicy::PowerOfTwo.next_capacity(8), 16);
    /// assert_eq!(GrowthPolicy::Prime.next_capacity(0), 1);
    /// assert_eq!(GrowthPolicy::Prime.next_capacity(17), 29);
    /// ```
    #[inline]
    pub fn next_capacity(self, current: usize) -> usize {
        match self {
            GrowthPolicy::PowerOfTwo => current.max(1).checked_mul(2).unwrap_or(current),
            GrowthPolicy::Prime => PRIMES
                .iter()
                .copied()
                .find(|&prime| prime > current)
                .unwrap_or(current),
        }
    }

    /// Steps the policy from `current` until the result is strictly greater
    /// than `target`, or until the policy saturates.
    pub fn next_capacity_above(self, current: usize, target: usize) -> usize {
        let mut capacity = current;
        while capacity <= target {
            let next = self.next_capacity(capacity);
            if next == capacity {
                log::trace!("{self:?} growth saturated at {capacity} buckets");
                break;
            }
            capacity = next;
        }
        capacity
    }

    /// Largest bucket count this policy can ever produce.
    pub(crate) fn max_capacity(self) -> usize {
        match self {
            GrowthPolicy::PowerOfTwo => 1 << (usize::BITS - 1),
            GrowthPolicy::Prime => PRIMES[PRIMES.len() - 1],
        }
    }
}
