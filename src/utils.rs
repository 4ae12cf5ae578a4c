use fnv::FnvBuildHasher;
use std::collections::HashSet;
use std::hash::Hash;

/// Hash set keyed by small values such as cell indices or key names.
pub type FnvHashSet<T> = HashSet<T, FnvBuildHasher>;

/// An empty set with room for `capacity` entries.
pub fn fnv_hashset<T: Hash + Eq>(capacity: usize) -> FnvHashSet<T> {
    HashSet::with_capacity_and_hasher(capacity, FnvBuildHasher::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn behaves_like_a_set() {
        let mut set = fnv_hashset(4);
        assert!(set.insert(3usize));
        assert!(!set.insert(3));
        assert!(set.contains(&3));
        assert!(set.capacity() >= 4);
    }
}
