//! Options merge engine
//!
//! Containers recurse field by field, leaves are [`Param`](crate::Param)s, and
//! list-valued fields are held in a `Param<Vec<_>>` so they are always replaced
//! wholesale rather than merged element-wise.

use std::collections::BTreeMap;

/// How a merge treats values already present in the receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Values present in the source overwrite the receiver
    Overlay,
    /// Only values missing from the receiver are taken from the source
    FillDefaults,
}

/// Deep merge of two option nodes of the same type
pub trait Merge {
    /// Merge `other` into `self` using `mode`
    fn merge(&mut self, other: &Self, mode: MergeMode);

    /// Overlay merge, used for `mergeOptions` commands
    fn merge_with(&mut self, other: &Self) {
        self.merge(other, MergeMode::Overlay);
    }

    /// Fill-defaults merge, used for default and ancestor options
    fn merge_with_default(&mut self, defaults: &Self) {
        self.merge(defaults, MergeMode::FillDefaults);
    }
}

impl<V: Merge + Default> Merge for BTreeMap<String, V> {
    fn merge(&mut self, other: &Self, mode: MergeMode) {
        for (key, value) in other {
            self.entry(key.clone()).or_default().merge(value, mode);
        }
    }
}

/// Implement [`Merge`] for a struct by merging each listed field
macro_rules! impl_merge {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::merge::Merge for $ty {
            fn merge(&mut self, other: &Self, mode: $crate::merge::MergeMode) {
                $( $crate::merge::Merge::merge(&mut self.$field, &other.$field, mode); )*
            }
        }
    };
}

pub(crate) use impl_merge;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Number, Param};

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Node {
        a: Number,
        b: Number,
        list: Param<Vec<i32>>,
    }

    impl_merge!(Node { a, b, list });

    #[test]
    fn test_struct_overlay() {
        let mut node = Node { a: Param::Set(1), b: Param::Set(2), list: Param::Set(vec![1, 2]) };
        let other = Node { a: Param::Unset, b: Param::Set(5), list: Param::Set(vec![9]) };

        node.merge_with(&other);
        assert_eq!(node.a, Param::Set(1));
        assert_eq!(node.b, Param::Set(5));
        assert_eq!(node.list, Param::Set(vec![9]));
    }

    #[test]
    fn test_struct_fill_defaults() {
        let mut node = Node { a: Param::Set(1), ..Default::default() };
        let defaults = Node { a: Param::Set(7), b: Param::Set(8), list: Param::Set(vec![3]) };

        node.merge_with_default(&defaults);
        assert_eq!(node.a, Param::Set(1));
        assert_eq!(node.b, Param::Inherited(8));
        assert_eq!(node.list, Param::Inherited(vec![3]));
    }

    #[test]
    fn test_map_merge_per_key() {
        let mut map: BTreeMap<String, Number> = BTreeMap::new();
        map.insert("x".to_string(), Param::Set(1));

        let mut other: BTreeMap<String, Number> = BTreeMap::new();
        other.insert("x".to_string(), Param::Set(2));
        other.insert("y".to_string(), Param::Set(3));

        map.merge_with_default(&other);
        assert_eq!(map["x"], Param::Set(1));
        assert_eq!(map["y"], Param::Inherited(3));

        map.merge_with(&other);
        assert_eq!(map["x"], Param::Set(2));
    }
}
