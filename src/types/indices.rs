//! Index newtypes for graph nodes and CSR entries.
//!
//! Both are plain `usize` in the storage layer; the newtypes keep them apart
//! in public lookups such as [`Graph::find_entry`](crate::graph::Graph::find_entry).

use std::fmt;

macro_rules! index_newtype {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            #[inline]
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Raw position.
            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(index: $name) -> usize {
                index.0
            }
        }
    };
}

index_newtype!(
    /// Node of the computational graph.
    ///
    /// ```
    /// use convex_idp::types::NodeIndex;
    ///
    /// let node = NodeIndex::new(7);
    /// assert_eq!(node.get(), 7);
    /// assert_eq!(node.to_string(), "node 7");
    /// ```
    NodeIndex,
    "node "
);

index_newtype!(
    /// Off-diagonal entry (i, j) in CSR order. c_ij, d_ij, l_ij and P_ij
    /// share the entry position.
    EntryIndex,
    "entry "
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_conversion() {
        let e = EntryIndex::new(3);
        assert_eq!(e.to_string(), "entry 3");
        assert_eq!(usize::from(e), 3);
        assert!(NodeIndex::new(1) < NodeIndex::new(2));
    }
}
