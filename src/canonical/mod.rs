//! Ground-truth canonicalization applied before scoring.

pub mod union_find;

pub use union_find::{merge_labels, merge_same_label, UnionFind};
