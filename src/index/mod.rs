//! Per-partition lookup from component to the clusters containing it.

pub mod membership;

pub use membership::{ClusterMembershipIndex, MembershipRecord};
