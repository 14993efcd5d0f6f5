use crate::core::{ClusterKey, ComponentId, Partition};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Every `(label, instance_id)` of the clusters holding one component.
///
/// Keys are kept as a set, so malformed input that lists a component twice in
/// the same cluster still yields a single entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipRecord {
    keys: BTreeSet<ClusterKey>,
}

impl MembershipRecord {
    /// Returns false when the key was already recorded
    pub fn insert(&mut self, key: ClusterKey) -> bool {
        self.keys.insert(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &ClusterKey> {
        self.keys.iter()
    }

    /// The membership with the lowest instance id, i.e. the first cluster of
    /// the partition that lists this component.
    pub fn first(&self) -> Option<&ClusterKey> {
        self.keys.iter().next()
    }

    pub fn labels(&self) -> BTreeSet<&str> {
        self.keys.iter().map(|k| k.label.as_str()).collect()
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.keys.iter().any(|k| k.label == label)
    }

    pub fn contains(&self, key: &ClusterKey) -> bool {
        self.keys.contains(key)
    }

    /// Cluster keys present in both records
    pub fn shared_keys<'a>(&'a self, other: &'a Self) -> impl Iterator<Item = &'a ClusterKey> {
        self.keys.intersection(&other.keys)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Component -> membership lookup for a single partition.
///
/// Built fresh for every scoring call and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct ClusterMembershipIndex {
    records: HashMap<ComponentId, MembershipRecord>,
}

impl ClusterMembershipIndex {
    pub fn build(partition: &Partition) -> Self {
        let mut records: HashMap<ComponentId, MembershipRecord> = HashMap::new();

        for (key, cluster) in partition.keyed() {
            for member in &cluster.members {
                records
                    .entry(member.clone())
                    .or_default()
                    .insert(key.clone());
            }
        }

        Self { records }
    }

    pub fn get(&self, component: &ComponentId) -> Option<&MembershipRecord> {
        self.records.get(component)
    }

    pub fn contains(&self, component: &ComponentId) -> bool {
        self.records.contains_key(component)
    }

    /// Number of distinct components
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn components(&self) -> impl Iterator<Item = &ComponentId> {
        self.records.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ComponentId, &MembershipRecord)> {
        self.records.iter()
    }

    /// Inverts the index: distinct members of every cluster, keyed by cluster.
    pub fn members_by_cluster(&self) -> BTreeMap<&ClusterKey, BTreeSet<&ComponentId>> {
        let mut clusters: BTreeMap<&ClusterKey, BTreeSet<&ComponentId>> = BTreeMap::new();
        for (component, record) in &self.records {
            for key in record.keys() {
                clusters.entry(key).or_default().insert(component);
            }
        }
        clusters
    }
}
