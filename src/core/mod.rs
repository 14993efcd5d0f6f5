pub mod validation;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Case-insensitive identifier of a grouped element (e.g. a transistor name).
///
/// The raw string is lower-cased on construction, so equality, hashing and
/// ordering all operate on the normalized form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ComponentId(String);

impl ComponentId {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ComponentId {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for ComponentId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<ComponentId> for String {
    fn from(id: ComponentId) -> Self {
        id.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies one cluster inside one partition: its label plus its
/// zero-based position. Instance ids are partition-local.
///
/// Ordering compares the instance id first, so the smallest key in a set is
/// the earliest cluster of the partition.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClusterKey {
    pub instance_id: usize,
    pub label: String,
}

impl ClusterKey {
    pub fn new(label: impl Into<String>, instance_id: usize) -> Self {
        Self {
            instance_id,
            label: label.into(),
        }
    }
}

impl fmt::Display for ClusterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.label, self.instance_id)
    }
}

/// A named functional group. Labels compare case-sensitively.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub label: String,
    pub members: Vec<ComponentId>,
}

impl Cluster {
    pub fn new<I, S>(label: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            label: label.into(),
            members: members.into_iter().map(ComponentId::new).collect(),
        }
    }

    /// Distinct members; repeated entries collapse.
    pub fn member_set(&self) -> HashSet<&ComponentId> {
        self.members.iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Ordered sequence of clusters. Position in the sequence is the instance id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Partition {
    clusters: Vec<Cluster>,
}

impl Partition {
    pub fn new(clusters: Vec<Cluster>) -> Self {
        Self { clusters }
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn into_clusters(self) -> Vec<Cluster> {
        self.clusters
    }

    pub fn push(&mut self, cluster: Cluster) {
        self.clusters.push(cluster);
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cluster> {
        self.clusters.iter()
    }

    /// Label of the first cluster, if any
    pub fn first_label(&self) -> Option<&str> {
        self.clusters.first().map(|c| c.label.as_str())
    }

    /// Clusters paired with their partition-local key
    pub fn keyed(&self) -> impl Iterator<Item = (ClusterKey, &Cluster)> {
        self.clusters
            .iter()
            .enumerate()
            .map(|(id, cluster)| (ClusterKey::new(cluster.label.clone(), id), cluster))
    }

    /// Every distinct component appearing in any cluster
    pub fn components(&self) -> HashSet<&ComponentId> {
        self.clusters.iter().flat_map(|c| c.members.iter()).collect()
    }
}

impl FromIterator<Cluster> for Partition {
    fn from_iter<T: IntoIterator<Item = Cluster>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Partition {
    type Item = &'a Cluster;
    type IntoIter = std::slice::Iter<'a, Cluster>;

    fn into_iter(self) -> Self::IntoIter {
        self.clusters.iter()
    }
}
