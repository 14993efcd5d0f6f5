//! Merging of overlapping same-label clusters.
//!
//! Ground truth often spells one large equivalence class (a current mirror
//! bank, say) as many overlapping pairs such as `[m28, m7]`, `[m28, m9]`.
//! Collapsing each connected component into a single cluster keeps a predictor
//! that proposes the whole bank from being penalized for the decomposition.

use crate::core::{Cluster, ComponentId, Partition};
use std::collections::HashMap;
use tracing::debug;

/// Disjoint-set forest over dense indices, with path compression and
/// union by rank.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }

        root
    }

    /// Returns false when both were already in the same set
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }

        match self.rank[root_a].cmp(&self.rank[root_b]) {
            std::cmp::Ordering::Less => self.parent[root_a] = root_b,
            std::cmp::Ordering::Greater => self.parent[root_b] = root_a,
            std::cmp::Ordering::Equal => {
                self.parent[root_b] = root_a;
                self.rank[root_a] += 1;
            }
        }
        true
    }

    pub fn connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }
}

/// Bidirectional component <-> index mapping, in first-seen order.
#[derive(Debug, Default)]
struct ComponentArena {
    ids: Vec<ComponentId>,
    index: HashMap<ComponentId, usize>,
}

impl ComponentArena {
    fn intern(&mut self, id: &ComponentId) -> usize {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.ids.len();
        self.ids.push(id.clone());
        self.index.insert(id.clone(), idx);
        idx
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}

/// Collapse every connected group of `target_label` clusters into one cluster.
///
/// Clusters with other labels keep their relative order and come first; the
/// merged clusters follow, ordered by the first appearance of any of their
/// members. Empty `target_label` clusters vanish.
pub fn merge_same_label(partition: &Partition, target_label: &str) -> Partition {
    let (targets, others): (Vec<&Cluster>, Vec<&Cluster>) = partition
        .iter()
        .partition(|cluster| cluster.label == target_label);

    if targets.is_empty() {
        return partition.clone();
    }

    let mut arena = ComponentArena::default();
    let hubs_and_spokes: Vec<Vec<usize>> = targets
        .iter()
        .map(|cluster| cluster.members.iter().map(|m| arena.intern(m)).collect())
        .collect();

    let mut forest = UnionFind::new(arena.len());
    for members in &hubs_and_spokes {
        if let Some((&hub, spokes)) = members.split_first() {
            for &spoke in spokes {
                forest.union(hub, spoke);
            }
        }
    }

    let mut group_of_root: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<Vec<ComponentId>> = Vec::new();
    for (idx, id) in arena.ids.iter().enumerate() {
        let root = forest.find(idx);
        let group = *group_of_root.entry(root).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[group].push(id.clone());
    }

    debug!(
        label = target_label,
        before = targets.len(),
        after = groups.len(),
        "merged overlapping clusters"
    );

    others
        .into_iter()
        .cloned()
        .chain(groups.into_iter().map(|members| Cluster {
            label: target_label.to_string(),
            members,
        }))
        .collect()
}

/// Apply [`merge_same_label`] for each label in turn
pub fn merge_labels(partition: &Partition, labels: &[String]) -> Partition {
    labels
        .iter()
        .fold(partition.clone(), |acc, label| merge_same_label(&acc, label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn names(cluster: &Cluster) -> Vec<&str> {
        cluster.members.iter().map(|m| m.as_str()).collect()
    }

    #[test]
    fn test_union_find_basics() {
        let mut uf = UnionFind::new(5);
        assert!(uf.union(0, 1));
        assert!(uf.union(3, 4));
        assert!(!uf.union(1, 0));
        assert!(uf.connected(0, 1));
        assert!(!uf.connected(1, 3));
        assert!(uf.union(1, 4));
        assert!(uf.connected(0, 3));
        assert!(!uf.connected(2, 0));
    }

    #[test]
    fn test_find_compresses_long_chains() {
        let mut uf = UnionFind::new(1000);
        for i in 1..1000 {
            uf.union(i - 1, i);
        }
        let root = uf.find(999);
        assert!((0..1000).all(|i| uf.find(i) == root));
    }

    #[test]
    fn test_star_pairs_collapse_into_one_cluster() {
        let partition = Partition::new(vec![
            Cluster::new("DiffPair", ["m17", "m18"]),
            Cluster::new("CM", ["m14", "m3"]),
            Cluster::new("CM", ["m14", "m4"]),
            Cluster::new("CM", ["m14", "m11"]),
            Cluster::new("CM", ["m2", "m9"]),
            Cluster::new("CM", ["m2", "m10"]),
        ]);

        let merged = merge_same_label(&partition, "CM");

        assert_eq!(merged.len(), 3);
        assert_eq!(merged.clusters()[0].label, "DiffPair");
        assert_eq!(names(&merged.clusters()[1]), vec!["m14", "m3", "m4", "m11"]);
        assert_eq!(names(&merged.clusters()[2]), vec!["m2", "m9", "m10"]);
    }

    #[test]
    fn test_transitive_chains_merge() {
        let partition = Partition::new(vec![
            Cluster::new("CM", ["a", "b"]),
            Cluster::new("CM", ["c", "d"]),
            Cluster::new("CM", ["b", "c"]),
        ]);
        let merged = merge_same_label(&partition, "CM");
        assert_eq!(merged.len(), 1);
        assert_eq!(names(&merged.clusters()[0]), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_other_labels_pass_through_in_order() {
        let partition = Partition::new(vec![
            Cluster::new("CM", ["m1", "m2"]),
            Cluster::new("Inverter", ["m1", "m5"]),
            Cluster::new("DiffPair", ["m6", "m7"]),
            Cluster::new("Inverter", ["m2", "m8"]),
        ]);
        let merged = merge_same_label(&partition, "CM");
        let labels: Vec<&str> = merged.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Inverter", "DiffPair", "Inverter", "CM"]);
        assert_eq!(names(&merged.clusters()[0]), vec!["m1", "m5"]);
    }

    #[test]
    fn test_missing_label_returns_input() {
        let partition = Partition::new(vec![Cluster::new("Inverter", ["m1", "m2"])]);
        assert_eq!(merge_same_label(&partition, "CM"), partition);
    }

    #[test]
    fn test_empty_target_clusters_vanish() {
        let partition = Partition::new(vec![
            Cluster::new("CM", Vec::<&str>::new()),
            Cluster::new("CM", ["m1"]),
        ]);
        let merged = merge_same_label(&partition, "CM");
        assert_eq!(merged.len(), 1);
        assert_eq!(names(&merged.clusters()[0]), vec!["m1"]);
    }

    #[test]
    fn test_merged_clusters_are_disjoint() {
        let partition = Partition::new(vec![
            Cluster::new("CM", ["m28", "m7"]),
            Cluster::new("CM", ["m28", "m9"]),
            Cluster::new("CM", ["m5", "m14"]),
            Cluster::new("CM", ["m5", "m15"]),
            Cluster::new("CM", ["m25", "m1"]),
            Cluster::new("CM", ["m7", "m7"]),
        ]);
        let merged = merge_same_label(&partition, "CM");

        let mut seen = HashSet::new();
        for cluster in merged.iter() {
            for member in &cluster.members {
                assert!(seen.insert(member.clone()), "{member} appears twice");
            }
        }
        assert_eq!(seen.len(), 8);
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_merge_labels_applies_each_label() {
        let partition = Partition::new(vec![
            Cluster::new("CM", ["m1", "m2"]),
            Cluster::new("CM", ["m2", "m3"]),
            Cluster::new("Inverter", ["m4", "m5"]),
            Cluster::new("Inverter", ["m5", "m6"]),
        ]);
        let merged = merge_labels(&partition, &["CM".to_string(), "Inverter".to_string()]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.clusters()[0].label, "CM");
        assert_eq!(merged.clusters()[1].label, "Inverter");
    }
}
