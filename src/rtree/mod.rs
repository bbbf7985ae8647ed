//! R-tree spatial index: Guttman insertion and quadratic split, condense-tree
//! deletion, intersection queries, and nearest-neighbor search with
//! MinDist/MinMaxDist pruning.
//!
//! The tree is guarded by a single [`parking_lot::RwLock`]: readers
//! (queries) run concurrently with each other, writers (insert/delete/move)
//! take the tree exclusively. There is no per-node locking — at this tree
//! size that would cost more in contention than it saves in parallelism.

mod config;
mod node;

pub use config::RTreeConfig;
use node::{quadratic_split, Entry, EntryData, Node};

use std::cmp::Ordering;

use parking_lot::RwLock;

use crate::geometry::{Aabb, Point, Spatial};

/// A concurrent R-tree over values of type `T`.
pub struct RTree<T> {
    root: RwLock<Node<T>>,
    config: RTreeConfig,
}

impl<T: Spatial + Clone + PartialEq> RTree<T> {
    pub fn new(config: RTreeConfig) -> Self {
        Self { root: RwLock::new(Node::new_leaf()), config }
    }

    /// Inserts `item`, splitting nodes bottom-up as needed (Guttman's
    /// `Insert`/`AdjustTree`).
    pub fn insert(&self, item: T) {
        let mut root = self.root.write();
        let entry = Entry { bounds: item.bounds(), data: EntryData::Leaf(item) };
        if let Some(sibling) = insert_entry(&mut root, entry, &self.config) {
            let new_level = root.level + 1;
            let old_bounds = root.bounds();
            let old_node = std::mem::replace(&mut *root, Node::new_internal(new_level));
            root.entries.push(Entry { bounds: old_bounds, data: EntryData::Child(Box::new(old_node)) });
            root.entries.push(sibling);
        }
    }

    /// Removes the first entry equal to `item`, condensing the tree and
    /// reinserting any orphaned siblings of an underflowed node. Returns
    /// `false` if `item` was not present.
    pub fn delete(&self, item: &T) -> bool {
        let bounds = item.bounds();
        let mut orphans = Vec::new();
        let removed = {
            let mut root = self.root.write();
            let removed = delete_entry(&mut root, item, &bounds, self.config.min_children, &mut orphans);
            if removed {
                while !root.leaf && root.entries.len() == 1 {
                    let only = root.entries.pop().expect("checked len == 1 above");
                    if let EntryData::Child(child) = only.data {
                        *root = *child;
                    }
                }
            }
            removed
        };

        if removed {
            for orphan in orphans {
                self.insert(orphan);
            }
        }
        removed
    }

    /// Removes `old` and inserts `new_item`. A no-op returning `false` if
    /// `old` was not present (so `new_item` is not silently dropped).
    pub fn move_object(&self, old: &T, new_item: T) -> bool {
        if self.delete(old) {
            self.insert(new_item);
            true
        } else {
            false
        }
    }

    /// All items whose bounding box intersects `query`.
    pub fn intersection_query(&self, query: &Aabb) -> Vec<T> {
        let root = self.root.read();
        let mut results = Vec::new();
        search(&root, query, &mut results);
        results
    }

    /// The single nearest item to `point`, if the tree is non-empty.
    pub fn nearest(&self, point: Point) -> Option<T> {
        self.k_nearest(point, 1).into_iter().next()
    }

    /// The `k` nearest items to `point`, nearest first.
    pub fn k_nearest(&self, point: Point, k: usize) -> Vec<T> {
        if k == 0 {
            return Vec::new();
        }
        let root = self.root.read();
        let mut buffer = NearestBuffer { k, items: Vec::with_capacity(k) };
        knn_search(&root, &point, &mut buffer);
        buffer.items.into_iter().map(|(_, item)| item).collect()
    }

    pub fn len(&self) -> usize {
        let root = self.root.read();
        count(&root)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn count<T>(node: &Node<T>) -> usize {
    if node.leaf {
        node.entries.len()
    } else {
        node.entries
            .iter()
            .map(|e| match &e.data {
                EntryData::Child(child) => count(child),
                EntryData::Leaf(_) => 1,
            })
            .sum()
    }
}

fn choose_subtree<T>(node: &Node<T>, bounds: &Aabb) -> usize {
    let mut best = 0;
    let mut best_enlargement = f64::INFINITY;
    let mut best_area = f64::INFINITY;
    for (i, entry) in node.entries.iter().enumerate() {
        let merged = entry.bounds.union(bounds);
        let enlargement = merged.volume() - entry.bounds.volume();
        if enlargement < best_enlargement
            || (enlargement == best_enlargement && merged.volume() < best_area)
        {
            best_enlargement = enlargement;
            best_area = merged.volume();
            best = i;
        }
    }
    best
}

/// Inserts `entry` into `node`'s subtree, splitting `node` itself if it now
/// overflows. Returns the new sibling entry when a split occurred, for the
/// caller to absorb (and potentially split itself, or grow the tree).
fn insert_entry<T: Spatial>(node: &mut Node<T>, entry: Entry<T>, config: &RTreeConfig) -> Option<Entry<T>> {
    if node.leaf {
        node.entries.push(entry);
    } else {
        let idx = choose_subtree(node, &entry.bounds);
        let split = match &mut node.entries[idx].data {
            EntryData::Child(child) => insert_entry(child, entry, config),
            EntryData::Leaf(_) => unreachable!("internal node entries are always children"),
        };
        if let EntryData::Child(child) = &node.entries[idx].data {
            node.entries[idx].bounds = child.bounds();
        }
        if let Some(sibling) = split {
            node.entries.push(sibling);
        }
    }

    if node.entries.len() > config.max_children {
        let drained = std::mem::take(&mut node.entries);
        let (group_a, group_b) = quadratic_split(drained, config);
        node.entries = group_a;
        let sibling = Node { leaf: node.leaf, level: node.level, entries: group_b };
        let sibling_bounds = sibling.bounds();
        Some(Entry { bounds: sibling_bounds, data: EntryData::Child(Box::new(sibling)) })
    } else {
        None
    }
}

/// Removes `item` from `node`'s subtree. Underflowed children are removed
/// entirely and their leaf items collected into `orphans` for reinsertion by
/// the caller (a simplification of Guttman's `CondenseTree`, which reinserts
/// whole subtrees at their original level; reinserting individual leaves is
/// correct, just slightly less balance-preserving).
fn delete_entry<T: Spatial + PartialEq>(
    node: &mut Node<T>,
    item: &T,
    bounds: &Aabb,
    min_children: usize,
    orphans: &mut Vec<T>,
) -> bool {
    if node.leaf {
        if let Some(pos) = node.entries.iter().position(|e| matches!(&e.data, EntryData::Leaf(v) if v == item)) {
            node.entries.remove(pos);
            return true;
        }
        return false;
    }

    for i in 0..node.entries.len() {
        if !node.entries[i].bounds.intersects(bounds) {
            continue;
        }
        let removed = match &mut node.entries[i].data {
            EntryData::Child(child) => delete_entry(child, item, bounds, min_children, orphans),
            EntryData::Leaf(_) => unreachable!("internal node entries are always children"),
        };
        if !removed {
            continue;
        }

        let underflowed = matches!(&node.entries[i].data, EntryData::Child(child) if child.len() < min_children);
        if underflowed {
            if let EntryData::Child(child) = node.entries.remove(i).data {
                collect_orphans(*child, orphans);
            }
        } else if let EntryData::Child(child) = &node.entries[i].data {
            node.entries[i].bounds = child.bounds();
        }
        return true;
    }
    false
}

fn collect_orphans<T>(node: Node<T>, orphans: &mut Vec<T>) {
    for entry in node.entries {
        match entry.data {
            EntryData::Leaf(item) => orphans.push(item),
            EntryData::Child(child) => collect_orphans(*child, orphans),
        }
    }
}

fn search<T: Clone>(node: &Node<T>, query: &Aabb, results: &mut Vec<T>) {
    for entry in &node.entries {
        if !entry.bounds.intersects(query) {
            continue;
        }
        match &entry.data {
            EntryData::Leaf(item) => results.push(item.clone()),
            EntryData::Child(child) => search(child, query, results),
        }
    }
}

/// A capped, distance-sorted accumulator: the "pre-allocated branch buffer"
/// nearest-neighbor search narrows against as it descends.
struct NearestBuffer<T> {
    k: usize,
    items: Vec<(f64, T)>,
}

impl<T> NearestBuffer<T> {
    fn worst(&self) -> f64 {
        if self.items.len() < self.k {
            f64::INFINITY
        } else {
            self.items.last().map(|(d, _)| *d).unwrap_or(f64::INFINITY)
        }
    }

    fn offer(&mut self, dist: f64, item: T) {
        if self.items.len() >= self.k && dist >= self.worst() {
            return;
        }
        let pos = self.items.partition_point(|(d, _)| *d <= dist);
        self.items.insert(pos, (dist, item));
        if self.items.len() > self.k {
            self.items.truncate(self.k);
        }
    }
}

fn knn_search<T: Spatial + Clone>(node: &Node<T>, point: &Point, buffer: &mut NearestBuffer<T>) {
    if node.leaf {
        for entry in &node.entries {
            if let EntryData::Leaf(item) = &entry.data {
                buffer.offer(entry.bounds.min_dist_squared(point), item.clone());
            }
        }
        return;
    }

    let mut children: Vec<&Entry<T>> = node.entries.iter().collect();
    children.sort_by(|a, b| {
        a.bounds
            .min_dist_squared(point)
            .partial_cmp(&b.bounds.min_dist_squared(point))
            .unwrap_or(Ordering::Equal)
    });

    // Roussopoulos pruning: no branch whose MinDist exceeds every sibling's
    // MinMaxDist can contain the true nearest neighbor.
    let prune_bound = children
        .iter()
        .map(|e| e.bounds.min_max_dist_squared(point))
        .fold(f64::INFINITY, f64::min);

    for entry in children {
        let min_dist = entry.bounds.min_dist_squared(point);
        if min_dist > buffer.worst() || min_dist > prune_bound {
            continue;
        }
        if let EntryData::Child(child) = &entry.data {
            knn_search(child, point, buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Sphere;

    fn point_at(x: f64, y: f64, z: f64) -> Sphere {
        Sphere::new(Point::new(x, y, z), 0.01)
    }

    #[test]
    fn insert_then_intersection_query_finds_it() {
        let tree = RTree::new(RTreeConfig::default());
        tree.insert(point_at(1.0, 1.0, 1.0));
        tree.insert(point_at(50.0, 50.0, 50.0));

        let query = Aabb::new(Point::zero(), Point::new(2.0, 2.0, 2.0));
        let found = tree.intersection_query(&query);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn insert_many_forces_splits_and_preserves_count() {
        let tree = RTree::new(RTreeConfig::default());
        for i in 0..50 {
            tree.insert(point_at(i as f64, 0.0, 0.0));
        }
        assert_eq!(tree.len(), 50);
    }

    #[test]
    fn delete_removes_exactly_one_and_shrinks_count() {
        let tree = RTree::new(RTreeConfig::default());
        for i in 0..20 {
            tree.insert(point_at(i as f64, 0.0, 0.0));
        }
        let target = point_at(5.0, 0.0, 0.0);
        assert!(tree.delete(&target));
        assert_eq!(tree.len(), 19);
        assert!(!tree.delete(&target));
    }

    #[test]
    fn nearest_finds_the_closest_point() {
        let tree = RTree::new(RTreeConfig::default());
        tree.insert(point_at(0.0, 0.0, 0.0));
        tree.insert(point_at(10.0, 0.0, 0.0));
        tree.insert(point_at(3.0, 0.0, 0.0));

        let nearest = tree.nearest(Point::new(2.5, 0.0, 0.0)).unwrap();
        assert_eq!(nearest.center(), Point::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn k_nearest_returns_sorted_by_distance() {
        let tree = RTree::new(RTreeConfig::default());
        for i in 0..10 {
            tree.insert(point_at(i as f64, 0.0, 0.0));
        }
        let found = tree.k_nearest(Point::new(4.4, 0.0, 0.0), 3);
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].center(), Point::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn move_object_relocates_an_item() {
        let tree = RTree::new(RTreeConfig::default());
        let original = point_at(0.0, 0.0, 0.0);
        tree.insert(original.clone());
        let moved = point_at(100.0, 100.0, 100.0);
        assert!(tree.move_object(&original, moved.clone()));

        let near_origin = tree.intersection_query(&Aabb::new(Point::new(-1.0, -1.0, -1.0), Point::new(2.0, 2.0, 2.0)));
        assert!(near_origin.is_empty());
        let near_moved = tree.intersection_query(&Aabb::new(Point::new(99.0, 99.0, 99.0), Point::new(2.0, 2.0, 2.0)));
        assert_eq!(near_moved.len(), 1);
    }
}
