//! Node and entry layout, and Guttman's quadratic split.

use crate::geometry::Aabb;
use crate::rtree::config::RTreeConfig;

/// A child slot: either a leaf value or a subtree, tagged by the node it
/// lives in (a node's entries are homogeneous).
pub enum EntryData<T> {
    Leaf(T),
    Child(Box<Node<T>>),
}

pub struct Entry<T> {
    pub bounds: Aabb,
    pub data: EntryData<T>,
}

pub struct Node<T> {
    pub leaf: bool,
    pub level: usize,
    pub entries: Vec<Entry<T>>,
}

impl<T> Node<T> {
    pub fn new_leaf() -> Self {
        Self { leaf: true, level: 0, entries: Vec::new() }
    }

    pub fn new_internal(level: usize) -> Self {
        Self { leaf: false, level, entries: Vec::new() }
    }

    /// The bounding box covering every entry in this node.
    pub fn bounds(&self) -> Aabb {
        let mut iter = self.entries.iter();
        let first = iter.next().expect("node must not be empty when bounds() is called").bounds;
        iter.fold(first, |acc, e| acc.union(&e.bounds))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Splits an overflowing entry list (`max_children + 1` entries) into two
/// groups, each respecting `min_children`, using Guttman's quadratic-cost
/// algorithm: pick the pair of entries that would waste the most space if
/// grouped together as seeds, then repeatedly assign the remaining entry
/// with the strongest preference for one group over the other.
pub fn quadratic_split<T>(mut entries: Vec<Entry<T>>, config: &RTreeConfig) -> (Vec<Entry<T>>, Vec<Entry<T>>) {
    let (seed_a, seed_b) = pick_seeds(&entries);
    // Remove the higher index first so the lower index stays valid.
    let (hi, lo) = if seed_a > seed_b { (seed_a, seed_b) } else { (seed_b, seed_a) };
    let entry_hi = entries.remove(hi);
    let entry_lo = entries.remove(lo);

    let mut group_a = vec![entry_lo];
    let mut group_b = vec![entry_hi];
    let mut bounds_a = group_a[0].bounds;
    let mut bounds_b = group_b[0].bounds;

    let min_children = config.min_children;

    while !entries.is_empty() {
        let remaining_after_this = entries.len() - 1;

        // Guttman's termination rule: if one group is too small to ever
        // reach min_children without taking everything left, force-assign
        // the rest to it.
        if group_a.len() + remaining_after_this + 1 == min_children {
            for entry in entries.drain(..) {
                bounds_a = bounds_a.union(&entry.bounds);
                group_a.push(entry);
            }
            break;
        }
        if group_b.len() + remaining_after_this + 1 == min_children {
            for entry in entries.drain(..) {
                bounds_b = bounds_b.union(&entry.bounds);
                group_b.push(entry);
            }
            break;
        }

        let next_index = pick_next(&entries, bounds_a, bounds_b);
        let entry = entries.remove(next_index);

        let grown_a = bounds_a.union(&entry.bounds).volume() - bounds_a.volume();
        let grown_b = bounds_b.union(&entry.bounds).volume() - bounds_b.volume();

        let goes_to_a = if grown_a != grown_b {
            grown_a < grown_b
        } else if bounds_a.volume() != bounds_b.volume() {
            bounds_a.volume() < bounds_b.volume()
        } else {
            group_a.len() <= group_b.len()
        };

        if goes_to_a {
            bounds_a = bounds_a.union(&entry.bounds);
            group_a.push(entry);
        } else {
            bounds_b = bounds_b.union(&entry.bounds);
            group_b.push(entry);
        }
    }

    (group_a, group_b)
}

/// The pair of entries whose combined bounding box wastes the most area
/// beyond their individual boxes (Guttman's `PickSeeds`).
fn pick_seeds<T>(entries: &[Entry<T>]) -> (usize, usize) {
    let mut best = (0, 1);
    let mut worst_waste = f64::NEG_INFINITY;
    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            let combined = entries[i].bounds.union(&entries[j].bounds);
            let waste = combined.volume() - entries[i].bounds.volume() - entries[j].bounds.volume();
            if waste > worst_waste {
                worst_waste = waste;
                best = (i, j);
            }
        }
    }
    best
}

/// The remaining entry with the strongest preference for one group over the
/// other (Guttman's `PickNext`): maximum absolute difference in area growth.
fn pick_next<T>(entries: &[Entry<T>], bounds_a: Aabb, bounds_b: Aabb) -> usize {
    let mut best_index = 0;
    let mut best_preference = f64::NEG_INFINITY;
    for (i, entry) in entries.iter().enumerate() {
        let grown_a = bounds_a.union(&entry.bounds).volume() - bounds_a.volume();
        let grown_b = bounds_b.union(&entry.bounds).volume() - bounds_b.volume();
        let preference = (grown_a - grown_b).abs();
        if preference > best_preference {
            best_preference = preference;
            best_index = i;
        }
    }
    best_index
}
