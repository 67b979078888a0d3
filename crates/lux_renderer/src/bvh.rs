//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Construction sorts objects by the Morton code of their bounding box and
//! splits top-down on the highest differing code bit. Ranges that are small
//! enough (or that no bit can separate) are merged bottom-up by repeatedly
//! pairing the two clusters with the closest centers.
//!
//! Leaves hold indices into the caller's object storage, so a single tree
//! type serves both mesh triangles and arbitrary objects.

use lux_math::{morton_box, Aabb, Ray};

/// Leaf size below which ranges are clustered instead of split.
pub const DEFAULT_LEAF_DELTA: usize = 4;

/// Highest bit position a Morton code can occupy.
const TOP_BIT: i32 = 62;

/// BVH node - either an interior node with two children or a leaf with one object.
#[derive(Debug, Clone)]
pub enum BvhNode {
    /// Internal node; its box surrounds both children.
    Interior {
        bbox: Aabb,
        left: Box<BvhNode>,
        right: Box<BvhNode>,
    },
    /// Leaf referencing one object by index.
    Leaf { bbox: Aabb, object: usize },
}

impl BvhNode {
    fn interior(left: BvhNode, right: BvhNode) -> Self {
        BvhNode::Interior {
            bbox: Aabb::union(&left.bounding_box(), &right.bounding_box()),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Box of this subtree.
    pub fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Interior { bbox, .. } | BvhNode::Leaf { bbox, .. } => *bbox,
        }
    }

    fn search<F: FnMut(usize)>(&self, ray: &Ray, visit: &mut F) {
        if !self.bounding_box().intersects(ray) {
            return;
        }
        match self {
            BvhNode::Leaf { object, .. } => visit(*object),
            BvhNode::Interior { left, right, .. } => {
                left.search(ray, visit);
                right.search(ray, visit);
            }
        }
    }

    fn node_count(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Interior { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Interior { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Interior { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn collect_leaves(&self, out: &mut Vec<usize>) {
        match self {
            BvhNode::Leaf { object, .. } => out.push(*object),
            BvhNode::Interior { left, right, .. } => {
                left.collect_leaves(out);
                right.collect_leaves(out);
            }
        }
    }
}

/// Object entry during construction.
#[derive(Clone, Copy)]
struct Entry {
    index: usize,
    bbox: Aabb,
    code: u64,
}

/// A built hierarchy. Immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct Bvh {
    root: Option<BvhNode>,
}

impl Bvh {
    /// Build a BVH over `objects`, using `aabb` to get each object's box.
    ///
    /// Every index `0..objects.len()` ends up in exactly one leaf. A `delta`
    /// of zero is treated as one.
    pub fn construct<T>(objects: &[T], delta: usize, aabb: impl Fn(&T) -> Aabb) -> Self {
        if objects.is_empty() {
            return Self { root: None };
        }

        let boxes: Vec<Aabb> = objects.iter().map(aabb).collect();
        let total = boxes.iter().fold(Aabb::EMPTY, |acc, b| Aabb::union(&acc, b));

        let mut entries: Vec<Entry> = boxes
            .into_iter()
            .enumerate()
            .map(|(index, bbox)| Entry {
                index,
                bbox,
                code: morton_box(&bbox, &total),
            })
            .collect();
        entries.sort_by_key(|e| e.code);

        Self {
            root: Self::build(&entries, delta.max(1), TOP_BIT),
        }
    }

    /// Recursive construction over a code-sorted range.
    ///
    /// All entries in `items` agree on every code bit above `bit`, so the
    /// ones with `bit` set form a suffix of the range.
    fn build(items: &[Entry], delta: usize, bit: i32) -> Option<BvhNode> {
        if items.is_empty() {
            return None;
        }
        if items.len() <= delta || bit < 0 {
            return Self::cluster(items);
        }

        let mask = 1u64 << bit;
        let split = items.partition_point(|e| e.code & mask == 0);
        if split == 0 || split == items.len() {
            return Self::build(items, delta, bit - 1);
        }

        let left = Self::build(&items[..split], delta, bit - 1)?;
        let right = Self::build(&items[split..], delta, bit - 1)?;
        Some(BvhNode::interior(left, right))
    }

    /// Agglomerative clustering: merge the closest pair of centers until one
    /// cluster remains. Ties keep the first pair found.
    fn cluster(items: &[Entry]) -> Option<BvhNode> {
        let mut clusters: Vec<BvhNode> = items
            .iter()
            .map(|e| BvhNode::Leaf {
                bbox: e.bbox,
                object: e.index,
            })
            .collect();

        while clusters.len() > 1 {
            let centers: Vec<_> = clusters.iter().map(|c| c.bounding_box().center()).collect();

            let mut best = (0, 1);
            let mut best_distance = f64::INFINITY;
            for i in 0..centers.len() {
                for j in i + 1..centers.len() {
                    let distance = centers[i].distance_squared(centers[j]);
                    if distance < best_distance {
                        best_distance = distance;
                        best = (i, j);
                    }
                }
            }

            // j > i, so removing j first leaves i in place
            let right = clusters.swap_remove(best.1);
            let left = clusters.swap_remove(best.0);
            clusters.push(BvhNode::interior(left, right));
        }

        clusters.pop()
    }

    /// Call `visit` with the index of every leaf whose box (and every
    /// ancestor's box) the ray intersects. Order is unspecified.
    pub fn search(&self, ray: &Ray, mut visit: impl FnMut(usize)) {
        if let Some(root) = &self.root {
            root.search(ray, &mut visit);
        }
    }

    pub fn root(&self) -> Option<&BvhNode> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Box of the whole tree, [`Aabb::EMPTY`] when empty.
    pub fn bounding_box(&self) -> Aabb {
        self.root.as_ref().map_or(Aabb::EMPTY, BvhNode::bounding_box)
    }

    pub fn node_count(&self) -> usize {
        self.root.as_ref().map_or(0, BvhNode::node_count)
    }

    pub fn leaf_count(&self) -> usize {
        self.root.as_ref().map_or(0, BvhNode::leaf_count)
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, BvhNode::depth)
    }

    /// Object indices of all leaves, left to right.
    pub fn leaves(&self) -> Vec<usize> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            root.collect_leaves(&mut out);
        }
        out
    }
}
