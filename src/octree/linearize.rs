use super::*;
use std::collections::VecDeque;

/// A node as it appears in the linearized, pointer-free array.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearNode {
    pub bounds: Aabb,
    pub children_offset: i32,
    pub objects_offset: i32,
    pub object_count: u32,
}

pub struct Linearized {
    pub nodes: Vec<LinearNode>,
    pub objects: Vec<u32>,
}

/// Breadth-first, two-pass linearization of `tree`.
///
/// Pass one assigns each node a dense BFS index, enqueuing a node's eight
/// children together so they land at contiguous indices. Pass two walks the
/// nodes in that index order, emitting bounds and back-patched offsets.
pub fn linearize(tree: &Tree) -> Linearized {
    // Pass 1: collect nodes in BFS order.
    let mut order: Vec<&Node> = Vec::new();
    let mut queue: VecDeque<&Node> = VecDeque::new();
    queue.push_back(&tree.root);
    while let Some(node) = queue.pop_front() {
        order.push(node);
        if let Some(children) = &node.children {
            for child in children.iter() {
                queue.push_back(child);
            }
        }
    }

    // Map each node's address to its dense index, so pass 2 can look up a
    // child's assigned index without re-walking the tree.
    let index_of: std::collections::HashMap<*const Node, usize> = order
        .iter()
        .enumerate()
        .map(|(index, &node)| (node as *const Node, index))
        .collect();

    // Pass 2: emit bounds and back-patched offsets.
    let mut nodes = Vec::with_capacity(order.len());
    let mut objects = Vec::new();
    for &node in &order {
        if let Some(children) = &node.children {
            let first_child = &children[0] as *const Node;
            let children_offset = index_of[&first_child] as i32;
            nodes.push(LinearNode {
                bounds: node.bounds,
                children_offset,
                objects_offset: -1,
                object_count: 0,
            });
        } else {
            let objects_offset = if node.object_indices.is_empty() { -1 } else { objects.len() as i32 };
            objects.extend_from_slice(&node.object_indices);
            nodes.push(LinearNode {
                bounds: node.bounds,
                children_offset: -1,
                objects_offset,
                object_count: node.object_indices.len() as u32,
            });
        }
    }

    Linearized { nodes, objects }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sphere::{MaterialKind, Sphere};

    fn sphere_at(x: f32, y: f32, z: f32, radius: f32) -> Sphere {
        Sphere::new(na::Point3::new(x, y, z), radius, MaterialKind::Diffuse, ColorRgb::WHITE)
    }

    #[test]
    fn single_split_produces_contiguous_children_and_sentinels() {
        let spheres = vec![sphere_at(-2.0, 0.0, 0.0, 1.0), sphere_at(2.0, 0.0, 0.0, 1.0)];
        let tree = build::Builder::new(1, 0).build(&spheres).unwrap();
        let Linearized { nodes, objects } = linearize(&tree);

        assert_eq!(nodes.len(), 9);
        assert_eq!(nodes[0].children_offset, 1);
        assert_eq!(nodes[0].objects_offset, -1);
        for leaf in &nodes[1..] {
            assert_eq!(leaf.children_offset, -1);
        }
        assert_eq!(objects.len(), 8);
    }

    #[test]
    fn leaf_object_slices_are_disjoint_and_cover_the_object_array() {
        use rand::{Rng, SeedableRng};
        let mut rng = rand_pcg::Pcg64Mcg::seed_from_u64(7);
        let spheres: Vec<Sphere> = (0..30)
            .map(|_| {
                sphere_at(
                    rng.gen_range(-5.0..5.0),
                    rng.gen_range(-5.0..5.0),
                    rng.gen_range(-5.0..5.0),
                    rng.gen_range(0.1..1.0),
                )
            })
            .collect();
        let tree = build::Builder::new(2, 3).build(&spheres).unwrap();
        let Linearized { nodes, objects } = linearize(&tree);

        let mut covered = vec![false; objects.len()];
        for node in &nodes {
            if node.object_count > 0 {
                let start = node.objects_offset as usize;
                let end = start + node.object_count as usize;
                for slot in &mut covered[start..end] {
                    assert!(!*slot, "leaf slices must not overlap");
                    *slot = true;
                }
            }
        }
        assert!(covered.iter().all(|&c| c));
    }
}
