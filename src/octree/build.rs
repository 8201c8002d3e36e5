use super::*;
use crate::sphere::Sphere;
use error::OctreeError;

/// Builds a [`Tree`] from a fixed sphere list under a recursion-depth and
/// leaf-size policy.
///
/// `subdivide` is implemented with an explicit work stack rather than
/// machine recursion, so a pathological `max_depth` cannot blow the call
/// stack (per the resource-model requirement that small-stack targets use an
/// explicit stack).
pub struct Builder {
    max_depth: u32,
    max_spheres_per_node: u32,
}

enum Frame {
    Expand { bounds: Aabb, depth: u32, indices: Vec<u32> },
    Combine { bounds: Aabb },
}

impl Builder {
    pub fn new(max_depth: u32, max_spheres_per_node: u32) -> Self {
        Self { max_depth, max_spheres_per_node }
    }

    pub fn build(&self, spheres: &[Sphere]) -> Result<Tree, OctreeError> {
        if spheres.is_empty() {
            return Err(OctreeError::EmptyScene);
        }
        let bounds = spheres
            .iter()
            .map(Aabb::sphere_bounds)
            .reduce(Aabb::union)
            .expect("non-empty scene checked above");
        self.build_with_bounds(spheres, bounds)
    }

    pub fn build_with_bounds(&self, spheres: &[Sphere], bounds: Aabb) -> Result<Tree, OctreeError> {
        if spheres.is_empty() {
            return Err(OctreeError::EmptyScene);
        }

        let all_indices: Vec<u32> = (0..spheres.len() as u32).collect();

        if bounds.is_degenerate() {
            let err = OctreeError::DegenerateBounds {
                depth: 0,
                min: bounds.min,
                max: bounds.max,
            };
            warn!("{err}");
            return Ok(Tree {
                root: Node::leaf(bounds, all_indices),
                sphere_count: spheres.len(),
            });
        }

        let root = self.subdivide(bounds, all_indices, spheres);
        Ok(Tree { root, sphere_count: spheres.len() })
    }

    fn subdivide(&self, bounds: Aabb, indices: Vec<u32>, spheres: &[Sphere]) -> Node {
        let mut stack = vec![Frame::Expand { bounds, depth: 0, indices }];
        let mut assembled: Vec<Node> = Vec::new();

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Expand { bounds, depth, indices } => {
                    let is_leaf =
                        depth >= self.max_depth || indices.len() <= self.max_spheres_per_node as usize;
                    if is_leaf {
                        assembled.push(Node::leaf(bounds, indices));
                        continue;
                    }

                    let mut child_bounds = [bounds; 8];
                    for (k, slot) in child_bounds.iter_mut().enumerate() {
                        *slot = octant::bounds_for(bounds, k as u32);
                    }

                    let mut child_indices: [Vec<u32>; 8] = Default::default();
                    for &i in &indices {
                        let sphere = &spheres[i as usize];
                        for (k, cb) in child_bounds.iter().enumerate() {
                            if cb.overlap(sphere) {
                                child_indices[k].push(i);
                            }
                        }
                    }
                    debug!(
                        "depth={depth} splitting {} spheres into octant counts {:?}",
                        indices.len(),
                        child_indices.iter().map(Vec::len).collect::<Vec<_>>()
                    );

                    stack.push(Frame::Combine { bounds });
                    for k in (0..8).rev() {
                        stack.push(Frame::Expand {
                            bounds: child_bounds[k],
                            depth: depth + 1,
                            indices: std::mem::take(&mut child_indices[k]),
                        });
                    }
                }
                Frame::Combine { bounds } => {
                    let split_at = assembled.len() - 8;
                    let children: Box<[Node; 8]> = assembled
                        .split_off(split_at)
                        .try_into()
                        .unwrap_or_else(|_| unreachable!("exactly eight children were pushed"));
                    assembled.push(Node::internal(bounds, children));
                }
            }
        }

        assembled.pop().expect("root frame always produces exactly one node")
    }
}
