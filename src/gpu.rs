use super::*;

use crate::octree::{LinearNode, Linearized};
use crate::sphere::Sphere;

/// Binding 0. `(center.x, center.y, center.z, radius)` per sphere.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SphereGeometry([f32; 4]);

/// Binding 1. `(material_kind_as_float, albedo.r, albedo.g, albedo.b)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SphereMaterialA([f32; 4]);

/// Binding 2. `(fuzz, refractive_index, 0, 0)`; the trailing lanes are
/// reserved padding, not currently read by the shader.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SphereMaterialB([f32; 4]);

/// Binding 3. `(min.x, min.y, min.z, children_offset)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct NodeBoundsA([f32; 4]);

/// Binding 4. `(max.x, max.y, max.z, objects_offset)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct NodeBoundsB([f32; 4]);

/// The seven flat arrays that match the GPU buffer contract 1:1, in binding
/// order. Binding 5 (node counts) and binding 6 (object indices) need no
/// wrapper struct: they are already `i32`/`u32` scalars.
pub struct PackedScene {
    pub sphere_geometry: Vec<SphereGeometry>,
    pub sphere_material_a: Vec<SphereMaterialA>,
    pub sphere_material_b: Vec<SphereMaterialB>,
    pub node_bounds_a: Vec<NodeBoundsA>,
    pub node_bounds_b: Vec<NodeBoundsB>,
    pub node_object_counts: Vec<u32>,
    pub object_indices: Vec<u32>,
}

/// Re-packs sphere primitives and the linearized tree into the fixed-width
/// vector records the shader binds at slots 0..6.
pub fn pack(spheres: &[Sphere], linearized: &Linearized) -> PackedScene {
    let (sphere_geometry, sphere_material_a, sphere_material_b): (Vec<_>, Vec<_>, Vec<_>) =
        itertools::multiunzip(spheres.iter().map(|s| {
            (
                SphereGeometry([s.center.x, s.center.y, s.center.z, s.radius]),
                SphereMaterialA([s.material as u32 as f32, s.albedo.red(), s.albedo.green(), s.albedo.blue()]),
                SphereMaterialB([s.fuzz, s.refractive_index, 0.0, 0.0]),
            )
        }));

    let (node_bounds_a, node_bounds_b, node_object_counts): (Vec<_>, Vec<_>, Vec<_>) =
        itertools::multiunzip(linearized.nodes.iter().map(|n: &LinearNode| {
            (
                NodeBoundsA([n.bounds.min.x, n.bounds.min.y, n.bounds.min.z, n.children_offset as f32]),
                NodeBoundsB([n.bounds.max.x, n.bounds.max.y, n.bounds.max.z, n.objects_offset as f32]),
                n.object_count,
            )
        }));

    PackedScene {
        sphere_geometry,
        sphere_material_a,
        sphere_material_b,
        node_bounds_a,
        node_bounds_b,
        node_object_counts,
        object_indices: linearized.objects.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::octree::{linearize, Builder};
    use crate::sphere::MaterialKind;

    fn sphere(x: f32, y: f32, z: f32, radius: f32) -> Sphere {
        Sphere::new(na::Point3::new(x, y, z), radius, MaterialKind::Metal, ColorRgb::new(0.5, 0.25, 0.1))
            .with_fuzz(0.3)
            .with_refractive_index(1.5)
    }

    #[test]
    fn sphere_records_carry_the_documented_fields_in_order() {
        let spheres = vec![sphere(1.0, 2.0, 3.0, 4.0)];
        let tree = Builder::new(0, 0).build(&spheres).unwrap();
        let linearized = linearize(&tree);
        let packed = pack(&spheres, &linearized);

        assert_eq!(packed.sphere_geometry[0].0, [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(packed.sphere_material_a[0].0, [MaterialKind::Metal as u32 as f32, 0.5, 0.25, 0.1]);
        assert_eq!(packed.sphere_material_b[0].0, [0.3, 1.5, 0.0, 0.0]);
    }

    #[test]
    fn node_records_back_patch_offsets_and_counts_match_linearized_arrays() {
        let spheres = vec![sphere(-2.0, 0.0, 0.0, 1.0), sphere(2.0, 0.0, 0.0, 1.0)];
        let tree = Builder::new(1, 0).build(&spheres).unwrap();
        let linearized = linearize(&tree);
        let packed = pack(&spheres, &linearized);

        assert_eq!(packed.node_bounds_a.len(), linearized.nodes.len());
        assert_eq!(packed.node_object_counts.len(), linearized.nodes.len());
        assert_eq!(packed.object_indices, linearized.objects);

        let root_a = packed.node_bounds_a[0].0;
        assert_eq!(root_a[3], linearized.nodes[0].children_offset as f32);

        for (node, count) in linearized.nodes.iter().zip(&packed.node_object_counts) {
            assert_eq!(node.object_count, *count);
        }
    }

    #[test]
    fn byte_layout_is_four_tightly_packed_floats() {
        assert_eq!(std::mem::size_of::<SphereGeometry>(), 16);
        assert_eq!(std::mem::size_of::<NodeBoundsA>(), 16);
    }
}
