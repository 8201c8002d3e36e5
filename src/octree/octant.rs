use super::*;

/// The eight-way split of an [`Aabb`] at its midpoint.
///
/// Octant index `k` (0..7) selects a half-extent along each axis. The table
/// below is taken verbatim from the per-octant `min`/`max` derivation of the
/// originating implementation's `createSubnodes` switch (octant names such as
/// `TopLeftFront`/`BottomRightBack` are not reproduced here because they are
/// inconsistent between that source's header and its switch bodies; only the
/// numeric mapping each case actually produces is load-bearing):
///
/// | `k` | x half | y half | z half |
/// |----:|:------:|:------:|:------:|
/// |   0 |  low   |  high  |  high  |
/// |   1 |  high  |  high  |  high  |
/// |   2 |  high  |  high  |  low   |
/// |   3 |  low   |  high  |  low   |
/// |   4 |  low   |  low   |  high  |
/// |   5 |  high  |  low   |  high  |
/// |   6 |  high  |  low   |  low   |
/// |   7 |  low   |  low   |  low   |
///
/// "low" means the child spans `[parent.min, mid]` on that axis; "high" means
/// it spans `[mid, parent.max]`.
const HALVES: [(bool, bool, bool); 8] = [
    (false, true, true),
    (true, true, true),
    (true, true, false),
    (false, true, false),
    (false, false, true),
    (true, false, true),
    (true, false, false),
    (false, false, false),
];

/// Computes the bounds of octant `index` of `parent`, split at `parent`'s
/// midpoint. Panics (via the `InvalidOctant` check) if `index` is not in
/// `0..8`; subdivision only ever calls this with a loop-generated index, so
/// an out-of-range value indicates a programming bug, not bad input.
pub fn bounds_for(parent: Aabb, index: u32) -> Aabb {
    let Some(&(x_high, y_high, z_high)) = HALVES.get(index as usize) else {
        let err = error::OctreeError::InvalidOctant { octant: index };
        unreachable!("{err}");
    };

    let mid = parent.midpoint();

    let select = |low: f32, high: f32, want_high: bool| if want_high { high } else { low };

    Aabb::from_min_max(
        na::Point3::new(
            select(parent.min.x, mid.x, x_high),
            select(parent.min.y, mid.y, y_high),
            select(parent.min.z, mid.z, z_high),
        ),
        na::Point3::new(
            select(mid.x, parent.max.x, x_high),
            select(mid.y, parent.max.y, y_high),
            select(mid.z, parent.max.z, z_high),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube() -> Aabb {
        Aabb::from_min_max(na::Point3::new(-1.0, -1.0, -1.0), na::Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn octant_zero_is_low_x_high_y_high_z() {
        let bounds = bounds_for(cube(), 0);
        assert_eq!(bounds.min, na::Point3::new(-1.0, 0.0, 0.0));
        assert_eq!(bounds.max, na::Point3::new(0.0, 1.0, 1.0));
    }

    #[test]
    fn octant_one_is_high_x_high_y_high_z() {
        let bounds = bounds_for(cube(), 1);
        assert_eq!(bounds.min, na::Point3::new(0.0, 0.0, 0.0));
        assert_eq!(bounds.max, na::Point3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn octant_seven_is_low_x_low_y_low_z() {
        let bounds = bounds_for(cube(), 7);
        assert_eq!(bounds.min, na::Point3::new(-1.0, -1.0, -1.0));
        assert_eq!(bounds.max, na::Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn every_octant_is_contained_in_parent_and_union_covers_parent() {
        let parent = cube();
        let mut union = bounds_for(parent, 0);
        for k in 0..8 {
            let child = bounds_for(parent, k);
            assert!(child.min.x >= parent.min.x && child.max.x <= parent.max.x);
            assert!(child.min.y >= parent.min.y && child.max.y <= parent.max.y);
            assert!(child.min.z >= parent.min.z && child.max.z <= parent.max.z);
            union = Aabb::union(union, child);
        }
        assert_eq!(union.min, parent.min);
        assert_eq!(union.max, parent.max);
    }

    #[test]
    fn octants_are_pairwise_disjoint_up_to_shared_faces() {
        let parent = cube();
        let mid = parent.midpoint();
        for k in 0..8 {
            let child = bounds_for(parent, k);
            // Every child face lands exactly on the parent bound or the midpoint.
            for (lo, hi, pmin, pmax, m) in [
                (child.min.x, child.max.x, parent.min.x, parent.max.x, mid.x),
                (child.min.y, child.max.y, parent.min.y, parent.max.y, mid.y),
                (child.min.z, child.max.z, parent.min.z, parent.max.z, mid.z),
            ] {
                assert!(lo == pmin || lo == m);
                assert!(hi == pmax || hi == m);
            }
        }
    }
}
