use super::*;
use crate::sphere::Sphere;

/// An axis-aligned bounding box, stored as a min/max point pair.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Aabb {
    pub min: na::Point3<f32>,
    pub max: na::Point3<f32>,
}

impl Aabb {
    pub fn from_min_max(min: na::Point3<f32>, max: na::Point3<f32>) -> Self {
        Self { min, max }
    }

    pub fn sphere_bounds(sphere: &Sphere) -> Self {
        let r = na::Vector3::repeat(sphere.radius);
        Self {
            min: sphere.center - r,
            max: sphere.center + r,
        }
    }

    pub fn union(a: Self, b: Self) -> Self {
        Self {
            min: na::Point3::new(
                a.min.x.min(b.min.x),
                a.min.y.min(b.min.y),
                a.min.z.min(b.min.z),
            ),
            max: na::Point3::new(
                a.max.x.max(b.max.x),
                a.max.y.max(b.max.y),
                a.max.z.max(b.max.z),
            ),
        }
    }

    pub fn midpoint(&self) -> na::Point3<f32> {
        na::center(&self.min, &self.max)
    }

    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Closest-point-clamp, squared-distance overlap test between a sphere
    /// and this box. A sphere tangent to a face overlaps.
    pub fn overlap(&self, sphere: &Sphere) -> bool {
        let closest = na::Point3::new(
            sphere.center.x.clamp(self.min.x, self.max.x),
            sphere.center.y.clamp(self.min.y, self.max.y),
            sphere.center.z.clamp(self.min.z, self.max.z),
        );
        let distance_squared = (closest - sphere.center).norm_squared();
        distance_squared <= sphere.radius * sphere.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sphere::MaterialKind;

    fn sphere(x: f32, y: f32, z: f32, radius: f32) -> Sphere {
        Sphere::new(na::Point3::new(x, y, z), radius, MaterialKind::Diffuse, ColorRgb::WHITE)
    }

    #[test]
    fn sphere_bounds_matches_center_plus_minus_radius() {
        let bounds = Aabb::sphere_bounds(&sphere(1.0, 2.0, 3.0, 0.5));
        assert_eq!(bounds.min, na::Point3::new(0.5, 1.5, 2.5));
        assert_eq!(bounds.max, na::Point3::new(1.5, 2.5, 3.5));
    }

    #[test]
    fn union_is_component_wise_min_max() {
        let a = Aabb::from_min_max(na::Point3::new(-1.0, 0.0, 0.0), na::Point3::new(1.0, 1.0, 1.0));
        let b = Aabb::from_min_max(na::Point3::new(0.0, -2.0, 0.0), na::Point3::new(0.5, 0.5, 5.0));
        let u = Aabb::union(a, b);
        assert_eq!(u.min, na::Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(u.max, na::Point3::new(1.0, 1.0, 5.0));
    }

    #[test]
    fn tangent_sphere_overlaps() {
        let box_ = Aabb::from_min_max(na::Point3::new(-1.0, -1.0, -1.0), na::Point3::new(1.0, 1.0, 1.0));
        let tangent = sphere(2.0, 0.0, 0.0, 1.0);
        assert!(box_.overlap(&tangent));
    }

    #[test]
    fn disjoint_sphere_does_not_overlap() {
        let box_ = Aabb::from_min_max(na::Point3::new(-1.0, -1.0, -1.0), na::Point3::new(1.0, 1.0, 1.0));
        let far = sphere(10.0, 0.0, 0.0, 1.0);
        assert!(!box_.overlap(&far));
    }

    #[test]
    fn zero_radius_sphere_behaves_as_point() {
        let box_ = Aabb::from_min_max(na::Point3::new(-1.0, -1.0, -1.0), na::Point3::new(1.0, 1.0, 1.0));
        assert!(box_.overlap(&sphere(0.0, 0.0, 0.0, 0.0)));
        assert!(!box_.overlap(&sphere(5.0, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn sphere_on_split_plane_overlaps_adjacent_octants() {
        let left = Aabb::from_min_max(na::Point3::new(-1.0, -1.0, -1.0), na::Point3::new(0.0, 1.0, 1.0));
        let right = Aabb::from_min_max(na::Point3::new(0.0, -1.0, -1.0), na::Point3::new(1.0, 1.0, 1.0));
        let on_plane = sphere(0.0, 0.0, 0.0, 0.5);
        assert!(left.overlap(&on_plane));
        assert!(right.overlap(&on_plane));
    }
}
