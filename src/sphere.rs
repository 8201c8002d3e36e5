use super::*;

/// Shading model for a [`Sphere`]. The numeric discriminants are part of the
/// GPU contract: they are packed verbatim into the material buffer and
/// interpreted by the shader.
#[repr(u32)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum MaterialKind {
    Diffuse = 0,
    Metal = 1,
    Dielectric = 2,
}

/// A shaded sphere primitive. Once constructed, a sphere is immutable: the
/// octree borrows spheres by index and never mutates them.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Sphere {
    pub center: na::Point3<f32>,
    pub radius: f32,
    pub material: MaterialKind,
    pub albedo: ColorRgb,
    pub fuzz: f32,
    pub refractive_index: f32,
}

impl Sphere {
    pub fn new(center: na::Point3<f32>, radius: f32, material: MaterialKind, albedo: ColorRgb) -> Self {
        Self {
            center,
            radius,
            material,
            albedo,
            fuzz: 0.0,
            refractive_index: 1.0,
        }
    }

    #[must_use]
    pub fn with_fuzz(mut self, fuzz: f32) -> Self {
        self.fuzz = fuzz.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn with_refractive_index(mut self, refractive_index: f32) -> Self {
        self.refractive_index = refractive_index;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_kind_discriminants_match_gpu_contract() {
        assert_eq!(MaterialKind::Diffuse as u32, 0);
        assert_eq!(MaterialKind::Metal as u32, 1);
        assert_eq!(MaterialKind::Dielectric as u32, 2);
    }
}
