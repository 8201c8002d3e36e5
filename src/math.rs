use super::*;

//
// Aliases
//

pub type Vec3 = na::Vector3<f32>;
pub type Mat4 = na::Matrix4<f32>;

//
// Color
//

#[repr(C)]
#[derive(Clone, Copy, PartialEq, Debug, Pod, Zeroable, Serialize, Deserialize)]
pub struct ColorRgb([f32; 3]);

impl ColorRgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self([r, g, b])
    }

    #[inline]
    pub const fn red(&self) -> f32 {
        self.0[0]
    }

    #[inline]
    pub const fn green(&self) -> f32 {
        self.0[1]
    }

    #[inline]
    pub const fn blue(&self) -> f32 {
        self.0[2]
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.0[0].is_finite() && self.0[1].is_finite() && self.0[2].is_finite()
    }
}

impl std::fmt::Display for ColorRgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}", self.red(), self.green(), self.blue())
    }
}

//
// Interpolation
//

pub fn lerp_scalar(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

//
// Tests
//

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_ulps_eq;

    #[test]
    fn test_lerp_scalar() {
        assert_ulps_eq!(lerp_scalar(0.0, 1.0, 0.0), 0.0, max_ulps = 1);
        assert_ulps_eq!(lerp_scalar(0.0, 1.0, 0.5), 0.5, max_ulps = 1);
        assert_ulps_eq!(lerp_scalar(0.0, 1.0, 1.0), 1.0, max_ulps = 1);
    }
}
