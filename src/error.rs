use super::*;

/// Errors produced while building and linearizing the octree.
///
/// Most callers should treat these through [`anyhow::Error`] at the driver
/// boundary; the distinct variants exist so that [`OctreeError::DegenerateBounds`]
/// can be matched on and downgraded to a warning without losing the rest of
/// the build.
#[derive(thiserror::Error, Debug)]
pub enum OctreeError {
    #[error("scene has no spheres to build an octree from")]
    EmptyScene,

    #[error("node at depth {depth} has degenerate bounds (min={min:?}, max={max:?})")]
    DegenerateBounds {
        depth: u32,
        min: na::Point3<f32>,
        max: na::Point3<f32>,
    },

    #[error("node references octant {octant}, which is out of range 0..8")]
    InvalidOctant { octant: u32 },

    #[error("failed to upload {buffer} to the device")]
    UploadFailed { buffer: &'static str },
}
