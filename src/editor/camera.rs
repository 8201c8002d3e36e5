use super::*;

/// An orbit camera: rotates around the scene origin at a fixed `distance`,
/// driven by the left/right keys. `transform` is the camera's world
/// transform (camera-to-world); the driver inverts it to get the view
/// matrix and reads its translation column for the eye position.
pub struct Camera {
    angle: f32,
    distance: f32,
    transform: Mat4,
}

impl Camera {
    pub fn new(distance: f32) -> Self {
        let mut camera = Self {
            angle: 0.0,
            distance,
            transform: Mat4::identity(),
        };
        camera.rebuild_transform();
        camera
    }

    pub fn update(&mut self, input: &InputState, frame: &FrameState) {
        let speed = TAU / 5.0;
        let delta_time = frame.delta().as_secs_f32();
        if input.a {
            self.angle -= speed * delta_time;
        }
        if input.d {
            self.angle += speed * delta_time;
        }
        self.rebuild_transform();
    }

    fn rebuild_transform(&mut self) {
        let rotation = na::Rotation3::from_axis_angle(&Vec3::y_axis(), self.angle).to_homogeneous();
        let orbit = na::Translation3::new(0.0, 0.0, self.distance).to_homogeneous();
        self.transform = rotation * orbit;
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }
}
