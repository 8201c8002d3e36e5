use super::*;

use std::io::Write as _;

//
// Modules
//

mod camera;
mod control_flow;
mod frame_state;
mod input_state;
mod window;

use camera::Camera;
use control_flow::ControlFlow;
use frame_state::FrameState;
use input_state::InputState;

//
// Re-exports.
//

pub(crate) use window::{Window, WindowSize};

const DEFAULT_ASPECT_RATIO: (u32, u32) = (4, 3);
const DEFAULT_CAMERA_DISTANCE: f32 = 8.0;
const DEBUG_CAMERA_DISTANCE: f32 = 3.0;

pub fn run(config: &config::Config) -> Result<()> {
    use winit::platform::run_return::EventLoopExtRunReturn;

    let scene = scene::Scene::load(&config.scene_path)?;
    info!(
        "Loaded scene {} ({} spheres)",
        config.scene_path.display(),
        scene.spheres.len()
    );

    let build_start = Instant::now();
    let tree = octree::Builder::new(config.max_depth, config.max_spheres_per_node).build(&scene.spheres)?;
    let linearized = octree::linearize(&tree);
    let packed = gpu::pack(&scene.spheres, &linearized);
    let build_elapsed = build_start.elapsed();
    info!(
        "init_time_ms={:.3} sphere_count={} node_count={} leaf_count={} object_index_count={}",
        build_elapsed.as_secs_f64() * 1e3,
        tree.sphere_count,
        linearized.nodes.len(),
        tree.root.subtree_leaf_count(),
        linearized.objects.len(),
    );

    let (window, mut event_loop) = Window::create(&window::Params {
        title: env!("CARGO_PKG_NAME"),
        size: WindowSize {
            w: config.scr_width,
            h: config.scr_height,
        },
        min_size: WindowSize {
            w: DEFAULT_ASPECT_RATIO.0 * 20,
            h: DEFAULT_ASPECT_RATIO.1 * 20,
        },
        decorations: true,
    })?;

    let mut driver = Driver::create(
        window,
        config,
        &packed,
        linearized.nodes.len(),
        scene.spheres.len(),
        linearized.objects.len(),
    )?;

    event_loop.run_return(|event, _, control_flow| {
        *control_flow = ControlFlow::handle_event(&event);

        if let Err(err) = driver.handle_event(&event) {
            error!("{err}");
            *control_flow = control_flow::EXIT;
        }
    });

    driver.destroy()?;

    Ok(())
}

struct Driver {
    window: Window,
    renderer: vulkan::Renderer,
    frame_state: FrameState,
    input_state: InputState,
    camera: Camera,

    node_count: u32,
    sphere_count: u32,
    object_index_count: u32,
    sample_count: u32,
    max_ray_depth: u32,
    use_octree: bool,

    stats_writer: Option<BufWriter<File>>,
}

impl Driver {
    fn create(
        window: Window,
        config: &config::Config,
        packed: &gpu::PackedScene,
        node_count: usize,
        sphere_count: usize,
        object_index_count: usize,
    ) -> Result<Self> {
        let renderer = unsafe { vulkan::Renderer::create(&window, window.title(), window.size(), packed)? };

        let stats_writer = if config.collect_stats {
            let file = File::create(&config.output_file)
                .with_context(|| format!("Creating stats file {}", config.output_file))?;
            let mut writer = BufWriter::new(file);
            writeln!(writer, "frame_index,frame_time_ms,node_count,object_index_count,duplicate_ratio")
                .context("Writing stats header")?;
            Some(writer)
        } else {
            None
        };

        Ok(Self {
            window,
            renderer,
            frame_state: FrameState::new(),
            input_state: InputState::new(),
            camera: Camera::new(if config.debug { DEBUG_CAMERA_DISTANCE } else { DEFAULT_CAMERA_DISTANCE }),

            node_count: node_count as u32,
            sphere_count: sphere_count as u32,
            object_index_count: object_index_count as u32,
            sample_count: config.num_samples,
            max_ray_depth: config.max_ray_depth,
            use_octree: config.use_octree,

            stats_writer,
        })
    }

    fn destroy(mut self) -> Result<()> {
        if let Some(writer) = &mut self.stats_writer {
            writer.flush().context("Flushing stats file")?;
        }
        unsafe { self.renderer.destroy()? };
        Ok(())
    }

    fn handle_event(&mut self, event: &winit::event::Event<()>) -> Result<()> {
        self.window.handle_event(event);
        self.input_state.handle_event(event);

        match event {
            winit::event::Event::NewEvents(_) => {
                self.frame_state.update();
            }
            winit::event::Event::MainEventsCleared => {
                self.camera.update(&self.input_state, &self.frame_state);
                self.window.handle().request_redraw();
            }
            winit::event::Event::RedrawRequested(_) => {
                self.redraw_requested()?;
            }
            _ => {}
        }

        Ok(())
    }

    fn redraw_requested(&mut self) -> Result<()> {
        let frame_start = Instant::now();
        let window_size = self.window.size();
        let aspect_ratio = window_size.w as f32 / window_size.h.max(1) as f32;
        let camera_to_world = self.camera.transform();
        let eye = na::Point3::new(camera_to_world[(0, 3)], camera_to_world[(1, 3)], camera_to_world[(2, 3)]);
        let view = camera_to_world.try_inverse().unwrap_or_else(Mat4::identity);
        let projection =
            na::Perspective3::new(aspect_ratio, std::f32::consts::FRAC_PI_4, 0.1, 1000.0).to_homogeneous();

        let uniforms = vulkan::Uniforms {
            projection,
            view,
            camera_position: [eye.x, eye.y, eye.z],
            camera_zoom: 1.0,
            resolution: [window_size.w as f32, window_size.h as f32],
            sample_count: self.sample_count,
            max_ray_depth: self.max_ray_depth,
            node_count: self.node_count,
            sphere_count: self.sphere_count,
            use_octree: u32::from(self.use_octree),
            _pad: 0,
        };

        unsafe {
            self.renderer.redraw(
                window_size,
                self.window.new_size(),
                self.frame_state.frame_index(),
                &uniforms,
            )?;
        }

        if let Some(writer) = &mut self.stats_writer {
            let frame_time_ms = frame_start.elapsed().as_secs_f64() * 1e3;
            let duplicate_ratio = if self.sphere_count == 0 {
                0.0
            } else {
                f64::from(self.object_index_count) / f64::from(self.sphere_count)
            };
            writeln!(
                writer,
                "{},{:.3},{},{},{:.4}",
                self.frame_state.frame_index(),
                frame_time_ms,
                self.node_count,
                self.object_index_count,
                duplicate_ratio,
            )
            .context("Appending stats row")?;
        }

        self.window.handled_resize();

        Ok(())
    }
}
