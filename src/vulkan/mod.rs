use super::*;

mod buffer;
mod debug;
mod device;
mod instance;
mod shader;
mod surface;
mod swapchain;
mod trace_pipeline;

use buffer::*;
use debug::*;
use device::*;
use instance::*;
use shader::*;
use surface::*;
use swapchain::*;
use trace_pipeline::*;

const VULKAN_API_VERSION: u32 = vk::make_api_version(0, 1, 3, 0);
pub const MAX_CONCURRENT_FRAMES: u32 = 3;
const DEFAULT_PRESENT_MODE: vk::PresentModeKHR = vk::PresentModeKHR::FIFO;
const DEFAULT_SURFACE_COLOR_SPACE: vk::ColorSpaceKHR = vk::ColorSpaceKHR::SRGB_NONLINEAR;
const DEFAULT_SURFACE_FORMAT: vk::Format = vk::Format::B8G8R8A8_SRGB;
const DEFAULT_SAMPLE_COUNT: vk::SampleCountFlags = vk::SampleCountFlags::TYPE_1;

struct Commands {
    command_pool: vk::CommandPool,
    command_buffers: Vec<vk::CommandBuffer>,
    present_complete: Vec<vk::Semaphore>,
    rendering_complete: Vec<vk::Semaphore>,
    draw_commands_reuse: Vec<vk::Fence>,
}

impl Commands {
    unsafe fn create(device: &Device) -> Result<Self> {
        let command_pool = device
            .create_command_pool(
                &vk::CommandPoolCreateInfo::builder()
                    .queue_family_index(device.queue().index())
                    .flags(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER),
                None,
            )
            .context("Creating command pool")?;
        let command_buffers = device
            .allocate_command_buffers(
                &vk::CommandBufferAllocateInfo::builder()
                    .command_buffer_count(MAX_CONCURRENT_FRAMES)
                    .command_pool(command_pool)
                    .level(vk::CommandBufferLevel::PRIMARY),
            )
            .context("Allocating command buffers")?;

        let mut present_complete = vec![];
        let mut rendering_complete = vec![];
        let mut draw_commands_reuse = vec![];
        for _ in 0..MAX_CONCURRENT_FRAMES {
            present_complete.push(
                device
                    .create_semaphore(&vk::SemaphoreCreateInfo::default(), None)
                    .context("Creating semaphore")?,
            );
            rendering_complete.push(
                device
                    .create_semaphore(&vk::SemaphoreCreateInfo::default(), None)
                    .context("Creating semaphore")?,
            );
            draw_commands_reuse.push(
                device
                    .create_fence(
                        &vk::FenceCreateInfo::builder().flags(vk::FenceCreateFlags::SIGNALED),
                        None,
                    )
                    .context("Creating fence")?,
            );
        }

        Ok(Self {
            command_pool,
            command_buffers,
            present_complete,
            rendering_complete,
            draw_commands_reuse,
        })
    }

    unsafe fn destroy(&self, device: &Device) {
        for i in 0..MAX_CONCURRENT_FRAMES {
            let i = i as usize;
            device.destroy_semaphore(self.present_complete[i], None);
            device.destroy_semaphore(self.rendering_complete[i], None);
            device.destroy_fence(self.draw_commands_reuse[i], None);
        }
        device.free_command_buffers(self.command_pool, &self.command_buffers);
        device.destroy_command_pool(self.command_pool, None);
    }
}

/// The seven fixed-binding scene buffers that back the octree trace shader,
/// uploaded once at startup from a [`gpu::PackedScene`] and never mutated
/// afterwards -- only the per-frame [`Uniforms`](trace_pipeline::Uniforms)
/// buffer changes between frames.
struct SceneBuffers {
    sphere_geometry: Buffer,
    sphere_material_a: Buffer,
    sphere_material_b: Buffer,
    node_bounds_a: Buffer,
    node_bounds_b: Buffer,
    node_object_counts: Buffer,
    object_indices: Buffer,
}

impl SceneBuffers {
    unsafe fn create(device: &Device, packed: &gpu::PackedScene) -> Result<Self> {
        let storage = vk::BufferUsageFlags::STORAGE_BUFFER;
        Ok(Self {
            sphere_geometry: Buffer::create_init(device, storage, &packed.sphere_geometry)?,
            sphere_material_a: Buffer::create_init(device, storage, &packed.sphere_material_a)?,
            sphere_material_b: Buffer::create_init(device, storage, &packed.sphere_material_b)?,
            node_bounds_a: Buffer::create_init(device, storage, &packed.node_bounds_a)?,
            node_bounds_b: Buffer::create_init(device, storage, &packed.node_bounds_b)?,
            node_object_counts: Buffer::create_init(device, storage, &packed.node_object_counts)?,
            object_indices: Buffer::create_init(device, storage, &packed.object_indices)?,
        })
    }

    fn as_trace_buffers<'a>(&'a self, uniforms: &'a Buffer) -> TraceBuffers<'a> {
        TraceBuffers {
            sphere_geometry: &self.sphere_geometry,
            sphere_material_a: &self.sphere_material_a,
            sphere_material_b: &self.sphere_material_b,
            node_bounds_a: &self.node_bounds_a,
            node_bounds_b: &self.node_bounds_b,
            node_object_counts: &self.node_object_counts,
            object_indices: &self.object_indices,
            uniforms,
        }
    }

    unsafe fn destroy(&self, device: &Device) {
        self.sphere_geometry.destroy(device);
        self.sphere_material_a.destroy(device);
        self.sphere_material_b.destroy(device);
        self.node_bounds_a.destroy(device);
        self.node_bounds_b.destroy(device);
        self.node_object_counts.destroy(device);
        self.object_indices.destroy(device);
    }
}

pub struct Renderer {
    _entry: ash::Entry,
    instance: Instance,
    debug: Option<Debug>,
    surface: Surface,
    device: Device,
    swapchain: Swapchain,
    cmds: Commands,
    trace_pipeline: TracePipeline,
    scene_buffers: SceneBuffers,
    uniform_buffers: Vec<Buffer>,
}

impl Renderer {
    pub unsafe fn create(
        window: &editor::Window,
        window_title: &str,
        window_size: editor::WindowSize,
        packed: &gpu::PackedScene,
    ) -> Result<Self> {
        let validation = std::env::var("VULKAN_VALIDATION").is_ok();
        validation.then(|| info!("Vulkan validation layers enabled"));
        let entry = unsafe { ash::Entry::load()? };
        let instance = Instance::create(
            &entry,
            validation,
            window_title,
            raw_window_handle::HasRawDisplayHandle::raw_display_handle(window.handle()),
        )?;
        let debug = validation
            .then(|| Debug::create(&entry, &instance))
            .transpose()?;
        let surface = Surface::create(&entry, &instance, window.handle())?;
        let device = Device::create(&instance, &surface)?;
        let swapchain = Swapchain::create(&instance, &surface, &device, window_size.into())?;
        let cmds = Commands::create(&device)?;
        let trace_pipeline = TracePipeline::create(&device)?;
        let scene_buffers = SceneBuffers::create(&device, packed)?;

        let uniform_buffer_usage = vk::BufferUsageFlags::UNIFORM_BUFFER;
        let mut uniform_buffers = Vec::with_capacity(MAX_CONCURRENT_FRAMES as usize);
        for _ in 0..MAX_CONCURRENT_FRAMES {
            uniform_buffers.push(Buffer::create(
                &device,
                uniform_buffer_usage,
                vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
                size_of::<Uniforms>(),
                &[],
            )?);
        }

        Ok(Self {
            _entry: entry,
            instance,
            debug,
            surface,
            device,
            swapchain,
            cmds,
            trace_pipeline,
            scene_buffers,
            uniform_buffers,
        })
    }

    pub unsafe fn redraw(
        &mut self,
        window_size: editor::WindowSize,
        resized_window_size: editor::WindowSize,
        frame_index: u64,
        uniforms: &Uniforms,
    ) -> Result<()> {
        let queue = self.device.queue();
        let device = &self.device;
        let swapchain = &mut self.swapchain;
        let surface = &self.surface;
        let cmds = &self.cmds;
        let command_buffers = &cmds.command_buffers;
        let draw_commands_reuse = &cmds.draw_commands_reuse[frame_index as usize];
        let present_complete = &cmds.present_complete[frame_index as usize];
        let rendering_complete = &cmds.rendering_complete[frame_index as usize];
        let uniform_buffer = &self.uniform_buffers[frame_index as usize];

        if window_size.is_zero() || resized_window_size.is_zero() {
            return Ok(());
        }

        device
            .wait_for_fences(slice::from_ref(draw_commands_reuse), true, u64::MAX)
            .context("Waiting for fence")?;

        let acquire_result = swapchain
            .loader()
            .acquire_next_image(**swapchain, u64::MAX, *present_complete, vk::Fence::null())
            .context("Acquiring next image");
        let Ok((present_index, _)) = acquire_result else {
            swapchain
                .recreate(surface, device, window_size.into())
                .context("Recreating swapchain")?;
            return Ok(());
        };

        device
            .reset_fences(slice::from_ref(draw_commands_reuse))
            .context("Resetting fences")?;

        uniform_buffer.write(device, uniforms)?;

        let present_image = swapchain.image(present_index);

        let color_attachment = vk::RenderingAttachmentInfo::builder()
            .image_view(present_image.1)
            .image_layout(vk::ImageLayout::ATTACHMENT_OPTIMAL)
            .load_op(vk::AttachmentLoadOp::CLEAR)
            .store_op(vk::AttachmentStoreOp::STORE)
            .clear_value(vk::ClearValue {
                color: vk::ClearColorValue {
                    float32: [0.0, 0.0, 0.0, 1.0],
                },
            });

        let rendering_info = vk::RenderingInfo::builder()
            .render_area(vk::Rect2D {
                offset: vk::Offset2D::default(),
                extent: window_size.into(),
            })
            .layer_count(1)
            .color_attachments(slice::from_ref(&color_attachment));

        let command_buffer = command_buffers[present_index as usize];
        device
            .begin_command_buffer(
                command_buffer,
                &vk::CommandBufferBeginInfo::builder()
                    .flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT),
            )
            .context("Beginning command buffer")?;
        device.image_memory_barrier(
            command_buffer,
            present_image.0,
            vk::PipelineStageFlags2::TOP_OF_PIPE,
            vk::AccessFlags2::empty(),
            vk::PipelineStageFlags2::COLOR_ATTACHMENT_OUTPUT,
            vk::AccessFlags2::COLOR_ATTACHMENT_WRITE,
            vk::ImageLayout::UNDEFINED,
            vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
            vk::ImageAspectFlags::COLOR,
        );
        device.cmd_begin_rendering(command_buffer, &rendering_info);
        device.cmd_set_viewport(
            command_buffer,
            0,
            slice::from_ref(&vk::Viewport {
                x: 0.0,
                y: window_size.h as f32,
                width: window_size.w as f32,
                height: -(window_size.h as f32),
                min_depth: 0.0,
                max_depth: 1.0,
            }),
        );
        device.cmd_set_scissor(
            command_buffer,
            0,
            slice::from_ref(&vk::Rect2D {
                offset: vk::Offset2D { x: 0, y: 0 },
                extent: window_size.into(),
            }),
        );
        self.trace_pipeline.draw(
            device,
            command_buffer,
            &self.scene_buffers.as_trace_buffers(uniform_buffer),
        );
        device.cmd_end_rendering(command_buffer);
        device.image_memory_barrier(
            command_buffer,
            present_image.0,
            vk::PipelineStageFlags2::COLOR_ATTACHMENT_OUTPUT,
            vk::AccessFlags2::COLOR_ATTACHMENT_WRITE,
            vk::PipelineStageFlags2::BOTTOM_OF_PIPE,
            vk::AccessFlags2::empty(),
            vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
            vk::ImageLayout::PRESENT_SRC_KHR,
            vk::ImageAspectFlags::COLOR,
        );
        device
            .end_command_buffer(command_buffer)
            .context("Ending command buffer")?;

        device
            .queue_submit2(
                **queue,
                slice::from_ref(
                    &vk::SubmitInfo2::builder()
                        .wait_semaphore_infos(slice::from_ref(
                            &vk::SemaphoreSubmitInfo::builder()
                                .semaphore(*present_complete)
                                .stage_mask(vk::PipelineStageFlags2::COLOR_ATTACHMENT_OUTPUT),
                        ))
                        .command_buffer_infos(slice::from_ref(
                            &vk::CommandBufferSubmitInfo::builder().command_buffer(command_buffer),
                        ))
                        .signal_semaphore_infos(slice::from_ref(
                            &vk::SemaphoreSubmitInfo::builder()
                                .semaphore(*rendering_complete)
                                .stage_mask(vk::PipelineStageFlags2::ALL_COMMANDS),
                        )),
                ),
                *draw_commands_reuse,
            )
            .context("Submitting to queue")?;

        let present_info = vk::PresentInfoKHR::builder()
            .wait_semaphores(slice::from_ref(rendering_complete))
            .swapchains(slice::from_ref(&*swapchain))
            .image_indices(slice::from_ref(&present_index));
        let present_result = swapchain
            .loader()
            .queue_present(**queue, &present_info)
            .context("Presenting");
        if present_result.is_err() || window_size != resized_window_size {
            swapchain
                .recreate(surface, device, resized_window_size.into())
                .context("Recreating swapchain")?;
        }

        Ok(())
    }

    pub unsafe fn destroy(mut self) -> Result<()> {
        self.device
            .device_wait_idle()
            .context("Flushing pipeline")?;
        self.trace_pipeline.destroy(&self.device);
        self.scene_buffers.destroy(&self.device);
        for buffer in &self.uniform_buffers {
            buffer.destroy(&self.device);
        }
        self.cmds.destroy(&self.device);
        self.swapchain.destroy(&self.device);
        self.device.destroy();
        self.surface.destroy();
        if let Some(debug) = self.debug {
            debug.destroy();
        }
        self.instance.destroy();
        Ok(())
    }
}
