use super::*;

/// Per-frame uniform block, bound at binding 7 (the seven octree/scene
/// buffers occupy bindings 0..6 per the fixed CPU/shader contract; the
/// uniform block sits outside that table). `std140`-compatible layout:
/// every `vec3` is padded up to 16 bytes by the trailing scalar that follows
/// it, and the struct as a whole is a multiple of 16 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct Uniforms {
    pub projection: Mat4,
    pub view: Mat4,
    pub camera_position: [f32; 3],
    pub camera_zoom: f32,
    pub resolution: [f32; 2],
    pub sample_count: u32,
    pub max_ray_depth: u32,
    pub node_count: u32,
    pub sphere_count: u32,
    pub use_octree: u32,
    pub _pad: u32,
}

/// The fullscreen-triangle pipeline that draws the octree-accelerated
/// raytrace. Modeled on the host crate's raytracing-image compositor: no
/// vertex buffers (the vertex shader derives its positions from
/// `gl_VertexIndex`), a push-descriptor-bound set instead of a descriptor
/// pool, depth testing disabled.
pub struct TracePipeline {
    desc_set_layout: vk::DescriptorSetLayout,
    vertex_shader: Shader,
    fragment_shader: Shader,
    graphics_pipeline: vk::Pipeline,
    pipeline_layout: vk::PipelineLayout,
}

/// Bindings 0..6 hold the seven octree/scene buffers in the order fixed by
/// the CPU/shader contract; binding 7 holds the per-frame uniform block.
pub struct TraceBuffers<'a> {
    pub sphere_geometry: &'a Buffer,
    pub sphere_material_a: &'a Buffer,
    pub sphere_material_b: &'a Buffer,
    pub node_bounds_a: &'a Buffer,
    pub node_bounds_b: &'a Buffer,
    pub node_object_counts: &'a Buffer,
    pub object_indices: &'a Buffer,
    pub uniforms: &'a Buffer,
}

impl TracePipeline {
    pub unsafe fn create(device: &Device) -> Result<Self> {
        let desc_set_layout = {
            let storage_binding = |binding: u32| {
                *vk::DescriptorSetLayoutBinding::builder()
                    .binding(binding)
                    .descriptor_type(vk::DescriptorType::STORAGE_BUFFER)
                    .descriptor_count(1)
                    .stage_flags(vk::ShaderStageFlags::FRAGMENT)
            };
            let bindings = [
                storage_binding(0),
                storage_binding(1),
                storage_binding(2),
                storage_binding(3),
                storage_binding(4),
                storage_binding(5),
                storage_binding(6),
                *vk::DescriptorSetLayoutBinding::builder()
                    .binding(7)
                    .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
                    .descriptor_count(1)
                    .stage_flags(vk::ShaderStageFlags::FRAGMENT),
            ];
            device.create_descriptor_set_layout(
                &vk::DescriptorSetLayoutCreateInfo::builder()
                    .bindings(&bindings)
                    .flags(vk::DescriptorSetLayoutCreateFlags::PUSH_DESCRIPTOR_KHR),
                None,
            )?
        };

        let (vertex_shader, fragment_shader) = (
            Shader::create(device, include_bytes!("../shaders/spv/octree_trace.vert"))?,
            Shader::create(device, include_bytes!("../shaders/spv/octree_trace.frag"))?,
        );

        let (graphics_pipeline, pipeline_layout) = {
            let entry_point = CStr::from_bytes_with_nul(b"main\0")?;
            let vertex_stage = vk::PipelineShaderStageCreateInfo::builder()
                .stage(vk::ShaderStageFlags::VERTEX)
                .module(*vertex_shader)
                .name(entry_point);
            let fragment_stage = vk::PipelineShaderStageCreateInfo::builder()
                .stage(vk::ShaderStageFlags::FRAGMENT)
                .module(*fragment_shader)
                .name(entry_point);
            let stages = [*vertex_stage, *fragment_stage];

            let rasterization_state = vk::PipelineRasterizationStateCreateInfo::builder()
                .polygon_mode(vk::PolygonMode::FILL)
                .line_width(1.0)
                .cull_mode(vk::CullModeFlags::NONE)
                .front_face(vk::FrontFace::COUNTER_CLOCKWISE);

            let vertex_input_state = vk::PipelineVertexInputStateCreateInfo::builder();

            let input_assembly_state = vk::PipelineInputAssemblyStateCreateInfo::builder()
                .topology(vk::PrimitiveTopology::TRIANGLE_LIST);

            let dynamic_state = vk::PipelineDynamicStateCreateInfo::builder()
                .dynamic_states(&[vk::DynamicState::VIEWPORT, vk::DynamicState::SCISSOR]);

            let viewport_state = vk::PipelineViewportStateCreateInfo::builder()
                .viewport_count(1)
                .scissor_count(1);

            let depth_stencil_state = vk::PipelineDepthStencilStateCreateInfo::builder()
                .depth_test_enable(false)
                .depth_write_enable(false);

            let color_blend_attachment = vk::PipelineColorBlendAttachmentState::builder()
                .blend_enable(false)
                .color_write_mask(vk::ColorComponentFlags::RGBA);
            let color_blend_state = vk::PipelineColorBlendStateCreateInfo::builder()
                .attachments(slice::from_ref(&color_blend_attachment));

            let multisample_state = vk::PipelineMultisampleStateCreateInfo::builder()
                .rasterization_samples(vk::SampleCountFlags::TYPE_1);

            let mut rendering = vk::PipelineRenderingCreateInfo::builder()
                .color_attachment_formats(slice::from_ref(&DEFAULT_SURFACE_FORMAT));

            let pipeline_layout = device.create_pipeline_layout(
                &vk::PipelineLayoutCreateInfo::builder().set_layouts(slice::from_ref(&desc_set_layout)),
                None,
            )?;

            let graphics_pipeline = device
                .create_graphics_pipelines(
                    vk::PipelineCache::null(),
                    slice::from_ref(
                        &vk::GraphicsPipelineCreateInfo::builder()
                            .stages(&stages)
                            .rasterization_state(&rasterization_state)
                            .vertex_input_state(&vertex_input_state)
                            .input_assembly_state(&input_assembly_state)
                            .dynamic_state(&dynamic_state)
                            .viewport_state(&viewport_state)
                            .depth_stencil_state(&depth_stencil_state)
                            .color_blend_state(&color_blend_state)
                            .multisample_state(&multisample_state)
                            .push_next(&mut rendering)
                            .layout(pipeline_layout),
                    ),
                    None,
                )
                .map_err(|(_, err)| err)
                .context("Creating octree trace pipeline")?;

            (graphics_pipeline[0], pipeline_layout)
        };

        Ok(Self {
            desc_set_layout,
            vertex_shader,
            fragment_shader,
            graphics_pipeline,
            pipeline_layout,
        })
    }

    pub unsafe fn draw(&self, device: &Device, cmd: vk::CommandBuffer, buffers: &TraceBuffers) {
        device.cmd_bind_pipeline(cmd, vk::PipelineBindPoint::GRAPHICS, self.graphics_pipeline);

        let infos = [
            vk::DescriptorBufferInfo { buffer: **buffers.sphere_geometry, offset: 0, range: vk::WHOLE_SIZE },
            vk::DescriptorBufferInfo { buffer: **buffers.sphere_material_a, offset: 0, range: vk::WHOLE_SIZE },
            vk::DescriptorBufferInfo { buffer: **buffers.sphere_material_b, offset: 0, range: vk::WHOLE_SIZE },
            vk::DescriptorBufferInfo { buffer: **buffers.node_bounds_a, offset: 0, range: vk::WHOLE_SIZE },
            vk::DescriptorBufferInfo { buffer: **buffers.node_bounds_b, offset: 0, range: vk::WHOLE_SIZE },
            vk::DescriptorBufferInfo { buffer: **buffers.node_object_counts, offset: 0, range: vk::WHOLE_SIZE },
            vk::DescriptorBufferInfo { buffer: **buffers.object_indices, offset: 0, range: vk::WHOLE_SIZE },
            vk::DescriptorBufferInfo { buffer: **buffers.uniforms, offset: 0, range: vk::WHOLE_SIZE },
        ];
        let writes: Vec<vk::WriteDescriptorSet> = infos
            .iter()
            .enumerate()
            .map(|(binding, info)| {
                *vk::WriteDescriptorSet::builder()
                    .dst_binding(binding as u32)
                    .descriptor_type(if binding == 7 {
                        vk::DescriptorType::UNIFORM_BUFFER
                    } else {
                        vk::DescriptorType::STORAGE_BUFFER
                    })
                    .buffer_info(slice::from_ref(info))
            })
            .collect();
        device.push_descriptor_khr().cmd_push_descriptor_set(
            cmd,
            vk::PipelineBindPoint::GRAPHICS,
            self.pipeline_layout,
            0,
            &writes,
        );

        device.cmd_draw(cmd, 3, 1, 0, 0);
    }

    pub unsafe fn destroy(&self, device: &Device) {
        self.vertex_shader.destroy(device);
        self.fragment_shader.destroy(device);
        device.destroy_pipeline(self.graphics_pipeline, None);
        device.destroy_pipeline_layout(self.pipeline_layout, None);
        device.destroy_descriptor_set_layout(self.desc_set_layout, None);
    }
}
