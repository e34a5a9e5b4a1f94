//! Render pipeline for the superformula surface
//!
//! The domain mesh is uploaded once. One wgpu pipeline is built per native
//! topology at startup; index buffers for modes that need CPU assembly are
//! built the first time the mode is drawn and cached afterwards.

use std::collections::HashMap;

use superform_core::DrawMode;
use superform_math::{DomainMesh, DomainVertex};
use wgpu::util::DeviceExt;

use super::shader::{self, FRAGMENT_ENTRY, VERTEX_ENTRY, VERTEX_ENTRY_UV};
use super::topology::{self, IndexSource};
use super::types::ShapeUniforms;
use crate::frame::FramePlan;
use crate::{RenderError, Viewport};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Bytes per `Uint32` index
const INDEX_SIZE: u64 = 4;

/// Native topologies a pipeline is built for
const TOPOLOGIES: [wgpu::PrimitiveTopology; 5] = [
    wgpu::PrimitiveTopology::PointList,
    wgpu::PrimitiveTopology::LineList,
    wgpu::PrimitiveTopology::LineStrip,
    wgpu::PrimitiveTopology::TriangleList,
    wgpu::PrimitiveTopology::TriangleStrip,
];

/// Pipeline construction options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceOptions {
    /// Cull back faces of triangle topologies (counter-clockwise front)
    pub cull_back_faces: bool,
}

/// Cached draw call for one draw mode
struct ModeDraw {
    topology: wgpu::PrimitiveTopology,
    /// `None` draws the base index buffer or the raw vertex range
    index_buffer: Option<wgpu::Buffer>,
    indexed: bool,
    count: u32,
}

/// Render pipeline for the tessellated surface
pub struct SurfacePipeline {
    pipelines: HashMap<wgpu::PrimitiveTopology, wgpu::RenderPipeline>,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    uv_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    base_indices: Vec<u32>,
    vertex_count: u32,
    draws: HashMap<DrawMode, ModeDraw>,
    depth_texture: Option<wgpu::TextureView>,
    depth_size: (u32, u32),
}

impl SurfacePipeline {
    /// Upload `mesh` and build one pipeline per topology.
    ///
    /// # Errors
    /// [`RenderError::ShaderCompileFailure`] if `shader_source` does not
    /// compile, or if a pipeline fails validation against it.
    /// [`RenderError::InitializationFailure`] if a mesh buffer exceeds the
    /// device's `max_buffer_size` or its upload fails.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        mesh: &DomainMesh,
        shader_source: &str,
        options: SurfaceOptions,
    ) -> Result<Self, RenderError> {
        let module = shader::compile_module(device, "Superformula Shader", shader_source)?;

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Surface Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ShapeUniforms>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Surface Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let with_uvs = mesh.uvs().is_some();
        let buffers = vertex_buffer_layouts(with_uvs);
        let vertex_entry = if with_uvs { VERTEX_ENTRY_UV } else { VERTEX_ENTRY };

        // Linking errors surface here rather than at module creation
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipelines: HashMap<_, _> = TOPOLOGIES
            .into_iter()
            .map(|topology| {
                let pipeline = create_pipeline(
                    device,
                    &pipeline_layout,
                    &module,
                    vertex_entry,
                    &buffers,
                    surface_format,
                    topology,
                    options,
                );
                (topology, pipeline)
            })
            .collect();
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::ShaderCompileFailure {
                label: "link".to_string(),
                diagnostic: err.to_string(),
            });
        }

        let vertex_count = mesh.vertex_count() as u32;
        let max_buffer_size = device.limits().max_buffer_size;
        check_buffer_size(
            "Domain Vertex Buffer",
            std::mem::size_of_val(mesh.vertices()) as u64,
            max_buffer_size,
        )?;
        check_buffer_size(
            "Domain Index Buffer",
            std::mem::size_of_val(mesh.indices()) as u64,
            max_buffer_size,
        )?;
        for mode in [DrawMode::LineLoop, DrawMode::TriangleFan] {
            let count = topology::assembled_len(mode, mesh.indices().len() as u64, vertex_count);
            check_buffer_size(mode.label(), count * INDEX_SIZE, max_buffer_size)?;
        }

        let (uniform_buffer, bind_group, vertex_buffer, uv_buffer, index_buffer) =
            with_error_scope(device, "mesh upload", || {
                let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Surface Uniform Buffer"),
                    contents: bytemuck::bytes_of(&ShapeUniforms::default()),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });

                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Surface Bind Group"),
                    layout: &bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    }],
                });

                let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Domain Vertex Buffer"),
                    contents: bytemuck::cast_slice(mesh.vertices()),
                    usage: wgpu::BufferUsages::VERTEX,
                });

                let uv_buffer = mesh.uvs().map(|uvs| {
                    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Domain UV Buffer"),
                        contents: bytemuck::cast_slice(uvs),
                        usage: wgpu::BufferUsages::VERTEX,
                    })
                });

                let index_buffer = mesh.is_indexed().then(|| {
                    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Domain Index Buffer"),
                        contents: bytemuck::cast_slice(mesh.indices()),
                        usage: wgpu::BufferUsages::INDEX,
                    })
                });

                (uniform_buffer, bind_group, vertex_buffer, uv_buffer, index_buffer)
            })?;

        log::info!(
            "Uploaded {} vertices, {} indices{}",
            mesh.vertex_count(),
            mesh.indices().len(),
            if with_uvs { " with UVs" } else { "" }
        );

        Ok(Self {
            pipelines,
            uniform_buffer,
            bind_group,
            vertex_buffer,
            uv_buffer,
            index_buffer,
            base_indices: mesh.indices().to_vec(),
            vertex_count,
            draws: HashMap::new(),
            depth_texture: None,
            depth_size: (0, 0),
        })
    }

    /// Number of draw modes whose draw call has been assembled
    pub fn cached_modes(&self) -> usize {
        self.draws.len()
    }

    /// Update uniforms
    pub fn update_uniforms(&self, queue: &wgpu::Queue, uniforms: &ShapeUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Ensure depth texture exists and is the right size
    pub fn ensure_depth_texture(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        if self.depth_texture.is_none() || self.depth_size != (width, height) {
            let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("Depth Texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            });

            self.depth_texture =
                Some(depth_texture.create_view(&wgpu::TextureViewDescriptor::default()));
            self.depth_size = (width, height);
        }
    }

    /// Assemble and cache the draw call for `mode` if not already done
    fn prepare_mode(&mut self, device: &wgpu::Device, mode: DrawMode) -> Result<(), RenderError> {
        if self.draws.contains_key(&mode) {
            return Ok(());
        }

        let assembly = topology::assemble(mode, &self.base_indices, self.vertex_count);
        let indexed = assembly.is_indexed();
        let index_buffer = match &assembly.source {
            IndexSource::Rewritten(indices) => {
                let label = format!("{} Index Buffer", mode.label());
                check_buffer_size(
                    &label,
                    std::mem::size_of_val(indices.as_slice()) as u64,
                    device.limits().max_buffer_size,
                )?;
                Some(with_error_scope(device, &label, || {
                    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(&label),
                        contents: bytemuck::cast_slice(indices),
                        usage: wgpu::BufferUsages::INDEX,
                    })
                })?)
            }
            IndexSource::Base | IndexSource::Vertices => None,
        };

        log::debug!("Assembled {} draw: {} elements", mode, assembly.count);
        self.draws.insert(
            mode,
            ModeDraw {
                topology: assembly.topology,
                index_buffer,
                indexed,
                count: assembly.count,
            },
        );
        Ok(())
    }

    /// Upload the frame's uniforms and draw the surface.
    ///
    /// Clears color and depth, binds the pipeline for the plan's draw mode
    /// and issues one indexed or sequential draw over the whole mesh.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        plan: &FramePlan,
        viewport: Viewport,
    ) -> Result<(), RenderError> {
        self.ensure_depth_texture(device, viewport.width(), viewport.height());
        self.prepare_mode(device, plan.draw_mode)?;
        self.update_uniforms(queue, &plan.uniforms);

        let (Some(depth_view), Some(draw)) =
            (self.depth_texture.as_ref(), self.draws.get(&plan.draw_mode))
        else {
            return Ok(());
        };

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Surface Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(plan.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if draw.count == 0 {
            return Ok(());
        }
        let Some(pipeline) = self.pipelines.get(&draw.topology) else {
            return Ok(());
        };

        render_pass.set_viewport(
            0.0,
            0.0,
            viewport.width() as f32,
            viewport.height() as f32,
            0.0,
            1.0,
        );
        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        if let Some(uv_buffer) = &self.uv_buffer {
            render_pass.set_vertex_buffer(1, uv_buffer.slice(..));
        }

        if draw.indexed {
            let Some(index_buffer) = draw.index_buffer.as_ref().or(self.index_buffer.as_ref())
            else {
                return Ok(());
            };
            render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..draw.count, 0, 0..1);
        } else {
            render_pass.draw(0..draw.count, 0..1);
        }
        Ok(())
    }
}

/// Vertex buffer layouts: positions in slot 0, optional UVs in slot 1
fn vertex_buffer_layouts(with_uvs: bool) -> Vec<wgpu::VertexBufferLayout<'static>> {
    const POSITION: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];
    const UV: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x2];

    let mut layouts = vec![wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<DomainVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &POSITION,
    }];
    if with_uvs {
        layouts.push(wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &UV,
        });
    }
    layouts
}

/// Additive color blending over the cleared background
fn additive_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

fn primitive_state(topology: wgpu::PrimitiveTopology, options: SurfaceOptions) -> wgpu::PrimitiveState {
    let triangles = matches!(
        topology,
        wgpu::PrimitiveTopology::TriangleList | wgpu::PrimitiveTopology::TriangleStrip
    );
    wgpu::PrimitiveState {
        topology,
        strip_index_format: topology::is_strip(topology).then_some(wgpu::IndexFormat::Uint32),
        front_face: wgpu::FrontFace::Ccw,
        cull_mode: (triangles && options.cull_back_faces).then_some(wgpu::Face::Back),
        unclipped_depth: false,
        polygon_mode: wgpu::PolygonMode::Fill,
        conservative: false,
    }
}

#[allow(clippy::too_many_arguments)]
fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    module: &wgpu::ShaderModule,
    vertex_entry: &str,
    buffers: &[wgpu::VertexBufferLayout<'static>],
    surface_format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
    options: SurfaceOptions,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("Surface Pipeline ({:?})", topology)),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: Some(vertex_entry),
            buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: Some(FRAGMENT_ENTRY),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(additive_blend()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: primitive_state(topology, options),
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

/// Reject a buffer larger than the device allows before creating it
fn check_buffer_size(label: &str, bytes: u64, max_buffer_size: u64) -> Result<(), RenderError> {
    if bytes > max_buffer_size {
        return Err(RenderError::InitializationFailure(format!(
            "{} needs {} bytes, device allows {}; lower tessellation.segments",
            label, bytes, max_buffer_size
        )));
    }
    Ok(())
}

/// Run `create` with validation and out-of-memory errors captured
fn with_error_scope<T>(
    device: &wgpu::Device,
    label: &str,
    create: impl FnOnce() -> T,
) -> Result<T, RenderError> {
    device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    let validation = pollster::block_on(device.pop_error_scope());
    let out_of_memory = pollster::block_on(device.pop_error_scope());

    match validation.or(out_of_memory) {
        Some(err) => {
            log::error!("{} failed: {}", label, err);
            Err(RenderError::InitializationFailure(format!("{}: {}", label, err)))
        }
        None => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_buffer_layout_stride() {
        let layouts = vertex_buffer_layouts(false);
        assert_eq!(layouts.len(), 1);
        assert_eq!(layouts[0].array_stride, 8);
    }

    #[test]
    fn test_uv_layout_adds_second_slot() {
        let layouts = vertex_buffer_layouts(true);
        assert_eq!(layouts.len(), 2);
        assert_eq!(layouts[1].attributes[0].shader_location, 1);
    }

    #[test]
    fn test_strip_pipelines_get_index_format() {
        let opts = SurfaceOptions::default();
        for topology in TOPOLOGIES {
            let state = primitive_state(topology, opts);
            assert_eq!(state.strip_index_format.is_some(), topology::is_strip(topology));
        }
    }

    #[test]
    fn test_culling_only_for_triangles() {
        let opts = SurfaceOptions { cull_back_faces: true };
        assert_eq!(
            primitive_state(wgpu::PrimitiveTopology::TriangleList, opts).cull_mode,
            Some(wgpu::Face::Back)
        );
        assert_eq!(primitive_state(wgpu::PrimitiveTopology::LineList, opts).cull_mode, None);
        assert_eq!(
            primitive_state(wgpu::PrimitiveTopology::TriangleList, SurfaceOptions::default())
                .cull_mode,
            None
        );
    }

    #[test]
    fn test_every_draw_mode_has_a_pipeline_topology() {
        for mode in DrawMode::ALL {
            assert!(TOPOLOGIES.contains(&topology::topology_for(mode)));
        }
    }

    #[test]
    fn test_blend_is_additive() {
        let blend = additive_blend();
        assert_eq!(blend.color.src_factor, wgpu::BlendFactor::SrcAlpha);
        assert_eq!(blend.color.dst_factor, wgpu::BlendFactor::One);
    }

    #[test]
    fn test_buffer_size_check() {
        assert!(check_buffer_size("Index", 1024, 1024).is_ok());
        let err = check_buffer_size("Triangle Fan", 1025, 1024).unwrap_err();
        assert!(matches!(err, RenderError::InitializationFailure(_)));
        assert!(err.to_string().contains("Triangle Fan"));
    }

    #[test]
    fn test_largest_mesh_fits_downlevel_limits() {
        use superform_math::{grid_index_count, MAX_SEGMENTS};

        let max_buffer_size = wgpu::Limits::downlevel_defaults().max_buffer_size;
        let base = grid_index_count(MAX_SEGMENTS);
        let side = (MAX_SEGMENTS + 1) as u64;
        let vertex_count = (side * side) as u32;

        assert!(check_buffer_size("base", base * INDEX_SIZE, max_buffer_size).is_ok());
        for mode in DrawMode::ALL {
            let bytes = topology::assembled_len(mode, base, vertex_count) * INDEX_SIZE;
            assert!(
                check_buffer_size(mode.label(), bytes, max_buffer_size).is_ok(),
                "{:?} needs {} bytes",
                mode,
                bytes
            );
        }
    }
}
