use std::borrow::Cow;
use std::num::NonZeroU64;

use anyhow::{Context, Result};
use glam::{Mat4, Vec4};
use spiral_mesh::{Edge, Face, Mesh};
use wgpu::util::DeviceExt;

use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};

use super::program::{ShaderProgram, ShaderStage, UniformLocations, UNIFORM_BINDING, UNIFORM_GROUP};
use super::uniforms::{pack_draw_uniform, UniformRing};

/// GPU copy of one mesh: a shared vertex buffer and two index buffers.
struct MeshBuffers {
    vertices: wgpu::Buffer,
    edge_indices: wgpu::Buffer,
    face_indices: wgpu::Buffer,
    edge_index_count: u32,
    face_index_count: u32,
}

impl MeshBuffers {
    fn destroy(self) {
        self.vertices.destroy();
        self.edge_indices.destroy();
        self.face_indices.destroy();
    }
}

#[derive(Copy, Clone)]
enum Primitive {
    Edges,
    Faces,
}

/// Draws a loaded mesh as flat-colored lines or triangles.
///
/// The vertex shader multiplies each position by the current transform; the
/// fragment shader outputs the color passed to the draw call.
pub struct SolidRenderer {
    uniforms: UniformLocations,
    bind_group_layout: wgpu::BindGroupLayout,
    edge_pipeline: wgpu::RenderPipeline,
    face_pipeline: wgpu::RenderPipeline,
    ring: UniformRing,

    transform: Mat4,
    mesh: Option<MeshBuffers>,

    warned_unloaded: bool,
}

impl SolidRenderer {
    /// Compiles the solid shaders and builds both pipelines for `ctx.surface_format`.
    pub fn new(ctx: &RenderCtx<'_>) -> Result<Self> {
        let program = ShaderProgram::solid().context("failed to build solid shader program")?;

        let vertex_module = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("spiral solid vertex shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(program.vertex.source())),
        });
        let fragment_module = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("spiral solid fragment shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(program.fragment.source())),
        });

        let block_size = NonZeroU64::new(u64::from(program.uniforms.block_size))
            .context("solid uniform block is empty")?;

        let bind_group_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("spiral solid bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: UNIFORM_BINDING,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: Some(block_size),
                },
                count: None,
            }],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("spiral solid pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let stages = PipelineStages {
            layout: &pipeline_layout,
            vertex: &vertex_module,
            fragment: &fragment_module,
            position_location: program.position_location,
            format: ctx.surface_format,
        };
        let edge_pipeline = stages.build(ctx.device, wgpu::PrimitiveTopology::LineList, "spiral solid edge pipeline");
        let face_pipeline = stages.build(ctx.device, wgpu::PrimitiveTopology::TriangleList, "spiral solid face pipeline");

        let ring = UniformRing::new(ctx.device, &bind_group_layout, block_size);

        log::debug!(
            "solid renderer ready: {:?}, transform@{} color@{} block={}",
            ctx.surface_format,
            program.uniforms.transform,
            program.uniforms.color,
            program.uniforms.block_size,
        );

        Ok(Self {
            uniforms: program.uniforms,
            bind_group_layout,
            edge_pipeline,
            face_pipeline,
            ring,
            transform: Mat4::IDENTITY,
            mesh: None,
            warned_unloaded: false,
        })
    }

    /// Uploads `mesh` to the GPU, replacing any mesh loaded before.
    ///
    /// The CPU copy is not retained; callers may drop the mesh afterwards.
    pub fn load_mesh<M: Mesh + ?Sized>(&mut self, ctx: &RenderCtx<'_>, mesh: &M) -> Result<()> {
        self.unload_mesh();

        let edge_index_count = index_count(mesh.edge_count(), Edge::INDICES).context("too many edges")?;
        let face_index_count = index_count(mesh.face_count(), Face::INDICES).context("too many faces")?;

        let vertices = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("spiral mesh vbo"),
            contents: bytemuck::cast_slice::<Vec4, u8>(mesh.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let edge_indices = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("spiral mesh edge ibo"),
            contents: bytemuck::cast_slice::<Edge, u8>(mesh.edges()),
            usage: wgpu::BufferUsages::INDEX,
        });
        let face_indices = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("spiral mesh face ibo"),
            contents: bytemuck::cast_slice::<Face, u8>(mesh.faces()),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::info!(
            "mesh loaded: {} vertices, {} edges, {} faces",
            mesh.vertex_count(),
            mesh.edge_count(),
            mesh.face_count()
        );

        self.mesh = Some(MeshBuffers {
            vertices,
            edge_indices,
            face_indices,
            edge_index_count,
            face_index_count,
        });
        self.warned_unloaded = false;

        Ok(())
    }

    /// Releases the GPU buffers of the loaded mesh. No-op when nothing is loaded.
    pub fn unload_mesh(&mut self) {
        if let Some(buffers) = self.mesh.take() {
            buffers.destroy();
            log::debug!("mesh unloaded");
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.mesh.is_some()
    }

    /// Index counts `(edges * 2, faces * 3)` of the loaded mesh.
    pub fn index_counts(&self) -> Option<(u32, u32)> {
        self.mesh
            .as_ref()
            .map(|m| (m.edge_index_count, m.face_index_count))
    }

    /// Transform applied by subsequent draws.
    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// Clears the target to `color`. Optional; draws load what is already there.
    pub fn clear_frame(&self, target: &mut RenderTarget<'_>, color: Color) {
        let _rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("spiral clear pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(color.into()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    /// Draws every edge as a line segment in `color`.
    pub fn display_edges(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, color: Color) {
        self.display(ctx, target, color, Primitive::Edges);
    }

    /// Draws every face as a filled triangle in `color`.
    pub fn display_faces(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, color: Color) {
        self.display(ctx, target, color, Primitive::Faces);
    }

    fn display(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, color: Color, primitive: Primitive) {
        let index_count = match (&self.mesh, primitive) {
            (None, _) => {
                if !self.warned_unloaded {
                    log::debug!("SolidRenderer: draw requested with no mesh loaded; ignored");
                    self.warned_unloaded = true;
                }
                return;
            }
            (Some(m), Primitive::Edges) => m.edge_index_count,
            (Some(m), Primitive::Faces) => m.face_index_count,
        };
        if index_count == 0 {
            return;
        }

        // Mutating methods must happen before borrowing pipeline/buffers immutably.
        let bytes = pack_draw_uniform(&self.uniforms, &self.transform, color);
        let offset = self.ring.push(ctx.device, ctx.queue, &self.bind_group_layout, ctx.frame_index, &bytes);

        let Some(mesh) = self.mesh.as_ref() else { return };
        let (pipeline, indices, label) = match primitive {
            Primitive::Edges => (&self.edge_pipeline, &mesh.edge_indices, "spiral edge pass"),
            Primitive::Faces => (&self.face_pipeline, &mesh.face_indices, "spiral face pass"),
        };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(UNIFORM_GROUP, self.ring.bind_group(), &[offset]);
        rpass.set_vertex_buffer(0, mesh.vertices.slice(..));
        rpass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..index_count, 0, 0..1);
    }
}

impl Drop for SolidRenderer {
    fn drop(&mut self) {
        self.unload_mesh();
    }
}

/// Shader modules and layout shared by the edge and face pipelines.
struct PipelineStages<'a> {
    layout: &'a wgpu::PipelineLayout,
    vertex: &'a wgpu::ShaderModule,
    fragment: &'a wgpu::ShaderModule,
    position_location: u32,
    format: wgpu::TextureFormat,
}

impl PipelineStages<'_> {
    fn build(&self, device: &wgpu::Device, topology: wgpu::PrimitiveTopology, label: &str) -> wgpu::RenderPipeline {
        let attributes = [wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x4,
            offset: 0,
            shader_location: self.position_location,
        }];

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(self.layout),

            vertex: wgpu::VertexState {
                module: self.vertex,
                entry_point: Some(ShaderStage::Vertex.entry_point()),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vec4>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &attributes,
                }],
            },

            fragment: Some(wgpu::FragmentState {
                module: self.fragment,
                entry_point: Some(ShaderStage::Fragment.entry_point()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }
}

/// Number of indices for `primitives` items of `per` indices each, if it fits a `u32` draw.
fn index_count(primitives: usize, per: u32) -> Option<u32> {
    primitives
        .checked_mul(per as usize)
        .and_then(|n| u32::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Viewport;
    use spiral_mesh::{SpiralMesh, SpiralParams, SpiralPreset};

    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Headless device plus a small color target.
    struct Headless {
        device: wgpu::Device,
        queue: wgpu::Queue,
        view: wgpu::TextureView,
    }

    impl Headless {
        fn new() -> Self {
            let (device, queue) = wgpu::Device::noop(&wgpu::DeviceDescriptor::default());
            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: None,
                size: wgpu::Extent3d {
                    width: 16,
                    height: 16,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            });
            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            Self { device, queue, view }
        }

        fn ctx(&self, frame_index: u64) -> RenderCtx<'_> {
            RenderCtx::new(&self.device, &self.queue, FORMAT, Viewport::new(16.0, 16.0), frame_index)
        }

        fn frame(&self, frame_index: u64, draw: impl FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>)) {
            let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor::default());
            {
                let mut target = RenderTarget::new(&mut encoder, &self.view);
                draw(&self.ctx(frame_index), &mut target);
            }
            self.queue.submit(std::iter::once(encoder.finish()));
        }
    }

    fn spiral(detail: u32) -> SpiralMesh {
        SpiralMesh::with_params(SpiralParams { detail, ..SpiralPreset::Wide.params() }).unwrap()
    }

    // ── mesh lifecycle ────────────────────────────────────────────────────

    #[test]
    fn fresh_renderer_has_no_mesh() {
        let gpu = Headless::new();
        let r = SolidRenderer::new(&gpu.ctx(0)).unwrap();
        assert!(!r.is_loaded());
        assert_eq!(r.index_counts(), None);
        assert_eq!(r.transform(), Mat4::IDENTITY);
    }

    #[test]
    fn load_counts_two_per_edge_three_per_face() {
        let gpu = Headless::new();
        let mut r = SolidRenderer::new(&gpu.ctx(0)).unwrap();
        let mesh = spiral(64);

        r.load_mesh(&gpu.ctx(0), &mesh).unwrap();

        assert!(r.is_loaded());
        assert_eq!(
            r.index_counts(),
            Some((2 * mesh.edge_count() as u32, 3 * mesh.face_count() as u32))
        );
        assert_eq!(r.index_counts(), Some((256, 384)));
    }

    #[test]
    fn reload_replaces_previous_mesh() {
        let gpu = Headless::new();
        let mut r = SolidRenderer::new(&gpu.ctx(0)).unwrap();

        r.load_mesh(&gpu.ctx(0), &spiral(64)).unwrap();
        r.load_mesh(&gpu.ctx(0), &spiral(8)).unwrap();

        assert_eq!(r.index_counts(), Some((32, 48)));
    }

    #[test]
    fn unload_releases_buffers() {
        let gpu = Headless::new();
        let mut r = SolidRenderer::new(&gpu.ctx(0)).unwrap();
        r.load_mesh(&gpu.ctx(0), &spiral(8)).unwrap();

        r.unload_mesh();
        assert!(!r.is_loaded());
        assert_eq!(r.index_counts(), None);

        // A second unload is harmless.
        r.unload_mesh();
        assert!(!r.is_loaded());
    }

    // ── drawing ───────────────────────────────────────────────────────────

    #[test]
    fn draw_without_mesh_is_noop() {
        let gpu = Headless::new();
        let mut r = SolidRenderer::new(&gpu.ctx(0)).unwrap();

        gpu.frame(0, |ctx, target| {
            r.display_edges(ctx, target, Color::WHITE);
            r.display_faces(ctx, target, Color::WHITE);
        });

        assert_eq!(r.ring.slots_used(), 0);
        assert!(r.warned_unloaded);
    }

    #[test]
    fn draw_after_unload_is_noop() {
        let gpu = Headless::new();
        let mut r = SolidRenderer::new(&gpu.ctx(0)).unwrap();
        r.load_mesh(&gpu.ctx(0), &spiral(8)).unwrap();
        r.unload_mesh();

        gpu.frame(0, |ctx, target| r.display_faces(ctx, target, Color::WHITE));

        assert_eq!(r.ring.slots_used(), 0);
    }

    #[test]
    fn each_draw_takes_its_own_slot() {
        let gpu = Headless::new();
        let mut r = SolidRenderer::new(&gpu.ctx(0)).unwrap();
        r.load_mesh(&gpu.ctx(0), &spiral(8)).unwrap();

        let spin = Mat4::from_rotation_z(0.5);
        gpu.frame(0, |ctx, target| {
            r.clear_frame(target, Color::BLACK);
            r.display_faces(ctx, target, Color::new(1.0, 0.0, 0.0, 1.0));
            r.set_transform(spin);
            r.display_edges(ctx, target, Color::WHITE);
        });

        assert_eq!(r.ring.slots_used(), 2);
        assert_eq!(r.transform(), spin);
    }

    #[test]
    fn next_frame_reuses_slots_without_clear() {
        let gpu = Headless::new();
        let mut r = SolidRenderer::new(&gpu.ctx(0)).unwrap();
        r.load_mesh(&gpu.ctx(0), &spiral(8)).unwrap();
        let capacity = r.ring.capacity();

        for frame in 0..1000 {
            gpu.frame(frame, |ctx, target| {
                r.display_faces(ctx, target, Color::WHITE);
                r.display_edges(ctx, target, Color::WHITE);
            });
            assert_eq!(r.ring.slots_used(), 2);
        }

        assert_eq!(r.ring.capacity(), capacity);
    }

    #[test]
    fn index_count_scales_by_arity() {
        assert_eq!(index_count(0, Edge::INDICES), Some(0));
        assert_eq!(index_count(10_000, Edge::INDICES), Some(20_000));
        assert_eq!(index_count(10_000, Face::INDICES), Some(30_000));
    }

    #[test]
    fn index_count_rejects_overflow() {
        assert_eq!(index_count(u32::MAX as usize, Face::INDICES), None);
        assert_eq!(index_count(usize::MAX, Edge::INDICES), None);
    }
}
