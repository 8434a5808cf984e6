use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::debug;
use winit::dpi::PhysicalSize;

use crate::types::{Antialiasing, PipelineError, RenderStatus, ShapeParameters};

use super::context::GpuContext;
use super::pipeline::MeshPipeline;
use super::uniforms::FieldUniforms;

/// Owns every GPU resource behind one rendering surface.
///
/// Construction runs the full init sequence (context acquisition, smoke
/// test, shader compile/link, buffer allocation); an error at any step
/// leaves nothing behind, so recovery is always a fresh `new`. Dropping the
/// state releases the device resources.
pub(crate) struct GpuState {
    context: GpuContext,
    pipeline: MeshPipeline,
    uniforms: FieldUniforms,
    multisample_target: Option<MultisampleTarget>,
}

struct MultisampleTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl MultisampleTarget {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        sample_count: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa color target"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

impl GpuState {
    pub(crate) fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        antialiasing: Antialiasing,
    ) -> Result<Self, PipelineError>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, initial_size, antialiasing)?;
        context.smoke_test()?;
        let pipeline = MeshPipeline::new(&context.device, context.surface_format, context.sample_count)?;
        let uniforms = FieldUniforms::new(context.size.width, context.size.height);
        let multisample_target = (context.sample_count > 1).then(|| {
            MultisampleTarget::new(
                &context.device,
                context.surface_format,
                context.size,
                context.sample_count,
            )
        });
        debug!(
            width = context.size.width,
            height = context.size.height,
            samples = context.sample_count,
            format = ?context.surface_format,
            "GPU state initialised"
        );
        Ok(Self {
            context,
            pipeline,
            uniforms,
            multisample_target,
        })
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.context.resize(new_size);
        self.uniforms
            .set_resolution(new_size.width as f32, new_size.height as f32);
        self.multisample_target = (self.context.sample_count > 1).then(|| {
            MultisampleTarget::new(
                &self.context.device,
                self.context.surface_format,
                self.context.size,
                self.context.sample_count,
            )
        });
    }

    /// Draws one frame of the field.
    ///
    /// Transient surface hiccups (outdated swapchain, timeout) drop the
    /// frame as [`RenderStatus::Skipped`]; a lost surface is reported as
    /// [`PipelineError::ContextLost`] for the owner's recovery machinery.
    pub(crate) fn render(
        &mut self,
        points: &[[f32; 2]],
        colors: &[[f32; 3]],
        active: usize,
        shape: ShapeParameters,
    ) -> Result<RenderStatus, PipelineError> {
        let frame = match self.context.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost) => return Err(PipelineError::ContextLost),
            Err(wgpu::SurfaceError::Outdated) => {
                self.context.resize(self.context.size);
                return Ok(RenderStatus::Skipped);
            }
            Err(wgpu::SurfaceError::Timeout) => return Ok(RenderStatus::Skipped),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(PipelineError::ResourceFailure(
                    "surface out of memory".to_string(),
                ))
            }
            Err(other) => {
                return Err(PipelineError::ResourceFailure(format!(
                    "surface error: {other:?}"
                )))
            }
        };

        self.uniforms.set_field(points, colors, active);
        self.uniforms.set_shape(shape);
        self.uniforms.set_resolution(
            self.context.size.width as f32,
            self.context.size.height as f32,
        );
        self.context.queue.write_buffer(
            &self.pipeline.uniform_buffer,
            0,
            bytemuck::bytes_of(&self.uniforms),
        );

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("field render encoder"),
                });
        let (attachment_view, resolve_target) = match self.multisample_target.as_ref() {
            Some(msaa) => (&msaa.view, Some(&view)),
            None => (&view, None),
        };
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("field render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: attachment_view,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.pipeline.pipeline);
            render_pass.set_bind_group(0, &self.pipeline.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.pipeline.quad_buffer.slice(..));
            render_pass.draw(0..4, 0..1);
        }
        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        Ok(RenderStatus::Presented)
    }
}
