use std::mem;

use glam::{vec3, Mat4, Vec3, Vec4};
use wgpu::util::DeviceExt;

use trackcar_game::vehicle::{DriveMode, VehicleState};

use crate::texture;

/// Height of the car above the ground plane.
pub const CAR_HEIGHT: f32 = 0.05;

const MANUAL_COLOR: Vec4 = Vec4::new(0.85, 0.1, 0.1, 1.0);
const AUTONOMOUS_COLOR: Vec4 = Vec4::new(0.1, 0.35, 0.95, 1.0);

#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
struct Vertex {
    position: Vec3,
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
struct CarUniform {
    model: Mat4,
    color: Vec4,
}

impl CarUniform {
    fn of(vehicle: &VehicleState) -> Self {
        let model = Mat4::from_translation(vehicle.position.extend(CAR_HEIGHT))
            * Mat4::from_rotation_z(vehicle.heading.to_radians());
        let color = match vehicle.mode {
            DriveMode::Manual => MANUAL_COLOR,
            DriveMode::Autonomous => AUTONOMOUS_COLOR,
        };

        Self { model, color }
    }
}

/// Arrow pointing along +y, the direction of heading 0.
const VERTICES: [Vertex; 6] = [
    Vertex {
        position: vec3(0.0, 0.6, 0.0),
    },
    Vertex {
        position: vec3(-0.35, -0.4, 0.0),
    },
    Vertex {
        position: vec3(0.0, -0.2, 0.0),
    },
    Vertex {
        position: vec3(0.0, 0.6, 0.0),
    },
    Vertex {
        position: vec3(0.0, -0.2, 0.0),
    },
    Vertex {
        position: vec3(0.35, -0.4, 0.0),
    },
];

pub struct CarRenderer {
    car_buffer: wgpu::Buffer,
    car_bind_group: wgpu::BindGroup,
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
}

impl CarRenderer {
    pub fn new(
        device: &wgpu::Device,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        color_target_format: wgpu::TextureFormat,
        vehicle: &VehicleState,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::include_wgsl!("car.wgsl"));

        let car_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Car Buffer"),
            contents: bytemuck::cast_slice(&[CarUniform::of(vehicle)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let car_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("car_bind_group_layout"),
            });

        let car_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &car_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: car_buffer.as_entire_binding(),
            }],
            label: Some("car_bind_group"),
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Car Render Pipeline Layout"),
                bind_group_layouts: &[camera_bind_group_layout, &car_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Car Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: texture::Texture::DEPTH_FORMAT,
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
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Car Vertex Buffer"),
            contents: bytemuck::cast_slice(&VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            car_buffer,
            car_bind_group,
            render_pipeline,
            vertex_buffer,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, vehicle: &VehicleState) {
        queue.write_buffer(
            &self.car_buffer,
            0,
            bytemuck::cast_slice(&[CarUniform::of(vehicle)]),
        );
    }

    pub fn render(&self, render_pass: &mut wgpu::RenderPass, camera_bind_group: &wgpu::BindGroup) {
        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_bind_group(0, camera_bind_group, &[]);
        render_pass.set_bind_group(1, &self.car_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..VERTICES.len() as u32, 0..1);
    }
}
