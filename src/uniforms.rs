// uniforms.rs
use glam::Mat4;

/// Process-wide uniform block, group 0 binding 0.
///
/// Only `time[0]` is read by the wave functions; the other lanes pad the
/// scalar out to the 16-byte alignment WGSL requires before a matrix.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniforms {
    pub time: [f32; 4],
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
}

// What the identity profile binds in place of GlobalUniforms
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TimeUniform {
    pub time: [f32; 4],
}

/// Per-object model matrix, group 1 binding 0.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    pub model: [[f32; 4]; 4],
}

impl GlobalUniforms {
    pub fn new(time: f32, projection: Mat4, view: Mat4) -> Self {
        Self {
            time: [time, 0.0, 0.0, 0.0],
            projection: projection.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
        }
    }

    pub fn identity(time: f32) -> Self {
        Self::new(time, Mat4::IDENTITY, Mat4::IDENTITY)
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.time[0]
    }

    #[inline]
    pub fn projection(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.projection)
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.view)
    }

    pub fn time_only(&self) -> TimeUniform {
        TimeUniform { time: self.time }
    }
}

impl TransformUniform {
    pub const IDENTITY: Self = Self { model: [[1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0], [0.0, 0.0, 0.0, 1.0]] };

    pub fn from_mat4(model: Mat4) -> Self {
        Self { model: model.to_cols_array_2d() }
    }

    #[inline]
    pub fn model(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }
}

/// Byte distance between consecutive transforms in the dynamic-offset buffer.
///
/// `alignment` is the adapter's `min_uniform_buffer_offset_alignment`.
pub fn aligned_transform_stride(alignment: u32) -> wgpu::BufferAddress {
    let align = wgpu::BufferAddress::from(alignment.max(1));
    let unaligned = std::mem::size_of::<TransformUniform>() as wgpu::BufferAddress;
    unaligned.div_ceil(align) * align
}

/// Lays transforms out `stride` bytes apart so each can be bound with its own
/// dynamic offset.
pub fn pack_transforms(transforms: &[TransformUniform], stride: wgpu::BufferAddress) -> Vec<u8> {
    let stride = stride as usize;
    let mut bytes = vec![0u8; stride * transforms.len()];
    for (i, t) in transforms.iter().enumerate() {
        let start = i * stride;
        bytes[start..start + std::mem::size_of::<TransformUniform>()].copy_from_slice(bytemuck::bytes_of(t));
    }
    bytes
}
