// vertex.rs
use bytemuck::{Pod, Zeroable};
use crate::error::PipelineError;

/// Vertex record for wave-capable profiles.
///
/// `should_wave` is a 1-bit flag stored as `u32`: 0 keeps the position static,
/// 1 runs it through the profile's wave function.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub should_wave: u32,
}

// Profiles without a wave mode upload this instead (no flag attribute)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct StaticVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // color
        2 => Uint32     // should_wave
    ];

    pub fn new(position: [f32; 3], color: [f32; 3], should_wave: bool) -> Self {
        Self { position, color, should_wave: should_wave as u32 }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }

    pub fn to_static(self) -> StaticVertex {
        StaticVertex { position: self.position, color: self.color }
    }
}

impl StaticVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3  // color
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<StaticVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Rejects vertex data whose wave flag is outside {0, 1}.
///
/// The shaders only deform on an exact `1`, so anything else is a data bug
/// upstream of the pipeline. Run before uploading, never inside a draw.
pub fn validate_wave_flags(vertices: &[Vertex]) -> Result<(), PipelineError> {
    match vertices.iter().position(|v| v.should_wave > 1) {
        Some(index) => Err(PipelineError::InvalidWaveFlag { index, value: vertices[index].should_wave }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wave_vertex_layout_matches_buffer_contract() {
        assert_eq!(std::mem::size_of::<Vertex>(), 28);
        let desc = Vertex::desc();
        assert_eq!(desc.array_stride, 28);
        let offsets: Vec<_> = desc.attributes.iter().map(|a| (a.shader_location, a.offset)).collect();
        assert_eq!(offsets, vec![(0, 0), (1, 12), (2, 24)]);
        assert_eq!(desc.attributes[2].format, wgpu::VertexFormat::Uint32);
    }

    #[test]
    fn static_vertex_drops_flag() {
        assert_eq!(std::mem::size_of::<StaticVertex>(), 24);
        assert_eq!(StaticVertex::desc().attributes.len(), 2);

        let v = Vertex::new([1.0, 2.0, 3.0], [0.5, 0.5, 0.5], true);
        assert_eq!(v.to_static(), StaticVertex { position: [1.0, 2.0, 3.0], color: [0.5, 0.5, 0.5] });
    }

    #[test]
    fn flag_validation_reports_first_bad_index() {
        let mut verts = vec![Vertex::new([0.0; 3], [1.0; 3], false); 4];
        verts[1].should_wave = 1;
        assert!(validate_wave_flags(&verts).is_ok());

        verts[2].should_wave = 7;
        verts[3].should_wave = 2;
        match validate_wave_flags(&verts) {
            Err(PipelineError::InvalidWaveFlag { index, value }) => {
                assert_eq!(index, 2);
                assert_eq!(value, 7);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
