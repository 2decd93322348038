// mesh.rs
use crate::pipeline::Profile;
use crate::vertex::{StaticVertex, Vertex};

const RED: [f32; 3] = [1.0, 0.0, 0.0];
const GREEN: [f32; 3] = [0.0, 1.0, 0.0];
const BLUE: [f32; 3] = [0.0, 0.0, 1.0];

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl Mesh {
    /// Appends a triangle, reusing any identical vertex already in the mesh.
    pub fn push_triangle(&mut self, tri: [Vertex; 3]) {
        for v in tri {
            let index = match self.vertices.iter().position(|existing| *existing == v) {
                Some(i) => i,
                None => {
                    self.vertices.push(v);
                    self.vertices.len() - 1
                }
            };
            self.indices.push(index as u16);
        }
    }

    /// `cols * rows` small red/green/blue triangles laid out on the XY plane,
    /// every vertex flagged to wave.
    pub fn triangle_grid(cols: u32, rows: u32, spacing: f32, size: f32) -> Self {
        let mut mesh = Mesh::default();
        let half = size / 2.0;
        for i in 0..cols * rows {
            let x = (i % cols) as f32 * spacing;
            let y = (i / cols) as f32 * spacing;
            mesh.push_triangle([
                Vertex::new([x, y + half, 0.0], RED, true),
                Vertex::new([x - half, y - half, 0.0], GREEN, true),
                Vertex::new([x + half, y - half, 0.0], BLUE, true),
            ]);
        }
        mesh
    }

    /// Unit quad on the XZ plane centred at the origin. Never waves.
    pub fn ground_quad(color: [f32; 3]) -> Self {
        let corners = [[-0.5, 0.0, -0.5], [0.5, 0.0, -0.5], [0.5, 0.0, 0.5], [-0.5, 0.0, 0.5]];
        Mesh {
            vertices: corners.iter().map(|p| Vertex::new(*p, color, false)).collect(),
            indices: vec![0, 2, 1, 0, 3, 2],
        }
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Vertex buffer contents in the layout `profile` consumes.
    pub fn vertex_bytes(&self, profile: &Profile) -> Vec<u8> {
        if profile.has_wave_attribute() {
            bytemuck::cast_slice(self.vertices.as_slice()).to_vec()
        } else {
            let stripped: Vec<StaticVertex> = self.vertices.iter().map(|v| v.to_static()).collect();
            bytemuck::cast_slice(stripped.as_slice()).to_vec()
        }
    }

    /// Index buffer contents; wgpu needs copies padded to 4 bytes.
    pub fn index_bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = bytemuck::cast_slice(self.indices.as_slice()).to_vec();
        bytes.resize(bytes.len().next_multiple_of(4), 0);
        bytes
    }
}
