use bytemuck::{Pod, Zeroable};

use crate::paint::Color;

/// Vertex position in clip space.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { position: [x, y, z] }
    }

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// One non-indexed draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DrawCall {
    pub vertex_count: u32,
    pub instance_count: u32,
    pub topology: wgpu::PrimitiveTopology,
}

/// A single triangle over a constant background.
///
/// Immutable once built; the vertices are uploaded once when the pipeline is
/// created.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TriangleScene {
    vertices: [Vertex; 3],
    clear_color: Color,
}

impl TriangleScene {
    /// Apex up, base along the bottom edge of clip space.
    pub const DEFAULT_VERTICES: [Vertex; 3] = [
        Vertex::new(0.0, 1.0, 0.0),
        Vertex::new(-1.0, -1.0, 0.0),
        Vertex::new(1.0, -1.0, 0.0),
    ];

    pub fn new(vertices: [Vertex; 3], clear_color: Color) -> Self {
        Self {
            vertices,
            clear_color,
        }
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex; 3] {
        &self.vertices
    }

    #[inline]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    /// Three vertices, one instance, triangle list.
    #[inline]
    pub fn draw_call(&self) -> DrawCall {
        DrawCall {
            vertex_count: self.vertices.len() as u32,
            instance_count: 1,
            topology: wgpu::PrimitiveTopology::TriangleList,
        }
    }
}

impl Default for TriangleScene {
    fn default() -> Self {
        // Dark green background.
        Self::new(Self::DEFAULT_VERTICES, Color::from_u8(0, 104, 55, 255))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_call_is_one_triangle() {
        let call = TriangleScene::default().draw_call();
        assert_eq!(call.vertex_count, 3);
        assert_eq!(call.instance_count, 1);
        assert_eq!(call.topology, wgpu::PrimitiveTopology::TriangleList);
    }

    #[test]
    fn default_background_is_opaque() {
        assert!(TriangleScene::default().clear_color().is_opaque());
    }

    #[test]
    fn vertex_stride_is_three_floats() {
        assert_eq!(Vertex::layout().array_stride, 12);
        assert_eq!(bytemuck::cast_slice::<Vertex, u8>(TriangleScene::default().vertices()).len(), 36);
    }
}
