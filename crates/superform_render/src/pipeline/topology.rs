//! Primitive assembly for each draw mode
//!
//! wgpu supports point/line/triangle lists and line/triangle strips, but not
//! line loops or triangle fans. Those two are rewritten on the CPU into a
//! line strip and a triangle list. Every other mode draws the base index
//! buffer (or the raw vertex range for unindexed meshes) unchanged.

use superform_core::DrawMode;

/// Where a draw call takes its indices from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSource {
    /// Non-indexed draw over the vertex buffer
    Vertices,
    /// The mesh's own index buffer
    Base,
    /// A per-mode index list derived from the base stream
    Rewritten(Vec<u32>),
}

/// Everything needed to bind and issue one draw call for a draw mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveAssembly {
    pub topology: wgpu::PrimitiveTopology,
    pub source: IndexSource,
    /// Vertex or index count passed to the draw call
    pub count: u32,
}

impl PrimitiveAssembly {
    pub fn is_indexed(&self) -> bool {
        !matches!(self.source, IndexSource::Vertices)
    }
}

/// Native wgpu topology used to realize a draw mode
pub fn topology_for(mode: DrawMode) -> wgpu::PrimitiveTopology {
    match mode {
        DrawMode::Points => wgpu::PrimitiveTopology::PointList,
        DrawMode::Lines => wgpu::PrimitiveTopology::LineList,
        DrawMode::LineLoop | DrawMode::LineStrip => wgpu::PrimitiveTopology::LineStrip,
        DrawMode::Triangles | DrawMode::TriangleFan => wgpu::PrimitiveTopology::TriangleList,
        DrawMode::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
    }
}

/// Whether pipelines for this topology need a strip index format
pub fn is_strip(topology: wgpu::PrimitiveTopology) -> bool {
    matches!(
        topology,
        wgpu::PrimitiveTopology::LineStrip | wgpu::PrimitiveTopology::TriangleStrip
    )
}

/// Build the draw description for `mode`.
///
/// `base` is the mesh index buffer; when empty the mesh is drawn as a
/// sequential vertex range of `vertex_count`.
pub fn assemble(mode: DrawMode, base: &[u32], vertex_count: u32) -> PrimitiveAssembly {
    let topology = topology_for(mode);

    match mode {
        DrawMode::LineLoop => {
            let indices = close_loop(stream(base, vertex_count));
            PrimitiveAssembly {
                topology,
                count: indices.len() as u32,
                source: IndexSource::Rewritten(indices),
            }
        }
        DrawMode::TriangleFan => {
            let indices = fan_to_list(&stream(base, vertex_count));
            PrimitiveAssembly {
                topology,
                count: indices.len() as u32,
                source: IndexSource::Rewritten(indices),
            }
        }
        _ if base.is_empty() => PrimitiveAssembly {
            topology,
            source: IndexSource::Vertices,
            count: vertex_count,
        },
        _ => PrimitiveAssembly {
            topology,
            source: IndexSource::Base,
            count: base.len() as u32,
        },
    }
}

/// Element count [`assemble`] yields for `mode`, without building the indices
pub fn assembled_len(mode: DrawMode, base_len: u64, vertex_count: u32) -> u64 {
    let stream = if base_len == 0 {
        vertex_count as u64
    } else {
        base_len
    };
    match mode {
        DrawMode::LineLoop if stream >= 2 => stream + 1,
        DrawMode::TriangleFan if stream >= 3 => 3 * (stream - 2),
        DrawMode::LineLoop | DrawMode::TriangleFan => 0,
        _ => stream,
    }
}

/// The index stream a mode reads: the base list, or `0..vertex_count`
fn stream(base: &[u32], vertex_count: u32) -> Vec<u32> {
    if base.is_empty() {
        (0..vertex_count).collect()
    } else {
        base.to_vec()
    }
}

/// Line loop as a strip: append the first index to close the loop
fn close_loop(mut indices: Vec<u32>) -> Vec<u32> {
    if indices.len() >= 2 {
        indices.push(indices[0]);
    } else {
        indices.clear();
    }
    indices
}

/// Fan `(i0, i1, i2, ...)` as a list of `(i0, ik, ik+1)`
fn fan_to_list(indices: &[u32]) -> Vec<u32> {
    let Some((&hub, rim)) = indices.split_first() else {
        return Vec::new();
    };
    rim.windows(2)
        .flat_map(|edge| [hub, edge[0], edge[1]])
        .collect()
}
