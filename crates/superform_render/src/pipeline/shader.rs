//! Shader program loading and compilation
//!
//! Compilation runs inside a validation error scope so a malformed program
//! comes back as [`RenderError::ShaderCompileFailure`] instead of a panic
//! from the uncaptured-error handler.

use crate::RenderError;

/// Built-in superformula program
pub const DEFAULT_SHADER: &str = include_str!("../../shaders/superformula.wgsl");

/// Vertex entry point for meshes without UVs
pub const VERTEX_ENTRY: &str = "vs_main";
/// Vertex entry point for meshes carrying a UV buffer
pub const VERTEX_ENTRY_UV: &str = "vs_main_uv";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Prefix every line with its 1-based number and a tab
pub fn numbered_source(source: &str) -> String {
    source
        .lines()
        .enumerate()
        .map(|(i, line)| format!("{}:\t{}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Compile a WGSL module, reporting validation errors with numbered source
pub fn compile_module(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> Result<wgpu::ShaderModule, RenderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    match pollster::block_on(device.pop_error_scope()) {
        None => Ok(module),
        Some(err) => {
            let numbered = numbered_source(source);
            log::error!("Shader '{}' failed to compile:\n{}", label, numbered);
            Err(RenderError::ShaderCompileFailure {
                label: label.to_string(),
                diagnostic: format!("{}\n\n{}", err, numbered),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::UniformSlot;

    #[test]
    fn test_numbered_source() {
        let numbered = numbered_source("fn a() {}\n\nfn b() {}");
        assert_eq!(numbered, "1:\tfn a() {}\n2:\t\n3:\tfn b() {}");
    }

    #[test]
    fn test_default_shader_declares_entry_points() {
        for entry in [VERTEX_ENTRY, VERTEX_ENTRY_UV, FRAGMENT_ENTRY] {
            assert!(
                DEFAULT_SHADER.contains(&format!("fn {}(", entry)),
                "missing entry point {}",
                entry
            );
        }
    }

    #[test]
    fn test_default_shader_declares_every_uniform() {
        for slot in UniformSlot::ALL {
            let member = format!("    {}: ", slot.member());
            assert!(DEFAULT_SHADER.contains(&member), "uniform {} missing", slot.name());
        }
    }
}
