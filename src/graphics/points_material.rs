use bevy::{
    pbr::{MaterialPipeline, MaterialPipelineKey},
    prelude::*,
    reflect::TypePath,
    render::{
        mesh::MeshVertexBufferLayoutRef,
        render_resource::{
            AsBindGroup, RenderPipelineDescriptor, ShaderRef, ShaderType,
            SpecializedMeshPipelineError,
        },
    },
};
use bytemuck::{Pod, Zeroable};

const SHADER_ASSET_PATH: &str = "shaders/galaxy_points.wgsl";

pub struct GalaxyPointsMaterialPlugin;

impl Plugin for GalaxyPointsMaterialPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<GalaxyPointsMaterial>::default());
    }
}

// Duplicated in galaxy_points.wgsl, so make sure to update both
#[derive(ShaderType, Pod, Zeroable, Clone, Copy, Debug, Default)]
#[repr(C)]
pub struct PointParams {
    size: f32,
    pad: Vec3,
}

impl PointParams {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            pad: Vec3::ZERO,
        }
    }

    pub fn size(&self) -> f32 {
        self.size
    }
}

/// Camera facing, additively blended quads, one per galaxy point.
/// Color comes from the mesh vertex colors, the quad corner from `ATTRIBUTE_UV_0`.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct GalaxyPointsMaterial {
    #[uniform(0)]
    pub params: PointParams,
}

impl GalaxyPointsMaterial {
    pub fn new(size: f32) -> Self {
        Self {
            params: PointParams::new(size),
        }
    }
}

impl Material for GalaxyPointsMaterial {
    fn vertex_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn fragment_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Add
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        let vertex_layout = layout.0.get_layout(&[
            Mesh::ATTRIBUTE_POSITION.at_shader_location(0),
            Mesh::ATTRIBUTE_UV_0.at_shader_location(1),
            Mesh::ATTRIBUTE_COLOR.at_shader_location(2),
        ])?;
        descriptor.vertex.buffers = vec![vertex_layout];
        descriptor.primitive.cull_mode = None;
        // overlapping points have to add up, not occlude each other
        if let Some(depth_stencil) = descriptor.depth_stencil.as_mut() {
            depth_stencil.depth_write_enabled = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blends_additively_at_the_requested_size() {
        let material = GalaxyPointsMaterial::new(0.02);
        assert_eq!(material.params.size(), 0.02);
        assert!(matches!(material.alpha_mode(), AlphaMode::Add));
    }

    #[test]
    fn uniform_matches_the_wgsl_layout() {
        // f32 at 0, vec3 aligned to 16, rounded up to the struct alignment
        assert_eq!(PointParams::min_size().get(), 32);
    }
}
