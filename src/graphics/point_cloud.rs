use super::GalaxyPointsMaterial;
use crate::galaxy::{generate, GalaxyParameters, ParametersChanged, PointBuffer};
use bevy::{
    prelude::*,
    render::{
        mesh::{Indices, PrimitiveTopology},
        render_asset::RenderAssetUsages,
        view::NoFrustumCulling,
    },
};
use std::f32::consts::PI;

pub struct PointCloudPlugin;

impl Plugin for PointCloudPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GalaxyPointCloud>()
            .add_event::<GalaxyDisposed>()
            .add_systems(Startup, request_initial_galaxy)
            .add_systems(Update, (regenerate_on_change, rotate_galaxy).chain());
    }
}

/// Marks the entity currently drawing the galaxy
#[derive(Component)]
pub struct GalaxyPoints;

struct LiveGalaxy {
    entity: Entity,
    mesh: Handle<Mesh>,
    material: Handle<GalaxyPointsMaterial>,
    generation: u32,
}

/// Owns whatever galaxy is attached to the scene, at most one at a time
#[derive(Resource, Default)]
pub struct GalaxyPointCloud {
    live: Option<LiveGalaxy>,
    generation: u32,
}

impl GalaxyPointCloud {
    pub fn entity(&self) -> Option<Entity> {
        self.live.as_ref().map(|live| live.entity)
    }

    pub fn mesh(&self) -> Option<AssetId<Mesh>> {
        self.live.as_ref().map(|live| live.mesh.id())
    }

    pub fn material(&self) -> Option<AssetId<GalaxyPointsMaterial>> {
        self.live.as_ref().map(|live| live.material.id())
    }

    /// Number of galaxies generated so far
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Fired once for every galaxy that was detached and had its assets released
#[derive(Event, Debug, Clone, Copy)]
pub struct GalaxyDisposed {
    pub generation: u32,
    pub mesh: AssetId<Mesh>,
}

const QUAD_CORNERS: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];

/// Expands every point into a quad sharing the point's position.
/// The shader pushes the corners apart in view space.
pub fn build_mesh(buffer: &PointBuffer) -> Mesh {
    let vertex_count = buffer.len() * QUAD_CORNERS.len();

    let mut positions = Vec::with_capacity(vertex_count);
    let mut corners = Vec::with_capacity(vertex_count);
    let mut colors = Vec::with_capacity(vertex_count);
    let mut indices = Vec::with_capacity(buffer.len() * 6);

    for (i, (position, color)) in buffer.points().enumerate() {
        let base = (i * QUAD_CORNERS.len()) as u32;
        for corner in QUAD_CORNERS {
            positions.push(*position);
            corners.push(corner);
            colors.push([color[0], color[1], color[2], 1.0]);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, corners)
    .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
    .with_inserted_indices(Indices::U32(indices))
}

/// Y rotation of the galaxy, a pure function of elapsed time so it never drifts
pub fn galaxy_rotation(elapsed_secs: f32) -> f32 {
    (elapsed_secs * 0.1).cos() * PI
}

fn request_initial_galaxy(mut changes: EventWriter<ParametersChanged>) {
    changes.write(ParametersChanged);
}

/// Regenerates and swaps the galaxy, at most once per frame however many edits came in
fn regenerate_on_change(
    mut commands: Commands,
    mut changes: EventReader<ParametersChanged>,
    mut disposed: EventWriter<GalaxyDisposed>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<GalaxyPointsMaterial>>,
    mut cloud: ResMut<GalaxyPointCloud>,
    params: Res<GalaxyParameters>,
) {
    if changes.is_empty() {
        return;
    }
    changes.clear();

    info!("Galaxy parameters updated, regenerating galaxy");

    if let Some(stale) = cloud.live.take() {
        meshes.remove(&stale.mesh);
        materials.remove(&stale.material);
        commands.entity(stale.entity).despawn();

        debug!(generation = stale.generation, "Released stale galaxy");
        disposed.write(GalaxyDisposed {
            generation: stale.generation,
            mesh: stale.mesh.id(),
        });
    }

    // nothing renders until this system returns, so the swap is never seen half done
    let buffer = generate(&params);
    let mesh = meshes.add(build_mesh(&buffer));
    let material = materials.add(GalaxyPointsMaterial::new(params.size));

    let entity = commands
        .spawn((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::IDENTITY,
            Visibility::Inherited,
            GalaxyPoints,
            NoFrustumCulling,
        ))
        .id();

    cloud.generation += 1;
    cloud.live = Some(LiveGalaxy {
        entity,
        mesh,
        material,
        generation: cloud.generation,
    });

    info!(
        generation = cloud.generation,
        points = buffer.len(),
        branches = params.branches,
        "Galaxy generated"
    );
}

fn rotate_galaxy(time: Res<Time>, mut galaxies: Query<&mut Transform, With<GalaxyPoints>>) {
    let rotation = Quat::from_rotation_y(galaxy_rotation(time.elapsed_secs()));
    for mut transform in &mut galaxies {
        transform.rotation = rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::galaxy::generate_with;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn every_point_becomes_a_quad() {
        let params = GalaxyParameters {
            count: 250,
            ..default()
        };
        let buffer = generate_with(&params, &mut StdRng::seed_from_u64(1));
        let mesh = build_mesh(&buffer);

        assert_eq!(mesh.count_vertices(), 250 * 4);
        assert_eq!(mesh.indices().map(|i| i.len()), Some(250 * 6));
        assert_eq!(mesh.primitive_topology(), PrimitiveTopology::TriangleList);
    }

    #[test]
    fn quad_corners_share_the_point_position() {
        let params = GalaxyParameters {
            count: 3,
            ..default()
        };
        let buffer = generate_with(&params, &mut StdRng::seed_from_u64(5));
        let mesh = build_mesh(&buffer);

        let Some(positions) = mesh
            .attribute(Mesh::ATTRIBUTE_POSITION)
            .and_then(|attribute| attribute.as_float3())
        else {
            panic!("mesh has no float3 positions");
        };
        for (i, (position, _)) in buffer.points().enumerate() {
            assert!(positions[i * 4..i * 4 + 4].iter().all(|p| p == position));
        }
    }

    #[test]
    fn rotation_follows_elapsed_time() {
        assert_eq!(galaxy_rotation(0.0), PI);
        // cos(pi) at ten pi seconds
        assert!((galaxy_rotation(10.0 * PI) + PI).abs() < 1e-5);
        assert_eq!(galaxy_rotation(4.2), galaxy_rotation(4.2));
    }
}
