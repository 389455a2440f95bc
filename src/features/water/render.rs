use bevy::prelude::*;
use bevy::render::mesh::Indices;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::PrimitiveTopology;

use crate::components::{FloatingCrate, SandSurface, WaterSurface};
use crate::features::water::grid::from_fixed;
use crate::features::water::sand::SandField;
use crate::features::water::simulation::{WaterSet, WaterSimulation};
use crate::features::water::surface::WaterField;
use crate::resources::WaterConfig;

/// Depth of the floor plane that hides gaps under the seabed.
const FLOOR_DEPTH: f32 = -2.0;
/// Edge length of the floating crate.
const CRATE_SIZE: f32 = 2.0;

#[derive(Default)]
pub struct WaterRenderPlugin;

impl Plugin for WaterRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_water_scene)
            .add_systems(Update, (sync_water_mesh, sync_floating_crate).in_set(WaterSet::Present));
    }
}

/// World position of grid vertex `(x, y)` at elevation `height`.
pub fn vertex_position(x: usize, y: usize, height: f32, spacing: f32) -> [f32; 3] {
    [
        x as f32 * spacing + spacing / 2.0,
        height,
        y as f32 * spacing + spacing / 2.0,
    ]
}

/// Triangle indices for an N×N vertex grid, two triangles per quad.
pub fn grid_indices(size: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(size.saturating_sub(1).pow(2) * 6);
    let n = size as u32;
    for x in 1..n {
        for y in 1..n {
            let here = x * n + y;
            let north = x * n + (y - 1);
            let west = (x - 1) * n + y;
            let north_west = (x - 1) * n + (y - 1);

            indices.extend_from_slice(&[here, north, north_west]);
            indices.extend_from_slice(&[north_west, west, here]);
        }
    }
    indices
}

/// Normals from central differences over an N×N height grid.
pub fn grid_normals(heights: &[f32], size: usize, spacing: f32) -> Vec<[f32; 3]> {
    let at = |x: usize, y: usize| heights[x * size + y];
    let mut normals = Vec::with_capacity(size * size);
    for x in 0..size {
        for y in 0..size {
            let dx = at((x + 1).min(size - 1), y) - at(x.saturating_sub(1), y);
            let dz = at(x, (y + 1).min(size - 1)) - at(x, y.saturating_sub(1));
            let normal = Vec3::new(-dx, 2.0 * spacing, -dz).normalize_or_zero();
            normals.push(normal.to_array());
        }
    }
    normals
}

fn sand_heights(sand: &SandField, scale: f32) -> Vec<f32> {
    sand.cells()
        .iter()
        .map(|(_, cell)| from_fixed(cell.fixed_height) * scale)
        .collect()
}

/// Water elevations in vertex order, scaled by the wave height.
pub fn water_heights(water: &WaterField, scale: f32) -> Vec<f32> {
    water
        .cells()
        .iter()
        .map(|(_, cell)| cell.render_height_f32() * scale)
        .collect()
}

/// Vertex colors for the water surface with the given 0-31 alpha.
pub fn water_colors(water: &WaterField, alpha: u8) -> Vec<[f32; 4]> {
    water
        .cells()
        .iter()
        .map(|(_, cell)| {
            let color = cell.color.to_linear(alpha);
            [color.red, color.green, color.blue, color.alpha]
        })
        .collect()
}

fn positions(heights: &[f32], size: usize, spacing: f32) -> Vec<[f32; 3]> {
    heights
        .iter()
        .enumerate()
        .map(|(i, h)| vertex_position(i / size, i % size, *h, spacing))
        .collect()
}

/// Builds the static seabed mesh.
pub fn build_sand_mesh(sand: &SandField, config: &WaterConfig) -> Mesh {
    let size = sand.size();
    let heights = sand_heights(sand, config.sand_height);
    let spacing = config.cell_spacing;

    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions(&heights, size, spacing))
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, grid_normals(&heights, size, spacing))
        .with_inserted_indices(Indices::U32(grid_indices(size)))
}

/// Writes the current water heights and colors into `mesh`.
pub fn write_water_mesh(mesh: &mut Mesh, simulation: &WaterSimulation, config: &WaterConfig) {
    let water = simulation.water();
    let size = water.size();
    let heights = water_heights(water, config.wave_height);
    let spacing = config.cell_spacing;

    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions(&heights, size, spacing));
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, grid_normals(&heights, size, spacing));
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, water_colors(water, simulation.style().alpha()));
    mesh.insert_indices(Indices::U32(grid_indices(size)));
}

/// Quads drawn per frame: water, seabed, floor and the six crate faces.
pub fn quad_count(grid_size: usize) -> usize {
    let cells = grid_size.saturating_sub(1).pow(2);
    cells * 2 + 1 + 6
}

pub fn spawn_water_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    simulation: Res<WaterSimulation>,
    config: Res<WaterConfig>,
) {
    let extent = simulation.grid_size() as f32 * config.cell_spacing;
    let center = config.world_center();

    commands.insert_resource(ClearColor(Color::BLACK));
    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            ..default()
        },
        Transform::from_xyz(center, 20.0, center)
            .looking_at(Vec3::new(center * 0.5, 0.0, center * 1.5), Vec3::Y),
    ));

    // Floor under the seabed
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(extent + 2.0, extent + 2.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.55, 0.48, 0.33),
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::from_xyz(center, FLOOR_DEPTH, center),
    ));

    commands.spawn((
        Mesh3d(meshes.add(build_sand_mesh(simulation.sand(), &config))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.86, 0.76, 0.52),
            perceptual_roughness: 1.0,
            double_sided: true,
            cull_mode: None,
            ..default()
        })),
        Transform::default(),
        SandSurface,
    ));

    let mut water_mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    write_water_mesh(&mut water_mesh, &simulation, &config);
    let water_material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        double_sided: true,
        cull_mode: None,
        ..default()
    });
    commands.spawn((
        Mesh3d(meshes.add(water_mesh)),
        MeshMaterial3d(water_material),
        Transform::default(),
        WaterSurface,
    ));

    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(CRATE_SIZE, CRATE_SIZE, CRATE_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.62, 0.42, 0.22),
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::from_translation(simulation.float_position()),
        FloatingCrate,
    ));

    info!("Spawned water scene ({} quads)", quad_count(simulation.grid_size()));
}

pub fn sync_water_mesh(
    simulation: Res<WaterSimulation>,
    config: Res<WaterConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    query: Query<&Mesh3d, With<WaterSurface>>,
) {
    let Ok(mesh3d) = query.get_single() else {
        warn_once!("Water Render: No WaterSurface entity found!");
        return;
    };
    let Some(mesh) = meshes.get_mut(&mesh3d.0) else {
        warn_once!("Water Render: Mesh asset not found!");
        return;
    };

    write_water_mesh(mesh, &simulation, &config);
}

pub fn sync_floating_crate(
    simulation: Res<WaterSimulation>,
    mut query: Query<&mut Transform, With<FloatingCrate>>,
) {
    for mut transform in query.iter_mut() {
        transform.translation = simulation.float_position();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::water::noise_source::NoiseSource;

    struct Flat(f32);

    impl NoiseSource for Flat {
        fn sample(&self, _x: f32, _y: f32) -> f32 {
            self.0
        }
    }

    fn simulation(size: usize) -> (WaterSimulation, WaterConfig) {
        let config = WaterConfig {
            grid_size: size,
            rng_seed: Some(1),
            ..default()
        };
        let sim = WaterSimulation::new(&config, Box::new(Flat(0.5))).unwrap();
        (sim, config)
    }

    #[test]
    fn test_grid_indices() {
        let indices = grid_indices(3);
        assert_eq!(indices.len(), 4 * 6);
        assert!(indices.iter().all(|i| *i < 9));
        assert!(grid_indices(1).is_empty());
    }

    #[test]
    fn test_vertex_position_centres_cells() {
        assert_eq!(vertex_position(0, 0, 0.5, 2.0), [1.0, 0.5, 1.0]);
        assert_eq!(vertex_position(5, 8, 0.0, 2.0), [11.0, 0.0, 17.0]);
    }

    #[test]
    fn test_flat_normals_point_up() {
        let normals = grid_normals(&[1.0; 16], 4, 2.0);
        assert!(normals.iter().all(|n| *n == [0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_water_heights_scale_render_height() {
        let (sim, config) = simulation(4);
        let heights = water_heights(sim.water(), config.wave_height);
        assert_eq!(heights.len(), 16);
        assert!(heights.iter().all(|h| (*h - 3.0).abs() < 1e-6));
    }

    #[test]
    fn test_water_colors_carry_style_alpha() {
        let (sim, _) = simulation(4);
        let colors = water_colors(sim.water(), sim.style().alpha());
        assert!(colors.iter().all(|c| (c[3] - 15.0 / 31.0).abs() < 1e-6));
    }

    #[test]
    fn test_write_water_mesh_fills_attributes() {
        let (sim, config) = simulation(4);
        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
        write_water_mesh(&mut mesh, &sim, &config);
        assert_eq!(mesh.count_vertices(), 16);
        assert!(mesh.attribute(Mesh::ATTRIBUTE_COLOR).is_some());
        assert_eq!(mesh.indices().map(|i| i.len()), Some(9 * 6));
    }

    #[test]
    fn test_quad_count() {
        assert_eq!(quad_count(14), 13 * 13 * 2 + 7);
    }
}
