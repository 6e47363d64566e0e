//! Spring relaxation (spec §4.6, component C6): the inner mechanical loop
//! run `numMechanicalIterations` times per tick — Hooke + damping force
//! accumulation, Verlet-style position integration, and every-K-th-step
//! ocean-floor collision.

use crate::ids::PointIndex;
use crate::materials::MaterialDatabase;
use crate::mesh::point::PointStore;
use crate::mesh::spring::SpringStore;
use crate::params::GameParameters;
use glam::Vec2;

/// Every this-many-th inner iteration also resolves ocean-floor collision
/// (spec §4.6: "Every K-th inner step (K=2)").
const FLOOR_COLLISION_STRIDE: u32 = 2;

/// Runs the full `N`-iteration relaxation loop for one ship, then the
/// single post-loop strain update. `floor_height_at` and `floor_normal_at`
/// let the ocean floor (C11) stay a separate module without a dependency
/// cycle; a flat-world caller can pass `|_| f32::NEG_INFINITY`.
pub fn relax(
    points: &mut PointStore,
    springs: &mut SpringStore,
    materials: &MaterialDatabase,
    params: &GameParameters,
    gravity: Vec2,
    dt: f32,
    floor_height_at: impl Fn(f32) -> f32,
    floor_normal_at: impl Fn(f32) -> Vec2,
) {
    let n = params.num_mechanical_iterations.max(1);
    let dt_per_iteration = dt / n as f32;

    springs.update_for_mass(points, dt_per_iteration, 1.0, params.spring_stiffness_adjustment);
    springs.update_for_damping(points, dt_per_iteration, 1.0, params.spring_damping_adjustment);

    for iteration in 0..n {
        accumulate_spring_forces(points, springs);
        integrate(points, gravity, dt_per_iteration);

        if iteration % FLOOR_COLLISION_STRIDE == 0 {
            resolve_floor_collisions(points, materials, params, &floor_height_at, &floor_normal_at);
        }
    }
}

fn accumulate_spring_forces(points: &mut PointStore, springs: &SpringStore) {
    for i in 0..springs.springs.len() {
        let s = springs.springs[i];
        if s.deleted {
            continue;
        }
        let index = crate::ids::SpringIndex::from(i);
        let force = springs.hooke_force(index, points);
        points.force_dynamic[s.point_a.index()] += force;
        points.force_dynamic[s.point_b.index()] -= force;
    }
}

fn integrate(points: &mut PointStore, gravity: Vec2, dt: f32) {
    for i in 0..points.total_len() {
        if points.meta[i].pinned {
            points.force_dynamic[i] = Vec2::ZERO;
            continue;
        }
        let gravity_force = gravity * points.current_mass[i];
        let total_force = points.force_dynamic[i] + points.force_static[i] + gravity_force;
        let factor = points.integration_factor[i];

        let old_position = points.position[i];
        let displacement = points.velocity[i] * dt + total_force * factor;
        let new_position = old_position + displacement;

        points.position[i] = new_position;
        points.velocity[i] = (new_position - old_position) / dt;
        points.force_dynamic[i] = Vec2::ZERO;
    }
}

fn resolve_floor_collisions(
    points: &mut PointStore,
    materials: &MaterialDatabase,
    params: &GameParameters,
    floor_height_at: &impl Fn(f32) -> f32,
    floor_normal_at: &impl Fn(f32) -> Vec2,
) {
    for i in 0..points.raw_count() {
        if points.meta[i].pinned || points.meta[i].damaged {
            continue;
        }
        let p = points.position[i];
        let floor_y = floor_height_at(p.x);
        if p.y >= floor_y {
            continue;
        }

        let normal = floor_normal_at(p.x).normalize_or_zero();
        if normal == Vec2::ZERO {
            continue;
        }

        let material = materials.structural(points.meta[i].material);
        let elasticity = material.elasticity * params.ocean_floor_elasticity;

        let velocity = points.velocity[i];
        let normal_speed = velocity.dot(normal);
        let tangent = Vec2::new(-normal.y, normal.x);
        let tangent_speed = velocity.dot(tangent);

        let reflected_normal_speed = if normal_speed < 0.0 { -normal_speed * elasticity } else { normal_speed };

        let friction_coefficient = if tangent_speed.abs() < 1e-3 {
            material.static_friction * params.ocean_floor_friction_static
        } else {
            material.kinetic_friction * params.ocean_floor_friction_kinetic
        };
        let damped_tangent_speed = tangent_speed * (1.0 - friction_coefficient).max(0.0);

        points.velocity[i] = normal * reflected_normal_speed + tangent * damped_tangent_speed;
        points.position[i] = p - normal * (p.y - floor_y).min(0.0);
    }
}

/// Convenience for callers that just want to push one point's force
/// directly (used by tools and force fields, spec §4.8/§4.13), bypassing
/// the spring pass.
pub fn apply_point_force(points: &mut PointStore, index: PointIndex, force: Vec2) {
    points.force_dynamic[index.index()] += force;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{MaterialId, StructuralMaterial};
    use crate::mesh::spring::{SpringCharacteristics, SpringStore};

    fn flat_floor(_x: f32) -> f32 {
        f32::NEG_INFINITY
    }
    fn up(_x: f32) -> Vec2 {
        Vec2::Y
    }

    #[test]
    fn free_point_falls_under_gravity() {
        let mut points = PointStore::new(1, 0);
        let mut springs = SpringStore::new();
        let materials = MaterialDatabase::default();
        let params = GameParameters::default();

        let p = points.add_raw(MaterialId::default(), Vec2::new(0.0, 100.0), 1.0, 1.0);
        points.update_mass_and_integration_factor(DEFAULT_DT_FOR_TEST, |_| 1.0, |_| 1000.0);

        for _ in 0..60 {
            relax(&mut points, &mut springs, &materials, &params, Vec2::new(0.0, -9.81), DEFAULT_DT_FOR_TEST, flat_floor, up);
            points.update_mass_and_integration_factor(DEFAULT_DT_FOR_TEST, |_| 1.0, |_| 1000.0);
        }

        let y = points.position[p.index()].y;
        assert!((y - 95.09).abs() < 1.0, "expected ~95.09, got {y}");
    }

    #[test]
    fn spring_at_rest_length_does_not_drift() {
        let mut points = PointStore::new(2, 0);
        let mut springs = SpringStore::new();
        let mut materials = MaterialDatabase::default();
        let mat = materials.register_structural(StructuralMaterial::default());

        let a = points.add_raw(mat, Vec2::new(-0.5, 0.0), 1.0, 1.0);
        let b = points.add_raw(mat, Vec2::new(0.5, 0.0), 1.0, 1.0);
        springs.add(a, b, 0, 4, 100.0, 1.0, 1.0, SpringCharacteristics::default(), 0.0);
        points.update_mass_and_integration_factor(DEFAULT_DT_FOR_TEST, |_| 1.0, |_| 1000.0);

        let params = GameParameters::default();
        for _ in 0..30 {
            relax(&mut points, &mut springs, &materials, &params, Vec2::ZERO, DEFAULT_DT_FOR_TEST, flat_floor, up);
        }

        let dist = (points.position[b.index()] - points.position[a.index()]).length();
        assert!((dist - 1.0).abs() < 0.05);
    }

    const DEFAULT_DT_FOR_TEST: f32 = 1.0 / 60.0;
}
