//! Force fields (spec §4.8, component C8): value objects applied over every
//! point once per invocation. Used by interaction tools (draw/swirl) and by
//! gadget explosions (blast/implosion/radial explosion/space warp).

use crate::mesh::point::{DetachOptions, EphemeralType, PointStore};
use glam::Vec2;
use rand::Rng;

#[derive(Debug, Clone, Copy)]
pub enum ForceField {
    Draw { center: Vec2, strength: f32 },
    Swirl { center: Vec2, strength: f32 },
    Blast { center: Vec2, blast_radius: f32, strength: f32, detach_closest: bool, min_debris_v: f32, max_debris_v: f32 },
    RadialSpaceWarp { center: Vec2, radius: f32, radius_thickness: f32, strength: f32 },
    Implosion { center: Vec2, strength: f32 },
    RadialExplosion { center: Vec2, strength: f32 },
}

/// Applies `field` to every non-pinned, non-ephemeral raw point, returning
/// the index of a point it wants detached (Blast only, when requested and a
/// closest point was found).
pub fn apply(field: &ForceField, points: &mut PointStore, rng: &mut impl Rng) -> Option<crate::ids::PointIndex> {
    match *field {
        ForceField::Draw { center, strength } => {
            for_each_point(points, |p, force| {
                let delta = center - *p;
                let dist = delta.length().max(1e-3);
                *force += (delta / dist) * (strength / (0.1 + dist).sqrt());
            });
            None
        }
        ForceField::Swirl { center, strength } => {
            for_each_point(points, |p, force| {
                let delta = center - *p;
                let dist = delta.length().max(1e-3);
                let perp = crate::math::perp(delta / dist);
                *force += perp * (strength / (0.1 + dist).sqrt());
            });
            None
        }
        ForceField::RadialExplosion { center, strength } => {
            for_each_point(points, |p, force| {
                let delta = *p - center;
                let dist = delta.length().max(1e-3);
                *force += (delta / dist) * (strength / (0.1 + dist).sqrt());
            });
            None
        }
        ForceField::RadialSpaceWarp { center, radius, radius_thickness, strength } => {
            for_each_point(points, |p, force| {
                let delta = *p - center;
                let dist = delta.length().max(1e-3);
                let shell_distance = dist - radius;
                if shell_distance.abs() <= radius_thickness {
                    let sign = if shell_distance < 0.0 { 1.0 } else { -1.0 };
                    *force += (delta / dist) * strength * sign * (1.0 - shell_distance.abs() / radius_thickness);
                }
            });
            None
        }
        ForceField::Implosion { center, strength } => {
            for i in 0..points.raw_count() {
                if points.meta[i].pinned {
                    continue;
                }
                let delta = center - points.position[i];
                let dist = delta.length().max(1e-3);
                let mass_scale = points.current_mass[i] / 50.0;
                let radial = (delta / dist) * (strength / dist) * mass_scale;
                let angular = crate::math::perp(delta / dist) * (strength * 0.2) * mass_scale;
                points.force_dynamic[i] += radial + angular;
            }
            None
        }
        ForceField::Blast { center, blast_radius, strength, detach_closest, min_debris_v, max_debris_v } => {
            apply_blast(points, center, blast_radius, strength, detach_closest, min_debris_v, max_debris_v, rng)
        }
    }
}

fn for_each_point(points: &mut PointStore, mut f: impl FnMut(&Vec2, &mut Vec2)) {
    for i in 0..points.raw_count() {
        if points.meta[i].pinned {
            continue;
        }
        let p = points.position[i];
        let mut force = Vec2::ZERO;
        f(&p, &mut force);
        points.force_dynamic[i] += force;
    }
}

fn apply_blast(
    points: &mut PointStore,
    center: Vec2,
    blast_radius: f32,
    strength: f32,
    detach_closest: bool,
    min_debris_v: f32,
    max_debris_v: f32,
    rng: &mut impl Rng,
) -> Option<crate::ids::PointIndex> {
    let mut closest: Option<(usize, f32)> = None;

    for i in 0..points.raw_count() {
        if points.meta[i].pinned || points.meta[i].damaged {
            continue;
        }
        let delta = points.position[i] - center;
        let dist = delta.length();
        if dist >= blast_radius {
            continue;
        }
        if closest.map_or(true, |(_, best)| dist < best) {
            closest = Some((i, dist));
        }

        // "Flip" the point across the blast-radius ring: push it as if it
        // had started at `2*blastRadius - dist` from the centre.
        let dist = dist.max(1e-3);
        let mirrored_dist = (2.0 * blast_radius - dist).max(0.1);
        let force_magnitude = strength / mirrored_dist;
        points.force_dynamic[i] += (delta / dist) * force_magnitude;
    }

    if detach_closest {
        if let Some((i, _)) = closest {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let speed = rng.gen_range(min_debris_v..=max_debris_v);
            let velocity = Vec2::new(angle.cos(), angle.sin()) * speed;
            let index = crate::ids::PointIndex::from(i);
            let _ = points.detach(index, DetachOptions { velocity, sever_springs: true });
            return Some(index);
        }
    }
    None
}

/// Spawns debris ephemerals at a detach site, used by gadget explosion
/// handlers (spec §4.7's ephemeral creation is the same store operation
/// regardless of who triggers it).
pub fn spawn_debris_burst(points: &mut PointStore, position: Vec2, count: u32, sim_time: f32, rng: &mut impl Rng) {
    for _ in 0..count {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let speed = rng.gen_range(1.0..6.0);
        let velocity = Vec2::new(angle.cos(), angle.sin()) * speed;
        let _ = points.spawn_ephemeral(EphemeralType::Debris, position, velocity, sim_time, 2.0, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::MaterialId;

    #[test]
    fn draw_pulls_points_toward_center() {
        let mut points = PointStore::new(1, 0);
        points.add_raw(MaterialId::default(), Vec2::new(5.0, 0.0), 1.0, 1.0);
        let mut rng = rand::thread_rng();
        apply(&ForceField::Draw { center: Vec2::ZERO, strength: 10.0 }, &mut points, &mut rng);
        assert!(points.force_dynamic[0].x < 0.0);
    }

    #[test]
    fn blast_pushes_points_outward() {
        let mut points = PointStore::new(1, 0);
        points.add_raw(MaterialId::default(), Vec2::new(1.0, 0.0), 1.0, 1.0);
        let mut rng = rand::thread_rng();
        apply(
            &ForceField::Blast { center: Vec2::ZERO, blast_radius: 5.0, strength: 100.0, detach_closest: false, min_debris_v: 1.0, max_debris_v: 2.0 },
            &mut points,
            &mut rng,
        );
        assert!(points.force_dynamic[0].x > 0.0);
    }
}
