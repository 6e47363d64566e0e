//! Point lifecycle (spec §4.7, component C7): combustion FSM, water-reaction
//! FSM, ephemeral-particle update, and the low-frequency driver that scans
//! for ignition/explosion/water-reaction candidates each low-frequency tick.

use crate::events::{CombustionExplosionEvent, EventSink, ExplosionType, IgnitionEvent, WaterReactionEvent, WaterReactionExplosionEvent};
use crate::ids::PointIndex;
use crate::materials::{CombustionType, MaterialDatabase};
use crate::math::smoothstep;
use crate::mesh::point::{CombustionState, EphemeralType, PointStore, WaterReactionState};
use crate::params::GameParameters;
use crate::ship::force_fields::{self, ForceField};
use glam::Vec2;
use rand::Rng;

const SMOTHERING_WATER_LOW: f32 = 0.05;
const SMOTHERING_DECAY_HIGH: f32 = 0.4;
const HIGH_WATERMARK: f32 = 2.0;
const EXPLOSION_CANDIDATES_K: usize = 15;
const WATER_REACTION_CANDIDATES_K: usize = 25;

/// Cubic fit `a*m^2 + b*m + c` solved so that a point of mass 0.6 kg halves
/// in 12 s, 800 kg halves in 26.5 s, 2400 kg halves in 2653 s (spec §4.7).
/// Recomputed only when `combustion_speed_adjustment` changes; stored as a
/// plain triple rather than re-solved every call.
#[derive(Debug, Clone, Copy)]
pub struct DecayCoefficients {
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl DecayCoefficients {
    /// Solves the 3x3 Vandermonde-like system for the three calibration
    /// points, then scales by `combustion_speed_adjustment`.
    pub fn fit(combustion_speed_adjustment: f32) -> Self {
        let half_life_to_rate = |half_life: f32| -> f32 { std::f32::consts::LN_2 / half_life };
        let (m1, r1) = (0.6_f32, half_life_to_rate(12.0));
        let (m2, r2) = (800.0_f32, half_life_to_rate(26.5));
        let (m3, r3) = (2400.0_f32, half_life_to_rate(2653.0));

        // Solve [m^2 m 1][a b c]^T = r for the three samples via Cramer's rule.
        let det = |a, b, c, d, e, f, g, h, i: f32| a * (e * i - f * h) - b * (d * i - f * g) + c * (d * h - e * g);
        let d = det(m1 * m1, m1, 1.0, m2 * m2, m2, 1.0, m3 * m3, m3, 1.0);
        let da = det(r1, m1, 1.0, r2, m2, 1.0, r3, m3, 1.0);
        let db = det(m1 * m1, r1, 1.0, m2 * m2, r2, 1.0, m3 * m3, r3, 1.0);
        let dc = det(m1 * m1, m1, r1, m2 * m2, m2, r2, m3 * m3, m3, r3);

        Self {
            a: (da / d) * combustion_speed_adjustment,
            b: (db / d) * combustion_speed_adjustment,
            c: (dc / d) * combustion_speed_adjustment,
        }
    }

    pub fn rate_for_mass(&self, mass: f32) -> f32 {
        (self.a * mass * mass + self.b * mass + self.c).max(0.0)
    }
}

/// Runs the low-frequency combustion/water-reaction candidate scan and
/// state transitions; call at a few Hz, not every tick (spec §2's "C7
/// low-frequency combustion").
pub fn update_low_frequency(
    points: &mut PointStore,
    materials: &MaterialDatabase,
    params: &GameParameters,
    decay: DecayCoefficients,
    gravity_dir: Vec2,
    sim_time: f32,
    rng: &mut impl Rng,
    sink: &mut dyn EventSink,
) {
    scan_ignition_and_explosion_candidates(points, materials, params, sim_time, rng, sink);
    scan_water_reaction_candidates(points, materials, params, sim_time, rng, sink);
    advance_developing_points(points);
    run_burning_points(points, materials, decay, gravity_dir, sink);
}

fn scan_ignition_and_explosion_candidates(
    points: &mut PointStore,
    materials: &MaterialDatabase,
    params: &GameParameters,
    sim_time: f32,
    rng: &mut impl Rng,
    sink: &mut dyn EventSink,
) {
    let mut ignition_candidates = Vec::new();
    let mut explosion_candidates = Vec::new();

    for i in 0..points.raw_count() {
        if points.combustion[i].state != CombustionState::NotBurning {
            continue;
        }
        if points.position[i].y < 0.0 {
            continue; // must be above water
        }
        let material = materials.structural(points.meta[i].material);
        let effective_ignition_t = material.ignition_temperature;
        if points.temperature[i] < effective_ignition_t + HIGH_WATERMARK {
            continue;
        }
        if points.water[i] >= SMOTHERING_WATER_LOW {
            continue;
        }
        if points.meta[i].decay < SMOTHERING_DECAY_HIGH {
            continue;
        }

        let excess = (points.temperature[i] - effective_ignition_t) / effective_ignition_t;
        match material.combustion_type {
            CombustionType::Combustion => ignition_candidates.push((i, excess)),
            CombustionType::Explosion => explosion_candidates.push((i, excess)),
            CombustionType::NotCombustible => {}
        }
    }

    ignition_candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
    let burning_now = points.combustion.iter().filter(|c| matches!(c.state, CombustionState::Developing1 | CombustionState::Developing2 | CombustionState::Burning)).count() as u32;
    let remaining_quota = params.max_burning_particles_per_ship.saturating_sub(burning_now) as usize;
    let k = rng.gen_range(4..=9).min(remaining_quota).min(ignition_candidates.len());

    for &(i, excess) in ignition_candidates.iter().take(k) {
        let neighbours = points.springs[i].len() as f32;
        let initial_development = 0.1 + 0.5 * smoothstep(0.0, 1.0, excess);
        points.combustion[i] = crate::mesh::point::CombustionInfo {
            state: CombustionState::Developing1,
            flame_development: initial_development,
            max_flame_development: (0.5 + 0.05 * neighbours).min(2.0),
        };
        sink.on_ignition(IgnitionEvent { point: PointIndex::from(i) });
    }

    explosion_candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
    for &(i, _) in explosion_candidates.iter().take(EXPLOSION_CANDIDATES_K) {
        let material = materials.structural(points.meta[i].material);
        let position = points.position[i];
        let blast_radius = material.explosive_combustion_force_radius;
        let blast_force = material.explosive_combustion_force;
        let blast_heat = material.explosive_combustion_heat;
        points.combustion[i].state = CombustionState::Exploded;

        force_fields::apply(
            &ForceField::Blast { center: position, blast_radius, strength: blast_force, detach_closest: false, min_debris_v: 1.0, max_debris_v: 1.0 },
            points,
            rng,
        );

        sink.on_combustion_explosion(CombustionExplosionEvent {
            point: PointIndex::from(i),
            position,
            blast_radius,
            blast_force,
            blast_heat,
            explosion_type: ExplosionType::Deflagration,
        });
        let _ = sim_time;
    }
}

fn scan_water_reaction_candidates(points: &mut PointStore, materials: &MaterialDatabase, params: &GameParameters, sim_time: f32, rng: &mut impl Rng, sink: &mut dyn EventSink) {
    for i in 0..points.raw_count() {
        if points.water_reaction[i].state != WaterReactionState::Unreacted {
            continue;
        }
        let material = materials.structural(points.meta[i].material);
        if material.reactivity <= 0.0 {
            continue;
        }
        if points.water[i] > 0.5 * material.reactivity {
            points.water_reaction[i].state = WaterReactionState::ReactionTriggered;
            points.water_reaction[i].overdue_since = sim_time;
            sink.on_water_reaction(WaterReactionEvent { point: PointIndex::from(i) });
        }
    }

    let mut triggered: Vec<usize> = (0..points.raw_count())
        .filter(|&i| points.water_reaction[i].state == WaterReactionState::ReactionTriggered)
        .collect();
    triggered.sort_by(|&a, &b| {
        (sim_time - points.water_reaction[a].overdue_since)
            .partial_cmp(&(sim_time - points.water_reaction[b].overdue_since))
            .unwrap()
            .reverse()
    });

    let blast_radius = if params.is_ultra_violent_mode { 20.0 } else { 5.0 };
    let blast_force = params.water_reaction_blast_force;
    for &i in triggered.iter().take(WATER_REACTION_CANDIDATES_K) {
        let position = points.position[i];
        points.water_reaction[i].state = WaterReactionState::Consumed;

        force_fields::apply(
            &ForceField::Blast { center: position, blast_radius, strength: blast_force, detach_closest: false, min_debris_v: 1.0, max_debris_v: 1.0 },
            points,
            rng,
        );

        sink.on_water_reaction_explosion(WaterReactionExplosionEvent {
            point: PointIndex::from(i),
            position,
            blast_radius,
            blast_force,
            blast_heat: 0.0,
            explosion_type: ExplosionType::Sodium,
        });
    }
}

fn advance_developing_points(points: &mut PointStore) {
    for i in 0..points.raw_count() {
        let info = &mut points.combustion[i];
        match info.state {
            CombustionState::Developing1 => {
                info.flame_development += 0.04 * info.flame_development;
                if info.flame_development > info.max_flame_development + 0.1 {
                    info.state = CombustionState::Developing2;
                }
            }
            CombustionState::Developing2 => {
                let excess = info.flame_development - info.max_flame_development;
                info.flame_development -= 0.35 * excess;
                if (info.flame_development - info.max_flame_development).abs() < 0.02 {
                    info.state = CombustionState::Burning;
                }
            }
            _ => {}
        }
    }
}

fn run_burning_points(points: &mut PointStore, materials: &MaterialDatabase, decay: DecayCoefficients, gravity_dir: Vec2, sink: &mut dyn EventSink) {
    let burning: Vec<usize> = (0..points.raw_count()).filter(|&i| points.combustion[i].state == CombustionState::Burning).collect();

    for i in burning {
        let material = materials.structural(points.meta[i].material);
        points.temperature[i] = points.temperature[i].min(1.1 * material.ignition_temperature);

        let neighbours = points.springs[i].clone();
        for &(_, other) in &neighbours {
            let dir = (points.position[other.index()] - points.position[i]).normalize_or_zero();
            let directional_coefficient = 0.9 + 1.0 * (1.0 - dir.dot(gravity_dir));
            let heat_injected = material.explosive_combustion_heat.max(1.0) * directional_coefficient * 0.001;
            points.temperature[other.index()] += heat_injected;

            let neighbour_mass = points.current_mass[other.index()];
            let neighbour_rate = decay.rate_for_mass(neighbour_mass);
            points.meta[other.index()].decay = (points.meta[other.index()].decay - neighbour_rate * 0.001).max(0.0);
        }

        let mass = points.current_mass[i];
        let rate = decay.rate_for_mass(mass);
        points.meta[i].decay = (points.meta[i].decay - rate * 0.001).max(0.0);
        let _ = sink;
    }
}

/// Per-high-frequency-tick extinguishing progress; called every tick
/// (unlike the low-frequency scan above).
pub fn update_extinguishing(points: &mut PointStore) {
    for i in 0..points.raw_count() {
        let info = &mut points.combustion[i];
        let consumed = matches!(info.state, CombustionState::ExtinguishingConsumed);
        let rain = matches!(info.state, CombustionState::ExtinguishingSmotheredRain);
        let water = matches!(info.state, CombustionState::ExtinguishingSmotheredWater);
        if !consumed && !rain && !water {
            continue;
        }

        if consumed {
            info.flame_development -= 0.0625 * (info.max_flame_development - info.flame_development + 0.01);
        } else if rain {
            info.flame_development -= 0.075 * info.flame_development;
        } else {
            info.flame_development -= 0.3 * info.flame_development;
        }

        if info.flame_development <= 0.02 {
            *info = crate::mesh::point::CombustionInfo::default();
        }
    }
}

/// Advances every live ephemeral particle by `dt`, expiring those past
/// their lifetime. `surface_height_at` lets bubbles detect surfacing
/// without a hard dependency on the ocean surface module.
pub fn update_ephemerals(points: &mut PointStore, sim_time: f32, dt: f32, surface_height_at: impl Fn(f32) -> f32, rng: &mut impl Rng, sink: &mut dyn EventSink) {
    for i in points.ephemeral_range() {
        if points.ephemeral[i].kind == EphemeralType::None {
            continue;
        }
        let age = sim_time - points.ephemeral[i].start_time;
        if age >= points.ephemeral[i].max_lifetime {
            if points.ephemeral[i].kind == EphemeralType::AirBubble {
                sink.on_air_bubble_surfaced(crate::events::AirBubbleSurfacedEvent { position: points.position[i] });
            }
            points.destroy_ephemeral(PointIndex::from(i));
            continue;
        }

        let progress = age / points.ephemeral[i].max_lifetime;
        match points.ephemeral[i].kind {
            EphemeralType::AirBubble => {
                points.velocity[i].y += 4.0 * dt;
                points.position[i] += points.velocity[i] * dt;
                if points.position[i].y >= surface_height_at(points.position[i].x) {
                    points.destroy_ephemeral(PointIndex::from(i));
                }
            }
            EphemeralType::Debris => {
                let alpha = (1.0 - progress).max(0.0);
                points.meta[i].color[3] = alpha;
                points.velocity[i].y -= 9.81 * dt;
                points.position[i] += points.velocity[i] * dt;
            }
            EphemeralType::Smoke => {
                let scale = if points.ephemeral[i].smoke.is_fast {
                    1.07 * (1.0 - (-3.0 * progress).exp())
                } else {
                    (progress / (5.0 / points.ephemeral[i].max_lifetime.max(1e-3))).min(1.0)
                };
                points.meta[i].color[3] = scale;
                let drift = Vec2::new((points.ephemeral[i].smoke.drift_seed + sim_time).sin(), 0.0) * 0.1;
                points.velocity[i] += drift * dt + Vec2::new(0.0, 0.3 * dt);
                points.position[i] += points.velocity[i] * dt;
                let _ = rng;
            }
            EphemeralType::Sparkle | EphemeralType::WakeBubble => {
                points.meta[i].color[3] = (1.0 - progress).max(0.0);
                points.position[i] += points.velocity[i] * dt;
            }
            EphemeralType::None => unreachable!(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decay_fit_matches_calibration_points() {
        let coeffs = DecayCoefficients::fit(1.0);
        let rate = coeffs.rate_for_mass(0.6);
        let half_life = std::f32::consts::LN_2 / rate;
        assert!((half_life - 12.0).abs() < 0.5, "got {half_life}");
    }

    #[test]
    fn ephemeral_debris_fades_and_expires() {
        let mut points = PointStore::new(0, 4);
        let idx = points.spawn_ephemeral(EphemeralType::Debris, Vec2::ZERO, Vec2::ZERO, 0.0, 1.0, false).unwrap();
        let mut sink = crate::events::NullEventSink;
        let mut rng = rand::thread_rng();
        update_ephemerals(&mut points, 0.5, 1.0 / 60.0, |_| 1000.0, &mut rng, &mut sink);
        assert!(points.meta[idx.index()].color[3] < 1.0);

        update_ephemerals(&mut points, 2.0, 1.0 / 60.0, |_| 1000.0, &mut rng, &mut sink);
        assert!(!points.is_alive_ephemeral(idx.index()));
    }
}
