//! Ship interactions (spec §4.13, component C13): the tool dispatch layer.
//! Each entry point takes world coordinates (and, for gadgets, the current
//! wall-clock time) and mutates the mesh directly; none of them run inside
//! the per-tick pipeline, they're driven by external input.

use crate::events::{EventSink, SawedEvent};
use crate::ids::{PointIndex, SpringIndex};
use crate::materials::MaterialDatabase;
use crate::math::{segments_intersect, smoothstep};
use crate::mesh::point::{CombustionState, DetachOptions, PointStore};
use crate::mesh::spring::{SpringCharacteristics, SpringStore};
use crate::mesh::triangle::TriangleStore;
use crate::params::GameParameters;
use glam::Vec2;
use rand::Rng;
use std::collections::HashMap;
use std::time::Duration;

const DISPLACEMENT_TOLERANCE: f32 = 0.07;
const REST_LENGTH_DIVERGENCE_TOLERANCE: f32 = 0.05;

/// Per-point bookkeeping for the repair tool's attractor/attracted turn
/// rule (spec §4.13 pass 2): a point may not act as both in the same step,
/// and an attracted point ramps up its pull strength across consecutive
/// steps it keeps that role.
#[derive(Debug, Clone, Copy, Default)]
struct RepairPointState {
    last_attractor_step: Option<u64>,
    last_attracted_step: Option<u64>,
    consecutive_attracted_steps: u32,
}

/// Cross-call state for [`repair_at`], owned by the caller (one instance
/// per ship) and passed in by reference every repair step.
#[derive(Debug, Default)]
pub struct RepairSession {
    id: u64,
    step: u64,
    state: HashMap<PointIndex, RepairPointState>,
}

impl RepairSession {
    /// Starts a new session (e.g. when the tool is re-armed after being
    /// released), resetting the attractor/attracted turn-taking history.
    pub fn start(&mut self, id: u64) {
        self.id = id;
        self.step = 0;
        self.state.clear();
    }

    fn entry(&mut self, point: PointIndex) -> &mut RepairPointState {
        self.state.entry(point).or_default()
    }
}

/// Destroys points probabilistically within `radius_fraction * destroyRadius`
/// of `target`: ephemeral air bubbles are destroyed outright, attached raw
/// points detach with a debris-like random velocity, probability falling off
/// as `(1 - d²/r²)²`.
pub fn destroy_at(points: &mut PointStore, params: &GameParameters, target: Vec2, radius_fraction: f32, rng: &mut impl Rng) {
    let radius = params.destroy_radius * radius_fraction * if params.is_ultra_violent_mode { 10.0 } else { 1.0 };
    let square_radius = radius * radius;

    for i in 0..points.raw_count() {
        if points.meta[i].damaged {
            continue;
        }
        let square_distance = (points.position[i] - target).length_squared();
        if square_distance >= square_radius {
            continue;
        }
        if points.springs[i].is_empty() {
            continue;
        }

        let destroy_probability = if square_radius < 1.0 {
            1.0
        } else {
            let f = 1.0 - square_distance / square_radius;
            f * f
        };

        if rng.gen::<f32>() <= destroy_probability {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let speed = rng.gen_range(1.0..6.0);
            let velocity = Vec2::new(angle.cos(), angle.sin()) * speed;
            let _ = points.detach(PointIndex::from(i), DetachOptions { velocity, sever_springs: true });
        }
    }
}

/// Repair tool, one step per call (spec §4.13's three passes). `session`
/// carries the attractor/attracted turn-taking state across steps of one
/// continuous tool application.
pub fn repair_at(
    points: &mut PointStore,
    springs: &mut SpringStore,
    triangles: &mut TriangleStore,
    params: &GameParameters,
    target: Vec2,
    radius_multiplier: f32,
    session: &mut RepairSession,
) {
    session.step += 1;
    let step = session.step;
    let id = session.id;

    let search_radius = params.repair_radius * radius_multiplier;
    let square_search_radius = search_radius * search_radius;

    for point_idx in 0..points.raw_count() {
        let point = PointIndex::from(point_idx);
        let square_distance = (points.position[point_idx] - target).length_squared();
        if square_distance > square_search_radius || points.springs[point_idx].is_empty() {
            continue;
        }

        let was_attracted_last_step = session.entry(point).last_attracted_step == Some(step.wrapping_sub(1)) && session.entry(point).last_attracted_step.is_some();
        if was_attracted_last_step {
            continue;
        }

        session.entry(point).last_attractor_step = Some(step);

        let tool_strength = (1.0 - (square_distance / square_search_radius).powi(2)) * if params.is_ultra_violent_mode { 10.0 } else { 1.0 };

        // Pass 1/2: pull the other endpoint of every factory spring that is
        // currently broken toward the rest-length position implied by this
        // point's live neighbours' angular layout.
        let factory_springs: Vec<(SpringIndex, PointIndex)> = points.springs[point_idx].clone();
        for (spring_index, other) in &factory_springs {
            if !springs.springs[spring_index.index()].deleted {
                continue;
            }
            let other = *other;

            let other_state = session.entry(other);
            if other_state.last_attractor_step == Some(step) {
                continue; // other endpoint already acted as an attractor this step
            }

            let target_angle = interpolated_target_angle(points, springs, point, *spring_index);
            let rest_length = springs.springs[spring_index.index()].factory_rest_length;
            let target_position = points.position[point_idx] + octant_direction_from_angle(target_angle) * rest_length;

            let displacement = target_position - points.position[other.index()];
            let mut displacement_magnitude = displacement.length();

            if displacement_magnitude > DISPLACEMENT_TOLERANCE && !points.meta[other.index()].pinned {
                let consecutive = if other_state.last_attracted_step == Some(step.wrapping_sub(1)) {
                    other_state.consecutive_attracted_steps + 1
                } else {
                    0
                };
                other_state.consecutive_attracted_steps = consecutive;
                other_state.last_attracted_step = Some(step);

                let smoothing = smoothstep(0.0, 10.0 * 30.0 / params.repair_speed_adjustment.max(0.01), consecutive as f32);
                let movement_dir = displacement / displacement_magnitude;
                let movement_magnitude = displacement_magnitude * smoothing * tool_strength;

                points.position[other.index()] += movement_dir * movement_magnitude;
                displacement_magnitude -= movement_magnitude;

                let sign = if movement_magnitude < 0.0 { -1.0 } else { 1.0 };
                let displacement_velocity = movement_dir * sign * movement_magnitude.abs().powf(0.2) / (1.0 / 60.0) * 0.5;
                points.velocity[other.index()] = points.velocity[other.index()] * 0.35 + displacement_velocity * 0.65;

                points.water[other.index()] *= 0.5;
            }

            if displacement_magnitude <= DISPLACEMENT_TOLERANCE {
                springs.restore(*spring_index);
                points.velocity[other.index()] = Vec2::ZERO;
                let decay = points.meta[point_idx].decay;
                points.meta[point_idx].decay = decay + (1.0 - decay) / 2.0;
                let other_decay = points.meta[other.index()].decay;
                points.meta[other.index()].decay = other_decay + (1.0 - other_decay) / 2.0;
                springs.springs[spring_index.index()].rest_length = springs.springs[spring_index.index()].factory_rest_length;
                points.water[other.index()] *= 0.5;
            }
        }

        // Rest-length relaxation for springs that are live but still
        // stretched from a previous repair step.
        for (spring_index, _) in &factory_springs {
            let s = &mut springs.springs[spring_index.index()];
            if s.deleted || s.rest_length == s.factory_rest_length {
                continue;
            }
            let new_rest_length = s.factory_rest_length + 0.97 * (s.rest_length - s.factory_rest_length);
            s.rest_length = if (new_rest_length - s.factory_rest_length).abs() < REST_LENGTH_DIVERGENCE_TOLERANCE {
                s.factory_rest_length
            } else {
                new_rest_length
            };
        }

        // Pass 3: restore any factory-connected triangle whose three
        // sub-springs are all present.
        for &tri_index in &points.triangles[point_idx].clone() {
            let tri = triangles.get(tri_index);
            if !tri.deleted {
                continue;
            }
            let all_present = tri.sub_springs.iter().all(|s| !springs.springs[s.index()].deleted);
            if all_present {
                triangles.restore(tri_index);
            }
        }
    }

    let _ = id;
}

/// Returns the world-space CW angle (radians) the other endpoint of
/// `spring` should sit at relative to `point`, interpolated between the
/// nearest surviving CW/CCW neighbour springs around `point`'s factory
/// octant for this spring (spec §4.13 pass 2).
fn interpolated_target_angle(points: &PointStore, springs: &SpringStore, point: PointIndex, spring: SpringIndex) -> f32 {
    let s = &springs.springs[spring.index()];
    let this_octant = if s.point_a == point { s.factory_octant_a } else { s.factory_octant_b };

    let mut nearest_cw: Option<(u8, PointIndex)> = None;
    let mut nearest_ccw: Option<(u8, PointIndex)> = None;

    for &(other_spring, other_point) in &points.springs[point.index()] {
        if springs.springs[other_spring.index()].deleted {
            continue;
        }
        let os = &springs.springs[other_spring.index()];
        let other_octant = if os.point_a == point { os.factory_octant_a } else { os.factory_octant_b };

        let cw_delta = (other_octant as i32 - this_octant as i32).rem_euclid(8) as u8;
        if cw_delta > 0 && nearest_cw.map_or(true, |(best, _)| cw_delta < best) {
            nearest_cw = Some((cw_delta, other_point));
        }
        let ccw_delta = 8 - cw_delta;
        if ccw_delta > 0 && ccw_delta < 8 && nearest_ccw.map_or(true, |(best, _)| ccw_delta < best) {
            nearest_ccw = Some((ccw_delta, other_point));
        }
    }

    let (Some((cw_span, cw_other)), Some((ccw_span, ccw_other))) = (nearest_cw, nearest_ccw) else {
        return (this_octant as f32) * std::f32::consts::FRAC_PI_4;
    };

    let ccw_world_angle = (points.position[ccw_other.index()] - points.position[point.index()]).to_angle();
    if cw_other == ccw_other {
        return ccw_world_angle;
    }

    let cw_world_angle = (points.position[cw_other.index()] - points.position[point.index()]).to_angle();
    let mut neighbours_angle = cw_world_angle - ccw_world_angle;
    if neighbours_angle < 0.0 {
        neighbours_angle += std::f32::consts::TAU;
    }

    let interpolated_offset = neighbours_angle * (ccw_span as f32) / ((cw_span + ccw_span) as f32);
    ccw_world_angle + interpolated_offset
}

fn octant_direction_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Cuts every live spring that properly intersects `start..end`, emitting
/// one [`SawedEvent`] per spring with sparkles optionally spawned by the
/// caller for metal cuts (spec §4.13).
pub fn saw_through(points: &mut PointStore, springs: &mut SpringStore, start: Vec2, end: Vec2, sink: &mut dyn EventSink) -> u32 {
    let mut count = 0;
    for i in 0..springs.springs.len() {
        if springs.springs[i].deleted {
            continue;
        }
        let a = springs.springs[i].point_a;
        let b = springs.springs[i].point_b;
        if segments_intersect(start, end, points.position[a.index()], points.position[b.index()]) {
            let index = SpringIndex::from(i);
            springs.destroy(index, crate::mesh::spring::DestroyOptions { destroy_all_triangles: false });
            points.springs[a.index()].retain(|(s, _)| *s != index);
            points.springs[b.index()].retain(|(s, _)| *s != index);
            sink.on_sawed(SawedEvent { spring: index });
            count += 1;
        }
    }
    count
}

/// Injects or removes heat within `radius` of `target`, smoothstep-falling
/// off to zero at the boundary. Negative `heat_flow` cools.
pub fn heat_blaster_at(points: &mut PointStore, materials: &MaterialDatabase, params: &GameParameters, target: Vec2, radius: f32, heat_flow: f32, dt: f32) -> bool {
    let heat = heat_flow * 1000.0 * if params.is_ultra_violent_mode { 10.0 } else { 1.0 } * dt;
    let square_radius = radius * radius;
    let mut found = false;

    for i in 0..points.raw_count() {
        let square_distance = (points.position[i] - target).length_squared();
        if square_distance >= square_radius {
            continue;
        }
        found = true;
        let smoothing = 1.0 - smoothstep(0.0, radius, square_distance.sqrt());
        let heat_capacity = materials.structural(points.meta[i].material).mass.max(0.01);
        let delta_t = heat * smoothing / heat_capacity;
        points.temperature[i] = (points.temperature[i] + delta_t).max(0.1);
    }
    found
}

/// Smothers burning points within `radius`, also cooling them so they don't
/// immediately reignite.
pub fn extinguish_fire_at(points: &mut PointStore, params: &GameParameters, target: Vec2, radius: f32) -> bool {
    let square_radius = radius * radius * if params.is_ultra_violent_mode { 10.0 } else { 1.0 };
    let mut found = false;

    for i in 0..points.raw_count() {
        if (points.position[i] - target).length_squared() >= square_radius {
            continue;
        }
        found = true;
        if points.combustion[i].state == CombustionState::Burning {
            points.combustion[i].state = CombustionState::ExtinguishingSmotheredWater;
            points.temperature[i] = (points.temperature[i] - 60.0).max(0.0);
        }
    }
    found
}

/// Produces the [`crate::ship::force_fields::ForceField`] for a draw-tool
/// application; the caller installs it into the ship's active field list.
pub fn draw_to(params: &GameParameters, target: Vec2, strength_fraction: f32) -> crate::ship::force_fields::ForceField {
    let strength = params.draw_force * strength_fraction * if params.is_ultra_violent_mode { 20.0 } else { 1.0 };
    crate::ship::force_fields::ForceField::Draw { center: target, strength }
}

/// Produces the [`crate::ship::force_fields::ForceField`] for a swirl-tool
/// application; the caller installs it into the ship's active field list.
pub fn swirl_at(params: &GameParameters, target: Vec2, strength_fraction: f32) -> crate::ship::force_fields::ForceField {
    let strength = params.swirl_force * strength_fraction * if params.is_ultra_violent_mode { 20.0 } else { 1.0 };
    crate::ship::force_fields::ForceField::Swirl { center: target, strength }
}

/// Toggles the pin state of the closest live point within `tool_search_radius`.
pub fn toggle_pin_at(points: &mut PointStore, params: &GameParameters, target: Vec2) -> bool {
    let square_radius = params.tool_search_radius * params.tool_search_radius;
    let mut best: Option<(usize, f32)> = None;
    for i in 0..points.raw_count() {
        if points.meta[i].damaged {
            continue;
        }
        let d = (points.position[i] - target).length_squared();
        if d < square_radius && best.map_or(true, |(_, best_d)| d < best_d) {
            best = Some((i, d));
        }
    }
    match best {
        Some((i, _)) => {
            points.meta[i].pinned = !points.meta[i].pinned;
            true
        }
        None => false,
    }
}

/// Spawns an air-bubble ephemeral at `target` if it is underwater there
/// (`surface_height_at(x)` returns the ocean surface height).
pub fn inject_bubbles_at(points: &mut PointStore, target: Vec2, sim_time: f32, surface_height_at: impl Fn(f32) -> f32) -> bool {
    if target.y >= surface_height_at(target.x) {
        return false;
    }
    let _ = points.spawn_ephemeral(crate::mesh::point::EphemeralType::AirBubble, target, Vec2::new(0.0, 1.0), sim_time, 6.0, true);
    true
}

/// Adds (or removes, if `quantity_multiplier` is negative) water to every
/// non-hull raw point within `flood_radius` of `target`. A point counts as
/// hull if any of its live factory springs carries the `HULL` characteristic
/// (hull plating doesn't take on free water the way an open compartment does).
pub fn flood_at(points: &mut PointStore, springs: &SpringStore, params: &GameParameters, target: Vec2, quantity_multiplier: f32) -> bool {
    let square_radius = params.flood_radius * params.flood_radius;
    let quantity = params.flood_quantity * quantity_multiplier * if params.is_ultra_violent_mode { 10.0 } else { 1.0 };
    let mut found = false;

    for i in 0..points.raw_count() {
        let is_hull = points.springs[i]
            .iter()
            .any(|(s, _)| !springs.springs[s.index()].deleted && springs.springs[s.index()].characteristics.contains(SpringCharacteristics::HULL));
        if is_hull {
            continue;
        }
        if (points.position[i] - target).length_squared() >= square_radius {
            continue;
        }
        if quantity >= 0.0 {
            points.water[i] += quantity;
        } else {
            points.water[i] = (points.water[i] + quantity).max(0.0);
        }
        found = true;
    }
    found
}

/// Scrubs decay partially back toward 1.0 for every point within
/// `scrub_radius` of the `start..end` segment.
pub fn scrub_through(points: &mut PointStore, params: &GameParameters, start: Vec2, end: Vec2) -> bool {
    let segment = end - start;
    let segment_length = segment.length();
    if segment_length < 1e-6 {
        return false;
    }
    let normal = crate::math::perp(segment / segment_length);
    let mut scrubbed = false;

    for i in 0..points.raw_count() {
        let distance = (points.position[i] - start).dot(normal).abs();
        if distance > params.scrub_radius {
            continue;
        }
        let decay = points.meta[i].decay;
        points.meta[i].decay = decay + 0.5 * (1.0 - decay) * (params.scrub_radius - distance) / params.scrub_radius;
        scrubbed = true;
    }
    scrubbed
}

/// Toggles a gadget of `kind` at the nearest point within `tool_search_radius`
/// of `target`: places one if none is attached there, removes the nearest
/// existing gadget of that kind otherwise.
pub fn toggle_bomb_at(
    points: &PointStore,
    gadgets: &mut crate::ship::gadgets::GadgetStore,
    params: &GameParameters,
    target: Vec2,
    make_kind: impl Fn() -> crate::ship::gadgets::GadgetKind,
    now: Duration,
    sink: &mut dyn EventSink,
) -> bool {
    let square_radius = params.tool_search_radius * params.tool_search_radius;

    let existing_id = gadgets
        .iter()
        .find(|g| (points.position[g.point.index()] - target).length_squared() < square_radius)
        .map(|g| g.id);
    if let Some(id) = existing_id {
        gadgets.remove(id, sink);
        return true;
    }

    let mut best: Option<(usize, f32)> = None;
    for i in 0..points.raw_count() {
        if points.meta[i].damaged || points.meta[i].gadget_attached {
            continue;
        }
        let d = (points.position[i] - target).length_squared();
        if d < square_radius && best.map_or(true, |(_, best_d)| d < best_d) {
            best = Some((i, d));
        }
    }
    match best {
        Some((i, _)) => {
            gadgets.place(PointIndex::from(i), make_kind(), now, sink);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NullEventSink;
    use crate::materials::MaterialId;
    use crate::mesh::spring::SpringCharacteristics;

    #[test]
    fn destroy_at_detaches_connected_point_within_small_radius() {
        let mut points = PointStore::new(2, 0);
        let a = points.add_raw(MaterialId::default(), Vec2::ZERO, 1.0, 1.0);
        let b = points.add_raw(MaterialId::default(), Vec2::new(0.1, 0.0), 1.0, 1.0);
        points.springs[a.index()].push((SpringIndex::from(0u32), b));
        let mut params = GameParameters::default();
        params.destroy_radius = 0.5;
        let mut rng = rand::rngs::mock::StepRng::new(0, 1);
        destroy_at(&mut points, &params, Vec2::ZERO, 1.0, &mut rng);
        assert!(points.is_damaged(a));
    }

    #[test]
    fn saw_through_cuts_crossing_spring() {
        let mut points = PointStore::new(2, 0);
        let a = points.add_raw(MaterialId::default(), Vec2::new(-1.0, 0.0), 1.0, 1.0);
        let b = points.add_raw(MaterialId::default(), Vec2::new(1.0, 0.0), 1.0, 1.0);
        let mut springs = SpringStore::new();
        springs.add(a, b, 0, 4, 1.0, 1.0, 2.0, SpringCharacteristics::default(), 0.0);
        let mut sink = NullEventSink;
        let cut = saw_through(&mut points, &mut springs, Vec2::new(0.0, -1.0), Vec2::new(0.0, 1.0), &mut sink);
        assert_eq!(cut, 1);
        assert!(springs.springs[0].deleted);
    }

    #[test]
    fn toggle_pin_flips_nearest_point() {
        let mut points = PointStore::new(1, 0);
        let p = points.add_raw(MaterialId::default(), Vec2::ZERO, 1.0, 1.0);
        let params = GameParameters::default();
        assert!(toggle_pin_at(&mut points, &params, Vec2::new(0.1, 0.0)));
        assert!(points.meta[p.index()].pinned);
        assert!(toggle_pin_at(&mut points, &params, Vec2::new(0.1, 0.0)));
        assert!(!points.meta[p.index()].pinned);
    }
}
