//! Spring store (spec §4.2, component C2): structure-of-arrays over every
//! spring attribute, plus the Hooke/damping coefficient cache and the strain
//! (break/stress) evaluation.

use crate::events::{BreakEvent, EventSink, StressEvent};
use crate::ids::{PointIndex, SpringIndex, TriangleIndex};
use crate::math::strain_strength_falloff;
use crate::mesh::point::PointStore;
use glam::Vec2;

/// Spring characteristics bitmask (spec §3). A rope spring never breaks
/// under strain in the original engine's "detach instead of break" rope
/// semantics; a hull spring is impermeable to water. Hand-rolled rather
/// than pulling in the `bitflags` crate for two bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpringCharacteristics(pub u8);

impl SpringCharacteristics {
    pub const ROPE: SpringCharacteristics = SpringCharacteristics(0b01);
    pub const HULL: SpringCharacteristics = SpringCharacteristics(0b10);

    pub fn contains(&self, other: SpringCharacteristics) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl std::ops::BitOr for SpringCharacteristics {
    type Output = SpringCharacteristics;
    fn bitor(self, rhs: SpringCharacteristics) -> SpringCharacteristics {
        SpringCharacteristics(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SuperTriangles {
    pub slots: [TriangleIndex; 2],
    pub count: u8,
}

impl SuperTriangles {
    pub fn push(&mut self, t: TriangleIndex) {
        debug_assert!((self.count as usize) < 2, "a spring has at most 2 super-triangles");
        self.slots[self.count as usize] = t;
        self.count += 1;
    }

    pub fn remove(&mut self, t: TriangleIndex) {
        if let Some(pos) = self.slots[..self.count as usize].iter().position(|&s| s == t) {
            for i in pos..(self.count as usize - 1) {
                self.slots[i] = self.slots[i + 1];
            }
            self.count -= 1;
        }
    }

    pub fn as_slice(&self) -> &[TriangleIndex] {
        &self.slots[..self.count as usize]
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Spring {
    pub point_a: PointIndex,
    pub point_b: PointIndex,
    pub factory_octant_a: u8,
    pub factory_octant_b: u8,
    pub super_triangles: SuperTriangles,
    pub factory_super_triangles: SuperTriangles,
    pub strength: f32,
    pub stiffness: f32,
    pub rest_length: f32,
    pub factory_rest_length: f32,
    pub stiffness_coefficient: f32,
    pub damping_coefficient: f32,
    pub characteristics: SpringCharacteristics,
    pub water_permeability: f32,
    pub is_stressed: bool,
    pub bomb_attached: bool,
    pub deleted: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DestroyOptions {
    pub destroy_all_triangles: bool,
}

pub struct SpringStore {
    pub springs: Vec<Spring>,
}

impl SpringStore {
    pub fn new() -> Self {
        Self { springs: Vec::new() }
    }

    pub fn add(
        &mut self,
        point_a: PointIndex,
        point_b: PointIndex,
        octant_a: u8,
        octant_b: u8,
        strength: f32,
        stiffness: f32,
        rest_length: f32,
        characteristics: SpringCharacteristics,
        water_permeability: f32,
    ) -> SpringIndex {
        self.springs.push(Spring {
            point_a,
            point_b,
            factory_octant_a: octant_a,
            factory_octant_b: octant_b,
            super_triangles: SuperTriangles::default(),
            factory_super_triangles: SuperTriangles::default(),
            strength,
            stiffness,
            rest_length,
            factory_rest_length: rest_length,
            stiffness_coefficient: 0.0,
            damping_coefficient: 0.0,
            characteristics,
            water_permeability,
            is_stressed: false,
            bomb_attached: false,
            deleted: false,
        });
        SpringIndex::from(self.springs.len() - 1)
    }

    pub fn destroy(&mut self, index: SpringIndex, options: DestroyOptions) {
        let s = &mut self.springs[index.index()];
        debug_assert!(!s.deleted, "destroying an already-deleted spring");
        s.deleted = true;
        let _ = options; // triangle cascade is driven by the frontier tracker, which owns that policy
    }

    pub fn restore(&mut self, index: SpringIndex) {
        let s = &mut self.springs[index.index()];
        debug_assert!(s.deleted, "restoring a non-deleted spring");
        s.deleted = false;
        s.is_stressed = false;
    }

    /// Recomputes the stiffness coefficient for every non-deleted spring
    /// from each endpoint's current mass (spec §4.2):
    /// `stiffness = reductionFraction · stiffness · adj · (mA·mB/(mA+mB)) / (dt/N)²`
    pub fn update_for_mass(&mut self, points: &PointStore, dt_per_iteration: f32, reduction_fraction: f32, global_stiffness_adjustment: f32) {
        let denom = dt_per_iteration * dt_per_iteration;
        for s in self.springs.iter_mut().filter(|s| !s.deleted) {
            let ma = points.current_mass[s.point_a.index()];
            let mb = points.current_mass[s.point_b.index()];
            let reduced_mass = ma * mb / (ma + mb);
            s.stiffness_coefficient = reduction_fraction * s.stiffness * global_stiffness_adjustment * reduced_mass / denom;
        }
    }

    /// Recomputes the damping coefficient (spec §4.2):
    /// `damping = dampingCoef · adj · (mA·mB/(mA+mB)) / (dt/N)`
    pub fn update_for_damping(&mut self, points: &PointStore, dt_per_iteration: f32, damping_coefficient: f32, global_damping_adjustment: f32) {
        for s in self.springs.iter_mut().filter(|s| !s.deleted) {
            let ma = points.current_mass[s.point_a.index()];
            let mb = points.current_mass[s.point_b.index()];
            let reduced_mass = ma * mb / (ma + mb);
            s.damping_coefficient = damping_coefficient * global_damping_adjustment * reduced_mass / dt_per_iteration;
        }
    }

    /// Relaxes rest length back toward factory value (used by the repair
    /// tool's pass 3, spec §4.13).
    pub fn relax_rest_length_toward_factory(&mut self, index: SpringIndex, rate: f32) {
        let s = &mut self.springs[index.index()];
        s.rest_length += (s.factory_rest_length - s.rest_length) * rate;
    }

    /// Per-tick strain evaluation (spec §4.2): breaks overstrained springs
    /// and maintains the stress hysteresis flag. `iterations_adjustment` is
    /// `r` in `f(r) = 4/(1+3r^1.3)`.
    pub fn update_strains(
        &mut self,
        points: &PointStore,
        global_strength_adjustment: f32,
        iterations_adjustment: f32,
        destroy_all_triangles_on_break: bool,
        sink: &mut dyn EventSink,
    ) -> Vec<SpringIndex> {
        let falloff = strain_strength_falloff(iterations_adjustment);
        let mut broken = Vec::new();

        for (i, s) in self.springs.iter_mut().enumerate() {
            if s.deleted {
                continue;
            }
            let pa = points.position[s.point_a.index()];
            let pb = points.position[s.point_b.index()];
            let current_length = (pb - pa).length();
            let strain = (s.rest_length - current_length).abs() / s.rest_length;
            let effective_strength = falloff * global_strength_adjustment * s.strength;

            if strain > effective_strength {
                s.deleted = true;
                broken.push(SpringIndex::from(i));
                sink.on_break(BreakEvent {
                    spring: SpringIndex::from(i),
                    point_a: s.point_a,
                    point_b: s.point_b,
                });
                continue;
            }

            let was_stressed = s.is_stressed;
            if strain > 0.5 * effective_strength {
                s.is_stressed = true;
            } else if strain < 0.08 * effective_strength {
                s.is_stressed = false;
            }
            if s.is_stressed != was_stressed {
                sink.on_stress(StressEvent {
                    spring: SpringIndex::from(i),
                    is_stressed: s.is_stressed,
                });
            }
        }

        let _ = destroy_all_triangles_on_break; // triangle cascade is applied by the ship-level orchestrator
        broken
    }

    /// Hooke + damping force for one non-deleted spring (spec §4.6 step 1).
    /// Returns the force applied to `point_a` (the reaction on `point_b` is
    /// its negation).
    pub fn hooke_force(&self, index: SpringIndex, points: &PointStore) -> Vec2 {
        let s = &self.springs[index.index()];
        let pa = points.position[s.point_a.index()];
        let pb = points.position[s.point_b.index()];
        let va = points.velocity[s.point_a.index()];
        let vb = points.velocity[s.point_b.index()];

        let delta = pb - pa;
        let length = delta.length();
        if length < 1e-6 {
            return Vec2::ZERO;
        }
        let dir = delta / length;

        let spring_force = (length - s.rest_length) * s.stiffness_coefficient;
        let relative_velocity = (vb - va).dot(dir);
        let damping_force = relative_velocity * s.damping_coefficient;

        dir * (spring_force + damping_force)
    }
}

impl Default for SpringStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::MaterialId;

    fn two_point_spring(rest: f32) -> (PointStore, SpringStore, SpringIndex) {
        let mut points = PointStore::new(2, 0);
        let a = points.add_raw(MaterialId::default(), Vec2::new(-rest / 2.0, 0.0), 1.0, 1.0);
        let b = points.add_raw(MaterialId::default(), Vec2::new(rest / 2.0, 0.0), 1.0, 1.0);
        let mut springs = SpringStore::new();
        let idx = springs.add(a, b, 0, 4, 0.5, 1.0, rest, SpringCharacteristics::default(), 0.0);
        (points, springs, idx)
    }

    #[test]
    fn strain_is_symmetric_under_endpoint_swap() {
        // A-then-B ordering, stretched to 3x rest length.
        let mut points_ab = PointStore::new(2, 0);
        points_ab.add_raw(MaterialId::default(), Vec2::new(-1.5, 0.0), 1.0, 1.0);
        points_ab.add_raw(MaterialId::default(), Vec2::new(1.5, 0.0), 1.0, 1.0);
        let mut springs_ab = SpringStore::new();
        let s_ab = springs_ab.add(PointIndex(0), PointIndex(1), 0, 4, 0.5, 1.0, 1.0, SpringCharacteristics::default(), 0.0);

        // B-then-A ordering of the very same geometry.
        let mut points_ba = PointStore::new(2, 0);
        points_ba.add_raw(MaterialId::default(), Vec2::new(1.5, 0.0), 1.0, 1.0);
        points_ba.add_raw(MaterialId::default(), Vec2::new(-1.5, 0.0), 1.0, 1.0);
        let mut springs_ba = SpringStore::new();
        let s_ba = springs_ba.add(PointIndex(0), PointIndex(1), 4, 0, 0.5, 1.0, 1.0, SpringCharacteristics::default(), 0.0);

        let mut sink = crate::events::RecordingEventSink::default();
        let broken_ab = springs_ab.update_strains(&points_ab, 1.0, 1.0, true, &mut sink);
        let broken_ba = springs_ba.update_strains(&points_ba, 1.0, 1.0, true, &mut sink);

        assert_eq!(broken_ab, vec![s_ab]);
        assert_eq!(broken_ba, vec![s_ba]);
    }

    #[test]
    fn low_strain_does_not_break() {
        let (points, mut springs, idx) = two_point_spring(1.0);
        let mut sink = crate::events::RecordingEventSink::default();
        let broken = springs.update_strains(&points, 1.0, 1.0, true, &mut sink);
        assert!(broken.is_empty());
        assert!(!springs.springs[idx.index()].deleted);
    }

    #[test]
    fn high_strain_breaks_and_emits_event() {
        let mut points = PointStore::new(2, 0);
        let a = points.add_raw(MaterialId::default(), Vec2::new(-1.5, 0.0), 1.0, 1.0);
        let b = points.add_raw(MaterialId::default(), Vec2::new(1.5, 0.0), 1.0, 1.0);
        let mut springs = SpringStore::new();
        let idx = springs.add(a, b, 0, 4, 0.1, 1.0, 1.0, SpringCharacteristics::default(), 0.0);
        let mut sink = crate::events::RecordingEventSink::default();

        let broken = springs.update_strains(&points, 1.0, 1.0, true, &mut sink);
        assert_eq!(broken, vec![idx]);
        assert!(springs.springs[idx.index()].deleted);
        assert_eq!(sink.breaks.len(), 1);
    }

    #[test]
    fn stress_hysteresis_sets_and_clears() {
        let mut points = PointStore::new(2, 0);
        let a = points.add_raw(MaterialId::default(), Vec2::new(-0.8, 0.0), 1.0, 1.0);
        let b = points.add_raw(MaterialId::default(), Vec2::new(0.8, 0.0), 1.0, 1.0);
        let mut springs = SpringStore::new();
        // rest=1.0, current=1.6 -> strain=0.6; strength high enough to not break but > 0.5*eff
        let idx = springs.add(a, b, 0, 4, 2.0, 1.0, 1.0, SpringCharacteristics::default(), 0.0);
        let mut sink = crate::events::RecordingEventSink::default();
        springs.update_strains(&points, 1.0, 1.0, true, &mut sink);
        assert!(springs.springs[idx.index()].is_stressed);
    }
}
