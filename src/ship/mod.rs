//! Ship: the aggregate owning one vessel's mesh stores and orchestrating the
//! per-tick pipeline order fixed by spec §2/§5 (C7 low-freq → C6 x N → C7
//! high-freq → C5 → C9; C13 tools run outside the tick, driven by input).

pub mod force_fields;
pub mod gadgets;
pub mod interactions;
pub mod lifecycle;
pub mod relaxation;

use crate::clock::SimClock;
use crate::events::EventSink;
use crate::materials::MaterialDatabase;
use crate::mesh::electrical::ElectricalElementStore;
use crate::mesh::frontier::FrontierTracker;
use crate::mesh::point::PointStore;
use crate::mesh::spring::SpringStore;
use crate::mesh::triangle::TriangleStore;
use crate::params::GameParameters;
use force_fields::ForceField;
use gadgets::GadgetStore;
use glam::Vec2;
use interactions::RepairSession;
use lifecycle::DecayCoefficients;
use rand::Rng;

pub struct Ship {
    pub points: PointStore,
    pub springs: SpringStore,
    pub triangles: TriangleStore,
    pub frontiers: FrontierTracker,
    pub electrical: ElectricalElementStore,
    pub gadgets: GadgetStore,
    pub active_force_fields: Vec<ForceField>,
    pub repair_session: RepairSession,
    decay: DecayCoefficients,
    low_frequency_accumulator: f32,
}

/// Low-frequency components (combustion/water-reaction scan) run at a fixed
/// cadence rather than every tick (spec §2 "C7 low-frequency combustion").
const LOW_FREQUENCY_INTERVAL: f32 = 1.0 / 4.0;

impl Ship {
    pub fn new(raw_point_capacity: usize, ephemeral_capacity: usize, params: &GameParameters) -> Self {
        Self {
            points: PointStore::new(raw_point_capacity, ephemeral_capacity),
            springs: SpringStore::new(),
            triangles: TriangleStore::new(),
            frontiers: FrontierTracker::new(raw_point_capacity + ephemeral_capacity),
            electrical: ElectricalElementStore::new(),
            gadgets: GadgetStore::new(),
            active_force_fields: Vec::new(),
            repair_session: RepairSession::default(),
            decay: DecayCoefficients::fit(params.combustion_speed_adjustment),
            low_frequency_accumulator: 0.0,
        }
    }

    /// Call whenever `combustion_speed_adjustment` changes so the decay fit
    /// doesn't go stale (spec §6 "components... recompute derived
    /// coefficients on change").
    pub fn refresh_combustion_coefficients(&mut self, params: &GameParameters) {
        self.decay = DecayCoefficients::fit(params.combustion_speed_adjustment);
    }

    /// Runs one world tick for this ship (spec §2's ordering, the C12/C10/C11
    /// environment phases having already run in [`crate::world::World`]).
    #[allow(clippy::too_many_arguments)]
    pub fn tick(
        &mut self,
        dt: f32,
        clock: &SimClock,
        materials: &MaterialDatabase,
        params: &GameParameters,
        gravity: Vec2,
        floor_height_at: impl Fn(f32) -> f32,
        floor_normal_at: impl Fn(f32) -> Vec2,
        surface_height_at: impl Fn(f32) -> f32,
        rng: &mut impl Rng,
        sink: &mut dyn EventSink,
    ) {
        self.low_frequency_accumulator += dt;
        if self.low_frequency_accumulator >= LOW_FREQUENCY_INTERVAL {
            self.low_frequency_accumulator = 0.0;
            lifecycle::update_low_frequency(&mut self.points, materials, params, self.decay, gravity.normalize_or_zero(), clock.simulation_time(), rng, sink);
        }

        for field in &self.active_force_fields {
            force_fields::apply(field, &mut self.points, rng);
        }

        self.points.update_mass_and_integration_factor(dt, |m| materials.structural(m).buoyancy_volume_fill, water_density_at);
        relaxation::relax(&mut self.points, &mut self.springs, materials, params, gravity, dt, &floor_height_at, &floor_normal_at);

        let broken = self.springs.update_strains(&self.points, params.global_strength_adjustment, 1.0 / params.num_mechanical_iterations.max(1) as f32, false, sink);
        for spring in broken {
            let s = self.springs.springs[spring.index()];
            self.points.springs[s.point_a.index()].retain(|(idx, _)| *idx != spring);
            self.points.springs[s.point_b.index()].retain(|(idx, _)| *idx != spring);
            for &tri in s.super_triangles.as_slice() {
                if !self.triangles.get(tri).deleted {
                    crate::mesh::frontier::destroy_triangle(&mut self.triangles, &mut self.frontiers, tri, &self.points, &self.springs);
                }
            }
        }

        lifecycle::update_extinguishing(&mut self.points);
        lifecycle::update_ephemerals(&mut self.points, clock.simulation_time(), dt, &surface_height_at, rng, sink);

        let sequence = self.electrical.next_visit_sequence();
        self.electrical.update_connectivity(&self.points.springs, sequence);
        let water = &self.points.water;
        self.electrical.update(clock.wall(), sequence, |p| water[p.index()] > crate::mesh::electrical::wet_failure_threshold(), rng, sink);

        self.gadgets.update(&mut self.points, params, clock.wall(), rng, sink);
    }
}

fn water_density_at(temperature: f32) -> f32 {
    1000.0 * (1.0 - 0.0002 * (temperature - 288.15)).max(0.8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NullEventSink;
    use crate::materials::MaterialId;

    #[test]
    fn tick_runs_without_panicking_on_empty_ship() {
        let params = GameParameters::default();
        let mut ship = Ship::new(4, 2, &params);
        let materials = MaterialDatabase::default();
        let clock = SimClock::new();
        let mut rng = rand::rngs::mock::StepRng::new(0, 1);
        let mut sink = NullEventSink;

        ship.points.add_raw(MaterialId::default(), Vec2::new(0.0, 10.0), 1.0, 1.0);

        ship.tick(
            1.0 / 60.0,
            &clock,
            &materials,
            &params,
            Vec2::new(0.0, -9.81),
            |_| f32::NEG_INFINITY,
            |_| Vec2::Y,
            |_| 1000.0,
            &mut rng,
            &mut sink,
        );

        assert!(ship.points.position[0].y < 10.0);
    }
}
