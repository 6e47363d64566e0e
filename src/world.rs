//! World: the top-level aggregate owning every ship plus the shared
//! environment, driving one fixed-dt tick across the whole pipeline (spec
//! §2, §5's "single cooperative loop per world tick").

use crate::clock::SimClock;
use crate::environment::Environment;
use crate::events::EventSink;
use crate::materials::MaterialDatabase;
use crate::params::GameParameters;
use crate::ship::Ship;
use rand::Rng;

pub struct World {
    pub ships: Vec<Ship>,
    pub environment: Environment,
    pub materials: MaterialDatabase,
    pub clock: SimClock,
}

impl World {
    pub fn new(environment: Environment, materials: MaterialDatabase) -> Self {
        Self {
            ships: Vec::new(),
            environment,
            materials,
            clock: SimClock::new(),
        }
    }

    pub fn add_ship(&mut self, ship: Ship) -> usize {
        self.ships.push(ship);
        self.ships.len() - 1
    }

    /// Runs one fixed-dt tick: environment (C12 → C10/C11) first, then every
    /// ship's own pipeline (spec §5's "recommended parallel region: per-ship
    /// updates"); ships don't read each other's state within a tick, so the
    /// ordering between them doesn't matter, only that every ship sees this
    /// tick's environment snapshot.
    pub fn tick(&mut self, dt: f32, params: &GameParameters, rng: &mut impl Rng, sink: &mut dyn EventSink) {
        self.clock.advance(dt);
        self.environment.update(dt, self.clock.wall(), self.clock.simulation_time(), params, rng);

        let sim_time = self.clock.simulation_time();
        let environment = &self.environment;
        for ship in &mut self.ships {
            ship.tick(
                dt,
                &self.clock,
                &self.materials,
                params,
                glam::Vec2::new(0.0, -params.gravity),
                |x| environment.floor_height_at(x),
                |x| environment.floor_normal_at(x),
                |x| environment.surface_height_at(x, sim_time),
                rng,
                sink,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NullEventSink;
    use crate::materials::MaterialId;

    #[test]
    fn world_tick_advances_ship_state() {
        let params = GameParameters::default();
        let environment = Environment::new(glam::Vec2::X, Vec::new(), &params);
        let materials = MaterialDatabase::default();
        let mut world = World::new(environment, materials);

        let mut ship = Ship::new(1, 0, &params);
        ship.points.add_raw(MaterialId::default(), glam::Vec2::new(0.0, 50.0), 1.0, 1.0);
        world.add_ship(ship);

        let mut rng = rand::rngs::mock::StepRng::new(0, 1);
        let mut sink = NullEventSink;
        for _ in 0..10 {
            world.tick(1.0 / 60.0, &params, &mut rng, &mut sink);
        }

        assert!(world.ships[0].points.position[0].y < 50.0);
        assert!(world.clock.simulation_time() > 0.0);
    }
}
