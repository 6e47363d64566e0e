//! World environment: ocean surface, ocean floor, wind/storm/clouds (spec
//! §4.10-§4.12, components C10-C12). [`Environment`] owns one of each and
//! drives them in the order the world tick pipeline requires (C12 then
//! C10/C11).

pub mod clouds;
pub mod ocean_floor;
pub mod ocean_surface;
pub mod storm;
pub mod wind;

use crate::params::GameParameters;
use clouds::CloudField;
use ocean_floor::OceanFloor;
use ocean_surface::OceanSurface;
use rand::Rng;
use std::time::Duration;
use storm::Storm;
use wind::Wind;

pub struct Environment {
    pub wind: Wind,
    pub storm: Storm,
    pub clouds: CloudField,
    pub ocean_surface: OceanSurface,
    pub ocean_floor: OceanFloor,
}

impl Environment {
    pub fn new(wind_direction: glam::Vec2, bump_map: Vec<f32>, params: &GameParameters) -> Self {
        Self {
            wind: Wind::new(wind_direction),
            storm: Storm::new(),
            clouds: CloudField::new(6),
            ocean_surface: OceanSurface::new(),
            ocean_floor: OceanFloor::new(bump_map, params.sea_depth, params.bumpiness, params.detail_amplification),
        }
    }

    /// Runs C12 (wind/storm/clouds) then C10/C11 (ocean surface/floor), the
    /// pipeline order fixed by spec §2.
    pub fn update(&mut self, dt: f32, wall_clock: Duration, sim_time: f32, params: &GameParameters, rng: &mut impl Rng) {
        let storm_output = self.storm.update(dt, params);
        self.wind.update(wall_clock, params, storm_output.wind_gradient, rng);
        self.clouds.update(dt, self.wind.velocity().x, storm_output, rng);
        self.ocean_surface.update(dt, params.ocean_surface_gravity, sim_time);
    }

    pub fn floor_height_at(&self, x: f32) -> f32 {
        self.ocean_floor.height_at(x)
    }

    pub fn floor_normal_at(&self, x: f32) -> glam::Vec2 {
        self.ocean_floor.normal_at(x)
    }

    pub fn surface_height_at(&self, x: f32, sim_time: f32) -> f32 {
        self.ocean_surface.height_at(x, sim_time, self.wind.current_speed_kmh())
    }
}
