//! `GameParameters`: the single mutable configuration value passed by
//! reference into every per-tick entry point (spec §6). Components cache the
//! values they care about and recompute derived coefficients when they
//! change; see [`ParameterVersion`].

use serde::{Deserialize, Serialize};

/// Fixed simulation timestep, seconds. 60 Hz, matching the teacher's world
/// clock convention (`TICKS_PER_HOUR` ticks at 60 Hz = 1 in-game hour per
/// real second) and the point-fall scenario in spec §8 (`dt = 1/60`).
pub const DEFAULT_DT: f32 = 1.0 / 60.0;

/// All tunables referenced by name across spec §4. Grouped by the component
/// that primarily reads them; several (e.g. `global_strength_adjustment`)
/// are read by more than one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameParameters {
    // -- Mechanics (C6, C2) --
    pub gravity: f32,
    pub num_mechanical_iterations: u32,
    pub global_strength_adjustment: f32,
    pub spring_stiffness_adjustment: f32,
    pub spring_damping_adjustment: f32,
    pub is_ultra_violent_mode: bool,

    // -- Ocean floor collision (C6) --
    pub ocean_floor_elasticity: f32,
    pub ocean_floor_friction_static: f32,
    pub ocean_floor_friction_kinetic: f32,

    // -- Combustion (C7) --
    pub combustion_speed_adjustment: f32,
    pub max_burning_particles_per_ship: u32,

    // -- Wind (C12) --
    pub do_modulate_wind: bool,
    pub wind_speed_base: f32,
    pub wind_speed_max_factor: f32,
    pub wind_gust_frequency_adjustment: f32,

    // -- Storm (C12) --
    pub storm_duration_seconds: f32,

    // -- Ocean surface (C10) --
    pub sea_depth: f32,
    pub ocean_surface_gravity: f32,

    // -- Ocean floor (C11) --
    pub bumpiness: f32,
    pub detail_amplification: f32,

    // -- Bombs / gadgets (C9) --
    pub bomb_blast_radius: f32,
    pub max_bomb_blast_radius: f32,
    pub bomb_blast_force_adjustment: f32,
    pub max_bomb_blast_force_adjustment: f32,
    pub bomb_blast_heat: f32,
    pub bombs_temperature_trigger: f32,

    /// Blast strength of a sodium/water-reaction explosion (spec §4.7);
    /// unlike combustion explosions this isn't sourced from a material, so
    /// it gets its own tunable.
    pub water_reaction_blast_force: f32,

    // -- Tools (C13) --
    pub destroy_radius: f32,
    pub repair_radius: f32,
    pub repair_speed_adjustment: f32,
    pub injection_radius: f32,
    pub tool_search_radius: f32,
    pub draw_force: f32,
    pub swirl_force: f32,
    pub heat_blaster_heat_flow: f32,
    pub flood_radius: f32,
    pub flood_quantity: f32,
    pub scrub_radius: f32,
    pub move_tool_inertia: f32,
}

impl Default for GameParameters {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            num_mechanical_iterations: 8,
            global_strength_adjustment: 1.0,
            spring_stiffness_adjustment: 1.0,
            spring_damping_adjustment: 1.0,
            is_ultra_violent_mode: false,

            ocean_floor_elasticity: 0.4,
            ocean_floor_friction_static: 0.5,
            ocean_floor_friction_kinetic: 0.3,

            combustion_speed_adjustment: 1.0,
            max_burning_particles_per_ship: 100,

            do_modulate_wind: true,
            wind_speed_base: 20.0,
            wind_speed_max_factor: 4.0,
            wind_gust_frequency_adjustment: 1.0,

            storm_duration_seconds: 60.0,

            sea_depth: 100.0,
            ocean_surface_gravity: 9.81,

            bumpiness: 1.0,
            detail_amplification: 1.0,

            bomb_blast_radius: 6.0,
            max_bomb_blast_radius: 12.0,
            bomb_blast_force_adjustment: 1.0,
            max_bomb_blast_force_adjustment: 4.0,
            bomb_blast_heat: 100000.0,
            bombs_temperature_trigger: 373.15,

            water_reaction_blast_force: 3_000_000.0,

            destroy_radius: 1.5,
            repair_radius: 2.5,
            repair_speed_adjustment: 1.0,
            injection_radius: 1.0,
            tool_search_radius: 2.0,
            draw_force: 40000.0,
            swirl_force: 40000.0,
            heat_blaster_heat_flow: 2000.0,
            flood_radius: 1.0,
            flood_quantity: 1.0,
            scrub_radius: 2.0,
            move_tool_inertia: 3.0,
        }
    }
}

/// Effective (ultra-violent-aware) blast radius/force/heat for a deflagration
/// gadget explosion, shared by every bomb kind in §4.9.
impl GameParameters {
    pub fn effective_blast_radius(&self) -> f32 {
        if self.is_ultra_violent_mode {
            (self.bomb_blast_radius * 10.0).min(self.max_bomb_blast_radius * 2.0)
        } else {
            self.bomb_blast_radius
        }
    }

    pub fn effective_blast_force_adjustment(&self) -> f32 {
        if self.is_ultra_violent_mode {
            (self.bomb_blast_force_adjustment * 10.0).min(self.max_bomb_blast_force_adjustment * 2.0)
        } else {
            self.bomb_blast_force_adjustment
        }
    }
}

/// A monotonic counter bumped by the host whenever it mutates
/// `GameParameters`, so a component can compare against its last-seen value
/// to decide whether to recompute derived coefficients ("components cache
/// adjustable values and recompute derived coefficients on change", spec
/// §6). Cheaper than deep-comparing the whole struct every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParameterVersion(pub u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ultra_violent_caps_blast_radius() {
        let mut p = GameParameters::default();
        p.is_ultra_violent_mode = true;
        p.bomb_blast_radius = 6.0;
        p.max_bomb_blast_radius = 12.0;
        assert_eq!(p.effective_blast_radius(), 24.0);
    }

    #[test]
    fn normal_mode_uses_base_radius() {
        let p = GameParameters::default();
        assert_eq!(p.effective_blast_radius(), p.bomb_blast_radius);
    }

    #[test]
    fn serde_roundtrip() {
        let p = GameParameters::default();
        let json = serde_json::to_string(&p).unwrap();
        let back: GameParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
