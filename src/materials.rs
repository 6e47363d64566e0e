//! In-memory material value types (SPEC_FULL §3.1).
//!
//! Ship-file and material-database *parsing* is an external collaborator
//! (spec §6); this module only defines the data points/springs hold
//! references to once parsed, and a small in-memory registry the core can
//! be tested against without a real asset pipeline.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct MaterialId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombustionType {
    NotCombustible,
    Combustion,
    Explosion,
}

/// Structural material properties (spec §4.7's "material's strength",
/// §4.1's mass, §4.9's "BaseHeat from material").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructuralMaterial {
    pub mass: f32,
    pub strength: f32,
    pub stiffness: f32,
    pub buoyancy_volume_fill: f32,
    pub water_intake: f32,
    pub water_retention: f32,
    pub water_diffusion_speed: f32,
    pub ignition_temperature: f32,
    pub melting_temperature: f32,
    pub combustion_type: CombustionType,
    pub explosive_combustion_force: f32,
    pub explosive_combustion_force_radius: f32,
    pub explosive_combustion_heat: f32,
    pub reactivity: f32,
    pub is_legacy_electrical: bool,
    /// Static/kinetic Coulomb friction coefficients against the ocean floor
    /// (spec §4.6).
    pub static_friction: f32,
    pub kinetic_friction: f32,
    pub elasticity: f32,
}

impl Default for StructuralMaterial {
    fn default() -> Self {
        Self {
            mass: 1.0,
            strength: 1.0,
            stiffness: 1.0,
            buoyancy_volume_fill: 1.0,
            water_intake: 0.0,
            water_retention: 1.0,
            water_diffusion_speed: 0.5,
            ignition_temperature: 473.15,
            melting_temperature: 1473.15,
            combustion_type: CombustionType::Combustion,
            explosive_combustion_force: 0.0,
            explosive_combustion_force_radius: 0.0,
            explosive_combustion_heat: 0.0,
            reactivity: 0.0,
            is_legacy_electrical: false,
            static_friction: 0.5,
            kinetic_friction: 0.3,
            elasticity: 0.4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElectricalElementType {
    Lamp,
    Cable,
    Generator,
    Switch,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElectricalMaterial {
    pub element_type: ElectricalElementType,
    pub luminiscence: f32,
    pub light_spread: f32,
    /// Probability, per wall-clock second, of a connected lamp failing while
    /// wet (spec §4.5 "wetFailureRateCdf").
    pub wet_failure_rate: f32,
}

impl Default for ElectricalMaterial {
    fn default() -> Self {
        Self {
            element_type: ElectricalElementType::Cable,
            luminiscence: 0.0,
            light_spread: 0.0,
            wet_failure_rate: 0.0,
        }
    }
}

/// Minimal in-memory material registry. A real host populates this from its
/// own ship/material-database parser; the core never reads a file.
///
/// `MaterialId::default()` (id 0) is always a valid lookup: `PointStore`'s
/// unused alignment padding slots carry a default-constructed `PointMeta`
/// (material id 0) and `update_mass_and_integration_factor` looks every
/// slot in the raw partition up regardless of whether it's in use, so
/// `Default` pre-registers id 0 rather than leaving it dangling.
#[derive(Debug)]
pub struct MaterialDatabase {
    structural: Vec<StructuralMaterial>,
    electrical: Vec<ElectricalMaterial>,
}

impl Default for MaterialDatabase {
    fn default() -> Self {
        Self {
            structural: vec![StructuralMaterial::default()],
            electrical: vec![ElectricalMaterial::default()],
        }
    }
}

impl MaterialDatabase {
    pub fn register_structural(&mut self, material: StructuralMaterial) -> MaterialId {
        self.structural.push(material);
        MaterialId((self.structural.len() - 1) as u32)
    }

    pub fn register_electrical(&mut self, material: ElectricalMaterial) -> MaterialId {
        self.electrical.push(material);
        MaterialId((self.electrical.len() - 1) as u32)
    }

    pub fn structural(&self, id: MaterialId) -> &StructuralMaterial {
        &self.structural[id.0 as usize]
    }

    pub fn electrical(&self, id: MaterialId) -> &ElectricalMaterial {
        &self.electrical[id.0 as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_lookup_structural() {
        let mut db = MaterialDatabase::default();
        let id = db.register_structural(StructuralMaterial {
            mass: 5.0,
            ..Default::default()
        });
        assert_eq!(db.structural(id).mass, 5.0);
    }
}
