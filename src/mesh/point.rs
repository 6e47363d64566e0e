//! Point store (spec §4.1, component C1): structure-of-arrays over every
//! point attribute. Raw ship points occupy `[0, raw_count)`; ephemeral
//! points occupy `[ephemeral_start, ephemeral_start + ephemeral_capacity)`,
//! where `ephemeral_start` is `raw_count` rounded up to [`ALIGNMENT`]. A
//! raw-ship point is never deleted, only damaged/detached; an ephemeral slot
//! is recycled in place.

use crate::error::{SimError, SimResult};
use crate::ids::{PlaneId, PointIndex, SpringIndex, TriangleIndex, NONE_PLANE_ID};
use crate::materials::MaterialId;
use glam::Vec2;

/// SIMD alignment (in elements) the ephemeral partition is rounded up to, so
/// a renderer can slice `[0, raw_count)` or `[ephemeral_start, ..)` as an
/// aligned `bytemuck` buffer.
pub const ALIGNMENT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EphemeralType {
    None,
    AirBubble,
    Debris,
    Smoke,
    Sparkle,
    WakeBubble,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BubbleState {
    pub initial_size: f32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SmokeState {
    /// `true` selects the fast (explosion-driven) growth curve
    /// `1.07·(1−e^{−3·progress})`; `false` selects the slow linear-to-5s curve.
    pub is_fast: bool,
    pub drift_seed: f32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EphemeralSlot {
    pub kind: EphemeralType,
    pub start_time: f32,
    pub max_lifetime: f32,
    pub bubble: BubbleState,
    pub smoke: SmokeState,
}

impl Default for EphemeralType {
    fn default() -> Self {
        EphemeralType::None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombustionState {
    NotBurning,
    Developing1,
    Developing2,
    Burning,
    ExtinguishingConsumed,
    ExtinguishingSmotheredRain,
    ExtinguishingSmotheredWater,
    Exploded,
}

impl Default for CombustionState {
    fn default() -> Self {
        CombustionState::NotBurning
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CombustionInfo {
    pub state: CombustionState,
    pub flame_development: f32,
    pub max_flame_development: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaterReactionState {
    Unreacted,
    ReactionTriggered,
    Consumed,
}

impl Default for WaterReactionState {
    fn default() -> Self {
        WaterReactionState::Unreacted
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WaterReactionInfo {
    pub state: WaterReactionState,
    /// Simulation time the point became overdue for reaction, used to
    /// rank candidates for the top-K selection in spec §4.7.
    pub overdue_since: f32,
}

/// Non-hot per-point bookkeeping: kept as one array-of-structs (rather than
/// one `Vec` per field) because nothing in the tick loop needs SIMD access
/// to these — only the mechanics-critical fields (position/velocity/force/
/// mass/integration factor) are split into their own arrays below.
#[derive(Debug, Clone, Copy)]
pub struct PointMeta {
    pub material: MaterialId,
    pub electrical_material: Option<MaterialId>,
    pub strength: f32,
    pub decay: f32,
    pub damaged: bool,
    pub pinned: bool,
    pub gadget_attached: bool,
    pub plane: PlaneId,
    pub connected_component: u32,
    pub factory_position: Vec2,
    pub color: [f32; 4],
    pub tex_coord: Vec2,
}

impl Default for PointMeta {
    fn default() -> Self {
        Self {
            material: MaterialId::default(),
            electrical_material: None,
            strength: 1.0,
            decay: 1.0,
            damaged: false,
            pinned: false,
            gadget_attached: false,
            plane: NONE_PLANE_ID,
            connected_component: 0,
            factory_position: Vec2::ZERO,
            color: [1.0, 1.0, 1.0, 1.0],
            tex_coord: Vec2::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DetachOptions {
    pub velocity: Vec2,
    /// If true, the detach severs every connected spring as well (used by
    /// blast force fields); if false, the point keeps its connections but
    /// is flagged as damaged (used by e.g. a saw cut on one endpoint).
    pub sever_springs: bool,
}

/// Structure-of-arrays point container (spec component C1).
pub struct PointStore {
    raw_count: usize,
    next_raw: usize,
    ephemeral_start: usize,
    ephemeral_capacity: usize,
    ephemeral_search_cursor: usize,

    pub position: Vec<Vec2>,
    pub velocity: Vec<Vec2>,
    pub force_dynamic: Vec<Vec2>,
    pub force_static: Vec<Vec2>,
    pub augmented_mass: Vec<f32>,
    pub transient_mass: Vec<f32>,
    pub current_mass: Vec<f32>,
    pub integration_factor: Vec<Vec2>,
    pub water: Vec<f32>,
    pub pressure: Vec<f32>,
    pub temperature: Vec<f32>,

    pub meta: Vec<PointMeta>,
    pub springs: Vec<Vec<(SpringIndex, PointIndex)>>,
    pub triangles: Vec<Vec<TriangleIndex>>,

    pub ephemeral: Vec<EphemeralSlot>,
    pub combustion: Vec<CombustionInfo>,
    pub water_reaction: Vec<WaterReactionInfo>,
}

impl PointStore {
    pub fn new(raw_capacity: usize, ephemeral_capacity: usize) -> Self {
        let ephemeral_start = raw_capacity.div_ceil(ALIGNMENT) * ALIGNMENT;
        let total = ephemeral_start + ephemeral_capacity;
        Self {
            raw_count: raw_capacity,
            next_raw: 0,
            ephemeral_start,
            ephemeral_capacity,
            ephemeral_search_cursor: 0,

            position: vec![Vec2::ZERO; total],
            velocity: vec![Vec2::ZERO; total],
            force_dynamic: vec![Vec2::ZERO; total],
            force_static: vec![Vec2::ZERO; total],
            augmented_mass: vec![1.0; total],
            transient_mass: vec![0.0; total],
            current_mass: vec![1.0; total],
            integration_factor: vec![Vec2::ZERO; total],
            water: vec![0.0; total],
            pressure: vec![0.0; total],
            temperature: vec![288.15; total],

            meta: vec![PointMeta::default(); total],
            springs: vec![Vec::new(); total],
            triangles: vec![Vec::new(); total],

            ephemeral: vec![EphemeralSlot::default(); total],
            combustion: vec![CombustionInfo::default(); total],
            water_reaction: vec![WaterReactionInfo::default(); total],
        }
    }

    pub fn raw_count(&self) -> usize {
        self.raw_count
    }

    pub fn ephemeral_range(&self) -> std::ops::Range<usize> {
        self.ephemeral_start..(self.ephemeral_start + self.ephemeral_capacity)
    }

    pub fn total_len(&self) -> usize {
        self.ephemeral_start + self.ephemeral_capacity
    }

    /// Adds a raw ship point; only valid up to `raw_capacity` calls, matching
    /// the spec's "raw-ship capacity is fixed at construction" precondition.
    pub fn add_raw(
        &mut self,
        material: MaterialId,
        position: Vec2,
        mass: f32,
        strength: f32,
    ) -> PointIndex {
        debug_assert!(self.next_raw < self.raw_count, "raw point capacity exceeded");
        let idx = self.next_raw;
        self.next_raw += 1;

        self.position[idx] = position;
        self.meta[idx].factory_position = position;
        self.meta[idx].material = material;
        self.meta[idx].strength = strength;
        self.augmented_mass[idx] = mass;
        self.current_mass[idx] = mass;

        PointIndex::from(idx)
    }

    /// Recomputes `current_mass` (linear convergence to target) and the
    /// cached integration factor for every live point (spec §4.1).
    /// `buoyancy_volume_fill_of` maps a point's structural material to its
    /// `buoyancyVolumeFill`; `water_density_at` maps temperature (K) to
    /// water density (kg/m^3).
    pub fn update_mass_and_integration_factor(
        &mut self,
        dt: f32,
        buoyancy_volume_fill_of: impl Fn(MaterialId) -> f32,
        water_density_at: impl Fn(f32) -> f32,
    ) {
        const MASS_CONVERGENCE_RATE: f32 = 0.12;
        for i in 0..self.total_len() {
            if self.is_ephemeral_slot(i) && self.ephemeral[i].kind == EphemeralType::None {
                continue;
            }
            let buoyancy_fill = buoyancy_volume_fill_of(self.meta[i].material);
            let contained_water = self.water[i].min(buoyancy_fill);
            let target = self.augmented_mass[i] + self.transient_mass[i]
                + contained_water * water_density_at(self.temperature[i]);
            self.current_mass[i] += MASS_CONVERGENCE_RATE * (target - self.current_mass[i]);
            debug_assert!(self.current_mass[i] > 0.0, "point mass must stay positive");

            let factor = dt * dt / self.current_mass[i];
            self.integration_factor[i] = Vec2::splat(factor);
        }
    }

    #[inline]
    fn is_ephemeral_slot(&self, index: usize) -> bool {
        index >= self.ephemeral_start
    }

    /// Spawns (or steals) an ephemeral particle slot. Rotates the search
    /// cursor linearly through the ephemeral partition (spec §4.1, §5's
    /// "single `searchStart` cursor updated linearly"). When `force_steal`
    /// is false and every slot is alive, returns `OutOfEphemeralSlots`.
    pub fn spawn_ephemeral(
        &mut self,
        kind: EphemeralType,
        position: Vec2,
        velocity: Vec2,
        start_time: f32,
        max_lifetime: f32,
        force_steal: bool,
    ) -> SimResult<PointIndex> {
        let range = self.ephemeral_range();
        let len = range.len();
        debug_assert_ne!(kind, EphemeralType::None);

        let mut candidate = None;
        let mut oldest: Option<(usize, f32)> = None;

        for step in 0..len {
            let idx = range.start + (self.ephemeral_search_cursor + step) % len;
            if self.ephemeral[idx].kind == EphemeralType::None {
                candidate = Some(idx);
                break;
            }
            let age = start_time - self.ephemeral[idx].start_time;
            if oldest.map_or(true, |(_, best_age)| age > best_age) {
                oldest = Some((idx, age));
            }
        }

        let idx = match candidate.or_else(|| if force_steal { oldest.map(|(i, _)| i) } else { None }) {
            Some(i) => i,
            None => return Err(SimError::OutOfEphemeralSlots),
        };

        self.ephemeral_search_cursor = (idx - range.start + 1) % len;

        self.ephemeral[idx] = EphemeralSlot {
            kind,
            start_time,
            max_lifetime,
            bubble: BubbleState::default(),
            smoke: SmokeState::default(),
        };
        self.position[idx] = position;
        self.velocity[idx] = velocity;
        self.current_mass[idx] = 0.001;
        self.augmented_mass[idx] = 0.001;

        Ok(PointIndex::from(idx))
    }

    /// Recycles an ephemeral slot in place (spec §4.1: "deleted ephemerals
    /// have `EphemeralType::None`").
    pub fn destroy_ephemeral(&mut self, index: PointIndex) {
        let i = index.index();
        debug_assert!(self.is_ephemeral_slot(i));
        self.ephemeral[i] = EphemeralSlot::default();
    }

    /// Marks a raw point as damaged/detached, applying the given velocity.
    /// One-way within a simulation: only `restore` undoes it (spec §4.1).
    pub fn detach(&mut self, index: PointIndex, options: DetachOptions) -> SimResult<()> {
        let i = index.index();
        debug_assert!(i < self.raw_count, "detach is only valid on raw ship points");
        if self.meta[i].damaged {
            // No-op per spec §7: detach of an already-detached point is a
            // caller contract violation, asserted in debug.
            debug_assert!(false, "point already detached");
            return Err(SimError::PointNotDamaged);
        }
        self.meta[i].damaged = true;
        self.velocity[i] = options.velocity;
        if options.sever_springs {
            self.springs[i].clear();
        }
        Ok(())
    }

    /// Restores a previously damaged point (spec §4.1).
    pub fn restore(&mut self, index: PointIndex) -> SimResult<()> {
        let i = index.index();
        if !self.meta[i].damaged {
            debug_assert!(false, "restore called on a non-damaged point");
            return Err(SimError::PointNotDamaged);
        }
        self.meta[i].damaged = false;
        Ok(())
    }

    pub fn is_damaged(&self, index: PointIndex) -> bool {
        self.meta[index.index()].damaged
    }

    pub fn is_alive_ephemeral(&self, index: usize) -> bool {
        self.is_ephemeral_slot(index) && self.ephemeral[index].kind != EphemeralType::None
    }

    /// Raw bytes of the raw-point position slice, for a renderer that wants
    /// to memcpy straight into a vertex buffer instead of walking `Vec2`s one
    /// at a time (spec §4.14's Upload interface). `glam`'s `bytemuck` feature
    /// makes `Vec2` `Pod`, so this is a plain reinterpret, no copy.
    pub fn raw_position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.position[..self.raw_count])
    }

    /// Same, for velocity.
    pub fn raw_velocity_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.velocity[..self.raw_count])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> PointStore {
        PointStore::new(4, 4)
    }

    #[test]
    fn ephemeral_partition_is_aligned() {
        let s = PointStore::new(3, 2);
        assert_eq!(s.ephemeral_start, ALIGNMENT);
    }

    #[test]
    fn raw_position_bytes_match_vec2_layout() {
        let mut s = store();
        s.add_raw(MaterialId::default(), Vec2::new(1.0, 2.0), 1.0, 1.0);
        s.add_raw(MaterialId::default(), Vec2::new(-3.5, 0.0), 1.0, 1.0);
        let bytes = s.raw_position_bytes();
        assert_eq!(bytes.len(), 2 * std::mem::size_of::<Vec2>());
        let back: &[Vec2] = bytemuck::cast_slice(bytes);
        assert_eq!(back[0], Vec2::new(1.0, 2.0));
        assert_eq!(back[1], Vec2::new(-3.5, 0.0));
    }

    #[test]
    fn add_raw_increments_cursor() {
        let mut s = store();
        let a = s.add_raw(MaterialId::default(), Vec2::new(1.0, 2.0), 1.0, 1.0);
        let b = s.add_raw(MaterialId::default(), Vec2::ZERO, 1.0, 1.0);
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
    }

    #[test]
    fn spawn_ephemeral_fails_when_full_without_force_steal() {
        let mut s = PointStore::new(0, 2);
        s.spawn_ephemeral(EphemeralType::Debris, Vec2::ZERO, Vec2::ZERO, 0.0, 1.0, false)
            .unwrap();
        s.spawn_ephemeral(EphemeralType::Debris, Vec2::ZERO, Vec2::ZERO, 0.0, 1.0, false)
            .unwrap();
        let result = s.spawn_ephemeral(EphemeralType::Debris, Vec2::ZERO, Vec2::ZERO, 0.0, 1.0, false);
        assert_eq!(result, Err(SimError::OutOfEphemeralSlots));
    }

    #[test]
    fn spawn_ephemeral_steals_oldest_when_forced() {
        let mut s = PointStore::new(0, 2);
        let first = s
            .spawn_ephemeral(EphemeralType::Debris, Vec2::ZERO, Vec2::ZERO, 0.0, 1.0, false)
            .unwrap();
        s.spawn_ephemeral(EphemeralType::Debris, Vec2::ZERO, Vec2::ZERO, 1.0, 1.0, false)
            .unwrap();
        let stolen = s
            .spawn_ephemeral(EphemeralType::Smoke, Vec2::ZERO, Vec2::ZERO, 2.0, 1.0, true)
            .unwrap();
        assert_eq!(stolen, first);
    }

    #[test]
    fn detach_then_restore_roundtrip() {
        let mut s = store();
        let p = s.add_raw(MaterialId::default(), Vec2::ZERO, 1.0, 1.0);
        assert!(s
            .detach(
                p,
                DetachOptions {
                    velocity: Vec2::new(1.0, 0.0),
                    sever_springs: false
                }
            )
            .is_ok());
        assert!(s.is_damaged(p));
        assert!(s.restore(p).is_ok());
        assert!(!s.is_damaged(p));
    }

    #[test]
    fn restore_without_detach_is_error() {
        let mut s = store();
        let p = s.add_raw(MaterialId::default(), Vec2::ZERO, 1.0, 1.0);
        assert_eq!(s.restore(p), Err(SimError::PointNotDamaged));
    }
}
