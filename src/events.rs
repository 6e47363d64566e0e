//! The event interface (spec §6): a sink that receives well-defined payloads
//! for everything the outside world might want to react to (sound, HUD,
//! statistics). Grounded in the teacher's `events/mod.rs` convention of one
//! plain struct per event, and in its `info!`/`warn!` logging density —
//! every emission here also logs at `debug!` so a host without a sink
//! installed still gets a trace.

use crate::ids::{GadgetId, PlaneId, PointIndex, SpringIndex};
use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GadgetType {
    RcBomb,
    ImpactBomb,
    TimerBomb,
    AntiMatterBomb,
    FireExtinguishingBomb,
    PhysicsProbe,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExplosionType {
    Deflagration,
    Sodium,
    AntiMatterImplosion,
    AntiMatterExplosion,
    FireExtinguishing,
}

#[derive(Debug, Clone, Copy)]
pub struct BreakEvent {
    pub spring: SpringIndex,
    pub point_a: PointIndex,
    pub point_b: PointIndex,
}

#[derive(Debug, Clone, Copy)]
pub struct StressEvent {
    pub spring: SpringIndex,
    pub is_stressed: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct DestroyEvent {
    pub point: PointIndex,
}

#[derive(Debug, Clone, Copy)]
pub struct IgnitionEvent {
    pub point: PointIndex,
}

#[derive(Debug, Clone, Copy)]
pub struct CombustionExplosionEvent {
    pub point: PointIndex,
    pub position: Vec2,
    pub blast_radius: f32,
    pub blast_force: f32,
    pub blast_heat: f32,
    pub explosion_type: ExplosionType,
}

#[derive(Debug, Clone, Copy)]
pub struct WaterReactionEvent {
    pub point: PointIndex,
}

#[derive(Debug, Clone, Copy)]
pub struct WaterReactionExplosionEvent {
    pub point: PointIndex,
    pub position: Vec2,
    pub blast_radius: f32,
    pub blast_force: f32,
    pub blast_heat: f32,
    pub explosion_type: ExplosionType,
}

#[derive(Debug, Clone, Copy)]
pub struct BombPlacedEvent {
    pub gadget: GadgetId,
    pub kind: GadgetType,
}

#[derive(Debug, Clone, Copy)]
pub struct BombRemovedEvent {
    pub gadget: GadgetId,
    pub kind: GadgetType,
}

#[derive(Debug, Clone, Copy)]
pub struct BombExplosionEvent {
    pub kind: GadgetType,
    pub is_underwater: bool,
    pub multiplier: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct RcPingEvent {
    pub is_underwater: bool,
    pub multiplier: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct TimerFuseEvent {
    pub gadget: GadgetId,
    pub fraction: f32,
    pub is_fast: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct TimerDefusedEvent {
    pub gadget: GadgetId,
}

#[derive(Debug, Clone, Copy)]
pub enum AntiMatterPhase {
    Contained,
    PreImploding,
    Imploding,
}

#[derive(Debug, Clone, Copy)]
pub struct AntiMatterEvent {
    pub gadget: GadgetId,
    pub phase: AntiMatterPhase,
}

#[derive(Debug, Clone, Copy)]
pub struct LightningEvent {
    pub position: Vec2,
}

#[derive(Debug, Clone, Copy)]
pub struct LightFlickerEvent {
    pub element: crate::ids::ElectricalElementIndex,
    pub is_on: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct SawedEvent {
    pub spring: SpringIndex,
}

#[derive(Debug, Clone, Copy)]
pub struct AirBubbleSurfacedEvent {
    pub position: Vec2,
}

#[derive(Debug, Clone, Copy)]
pub struct PhysicsProbeReadingEvent {
    pub velocity: Vec2,
    pub temperature: f32,
    pub ocean_depth: f32,
    pub internal_pressure: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct WindSpeedUpdatedEvent {
    pub zero_speed: f32,
    pub base_speed: f32,
    pub pre_max_speed: f32,
    pub max_speed: f32,
    pub current_speed: Vec2,
}

#[derive(Debug, Clone, Copy)]
pub struct NpcStatisticsUpdatedEvent {
    pub plane_id: PlaneId,
}

/// Receives every simulation event named in spec §6. A host implements this
/// to forward events to sound/HUD/telemetry; the core never throws across
/// the tick boundary (spec §7), it only calls through this sink.
pub trait EventSink {
    fn on_break(&mut self, _e: BreakEvent) {}
    fn on_stress(&mut self, _e: StressEvent) {}
    fn on_destroy(&mut self, _e: DestroyEvent) {}
    fn on_ignition(&mut self, _e: IgnitionEvent) {}
    fn on_combustion_explosion(&mut self, _e: CombustionExplosionEvent) {}
    fn on_water_reaction(&mut self, _e: WaterReactionEvent) {}
    fn on_water_reaction_explosion(&mut self, _e: WaterReactionExplosionEvent) {}
    fn on_bomb_placed(&mut self, _e: BombPlacedEvent) {}
    fn on_bomb_removed(&mut self, _e: BombRemovedEvent) {}
    fn on_bomb_explosion(&mut self, _e: BombExplosionEvent) {}
    fn on_rc_ping(&mut self, _e: RcPingEvent) {}
    fn on_timer_fuse(&mut self, _e: TimerFuseEvent) {}
    fn on_timer_defused(&mut self, _e: TimerDefusedEvent) {}
    fn on_anti_matter(&mut self, _e: AntiMatterEvent) {}
    fn on_lightning(&mut self, _e: LightningEvent) {}
    fn on_light_flicker(&mut self, _e: LightFlickerEvent) {}
    fn on_sawed(&mut self, _e: SawedEvent) {}
    fn on_air_bubble_surfaced(&mut self, _e: AirBubbleSurfacedEvent) {}
    fn on_physics_probe_reading(&mut self, _e: PhysicsProbeReadingEvent) {}
    fn on_wind_speed_updated(&mut self, _e: WindSpeedUpdatedEvent) {}
    fn on_npc_statistics_updated(&mut self, _e: NpcStatisticsUpdatedEvent) {}
}

/// No-op sink, the default when a host doesn't care about events yet.
#[derive(Debug, Default)]
pub struct NullEventSink;
impl EventSink for NullEventSink {}

/// Collects every event into a flat log, in arrival order. Used by tests
/// (spec §8's scenario assertions read exact event sequences).
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    pub breaks: Vec<BreakEvent>,
    pub bomb_placed: Vec<BombPlacedEvent>,
    pub bomb_removed: Vec<BombRemovedEvent>,
    pub bomb_explosions: Vec<BombExplosionEvent>,
    pub rc_pings: Vec<RcPingEvent>,
    pub ignitions: Vec<IgnitionEvent>,
    pub water_reactions: Vec<WaterReactionEvent>,
    pub combustion_explosions: Vec<CombustionExplosionEvent>,
    pub water_reaction_explosions: Vec<WaterReactionExplosionEvent>,
}

impl EventSink for RecordingEventSink {
    fn on_break(&mut self, e: BreakEvent) {
        log::debug!("spring {} broke", e.spring.0);
        self.breaks.push(e);
    }
    fn on_bomb_placed(&mut self, e: BombPlacedEvent) {
        self.bomb_placed.push(e);
    }
    fn on_bomb_removed(&mut self, e: BombRemovedEvent) {
        self.bomb_removed.push(e);
    }
    fn on_bomb_explosion(&mut self, e: BombExplosionEvent) {
        log::info!("bomb explosion: {:?}", e.kind);
        self.bomb_explosions.push(e);
    }
    fn on_rc_ping(&mut self, e: RcPingEvent) {
        self.rc_pings.push(e);
    }
    fn on_ignition(&mut self, e: IgnitionEvent) {
        self.ignitions.push(e);
    }
    fn on_water_reaction(&mut self, e: WaterReactionEvent) {
        self.water_reactions.push(e);
    }
    fn on_combustion_explosion(&mut self, e: CombustionExplosionEvent) {
        self.combustion_explosions.push(e);
    }
    fn on_water_reaction_explosion(&mut self, e: WaterReactionExplosionEvent) {
        self.water_reaction_explosions.push(e);
    }
}
