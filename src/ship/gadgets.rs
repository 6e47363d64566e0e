//! Gadgets (spec §4.9, component C9): RC/Impact/Timer/AntiMatter/
//! FireExtinguishing/PhysicsProbe state machines, encoded as a tagged
//! variant per design note 9 rather than dynamic dispatch — there is no
//! open extensibility requirement, and an explicit per-kind secondary index
//! replaces the source's `dynamic_cast` gadget-kind enumeration.

use crate::events::{
    AntiMatterEvent, AntiMatterPhase, BombExplosionEvent, BombPlacedEvent, BombRemovedEvent, EventSink, GadgetType, PhysicsProbeReadingEvent, RcPingEvent,
    TimerDefusedEvent, TimerFuseEvent,
};
use crate::ids::{GadgetId, PointIndex};
use crate::mesh::point::{CombustionState, PointStore};
use crate::params::GameParameters;
use glam::Vec2;
use rand::Rng;
use std::time::Duration;

const NEIGHBORHOOD_RADIUS_SQUARED: f32 = 4.0;

const RC_PING_OFF_INTERVAL: Duration = Duration::from_millis(750);
const RC_PING_ON_INTERVAL: Duration = Duration::from_millis(250);
const DETONATION_LEAD_IN: Duration = Duration::from_millis(1500);
/// RC bomb re-arm cadence during detonation lead-in (spec §8 S4, grounded
/// in the original's `FastPingInterval`): the bomb keeps pinging every
/// 100ms right up to the absolute explosion deadline set once at
/// `detonate_rc_bombs` time.
const FAST_PING_INTERVAL: Duration = Duration::from_millis(100);
const EXPLOSION_STEP: Duration = Duration::from_millis(200);
const EXPLOSION_STEP_COUNT: u32 = 8;

const TIMER_FUSE_STEP: Duration = Duration::from_millis(800);
const TIMER_FUSE_STEP_COUNT: u32 = 10;
const TIMER_DEFUSE_DURATION: Duration = Duration::from_millis(500);

const ANTIMATTER_PRE_IMPLODING: Duration = Duration::from_millis(600);
const ANTIMATTER_PAUSE: Duration = Duration::from_secs(2);
const ANTIMATTER_IMPLODING: Duration = Duration::from_secs(16);
const ANTIMATTER_PRE_EXPLODING: Duration = Duration::from_secs(1);

const FIRE_EXT_STEP: Duration = Duration::from_millis(150);
const FIRE_EXT_STEP_COUNT: u32 = 8;

const PROBE_PING_INTERVAL: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RcBombState {
    IdlePingOff,
    IdlePingOn,
    /// Re-pings every [`FAST_PING_INTERVAL`] until wall-clock time reaches
    /// `explode_at`, set once when detonation starts.
    DetonationLeadIn { explode_at: Duration },
    Exploding(u32),
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactBombState {
    Idle,
    TriggeringExplosion,
    Exploding(u32),
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerBombState {
    SlowFuseBurning(u32),
    FastFuseBurning(u32),
    DetonationLeadIn,
    Exploding(u32),
    Defusing,
    Defused,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AntiMatterState {
    Contained,
    PreImploding,
    PreImplodingToImplodingPause,
    Imploding,
    PreExploding,
    Exploding(u32),
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireExtinguishingState {
    Idle,
    Exploding(u32),
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsProbeState {
    PingOff,
    PingOn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GadgetKind {
    RcBomb(RcBombState),
    ImpactBomb(ImpactBombState),
    TimerBomb(TimerBombState),
    AntiMatterBomb(AntiMatterState),
    FireExtinguishingBomb(FireExtinguishingState),
    PhysicsProbe(PhysicsProbeState),
}

impl GadgetKind {
    fn event_type(&self) -> GadgetType {
        match self {
            GadgetKind::RcBomb(_) => GadgetType::RcBomb,
            GadgetKind::ImpactBomb(_) => GadgetType::ImpactBomb,
            GadgetKind::TimerBomb(_) => GadgetType::TimerBomb,
            GadgetKind::AntiMatterBomb(_) => GadgetType::AntiMatterBomb,
            GadgetKind::FireExtinguishingBomb(_) => GadgetType::FireExtinguishingBomb,
            GadgetKind::PhysicsProbe(_) => GadgetType::PhysicsProbe,
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(
            self,
            GadgetKind::RcBomb(RcBombState::Expired)
                | GadgetKind::ImpactBomb(ImpactBombState::Expired)
                | GadgetKind::TimerBomb(TimerBombState::Expired | TimerBombState::Defused)
                | GadgetKind::AntiMatterBomb(AntiMatterState::Expired)
                | GadgetKind::FireExtinguishingBomb(FireExtinguishingState::Expired)
        )
    }
}

#[derive(Debug, Clone)]
pub struct Gadget {
    pub id: GadgetId,
    pub point: PointIndex,
    pub kind: GadgetKind,
    next_transition: Duration,
}

/// Container for every live gadget, with per-kind secondary indices
/// replacing the source's `dynamic_cast` enumeration (design note 9).
pub struct GadgetStore {
    gadgets: Vec<Option<Gadget>>,
    rc_bombs: Vec<GadgetId>,
    next_id: u32,
}

impl GadgetStore {
    pub fn new() -> Self {
        Self { gadgets: Vec::new(), rc_bombs: Vec::new(), next_id: 0 }
    }

    pub fn place(&mut self, point: PointIndex, kind: GadgetKind, now: Duration, sink: &mut dyn EventSink) -> GadgetId {
        let id = GadgetId(self.next_id);
        self.next_id += 1;
        let next_transition = now + Self::interval_for(kind);
        let gadget = Gadget { id, point, kind, next_transition };
        if let GadgetKind::RcBomb(_) = kind {
            self.rc_bombs.push(id);
        }
        if id.index() >= self.gadgets.len() {
            self.gadgets.resize(id.index() + 1, None);
        }
        self.gadgets[id.index()] = Some(gadget);
        sink.on_bomb_placed(BombPlacedEvent { gadget: id, kind: kind.event_type() });
        id
    }

    pub fn get(&self, id: GadgetId) -> Option<&Gadget> {
        self.gadgets.get(id.index()).and_then(|g| g.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Gadget> {
        self.gadgets.iter().flatten()
    }

    pub fn remove(&mut self, id: GadgetId, sink: &mut dyn EventSink) {
        if let Some(gadget) = self.gadgets.get_mut(id.index()).and_then(|g| g.take()) {
            let exploding = matches!(
                gadget.kind,
                GadgetKind::RcBomb(RcBombState::Exploding(_))
                    | GadgetKind::ImpactBomb(ImpactBombState::Exploding(_))
                    | GadgetKind::TimerBomb(TimerBombState::Exploding(_))
                    | GadgetKind::AntiMatterBomb(AntiMatterState::Exploding(_))
                    | GadgetKind::FireExtinguishingBomb(FireExtinguishingState::Exploding(_))
            );
            if !exploding {
                sink.on_bomb_removed(BombRemovedEvent { gadget: id, kind: gadget.kind.event_type() });
            }
            self.rc_bombs.retain(|&g| g != id);
        }
    }

    /// Starts detonation lead-in for every idling RC bomb (tool interface,
    /// spec §4.13 "detonate RC bombs").
    pub fn detonate_rc_bombs(&mut self, now: Duration) {
        let ids = self.rc_bombs.clone();
        for id in ids {
            if let Some(gadget) = self.gadgets[id.index()].as_mut() {
                if matches!(gadget.kind, GadgetKind::RcBomb(RcBombState::IdlePingOff | RcBombState::IdlePingOn)) {
                    gadget.kind = GadgetKind::RcBomb(RcBombState::DetonationLeadIn { explode_at: now + DETONATION_LEAD_IN });
                    gadget.next_transition = now + FAST_PING_INTERVAL;
                }
            }
        }
    }

    pub fn on_point_detached(&mut self, point: PointIndex, points: &PointStore) {
        let position = points.position[point.index()];
        self.notify_neighborhood(position, points);
    }

    pub fn on_spring_destroyed(&mut self, a: PointIndex, b: PointIndex, points: &PointStore) {
        let midpoint = (points.position[a.index()] + points.position[b.index()]) * 0.5;
        self.notify_neighborhood(midpoint, points);
    }

    fn notify_neighborhood(&mut self, position: Vec2, points: &PointStore) {
        for gadget in self.gadgets.iter_mut().flatten() {
            let dist_sq = (points.position[gadget.point.index()] - position).length_squared();
            if dist_sq > NEIGHBORHOOD_RADIUS_SQUARED {
                continue;
            }
            if let GadgetKind::ImpactBomb(ImpactBombState::Idle) = gadget.kind {
                gadget.kind = GadgetKind::ImpactBomb(ImpactBombState::TriggeringExplosion);
                gadget.next_transition = Duration::ZERO;
            }
        }
    }

    /// Advances every live gadget whose `next_transition` has elapsed,
    /// removing terminal ones and emitting explosion/ping/fuse events.
    pub fn update(&mut self, points: &mut PointStore, params: &GameParameters, now: Duration, rng: &mut impl Rng, sink: &mut dyn EventSink) {
        let ids: Vec<GadgetId> = self.gadgets.iter().flatten().map(|g| g.id).collect();

        for id in ids {
            let Some(gadget) = self.gadgets[id.index()].clone() else { continue };
            if now < gadget.next_transition {
                continue;
            }
            let is_underwater = points.position[gadget.point.index()].y < 0.0;
            let next_kind = Self::step(id, gadget.kind, gadget.point, points, params, is_underwater, now, rng, sink);
            let next_transition = now + Self::interval_for(next_kind);

            if next_kind.is_terminal() {
                self.gadgets[id.index()] = None;
                self.rc_bombs.retain(|&g| g != id);
            } else if let Some(g) = self.gadgets[id.index()].as_mut() {
                g.kind = next_kind;
                g.next_transition = next_transition;
            }
        }
    }

    fn interval_for(kind: GadgetKind) -> Duration {
        match kind {
            GadgetKind::RcBomb(RcBombState::IdlePingOff) => RC_PING_OFF_INTERVAL,
            GadgetKind::RcBomb(RcBombState::IdlePingOn) => RC_PING_ON_INTERVAL,
            GadgetKind::RcBomb(RcBombState::DetonationLeadIn { .. }) => FAST_PING_INTERVAL,
            GadgetKind::RcBomb(RcBombState::Exploding(_)) => EXPLOSION_STEP,
            GadgetKind::ImpactBomb(ImpactBombState::TriggeringExplosion) => Duration::ZERO,
            GadgetKind::ImpactBomb(ImpactBombState::Exploding(_)) => EXPLOSION_STEP,
            GadgetKind::TimerBomb(TimerBombState::SlowFuseBurning(_) | TimerBombState::FastFuseBurning(_)) => TIMER_FUSE_STEP,
            GadgetKind::TimerBomb(TimerBombState::DetonationLeadIn) => DETONATION_LEAD_IN,
            GadgetKind::TimerBomb(TimerBombState::Exploding(_)) => EXPLOSION_STEP,
            GadgetKind::TimerBomb(TimerBombState::Defusing) => TIMER_DEFUSE_DURATION,
            GadgetKind::AntiMatterBomb(AntiMatterState::PreImploding) => ANTIMATTER_PRE_IMPLODING,
            GadgetKind::AntiMatterBomb(AntiMatterState::PreImplodingToImplodingPause) => ANTIMATTER_PAUSE,
            GadgetKind::AntiMatterBomb(AntiMatterState::Imploding) => ANTIMATTER_IMPLODING,
            GadgetKind::AntiMatterBomb(AntiMatterState::PreExploding) => ANTIMATTER_PRE_EXPLODING,
            GadgetKind::AntiMatterBomb(AntiMatterState::Exploding(_)) => EXPLOSION_STEP,
            GadgetKind::FireExtinguishingBomb(FireExtinguishingState::Exploding(_)) => FIRE_EXT_STEP,
            GadgetKind::PhysicsProbe(_) => PROBE_PING_INTERVAL,
            _ => Duration::from_millis(100),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn step(
        id: GadgetId,
        kind: GadgetKind,
        point: PointIndex,
        points: &mut PointStore,
        params: &GameParameters,
        is_underwater: bool,
        now: Duration,
        rng: &mut impl Rng,
        sink: &mut dyn EventSink,
    ) -> GadgetKind {
        match kind {
            GadgetKind::RcBomb(state) => GadgetKind::RcBomb(step_rc_bomb(state, point, points, params, is_underwater, now, rng, sink)),
            GadgetKind::ImpactBomb(state) => GadgetKind::ImpactBomb(step_impact_bomb(state, point, points, params, is_underwater, rng, sink)),
            GadgetKind::TimerBomb(state) => GadgetKind::TimerBomb(step_timer_bomb(id, state, point, points, params, is_underwater, rng, sink)),
            GadgetKind::AntiMatterBomb(state) => GadgetKind::AntiMatterBomb(step_anti_matter(id, state, sink)),
            GadgetKind::FireExtinguishingBomb(state) => GadgetKind::FireExtinguishingBomb(step_fire_ext(state, point, points, is_underwater, sink)),
            GadgetKind::PhysicsProbe(state) => GadgetKind::PhysicsProbe(step_probe(state, point, points, sink)),
        }
    }
}

impl Default for GadgetStore {
    fn default() -> Self {
        Self::new()
    }
}

fn detonate(points: &mut PointStore, point: PointIndex, blast_radius: f32, strength: f32, rng: &mut impl Rng) {
    let center = points.position[point.index()];
    super::force_fields::apply(
        &super::force_fields::ForceField::Blast { center, blast_radius, strength, detach_closest: false, min_debris_v: 1.0, max_debris_v: 1.0 },
        points,
        rng,
    );
}

#[allow(clippy::too_many_arguments)]
fn step_rc_bomb(state: RcBombState, point: PointIndex, points: &mut PointStore, params: &GameParameters, is_underwater: bool, now: Duration, rng: &mut impl Rng, sink: &mut dyn EventSink) -> RcBombState {
    match state {
        RcBombState::IdlePingOff => {
            sink.on_rc_ping(RcPingEvent { is_underwater, multiplier: 1 });
            RcBombState::IdlePingOn
        }
        RcBombState::IdlePingOn => RcBombState::IdlePingOff,
        RcBombState::DetonationLeadIn { explode_at } => {
            if now >= explode_at {
                RcBombState::Exploding(0)
            } else {
                sink.on_rc_ping(RcPingEvent { is_underwater, multiplier: 1 });
                RcBombState::DetonationLeadIn { explode_at }
            }
        }
        RcBombState::Exploding(step) => {
            if step == 0 {
                let radius = params.effective_blast_radius();
                let strength = 55.0 * 50_000.0 * params.effective_blast_force_adjustment();
                detonate(points, point, radius, strength, rng);
                sink.on_bomb_explosion(BombExplosionEvent { kind: GadgetType::RcBomb, is_underwater, multiplier: 1 });
            }
            if step + 1 >= EXPLOSION_STEP_COUNT {
                RcBombState::Expired
            } else {
                RcBombState::Exploding(step + 1)
            }
        }
        RcBombState::Expired => RcBombState::Expired,
    }
}

fn step_impact_bomb(state: ImpactBombState, point: PointIndex, points: &mut PointStore, params: &GameParameters, is_underwater: bool, rng: &mut impl Rng, sink: &mut dyn EventSink) -> ImpactBombState {
    match state {
        ImpactBombState::Idle => ImpactBombState::Idle,
        ImpactBombState::TriggeringExplosion => {
            let radius = params.effective_blast_radius();
            let strength = 40.0 * 50_000.0 * params.effective_blast_force_adjustment();
            detonate(points, point, radius, strength, rng);
            sink.on_bomb_explosion(BombExplosionEvent { kind: GadgetType::ImpactBomb, is_underwater, multiplier: 1 });
            ImpactBombState::Exploding(0)
        }
        ImpactBombState::Exploding(step) => {
            if step + 1 >= EXPLOSION_STEP_COUNT {
                ImpactBombState::Expired
            } else {
                ImpactBombState::Exploding(step + 1)
            }
        }
        ImpactBombState::Expired => ImpactBombState::Expired,
    }
}

fn step_timer_bomb(
    id: GadgetId,
    state: TimerBombState,
    point: PointIndex,
    points: &mut PointStore,
    params: &GameParameters,
    is_underwater: bool,
    rng: &mut impl Rng,
    sink: &mut dyn EventSink,
) -> TimerBombState {
    if is_underwater && matches!(state, TimerBombState::SlowFuseBurning(_) | TimerBombState::FastFuseBurning(_)) {
        return TimerBombState::Defusing;
    }

    match state {
        TimerBombState::SlowFuseBurning(step) => {
            sink.on_timer_fuse(TimerFuseEvent { gadget: id, fraction: step as f32 / TIMER_FUSE_STEP_COUNT as f32, is_fast: false });
            if step + 1 >= TIMER_FUSE_STEP_COUNT {
                TimerBombState::FastFuseBurning(0)
            } else {
                TimerBombState::SlowFuseBurning(step + 1)
            }
        }
        TimerBombState::FastFuseBurning(step) => {
            sink.on_timer_fuse(TimerFuseEvent { gadget: id, fraction: step as f32 / TIMER_FUSE_STEP_COUNT as f32, is_fast: true });
            if step + 1 >= TIMER_FUSE_STEP_COUNT {
                TimerBombState::DetonationLeadIn
            } else {
                TimerBombState::FastFuseBurning(step + 1)
            }
        }
        TimerBombState::DetonationLeadIn => TimerBombState::Exploding(0),
        TimerBombState::Exploding(step) => {
            if step == 0 {
                let radius = params.effective_blast_radius();
                let strength = 80.0 * 50_000.0 * params.effective_blast_force_adjustment();
                detonate(points, point, radius, strength, rng);
                sink.on_bomb_explosion(BombExplosionEvent { kind: GadgetType::TimerBomb, is_underwater, multiplier: 1 });
            }
            if step + 1 >= EXPLOSION_STEP_COUNT {
                TimerBombState::Expired
            } else {
                TimerBombState::Exploding(step + 1)
            }
        }
        TimerBombState::Defusing => {
            sink.on_timer_defused(TimerDefusedEvent { gadget: id });
            TimerBombState::Defused
        }
        TimerBombState::Defused => TimerBombState::Defused,
        TimerBombState::Expired => TimerBombState::Expired,
    }
}

fn step_anti_matter(id: GadgetId, state: AntiMatterState, sink: &mut dyn EventSink) -> AntiMatterState {
    let next = match state {
        AntiMatterState::Contained => AntiMatterState::PreImploding,
        AntiMatterState::PreImploding => AntiMatterState::PreImplodingToImplodingPause,
        AntiMatterState::PreImplodingToImplodingPause => AntiMatterState::Imploding,
        AntiMatterState::Imploding => AntiMatterState::PreExploding,
        AntiMatterState::PreExploding => AntiMatterState::Exploding(0),
        AntiMatterState::Exploding(step) => {
            if step + 1 >= EXPLOSION_STEP_COUNT {
                AntiMatterState::Expired
            } else {
                AntiMatterState::Exploding(step + 1)
            }
        }
        AntiMatterState::Expired => AntiMatterState::Expired,
    };
    let phase = match next {
        AntiMatterState::PreImploding | AntiMatterState::PreImplodingToImplodingPause => Some(AntiMatterPhase::PreImploding),
        AntiMatterState::Imploding => Some(AntiMatterPhase::Imploding),
        _ => None,
    };
    if let Some(phase) = phase {
        sink.on_anti_matter(AntiMatterEvent { gadget: id, phase });
    }
    next
}

fn step_fire_ext(state: FireExtinguishingState, point: PointIndex, points: &mut PointStore, is_underwater: bool, sink: &mut dyn EventSink) -> FireExtinguishingState {
    match state {
        FireExtinguishingState::Idle => {
            if points.combustion[point.index()].state == CombustionState::Burning {
                sink.on_bomb_explosion(BombExplosionEvent { kind: GadgetType::FireExtinguishingBomb, is_underwater, multiplier: 1 });
                points.combustion[point.index()].state = CombustionState::ExtinguishingConsumed;
                FireExtinguishingState::Exploding(0)
            } else {
                FireExtinguishingState::Idle
            }
        }
        FireExtinguishingState::Exploding(step) => {
            if step + 1 >= FIRE_EXT_STEP_COUNT {
                FireExtinguishingState::Expired
            } else {
                FireExtinguishingState::Exploding(step + 1)
            }
        }
        FireExtinguishingState::Expired => FireExtinguishingState::Expired,
    }
}

fn step_probe(state: PhysicsProbeState, point: PointIndex, points: &PointStore, sink: &mut dyn EventSink) -> PhysicsProbeState {
    let next = match state {
        PhysicsProbeState::PingOff => PhysicsProbeState::PingOn,
        PhysicsProbeState::PingOn => PhysicsProbeState::PingOff,
    };
    if next == PhysicsProbeState::PingOn {
        sink.on_physics_probe_reading(PhysicsProbeReadingEvent {
            velocity: points.velocity[point.index()],
            temperature: points.temperature[point.index()],
            ocean_depth: -points.position[point.index()].y,
            internal_pressure: points.pressure[point.index()],
        });
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingEventSink;
    use crate::materials::MaterialId;

    #[test]
    fn removing_idle_rc_bomb_emits_removed_not_explosion() {
        let mut store = GadgetStore::new();
        let mut points = PointStore::new(1, 0);
        let p = points.add_raw(MaterialId::default(), Vec2::ZERO, 1.0, 1.0);
        let mut sink = RecordingEventSink::default();
        let id = store.place(p, GadgetKind::RcBomb(RcBombState::IdlePingOn), Duration::ZERO, &mut sink);
        store.remove(id, &mut sink);
        assert_eq!(sink.bomb_removed.len(), 1);
        assert_eq!(sink.bomb_explosions.len(), 0);
    }

    #[test]
    fn timer_bomb_defuses_on_submersion() {
        let mut points = PointStore::new(1, 0);
        let p = points.add_raw(MaterialId::default(), Vec2::new(0.0, -5.0), 1.0, 1.0);
        let params = GameParameters::default();
        let mut sink = RecordingEventSink::default();
        let mut rng = rand::thread_rng();
        let mut store = GadgetStore::new();
        let id = store.place(p, GadgetKind::TimerBomb(TimerBombState::SlowFuseBurning(0)), Duration::ZERO, &mut sink);
        store.update(&mut points, &params, Duration::from_secs(1), &mut rng, &mut sink);
        let gadget = store.get(id).expect("defusing gadget is not terminal yet");
        assert!(matches!(gadget.kind, GadgetKind::TimerBomb(TimerBombState::Defusing)));
    }

    #[test]
    fn rc_bomb_detonation_expires_after_steps() {
        let mut points = PointStore::new(1, 0);
        let p = points.add_raw(MaterialId::default(), Vec2::ZERO, 1.0, 1.0);
        let params = GameParameters::default();
        let mut sink = RecordingEventSink::default();
        let mut rng = rand::thread_rng();
        let mut store = GadgetStore::new();
        let id = store.place(p, GadgetKind::RcBomb(RcBombState::DetonationLeadIn { explode_at: DETONATION_LEAD_IN }), Duration::ZERO, &mut sink);

        let mut now = Duration::ZERO;
        for _ in 0..(EXPLOSION_STEP_COUNT + 2) {
            now += DETONATION_LEAD_IN.max(EXPLOSION_STEP) + Duration::from_millis(1);
            store.update(&mut points, &params, now, &mut rng, &mut sink);
            if store.get(id).is_none() {
                break;
            }
        }
        assert!(store.get(id).is_none());
        assert_eq!(sink.bomb_explosions.len(), 1);
    }

    /// RC bomb re-ping during detonation lead-in (spec §8 S4): detonating an
    /// idle RC bomb must keep pinging every `FAST_PING_INTERVAL` right up
    /// to the 1500ms explosion deadline, not jump straight to exploding.
    #[test]
    fn rc_bomb_re_pings_during_detonation_lead_in() {
        let mut points = PointStore::new(1, 0);
        let p = points.add_raw(MaterialId::default(), Vec2::ZERO, 1.0, 1.0);
        let params = GameParameters::default();
        let mut sink = RecordingEventSink::default();
        let mut rng = rand::thread_rng();
        let mut store = GadgetStore::new();
        let id = store.place(p, GadgetKind::RcBomb(RcBombState::IdlePingOff), Duration::ZERO, &mut sink);

        store.detonate_rc_bombs(Duration::ZERO);
        assert!(matches!(store.get(id).unwrap().kind, GadgetKind::RcBomb(RcBombState::DetonationLeadIn { .. })));

        let mut now = Duration::ZERO;
        for _ in 0..20 {
            now += FAST_PING_INTERVAL;
            store.update(&mut points, &params, now, &mut rng, &mut sink);
        }

        assert!(sink.rc_pings.len() >= 10, "expected repeated pings during lead-in, got {}", sink.rc_pings.len());
        assert_eq!(sink.bomb_explosions.len(), 1, "expected exactly one explosion once the deadline passes");
    }
}
