//! Electrical elements (spec §4.5, component C5): cables, generators and
//! lamps riding on mesh points, with connectivity determined once per tick
//! by a visit-sequence-number flood fill and a per-lamp flicker/wet-failure
//! state machine grounded in `ElectricalElements.cpp`.

use crate::ids::{ElectricalElementIndex, PointIndex, SpringIndex};
use crate::events::{EventSink, LightFlickerEvent};
use crate::materials::ElectricalElementType;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

const LAMP_WET_FAILURE_WATER_THRESHOLD: f32 = 0.1;
const FLICKER_START_INTERVAL: Duration = Duration::from_millis(100);
const FLICKER_A_INTERVAL: Duration = Duration::from_millis(150);
const FLICKER_B_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisitSequenceNumber(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LampState {
    Initial,
    LightOn,
    FlickerA,
    FlickerB,
    LightOff,
}

#[derive(Debug, Clone)]
pub struct Lamp {
    pub state: LampState,
    pub is_self_powered: bool,
    pub wet_failure_rate_per_minute: f32,
    pub flicker_counter: u32,
    pub next_state_transition: Duration,
    pub next_wet_failure_check: Duration,
}

impl Lamp {
    fn new(is_self_powered: bool, wet_failure_rate_per_minute: f32) -> Self {
        Self {
            state: LampState::Initial,
            is_self_powered,
            wet_failure_rate_per_minute,
            flicker_counter: 0,
            next_state_transition: Duration::ZERO,
            next_wet_failure_check: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ElectricalElement {
    pub point: PointIndex,
    pub element_type: ElectricalElementType,
    pub luminiscence: f32,
    pub light_spread: f32,
    pub available_current: f32,
    pub connectivity_visit_sequence: VisitSequenceNumber,
    pub lamp: Option<Lamp>,
    pub deleted: bool,
}

pub struct ElectricalElementStore {
    elements: Vec<ElectricalElement>,
    next_sequence: u64,
}

impl ElectricalElementStore {
    pub fn new() -> Self {
        Self { elements: Vec::new(), next_sequence: 0 }
    }

    /// Bumps and returns this tick's connectivity visit sequence (mirrors
    /// [`crate::mesh::frontier::FrontierTracker::next_visit_sequence`]'s
    /// "no need to clear a visited set" pattern, over its own counter since
    /// `VisitSequenceNumber` is a distinct type from the frontier tracker's).
    pub fn next_visit_sequence(&mut self) -> VisitSequenceNumber {
        self.next_sequence += 1;
        VisitSequenceNumber(self.next_sequence)
    }

    pub fn add(
        &mut self,
        point: PointIndex,
        element_type: ElectricalElementType,
        luminiscence: f32,
        light_spread: f32,
        is_self_powered: bool,
        wet_failure_rate_per_minute: f32,
    ) -> ElectricalElementIndex {
        let lamp = matches!(element_type, ElectricalElementType::Lamp)
            .then(|| Lamp::new(is_self_powered, wet_failure_rate_per_minute));
        self.elements.push(ElectricalElement {
            point,
            element_type,
            luminiscence,
            light_spread,
            available_current: 0.0,
            connectivity_visit_sequence: VisitSequenceNumber::default(),
            lamp,
            deleted: false,
        });
        ElectricalElementIndex::from(self.elements.len() - 1)
    }

    pub fn get(&self, index: ElectricalElementIndex) -> &ElectricalElement {
        &self.elements[index.index()]
    }

    pub fn destroy(&mut self, index: ElectricalElementIndex) {
        let e = &mut self.elements[index.index()];
        debug_assert!(!e.deleted);
        e.available_current = 0.0;
        e.deleted = true;
    }

    pub fn mark_connected(&mut self, index: ElectricalElementIndex, sequence: VisitSequenceNumber) {
        self.elements[index.index()].connectivity_visit_sequence = sequence;
    }

    /// Flood-fills connectivity from every live generator's point, out
    /// through non-deleted cable/generator points, stamping every reachable
    /// element's `connectivity_visit_sequence` with `sequence` (spec §4.5 —
    /// component C5's defining responsibility). A lamp is a terminal sink
    /// and doesn't propagate current onward; a bare hull point carrying no
    /// electrical element blocks propagation the same way (current only
    /// flows along wired points). Switches are treated as always-conducting
    /// since there's no per-switch open/closed state in the data model yet.
    pub fn update_connectivity(&mut self, point_springs: &[Vec<(SpringIndex, PointIndex)>], sequence: VisitSequenceNumber) {
        let mut point_to_element: HashMap<PointIndex, ElectricalElementIndex> = HashMap::new();
        for (i, e) in self.elements.iter().enumerate() {
            if !e.deleted {
                point_to_element.insert(e.point, ElectricalElementIndex::from(i));
            }
        }

        let mut visited: HashSet<PointIndex> = HashSet::new();
        let mut stack = Vec::new();
        let generators: Vec<(ElectricalElementIndex, PointIndex)> = self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.deleted && e.element_type == ElectricalElementType::Generator)
            .map(|(i, e)| (ElectricalElementIndex::from(i), e.point))
            .collect();
        for (idx, point) in generators {
            visited.insert(point);
            self.mark_connected(idx, sequence);
            stack.push(idx);
        }

        while let Some(idx) = stack.pop() {
            let point = self.elements[idx.index()].point;
            for &(_, other) in &point_springs[point.index()] {
                if !visited.insert(other) {
                    continue;
                }
                if let Some(&other_idx) = point_to_element.get(&other) {
                    self.mark_connected(other_idx, sequence);
                    if self.elements[other_idx.index()].element_type != ElectricalElementType::Lamp {
                        stack.push(other_idx);
                    }
                }
            }
        }
    }

    /// Runs every non-deleted lamp's flicker/failure state machine. Callers
    /// supply `is_wet` and `is_underwater` predicates (point water content
    /// and ocean depth lookups live in [`crate::mesh::point`] and
    /// [`crate::environment::ocean_surface`] respectively).
    pub fn update<R: Rng>(
        &mut self,
        wall_clock: Duration,
        current_connectivity_sequence: VisitSequenceNumber,
        is_wet: impl Fn(PointIndex) -> bool,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) {
        for i in 0..self.elements.len() {
            if self.elements[i].deleted || self.elements[i].lamp.is_none() {
                continue;
            }
            let index = ElectricalElementIndex::from(i);
            Self::run_lamp_state_machine(index, &mut self.elements[i], wall_clock, current_connectivity_sequence, &is_wet, rng, sink);
        }
    }

    fn run_lamp_state_machine<R: Rng>(
        index: ElectricalElementIndex,
        element: &mut ElectricalElement,
        wall_clock: Duration,
        current_sequence: VisitSequenceNumber,
        is_wet: &impl Fn(PointIndex) -> bool,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) {
        let point = element.point;
        let has_current = current_sequence == element.connectivity_visit_sequence;
        let lamp = element.lamp.as_mut().unwrap();

        match lamp.state {
            LampState::Initial => {
                if has_current || lamp.is_self_powered {
                    element.available_current = 1.0;
                    lamp.state = LampState::LightOn;
                    lamp.next_wet_failure_check = wall_clock + Duration::from_secs(1);
                } else {
                    element.available_current = 0.0;
                    lamp.state = LampState::LightOff;
                }
            }
            LampState::LightOn => {
                let lost_current = !has_current && !lamp.is_self_powered;
                let wet_failure = is_wet(point) && wall_clock > lamp.next_wet_failure_check && {
                    let chance = lamp.wet_failure_rate_per_minute / 60.0;
                    lamp.next_wet_failure_check = wall_clock + Duration::from_secs(1);
                    rng.gen::<f32>() < chance
                };
                if lost_current || wet_failure {
                    element.available_current = 0.0;
                    lamp.flicker_counter = 0;
                    lamp.next_state_transition = wall_clock + FLICKER_START_INTERVAL;
                    lamp.state = if rng.gen_bool(0.5) { LampState::FlickerA } else { LampState::FlickerB };
                }
            }
            LampState::FlickerA => {
                if (has_current || lamp.is_self_powered) && !is_wet(point) {
                    element.available_current = 1.0;
                    lamp.state = LampState::LightOn;
                } else if wall_clock > lamp.next_state_transition {
                    lamp.flicker_counter += 1;
                    match lamp.flicker_counter {
                        1 | 3 => {
                            element.available_current = 1.0;
                            sink.on_light_flicker(LightFlickerEvent { element: index, is_on: true });
                            lamp.next_state_transition = wall_clock + FLICKER_A_INTERVAL;
                        }
                        2 => {
                            element.available_current = 0.0;
                            lamp.next_state_transition = wall_clock + FLICKER_A_INTERVAL;
                        }
                        _ => {
                            element.available_current = 0.0;
                            lamp.state = LampState::LightOff;
                        }
                    }
                }
            }
            LampState::FlickerB => {
                if (has_current || lamp.is_self_powered) && !is_wet(point) {
                    element.available_current = 1.0;
                    lamp.state = LampState::LightOn;
                } else if wall_clock > lamp.next_state_transition {
                    lamp.flicker_counter += 1;
                    match lamp.flicker_counter {
                        1 | 5 => {
                            element.available_current = 1.0;
                            sink.on_light_flicker(LightFlickerEvent { element: index, is_on: true });
                            lamp.next_state_transition = wall_clock + FLICKER_B_INTERVAL;
                        }
                        2 | 4 => {
                            element.available_current = 0.0;
                            lamp.next_state_transition = wall_clock + FLICKER_B_INTERVAL;
                        }
                        3 => {
                            element.available_current = 1.0;
                            sink.on_light_flicker(LightFlickerEvent { element: index, is_on: true });
                            lamp.next_state_transition = wall_clock + 2 * FLICKER_B_INTERVAL;
                        }
                        _ => {
                            element.available_current = 0.0;
                            lamp.state = LampState::LightOff;
                        }
                    }
                }
            }
            LampState::LightOff => {
                if (has_current || lamp.is_self_powered) && !is_wet(point) {
                    element.available_current = 1.0;
                    sink.on_light_flicker(LightFlickerEvent { element: index, is_on: true });
                    lamp.state = LampState::LightOn;
                }
            }
        }
    }
}

impl Default for ElectricalElementStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Wetness threshold a lamp samples for its wet-failure check; exposed so
/// callers computing `is_wet` closures stay consistent with the FSM.
pub const fn wet_failure_threshold() -> f32 {
    LAMP_WET_FAILURE_WATER_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NullEventSink;
    use rand::rngs::mock::StepRng;

    #[test]
    fn self_powered_lamp_turns_on_without_connectivity() {
        let mut store = ElectricalElementStore::new();
        let idx = store.add(PointIndex(0), ElectricalElementType::Lamp, 1.0, 5.0, true, 0.0);
        let mut rng = StepRng::new(0, 1);
        store.update(
            Duration::ZERO,
            VisitSequenceNumber(1),
            |_| false,
            &mut rng,
            &mut NullEventSink,
        );
        assert_eq!(store.get(idx).available_current, 1.0);
    }

    #[test]
    fn unpowered_unconnected_lamp_goes_off() {
        let mut store = ElectricalElementStore::new();
        let idx = store.add(PointIndex(0), ElectricalElementType::Lamp, 1.0, 5.0, false, 0.0);
        let mut rng = StepRng::new(0, 1);
        store.update(
            Duration::ZERO,
            VisitSequenceNumber(1),
            |_| false,
            &mut rng,
            &mut NullEventSink,
        );
        assert_eq!(store.get(idx).available_current, 0.0);
        assert_eq!(store.get(idx).lamp.as_ref().unwrap().state, LampState::LightOff);
    }

    #[test]
    fn generator_flood_fill_connects_lamp_through_cable() {
        let mut store = ElectricalElementStore::new();
        let generator = store.add(PointIndex(0), ElectricalElementType::Generator, 0.0, 0.0, false, 0.0);
        let cable = store.add(PointIndex(1), ElectricalElementType::Cable, 0.0, 0.0, false, 0.0);
        let lamp = store.add(PointIndex(2), ElectricalElementType::Lamp, 1.0, 5.0, false, 0.0);

        // Generator -- cable -- lamp, wired via two live springs.
        let point_springs = vec![
            vec![(crate::ids::SpringIndex(0), PointIndex(1))],
            vec![(crate::ids::SpringIndex(0), PointIndex(0)), (crate::ids::SpringIndex(1), PointIndex(2))],
            vec![(crate::ids::SpringIndex(1), PointIndex(1))],
        ];

        let sequence = store.next_visit_sequence();
        store.update_connectivity(&point_springs, sequence);

        assert_eq!(store.get(generator).connectivity_visit_sequence, sequence);
        assert_eq!(store.get(cable).connectivity_visit_sequence, sequence);
        assert_eq!(store.get(lamp).connectivity_visit_sequence, sequence);

        let mut rng = StepRng::new(0, 1);
        store.update(Duration::ZERO, sequence, |_| false, &mut rng, &mut NullEventSink);
        assert_eq!(store.get(lamp).available_current, 1.0);
    }

    #[test]
    fn losing_connectivity_starts_a_flicker() {
        let mut store = ElectricalElementStore::new();
        let idx = store.add(PointIndex(0), ElectricalElementType::Lamp, 1.0, 5.0, false, 0.0);
        let mut rng = StepRng::new(0, 1);
        store.mark_connected(idx, VisitSequenceNumber(1));
        store.update(Duration::ZERO, VisitSequenceNumber(1), |_| false, &mut rng, &mut NullEventSink);
        assert_eq!(store.get(idx).available_current, 1.0);

        store.update(Duration::ZERO, VisitSequenceNumber(2), |_| false, &mut rng, &mut NullEventSink);
        let state = store.get(idx).lamp.as_ref().unwrap().state;
        assert!(matches!(state, LampState::FlickerA | LampState::FlickerB));
    }
}
