//! Wind (spec §4.12, component C12): a dwell-timer FSM cycling through base,
//! pre-gust, gust and post-gust phases, each holding a randomised duration.
//! During `Gusting` a Poisson process samples inner gust sub-bursts at rate
//! λ=1/s, checked every 250ms. The raw magnitude this produces is smoothed
//! through a length-4 running average before being turned into a velocity.

use crate::math::RunningAverage;
use crate::params::GameParameters;
use glam::Vec2;
use rand::Rng;
use std::time::Duration;

const GUST_SAMPLE_INTERVAL: Duration = Duration::from_millis(250);
const GUST_POISSON_RATE_PER_SEC: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindState {
    Initial,
    EnterBase1,
    Base1,
    EnterPreGusting,
    PreGusting,
    EnterGusting,
    Gusting,
    EnterPostGusting,
    PostGusting,
    EnterBase2,
    Base2,
    EnterZero,
    Zero,
}

pub struct Wind {
    state: WindState,
    next_transition: Duration,
    next_gust_sample: Duration,
    base_magnitude: f32,
    target_magnitude: f32,
    raw_magnitude: f32,
    average: RunningAverage<4>,
    direction: Vec2,
}

impl Wind {
    pub fn new(direction: Vec2) -> Self {
        Self {
            state: WindState::Initial,
            next_transition: Duration::ZERO,
            next_gust_sample: Duration::ZERO,
            base_magnitude: 0.0,
            target_magnitude: 0.0,
            raw_magnitude: 0.0,
            average: RunningAverage::default(),
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn current_speed_kmh(&self) -> f32 {
        self.average.average().abs() * 3.6
    }

    pub fn velocity(&self) -> Vec2 {
        self.direction * self.average.average()
    }

    /// Advances the FSM to `wall_clock`, sampling dwell durations and gust
    /// bursts as needed. `storm_gradient` is added to the base magnitude
    /// while a storm is active (spec §4.12's "wind gradient" storm output).
    pub fn update(&mut self, wall_clock: Duration, params: &GameParameters, storm_gradient: f32, rng: &mut impl Rng) {
        if !params.do_modulate_wind {
            self.average.fill(params.wind_speed_base + storm_gradient);
            return;
        }

        if wall_clock >= self.next_transition {
            self.advance_state(wall_clock, params, rng);
        }

        self.raw_magnitude = match self.state {
            WindState::Base1 | WindState::Base2 => self.base_magnitude,
            WindState::PreGusting => self.base_magnitude + (self.target_magnitude - self.base_magnitude) * 0.3,
            WindState::Gusting => self.sample_gust(wall_clock, rng),
            WindState::PostGusting => self.base_magnitude + (self.target_magnitude - self.base_magnitude) * 0.15,
            WindState::Zero => 0.0,
            _ => self.raw_magnitude,
        } + storm_gradient;

        self.average.update(self.raw_magnitude);
    }

    fn sample_gust(&mut self, wall_clock: Duration, rng: &mut impl Rng) -> f32 {
        if wall_clock >= self.next_gust_sample {
            self.next_gust_sample = wall_clock + GUST_SAMPLE_INTERVAL;
            let lambda = GUST_POISSON_RATE_PER_SEC * GUST_SAMPLE_INTERVAL.as_secs_f32();
            let burst_count = poisson_sample(lambda, rng);
            if burst_count > 0 {
                return self.target_magnitude * (1.0 + 0.1 * burst_count as f32).min(self.target_magnitude * 2.0);
            }
        }
        self.target_magnitude
    }

    fn advance_state(&mut self, wall_clock: Duration, params: &GameParameters, rng: &mut impl Rng) {
        let adj = params.wind_gust_frequency_adjustment.max(0.01);

        self.state = match self.state {
            WindState::Initial => WindState::EnterBase1,
            WindState::EnterBase1 => {
                self.base_magnitude = params.wind_speed_base;
                self.next_transition = wall_clock + dwell(5.0, 12.0, adj, rng);
                WindState::Base1
            }
            WindState::Base1 => {
                self.next_transition = wall_clock + dwell(1.0, 3.0, adj, rng);
                WindState::EnterPreGusting
            }
            WindState::EnterPreGusting => {
                self.target_magnitude = params.wind_speed_base * params.wind_speed_max_factor;
                self.next_transition = wall_clock + dwell(1.0, 2.0, adj, rng);
                WindState::PreGusting
            }
            WindState::PreGusting => {
                self.next_transition = wall_clock + dwell(0.5, 1.0, adj, rng);
                WindState::EnterGusting
            }
            WindState::EnterGusting => {
                self.next_gust_sample = wall_clock;
                self.next_transition = wall_clock + dwell(3.0, 8.0, adj, rng);
                WindState::Gusting
            }
            WindState::Gusting => {
                self.next_transition = wall_clock + dwell(0.5, 1.0, adj, rng);
                WindState::EnterPostGusting
            }
            WindState::EnterPostGusting => {
                self.next_transition = wall_clock + dwell(1.0, 2.0, adj, rng);
                WindState::PostGusting
            }
            WindState::PostGusting => {
                self.next_transition = wall_clock + dwell(1.0, 3.0, adj, rng);
                WindState::EnterBase2
            }
            WindState::EnterBase2 => {
                self.base_magnitude = params.wind_speed_base;
                self.next_transition = wall_clock + dwell(5.0, 12.0, adj, rng);
                WindState::Base2
            }
            WindState::Base2 => {
                self.next_transition = wall_clock + dwell(2.0, 5.0, adj, rng);
                WindState::EnterZero
            }
            WindState::EnterZero => {
                self.next_transition = wall_clock + dwell(1.0, 3.0, adj, rng);
                WindState::Zero
            }
            WindState::Zero => {
                self.next_transition = wall_clock + dwell(1.0, 2.0, adj, rng);
                WindState::EnterBase1
            }
        };
    }
}

fn dwell(lo: f32, hi: f32, adj: f32, rng: &mut impl Rng) -> Duration {
    Duration::from_secs_f32(rng.gen_range(lo..hi) / adj)
}

/// Small-lambda Poisson sample via Knuth's algorithm; lambda here is always
/// well under 1 (a 1/s rate over a 250ms window), so this terminates fast.
fn poisson_sample(lambda: f32, rng: &mut impl Rng) -> u32 {
    let l = (-lambda).exp();
    let mut k = 0;
    let mut p = 1.0;
    loop {
        p *= rng.gen::<f32>();
        if p <= l {
            return k;
        }
        k += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn disabled_modulation_holds_base_plus_gradient() {
        let mut wind = Wind::new(Vec2::X);
        let mut params = GameParameters::default();
        params.do_modulate_wind = false;
        params.wind_speed_base = 5.0;
        let mut rng = StepRng::new(0, 1);
        wind.update(Duration::ZERO, &params, 2.0, &mut rng);
        assert!((wind.average.average() - 7.0).abs() < 1e-6);
    }

    #[test]
    fn velocity_points_along_configured_direction() {
        let mut wind = Wind::new(Vec2::new(1.0, 0.0));
        let params = GameParameters::default();
        let mut rng = StepRng::new(0, 1);
        for i in 0..200 {
            wind.update(Duration::from_millis(i * 50), &params, 0.0, &mut rng);
        }
        let v = wind.velocity();
        assert!(v.y.abs() < 1e-6);
    }
}
