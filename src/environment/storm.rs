//! Storm (spec §4.12, component C12): a progress counter from 0 to 1 over
//! `StormDuration`, driving cloud count/darkening, ambient darkening, rain
//! density and the wind gradient consumed by [`super::wind::Wind`] and
//! [`super::clouds::CloudField`].

use crate::params::GameParameters;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StormPhase {
    Idle,
    RampingUp,
    Peak,
    RampingDown,
}

pub struct Storm {
    phase: StormPhase,
    progress: f32,
}

/// Snapshot of everything a storm drives in other components this tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct StormOutput {
    pub cloud_count_factor: f32,
    pub cloud_darkening: f32,
    pub ambient_darkening: f32,
    pub rain_density: f32,
    pub wind_gradient: f32,
}

impl Storm {
    pub fn new() -> Self {
        Self { phase: StormPhase::Idle, progress: 0.0 }
    }

    pub fn is_active(&self) -> bool {
        self.phase != StormPhase::Idle
    }

    pub fn trigger(&mut self) {
        if !self.is_active() {
            self.phase = StormPhase::RampingUp;
            self.progress = 0.0;
        }
    }

    /// Advances the storm by `dt`, returning the current output. The
    /// cloud/ambient ramps use the asymmetric windows from spec §4.12:
    /// cloud darkening over `[0, 0.125]`, ambient darkening over
    /// `[0.1, 0.175]`, both inverted on the way down.
    pub fn update(&mut self, dt: f32, params: &GameParameters) -> StormOutput {
        if self.phase == StormPhase::Idle {
            return StormOutput::default();
        }

        let duration = params.storm_duration_seconds.max(1.0);
        self.progress += dt / duration;

        if self.progress >= 1.0 {
            self.progress = 0.0;
            self.phase = StormPhase::Idle;
            return StormOutput::default();
        }

        let ramp = |window_start: f32, window_end: f32, p: f32| -> f32 {
            if p < window_start {
                0.0
            } else if p < window_end {
                (p - window_start) / (window_end - window_start)
            } else if p < 1.0 - window_end {
                1.0
            } else if p < 1.0 - window_start {
                1.0 - (p - (1.0 - window_end)) / (window_end - window_start)
            } else {
                0.0
            }
        };

        self.phase = if self.progress < 0.5 { StormPhase::RampingUp } else if self.progress < 0.9 { StormPhase::Peak } else { StormPhase::RampingDown };

        let cloud_ramp = ramp(0.0, 0.125, self.progress);
        let ambient_ramp = ramp(0.1, 0.175, self.progress);

        StormOutput {
            cloud_count_factor: cloud_ramp,
            cloud_darkening: cloud_ramp,
            ambient_darkening: ambient_ramp,
            rain_density: cloud_ramp,
            wind_gradient: cloud_ramp * params.wind_speed_base,
        }
    }
}

impl Default for Storm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_storm_produces_no_output() {
        let mut storm = Storm::new();
        let out = storm.update(1.0, &GameParameters::default());
        assert_eq!(out.cloud_darkening, 0.0);
    }

    #[test]
    fn triggered_storm_ramps_and_ends() {
        let mut storm = Storm::new();
        let params = GameParameters::default();
        storm.trigger();
        let mid = storm.update(params.storm_duration_seconds * 0.5, &params);
        assert!(mid.ambient_darkening > 0.0);

        let out = storm.update(params.storm_duration_seconds, &params);
        assert!(!storm.is_active());
        assert_eq!(out.cloud_darkening, 0.0);
    }
}
