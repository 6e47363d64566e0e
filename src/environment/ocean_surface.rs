//! Ocean surface (spec §4.10, component C10): a 1-D shallow-water height and
//! velocity field advected semi-Lagrangian each tick, plus two basal swell
//! waves and a wind-ripple term layered on top for the sample the renderer
//! and the floating-point queries (`height_at`) actually see.

const SAMPLES: usize = 512;
const PADDING: usize = 2;
const FIELD_LEN: usize = SAMPLES + 2 * PADDING;
const WORLD_WIDTH: f32 = 5000.0;
const DX: f32 = WORLD_WIDTH / SAMPLES as f32;

/// Drives one sample toward a target height and back, used by the "swirl the
/// water with your cursor" interaction (`adjust_to`).
#[derive(Debug, Clone, Copy)]
struct WaveDisturbance {
    cell: usize,
    base_height: f32,
    target_height: f32,
    start_time: f32,
    duration: f32,
    releasing: bool,
}

pub struct OceanSurface {
    height: Vec<f32>,
    velocity: Vec<f32>,
    height_next: Vec<f32>,
    velocity_next: Vec<f32>,
    disturbance: Option<WaveDisturbance>,
}

impl OceanSurface {
    pub fn new() -> Self {
        Self {
            height: vec![0.0; FIELD_LEN],
            velocity: vec![0.0; FIELD_LEN],
            height_next: vec![0.0; FIELD_LEN],
            velocity_next: vec![0.0; FIELD_LEN],
            disturbance: None,
        }
    }

    fn cell_of(&self, x: f32) -> usize {
        let wrapped = x.rem_euclid(WORLD_WIDTH);
        PADDING + ((wrapped / DX) as usize).min(SAMPLES - 1)
    }

    /// Launches (or redirects) the external wave disturbance toward
    /// `target_height` at world x `x`, half-sine ramped over a duration
    /// fitted to the height delta (spec §4.10's `delayTicks(deltaH)`).
    pub fn adjust_to(&mut self, x: f32, target_height: f32, sim_time: f32) {
        let cell = self.cell_of(x);
        let base_height = self.height[cell];
        let delay_ticks = 15.0 + 40.0 * (target_height - base_height).abs().min(5.0);
        self.disturbance = Some(WaveDisturbance {
            cell,
            base_height,
            target_height,
            start_time: sim_time,
            duration: delay_ticks / 60.0,
            releasing: false,
        });
    }

    /// Releases the active disturbance, flipping it into a descending
    /// half-sine back to its pre-disturbance baseline.
    pub fn release(&mut self, sim_time: f32) {
        if let Some(d) = &mut self.disturbance {
            d.releasing = true;
            d.start_time = sim_time;
            std::mem::swap(&mut d.base_height, &mut d.target_height);
        }
    }

    fn apply_disturbance(&mut self, sim_time: f32) {
        let Some(d) = self.disturbance else { return };
        let t = ((sim_time - d.start_time) / d.duration).clamp(0.0, 1.0);
        let ramp = (t * std::f32::consts::FRAC_PI_2).sin();
        self.height[d.cell] = d.base_height + (d.target_height - d.base_height) * ramp;
        if t >= 1.0 && d.releasing {
            self.disturbance = None;
        }
    }

    /// One tick of the semi-Lagrangian shallow-water update (spec §4.10
    /// steps 2-6).
    pub fn update(&mut self, dt: f32, gravity: f32, sim_time: f32) {
        self.apply_disturbance(sim_time);

        for i in PADDING..FIELD_LEN - PADDING {
            let back = i as f32 - self.velocity[i] * dt / DX;
            self.height_next[i] = sample_linear(&self.height, back);
            self.velocity_next[i] = sample_linear(&self.velocity, back);
        }

        for i in PADDING..FIELD_LEN - PADDING {
            let dv = self.velocity_next[i + 1] - self.velocity_next[i];
            self.height_next[i] *= 1.0 - dv * dt / DX;
        }
        for i in PADDING + 1..FIELD_LEN - PADDING {
            let dh = self.height_next[i - 1] - self.height_next[i];
            self.velocity_next[i] += gravity * dh * dt / DX;
        }

        for p in 0..PADDING {
            self.height_next[p] = self.height_next[PADDING];
            self.height_next[FIELD_LEN - 1 - p] = self.height_next[FIELD_LEN - 1 - PADDING];
            self.velocity_next[p] = 0.0;
            self.velocity_next[FIELD_LEN - 1 - p] = 0.0;
        }

        std::mem::swap(&mut self.height, &mut self.height_next);
        std::mem::swap(&mut self.velocity, &mut self.velocity_next);
    }

    /// The visible surface height at world `x`: shallow-water contribution
    /// plus two basal swell waves plus a wind ripple, all fitted from
    /// `wind_speed_kmh` (spec §4.10 step 7).
    pub fn height_at(&self, x: f32, sim_time: f32, wind_speed_kmh: f32) -> f32 {
        let cell = self.cell_of(x);
        let swe = self.height[cell];
        swe + basal_wave(x, sim_time, wind_speed_kmh, 1.0) + basal_wave(x, sim_time, wind_speed_kmh, 0.6) + wind_ripple(x, sim_time, wind_speed_kmh)
    }
}

impl Default for OceanSurface {
    fn default() -> Self {
        Self::new()
    }
}

fn sample_linear(field: &[f32], position: f32) -> f32 {
    let clamped = position.clamp(0.0, field.len() as f32 - 1.001);
    let i0 = clamped as usize;
    let frac = clamped - i0 as f32;
    field[i0] * (1.0 - frac) + field[i0 + 1] * frac
}

/// Amplitude/wavelength/period fitted from wind speed (km/h) the way the
/// original basal-wave model derives swell shape from prevailing wind.
fn basal_wave(x: f32, t: f32, wind_speed_kmh: f32, scale: f32) -> f32 {
    let amplitude = (0.03 * wind_speed_kmh + 0.002 * wind_speed_kmh * wind_speed_kmh) * scale * 0.05;
    let wavelength = (60.0 * (amplitude.max(0.001)).sqrt()).max(5.0);
    let period = (wavelength / 9.0).max(1.0);
    amplitude * (std::f32::consts::TAU * (x / wavelength - t / period)).sin()
}

fn wind_ripple(x: f32, t: f32, wind_speed_kmh: f32) -> f32 {
    let amplitude = 0.01 * (wind_speed_kmh / 30.0).min(1.0);
    amplitude * (std::f32::consts::TAU * (x / 1.5 - t * 2.0)).sin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_surface_stays_flat_without_disturbance() {
        let mut surface = OceanSurface::new();
        for _ in 0..120 {
            surface.update(1.0 / 60.0, 9.81, 0.0);
        }
        assert!(surface.height.iter().all(|h| h.abs() < 1e-3));
    }

    #[test]
    fn disturbance_raises_then_settles_toward_target() {
        let mut surface = OceanSurface::new();
        surface.adjust_to(0.0, 2.0, 0.0);
        surface.update(1.0 / 60.0, 9.81, 1.0);
        let cell = surface.cell_of(0.0);
        assert!(surface.height[cell] > 0.0);
    }
}
