//! Ocean floor (spec §4.11, component C11): a 1-D height profile resampled
//! from a bump-map image plus a procedural detail layer, queried with O(1)
//! linear interpolation via precomputed adjacent-sample deltas.

use noise::{NoiseFn, Perlin};

const SAMPLES: usize = 5000;
const WORLD_WIDTH: f32 = 5000.0;

/// Fixed seed: the floor shape must be reproducible run to run (spec §7's
/// determinism requirement extends to environment generation, not just the
/// mesh).
const NOISE_SEED: u32 = 0x5EA_F100D;

pub struct OceanFloor {
    samples: Vec<f32>,
    deltas: Vec<f32>,
    bump_map: Vec<f32>,
    sea_depth: f32,
    bumpiness: f32,
    detail_amplification: f32,
    noise: Perlin,
}

impl OceanFloor {
    /// `bump_map` is the resampled "topmost non-zero pixel offset from the
    /// image centre line" column data (spec §4.11); an empty map yields a
    /// flat procedural floor.
    pub fn new(bump_map: Vec<f32>, sea_depth: f32, bumpiness: f32, detail_amplification: f32) -> Self {
        let bump_map = if bump_map.is_empty() { vec![0.0; SAMPLES] } else { resample(&bump_map, SAMPLES) };
        let mut floor = Self {
            samples: vec![0.0; SAMPLES],
            deltas: vec![0.0; SAMPLES],
            bump_map,
            sea_depth,
            bumpiness,
            detail_amplification,
            noise: Perlin::new(NOISE_SEED),
        };
        floor.recompute();
        floor
    }

    /// Recomputes every sample from three octaves of Perlin noise summed at
    /// increasing frequency and decreasing amplitude, scaled by `bumpiness`,
    /// plus the resampled bump map scaled by `detail_amplification` (spec
    /// §4.11). Call whenever `sea_depth`/`bumpiness`/`detail_amplification`
    /// change.
    pub fn recompute(&mut self) {
        for i in 0..SAMPLES {
            let x = i as f32 / SAMPLES as f32 * WORLD_WIDTH;
            let octave1 = self.noise.get([x as f64 * 0.005, 0.0]) as f32;
            let octave2 = self.noise.get([x as f64 * 0.013, 1.7]) as f32 * 0.5;
            let octave3 = self.noise.get([x as f64 * 0.037, 0.4]) as f32 * 0.25;
            self.samples[i] = -self.sea_depth + (octave1 + octave2 - octave3) * self.bumpiness + self.bump_map[i] * self.detail_amplification;
        }
        self.recompute_deltas();
    }

    fn recompute_deltas(&mut self) {
        for i in 0..SAMPLES {
            let next = self.samples[(i + 1) % SAMPLES];
            self.deltas[i] = next - self.samples[i];
        }
    }

    pub fn set_sea_depth(&mut self, sea_depth: f32) {
        self.sea_depth = sea_depth;
        self.recompute();
    }

    /// Linearly interpolates a line of floor samples between the two world
    /// points, overwriting the sample range they span, then refreshes the
    /// adjacent-sample deltas for that range (spec §4.11's `adjustTo`).
    pub fn adjust_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let (i1, i2) = (self.index_of(x1), self.index_of(x2));
        let (lo, hi, y_lo, y_hi) = if i1 <= i2 { (i1, i2, y1, y2) } else { (i2, i1, y2, y1) };
        let span = (hi - lo).max(1);
        for i in lo..=hi {
            let t = (i - lo) as f32 / span as f32;
            self.samples[i] = y_lo + (y_hi - y_lo) * t;
        }
        let delta_lo = lo.saturating_sub(1);
        let delta_hi = (hi + 1).min(SAMPLES - 1);
        for i in delta_lo..=delta_hi {
            let next = self.samples[(i + 1) % SAMPLES];
            self.deltas[i] = next - self.samples[i];
        }
    }

    fn index_of(&self, x: f32) -> usize {
        let wrapped = x.rem_euclid(WORLD_WIDTH);
        ((wrapped / WORLD_WIDTH) * SAMPLES as f32) as usize % SAMPLES
    }

    /// O(1) floor height lookup, wrapping negative x (spec §4.11).
    pub fn height_at(&self, x: f32) -> f32 {
        let wrapped = x.rem_euclid(WORLD_WIDTH);
        let scaled = wrapped / WORLD_WIDTH * SAMPLES as f32;
        let i = (scaled as usize).min(SAMPLES - 1);
        let frac = scaled - i as f32;
        self.samples[i] + self.deltas[i] * frac
    }

    /// Unit normal at `x`, derived from the adjacent-sample slope.
    pub fn normal_at(&self, x: f32) -> glam::Vec2 {
        let i = self.index_of(x);
        glam::Vec2::new(-self.deltas[i], 1.0).normalize_or_zero()
    }
}

fn resample(source: &[f32], target_len: usize) -> Vec<f32> {
    (0..target_len)
        .map(|i| {
            let t = i as f32 / target_len as f32 * source.len() as f32;
            let i0 = (t as usize).min(source.len() - 1);
            let i1 = (i0 + 1).min(source.len() - 1);
            let frac = t - i0 as f32;
            source[i0] * (1.0 - frac) + source[i1] * frac
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_bump_map_floor_stays_near_sea_depth() {
        let floor = OceanFloor::new(Vec::new(), 100.0, 0.0, 0.0);
        assert!((floor.height_at(0.0) - (-100.0)).abs() < 1.0);
    }

    #[test]
    fn adjust_to_overrides_sample_range() {
        let mut floor = OceanFloor::new(Vec::new(), 100.0, 0.0, 0.0);
        floor.adjust_to(0.0, -5.0, 10.0, -5.0);
        assert!((floor.height_at(5.0) - (-5.0)).abs() < 0.5);
    }

    #[test]
    fn height_at_wraps_negative_x() {
        let floor = OceanFloor::new(Vec::new(), 100.0, 1.0, 1.0);
        let a = floor.height_at(-1.0);
        let b = floor.height_at(WORLD_WIDTH - 1.0);
        assert!((a - b).abs() < 1e-3);
    }
}
