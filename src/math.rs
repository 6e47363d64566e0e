//! Small numerical helpers shared across the mesh, lifecycle, and
//! environment modules.

use glam::Vec2;

/// Smoothstep on `[edge0, edge1]`, clamped outside the interval.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Rotates a vector 90 degrees counter-clockwise (used by swirl fields).
#[inline]
pub fn perp(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// One of eight discrete compass octants, used to record a spring's
/// endpoint direction at factory time so broken geometry can be
/// reconstructed during repair (spec §3, Spring.factory endpoint octants).
#[inline]
pub fn octant_of(from: Vec2, to: Vec2) -> u8 {
    let d = to - from;
    let angle = d.y.atan2(d.x);
    let turns = angle / std::f32::consts::FRAC_PI_4;
    let octant = turns.round() as i32;
    octant.rem_euclid(8) as u8
}

/// Unit vector pointing along the given octant (inverse of [`octant_of`]).
#[inline]
pub fn octant_direction(octant: u8) -> Vec2 {
    let angle = (octant as f32) * std::f32::consts::FRAC_PI_4;
    Vec2::new(angle.cos(), angle.sin())
}

/// A fixed-length running average, used by the wind model to smooth the raw
/// Poisson-driven speed magnitude (spec §4.12) before it is turned into a
/// vector.
#[derive(Debug, Clone)]
pub struct RunningAverage<const N: usize> {
    samples: [f32; N],
    next: usize,
    filled: bool,
}

impl<const N: usize> Default for RunningAverage<N> {
    fn default() -> Self {
        Self {
            samples: [0.0; N],
            next: 0,
            filled: false,
        }
    }
}

impl<const N: usize> RunningAverage<N> {
    /// Seeds every slot with `value`, as the original wind model does on its
    /// very first update so the average doesn't ramp up from zero.
    pub fn fill(&mut self, value: f32) {
        self.samples = [value; N];
        self.filled = true;
        self.next = 0;
    }

    /// Pushes a new sample and returns the updated average.
    pub fn update(&mut self, value: f32) -> f32 {
        self.samples[self.next] = value;
        self.next = (self.next + 1) % N;
        self.filled = true;
        self.average()
    }

    pub fn average(&self) -> f32 {
        if !self.filled {
            return 0.0;
        }
        self.samples.iter().sum::<f32>() / N as f32
    }
}

/// Strain-to-strength falloff curve used by spring-break evaluation (spec
/// §4.2): `f(r) = 4 / (1 + 3 r^1.3)` where `r` is the iterations adjustment.
#[inline]
pub fn strain_strength_falloff(r: f32) -> f32 {
    4.0 / (1.0 + 3.0 * r.powf(1.3))
}

/// True if the open segments `p1-p2` and `p3-p4` properly intersect (used by
/// the saw tool, spec §4.13). Collinear/touching-endpoint cases count as no
/// intersection, matching a saw stroke that grazes a vertex.
pub fn segments_intersect(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> bool {
    fn orientation(a: Vec2, b: Vec2, c: Vec2) -> f32 {
        (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
    }
    let d1 = orientation(p3, p4, p1);
    let d2 = orientation(p3, p4, p2);
    let d3 = orientation(p1, p2, p3);
    let d4 = orientation(p1, p2, p4);
    (d1 > 0.0) != (d2 > 0.0) && (d3 > 0.0) != (d4 > 0.0) && d1 != 0.0 && d2 != 0.0 && d3 != 0.0 && d4 != 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothstep_endpoints() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn octant_roundtrip_axes() {
        let origin = Vec2::ZERO;
        assert_eq!(octant_of(origin, Vec2::new(1.0, 0.0)), 0);
        assert_eq!(octant_of(origin, Vec2::new(0.0, 1.0)), 2);
        assert_eq!(octant_of(origin, Vec2::new(-1.0, 0.0)), 4);
        assert_eq!(octant_of(origin, Vec2::new(0.0, -1.0)), 6);
    }

    #[test]
    fn running_average_converges() {
        let mut avg: RunningAverage<4> = RunningAverage::default();
        avg.fill(0.0);
        for _ in 0..8 {
            avg.update(10.0);
        }
        assert!((avg.average() - 10.0).abs() < 1e-6);
    }

    #[test]
    fn perp_is_ccw_quarter_turn() {
        let v = Vec2::new(1.0, 0.0);
        let p = perp(v);
        assert!((p - Vec2::new(0.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn crossing_segments_intersect() {
        assert!(segments_intersect(Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, -1.0), Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        assert!(!segments_intersect(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0)));
    }
}
