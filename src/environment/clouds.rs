//! Clouds (spec §4.12, component C12): a pool of drifting cloud sprites
//! advecting across virtual space `[-1.5, 1.5] x [-0.5, 0.5]`, resized to the
//! target count and darkened/thickened by the active storm.

use super::storm::StormOutput;
use rand::Rng;

const SPACE_MIN_X: f32 = -1.5;
const SPACE_MAX_X: f32 = 1.5;
const MIN_SPACING: f32 = 0.08;

#[derive(Debug, Clone, Copy)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub speed: f32,
    pub darkening: f32,
    pub is_storm_cloud: bool,
}

pub struct CloudField {
    clouds: Vec<Cloud>,
    target_count: u32,
}

impl CloudField {
    pub fn new(target_count: u32) -> Self {
        Self { clouds: Vec::new(), target_count }
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    pub fn set_target_count(&mut self, count: u32) {
        self.target_count = count;
    }

    /// Advects every cloud by `dt`, wraps those that drift off one side back
    /// onto the other, and resizes the pool toward `target_count` plus any
    /// storm-driven extra clouds, spacing new arrivals by at least
    /// `MIN_SPACING` from their neighbours.
    pub fn update(&mut self, dt: f32, wind_speed: f32, storm: StormOutput, rng: &mut impl Rng) {
        for cloud in &mut self.clouds {
            cloud.x += cloud.speed * wind_speed.signum().max(0.1) * dt * 0.02;
            if cloud.x > SPACE_MAX_X {
                cloud.x = SPACE_MIN_X;
            } else if cloud.x < SPACE_MIN_X {
                cloud.x = SPACE_MAX_X;
            }
            cloud.darkening = storm.cloud_darkening;
        }

        let desired = self.target_count + (storm.cloud_count_factor * self.target_count as f32) as u32;
        while (self.clouds.len() as u32) < desired {
            if let Some(x) = self.find_spaced_x(rng) {
                self.clouds.push(Cloud {
                    x,
                    y: rng.gen_range(-0.5..0.5),
                    scale: rng.gen_range(0.5..1.5),
                    speed: rng.gen_range(0.5..1.5),
                    darkening: storm.cloud_darkening,
                    is_storm_cloud: storm.cloud_count_factor > 0.0,
                });
            } else {
                break;
            }
        }
        while (self.clouds.len() as u32) > desired {
            self.clouds.pop();
        }
    }

    fn find_spaced_x(&self, rng: &mut impl Rng) -> Option<f32> {
        for _ in 0..8 {
            let candidate = rng.gen_range(SPACE_MIN_X..SPACE_MAX_X);
            if self.clouds.iter().all(|c| (c.x - candidate).abs() >= MIN_SPACING) {
                return Some(candidate);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn grows_toward_target_count() {
        let mut field = CloudField::new(5);
        let mut rng = StepRng::new(0, 1);
        for _ in 0..5 {
            field.update(1.0 / 60.0, 1.0, StormOutput::default(), &mut rng);
        }
        assert_eq!(field.clouds().len(), 5);
    }

    #[test]
    fn cloud_wraps_past_right_edge() {
        let mut field = CloudField::new(1);
        field.clouds.push(Cloud { x: SPACE_MAX_X - 0.001, y: 0.0, scale: 1.0, speed: 1000.0, darkening: 0.0, is_storm_cloud: false });
        let mut rng = StepRng::new(0, 1);
        field.update(1.0, 1.0, StormOutput::default(), &mut rng);
        assert!(field.clouds()[0].x <= SPACE_MAX_X);
    }
}
