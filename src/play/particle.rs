//! Particle bursts shown when notes are hit and while sustains are held.

use std::f64::consts::{FRAC_PI_2, TAU};

use gametime::TimeSpan;

use super::note::LaneColor;
use crate::{config::ParticleConfig, rng::ParticleRng};

/// One square particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    position: [f64; 2],
    velocity: [f64; 2],
    remaining_secs: f64,
    color: LaneColor,
    alpha: u8,
}

impl Particle {
    /// Center position in pixels.
    #[must_use]
    pub const fn position(&self) -> [f64; 2] {
        self.position
    }

    /// Velocity in pixels per second.
    #[must_use]
    pub const fn velocity(&self) -> [f64; 2] {
        self.velocity
    }

    /// Seconds left before the particle disappears.
    #[must_use]
    pub const fn remaining_secs(&self) -> f64 {
        self.remaining_secs
    }
}

/// What a renderer needs to draw a particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleView {
    /// Center x in pixels.
    pub x: f64,
    /// Center y in pixels.
    pub y: f64,
    /// Edge length in pixels.
    pub size: f64,
    /// Color with the fading alpha applied.
    pub rgba: [u8; 4],
    /// Remaining lifetime relative to the longest lifetime, in `[0, 1]`.
    pub life_fraction: f64,
}

/// Owns the live particles and the random source that shapes them.
pub struct ParticleSystem<R> {
    rng: R,
    config: ParticleConfig,
    particles: Vec<Particle>,
}

impl<R: ParticleRng> ParticleSystem<R> {
    /// Creates an empty system.
    pub const fn new(rng: R, config: ParticleConfig) -> Self {
        Self {
            rng,
            config,
            particles: Vec::new(),
        }
    }

    /// Spawns a burst in every direction at `(x, y)`.
    pub fn spawn_hit(&mut self, x: f64, y: f64, color: LaneColor) {
        for _ in 0..self.config.hit_count {
            let angle = self.rng.generate(0.0..TAU);
            let speed = self
                .rng
                .generate(self.config.speed_min..self.config.speed_max);
            let lifetime = self
                .rng
                .generate(self.config.lifetime_min..self.config.lifetime_max);
            self.particles.push(Particle {
                position: [x, y],
                velocity: [angle.cos() * speed, angle.sin() * speed],
                remaining_secs: lifetime,
                color,
                alpha: u8::MAX,
            });
        }
    }

    /// Spawns the small upward trickle of a held sustain at `(x, y)`.
    pub fn spawn_sustain(&mut self, x: f64, y: f64, color: LaneColor) {
        for _ in 0..self.config.sustain_count {
            let angle =
                self.rng.generate(0.0..TAU) * 0.3 - FRAC_PI_2 * 0.3 - FRAC_PI_2 * 0.85;
            let speed = (self
                .rng
                .generate(self.config.speed_min..self.config.speed_max)
                * 0.5)
                .min(self.config.sustain_max_speed)
                * 5.0;
            let lifetime = self
                .rng
                .generate(self.config.lifetime_min..self.config.lifetime_max)
                * 0.7;
            self.particles.push(Particle {
                position: [x, y],
                velocity: [angle.cos() * speed, angle.sin() * speed],
                remaining_secs: lifetime,
                color,
                alpha: self.config.sustain_alpha,
            });
        }
    }

    /// Ages every particle by `step`, moves the survivors and drops the expired.
    pub fn update(&mut self, step: TimeSpan) {
        let dt = step.as_secs_f64();
        self.particles.retain_mut(|particle| {
            particle.remaining_secs -= dt;
            if particle.remaining_secs <= 0.0 {
                return false;
            }
            particle.position[0] += particle.velocity[0] * dt;
            particle.position[1] += particle.velocity[1] * dt;
            true
        });
    }

    /// Removes every particle.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Live particles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of live particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether no particle is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Drawable views of the live particles.
    pub fn views(&self) -> impl Iterator<Item = ParticleView> + '_ {
        let max = self.config.lifetime_max;
        let size = self.config.size;
        self.particles.iter().map(move |particle| {
            let life_fraction = if max > 0.0 {
                (particle.remaining_secs / max).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let alpha = (f64::from(particle.alpha) * life_fraction).round() as u8;
            ParticleView {
                x: particle.position[0],
                y: particle.position[1],
                size,
                rgba: particle.color.with_alpha(alpha),
                life_fraction,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RngMock;

    fn system() -> ParticleSystem<RngMock<1>> {
        ParticleSystem::new(RngMock([0]), ParticleConfig::default())
    }

    #[test]
    fn hit_burst() {
        let mut particles = system();
        particles.spawn_hit(40.0, 1100.0, LaneColor::Green);
        assert_eq!(particles.len(), 8);
        let first = particles.particles()[0];
        assert_eq!(first.velocity(), [50.0, 0.0]);
        assert_eq!(first.remaining_secs(), 0.2);

        particles.update(TimeSpan::MILLISECOND * 100);
        let moved = particles.particles()[0];
        assert!((moved.position()[0] - 45.0).abs() < 1e-9);
        let view = particles.views().next().unwrap();
        assert!((view.life_fraction - 0.2).abs() < 1e-9);
        assert_eq!(view.rgba, [0, 255, 0, 51]);

        particles.update(TimeSpan::MILLISECOND * 100);
        assert!(particles.is_empty());
    }

    #[test]
    fn sustain_trickle_rises() {
        let mut particles = system();
        particles.spawn_sustain(200.0, 1137.5, LaneColor::Yellow);
        assert_eq!(particles.len(), 2);
        for particle in particles.particles() {
            assert!(particle.velocity()[1] < 0.0);
            assert!((particle.remaining_secs() - 0.14).abs() < 1e-9);
            let speed = particle.velocity()[0].hypot(particle.velocity()[1]);
            assert!((speed - 125.0).abs() < 1e-9);
        }
        let view = particles.views().next().unwrap();
        assert_eq!(view.rgba[3], (150.0_f64 * 0.28).round() as u8);
    }
}
