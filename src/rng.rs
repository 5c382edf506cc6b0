//! Random numbers for particle effects.
//!
//! # Implementations
//!
//! ## [`RngMock`]
//!
//! A deterministic mock that returns predefined values in rotation, for tests.
//!
//! ## [`RandRng`]
//!
//! A wrapper of any [`rand`] generator.
//!
//! [`rand`]: https://crates.io/crates/rand

use core::ops::Range;

/// A source of random numbers for particles.
pub trait ParticleRng {
    /// Returns 64 random bits.
    fn next_u64(&mut self) -> u64;

    /// Returns a number in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Returns a number in `range`, or `range.start` if the range is empty.
    ///
    /// The end is never returned, even when rounding would land on it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use riff_hero::rng::{ParticleRng, RngMock};
    ///
    /// let mut rng = RngMock([0, u64::MAX]);
    /// assert_eq!(rng.generate(50.0..150.0), 50.0);
    /// assert!(rng.generate(50.0..150.0) < 150.0);
    /// ```
    fn generate(&mut self, range: Range<f64>) -> f64 {
        if range.end <= range.start {
            return range.start;
        }
        let value = range.start + (range.end - range.start) * self.unit();
        if value < range.end {
            value
        } else {
            range.start
        }
    }
}

impl<T: ParticleRng + ?Sized> ParticleRng for Box<T> {
    fn next_u64(&mut self) -> u64 {
        T::next_u64(self)
    }
}

/// A deterministic mock generator.
///
/// Returns the values of the array in rotation.
///
/// ```rust
/// use riff_hero::rng::{ParticleRng, RngMock};
///
/// let mut rng = RngMock([1, 2]);
/// assert_eq!(rng.next_u64(), 1);
/// assert_eq!(rng.next_u64(), 2);
/// assert_eq!(rng.next_u64(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RngMock<const N: usize>(pub [u64; N]);

impl<const N: usize> ParticleRng for RngMock<N> {
    fn next_u64(&mut self) -> u64 {
        let Some(first) = self.0.first().copied() else {
            return 0;
        };
        self.0.rotate_left(1);
        first
    }
}

/// A generator backed by the [`rand`] crate.
///
/// ```rust
/// # #[cfg(feature = "rand")]
/// # {
/// use rand::{SeedableRng, rngs::StdRng};
/// use riff_hero::rng::{ParticleRng, RandRng};
///
/// let mut rng = RandRng(StdRng::seed_from_u64(42));
/// let speed = rng.generate(50.0..150.0);
/// assert!((50.0..150.0).contains(&speed));
/// # }
/// ```
///
/// [`rand`]: https://crates.io/crates/rand
#[cfg(feature = "rand")]
pub struct RandRng<R>(pub R);

#[cfg(feature = "rand")]
impl<R: rand::RngCore> ParticleRng for RandRng<R> {
    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }
}

#[cfg(feature = "rand")]
impl RandRng<rand::rngs::StdRng> {
    /// A generator seeded by the operating system.
    #[must_use]
    pub fn from_os_rng() -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::from_os_rng())
    }
}
