//! Common test utilities and fixture helpers.
//!
//! Synthetic altitude profiles are generated from a small deterministic
//! generator so tests never depend on wall clock or system randomness.

use std::path::PathBuf;

use contrail_lib::AltitudeSample;

/// Path to fixtures directory used by tests (sample flight, override feed).
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Linear congruential generator producing uniform values in `[0, 1)`.
#[allow(dead_code)]
pub struct Lcg(u64);

#[allow(dead_code)]
impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_unit(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform value in `[-amplitude, amplitude)`.
    pub fn jitter(&mut self, amplitude: f64) -> f64 {
        (self.next_unit() * 2.0 - 1.0) * amplitude
    }
}

/// Noisy profile sampled every 10 s: 10 min taxi, 20 min climb to 35,000 ft,
/// 80 min cruise with uniform jitter, 15 min descent, 5 min taxi.
#[allow(dead_code)]
pub fn noisy_profile(seed: u64, jitter_ft: f64) -> Vec<AltitudeSample> {
    let mut rng = Lcg::new(seed);
    let mut samples = Vec::new();
    let mut t = 0.0;
    while t <= 7_800.0 {
        let altitude = if t <= 600.0 {
            0.0
        } else if t <= 1_800.0 {
            35_000.0 * (t - 600.0) / 1_200.0
        } else if t < 6_600.0 {
            35_000.0 + rng.jitter(jitter_ft)
        } else if t <= 7_500.0 {
            35_000.0 * (7_500.0 - t) / 900.0
        } else {
            0.0
        };
        samples.push(AltitudeSample::new(t, altitude));
        t += 10.0;
    }
    samples
}

/// Six-sample gate-to-gate flight: taxi, climb, cruise, descent, taxi.
#[allow(dead_code)]
pub fn sparse_flight(t0: f64) -> Vec<AltitudeSample> {
    let minute = 60.0;
    vec![
        AltitudeSample::new(t0, 0.0),
        AltitudeSample::new(t0 + 10.0 * minute, 0.0),
        AltitudeSample::new(t0 + 30.0 * minute, 35_000.0),
        AltitudeSample::new(t0 + 90.0 * minute, 35_000.0),
        AltitudeSample::new(t0 + 110.0 * minute, 0.0),
        AltitudeSample::new(t0 + 120.0 * minute, 0.0),
    ]
}
