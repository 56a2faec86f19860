//! Rolling median smoothing and vertical speed derivation.

use super::types::AltitudeSample;

/// Centered rolling median of altitude.
///
/// For each sample the window holds every sample within
/// `window_secs / 2` on either side, capped at `max_samples` (split evenly
/// around the center). Samples must already be sorted by timestamp. Work per
/// sample is bounded by `max_samples`, so the pass is linear in the series
/// length.
pub fn rolling_median(samples: &[AltitudeSample], window_secs: f64, max_samples: usize) -> Vec<f64> {
    let n = samples.len();
    let mut smoothed = Vec::with_capacity(n);
    if n == 0 {
        return smoothed;
    }

    let half_span = (window_secs / 2.0).max(0.0);
    let half_count = max_samples.saturating_sub(1) / 2;
    let mut scratch: Vec<f64> = Vec::with_capacity(max_samples.max(1));
    let mut lo = 0usize;
    let mut hi = 0usize;

    for (i, center) in samples.iter().enumerate() {
        while samples[i].timestamp - samples[lo].timestamp > half_span {
            lo += 1;
        }
        if hi < i {
            hi = i;
        }
        while hi + 1 < n && samples[hi + 1].timestamp - center.timestamp <= half_span {
            hi += 1;
        }

        let start = lo.max(i.saturating_sub(half_count));
        let end = hi.min(i + half_count);

        scratch.clear();
        scratch.extend(samples[start..=end].iter().map(|s| s.altitude_ft));
        scratch.sort_by(|a, b| a.total_cmp(b));
        smoothed.push(median_of_sorted(&scratch));
    }

    smoothed
}

fn median_of_sorted(values: &[f64]) -> f64 {
    let len = values.len();
    if len % 2 == 1 {
        values[len / 2]
    } else {
        (values[len / 2 - 1] + values[len / 2]) / 2.0
    }
}

/// Vertical speed in feet per minute from consecutive altitudes.
///
/// The first sample has no predecessor and reports 0. When two samples share
/// a timestamp the previous vertical speed is carried forward.
pub fn vertical_speeds(timestamps: &[f64], altitudes: &[f64]) -> Vec<f64> {
    let mut speeds = Vec::with_capacity(altitudes.len());
    let mut previous = 0.0;
    for i in 0..altitudes.len() {
        if i == 0 {
            speeds.push(0.0);
            continue;
        }
        let elapsed_min = (timestamps[i] - timestamps[i - 1]) / 60.0;
        if elapsed_min > 0.0 {
            previous = (altitudes[i] - altitudes[i - 1]) / elapsed_min;
        }
        speeds.push(previous);
    }
    speeds
}
