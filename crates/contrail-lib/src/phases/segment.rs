//! Turning an altitude series into contiguous phase slices.

use tracing::debug;

use super::classify::ClassifierState;
use super::config::PhaseDetectionConfig;
use super::smoothing::{rolling_median, vertical_speeds};
use super::types::{AltitudeSample, FlightPhase, PhaseSlice};

/// Segment an altitude series into ordered, contiguous phase slices.
///
/// Samples may arrive in any order and may repeat timestamps; they are stable
/// sorted first. Non-finite samples are dropped. Fewer than two usable samples,
/// or a series spanning no time, yields an empty list.
///
/// The returned slices cover exactly `[first_sample_time, last_sample_time]`.
/// No taxi phase is synthesized beyond the first or last sample.
///
/// # Examples
/// ```
/// use contrail_lib::phases::{detect_phases, AltitudeSample, FlightPhase, PhaseDetectionConfig};
///
/// let samples: Vec<AltitudeSample> = vec![
///     (0.0, 0.0).into(),
///     (600.0, 0.0).into(),
///     (1_800.0, 35_000.0).into(),
///     (5_400.0, 35_000.0).into(),
/// ];
/// let slices = detect_phases(&samples, &PhaseDetectionConfig::default());
/// assert_eq!(slices.first().map(|s| s.phase), Some(FlightPhase::TaxiOut));
/// assert_eq!(slices.last().map(|s| s.end_time), Some(5_400.0));
/// ```
pub fn detect_phases(samples: &[AltitudeSample], config: &PhaseDetectionConfig) -> Vec<PhaseSlice> {
    let mut sorted: Vec<AltitudeSample> = samples.iter().copied().filter(|s| s.is_finite()).collect();
    if sorted.len() != samples.len() {
        debug!(
            dropped = samples.len() - sorted.len(),
            "dropping non-finite altitude samples"
        );
    }
    sorted.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

    if sorted.len() < 2 {
        return Vec::new();
    }
    let first_time = sorted[0].timestamp;
    let last_time = sorted[sorted.len() - 1].timestamp;
    if last_time <= first_time {
        return Vec::new();
    }

    let timestamps: Vec<f64> = sorted.iter().map(|s| s.timestamp).collect();
    let altitudes: Vec<f64> = if config.smoothing {
        rolling_median(&sorted, config.smoothing_window_secs, config.max_window_samples)
    } else {
        sorted.iter().map(|s| s.altitude_ft).collect()
    };
    let speeds = vertical_speeds(&timestamps, &altitudes);

    let raw = build_slices(&timestamps, &altitudes, &speeds, config);
    let raw_count = raw.len();
    let merged = merge_short_slices(raw, config.merge_threshold_secs);
    let slices = enforce_contiguity(merged, first_time, last_time, config);

    debug!(
        samples = sorted.len(),
        raw_slices = raw_count,
        slices = slices.len(),
        "segmented altitude series"
    );
    slices
}

/// Running sums for the slice currently being built.
struct SliceBuilder {
    phase: FlightPhase,
    start_time: f64,
    end_time: f64,
    altitude_sum: f64,
    speed_sum: f64,
    count: usize,
}

impl SliceBuilder {
    fn open(phase: FlightPhase, start_time: f64) -> Self {
        Self {
            phase,
            start_time,
            end_time: start_time,
            altitude_sum: 0.0,
            speed_sum: 0.0,
            count: 0,
        }
    }

    fn push(&mut self, timestamp: f64, altitude_ft: f64, vertical_speed_fpm: f64) {
        self.end_time = timestamp;
        self.altitude_sum += altitude_ft;
        self.speed_sum += vertical_speed_fpm;
        self.count += 1;
    }

    fn finish(self) -> PhaseSlice {
        let count = self.count.max(1) as f64;
        PhaseSlice::new(
            self.phase,
            self.start_time,
            self.end_time,
            self.altitude_sum / count,
            self.speed_sum / count,
            self.count,
        )
    }
}

/// Classify each sample and group runs of the same phase.
///
/// Vertical speed is a backward difference, so the interval leading up to a
/// sample belongs to that sample's phase: a new slice starts at the previous
/// sample's timestamp, which is also where the prior slice ends.
///
/// Touchdown is the exception. A ground sample is classified by altitude
/// alone, so the interval ending on the first taxi-in sample carries no
/// evidence of taxiing. The taxi-in slice starts at that sample and the
/// interval before it is left for `enforce_contiguity` to fill.
fn build_slices(
    timestamps: &[f64],
    altitudes: &[f64],
    speeds: &[f64],
    config: &PhaseDetectionConfig,
) -> Vec<PhaseSlice> {
    let mut state = ClassifierState::new();
    let mut slices = Vec::new();
    let mut current: Option<SliceBuilder> = None;

    for i in 0..timestamps.len() {
        let phase = state.step(altitudes[i], speeds[i], config);
        current = Some(match current.take() {
            Some(builder) if builder.phase == phase => builder,
            Some(builder) => {
                let boundary = if phase == FlightPhase::TaxiIn {
                    timestamps[i]
                } else {
                    builder.end_time
                };
                slices.push(builder.finish());
                SliceBuilder::open(phase, boundary)
            }
            None => SliceBuilder::open(phase, timestamps[i]),
        });
        if let Some(builder) = current.as_mut() {
            builder.push(timestamps[i], altitudes[i], speeds[i]);
        }
    }

    if let Some(builder) = current {
        slices.push(builder.finish());
    }

    // A single-sample leading slice has no extent; let the next slice own it.
    if slices.len() > 1 && slices[0].duration_seconds <= 0.0 {
        let first = slices.remove(0);
        slices[0].absorb(&first);
    }

    slices
}

/// Absorb slices shorter than `threshold_secs` into their neighbours.
///
/// When both neighbours share a phase the short slice and both neighbours
/// collapse into one slice. Otherwise the short slice joins the preceding
/// slice; a short slice at the very start joins the following one. Adjacent
/// slices of the same phase are coalesced along the way. Single linear pass.
pub(crate) fn merge_short_slices(slices: Vec<PhaseSlice>, threshold_secs: f64) -> Vec<PhaseSlice> {
    let mut merged: Vec<PhaseSlice> = Vec::with_capacity(slices.len());
    let mut pending_leading: Option<PhaseSlice> = None;
    let mut iter = slices.into_iter().peekable();

    while let Some(mut slice) = iter.next() {
        if let Some(leading) = pending_leading.take() {
            slice.absorb(&leading);
        }

        if let Some(prev) = merged.last_mut() {
            if prev.phase == slice.phase {
                prev.absorb(&slice);
                continue;
            }
        }

        if slice.duration_seconds >= threshold_secs {
            merged.push(slice);
            continue;
        }

        match merged.last_mut() {
            Some(prev) => {
                let bridges = iter.peek().is_some_and(|next| next.phase == prev.phase);
                prev.absorb(&slice);
                if bridges {
                    if let Some(next) = iter.next() {
                        prev.absorb(&next);
                    }
                }
            }
            None => {
                if iter.peek().is_some() {
                    pending_leading = Some(slice);
                } else {
                    merged.push(slice);
                }
            }
        }
    }

    if let Some(leading) = pending_leading {
        merged.push(leading);
    }

    merged
}

/// Repair gaps and overlaps so slices tile `[first_time, last_time]`.
///
/// Gaps are filled with a synthetic slice carrying the preceding phase, or
/// cruise when the preceding slice sat at cruise altitude. This is a policy
/// choice kept for compatibility with historical estimates. A fill that
/// carries the preceding phase extends that slice instead of adding a second
/// one. Overlaps are resolved by moving the later slice's start; slices left
/// without positive duration are dropped.
pub(crate) fn enforce_contiguity(
    slices: Vec<PhaseSlice>,
    first_time: f64,
    last_time: f64,
    config: &PhaseDetectionConfig,
) -> Vec<PhaseSlice> {
    let mut ordered = slices;
    ordered.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

    let mut out: Vec<PhaseSlice> = Vec::with_capacity(ordered.len());
    for mut slice in ordered {
        if slice.start_time < first_time {
            slice.set_start(first_time);
        }
        if slice.end_time > last_time {
            slice.set_end(last_time);
        }

        let fill = match out.last_mut() {
            None => {
                if slice.start_time > first_time {
                    slice.set_start(first_time);
                }
                None
            }
            Some(prev) if slice.start_time > prev.end_time => {
                let fill = gap_fill(prev, slice.start_time, config);
                if fill.phase == prev.phase {
                    prev.set_end(fill.end_time);
                    None
                } else {
                    Some(fill)
                }
            }
            Some(prev) => {
                if slice.start_time < prev.end_time {
                    slice.set_start(prev.end_time);
                }
                None
            }
        };
        if let Some(fill) = fill {
            out.push(fill);
        }

        if slice.duration_seconds > 0.0 {
            out.push(slice);
        }
    }

    if let Some(last) = out.last_mut() {
        if last.end_time < last_time {
            last.set_end(last_time);
        }
    }

    out
}

fn gap_fill(prev: &PhaseSlice, until: f64, config: &PhaseDetectionConfig) -> PhaseSlice {
    let phase = if prev.avg_altitude_ft >= config.cruise_floor_ft {
        FlightPhase::Cruise
    } else {
        prev.phase
    };
    PhaseSlice::new(phase, prev.end_time, until, prev.avg_altitude_ft, 0.0, 0)
}
