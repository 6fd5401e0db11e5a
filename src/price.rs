//! # Price Classification and Now-Location
//!
//! The price path of the pipeline. [`classify`] assigns every visible tick a
//! discrete tier from percentile thresholds recomputed over the visible
//! window only, so the chart always shows relative cheapness *within what's
//! on screen*. [`locate`] finds where "now" falls inside the gapless bucket
//! timeline, producing the one continuous value in an otherwise discrete
//! pipeline: the fractional offset that drives the moving position marker.

use crate::{TemporalRecord, Tier};
use chrono::DateTime;
use chrono_tz::Tz;

/// Classify each record against the 20th/80th percentile of the visible
/// values.
///
/// Percentiles use nearest-rank selection on the ascending-sorted values
/// (`index = floor(q * (n - 1))`, no interpolation). `v <= p20` is `Low`,
/// `v >= p80` is `High`, everything else `Mid`. With fewer than five items
/// the thresholds may coincide; classification degrades toward "everything
/// Mid-ish" rather than erroring. Records without a numeric payload come
/// back as `Mid`.
///
/// Returns one tier per input record, in input order.
pub fn classify(records: &[TemporalRecord]) -> Vec<Tier> {
    let mut values: Vec<f64> = records.iter().filter_map(|r| r.value()).collect();
    if values.is_empty() {
        return records.iter().map(|_| Tier::Mid).collect();
    }
    values.sort_by(f64::total_cmp);

    let p20 = nearest_rank(&values, 0.20);
    let p80 = nearest_rank(&values, 0.80);

    records
        .iter()
        .map(|record| match record.value() {
            Some(v) if v <= p20 => Tier::Low,
            Some(v) if v >= p80 => Tier::High,
            _ => Tier::Mid,
        })
        .collect()
}

/// Nearest-rank percentile on an ascending-sorted slice. `values` must be
/// non-empty.
fn nearest_rank(values: &[f64], q: f64) -> f64 {
    let index = (q * (values.len() - 1) as f64).floor() as usize;
    values[index]
}

/// Find the bucket containing `now` and the fractional offset within it.
///
/// Precondition: `buckets` ascending by start and gapless; each bucket's
/// nominal duration is the gap to its successor. Picks the greatest index
/// whose start is at or before `now`:
///
/// - `now` before the first bucket → `(0, 0.0)`.
/// - `now` at or past the last bucket → `(last, 0.5)`; the final period has
///   no defined duration, so we don't know how far through it we are.
/// - otherwise the offset is elapsed time over bucket span, clamped to
///   `[0, 1]` to absorb clock skew or slightly stale input.
///
/// An empty slice returns `(0, 0.0)`.
pub fn locate(buckets: &[TemporalRecord], now: DateTime<Tz>) -> (usize, f32) {
    let Some(index) = buckets.iter().rposition(|b| b.start <= now) else {
        return (0, 0.0);
    };

    match buckets.get(index + 1) {
        Some(next) => {
            let span = (next.start - buckets[index].start).num_seconds() as f32;
            let elapsed = (now - buckets[index].start).num_seconds() as f32;
            let offset = if span > 0.0 {
                (elapsed / span).clamp(0.0, 1.0)
            } else {
                0.0
            };
            (index, offset)
        }
        // Sentinel for the final bucket.
        None => (index, 0.5),
    }
}
