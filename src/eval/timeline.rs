//! Dense per-second timelines.
//!
//! Ground-truth intervals and classifier predictions are expanded onto
//! a fixed second-indexed scaffold so the two can be compared
//! element-wise.

/// Build a per-second truth timeline from labeled intervals.
///
/// Every integer second covered by an interval (inclusive on both ends)
/// is marked positive; overlapping labels collapse into one. Seconds
/// past the scaffold are dropped.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn truth_timeline(intervals: &[(f64, f64)], seconds: usize) -> Vec<bool> {
    let mut timeline = vec![false; seconds];

    for &(start, end) in intervals {
        let first = start.max(0.0) as usize;
        let last = end.max(0.0) as usize;
        for second in first..=last {
            if second < seconds {
                timeline[second] = true;
            }
        }
    }

    timeline
}

/// Build a per-second confidence timeline from predictions.
///
/// Each prediction's confidence lands at its start second (a left join
/// onto the scaffold); unmatched seconds stay at 0.0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn prediction_timeline(predictions: &[(f64, f32)], seconds: usize) -> Vec<f32> {
    let mut timeline = vec![0.0; seconds];

    for &(start, confidence) in predictions {
        let second = start.max(0.0) as usize;
        if second < seconds {
            timeline[second] = confidence;
        }
    }

    timeline
}
