//! Calibration statistics aggregation shared by every store implementation.
//!
//! Brier score, calibration error, bounded adjustment factor, reliability
//! bins. Empty input yields neutral statistics; no division by zero.

use crate::config::CalibrationConfig;
use crate::models::{CalibrationStatistics, ConfidenceBin, ScopedObservations};

/// Aggregate the observations of one `(agent, domain)` scope.
pub fn aggregate(
    agent_name: Option<&str>,
    domain: Option<&str>,
    scoped: &ScopedObservations,
    config: &CalibrationConfig,
) -> CalibrationStatistics {
    let mut stats = CalibrationStatistics::neutral(agent_name, domain);
    stats.malformed_records = scoped.malformed;

    let records = &scoped.observations;
    if records.is_empty() {
        return stats;
    }

    let n = records.len() as f64;
    let correct = records.iter().filter(|(_, actual)| *actual).count();
    let accuracy = correct as f64 / n;
    let brier_score = records
        .iter()
        .map(|(claimed, actual)| (claimed - outcome(*actual)).powi(2))
        .sum::<f64>()
        / n;
    let mean_claimed = records.iter().map(|(claimed, _)| claimed).sum::<f64>() / n;
    let calibration_error = mean_claimed - accuracy;

    let bins = reliability_bins(&scoped.observations, config.bin_count);
    let expected_calibration_error = bins
        .iter()
        .map(|bin| bin.count as f64 / n * bin.gap.abs())
        .sum();

    stats.total_records = records.len();
    stats.correct_predictions = correct;
    stats.accuracy = accuracy;
    stats.brier_score = brier_score;
    stats.mean_claimed_confidence = mean_claimed;
    stats.calibration_error = calibration_error;
    stats.adjustment_factor = adjustment_factor(records.len(), calibration_error, config);
    stats.expected_calibration_error = expected_calibration_error;
    stats.bins = bins;
    stats
}

/// `clamp(1 - calibration_error, min, max)`, forced to 1.0 below the sample
/// floor or when the bounds do not form a range.
pub fn adjustment_factor(
    total_records: usize,
    calibration_error: f64,
    config: &CalibrationConfig,
) -> f64 {
    if total_records < config.min_calibration_records || !calibration_error.is_finite() {
        return 1.0;
    }
    if !config.has_usable_bounds() {
        tracing::warn!(
            min = config.min_adjustment,
            max = config.max_adjustment,
            "unusable adjustment bounds, leaving scores uncalibrated"
        );
        return 1.0;
    }
    (1.0 - calibration_error).clamp(config.min_adjustment, config.max_adjustment)
}

fn outcome(actual: bool) -> f64 {
    if actual {
        1.0
    } else {
        0.0
    }
}

/// Partition claims into `bin_count` equal-width bins over [0, 1].
/// A claim of exactly 1.0 belongs to the top bin. Empty bins are omitted.
fn reliability_bins(records: &[(f64, bool)], bin_count: usize) -> Vec<ConfidenceBin> {
    let bin_count = bin_count.max(1);
    let mut sums = vec![(0usize, 0usize, 0.0f64); bin_count];
    for (claimed, actual) in records {
        let idx = ((claimed * bin_count as f64).floor() as usize).min(bin_count - 1);
        let slot = &mut sums[idx];
        slot.0 += 1;
        if *actual {
            slot.1 += 1;
        }
        slot.2 += claimed;
    }

    sums.into_iter()
        .enumerate()
        .filter(|(_, (count, _, _))| *count > 0)
        .map(|(idx, (count, correct, claimed_sum))| {
            let accuracy = correct as f64 / count as f64;
            let mean_claimed = claimed_sum / count as f64;
            ConfidenceBin {
                lower: idx as f64 / bin_count as f64,
                upper: (idx + 1) as f64 / bin_count as f64,
                count,
                correct,
                accuracy,
                mean_claimed,
                gap: mean_claimed - accuracy,
            }
        })
        .collect()
}
