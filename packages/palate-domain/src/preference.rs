/// Folds one feedback weight into a running mean that has absorbed
/// `sample_count` weights so far.
///
/// This is an exact cumulative mean, not an exponential decay: every
/// historical feedback event keeps equal influence regardless of recency.
pub fn fold_score(score: f64, sample_count: u64, weight: f64) -> f64 {
	let n = sample_count as f64;

	(score * n + weight) / (n + 1.0)
}

/// Log-dampened confidence factor for an entry with `sample_count` samples.
pub fn confidence_weight(sample_count: u64) -> f64 {
	((sample_count + 1) as f64).ln()
}

/// Aggregates the preference entries matched by a candidate item's attributes
/// into one attribute-match score.
///
/// Entries with `score <= 0` contribute nothing: only liked traits pull an
/// item up, a disliked trait never pushes it down. The result is the mean of
/// the confidence-weighted scores over the contributing entries, so an item
/// matching one strong attribute does not automatically outrank an item
/// matching many weaker ones.
pub fn match_score<I>(entries: I) -> f64
where
	I: IntoIterator<Item = (f64, u64)>,
{
	let mut sum = 0.0;
	let mut matched = 0_u32;

	for (score, sample_count) in entries {
		if score <= 0.0 {
			continue;
		}

		sum += score * confidence_weight(sample_count);
		matched += 1;
	}

	if matched == 0 { 0.0 } else { sum / f64::from(matched) }
}

#[cfg(test)]
mod tests {
	use super::{fold_score, match_score};

	#[test]
	fn fold_score_is_the_cumulative_mean() {
		let mut score = 0.0;

		for (n, weight) in [1.0, -1.0, 1.0, 1.0].into_iter().enumerate() {
			score = fold_score(score, n as u64, weight);
		}

		assert!((score - 0.5).abs() < 1e-12);
	}

	#[test]
	fn match_score_skips_non_positive_entries() {
		let score = match_score([(0.0, 2), (-0.5, 4)]);

		assert_eq!(score, 0.0);
	}

	#[test]
	fn match_score_averages_instead_of_summing() {
		let single = match_score([(1.0, 1)]);
		let doubled = match_score([(1.0, 1), (1.0, 1)]);

		assert!((single - doubled).abs() < 1e-12);
	}
}
