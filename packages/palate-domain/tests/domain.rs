use palate_domain::{preference, ranking};

fn assert_close(actual: f64, expected: f64) {
	assert!((actual - expected).abs() < 1e-9, "Expected {expected}, got {actual}.");
}

#[test]
fn fold_score_sequence_equals_arithmetic_mean() {
	let weights = [1.0, 1.0, -1.0, 1.0, -1.0, -1.0, 1.0];
	let mut score = 0.0;

	for (n, weight) in weights.into_iter().enumerate() {
		score = preference::fold_score(score, n as u64, weight);
	}

	let mean = weights.iter().sum::<f64>() / weights.len() as f64;

	assert_close(score, mean);
}

#[test]
fn fold_score_first_sample_is_the_weight() {
	assert_close(preference::fold_score(0.0, 0, -1.0), -1.0);
	assert_close(preference::fold_score(123.0, 0, 1.0), 1.0);
}

#[test]
fn fold_vector_mean_is_the_per_dimension_mean() {
	let embeddings = [vec![1.0_f32, 0.0, 2.0], vec![0.0, 1.0, 4.0], vec![-1.0, 2.0, 0.0]];
	let mut profile = embeddings[0].clone();

	for (count, embedding) in embeddings.iter().enumerate().skip(1) {
		profile = ranking::fold_vector_mean(&profile, count as u64, embedding);
	}

	for dim in 0..3 {
		let mean = embeddings.iter().map(|v| v[dim]).sum::<f32>() / embeddings.len() as f32;

		assert!((profile[dim] - mean).abs() < 1e-6, "Dimension {dim} diverged from the mean.");
	}
}

#[test]
fn match_score_is_invariant_to_entry_order() {
	let forward = preference::match_score([(0.8, 3), (0.2, 10), (0.5, 1)]);
	let reversed = preference::match_score([(0.5, 1), (0.2, 10), (0.8, 3)]);

	assert_close(forward, reversed);
}

#[test]
fn unmatched_attributes_contribute_nothing() {
	// An attribute pair with no stored entry never reaches match_score; the
	// equivalent here is that adding entries with no positive signal leaves
	// the result untouched.
	let base = preference::match_score([(0.8, 3)]);
	let with_noise = preference::match_score([(0.8, 3), (0.0, 7), (-1.0, 2)]);

	assert_close(base, with_noise);
}

#[test]
fn match_score_applies_log_confidence_weighting() {
	let fresh = preference::match_score([(1.0, 1)]);
	let seasoned = preference::match_score([(1.0, 99)]);

	assert_close(fresh, 2.0_f64.ln());
	assert_close(seasoned, 100.0_f64.ln());
	assert!(seasoned > fresh);
}

#[test]
fn cosine_similarity_stays_within_bounds() {
	let pairs = [
		(vec![1.0_f32, 2.0, 3.0], vec![-3.0_f32, 2.0, -1.0]),
		(vec![1.0, 0.0, 0.0], vec![1.0, 0.0, 0.0]),
		(vec![1.0, 0.0, 0.0], vec![-1.0, 0.0, 0.0]),
		(vec![0.3, -0.7, 0.2], vec![5.0, 5.0, 5.0]),
	];

	for (a, b) in pairs {
		let similarity = ranking::cosine_similarity(&a, &b);

		assert!((-1.0..=1.0).contains(&similarity), "Similarity {similarity} out of bounds.");
	}
}

#[test]
fn cosine_similarity_of_zero_vector_is_zero() {
	assert_eq!(ranking::cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
	assert_eq!(ranking::cosine_similarity(&[1.0, 2.0], &[0.0, 0.0]), 0.0);
	assert_eq!(ranking::cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
}

#[test]
fn cosine_similarity_of_parallel_and_opposite_vectors() {
	assert!((ranking::cosine_similarity(&[2.0, 0.0], &[4.0, 0.0]) - 1.0).abs() < 1e-6);
	assert!((ranking::cosine_similarity(&[2.0, 0.0], &[-4.0, 0.0]) + 1.0).abs() < 1e-6);
}

#[test]
fn blend_maps_similarity_onto_the_tag_scale() {
	// similarity 1 -> 10, similarity -1 -> 0, similarity 0 -> 5.
	assert_close(ranking::blend(0.0, 1.0, 1.0), 10.0);
	assert_close(ranking::blend(0.0, -1.0, 1.0), 0.0);
	assert_close(ranking::blend(0.0, 0.0, 1.0), 5.0);
}

#[test]
fn blend_weights_both_signals() {
	// tag 2.0 at weight 0.3 plus normalized vector score 10 at weight 0.7.
	assert_close(ranking::blend(2.0, 1.0, 0.7), 2.0 * 0.3 + 10.0 * 0.7);
}
