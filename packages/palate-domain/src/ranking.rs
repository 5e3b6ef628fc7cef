/// Cosine similarity between two vectors of the same dimensionality.
///
/// Defined as exactly `0.0` when either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
	let mut dot = 0.0_f32;
	let mut norm_a = 0.0_f32;
	let mut norm_b = 0.0_f32;

	for (x, y) in a.iter().zip(b.iter()) {
		dot += x * y;
		norm_a += x * x;
		norm_b += y * y;
	}

	if norm_a == 0.0 || norm_b == 0.0 {
		return 0.0;
	}

	dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Per-dimension cumulative mean fold of `incoming` into a profile vector
/// that has absorbed `count` embeddings so far.
///
/// Same update law as `preference::fold_score`, applied per dimension, so one
/// feedback event has the same predictable, decreasing-over-time marginal
/// effect on both models.
pub fn fold_vector_mean(current: &[f32], count: u64, incoming: &[f32]) -> Vec<f32> {
	let n = count as f32;

	current.iter().zip(incoming.iter()).map(|(c, v)| (c * n + v) / (n + 1.0)).collect()
}

/// Blends the attribute-match score with embedding similarity.
///
/// Similarity in [-1, 1] is mapped onto [0, 10] to sit on the same nominal
/// scale as the tag score before the weighted combination.
pub fn blend(tag_score: f64, similarity: f32, vector_weight: f64) -> f64 {
	let vector_score = (f64::from(similarity) + 1.0) * 5.0;

	tag_score * (1.0 - vector_weight) + vector_score * vector_weight
}
