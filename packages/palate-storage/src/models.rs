use serde::Serialize;

/// Running-mean preference score for one attribute pair.
///
/// `score` is the cumulative weighted mean of every feedback weight applied
/// to the pair; `sample_count` is the number of feedback events that touched
/// it. Entries are created on first feedback and updated in place forever
/// after.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct PreferenceEntry {
	pub attribute_key: String,
	pub attribute_value: String,
	pub score: f64,
	pub sample_count: i64,
}

/// Running-mean embedding of everything one user has liked.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct UserProfile {
	pub user_id: String,
	pub vec: Vec<f32>,
	pub like_count: i64,
}
