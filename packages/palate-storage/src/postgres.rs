use serde_json::Value;
use sqlx::PgPool;

use crate::{
	Attributes, BoxFuture, Error, FeatureStore, PreferenceStore, Result, VectorStore,
	models::{PreferenceEntry, UserProfile},
};

pub struct PgStore {
	pool: PgPool,
}
impl PgStore {
	pub fn new(pool: PgPool) -> Self {
		Self { pool }
	}
}

impl FeatureStore for PgStore {
	fn put_attributes<'a>(
		&'a self,
		item_id: &'a str,
		attributes: &'a Attributes,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(put_attributes(&self.pool, item_id, attributes))
	}

	fn attributes<'a>(&'a self, item_id: &'a str) -> BoxFuture<'a, Result<Option<Attributes>>> {
		Box::pin(attributes(&self.pool, item_id))
	}
}

impl PreferenceStore for PgStore {
	fn apply_feedback<'a>(
		&'a self,
		attributes: &'a Attributes,
		weight: f64,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(apply_feedback(&self.pool, attributes, weight))
	}

	fn entry<'a>(
		&'a self,
		attribute_key: &'a str,
		attribute_value: &'a str,
	) -> BoxFuture<'a, Result<Option<PreferenceEntry>>> {
		Box::pin(entry(&self.pool, attribute_key, attribute_value))
	}

	fn entries_for<'a>(
		&'a self,
		attributes: &'a Attributes,
	) -> BoxFuture<'a, Result<Vec<PreferenceEntry>>> {
		Box::pin(entries_for(&self.pool, attributes))
	}

	fn top_entries<'a>(&'a self, limit: u32) -> BoxFuture<'a, Result<Vec<PreferenceEntry>>> {
		Box::pin(top_entries(&self.pool, limit))
	}
}

impl VectorStore for PgStore {
	fn put_item_vector<'a>(
		&'a self,
		item_id: &'a str,
		vec: &'a [f32],
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(put_item_vector(&self.pool, item_id, vec))
	}

	fn item_vector<'a>(&'a self, item_id: &'a str) -> BoxFuture<'a, Result<Option<Vec<f32>>>> {
		Box::pin(item_vector(&self.pool, item_id))
	}

	fn update_user_profile<'a>(
		&'a self,
		user_id: &'a str,
		liked: &'a [f32],
	) -> BoxFuture<'a, Result<Vec<f32>>> {
		Box::pin(update_user_profile(&self.pool, user_id, liked))
	}

	fn user_profile<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<Option<UserProfile>>> {
		Box::pin(user_profile(&self.pool, user_id))
	}
}

async fn put_attributes(pool: &PgPool, item_id: &str, attributes: &Attributes) -> Result<()> {
	let payload = serde_json::to_value(attributes)
		.map_err(|err| Error::InvalidArgument(format!("Failed to encode attributes: {err}")))?;

	sqlx::query(
		"\
INSERT INTO item_features (item_id, attributes, updated_at)
VALUES ($1, $2, now())
ON CONFLICT (item_id) DO UPDATE
SET
	attributes = EXCLUDED.attributes,
	updated_at = now()",
	)
	.bind(item_id)
	.bind(&payload)
	.execute(pool)
	.await?;

	Ok(())
}

async fn attributes(pool: &PgPool, item_id: &str) -> Result<Option<Attributes>> {
	let payload: Option<Value> =
		sqlx::query_scalar("SELECT attributes FROM item_features WHERE item_id = $1")
			.bind(item_id)
			.fetch_optional(pool)
			.await?;

	payload
		.map(|value| {
			serde_json::from_value(value).map_err(|err| {
				Error::InvalidArgument(format!("Stored attributes are not a string map: {err}"))
			})
		})
		.transpose()
}

async fn apply_feedback(pool: &PgPool, attributes: &Attributes, weight: f64) -> Result<()> {
	let mut tx = pool.begin().await?;

	for (attribute_key, attribute_value) in attributes {
		// The fold runs inside the upsert so concurrent feedback on the same
		// pair serializes on the row without a read-modify-write race.
		sqlx::query(
			"\
INSERT INTO preference_entries (attribute_key, attribute_value, score, sample_count, updated_at)
VALUES ($1, $2, $3, 1, now())
ON CONFLICT (attribute_key, attribute_value) DO UPDATE
SET
	score = (preference_entries.score * preference_entries.sample_count + EXCLUDED.score)
		/ (preference_entries.sample_count + 1),
	sample_count = preference_entries.sample_count + 1,
	updated_at = now()",
		)
		.bind(attribute_key)
		.bind(attribute_value)
		.bind(weight)
		.execute(&mut *tx)
		.await?;
	}

	tx.commit().await?;

	Ok(())
}

async fn entry(
	pool: &PgPool,
	attribute_key: &str,
	attribute_value: &str,
) -> Result<Option<PreferenceEntry>> {
	let entry = sqlx::query_as(
		"\
SELECT attribute_key, attribute_value, score, sample_count
FROM preference_entries
WHERE attribute_key = $1 AND attribute_value = $2",
	)
	.bind(attribute_key)
	.bind(attribute_value)
	.fetch_optional(pool)
	.await?;

	Ok(entry)
}

async fn entries_for(pool: &PgPool, attributes: &Attributes) -> Result<Vec<PreferenceEntry>> {
	if attributes.is_empty() {
		return Ok(Vec::new());
	}

	let keys: Vec<&str> = attributes.keys().map(String::as_str).collect();
	let values: Vec<&str> = attributes.values().map(String::as_str).collect();
	let entries = sqlx::query_as(
		"\
SELECT p.attribute_key, p.attribute_value, p.score, p.sample_count
FROM preference_entries p
JOIN unnest($1::text[], $2::text[]) AS wanted(attribute_key, attribute_value)
	ON p.attribute_key = wanted.attribute_key
	AND p.attribute_value = wanted.attribute_value",
	)
	.bind(&keys)
	.bind(&values)
	.fetch_all(pool)
	.await?;

	Ok(entries)
}

async fn top_entries(pool: &PgPool, limit: u32) -> Result<Vec<PreferenceEntry>> {
	let entries = sqlx::query_as(
		"\
SELECT attribute_key, attribute_value, score, sample_count
FROM preference_entries
ORDER BY score DESC, sample_count DESC, attribute_key, attribute_value
LIMIT $1",
	)
	.bind(i64::from(limit))
	.fetch_all(pool)
	.await?;

	Ok(entries)
}

async fn put_item_vector(pool: &PgPool, item_id: &str, vec: &[f32]) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO item_vectors (item_id, vec, updated_at)
VALUES ($1, $2, now())
ON CONFLICT (item_id) DO UPDATE
SET
	vec = EXCLUDED.vec,
	updated_at = now()",
	)
	.bind(item_id)
	.bind(vec.to_vec())
	.execute(pool)
	.await?;

	Ok(())
}

async fn item_vector(pool: &PgPool, item_id: &str) -> Result<Option<Vec<f32>>> {
	let vec = sqlx::query_scalar("SELECT vec FROM item_vectors WHERE item_id = $1")
		.bind(item_id)
		.fetch_optional(pool)
		.await?;

	Ok(vec)
}

async fn update_user_profile(pool: &PgPool, user_id: &str, liked: &[f32]) -> Result<Vec<f32>> {
	let mut tx = pool.begin().await?;

	// Serializes concurrent folds for the same user; the lock is released
	// when the transaction ends.
	sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
		.bind(user_id)
		.execute(&mut *tx)
		.await?;

	let current: Option<(Vec<f32>, i64)> =
		sqlx::query_as("SELECT vec, like_count FROM user_profiles WHERE user_id = $1")
			.bind(user_id)
			.fetch_optional(&mut *tx)
			.await?;
	let (folded, like_count) = match current {
		None => (liked.to_vec(), 1_i64),
		Some((vec, count)) => {
			if vec.len() != liked.len() {
				return Err(Error::InvalidArgument(format!(
					"Embedding dimension mismatch: profile has {}, incoming has {}.",
					vec.len(),
					liked.len()
				)));
			}

			(palate_domain::ranking::fold_vector_mean(&vec, count as u64, liked), count + 1)
		},
	};

	sqlx::query(
		"\
INSERT INTO user_profiles (user_id, vec, like_count, updated_at)
VALUES ($1, $2, $3, now())
ON CONFLICT (user_id) DO UPDATE
SET
	vec = EXCLUDED.vec,
	like_count = EXCLUDED.like_count,
	updated_at = now()",
	)
	.bind(user_id)
	.bind(&folded)
	.bind(like_count)
	.execute(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok(folded)
}

async fn user_profile(pool: &PgPool, user_id: &str) -> Result<Option<UserProfile>> {
	let profile =
		sqlx::query_as("SELECT user_id, vec, like_count FROM user_profiles WHERE user_id = $1")
			.bind(user_id)
			.fetch_optional(pool)
			.await?;

	Ok(profile)
}
