use std::{cmp::Ordering, sync::Arc};

use serde::Serialize;

use palate_domain::ranking;
use palate_storage::{FeatureStore, VectorStore};

use crate::{Result, preferences::PreferenceModel};

#[derive(Clone, Debug, Serialize)]
pub struct ScoredItem {
	pub item_id: String,
	pub score: f64,
}

/// Produces the blended ranking score used to order the digest and the feed.
pub struct ScoringEngine {
	features: Arc<dyn FeatureStore>,
	preferences: PreferenceModel,
	vectors: Arc<dyn VectorStore>,
	vector_weight: f64,
	user_id: String,
}
impl ScoringEngine {
	pub fn new(
		features: Arc<dyn FeatureStore>,
		preferences: PreferenceModel,
		vectors: Arc<dyn VectorStore>,
		cfg: &palate_config::Ranking,
		user_id: &str,
	) -> Self {
		Self {
			features,
			preferences,
			vectors,
			vector_weight: cfg.vector_weight,
			user_id: user_id.to_string(),
		}
	}

	/// Blended score for one item.
	///
	/// Unanalyzed items score a neutral `0.0`. Vector blending requires both
	/// an item embedding and a user profile; when either is absent the
	/// attribute-match score is returned unmodified.
	pub async fn score(&self, item_id: &str) -> Result<f64> {
		let Some(attributes) = self.features.attributes(item_id).await? else {
			return Ok(0.0);
		};
		let tag_score = self.preferences.match_score(&attributes).await?;
		let Some(item_vec) = self.vectors.item_vector(item_id).await? else {
			return Ok(tag_score);
		};
		let Some(profile) = self.vectors.user_profile(&self.user_id).await? else {
			return Ok(tag_score);
		};
		let similarity = ranking::cosine_similarity(&profile.vec, &item_vec);

		Ok(ranking::blend(tag_score, similarity, self.vector_weight))
	}

	/// Scores a page of items, preserving input order.
	pub async fn score_many(&self, item_ids: &[String]) -> Result<Vec<ScoredItem>> {
		let mut scored = Vec::with_capacity(item_ids.len());

		for item_id in item_ids {
			let score = self.score(item_id).await?;

			scored.push(ScoredItem { item_id: item_id.clone(), score });
		}

		Ok(scored)
	}

	/// Scores and sorts descending. The sort is stable, so ties keep the
	/// caller-supplied input order.
	pub async fn rank(&self, item_ids: &[String]) -> Result<Vec<ScoredItem>> {
		let mut scored = self.score_many(item_ids).await?;

		scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

		Ok(scored)
	}
}
