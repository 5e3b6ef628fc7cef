use std::sync::Arc;

use serde::{Deserialize, Serialize};

use palate_storage::{FeatureStore, VectorStore};

use crate::{Result, preferences::PreferenceModel};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
	Like,
	Dislike,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FeedbackEvent {
	pub item_id: String,
	pub kind: FeedbackKind,
}

#[derive(Clone, Debug, Serialize)]
pub struct FeedbackOutcome {
	pub item_id: String,
	/// True once the preference fold completed. False means the item had no
	/// stored attributes and nothing changed.
	pub applied: bool,
	/// True when a like also folded the item's embedding into the profile.
	pub profile_updated: bool,
	pub error: Option<String>,
}
impl FeedbackOutcome {
	fn skipped(item_id: &str) -> Self {
		Self {
			item_id: item_id.to_string(),
			applied: false,
			profile_updated: false,
			error: None,
		}
	}
}

/// Single entry point that drives the preference model and the user profile
/// consistently for one feedback event.
pub struct FeedbackProcessor {
	features: Arc<dyn FeatureStore>,
	preferences: PreferenceModel,
	vectors: Arc<dyn VectorStore>,
	like_weight: f64,
	dislike_weight: f64,
	user_id: String,
}
impl FeedbackProcessor {
	pub fn new(
		features: Arc<dyn FeatureStore>,
		preferences: PreferenceModel,
		vectors: Arc<dyn VectorStore>,
		cfg: &palate_config::Feedback,
		user_id: &str,
	) -> Self {
		Self {
			features,
			preferences,
			vectors,
			like_weight: cfg.like_weight,
			dislike_weight: cfg.dislike_weight,
			user_id: user_id.to_string(),
		}
	}

	/// Applies one feedback event.
	///
	/// Feedback on an item with no stored attributes is a skip, not an error:
	/// there is nothing to attribute the signal to. A like on an item with
	/// attributes but no embedding still updates tag preferences; the profile
	/// step is skipped. Storage failures propagate as errors.
	pub async fn process(&self, item_id: &str, kind: FeedbackKind) -> Result<FeedbackOutcome> {
		let Some(attributes) = self.features.attributes(item_id).await? else {
			tracing::debug!(item_id, "Feedback on an item with no stored attributes; skipped.");

			return Ok(FeedbackOutcome::skipped(item_id));
		};
		let weight = match kind {
			FeedbackKind::Like => self.like_weight,
			FeedbackKind::Dislike => self.dislike_weight,
		};

		self.preferences.record_feedback(&attributes, weight).await?;

		let mut profile_updated = false;

		if kind == FeedbackKind::Like {
			match self.vectors.item_vector(item_id).await? {
				Some(embedding) => {
					self.vectors.update_user_profile(&self.user_id, &embedding).await?;

					profile_updated = true;
				},
				None => {
					tracing::debug!(
						item_id,
						"Like on an item with no embedding; profile left unchanged."
					);
				},
			}
		}

		Ok(FeedbackOutcome {
			item_id: item_id.to_string(),
			applied: true,
			profile_updated,
			error: None,
		})
	}

	/// Processes events strictly in input order, one event fully completed
	/// before the next begins. A failure is reported on its own outcome and
	/// does not abort the rest of the batch.
	pub async fn process_batch(&self, events: &[FeedbackEvent]) -> Vec<FeedbackOutcome> {
		let mut outcomes = Vec::with_capacity(events.len());

		for event in events {
			let outcome = match self.process(&event.item_id, event.kind).await {
				Ok(outcome) => outcome,
				Err(err) => {
					tracing::warn!(
						item_id = event.item_id.as_str(),
						error = %err,
						"Feedback event failed."
					);

					FeedbackOutcome {
						item_id: event.item_id.clone(),
						applied: false,
						profile_updated: false,
						error: Some(err.to_string()),
					}
				},
			};

			outcomes.push(outcome);
		}

		outcomes
	}
}
