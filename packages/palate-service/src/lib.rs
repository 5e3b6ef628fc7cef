pub mod feedback;
pub mod preferences;
pub mod scoring;

mod error;

pub use error::{Error, Result};
pub use feedback::{FeedbackEvent, FeedbackKind, FeedbackOutcome, FeedbackProcessor};
pub use preferences::PreferenceModel;
pub use scoring::{ScoredItem, ScoringEngine};

use palate_config::Config;
use palate_storage::{Stores, models::PreferenceEntry};

/// Profile key for the degenerate single-user deployment.
pub const DEFAULT_USER_ID: &str = "default";

/// Composition root facade: owns the configuration and wires the feedback
/// and scoring components over one set of store handles.
pub struct PalateService {
	pub cfg: Config,
	feedback: FeedbackProcessor,
	scoring: ScoringEngine,
	preferences: PreferenceModel,
}
impl PalateService {
	pub fn new(cfg: Config, stores: Stores) -> Self {
		let preferences = PreferenceModel::new(stores.preferences.clone());
		let feedback = FeedbackProcessor::new(
			stores.features.clone(),
			preferences.clone(),
			stores.vectors.clone(),
			&cfg.feedback,
			DEFAULT_USER_ID,
		);
		let scoring = ScoringEngine::new(
			stores.features,
			preferences.clone(),
			stores.vectors,
			&cfg.ranking,
			DEFAULT_USER_ID,
		);

		Self { cfg, feedback, scoring, preferences }
	}

	pub async fn process_feedback(
		&self,
		item_id: &str,
		kind: FeedbackKind,
	) -> Result<FeedbackOutcome> {
		self.feedback.process(item_id, kind).await
	}

	pub async fn process_batch_feedback(&self, events: &[FeedbackEvent]) -> Vec<FeedbackOutcome> {
		self.feedback.process_batch(events).await
	}

	pub async fn score(&self, item_id: &str) -> Result<f64> {
		self.scoring.score(item_id).await
	}

	pub async fn score_many(&self, item_ids: &[String]) -> Result<Vec<ScoredItem>> {
		self.scoring.score_many(item_ids).await
	}

	pub async fn rank(&self, item_ids: &[String]) -> Result<Vec<ScoredItem>> {
		self.scoring.rank(item_ids).await
	}

	pub async fn attribute_score(
		&self,
		attribute_key: &str,
		attribute_value: &str,
	) -> Result<Option<PreferenceEntry>> {
		self.preferences.attribute_score(attribute_key, attribute_value).await
	}

	pub async fn top_preferences(&self, limit: u32) -> Result<Vec<PreferenceEntry>> {
		self.preferences.top_preferences(limit).await
	}
}
