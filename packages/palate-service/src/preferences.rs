use std::sync::Arc;

use palate_storage::{Attributes, PreferenceStore, models::PreferenceEntry};

use crate::Result;

/// Attribute-level preference scores learned from feedback.
#[derive(Clone)]
pub struct PreferenceModel {
	store: Arc<dyn PreferenceStore>,
}
impl PreferenceModel {
	pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
		Self { store }
	}

	/// Folds one signed feedback weight into every pair of `attributes`.
	///
	/// Pairs absent from `attributes` are left untouched. There is no
	/// deduplication by event identity; callers must not replay the same
	/// feedback event twice.
	pub async fn record_feedback(&self, attributes: &Attributes, weight: f64) -> Result<()> {
		if attributes.is_empty() {
			return Ok(());
		}

		self.store.apply_feedback(attributes, weight).await?;

		tracing::debug!(pairs = attributes.len(), weight, "Folded feedback into preferences.");

		Ok(())
	}

	pub async fn attribute_score(
		&self,
		attribute_key: &str,
		attribute_value: &str,
	) -> Result<Option<PreferenceEntry>> {
		Ok(self.store.entry(attribute_key, attribute_value).await?)
	}

	/// Average confidence-weighted strength of the positive entries matching
	/// a candidate item's attributes.
	pub async fn match_score(&self, attributes: &Attributes) -> Result<f64> {
		let entries = self.store.entries_for(attributes).await?;

		Ok(palate_domain::preference::match_score(
			entries.iter().map(|entry| (entry.score, entry.sample_count as u64)),
		))
	}

	/// Highest-scored learned preferences, for digest summaries.
	pub async fn top_preferences(&self, limit: u32) -> Result<Vec<PreferenceEntry>> {
		Ok(self.store.top_entries(limit).await?)
	}
}
