use std::{
	collections::{BTreeMap, HashMap},
	sync::{Mutex, MutexGuard},
};

use palate_domain::{preference, ranking};

use crate::{
	Attributes, BoxFuture, Error, FeatureStore, PreferenceStore, Result, VectorStore,
	models::{PreferenceEntry, UserProfile},
};

#[derive(Default)]
struct Inner {
	features: HashMap<String, Attributes>,
	preferences: BTreeMap<(String, String), (f64, i64)>,
	item_vectors: HashMap<String, Vec<f32>>,
	profiles: HashMap<String, (Vec<f32>, i64)>,
}

/// Embedded store backed by plain maps.
///
/// Every mutation runs inside one critical section, which gives each key the
/// atomic read-fold-write the running means require.
#[derive(Default)]
pub struct MemoryStore {
	inner: Mutex<Inner>,
}
impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	fn lock(&self) -> MutexGuard<'_, Inner> {
		self.inner.lock().unwrap_or_else(|err| err.into_inner())
	}
}

impl FeatureStore for MemoryStore {
	fn put_attributes<'a>(
		&'a self,
		item_id: &'a str,
		attributes: &'a Attributes,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			self.lock().features.insert(item_id.to_string(), attributes.clone());

			Ok(())
		})
	}

	fn attributes<'a>(&'a self, item_id: &'a str) -> BoxFuture<'a, Result<Option<Attributes>>> {
		Box::pin(async move { Ok(self.lock().features.get(item_id).cloned()) })
	}
}

impl PreferenceStore for MemoryStore {
	fn apply_feedback<'a>(
		&'a self,
		attributes: &'a Attributes,
		weight: f64,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let mut inner = self.lock();

			for (attribute_key, attribute_value) in attributes {
				let slot = inner
					.preferences
					.entry((attribute_key.clone(), attribute_value.clone()))
					.or_insert((0.0, 0));

				slot.0 = preference::fold_score(slot.0, slot.1 as u64, weight);
				slot.1 += 1;
			}

			Ok(())
		})
	}

	fn entry<'a>(
		&'a self,
		attribute_key: &'a str,
		attribute_value: &'a str,
	) -> BoxFuture<'a, Result<Option<PreferenceEntry>>> {
		Box::pin(async move {
			let inner = self.lock();
			let entry = inner
				.preferences
				.get(&(attribute_key.to_string(), attribute_value.to_string()))
				.map(|(score, sample_count)| PreferenceEntry {
					attribute_key: attribute_key.to_string(),
					attribute_value: attribute_value.to_string(),
					score: *score,
					sample_count: *sample_count,
				});

			Ok(entry)
		})
	}

	fn entries_for<'a>(
		&'a self,
		attributes: &'a Attributes,
	) -> BoxFuture<'a, Result<Vec<PreferenceEntry>>> {
		Box::pin(async move {
			let inner = self.lock();
			let entries = attributes
				.iter()
				.filter_map(|(attribute_key, attribute_value)| {
					inner
						.preferences
						.get(&(attribute_key.clone(), attribute_value.clone()))
						.map(|(score, sample_count)| PreferenceEntry {
							attribute_key: attribute_key.clone(),
							attribute_value: attribute_value.clone(),
							score: *score,
							sample_count: *sample_count,
						})
				})
				.collect();

			Ok(entries)
		})
	}

	fn top_entries<'a>(&'a self, limit: u32) -> BoxFuture<'a, Result<Vec<PreferenceEntry>>> {
		Box::pin(async move {
			let inner = self.lock();
			let mut entries: Vec<PreferenceEntry> = inner
				.preferences
				.iter()
				.map(|((attribute_key, attribute_value), (score, sample_count))| {
					PreferenceEntry {
						attribute_key: attribute_key.clone(),
						attribute_value: attribute_value.clone(),
						score: *score,
						sample_count: *sample_count,
					}
				})
				.collect();

			entries.sort_by(|a, b| {
				b.score
					.partial_cmp(&a.score)
					.unwrap_or(std::cmp::Ordering::Equal)
					.then_with(|| b.sample_count.cmp(&a.sample_count))
			});
			entries.truncate(limit as usize);

			Ok(entries)
		})
	}
}

impl VectorStore for MemoryStore {
	fn put_item_vector<'a>(
		&'a self,
		item_id: &'a str,
		vec: &'a [f32],
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			self.lock().item_vectors.insert(item_id.to_string(), vec.to_vec());

			Ok(())
		})
	}

	fn item_vector<'a>(&'a self, item_id: &'a str) -> BoxFuture<'a, Result<Option<Vec<f32>>>> {
		Box::pin(async move { Ok(self.lock().item_vectors.get(item_id).cloned()) })
	}

	fn update_user_profile<'a>(
		&'a self,
		user_id: &'a str,
		liked: &'a [f32],
	) -> BoxFuture<'a, Result<Vec<f32>>> {
		Box::pin(async move {
			let mut inner = self.lock();
			let folded = match inner.profiles.get(user_id) {
				None => (liked.to_vec(), 1_i64),
				Some((vec, count)) => {
					if vec.len() != liked.len() {
						return Err(Error::InvalidArgument(format!(
							"Embedding dimension mismatch: profile has {}, incoming has {}.",
							vec.len(),
							liked.len()
						)));
					}

					(ranking::fold_vector_mean(vec, *count as u64, liked), count + 1)
				},
			};

			inner.profiles.insert(user_id.to_string(), folded.clone());

			Ok(folded.0)
		})
	}

	fn user_profile<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<Option<UserProfile>>> {
		Box::pin(async move {
			let profile = self.lock().profiles.get(user_id).map(|(vec, like_count)| UserProfile {
				user_id: user_id.to_string(),
				vec: vec.clone(),
				like_count: *like_count,
			});

			Ok(profile)
		})
	}
}
