pub mod db;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod schema;

mod error;

pub use error::Error;

use std::{collections::BTreeMap, future::Future, pin::Pin, sync::Arc};

use crate::models::{PreferenceEntry, UserProfile};

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Flat attribute mapping extracted from one content item by the external
/// analyzer. Written wholesale; never merged field by field.
pub type Attributes = BTreeMap<String, String>;

pub trait FeatureStore
where
	Self: Send + Sync,
{
	/// Upserts the full attribute mapping for an item. Re-analysis replaces
	/// the mapping wholesale.
	fn put_attributes<'a>(
		&'a self,
		item_id: &'a str,
		attributes: &'a Attributes,
	) -> BoxFuture<'a, Result<()>>;

	fn attributes<'a>(&'a self, item_id: &'a str) -> BoxFuture<'a, Result<Option<Attributes>>>;
}

pub trait PreferenceStore
where
	Self: Send + Sync,
{
	/// Folds one signed feedback weight into the running mean of every
	/// attribute pair in `attributes`, creating entries on first contact.
	/// Each pair's read-fold-write must be atomic per key.
	fn apply_feedback<'a>(
		&'a self,
		attributes: &'a Attributes,
		weight: f64,
	) -> BoxFuture<'a, Result<()>>;

	fn entry<'a>(
		&'a self,
		attribute_key: &'a str,
		attribute_value: &'a str,
	) -> BoxFuture<'a, Result<Option<PreferenceEntry>>>;

	/// Stored entries for exactly the pairs present in `attributes`; pairs
	/// never seen by feedback are absent from the result.
	fn entries_for<'a>(
		&'a self,
		attributes: &'a Attributes,
	) -> BoxFuture<'a, Result<Vec<PreferenceEntry>>>;

	fn top_entries<'a>(&'a self, limit: u32) -> BoxFuture<'a, Result<Vec<PreferenceEntry>>>;
}

pub trait VectorStore
where
	Self: Send + Sync,
{
	/// Upsert; last write wins for a given item.
	fn put_item_vector<'a>(
		&'a self,
		item_id: &'a str,
		vec: &'a [f32],
	) -> BoxFuture<'a, Result<()>>;

	fn item_vector<'a>(&'a self, item_id: &'a str) -> BoxFuture<'a, Result<Option<Vec<f32>>>>;

	/// Folds a liked item's embedding into the user's running-mean profile
	/// and returns the new profile vector. An absent profile is installed as
	/// the liked vector itself with a count of one.
	fn update_user_profile<'a>(
		&'a self,
		user_id: &'a str,
		liked: &'a [f32],
	) -> BoxFuture<'a, Result<Vec<f32>>>;

	fn user_profile<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<Option<UserProfile>>>;
}

/// The three store handles the service layer is wired with.
#[derive(Clone)]
pub struct Stores {
	pub features: Arc<dyn FeatureStore>,
	pub preferences: Arc<dyn PreferenceStore>,
	pub vectors: Arc<dyn VectorStore>,
}
impl Stores {
	pub fn postgres(db: &db::Db) -> Self {
		let store = Arc::new(postgres::PgStore::new(db.pool.clone()));

		Self { features: store.clone(), preferences: store.clone(), vectors: store }
	}

	pub fn in_memory() -> Self {
		let store = Arc::new(memory::MemoryStore::new());

		Self { features: store.clone(), preferences: store.clone(), vectors: store }
	}
}
