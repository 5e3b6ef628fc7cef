use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub storage: Storage,
	#[serde(default)]
	pub feedback: Feedback,
	#[serde(default)]
	pub ranking: Ranking,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Feedback {
	/// Weight folded into preference entries for a "like". Must be positive.
	pub like_weight: f64,
	/// Weight folded into preference entries for a "dislike". Must be negative.
	pub dislike_weight: f64,
}
impl Default for Feedback {
	fn default() -> Self {
		Self { like_weight: 1.0, dislike_weight: -1.0 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Ranking {
	/// Share of the blended score taken by embedding similarity; the
	/// attribute-match score takes the remainder.
	pub vector_weight: f64,
}
impl Default for Ranking {
	fn default() -> Self {
		Self { vector_weight: 0.7 }
	}
}
