use std::collections::BTreeMap;

use palate_storage::{Attributes, Error, Stores};

fn attributes(pairs: &[(&str, &str)]) -> Attributes {
	pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect::<BTreeMap<_, _>>()
}

#[tokio::test]
async fn feedback_folds_into_a_running_mean() {
	let stores = Stores::in_memory();
	let attrs = attributes(&[("scene_type", "indoor")]);

	for weight in [1.0, 1.0, -1.0, 1.0] {
		stores.preferences.apply_feedback(&attrs, weight).await.expect("Failed to apply feedback.");
	}

	let entry = stores
		.preferences
		.entry("scene_type", "indoor")
		.await
		.expect("Failed to read entry.")
		.expect("Expected a stored entry.");

	assert!((entry.score - 0.5).abs() < 1e-12);
	assert_eq!(entry.sample_count, 4);
}

#[tokio::test]
async fn feedback_touches_only_the_given_pairs() {
	let stores = Stores::in_memory();

	stores
		.preferences
		.apply_feedback(&attributes(&[("tag", "cat")]), 1.0)
		.await
		.expect("Failed to apply feedback.");
	stores
		.preferences
		.apply_feedback(&attributes(&[("tag", "dog")]), -1.0)
		.await
		.expect("Failed to apply feedback.");

	let cat = stores
		.preferences
		.entry("tag", "cat")
		.await
		.expect("Failed to read entry.")
		.expect("Expected the cat entry.");

	assert_eq!(cat.score, 1.0);
	assert_eq!(cat.sample_count, 1);
}

#[tokio::test]
async fn entries_for_returns_only_stored_pairs() {
	let stores = Stores::in_memory();

	stores
		.preferences
		.apply_feedback(&attributes(&[("scene_type", "indoor")]), 1.0)
		.await
		.expect("Failed to apply feedback.");

	let candidate = attributes(&[("scene_type", "indoor"), ("tag", "never_seen")]);
	let entries =
		stores.preferences.entries_for(&candidate).await.expect("Failed to read entries.");

	assert_eq!(entries.len(), 1);
	assert_eq!(entries[0].attribute_key, "scene_type");
}

#[tokio::test]
async fn top_entries_orders_by_score_then_samples() {
	let stores = Stores::in_memory();

	stores
		.preferences
		.apply_feedback(&attributes(&[("tag", "cat"), ("tag_b", "dog")]), 1.0)
		.await
		.expect("Failed to apply feedback.");
	stores
		.preferences
		.apply_feedback(&attributes(&[("tag_b", "dog")]), 1.0)
		.await
		.expect("Failed to apply feedback.");
	stores
		.preferences
		.apply_feedback(&attributes(&[("tag_c", "bird")]), -1.0)
		.await
		.expect("Failed to apply feedback.");

	let top = stores.preferences.top_entries(2).await.expect("Failed to read top entries.");

	assert_eq!(top.len(), 2);
	// Both liked pairs sit at score 1.0; the one with more samples leads.
	assert_eq!(top[0].attribute_key, "tag_b");
	assert_eq!(top[1].attribute_key, "tag");
}

#[tokio::test]
async fn attributes_are_replaced_wholesale() {
	let stores = Stores::in_memory();

	stores
		.features
		.put_attributes("post_1", &attributes(&[("scene_type", "indoor"), ("tag", "cat")]))
		.await
		.expect("Failed to store attributes.");
	stores
		.features
		.put_attributes("post_1", &attributes(&[("scene_type", "outdoor")]))
		.await
		.expect("Failed to replace attributes.");

	let stored = stores
		.features
		.attributes("post_1")
		.await
		.expect("Failed to read attributes.")
		.expect("Expected stored attributes.");

	assert_eq!(stored.len(), 1);
	assert_eq!(stored.get("scene_type").map(String::as_str), Some("outdoor"));
}

#[tokio::test]
async fn item_vector_last_write_wins() {
	let stores = Stores::in_memory();

	stores.vectors.put_item_vector("post_1", &[1.0, 0.0]).await.expect("Failed to store vector.");
	stores.vectors.put_item_vector("post_1", &[0.0, 1.0]).await.expect("Failed to store vector.");

	let vec = stores
		.vectors
		.item_vector("post_1")
		.await
		.expect("Failed to read vector.")
		.expect("Expected a stored vector.");

	assert_eq!(vec, vec![0.0, 1.0]);
}

#[tokio::test]
async fn profile_folds_liked_embeddings_in_order() {
	let stores = Stores::in_memory();

	let first = stores
		.vectors
		.update_user_profile("default", &[1.0, 0.0])
		.await
		.expect("Failed to fold first like.");

	assert_eq!(first, vec![1.0, 0.0]);

	let second = stores
		.vectors
		.update_user_profile("default", &[0.0, 1.0])
		.await
		.expect("Failed to fold second like.");

	assert_eq!(second, vec![0.5, 0.5]);

	let profile = stores
		.vectors
		.user_profile("default")
		.await
		.expect("Failed to read profile.")
		.expect("Expected a profile.");

	assert_eq!(profile.like_count, 2);
	assert_eq!(profile.vec, vec![0.5, 0.5]);
}

#[tokio::test]
async fn profile_rejects_dimension_mismatch() {
	let stores = Stores::in_memory();

	stores
		.vectors
		.update_user_profile("default", &[1.0, 0.0])
		.await
		.expect("Failed to fold first like.");

	let err = stores
		.vectors
		.update_user_profile("default", &[1.0, 0.0, 0.0])
		.await
		.expect_err("Expected a dimension mismatch error.");

	assert!(matches!(err, Error::InvalidArgument(_)));

	let profile = stores
		.vectors
		.user_profile("default")
		.await
		.expect("Failed to read profile.")
		.expect("Expected a profile.");

	assert_eq!(profile.like_count, 1);
	assert_eq!(profile.vec, vec![1.0, 0.0]);
}

#[tokio::test]
async fn missing_rows_read_as_absent() {
	let stores = Stores::in_memory();

	assert!(
		stores.features.attributes("ghost").await.expect("Failed to read attributes.").is_none()
	);
	assert!(
		stores
			.preferences
			.entry("scene_type", "indoor")
			.await
			.expect("Failed to read entry.")
			.is_none()
	);
	assert!(stores.vectors.item_vector("ghost").await.expect("Failed to read vector.").is_none());
	assert!(
		stores.vectors.user_profile("default").await.expect("Failed to read profile.").is_none()
	);
}
