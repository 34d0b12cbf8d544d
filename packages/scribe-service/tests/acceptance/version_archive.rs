use serde_json::json;

use scribe_service::{
	Error, GetVersionRequest, ListVersionsRequest, RestoreVersionRequest, UpdateNoteRequest,
};

#[tokio::test]
#[ignore = "Requires external Postgres. Set SCRIBE_PG_DSN to run."]
async fn restoring_twice_is_stable_and_archives_each_time() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping restoring_twice_is_stable_and_archives_each_time; set SCRIBE_PG_DSN to run."
		);

		return;
	};
	let cfg = super::test_config(&test_db);
	let service = super::build_service(cfg).await.expect("Failed to build service.");
	let original = super::shared_note(&service, "alice").await;

	service
		.update_note(UpdateNoteRequest {
			note_id: original.note_id,
			editor_id: "bob".to_string(),
			title: Some("Rewritten".to_string()),
			content: Some(json!([{ "type": "paragraph", "text": "Nothing survives." }])),
			..Default::default()
		})
		.await
		.expect("Failed to update note.");

	let listed = service
		.list_versions(ListVersionsRequest {
			note_id: original.note_id,
			requester_id: "alice".to_string(),
			limit: None,
		})
		.await
		.expect("Failed to list versions.");

	assert_eq!(listed.items.len(), 1);

	let version = &listed.items[0];

	assert_eq!(version.editor_id, "bob");
	assert_eq!(version.title, original.title);
	assert_eq!(version.content, original.content);

	let before = super::version_count(&service, original.note_id).await;

	for _ in 0..2 {
		let restored = service
			.restore_version(RestoreVersionRequest {
				note_id: original.note_id,
				version_id: version.version_id,
				editor_id: "carol".to_string(),
			})
			.await
			.expect("Failed to restore version.");

		assert_eq!(restored.title, original.title);
		assert_eq!(restored.content, original.content);
		assert_eq!(restored.last_editor_id.as_deref(), Some("carol"));
	}

	assert_eq!(super::version_count(&service, original.note_id).await, before + 2);

	let fetched = service
		.get_version(GetVersionRequest {
			version_id: version.version_id,
			requester_id: "carol".to_string(),
		})
		.await
		.expect("Failed to get version.");

	assert_eq!(fetched.note_id, original.note_id);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set SCRIBE_PG_DSN to run."]
async fn archive_never_exceeds_retention() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping archive_never_exceeds_retention; set SCRIBE_PG_DSN to run this test.");

		return;
	};
	let mut cfg = super::test_config(&test_db);

	cfg.notes.version_retention = 3;

	let service = super::build_service(cfg).await.expect("Failed to build service.");
	let note = super::shared_note(&service, "alice").await;

	for i in 0..6 {
		service
			.update_note(UpdateNoteRequest {
				note_id: note.note_id,
				editor_id: "alice".to_string(),
				title: Some(format!("Draft {i}")),
				..Default::default()
			})
			.await
			.expect("Failed to update note.");

		assert!(super::version_count(&service, note.note_id).await <= 3);
	}

	let listed = service
		.list_versions(ListVersionsRequest {
			note_id: note.note_id,
			requester_id: "alice".to_string(),
			limit: Some(10),
		})
		.await
		.expect("Failed to list versions.");
	let titles = listed.items.iter().map(|version| version.title.as_str()).collect::<Vec<_>>();

	assert_eq!(titles, vec!["Draft 4", "Draft 3", "Draft 2"]);

	let err = service
		.list_versions(ListVersionsRequest {
			note_id: note.note_id,
			requester_id: "alice".to_string(),
			limit: Some(0),
		})
		.await
		.expect_err("A zero limit is rejected.");

	assert!(matches!(err, Error::BadRequest { .. }), "Unexpected error: {err:?}");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set SCRIBE_PG_DSN to run."]
async fn restoring_another_notes_version_is_rejected() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping restoring_another_notes_version_is_rejected; set SCRIBE_PG_DSN to run.");

		return;
	};
	let cfg = super::test_config(&test_db);
	let service = super::build_service(cfg).await.expect("Failed to build service.");
	let first = super::shared_note(&service, "alice").await;
	let second = super::shared_note(&service, "alice").await;

	service
		.update_note(UpdateNoteRequest {
			note_id: first.note_id,
			editor_id: "alice".to_string(),
			title: Some("Changed".to_string()),
			..Default::default()
		})
		.await
		.expect("Failed to update note.");

	let version = service
		.list_versions(ListVersionsRequest {
			note_id: first.note_id,
			requester_id: "alice".to_string(),
			limit: Some(1),
		})
		.await
		.expect("Failed to list versions.")
		.items
		.remove(0);
	let err = service
		.restore_version(RestoreVersionRequest {
			note_id: second.note_id,
			version_id: version.version_id,
			editor_id: "alice".to_string(),
		})
		.await
		.expect_err("Cross-note restore must fail.");

	assert!(matches!(err, Error::BadRequest { .. }), "Unexpected error: {err:?}");
	assert_eq!(super::version_count(&service, second.note_id).await, 0);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set SCRIBE_PG_DSN to run."]
async fn archive_failures_do_not_block_writes() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping archive_failures_do_not_block_writes; set SCRIBE_PG_DSN to run this test.");

		return;
	};
	let cfg = super::test_config(&test_db);
	let service = super::build_service(cfg).await.expect("Failed to build service.");
	let note = super::shared_note(&service, "alice").await;

	service
		.update_note(UpdateNoteRequest {
			note_id: note.note_id,
			editor_id: "alice".to_string(),
			title: Some("Before".to_string()),
			..Default::default()
		})
		.await
		.expect("Failed to update note.");

	let version = service
		.list_versions(ListVersionsRequest {
			note_id: note.note_id,
			requester_id: "alice".to_string(),
			limit: Some(1),
		})
		.await
		.expect("Failed to list versions.")
		.items
		.remove(0);

	super::break_version_archive(&service).await;

	let updated = service
		.update_note(UpdateNoteRequest {
			note_id: note.note_id,
			editor_id: "bob".to_string(),
			title: Some("After".to_string()),
			..Default::default()
		})
		.await
		.expect("Update must succeed without an archived version.");

	assert_eq!(updated.title, "After");
	assert_eq!(updated.last_editor_id.as_deref(), Some("bob"));
	assert_eq!(super::version_count(&service, note.note_id).await, 1);

	let restored = service
		.restore_version(RestoreVersionRequest {
			note_id: note.note_id,
			version_id: version.version_id,
			editor_id: "carol".to_string(),
		})
		.await
		.expect("Restore must succeed without an archived version.");

	assert_eq!(restored.title, note.title);
	assert_eq!(restored.content, note.content);
	assert_eq!(restored.last_editor_id.as_deref(), Some("carol"));
	assert_eq!(super::version_count(&service, note.note_id).await, 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
