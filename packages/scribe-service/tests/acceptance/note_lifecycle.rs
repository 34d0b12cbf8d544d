use serde_json::json;

use scribe_domain::content::Block;
use scribe_service::{
	CreateNoteRequest, DeleteNoteRequest, Error, GetNoteRequest, ToggleCheckRequest,
	UpdateNoteRequest,
};

#[tokio::test]
#[ignore = "Requires external Postgres. Set SCRIBE_PG_DSN to run."]
async fn create_applies_defaults_and_sanitizes_rich_text() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping create_applies_defaults_and_sanitizes_rich_text; set SCRIBE_PG_DSN to run.");

		return;
	};
	let cfg = super::test_config(&test_db);
	let service = super::build_service(cfg).await.expect("Failed to build service.");
	let note = service
		.create_note(CreateNoteRequest {
			campaign_id: super::CAMPAIGN.to_string(),
			owner_id: " alice ".to_string(),
			entity_id: Some("  ".to_string()),
			title: Some("   ".to_string()),
			content: None,
			content_html: Some(
				r#"<p onclick="steal()">Hi</p><script>alert(1)</script>"#.to_string(),
			),
			color: None,
			pinned: false,
			shared: false,
		})
		.await
		.expect("Failed to create note.");

	assert_eq!(note.title, "Untitled");
	assert_eq!(note.owner_id, "alice");
	assert_eq!(note.entity_id, None);
	assert_eq!(note.color, "#fef3c7");
	assert!(note.content.is_empty());
	assert_eq!(note.lock_holder, None);

	let html = note.content_html.expect("Rich text should be stored.");

	assert!(!html.contains("script"), "Unsanitized html: {html}");
	assert!(!html.contains("onclick"), "Unsanitized html: {html}");
	assert!(html.contains("Hi"));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set SCRIBE_PG_DSN to run."]
async fn create_rejects_invalid_input() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping create_rejects_invalid_input; set SCRIBE_PG_DSN to run this test.");

		return;
	};
	let cfg = super::test_config(&test_db);
	let service = super::build_service(cfg).await.expect("Failed to build service.");
	let cases = [
		CreateNoteRequest { campaign_id: " ".to_string(), ..super::create_request("alice", "A", json!([])) },
		super::create_request("alice", &"x".repeat(201), json!([])),
		super::create_request("alice", "Bad content", json!({ "type": "paragraph" })),
		CreateNoteRequest {
			color: Some("teal".to_string()),
			..super::create_request("alice", "Bad color", json!([]))
		},
	];

	for req in cases {
		let err = service.create_note(req).await.expect_err("Expected BadRequest.");

		assert!(matches!(err, Error::BadRequest { .. }), "Unexpected error: {err:?}");
	}

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set SCRIBE_PG_DSN to run."]
async fn update_archives_one_version_and_advances_updated_at() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping update_archives_one_version_and_advances_updated_at; set SCRIBE_PG_DSN to run."
		);

		return;
	};
	let cfg = super::test_config(&test_db);
	let service = super::build_service(cfg).await.expect("Failed to build service.");
	let note = super::shared_note(&service, "alice").await;

	assert_eq!(super::version_count(&service, note.note_id).await, 0);

	let updated = service
		.update_note(UpdateNoteRequest {
			note_id: note.note_id,
			editor_id: "bob".to_string(),
			color: Some("#A7F3D0".to_string()),
			pinned: Some(true),
			..Default::default()
		})
		.await
		.expect("Failed to update note.");

	assert_eq!(updated.color, "#a7f3d0");
	assert!(updated.pinned);
	assert_eq!(updated.title, note.title);
	assert_eq!(updated.content, note.content);
	assert_eq!(updated.last_editor_id.as_deref(), Some("bob"));
	assert!(updated.updated_at > note.updated_at);
	assert_eq!(super::version_count(&service, note.note_id).await, 1);

	let again = service
		.update_note(UpdateNoteRequest {
			note_id: note.note_id,
			editor_id: "bob".to_string(),
			title: Some("Session prep, revised".to_string()),
			..Default::default()
		})
		.await
		.expect("Failed to update note.");

	assert!(again.updated_at > updated.updated_at);
	assert_eq!(super::version_count(&service, note.note_id).await, 2);

	let err = service
		.update_note(UpdateNoteRequest {
			note_id: note.note_id,
			editor_id: "bob".to_string(),
			..Default::default()
		})
		.await
		.expect_err("An update without fields is rejected.");

	assert!(matches!(err, Error::BadRequest { .. }), "Unexpected error: {err:?}");
	assert_eq!(super::version_count(&service, note.note_id).await, 2);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set SCRIBE_PG_DSN to run."]
async fn toggle_flips_one_item_without_archiving() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping toggle_flips_one_item_without_archiving; set SCRIBE_PG_DSN to run.");

		return;
	};
	let cfg = super::test_config(&test_db);
	let service = super::build_service(cfg).await.expect("Failed to build service.");
	let note = super::shared_note(&service, "alice").await;
	let toggled = service
		.toggle_check(ToggleCheckRequest {
			note_id: note.note_id,
			editor_id: "bob".to_string(),
			block_index: 1,
			item_index: 0,
		})
		.await
		.expect("Failed to toggle.");

	assert!(toggled.checked);
	assert_eq!(super::version_count(&service, note.note_id).await, 0);

	let Block::Checklist { items } = &toggled.note.content.blocks[1] else {
		panic!("Block 1 should stay a checklist.");
	};

	assert!(items[0].checked);
	assert!(items[1].checked);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set SCRIBE_PG_DSN to run."]
async fn toggle_out_of_range_is_rejected_without_change() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping toggle_out_of_range_is_rejected_without_change; set SCRIBE_PG_DSN to run.");

		return;
	};
	let cfg = super::test_config(&test_db);
	let service = super::build_service(cfg).await.expect("Failed to build service.");
	let note = service
		.create_note(super::create_request(
			"alice",
			"One block",
			json!([{ "type": "checklist", "items": [{ "text": "Only item", "checked": false }] }]),
		))
		.await
		.expect("Failed to create note.");

	for (block_index, item_index) in [(2, 5), (0, 5)] {
		let err = service
			.toggle_check(ToggleCheckRequest {
				note_id: note.note_id,
				editor_id: "alice".to_string(),
				block_index,
				item_index,
			})
			.await
			.expect_err("Out-of-range toggle must fail.");

		assert!(matches!(err, Error::BadRequest { .. }), "Unexpected error: {err:?}");
	}

	let reread = service
		.get_note(GetNoteRequest { note_id: note.note_id, requester_id: "alice".to_string() })
		.await
		.expect("Failed to get note.");

	assert_eq!(reread.content, note.content);
	assert_eq!(reread.updated_at, note.updated_at);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set SCRIBE_PG_DSN to run."]
async fn delete_removes_note_and_its_versions() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping delete_removes_note_and_its_versions; set SCRIBE_PG_DSN to run.");

		return;
	};
	let cfg = super::test_config(&test_db);
	let service = super::build_service(cfg).await.expect("Failed to build service.");
	let note = super::shared_note(&service, "alice").await;

	service
		.update_note(UpdateNoteRequest {
			note_id: note.note_id,
			editor_id: "alice".to_string(),
			shared: Some(false),
			..Default::default()
		})
		.await
		.expect("Failed to update note.");

	let err = service
		.delete_note(DeleteNoteRequest { note_id: note.note_id, requester_id: "bob".to_string() })
		.await
		.expect_err("Bob cannot see a private note.");

	assert!(matches!(err, Error::NotFound { .. }), "Unexpected error: {err:?}");

	let deleted = service
		.delete_note(DeleteNoteRequest { note_id: note.note_id, requester_id: "alice".to_string() })
		.await
		.expect("Failed to delete note.");

	assert!(deleted.deleted);
	assert_eq!(super::version_count(&service, note.note_id).await, 0);

	let err = service
		.get_note(GetNoteRequest { note_id: note.note_id, requester_id: "alice".to_string() })
		.await
		.expect_err("Deleted note must be gone.");

	assert!(matches!(err, Error::NotFound { .. }), "Unexpected error: {err:?}");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
