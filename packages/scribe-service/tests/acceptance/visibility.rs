use serde_json::json;

use scribe_service::{
	CreateNoteRequest, Error, GetNoteRequest, ListNotesRequest, ListScope, ScribeService,
	UpdateNoteRequest,
};

async fn create(
	service: &ScribeService,
	owner_id: &str,
	title: &str,
	entity_id: Option<&str>,
	shared: bool,
	pinned: bool,
) {
	service
		.create_note(CreateNoteRequest {
			entity_id: entity_id.map(str::to_string),
			shared,
			pinned,
			..super::create_request(owner_id, title, json!([]))
		})
		.await
		.expect("Failed to create note.");
}

async fn titles(service: &ScribeService, requester_id: &str, scope: ListScope) -> Vec<String> {
	service
		.list_notes(ListNotesRequest {
			campaign_id: super::CAMPAIGN.to_string(),
			requester_id: requester_id.to_string(),
			scope,
		})
		.await
		.expect("Failed to list notes.")
		.items
		.into_iter()
		.map(|note| note.title)
		.collect()
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set SCRIBE_PG_DSN to run."]
async fn listing_shows_own_and_shared_notes_per_scope() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping listing_shows_own_and_shared_notes_per_scope; set SCRIBE_PG_DSN to run.");

		return;
	};
	let cfg = super::test_config(&test_db);
	let service = super::build_service(cfg).await.expect("Failed to build service.");

	create(&service, "alice", "Alice private", None, false, false).await;
	create(&service, "alice", "Alice shared", None, true, false).await;
	create(&service, "bob", "Bob private", None, false, false).await;
	create(&service, "bob", "Bob pinned", None, false, true).await;
	create(&service, "alice", "Mirela secrets", Some("npc_mirela"), false, false).await;
	create(&service, "alice", "Mirela public", Some("npc_mirela"), true, false).await;

	assert_eq!(
		titles(&service, "bob", ListScope::CampaignWide).await,
		vec!["Bob pinned", "Bob private", "Alice shared"]
	);
	assert_eq!(
		titles(&service, "bob", ListScope::Entity { entity_id: "npc_mirela".to_string() }).await,
		vec!["Mirela public"]
	);
	assert_eq!(
		titles(&service, "alice", ListScope::Entity { entity_id: "npc_mirela".to_string() }).await,
		vec!["Mirela public", "Mirela secrets"]
	);
	assert_eq!(titles(&service, "bob", ListScope::Campaign).await.len(), 4);
	assert_eq!(titles(&service, "alice", ListScope::Campaign).await.len(), 4);

	let err = service
		.list_notes(ListNotesRequest {
			campaign_id: "  ".to_string(),
			requester_id: "alice".to_string(),
			scope: ListScope::Campaign,
		})
		.await
		.expect_err("A blank campaign is rejected.");

	assert!(matches!(err, Error::BadRequest { .. }), "Unexpected error: {err:?}");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set SCRIBE_PG_DSN to run."]
async fn private_notes_look_missing_to_other_members() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping private_notes_look_missing_to_other_members; set SCRIBE_PG_DSN to run.");

		return;
	};
	let cfg = super::test_config(&test_db);
	let service = super::build_service(cfg).await.expect("Failed to build service.");
	let note = service
		.create_note(CreateNoteRequest {
			shared: false,
			..super::create_request("alice", "Plot twist", json!([]))
		})
		.await
		.expect("Failed to create note.");
	let get_err = service
		.get_note(GetNoteRequest { note_id: note.note_id, requester_id: "bob".to_string() })
		.await
		.expect_err("Private note must be hidden.");
	let update_err = service
		.update_note(UpdateNoteRequest {
			note_id: note.note_id,
			editor_id: "bob".to_string(),
			title: Some("Spoiled".to_string()),
			..Default::default()
		})
		.await
		.expect_err("Private note must be hidden.");

	assert!(matches!(get_err, Error::NotFound { .. }), "Unexpected error: {get_err:?}");
	assert!(matches!(update_err, Error::NotFound { .. }), "Unexpected error: {update_err:?}");
	assert_eq!(super::version_count(&service, note.note_id).await, 0);

	service
		.update_note(UpdateNoteRequest {
			note_id: note.note_id,
			editor_id: "alice".to_string(),
			shared: Some(true),
			..Default::default()
		})
		.await
		.expect("Owner should be able to share.");

	let seen = service
		.get_note(GetNoteRequest { note_id: note.note_id, requester_id: "bob".to_string() })
		.await
		.expect("Shared note is visible.");

	assert_eq!(seen.title, "Plot twist");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
