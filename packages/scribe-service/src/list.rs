use serde::{Deserialize, Serialize};

use crate::{Error, NoteResponse, Result, ScribeService};
use scribe_storage::notes::{self, EntityFilter, VisibilityFilter};

/// Which notes of a campaign a listing covers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListScope {
	/// Notes not attached to any subject entity.
	#[default]
	CampaignWide,
	Entity {
		entity_id: String,
	},
	/// Everything visible in the campaign.
	Campaign,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListNotesRequest {
	pub campaign_id: String,
	pub requester_id: String,
	#[serde(default)]
	pub scope: ListScope,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListNotesResponse {
	pub items: Vec<NoteResponse>,
}

impl ScribeService {
	/// Pinned notes first, then most recently updated.
	pub async fn list_notes(&self, req: ListNotesRequest) -> Result<ListNotesResponse> {
		let campaign_id = crate::required_id(&req.campaign_id, "campaign_id")?;
		let requester_id = crate::required_id(&req.requester_id, "requester_id")?;
		let entity = match &req.scope {
			ListScope::CampaignWide => EntityFilter::Unattached,
			ListScope::Campaign => EntityFilter::Any,
			ListScope::Entity { entity_id } => {
				let entity_id = entity_id.trim();

				if entity_id.is_empty() {
					return Err(Error::BadRequest {
						message: "entity_id must be non-empty for an entity scope.".to_string(),
					});
				}

				EntityFilter::Only(entity_id)
			},
		};
		let items = notes::list_visible_notes(
			&self.db.pool,
			VisibilityFilter { campaign_id, requester_id, entity },
		)
		.await?
		.into_iter()
		.map(NoteResponse::try_from)
		.collect::<Result<Vec<_>>>()?;

		Ok(ListNotesResponse { items })
	}
}
