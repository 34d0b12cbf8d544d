//! Structured note content.
//!
//! Content is an ordered list of typed blocks. On the wire and in storage it is a JSON array whose
//! elements are tagged by `type`:
//!
//! ```json
//! [
//! 	{ "type": "paragraph", "text": "The harbor district floods every spring." },
//! 	{ "type": "checklist", "items": [{ "text": "Map the canals", "checked": false }] }
//! ]
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteContent {
	pub blocks: Vec<Block>,
}
impl NoteContent {
	pub fn new(blocks: Vec<Block>) -> Self {
		Self { blocks }
	}

	/// Parses untrusted JSON. `null` is treated as an empty document.
	pub fn from_value(value: Value) -> Result<Self> {
		if value.is_null() {
			return Ok(Self::default());
		}
		if !value.is_array() {
			return Err(Error::MalformedContent {
				message: "content must be an array of blocks.".to_string(),
			});
		}

		serde_json::from_value(value)
			.map_err(|err| Error::MalformedContent { message: err.to_string() })
	}

	pub fn to_value(&self) -> Value {
		Value::Array(self.blocks.iter().map(Block::to_value).collect())
	}

	pub fn is_empty(&self) -> bool {
		self.blocks.is_empty()
	}

	/// Flips one checklist item and returns its new state.
	///
	/// Both indices must address an existing checklist item; nothing is modified otherwise.
	pub fn toggle_check(&mut self, block_index: usize, item_index: usize) -> Result<bool> {
		let len = self.blocks.len();
		let block = self
			.blocks
			.get_mut(block_index)
			.ok_or(Error::BlockOutOfRange { index: block_index, len })?;
		let Block::Checklist { items } = block else {
			return Err(Error::NotAChecklist { index: block_index });
		};
		let items_len = items.len();
		let item = items.get_mut(item_index).ok_or(Error::ItemOutOfRange {
			block: block_index,
			item: item_index,
			len: items_len,
		})?;

		item.checked = !item.checked;

		Ok(item.checked)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
	Paragraph {
		#[serde(default)]
		text: String,
	},
	Checklist {
		#[serde(default)]
		items: Vec<ChecklistItem>,
	},
}
impl Block {
	pub fn paragraph(text: impl Into<String>) -> Self {
		Self::Paragraph { text: text.into() }
	}

	pub fn checklist(items: Vec<ChecklistItem>) -> Self {
		Self::Checklist { items }
	}

	fn to_value(&self) -> Value {
		match self {
			Self::Paragraph { text } => serde_json::json!({ "type": "paragraph", "text": text }),
			Self::Checklist { items } => serde_json::json!({
				"type": "checklist",
				"items": items
					.iter()
					.map(|item| serde_json::json!({ "text": item.text, "checked": item.checked }))
					.collect::<Vec<_>>(),
			}),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
	pub text: String,
	#[serde(default)]
	pub checked: bool,
}
impl ChecklistItem {
	pub fn new(text: impl Into<String>, checked: bool) -> Self {
		Self { text: text.into(), checked }
	}
}
