pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("Title must be at most {max} characters.")]
	TitleTooLong { max: u32 },
	#[error("Color must be a #rrggbb hex value.")]
	InvalidColor,
	#[error("Content is malformed: {message}")]
	MalformedContent { message: String },
	#[error("Block index {index} is out of range; note has {len} blocks.")]
	BlockOutOfRange { index: usize, len: usize },
	#[error("Block {index} is not a checklist.")]
	NotAChecklist { index: usize },
	#[error("Item index {item} is out of range for block {block}; checklist has {len} items.")]
	ItemOutOfRange { block: usize, item: usize, len: usize },
	#[error("Lock holder and acquisition time must be set together.")]
	TornLock,
}
