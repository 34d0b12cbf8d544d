use crate::{Error, Result};
use scribe_config::is_hex_color;

/// Trims a caller-supplied title, substituting `default_title` when it is missing or blank.
pub fn normalize_title(raw: Option<&str>, default_title: &str, max_chars: u32) -> Result<String> {
	let trimmed = raw.map(str::trim).unwrap_or("");
	let title = if trimmed.is_empty() { default_title.trim() } else { trimmed };

	if title.chars().count() as u32 > max_chars {
		return Err(Error::TitleTooLong { max: max_chars });
	}

	Ok(title.to_string())
}

/// Normalizes a display color to lowercase `#rrggbb`, substituting `default_color` when blank.
pub fn normalize_color(raw: Option<&str>, default_color: &str) -> Result<String> {
	let trimmed = raw.map(str::trim).unwrap_or("");
	let color = if trimmed.is_empty() { default_color.trim() } else { trimmed };

	if !is_hex_color(color) {
		return Err(Error::InvalidColor);
	}

	Ok(color.to_ascii_lowercase())
}

/// Trims an optional identifier, collapsing blank values to `None`.
pub fn optional_id(raw: Option<&str>) -> Option<String> {
	raw.map(str::trim).filter(|value| !value.is_empty()).map(str::to_string)
}
