use std::sync::LazyLock;

use regex::{Captures, Regex};

static ACTIVE_ELEMENTS: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"(?is)<\s*(script|style|iframe|object|embed|applet)\b[^>]*>.*?<\s*/\s*(script|style|iframe|object|embed|applet)\s*>",
	)
	.expect("active element pattern must compile")
});
static STRAY_ACTIVE_TAGS: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"(?i)<\s*/?\s*(script|style|iframe|object|embed|applet|frame|frameset|base|link|meta)\b[^>]*>",
	)
	.expect("stray tag pattern must compile")
});
// Quoted attribute values may contain `>`.
static TAGS: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"<[A-Za-z][^"'>]*(?:(?:"[^"]*"|'[^']*')[^"'>]*)*>"#)
		.expect("tag pattern must compile")
});
// HTML accepts `/` and a closing quote as attribute separators, not only whitespace.
static EVENT_HANDLERS: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"(?i)([\s/"'])on[a-z0-9_:-]+\s*=\s*("[^"]*"|'[^']*'|[^\s"'>]+)"#)
		.expect("event handler pattern must compile")
});
static URL_ATTRIBUTES: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r#"(?i)([\s/"'])(href|src|action|formaction|xlink:href|poster|background)\s*=\s*("[^"]*"|'[^']*'|[^\s"'>]+)"#,
	)
	.expect("url attribute pattern must compile")
});
static CHAR_REFS: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?i)&#x([0-9a-f]+);?|&#([0-9]+);?|&(colon|tab|newline);")
		.expect("character reference pattern must compile")
});

const SCRIPT_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:text/html"];

/// Removes executable markup from a rich-text mirror.
///
/// This is the fallback scrub applied before storage when no richer sanitizer is configured. It
/// drops script-capable elements with their bodies, inline event handlers, and links whose scheme
/// can run code once character references are decoded. The scrub repeats until the output stops
/// changing, so markup reassembled by one removal is caught by the next pass.
pub fn scrub_rich_text(html: &str) -> String {
	let mut current = scrub_once(html);

	// A pass that changes the text always shortens it, so this reaches a fixed point.
	loop {
		let next = scrub_once(&current);

		if next == current {
			return current;
		}

		current = next;
	}
}

fn scrub_once(html: &str) -> String {
	let without_elements = ACTIVE_ELEMENTS.replace_all(html, "");
	let without_tags = STRAY_ACTIVE_TAGS.replace_all(&without_elements, "");

	TAGS.replace_all(&without_tags, |caps: &Captures| scrub_tag(&caps[0])).into_owned()
}

fn scrub_tag(tag: &str) -> String {
	let without_handlers = EVENT_HANDLERS.replace_all(tag, |caps: &Captures| {
		let separator = &caps[1];

		if separator.trim().is_empty() { String::new() } else { separator.to_string() }
	});

	URL_ATTRIBUTES
		.replace_all(&without_handlers, |caps: &Captures| {
			if is_script_url(&caps[3]) {
				format!("{}{}=\"#\"", &caps[1], &caps[2])
			} else {
				caps[0].to_string()
			}
		})
		.into_owned()
}

fn is_script_url(raw: &str) -> bool {
	let value = raw.trim_matches(|c| c == '"' || c == '\'');
	let normalized = decode_char_refs(value)
		.chars()
		.filter(|c| !c.is_whitespace() && !c.is_control())
		.collect::<String>()
		.to_ascii_lowercase();

	SCRIPT_SCHEMES.iter().any(|scheme| normalized.starts_with(scheme))
}

fn decode_char_refs(value: &str) -> String {
	CHAR_REFS
		.replace_all(value, |caps: &Captures| {
			let decoded = if let Some(hex) = caps.get(1) {
				u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
			} else if let Some(dec) = caps.get(2) {
				dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
			} else {
				match caps[3].to_ascii_lowercase().as_str() {
					"colon" => Some(':'),
					"tab" => Some('\t'),
					_ => Some('\n'),
				}
			};

			decoded.map(String::from).unwrap_or_else(|| caps[0].to_string())
		})
		.into_owned()
}
