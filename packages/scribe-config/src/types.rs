use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub notes: Notes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

/// Tunables of the note editor core.
#[derive(Debug, Clone, Deserialize)]
pub struct Notes {
	/// Seconds without a heartbeat after which an edit lock may be reclaimed by anyone.
	#[serde(default = "default_lock_stale_after_secs")]
	pub lock_stale_after_secs: u64,
	/// Maximum number of snapshots kept per note. Older snapshots are pruned first.
	#[serde(default = "default_version_retention")]
	pub version_retention: u32,
	#[serde(default = "default_max_title_chars")]
	pub max_title_chars: u32,
	/// Title stored when a caller supplies a blank one.
	#[serde(default = "default_title")]
	pub default_title: String,
	/// `#rrggbb` color used when a caller supplies none.
	#[serde(default = "default_color")]
	pub default_color: String,
	#[serde(default = "default_version_list_limit")]
	pub default_version_list_limit: u32,
}
impl Default for Notes {
	fn default() -> Self {
		Self {
			lock_stale_after_secs: default_lock_stale_after_secs(),
			version_retention: default_version_retention(),
			max_title_chars: default_max_title_chars(),
			default_title: default_title(),
			default_color: default_color(),
			default_version_list_limit: default_version_list_limit(),
		}
	}
}

fn default_lock_stale_after_secs() -> u64 {
	300
}

fn default_version_retention() -> u32 {
	50
}

fn default_max_title_chars() -> u32 {
	200
}

fn default_title() -> String {
	"Untitled".to_string()
}

fn default_color() -> String {
	"#fef3c7".to_string()
}

fn default_version_list_limit() -> u32 {
	20
}
