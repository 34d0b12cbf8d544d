//! Operator tool for the note store: schema bootstrap and lock/archive maintenance.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use scribe_service::{ForceReleaseLockRequest, ScribeService};
use scribe_storage::db::Db;

#[derive(Debug, Parser)]
#[command(
	version = scribe_cli::VERSION,
	rename_all = "kebab",
	styles = scribe_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
#[command(rename_all = "kebab")]
pub enum Command {
	/// Creates or upgrades the schema.
	Migrate,
	/// Shows who holds a note's edit lock and whether the lease is stale.
	LockStatus {
		#[arg(long, value_name = "UUID")]
		note_id: Uuid,
	},
	/// Clears a note's edit lock regardless of holder.
	ForceUnlock {
		#[arg(long, value_name = "UUID")]
		note_id: Uuid,
	},
	/// Lists archived versions of a note, newest first.
	Versions {
		#[arg(long, value_name = "UUID")]
		note_id: Uuid,
		#[arg(long, value_name = "N")]
		limit: Option<u32>,
	},
	/// Trims a note's archive to the configured retention.
	Prune {
		#[arg(long, value_name = "UUID")]
		note_id: Uuid,
	},
}

#[derive(Serialize)]
struct MigrateReport {
	schema: &'static str,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = scribe_config::load(&args.config)?;

	init_tracing(&config)?;

	let db = Db::connect(&config.storage.postgres).await?;
	let service = ScribeService::new(config, db);

	match args.command {
		Command::Migrate => {
			service.db.ensure_schema().await?;

			tracing::info!("Schema is up to date.");

			print_json(&MigrateReport { schema: "ok" })
		},
		Command::LockStatus { note_id } => print_json(&service.admin_lock_status(note_id).await?),
		Command::ForceUnlock { note_id } => print_json(
			&service.force_release_lock(ForceReleaseLockRequest { note_id }).await?,
		),
		Command::Versions { note_id, limit } =>
			print_json(&service.admin_list_versions(note_id, limit).await?),
		Command::Prune { note_id } => print_json(&service.admin_prune_versions(note_id).await?),
	}
}

fn print_json<T>(value: &T) -> color_eyre::Result<()>
where
	T: Serialize,
{
	println!("{}", serde_json::to_string_pretty(value)?);

	Ok(())
}

fn init_tracing(config: &scribe_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

	Ok(())
}
