use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = scribe_admin::Args::parse();

	scribe_admin::run(args).await
}
