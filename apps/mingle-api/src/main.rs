use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = mingle_api::Args::parse();
	mingle_api::run(args).await
}
