use anyhow::Context;
use clap::Parser;
use m3u8dl::{BatchDownloader, JobOutcome};
use m3u8dl_cli::M3u8DlArgs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = M3u8DlArgs::parse();
    pretty_env_logger::formatted_builder()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    let config = args.download_config()?;
    let client = args.client(&config)?;
    let input = tokio::fs::read_to_string(&args.list)
        .await
        .with_context(|| format!("Failed to read {}", args.list.display()))?;

    let downloader = BatchDownloader::new(config, client, args.muxer());
    let report = downloader.run_input(&input).await?;

    for job in &report.jobs {
        if let JobOutcome::Finalized { path, .. } = &job.outcome {
            println!("{}", path.display());
        }
    }

    Ok(())
}
