//! One function per subcommand.
use anyhow::{Context, Result};
use ppi_collect::{collect_tweets, CollectOptions};
use ppi_core::time::{format_timestamp, parse_cli_timestamp};
use ppi_core::{Settings, SubjectSet, TimeRange};
use ppi_out::{read_records, write_records, write_site, SiteConfig};
use ppi_query::{extract_profanity, ElasticsearchClient, ExtractionRequest};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::cli::{Cli, Commands};

pub async fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::from_env().context("loading settings")?;
    if let Some(host) = cli.es_host {
        settings.elasticsearch_host = host;
    }

    match cli.command {
        Commands::Collect {
            input,
            elasticsearch_index,
            drop_index,
            batch_size,
        } => {
            let index = elasticsearch_index.unwrap_or_else(|| settings.elasticsearch_index.clone());
            let options = CollectOptions {
                batch_size,
                drop_index,
            };
            collect(&settings, input.as_deref(), &index, options).await
        }
        Commands::Extract {
            start,
            end,
            track,
            elasticsearch_index,
            output,
        } => {
            let index = elasticsearch_index.unwrap_or_else(|| settings.elasticsearch_index.clone());
            extract(&settings, &start, &end, track, &index, output).await
        }
        Commands::Build {
            data_file,
            config_file,
            output_dir,
        } => build(&data_file, &config_file, &output_dir),
        Commands::Serve { data_file, addr } => {
            let addr = addr.unwrap_or_else(|| settings.listen_addr.clone());
            serve(&data_file, &addr).await
        }
    }
}

fn client(settings: &Settings) -> Result<ElasticsearchClient> {
    ElasticsearchClient::new(&settings.elasticsearch_host, settings.request_timeout)
        .with_context(|| format!("connecting to {}", settings.elasticsearch_host))
}

async fn collect(
    settings: &Settings,
    input: Option<&Path>,
    index: &str,
    options: CollectOptions,
) -> Result<()> {
    let client = client(settings)?;
    let stats = match input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("opening {}", path.display()))?;
            info!("Reading tweets from {}.", path.display());
            collect_tweets(&client, index, tokio::io::BufReader::new(file), options).await?
        }
        None => {
            info!("Reading tweets from stdin.");
            collect_tweets(&client, index, tokio::io::BufReader::new(tokio::io::stdin()), options)
                .await?
        }
    };
    info!(
        succeeded = stats.succeeded,
        failed = stats.failed,
        skipped = stats.skipped,
        "Collection finished."
    );
    Ok(())
}

async fn extract(
    settings: &Settings,
    start: &str,
    end: &str,
    track: Vec<String>,
    index: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let start = parse_cli_timestamp(start).context("START")?;
    let end = parse_cli_timestamp(end).context("END")?;
    let subjects = SubjectSet::new(track).context("--track")?;
    let request = ExtractionRequest::with_default_mapping(TimeRange::new(start, end), subjects)?;

    info!(
        "Extracting profanity between {} and {} for {} in {}.",
        format_timestamp(&start),
        format_timestamp(&end),
        request.subjects().iter().collect::<Vec<_>>().join(", "),
        index
    );
    let client = client(settings)?;
    let records = extract_profanity(&client, index, &request).await?;

    match output.filter(|p| p.as_os_str() != "-") {
        Some(path) => {
            info!("Writing to {}.", path.display());
            let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
            write_records(BufWriter::new(file), &records)?;
        }
        None => {
            info!("Writing to stdout.");
            write_records(std::io::stdout().lock(), &records)?;
        }
    }
    info!("Wrote {} rows.", records.len());
    Ok(())
}

fn build(data_file: &Path, config_file: &Path, output_dir: &Path) -> Result<()> {
    let config = SiteConfig::load(config_file)
        .with_context(|| format!("reading site config {}", config_file.display()))?;
    let index = write_site(output_dir, data_file, &config)
        .with_context(|| format!("building site in {}", output_dir.display()))?;
    info!("Site written to {}.", index.display());
    Ok(())
}

async fn serve(data_file: &Path, addr: &str) -> Result<()> {
    let file = File::open(data_file).with_context(|| format!("opening {}", data_file.display()))?;
    let records = read_records(BufReader::new(file))
        .with_context(|| format!("reading {}", data_file.display()))?;
    info!("Loaded {} rows from {}.", records.len(), data_file.display());
    ppi_api::run(addr, records).await?;
    Ok(())
}
