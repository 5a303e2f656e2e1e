//! Command-line arguments.
use clap::{Parser, Subcommand};
use ppi_collect::DEFAULT_BATCH_SIZE;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "profanity-power-index", version)]
#[command(about = "Tracks profanity aimed at public figures on Twitter", long_about = None)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Elasticsearch URL. Default: http://localhost:9200
    #[arg(long, global = true, env = "ELASTICSEARCH_HOST")]
    pub es_host: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Stores profane tweets from a newline-delimited JSON dump in Elasticsearch
    Collect {
        /// Tweet dump, one streaming-API payload per line. Default: stdin
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Index to save the tweets to. Default: profanity-power-index
        #[arg(short, long, env = "ELASTICSEARCH_INDEX")]
        elasticsearch_index: Option<String>,

        /// Drop the index before collecting
        #[arg(short, long)]
        drop_index: bool,

        /// Documents per bulk write
        #[arg(short, long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,
    },

    /// Extracts per-minute profanity counts into a CSV file
    Extract {
        /// Start as YYYY-mm-ddTHH:MM:SS with optional +/-ZZZZ offset. Default zone: local
        start: String,

        /// End as YYYY-mm-ddTHH:MM:SS with optional +/-ZZZZ offset. Default zone: local
        end: String,

        /// A subject to track. Repeat for more; at least one is required
        #[arg(short, long = "track", required = true)]
        track: Vec<String>,

        /// Index to pull the data from. Default: profanity-power-index
        #[arg(short, long, env = "ELASTICSEARCH_INDEX")]
        elasticsearch_index: Option<String>,

        /// Output file. Default: stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Builds the static visualization site
    Build {
        /// CSV file produced by `extract`
        data_file: PathBuf,

        /// Site configuration, JSON or YAML
        config_file: PathBuf,

        /// Directory to render the site to
        #[arg(long)]
        output_dir: PathBuf,
    },

    /// Serves the dashboard data API over a CSV report
    Serve {
        /// CSV file produced by `extract`
        data_file: PathBuf,

        /// Listen address. Default: 0.0.0.0:8787
        #[arg(long, env = "PPI_ADDR")]
        addr: Option<String>,
    },
}
