//! Command-line argument structures.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Recast: batch media transcoding tool",
    long_about = "Walks a directory tree of media files, transcodes each into WebM and MP4 \
                  targets, composites animated previews, and optionally publishes outputs \
                  to an object store or local mirror."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transcodes media files from an input tree into an output tree
    Run(RunArgs),
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Directory tree containing input media files
    #[arg(short = 'i', long = "input", required = true, value_name = "INPUT_DIR")]
    pub input_root: PathBuf,

    /// Root directory where converted files will be written
    #[arg(short = 'o', long = "output", required = true, value_name = "OUTPUT_DIR")]
    pub output_root: PathBuf,

    /// Number of files processed concurrently
    #[arg(short = 'j', long, value_name = "N", default_value_t = 4, env = "RECAST_JOBS")]
    pub jobs: usize,

    /// Comma-separated extension allow-list (defaults to common video types)
    #[arg(long, value_delimiter = ',', value_name = "EXTS")]
    pub extensions: Option<Vec<String>>,

    /// Skip the WebM target
    #[arg(long)]
    pub no_webm: bool,

    /// Skip the MP4 target
    #[arg(long)]
    pub no_mp4: bool,

    /// Skip animated preview generation
    #[arg(long)]
    pub no_thumbnails: bool,

    /// Also export stream/format metadata JSON next to each output
    #[arg(long)]
    pub metadata: bool,

    /// Audio codec for the MP4 profile
    #[arg(long, value_name = "CODEC", default_value = "aac")]
    pub audio_codec: String,

    /// Path to the encoder binary
    #[arg(long, value_name = "PATH", default_value = "ffmpeg", env = "RECAST_ENCODER")]
    pub encoder: PathBuf,

    /// Path to the prober binary
    #[arg(long, value_name = "PATH", default_value = "ffprobe", env = "RECAST_PROBER")]
    pub prober: PathBuf,

    /// Publish outputs to the remote object store
    #[arg(long, conflicts_with = "mirror_to")]
    pub upload: bool,

    /// Publish outputs by mirroring into a local directory instead
    #[arg(long, value_name = "DIR")]
    pub mirror_to: Option<PathBuf>,

    /// Bucket (namespace) published objects land under
    #[arg(long, value_name = "BUCKET", default_value = "media", env = "RECAST_BUCKET")]
    pub bucket: String,

    /// Base URL of the remote object store
    #[arg(long, value_name = "URL", env = "RECAST_STORE_ENDPOINT")]
    pub store_endpoint: Option<String>,

    /// Bearer token for the remote object store
    #[arg(long, value_name = "TOKEN", env = "RECAST_STORE_TOKEN", hide_env_values = true)]
    pub store_token: Option<String>,
}
