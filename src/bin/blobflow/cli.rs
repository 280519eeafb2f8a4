// CLI argument definitions using clap

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "blobflow")]
#[command(author = "hatlonely <hatlonely@foxmail.com>")]
#[command(version = "0.1.0")]
#[command(about = "Azure Blob Storage exercise: create a container, upload, list and download a blob", long_about = None)]
pub struct Cli {
    /// Path to config file (default: ~/.blobflow/config.yaml, used only if present)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Exit without waiting for Enter
    #[arg(long)]
    pub no_pause: bool,
}
