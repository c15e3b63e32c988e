//! CLI command definitions and dispatch.

pub mod manifests;
pub mod metadata;
pub mod run;
pub mod thumbnail;
pub mod translate;
pub mod upload;
pub mod viewer;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use derivo_core::config::AppConfig;
use derivo_core::error::AppError;
use derivo_derivative::Translator;

/// Derivo remote CAD translation pipeline
#[derive(Debug, Parser)]
#[command(name = "derivo", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (selects config/<env>.toml)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full pipeline for one file: upload, translate, retrieve
    Run(run::RunArgs),
    /// Upload a file and print its URN
    Upload(upload::UploadArgs),
    /// Submit a translation job for a URN and poll it to completion
    Translate(translate::TranslateArgs),
    /// Download derivative packages for a completed job
    Manifests(manifests::ManifestsArgs),
    /// Download the thumbnail for a design
    Thumbnail(thumbnail::ThumbnailArgs),
    /// Aggregate the metadata report for a derivative
    Metadata(metadata::MetadataArgs),
    /// Print a local viewer URL carrying a fresh read-only token
    ViewerUrl(viewer::ViewerArgs),
}

impl Cli {
    /// Dispatch the selected command.
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        let translator = Translator::from_config(config)?;
        let cancel = cancel_on_ctrl_c();

        match &self.command {
            Commands::Run(args) => run::execute(args, &translator, &cancel).await,
            Commands::Upload(args) => upload::execute(args, &translator).await,
            Commands::Translate(args) => translate::execute(args, &translator, &cancel).await,
            Commands::Manifests(args) => manifests::execute(args, &translator).await,
            Commands::Thumbnail(args) => thumbnail::execute(args, &translator).await,
            Commands::Metadata(args) => metadata::execute(args, &translator).await,
            Commands::ViewerUrl(args) => viewer::execute(args, &translator).await,
        }
    }
}

/// A token cancelled when the user interrupts the process.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let handle = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling");
            handle.cancel();
        }
    });
    cancel
}
