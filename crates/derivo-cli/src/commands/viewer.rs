//! Viewer URL CLI command.

use clap::Args;

use derivo_core::error::AppError;
use derivo_core::types::Urn;
use derivo_derivative::Translator;

/// Arguments for the viewer-url command
#[derive(Debug, Args)]
pub struct ViewerArgs {
    /// URN of the translated design
    pub urn: String,

    /// Local viewer port
    #[arg(short, long, default_value_t = 3000)]
    pub port: u16,
}

/// Execute the viewer-url command
pub async fn execute(args: &ViewerArgs, translator: &Translator) -> Result<(), AppError> {
    let url = translator
        .viewer_url(args.port, &Urn::new(args.urn.clone()))
        .await
        .map_err(AppError::from)?;
    println!("{url}");
    Ok(())
}
