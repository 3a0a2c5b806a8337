//! Rendering of decoded responses.
//!
//! Human output keeps the `SUCCESS:`/`ERROR:` layout users of the mail
//! service expect. JSON output serialises the decoded result unchanged.

mod render;

use clap::ValueEnum;
use postern_proto::DecodedResult;

use crate::AppError;

pub use render::render_human_output;

/// Output format for decoded responses.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// `SUCCESS:`/`ERROR:` text.
    #[default]
    Human,
    /// One JSON document per response.
    Json,
}

/// Renders `result` in the requested format, newline terminated.
pub(crate) fn render(format: OutputFormat, result: &DecodedResult) -> Result<String, AppError> {
    match format {
        OutputFormat::Human => Ok(render_human_output(result)),
        OutputFormat::Json => {
            let mut text = serde_json::to_string(result).map_err(AppError::SerialiseResponse)?;
            text.push('\n');
            Ok(text)
        }
    }
}
