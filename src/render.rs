/*!
 * Output of a finished gloss.
 *
 * Text output stacks, for every phrase group, the readings, the characters and
 * the group translation, after the translation of the whole input.
 */

use anyhow::{Context, Result, anyhow};

use crate::translation::GlossSnapshot;

/// Output formats of the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Interlinear plain text
    #[default]
    Text,
    /// Pretty-printed JSON snapshot
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(anyhow!("Invalid output format: {}", s)),
        }
    }
}

/// Render `snapshot` in `format`
pub fn render(snapshot: &GlossSnapshot, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(snapshot)),
        OutputFormat::Json => render_json(snapshot),
    }
}

pub fn render_text(snapshot: &GlossSnapshot) -> String {
    let mut out = String::new();

    if let Some(main) = &snapshot.main_translation {
        out.push_str(&format!("{}: {}\n", snapshot.target_language.name(), main));
    }

    for group in &snapshot.groups {
        out.push('\n');
        let reading = group.reading();
        if !reading.is_empty() {
            out.push_str(&format!("  {}\n", reading));
        }
        out.push_str(&format!("  {}\n", group.text()));
        if let Some(translation) = &group.translation {
            out.push_str(&format!("  = {}\n", translation));
        }
    }

    if let Some(error) = &snapshot.error {
        out.push_str(&format!("\n! {}\n", error));
    }

    out
}

pub fn render_json(snapshot: &GlossSnapshot) -> Result<String> {
    serde_json::to_string_pretty(snapshot).context("Failed to serialize gloss to JSON")
}
