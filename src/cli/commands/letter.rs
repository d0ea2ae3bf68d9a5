//! Letter summarization and extraction commands.

use std::path::Path;

use anyhow::Context;

use suratai::LetterAssistant;

use crate::cli::helpers::{print_json, read_input};

/// Print a one-sentence summary.
pub async fn cmd_summarize(assistant: &LetterAssistant, file: Option<&Path>) -> anyhow::Result<()> {
    let text = read_input(file).await?;
    println!("{}", assistant.summarize(&text).await);
    Ok(())
}

/// Print extracted metadata as JSON, or `null` when extraction failed.
pub async fn cmd_extract(assistant: &LetterAssistant, file: Option<&Path>) -> anyhow::Result<()> {
    let text = read_input(file).await?;
    let metadata = assistant.extract_metadata(&text).await;
    print_json(&metadata)
}

/// Analyze a scanned document and print its metadata as JSON.
pub async fn cmd_scan(
    assistant: &LetterAssistant,
    file: &Path,
    mime: Option<&str>,
) -> anyhow::Result<()> {
    let metadata = match mime {
        Some(mime_type) => {
            let (data, _) = suratai::letter::encode_document(file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            assistant.extract_metadata_from_image(&data, mime_type).await
        }
        None => assistant.extract_metadata_from_file(file).await,
    }
    .with_context(|| format!("Failed to analyze {}", file.display()))?;

    print_json(&metadata)
}
