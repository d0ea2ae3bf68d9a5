//! Configuration status command.

use console::style;

use suratai::config::API_KEY_VARS;
use suratai::{GeminiConfig, LetterAssistant};

/// Report whether the assistant can reach Gemini.
pub fn cmd_status(config: &GeminiConfig, assistant: &LetterAssistant) -> anyhow::Result<()> {
    println!("\n{}", style("Gemini Status").bold());
    println!("{}", "-".repeat(50));

    let key_status = if assistant.is_available() {
        style("✓ configured").green()
    } else {
        style("✗ not configured").red()
    };
    println!("  {:<15} {}", "API key", key_status);
    if !assistant.is_available() {
        println!(
            "                  {}",
            style(format!("Set one of: {}", API_KEY_VARS.join(", "))).dim()
        );
    }

    println!("  {:<15} {}", "Model", config.model);
    println!("  {:<15} {}", "Endpoint", config.endpoint);
    println!("  {:<15} {}s", "Timeout", config.timeout_secs);
    println!();

    Ok(())
}
