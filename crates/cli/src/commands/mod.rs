//! Subcommand implementations.

pub mod demo;
pub mod quote;

use thiserror::Error;

use cartwheel_engine::checkout::OrderSummary;
use cartwheel_engine::OperationError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to render sample image: {0}")]
    SampleImage(#[from] image::ImageError),
}

/// Print an order summary as pretty JSON or as text lines.
///
/// # Errors
///
/// Returns an error if JSON encoding fails.
pub fn print_summary(summary: &OrderSummary, json: bool) -> Result<(), CommandError> {
    let lines = if json {
        vec![serde_json::to_string_pretty(summary)?]
    } else {
        render_summary(summary)
    };
    #[allow(clippy::print_stdout)]
    {
        for line in lines {
            println!("{line}");
        }
    }
    Ok(())
}

/// Render a summary as human-readable lines.
pub fn render_summary(summary: &OrderSummary) -> Vec<String> {
    let mut out: Vec<String> = summary
        .lines
        .iter()
        .map(|line| {
            format!(
                "{} x{} @ ${:.2} + {} ${:.2} = ${:.2} | {}",
                line.name,
                line.quantity,
                line.unit_price,
                line.shipping,
                line.shipping_cost,
                line.line_total,
                line.confirmation
            )
        })
        .collect();
    out.push(format!(
        "Total over distance {}: ${:.2}",
        summary.distance, summary.total
    ));
    out
}
