//! Interactive restyling tool.
//!
//! Prompts for an input image and a description, runs the first-pass
//! generation at preview resolution, and saves the result locally.
//! Progress goes to stdout; diagnostics go through `tracing`.

use std::io::{self, Write};
use std::path::Path;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use restyle_core::prompt::validate_prompt;
use restyle_leonardo::api::LeonardoApi;
use restyle_leonardo::config::{LeonardoConfig, WorkflowSettings};
use restyle_leonardo::download::download_to_file;
use restyle_leonardo::workflow::{ImageWorkflow, WorkflowError};

/// Where the restyled image ends up.
const OUTPUT_PATH: &str = "output/restyled.png";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "restyle_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = LeonardoConfig::from_env().context("LEONARDO_API_KEY must be set")?;
    let workflow = ImageWorkflow::new(LeonardoApi::new(config), WorkflowSettings::preview());

    let image_path = prompt_line("Path to input image: ")?;
    let image = tokio::fs::read(&image_path)
        .await
        .with_context(|| format!("Failed to read '{image_path}'"))?;
    let extension = Path::new(&image_path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("png")
        .to_string();

    let prompt = prompt_line("Describe the new look: ")?;
    validate_prompt(&prompt)?;

    println!("Uploading image and submitting generation...");
    match workflow.run_preview(image, &extension, &prompt).await {
        Ok(generated) => {
            println!("Generation complete, downloading result...");
            download_to_file(workflow.api(), &generated.url, Path::new(OUTPUT_PATH)).await?;
            println!("Saved restyled image to {OUTPUT_PATH}");
        }
        Err(err @ WorkflowError::NoImagesGenerated) => {
            // The one failure worth a friendly message: the job ran but
            // produced nothing. Everything else aborts the run.
            println!("{err}");
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}

/// Print a label and read one trimmed line from stdin.
fn prompt_line(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
