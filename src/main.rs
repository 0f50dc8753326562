use anyhow::Result;

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    websum::cli::run().await
}
