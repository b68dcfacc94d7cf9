//! Landsat metadata API server binary.

use landsat_api::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ApiConfig::load()?;

    // Start server
    landsat_api::start_server(config).await?;

    Ok(())
}
