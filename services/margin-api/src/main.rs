//! margin-api Service - Margin Intelligence REST API

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    marginiq_bootstrap::run("config", margin_api::build_app).await
}
