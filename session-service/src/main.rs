use service_core::observability::init_tracing;
use session_service::config::SessionConfig;
use session_service::startup::Application;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info,session_service=debug");

    let config = SessionConfig::load()?;
    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    Ok(())
}
