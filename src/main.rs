use anyhow::Context;
use booklib_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load booklib settings")?;
    booklib_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        backend = ?settings.database.backend,
        "booklib-app bootstrap starting"
    );

    booklib_app::bootstrap::serve(&settings).await
}
