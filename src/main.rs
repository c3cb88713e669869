use anyhow::Context;
use bookshelf_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        store = ?settings.database.store,
        "bookshelf bootstrap starting"
    );

    bookshelf::serve(&settings).await?;

    tracing::info!("bookshelf shut down cleanly");
    Ok(())
}
