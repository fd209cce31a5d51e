use anyhow::Context;
use bookshelf_app::modules::{self, books::store::BookStore};
use bookshelf_kernel::{settings::Settings, InitCtx};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;

    bookshelf_telemetry::init(&settings.telemetry)
        .with_context(|| "failed to initialize telemetry")?;

    tracing::info!(
        env = ?settings.environment,
        addr = %settings.server.bind_addr(),
        "bookshelf-app bootstrap starting"
    );

    let registry = modules::registry(BookStore::new().arc());
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    tracing::info!("bookshelf-app bootstrap complete");

    let served =
        bookshelf_http::start_server(&registry, &settings, bookshelf_http::shutdown_signal()).await;

    registry.stop_all().await?;
    served
}
