use book_registry::application::controller::{RegistryController, UiTiming};
use book_registry::infra::memory_store::{Latency, MemoryBookStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("book_registry=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let store = MemoryBookStore::new(Latency::default());
    let controller = RegistryController::new(store, UiTiming::default());
    book_registry::interface::console::run(controller).await
}
