#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use roster_tool::{DocumentStore, FileBackend, http_api};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_tool=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr: SocketAddr = std::env::var("ROSTER_TOOL_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;
    let data_dir = std::env::var("ROSTER_TOOL_DATA_DIR").unwrap_or_else(|_| "./data".to_string());

    let store = DocumentStore::new(FileBackend::new(&data_dir)?);
    tracing::info!(%addr, %data_dir, "roster-tool HTTP API listening");
    http_api::serve(addr, store).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
