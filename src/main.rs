use anyhow::{Context, Result};
use precis::{api, config, logging, pipeline};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Ports probed when `SERVER_PORT` is not set.
const PORT_RANGE: std::ops::RangeInclusive<u16> = 7700..=7799;

#[tokio::main]
async fn main() -> Result<()> {
    config::init_config();
    logging::init_tracing();
    let app = api::create_router(Arc::new(pipeline::SummaryService::new()));

    let (listener, port) = bind_listener().await?;
    tracing::info!("Listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

async fn bind_listener() -> Result<(TcpListener, u16)> {
    if let Some(port) = config::get_config().server_port {
        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
            .await
            .with_context(|| format!("failed to bind port {port}"))?;
        return Ok((listener, port));
    }

    for port in PORT_RANGE {
        match TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await {
            Ok(listener) => {
                tracing::debug!(port, "Bound server port");
                return Ok((listener, port));
            }
            Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => continue,
            Err(err) => {
                return Err(err).with_context(|| format!("failed to bind port {port}"));
            }
        }
    }

    anyhow::bail!(
        "no available port in range {}-{}",
        PORT_RANGE.start(),
        PORT_RANGE.end()
    )
}
