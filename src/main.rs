use std::fs;
use std::sync::Arc;
use taxonomy_admin::api;
use taxonomy_admin::logger::*;
use taxonomy_admin::server::*;
use taxonomy_admin::settings::*;
use tokio::signal;
use warp::Filter;

fn require_file(label: &str, path: &str) -> anyhow::Result<()> {
    if !fs::metadata(path)?.is_file() {
        return Err(anyhow::anyhow!("TLS {} is not a regular file: {:?}", label, path));
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("could not listen for SIGINT: {e}");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    info!(?project_settings);
    logger.reload_from_config(&LogConfig::from(&project_settings.log))?;

    let address: std::net::SocketAddr = project_settings.http.address.parse()?;
    let tls = match (
        project_settings.http.cert_path.as_deref(),
        project_settings.http.key_path.as_deref(),
    ) {
        (Some(cert), Some(key)) => {
            require_file("cert", cert)?;
            require_file("key", key)?;
            Some((cert.to_string(), key.to_string()))
        }
        (None, None) => None,
        _ => return Err(anyhow::anyhow!("http.cert_path and http.key_path go together")),
    };

    let server = Arc::new(Server::try_new(&project_settings).await?);

    let admin = warp::path("admin")
        .and(api::admin::routes(server.clone()))
        .recover(api::admin::recover_error)
        .with(warp::trace::request());

    match tls {
        Some((cert, key)) => {
            info!(%address, "listening (tls)");
            warp::serve(admin)
                .tls()
                .cert_path(cert)
                .key_path(key)
                .bind_with_graceful_shutdown(address, shutdown_signal())
                .1
                .await;
        }
        None => {
            info!(%address, "listening");
            let (_, serving) = warp::serve(admin)
                .try_bind_with_graceful_shutdown(address, shutdown_signal())?;
            serving.await;
        }
    }

    let shutdown_timeout = std::time::Duration::from_secs(30);
    match tokio::time::timeout(shutdown_timeout, server.shutdown()).await {
        Ok(_) => info!("server shutdown successfully"),
        Err(_) => error!("server shutdown timed out"),
    }

    Ok(())
}
