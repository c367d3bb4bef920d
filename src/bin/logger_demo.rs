use taxonomy_admin::logger::*;
use taxonomy_admin::settings::*;

fn main() -> anyhow::Result<()> {
    let logger = Logger::new_bootstrap();
    debug!("bootstrap debug log (hidden)");
    info!("bootstrap info log");

    let cli = Cli::parse();
    let config = match parse_settings(cli.settings.as_deref()) {
        Ok(settings) => LogConfig::from(&settings.log),
        Err(e) => {
            warn!("falling back to debug filter: {e}");
            LogConfig {
                filter: "debug".to_string(),
            }
        }
    };
    logger.reload_from_config(&config)?;
    info!(filter = %config.filter, "filter reloaded");
    debug!("application debug log");
    trace!("application trace log");

    let bad = LogConfig {
        filter: "taxonomy_admin=[".to_string(),
    };
    info!(rejected = logger.reload_from_config(&bad).is_err(), "bad filter");

    Ok(())
}
