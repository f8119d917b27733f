use tracing::Level;

/// Logs go to stderr so stdout stays free for reports.
pub fn default_logging(verbose: bool) -> eyre::Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| eyre::eyre!("failed to initialize logging: {e}"))?;

    Ok(())
}
