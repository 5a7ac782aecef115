//! Logging bootstrap.

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber. `RUST_LOG` directives override `level`.
pub fn init(level: &str, json: bool) -> Result<()> {
    let level = parse_level(level)?;

    let mut filter = EnvFilter::from_default_env().add_directive(level.into());
    for directive in ["hyper=warn", "reqwest=warn"] {
        filter = filter.add_directive(directive.parse()?);
    }

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
    Ok(())
}

fn parse_level(level: &str) -> Result<Level> {
    level
        .parse()
        .with_context(|| format!("invalid log level {:?} (expected trace, debug, info, warn or error)", level))
}
