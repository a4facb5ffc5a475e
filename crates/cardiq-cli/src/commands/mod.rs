//! CLI subcommands.

pub mod batch;
pub mod extract;

use std::path::Path;
use std::sync::Arc;

use cardiq_core::{BankRegistry, BanksConfig, StatementParser};

/// Build a parser from an optional banks config path. A missing path falls
/// back to the built-in issuer profiles; a present-but-broken file is an
/// error worth surfacing.
pub fn build_parser(banks_path: Option<&str>) -> anyhow::Result<StatementParser> {
    let parser = match banks_path {
        Some(path) => {
            let config = BanksConfig::from_file(Path::new(path))?;
            let registry = BankRegistry::from_config(&config)?;
            StatementParser::new(Arc::new(registry))
                .with_scoring(config.scoring)
                .with_date_order(config.date_order)
        }
        None => StatementParser::new(Arc::new(BankRegistry::builtin())),
    };
    Ok(parser)
}
