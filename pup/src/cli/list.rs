use clap::Args;
use colored::Colorize;
use prettytable::{format, Cell, Row, Table};
use pup_common::catalog::FileSpec;
use pup_common::config::Config;
use pup_common::error::Result;
use pup_core::VersionLedger;

#[derive(Args, Debug, Clone)]
pub struct List;

impl List {
    /// Prints the catalog. Never creates or rewrites the ledger.
    pub async fn run(&self, config: &Config) -> Result<()> {
        let ledger = if config.ledger_path().is_file() {
            Some(VersionLedger::load(config.ledger_path())?)
        } else {
            None
        };
        let recorded = |file: &str| {
            ledger
                .as_ref()
                .and_then(|l| l.get(file))
                .map_or_else(|| "-".dimmed().to_string(), |v| v.to_string())
        };

        if config.catalog.is_empty() {
            println!("{}", "No plugins are configured".yellow());
            return Ok(());
        }

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
        table.add_row(Row::new(vec![
            Cell::new("Kind").style_spec("b"),
            Cell::new("File").style_spec("b"),
            Cell::new("Recorded").style_spec("b"),
            Cell::new("Source").style_spec("b"),
        ]));

        let mut files = 0;
        for (index, raw) in config.catalog.iter().enumerate() {
            let entry = match raw.validate(index) {
                Ok(entry) => entry,
                Err(e) => {
                    table.add_row(Row::new(vec![
                        Cell::new(&"invalid".red().to_string()),
                        Cell::new("-"),
                        Cell::new("-"),
                        Cell::new(&e.to_string()),
                    ]));
                    continue;
                }
            };
            let names: Vec<&str> = match &entry.files {
                FileSpec::Single(name) => vec![name.as_str()],
                FileSpec::Indexed(map) => map.values().map(String::as_str).collect(),
            };
            for name in names {
                files += 1;
                table.add_row(Row::new(vec![
                    Cell::new(&entry.kind.to_string()),
                    Cell::new(name),
                    Cell::new(&recorded(name)),
                    Cell::new(&entry.source),
                ]));
            }
        }

        table.printstd();
        println!(
            "{} entries, {} files, plugin directory {}",
            config.catalog.len().to_string().bold(),
            files.to_string().bold(),
            config.plugin_dir().display()
        );
        Ok(())
    }
}
