use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Result};
use clap::Parser;
use ledger_client::{config::load_settings, TopShotSetQuery};
use set_view::{
    set_columns, ColumnKey, LoadOutcome, SetViewPipeline, SortDirection, SortSpec, TableConfig,
    TableSink, ViewState,
};
use shared::domain::SetId;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod terminal;

use terminal::TerminalTable;

#[derive(Parser, Debug)]
#[command(about = "Show the editions of a Top Shot set")]
struct Args {
    #[arg(long)]
    set_id: u32,
    /// Settings file; `set_viewer.toml` is used when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// One-based page number.
    #[arg(long, default_value_t = 1)]
    page: usize,
    #[arg(long)]
    page_size: Option<usize>,
    #[arg(long)]
    sort: Option<ColumnKey>,
    #[arg(long)]
    order: Option<SortDirection>,
    /// Print the view model as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn table_config(&self) -> Result<TableConfig> {
        let mut config = TableConfig::default();
        if let Some(page_size) = self.page_size {
            config = config.with_page_size(page_size)?;
        }
        if self.sort.is_some() || self.order.is_some() {
            let default_sort = config.default_sort;
            config = config.with_default_sort(SortSpec {
                column: self.sort.unwrap_or(default_sort.column),
                direction: self.order.unwrap_or(match self.sort {
                    Some(_) => SortDirection::Asc,
                    None => default_sort.direction,
                }),
            });
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();
    if args.page == 0 {
        return Err(anyhow!("--page starts at 1"));
    }
    let table_config = args.table_config()?;

    let settings = load_settings(args.config.as_deref())?;
    info!(
        access_node = %settings.access_node_url,
        contract = %settings.topshot_address,
        "settings loaded"
    );
    let executor = TopShotSetQuery::from_settings(&settings)?;
    let pipeline = SetViewPipeline::new(Arc::new(executor));

    let set_id = SetId(args.set_id);
    println!("Fetching Set: {set_id}");

    let view = match pipeline.load(set_id).await {
        LoadOutcome::Applied(ViewState::Ready { view, .. }) => view,
        LoadOutcome::Applied(ViewState::Error { error, .. }) => {
            error!(set_id = set_id.0, category = ?error.category(), "fetch failed");
            return Err(anyhow::Error::new(error)
                .context(format!("Could NOT fetch info for: {set_id}")));
        }
        other => {
            return Err(anyhow!(
                "Could NOT fetch info for: {set_id} (unexpected outcome {other:?})"
            ))
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(view.as_ref())?);
        return Ok(());
    }

    let mut table = TerminalTable::new(args.page - 1);
    table.render(&set_columns(), &table_config, &view.rows);
    let output = table.into_output()?;

    println!("{}: {}", view.set_name, view.lock_label());
    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("set_viewer").chain(argv.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn defaults_keep_newest_first_ordering() {
        let args = parse(&["--set-id", "42"]);
        assert_eq!(args.page, 1);
        assert_eq!(args.table_config().expect("config"), TableConfig::default());
    }

    #[test]
    fn sort_column_without_order_starts_ascending() {
        let args = parse(&["--set-id", "42", "--sort", "totalMinted"]);
        let config = args.table_config().expect("config");
        assert_eq!(
            config.default_sort,
            SortSpec {
                column: ColumnKey::TotalMinted,
                direction: SortDirection::Asc,
            }
        );

        let args = parse(&["--set-id", "42", "--order", "asc"]);
        assert_eq!(
            args.table_config().expect("config").default_sort.column,
            ColumnKey::PlayOrder
        );
    }

    #[test]
    fn page_size_outside_menu_is_rejected() {
        let args = parse(&["--set-id", "42", "--page-size", "25"]);
        assert!(args.table_config().is_err());
        assert!(Args::try_parse_from(["set_viewer", "--set-id", "x"]).is_err());
        assert!(
            Args::try_parse_from(["set_viewer", "--set-id", "1", "--sort", "mintedAt"]).is_err()
        );
    }
}
