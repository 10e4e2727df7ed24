use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use jobview_core::app::{PublisherLoop, RenderMode, StatusModel, StatusView, WidgetConfig};
use jobview_core::impls::WriterSurface;
use tracing_subscriber::EnvFilter;

mod pipeline;

use pipeline::SimulatedPipeline;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Tabular,
    Plain,
}

impl From<ModeArg> for RenderMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Tabular => RenderMode::Tabular,
            ModeArg::Plain => RenderMode::Plain,
        }
    }
}

/// Run a simulated pipeline and render its live status table.
#[derive(Debug, Parser)]
#[command(name = "jobview", version)]
struct Cli {
    /// JSON widget configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rendering variant (overrides the config file).
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Pipeline nodes, in order.
    #[arg(long, value_delimiter = ',', default_value = "extract,transform,load")]
    nodes: Vec<String>,

    /// Items fed into the first node.
    #[arg(long, default_value_t = 100)]
    items: u64,

    /// Items each node handles per tick.
    #[arg(long, default_value_t = 7)]
    batch: u64,

    /// Reject every n-th item in the second node (0 disables).
    #[arg(long, default_value_t = 0)]
    fail_every: u64,

    /// Refresh interval in milliseconds (overrides the config file).
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Print the final status table as JSON on exit.
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobview_core=info,jobview=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => WidgetConfig::from_path(path)?,
        None => WidgetConfig::default(),
    };
    if let Some(mode) = cli.mode {
        config.mode = mode.into();
    }
    if let Some(ms) = cli.interval_ms {
        config.refresh_interval_ms = ms;
    }

    // (A) ホストへの登録（設定のみ、描画はしない）
    let host = config.host_config();
    for (name, path) in host.activate() {
        tracing::debug!(module = %name, path = %path, "module alias");
    }

    // (B) モデルとビューをつなぐ
    let model = StatusModel::new();
    let stdout = std::io::stdout();
    let rewind = stdout.is_terminal();
    let view = StatusView::new(WriterSurface::new(stdout).with_rewind(rewind), config.renderer());
    view.attach(&model).context("attaching status view")?;

    // (C) パイプラインの状態を定期配信
    let names: Vec<&str> = cli.nodes.iter().map(String::as_str).collect();
    let source =
        SimulatedPipeline::new(&names, cli.items, cli.batch).with_fail_every(cli.fail_every);
    let outcome = PublisherLoop::new(source, model.clone())
        .with_interval(config.refresh_interval())
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "cannot listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await;

    // (D) 後片付け
    view.detach();
    tracing::info!(?outcome, rows = model.get().len(), "done");

    if cli.json {
        let json = serde_json::to_string_pretty(&model.get())?;
        println!("{json}");
    }

    Ok(())
}
