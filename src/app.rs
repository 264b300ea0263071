use anyhow::{Context, Result};

use crate::{
    cli::{Cli, Command},
    domain,
    infra::{self, error::AppError},
    monitor, platform, ui,
    usecases::{
        self, bootstrap,
        status::{check_status, StatusReport},
        watch::watch,
    },
};

const CTRL_C_LISTEN_FAILED: &str = "APP_CTRL_C_LISTEN_FAILED";

pub fn run(cli: Cli) -> Result<()> {
    let context = bootstrap::bootstrap(cli.config.as_deref())?;

    tracing::debug!(
        ui = ui::module_name(),
        domain = domain::module_name(),
        monitor = monitor::module_name(),
        platform = platform::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(AppError::Runtime)?;

    match cli.command_or_default() {
        Command::Watch => {
            let summary = runtime.block_on(watch(
                &context.monitor,
                |line| println!("{line}"),
                wait_for_ctrl_c(),
            ));

            for line in summary_lines(&summary) {
                println!("{line}");
            }
        }
        Command::Status { json } => {
            let report = runtime.block_on(check_status(&context.monitor));
            if json {
                let rendered = serde_json::to_string_pretty(&report)
                    .context("failed to render status report as JSON")?;
                println!("{rendered}");
            } else {
                for line in status_lines(&report) {
                    println!("{line}");
                }
            }
        }
    }

    Ok(())
}

async fn wait_for_ctrl_c() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(
            code = CTRL_C_LISTEN_FAILED,
            error = %error,
            "could not listen for Ctrl-C; stopping watch"
        );
    }
}

fn summary_lines(summary: &usecases::watch::WatchSummary) -> [String; 3] {
    [
        format!("transitions observed: {}", summary.transitions),
        format!("snapshots recorded: {}", summary.history_len),
        format!(
            "total offline: {}",
            ui::format::format_duration_ms(summary.total_offline_ms)
        ),
    ]
}

fn status_lines(report: &StatusReport) -> Vec<String> {
    let mut lines = vec![ui::format::snapshot_line(&report.snapshot)];
    if let Some(banner) = ui::banner::Banner::from_status(&report.snapshot, report.total_offline_ms)
    {
        lines.push(format!("{}: {}", banner.headline, banner.detail));
    }
    lines
}
