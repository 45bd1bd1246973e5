//! Terminal rendering of a project's run metrics

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use std::fmt::Write;
use tracing::warn;

use crate::error::StoreError;
use crate::metrics::{self, LatencyPoint, RunSummary};
use crate::models::records::Run;
use crate::runs::RunRecorder;

const SPARK_BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Data behind one dashboard render
///
/// A failed history read is kept in `error` and the dashboard renders empty.
#[derive(Debug)]
pub struct Dashboard {
    pub project_name: String,
    pub runs: Vec<Run>,
    pub error: Option<StoreError>,
}

impl Dashboard {
    pub async fn load(recorder: &RunRecorder, project_id: &str, project_name: &str) -> Self {
        match recorder.history(project_id).await {
            Ok(runs) => Self {
                project_name: project_name.to_string(),
                runs,
                error: None,
            },
            Err(e) => {
                warn!(project_id, error = %e, "Could not load runs");
                Self {
                    project_name: project_name.to_string(),
                    runs: Vec::new(),
                    error: Some(e),
                }
            }
        }
    }

    pub fn render(&self, limit: usize, full: bool) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", format!("Dashboard: {}", self.project_name).bold());
        let _ = writeln!(out);

        if let Some(e) = &self.error {
            let _ = writeln!(out, "{}", format!("Could not load runs: {}", e).red());
            let _ = writeln!(out);
        }

        if self.runs.is_empty() {
            let _ = writeln!(
                out,
                "{}",
                "No runs yet for this project. Send a message to log one.".yellow()
            );
            return out;
        }

        let _ = writeln!(out, "{}", summary_table(&metrics::summarize(&self.runs)));
        let _ = writeln!(out);

        let series = metrics::latency_series(&self.runs);
        let _ = writeln!(out, "{}", "Latency over time (oldest → newest):".cyan());
        let _ = writeln!(out, "  {}", sparkline(&series));
        let _ = writeln!(out, "{}", series_table(&series));
        let _ = writeln!(out);

        let previews = metrics::recent(&self.runs, limit);
        let _ = writeln!(out, "{}", format!("Recent runs ({}):", previews.len()).cyan());
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            Cell::new("CREATED").fg(Color::Cyan),
            Cell::new("MODEL").fg(Color::Cyan),
            Cell::new("LATENCY").fg(Color::Cyan),
            Cell::new("PROMPT").fg(Color::Cyan),
        ]);
        for preview in &previews {
            table.add_row(vec![
                Cell::new(preview.run.created_at.format("%Y-%m-%dT%H:%M:%S")),
                Cell::new(&preview.run.model_name),
                Cell::new(format!("{:.2}s", preview.run.latency.unwrap_or(0.0))),
                Cell::new(&preview.prompt_preview),
            ]);
        }
        let _ = writeln!(out, "{}", table);

        if full {
            for preview in &previews {
                let _ = writeln!(out);
                let _ = writeln!(out, "{}", preview.label().bold());
                let _ = writeln!(out, "{}", "Prompt".underline());
                let _ = writeln!(out, "{}", preview.run.prompt);
                let _ = writeln!(out, "{}", "Response".underline());
                let _ = writeln!(out, "{}", preview.run.response);
            }
        }

        out
    }
}

fn summary_table(summary: &RunSummary) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("TOTAL RUNS").fg(Color::Cyan),
        Cell::new("AVG LATENCY (S)").fg(Color::Cyan),
        Cell::new("FASTEST (S)").fg(Color::Cyan),
        Cell::new("SLOWEST (S)").fg(Color::Cyan),
    ]);
    table.add_row(vec![
        Cell::new(summary.total),
        Cell::new(format!("{:.3}", summary.average_latency)),
        Cell::new(format!("{:.3}", summary.fastest)),
        Cell::new(format!("{:.3}", summary.slowest)),
    ]);
    table
}

fn series_table(series: &[LatencyPoint]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("RUN").fg(Color::Cyan),
        Cell::new("LATENCY (S)").fg(Color::Cyan),
        Cell::new("CREATED").fg(Color::Cyan),
    ]);
    for point in series {
        table.add_row(vec![
            Cell::new(point.run),
            Cell::new(point.latency.map_or_else(|| "-".to_string(), |l| format!("{:.4}", l))),
            Cell::new(point.created_at.format("%Y-%m-%dT%H:%M:%S")),
        ]);
    }
    table
}

/// One bar per run scaled to the slowest run; null latencies are blank
pub fn sparkline(series: &[LatencyPoint]) -> String {
    let max = series
        .iter()
        .filter_map(|p| p.latency)
        .fold(0.0_f64, f64::max);

    series
        .iter()
        .map(|p| match p.latency {
            None => ' ',
            Some(_) if max <= 0.0 => SPARK_BARS[0],
            Some(latency) => {
                let level = ((latency / max) * (SPARK_BARS.len() - 1) as f64).round() as usize;
                SPARK_BARS[level.min(SPARK_BARS.len() - 1)]
            }
        })
        .collect()
}
