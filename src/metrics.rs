//! Metrics aggregation over a run history
//!
//! Everything here is a pure function of a newest-first `&[Run]` slice as
//! returned by [`RunRecorder::history`](crate::runs::RunRecorder::history).

use chrono::{DateTime, Utc};

use crate::models::records::Run;

/// Entries shown in the recent-runs list by default
pub const DEFAULT_RECENT_LIMIT: usize = 20;
/// Characters of the prompt kept in list previews
pub const PREVIEW_CHARS: usize = 60;
pub const CONTINUATION_MARKER: &str = "...";

/// Summary statistics over a history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub total: usize,
    pub average_latency: f64,
    pub fastest: f64,
    pub slowest: f64,
}

/// One point of the chronological latency chart
#[derive(Debug, Clone, PartialEq)]
pub struct LatencyPoint {
    /// 1-based position, oldest run first
    pub run: usize,
    pub latency: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// A history entry prepared for list display
#[derive(Debug, Clone, PartialEq)]
pub struct RunPreview<'a> {
    pub run: &'a Run,
    pub prompt_preview: String,
}

impl RunPreview<'_> {
    /// `created_at | model | latency | prompt preview`
    pub fn label(&self) -> String {
        format!(
            "{} | {} | {:.2}s | {}",
            self.run.created_at.format("%Y-%m-%dT%H:%M:%S"),
            self.run.model_name,
            self.run.latency.unwrap_or(0.0),
            self.prompt_preview
        )
    }
}

fn latencies(runs: &[Run]) -> impl Iterator<Item = f64> + '_ {
    runs.iter().filter_map(|r| r.latency)
}

pub fn total(runs: &[Run]) -> usize {
    runs.len()
}

/// Mean of the non-null latencies, 0 when there are none
pub fn average_latency(runs: &[Run]) -> f64 {
    let (sum, count) = latencies(runs).fold((0.0, 0usize), |(sum, count), l| (sum + l, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Smallest non-null latency, 0 when there are none
pub fn fastest(runs: &[Run]) -> f64 {
    latencies(runs).reduce(f64::min).unwrap_or(0.0)
}

/// Largest non-null latency, 0 when there are none
pub fn slowest(runs: &[Run]) -> f64 {
    latencies(runs).reduce(f64::max).unwrap_or(0.0)
}

pub fn summarize(runs: &[Run]) -> RunSummary {
    RunSummary {
        total: total(runs),
        average_latency: average_latency(runs),
        fastest: fastest(runs),
        slowest: slowest(runs),
    }
}

/// Latencies in chronological order, indexed from 1
pub fn latency_series(runs: &[Run]) -> Vec<LatencyPoint> {
    runs.iter()
        .rev()
        .enumerate()
        .map(|(i, r)| LatencyPoint {
            run: i + 1,
            latency: r.latency,
            created_at: r.created_at,
        })
        .collect()
}

/// The `n` most recent runs with truncated prompt previews
pub fn recent(runs: &[Run], n: usize) -> Vec<RunPreview<'_>> {
    runs.iter()
        .take(n)
        .map(|run| RunPreview {
            run,
            prompt_preview: preview_prompt(&run.prompt),
        })
        .collect()
}

/// First `PREVIEW_CHARS` characters, plus `...` when something was cut
pub fn preview_prompt(prompt: &str) -> String {
    match prompt.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}{}", &prompt[..cut], CONTINUATION_MARKER),
        None => prompt.to_string(),
    }
}
