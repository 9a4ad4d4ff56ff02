//! Plain-text and JSON rendering for the inspector.

use std::io::{self, Write};

use basin_core::{DepthSnapshot, FloodEvent, SolveMetrics, TerrainGrid};
use serde::Serialize;

pub fn write_event_line(out: &mut impl Write, index: usize, event: &FloodEvent) -> io::Result<()> {
    writeln!(out, "{index:>6}  {event}")
}

pub fn write_event_json(out: &mut impl Write, event: &FloodEvent) -> io::Result<()> {
    serde_json::to_writer(&mut *out, event)?;
    writeln!(out)
}

#[derive(Serialize)]
struct Summary<'a> {
    depths: Vec<Vec<u32>>,
    total_volume: u64,
    max_depth: u32,
    metrics: &'a SolveMetrics,
    fingerprint: String,
}

pub fn write_summary_json(
    out: &mut impl Write,
    depths: &DepthSnapshot,
    metrics: &SolveMetrics,
    fingerprint: u64,
) -> io::Result<()> {
    let summary = Summary {
        depths: depths.to_rows(),
        total_volume: depths.total_volume(),
        max_depth: depths.max_depth(),
        metrics,
        fingerprint: format!("{fingerprint:016x}"),
    };
    serde_json::to_writer(&mut *out, &summary)?;
    writeln!(out)
}

pub fn write_summary(
    out: &mut impl Write,
    terrain: &TerrainGrid,
    depths: &DepthSnapshot,
    metrics: &SolveMetrics,
    fingerprint: u64,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "terrain:")?;
    out.write_all(render_grid(&terrain.to_rows(), false).as_bytes())?;
    writeln!(out, "water depth:")?;
    out.write_all(render_grid(&depths.to_rows(), true).as_bytes())?;
    writeln!(
        out,
        "volume={} max_depth={} wet_cells={}",
        depths.total_volume(),
        depths.max_depth(),
        depths.wet_cells()
    )?;
    writeln!(
        out,
        "events={} selects={} zeros={} lowerings={} expansions={} rim_rounds={} drain_floods={}",
        metrics.events,
        metrics.selects,
        metrics.zeros,
        metrics.lowerings,
        metrics.expansions,
        metrics.rim_rounds,
        metrics.drain_floods
    )?;
    writeln!(out, "fingerprint={fingerprint:016x}")
}

/// Right-aligned columns. Dry cells render as `.` when `dots_for_zero` is set.
pub fn render_grid(rows: &[Vec<u32>], dots_for_zero: bool) -> String {
    let width = rows
        .iter()
        .flatten()
        .map(|value| value.to_string().len())
        .max()
        .unwrap_or(1);
    let mut text = String::new();
    for row in rows {
        let line = row
            .iter()
            .map(|&value| {
                if dots_for_zero && value == 0 {
                    format!("{:>width$}", ".")
                } else {
                    format!("{value:>width$}")
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        text.push_str("  ");
        text.push_str(&line);
        text.push('\n');
    }
    text
}
