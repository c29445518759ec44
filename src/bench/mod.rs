//! Layout benchmark.
//!
//! Simulates a window being dragged narrower and then back, recomputing the
//! layout on every frame, and reports frame-time percentiles as JSON.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use tracing::info;
use xxhash_rust::xxh3::xxh3_64;

use crate::layout::{CachedLayoutComputer, JustifiedLayout, LayoutCache};
use crate::models::{GalleryImage, GalleryLayout};

/// Pixels the simulated window shrinks per frame.
const RESIZE_STEP_PX: u32 = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkArgs {
    pub images: usize,
    pub runs: usize,
    pub width: u32,
    pub row_height: f64,
    pub margin: u32,
    pub output: Option<PathBuf>,
}

#[derive(Debug)]
struct BenchmarkRun {
    run_index: usize,
    initial_layout_ms: f64,
    rows: usize,
    frames: usize,
    frame_p50_ms: f64,
    frame_p95_ms: f64,
    frames_over_16ms: usize,
    cached_frame_p50_ms: f64,
    cached_frame_p95_ms: f64,
    width_violations: usize,
}

#[derive(Debug)]
struct BenchmarkAggregate {
    runs: usize,
    avg_initial_layout_ms: f64,
    avg_frame_p95_ms: f64,
    avg_cached_frame_p95_ms: f64,
}

#[derive(Debug)]
struct BenchmarkReport {
    schema_version: u32,
    generated_at_unix_ms: u128,
    args: BenchmarkArgs,
    results: Vec<BenchmarkRun>,
    aggregate: BenchmarkAggregate,
}

/// Parses benchmark flags from the process arguments.
/// Returns None unless `--benchmark` is present.
pub fn maybe_parse_args() -> Result<Option<BenchmarkArgs>> {
    parse_args(env::args().skip(1))
}

pub fn parse_args<I>(args: I) -> Result<Option<BenchmarkArgs>>
where
    I: IntoIterator<Item = String>,
{
    let mut benchmark = false;
    let mut images: usize = 5000;
    let mut runs: usize = 1;
    let mut width: u32 = 1920;
    let defaults = JustifiedLayout::default();
    let mut row_height = defaults.row_height;
    let mut margin = defaults.margin;
    let mut output: Option<PathBuf> = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--benchmark" => benchmark = true,
            "--images" => {
                let value = args.next().context("Missing value for --images")?;
                images = value
                    .parse::<usize>()
                    .context("Failed to parse --images as a positive integer")?;
            }
            "--runs" => {
                let value = args.next().context("Missing value for --runs")?;
                runs = value
                    .parse::<usize>()
                    .context("Failed to parse --runs as a positive integer")?;
            }
            "--width" => {
                let value = args.next().context("Missing value for --width")?;
                width = value
                    .parse::<u32>()
                    .context("Failed to parse --width as a positive integer")?;
            }
            "--row-height" => {
                let value = args.next().context("Missing value for --row-height")?;
                row_height = value
                    .parse::<f64>()
                    .context("Failed to parse --row-height as a number")?;
            }
            "--margin" => {
                let value = args.next().context("Missing value for --margin")?;
                margin = value
                    .parse::<u32>()
                    .context("Failed to parse --margin as a non-negative integer")?;
            }
            "--output" => {
                let value = args.next().context("Missing value for --output")?;
                output = Some(PathBuf::from(value));
            }
            _ => {}
        }
    }

    if !benchmark {
        return Ok(None);
    }
    if runs == 0 {
        bail!("--runs must be greater than 0");
    }
    if images == 0 {
        bail!("--images must be greater than 0");
    }
    if row_height.is_nan() || row_height <= 0.0 {
        bail!("--row-height must be greater than 0");
    }
    if width < 2 {
        bail!("--width must be at least 2");
    }

    Ok(Some(BenchmarkArgs {
        images,
        runs,
        width,
        row_height,
        margin,
        output,
    }))
}

/// Builds a deterministic set of images with mixed aspect ratios.
pub fn synthetic_images(count: usize) -> Vec<GalleryImage> {
    (0..count)
        .map(|i| {
            let hash = xxh3_64(&(i as u64).to_le_bytes());
            let width = 600 + (hash % 2400) as u32;
            let height = 600 + ((hash >> 32) % 1400) as u32;
            GalleryImage::new(format!("synthetic/{:06}.jpg", i), width, height)
                .with_thumbnail(format!("synthetic/thumbs/{:06}.jpg", i))
        })
        .collect()
}

pub fn run_benchmark(args: BenchmarkArgs) -> Result<i32> {
    let layout = JustifiedLayout::new(args.row_height, args.margin);
    let images = synthetic_images(args.images);
    let mut runs = Vec::with_capacity(args.runs);

    for run_index in 0..args.runs {
        info!(run = run_index + 1, images = images.len(), "Benchmark run started");
        runs.push(run_once(run_index, &layout, &images, args.width)?);
    }

    let violations: usize = runs.iter().map(|r| r.width_violations).sum();
    let report = BenchmarkReport {
        schema_version: 1,
        generated_at_unix_ms: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0),
        aggregate: build_aggregate(&runs),
        results: runs,
        args,
    };

    let json = render_report_json(&report);
    match &report.args.output {
        Some(path) => {
            fs::write(path, &json)
                .with_context(|| format!("Failed to write benchmark report: {:?}", path))?;
            info!("Wrote benchmark report to {:?}", path);
        }
        None => println!("{}", json),
    }

    Ok(if violations == 0 { 0 } else { 1 })
}

fn run_once(
    run_index: usize,
    layout: &JustifiedLayout,
    images: &[GalleryImage],
    width: u32,
) -> Result<BenchmarkRun> {
    let start = Instant::now();
    let initial = layout
        .compute(images, width)
        .context("Initial layout failed")?;
    let initial_layout_ms = start.elapsed().as_secs_f64() * 1000.0;

    let sweep = resize_sweep(width);
    let mut frame_times_ms = Vec::with_capacity(sweep.len() * 2);
    let mut width_violations = count_width_violations(&initial);

    for &frame_width in sweep.iter().chain(sweep.iter().rev()) {
        let frame_start = Instant::now();
        let result = layout
            .compute(images, frame_width)
            .context("Layout failed during resize sweep")?;
        frame_times_ms.push(frame_start.elapsed().as_secs_f64() * 1000.0);
        width_violations += count_width_violations(&result);
    }

    // Same sweep through a cache large enough that the way back is all hits.
    let computer = CachedLayoutComputer {
        layout: layout.clone(),
        cache: LayoutCache::with_capacity(sweep.len()),
    };
    let mut cached_times_ms = Vec::with_capacity(sweep.len() * 2);
    for &frame_width in sweep.iter().chain(sweep.iter().rev()) {
        let frame_start = Instant::now();
        computer
            .compute(images, frame_width)
            .context("Cached layout failed during resize sweep")?;
        cached_times_ms.push(frame_start.elapsed().as_secs_f64() * 1000.0);
    }

    Ok(BenchmarkRun {
        run_index,
        initial_layout_ms,
        rows: initial.row_count(),
        frames: frame_times_ms.len(),
        frame_p50_ms: percentile_ms(&frame_times_ms, 0.50),
        frame_p95_ms: percentile_ms(&frame_times_ms, 0.95),
        frames_over_16ms: frame_times_ms.iter().filter(|t| **t > 16.67).count(),
        cached_frame_p50_ms: percentile_ms(&cached_times_ms, 0.50),
        cached_frame_p95_ms: percentile_ms(&cached_times_ms, 0.95),
        width_violations,
    })
}

/// Widths visited while dragging the window from `width` down to half of it.
fn resize_sweep(width: u32) -> Vec<u32> {
    let floor = (width / 2).max(1);
    (floor..=width)
        .rev()
        .step_by(RESIZE_STEP_PX as usize)
        .collect()
}

/// Rows that overshot but do not end exactly on the container edge.
fn count_width_violations(layout: &GalleryLayout) -> usize {
    layout
        .rows
        .iter()
        .filter(|row| row.is_justified() && row.total_width() != i64::from(layout.container_width))
        .count()
}

fn build_aggregate(runs: &[BenchmarkRun]) -> BenchmarkAggregate {
    let initial: Vec<f64> = runs.iter().map(|r| r.initial_layout_ms).collect();
    let frame_p95: Vec<f64> = runs.iter().map(|r| r.frame_p95_ms).collect();
    let cached_p95: Vec<f64> = runs.iter().map(|r| r.cached_frame_p95_ms).collect();

    BenchmarkAggregate {
        runs: runs.len(),
        avg_initial_layout_ms: average(&initial),
        avg_frame_p95_ms: average(&frame_p95),
        avg_cached_frame_p95_ms: average(&cached_p95),
    }
}

fn render_report_json(report: &BenchmarkReport) -> String {
    let mut out = String::new();
    out.push_str("{\n");
    out.push_str(&format!("  \"schema_version\": {},\n", report.schema_version));
    out.push_str(&format!(
        "  \"generated_at_unix_ms\": {},\n",
        report.generated_at_unix_ms
    ));
    out.push_str("  \"benchmark\": \"justified-layout\",\n");
    out.push_str(&format!("  \"images\": {},\n", report.args.images));
    out.push_str(&format!("  \"runs_requested\": {},\n", report.args.runs));
    out.push_str(&format!("  \"width\": {},\n", report.args.width));
    out.push_str(&format!("  \"row_height\": {:.3},\n", report.args.row_height));
    out.push_str(&format!("  \"margin\": {},\n", report.args.margin));
    match &report.args.output {
        Some(path) => out.push_str(&format!(
            "  \"output\": \"{}\",\n",
            escape_json(&path.to_string_lossy())
        )),
        None => out.push_str("  \"output\": null,\n"),
    }

    out.push_str("  \"results\": [\n");
    for (i, run) in report.results.iter().enumerate() {
        out.push_str("    {\n");
        out.push_str(&format!("      \"run_index\": {},\n", run.run_index));
        out.push_str(&format!(
            "      \"initial_layout_ms\": {:.3},\n",
            run.initial_layout_ms
        ));
        out.push_str(&format!("      \"rows\": {},\n", run.rows));
        out.push_str(&format!("      \"frames\": {},\n", run.frames));
        out.push_str(&format!("      \"frame_p50_ms\": {:.3},\n", run.frame_p50_ms));
        out.push_str(&format!("      \"frame_p95_ms\": {:.3},\n", run.frame_p95_ms));
        out.push_str(&format!(
            "      \"frames_over_16ms\": {},\n",
            run.frames_over_16ms
        ));
        out.push_str(&format!(
            "      \"cached_frame_p50_ms\": {:.3},\n",
            run.cached_frame_p50_ms
        ));
        out.push_str(&format!(
            "      \"cached_frame_p95_ms\": {:.3},\n",
            run.cached_frame_p95_ms
        ));
        out.push_str(&format!(
            "      \"width_violations\": {}\n",
            run.width_violations
        ));
        out.push_str("    }");
        if i + 1 < report.results.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str("  ],\n");

    let agg = &report.aggregate;
    out.push_str("  \"aggregate\": {\n");
    out.push_str(&format!("    \"runs\": {},\n", agg.runs));
    out.push_str(&format!(
        "    \"avg_initial_layout_ms\": {:.3},\n",
        agg.avg_initial_layout_ms
    ));
    out.push_str(&format!(
        "    \"avg_frame_p95_ms\": {:.3},\n",
        agg.avg_frame_p95_ms
    ));
    out.push_str(&format!(
        "    \"avg_cached_frame_p95_ms\": {:.3}\n",
        agg.avg_cached_frame_p95_ms
    ));
    out.push_str("  }\n");
    out.push_str("}\n");
    out
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn percentile_ms(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let clamped = p.clamp(0.0, 1.0);
    let idx = ((sorted.len() - 1) as f64 * clamped).round() as usize;
    sorted[idx]
}

fn escape_json(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_control() => escaped.push_str(&format!("\\u{:04x}", c as u32)),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_not_benchmark_mode() {
        assert!(parse_args(args(&["--width", "800"])).unwrap().is_none());
    }

    #[test]
    fn test_parse_all_flags() {
        let parsed = parse_args(args(&[
            "--benchmark",
            "--images",
            "300",
            "--runs",
            "2",
            "--width",
            "1280",
            "--row-height",
            "150",
            "--margin",
            "0",
            "--output",
            "report.json",
        ]))
        .unwrap()
        .unwrap();

        assert_eq!(parsed.images, 300);
        assert_eq!(parsed.runs, 2);
        assert_eq!(parsed.width, 1280);
        assert_eq!(parsed.row_height, 150.0);
        assert_eq!(parsed.margin, 0);
        assert_eq!(parsed.output, Some(PathBuf::from("report.json")));
    }

    #[test]
    fn test_parse_defaults() {
        let parsed = parse_args(args(&["--benchmark"])).unwrap().unwrap();
        assert_eq!(parsed.images, 5000);
        assert_eq!(parsed.width, 1920);
        assert_eq!(parsed.row_height, 180.0);
        assert_eq!(parsed.margin, 2);
        assert!(parsed.output.is_none());
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(args(&["--benchmark", "--runs", "0"])).is_err());
        assert!(parse_args(args(&["--benchmark", "--width"])).is_err());
        assert!(parse_args(args(&["--benchmark", "--images", "many"])).is_err());
    }

    #[test]
    fn test_synthetic_images_are_deterministic() {
        let first = synthetic_images(50);
        let second = synthetic_images(50);
        assert_eq!(first, second);
        assert!(first.iter().all(GalleryImage::has_valid_geometry));
    }

    #[test]
    fn test_resize_sweep() {
        let sweep = resize_sweep(100);
        assert_eq!(sweep.first(), Some(&100));
        assert!(sweep.iter().all(|&w| (50..=100).contains(&w)));
        assert!(sweep.windows(2).all(|w| w[0] - w[1] == RESIZE_STEP_PX));
    }

    #[test]
    fn test_percentile_and_average() {
        let values = [5.0, 1.0, 3.0, 2.0, 4.0];
        assert_eq!(percentile_ms(&values, 0.5), 3.0);
        assert_eq!(percentile_ms(&values, 1.0), 5.0);
        assert_eq!(percentile_ms(&[], 0.5), 0.0);
        assert_eq!(average(&values), 3.0);
    }

    #[test]
    fn test_escape_json() {
        assert_eq!(escape_json("a\"b\\c\n"), "a\\\"b\\\\c\\n");
    }

    #[test]
    fn test_run_benchmark_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report.json");
        let code = run_benchmark(BenchmarkArgs {
            images: 120,
            runs: 2,
            width: 640,
            row_height: 120.0,
            margin: 2,
            output: Some(output.clone()),
        })
        .unwrap();

        assert_eq!(code, 0);
        let json = fs::read_to_string(&output).unwrap();
        assert!(json.contains("\"benchmark\": \"justified-layout\""));
        assert!(json.contains("\"width_violations\": 0"));
        assert!(json.contains("\"runs\": 2"));
    }
}
