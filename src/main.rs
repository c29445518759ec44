use std::env;

use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;

use justified_gallery::bench;
use justified_gallery::layout::JustifiedLayout;
use justified_gallery::models::{GalleryImage, GalleryLayout};

fn main() {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "justified_gallery=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = ?err, "jgal failed");
            2
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    if let Some(args) = bench::maybe_parse_args()? {
        return bench::run_benchmark(args);
    }

    let (layout, width, images) = parse_layout_args(env::args().skip(1))?;
    let result = layout
        .compute(&images, width)
        .context("Failed to lay out images")?;
    print!("{}", describe(&result));
    Ok(0)
}

/// Parses `--width W [--row-height H] [--margin M] WxH...`.
fn parse_layout_args<I>(args: I) -> Result<(JustifiedLayout, u32, Vec<GalleryImage>)>
where
    I: IntoIterator<Item = String>,
{
    let mut layout = JustifiedLayout::default();
    let mut width: Option<u32> = None;
    let mut images = Vec::new();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--width" => {
                let value = args.next().context("Missing value for --width")?;
                width = Some(
                    value
                        .parse::<u32>()
                        .context("Failed to parse --width as a non-negative integer")?,
                );
            }
            "--row-height" => {
                let value = args.next().context("Missing value for --row-height")?;
                layout.row_height = value
                    .parse::<f64>()
                    .context("Failed to parse --row-height as a number")?;
            }
            "--margin" => {
                let value = args.next().context("Missing value for --margin")?;
                layout.margin = value
                    .parse::<u32>()
                    .context("Failed to parse --margin as a non-negative integer")?;
            }
            _ => {
                let index = images.len();
                images.push(parse_dimensions(&arg, index)?);
            }
        }
    }

    let width = width.context("Usage: jgal --width <px> [--row-height <px>] [--margin <px>] <WxH>...")?;
    if images.is_empty() {
        bail!("No images given; pass sizes like 1920x1080");
    }
    Ok((layout, width, images))
}

fn parse_dimensions(arg: &str, index: usize) -> Result<GalleryImage> {
    let (w, h) = arg
        .split_once('x')
        .with_context(|| format!("Expected WxH, got {:?}", arg))?;
    let width = w
        .parse::<u32>()
        .with_context(|| format!("Bad width in {:?}", arg))?;
    let height = h
        .parse::<u32>()
        .with_context(|| format!("Bad height in {:?}", arg))?;
    Ok(GalleryImage::new(format!("image-{}", index), width, height))
}

fn describe(layout: &GalleryLayout) -> String {
    let mut out = String::new();
    for row in &layout.rows {
        out.push_str(&format!(
            "row {} delta={} width={}\n",
            row.row_index,
            row.delta(),
            row.total_width()
        ));
        for item in &row.items {
            out.push_str(&format!(
                "  #{} {} -> {} (margin {})\n",
                item.index, item.scaled_width, item.render_width, item.margin_adjust
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_layout_args() {
        let (layout, width, images) = parse_layout_args(args(&[
            "--width",
            "270",
            "--row-height",
            "100",
            "--margin",
            "0",
            "100x100",
            "100x100",
            "100x100",
        ]))
        .unwrap();

        assert_eq!(width, 270);
        assert_eq!(layout, JustifiedLayout::new(100.0, 0));
        assert_eq!(images.len(), 3);
        assert_eq!(images[2].src, "image-2");
    }

    #[test]
    fn test_parse_layout_args_errors() {
        assert!(parse_layout_args(args(&["100x100"])).is_err());
        assert!(parse_layout_args(args(&["--width", "300"])).is_err());
        assert!(parse_layout_args(args(&["--width", "300", "wide"])).is_err());
    }

    #[test]
    fn test_describe() {
        let layout = JustifiedLayout::new(100.0, 0);
        let images = vec![GalleryImage::new("a", 1000, 100)];
        let text = describe(&layout.compute(&images, 300).unwrap());
        assert!(text.contains("row 0 delta=700 width=300"));
        assert!(text.contains("#0 1000 -> 300 (margin -350)"));
    }
}
