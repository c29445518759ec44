//! Overshoot distribution for a completed row.
//!
//! A row is closed as soon as its accumulated width reaches the container
//! width, so it usually sticks out past the right edge. The overshoot is
//! shared out across the row in proportion to each image's width, and the
//! pixels lost to integer flooring are handed back one at a time starting
//! from the first image of the row. Earlier images always absorb the extra
//! pixel first.

use tracing::{trace, warn};

use crate::models::{LaidOutImage, ScaledImage};

/// Lays out one row, shrinking its images so the row fits the container.
///
/// `row_width` is the accumulated width of the row including margins. When
/// it does not exceed `container_width` (a short trailing row) the images
/// keep their scaled widths.
pub fn distribute(row: &[ScaledImage], row_width: u64, container_width: u32) -> Vec<LaidOutImage> {
    let delta = row_width as i64 - i64::from(container_width);
    if row.is_empty() || delta <= 0 {
        return row.iter().map(|item| laid_out(item, 0)).collect();
    }

    let widths: Vec<u32> = row.iter().map(|item| item.scaled_width).collect();
    let cuts = calculate_cuts(&widths, row_width, delta as u64);
    trace!(delta, ?cuts, "Distributed row overshoot");

    row.iter()
        .zip(cuts)
        .map(|(item, cut)| laid_out(item, cut))
        .collect()
}

/// Splits `delta` into one cut per width, proportional to `width / row_width`.
///
/// The cuts always sum to exactly `delta` for a non-empty row.
pub fn calculate_cuts(widths: &[u32], row_width: u64, delta: u64) -> Vec<u64> {
    if widths.is_empty() || row_width == 0 {
        return vec![0; widths.len()];
    }

    // u128 product: delta and width can both exceed 2^32 with large margins.
    let mut cuts: Vec<u64> = widths
        .iter()
        .map(|&w| {
            let cut = u128::from(delta) * u128::from(w) / u128::from(row_width);
            u64::try_from(cut).unwrap_or(delta)
        })
        .collect();

    let assigned = cuts.iter().fold(0u64, |sum, &cut| sum.saturating_add(cut));
    let remaining = delta.saturating_sub(assigned);
    if remaining == 0 {
        return cuts;
    }

    // Same result as handing out one pixel per image per pass from the
    // front until nothing is left, without looping `remaining` times.
    let count = cuts.len() as u64;
    let (per_image, extra) = (remaining / count, remaining % count);
    for (i, cut) in cuts.iter_mut().enumerate() {
        *cut += per_image + u64::from((i as u64) < extra);
    }

    cuts
}

fn laid_out(item: &ScaledImage, cut: u64) -> LaidOutImage {
    let cut = i64::try_from(cut).unwrap_or(i64::MAX);
    let render_width = i64::from(item.scaled_width).saturating_sub(cut);
    if render_width < 0 {
        warn!(
            index = item.index,
            scaled_width = item.scaled_width,
            cut,
            "Row overshoot exceeds image width"
        );
    }

    LaidOutImage {
        index: item.index,
        image: item.image.clone(),
        scaled_width: item.scaled_width,
        render_width,
        margin_adjust: -(cut / 2),
    }
}
