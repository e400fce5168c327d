// PNG chart rendering.
//
// Every function here draws one complete image file from already-aggregated
// data plus a `ChartSpec` (title/labels/size) and the report's
// `ChartStyle`. Files are overwritten; the caller owns the directory.
use crate::config::{ChartSpec, ChartStyle};
use crate::error::Result;
use crate::util::{gaussian_kde, histogram_bins};
use chrono::{Months, NaiveDate};
use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

const MAX_LABEL_CHARS: usize = 40;
const KDE_POINTS: usize = 200;

fn canvas<'a>(
    path: &'a Path,
    spec: &ChartSpec,
    style: &ChartStyle,
) -> Result<DrawingArea<BitMapBackend<'a>, Shift>> {
    let root = BitMapBackend::new(path, spec.size.unwrap_or(style.size)).into_drawing_area();
    root.fill(&style.background)?;
    Ok(root)
}

fn short_label(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        return label.to_string();
    }
    let mut s: String = label.chars().take(MAX_LABEL_CHARS - 3).collect();
    s.push_str("...");
    s
}

/// Upper axis bound with a little headroom; never a zero-width range.
fn upper_bound(max: f64) -> f64 {
    if max.is_finite() && max > 0.0 {
        max * 1.05
    } else {
        1.0
    }
}

fn max_value(data: &[(String, f64)]) -> f64 {
    data.iter()
        .map(|(_, v)| *v)
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
}

/// Ranked categories as horizontal bars, first entry at the top.
pub fn horizontal_bar(
    path: &Path,
    spec: &ChartSpec,
    style: &ChartStyle,
    data: &[(String, f64)],
) -> Result<()> {
    let root = canvas(path, spec, style)?;
    let n = data.len() as i32;
    let labels: Vec<String> = data.iter().map(|(k, _)| short_label(k)).collect();
    let label_width = labels.iter().map(|l| l.len()).max().unwrap_or(4) as u32 * 7 + 20;

    let mut chart = ChartBuilder::on(&root)
        .caption(spec.title, (style.font, style.caption_size))
        .margin(style.margin)
        .x_label_area_size(40)
        .y_label_area_size(label_width.min(320))
        .build_cartesian_2d(
            0f64..upper_bound(max_value(data)),
            (0..(n - 1).max(1)).into_segmented(),
        )?;

    // row i of the ranking sits at segment n - 1 - i
    let y_label = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => usize::try_from(n - 1 - i)
            .ok()
            .and_then(|idx| labels.get(idx).cloned())
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    };
    chart
        .configure_mesh()
        .disable_y_mesh()
        .light_line_style(&style.grid)
        .y_labels(data.len().max(1))
        .y_label_formatter(&y_label)
        .x_desc(spec.x_label)
        .y_desc(spec.y_label)
        .label_style((style.font, style.label_size))
        .axis_desc_style((style.font, style.label_size))
        .draw()?;

    chart.draw_series(
        Histogram::horizontal(&chart)
            .style(style.bar.filled())
            .margin(4)
            .data(
                data.iter()
                    .enumerate()
                    .map(|(i, (_, v))| (n - 1 - i as i32, *v)),
            ),
    )?;
    root.present()?;
    debug!("horizontal bar chart with {} bars -> {}", data.len(), path.display());
    Ok(())
}

/// A handful of categories as narrow vertical bars, in the given order.
pub fn vertical_bar(
    path: &Path,
    spec: &ChartSpec,
    style: &ChartStyle,
    data: &[(String, f64)],
) -> Result<()> {
    let root = canvas(path, spec, style)?;
    let n = data.len() as i32;
    let (width, _) = spec.size.unwrap_or(style.size);
    // bars take 40% of their slot
    let slot = width.saturating_sub(120) / data.len().max(1) as u32;
    let bar_margin = slot * 3 / 10;

    let mut chart = ChartBuilder::on(&root)
        .caption(spec.title, (style.font, style.caption_size))
        .margin(style.margin)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            (0..(n - 1).max(1)).into_segmented(),
            0f64..upper_bound(max_value(data)),
        )?;

    let x_label = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => usize::try_from(*i)
            .ok()
            .and_then(|idx| data.get(idx))
            .map(|(k, _)| short_label(k))
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .light_line_style(&style.grid)
        .x_labels(data.len().max(1))
        .x_label_formatter(&x_label)
        .x_desc(spec.x_label)
        .y_desc(spec.y_label)
        .label_style((style.font, style.label_size))
        .axis_desc_style((style.font, style.label_size))
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(style.bar.filled())
            .margin(bar_margin)
            .data(data.iter().enumerate().map(|(i, (_, v))| (i as i32, *v))),
    )?;
    root.present()?;
    debug!("vertical bar chart with {} bars -> {}", data.len(), path.display());
    Ok(())
}

/// Monthly series on a calendar axis. Points must already be in
/// chronological order.
pub fn date_line(
    path: &Path,
    spec: &ChartSpec,
    style: &ChartStyle,
    points: &[(NaiveDate, f64)],
) -> Result<()> {
    let root = canvas(path, spec, style)?;
    let fallback = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    let start = points.first().map(|p| p.0).unwrap_or(fallback);
    let mut end = points.last().map(|p| p.0).unwrap_or(start);
    if end <= start {
        end = start.checked_add_months(Months::new(1)).unwrap_or(start);
    }
    let y_max = points
        .iter()
        .map(|p| p.1)
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max);

    let mut chart = ChartBuilder::on(&root)
        .caption(spec.title, (style.font, style.caption_size))
        .margin(style.margin)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(start..end, 0f64..upper_bound(y_max))?;

    chart
        .configure_mesh()
        .light_line_style(&style.grid)
        .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m").to_string())
        .x_desc(spec.x_label)
        .y_desc(spec.y_label)
        .label_style((style.font, style.label_size))
        .axis_desc_style((style.font, style.label_size))
        .draw()?;

    chart.draw_series(LineSeries::new(
        points.iter().copied(),
        style.line.stroke_width(2),
    ))?;
    root.present()?;
    debug!("date line chart with {} points -> {}", points.len(), path.display());
    Ok(())
}

/// Yearly series on an integer axis.
pub fn year_line(
    path: &Path,
    spec: &ChartSpec,
    style: &ChartStyle,
    points: &[(i32, f64)],
) -> Result<()> {
    let root = canvas(path, spec, style)?;
    let first = points.first().map(|p| p.0).unwrap_or(0);
    let last = points.last().map(|p| p.0).unwrap_or(first);
    let y_max = points
        .iter()
        .map(|p| p.1)
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max);

    let mut chart = ChartBuilder::on(&root)
        .caption(spec.title, (style.font, style.caption_size))
        .margin(style.margin)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(first..last.max(first + 1), 0f64..upper_bound(y_max))?;

    chart
        .configure_mesh()
        .light_line_style(&style.grid)
        .x_desc(spec.x_label)
        .y_desc(spec.y_label)
        .label_style((style.font, style.label_size))
        .axis_desc_style((style.font, style.label_size))
        .draw()?;

    chart.draw_series(LineSeries::new(
        points.iter().copied(),
        style.line.stroke_width(2),
    ))?;
    root.present()?;
    debug!("year line chart with {} points -> {}", points.len(), path.display());
    Ok(())
}

/// Distribution of a raw numeric series, optionally with a Gaussian KDE
/// overlay scaled to the bin counts.
pub fn histogram(
    path: &Path,
    spec: &ChartSpec,
    style: &ChartStyle,
    values: &[f64],
    bins: usize,
    density: bool,
) -> Result<()> {
    let root = canvas(path, spec, style)?;
    let counts = histogram_bins(values, bins);
    let lo = counts.first().map(|b| b.0).unwrap_or(0.0);
    let hi = counts.last().map(|b| b.1).unwrap_or(1.0);
    let max_count = counts.iter().map(|b| b.2).max().unwrap_or(0) as f64;

    let curve = if density {
        let bin_width = counts.first().map(|b| b.1 - b.0).unwrap_or(0.0);
        gaussian_kde(values, KDE_POINTS, values.len() as f64 * bin_width)
    } else {
        Vec::new()
    };
    let curve_max = curve.iter().map(|p| p.1).fold(0.0, f64::max);

    let mut chart = ChartBuilder::on(&root)
        .caption(spec.title, (style.font, style.caption_size))
        .margin(style.margin)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(lo..hi, 0f64..upper_bound(max_count.max(curve_max)))?;

    chart
        .configure_mesh()
        .light_line_style(&style.grid)
        .x_desc(spec.x_label)
        .y_desc(spec.y_label)
        .label_style((style.font, style.label_size))
        .axis_desc_style((style.font, style.label_size))
        .draw()?;

    chart.draw_series(counts.iter().map(|(start, end, count)| {
        Rectangle::new(
            [(*start, 0.0), (*end, *count as f64)],
            style.bar.mix(0.8).filled(),
        )
    }))?;
    chart.draw_series(counts.iter().map(|(start, end, count)| {
        Rectangle::new(
            [(*start, 0.0), (*end, *count as f64)],
            style.background.stroke_width(1),
        )
    }))?;
    if !curve.is_empty() {
        chart.draw_series(LineSeries::new(curve, style.density.stroke_width(2)))?;
    }
    root.present()?;
    debug!(
        "histogram of {} values in {} bins -> {}",
        values.len(),
        bins,
        path.display()
    );
    Ok(())
}
