use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;

use super::config::AxisLimits;
use super::constants::{CSV_CHANNEL_PREFIX, ENERGY_HISTOGRAM_BINS};
use super::csv_data::CsvFrame;
use super::error::PlotError;
use super::event_table::EventTable;
use super::layout::GridLayout;

/// Output image size in pixels
const PLOT_SIZE: (u32, u32) = (1100, 850);

/// The kind of plot to render from a pre-decoded CSV
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    Trace,
    Mca,
    Baseline,
}

impl PlotKind {
    pub fn title(&self) -> &'static str {
        match self {
            PlotKind::Trace => "ADC Traces",
            PlotKind::Mca => "MCA Spectrum",
            PlotKind::Baseline => "Baselines",
        }
    }

    pub fn x_label(&self) -> &'static str {
        match self {
            PlotKind::Mca => "Bin",
            _ => "Sample",
        }
    }

    pub fn y_label(&self) -> &'static str {
        match self {
            PlotKind::Mca => "Energy (arb) / Bin",
            _ => "ADC (arb) / Sample",
        }
    }

    pub fn file_stem(&self) -> &'static str {
        match self {
            PlotKind::Trace => "traces",
            PlotKind::Mca => "mca",
            PlotKind::Baseline => "baselines",
        }
    }
}

/// Render one plot kind from a CSV frame.
///
/// With a channel selected, a single chart of that channel's series is drawn.
/// Otherwise every column gets its own cell in a grid sized by GridLayout.
/// The optional x-limit applies to every chart. Returns the path of the
/// written PNG.
pub fn render_columns(
    frame: &CsvFrame,
    kind: PlotKind,
    channel: Option<usize>,
    xlim: Option<&AxisLimits>,
    output_dir: &Path,
) -> Result<PathBuf, PlotError> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("{}.png", kind.file_stem()));
    let root = BitMapBackend::new(&path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(PlotError::render)?;

    match channel {
        Some(chan) => {
            let series = frame
                .channel_column(chan)
                .map_err(|_| PlotError::NoSuchChannel(chan))?;
            let caption = format!("{} - {CSV_CHANNEL_PREFIX}{chan}", kind.title());
            draw_line_chart(
                &root,
                &caption,
                kind.x_label(),
                kind.y_label(),
                frame.index(),
                series,
                xlim,
            )?;
        }
        None => {
            let names = frame.column_names();
            if names.is_empty() || frame.n_rows() == 0 {
                return Err(PlotError::EmptyTable);
            }
            // titled() consumes the area, so hand it a clone of the shared root
            let titled = root
                .clone()
                .titled(kind.title(), ("sans-serif", 30))
                .map_err(PlotError::render)?;
            let grid = GridLayout::for_channels(names.len())?;
            let cells = titled.split_evenly((grid.rows, grid.cols));
            for (name, cell) in names.iter().zip(cells.iter()) {
                let series = frame.column(name)?;
                draw_line_chart(
                    cell,
                    name,
                    kind.x_label(),
                    kind.y_label(),
                    frame.index(),
                    series,
                    xlim,
                )?;
            }
        }
    }

    root.present().map_err(PlotError::render)?;
    log::info!("Rendered {} to {}", kind.title(), path.to_string_lossy());
    // The backend borrows `path` until `root` is dropped, so hand back a copy
    Ok(path.clone())
}

/// Render the per-channel energy histogram grid for decoded list-mode data.
///
/// Every channel present in the table gets exactly one cell; padding cells of
/// the square grid are left blank. Returns the path of the written PNG.
pub fn render_energy_grid(
    table: &EventTable,
    xlim: Option<&AxisLimits>,
    output_dir: &Path,
) -> Result<PathBuf, PlotError> {
    if table.is_empty() {
        return Err(PlotError::EmptyTable);
    }
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join("energy_histograms.png");
    let root = BitMapBackend::new(&path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(PlotError::render)?;
    let titled = root
        .clone()
        .titled("List-Mode Energy Histograms", ("sans-serif", 30))
        .map_err(PlotError::render)?;

    let channels = table.channels();
    let grid = GridLayout::for_channels(channels.len())?;
    let cells = titled.split_evenly((grid.rows, grid.cols));
    for (channel, cell) in channels.iter().zip(cells.iter()) {
        let energies = table.energies(*channel);
        draw_histogram(cell, &format!("Chan {channel}"), &energies, xlim)?;
    }

    root.present().map_err(PlotError::render)?;
    log::info!(
        "Rendered energy histograms for {} channels to {}",
        channels.len(),
        path.to_string_lossy()
    );
    Ok(path.clone())
}

fn draw_line_chart(
    area: &DrawingArea<BitMapBackend, Shift>,
    caption: &str,
    x_label: &str,
    y_label: &str,
    index: &[i64],
    values: &[f64],
    xlim: Option<&AxisLimits>,
) -> Result<(), PlotError> {
    if index.is_empty() || values.is_empty() {
        return Err(PlotError::EmptyTable);
    }

    let (x_min, x_max) = match xlim {
        Some(limits) => explicit_range(limits),
        None => {
            let min = *index.iter().min().unwrap_or(&0) as f64;
            let max = *index.iter().max().unwrap_or(&0) as f64;
            pad_range(min, max)
        }
    };
    let y_min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let y_max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let (y_min, y_max) = pad_range(y_min, y_max);

    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(PlotError::render)?;
    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .x_max_light_lines(0)
        .y_max_light_lines(0)
        .draw()
        .map_err(PlotError::render)?;
    chart
        .draw_series(LineSeries::new(
            index
                .iter()
                .zip(values.iter())
                .map(|(bin, value)| (*bin as f64, *value)),
            &BLUE,
        ))
        .map_err(PlotError::render)?;
    Ok(())
}

fn draw_histogram(
    area: &DrawingArea<BitMapBackend, Shift>,
    caption: &str,
    energies: &[u32],
    xlim: Option<&AxisLimits>,
) -> Result<(), PlotError> {
    let (x_min, x_max) = match xlim {
        Some(limits) => explicit_range(limits),
        None => {
            let max = energies.iter().max().cloned().unwrap_or(0) as f64;
            pad_range(0.0, max)
        }
    };

    let bin_width = (x_max - x_min) / ENERGY_HISTOGRAM_BINS as f64;
    let mut counts = vec![0_u64; ENERGY_HISTOGRAM_BINS];
    for energy in energies {
        let value = *energy as f64;
        if value < x_min || value >= x_max {
            continue;
        }
        let bin = (((value - x_min) / bin_width) as usize).min(ENERGY_HISTOGRAM_BINS - 1);
        counts[bin] += 1;
    }
    let y_max = counts.iter().max().cloned().unwrap_or(0).max(1) as f64 * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)
        .map_err(PlotError::render)?;
    chart
        .configure_mesh()
        .x_desc("Energy(arb)")
        .y_desc("Energy(arb) / bin")
        .x_max_light_lines(0)
        .y_max_light_lines(0)
        .draw()
        .map_err(PlotError::render)?;
    chart
        .draw_series(counts.iter().enumerate().filter(|(_, n)| **n > 0).map(
            |(bin, n)| {
                let left = x_min + bin as f64 * bin_width;
                Rectangle::new([(left, 0.0), (left + bin_width, *n as f64)], BLUE.filled())
            },
        ))
        .map_err(PlotError::render)?;
    Ok(())
}

/// User-given limits are drawn as-is unless they collapse to a single point,
/// in which case they get the same widening as an auto-ranged axis
fn explicit_range(limits: &AxisLimits) -> (f64, f64) {
    let low = limits.low as f64;
    let high = limits.high as f64;
    if (high - low).abs() < f64::EPSILON {
        pad_range(low, high)
    } else {
        (low, high)
    }
}

/// Widen a degenerate or tight range so the chart always has area to draw in
fn pad_range(min: f64, max: f64) -> (f64, f64) {
    if (max - min).abs() < f64::EPSILON {
        (min - 1.0, max + 1.0)
    } else {
        let pad = (max - min) * 0.05;
        (min - pad, max + pad)
    }
}
