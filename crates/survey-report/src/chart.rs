//! Percentage bar chart rendering.

use std::error::Error;
use std::f64::consts::FRAC_1_SQRT_2;
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::Color as _;
use survey_model::{Color, ColorMap, Distribution};

const FONT_FAMILY: &str = "sans-serif";
const TITLE_SIZE: u32 = 28;
const TICK_SIZE: u32 = 16;
const AXIS_DESC_SIZE: u32 = 18;
const BAR_WIDTH: f64 = 0.8;
const GRID_COLOR: RGBColor = RGBColor(0xb0, 0xb0, 0xb0);
const GRID_ALPHA: f64 = 0.7;
const DASH: i32 = 6;
const GAP: i32 = 4;
/// Pixels darker than this in a rendered label are copied to the chart.
const INK_THRESHOLD: u8 = 250;

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("failed to write chart {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no bars to draw for {variable}{}", in_partition(.partition))]
    EmptyDistribution {
        variable: String,
        partition: Option<String>,
    },

    #[error("failed to draw chart {path}: {message}")]
    Drawing { path: PathBuf, message: String },
}

fn in_partition(partition: &Option<String>) -> String {
    partition
        .as_deref()
        .map(|p| format!(" in {p}"))
        .unwrap_or_default()
}

/// Text and canvas settings for one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub y_label: String,
    pub width: u32,
    pub height: u32,
}

impl ChartSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            y_label: "Percentage (%)".to_string(),
            width: 1400,
            height: 800,
        }
    }
}

/// Draw `distribution` as a bar chart PNG at `path`, creating parent
/// directories. Bars keep the distribution's order.
pub fn render_chart(
    spec: &ChartSpec,
    distribution: &Distribution,
    colors: &ColorMap,
    path: &Path,
) -> Result<(), ChartError> {
    if distribution.is_empty() {
        return Err(ChartError::EmptyDistribution {
            variable: distribution.variable.clone(),
            partition: distribution.partition.clone(),
        });
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| ChartError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::File::create(path).map_err(|source| ChartError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    draw(spec, distribution, colors, path).map_err(|e| {
        let _ = std::fs::remove_file(path);
        ChartError::Drawing {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })
}

/// Whether the chart font can be loaded on this machine.
pub fn fonts_available() -> bool {
    let mut buffer = vec![0u8; 3];
    let area = BitMapBackend::with_buffer(&mut buffer, (1, 1)).into_drawing_area();
    let font = (FONT_FAMILY, TICK_SIZE).into_font();
    area.estimate_text_size("Ag", &font.into()).is_ok()
}

fn draw(
    spec: &ChartSpec,
    distribution: &Distribution,
    colors: &ColorMap,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (spec.width, spec.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let tick_font = (FONT_FAMILY, TICK_SIZE).into_font().color(&BLACK);
    let label_sizes = distribution
        .labels()
        .map(|label| root.estimate_text_size(label, &tick_font))
        .collect::<Result<Vec<_>, _>>()?;
    // Vertical extent of a label rotated by 45 degrees.
    let label_drop = label_sizes
        .iter()
        .map(|(w, h)| (f64::from(*w + *h) * FRAC_1_SQRT_2).ceil() as u32)
        .max()
        .unwrap_or(0);
    let x_area = (label_drop + 16).min(spec.height * 45 / 100);

    let bars = distribution.len() as f64;
    let y_max = nice_upper_bound(distribution.max_percentage());

    let mut chart = ChartBuilder::on(&root)
        .caption(
            &spec.title,
            (FONT_FAMILY, TITLE_SIZE).into_font().style(FontStyle::Bold),
        )
        .margin(20)
        .x_label_area_size(x_area)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..bars, 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(0)
        .y_labels(10)
        .y_desc(&spec.y_label)
        .axis_desc_style((FONT_FAMILY, AXIS_DESC_SIZE))
        .label_style((FONT_FAMILY, TICK_SIZE))
        .y_label_formatter(&|v| format!("{v:.0}"))
        .draw()?;

    let step = tick_step(y_max);
    let mut y = step;
    while y <= y_max + f64::EPSILON {
        let (x0, py) = chart.backend_coord(&(0.0, y));
        let (x1, _) = chart.backend_coord(&(bars, y));
        draw_dashed_line(&root, x0, x1, py)?;
        y += step;
    }

    chart.draw_series(distribution.entries.iter().enumerate().map(|(idx, entry)| {
        let left = idx as f64 + (1.0 - BAR_WIDTH) / 2.0;
        let fill = to_rgb(colors.color_for(&entry.label));
        Rectangle::new([(left, 0.0), (left + BAR_WIDTH, entry.percentage)], fill.filled())
    }))?;

    for (idx, (label, size)) in distribution.labels().zip(&label_sizes).enumerate() {
        let (x, y) = chart.backend_coord(&(idx as f64 + 0.5, 0.0));
        draw_rotated_label(&root, label, &tick_font, *size, (x, y + 6))?;
    }

    root.present()?;
    Ok(())
}

fn to_rgb(color: Color) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

/// Headroom above the tallest bar, rounded up to a whole tick.
fn nice_upper_bound(max: f64) -> f64 {
    if max <= 0.0 {
        return 1.0;
    }
    let padded = max * 1.05;
    let step = tick_step(padded);
    (padded / step).ceil() * step
}

/// 1, 2 or 5 times a power of ten, giving roughly eight ticks.
fn tick_step(range: f64) -> f64 {
    let raw = range / 8.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let factor = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

fn draw_dashed_line<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    x0: i32,
    x1: i32,
    y: i32,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let style = GRID_COLOR.mix(GRID_ALPHA).stroke_width(1);
    let mut x = x0;
    while x < x1 {
        let end = (x + DASH).min(x1);
        root.draw(&PathElement::new(vec![(x, y), (end, y)], style))?;
        x += DASH + GAP;
    }
    Ok(())
}

/// Draw `text` rotated 45 degrees counter-clockwise with its top-right
/// corner at `anchor`.
///
/// The label is rasterised upright into a scratch buffer and each target
/// pixel is mapped back through the inverse rotation.
fn draw_rotated_label<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    text: &str,
    font: &TextStyle<'_>,
    (width, height): (u32, u32),
    anchor: (i32, i32),
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let (w, h) = (width.max(1), height.max(1));
    let mut buffer = vec![255u8; (w * h * 3) as usize];
    {
        let scratch = BitMapBackend::with_buffer(&mut buffer, (w, h)).into_drawing_area();
        scratch.draw(&Text::new(text, (0, 0), font.clone()))?;
        scratch.present()?;
    }

    let (c, s) = (FRAC_1_SQRT_2, FRAC_1_SQRT_2);
    let (tw, th) = (f64::from(w), f64::from(h));
    let dx_min = (-tw * c).floor() as i32;
    let dx_max = (th * s).ceil() as i32;
    let dy_max = (tw * s + th * c).ceil() as i32;

    for dy in 0..=dy_max {
        for dx in dx_min..=dx_max {
            let (fx, fy) = (f64::from(dx), f64::from(dy));
            // Offset along the baseline, measured back from the right end.
            let u = fx * c - fy * s + tw;
            let v = fx * s + fy * c;
            if u < 0.0 || v < 0.0 || u >= tw || v >= th {
                continue;
            }
            let idx = ((v as u32 * w + u as u32) * 3) as usize;
            let [r, g, b] = [buffer[idx], buffer[idx + 1], buffer[idx + 2]];
            if r.min(g).min(b) < INK_THRESHOLD {
                root.draw_pixel((anchor.0 + dx, anchor.1 + dy), &RGBColor(r, g, b))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_steps_are_round_numbers() {
        assert_eq!(tick_step(80.0), 10.0);
        assert_eq!(tick_step(40.0), 5.0);
        assert_eq!(tick_step(12.0), 2.0);
        assert!((tick_step(4.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn upper_bound_leaves_headroom() {
        assert_eq!(nice_upper_bound(66.67), 80.0);
        assert_eq!(nice_upper_bound(100.0), 120.0);
        assert_eq!(nice_upper_bound(0.0), 1.0);
    }
}
