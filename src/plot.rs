//! Bar chart rendering for per-CPU tables
//!
//! Thin visualization layer over `plotters`: one bar per CPU in index order,
//! optional dashed reference lines, SVG output either in memory or on disk.

use std::path::Path;

use anyhow::{Context, Result};
use plotters::coord::ranged1d::SegmentValue;
use plotters::coord::Shift;
use plotters::element::DashedPathElement;
use plotters::prelude::*;
use tracing::debug;

use crate::table::CpuCountTable;

const CHART_SIZE: (u32, u32) = (1024, 640);

/// A horizontal reference line at a fixed y value.
#[derive(Debug, Clone)]
struct RefLine {
    value: f64,
    label: String,
    color_idx: usize,
}

/// Bar chart over a per-CPU count table.
///
/// Bars own the first position of the color cycle; every reference line
/// added afterwards takes the next one. No legend box is drawn.
#[derive(Debug, Clone)]
pub struct CpuBarChart<'a> {
    table: &'a CpuCountTable,
    title: String,
    y_label: String,
    color_cursor: usize,
    ref_lines: Vec<RefLine>,
}

impl<'a> CpuBarChart<'a> {
    pub fn new(table: &'a CpuCountTable) -> Self {
        Self {
            table,
            title: String::new(),
            y_label: "Count".to_string(),
            color_cursor: 0,
            ref_lines: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_y_label(mut self, y_label: &str) -> Self {
        self.y_label = y_label.to_string();
        self
    }

    /// Add a dashed horizontal reference line at `value`, colored with the
    /// next position of the chart's color cycle.
    pub fn add_ref_line(&mut self, value: f64, label: &str) {
        self.color_cursor += 1;
        self.ref_lines.push(RefLine {
            value,
            label: label.to_string(),
            color_idx: self.color_cursor,
        });
    }

    /// Number of reference lines queued for drawing.
    pub fn ref_line_count(&self) -> usize {
        self.ref_lines.len()
    }

    /// Render into an in-memory SVG document.
    pub fn render_svg(&self) -> Result<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
            self.draw(&root)?;
        }
        Ok(svg)
    }

    /// Render and write to `path` in one step. The file handle is scoped to
    /// the write, so it is closed on every exit path. Returns the rendered
    /// document.
    pub fn render_to_file(&self, path: &Path) -> Result<String> {
        let svg = self.render_svg()?;
        std::fs::write(path, &svg)
            .with_context(|| format!("failed to write chart to {}", path.display()))?;
        debug!(path = %path.display(), bytes = svg.len(), "chart written");
        Ok(svg)
    }

    fn draw(&self, root: &DrawingArea<SVGBackend<'_>, Shift>) -> Result<()> {
        root.fill(&WHITE)?;

        // Nothing to plot for a zero-CPU table; leave a blank chart.
        if self.table.is_empty() {
            root.present()?;
            return Ok(());
        }

        let cpus = self.table.cpus();
        let highest = self
            .ref_lines
            .iter()
            .map(|l| l.value)
            .fold(self.table.max_count() as f64, f64::max);
        let y_max = if highest > 0.0 { highest * 1.1 } else { 1.0 };

        let mut builder = ChartBuilder::on(root);
        builder
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60);
        if !self.title.is_empty() {
            builder.caption(&self.title, ("sans-serif", 30));
        }
        let mut chart = builder.build_cartesian_2d((0..cpus).into_segmented(), 0f64..y_max)?;

        chart
            .configure_mesh()
            .x_desc("CPU")
            .y_desc(self.y_label.as_str())
            .x_label_formatter(&|x| match x {
                SegmentValue::Exact(cpu) | SegmentValue::CenterOf(cpu) => cpu.to_string(),
                SegmentValue::Last => String::new(),
            })
            .draw()?;

        let bar_color = Palette99::pick(0);
        chart.draw_series(
            Histogram::vertical(&chart)
                .style(bar_color.filled())
                .margin(3)
                .data(self.table.iter().map(|(cpu, count)| (cpu, count as f64))),
        )?;

        for line in &self.ref_lines {
            let style = ShapeStyle::from(&Palette99::pick(line.color_idx)).stroke_width(2);
            chart
                .draw_series(std::iter::once(DashedPathElement::new(
                    vec![
                        (SegmentValue::Exact(0), line.value),
                        (SegmentValue::Exact(cpus), line.value),
                    ],
                    10,
                    6,
                    style,
                )))?
                .label(line.label.as_str());
        }

        root.present()?;
        Ok(())
    }
}
