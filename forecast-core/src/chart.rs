//! Two-panel chart of the next 24 hours: temperature line on top, humidity bars below.

use std::{fs, ops::Range, path::Path};

use anyhow::Context;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use image::{ExtendedColorType, ImageEncoder, codecs::png::PngEncoder};
use plotters::prelude::*;
use tracing::debug;

use crate::{error::ForecastError, model::ForecastSample};

/// Eight 3-hour samples cover 24 hours.
pub const CHART_SAMPLES: usize = 8;
pub const DEFAULT_SIZE: (u32, u32) = (1000, 600);

const TEMPERATURE_COLOR: RGBColor = RGBColor(0xe7, 0x4c, 0x3c);
const HUMIDITY_COLOR: RGBColor = RGBColor(0x34, 0x98, 0xdb);
const TIME_LABEL_FORMAT: &str = "%H:%M";

/// PNG-encoded chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    png: Vec<u8>,
    width: u32,
    height: u32,
}

impl ChartImage {
    pub fn from_png(png: Vec<u8>, width: u32, height: u32) -> Self {
        Self { png, width, height }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `data:image/png;base64,...`, suitable for an `<img src>`.
    pub fn to_data_uri(&self) -> String {
        format!("data:image/png;base64,{}", BASE64.encode(&self.png))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        fs::write(path, &self.png)
            .with_context(|| format!("Failed to write chart image: {}", path.display()))
    }
}

/// Series and labels extracted from the first [`CHART_SAMPLES`] samples.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub city: String,
    pub labels: Vec<String>,
    pub temperatures: Vec<f64>,
    pub humidities: Vec<u32>,
}

impl ChartData {
    pub fn from_samples(samples: &[ForecastSample], city: &str) -> Result<Self, ForecastError> {
        if samples.is_empty() {
            return Err(ForecastError::Render("no forecast samples to plot".to_string()));
        }

        let window = &samples[..samples.len().min(CHART_SAMPLES)];

        Ok(Self {
            city: city.to_string(),
            labels: window
                .iter()
                .map(|s| s.timestamp.format(TIME_LABEL_FORMAT).to_string())
                .collect(),
            temperatures: window.iter().map(|s| s.temperature).collect(),
            humidities: window.iter().map(|s| u32::from(s.humidity)).collect(),
        })
    }

    /// Temperature extent padded by 10%, or by one degree for a flat series.
    pub fn temperature_range(&self) -> Range<f64> {
        let (min, max) = self
            .temperatures
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| (lo.min(*t), hi.max(*t)));

        let padding = if (max - min).abs() > 1e-6 { (max - min) * 0.1 } else { 1.0 };
        (min - padding)..(max + padding)
    }

    /// Sample indices for the x axis. Integer ranges are inclusive in plotters,
    /// so the last index is `len - 1`.
    pub fn x_range(&self) -> Range<usize> {
        0..self.labels.len().saturating_sub(1)
    }

    fn label_for(&self, value: &SegmentValue<usize>) -> String {
        match value {
            SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
                self.labels.get(*i).cloned().unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        }
    }
}

pub fn render(samples: &[ForecastSample], city: &str) -> Result<ChartImage, ForecastError> {
    render_with_size(samples, city, DEFAULT_SIZE)
}

pub fn render_with_size(
    samples: &[ForecastSample],
    city: &str,
    (width, height): (u32, u32),
) -> Result<ChartImage, ForecastError> {
    let data = ChartData::from_samples(samples, city)?;

    if width == 0 || height == 0 {
        return Err(ForecastError::Render(format!("invalid chart size {width}x{height}")));
    }

    let mut pixels = vec![0u8; width as usize * height as usize * 3];
    draw(&data, &mut pixels, (width, height))
        .map_err(|e| ForecastError::Render(e.to_string()))?;

    let png = encode_png(&pixels, width, height)?;
    debug!(city, width, height, bytes = png.len(), "rendered forecast chart");

    Ok(ChartImage::from_png(png, width, height))
}

fn draw(
    data: &ChartData,
    pixels: &mut [u8],
    size: (u32, u32),
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::with_buffer(pixels, size).into_drawing_area();
    root.fill(&WHITE)?;

    let panels = root.split_evenly((2, 1));
    let n = data.labels.len();
    let x_axis = || data.x_range().into_segmented();
    let title_font = ("sans-serif", 22.0).into_font().style(FontStyle::Bold);
    let x_label = |v: &SegmentValue<usize>| data.label_for(v);

    let mut temperature = ChartBuilder::on(&panels[0])
        .caption(format!("24-Hour Temperature Forecast - {}", data.city), title_font.clone())
        .margin(12)
        .x_label_area_size(30)
        .y_label_area_size(55)
        .build_cartesian_2d(x_axis(), data.temperature_range())?;

    temperature
        .configure_mesh()
        .x_labels(n)
        .x_label_formatter(&x_label)
        .y_desc("Temperature (°C)")
        .bold_line_style(BLACK.mix(0.3))
        .light_line_style(BLACK.mix(0.05))
        .draw()?;

    let points: Vec<(SegmentValue<usize>, f64)> = data
        .temperatures
        .iter()
        .enumerate()
        .map(|(i, t)| (SegmentValue::CenterOf(i), *t))
        .collect();

    temperature.draw_series(LineSeries::new(points.clone(), TEMPERATURE_COLOR.stroke_width(2)))?;
    temperature.draw_series(
        points.into_iter().map(|p| Circle::new(p, 4, TEMPERATURE_COLOR.filled())),
    )?;

    let mut humidity = ChartBuilder::on(&panels[1])
        .caption("24-Hour Humidity Forecast", title_font)
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(x_axis(), 0u32..100u32)?;

    humidity
        .configure_mesh()
        .x_labels(n)
        .x_label_formatter(&x_label)
        .x_desc("Time")
        .y_desc("Humidity (%)")
        .bold_line_style(BLACK.mix(0.3))
        .light_line_style(BLACK.mix(0.05))
        .draw()?;

    humidity.draw_series(
        Histogram::vertical(&humidity)
            .style(HUMIDITY_COLOR.mix(0.7).filled())
            .margin(8)
            .data(data.humidities.iter().enumerate().map(|(i, h)| (i, *h))),
    )?;

    root.present()?;
    Ok(())
}

fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ForecastError> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| ForecastError::Render(format!("PNG encoding failed: {e}")))?;
    Ok(png)
}
