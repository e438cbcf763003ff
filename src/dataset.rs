use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use log::info;

use crate::point::Point;

/// On-disk layouts accepted for point files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointFormat {
    /// `[[x, y], [x, y], ...]`
    Json,
    /// One `x y` pair per line, whitespace separated.
    Text,
}

impl PointFormat {
    /// `.txt` files are read as text, everything else as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("txt") => PointFormat::Text,
            _ => PointFormat::Json,
        }
    }
}

/// Reads the whole point file. Any malformed entry fails the whole load.
pub fn load_points(path: &Path) -> Result<Vec<Point>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let points = match PointFormat::from_path(path) {
        PointFormat::Json => read_json(reader),
        PointFormat::Text => read_text(reader),
    }
    .with_context(|| format!("Failed to read points from {}", path.display()))?;

    info!("Loaded {} points from {}", points.len(), path.display());
    Ok(points)
}

pub fn read_json<R: Read>(reader: R) -> Result<Vec<Point>> {
    let points: Vec<Point> = serde_json::from_reader(reader)?;
    Ok(points)
}

pub fn read_text<R: BufRead>(reader: R) -> Result<Vec<Point>> {
    let mut points = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let coords = line
            .split_whitespace()
            .map(|s| s.parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Line {}: invalid number", line_no + 1))?;
        if coords.len() != 2 {
            return Err(anyhow!(
                "Line {}: expected 2 coordinates, got {}",
                line_no + 1,
                coords.len()
            ));
        }
        points.push(Point::new(coords[0], coords[1]));
    }
    Ok(points)
}

/// Writes points as a JSON array of pairs.
pub fn write_points(path: &Path, points: &[Point]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, points)?;
    writer.flush()?;
    info!("Wrote {} points to {}", points.len(), path.display());
    Ok(())
}
