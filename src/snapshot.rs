//! Writes a rendered map and the geometry behind it to disk.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::geometry::Geometry;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("geometry serialisation failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct GeometryDocument<'a> {
    generated_at: DateTime<Utc>,
    geometry: &'a Geometry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub svg: PathBuf,
    pub json: PathBuf,
}

pub struct MapExporter {
    output_dir: PathBuf,
}

impl MapExporter {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// File stem shared by both outputs, e.g. `cell_800x600`.
    pub fn stem(geometry: &Geometry) -> String {
        format!(
            "cell_{}x{}",
            geometry.viewport.width.round() as i64,
            geometry.viewport.height.round() as i64
        )
    }

    /// Writes `<stem>.svg` and `<stem>.json`, creating the directory when
    /// needed. Existing files are overwritten.
    pub fn write(&self, svg: &str, geometry: &Geometry) -> Result<ExportPaths, ExportError> {
        fs::create_dir_all(&self.output_dir)?;
        let stem = Self::stem(geometry);
        let paths = ExportPaths {
            svg: self.output_dir.join(format!("{stem}.svg")),
            json: self.output_dir.join(format!("{stem}.json")),
        };

        fs::write(&paths.svg, svg)?;
        let document = GeometryDocument {
            generated_at: Utc::now(),
            geometry,
        };
        fs::write(&paths.json, serde_json::to_string_pretty(&document)?)?;

        info!(svg = %paths.svg.display(), json = %paths.json.display(), "map exported");
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutParameters;
    use crate::geometry::Viewport;

    #[test]
    fn stem_uses_rounded_viewport() {
        let geo = Geometry::compute(&LayoutParameters::default(), Viewport::new(800.4, 599.6));
        assert_eq!(MapExporter::stem(&geo), "cell_800x600");
    }

    #[test]
    fn writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let geo = Geometry::compute(&LayoutParameters::default(), Viewport::new(640.0, 480.0));
        let exporter = MapExporter::new(dir.path().join("out"));
        let paths = exporter.write("<svg/>", &geo).unwrap();

        assert_eq!(fs::read_to_string(&paths.svg).unwrap(), "<svg/>");
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&paths.json).unwrap()).unwrap();
        assert!(json["generated_at"].is_string());
        assert_eq!(json["geometry"]["viewport"]["width"], 640.0);
        assert_eq!(json["geometry"]["params"]["num_guilds"], 10);
    }
}
