//! PNG export of a single gradient.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use phase_engine::time::Throttle;
use phase_mesh::export::export_filename_today;
use phase_mesh::render::{apply_circular_mask, render};
use phase_mesh::{ExportSize, Gradient};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export throttled, try again in {} ms", .remaining.as_millis())]
    Throttled { remaining: Duration },

    #[error("PNG encoding failed: {0:#}")]
    Encode(anyhow::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ExportOptions {
    pub size: ExportSize,
    /// Clear everything outside the inscribed circle.
    pub circular: bool,
}

/// Writes PNG exports into one directory, at most one per `min_interval`.
#[derive(Debug)]
pub struct Exporter {
    throttle: Throttle,
    out_dir: PathBuf,
}

impl Exporter {
    pub fn new(out_dir: impl Into<PathBuf>, min_interval: Duration) -> Self {
        Self { throttle: Throttle::new(min_interval), out_dir: out_dir.into() }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Renders `gradient` and writes it as `gradient-mesh-...png`.
    pub fn export(&mut self, gradient: &Gradient, options: ExportOptions, now: Instant) -> Result<PathBuf, ExportError> {
        if !self.throttle.try_acquire(now) {
            return Err(ExportError::Throttled { remaining: self.throttle.remaining(now) });
        }

        let mut surface = render(gradient, options.size.pixels());
        if options.circular {
            apply_circular_mask(&mut surface);
        }
        let png = surface.encode_png().map_err(ExportError::Encode)?;

        let path = self.out_dir.join(export_filename_today(gradient, options.size));
        fs::create_dir_all(&self.out_dir)
            .and_then(|()| fs::write(&path, &png))
            .map_err(|source| ExportError::Io { path: path.clone(), source })?;

        log::info!("exported {} ({} bytes)", path.display(), png.len());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use phase_mesh::factory::{create_gradient, stops_from_colors};
    use phase_mesh::{BlendMode, GradientConfig};

    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn gradient() -> Gradient {
        create_gradient(GradientConfig {
            color_stops: stops_from_colors(&["#FF6B6B", "#4ECDC4"]),
            blend_mode: Some(BlendMode::Screen),
        })
    }

    #[test]
    fn writes_named_png() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = Exporter::new(dir.path().join("out"), Duration::from_secs(1));
        let options = ExportOptions { size: ExportSize::Px32, circular: false };

        let path = exporter.export(&gradient(), options, Instant::now()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("gradient-mesh-FF6B6B-4ECDC4-32px-"), "{name}");
        assert!(name.ends_with(".png"));
        assert!(fs::read(&path).unwrap().starts_with(PNG_MAGIC));
    }

    #[test]
    fn exports_are_throttled() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = Exporter::new(dir.path(), Duration::from_secs(1));
        let options = ExportOptions { size: ExportSize::Px32, circular: true };
        let g = gradient();
        let t0 = Instant::now();

        exporter.export(&g, options, t0).unwrap();
        match exporter.export(&g, options, t0 + Duration::from_millis(300)) {
            Err(ExportError::Throttled { remaining }) => assert_eq!(remaining, Duration::from_millis(700)),
            other => panic!("expected throttle, got {other:?}"),
        }
        assert!(exporter.export(&g, options, t0 + Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn unwritable_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();

        let mut exporter = Exporter::new(&blocker, Duration::ZERO);
        let err = exporter.export(&gradient(), ExportOptions::default(), Instant::now()).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }
}
