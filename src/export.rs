//! PNG export of a rendered surface.
//!
//! The roadmap has no durable storage format; a PNG snapshot is the only
//! persisted artifact. Export failures are transient [`KnowmapError::Render`]
//! errors and never touch the displayed graph or controller state.

use std::path::{Path, PathBuf};

use crate::error::{KnowmapError, Result};
use crate::render::RasterSurface;

/// Fallback file stem when no article is displayed.
const DEFAULT_STEM: &str = "roadmap";

/// Turn an article title into a safe file stem: characters unsafe for
/// filenames are dropped, runs of whitespace collapse to one space, and a
/// blank result falls back to `"roadmap"`.
pub fn sanitize_filename(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect();
    let stem = kept.split_whitespace().collect::<Vec<_>>().join(" ");
    if stem.is_empty() {
        DEFAULT_STEM.to_string()
    } else {
        stem
    }
}

/// Encode `surface` as a PNG in `dir`, named after the displayed article's
/// title (or `roadmap.png` when none is displayed). Returns the written path.
pub fn export_png(surface: &RasterSurface, dir: &Path, title: Option<&str>) -> Result<PathBuf> {
    let stem = title.map(sanitize_filename).unwrap_or_else(|| DEFAULT_STEM.to_string());
    let path = dir.join(format!("{stem}.png"));

    let img = image::RgbaImage::from_raw(
        surface.width(),
        surface.height(),
        surface.pixels().to_vec(),
    )
    .ok_or_else(|| KnowmapError::Render("Surface buffer size mismatch".to_string()))?;

    img.save(&path)
        .map_err(|e| KnowmapError::Render(format!("PNG encode failed: {}", e)))?;

    log::debug!("Exported roadmap to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Color, DrawBackend};
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_keeps_plain_titles() {
        assert_eq!(sanitize_filename("Osmosis"), "Osmosis");
        assert_eq!(sanitize_filename("Reverse osmosis"), "Reverse osmosis");
    }

    #[test]
    fn test_sanitize_strips_unsafe_characters() {
        assert_eq!(sanitize_filename("A/B\\C:D*E?F\"G<H>I|J"), "ABCDEFGHIJ");
        assert_eq!(sanitize_filename("What is life?"), "What is life");
    }

    #[test]
    fn test_sanitize_collapses_whitespace() {
        assert_eq!(sanitize_filename("  Osmotic \t pressure "), "Osmotic pressure");
    }

    #[test]
    fn test_sanitize_blank_falls_back_to_roadmap() {
        assert_eq!(sanitize_filename(""), "roadmap");
        assert_eq!(sanitize_filename("???"), "roadmap");
    }

    #[test]
    fn test_export_uses_article_title() {
        let temp_dir = TempDir::new().unwrap();
        let mut surface = RasterSurface::new(16, 16);
        surface.clear(Color::rgb(10, 20, 30));

        let path = export_png(&surface, temp_dir.path(), Some("Osmosis")).unwrap();
        assert_eq!(path.file_name().unwrap(), "Osmosis.png");
        assert!(path.exists());

        // PNG magic bytes.
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_export_without_article_defaults_to_roadmap() {
        let temp_dir = TempDir::new().unwrap();
        let surface = RasterSurface::new(8, 8);

        let path = export_png(&surface, temp_dir.path(), None).unwrap();
        assert_eq!(path.file_name().unwrap(), "roadmap.png");
        assert!(path.exists());
    }

    #[test]
    fn test_export_to_missing_directory_fails_recoverably() {
        let temp_dir = TempDir::new().unwrap();
        let surface = RasterSurface::new(8, 8);
        let missing = temp_dir.path().join("no-such-dir");

        let err = export_png(&surface, &missing, Some("Osmosis")).unwrap_err();
        assert!(matches!(err, KnowmapError::Render(_)));
    }
}
