//! Custom icon verification
//!
//! Graphviz only warns when an `image` cannot be loaded and then draws the
//! node without it. Icons are therefore checked up front: each must exist and
//! decode as PNG, JPEG or GIF.

use anyhow::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::core::{Diagram, DiagramError};

/// Facts about a verified icon asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconInfo {
    pub path: PathBuf,
    /// Detected image format, as its file extension
    pub format: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Check that `path` exists and decodes as an image
pub fn verify_icon(path: &Path) -> Result<IconInfo> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(DiagramError::IconNotFound {
                path: path.to_path_buf(),
            }
            .into())
        }
        Err(e) => return Err(DiagramError::invalid_icon(path, e.to_string()).into()),
    };

    let format =
        image::guess_format(&bytes).map_err(|e| DiagramError::invalid_icon(path, e.to_string()))?;
    let decoded = image::load_from_memory_with_format(&bytes, format)
        .map_err(|e| DiagramError::invalid_icon(path, e.to_string()))?;

    let info = IconInfo {
        path: path.to_path_buf(),
        format: format.extensions_str().first().copied().unwrap_or("image"),
        width: decoded.width(),
        height: decoded.height(),
    };
    trace!(path = %path.display(), format = info.format, width = info.width, height = info.height, "Icon verified");
    Ok(info)
}

/// Verify every custom icon referenced by the diagram
pub fn verify_icons(diagram: &Diagram) -> Result<Vec<IconInfo>> {
    let icons = diagram
        .custom_icons()
        .into_iter()
        .map(|path| verify_icon(path))
        .collect::<Result<Vec<_>>>()?;
    debug!(count = icons.len(), "Custom icons verified");
    Ok(icons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DiagramBuilder, DiagramConfig, Icon};
    use image::{ImageFormat, Rgba, RgbaImage};
    use tempfile::tempdir;

    fn write_png(path: &Path) {
        RgbaImage::from_pixel(8, 6, Rgba([32, 190, 255, 255]))
            .save_with_format(path, ImageFormat::Png)
            .unwrap();
    }

    #[test]
    fn test_verify_valid_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("icon.png");
        write_png(&path);

        let info = verify_icon(&path).unwrap();
        assert_eq!(info.format, "png");
        assert_eq!((info.width, info.height), (8, 6));
    }

    #[test]
    fn test_missing_icon() {
        let dir = tempdir().unwrap();
        let err = verify_icon(&dir.path().join("absent.png")).unwrap_err();
        match err.downcast_ref::<DiagramError>() {
            Some(DiagramError::IconNotFound { path }) => assert!(path.ends_with("absent.png")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_corrupt_icon() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"definitely not an image").unwrap();

        let err = verify_icon(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DiagramError>(),
            Some(DiagramError::InvalidIcon { .. })
        ));
    }

    #[test]
    fn test_truncated_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("truncated.png");
        write_png(&path);
        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

        assert!(verify_icon(&path).is_err());
    }

    #[test]
    fn test_verify_icons_over_diagram() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.png");
        write_png(&good);

        let mut builder = DiagramBuilder::new(DiagramConfig::new("t"));
        builder.node("Good", Icon::custom(&good));
        builder.node("Again", Icon::custom(&good));
        let diagram = builder.build().unwrap();
        assert_eq!(verify_icons(&diagram).unwrap().len(), 1);

        let mut builder = DiagramBuilder::new(DiagramConfig::new("t"));
        builder.node("Good", Icon::custom(&good));
        builder.node("Missing", Icon::custom(dir.path().join("missing.png")));
        let diagram = builder.build().unwrap();
        assert!(verify_icons(&diagram).is_err());
    }
}
