//! SVG rasterization
//!
//! Turns a vector source into an opaque pixel buffer using resvg. The
//! background is painted white before the graphic is drawn so transparent
//! regions never leak into raster exports (JPEG has no alpha channel).

use crate::error::{Error, Result};
use crate::export::{PixelSize, RasterSize, VectorSource};
use log::debug;
use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg;

// ─────────────────────────────────────────────────────────────────────────────
// Pixel Buffer
// ─────────────────────────────────────────────────────────────────────────────

/// An in-memory bitmap produced by the rasterizer.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    pixmap: Pixmap,
}

impl PixelBuffer {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Straight (non-premultiplied) RGBA bytes, row-major.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|pixel| {
                let c = pixel.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    /// RGB bytes with alpha dropped, row-major.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|pixel| {
                let c = pixel.demultiply();
                [c.red(), c.green(), c.blue()]
            })
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rasterizer
// ─────────────────────────────────────────────────────────────────────────────

/// Draws vector sources onto white pixel surfaces.
#[derive(Debug, Clone, Default)]
pub struct Rasterizer;

impl Rasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Rasterize `source` at `size`.
    ///
    /// # Errors
    ///
    /// - `Error::SourceMissing` if the source cannot be serialized
    /// - `Error::DecodeFailed` if the markup is not a drawable SVG or the
    ///   pixel surface cannot be allocated
    pub fn rasterize(&self, source: &dyn VectorSource, size: RasterSize) -> Result<PixelBuffer> {
        let markup = source.markup().ok_or(Error::SourceMissing)?;
        let tree = parse_tree(&markup)?;

        let target = match size {
            RasterSize::Fixed(size) => size,
            RasterSize::Natural => natural_size(&tree)?,
        };

        let mut pixmap = Pixmap::new(target.width(), target.height()).ok_or_else(|| {
            Error::DecodeFailed(format!(
                "cannot allocate a {}x{} surface",
                target.width(),
                target.height()
            ))
        })?;
        pixmap.fill(Color::WHITE);

        let tree_size = tree.size();
        let transform = Transform::from_scale(
            target.width() as f32 / tree_size.width(),
            target.height() as f32 / tree_size.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        debug!(
            "Rasterized {}x{} source to {}x{}",
            tree_size.width(),
            tree_size.height(),
            target.width(),
            target.height()
        );
        Ok(PixelBuffer { pixmap })
    }
}

fn parse_tree(markup: &str) -> Result<usvg::Tree> {
    usvg::Tree::from_str(markup, &usvg::Options::default())
        .map_err(|e| Error::DecodeFailed(e.to_string()))
}

fn natural_size(tree: &usvg::Tree) -> Result<PixelSize> {
    let size = tree.size().to_int_size();
    PixelSize::new(size.width(), size.height())
        .ok_or_else(|| Error::DecodeFailed("source has an empty size".to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
