//! Rasterize rendered outlines for file output.
//!
//! Outlines contain no text, so no font database is loaded.

use resvg::usvg;
use tiny_skia::{Pixmap, Transform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Pdf,
}

impl OutputFormat {
    pub fn from_extension(ext: &str) -> Result<Self, String> {
        match ext.to_ascii_lowercase().as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Png),
            "pdf" => Ok(OutputFormat::Pdf),
            other => Err(format!(
                "Unsupported output format: .{} (use .svg, .png or .pdf)",
                other
            )),
        }
    }
}

pub fn svg_to_png(svg: &str, scale: f32) -> Result<Vec<u8>, String> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(format!("Invalid --png-scale value: {}", scale));
    }

    let opts = usvg::Options::default();
    let tree =
        usvg::Tree::from_str(svg, &opts).map_err(|e| format!("Failed to parse SVG: {}", e))?;

    let width = (tree.size().width() * scale).ceil() as u32;
    let height = (tree.size().height() * scale).ceil() as u32;

    let mut pixmap = Pixmap::new(width, height).ok_or("Failed to create pixmap")?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| format!("Failed to encode PNG: {}", e))
}

pub fn svg_to_pdf(svg: &str) -> Result<Vec<u8>, String> {
    let opts = svg2pdf::usvg::Options::default();
    let tree = svg2pdf::usvg::Tree::from_str(svg, &opts)
        .map_err(|e| format!("Failed to parse SVG: {}", e))?;

    svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|e| format!("Failed to convert SVG to PDF: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::{RenderOptions, render_outline};
    use crate::shape::{ShapeKind, ShapeSpec};
    use crate::theme::ColorMode;

    #[test]
    fn format_from_extension() {
        assert_eq!(OutputFormat::from_extension("PNG"), Ok(OutputFormat::Png));
        assert!(OutputFormat::from_extension("gif").is_err());
    }

    #[test]
    fn png_has_canvas_dimensions() {
        let options = RenderOptions {
            canvas_size: 120,
            color_mode: ColorMode::Light,
            show_grid: true,
            ..RenderOptions::default()
        };
        let svg = render_outline(&ShapeSpec::new(ShapeKind::Circle), &options).unwrap();
        let png = svg_to_png(&svg, 2.0).unwrap();

        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let pixmap = Pixmap::decode_png(&png).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (240, 240));
    }

    #[test]
    fn rejects_bad_scale() {
        assert!(svg_to_png("<svg/>", 0.0).is_err());
        assert!(svg_to_png("<svg/>", f32::NAN).is_err());
    }
}
