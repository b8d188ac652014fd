//! Shape geometry and SVG outline rendering.
//!
//! User units become pixels through a single scale factor chosen so the
//! dominant dimension of a `ShapeSpec` spans `canvas_size * fill_ratio`. All
//! geometry is centered on the origin; the canvas viewBox is centered too.

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt::Write as _;

use crate::shape::{MAX_POLYGON_SIDES, ShapeError, ShapeKind, ShapeSpec};
use crate::theme::{ColorMode, SketchTheme};

const GRID_STEP: usize = 50;

const DEFAULT_SQUARE_SIDE: f64 = 4.0;
const DEFAULT_RECT_WIDTH: f64 = 8.0;
const DEFAULT_RECT_HEIGHT: f64 = 3.0;
const DEFAULT_TRIANGLE_SIDE: f64 = 6.0;
const DEFAULT_RADIUS: f64 = 3.0;
const DEFAULT_POLYGON_SIDES: u32 = 6;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub canvas_size: u32,
    /// Fraction of the canvas the dominant dimension should cover.
    pub fill_ratio: f64,
    pub zoom: f64,
    pub stroke_width: u32,
    pub show_grid: bool,
    pub color_mode: ColorMode,
    pub theme: SketchTheme,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            canvas_size: 1000,
            fill_ratio: 0.80,
            zoom: 1.0,
            stroke_width: 10,
            show_grid: false,
            color_mode: ColorMode::Auto,
            theme: SketchTheme::default(),
        }
    }
}

/// Scaled, origin-centered geometry for one shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Outline {
    /// Closed polygon; vertices in drawing order.
    Polygon(Vec<(f64, f64)>),
    Circle { radius: f64 },
}

impl Outline {
    /// Width and height of the axis-aligned bounding box.
    pub fn extent(&self) -> (f64, f64) {
        match self {
            Outline::Circle { radius } => (radius * 2.0, radius * 2.0),
            Outline::Polygon(points) => {
                let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
                let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
                for &(x, y) in points {
                    min_x = min_x.min(x);
                    max_x = max_x.max(x);
                    min_y = min_y.min(y);
                    max_y = max_y.max(y);
                }
                if points.is_empty() {
                    (0.0, 0.0)
                } else {
                    (max_x - min_x, max_y - min_y)
                }
            }
        }
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Scale factor from user units to canvas pixels.
///
/// Candidates are `side`, `width`, `height` and the diameter `2 * radius`;
/// only positive values count. A spec with no size information gets a
/// scale of `zoom`.
pub fn auto_scale(spec: &ShapeSpec, fill_target: f64, zoom: f64) -> f64 {
    let max_dim = [
        positive(spec.side),
        positive(spec.width),
        positive(spec.height),
        positive(spec.radius).map(|r| r * 2.0),
    ]
    .into_iter()
    .flatten()
    .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |m| m.max(d))));

    match max_dim {
        Some(max_dim) => fill_target / max_dim * zoom,
        None => zoom,
    }
}

/// Compute the scaled geometry for `spec` without producing markup.
pub fn outline_geometry(spec: &ShapeSpec, options: &RenderOptions) -> Result<Outline, ShapeError> {
    let kind = spec.kind()?;

    let fill_target = f64::from(options.canvas_size) * options.fill_ratio;
    let scale = auto_scale(spec, fill_target, options.zoom);
    tracing::debug!(shape = %kind, scale, fill_target, "computed outline scale");

    let outline = match kind {
        ShapeKind::Square => {
            let half = positive(spec.side).unwrap_or(DEFAULT_SQUARE_SIDE) * scale / 2.0;
            Outline::Polygon(vec![(-half, -half), (half, -half), (half, half), (-half, half)])
        }
        ShapeKind::Rectangle => {
            let hw = positive(spec.width).unwrap_or(DEFAULT_RECT_WIDTH) * scale / 2.0;
            let hh = positive(spec.height).unwrap_or(DEFAULT_RECT_HEIGHT) * scale / 2.0;
            Outline::Polygon(vec![(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)])
        }
        ShapeKind::Triangle => {
            let s = positive(spec.side).unwrap_or(DEFAULT_TRIANGLE_SIDE) * scale;
            let h = 3.0_f64.sqrt() / 2.0 * s;
            // Centroid at the origin, apex up.
            Outline::Polygon(vec![(-s / 2.0, h / 3.0), (s / 2.0, h / 3.0), (0.0, -2.0 * h / 3.0)])
        }
        ShapeKind::Circle => Outline::Circle {
            radius: positive(spec.radius).unwrap_or(DEFAULT_RADIUS) * scale,
        },
        ShapeKind::RegularPolygon => {
            let n = match spec.n_sides {
                None | Some(0) => DEFAULT_POLYGON_SIDES,
                Some(n) => n,
            };
            if !(3..=MAX_POLYGON_SIDES).contains(&n) {
                return Err(ShapeError::InvalidPolygon { n_sides: n });
            }
            let r = positive(spec.radius).unwrap_or(DEFAULT_RADIUS) * scale;
            let points = (0..n)
                .map(|k| {
                    let angle = 2.0 * PI * f64::from(k) / f64::from(n) - FRAC_PI_2;
                    (r * angle.cos(), r * angle.sin())
                })
                .collect();
            Outline::Polygon(points)
        }
    };

    Ok(outline)
}

/// Render `spec` as a standalone SVG document.
pub fn render_outline(spec: &ShapeSpec, options: &RenderOptions) -> Result<String, ShapeError> {
    let outline = outline_geometry(spec, options)?;
    Ok(wrap_svg(&outline_element(&outline), options))
}

fn outline_element(outline: &Outline) -> String {
    match outline {
        Outline::Circle { radius } => format!(r#"<circle cx="0" cy="0" r="{:.2}"/>"#, radius),
        Outline::Polygon(points) => {
            let pts = points
                .iter()
                .map(|(x, y)| format!("{:.2},{:.2}", x, y))
                .collect::<Vec<_>>()
                .join(" ");
            format!(r#"<polygon points="{}"/>"#, pts)
        }
    }
}

fn grid_lines(half: f64) -> String {
    // Truncate toward zero so odd canvas sizes keep lines on whole units.
    let start = (-half) as i64;
    let end = half as i64;
    let mut lines = String::new();
    for x in (start..=end).step_by(GRID_STEP) {
        let _ = write!(lines, r#"<line x1="{x}" y1="{n}" x2="{x}" y2="{p}"/>"#, n = -half, p = half);
    }
    for y in (start..=end).step_by(GRID_STEP) {
        let _ = write!(lines, r#"<line x1="{n}" y1="{y}" x2="{p}" y2="{y}"/>"#, n = -half, p = half);
    }
    lines
}

fn wrap_svg(inner: &str, options: &RenderOptions) -> String {
    let size = options.canvas_size;
    let half = f64::from(size) / 2.0;
    let theme = &options.theme;

    let (style_block, stroke, grid_stroke, background) = match options.color_mode {
        ColorMode::Auto => (
            format!(
                "<style>\n\
                 svg {{ --sketch-stroke: {ls}; --sketch-grid: {lg}; --sketch-bg: {bg}; }}\n\
                 @media (prefers-color-scheme: dark) {{\n  \
                 svg {{ --sketch-stroke: {ds}; --sketch-grid: {dg}; }}\n\
                 }}\n\
                 </style>\n",
                ls = theme.light_stroke,
                lg = theme.light_grid,
                ds = theme.dark_stroke,
                dg = theme.dark_grid,
                bg = theme.background,
            ),
            "var(--sketch-stroke)".to_string(),
            "var(--sketch-grid)".to_string(),
            None,
        ),
        mode => {
            let (stroke, grid) = theme.colors(mode);
            let background =
                (theme.background != "transparent").then(|| theme.background.clone());
            (String::new(), stroke.to_string(), grid.to_string(), background)
        }
    };

    let root_style = if options.color_mode == ColorMode::Auto {
        r#" style="background: var(--sketch-bg);""#
    } else {
        ""
    };

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="{min} {min} {size} {size}"{root_style}>"#,
        min = -half,
    );
    svg.push_str(&style_block);

    if let Some(background) = background {
        let _ = writeln!(
            svg,
            r#"<rect x="{min}" y="{min}" width="{size}" height="{size}" style="fill: {background};"/>"#,
            min = -half,
        );
    }

    if options.show_grid {
        let _ = writeln!(
            svg,
            r#"<g style="stroke: {grid_stroke}; stroke-width: 1; opacity: {};">{}</g>"#,
            theme.grid_opacity,
            grid_lines(half),
        );
    }

    let _ = writeln!(
        svg,
        r#"<g fill="none" style="stroke: {stroke};" stroke-width="{}" stroke-linejoin="round" stroke-linecap="round">"#,
        options.stroke_width,
    );
    svg.push_str(inner);
    svg.push_str("\n</g>\n</svg>\n");
    svg
}
