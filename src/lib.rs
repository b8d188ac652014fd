//! Turn natural-language shape descriptions into SVG outlines.
//!
//! ```
//! use shapesketch::{RenderOptions, Resolver, render_outline};
//!
//! let spec = Resolver::rule_based().resolve("Draw a rectangle 8 by 3", false);
//! let svg = render_outline(&spec, &RenderOptions::default()).unwrap();
//! assert!(svg.contains("<polygon"));
//! ```

pub mod ai;
pub mod config;
pub mod export;
pub mod outline;
pub mod parser;
pub mod resolve;
pub mod shape;
pub mod theme;

pub use ai::{OpenAiExtractor, ShapeExtractor, Unavailable};
pub use config::Settings;
pub use outline::{Outline, RenderOptions, outline_geometry, render_outline};
pub use parser::parse_prompt;
pub use resolve::{Resolver, resolve};
pub use shape::{ShapeError, ShapeKind, ShapeSpec};
pub use theme::{ColorMode, SketchTheme};
