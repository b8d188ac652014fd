use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, de};

/// Largest side count accepted by validation and drawn by the renderer.
/// Bounds vertex generation: counts above it are `InvalidPolygon`.
pub const MAX_POLYGON_SIDES: u32 = 1024;

/// The five shape families the renderer knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Square,
    Rectangle,
    Triangle,
    Circle,
    RegularPolygon,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Square => "square",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Circle => "circle",
            ShapeKind::RegularPolygon => "regular_polygon",
        }
    }

    /// Resolve a family name. Case and surrounding whitespace are ignored and
    /// `polygon` is accepted as a shorthand for `regular_polygon`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "square" => Some(ShapeKind::Square),
            "rectangle" => Some(ShapeKind::Rectangle),
            "triangle" => Some(ShapeKind::Triangle),
            "circle" => Some(ShapeKind::Circle),
            "regular_polygon" | "polygon" => Some(ShapeKind::RegularPolygon),
            _ => None,
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShapeError {
    #[error(
        "Unsupported shape '{0}'. Try: circle, square, rectangle, triangle, hexagon, pentagon, regular polygon n=7 radius 2"
    )]
    UnsupportedShape(String),

    #[error("regular_polygon requires n_sides between 3 and {max}, got {n_sides}", max = MAX_POLYGON_SIDES)]
    InvalidPolygon { n_sides: u32 },

    #[error("{field} must be a positive finite number, got {value}")]
    InvalidDimension { field: &'static str, value: f64 },
}

/// Normalized description of a shape, in user units.
///
/// `shape` stays a plain string so that whatever an extractor hands back can
/// be carried to the renderer, which is where unknown families are rejected.
/// Fields that don't apply to the chosen family are allowed and ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeSpec {
    pub shape: String,
    #[serde(default)]
    pub side: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default, deserialize_with = "whole_count")]
    pub n_sides: Option<u32>,
}

/// Models sometimes write counts as `6.0`; accept any whole number that fits.
fn whole_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value) {
        Ok(Some(value as u32))
    } else {
        Err(de::Error::custom(format!(
            "n_sides must be a non-negative whole number, got {value}"
        )))
    }
}

impl ShapeSpec {
    /// An empty spec of the given family; every dimension is left to the
    /// renderer defaults.
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            shape: kind.as_str().to_string(),
            side: None,
            width: None,
            height: None,
            radius: None,
            n_sides: None,
        }
    }

    pub fn kind(&self) -> Result<ShapeKind, ShapeError> {
        ShapeKind::from_name(&self.shape)
            .ok_or_else(|| ShapeError::UnsupportedShape(self.shape.trim().to_lowercase()))
    }

    /// Check the family name and field ranges.
    ///
    /// Used on specs coming from outside the rule-based parser. A zero
    /// `n_sides` counts as absent, matching how the renderer reads it.
    pub fn validate(&self) -> Result<(), ShapeError> {
        self.kind()?;

        let dims = [
            ("side", self.side),
            ("width", self.width),
            ("height", self.height),
            ("radius", self.radius),
        ];
        for (field, value) in dims {
            if let Some(value) = value {
                if !value.is_finite() || value <= 0.0 {
                    return Err(ShapeError::InvalidDimension { field, value });
                }
            }
        }

        match self.n_sides {
            Some(n) if n != 0 && !(3..=MAX_POLYGON_SIDES).contains(&n) => {
                Err(ShapeError::InvalidPolygon { n_sides: n })
            }
            _ => Ok(()),
        }
    }

    /// Pretty JSON with every key present, `null` for absent fields.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}
