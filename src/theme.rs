use serde::{Deserialize, Serialize};

const SLATE_LIGHT_STROKE: &str = "#111827";
const SLATE_LIGHT_GRID: &str = "#9CA3AF";
const SLATE_DARK_STROKE: &str = "#F9FAFB";
const SLATE_DARK_GRID: &str = "#6B7280";
const TRANSPARENT: &str = "transparent";

const GRID_OPACITY: f32 = 0.35;

/// Which palette the outline is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// CSS custom properties with a `prefers-color-scheme: dark` override.
    /// Meant for embedding in a page.
    #[default]
    Auto,
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SketchTheme {
    #[serde(default = "default_light_stroke")]
    pub light_stroke: String,
    #[serde(default = "default_light_grid")]
    pub light_grid: String,
    #[serde(default = "default_dark_stroke")]
    pub dark_stroke: String,
    #[serde(default = "default_dark_grid")]
    pub dark_grid: String,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_grid_opacity")]
    pub grid_opacity: f32,
}

fn default_light_stroke() -> String {
    SLATE_LIGHT_STROKE.to_string()
}
fn default_light_grid() -> String {
    SLATE_LIGHT_GRID.to_string()
}
fn default_dark_stroke() -> String {
    SLATE_DARK_STROKE.to_string()
}
fn default_dark_grid() -> String {
    SLATE_DARK_GRID.to_string()
}
fn default_background() -> String {
    TRANSPARENT.to_string()
}
fn default_grid_opacity() -> f32 {
    GRID_OPACITY
}

impl Default for SketchTheme {
    fn default() -> Self {
        Self::slate()
    }
}

const BUILTIN_THEMES: &[&str] = &["slate", "blueprint", "sepia"];

impl SketchTheme {
    pub fn slate() -> Self {
        SketchTheme {
            light_stroke: SLATE_LIGHT_STROKE.to_string(),
            light_grid: SLATE_LIGHT_GRID.to_string(),
            dark_stroke: SLATE_DARK_STROKE.to_string(),
            dark_grid: SLATE_DARK_GRID.to_string(),
            background: TRANSPARENT.to_string(),
            grid_opacity: GRID_OPACITY,
        }
    }

    pub fn from_builtin(name: &str) -> Result<Self, String> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "slate" => Ok(Self::slate()),
            "blueprint" => Ok(SketchTheme {
                light_stroke: "#1E3A8A".to_string(),
                light_grid: "#93C5FD".to_string(),
                dark_stroke: "#DBEAFE".to_string(),
                dark_grid: "#1D4ED8".to_string(),
                background: TRANSPARENT.to_string(),
                grid_opacity: 0.5,
            }),
            "sepia" => Ok(SketchTheme {
                light_stroke: "#433422".to_string(),
                light_grid: "#C8B89A".to_string(),
                dark_stroke: "#F4ECD8".to_string(),
                dark_grid: "#7A6A50".to_string(),
                background: TRANSPARENT.to_string(),
                grid_opacity: GRID_OPACITY,
            }),
            _ => Err(format!(
                "Unknown built-in theme '{}'. Available: {}",
                name,
                Self::list_builtins().join(", ")
            )),
        }
    }

    pub fn list_builtins() -> Vec<&'static str> {
        BUILTIN_THEMES.to_vec()
    }

    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse theme TOML: {}", e))
    }

    pub fn from_yaml(content: &str) -> Result<Self, String> {
        serde_yaml::from_str(content).map_err(|e| format!("Failed to parse theme YAML: {}", e))
    }

    /// `(stroke, grid)` colors for a fixed mode. `Auto` has no fixed pair and
    /// falls back to the light palette.
    pub fn colors(&self, mode: ColorMode) -> (&str, &str) {
        match mode {
            ColorMode::Dark => (self.dark_stroke.as_str(), self.dark_grid.as_str()),
            ColorMode::Light | ColorMode::Auto => {
                (self.light_stroke.as_str(), self.light_grid.as_str())
            }
        }
    }
}
