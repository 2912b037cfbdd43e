use grid_palette::{GridSpec, Method, Rgb};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use utoipa::ToSchema;

/// Largest output edge accepted from config
pub const MAX_OUTPUT_SIZE: u32 = 2048;

/// Largest grid edge accepted from config
pub const MAX_GRID_SIZE: u32 = 64;

/// A recolorable design: an SVG template plus the table binding its color
/// slots to cells of the pixelation grid.
#[derive(Debug, Deserialize, Clone)]
pub struct DesignConfig {
    /// Path to the SVG template (relative to designs/ directory)
    pub template: PathBuf,

    #[serde(default)]
    pub description: Option<String>,

    /// Grid size as `[columns, rows]`
    pub grid: [u32; 2],

    #[serde(default)]
    pub method: ExtractionMethod,

    /// Downsample the avatar to this square size before partitioning
    #[serde(default)]
    pub sample_size: Option<u32>,

    /// Output PNG width in pixels
    #[serde(default = "default_output_size")]
    pub width: u32,

    /// Output PNG height in pixels
    #[serde(default = "default_output_size")]
    pub height: u32,

    /// Slot name -> `[column, row]` of the grid cell that colors it
    #[serde(default)]
    pub slots: BTreeMap<String, [u32; 2]>,

    /// Slot name -> hex color used when no palette color is available
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,

    #[serde(default)]
    pub on_failure: FailurePolicy,
}

fn default_output_size() -> u32 {
    600
}

/// Per-cell color reduction
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    #[default]
    Mean,
    Kmeans,
}

impl From<ExtractionMethod> for Method {
    fn from(m: ExtractionMethod) -> Self {
        match m {
            ExtractionMethod::Mean => Method::Mean,
            ExtractionMethod::Kmeans => Method::KMeans,
        }
    }
}

/// What a request gets when the avatar cannot be turned into a palette
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Respond 404
    #[default]
    NotFound,
    /// Render the template with its default colors
    DefaultColors,
}

impl DesignConfig {
    pub fn grid_spec(&self) -> GridSpec {
        GridSpec::new(self.grid[0], self.grid[1])
    }

    /// Default color for a slot, black when none is configured or it does
    /// not parse.
    pub fn default_color(&self, slot: &str) -> Rgb {
        self.defaults
            .get(slot)
            .and_then(|hex| hex.parse().ok())
            .unwrap_or(Rgb::BLACK)
    }

    /// Check the design is usable; the error names the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        let [columns, rows] = self.grid;
        if columns == 0 || rows == 0 || columns > MAX_GRID_SIZE || rows > MAX_GRID_SIZE {
            return Err(format!(
                "grid {columns}x{rows} outside 1..={MAX_GRID_SIZE}"
            ));
        }
        if self.width == 0
            || self.height == 0
            || self.width > MAX_OUTPUT_SIZE
            || self.height > MAX_OUTPUT_SIZE
        {
            return Err(format!(
                "output size {}x{} outside 1..={MAX_OUTPUT_SIZE}",
                self.width, self.height
            ));
        }
        if let Some(size) = self.sample_size {
            if size == 0 || size > MAX_OUTPUT_SIZE {
                return Err(format!("sample_size {size} outside 1..={MAX_OUTPUT_SIZE}"));
            }
        }
        for (slot, &[c, r]) in &self.slots {
            if c >= columns || r >= rows {
                return Err(format!("slot {slot} points at [{c}, {r}] outside the grid"));
            }
        }
        for (slot, hex) in &self.defaults {
            if let Err(e) = hex.parse::<Rgb>() {
                return Err(format!("default for slot {slot}: {e}"));
            }
        }
        Ok(())
    }
}
