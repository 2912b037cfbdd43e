use std::collections::BTreeMap;
use std::sync::Arc;

use grid_palette::{Palette, Rgb};
use serde::Serialize;
use tera::{Context, Tera};

use crate::assets::AssetLoader;
use crate::models::{DesignConfig, Fid};

/// Error type for template rendering
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Template error: {0}")]
    Tera(#[from] tera::Error),

    #[error("Template not found: {0}")]
    NotFound(String),
}

/// One grid cell as seen by templates
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CellContext {
    pub column: u32,
    pub row: u32,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GridContext {
    pub columns: u32,
    pub rows: u32,
}

/// Everything a design template can reference
#[derive(Debug, Clone, Serialize)]
pub struct TemplateContext {
    /// Slot name -> `#rrggbb`
    pub slots: BTreeMap<String, String>,
    /// Cell colors in row-major order
    pub palette: Vec<String>,
    pub cells: Vec<CellContext>,
    pub grid: GridContext,
    pub fid: Option<u64>,
}

impl TemplateContext {
    /// Build the context for a design. Without a palette every slot takes its
    /// default color and every cell is black.
    pub fn new(design: &DesignConfig, palette: Option<&Palette>, fid: Option<Fid>) -> Self {
        let grid = design.grid_spec();
        let slots = resolve_slots(design, palette)
            .into_iter()
            .map(|(name, color)| (name, color.to_hex()))
            .collect();

        let cells: Vec<CellContext> = grid
            .cells()
            .map(|(column, row)| CellContext {
                column,
                row,
                color: palette
                    .and_then(|p| p.get(column, row))
                    .unwrap_or(Rgb::BLACK)
                    .to_hex(),
            })
            .collect();

        let palette = match palette {
            Some(p) => p.to_hex_strings(),
            None => cells.iter().map(|c| c.color.clone()).collect(),
        };

        Self {
            slots,
            palette,
            cells,
            grid: GridContext {
                columns: grid.columns,
                rows: grid.rows,
            },
            fid: fid.map(Fid::get),
        }
    }
}

/// Color for every slot the design declares or has a default for
pub fn resolve_slots(design: &DesignConfig, palette: Option<&Palette>) -> BTreeMap<String, Rgb> {
    let mut slots: BTreeMap<String, Rgb> = design
        .defaults
        .keys()
        .map(|name| (name.clone(), design.default_color(name)))
        .collect();

    for (name, &[column, row]) in &design.slots {
        let color = palette
            .and_then(|p| p.get(column, row))
            .unwrap_or_else(|| design.default_color(name));
        slots.insert(name.clone(), color);
    }
    slots
}

/// Service for rendering design SVG templates with Tera
pub struct TemplateService {
    assets: Arc<AssetLoader>,
}

impl TemplateService {
    pub fn new(assets: Arc<AssetLoader>) -> Self {
        Self { assets }
    }

    /// Render a design's template.
    ///
    /// Templates are read on every call so an external designs directory can
    /// be edited while the server runs.
    pub fn render(
        &self,
        design: &DesignConfig,
        palette: Option<&Palette>,
        fid: Option<Fid>,
    ) -> Result<String, TemplateError> {
        let template_name = design.template.to_string_lossy();
        let source = self
            .assets
            .read_design_string(&design.template)
            .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

        let mut tera = Tera::default();
        tera.add_raw_template(&template_name, &source)?;

        let context = Context::from_serialize(TemplateContext::new(design, palette, fid))?;
        let svg = tera.render(&template_name, &context)?;

        tracing::trace!(template = %template_name, bytes = svg.len(), "Rendered template");
        Ok(svg)
    }
}
