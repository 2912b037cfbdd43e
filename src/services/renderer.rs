use crate::models::{DesignConfig, Fid};
use crate::rendering::SvgRenderer;
use crate::services::content_pipeline::ContentError;
use crate::services::TemplateService;
use grid_palette::Palette;

/// Template recoloring followed by rasterization
pub struct RenderService {
    templates: TemplateService,
    svg_renderer: SvgRenderer,
}

impl RenderService {
    pub fn new(templates: TemplateService, svg_renderer: SvgRenderer) -> Self {
        Self {
            templates,
            svg_renderer,
        }
    }

    /// Render a design to PNG. Without a palette the slot defaults are used.
    ///
    /// CPU bound; the pipeline calls this from a blocking task.
    pub fn render(
        &self,
        design: &DesignConfig,
        palette: Option<&Palette>,
        fid: Option<Fid>,
    ) -> Result<Vec<u8>, ContentError> {
        let svg = self.templates.render(design, palette, fid)?;
        let png = self
            .svg_renderer
            .render_png(svg.as_bytes(), design.width, design.height)?;
        tracing::debug!(
            template = %design.template.display(),
            bytes = png.len(),
            "Rendered design"
        );
        Ok(png)
    }
}
