use crate::error::RenderError;
use crate::models::MAX_OUTPUT_SIZE;
use resvg::usvg::{self, Transform};
use std::io::Cursor;
use std::sync::Arc;
use tiny_skia::Pixmap;

/// Rasterizes recolored design SVGs to RGBA PNG.
///
/// The SVG is scaled to fit the requested size and centered. Areas the SVG
/// does not cover stay transparent.
pub struct SvgRenderer {
    /// Font database for text rendering
    fontdb: Arc<fontdb::Database>,
    /// Recompress output with oxipng
    optimize: bool,
}

impl SvgRenderer {
    /// Create a renderer backed by the system fonts
    pub fn new(optimize: bool) -> Self {
        let mut fontdb = fontdb::Database::new();
        fontdb.load_system_fonts();

        tracing::info!(
            font_count = fontdb.len(),
            optimize,
            "Loaded fonts for SVG text rendering"
        );

        Self {
            fontdb: Arc::new(fontdb),
            optimize,
        }
    }

    /// Render SVG to a `width` x `height` PNG
    pub fn render_png(&self, svg_data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        if width == 0 || height == 0 || width > MAX_OUTPUT_SIZE || height > MAX_OUTPUT_SIZE {
            return Err(RenderError::InvalidSize { width, height });
        }

        let pixmap = self.rasterize_svg(svg_data, width, height)?;
        let rgba = demultiplied_rgba(&pixmap);
        let png_bytes = encode_png(width, height, &rgba)?;

        if !self.optimize {
            return Ok(png_bytes);
        }

        let optimized = oxipng::optimize_from_memory(
            &png_bytes,
            &oxipng::Options {
                strip: oxipng::StripChunks::Safe,
                ..Default::default()
            },
        )
        .unwrap_or(png_bytes);
        Ok(optimized)
    }

    fn rasterize_svg(&self, svg_data: &[u8], width: u32, height: u32) -> Result<Pixmap, RenderError> {
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(svg_data, &options)
            .map_err(|e| RenderError::SvgParse(e.to_string()))?;

        let svg_size = tree.size();
        let scale_x = width as f32 / svg_size.width();
        let scale_y = height as f32 / svg_size.height();
        let scale = scale_x.min(scale_y);

        let offset_x = (width as f32 - svg_size.width() * scale) / 2.0;
        let offset_y = (height as f32 - svg_size.height() * scale) / 2.0;

        let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::PixmapAllocation)?;

        let transform = Transform::from_scale(scale, scale).post_translate(offset_x, offset_y);
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        Ok(pixmap)
    }
}

/// tiny-skia stores premultiplied alpha; PNG wants straight alpha
fn demultiplied_rgba(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect()
}

fn encode_png(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>, RenderError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(rgba)
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}
