use std::{io::Cursor, path::Path, sync::Arc};

use anyhow::Context;

use crate::{
    capture::board::CaptureScene,
    capture::renderer::{Renderer, Theme},
    foundation::core::{Canvas, Rgba8},
    foundation::error::{PlaqueError, PlaqueResult},
};

/// CPU renderer: `image` for the photo and band, `resvg` for the text overlay, PNG output.
pub struct CpuRenderer {
    theme: Theme,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for CpuRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuRenderer")
            .field("theme", &self.theme)
            .field("font_faces", &self.fontdb.len())
            .finish()
    }
}

impl CpuRenderer {
    /// Load system fonts plus any fonts found in `fonts_dir`.
    pub fn new(theme: Theme, fonts_dir: Option<&Path>) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        if let Some(dir) = fonts_dir {
            load_fonts_from_dir(&mut db, dir);
        }
        tracing::debug!(faces = db.len(), "font database ready");
        Self {
            theme,
            fontdb: Arc::new(db),
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    fn text_layer(&self, text: &str, width: u32, height: u32) -> PlaqueResult<image::RgbaImage> {
        let chars = text.chars().count().max(1) as f32;
        let size = (height as f32 * 0.45)
            .min(width as f32 * 0.9 / (chars * 0.55))
            .max(8.0);
        let baseline = height as f32 / 2.0 + size * 0.35;
        let color = self.theme.text_rgba;
        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}"><text x="{cx}" y="{baseline}" text-anchor="middle" font-family="{family}" font-size="{size}" fill="{fill}" fill-opacity="{opacity}">{body}</text></svg>"#,
            cx = width as f32 / 2.0,
            family = escape_xml(&self.theme.font_family),
            fill = color.svg_hex(),
            opacity = color.svg_opacity(),
            body = escape_xml(text),
        );

        let opts = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            font_resolver: fallback_font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opts).context("parse text overlay svg")?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| PlaqueError::capture("failed to allocate text pixmap"))?;
        resvg::render(&tree, resvg::tiny_skia::Transform::identity(), &mut pixmap.as_mut());

        let mut rgba = pixmap.data().to_vec();
        demultiply_rgba8_in_place(&mut rgba);
        image::RgbaImage::from_raw(width, height, rgba)
            .ok_or_else(|| PlaqueError::capture("text pixmap size mismatch"))
    }
}

impl Renderer for CpuRenderer {
    #[tracing::instrument(skip(self, scene), fields(variant = ?scene.variant))]
    fn render(&self, scene: &CaptureScene, target: Canvas) -> PlaqueResult<Vec<u8>> {
        if scene.dims.image_width <= 0.0 || scene.container_size <= 0.0 {
            return Err(PlaqueError::capture("composition has an empty layout"));
        }
        let photo = image::load_from_memory(scene.photo.bytes.as_slice()).map_err(|e| {
            PlaqueError::capture(format!("decode photo '{}': {e}", scene.photo.name))
        })?;

        let scale_y = f64::from(target.height) / scene.container_size;
        let image_px = ((scene.dims.image_height * scale_y).round().max(0.0) as u32)
            .min(target.height);
        let band_px = target.height - image_px;

        let fill = scene.background.unwrap_or_else(Rgba8::transparent);
        let mut canvas =
            image::RgbaImage::from_pixel(target.width, target.height, image::Rgba(fill.to_array()));

        if image_px > 0 {
            // object-fit: cover
            let cover = photo
                .resize_to_fill(target.width, image_px, image::imageops::FilterType::Triangle)
                .to_rgba8();
            image::imageops::overlay(&mut canvas, &cover, 0, 0);
        }

        if band_px > 0 {
            let band = image::RgbaImage::from_pixel(
                target.width,
                band_px,
                image::Rgba(self.theme.band_rgba.to_array()),
            );
            image::imageops::overlay(&mut canvas, &band, 0, i64::from(image_px));

            if !scene.message.trim().is_empty() {
                let text = self.text_layer(&scene.message, target.width, band_px)?;
                image::imageops::overlay(&mut canvas, &text, 0, i64::from(image_px));
            }
        }

        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(canvas)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .context("encode capture png")?;
        Ok(buf)
    }
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "fonts dir not readable");
        return;
    };
    for entry in rd.flatten() {
        let path = entry.path();
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        if matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc") {
            let _ = db.load_font_file(&path);
        }
    }
}

// Any installed face beats dropping the text when the requested family is missing.
fn fallback_font_resolver() -> usvg::FontResolver<'static> {
    usvg::FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }
            families.push(usvg::fontdb::Family::SansSerif);

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style: usvg::fontdb::Style::Normal,
            };
            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn demultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/cpu.rs"]
mod tests;
