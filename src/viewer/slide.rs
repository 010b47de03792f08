use std::io::Cursor;
use std::path::Path;
use anyhow::{anyhow, Context, Result};
use image::ImageFormat;
use raylib::prelude::*;
use crate::image_loader::load_image_with_exif_rotation;

pub struct Slide {
    texture: Texture2D,
}

// Scale that fits (or, with `cover`, fills) a box while keeping the aspect ratio
pub fn fit_scale(tex_width: f32, tex_height: f32, box_width: f32, box_height: f32, cover: bool) -> f32 {
    if tex_width <= 0.0 || tex_height <= 0.0 {
        return 0.0;
    }
    let sx = box_width / tex_width;
    let sy = box_height / tex_height;
    if cover { sx.max(sy) } else { sx.min(sy) }
}

impl Slide {
    // --- Decode with EXIF rotation baked in, then hand raylib a PNG ---
    pub fn load(rl: &mut RaylibHandle, thread: &RaylibThread, image_path: &Path) -> Result<Self> {
        let decoded = load_image_with_exif_rotation(image_path)?;

        let mut png_bytes = Vec::new();
        decoded
            .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
            .with_context(|| format!("Failed to re-encode {}", image_path.display()))?;

        let image = Image::load_image_from_mem(".png", &png_bytes)
            .map_err(|e| anyhow!("Failed to load image data for {}: {}", image_path.display(), e))?;
        let texture = rl
            .load_texture_from_image(thread, &image)
            .map_err(|e| anyhow!("Failed to create texture for {}: {}", image_path.display(), e))?;

        Ok(Self { texture })
    }

    /// Draw centered in `dest`. Without `cover` the whole image fits inside `dest`;
    /// with `cover` it fills `dest` and may spill past its edges (nothing is clipped).
    pub fn draw(&self, d: &mut RaylibDrawHandle, dest: Rectangle, cover: bool) {
        let tex_width = self.texture.width() as f32;
        let tex_height = self.texture.height() as f32;
        let scale = fit_scale(tex_width, tex_height, dest.width, dest.height, cover);

        let scaled_width = tex_width * scale;
        let scaled_height = tex_height * scale;

        d.draw_texture_pro(
            &self.texture,
            Rectangle::new(0.0, 0.0, tex_width, tex_height),
            Rectangle::new(
                dest.x + (dest.width - scaled_width) * 0.5,
                dest.y + (dest.height - scaled_height) * 0.5,
                scaled_width,
                scaled_height,
            ),
            Vector2::new(0.0, 0.0),
            0.0,
            Color::WHITE,
        );
    }
}
