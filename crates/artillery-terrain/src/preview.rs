//! Debug raster of a generated terrain

use artillery_core::{ArtilleryError, Color, Result};
use image::{Rgba, RgbaImage};

use crate::terrain::Terrain;

const SKY: u32 = 0x9CC8E8;
const EARTH: u32 = 0x7A5230;
const GRASS: u32 = 0x4E9A3A;
const OUTLINE: u32 = 0x101010;

/// Fraction of the terrain extent left empty around it
const MARGIN: f32 = 0.1;

fn rgba(hex: u32) -> Rgba<u8> {
    Rgba(Color::from_hex(hex).to_rgba8())
}

/// Maps terrain space onto pixel space, y up
struct Viewport {
    min_x: f32,
    max_y: f32,
    scale_x: f32,
    scale_y: f32,
}

impl Viewport {
    fn fit(terrain: &Terrain, width: u32, height: u32) -> Self {
        let bounds = terrain.bounds();
        let (min_x, max_x) = (bounds.min.x, bounds.max.x);
        let (min_y, max_y) = (bounds.min.y.min(0.0), bounds.max.y);

        let pad_x = ((max_x - min_x) * MARGIN).max(0.5);
        let pad_y = ((max_y - min_y) * MARGIN).max(0.5);
        let (min_x, max_x) = (min_x - pad_x, max_x + pad_x);
        let (min_y, max_y) = (min_y - pad_y, max_y + pad_y);

        Self {
            min_x,
            max_y,
            scale_x: (max_x - min_x) / width as f32,
            scale_y: (max_y - min_y) / height as f32,
        }
    }

    /// Terrain-space centre of a pixel
    fn to_world(&self, px: u32, py: u32) -> (f32, f32) {
        (
            self.min_x + (px as f32 + 0.5) * self.scale_x,
            self.max_y - (py as f32 + 0.5) * self.scale_y,
        )
    }

    fn to_pixel(&self, x: f32, y: f32) -> (f32, f32) {
        ((x - self.min_x) / self.scale_x, (self.max_y - y) / self.scale_y)
    }
}

/// Rasterize the fill slab, the detail ribbon and the collision outline.
pub fn render_preview(terrain: &Terrain, width: u32, height: u32) -> Result<RgbaImage> {
    if width == 0 || height == 0 {
        return Err(ArtilleryError::ImageError(format!(
            "preview size must be non-zero, got {}x{}",
            width, height
        )));
    }

    let view = Viewport::fit(terrain, width, height);
    let span = terrain.width();
    let mut img = RgbaImage::from_pixel(width, height, rgba(SKY));

    for px in 0..width {
        let (x, _) = view.to_world(px, 0);
        if x < 0.0 || x > span {
            continue;
        }
        let surface = terrain.surface_height(x);
        let detail_base = surface - crate::mesh::DETAIL_THICKNESS;

        for py in 0..height {
            let (_, y) = view.to_world(px, py);
            if y <= surface && y >= detail_base {
                img.put_pixel(px, py, rgba(GRASS));
            } else if y <= surface && y >= 0.0 {
                img.put_pixel(px, py, rgba(EARTH));
            }
        }
    }

    for outline in &terrain.boundary {
        let n = outline.points.len();
        for i in 0..n {
            let a = outline.points[i];
            let b = outline.points[(i + 1) % n];
            draw_line(&mut img, view.to_pixel(a.x, a.y), view.to_pixel(b.x, b.y), rgba(OUTLINE));
        }
    }

    Ok(img)
}

/// Plot a segment by stepping one pixel along its longer axis
fn draw_line(img: &mut RgbaImage, from: (f32, f32), to: (f32, f32), color: Rgba<u8>) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;

    for s in 0..=steps {
        let t = s as f32 / steps as f32;
        let x = (from.0 + dx * t).floor();
        let y = (from.1 + dy * t).floor();
        if x >= 0.0 && y >= 0.0 && (x as u32) < img.width() && (y as u32) < img.height() {
            img.put_pixel(x as u32, y as u32, color);
        }
    }
}
