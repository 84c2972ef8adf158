//! Software RGBA8 surface.
//!
//! The world composites sprites onto one of these and tests assert on its
//! pixels. A GPU backend would replace this type behind the same operations:
//! fill, blit, rectangle draw and subregion extraction.

use bytemuck::{Pod, Zeroable};

use crate::core::rect::Rect;

/// A single RGBA pixel, 8 bits per channel.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Rgba8 = Rgba8::new(0, 0, 0, 0);
    pub const BLACK: Rgba8 = Rgba8::new(0, 0, 0, 255);
    pub const WHITE: Rgba8 = Rgba8::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Source-over blend of `src` onto `dst`, with an extra alpha multiplier.
fn blend(dst: Rgba8, src: Rgba8, alpha: f32) -> Rgba8 {
    let sa = (src.a as f32 / 255.0) * alpha.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return dst;
    }
    if sa >= 1.0 {
        return src;
    }
    let da = dst.a as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let ch = |s: u8, d: u8| -> u8 {
        let v = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    Rgba8::new(
        ch(src.r, dst.r),
        ch(src.g, dst.g),
        ch(src.b, dst.b),
        (out_a * 255.0).round() as u8,
    )
}

/// A CPU pixel buffer with clipping draw operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl Pixmap {
    /// Create a transparent pixmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba8::TRANSPARENT; (width * height) as usize],
        }
    }

    /// Create a pixmap filled with a solid color.
    pub fn solid(width: u32, height: u32, color: Rgba8) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; (width * height) as usize],
        }
    }

    /// Wrap an existing pixel buffer. The buffer length must be `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba8>) -> Self {
        assert_eq!(pixels.len(), (width * height) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Bounds rect at the origin, sized like this pixmap.
    pub fn rect(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Raw pixel storage as bytes (RGBA8, row-major).
    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba8> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(self.pixels[(y as u32 * self.width + x as u32) as usize])
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba8) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        self.pixels[(y as u32 * self.width + x as u32) as usize] = color;
    }

    /// Fill the whole surface with one color.
    pub fn fill(&mut self, color: Rgba8) {
        self.pixels.fill(color);
    }

    /// Blit `src` with its top-left corner at `(x, y)`, alpha blended and
    /// clipped to this surface.
    pub fn blit(&mut self, src: &Pixmap, x: i32, y: i32) {
        self.blit_alpha(src, x, y, 1.0);
    }

    /// Like [`blit`](Self::blit) with an extra opacity multiplier in `[0, 1]`.
    pub fn blit_alpha(&mut self, src: &Pixmap, x: i32, y: i32, alpha: f32) {
        for sy in 0..src.height as i32 {
            let dy = y + sy;
            if dy < 0 || dy >= self.height as i32 {
                continue;
            }
            for sx in 0..src.width as i32 {
                let dx = x + sx;
                if dx < 0 || dx >= self.width as i32 {
                    continue;
                }
                let s = src.pixels[(sy as u32 * src.width + sx as u32) as usize];
                let idx = (dy as u32 * self.width + dx as u32) as usize;
                self.pixels[idx] = blend(self.pixels[idx], s, alpha);
            }
        }
    }

    /// Fill a rectangle, clipped.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                self.set_pixel(x, y, color);
            }
        }
    }

    /// Draw a one-pixel rectangle outline, clipped.
    pub fn draw_rect(&mut self, rect: Rect, color: Rgba8) {
        for x in rect.x..rect.right() {
            self.set_pixel(x, rect.y, color);
            self.set_pixel(x, rect.bottom() - 1, color);
        }
        for y in rect.y..rect.bottom() {
            self.set_pixel(rect.x, y, color);
            self.set_pixel(rect.right() - 1, y, color);
        }
    }

    /// Copy out a subregion. Areas outside the source read as transparent.
    pub fn sub_region(&self, rect: Rect) -> Pixmap {
        let mut out = Pixmap::new(rect.w, rect.h);
        for y in 0..rect.h as i32 {
            for x in 0..rect.w as i32 {
                if let Some(p) = self.pixel(rect.x + x, rect.y + y) {
                    out.set_pixel(x, y, p);
                }
            }
        }
        out
    }

    /// A copy mirrored along the requested axes.
    pub fn flipped(&self, flip_x: bool, flip_y: bool) -> Pixmap {
        let mut out = Pixmap::new(self.width, self.height);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let sx = if flip_x { self.width as i32 - 1 - x } else { x };
                let sy = if flip_y { self.height as i32 - 1 - y } else { y };
                // unwrap is safe: sx/sy are in bounds by construction
                out.set_pixel(x, y, self.pixel(sx, sy).unwrap());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_and_read_back() {
        let mut p = Pixmap::new(4, 4);
        p.fill(Rgba8::opaque(10, 20, 30));
        assert_eq!(p.pixel(0, 0), Some(Rgba8::opaque(10, 20, 30)));
        assert_eq!(p.pixel(3, 3), Some(Rgba8::opaque(10, 20, 30)));
        assert_eq!(p.pixel(4, 0), None);
    }

    #[test]
    fn blit_clips_offscreen() {
        let mut dst = Pixmap::new(4, 4);
        let src = Pixmap::solid(4, 4, Rgba8::WHITE);
        dst.blit(&src, -2, -2);
        assert_eq!(dst.pixel(0, 0), Some(Rgba8::WHITE));
        assert_eq!(dst.pixel(2, 2), Some(Rgba8::TRANSPARENT));
    }

    #[test]
    fn opaque_blit_overwrites() {
        let mut dst = Pixmap::solid(2, 2, Rgba8::BLACK);
        let src = Pixmap::solid(1, 1, Rgba8::WHITE);
        dst.blit(&src, 1, 1);
        assert_eq!(dst.pixel(1, 1), Some(Rgba8::WHITE));
        assert_eq!(dst.pixel(0, 0), Some(Rgba8::BLACK));
    }

    #[test]
    fn half_alpha_blend_mixes() {
        let mut dst = Pixmap::solid(1, 1, Rgba8::opaque(0, 0, 0));
        let src = Pixmap::solid(1, 1, Rgba8::opaque(200, 200, 200));
        dst.blit_alpha(&src, 0, 0, 0.5);
        let p = dst.pixel(0, 0).unwrap();
        assert!(p.r > 80 && p.r < 120, "expected mid grey, got {:?}", p);
    }

    #[test]
    fn sub_region_copies_pixels() {
        let mut p = Pixmap::new(4, 4);
        p.set_pixel(2, 1, Rgba8::WHITE);
        let sub = p.sub_region(Rect::new(2, 1, 2, 2));
        assert_eq!(sub.pixel(0, 0), Some(Rgba8::WHITE));
        assert_eq!(sub.size(), (2, 2));
    }

    #[test]
    fn flipped_mirrors_pixels() {
        let mut p = Pixmap::new(2, 1);
        p.set_pixel(0, 0, Rgba8::WHITE);
        let f = p.flipped(true, false);
        assert_eq!(f.pixel(1, 0), Some(Rgba8::WHITE));
        assert_eq!(f.pixel(0, 0), Some(Rgba8::TRANSPARENT));
    }
}
