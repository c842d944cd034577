use std::io::Cursor;

use anyhow::{Context, Result};
use image::{ImageFormat, RgbaImage};

use crate::coords::Vec2;
use crate::paint::Color;

/// Owned width × height pixel buffer (row-major, premultiplied).
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Surface {
    /// Creates a fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::transparent(); width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    #[inline]
    pub(crate) fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Resizes the surface. Like resizing a canvas element, this always clears.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width as usize * height as usize, Color::transparent());
    }

    /// Resets every pixel to transparent. Keeps allocated capacity.
    pub fn clear(&mut self) {
        self.pixels.fill(Color::transparent());
    }

    /// Returns the pixel at `(x, y)`, or `None` when out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// Makes every pixel whose center lies farther than `radius` from `center` transparent.
    ///
    /// Pixels inside the circle are left untouched.
    pub fn clip_to_circle(&mut self, center: Vec2, radius: f32) {
        let w = self.width as usize;
        for (i, px) in self.pixels.iter_mut().enumerate() {
            let p = Vec2::new((i % w) as f32 + 0.5, (i / w) as f32 + 0.5);
            if (p - center).length() > radius {
                *px = Color::transparent();
            }
        }
    }

    /// Straight-alpha 8-bit copy of the surface.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut raw = Vec::with_capacity(self.pixels.len() * 4);
        for px in &self.pixels {
            raw.extend_from_slice(&px.to_rgba8());
        }
        RgbaImage::from_raw(self.width, self.height, raw)
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }

    /// Encodes the surface as a PNG byte stream.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        anyhow::ensure!(self.width > 0 && self.height > 0, "surface has zero size");

        let mut out = Cursor::new(Vec::new());
        self.to_rgba_image()
            .write_to(&mut out, ImageFormat::Png)
            .context("failed to encode surface as PNG")?;
        Ok(out.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_surface_is_transparent() {
        let s = Surface::new(4, 3);
        assert_eq!(s.pixels().len(), 12);
        assert!(s.pixels().iter().all(|p| *p == Color::transparent()));
    }

    #[test]
    fn resize_clears_and_reallocates() {
        let mut s = Surface::new(2, 2);
        s.pixels_mut()[0] = Color::from_straight(1.0, 0.0, 0.0, 1.0);
        s.resize(3, 3);
        assert_eq!((s.width(), s.height()), (3, 3));
        assert_eq!(s.pixel(0, 0), Some(Color::transparent()));
    }

    #[test]
    fn pixel_out_of_bounds_is_none() {
        let s = Surface::new(2, 2);
        assert!(s.pixel(2, 0).is_none());
        assert!(s.pixel(0, 2).is_none());
    }

    #[test]
    fn clip_to_circle_clears_corners_only() {
        let red = Color::from_straight(1.0, 0.0, 0.0, 1.0);
        let mut s = Surface::new(16, 16);
        s.pixels_mut().fill(red);
        s.clip_to_circle(Vec2::splat(8.0), 8.0);

        assert_eq!(s.pixel(0, 0), Some(Color::transparent()));
        assert_eq!(s.pixel(15, 15), Some(Color::transparent()));
        assert_eq!(s.pixel(8, 8), Some(red));
        assert_eq!(s.pixel(0, 8), Some(red));
    }

    #[test]
    fn encode_png_produces_png_signature() {
        let s = Surface::new(8, 8);
        let bytes = s.encode_png().unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn encode_png_rejects_empty_surface() {
        assert!(Surface::new(0, 0).encode_png().is_err());
    }
}
