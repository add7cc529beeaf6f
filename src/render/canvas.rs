// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use image::{Rgba, RgbaImage};

use super::Texture;

/// A destination rectangle in canvas pixels. May reach outside the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

/// The frame being composed.
pub struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Canvas {
        Canvas {
            pixels: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Tightly packed RGBA rows.
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels.get_pixel(x, y).0
    }

    pub fn clear(&mut self, color: [u8; 4]) {
        self.pixels
            .pixels_mut()
            .for_each(|pixel| *pixel = Rgba(color));
    }

    /// Stretches the whole texture over `dest`, alpha blended. Parts of `dest`
    /// outside the canvas are clipped.
    pub fn draw(&mut self, texture: &Texture, dest: Rect) {
        if dest.width == 0 || dest.height == 0 || texture.width() == 0 || texture.height() == 0
        {
            return;
        }

        let x_start = dest.x.max(0);
        let y_start = dest.y.max(0);
        let x_end = (i64::from(dest.x) + i64::from(dest.width)).min(i64::from(self.width()));
        let y_end = (i64::from(dest.y) + i64::from(dest.height)).min(i64::from(self.height()));

        let source = texture.image();
        for y in i64::from(y_start)..y_end {
            // Nearest source row.
            let src_y = ((y - i64::from(dest.y)) * i64::from(texture.height())
                / i64::from(dest.height)) as u32;
            for x in i64::from(x_start)..x_end {
                let src_x = ((x - i64::from(dest.x)) * i64::from(texture.width())
                    / i64::from(dest.width)) as u32;

                let src = source.get_pixel(src_x, src_y).0;
                let dst = self.pixels.get_pixel_mut(x as u32, y as u32);
                dst.0 = blend(src, dst.0);
            }
        }
    }
}

/// Source-over blending of straight alpha pixels.
fn blend(src: [u8; 4], dst: [u8; 4]) -> [u8; 4] {
    match src[3] {
        255 => src,
        0 => dst,
        alpha => {
            let alpha = u32::from(alpha);
            let inverse = 255 - alpha;
            let mix = |s: u8, d: u8| ((u32::from(s) * alpha + u32::from(d) * inverse + 127) / 255) as u8;
            [
                mix(src[0], dst[0]),
                mix(src[1], dst[1]),
                mix(src[2], dst[2]),
                (alpha + (u32::from(dst[3]) * inverse + 127) / 255) as u8,
            ]
        }
    }
}
