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
use std::path::Path;

use image::imageops::{self, FilterType};
use image::RgbaImage;
use tracing::{debug, info};

use super::RenderError;
use crate::util::filename_display;

/// A decoded RGBA image. The size is read once at load.
#[derive(Clone)]
pub struct Texture {
    label: String,
    image: RgbaImage,
    width: u32,
    height: u32,
}

impl Texture {
    /// Decodes an image file.
    pub fn load(path: &Path) -> Result<Texture, RenderError> {
        let image = image::open(path)
            .map_err(|source| RenderError::Texture {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();

        let texture = Texture::from_image(filename_display(path), image);
        info!(
            texture = texture.label,
            width = texture.width,
            height = texture.height,
            "Texture loaded."
        );
        Ok(texture)
    }

    pub fn from_image(label: &str, image: RgbaImage) -> Texture {
        let (width, height) = image.dimensions();
        Texture {
            label: label.to_string(),
            image,
            width,
            height,
        }
    }

    /// Returns a copy scaled to the given size.
    pub fn resized(&self, width: u32, height: u32) -> Texture {
        if (width, height) == (self.width, self.height) {
            return self.clone();
        }
        debug!(
            texture = self.label,
            from = ?(self.width, self.height),
            to = ?(width, height),
            "Resizing texture."
        );
        Texture::from_image(
            &self.label,
            imageops::resize(&self.image, width, height, FilterType::Triangle),
        )
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("label", &self.label)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
