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

//! Drawing the trumpet.
//!
//! Frames are composed on a software canvas from textures decoded once at
//! startup, then uploaded and presented through wgpu.

mod canvas;
mod gpu;
mod layout;
mod texture;

use std::path::PathBuf;

pub use canvas::{Canvas, Rect};
pub use gpu::GpuSurface;
pub use layout::{Scene, ValveLayout};
pub use texture::Texture;

/// Errors while loading artwork or talking to the GPU.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to load texture {path}: {source}")]
    Texture {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Unable to create window surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("No graphics adapter can draw to the window")]
    NoAdapter,

    #[error("Unable to open graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("The window surface isn't supported by the graphics adapter")]
    UnsupportedSurface,

    #[error("Unable to get the next frame: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}
