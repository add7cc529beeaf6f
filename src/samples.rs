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

//! Prerecorded note samples.
//!
//! This module provides:
//! - Decoding sample files into memory at the output sample rate
//! - The note bank, a fixed indexed set of notes loaded before playing starts

mod bank;
mod loader;

use std::path::PathBuf;

pub use bank::NoteBank;
pub use loader::{LoadedSample, SampleLoader};

/// Errors while loading note samples. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("Failed to open sample {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to decode sample {path}: {source}")]
    Decode {
        path: PathBuf,
        source: symphonia::core::errors::Error,
    },

    #[error("No playable audio track in {0}")]
    NoTrack(PathBuf),

    #[error("Unknown sample rate in {0}")]
    UnknownSampleRate(PathBuf),

    #[error("Sample {0} contains no audio")]
    Empty(PathBuf),
}
