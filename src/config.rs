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
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, File};
use duration_string::DurationString;
use serde::Deserialize;
use tracing::info;

use crate::fingering::Fingering;

mod audio;
mod error;
mod keys;
mod notes;
mod window;

pub use audio::Audio;
pub use error::ConfigError;
pub use keys::{BreathKey, Keys};
pub use notes::{NoteEntry, NoteFile, NoteTable, Notes};
pub use window::{KeyOrigin, Window};

/// Parses a duration string such as "16ms" or "1s".
pub(crate) fn parse_duration(value: &str) -> Result<Duration, ConfigError> {
    DurationString::from_string(value.to_string())
        .map(Duration::from)
        .map_err(|e| ConfigError::Duration {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// The whole instrument configuration. Every section is optional.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Instrument {
    window: Window,
    audio: Audio,
    notes: Notes,
    keys: Keys,

    /// Relative paths in the configuration are resolved against this.
    #[serde(skip)]
    base_path: PathBuf,
}

impl Instrument {
    /// Deserializes the instrument from a file. Relative asset paths are
    /// resolved against the file's directory.
    pub fn from_file(path: &Path) -> Result<Instrument, ConfigError> {
        let mut instrument: Instrument = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;
        instrument.base_path = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(instrument)
    }

    /// Loads and validates the instrument from the given file, or the
    /// defaults relative to the working directory if there is none.
    pub fn load(path: Option<&Path>) -> Result<Instrument, ConfigError> {
        let instrument = match path {
            Some(path) => {
                info!(path = ?path, "Loading instrument config.");
                Instrument::from_file(path)?
            }
            None => {
                info!("No config given, using defaults.");
                Instrument::default()
            }
        };
        instrument.validate()?;
        Ok(instrument)
    }

    /// Checks every section and that the fingering stays inside the note table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.window.validate()?;
        self.audio.validate()?;
        self.keys.validate()?;
        let table = self.note_table()?;
        self.fingering()?.validate(table.len())?;
        Ok(())
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn audio(&self) -> &Audio {
        &self.audio
    }

    pub fn keys(&self) -> &Keys {
        &self.keys
    }

    pub fn fingering(&self) -> Result<Fingering, ConfigError> {
        self.keys.fingering()
    }

    /// Returns the note table with paths resolved.
    pub fn note_table(&self) -> Result<NoteTable, ConfigError> {
        self.notes.table(&self.base_path)
    }

    /// Resolves a configured path against the config file's directory.
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}
