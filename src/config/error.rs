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
use winit::keyboard::KeyCode;

use crate::fingering::FingeringError;

/// Typed error for config load/parse/validation failures so callers can distinguish
/// e.g. file-not-found from an impossible fingering without string matching.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config load/parse error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid duration {value:?}: {reason}")]
    Duration { value: String, reason: String },

    #[error("Expected {expected} {what} keys, found {found}")]
    KeyCount {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Key {0:?} is bound more than once")]
    DuplicateKey(KeyCode),

    #[error("Note table has {found} notes, at least {minimum} are required")]
    TooFewNotes { found: usize, minimum: usize },

    #[error("Note table is missing index {0}")]
    MissingNote(usize),

    #[error("Note index {0} is listed more than once")]
    DuplicateNote(usize),

    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Fingering doesn't fit the note table: {0}")]
    Fingering(#[from] FingeringError),
}
