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

use serde::Deserialize;

use super::ConfigError;
use crate::fingering::MIN_NOTES;

const DEFAULT_DIRECTORY: &str = "resources/sound";

/// An explicitly listed note file.
#[derive(Deserialize, Clone, Debug)]
pub struct NoteFile {
    index: usize,
    file: String,
}

/// A YAML representation of the note table. Either a directory of `<index>.wav`
/// files or an explicit list of files.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Notes {
    /// The directory holding `0.wav`, `1.wav`, ... (default: resources/sound).
    directory: Option<String>,

    /// How many files to take from the directory (default: 19).
    count: Option<usize>,

    /// Explicit files. Takes precedence over directory and count. Relative
    /// files are resolved against the directory if one is given.
    files: Option<Vec<NoteFile>>,
}

impl Notes {
    /// Creates a note table of `<dir>/<index>.wav` for `0..count`.
    pub fn generated(dir: &Path, count: usize) -> Notes {
        Notes {
            directory: Some(dir.to_string_lossy().into_owned()),
            count: Some(count),
            files: None,
        }
    }

    /// Resolves the note table, relative paths against `base`.
    pub fn table(&self, base: &Path) -> Result<NoteTable, ConfigError> {
        let directory = base.join(self.directory.as_deref().unwrap_or(DEFAULT_DIRECTORY));

        let mut entries = match &self.files {
            Some(files) => files
                .iter()
                .map(|note| NoteEntry {
                    index: note.index,
                    path: directory.join(&note.file),
                })
                .collect::<Vec<NoteEntry>>(),
            None => (0..self.count.unwrap_or(MIN_NOTES))
                .map(|index| NoteEntry {
                    index,
                    path: directory.join(format!("{}.wav", index)),
                })
                .collect(),
        };
        entries.sort_by_key(|entry| entry.index);

        for (position, pair) in entries.windows(2).enumerate() {
            if pair[0].index == pair[1].index {
                return Err(ConfigError::DuplicateNote(pair[0].index));
            }
            // Sorted and unique, so the first gap is the first missing index.
            if pair[0].index != position {
                return Err(ConfigError::MissingNote(position));
            }
        }
        if let Some(last) = entries.last() {
            let expected = entries.len() - 1;
            if last.index != expected {
                return Err(ConfigError::MissingNote(expected));
            }
        }

        if entries.len() < MIN_NOTES {
            return Err(ConfigError::TooFewNotes {
                found: entries.len(),
                minimum: MIN_NOTES,
            });
        }

        Ok(NoteTable { entries })
    }
}

/// One resolved note file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteEntry {
    index: usize,
    path: PathBuf,
}

impl NoteEntry {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// The validated note table: indices are contiguous from 0.
#[derive(Clone, Debug)]
pub struct NoteTable {
    entries: Vec<NoteEntry>,
}

impl NoteTable {
    /// Entries in index order.
    pub fn entries(&self) -> &[NoteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
