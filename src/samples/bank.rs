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
use rayon::prelude::*;
use tracing::{debug, info, span, Level};

use super::loader::{LoadedSample, SampleLoader};
use super::SampleError;
use crate::config::NoteTable;

/// The fixed set of notes the trumpet can play, addressed by note index.
pub struct NoteBank {
    notes: Vec<LoadedSample>,
}

impl NoteBank {
    /// Decodes every entry of the note table. Any missing or broken file fails the whole load.
    pub fn load(table: &NoteTable, loader: &SampleLoader) -> Result<NoteBank, SampleError> {
        let span = span!(Level::INFO, "load notes");
        let _enter = span.enter();

        info!(
            notes = table.len(),
            sample_rate = loader.target_sample_rate(),
            "Loading notes."
        );

        let notes = table
            .entries()
            .par_iter()
            .map(|entry| {
                debug!(index = entry.index(), path = ?entry.path(), "Loading note.");
                loader.load(entry.path())
            })
            .collect::<Result<Vec<LoadedSample>, SampleError>>()?;

        let bank = NoteBank::from_samples(notes);
        info!(
            notes = bank.len(),
            memory_kb = bank.memory_size() / 1024,
            "Notes loaded."
        );
        Ok(bank)
    }

    /// Creates a bank from samples already in memory, in note index order.
    pub fn from_samples(notes: Vec<LoadedSample>) -> NoteBank {
        NoteBank { notes }
    }

    /// Returns the note at the index.
    pub fn get(&self, index: usize) -> Option<&LoadedSample> {
        self.notes.get(index)
    }

    /// Returns the number of notes.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Returns true if the bank holds no notes.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Iterates over the notes in index order.
    pub fn iter(&self) -> impl Iterator<Item = &LoadedSample> {
        self.notes.iter()
    }

    /// Returns the total memory used by the notes.
    pub fn memory_size(&self) -> usize {
        self.notes.iter().map(|note| note.memory_size()).sum()
    }
}

impl Drop for NoteBank {
    fn drop(&mut self) {
        debug!(notes = self.notes.len(), "Freeing notes.");
    }
}

impl std::fmt::Debug for NoteBank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteBank")
            .field("notes", &self.notes.len())
            .field("memory_kb", &(self.memory_size() / 1024))
            .finish()
    }
}

#[cfg(test)]
mod test {
    use std::error::Error;

    use super::*;
    use crate::config::Notes;
    use crate::testutil::write_note_files;

    #[test]
    fn test_load_bank_in_index_order() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        write_note_files(dir.path(), 19, 48000)?;

        let table = Notes::generated(dir.path(), 19).table(dir.path())?;
        let bank = NoteBank::load(&table, &SampleLoader::new(48000))?;

        assert_eq!(19, bank.len());
        for (index, note) in bank.iter().enumerate() {
            assert_eq!(format!("{}.wav", index), note.label());
            let expected = ((index as f32) + 1.0) * 100.0 / 32768.0;
            assert!((note.data()[0] - expected).abs() < 0.0001);
        }
        Ok(())
    }

    #[test]
    fn test_missing_note_fails_load() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        write_note_files(dir.path(), 18, 48000)?;

        let table = Notes::generated(dir.path(), 19).table(dir.path())?;
        let result = NoteBank::load(&table, &SampleLoader::new(48000));
        assert!(matches!(result, Err(SampleError::Io { .. })));
        Ok(())
    }
}
