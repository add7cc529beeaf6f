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

//! Maps a breath level and a valve combination to a note index.
//!
//! The breath level picks the open (no valves) note. Each valve lowers the
//! pitch by a fixed number of semitones, the way trumpet valves add tubing:
//! the first by a whole tone, the second by a half tone, the third by a tone
//! and a half.

use std::fmt;

use crate::tracker::{Breath, Valve, ValveState};

/// Semitones each valve lowers the pitch by, in valve order.
pub const VALVE_WEIGHTS: [u32; 3] = [2, 1, 3];

/// Open-valve note index for each breath key, softest first.
pub const DEFAULT_BLOW_LEVELS: [u32; 3] = [6, 13, 18];

/// Smallest note table the default fingering can address.
pub const MIN_NOTES: usize = 19;

/// A note index that doesn't exist in the note table. This is a bug in the
/// fingering or the note table, never something to paper over at runtime.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum FingeringError {
    #[error(
        "note index {index} for {breath} breath with valves {valves} is outside the note table (size {table_size})"
    )]
    OutOfRange {
        index: i64,
        breath: Breath,
        valves: ValveState,
        table_size: usize,
    },
}

/// One row of the fingering chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartEntry {
    pub breath: Breath,
    pub valves: ValveState,
    pub index: i64,
}

impl fmt::Display for ChartEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<6} {} -> {}", self.breath, self.valves, self.index)
    }
}

/// The blow levels for the three breath keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingering {
    levels: [u32; 3],
}

impl Default for Fingering {
    fn default() -> Self {
        Fingering::new(DEFAULT_BLOW_LEVELS)
    }
}

impl Fingering {
    /// Creates a fingering from the open-valve note index of each breath key.
    pub fn new(levels: [u32; 3]) -> Fingering {
        Fingering { levels }
    }

    /// The open-valve note index for the breath key.
    pub fn level(&self, breath: Breath) -> u32 {
        self.levels[breath.index()]
    }

    /// The unchecked note index. May be negative for a broken fingering.
    pub fn raw_index(&self, breath: Breath, valves: ValveState) -> i64 {
        Valve::ALL
            .iter()
            .filter(|valve| valves.is_pressed(**valve))
            .fold(i64::from(self.level(breath)), |index, valve| {
                index - i64::from(VALVE_WEIGHTS[valve.index()])
            })
    }

    /// The note index for the breath and valves, checked against the table size.
    pub fn note_index(
        &self,
        breath: Breath,
        valves: ValveState,
        table_size: usize,
    ) -> Result<usize, FingeringError> {
        let index = self.raw_index(breath, valves);
        match usize::try_from(index) {
            Ok(checked) if checked < table_size => Ok(checked),
            _ => Err(FingeringError::OutOfRange {
                index,
                breath,
                valves,
                table_size,
            }),
        }
    }

    /// Every breath and valve combination with its note index.
    pub fn chart(&self) -> Vec<ChartEntry> {
        Breath::ALL
            .iter()
            .flat_map(|breath| {
                all_valve_states().map(move |valves| ChartEntry {
                    breath: *breath,
                    valves,
                    index: self.raw_index(*breath, valves),
                })
            })
            .collect()
    }

    /// Checks every reachable fingering against the table size.
    pub fn validate(&self, table_size: usize) -> Result<(), FingeringError> {
        for entry in self.chart() {
            self.note_index(entry.breath, entry.valves, table_size)?;
        }
        Ok(())
    }
}

/// All eight valve combinations, open first.
fn all_valve_states() -> impl Iterator<Item = ValveState> {
    (0..8u8).map(|bits| ValveState::new(bits & 1 != 0, bits & 2 != 0, bits & 4 != 0))
}
