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

//! A toy trumpet. Three valve keys and three breath keys pick one of a fixed
//! set of prerecorded notes, which is faded in on a dedicated mixer channel.

pub mod app;
pub mod audio;
pub mod config;
pub mod fingering;
pub mod keymap;
pub mod player;
pub mod render;
pub mod samples;
pub mod tracker;
pub mod util;

#[cfg(test)]
mod testutil;
