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
use std::{error::Error, fs::File, path::Path};

use hound::{SampleFormat, WavSpec, WavWriter};
use image::{Rgba, RgbaImage};

use crate::samples::LoadedSample;

/// Writes interleaved 16 bit samples to a WAV file.
pub fn write_wav(
    path: &Path,
    interleaved: &[i16],
    channels: u16,
    sample_rate: u32,
) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    let mut writer = WavWriter::new(
        file,
        WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        },
    )?;

    for sample in interleaved {
        writer.write_sample(*sample)?;
    }
    writer.finalize()?;

    Ok(())
}

/// Writes `count` short mono notes named `0.wav` .. `<count - 1>.wav` into the directory.
/// Each note holds its own index as a constant sample value so tests can tell them apart.
pub fn write_note_files(dir: &Path, count: usize, sample_rate: u32) -> Result<(), Box<dyn Error>> {
    for index in 0..count {
        let value = (index as i16 + 1) * 100;
        write_wav(
            &dir.join(format!("{}.wav", index)),
            &[value; 64],
            1,
            sample_rate,
        )?;
    }
    Ok(())
}

/// Writes a solid color PNG.
pub fn write_png(path: &Path, width: u32, height: u32, color: [u8; 4]) -> Result<(), Box<dyn Error>> {
    RgbaImage::from_pixel(width, height, Rgba(color)).save(path)?;
    Ok(())
}

/// An in-memory note whose label is `<index>.wav`.
pub fn note(index: usize) -> LoadedSample {
    LoadedSample::new(&format!("{}.wav", index), vec![index as f32; 16], 1, 48000)
}

/// A full in-memory note table of the given size.
pub fn notes(count: usize) -> Vec<LoadedSample> {
    (0..count).map(note).collect()
}
