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
use std::fmt;
use std::time::Duration;

use crate::config;
use crate::samples::LoadedSample;

pub mod cpal;
pub mod mixer;
pub mod mock;

/// Errors from the audio output.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("No audio device found with name {0}")]
    DeviceNotFound(String),

    #[error("The audio host has no default output device")]
    NoDefaultDevice,

    #[error("Unsupported output sample format {0}")]
    UnsupportedFormat(String),

    #[error("Mixer channel {channel} doesn't exist, the mixer has {channels} channels")]
    NoSuchChannel { channel: usize, channels: usize },

    #[error("The audio output stream is gone")]
    Disconnected,

    #[error("Unable to silence the backend: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Host(#[from] ::cpal::HostUnavailable),

    #[error(transparent)]
    Devices(#[from] ::cpal::DevicesError),

    #[error(transparent)]
    DeviceName(#[from] ::cpal::DeviceNameError),

    #[error(transparent)]
    SupportedConfigs(#[from] ::cpal::SupportedStreamConfigsError),

    #[error(transparent)]
    DefaultConfig(#[from] ::cpal::DefaultStreamConfigError),

    #[error(transparent)]
    BuildStream(#[from] ::cpal::BuildStreamError),

    #[error(transparent)]
    PlayStream(#[from] ::cpal::PlayStreamError),
}

/// A mixer with numbered channels. Each channel plays at most one sample.
pub trait Mixer {
    /// Plays the sample on the channel at full volume, replacing whatever plays there.
    /// `loops` is the number of extra repeats, 0 plays the sample once.
    fn play(&self, channel: usize, sample: &LoadedSample, loops: u32) -> Result<(), AudioError> {
        self.fade_in(channel, sample, loops, Duration::ZERO)
    }

    /// Like play, but ramps the volume up from silence over `fade`.
    fn fade_in(
        &self,
        channel: usize,
        sample: &LoadedSample,
        loops: u32,
        fade: Duration,
    ) -> Result<(), AudioError>;

    /// Ramps the channel down to silence over `fade`, then stops it. A silent
    /// channel stays silent.
    fn fade_out(&self, channel: usize, fade: Duration) -> Result<(), AudioError>;
}

/// An opened audio output.
pub trait Device: Mixer + fmt::Display {
    /// The sample rate notes must be loaded at.
    fn sample_rate(&self) -> u32;

    /// Number of mixer channels.
    fn mixer_channels(&self) -> usize;

    #[cfg(test)]
    fn to_mock(&self) -> Option<mock::Device>;
}

/// Lists devices known to cpal.
pub fn list_devices() -> Result<Vec<cpal::DeviceInfo>, AudioError> {
    cpal::Device::list()
}

/// Opens the device named in the config.
pub fn get_device(config: &config::Audio) -> Result<Box<dyn Device>, AudioError> {
    let device = config.device();
    if device.starts_with("mock") {
        return Ok(Box::new(mock::Device::get(config)));
    };

    Ok(Box::new(cpal::Device::get(config)?))
}
