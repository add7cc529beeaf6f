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
use std::time::Duration;

use serde::Deserialize;

use super::{parse_duration, ConfigError};

const DEFAULT_DEVICE: &str = "default";
const DEFAULT_SAMPLE_RATE: u32 = 48000;
const DEFAULT_CHANNELS: u16 = 2;
const DEFAULT_BUFFER_SIZE: u32 = 2048;
const DEFAULT_MIXER_CHANNELS: usize = 8;
const DEFAULT_TRUMPET_CHANNEL: usize = 1;
const DEFAULT_FADE: Duration = Duration::from_millis(1);

/// A YAML representation of the audio configuration.
#[derive(Deserialize, Clone, Debug)]
pub struct Audio {
    /// The audio device. "default" picks the host's default output, names starting
    /// with "mock" pick a device that only records what it is asked to play.
    #[serde(default = "default_device")]
    device: String,

    /// Output sample rate in Hz (default: 48000). Notes are resampled to it on load.
    sample_rate: Option<u32>,

    /// Number of output channels (default: 2).
    channels: Option<u16>,

    /// Output stream buffer size in frames (default: 2048).
    buffer_size: Option<u32>,

    /// Number of mixer channels (default: 8).
    mixer_channels: Option<usize>,

    /// The mixer channel the trumpet plays on (default: 1).
    trumpet_channel: Option<usize>,

    /// Fade in/out time when a note starts or stops (default: 1ms).
    fade: Option<String>,
}

fn default_device() -> String {
    DEFAULT_DEVICE.to_string()
}

impl Default for Audio {
    fn default() -> Self {
        Audio::new(DEFAULT_DEVICE)
    }
}

impl Audio {
    /// New will create a new Audio configuration.
    pub fn new(device: &str) -> Audio {
        Audio {
            device: device.to_string(),
            sample_rate: None,
            channels: None,
            buffer_size: None,
            mixer_channels: None,
            trumpet_channel: None,
            fade: None,
        }
    }

    /// Returns the device from the configuration.
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Returns the output sample rate (default: 48000)
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE)
    }

    /// Returns the number of output channels (default: 2)
    pub fn channels(&self) -> u16 {
        self.channels.unwrap_or(DEFAULT_CHANNELS)
    }

    /// Returns the stream buffer size in frames (default: 2048)
    pub fn buffer_size(&self) -> u32 {
        self.buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE)
    }

    /// Returns the number of mixer channels (default: 8)
    pub fn mixer_channels(&self) -> usize {
        self.mixer_channels.unwrap_or(DEFAULT_MIXER_CHANNELS)
    }

    /// Returns the mixer channel dedicated to the trumpet (default: 1)
    pub fn trumpet_channel(&self) -> usize {
        self.trumpet_channel.unwrap_or(DEFAULT_TRUMPET_CHANNEL)
    }

    /// Returns the note fade time (default: 1ms)
    pub fn fade(&self) -> Result<Duration, ConfigError> {
        match &self.fade {
            Some(fade) => parse_duration(fade),
            None => Ok(DEFAULT_FADE),
        }
    }

    /// Checks the values that would otherwise only fail once the device opens.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate() == 0 {
            return Err(ConfigError::Invalid {
                field: "audio.sample_rate",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.channels() == 0 {
            return Err(ConfigError::Invalid {
                field: "audio.channels",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.buffer_size() == 0 {
            return Err(ConfigError::Invalid {
                field: "audio.buffer_size",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.trumpet_channel() >= self.mixer_channels() {
            return Err(ConfigError::Invalid {
                field: "audio.trumpet_channel",
                reason: format!(
                    "channel {} doesn't exist, the mixer has {} channels",
                    self.trumpet_channel(),
                    self.mixer_channels()
                ),
            });
        }
        self.fade()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use config::{Config, File, FileFormat};

    use super::*;

    #[test]
    fn test_defaults() {
        let audio = Audio::default();
        assert_eq!("default", audio.device());
        assert_eq!(48000, audio.sample_rate());
        assert_eq!(2, audio.channels());
        assert_eq!(2048, audio.buffer_size());
        assert_eq!(8, audio.mixer_channels());
        assert_eq!(1, audio.trumpet_channel());
        assert_eq!(Duration::from_millis(1), audio.fade().unwrap());
        assert!(audio.validate().is_ok());
    }

    #[test]
    fn test_parse() {
        let yaml = r#"
            device: mock-device
            sample_rate: 44100
            mixer_channels: 2
            trumpet_channel: 0
            fade: 20ms
        "#;

        let audio: Audio = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!("mock-device", audio.device());
        assert_eq!(44100, audio.sample_rate());
        assert_eq!(0, audio.trumpet_channel());
        assert_eq!(Duration::from_millis(20), audio.fade().unwrap());
        assert!(audio.validate().is_ok());
    }

    #[test]
    fn test_trumpet_channel_out_of_range() {
        let yaml = r#"
            device: mock-device
            mixer_channels: 1
        "#;

        let audio: Audio = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(matches!(
            audio.validate(),
            Err(ConfigError::Invalid {
                field: "audio.trumpet_channel",
                ..
            })
        ));
    }

    #[test]
    fn test_bad_fade() {
        let yaml = r#"
            fade: quickly
        "#;

        let audio: Audio = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(matches!(audio.fade(), Err(ConfigError::Duration { .. })));
    }
}
