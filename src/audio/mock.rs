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
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::info;

use super::{AudioError, Mixer};
use crate::config;
use crate::samples::LoadedSample;

/// A command the mock device was asked to carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FadeIn {
        channel: usize,
        sample: String,
        loops: u32,
        fade: Duration,
    },
    FadeOut {
        channel: usize,
        fade: Duration,
    },
}

/// A mock device. Doesn't actually play anything, only records what it was asked to do.
#[derive(Clone)]
pub struct Device {
    name: String,
    sample_rate: u32,
    mixer_channels: usize,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl Device {
    /// Gets the given mock device.
    pub fn get(config: &config::Audio) -> Device {
        info!(device = config.device(), "Opening mock audio device.");
        Device {
            name: config.device().to_string(),
            sample_rate: config.sample_rate(),
            mixer_channels: config.mixer_channels(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns every call made so far.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Returns and forgets every call made so far.
    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock())
    }

    fn check_channel(&self, channel: usize) -> Result<(), AudioError> {
        if channel >= self.mixer_channels {
            return Err(AudioError::NoSuchChannel {
                channel,
                channels: self.mixer_channels,
            });
        }
        Ok(())
    }
}

impl Mixer for Device {
    fn fade_in(
        &self,
        channel: usize,
        sample: &LoadedSample,
        loops: u32,
        fade: Duration,
    ) -> Result<(), AudioError> {
        self.check_channel(channel)?;
        info!(
            device = self.name,
            channel,
            sample = sample.label(),
            loops,
            fade = ?fade,
            "Fading in (mock)."
        );
        self.calls.lock().push(Call::FadeIn {
            channel,
            sample: sample.label().to_string(),
            loops,
            fade,
        });
        Ok(())
    }

    fn fade_out(&self, channel: usize, fade: Duration) -> Result<(), AudioError> {
        self.check_channel(channel)?;
        info!(device = self.name, channel, fade = ?fade, "Fading out (mock).");
        self.calls.lock().push(Call::FadeOut { channel, fade });
        Ok(())
    }
}

impl super::Device for Device {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn mixer_channels(&self) -> usize {
        self.mixer_channels
    }

    #[cfg(test)]
    fn to_mock(&self) -> Option<Device> {
        Some(self.clone())
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Mock)", self.name,)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testutil::note;

    #[test]
    fn test_records_calls() {
        let device = Device::get(&config::Audio::new("mock"));
        device.play(1, &note(3), 0).unwrap();
        device.fade_out(1, Duration::from_millis(1)).unwrap();

        assert_eq!(
            vec![
                Call::FadeIn {
                    channel: 1,
                    sample: "3.wav".to_string(),
                    loops: 0,
                    fade: Duration::ZERO,
                },
                Call::FadeOut {
                    channel: 1,
                    fade: Duration::from_millis(1),
                },
            ],
            device.take_calls()
        );
        assert!(device.calls().is_empty());
    }

    #[test]
    fn test_bad_channel() {
        let device = Device::get(&config::Audio::new("mock"));
        assert!(device.fade_out(8, Duration::ZERO).is_err());
        assert!(device.calls().is_empty());
    }
}
