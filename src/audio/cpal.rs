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

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{error, info, span, Level};

use super::mixer::{self, AudioMixer, MixerHandle};
use super::{AudioError, Mixer};
use crate::config;
use crate::samples::LoadedSample;

/// A cpal output device as seen while listing.
pub struct DeviceInfo {
    name: String,
    max_channels: u16,
    host_id: cpal::HostId,
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Channels={}) ({})",
            self.name,
            self.max_channels,
            self.host_id.name()
        )
    }
}

/// An opened cpal output stream fed by the software mixer.
pub struct Device {
    name: String,
    host_id: cpal::HostId,
    channels: u16,
    sample_rate: u32,
    handle: MixerHandle,
    /// Playing for as long as this is held.
    _stream: cpal::Stream,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Channels={}) ({})",
            self.name,
            self.channels,
            self.host_id.name()
        )
    }
}

/// f32 callback: mix straight into the cpal buffer.
fn create_f32_callback(
    mut mixer: AudioMixer,
) -> impl FnMut(&mut [f32], &cpal::OutputCallbackInfo) + Send + 'static {
    move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
        mixer.process(data);
    }
}

/// Integer callback: mix into scratch space and convert.
fn create_int_callback<T: cpal::Sample + cpal::FromSample<f32>>(
    mut mixer: AudioMixer,
) -> impl FnMut(&mut [T], &cpal::OutputCallbackInfo) + Send + 'static {
    let mut scratch: Vec<f32> = Vec::new();
    move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
        if scratch.len() != data.len() {
            scratch.resize(data.len(), 0.0);
        }
        mixer.process(&mut scratch);

        for (dst, &src) in data.iter_mut().zip(scratch.iter()) {
            *dst = T::from_sample(src);
        }
    }
}

impl Device {
    /// Lists cpal output devices.
    pub fn list() -> Result<Vec<DeviceInfo>, AudioError> {
        Ok(Device::list_cpal_devices()?
            .into_iter()
            .map(|(info, _)| info)
            .collect())
    }

    fn list_cpal_devices() -> Result<Vec<(DeviceInfo, cpal::Device)>, AudioError> {
        // Suppress noisy output here.
        let _shh_stdout = shh::stdout()?;
        let _shh_stderr = shh::stderr()?;

        let mut devices = Vec::new();
        for host_id in cpal::available_hosts() {
            let host_devices = match cpal::host_from_id(host_id)?.devices() {
                Ok(host_devices) => host_devices,
                Err(e) => {
                    error!(
                        err = e.to_string(),
                        host = host_id.name(),
                        "Unable to list devices for host"
                    );
                    continue;
                }
            };

            for device in host_devices {
                let output_configs = match device.supported_output_configs() {
                    Ok(output_configs) => output_configs,
                    Err(_) => continue,
                };
                let max_channels = output_configs
                    .map(|output_config| output_config.channels())
                    .max()
                    .unwrap_or(0);

                if max_channels > 0 {
                    devices.push((
                        DeviceInfo {
                            name: device.name()?,
                            max_channels,
                            host_id,
                        },
                        device,
                    ));
                }
            }
        }

        devices.sort_by_key(|(info, _)| info.name.to_string());
        Ok(devices)
    }

    /// Opens the device named in the config and starts the output stream.
    pub fn get(config: &config::Audio) -> Result<Device, AudioError> {
        let span = span!(Level::INFO, "open audio (cpal)");
        let _enter = span.enter();

        let name = config.device();
        let (name, host_id, device) = if name == "default" {
            let host = cpal::default_host();
            let device = host
                .default_output_device()
                .ok_or(AudioError::NoDefaultDevice)?;
            (device.name()?, host.id(), device)
        } else {
            match Device::list_cpal_devices()?
                .into_iter()
                .find(|(info, _)| info.name.trim() == name)
            {
                Some((info, device)) => (info.name, info.host_id, device),
                None => return Err(AudioError::DeviceNotFound(name.to_string())),
            }
        };

        let channels = config.channels();
        let sample_rate = config.sample_rate();
        let stream_config = cpal::StreamConfig {
            channels,
            sample_rate,
            buffer_size: cpal::BufferSize::Fixed(config.buffer_size()),
        };

        let (handle, mixer) = mixer::new(config.mixer_channels(), channels, sample_rate);
        let sample_format = device.default_output_config()?.sample_format();
        let on_error = |err: cpal::StreamError| error!(err = %err, "Audio output stream error.");
        let stream = match sample_format {
            cpal::SampleFormat::F32 => device.build_output_stream(
                &stream_config,
                create_f32_callback(mixer),
                on_error,
                None,
            )?,
            cpal::SampleFormat::I16 => device.build_output_stream(
                &stream_config,
                create_int_callback::<i16>(mixer),
                on_error,
                None,
            )?,
            cpal::SampleFormat::I32 => device.build_output_stream(
                &stream_config,
                create_int_callback::<i32>(mixer),
                on_error,
                None,
            )?,
            other => return Err(AudioError::UnsupportedFormat(other.to_string())),
        };
        stream.play()?;

        info!(
            device = name,
            channels,
            sample_rate,
            buffer_size = config.buffer_size(),
            format = %sample_format,
            "Audio output started."
        );

        Ok(Device {
            name,
            host_id,
            channels,
            sample_rate,
            handle,
            _stream: stream,
        })
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
        self.handle.fade_in(channel, sample, loops, fade)
    }

    fn fade_out(&self, channel: usize, fade: Duration) -> Result<(), AudioError> {
        self.handle.fade_out(channel, fade)
    }
}

impl super::Device for Device {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn mixer_channels(&self) -> usize {
        self.handle.channels()
    }

    #[cfg(test)]
    fn to_mock(&self) -> Option<super::mock::Device> {
        None
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        info!(device = self.name, "Audio closed.");
    }
}
