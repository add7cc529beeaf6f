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
// Core audio mixing logic, independent of the audio backend.
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};

use super::AudioError;
use crate::samples::LoadedSample;

/// A request from the control side to the mixer.
#[derive(Debug)]
pub enum Command {
    FadeIn {
        channel: usize,
        sample: LoadedSample,
        loops: u32,
        fade_frames: usize,
    },
    FadeOut {
        channel: usize,
        fade_frames: usize,
    },
}

/// Creates a connected handle and mixer. The handle stays on the control
/// side, the mixer moves into the audio callback.
pub fn new(channels: usize, output_channels: u16, sample_rate: u32) -> (MixerHandle, AudioMixer) {
    let (command_tx, command_rx) = crossbeam_channel::unbounded();
    (
        MixerHandle {
            command_tx,
            channels,
            sample_rate,
        },
        AudioMixer {
            command_rx,
            voices: (0..channels).map(|_| None).collect(),
            output_channels: usize::from(output_channels.max(1)),
        },
    )
}

/// Sends commands to an AudioMixer.
#[derive(Clone)]
pub struct MixerHandle {
    command_tx: Sender<Command>,
    channels: usize,
    sample_rate: u32,
}

impl MixerHandle {
    /// Number of mixer channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Converts a fade time to output frames.
    pub fn fade_frames(&self, fade: Duration) -> usize {
        (fade.as_secs_f64() * f64::from(self.sample_rate)).round() as usize
    }

    fn check_channel(&self, channel: usize) -> Result<(), AudioError> {
        if channel >= self.channels {
            return Err(AudioError::NoSuchChannel {
                channel,
                channels: self.channels,
            });
        }
        Ok(())
    }

    fn send(&self, command: Command) -> Result<(), AudioError> {
        self.command_tx
            .send(command)
            .map_err(|_| AudioError::Disconnected)
    }
}

impl super::Mixer for MixerHandle {
    fn fade_in(
        &self,
        channel: usize,
        sample: &LoadedSample,
        loops: u32,
        fade: Duration,
    ) -> Result<(), AudioError> {
        self.check_channel(channel)?;
        self.send(Command::FadeIn {
            channel,
            sample: sample.clone(),
            loops,
            fade_frames: self.fade_frames(fade),
        })
    }

    fn fade_out(&self, channel: usize, fade: Duration) -> Result<(), AudioError> {
        self.check_channel(channel)?;
        self.send(Command::FadeOut {
            channel,
            fade_frames: self.fade_frames(fade),
        })
    }
}

/// A sample playing on a channel.
struct Voice {
    sample: LoadedSample,
    /// Next frame to play.
    position: usize,
    loops_left: u32,
    gain: f32,
    /// Gain change per frame. Negative while fading out.
    step: f32,
}

impl Voice {
    fn new(sample: LoadedSample, loops: u32, fade_frames: usize) -> Voice {
        let (gain, step) = match fade_frames {
            0 => (1.0, 0.0),
            frames => (0.0, 1.0 / frames as f32),
        };
        Voice {
            sample,
            position: 0,
            loops_left: loops,
            gain,
            step,
        }
    }

    /// Starts fading out. Returns false if the voice should stop right away.
    fn fade_out(&mut self, fade_frames: usize) -> bool {
        if fade_frames == 0 {
            return false;
        }
        self.step = -1.0 / fade_frames as f32;
        true
    }

    /// Mixes one frame into the output. Returns false once the voice is done.
    fn mix_frame(&mut self, out: &mut [f32]) -> bool {
        if self.position >= self.sample.frames() {
            if self.loops_left == 0 || self.sample.frames() == 0 {
                return false;
            }
            self.loops_left -= 1;
            self.position = 0;
        }

        let channels = usize::from(self.sample.channel_count());
        let frame_start = self.position * channels;
        let frame = &self.sample.data()[frame_start..frame_start + channels];
        for (index, sample) in out.iter_mut().enumerate() {
            *sample += frame[index % channels] * self.gain;
        }
        self.position += 1;

        self.gain = (self.gain + self.step).min(1.0);
        if self.step < 0.0 && self.gain <= 0.0 {
            return false;
        }
        true
    }
}

/// Mixes the channel voices into interleaved output frames.
pub struct AudioMixer {
    command_rx: Receiver<Command>,
    voices: Vec<Option<Voice>>,
    output_channels: usize,
}

impl AudioMixer {
    /// Applies pending commands, then fills the interleaved buffer.
    pub fn process(&mut self, out: &mut [f32]) {
        while let Ok(command) = self.command_rx.try_recv() {
            self.apply(command);
        }

        out.fill(0.0);
        for frame in out.chunks_mut(self.output_channels) {
            for slot in self.voices.iter_mut() {
                if let Some(voice) = slot {
                    if !voice.mix_frame(frame) {
                        *slot = None;
                    }
                }
            }
        }
    }

    /// Returns true if something plays on the channel.
    pub fn is_playing(&self, channel: usize) -> bool {
        self.voices.get(channel).is_some_and(Option::is_some)
    }

    pub fn output_channels(&self) -> usize {
        self.output_channels
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::FadeIn {
                channel,
                sample,
                loops,
                fade_frames,
            } => {
                if let Some(slot) = self.voices.get_mut(channel) {
                    *slot = Some(Voice::new(sample, loops, fade_frames));
                }
            }
            Command::FadeOut {
                channel,
                fade_frames,
            } => {
                if let Some(slot) = self.voices.get_mut(channel) {
                    if let Some(voice) = slot {
                        if !voice.fade_out(fade_frames) {
                            *slot = None;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Mixer;

    fn constant(value: f32, frames: usize) -> LoadedSample {
        LoadedSample::new("constant", vec![value; frames], 1, 1000)
    }

    fn render(mixer: &mut AudioMixer, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0; frames * mixer.output_channels()];
        mixer.process(&mut out);
        out
    }

    #[test]
    fn test_fade_in_ramp() {
        let (handle, mut mixer) = new(2, 1, 1000);
        handle
            .fade_in(1, &constant(1.0, 100), 0, Duration::from_millis(4))
            .unwrap();

        let out = render(&mut mixer, 6);
        assert_eq!(vec![0.0, 0.25, 0.5, 0.75, 1.0, 1.0], out);
    }

    #[test]
    fn test_fade_out_ramp() {
        let (handle, mut mixer) = new(2, 1, 1000);
        handle.play(0, &constant(1.0, 100), 0).unwrap();
        assert_eq!(vec![1.0, 1.0], render(&mut mixer, 2));

        handle.fade_out(0, Duration::from_millis(4)).unwrap();
        let out = render(&mut mixer, 6);
        assert_eq!(vec![1.0, 0.75, 0.5, 0.25, 0.0, 0.0], out);
        assert!(!mixer.is_playing(0));

        // Fading out a silent channel does nothing.
        handle.fade_out(0, Duration::from_millis(4)).unwrap();
        assert_eq!(vec![0.0, 0.0], render(&mut mixer, 2));
    }

    #[test]
    fn test_fade_in_interrupts_channel() {
        let (handle, mut mixer) = new(2, 1, 1000);
        handle.play(1, &constant(0.5, 100), 0).unwrap();
        handle.play(0, &constant(0.125, 100), 0).unwrap();
        assert_eq!(vec![0.625], render(&mut mixer, 1));

        handle.play(1, &constant(0.25, 100), 0).unwrap();
        assert_eq!(vec![0.375], render(&mut mixer, 1));
    }

    #[test]
    fn test_loops() {
        let (handle, mut mixer) = new(1, 1, 1000);
        let sample = LoadedSample::new("ramp", vec![0.125, 0.25], 1, 1000);

        handle.play(0, &sample, 0).unwrap();
        assert_eq!(vec![0.125, 0.25, 0.0, 0.0], render(&mut mixer, 4));
        assert!(!mixer.is_playing(0));

        handle.play(0, &sample, 2).unwrap();
        assert_eq!(
            vec![0.125, 0.25, 0.125, 0.25, 0.125, 0.25, 0.0],
            render(&mut mixer, 7)
        );
    }

    #[test]
    fn test_mono_spreads_to_stereo() {
        let (handle, mut mixer) = new(1, 2, 1000);
        handle.play(0, &constant(0.5, 10), 0).unwrap();
        assert_eq!(vec![0.5, 0.5, 0.5, 0.5], render(&mut mixer, 2));

        let stereo = LoadedSample::new("stereo", vec![0.25, 0.75, 0.25, 0.75], 2, 1000);
        handle.play(0, &stereo, 0).unwrap();
        assert_eq!(vec![0.25, 0.75, 0.25, 0.75], render(&mut mixer, 2));
    }

    #[test]
    fn test_no_such_channel() {
        let (handle, _mixer) = new(2, 2, 1000);
        assert!(matches!(
            handle.play(2, &constant(1.0, 1), 0),
            Err(AudioError::NoSuchChannel {
                channel: 2,
                channels: 2
            })
        ));
    }

    #[test]
    fn test_disconnected() {
        let (handle, mixer) = new(2, 2, 1000);
        drop(mixer);
        assert!(matches!(
            handle.fade_out(0, Duration::ZERO),
            Err(AudioError::Disconnected)
        ));
    }
}
