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

use tracing::{debug, warn};

use crate::audio::Mixer;
use crate::fingering::{Fingering, FingeringError};
use crate::samples::NoteBank;
use crate::tracker::{Retrigger, Tracker};

/// The audio side effect of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The note at this index was faded in.
    FadeIn(usize),
    FadeOut,
}

/// Turns the tracked key state into note starts and stops on one mixer channel.
#[derive(Debug)]
pub struct Player {
    fingering: Fingering,
    channel: usize,
    fade: Duration,
    loops: u32,
    /// The note last faded in, until it is faded out.
    sounding: Option<usize>,
}

impl Player {
    /// Creates a player for the trumpet channel. Notes play once.
    pub fn new(fingering: Fingering, channel: usize, fade: Duration) -> Player {
        Player {
            fingering,
            channel,
            fade,
            loops: 0,
            sounding: None,
        }
    }

    /// The note currently sounding, if any.
    pub fn sounding(&self) -> Option<usize> {
        self.sounding
    }

    /// Evaluates the tracker once and issues at most one mixer command.
    ///
    /// Mixer failures are logged and otherwise ignored. A fingering outside
    /// the note bank is returned as an error and must stop the session.
    pub fn evaluate(
        &mut self,
        tracker: &mut Tracker,
        notes: &NoteBank,
        mixer: &dyn Mixer,
    ) -> Result<Option<Action>, FingeringError> {
        let breath = match tracker.blow() {
            Some(breath) => breath,
            None => {
                if self.sounding.take().is_none() {
                    return Ok(None);
                }
                debug!(channel = self.channel, "Fading out.");
                if let Err(e) = mixer.fade_out(self.channel, self.fade) {
                    warn!(err = %e, channel = self.channel, "Unable to fade out.");
                }
                return Ok(Some(Action::FadeOut));
            }
        };

        if tracker.retrigger() != Retrigger::Requested {
            return Ok(None);
        }

        let valves = tracker.valves();
        let index = self.fingering.note_index(breath, valves, notes.len())?;
        tracker.clear_retrigger();
        self.sounding = Some(index);

        match notes.get(index) {
            Some(note) => {
                debug!(
                    breath = %breath,
                    valves = %valves,
                    index,
                    note = note.label(),
                    "Doot."
                );
                if let Err(e) = mixer.fade_in(self.channel, note, self.loops, self.fade) {
                    warn!(err = %e, channel = self.channel, index, "Unable to fade in.");
                }
            }
            None => warn!(index, "Note missing from the bank."),
        }
        Ok(Some(Action::FadeIn(index)))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::audio::mock::{Call, Device};
    use crate::config;
    use crate::fingering::MIN_NOTES;
    use crate::testutil::notes;
    use crate::tracker::{Breath, Control, Valve};

    const FADE: Duration = Duration::from_millis(1);

    struct Rig {
        player: Player,
        tracker: Tracker,
        bank: NoteBank,
        device: Device,
    }

    impl Rig {
        fn new() -> Rig {
            Rig {
                player: Player::new(Fingering::default(), 1, FADE),
                tracker: Tracker::new(),
                bank: NoteBank::from_samples(notes(MIN_NOTES)),
                device: Device::get(&config::Audio::new("mock")),
            }
        }

        fn tick(&mut self) -> Option<Action> {
            self.player
                .evaluate(&mut self.tracker, &self.bank, &self.device)
                .unwrap()
        }

        fn down(&mut self, control: Control) {
            self.tracker.on_key_down(control);
        }

        fn up(&mut self, control: Control) {
            self.tracker.on_key_up(control);
        }
    }

    fn fade_in(index: usize) -> Call {
        Call::FadeIn {
            channel: 1,
            sample: format!("{}.wav", index),
            loops: 0,
            fade: FADE,
        }
    }

    fn fade_out() -> Call {
        Call::FadeOut {
            channel: 1,
            fade: FADE,
        }
    }

    #[test]
    fn test_nothing_without_breath() {
        let mut rig = Rig::new();
        for valve in Valve::ALL {
            rig.down(Control::Valve(valve));
            assert_eq!(None, rig.tick());
        }
        assert!(rig.device.calls().is_empty());
    }

    #[test]
    fn test_one_play_per_retrigger() {
        let mut rig = Rig::new();
        rig.down(Control::Breath(Breath::Medium));
        assert_eq!(Some(Action::FadeIn(13)), rig.tick());
        assert_eq!(Retrigger::Idle, rig.tracker.retrigger());

        // Holding still doesn't trigger again.
        assert_eq!(None, rig.tick());
        assert_eq!(None, rig.tick());
        assert_eq!(vec![fade_in(13)], rig.device.calls());
        assert_eq!(Some(13), rig.player.sounding());
    }

    #[test]
    fn test_index_cases() {
        let cases = [
            (Breath::Soft, vec![], 6),
            (Breath::Soft, vec![Valve::First, Valve::Third], 1),
            (Breath::Hard, vec![Valve::First, Valve::Second, Valve::Third], 12),
            (Breath::Medium, vec![Valve::Second], 12),
        ];

        for (breath, valves, expected) in cases {
            let mut rig = Rig::new();
            for valve in valves {
                rig.down(Control::Valve(valve));
            }
            rig.down(Control::Breath(breath));
            assert_eq!(Some(Action::FadeIn(expected)), rig.tick());
            assert_eq!(vec![fade_in(expected)], rig.device.calls());
        }
    }

    #[test]
    fn test_release_fades_out_once() {
        let mut rig = Rig::new();
        rig.down(Control::Breath(Breath::Hard));
        rig.tick();
        rig.up(Control::Breath(Breath::Hard));

        assert_eq!(Some(Action::FadeOut), rig.tick());
        assert_eq!(None, rig.tick());
        assert_eq!(vec![fade_in(18), fade_out()], rig.device.calls());
        assert_eq!(None, rig.player.sounding());
    }

    #[test]
    fn test_slur_sequence() {
        let mut rig = Rig::new();
        rig.down(Control::Valve(Valve::First));
        rig.down(Control::Breath(Breath::Soft));
        rig.tick();

        rig.down(Control::Valve(Valve::Second));
        rig.tick();

        rig.up(Control::Breath(Breath::Soft));
        rig.tick();
        rig.tick();

        assert_eq!(
            vec![fade_in(4), fade_in(3), fade_out()],
            rig.device.take_calls()
        );
    }

    #[test]
    fn test_press_and_release_within_one_tick() {
        let mut rig = Rig::new();
        rig.down(Control::Breath(Breath::Soft));
        rig.up(Control::Breath(Breath::Soft));
        assert_eq!(None, rig.tick());
        assert!(rig.device.calls().is_empty());
    }

    #[test]
    fn test_out_of_range_is_an_error() {
        let mut rig = Rig::new();
        rig.bank = NoteBank::from_samples(notes(18));
        rig.down(Control::Breath(Breath::Hard));

        let result = rig
            .player
            .evaluate(&mut rig.tracker, &rig.bank, &rig.device);
        assert!(matches!(
            result,
            Err(FingeringError::OutOfRange { index: 18, .. })
        ));
        assert!(rig.device.calls().is_empty());
    }

    #[test]
    fn test_mixer_errors_are_not_fatal() {
        let mut rig = Rig::new();
        rig.player = Player::new(Fingering::default(), 12, FADE);
        rig.down(Control::Breath(Breath::Soft));
        assert_eq!(Some(Action::FadeIn(6)), rig.tick());
        assert!(rig.device.calls().is_empty());
    }
}
