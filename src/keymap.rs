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
use std::collections::HashMap;

use tracing::{debug, info};
use winit::keyboard::KeyCode;

use crate::config::Keys;
use crate::tracker::{Breath, Control, Tracker, Valve};

/// Input from the window, queued until the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    FocusLost,
}

/// What a key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Control(Control),
    Quit,
}

/// Whether the session keeps running after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Translates physical keys into trumpet controls.
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: HashMap<KeyCode, Binding>,
}

impl Keymap {
    /// Builds the keymap from validated key config.
    pub fn from_config(keys: &Keys) -> Keymap {
        let valves = keys
            .valves()
            .iter()
            .zip(Valve::ALL)
            .map(|(key, valve)| (*key, Binding::Control(Control::Valve(valve))));
        let breath = keys
            .breath()
            .iter()
            .zip(Breath::ALL)
            .map(|(key, breath)| (key.key(), Binding::Control(Control::Breath(breath))));
        let quit = keys.quit().map(|key| (key, Binding::Quit));

        let bindings: HashMap<KeyCode, Binding> = valves.chain(breath).chain(quit).collect();
        info!(bindings = bindings.len(), "Keymap ready.");
        Keymap { bindings }
    }

    /// Returns what the key is bound to, if anything.
    pub fn lookup(&self, key: KeyCode) -> Option<Binding> {
        self.bindings.get(&key).copied()
    }

    /// Applies one input event to the tracker. Unbound keys are ignored.
    pub fn apply(&self, event: InputEvent, tracker: &mut Tracker) -> Flow {
        match event {
            InputEvent::Quit => return Flow::Quit,
            InputEvent::FocusLost => tracker.release_all(),
            InputEvent::KeyDown(key) => match self.lookup(key) {
                Some(Binding::Control(control)) => tracker.on_key_down(control),
                Some(Binding::Quit) => return Flow::Quit,
                None => debug!(key = ?key, "Unbound key."),
            },
            InputEvent::KeyUp(key) => {
                if let Some(Binding::Control(control)) = self.lookup(key) {
                    tracker.on_key_up(control);
                }
            }
        }
        Flow::Continue
    }
}
