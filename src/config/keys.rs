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
use std::collections::HashSet;

use serde::Deserialize;
use winit::keyboard::KeyCode;

use super::ConfigError;
use crate::fingering::{Fingering, DEFAULT_BLOW_LEVELS};

/// A breath key and the open-valve note index it blows.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct BreathKey {
    key: KeyCode,
    level: u32,
}

impl BreathKey {
    pub fn new(key: KeyCode, level: u32) -> BreathKey {
        BreathKey { key, level }
    }

    pub fn key(&self) -> KeyCode {
        self.key
    }

    pub fn level(&self) -> u32 {
        self.level
    }
}

/// A YAML representation of the key bindings. Key names are winit key codes,
/// e.g. `ArrowLeft` or `KeyA`.
#[derive(Deserialize, Clone, Debug)]
pub struct Keys {
    /// The three valve keys, first valve first.
    #[serde(default = "default_valves")]
    valves: Vec<KeyCode>,

    /// The three breath keys, softest first.
    #[serde(default = "default_breath")]
    breath: Vec<BreathKey>,

    /// Closes the window. Set to null to only quit by closing the window.
    #[serde(default = "default_quit")]
    quit: Option<KeyCode>,
}

fn default_valves() -> Vec<KeyCode> {
    vec![KeyCode::ArrowLeft, KeyCode::ArrowDown, KeyCode::ArrowRight]
}

fn default_breath() -> Vec<BreathKey> {
    [KeyCode::KeyA, KeyCode::KeyS, KeyCode::KeyD]
        .into_iter()
        .zip(DEFAULT_BLOW_LEVELS)
        .map(|(key, level)| BreathKey::new(key, level))
        .collect()
}

fn default_quit() -> Option<KeyCode> {
    Some(KeyCode::Escape)
}

impl Default for Keys {
    fn default() -> Self {
        Keys {
            valves: default_valves(),
            breath: default_breath(),
            quit: default_quit(),
        }
    }
}

impl Keys {
    /// Returns the valve keys, first valve first.
    pub fn valves(&self) -> &[KeyCode] {
        &self.valves
    }

    /// Returns the breath keys, softest first.
    pub fn breath(&self) -> &[BreathKey] {
        &self.breath
    }

    /// Returns the quit key, if any.
    pub fn quit(&self) -> Option<KeyCode> {
        self.quit
    }

    /// Returns the fingering made from the breath key levels.
    pub fn fingering(&self) -> Result<Fingering, ConfigError> {
        match self.breath.as_slice() {
            [soft, medium, hard] => Ok(Fingering::new([
                soft.level(),
                medium.level(),
                hard.level(),
            ])),
            _ => Err(ConfigError::KeyCount {
                what: "breath",
                expected: 3,
                found: self.breath.len(),
            }),
        }
    }

    /// Checks key counts and that no key is bound twice.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.valves.len() != 3 {
            return Err(ConfigError::KeyCount {
                what: "valve",
                expected: 3,
                found: self.valves.len(),
            });
        }
        self.fingering()?;

        let mut seen = HashSet::new();
        let all = self
            .valves
            .iter()
            .copied()
            .chain(self.breath.iter().map(BreathKey::key))
            .chain(self.quit);
        for key in all {
            if !seen.insert(key) {
                return Err(ConfigError::DuplicateKey(key));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use config::{Config, File, FileFormat};

    use super::*;

    fn parse(yaml: &str) -> Keys {
        Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let keys = Keys::default();
        assert_eq!(
            &[KeyCode::ArrowLeft, KeyCode::ArrowDown, KeyCode::ArrowRight],
            keys.valves()
        );
        assert_eq!(BreathKey::new(KeyCode::KeyS, 13), keys.breath()[1]);
        assert_eq!(Some(KeyCode::Escape), keys.quit());
        assert_eq!(Fingering::default(), keys.fingering().unwrap());
        assert!(keys.validate().is_ok());
    }

    #[test]
    fn test_parse() {
        let keys = parse(
            r#"
            valves: [KeyJ, KeyK, KeyL]
            breath:
              - { key: KeyQ, level: 7 }
              - { key: KeyW, level: 12 }
              - { key: KeyE, level: 17 }
            quit: ~
            "#,
        );

        assert_eq!(&[KeyCode::KeyJ, KeyCode::KeyK, KeyCode::KeyL], keys.valves());
        assert_eq!(BreathKey::new(KeyCode::KeyQ, 7), keys.breath()[0]);
        assert_eq!(None, keys.quit());
        assert_eq!(Fingering::new([7, 12, 17]), keys.fingering().unwrap());
        assert!(keys.validate().is_ok());
    }

    #[test]
    fn test_wrong_key_counts() {
        let keys = parse(
            r#"
            valves: [KeyJ, KeyK]
            "#,
        );
        assert!(matches!(
            keys.validate(),
            Err(ConfigError::KeyCount {
                what: "valve",
                found: 2,
                ..
            })
        ));

        let keys = parse(
            r#"
            breath:
              - { key: KeyQ, level: 7 }
            "#,
        );
        assert!(matches!(
            keys.validate(),
            Err(ConfigError::KeyCount {
                what: "breath",
                found: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_duplicate_key() {
        let keys = parse(
            r#"
            valves: [KeyA, KeyK, KeyL]
            "#,
        );
        assert!(matches!(
            keys.validate(),
            Err(ConfigError::DuplicateKey(KeyCode::KeyA))
        ));
    }
}
