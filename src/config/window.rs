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

const DEFAULT_TITLE: &str = "trumpet_tyckiter";
const DEFAULT_WIDTH: u32 = 640;
const DEFAULT_HEIGHT: u32 = 480;
const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(1000 / 60);
const DEFAULT_VALVES_TEXTURE: &str = "resources/trumpet_valves.png";
const DEFAULT_KEY_TEXTURE: &str = "resources/trumpet_key.png";
const DEFAULT_KEY_ORIGIN: KeyOrigin = KeyOrigin { x: 170, y: 150 };
const DEFAULT_KEY_GAP: i32 = 95;
const DEFAULT_PRESS_DEPTH: i32 = 40;

/// Where the first valve key is drawn.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyOrigin {
    pub x: i32,
    pub y: i32,
}

/// A YAML representation of the window and its artwork.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Window {
    /// The window title.
    title: Option<String>,

    /// The window width in pixels (default: 640).
    width: Option<u32>,

    /// The window height in pixels (default: 480).
    height: Option<u32>,

    /// Time between ticks (default: 16ms).
    frame_interval: Option<String>,

    /// The trumpet body, stretched over the whole window and drawn over the keys.
    valves_texture: Option<String>,

    /// The valve key, drawn once per valve.
    key_texture: Option<String>,

    /// Top left corner of the first valve key (default: 170, 150).
    key_origin: Option<KeyOrigin>,

    /// Horizontal distance between valve keys (default: 95).
    key_gap: Option<i32>,

    /// How far a pressed key moves down (default: 40).
    press_depth: Option<i32>,
}

impl Window {
    /// Returns the window title.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    /// Returns the window width.
    pub fn width(&self) -> u32 {
        self.width.unwrap_or(DEFAULT_WIDTH)
    }

    /// Returns the window height.
    pub fn height(&self) -> u32 {
        self.height.unwrap_or(DEFAULT_HEIGHT)
    }

    /// Returns the time between ticks.
    pub fn frame_interval(&self) -> Result<Duration, ConfigError> {
        match &self.frame_interval {
            Some(frame_interval) => parse_duration(frame_interval),
            None => Ok(DEFAULT_FRAME_INTERVAL),
        }
    }

    /// Returns the path of the valves texture as written in the config.
    pub fn valves_texture(&self) -> &str {
        self.valves_texture
            .as_deref()
            .unwrap_or(DEFAULT_VALVES_TEXTURE)
    }

    /// Returns the path of the key texture as written in the config.
    pub fn key_texture(&self) -> &str {
        self.key_texture.as_deref().unwrap_or(DEFAULT_KEY_TEXTURE)
    }

    /// Returns the position of the first valve key.
    pub fn key_origin(&self) -> KeyOrigin {
        self.key_origin.unwrap_or(DEFAULT_KEY_ORIGIN)
    }

    /// Returns the horizontal distance between valve keys.
    pub fn key_gap(&self) -> i32 {
        self.key_gap.unwrap_or(DEFAULT_KEY_GAP)
    }

    /// Returns how far a pressed key moves down.
    pub fn press_depth(&self) -> i32 {
        self.press_depth.unwrap_or(DEFAULT_PRESS_DEPTH)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width() == 0 || self.height() == 0 {
            return Err(ConfigError::Invalid {
                field: "window.width/height",
                reason: format!("{}x{} is not a usable size", self.width(), self.height()),
            });
        }
        if self.frame_interval()?.is_zero() {
            return Err(ConfigError::Invalid {
                field: "window.frame_interval",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use config::{Config, File, FileFormat};

    use super::*;

    #[test]
    fn test_defaults() {
        let window = Window::default();
        assert_eq!("trumpet_tyckiter", window.title());
        assert_eq!((640, 480), (window.width(), window.height()));
        assert_eq!(Duration::from_millis(16), window.frame_interval().unwrap());
        assert_eq!(KeyOrigin { x: 170, y: 150 }, window.key_origin());
        assert_eq!(95, window.key_gap());
        assert_eq!(40, window.press_depth());
        assert!(window.validate().is_ok());
    }

    #[test]
    fn test_parse() {
        let yaml = r#"
            title: doot
            width: 800
            frame_interval: 10ms
            key_texture: art/key.png
            key_origin:
              x: 10
              y: 20
        "#;

        let window: Window = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!("doot", window.title());
        assert_eq!(800, window.width());
        assert_eq!(480, window.height());
        assert_eq!(Duration::from_millis(10), window.frame_interval().unwrap());
        assert_eq!("art/key.png", window.key_texture());
        assert_eq!("resources/trumpet_valves.png", window.valves_texture());
        assert_eq!(KeyOrigin { x: 10, y: 20 }, window.key_origin());
    }

    #[test]
    fn test_zero_size() {
        let yaml = r#"
            height: 0
        "#;

        let window: Window = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(window.validate().is_err());
    }
}
