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
use tracing::debug;

use super::{Canvas, Rect, Texture};
use crate::config::{self, KeyOrigin};
use crate::tracker::{Valve, ValveState};

const BACKGROUND: [u8; 4] = [0, 0, 0, 255];

/// Where the valve keys go. Pressed keys sit `press_depth` pixels lower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValveLayout {
    origin: KeyOrigin,
    gap: i32,
    press_depth: i32,
    key_width: u32,
    key_height: u32,
}

impl ValveLayout {
    pub fn new(window: &config::Window, key_width: u32, key_height: u32) -> ValveLayout {
        ValveLayout {
            origin: window.key_origin(),
            gap: window.key_gap(),
            press_depth: window.press_depth(),
            key_width,
            key_height,
        }
    }

    pub fn key_rect(&self, valve: Valve, pressed: bool) -> Rect {
        let depth = if pressed { self.press_depth } else { 0 };
        Rect::new(
            self.origin.x + self.gap * valve.index() as i32,
            self.origin.y + depth,
            self.key_width,
            self.key_height,
        )
    }

    pub fn key_rects(&self, valves: ValveState) -> [Rect; 3] {
        Valve::ALL.map(|valve| self.key_rect(valve, valves.is_pressed(valve)))
    }
}

/// The trumpet artwork, ready to draw.
pub struct Scene {
    layout: ValveLayout,
    key: Texture,
    body: Texture,
    width: u32,
    height: u32,
}

impl Scene {
    /// The body is scaled to the window here so drawing it is a plain copy.
    pub fn new(window: &config::Window, key: Texture, body: Texture) -> Scene {
        let (width, height) = (window.width(), window.height());
        let layout = ValveLayout::new(window, key.width(), key.height());
        debug!(layout = ?layout, "Scene ready.");
        Scene {
            layout,
            key,
            body: body.resized(width, height),
            width,
            height,
        }
    }

    pub fn layout(&self) -> &ValveLayout {
        &self.layout
    }

    /// A canvas the size of the window.
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }

    /// Draws the keys for the valve state with the body over them.
    pub fn draw(&self, canvas: &mut Canvas, valves: ValveState) {
        canvas.clear(BACKGROUND);
        for rect in self.layout.key_rects(valves) {
            canvas.draw(&self.key, rect);
        }
        canvas.draw(&self.body, Rect::new(0, 0, self.width, self.height));
    }
}

#[cfg(test)]
mod test {
    use image::{Rgba, RgbaImage};

    use super::*;

    #[test]
    fn test_key_rects() {
        let layout = ValveLayout::new(&config::Window::default(), 60, 100);

        assert_eq!(
            [
                Rect::new(170, 150, 60, 100),
                Rect::new(265, 190, 60, 100),
                Rect::new(360, 150, 60, 100),
            ],
            layout.key_rects(ValveState::new(false, true, false))
        );
        assert_eq!(
            Rect::new(360, 190, 60, 100),
            layout.key_rect(Valve::Third, true)
        );
    }

    #[test]
    fn test_draw_scene() {
        let key = Texture::from_image("key", RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])));
        // A transparent body so the keys show through.
        let body = Texture::from_image("body", RgbaImage::from_pixel(8, 6, Rgba([0, 0, 0, 0])));
        let scene = Scene::new(&config::Window::default(), key, body);
        let mut canvas = scene.canvas();
        assert_eq!((640, 480), (canvas.width(), canvas.height()));

        scene.draw(&mut canvas, ValveState::new(true, false, false));
        // The first key is pressed down, the second isn't.
        assert_eq!(BACKGROUND, canvas.pixel(170, 150));
        assert_eq!([255, 0, 0, 255], canvas.pixel(170, 190));
        assert_eq!([255, 0, 0, 255], canvas.pixel(265, 150));
        assert_eq!(BACKGROUND, canvas.pixel(265, 190));
    }
}
