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
use std::collections::VecDeque;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, span, warn, Level};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::audio::{self, Device};
use crate::config::Instrument;
use crate::fingering::FingeringError;
use crate::keymap::{Flow, InputEvent, Keymap};
use crate::player::Player;
use crate::render::{Canvas, GpuSurface, RenderError, Scene, Texture};
use crate::samples::{NoteBank, SampleLoader};
use crate::tracker::Tracker;

/// Everything a running trumpet owns. Fields drop in declaration order, so the
/// GPU goes before its window and the audio device before the notes it plays.
pub struct Session {
    gpu: Option<GpuSurface>,
    window: Option<Arc<Window>>,
    canvas: Canvas,
    scene: Scene,
    player: Player,
    tracker: Tracker,
    keymap: Keymap,
    device: Box<dyn Device>,
    bank: NoteBank,
    pending: VecDeque<InputEvent>,
    frame_interval: Duration,
}

impl Session {
    /// Opens the audio device and loads every note and texture. Any failure
    /// here is fatal and releases what was acquired so far.
    pub fn new(instrument: &Instrument) -> Result<Session, Box<dyn Error>> {
        let fingering = instrument.fingering()?;
        let table = instrument.note_table()?;
        let window = instrument.window();

        let device = audio::get_device(instrument.audio())?;
        info!(device = %device, "Audio device open.");

        let bank = NoteBank::load(&table, &SampleLoader::new(device.sample_rate()))?;
        fingering.validate(bank.len())?;

        let key = Texture::load(&instrument.resolve(window.key_texture()))?;
        let body = Texture::load(&instrument.resolve(window.valves_texture()))?;
        let scene = Scene::new(window, key, body);

        let audio = instrument.audio();
        let player = Player::new(fingering, audio.trumpet_channel(), audio.fade()?);

        Ok(Session {
            gpu: None,
            window: None,
            canvas: scene.canvas(),
            scene,
            player,
            tracker: Tracker::new(),
            keymap: Keymap::from_config(instrument.keys()),
            device,
            bank,
            pending: VecDeque::new(),
            frame_interval: window.frame_interval()?,
        })
    }

    /// Opens the GPU on the window and starts presenting into it.
    pub fn attach(&mut self, window: Arc<Window>) -> Result<(), RenderError> {
        self.gpu = Some(GpuSurface::new(Arc::clone(&window))?);
        self.window = Some(window);
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Queues input for the next tick.
    pub fn queue(&mut self, event: InputEvent) {
        self.pending.push_back(event);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(width, height);
        }
    }

    /// Runs one tick: applies queued input, updates the sound, draws.
    pub fn tick(&mut self) -> Result<Flow, FingeringError> {
        while let Some(event) = self.pending.pop_front() {
            if self.keymap.apply(event, &mut self.tracker) == Flow::Quit {
                info!("Quit requested.");
                return Ok(Flow::Quit);
            }
        }

        self.player
            .evaluate(&mut self.tracker, &self.bank, self.device.as_ref())?;

        self.scene.draw(&mut self.canvas, self.tracker.valves());
        if let Some(gpu) = &mut self.gpu {
            if let Err(e) = gpu.present(&self.canvas) {
                warn!(err = %e, "Unable to present frame.");
            }
        }
        Ok(Flow::Continue)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        info!("Closing session.");
    }
}

/// What `verify` found.
#[derive(Debug)]
pub struct Verified {
    pub notes: usize,
    pub memory_kb: usize,
    pub key_size: (u32, u32),
    pub body_size: (u32, u32),
}

impl fmt::Display for Verified {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Notes: {} ({} KB)", self.notes, self.memory_kb)?;
        writeln!(f, "Key texture: {}x{}", self.key_size.0, self.key_size.1)?;
        write!(f, "Valves texture: {}x{}", self.body_size.0, self.body_size.1)
    }
}

/// Loads every note and texture the instrument needs without opening a window
/// or an audio device.
pub fn verify(instrument: &Instrument) -> Result<Verified, Box<dyn Error>> {
    let span = span!(Level::INFO, "verify");
    let _enter = span.enter();

    let table = instrument.note_table()?;
    let bank = NoteBank::load(&table, &SampleLoader::new(instrument.audio().sample_rate()))?;
    instrument.fingering()?.validate(bank.len())?;

    let window = instrument.window();
    let key = Texture::load(&instrument.resolve(window.key_texture()))?;
    let body = Texture::load(&instrument.resolve(window.valves_texture()))?;

    Ok(Verified {
        notes: bank.len(),
        memory_kb: bank.memory_size() / 1024,
        key_size: (key.width(), key.height()),
        body_size: (body.width(), body.height()),
    })
}

/// Drives a session from the winit event loop.
struct App {
    session: Session,
    title: String,
    size: PhysicalSize<u32>,
    next_tick: Instant,
    result: Result<(), Box<dyn Error>>,
}

impl App {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: Box<dyn Error>) {
        error!(err = %err, "Stopping.");
        self.result = Err(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(self.size);
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        if let Err(e) = self.session.attach(window) {
            return self.fail(event_loop, e.into());
        }

        info!(title = self.title, "Window open.");
        self.next_tick = Instant::now();
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.session.queue(InputEvent::Quit),
            WindowEvent::Focused(false) => self.session.queue(InputEvent::FocusLost),
            WindowEvent::Resized(size) => self.session.resize(size.width, size.height),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                debug!(key = ?code, state = ?state, "Key.");
                self.session.queue(match state {
                    ElementState::Pressed => InputEvent::KeyDown(code),
                    ElementState::Released => InputEvent::KeyUp(code),
                });
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now >= self.next_tick {
            match self.session.tick() {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => return event_loop.exit(),
                Err(e) => return self.fail(event_loop, e.into()),
            }

            let interval = self.session.frame_interval();
            self.next_tick += interval;
            // Don't try to catch up after a stall.
            if self.next_tick < now {
                self.next_tick = now + interval;
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
    }
}

/// Opens the instrument and plays it until the window closes.
pub fn run(instrument: &Instrument) -> Result<(), Box<dyn Error>> {
    let span = span!(Level::INFO, "session");
    let _enter = span.enter();

    let session = Session::new(instrument)?;
    let event_loop = EventLoop::new()?;

    let window = instrument.window();
    let mut app = App {
        session,
        title: window.title().to_string(),
        size: PhysicalSize::new(window.width(), window.height()),
        next_tick: Instant::now(),
        result: Ok(()),
    };
    event_loop.run_app(&mut app)?;
    app.result
}

#[cfg(test)]
mod test {
    use std::fs;
    use std::path::Path;

    use winit::keyboard::KeyCode;

    use super::*;
    use crate::audio::mock::Call;
    use crate::testutil::{write_note_files, write_png};

    fn instrument(dir: &Path) -> Result<Instrument, Box<dyn Error>> {
        fs::create_dir(dir.join("sound"))?;
        write_note_files(&dir.join("sound"), 19, 48000)?;
        write_png(&dir.join("key.png"), 20, 40, [200, 200, 0, 255])?;
        write_png(&dir.join("valves.png"), 64, 48, [0, 0, 0, 0])?;

        let path = dir.join("doot.yaml");
        fs::write(
            &path,
            r#"
window:
  key_texture: key.png
  valves_texture: valves.png
audio:
  device: mock
notes:
  directory: sound
"#,
        )?;
        Ok(Instrument::load(Some(&path))?)
    }

    #[test]
    fn test_session_ticks() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let mut session = Session::new(&instrument(dir.path())?)?;
        let mock = session.device.to_mock().ok_or("not a mock")?;

        session.queue(InputEvent::KeyDown(KeyCode::ArrowLeft));
        session.queue(InputEvent::KeyDown(KeyCode::KeyA));
        assert_eq!(Flow::Continue, session.tick()?);
        assert_eq!(
            vec![Call::FadeIn {
                channel: 1,
                sample: "4.wav".to_string(),
                loops: 0,
                fade: Duration::from_millis(1),
            }],
            mock.take_calls()
        );
        // The pressed first key is drawn lower.
        assert_eq!([200, 200, 0, 255], session.canvas.pixel(170, 190));

        session.queue(InputEvent::FocusLost);
        assert_eq!(Flow::Continue, session.tick()?);
        assert_eq!(
            vec![Call::FadeOut {
                channel: 1,
                fade: Duration::from_millis(1),
            }],
            mock.take_calls()
        );
        assert_eq!([200, 200, 0, 255], session.canvas.pixel(170, 150));

        session.queue(InputEvent::KeyDown(KeyCode::Escape));
        assert_eq!(Flow::Quit, session.tick()?);
        Ok(())
    }

    #[test]
    fn test_missing_texture_is_fatal() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let instrument = instrument(dir.path())?;
        fs::remove_file(dir.path().join("key.png"))?;

        assert!(Session::new(&instrument).is_err());
        assert!(verify(&instrument).is_err());
        Ok(())
    }

    #[test]
    fn test_verify() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let verified = verify(&instrument(dir.path())?)?;
        assert_eq!(19, verified.notes);
        assert_eq!((20, 40), verified.key_size);
        assert_eq!((64, 48), verified.body_size);
        Ok(())
    }
}
