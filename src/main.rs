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
use std::error::Error;
use std::path::PathBuf;

use clap::{crate_version, Parser, Subcommand};
use doot::{app, audio, config::Instrument};
use tracing::error;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "A toy trumpet."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plays the trumpet.
    Play {
        /// The path to the instrument config. Defaults apply without one.
        config: Option<PathBuf>,
    },
    /// Loads every note and texture without opening a window or audio device.
    Verify {
        /// The path to the instrument config.
        config: Option<PathBuf>,
    },
    /// Prints the note index of every breath and valve combination.
    Fingerings {
        /// The path to the instrument config.
        config: Option<PathBuf>,
    },
    /// Lists the available audio output devices.
    Devices {},
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play { config } => {
            let instrument = Instrument::load(config.as_deref())?;
            if let Err(e) = app::run(&instrument) {
                error!(err = %e, "Trumpet stopped with an error.");
                return Err(e);
            }
        }
        Commands::Verify { config } => {
            let instrument = Instrument::load(config.as_deref())?;
            let verified = app::verify(&instrument)?;
            println!("{}", verified);
        }
        Commands::Fingerings { config } => {
            let instrument = Instrument::load(config.as_deref())?;
            let fingering = instrument.fingering()?;
            let table_size = instrument.note_table()?.len();

            println!("Fingerings (notes: {}):", table_size);
            for entry in fingering.chart() {
                println!("- {}", entry);
            }
        }
        Commands::Devices {} => {
            let devices = audio::list_devices()?;

            if devices.is_empty() {
                println!("No devices found.");
                return Ok(());
            }

            println!("Devices:");
            for device in devices {
                println!("- {}", device);
            }
        }
    }

    Ok(())
}
