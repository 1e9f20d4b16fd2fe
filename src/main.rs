#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, Result};
use clap::Parser;
use maptrack::app::{App, FormInput};
use maptrack::map::{ConsoleUi, FixedPosition, LogMap};
use maptrack::store::{FileBlobStore, WorkoutStore};
use maptrack::types::Coords;
use maptrack::{cli, utils};

#[macro_use]
extern crate maptrack;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    match cli.cmd {
        Some(cli::Cmd::Add {
            lat,
            lon,
            kind,
            distance,
            duration,
            cadence,
            elevation,
        }) => {
            let coords = Coords { lat, lon };
            dlog!(
                "mode=add store={} kind={kind:?} lat={lat} lon={lon}",
                cli.store.display()
            );

            let blob = FileBlobStore::new(cli.store);
            let mut app = App::new(
                LogMap::default(),
                FixedPosition(coords),
                blob,
                ConsoleUi,
            );

            app.init().context("setting up the map")?;
            app.map_clicked(coords);
            app.submit_form(&FormInput {
                kind: kind.into(),
                distance_km: distance,
                duration_min: duration,
                cadence_spm: cadence,
                elevation_gain_m: elevation,
            })
            .context("workout not recorded")?;

            Ok(())
        }
        None => {
            dlog!("mode=list store={}", cli.store.display());

            let blob = FileBlobStore::new(cli.store);
            let store = WorkoutStore::load(&blob).context("loading stored workouts")?;
            if store.is_empty() {
                anyhow::bail!("No workouts recorded yet. Use `maptrack add` to log one.");
            }

            for (i, workout) in store.iter().take(cli.count).enumerate() {
                println!("{}\t{}", i + 1, workout.summary_line());
            }

            Ok(())
        }
    }
}
