//! Desktop harness for the native core
//!
//! ```text
//! rlcap-cli greet
//! rlcap-cli config show ./ncaprc
//! rlcap-cli tracks ~/Music --shuffle --seed 7
//! rlcap-cli tracks ~/Music --config ./ncaprc
//! rlcap-cli wav ./audio.wav.custom
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rlcap::config::{ConfigStore, PlayerConfig};
use rlcap::order::TrackOrder;
use rlcap::wav::WavReader;
use rlcap::{logging, tracks};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rlcap-cli", about = "Inspect rlcap player state from the desktop")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the greeting the activity displays
    Greet,
    /// Inspect or create a player config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// List the playable tracks in a directory
    Tracks {
        dir: PathBuf,
        /// List in shuffled play order
        #[arg(long)]
        shuffle: bool,
        /// Take the shuffle setting from a player config file
        #[arg(long, conflicts_with = "shuffle")]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Describe a decoded WAV cache file
    Wav { file: PathBuf },
}

#[derive(Subcommand)]
enum ConfigAction {
    Show { file: PathBuf },
    /// Create the file with defaults if it does not exist
    Init { file: PathBuf },
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Greet => println!("{}", rlcap::get_greeting()),
        Command::Config { action } => match action {
            ConfigAction::Show { file } => {
                let (store, _) = ConfigStore::open(&file)
                    .with_context(|| format!("opening {}", file.display()))?;
                store.read().context("reading config")?;
                println!("{}", store.to_json()?);
            }
            ConfigAction::Init { file } => {
                let store = ConfigStore::open_or_init(&file)
                    .with_context(|| format!("initializing {}", file.display()))?;
                println!("{}", store.to_json()?);
            }
        },
        Command::Tracks {
            dir,
            shuffle,
            config,
            seed,
        } => {
            let list = tracks::load_dir(&dir)
                .with_context(|| format!("loading tracks from {}", dir.display()))?;
            let settings = match config {
                Some(file) => {
                    let (store, _) = ConfigStore::open(&file)
                        .with_context(|| format!("opening {}", file.display()))?;
                    store.read().context("reading config")?;
                    store.snapshot()?
                }
                None => PlayerConfig {
                    shuffle,
                    ..PlayerConfig::default()
                },
            };
            let order = TrackOrder::for_config(&settings, list.len(), seed);
            for position in 0..order.len() {
                if let Some(track) = order.at(position) {
                    println!("{:>4}  {}", position, list[track]);
                }
            }
        }
        Command::Wav { file } => {
            let reader = WavReader::open(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let header = reader.header();
            println!("format:      {:?}", reader.format());
            println!("channels:    {}", header.channels);
            println!("sample rate: {}", header.sample_rate);
            println!("frames/s:    {}", header.frames_per_second()?);
            println!("data bytes:  {}", header.data_size);
            println!("duration:    {:.2}s", header.duration()?.as_secs_f64());
        }
    }

    Ok(())
}
