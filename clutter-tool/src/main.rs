use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clutter_dataset::{Config, Modality, ModelConfig, Split};
use log::{info, LevelFilter};
use noisy_float::prelude::*;
use std::{env, path::PathBuf};

#[derive(Debug, Clone, Parser)]
/// Maintenance routines of the clutter dataset.
struct Opts {
    #[clap(long, default_value = "clutter.json5")]
    /// configuration file
    config_file: PathBuf,
    #[clap(long)]
    /// override the dataset base directory in the configuration
    base_dir: Option<PathBuf>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Merge per-instance segmasks into label maps.
    ConcatSegmasks {
        #[clap(long)]
        /// save overlap counts to this CSV file
        report_file: Option<PathBuf>,
    },
    /// Rescale and center-crop images to squares.
    ResizeImages,
    /// Load all images and masks of a split and report statistics.
    Inspect {
        #[clap(long, default_value = "test")]
        split: Split,
        #[clap(long, default_value = "depth")]
        modality: Modality,
        #[clap(long, default_value = "0")]
        fold: usize,
    },
    /// Print the model configuration built with a mean pixel intensity.
    ShowConfig {
        /// mean pixel intensity
        mean: f64,
    },
}

fn main() -> Result<()> {
    // setup logger
    {
        let mut builder = pretty_env_logger::formatted_builder();
        match env::var("RUST_LOG") {
            Ok(filters) => builder.parse_filters(&filters),
            Err(_) => builder.filter_level(LevelFilter::Info),
        };
        builder.init();
    }

    let Opts {
        config_file,
        base_dir,
        command,
    } = Opts::parse();

    let load_config = || -> Result<Config> {
        let mut config = Config::open(&config_file)?;
        if let Some(base_dir) = &base_dir {
            config.dataset.base_dir = base_dir.clone();
        }
        Ok(config)
    };

    match command {
        Command::ConcatSegmasks { report_file } => {
            let config = load_config()?;
            let layout = config.dataset.layout();
            clutter_tool::concat_segmasks(
                &layout,
                &config.preprocess.concat,
                report_file.as_deref(),
            )?;
        }
        Command::ResizeImages => {
            let config = load_config()?;
            let layout = config.dataset.layout();
            let count = clutter_tool::resize_images(&layout, &config.preprocess.resize)?;
            info!("resized {} images", count);
        }
        Command::Inspect {
            split,
            modality,
            fold,
        } => {
            let config = load_config()?;
            let summary = clutter_tool::inspect(&config.dataset, split, modality, fold)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::ShowConfig { mean } => {
            let mean = R64::try_new(mean).context("mean must be a finite number")?;
            let config = ModelConfig::new(mean);
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
