//! Common imports from external crates.

pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use clutter_dataset::{
    config::{ConcatConfig, ResizeConfig},
    dataset::{ClutterDataset, Modality, Split},
    layout::DatasetLayout,
};
pub use image::{imageops::FilterType, DynamicImage, GenericImageView, GrayImage};
pub use indicatif::{ProgressBar, ProgressStyle};
pub use itertools::Itertools as _;
pub use log::{debug, info, warn};
pub use ndarray::{Array2, Zip};
pub use serde::{Deserialize, Serialize};
pub use std::{
    fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

/// Build a progress bar in the style shared by all commands.
pub fn progress_bar(len: usize, message: &'static str) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    pb.set_message(message);
    Ok(pb)
}
