//! Common imports from external crates.

pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use image::{DynamicImage, GrayImage, Luma};
pub use indexmap::IndexSet;
pub use log::{debug, info, warn};
pub use ndarray::{s, Array2, Array3, ArrayView2, ArrayView3, Axis};
pub use noisy_float::prelude::*;
pub use serde::{Deserialize, Serialize};
pub use std::{
    fmt,
    fmt::Debug,
    num::NonZeroUsize,
    ops::Range,
    path::{Path, PathBuf},
    str::FromStr,
};
