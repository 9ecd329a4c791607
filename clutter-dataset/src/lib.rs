//! Data loading toolkit for the clutter instance segmentation dataset.
//!
//! The crate maps the fixed on-disk layout of the dataset onto a random
//! access interface. A trainer enumerates the registered records of a
//! [ClutterDataset](dataset::ClutterDataset) and loads images and instance
//! masks per record.

mod common;
pub mod config;
pub mod dataset;
pub mod flip;
pub mod layout;
pub mod mask;

pub use config::{Config, DatasetConfig, ModelConfig, PreprocessConfig};
pub use dataset::{ClutterDataset, DataRecord, ImageRecord, Modality, Split};
pub use flip::Flip;
pub use layout::DatasetLayout;
pub use mask::MaskStack;
