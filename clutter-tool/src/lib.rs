//! Maintenance routines of the clutter dataset.

mod common;
pub mod concat_segmasks;
pub mod inspect;
pub mod resize_images;

pub use concat_segmasks::{concat_segmasks, OverlapRecord};
pub use inspect::{inspect, InspectSummary};
pub use resize_images::{resize_and_crop, resize_images};
