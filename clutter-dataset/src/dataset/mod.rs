//! Dataset loading toolkit.

mod clutter;
mod dataset_;
mod record;
mod utils;

pub use clutter::*;
pub use dataset_::*;
pub use record::*;
pub use utils::*;
