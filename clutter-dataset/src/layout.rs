//! Path conventions of the on-disk dataset.

use crate::common::*;

pub const SPLITS_DIR: &str = "splits";
pub const SEGMASK_CHANNELS_DIR: &str = "modal_segmasks";
pub const LABEL_MAP_DIR: &str = "modal_segmasks_project";
pub const RESIZED_SUFFIX: &str = "_resized";

/// Resolves the files of a dataset rooted at a base directory.
///
/// The layout is fixed:
///
/// ```text
/// <base>/splits/fold_<FF>/<split>_indices.npy
/// <base>/<modality>_ims/image_<IIIIII>.png
/// <base>/modal_segmasks/image_<IIIIII>_channel_<JJJ>.png
/// <base>/modal_segmasks_project/image_<IIIIII>.png
/// <base>/modal_segmasks_project_resized/image_<IIIIII>.png
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetLayout {
    base_dir: PathBuf,
}

impl DatasetLayout {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_owned(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn split_file(&self, fold: usize, split: &str) -> PathBuf {
        self.base_dir
            .join(SPLITS_DIR)
            .join(format!("fold_{:02}", fold))
            .join(format!("{}_indices.npy", split))
    }

    pub fn image_dir(&self, modality: &str) -> PathBuf {
        self.base_dir.join(format!("{}_ims", modality))
    }

    pub fn image_file(&self, modality: &str, id: usize) -> PathBuf {
        self.image_dir(modality).join(image_file_name(id))
    }

    /// The per-instance binary mask consumed by mask concatenation.
    pub fn segmask_channel_file(&self, id: usize, channel: usize) -> PathBuf {
        self.base_dir
            .join(SEGMASK_CHANNELS_DIR)
            .join(format!("image_{:06}_channel_{:03}.png", id, channel))
    }

    pub fn label_map_dir(&self) -> PathBuf {
        self.base_dir.join(LABEL_MAP_DIR)
    }

    /// The merged label map produced by mask concatenation.
    pub fn label_map_file(&self, id: usize) -> PathBuf {
        self.label_map_dir().join(image_file_name(id))
    }

    /// The resized label map consumed by the dataset adapter.
    pub fn resized_label_map_file(&self, id: usize) -> PathBuf {
        self.resized_dir(LABEL_MAP_DIR).join(image_file_name(id))
    }

    /// The sibling directory where resized copies of `dir` are stored.
    pub fn resized_dir(&self, dir: &str) -> PathBuf {
        self.base_dir.join(format!("{}{}", dir, RESIZED_SUFFIX))
    }
}

pub fn image_file_name(id: usize) -> String {
    format!("image_{:06}.png", id)
}
