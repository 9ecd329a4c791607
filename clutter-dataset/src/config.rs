//! Configuration format.

use crate::{common::*, layout::DatasetLayout};

pub use dataset::*;
pub use model::*;
pub use preprocess::*;

/// The main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub model: Option<ModelConfig>,
    #[serde(default)]
    pub preprocess: PreprocessConfig,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config: Self = json5::from_str(&text)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
        if let Some(model) = &config.model {
            model.validate()?;
        }
        Ok(config)
    }
}

mod dataset {
    use super::*;

    /// Dataset options.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct DatasetConfig {
        /// The root directory of the dataset.
        pub base_dir: PathBuf,
        /// The nominal image height recorded at registration.
        #[serde(default = "default_image_height")]
        pub image_height: usize,
        /// The nominal image width recorded at registration.
        #[serde(default = "default_image_width")]
        pub image_width: usize,
        /// The largest instance label decoded from label maps.
        #[serde(default = "default_max_instances")]
        pub max_instances: usize,
    }

    impl DatasetConfig {
        pub fn new(base_dir: impl AsRef<Path>) -> Self {
            Self {
                base_dir: base_dir.as_ref().to_owned(),
                image_height: default_image_height(),
                image_width: default_image_width(),
                max_instances: default_max_instances(),
            }
        }

        pub fn layout(&self) -> DatasetLayout {
            DatasetLayout::new(&self.base_dir)
        }
    }

    fn default_image_height() -> usize {
        256
    }

    fn default_image_width() -> usize {
        256
    }

    fn default_max_instances() -> usize {
        25
    }
}

mod model {
    use super::*;

    /// Overrides of the segmentation model hyperparameters.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct ModelConfig {
        pub name: String,
        pub gpu_count: NonZeroUsize,
        /// The number of images per GPU in a training batch.
        pub images_per_gpu: NonZeroUsize,
        /// The number of classes including background.
        pub num_classes: usize,
        pub image_min_dim: usize,
        pub image_max_dim: usize,
        /// Height, width and channels of the network input.
        pub image_shape: [usize; 3],
        /// Anchor side lengths in pixels.
        pub rpn_anchor_scales: Vec<usize>,
        /// The number of sampled ROIs per image during training.
        pub train_rois_per_image: usize,
        pub steps_per_epoch: usize,
        pub validation_steps: usize,
        /// Detections below this confidence are discarded.
        pub detection_min_confidence: R64,
        /// Per-channel mean pixel intensity.
        pub mean_pixel: [R64; 3],
    }

    impl ModelConfig {
        pub const NAME: &'static str = "clutter";
        pub const IMAGE_CHANNELS: usize = 3;

        /// Create the configuration with the mean pixel intensity.
        pub fn new(mean: R64) -> Self {
            let images_per_gpu = 2;
            let image_dim = 512;

            Self {
                name: Self::NAME.to_string(),
                gpu_count: NonZeroUsize::new(1).unwrap(),
                images_per_gpu: NonZeroUsize::new(images_per_gpu).unwrap(),
                num_classes: 1 + 1,
                image_min_dim: image_dim,
                image_max_dim: image_dim,
                image_shape: [image_dim, image_dim, Self::IMAGE_CHANNELS],
                rpn_anchor_scales: vec![8, 16, 32, 64, 128],
                train_rois_per_image: 32,
                steps_per_epoch: 10000 / images_per_gpu,
                validation_steps: 50,
                detection_min_confidence: r64(0.4),
                mean_pixel: [mean; 3],
            }
        }

        pub fn batch_size(&self) -> usize {
            self.gpu_count.get() * self.images_per_gpu.get()
        }

        pub fn validate(&self) -> Result<()> {
            let confidence = self.detection_min_confidence;
            ensure!(
                (0.0..=1.0).contains(&confidence.raw()),
                "detection_min_confidence must be within [0, 1], but found {}",
                confidence
            );
            ensure!(
                self.image_min_dim <= self.image_max_dim,
                "image_min_dim must not exceed image_max_dim"
            );
            ensure!(
                self.image_shape[2] == Self::IMAGE_CHANNELS,
                "expect {} image channels, but found {}",
                Self::IMAGE_CHANNELS,
                self.image_shape[2]
            );
            ensure!(
                self.num_classes >= 2,
                "num_classes must include background and foreground"
            );
            Ok(())
        }
    }
}

mod preprocess {
    use super::*;

    /// Preprocessing utility options.
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct PreprocessConfig {
        #[serde(default)]
        pub concat: ConcatConfig,
        #[serde(default)]
        pub resize: ResizeConfig,
    }

    /// Mask concatenation options.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ConcatConfig {
        /// Images with indexes `0..num_images` are processed.
        #[serde(default = "default_num_images")]
        pub num_images: usize,
        /// The maximum number of channel files per image.
        #[serde(default = "default_max_channels")]
        pub max_channels: usize,
        /// The label map size used when an image has no channel files.
        #[serde(default = "default_label_map_hw")]
        pub default_hw: [usize; 2],
    }

    impl Default for ConcatConfig {
        fn default() -> Self {
            Self {
                num_images: default_num_images(),
                max_channels: default_max_channels(),
                default_hw: default_label_map_hw(),
            }
        }
    }

    /// Image resizing options.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ResizeConfig {
        /// The side length of the square outcome images.
        #[serde(default = "default_target_size")]
        pub target_size: NonZeroUsize,
        /// Directories relative to the base directory to be resized.
        #[serde(default = "default_resize_dirs")]
        pub dirs: Vec<String>,
    }

    impl Default for ResizeConfig {
        fn default() -> Self {
            Self {
                target_size: default_target_size(),
                dirs: default_resize_dirs(),
            }
        }
    }

    fn default_num_images() -> usize {
        10000
    }

    fn default_max_channels() -> usize {
        21
    }

    fn default_label_map_hw() -> [usize; 2] {
        [150, 200]
    }

    fn default_target_size() -> NonZeroUsize {
        NonZeroUsize::new(512).unwrap()
    }

    fn default_resize_dirs() -> Vec<String> {
        vec!["depth_ims".to_string(), "modal_segmasks_project".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_config_overrides() {
        let config = ModelConfig::new(r64(93.5));
        assert_eq!(config.image_shape, [512, 512, 3]);
        assert_eq!(config.mean_pixel, [r64(93.5); 3]);
        assert_eq!(config.batch_size(), 2);
        assert_eq!(config.steps_per_epoch, 5000);
        assert_eq!(config.rpn_anchor_scales, vec![8, 16, 32, 64, 128]);
        assert_eq!(config.num_classes, 2);
        config.validate().unwrap();
    }

    #[test]
    fn reject_bad_confidence() {
        let mut config = ModelConfig::new(r64(0.0));
        config.detection_min_confidence = r64(1.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn parse_minimal_config() {
        let text = r#"{
            // only the base directory is required
            dataset: { base_dir: "/data/piles" },
        }"#;
        let config: Config = json5::from_str(text).unwrap();

        assert_eq!(config.dataset.base_dir, Path::new("/data/piles"));
        assert_eq!(config.dataset.max_instances, 25);
        assert_eq!(config.dataset.image_height, 256);
        assert!(config.model.is_none());
        assert_eq!(config.preprocess.concat.num_images, 10000);
        assert_eq!(config.preprocess.concat.max_channels, 21);
        assert_eq!(config.preprocess.resize.target_size.get(), 512);
        assert_eq!(
            config.preprocess.resize.dirs,
            vec!["depth_ims", "modal_segmasks_project"]
        );
    }

    #[test]
    fn parse_overrides() {
        let text = r#"{
            dataset: { base_dir: "/data/piles", max_instances: 10 },
            preprocess: {
                resize: { target_size: 256, dirs: ["gray_ims"] },
            },
        }"#;
        let config: Config = json5::from_str(text).unwrap();

        assert_eq!(config.dataset.max_instances, 10);
        assert_eq!(config.preprocess.resize.target_size.get(), 256);
        assert_eq!(config.preprocess.resize.dirs, vec!["gray_ims"]);
        assert_eq!(config.preprocess.concat.default_hw, [150, 200]);
    }
}
