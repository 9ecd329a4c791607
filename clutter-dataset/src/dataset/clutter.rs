use super::*;
use crate::{
    common::*,
    config::DatasetConfig,
    layout::DatasetLayout,
    mask::{load_label_map, MaskStack},
};

/// The source tag of images and classes registered by [ClutterDataset].
pub const CLUTTER_SOURCE: &str = "clutter";
const CLUTTER_DEPTH: usize = 3;

/// The depth image dataset of object piles.
///
/// Records are registered once by [ClutterDataset::load] and stay
/// immutable. The position of a record is its image id.
#[derive(Debug, Clone)]
pub struct ClutterDataset {
    layout: DatasetLayout,
    max_instances: usize,
    split: Split,
    modality: Modality,
    fold: usize,
    class_info: Vec<ClassInfo>,
    classes: IndexSet<String>,
    records: Vec<ImageRecord>,
}

impl GenericDataset for ClutterDataset {
    fn input_channels(&self) -> usize {
        CLUTTER_DEPTH
    }

    fn classes(&self) -> &IndexSet<String> {
        &self.classes
    }
}

impl FileDataset for ClutterDataset {
    fn records(&self) -> &[ImageRecord] {
        &self.records
    }
}

impl RandomAccessDataset for ClutterDataset {
    fn num_records(&self) -> usize {
        self.records.len()
    }

    fn nth(&self, index: usize) -> Result<DataRecord> {
        let image = self.load_image(index)?;
        let masks = self.load_mask(index)?;
        ensure!(
            image.dim().0 == masks.height() && image.dim().1 == masks.width(),
            "image '{}' has size {}x{}, but its label map has size {}x{}",
            self.image_reference(index)?,
            image.dim().0,
            image.dim().1,
            masks.height(),
            masks.width()
        );
        Ok(DataRecord { image, masks })
    }
}

impl ClutterDataset {
    /// Register the images of a split in a cross validation fold.
    pub fn load(
        config: &DatasetConfig,
        split: Split,
        modality: Modality,
        fold: usize,
    ) -> Result<Self> {
        let DatasetConfig {
            image_height,
            image_width,
            max_instances,
            ..
        } = *config;
        let layout = config.layout();

        // load image identifiers
        let split_file = layout.split_file(fold, split.as_ref());
        let ids = load_indices_file(&split_file)?;
        info!(
            "loaded {} image ids from '{}'",
            ids.len(),
            split_file.display()
        );

        // register classes
        let class_info = vec![
            ClassInfo {
                source: "".to_string(),
                id: 0,
                name: "BG".to_string(),
            },
            ClassInfo {
                source: CLUTTER_SOURCE.to_string(),
                id: 1,
                name: "fg".to_string(),
            },
        ];
        let classes: IndexSet<String> =
            class_info.iter().map(|info| info.name.clone()).collect();

        // register images, one record per flip
        let flips = split.flips();
        let records: Vec<_> = ids
            .iter()
            .flat_map(|&id| {
                let path = layout.image_file(modality.as_ref(), id);
                flips.iter().map(move |&flip| ImageRecord {
                    id,
                    source: CLUTTER_SOURCE.to_string(),
                    path: path.clone(),
                    width: image_width,
                    height: image_height,
                    flip,
                })
            })
            .collect();
        debug!(
            "registered {} records for split {} of fold {}",
            records.len(),
            split,
            fold
        );

        Ok(Self {
            layout,
            max_instances,
            split,
            modality,
            fold,
            class_info,
            classes,
            records,
        })
    }

    pub fn split(&self) -> &Split {
        &self.split
    }

    pub fn modality(&self) -> Modality {
        self.modality
    }

    pub fn fold(&self) -> usize {
        self.fold
    }

    pub fn layout(&self) -> &DatasetLayout {
        &self.layout
    }

    pub fn num_images(&self) -> usize {
        self.records.len()
    }

    pub fn image_ids(&self) -> Range<usize> {
        0..self.records.len()
    }

    pub fn image_info(&self, image_id: usize) -> Option<&ImageRecord> {
        self.records.get(image_id)
    }

    pub fn class_info(&self) -> &[ClassInfo] {
        &self.class_info
    }

    /// The number of classes, background included.
    pub fn num_classes(&self) -> usize {
        self.class_info.len()
    }

    fn record(&self, image_id: usize) -> Result<&ImageRecord> {
        self.records.get(image_id).ok_or_else(|| {
            format_err!(
                "image id {} is out of range, the dataset has {} records",
                image_id,
                self.records.len()
            )
        })
    }

    /// Load the flipped height × width × 3 image of a record.
    pub fn load_image(&self, image_id: usize) -> Result<Array3<u8>> {
        let record = self.record(image_id)?;
        let image = load_color_image(&record.path)?;
        Ok(record.flip.apply(image.view()))
    }

    /// Load the flipped instance masks of a record.
    pub fn load_mask(&self, image_id: usize) -> Result<MaskStack> {
        let record = self.record(image_id)?;
        let path = self.layout.resized_label_map_file(record.id);
        let labels = load_label_map(&path)?;
        let stack = MaskStack::from_label_map(labels.view(), self.max_instances);
        Ok(stack.flip(record.flip))
    }

    /// A human readable reference to the source of a record.
    ///
    /// Records of other sources have an empty reference.
    pub fn image_reference(&self, image_id: usize) -> Result<String> {
        let record = self.record(image_id)?;
        let reference = if record.source == CLUTTER_SOURCE {
            format!("{}-{}", record.path.display(), record.flip)
        } else {
            String::new()
        };
        Ok(reference)
    }
}
