//! Walk through a dataset split and collect statistics.

use crate::common::*;
use clutter_dataset::DatasetConfig;

/// Statistics of a dataset split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectSummary {
    pub num_records: usize,
    pub num_instances: usize,
    /// Records whose image and mask stack differ in size.
    pub num_size_mismatches: usize,
    /// The mean pixel intensity over all loaded images.
    pub mean_intensity: f64,
    /// The mean number of pixels per instance.
    pub mean_instance_area: f64,
    pub max_instance_area: usize,
}

/// Load every image and mask of a split.
///
/// The mean intensity is the value to build the model configuration with.
pub fn inspect(
    config: &DatasetConfig,
    split: Split,
    modality: Modality,
    fold: usize,
) -> Result<InspectSummary> {
    let dataset = ClutterDataset::load(config, split, modality, fold)?;
    let num_records = dataset.num_images();
    ensure!(
        num_records > 0,
        "the {} split of fold {} is empty",
        dataset.split(),
        fold
    );

    let pb = progress_bar(num_records, "inspecting images")?;

    let mut intensity_sum = 0u64;
    let mut num_pixels = 0u64;
    let mut num_instances = 0usize;
    let mut area_sum = 0usize;
    let mut max_instance_area = 0usize;
    let mut num_size_mismatches = 0;

    for image_id in dataset.image_ids() {
        let image = dataset.load_image(image_id)?;
        let masks = dataset.load_mask(image_id)?;

        let (height, width, _) = image.dim();
        if (height, width) != (masks.height(), masks.width()) {
            warn!(
                "'{}' has image size {}x{} but mask size {}x{}",
                dataset.image_reference(image_id)?,
                height,
                width,
                masks.height(),
                masks.width()
            );
            num_size_mismatches += 1;
        }

        intensity_sum += image.iter().map(|&value| value as u64).sum::<u64>();
        num_pixels += image.len() as u64;
        num_instances += masks.num_instances();
        masks.areas().into_iter().for_each(|area| {
            area_sum += area;
            max_instance_area = max_instance_area.max(area);
        });
        pb.inc(1);
    }
    pb.finish();

    let mean_intensity = if num_pixels > 0 {
        intensity_sum as f64 / num_pixels as f64
    } else {
        0.0
    };
    let mean_instance_area = if num_instances > 0 {
        area_sum as f64 / num_instances as f64
    } else {
        0.0
    };

    Ok(InspectSummary {
        num_records,
        num_instances,
        num_size_mismatches,
        mean_intensity,
        mean_instance_area,
        max_instance_area,
    })
}
