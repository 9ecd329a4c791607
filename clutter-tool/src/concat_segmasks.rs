//! Merge per-instance binary masks into integer label maps.

use crate::common::*;
use clutter_dataset::mask::label_map_from_image;

/// The number of pixels covered by more than one instance in an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapRecord {
    pub image_index: usize,
    pub overlap_pixels: usize,
}

/// Merge the channel files of images `0..num_images`.
///
/// The label maps are written to the `modal_segmasks_project` directory.
/// If `report_file` is set, the overlap counts are saved there as CSV.
pub fn concat_segmasks(
    layout: &DatasetLayout,
    config: &ConcatConfig,
    report_file: Option<&Path>,
) -> Result<Vec<OverlapRecord>> {
    let ConcatConfig {
        num_images,
        max_channels,
        default_hw,
    } = *config;
    ensure!(
        max_channels <= u8::MAX as usize,
        "max_channels must not exceed {}, but found {}",
        u8::MAX,
        max_channels
    );

    let output_dir = layout.label_map_dir();
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create directory '{}'", output_dir.display()))?;

    info!("concatenating segmasks of {} images", num_images);
    let pb = progress_bar(num_images, "concatenating segmasks")?;

    let records: Vec<_> = (0..num_images)
        .map(|image_index| -> Result<_> {
            let (labels, overlap_pixels) =
                merge_channels(layout, image_index, max_channels, default_hw)?;
            save_label_map(&labels, layout.label_map_file(image_index))?;

            if overlap_pixels > 0 {
                debug!(
                    "image {} has {} overlapping pixels",
                    image_index, overlap_pixels
                );
            }
            pb.inc(1);

            Ok(OverlapRecord {
                image_index,
                overlap_pixels,
            })
        })
        .try_collect()?;
    pb.finish();

    let num_overlapped = records
        .iter()
        .filter(|record| record.overlap_pixels > 0)
        .count();
    info!(
        "{} out of {} images have overlapping instances",
        num_overlapped,
        records.len()
    );

    if let Some(report_file) = report_file {
        let mut writer = csv::Writer::from_path(report_file)
            .with_context(|| format!("failed to create report '{}'", report_file.display()))?;
        records
            .iter()
            .try_for_each(|record| writer.serialize(record))?;
        writer.flush()?;
        info!("overlap report saved to '{}'", report_file.display());
    }

    Ok(records)
}

/// Merge the channel files of one image.
///
/// Pixels of channel `j` are labeled `j + 1`, later channels overwrite
/// earlier ones. Missing channel files are skipped. Returns the label map
/// and the number of pixels covered by more than one channel.
pub fn merge_channels(
    layout: &DatasetLayout,
    image_index: usize,
    max_channels: usize,
    default_hw: [usize; 2],
) -> Result<(Array2<u8>, usize)> {
    let mut merged: Option<(Array2<u8>, Array2<u8>)> = None;

    for channel in 0..max_channels {
        let path = layout.segmask_channel_file(image_index, channel);
        if !path.is_file() {
            continue;
        }

        let image = image::open(&path)
            .with_context(|| format!("failed to decode segmask '{}'", path.display()))?;
        let mask = label_map_from_image(image)
            .with_context(|| format!("invalid segmask '{}'", path.display()))?;

        let (labels, coverage) = merged.get_or_insert_with(|| {
            let dim = mask.dim();
            (Array2::zeros(dim), Array2::zeros(dim))
        });
        ensure!(
            labels.dim() == mask.dim(),
            "segmask '{}' has shape {:?}, but previous channels have shape {:?}",
            path.display(),
            mask.dim(),
            labels.dim()
        );

        let label = channel as u8 + 1;
        Zip::from(labels)
            .and(coverage)
            .and(&mask)
            .for_each(|label_out, count, &value| {
                if value > 0 {
                    *label_out = label;
                    *count = count.saturating_add(1);
                }
            });
    }

    let output = match merged {
        Some((labels, coverage)) => {
            let overlap_pixels = coverage.iter().filter(|&&count| count > 1).count();
            (labels, overlap_pixels)
        }
        None => {
            warn!("no segmask channels found for image {}", image_index);
            let [h, w] = default_hw;
            (Array2::zeros((h, w)), 0)
        }
    };
    Ok(output)
}

fn save_label_map(labels: &Array2<u8>, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let (h, w) = labels.dim();
    let samples: Vec<u8> = labels.iter().cloned().collect();
    let image = GrayImage::from_raw(w as u32, h as u32, samples)
        .ok_or_else(|| format_err!("label map buffer does not match its size"))?;
    image
        .save(path)
        .with_context(|| format!("failed to write label map '{}'", path.display()))?;
    Ok(())
}
