//! Instance mask decoding.

use crate::{common::*, flip::Flip};
use std::collections::{BTreeMap, BTreeSet};

/// The class id assigned to every instance channel.
pub const FOREGROUND_CLASS_ID: i32 = 1;

/// The per-image instance masks.
///
/// `masks` has shape height × width × instances, one boolean channel per
/// labeled instance. `class_ids` has one entry per channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskStack {
    pub masks: Array3<bool>,
    pub class_ids: Vec<i32>,
}

impl MaskStack {
    /// Build the mask stack from an integer-encoded label map.
    ///
    /// Each label in `1..=max_instances` present in the map gets one
    /// channel, in ascending label order. Absent labels produce no channel.
    pub fn from_label_map(labels: ArrayView2<'_, u16>, max_instances: usize) -> Self {
        let (height, width) = labels.dim();

        // map present labels to channel indexes in ascending order
        let channels: BTreeMap<usize, usize> = {
            let present: BTreeSet<usize> = labels
                .iter()
                .map(|&value| value as usize)
                .filter(|label| (1..=max_instances).contains(label))
                .collect();
            present
                .into_iter()
                .enumerate()
                .map(|(index, label)| (label, index))
                .collect()
        };

        let mut masks = Array3::from_elem((height, width, channels.len()), false);
        labels.indexed_iter().for_each(|((row, col), &value)| {
            if let Some(&index) = channels.get(&(value as usize)) {
                masks[[row, col, index]] = true;
            }
        });

        let class_ids = vec![FOREGROUND_CLASS_ID; channels.len()];
        Self { masks, class_ids }
    }

    pub fn num_instances(&self) -> usize {
        self.masks.len_of(Axis(2))
    }

    pub fn height(&self) -> usize {
        self.masks.len_of(Axis(0))
    }

    pub fn width(&self) -> usize {
        self.masks.len_of(Axis(1))
    }

    pub fn flip(&self, flip: Flip) -> Self {
        Self {
            masks: flip.apply(self.masks.view()),
            class_ids: self.class_ids.clone(),
        }
    }

    /// Count the pixels of each channel.
    pub fn areas(&self) -> Vec<usize> {
        self.masks
            .axis_iter(Axis(2))
            .map(|channel| channel.iter().filter(|&&on| on).count())
            .collect()
    }
}

/// Load a single channel label map.
///
/// Both 8-bit and 16-bit grayscale images are accepted, values are kept
/// as is.
pub fn load_label_map(path: impl AsRef<Path>) -> Result<Array2<u16>> {
    let path = path.as_ref();
    let image = image::open(path)
        .with_context(|| format!("failed to decode label map '{}'", path.display()))?;
    label_map_from_image(image)
        .with_context(|| format!("invalid label map '{}'", path.display()))
}

pub fn label_map_from_image(image: DynamicImage) -> Result<Array2<u16>> {
    let (width, height, samples): (u32, u32, Vec<u16>) = match image {
        DynamicImage::ImageLuma8(buf) => {
            let (w, h) = buf.dimensions();
            (w, h, buf.into_raw().into_iter().map(u16::from).collect())
        }
        DynamicImage::ImageLuma16(buf) => {
            let (w, h) = buf.dimensions();
            (w, h, buf.into_raw())
        }
        other => bail!(
            "expect a single channel 8-bit or 16-bit image, but found {:?}",
            other.color()
        ),
    };
    let labels = Array2::from_shape_vec((height as usize, width as usize), samples)?;
    Ok(labels)
}
