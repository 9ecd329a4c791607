use anyhow::Result;
use clutter_dataset::{
    dataset::{FileDataset, RandomAccessDataset},
    ClutterDataset, DatasetConfig, DatasetLayout, Flip, Modality, Split,
};
use image::{GrayImage, Luma};
use ndarray::{arr1, s, Array2, Axis};
use ndarray_npy::write_npy;
use std::{fs, path::Path};

const HEIGHT: u32 = 24;
const WIDTH: u32 = 32;

/// Build a dataset directory with one depth image and one label map per id.
///
/// The depth image encodes the column index in its intensity. The label
/// map carries label 1 in a 10×10 block at the top-left corner.
fn build_dataset(base_dir: &Path, split: Split, fold: usize, ids: &[i64]) -> Result<()> {
    let layout = DatasetLayout::new(base_dir);

    let split_file = layout.split_file(fold, split.as_ref());
    fs::create_dir_all(split_file.parent().unwrap())?;
    write_npy(&split_file, &arr1(ids))?;

    fs::create_dir_all(layout.image_dir("depth"))?;
    fs::create_dir_all(layout.resized_dir("modal_segmasks_project"))?;

    for &id in ids {
        let id = id as usize;

        let image = GrayImage::from_fn(WIDTH, HEIGHT, |x, _y| Luma([x as u8 * 4]));
        image.save(layout.image_file("depth", id))?;

        let labels = GrayImage::from_fn(WIDTH, HEIGHT, |x, y| {
            if x < 10 && y < 10 {
                Luma([1])
            } else {
                Luma([0])
            }
        });
        labels.save(layout.resized_label_map_file(id))?;
    }

    Ok(())
}

fn block_mask() -> Array2<bool> {
    let mut expect = Array2::from_elem((HEIGHT as usize, WIDTH as usize), false);
    expect.slice_mut(s![0..10, 0..10]).fill(true);
    expect
}

#[test]
fn single_test_image_scenario() -> Result<()> {
    let dir = tempfile::tempdir()?;
    build_dataset(dir.path(), Split::Test, 0, &[7])?;

    let config = DatasetConfig::new(dir.path());
    let dataset = ClutterDataset::load(&config, Split::Test, Modality::Depth, 0)?;

    assert_eq!(dataset.num_records(), 1);
    let record = dataset.image_info(0).unwrap();
    assert_eq!(record.id, 7);
    assert_eq!(record.flip, Flip::Identity);

    let stack = dataset.load_mask(0)?;
    assert_eq!(stack.num_instances(), 1);
    assert_eq!(stack.class_ids, vec![1]);
    assert_eq!(stack.masks.index_axis(Axis(2), 0), block_mask());

    Ok(())
}

#[test]
fn image_and_mask_are_flipped_together() -> Result<()> {
    let dir = tempfile::tempdir()?;
    build_dataset(dir.path(), Split::Train, 2, &[3, 11])?;

    let config = DatasetConfig::new(dir.path());
    let dataset = ClutterDataset::load(&config, Split::Train, Modality::Depth, 2)?;
    assert_eq!(dataset.records().len(), 8);

    let block = block_mask();
    let last_col = WIDTH as usize - 1;

    for image_id in dataset.image_ids() {
        let flip = dataset.image_info(image_id).unwrap().flip;
        let record = dataset.nth(image_id)?;

        assert_eq!(record.image.dim(), (HEIGHT as usize, WIDTH as usize, 3));
        assert_eq!(record.masks.num_instances(), 1);

        // the flipped block mask is the original block mask flipped
        let expect = flip.apply(block.view().insert_axis(Axis(2)));
        assert_eq!(record.masks.masks, expect);

        // horizontal flips reverse the column gradient of the image
        let first_pixel = record.image[[0, 0, 0]];
        match flip {
            Flip::Identity | Flip::Vertical => assert_eq!(first_pixel, 0),
            Flip::Horizontal | Flip::Both => assert_eq!(first_pixel, last_col as u8 * 4),
        }
    }

    Ok(())
}

#[test]
fn missing_label_map_is_an_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    build_dataset(dir.path(), Split::Test, 0, &[1])?;
    fs::remove_file(DatasetLayout::new(dir.path()).resized_label_map_file(1))?;

    let config = DatasetConfig::new(dir.path());
    let dataset = ClutterDataset::load(&config, Split::Test, Modality::Depth, 0)?;

    assert!(dataset.load_image(0).is_ok());
    assert!(dataset.load_mask(0).is_err());
    Ok(())
}

#[test]
fn label_map_without_instances() -> Result<()> {
    let dir = tempfile::tempdir()?;
    build_dataset(dir.path(), Split::Test, 0, &[4])?;

    let layout = DatasetLayout::new(dir.path());
    GrayImage::new(WIDTH, HEIGHT).save(layout.resized_label_map_file(4))?;

    let config = DatasetConfig::new(dir.path());
    let dataset = ClutterDataset::load(&config, Split::Test, Modality::Depth, 0)?;
    let stack = dataset.load_mask(0)?;

    assert_eq!(stack.masks.dim(), (HEIGHT as usize, WIDTH as usize, 0));
    assert!(stack.class_ids.is_empty());
    Ok(())
}
