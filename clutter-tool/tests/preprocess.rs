use anyhow::Result;
use clutter_dataset::{
    config::{ConcatConfig, ResizeConfig},
    ClutterDataset, DatasetConfig, DatasetLayout, Modality, Split,
};
use clutter_tool::{concat_segmasks, inspect, resize_images, OverlapRecord};
use image::{GenericImageView, GrayImage, Luma};
use std::{fs, num::NonZeroUsize};

/// Run the whole preprocessing chain on a tiny dataset and load the result.
#[test]
fn concat_resize_and_load() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let layout = DatasetLayout::new(dir.path());

    // two instances in image 0, overlapping on one column
    {
        let channel_0 = GrayImage::from_fn(20, 10, |x, _| Luma([if x < 8 { 255 } else { 0 }]));
        let channel_1 = GrayImage::from_fn(20, 10, |x, _| Luma([if x >= 7 { 1 } else { 0 }]));
        let path = layout.segmask_channel_file(0, 0);
        fs::create_dir_all(path.parent().unwrap())?;
        channel_0.save(&path)?;
        channel_1.save(layout.segmask_channel_file(0, 1))?;
    }

    // depth image of the same size
    fs::create_dir_all(layout.image_dir("depth"))?;
    GrayImage::from_pixel(20, 10, Luma([100])).save(layout.image_file("depth", 0))?;

    // merge
    let report_file = dir.path().join("overlaps.csv");
    let concat = ConcatConfig {
        num_images: 1,
        max_channels: 21,
        default_hw: [10, 20],
    };
    let records = concat_segmasks(&layout, &concat, Some(&report_file))?;
    assert_eq!(
        records,
        vec![OverlapRecord {
            image_index: 0,
            overlap_pixels: 10
        }]
    );
    let report = fs::read_to_string(&report_file)?;
    assert_eq!(
        report.lines().collect::<Vec<_>>(),
        vec!["image_index,overlap_pixels", "0,10"]
    );

    // resize label maps and depth images
    let resize = ResizeConfig {
        target_size: NonZeroUsize::new(10).unwrap(),
        dirs: vec!["depth_ims".to_string(), "modal_segmasks_project".to_string()],
    };
    assert_eq!(resize_images(&layout, &resize)?, 2);
    let resized = image::open(layout.resized_label_map_file(0))?;
    assert_eq!(resized.dimensions(), (10, 10));

    // load through the adapter
    let split_file = layout.split_file(0, "test");
    fs::create_dir_all(split_file.parent().unwrap())?;
    ndarray_npy::write_npy(&split_file, &ndarray::arr1(&[0i64]))?;

    let config = DatasetConfig::new(dir.path());
    let dataset = ClutterDataset::load(&config, Split::Test, Modality::Depth, 0)?;
    let stack = dataset.load_mask(0)?;
    assert_eq!(stack.num_instances(), 2);
    assert_eq!(stack.class_ids, vec![1, 1]);

    // the depth images were not resized in place, so sizes differ
    let summary = inspect(&config, Split::Test, Modality::Depth, 0)?;
    assert_eq!(summary.num_records, 1);
    assert_eq!(summary.num_instances, 2);
    assert_eq!(summary.num_size_mismatches, 1);
    assert!((summary.mean_intensity - 100.0).abs() < 1e-9);
    // the crop keeps columns 5..15: two columns of label 1, eight of label 2
    assert_eq!(stack.areas(), vec![20, 80]);
    assert!((summary.mean_instance_area - 50.0).abs() < 1e-9);
    assert_eq!(summary.max_instance_area, 80);

    Ok(())
}
