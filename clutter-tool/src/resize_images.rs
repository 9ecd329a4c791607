//! Rescale and center-crop images to squares.

use crate::common::*;

/// Resize the images in the configured directories.
///
/// Each directory `<dir>` under the base directory is written to the
/// sibling directory `<dir>_resized`. Returns the number of written
/// images.
pub fn resize_images(layout: &DatasetLayout, config: &ResizeConfig) -> Result<usize> {
    let target_size = config.target_size;

    let count = config.dirs.iter().try_fold(0, |count, dir| -> Result<_> {
        let src_dir = layout.base_dir().join(dir);
        let dst_dir = layout.resized_dir(dir);
        let num_images = resize_dir(&src_dir, &dst_dir, target_size)?;
        Ok(count + num_images)
    })?;

    Ok(count)
}

/// Resize all PNG images in `src_dir` and save them to `dst_dir`.
pub fn resize_dir(src_dir: &Path, dst_dir: &Path, target_size: NonZeroUsize) -> Result<usize> {
    ensure!(
        src_dir.is_dir(),
        "the image directory '{}' does not exist",
        src_dir.display()
    );
    fs::create_dir_all(dst_dir)
        .with_context(|| format!("failed to create directory '{}'", dst_dir.display()))?;

    let pattern = format!(
        "{}/*.png",
        glob::Pattern::escape(&src_dir.to_string_lossy())
    );
    let files: Vec<PathBuf> = glob::glob(&pattern)?.try_collect()?;
    info!(
        "resizing {} images from '{}' to '{}'",
        files.len(),
        src_dir.display(),
        dst_dir.display()
    );

    let pb = progress_bar(files.len(), "resizing images")?;

    files.iter().try_for_each(|src_file| -> Result<_> {
        let image = image::open(src_file)
            .with_context(|| format!("failed to decode image '{}'", src_file.display()))?;
        let resized = resize_and_crop(&image, target_size)?;

        let file_name = src_file
            .file_name()
            .ok_or_else(|| format_err!("invalid file path '{}'", src_file.display()))?;
        let dst_file = dst_dir.join(file_name);
        resized
            .save(&dst_file)
            .with_context(|| format!("failed to write image '{}'", dst_file.display()))?;

        pb.inc(1);
        Ok(())
    })?;
    pb.finish();

    Ok(files.len())
}

/// Rescale the image so that its shorter side equals `target_size`, and
/// crop the center square of `target_size`.
///
/// Nearest neighbor sampling is used so that label values are preserved.
/// The pixel format of the image is kept.
pub fn resize_and_crop(image: &DynamicImage, target_size: NonZeroUsize) -> Result<DynamicImage> {
    let (width, height) = image.dimensions();
    ensure!(width > 0 && height > 0, "cannot resize an empty image");
    let target = u32::try_from(target_size.get())?;

    let (resized_w, resized_h) = {
        let short = width.min(height) as u64;
        let scale = |side: u32| -> Result<u32> {
            let scaled = side as u64 * target as u64 / short;
            Ok(u32::try_from(scaled)?)
        };

        if width <= height {
            (target, scale(height)?)
        } else {
            (scale(width)?, target)
        }
    };
    debug_assert!(resized_w >= target && resized_h >= target);

    let resized = image.resize_exact(resized_w, resized_h, FilterType::Nearest);
    let left = (resized_w - target) / 2;
    let top = (resized_h - target) / 2;
    Ok(resized.crop_imm(left, top, target, target))
}
