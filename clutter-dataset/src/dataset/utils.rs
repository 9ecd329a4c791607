use crate::common::*;
use ndarray::ArrayD;
use ndarray_npy::{read_npy, ReadNpyError, ReadableElement};

/// Load the list of image identifiers from a `.npy` file.
///
/// Signed and unsigned integer arrays of any dimension are accepted and
/// flattened in logical order.
pub fn load_indices_file(path: impl AsRef<Path>) -> Result<Vec<usize>> {
    let path = path.as_ref();

    macro_rules! try_read {
        ($ty:ty) => {
            match read_indices::<$ty>(path) {
                Err(ReadNpyError::WrongDescriptor(_)) => {}
                result => {
                    let array = result.with_context(|| {
                        format!("failed to read indices file '{}'", path.display())
                    })?;
                    return array
                        .iter()
                        .map(|&index| {
                            usize::try_from(index).map_err(|_| {
                                format_err!(
                                    "invalid index {} in '{}'",
                                    index,
                                    path.display()
                                )
                            })
                        })
                        .collect();
                }
            }
        };
    }

    try_read!(i64);
    try_read!(i32);
    try_read!(u64);
    try_read!(u32);
    try_read!(u16);
    try_read!(u8);

    bail!(
        "indices file '{}' does not contain an integer array",
        path.display()
    );
}

fn read_indices<T>(path: &Path) -> Result<ArrayD<T>, ReadNpyError>
where
    T: ReadableElement,
{
    read_npy::<_, ArrayD<T>>(path)
}

/// Load an image as a height × width × 3 array.
///
/// Single channel images are replicated to three channels.
pub fn load_color_image(path: impl AsRef<Path>) -> Result<Array3<u8>> {
    let path = path.as_ref();
    let image = image::open(path)
        .with_context(|| format!("failed to decode image '{}'", path.display()))?;
    let rgb = image.into_rgb8();
    let (width, height) = rgb.dimensions();
    let array = Array3::from_shape_vec((height as usize, width as usize, 3), rgb.into_raw())?;
    Ok(array)
}
