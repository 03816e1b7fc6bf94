//! Pixel-level helpers on HWC `u8` images.

use crate::common::*;
use image::imageops;
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};

/// A 3-channel image in `[height, width, channel]` layout.
///
/// The channel order is BGR, the order the HSV conversion assumes.
pub type Image = Array3<u8>;

pub const CHANNELS: usize = 3;

/// Checks the image layout and returns its `(height, width)`.
pub fn check_image(image: &Image) -> Result<(usize, usize)> {
    let (height, width, channels) = image.dim();
    ensure!(
        channels == CHANNELS,
        "image must have {} channels, but get {}",
        CHANNELS,
        channels
    );
    ensure!(height > 0 && width > 0, "image must not be empty");
    Ok((height, width))
}

/// Creates an image filled with a constant color.
pub fn full(height: usize, width: usize, color: [u8; 3]) -> Image {
    Array3::from_shape_fn((height, width, CHANNELS), |(_, _, channel)| color[channel])
}

/// Reverses the channel order, turning RGB into BGR and back.
pub fn swap_channels(image: &Image) -> Image {
    image.slice(s![.., .., ..;-1]).to_owned()
}

pub fn to_rgb_image(image: &Image) -> Result<RgbImage> {
    let (height, width) = check_image(image)?;
    let raw: Vec<u8> = image.iter().copied().collect();
    RgbImage::from_raw(width as u32, height as u32, raw)
        .ok_or_else(|| format_err!("image buffer does not match {}x{}", width, height))
}

pub fn from_rgb_image(image: RgbImage) -> Result<Image> {
    let (width, height) = image.dimensions();
    let array = Array3::from_shape_vec(
        (height as usize, width as usize, CHANNELS),
        image.into_raw(),
    )?;
    Ok(array)
}

/// Loads an image file into BGR channel order.
pub fn open_image<P>(path: P) -> Result<Image>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let rgb = image::open(path)
        .with_context(|| format!("failed to open image '{}'", path.display()))?
        .to_rgb8();
    Ok(swap_channels(&from_rgb_image(rgb)?))
}

/// Saves a BGR image. The format is guessed from the file extension.
pub fn save_image<P>(image: &Image, path: P) -> Result<()>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    to_rgb_image(&swap_channels(image))?
        .save(path)
        .with_context(|| format!("failed to save image '{}'", path.display()))?;
    Ok(())
}

/// Bilinear resize to `width` x `height`.
pub fn resize(image: &Image, width: usize, height: usize) -> Result<Image> {
    ensure!(width > 0 && height > 0, "target size must be positive");
    let (orig_h, orig_w) = check_image(image)?;
    if (orig_h, orig_w) == (height, width) {
        return Ok(image.clone());
    }

    let resized = imageops::resize(
        &to_rgb_image(image)?,
        width as u32,
        height as u32,
        FilterType::Triangle,
    );
    from_rgb_image(resized)
}

/// Warps the image by `transform` into a `height` x `width` canvas.
///
/// `transform` maps source pixel coordinates to output pixel coordinates.
/// Output pixels without a source pixel take the `border` color.
pub fn warp_affine(
    image: &Image,
    transform: &Transform<f64>,
    height: usize,
    width: usize,
    border: [u8; 3],
) -> Result<Image> {
    ensure!(width > 0 && height > 0, "target size must be positive");
    check_image(image)?;

    let matrix = transform.to_homogeneous().map(|val| val as f32);
    let projection = Projection::from_matrix(matrix)
        .ok_or_else(|| format_err!("the affine transformation is not invertible"))?;

    let src = to_rgb_image(image)?;
    let mut out = RgbImage::from_pixel(width as u32, height as u32, Rgb(border));
    warp_into(
        &src,
        &projection,
        Interpolation::Bilinear,
        Rgb(border),
        &mut out,
    );
    from_rgb_image(out)
}
