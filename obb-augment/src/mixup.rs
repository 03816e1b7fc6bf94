//! MixUp blending of two labeled images.

use crate::{common::*, image_ops::Image};
use rand_distr::Beta;

/// Both shape parameters of the Beta distribution the blend ratio is drawn from.
pub const MIXUP_ALPHA: f64 = 32.0;

/// Blends two images of the same size with a ratio drawn from `Beta(32, 32)`.
///
/// The labels of both images are concatenated, those of the first image first.
pub fn mixup<L, R>(
    image1: &Image,
    labels1: Vec<L>,
    image2: &Image,
    labels2: Vec<L>,
    rng: &mut R,
) -> Result<(Image, Vec<L>)>
where
    R: Rng + ?Sized,
{
    let beta = Beta::new(MIXUP_ALPHA, MIXUP_ALPHA).map_err(|err| format_err!("{:?}", err))?;
    let ratio = beta.sample(rng);
    mixup_with_ratio(image1, labels1, image2, labels2, ratio)
}

/// Blends `image1 * ratio + image2 * (1 - ratio)`, rounding to the nearest value.
pub fn mixup_with_ratio<L>(
    image1: &Image,
    mut labels1: Vec<L>,
    image2: &Image,
    labels2: Vec<L>,
    ratio: f64,
) -> Result<(Image, Vec<L>)> {
    ensure!(
        (0.0..=1.0).contains(&ratio),
        "mixup ratio must be between 0.0 and 1.0, but get {}",
        ratio
    );
    ensure!(
        image1.dim() == image2.dim(),
        "images must have identical shape, but get {:?} and {:?}",
        image1.dim(),
        image2.dim()
    );

    let image = Zip::from(image1).and(image2).map_collect(|&lhs, &rhs| {
        let value = lhs as f64 * ratio + rhs as f64 * (1.0 - ratio);
        value.round().max(0.0).min(255.0) as u8
    });
    labels1.extend(labels2);

    Ok((image, labels1))
}
