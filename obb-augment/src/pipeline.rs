//! Per-sample augmentation driven by [AugmentConfig].

use crate::{
    color_jitter::ColorJitter,
    common::*,
    config::AugmentConfig,
    flip::{flip_horizontal_obb, flip_vertical_obb},
    image_ops::Image,
    mixup::mixup,
    rotate::random_rotate_obb,
};

#[derive(Debug, Clone)]
pub struct AugmentPipeline {
    flipud: f64,
    fliplr: f64,
    rotate: f64,
    mixup: f64,
    rect_classes: HashSet<usize>,
    color_jitter: ColorJitter,
}

impl AugmentPipeline {
    pub fn from_config(config: &AugmentConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            flipud: config.flipud.raw(),
            fliplr: config.fliplr.raw(),
            rotate: config.rotate.raw(),
            mixup: config.mixup.raw(),
            rect_classes: config.rect_classes.clone().unwrap_or_default(),
            color_jitter: config.color_jitter()?,
        })
    }

    /// Applies random flips, rotation and HSV jitter to one sample.
    ///
    /// Flips and rotation are skipped when any label belongs to a rect class.
    pub fn apply_obb<R>(
        &self,
        image: Image,
        labels: Vec<ObbLabel>,
        rng: &mut R,
    ) -> Result<(Image, Vec<ObbLabel>)>
    where
        R: Rng + ?Sized,
    {
        let exempt = labels
            .iter()
            .any(|label| self.rect_classes.contains(&label.class));

        let (mut image, labels) = if exempt {
            debug!("skip geometric augmentation for rect classes");
            (image, labels)
        } else {
            let (image, labels) = if rng.gen_bool(self.flipud) {
                flip_vertical_obb(&image, &labels)?
            } else {
                (image, labels)
            };
            let (image, labels) = if rng.gen_bool(self.fliplr) {
                flip_horizontal_obb(&image, &labels)?
            } else {
                (image, labels)
            };
            if rng.gen_bool(self.rotate) {
                random_rotate_obb(&image, &labels, rng)?
            } else {
                (image, labels)
            }
        };

        self.color_jitter.forward(&mut image, rng)?;
        Ok((image, labels))
    }

    /// Blends two samples with MixUp at the configured probability.
    ///
    /// Returns the first sample untouched when MixUp is not drawn.
    pub fn maybe_mixup<R>(
        &self,
        first: (Image, Vec<ObbLabel>),
        second: (Image, Vec<ObbLabel>),
        rng: &mut R,
    ) -> Result<(Image, Vec<ObbLabel>)>
    where
        R: Rng + ?Sized,
    {
        if !rng.gen_bool(self.mixup) {
            return Ok(first);
        }
        let (image1, labels1) = first;
        let (image2, labels2) = second;
        mixup(&image1, labels1, &image2, labels2, rng)
    }
}
