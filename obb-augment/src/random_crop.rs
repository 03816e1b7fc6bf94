//! Random fixed-size crop with rotated overlap filtering.

use crate::{
    common::*,
    image_ops::{check_image, Image},
};

/// A rotated box that can follow a crop offset.
pub trait CropRect: RotatedRect<Type = f64> + Clone {
    fn shift(&self, dx: f64, dy: f64) -> Self;
}

impl CropRect for OrientedBox<f64> {
    fn shift(&self, dx: f64, dy: f64) -> Self {
        self.translate(dx, dy)
    }
}

impl CropRect for RadianBox<f64> {
    fn shift(&self, dx: f64, dy: f64) -> Self {
        self.translate(dx, dy)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RandomCropInit {
    /// Crop size in `(height, width)`.
    pub crop_hw: (usize, usize),
    /// Minimum fraction of a box that must remain inside the crop.
    pub iof_thr: R64,
    /// Keep the crop even if no box survives.
    pub allow_negative_crop: bool,
}

impl RandomCropInit {
    pub fn build(self) -> Result<RandomCrop> {
        let Self {
            crop_hw,
            iof_thr,
            allow_negative_crop,
        } = self;
        let (crop_h, crop_w) = crop_hw;
        ensure!(
            crop_h > 0 && crop_w > 0,
            "crop size must be positive, but get {:?}",
            crop_hw
        );
        ensure!(
            (0.0..=1.0).contains(&iof_thr.raw()),
            "iof_thr must be between 0.0 and 1.0"
        );

        Ok(RandomCrop {
            crop_h,
            crop_w,
            iof_thr: iof_thr.raw(),
            allow_negative_crop,
        })
    }
}

#[derive(Debug, Clone)]
pub struct RandomCrop {
    crop_h: usize,
    crop_w: usize,
    iof_thr: f64,
    allow_negative_crop: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CropOutput<B, C> {
    pub image: Image,
    pub labels: Vec<Label<B, C>>,
    /// The `(row, column)` of the crop origin in the input image.
    pub offset: (usize, usize),
}

impl RandomCrop {
    /// Crops at a uniformly drawn offset.
    ///
    /// Returns `None` when no box keeps enough of its area inside the crop
    /// and negative crops are not allowed.
    pub fn forward<B, C, R>(
        &self,
        image: &Image,
        labels: &[Label<B, C>],
        rng: &mut R,
    ) -> Result<Option<CropOutput<B, C>>>
    where
        B: CropRect,
        C: Clone,
        R: Rng + ?Sized,
    {
        let (height, width) = check_image(image)?;
        let margin_h = height.saturating_sub(self.crop_h);
        let margin_w = width.saturating_sub(self.crop_w);
        let offset = (rng.gen_range(0..=margin_h), rng.gen_range(0..=margin_w));
        self.crop_at(image, labels, offset)
    }

    /// Crops with its top-left corner at `offset`, given in `(row, column)`.
    pub fn crop_at<B, C>(
        &self,
        image: &Image,
        labels: &[Label<B, C>],
        offset: (usize, usize),
    ) -> Result<Option<CropOutput<B, C>>>
    where
        B: CropRect,
        C: Clone,
    {
        let (height, width) = check_image(image)?;
        let (offset_h, offset_w) = offset;
        ensure!(
            offset_h <= height.saturating_sub(self.crop_h)
                && offset_w <= width.saturating_sub(self.crop_w),
            "crop offset {:?} is out of range",
            offset
        );

        let y2 = (offset_h + self.crop_h).min(height);
        let x2 = (offset_w + self.crop_w).min(width);
        let cropped = image.slice(s![offset_h..y2, offset_w..x2, ..]).to_owned();
        let (crop_h, crop_w) = ((y2 - offset_h) as f64, (x2 - offset_w) as f64);
        let window = RadianBox::try_new(crop_w / 2.0, crop_h / 2.0, crop_w, crop_h, 0.0)?;

        let kept: Vec<_> = labels
            .iter()
            .map(|label| {
                Label::new(
                    label.rect.shift(-(offset_w as f64), -(offset_h as f64)),
                    label.class.clone(),
                )
            })
            .filter(|label| rotated_iof(&label.rect, &window) > self.iof_thr)
            .collect();

        if kept.is_empty() && !self.allow_negative_crop {
            debug!("no box survives the crop at {:?}", offset);
            return Ok(None);
        }

        Ok(Some(CropOutput {
            image: cropped,
            labels: kept,
            offset,
        }))
    }
}
