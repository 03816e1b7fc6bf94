//! The random affine transform on axis-aligned boxes.

use crate::{
    common::*,
    filter::{box_candidates, CandidateThresholds},
    image_ops::{check_image, warp_affine, Image},
};

pub const AFFINE_BORDER: [u8; 3] = [114, 114, 114];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RandomAffineInit {
    /// Maximum rotation in degrees.
    pub degrees: R64,
    /// Maximum translation as a ratio of the output size.
    pub translate: R64,
    /// Maximum deviation of the scale factor from 1.
    pub scale: R64,
    /// Maximum shear in degrees.
    pub shear: R64,
}

impl RandomAffineInit {
    pub fn build(self) -> Result<RandomAffine> {
        let Self {
            degrees,
            translate,
            scale,
            shear,
        } = self;

        ensure!(degrees >= 0.0, "degrees must be non-negative");
        ensure!(
            (0.0..=0.5).contains(&translate.raw()),
            "translate must be in range 0.0..=0.5"
        );
        ensure!(
            (0.0..1.0).contains(&scale.raw()),
            "scale must be in range 0.0..1.0"
        );
        ensure!(
            (0.0..90.0).contains(&shear.raw()),
            "shear must be in range 0.0..90.0"
        );

        Ok(RandomAffine {
            degrees: degrees.raw(),
            translate: translate.raw(),
            scale: scale.raw(),
            shear: shear.raw(),
            thresholds: CandidateThresholds::default(),
        })
    }
}

impl Default for RandomAffineInit {
    fn default() -> Self {
        Self {
            degrees: r64(10.0),
            translate: r64(0.1),
            scale: r64(0.1),
            shear: r64(10.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RandomAffine {
    degrees: f64,
    translate: f64,
    scale: f64,
    shear: f64,
    thresholds: CandidateThresholds,
}

impl RandomAffine {
    /// Draws a transform from an image of `image_hw` onto a canvas of `new_hw`.
    ///
    /// The image center moves to the origin, then the image is rotated and
    /// scaled, sheared, and finally translated to around the canvas center.
    /// Returns the transform with its scale factor.
    pub fn sample_transform<R>(
        &self,
        image_hw: (usize, usize),
        new_hw: (usize, usize),
        rng: &mut R,
    ) -> (Transform<f64>, f64)
    where
        R: Rng + ?Sized,
    {
        let Self {
            degrees,
            translate,
            scale,
            shear,
            ..
        } = *self;
        let (height, width) = image_hw;
        let (new_h, new_w) = new_hw;

        let center = Transform::translation(-(width as f64) / 2.0, -(height as f64) / 2.0);

        let angle = rng.gen_range(-degrees..=degrees);
        let ratio = rng.gen_range((1.0 - scale)..=(1.0 + scale));
        let rotation = Transform::rotation(angle, [0.0, 0.0], ratio);

        let shear_x = rng.gen_range(-shear..=shear);
        let shear_y = rng.gen_range(-shear..=shear);
        let shearing = Transform::shear(shear_x, shear_y);

        let tx = rng.gen_range((0.5 - translate)..=(0.5 + translate)) * new_w as f64;
        let ty = rng.gen_range((0.5 - translate)..=(0.5 + translate)) * new_h as f64;
        let translation = Transform::translation(tx, ty);

        let transform = center
            .then(&rotation)
            .then(&shearing)
            .then(&translation);
        (transform, ratio)
    }

    /// Warps the image onto a `new_hw` canvas and transforms the boxes.
    ///
    /// Boxes are replaced by the axis-aligned hull of their transformed
    /// corners, clipped to the canvas, and dropped when they fail the
    /// candidate rules.
    pub fn forward<C, R>(
        &self,
        image: &Image,
        labels: &[Label<TLBR<f64>, C>],
        new_hw: (usize, usize),
        rng: &mut R,
    ) -> Result<(Image, Vec<Label<TLBR<f64>, C>>)>
    where
        C: Copy,
        R: Rng + ?Sized,
    {
        let (height, width) = check_image(image)?;
        let (new_h, new_w) = new_hw;
        ensure!(new_h > 0 && new_w > 0, "output size must be positive");

        let (transform, ratio) = self.sample_transform((height, width), new_hw, rng);
        self.apply_transform(image, labels, new_hw, &transform, ratio)
    }

    /// Applies a given transform with its scale factor.
    pub fn apply_transform<C>(
        &self,
        image: &Image,
        labels: &[Label<TLBR<f64>, C>],
        new_hw: (usize, usize),
        transform: &Transform<f64>,
        ratio: f64,
    ) -> Result<(Image, Vec<Label<TLBR<f64>, C>>)>
    where
        C: Copy,
    {
        check_image(image)?;
        let (new_h, new_w) = new_hw;

        let new_image = if transform.is_identity() {
            image.clone()
        } else {
            warp_affine(image, transform, new_h, new_w, AFFINE_BORDER)?
        };

        let new_labels: Vec<_> = labels
            .iter()
            .filter_map(|label| {
                let new_label = transform * label;
                let new_label = Label::new(new_label.rect.clip(new_w as f64, new_h as f64), label.class);
                box_candidates(&label.rect.scale(ratio), &new_label.rect, &self.thresholds)
                    .then(|| new_label)
            })
            .collect();

        if new_labels.len() < labels.len() {
            debug!(
                "random affine dropped {} of {} boxes",
                labels.len() - new_labels.len(),
                labels.len()
            );
        }

        Ok((new_image, new_labels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_ops::full;
    use approx::assert_abs_diff_eq;

    fn zero_affine() -> RandomAffine {
        RandomAffineInit {
            degrees: r64(0.0),
            translate: r64(0.0),
            scale: r64(0.0),
            shear: r64(0.0),
        }
        .build()
        .unwrap()
    }

    fn hbb(xyxy: [f64; 4], class: usize) -> HbbLabel {
        Label::new(TLBR::try_from_xyxy(xyxy).unwrap(), class)
    }

    #[test]
    fn zero_ranges_give_identity() {
        let affine = zero_affine();
        let mut rng = StdRng::seed_from_u64(1);
        let (transform, ratio) = affine.sample_transform((40, 60), (40, 60), &mut rng);
        assert!(transform.is_identity());
        assert_eq!(ratio, 1.0);

        let image = Array3::from_shape_fn((40, 60, 3), |(row, col, _)| (row + col) as u8);
        let labels = vec![hbb([10.0, 10.0, 30.0, 20.0], 4)];
        let (out_image, out_labels) = affine
            .forward(&image, &labels, (40, 60), &mut rng)
            .unwrap();
        assert_eq!(out_image, image);
        assert_eq!(out_labels, labels);
    }

    #[test]
    fn recenters_on_new_canvas() {
        let affine = zero_affine();
        let mut rng = StdRng::seed_from_u64(2);
        let image = full(100, 100, [50, 50, 50]);
        let labels = vec![hbb([40.0, 40.0, 60.0, 60.0], 0)];
        let (out_image, out_labels) = affine.forward(&image, &labels, (50, 50), &mut rng).unwrap();

        assert_eq!(out_image.dim(), (50, 50, 3));
        let rect = &out_labels[0].rect;
        assert_abs_diff_eq!(rect.l(), 15.0, epsilon = 1e-9);
        assert_abs_diff_eq!(rect.t(), 15.0, epsilon = 1e-9);
        assert_abs_diff_eq!(rect.r(), 35.0, epsilon = 1e-9);
    }

    #[test]
    fn boxes_stay_in_canvas() {
        let affine = RandomAffineInit::default().build().unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let image = full(120, 160, [0, 0, 0]);
        let labels: Vec<_> = (0..8)
            .map(|idx| {
                let x = idx as f64 * 20.0;
                hbb([x, 10.0, x + 30.0, 110.0], idx)
            })
            .collect();

        for _ in 0..10 {
            let (out_image, out_labels) =
                affine.forward(&image, &labels, (96, 128), &mut rng).unwrap();
            assert_eq!(out_image.dim(), (96, 128, 3));
            assert!(out_labels.len() <= labels.len());
            for label in out_labels {
                let [x1, y1, x2, y2] = label.rect.xyxy();
                assert!(0.0 <= x1 && x2 <= 128.0);
                assert!(0.0 <= y1 && y2 <= 96.0);
                assert!(label.rect.w() > 2.0 && label.rect.h() > 2.0);
            }
        }
    }

    #[test]
    fn drops_boxes_outside_canvas() {
        let affine = zero_affine();
        let (transform, ratio) = (Transform::translation(-200.0, 0.0), 1.0);
        let image = full(50, 50, [0, 0, 0]);
        let labels = vec![hbb([0.0, 0.0, 20.0, 20.0], 0)];
        let (_, out) = affine
            .apply_transform(&image, &labels, (50, 50), &transform, ratio)
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn invalid_init() {
        let init = RandomAffineInit {
            scale: r64(1.5),
            ..Default::default()
        };
        assert!(init.build().is_err());
    }
}
