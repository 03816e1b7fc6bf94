//! Mirror transforms for oriented and radian boxes.

use crate::{
    common::*,
    image_ops::{check_image, Image},
};

/// Flips the image upside down and mirrors the oriented boxes with it.
pub fn flip_vertical_obb<C>(
    image: &Image,
    labels: &[Label<OrientedBox<f64>, C>],
) -> Result<(Image, Vec<Label<OrientedBox<f64>, C>>)>
where
    C: Clone,
{
    let (height, _) = check_image(image)?;
    let flipped = image.slice(s![..;-1, .., ..]).to_owned();
    let height = height as f64;

    let labels = labels
        .iter()
        .map(|label| {
            let rect = &label.rect;
            Label::new(
                rect.with_center(rect.cx(), height - rect.cy())
                    .with_angle(180.0 - rect.angle()),
                label.class.clone(),
            )
        })
        .collect();

    Ok((flipped, labels))
}

/// Flips the image left to right and mirrors the oriented boxes with it.
pub fn flip_horizontal_obb<C>(
    image: &Image,
    labels: &[Label<OrientedBox<f64>, C>],
) -> Result<(Image, Vec<Label<OrientedBox<f64>, C>>)>
where
    C: Clone,
{
    let (_, width) = check_image(image)?;
    let flipped = image.slice(s![.., ..;-1, ..]).to_owned();
    let width = width as f64;

    let labels = labels
        .iter()
        .map(|label| {
            let rect = &label.rect;
            Label::new(
                rect.with_center(width - rect.cx(), rect.cy())
                    .with_angle(180.0 - rect.angle()),
                label.class.clone(),
            )
        })
        .collect();

    Ok((flipped, labels))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlipDirection {
    Horizontal,
    Vertical,
    Diagonal,
}

impl FlipDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
            Self::Diagonal => "diagonal",
        }
    }
}

impl FromStr for FlipDirection {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let direction = match text {
            "horizontal" => Self::Horizontal,
            "vertical" => Self::Vertical,
            "diagonal" => Self::Diagonal,
            _ => bail!(r#"Invalid flipping direction "{}""#, text),
        };
        Ok(direction)
    }
}

impl Display for FlipDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flips the image and radian boxes along `direction`.
///
/// Box centers are mirrored on pixel indices, `x' = W - x - 1`. Under the
/// `oc` convention the angle becomes `π/2 - a` with `w`/`h` swapped, except
/// for boxes at exactly `π/2`, which are left as they are. Other conventions
/// map the angle to `π - a` and normalize it.
///
/// Diagonal flips mirror both centers and leave angles and sides untouched.
pub fn flip_radian(
    image: &Image,
    boxes: &[RadianBox<f64>],
    direction: FlipDirection,
    version: AngleVersion,
) -> Result<(Image, Vec<RadianBox<f64>>)> {
    use std::f64::consts::{FRAC_PI_2, PI};

    let (height, width) = check_image(image)?;
    let (height, width) = (height as f64, width as f64);

    let (flipped_image, centered): (Image, Vec<_>) = match direction {
        FlipDirection::Horizontal => (
            image.slice(s![.., ..;-1, ..]).to_owned(),
            boxes
                .iter()
                .map(|rect| rect.with_center(width - rect.x() - 1.0, rect.y()))
                .collect(),
        ),
        FlipDirection::Vertical => (
            image.slice(s![..;-1, .., ..]).to_owned(),
            boxes
                .iter()
                .map(|rect| rect.with_center(rect.x(), height - rect.y() - 1.0))
                .collect(),
        ),
        FlipDirection::Diagonal => {
            // TODO: decide whether diagonal flips should also remap angles like the single-axis flips
            let flipped_image = image.slice(s![..;-1, ..;-1, ..]).to_owned();
            let flipped_boxes = boxes
                .iter()
                .map(|rect| rect.with_center(width - rect.x() - 1.0, height - rect.y() - 1.0))
                .collect();
            return Ok((flipped_image, flipped_boxes));
        }
    };

    let flipped_boxes = centered
        .into_iter()
        .map(|rect| match version {
            AngleVersion::Oc => {
                if rect.angle() != FRAC_PI_2 {
                    rect.swap_sides().with_angle(FRAC_PI_2 - rect.angle())
                } else {
                    rect
                }
            }
            AngleVersion::Le135 | AngleVersion::Le90 => {
                rect.with_angle(bbox::norm_angle(PI - rect.angle(), version))
            }
        })
        .collect();

    Ok((flipped_image, flipped_boxes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_ops::full;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_6};

    fn gradient(height: usize, width: usize) -> Image {
        Array3::from_shape_fn((height, width, 3), |(row, col, _)| (row * 16 + col) as u8)
    }

    fn obb(cx: f64, cy: f64, angle: f64) -> Label<OrientedBox<f64>, usize> {
        Label::new(OrientedBox::try_new(cx, cy, 30.0, 10.0, angle).unwrap(), 0)
    }

    #[test]
    fn vertical_flip() {
        let image = gradient(4, 5);
        let (flipped, labels) = flip_vertical_obb(&image, &[obb(10.0, 1.0, 30.0)]).unwrap();
        assert_eq!(flipped[[0, 2, 0]], image[[3, 2, 0]]);
        assert_eq!(labels[0].rect.cx(), 10.0);
        assert_eq!(labels[0].rect.cy(), 3.0);
        assert_eq!(labels[0].rect.angle(), 150.0);
    }

    #[test]
    fn horizontal_flip() {
        let image = full(100, 100, [0, 0, 0]);
        let (_, labels) =
            flip_horizontal_obb(&image, &[obb(10.0, 20.0, 30.0), obb(50.0, 50.0, 0.0)]).unwrap();
        assert_eq!(labels[0].rect.cx(), 90.0);
        assert_eq!(labels[0].rect.cy(), 20.0);
        assert_eq!(labels[0].rect.angle(), 150.0);
        // 180 folds back to 0
        assert_eq!(labels[1].rect.angle(), 0.0);
    }

    #[test]
    fn double_flip_is_identity() {
        let image = gradient(6, 7);
        let labels = vec![obb(12.5, 3.0, 47.0), obb(0.0, 6.0, 0.0)];
        let (once, once_labels) = flip_horizontal_obb(&image, &labels).unwrap();
        let (twice, twice_labels) = flip_horizontal_obb(&once, &once_labels).unwrap();
        assert_eq!(twice, image);
        for (lhs, rhs) in twice_labels.iter().zip(&labels) {
            assert_abs_diff_eq!(lhs.rect.cx(), rhs.rect.cx());
            assert_abs_diff_eq!(lhs.rect.angle(), rhs.rect.angle(), epsilon = 1e-9);
        }
    }

    #[test]
    fn empty_labels() {
        let image = gradient(3, 3);
        let (_, labels) = flip_vertical_obb::<usize>(&image, &[]).unwrap();
        assert!(labels.is_empty());
        let (_, boxes) =
            flip_radian(&image, &[], FlipDirection::Horizontal, AngleVersion::Oc).unwrap();
        assert!(boxes.is_empty());
    }

    #[test]
    fn parse_direction() {
        assert_eq!(
            "vertical".parse::<FlipDirection>().unwrap(),
            FlipDirection::Vertical
        );
        assert_eq!(FlipDirection::Diagonal.to_string(), "diagonal");
        assert!("sideways".parse::<FlipDirection>().is_err());
    }

    #[test]
    fn radian_horizontal_oc() {
        let image = full(100, 100, [0, 0, 0]);
        let boxes = vec![
            RadianBox::try_new(10.0, 20.0, 4.0, 8.0, FRAC_PI_6).unwrap(),
            RadianBox::try_new(10.0, 20.0, 4.0, 8.0, FRAC_PI_2).unwrap(),
        ];
        let (_, flipped) =
            flip_radian(&image, &boxes, FlipDirection::Horizontal, AngleVersion::Oc).unwrap();

        assert_eq!(flipped[0].x(), 89.0);
        assert_eq!(flipped[0].y(), 20.0);
        assert_eq!((flipped[0].w(), flipped[0].h()), (8.0, 4.0));
        assert_abs_diff_eq!(flipped[0].angle(), FRAC_PI_2 - FRAC_PI_6, epsilon = 1e-12);

        assert_eq!((flipped[1].w(), flipped[1].h()), (4.0, 8.0));
        assert_eq!(flipped[1].angle(), FRAC_PI_2);
    }

    #[test]
    fn radian_oc_double_flip_restores() {
        let image = gradient(10, 12);
        let boxes = vec![
            RadianBox::try_new(2.0, 3.0, 4.0, 8.0, 0.3).unwrap(),
            RadianBox::try_new(7.5, 1.0, 6.0, 2.0, 1.2).unwrap(),
            RadianBox::try_new(5.0, 5.0, 3.0, 9.0, FRAC_PI_2).unwrap(),
        ];

        for direction in [
            FlipDirection::Horizontal,
            FlipDirection::Vertical,
            FlipDirection::Diagonal,
        ] {
            let (once_image, once) =
                flip_radian(&image, &boxes, direction, AngleVersion::Oc).unwrap();
            let (twice_image, twice) =
                flip_radian(&once_image, &once, direction, AngleVersion::Oc).unwrap();

            assert_eq!(twice_image, image);
            for (lhs, rhs) in twice.iter().zip(&boxes) {
                assert_eq!((lhs.x(), lhs.y()), (rhs.x(), rhs.y()));
                assert_eq!((lhs.w(), lhs.h()), (rhs.w(), rhs.h()));
                assert_abs_diff_eq!(lhs.angle(), rhs.angle(), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn radian_vertical_le90() {
        let image = full(50, 80, [0, 0, 0]);
        let boxes = vec![RadianBox::try_new(10.0, 20.0, 4.0, 8.0, FRAC_PI_4).unwrap()];
        let (_, flipped) =
            flip_radian(&image, &boxes, FlipDirection::Vertical, AngleVersion::Le90).unwrap();
        assert_eq!(flipped[0].y(), 29.0);
        assert_abs_diff_eq!(flipped[0].angle(), -FRAC_PI_4, epsilon = 1e-12);
    }

    #[test]
    fn radian_diagonal_keeps_angle() {
        let image = gradient(10, 12);
        let boxes = vec![RadianBox::try_new(2.0, 3.0, 4.0, 8.0, 0.3).unwrap()];
        let (flipped_image, flipped) =
            flip_radian(&image, &boxes, FlipDirection::Diagonal, AngleVersion::Le135).unwrap();
        assert_eq!(flipped_image[[0, 0, 0]], image[[9, 11, 0]]);
        assert_eq!((flipped[0].x(), flipped[0].y()), (9.0, 6.0));
        assert_eq!(flipped[0].angle(), 0.3);
    }
}
