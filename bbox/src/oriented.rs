use crate::{
    common::*,
    element::{floor_mod, Element},
    radian::{AngleVersion, RadianBox},
    tlbr::TLBR,
};

/// Folds an angle in degrees into `[0, 180)`.
///
/// A rectangle rotated by 180° is the same rectangle, so 180 maps to 0.
pub fn normalize_angle_fold<T>(angle: T) -> T
where
    T: Element,
{
    let half_turn = T::lit(180.0);
    let folded = floor_mod(angle, half_turn);
    if folded >= half_turn {
        T::zero()
    } else {
        folded
    }
}

/// Oriented bounding box in `(cx, cy, long_side, short_side, angle)` form.
///
/// The angle is in degrees and always lies in `[0, 180)`. The long side runs
/// along the direction `(cos θ, sin θ)` in image coordinates (y pointing down).
/// `long >= short` is a labelling convention and is not enforced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBox<T> {
    pub(crate) cx: T,
    pub(crate) cy: T,
    pub(crate) long: T,
    pub(crate) short: T,
    pub(crate) angle: T,
}

impl<T> OrientedBox<T>
where
    T: Element,
{
    pub fn try_new(cx: T, cy: T, long: T, short: T, angle: T) -> Result<Self> {
        ensure!(
            [cx, cy, long, short, angle].iter().all(|val| val.is_finite()),
            "box parameters must be finite"
        );
        ensure!(
            long >= T::zero() && short >= T::zero(),
            "side lengths must be non-negative"
        );

        Ok(Self {
            cx,
            cy,
            long,
            short,
            angle: normalize_angle_fold(angle),
        })
    }

    pub fn cx(&self) -> T {
        self.cx
    }

    pub fn cy(&self) -> T {
        self.cy
    }

    pub fn long(&self) -> T {
        self.long
    }

    pub fn short(&self) -> T {
        self.short
    }

    /// Rotation angle in degrees, in `[0, 180)`.
    pub fn angle(&self) -> T {
        self.angle
    }

    pub fn area(&self) -> T {
        self.long * self.short
    }

    pub fn with_center(&self, cx: T, cy: T) -> Self {
        Self { cx, cy, ..*self }
    }

    /// Replaces the angle. The value is folded into `[0, 180)`.
    pub fn with_angle(&self, angle: T) -> Self {
        Self {
            angle: normalize_angle_fold(angle),
            ..*self
        }
    }

    pub fn translate(&self, dx: T, dy: T) -> Self {
        Self {
            cx: self.cx + dx,
            cy: self.cy + dy,
            ..*self
        }
    }

    /// Multiplies every length (center and sides) by `scale`.
    pub fn scale(&self, scale: T) -> Self {
        Self {
            cx: self.cx * scale,
            cy: self.cy * scale,
            long: self.long * scale,
            short: self.short * scale,
            angle: self.angle,
        }
    }

    /// Rescales a box given in ratio units. The center and the long side follow
    /// `sx` (image width), the short side follows `sy` (image height).
    pub fn scale_xy(&self, sx: T, sy: T) -> Self {
        Self {
            cx: self.cx * sx,
            cy: self.cy * sy,
            long: self.long * sx,
            short: self.short * sy,
            angle: self.angle,
        }
    }

    /// Corner points in `[x, y]` order, forming a closed ring.
    pub fn corners(&self) -> [[T; 2]; 4] {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        let two = T::lit(2.0);
        let half_long = self.long / two;
        let half_short = self.short / two;
        let (ux, uy) = (cos * half_long, sin * half_long);
        let (vx, vy) = (-sin * half_short, cos * half_short);
        let Self { cx, cy, .. } = *self;

        [
            [cx + ux + vx, cy + uy + vy],
            [cx - ux + vx, cy - uy + vy],
            [cx - ux - vx, cy - uy - vy],
            [cx + ux - vx, cy + uy - vy],
        ]
    }

    /// The smallest axis-aligned box enclosing this box.
    pub fn to_tlbr(&self) -> TLBR<T> {
        TLBR::enclosing(&self.corners())
    }

    /// Converts to the radian 5-tuple form regularized for `version`.
    pub fn to_radian(&self, version: AngleVersion) -> RadianBox<T> {
        RadianBox {
            x: self.cx,
            y: self.cy,
            w: self.long,
            h: self.short,
            angle: self.angle.to_radians(),
        }
        .regularize(version)
    }

    /// Parameters in `[cx, cy, long, short, angle]` order.
    pub fn params(&self) -> [T; 5] {
        [self.cx, self.cy, self.long, self.short, self.angle]
    }
}

impl<T> From<&TLBR<T>> for OrientedBox<T>
where
    T: Element,
{
    fn from(from: &TLBR<T>) -> Self {
        let (w, h) = (from.w(), from.h());
        let (long, short, angle) = if w >= h {
            (w, h, T::zero())
        } else {
            (h, w, T::lit(90.0))
        };

        Self {
            cx: from.cx(),
            cy: from.cy(),
            long,
            short,
            angle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn fold_range_and_idempotence() {
        for angle in [-270.0, -180.0, -0.5, 0.0, 45.0, 179.9, 180.0, 270.0, 359.0, 540.0] {
            let once = normalize_angle_fold(angle);
            assert!((0.0..180.0).contains(&once), "{} -> {}", angle, once);
            assert_eq!(normalize_angle_fold(once), once);
        }
        assert_eq!(normalize_angle_fold(180.0), 0.0);
        assert_eq!(normalize_angle_fold(90.0), 90.0);
    }

    #[test]
    fn new_folds_angle() {
        let obb = OrientedBox::try_new(10.0, 10.0, 8.0, 4.0, 180.0).unwrap();
        assert_eq!(obb.angle(), 0.0);
        assert!(OrientedBox::try_new(0.0, 0.0, -1.0, 4.0, 0.0).is_err());
    }

    #[test]
    fn corners_of_vertical_box() {
        let obb = OrientedBox::try_new(5.0, 5.0, 4.0, 2.0, 90.0).unwrap();
        let rect = obb.to_tlbr();
        assert_abs_diff_eq!(rect.w(), 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(rect.h(), 4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(rect.cx(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn from_tall_tlbr() {
        let rect = TLBR::try_from_xyxy([0.0, 0.0, 2.0, 6.0]).unwrap();
        let obb = OrientedBox::from(&rect);
        assert_eq!(obb.params(), [1.0, 3.0, 6.0, 2.0, 90.0]);
    }
}
