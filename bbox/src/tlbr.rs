use crate::{common::*, element::Element};

/// Axis-aligned bounding box in TLBR format.
///
/// `t`/`b` run along the image rows (y axis) and `l`/`r` along the columns
/// (x axis). The legacy array form of this box is `[x_min, y_min, x_max, y_max]`,
/// see [TLBR::xyxy].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TLBR<T> {
    pub(crate) t: T,
    pub(crate) l: T,
    pub(crate) b: T,
    pub(crate) r: T,
}

impl<T> TLBR<T>
where
    T: Element,
{
    pub fn try_from_tlbr(tlbr: [T; 4]) -> Result<Self> {
        let [t, l, b, r] = tlbr;
        ensure!(
            tlbr.iter().all(|val| val.is_finite()),
            "box coordinates must be finite"
        );
        ensure!(b >= t && r >= l, "b >= t and r >= l must hold");
        Ok(Self { t, l, b, r })
    }

    pub fn try_from_xyxy(xyxy: [T; 4]) -> Result<Self> {
        let [x_min, y_min, x_max, y_max] = xyxy;
        Self::try_from_tlbr([y_min, x_min, y_max, x_max])
    }

    /// The smallest box enclosing all points, given in `[x, y]` order.
    pub fn enclosing(points: &[[T; 2]; 4]) -> Self {
        let init = Self {
            t: T::infinity(),
            l: T::infinity(),
            b: T::neg_infinity(),
            r: T::neg_infinity(),
        };

        points.iter().fold(init, |rect, &[x, y]| Self {
            t: rect.t.min(y),
            l: rect.l.min(x),
            b: rect.b.max(y),
            r: rect.r.max(x),
        })
    }

    pub fn t(&self) -> T {
        self.t
    }

    pub fn l(&self) -> T {
        self.l
    }

    pub fn b(&self) -> T {
        self.b
    }

    pub fn r(&self) -> T {
        self.r
    }

    pub fn h(&self) -> T {
        self.b - self.t
    }

    pub fn w(&self) -> T {
        self.r - self.l
    }

    pub fn cy(&self) -> T {
        self.t + self.h() / T::lit(2.0)
    }

    pub fn cx(&self) -> T {
        self.l + self.w() / T::lit(2.0)
    }

    pub fn area(&self) -> T {
        self.h() * self.w()
    }

    pub fn tlbr(&self) -> [T; 4] {
        [self.t, self.l, self.b, self.r]
    }

    /// Coordinates in `[x_min, y_min, x_max, y_max]` order.
    pub fn xyxy(&self) -> [T; 4] {
        [self.l, self.t, self.r, self.b]
    }

    /// Corner points in `[x, y]` order: top-left, bottom-right, bottom-left, top-right.
    pub fn corners(&self) -> [[T; 2]; 4] {
        [
            [self.l, self.t],
            [self.r, self.b],
            [self.l, self.b],
            [self.r, self.t],
        ]
    }

    pub fn translate(&self, dx: T, dy: T) -> Self {
        Self {
            t: self.t + dy,
            l: self.l + dx,
            b: self.b + dy,
            r: self.r + dx,
        }
    }

    /// Multiplies every coordinate by `scale`.
    pub fn scale(&self, scale: T) -> Self {
        Self {
            t: self.t * scale,
            l: self.l * scale,
            b: self.b * scale,
            r: self.r * scale,
        }
    }

    /// Multiplies x coordinates by `sx` and y coordinates by `sy`.
    pub fn scale_xy(&self, sx: T, sy: T) -> Self {
        Self {
            t: self.t * sy,
            l: self.l * sx,
            b: self.b * sy,
            r: self.r * sx,
        }
    }

    /// Clamps x coordinates into `[0, width]` and y coordinates into `[0, height]`.
    pub fn clip(&self, width: T, height: T) -> Self {
        let zero = T::zero();
        Self {
            t: self.t.max(zero).min(height),
            l: self.l.max(zero).min(width),
            b: self.b.max(zero).min(height),
            r: self.r.max(zero).min(width),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn tlbr_from_xyxy() {
        let rect = TLBR::try_from_xyxy([1.0, 2.0, 5.0, 4.0]).unwrap();
        assert_eq!(rect.tlbr(), [2.0, 1.0, 4.0, 5.0]);
        assert_eq!(rect.xyxy(), [1.0, 2.0, 5.0, 4.0]);
        assert_abs_diff_eq!(rect.area(), 8.0);
        assert_abs_diff_eq!(rect.cx(), 3.0);
        assert_abs_diff_eq!(rect.cy(), 3.0);
    }

    #[test]
    fn tlbr_rejects_inverted() {
        assert!(TLBR::try_from_xyxy([5.0, 0.0, 1.0, 4.0]).is_err());
        assert!(TLBR::try_from_xyxy([0.0, f64::NAN, 1.0, 4.0]).is_err());
    }

    #[test]
    fn tlbr_clip_and_enclose() {
        let rect = TLBR::try_from_xyxy([-3.0, -1.0, 12.0, 5.0]).unwrap();
        assert_eq!(rect.clip(10.0, 4.0).xyxy(), [0.0, 0.0, 10.0, 4.0]);

        let enclosing = TLBR::enclosing(&[[1.0, 7.0], [-2.0, 3.0], [4.0, 0.0], [0.0, 1.0]]);
        assert_eq!(enclosing.xyxy(), [-2.0, 0.0, 4.0, 7.0]);
    }
}
