use crate::{common::*, element::Element, tlbr::TLBR};

/// 2D affine transformation.
///
/// Stored as the upper two rows of a 3x3 homogeneous matrix acting on
/// column vectors `[x, y, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform<T> {
    pub(crate) rows: [[T; 3]; 2],
}

impl<T> Transform<T>
where
    T: Element,
{
    pub fn identity() -> Self {
        let (zero, one) = (T::zero(), T::one());
        Self {
            rows: [[one, zero, zero], [zero, one, zero]],
        }
    }

    pub fn translation(tx: T, ty: T) -> Self {
        let (zero, one) = (T::zero(), T::one());
        Self {
            rows: [[one, zero, tx], [zero, one, ty]],
        }
    }

    /// Rotation by `degrees` about `center` combined with isotropic scaling.
    ///
    /// Positive angles turn counter-clockwise as seen on screen (y pointing down),
    /// the same convention as OpenCV's `getRotationMatrix2D`.
    pub fn rotation(degrees: T, center: [T; 2], scale: T) -> Self {
        let [cx, cy] = center;
        let (sin, cos) = degrees.to_radians().sin_cos();
        let alpha = scale * cos;
        let beta = scale * sin;
        let one = T::one();

        Self {
            rows: [
                [alpha, beta, (one - alpha) * cx - beta * cy],
                [-beta, alpha, beta * cx + (one - alpha) * cy],
            ],
        }
    }

    /// Shear by `x_degrees` along the x axis and `y_degrees` along the y axis.
    pub fn shear(x_degrees: T, y_degrees: T) -> Self {
        let (zero, one) = (T::zero(), T::one());
        Self {
            rows: [
                [one, x_degrees.to_radians().tan(), zero],
                [y_degrees.to_radians().tan(), one, zero],
            ],
        }
    }

    /// Returns the transformation that applies `self` first and `next` second.
    pub fn then(&self, next: &Self) -> Self {
        next * self
    }

    pub fn apply(&self, point: [T; 2]) -> [T; 2] {
        let [x, y] = point;
        let [[a, b, c], [d, e, f]] = self.rows;
        [a * x + b * y + c, d * x + e * y + f]
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// The full 3x3 matrix in row-major order.
    pub fn to_homogeneous(&self) -> [T; 9] {
        let [[a, b, c], [d, e, f]] = self.rows;
        [a, b, c, d, e, f, T::zero(), T::zero(), T::one()]
    }

    /// The axis-aligned box enclosing the four transformed corners of `rect`.
    pub fn transform_tlbr(&self, rect: &TLBR<T>) -> TLBR<T> {
        let [p1, p2, p3, p4] = rect.corners();
        TLBR::enclosing(&[
            self.apply(p1),
            self.apply(p2),
            self.apply(p3),
            self.apply(p4),
        ])
    }
}

impl<T> Default for Transform<T>
where
    T: Element,
{
    fn default() -> Self {
        Self::identity()
    }
}

impl<T> Mul<&Transform<T>> for &Transform<T>
where
    T: Element,
{
    type Output = Transform<T>;

    fn mul(self, rhs: &Transform<T>) -> Self::Output {
        let [[a, b, c], [d, e, f]] = self.rows;
        let [[g, h, i], [j, k, l]] = rhs.rows;

        Transform {
            rows: [
                [a * g + b * j, a * h + b * k, a * i + b * l + c],
                [d * g + e * j, d * h + e * k, d * i + e * l + f],
            ],
        }
    }
}

impl<T> Mul<&TLBR<T>> for &Transform<T>
where
    T: Element,
{
    type Output = TLBR<T>;

    fn mul(self, rhs: &TLBR<T>) -> Self::Output {
        self.transform_tlbr(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rotation_about_center() {
        let rotate = Transform::rotation(90.0, [50.0, 50.0], 1.0);
        let [x, y] = rotate.apply([60.0, 50.0]);
        assert_abs_diff_eq!(x, 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(y, 40.0, epsilon = 1e-9);

        let [x, y] = rotate.apply([50.0, 50.0]);
        assert_abs_diff_eq!(x, 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(y, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn compose_order() {
        let scale = Transform::rotation(0.0, [0.0, 0.0], 2.0);
        let shift = Transform::translation(1.0, 0.0);
        assert_eq!(scale.then(&shift).apply([1.0, 1.0]), [3.0, 2.0]);
        assert_eq!(shift.then(&scale).apply([1.0, 1.0]), [4.0, 2.0]);
    }

    #[test]
    fn transform_rect_encloses_corners() {
        let rect = TLBR::try_from_xyxy([0.0, 0.0, 2.0, 2.0]).unwrap();
        let rotate = Transform::rotation(45.0, [1.0, 1.0], 1.0);
        let out = &rotate * &rect;
        let half_diag = 2.0_f64.sqrt();
        assert_abs_diff_eq!(out.l(), 1.0 - half_diag, epsilon = 1e-9);
        assert_abs_diff_eq!(out.r(), 1.0 + half_diag, epsilon = 1e-9);
        assert!(Transform::<f64>::identity().is_identity());
    }
}
