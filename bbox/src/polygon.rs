//! Overlap of rotated rectangles by convex polygon clipping.

use crate::{element::Element, oriented::OrientedBox, radian::RadianBox, tlbr::TLBR};

/// A rectangle that can be described by its four corners.
pub trait RotatedRect {
    type Type: Element;

    /// Corner points in `[x, y]` order, forming a closed ring.
    fn polygon(&self) -> [[Self::Type; 2]; 4];

    fn polygon_area(&self) -> Self::Type {
        polygon_area(&self.polygon())
    }
}

impl<T> RotatedRect for TLBR<T>
where
    T: Element,
{
    type Type = T;

    fn polygon(&self) -> [[T; 2]; 4] {
        [
            [self.l, self.t],
            [self.r, self.t],
            [self.r, self.b],
            [self.l, self.b],
        ]
    }
}

impl<T> RotatedRect for OrientedBox<T>
where
    T: Element,
{
    type Type = T;

    fn polygon(&self) -> [[T; 2]; 4] {
        self.corners()
    }
}

impl<T> RotatedRect for RadianBox<T>
where
    T: Element,
{
    type Type = T;

    fn polygon(&self) -> [[T; 2]; 4] {
        self.corners()
    }
}

fn cross<T>(origin: [T; 2], lhs: [T; 2], rhs: [T; 2]) -> T
where
    T: Element,
{
    (lhs[0] - origin[0]) * (rhs[1] - origin[1]) - (lhs[1] - origin[1]) * (rhs[0] - origin[0])
}

fn signed_area<T>(points: &[[T; 2]]) -> T
where
    T: Element,
{
    let n = points.len();
    let twice = (0..n).fold(T::zero(), |sum, idx| {
        let [x1, y1] = points[idx];
        let [x2, y2] = points[(idx + 1) % n];
        sum + (x1 * y2 - x2 * y1)
    });
    twice / T::lit(2.0)
}

/// Area of a simple polygon by the shoelace formula.
pub fn polygon_area<T>(points: &[[T; 2]]) -> T
where
    T: Element,
{
    if points.len() < 3 {
        return T::zero();
    }
    signed_area(points).abs()
}

/// Clips `subject` by the convex polygon `clip` (Sutherland–Hodgman).
///
/// Both polygons may be given in either winding order. A degenerate `clip`
/// polygon with zero area yields an empty result.
pub fn clip_convex_polygon<T>(subject: &[[T; 2]], clip: &[[T; 2]]) -> Vec<[T; 2]>
where
    T: Element,
{
    let orientation = signed_area(clip);
    if clip.len() < 3 || orientation == T::zero() || !orientation.is_finite() {
        return vec![];
    }
    let orientation = orientation.signum();

    let mut output: Vec<[T; 2]> = subject.to_vec();

    for idx in 0..clip.len() {
        if output.is_empty() {
            break;
        }

        let edge_from = clip[idx];
        let edge_to = clip[(idx + 1) % clip.len()];
        let side = |point: [T; 2]| cross(edge_from, edge_to, point) * orientation;

        let input = std::mem::take(&mut output);
        let n = input.len();

        for curr_idx in 0..n {
            let curr = input[curr_idx];
            let prev = input[(curr_idx + n - 1) % n];
            let curr_side = side(curr);
            let prev_side = side(prev);
            let curr_inside = curr_side >= T::zero();
            let prev_inside = prev_side >= T::zero();

            if curr_inside != prev_inside {
                let ratio = prev_side / (prev_side - curr_side);
                output.push([
                    prev[0] + (curr[0] - prev[0]) * ratio,
                    prev[1] + (curr[1] - prev[1]) * ratio,
                ]);
            }
            if curr_inside {
                output.push(curr);
            }
        }
    }

    output
}

/// Area of the overlap of two rotated rectangles.
pub fn intersection_area<A, B, T>(lhs: &A, rhs: &B) -> T
where
    A: RotatedRect<Type = T>,
    B: RotatedRect<Type = T>,
    T: Element,
{
    let clipped = clip_convex_polygon(&lhs.polygon(), &rhs.polygon());
    polygon_area(&clipped)
}

/// Rotated intersection over union.
///
/// Returns zero when the union area vanishes.
pub fn rotated_iou<A, B, T>(lhs: &A, rhs: &B) -> T
where
    A: RotatedRect<Type = T>,
    B: RotatedRect<Type = T>,
    T: Element,
{
    let inter = intersection_area(lhs, rhs);
    let union = lhs.polygon_area() + rhs.polygon_area() - inter;
    if union <= T::epsilon() {
        return T::zero();
    }
    inter / union
}

/// Rotated intersection over foreground, the overlap divided by the area of `foreground`.
///
/// Returns zero when the foreground area vanishes.
pub fn rotated_iof<A, B, T>(foreground: &A, other: &B) -> T
where
    A: RotatedRect<Type = T>,
    B: RotatedRect<Type = T>,
    T: Element,
{
    let area = foreground.polygon_area();
    if area <= T::epsilon() {
        return T::zero();
    }
    (intersection_area(foreground, other) / area).min(T::one())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn axis_aligned_overlap() {
        let lhs = RadianBox::try_new(2.0, 2.0, 4.0, 4.0, 0.0).unwrap();
        let rhs = RadianBox::try_new(4.0, 4.0, 4.0, 4.0, 0.0).unwrap();
        assert_abs_diff_eq!(intersection_area(&lhs, &rhs), 4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(rotated_iou(&lhs, &rhs), 4.0 / 28.0, epsilon = 1e-9);
        assert_abs_diff_eq!(rotated_iof(&lhs, &rhs), 0.25, epsilon = 1e-9);
    }

    #[test]
    fn rotated_square_inside_window() {
        let window = TLBR::try_from_xyxy([0.0, 0.0, 100.0, 100.0]).unwrap();
        let diamond = OrientedBox::try_new(50.0, 50.0, 10.0, 10.0, 45.0).unwrap();
        assert_abs_diff_eq!(rotated_iof(&diamond, &window), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn rotated_square_overlap() {
        // a square and itself rotated by 45 degrees overlap in a regular octagon
        let square = OrientedBox::try_new(0.0, 0.0, 2.0, 2.0, 0.0).unwrap();
        let diamond = square.with_angle(45.0);
        let octagon = 8.0 * (2.0_f64.sqrt() - 1.0);
        assert_abs_diff_eq!(intersection_area(&square, &diamond), octagon, epsilon = 1e-9);
    }

    #[test]
    fn disjoint_boxes() {
        let lhs = OrientedBox::try_new(0.0, 0.0, 2.0, 1.0, 30.0).unwrap();
        let rhs = OrientedBox::try_new(50.0, 50.0, 2.0, 1.0, 120.0).unwrap();
        assert_eq!(rotated_iou(&lhs, &rhs), 0.0);
        assert_eq!(rotated_iof(&lhs, &rhs), 0.0);
    }

    #[test]
    fn degenerate_boxes() {
        let window = TLBR::try_from_xyxy([0.0, 0.0, 10.0, 10.0]).unwrap();
        let line = OrientedBox::try_new(5.0, 5.0, 4.0, 0.0, 30.0).unwrap();
        let point = RadianBox::try_new(5.0, 5.0, 0.0, 0.0, 0.0).unwrap();
        let sliver = OrientedBox::try_new(5.0, 5.0, 4.0, 1e-9, 17.0).unwrap();

        assert_eq!(rotated_iof(&line, &window), 0.0);
        assert_eq!(rotated_iof(&point, &window), 0.0);
        assert_eq!(rotated_iou(&window, &line), 0.0);

        let iof: f64 = rotated_iof(&sliver, &window);
        assert!(iof.is_finite() && (0.0..=1.0).contains(&iof));
    }
}
