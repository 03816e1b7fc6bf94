//! Box filtering rules shared by the geometric transforms.

use crate::common::*;

const EPS: f64 = 1e-16;

/// Thresholds of [box_candidates].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateThresholds {
    /// Minimum width and height in pixels after the transform.
    pub wh_thr: f64,
    /// Maximum aspect ratio after the transform.
    pub ar_thr: f64,
    /// Minimum ratio of the area after to the area before.
    pub area_thr: f64,
}

impl Default for CandidateThresholds {
    fn default() -> Self {
        Self {
            wh_thr: 2.0,
            ar_thr: 20.0,
            area_thr: 0.1,
        }
    }
}

/// Decides whether a box survives an affine transform.
///
/// `before` is the box scaled by the transform's scale factor, `after` is the
/// transformed and clipped box.
pub fn box_candidates(
    before: &TLBR<f64>,
    after: &TLBR<f64>,
    thresholds: &CandidateThresholds,
) -> bool {
    let CandidateThresholds {
        wh_thr,
        ar_thr,
        area_thr,
    } = *thresholds;
    let (w1, h1) = (before.w(), before.h());
    let (w2, h2) = (after.w(), after.h());
    let aspect_ratio = (w2 / (h2 + EPS)).max(h2 / (w2 + EPS));

    w2 > wh_thr && h2 > wh_thr && w2 * h2 / (w1 * h1 + EPS) > area_thr && aspect_ratio < ar_thr
}

/// Pixel region on a canvas bounded by `x_min..x_max` and `y_min..y_max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Selects oriented boxes lying well inside `region`.
///
/// A box is kept when its center, and its center shifted by a fraction of the
/// side lengths, stay strictly inside the region, and both sides are longer
/// than `min_size`. The shift is `edge_ratio / 2` of the long side along x and
/// of the short side along y. Returns the indices of kept boxes in order.
pub fn filter_box_candidates(
    boxes: &[OrientedBox<f64>],
    region: &Region,
    min_size: f64,
    edge_ratio: f64,
) -> Vec<usize> {
    let Region {
        x_min,
        x_max,
        y_min,
        y_max,
    } = *region;
    let ratio = edge_ratio / 2.0;
    let inside_x = |x: f64| x_min < x && x < x_max;
    let inside_y = |y: f64| y_min < y && y < y_max;

    boxes
        .iter()
        .enumerate()
        .filter(|(_, rect)| {
            let dx = ratio * rect.long();
            let dy = ratio * rect.short();

            inside_x(rect.cx())
                && inside_x(rect.cx() - dx)
                && inside_x(rect.cx() + dx)
                && inside_y(rect.cy())
                && inside_y(rect.cy() - dy)
                && inside_y(rect.cy() + dy)
                && rect.long() > min_size
                && rect.short() > min_size
        })
        .map(|(index, _)| index)
        .collect()
}
