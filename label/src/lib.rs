//! Class-labeled boxes and their array row layouts.

use anyhow::{ensure, Result};
use bbox::{Element, OrientedBox, RadianBox, Transform, TLBR};
use ndarray::{Array2, ArrayView2};
use std::ops::Mul;

#[derive(Debug, Clone, PartialEq)]
pub struct Label<R, C> {
    pub rect: R,
    pub class: C,
}

/// Oriented label, row layout `[class, cx, cy, long_side, short_side, angle_degrees]`.
pub type ObbLabel = Label<OrientedBox<f64>, usize>;
/// Axis-aligned label, row layout `[class, x_min, y_min, x_max, y_max]`.
pub type HbbLabel = Label<TLBR<f64>, usize>;
/// Radian label, row layout `[class, x, y, w, h, angle_radians]`.
pub type RadianLabel = Label<RadianBox<f64>, usize>;

impl<R, C> Label<R, C> {
    pub fn new(rect: R, class: C) -> Self {
        Self { rect, class }
    }

    pub fn map_rect<S, F>(self, f: F) -> Label<S, C>
    where
        F: FnOnce(R) -> S,
    {
        Label {
            rect: f(self.rect),
            class: self.class,
        }
    }
}

impl<'a, T, C> Mul<&'a Label<TLBR<T>, C>> for &'a Transform<T>
where
    T: Element,
    C: Copy,
{
    type Output = Label<TLBR<T>, C>;

    fn mul(self, rhs: &'a Label<TLBR<T>, C>) -> Self::Output {
        Label {
            rect: self * &rhs.rect,
            class: rhs.class,
        }
    }
}

/// The column contract between a label type and its array row.
///
/// Column order is fixed per label type and cannot be inferred at runtime.
pub trait LabelRow: Sized {
    const NUM_COLUMNS: usize;

    fn to_row(&self) -> Vec<f64>;

    fn try_from_row(row: &[f64]) -> Result<Self>;
}

fn parse_class(value: f64) -> Result<usize> {
    ensure!(
        value.is_finite() && value >= 0.0 && value.fract() == 0.0,
        "class id must be a non-negative integer, but get {}",
        value
    );
    Ok(value as usize)
}

fn check_row_len(row: &[f64], expect: usize) -> Result<()> {
    ensure!(
        row.len() == expect,
        "expect {} columns per label row, but get {}",
        expect,
        row.len()
    );
    Ok(())
}

impl LabelRow for ObbLabel {
    const NUM_COLUMNS: usize = 6;

    fn to_row(&self) -> Vec<f64> {
        let [cx, cy, long, short, angle] = self.rect.params();
        vec![self.class as f64, cx, cy, long, short, angle]
    }

    fn try_from_row(row: &[f64]) -> Result<Self> {
        check_row_len(row, Self::NUM_COLUMNS)?;
        Ok(Self {
            class: parse_class(row[0])?,
            rect: OrientedBox::try_new(row[1], row[2], row[3], row[4], row[5])?,
        })
    }
}

impl LabelRow for HbbLabel {
    const NUM_COLUMNS: usize = 5;

    fn to_row(&self) -> Vec<f64> {
        let [x_min, y_min, x_max, y_max] = self.rect.xyxy();
        vec![self.class as f64, x_min, y_min, x_max, y_max]
    }

    fn try_from_row(row: &[f64]) -> Result<Self> {
        check_row_len(row, Self::NUM_COLUMNS)?;
        Ok(Self {
            class: parse_class(row[0])?,
            rect: TLBR::try_from_xyxy([row[1], row[2], row[3], row[4]])?,
        })
    }
}

impl LabelRow for RadianLabel {
    const NUM_COLUMNS: usize = 6;

    fn to_row(&self) -> Vec<f64> {
        let [x, y, w, h, angle] = self.rect.params();
        vec![self.class as f64, x, y, w, h, angle]
    }

    fn try_from_row(row: &[f64]) -> Result<Self> {
        check_row_len(row, Self::NUM_COLUMNS)?;
        Ok(Self {
            class: parse_class(row[0])?,
            rect: RadianBox::try_new(row[1], row[2], row[3], row[4], row[5])?,
        })
    }
}

/// Packs labels into a 2D array, one row per label.
pub fn labels_to_array<L>(labels: &[L]) -> Array2<f64>
where
    L: LabelRow,
{
    let rows: Vec<_> = labels.iter().map(L::to_row).collect();
    Array2::from_shape_fn((rows.len(), L::NUM_COLUMNS), |(row, col)| rows[row][col])
}

/// Unpacks a 2D label array. An array without rows yields no labels.
pub fn labels_from_array<L>(array: ArrayView2<'_, f64>) -> Result<Vec<L>>
where
    L: LabelRow,
{
    if array.nrows() == 0 {
        return Ok(vec![]);
    }
    ensure!(
        array.ncols() == L::NUM_COLUMNS,
        "expect {} columns, but get {}",
        L::NUM_COLUMNS,
        array.ncols()
    );

    array
        .outer_iter()
        .map(|row| L::try_from_row(&row.to_vec()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn obb_rows() {
        let labels: Vec<ObbLabel> = labels_from_array(
            array![[1.0, 10.0, 20.0, 8.0, 4.0, 30.0], [0.0, 5.0, 5.0, 2.0, 1.0, 180.0]].view(),
        )
        .unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].class, 1);
        assert_eq!(labels[1].rect.angle(), 0.0);

        let array = labels_to_array(&labels);
        assert_eq!(array.dim(), (2, 6));
        assert_eq!(array[[0, 5]], 30.0);
    }

    #[test]
    fn rejects_bad_rows() {
        assert!(ObbLabel::try_from_row(&[0.5, 1.0, 1.0, 1.0, 1.0, 0.0]).is_err());
        assert!(ObbLabel::try_from_row(&[0.0, 1.0, 1.0, 1.0, 1.0]).is_err());
        assert!(HbbLabel::try_from_row(&[0.0, 4.0, 0.0, 1.0, 1.0]).is_err());
    }

    #[test]
    fn empty_array() {
        let empty = Array2::<f64>::zeros((0, 0));
        let labels: Vec<HbbLabel> = labels_from_array(empty.view()).unwrap();
        assert!(labels.is_empty());
        assert_eq!(labels_to_array(&labels).dim(), (0, 5));
    }

    #[test]
    fn transform_label() {
        let label = HbbLabel::new(TLBR::try_from_xyxy([0.0, 0.0, 2.0, 4.0]).unwrap(), 3);
        let shift = Transform::translation(1.0, -1.0);
        let moved = &shift * &label;
        assert_eq!(moved.class, 3);
        assert_abs_diff_eq!(moved.rect.l(), 1.0);
        assert_abs_diff_eq!(moved.rect.t(), -1.0);
    }
}
