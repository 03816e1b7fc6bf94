//! Random quarter-turn rotation of oriented boxes.

use crate::{
    common::*,
    image_ops::{check_image, warp_affine, Image},
};

pub const ROTATE_BORDER: [u8; 3] = [128, 128, 128];

/// Rotates by a uniformly drawn multiple of 90 degrees about the image center.
pub fn random_rotate_obb<C, R>(
    image: &Image,
    labels: &[Label<OrientedBox<f64>, C>],
    rng: &mut R,
) -> Result<(Image, Vec<Label<OrientedBox<f64>, C>>)>
where
    C: Clone,
    R: Rng + ?Sized,
{
    let quarter_turns = rng.gen_range(0..4);
    rotate_obb(image, labels, quarter_turns)
}

/// Rotates by `quarter_turns * 90` degrees counter-clockwise on screen.
///
/// The canvas keeps its size. Uncovered pixels take [ROTATE_BORDER]. Box
/// centers are transformed and clamped into the canvas, and `90 * quarter_turns`
/// is added to the angle before folding it into `[0, 180)`.
pub fn rotate_obb<C>(
    image: &Image,
    labels: &[Label<OrientedBox<f64>, C>],
    quarter_turns: usize,
) -> Result<(Image, Vec<Label<OrientedBox<f64>, C>>)>
where
    C: Clone,
{
    ensure!(
        quarter_turns < 4,
        "quarter_turns must be in range 0..4, but get {}",
        quarter_turns
    );
    let (height, width) = check_image(image)?;
    let degrees = 90.0 * quarter_turns as f64;
    debug!("rotate image by {} degrees", degrees);

    let transform = Transform::rotation(degrees, [width as f64 / 2.0, height as f64 / 2.0], 1.0);
    let rotated = warp_affine(image, &transform, height, width, ROTATE_BORDER)?;

    let labels = labels
        .iter()
        .map(|label| {
            let rect = &label.rect;
            let [cx, cy] = transform.apply([rect.cx(), rect.cy()]);
            let cx = cx.max(0.0).min(width as f64);
            let cy = cy.max(0.0).min(height as f64);

            // sides are kept; a quarter turn shifts the long-side angle by 90 modulo 180
            // TODO: swap long/short on odd turns instead if labels drop the long-side convention
            let rect = rect.with_center(cx, cy).with_angle(rect.angle() + degrees);
            Label::new(rect, label.class.clone())
        })
        .collect();

    Ok((rotated, labels))
}
