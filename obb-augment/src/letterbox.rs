//! Aspect-preserving resize with constant padding.

use crate::{
    common::*,
    image_ops::{check_image, full, resize, Image},
};
use bbox::floor_mod;

/// How the padding of a letterboxed image is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaddingMode {
    /// Half of the total padding per axis, possibly fractional.
    Float,
    /// The integer left and top border sizes.
    Int,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LetterboxPadding {
    Float { dw: f64, dh: f64 },
    Int { left: usize, top: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Letterboxed {
    pub image: Image,
    /// The resize ratio applied to both axes.
    pub ratio: f64,
    pub padding: LetterboxPadding,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LetterboxInit {
    /// Target size in `(height, width)`.
    pub new_hw: (usize, usize),
    pub color: [u8; 3],
    /// Pad only up to the next multiple of `stride`.
    pub auto: bool,
    /// Allow enlarging images smaller than the target.
    pub scaleup: bool,
    pub stride: usize,
}

impl LetterboxInit {
    pub fn build(self) -> Result<Letterbox> {
        let Self {
            new_hw,
            color,
            auto,
            scaleup,
            stride,
        } = self;
        let (new_h, new_w) = new_hw;
        ensure!(new_h > 0 && new_w > 0, "new_hw must be positive");
        ensure!(stride > 0, "stride must be positive");

        Ok(Letterbox {
            new_hw,
            color,
            auto,
            scaleup,
            stride,
        })
    }
}

impl Default for LetterboxInit {
    fn default() -> Self {
        Self {
            new_hw: (640, 640),
            color: [114, 114, 114],
            auto: true,
            scaleup: true,
            stride: 32,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Letterbox {
    new_hw: (usize, usize),
    color: [u8; 3],
    auto: bool,
    scaleup: bool,
    stride: usize,
}

impl Letterbox {
    pub fn forward(&self, image: &Image, mode: PaddingMode) -> Result<Letterboxed> {
        let Self {
            new_hw: (new_h, new_w),
            color,
            auto,
            scaleup,
            stride,
        } = *self;
        let (height, width) = check_image(image)?;

        let ratio = {
            let ratio = (new_h as f64 / height as f64).min(new_w as f64 / width as f64);
            if scaleup {
                ratio
            } else {
                ratio.min(1.0)
            }
        };

        let unpad_w = ((width as f64 * ratio).round() as usize).max(1);
        let unpad_h = ((height as f64 * ratio).round() as usize).max(1);
        let (dw, dh) = {
            let dw = new_w as f64 - unpad_w as f64;
            let dh = new_h as f64 - unpad_h as f64;
            let (dw, dh) = if auto {
                (floor_mod(dw, stride as f64), floor_mod(dh, stride as f64))
            } else {
                (dw, dh)
            };
            (dw / 2.0, dh / 2.0)
        };

        let resized = resize(image, unpad_w, unpad_h)?;

        let border = |value: f64| value.round().max(0.0) as usize;
        let top = border(dh - 0.1);
        let bottom = border(dh + 0.1);
        let left = border(dw - 0.1);
        let right = border(dw + 0.1);

        let mut canvas = full(unpad_h + top + bottom, unpad_w + left + right, color);
        canvas
            .slice_mut(s![top..(top + unpad_h), left..(left + unpad_w), ..])
            .assign(&resized);

        let padding = match mode {
            PaddingMode::Float => LetterboxPadding::Float { dw, dh },
            PaddingMode::Int => LetterboxPadding::Int { left, top },
        };

        Ok(Letterboxed {
            image: canvas,
            ratio,
            padding,
        })
    }
}
