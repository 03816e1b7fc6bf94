//! The random HSV color distortion algorithm.

use crate::{
    common::*,
    image_ops::{check_image, Image},
};

/// The exclusive upper bound of 8-bit hue values.
pub const HUE_RANGE: u8 = 180;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColorJitterInit {
    pub hue_gain: R64,
    pub saturation_gain: R64,
    pub value_gain: R64,
}

impl ColorJitterInit {
    pub fn build(self) -> Result<ColorJitter> {
        let Self {
            hue_gain,
            saturation_gain,
            value_gain,
        } = self;
        ensure!(
            (0.0..=1.0).contains(&hue_gain.raw())
                && (0.0..=1.0).contains(&saturation_gain.raw())
                && (0.0..=1.0).contains(&value_gain.raw()),
            "color gains must be between 0.0 and 1.0"
        );

        Ok(ColorJitter {
            gains: [hue_gain.raw(), saturation_gain.raw(), value_gain.raw()],
        })
    }
}

impl Default for ColorJitterInit {
    fn default() -> Self {
        Self {
            hue_gain: r64(0.5),
            saturation_gain: r64(0.5),
            value_gain: r64(0.5),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ColorJitter {
    gains: [f64; 3],
}

impl ColorJitter {
    /// Scales hue, saturation and value by factors drawn from `1 ± gain`.
    ///
    /// The image is left untouched and no random number is drawn when all
    /// gains are zero.
    pub fn forward<R>(&self, image: &mut Image, rng: &mut R) -> Result<()>
    where
        R: Rng + ?Sized,
    {
        if self.gains.iter().all(|&gain| gain == 0.0) {
            return Ok(());
        }

        let mut factors = [1.0; 3];
        for (factor, &gain) in factors.iter_mut().zip(&self.gains) {
            *factor += rng.gen_range(-1.0..1.0) * gain;
        }
        debug!("hsv factors {:?}", factors);

        apply_hsv_factors(image, factors)
    }
}

/// Multiplies the HSV channels of a BGR image by `factors` through lookup tables.
///
/// Hue wraps around modulo 180 while saturation and value saturate at 255.
pub fn apply_hsv_factors(image: &mut Image, factors: [f64; 3]) -> Result<()> {
    check_image(image)?;
    ensure!(
        factors.iter().all(|factor| factor.is_finite() && *factor >= 0.0),
        "hsv factors must be finite and non-negative, but get {:?}",
        factors
    );
    let [hue_factor, sat_factor, val_factor] = factors;

    let hue_lut: Vec<u8> = (0..=255)
        .map(|x| bbox::floor_mod(x as f64 * hue_factor, HUE_RANGE as f64) as u8)
        .collect();
    let sat_lut: Vec<u8> = (0..=255)
        .map(|x| (x as f64 * sat_factor).max(0.0).min(255.0) as u8)
        .collect();
    let val_lut: Vec<u8> = (0..=255)
        .map(|x| (x as f64 * val_factor).max(0.0).min(255.0) as u8)
        .collect();

    for mut pixel in image.lanes_mut(ndarray::Axis(2)) {
        let [hue, sat, val] = bgr_to_hsv([pixel[0], pixel[1], pixel[2]]);
        let hsv = [
            hue_lut[hue as usize],
            sat_lut[sat as usize],
            val_lut[val as usize],
        ];
        let [b, g, r] = hsv_to_bgr(hsv);
        pixel[0] = b;
        pixel[1] = g;
        pixel[2] = r;
    }

    Ok(())
}

/// Converts an 8-bit BGR pixel to HSV with hue in `[0, 180)`.
pub fn bgr_to_hsv(bgr: [u8; 3]) -> [u8; 3] {
    let [b, g, r] = bgr.map(|val| val as f64);
    let max = b.max(g).max(r);
    let min = b.min(g).min(r);
    let diff = max - min;

    let sat = if max == 0.0 { 0.0 } else { 255.0 * diff / max };
    let hue = if diff == 0.0 {
        0.0
    } else if max == r {
        30.0 * (g - b) / diff
    } else if max == g {
        30.0 * (b - r) / diff + 60.0
    } else {
        30.0 * (r - g) / diff + 120.0
    };
    let hue = hue.round();
    let hue = if hue < 0.0 { hue + 180.0 } else { hue };

    [hue as u8 % HUE_RANGE, sat.round() as u8, max as u8]
}

/// Converts an 8-bit HSV pixel with hue in `[0, 180)` back to BGR.
pub fn hsv_to_bgr(hsv: [u8; 3]) -> [u8; 3] {
    let [hue, sat, val] = hsv;
    let sector = (hue % HUE_RANGE) as f64 / 30.0;
    let sat = sat as f64 / 255.0;
    let val = val as f64;

    let index = sector.floor();
    let frac = sector - index;
    let p = val * (1.0 - sat);
    let q = val * (1.0 - sat * frac);
    let t = val * (1.0 - sat * (1.0 - frac));

    let (r, g, b) = match index as usize {
        0 => (val, t, p),
        1 => (q, val, p),
        2 => (p, val, t),
        3 => (p, q, val),
        4 => (t, p, val),
        _ => (val, p, q),
    };

    [b, g, r].map(|channel| channel.round().max(0.0).min(255.0) as u8)
}
