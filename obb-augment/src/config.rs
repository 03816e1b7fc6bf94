//! Augmentation configuration format.

use crate::{
    color_jitter::{ColorJitter, ColorJitterInit},
    common::*,
    mosaic::{MosaicProcessor, MosaicProcessorInit},
    random_affine::{RandomAffine, RandomAffineInit},
    random_crop::{RandomCrop, RandomCropInit},
};

/// The data augmentation configuration.
///
/// Missing fields take the values of [AugmentConfig::default].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentConfig {
    /// Output size of the mosaic and affine stages.
    pub img_size: usize,
    pub hsv_h: R64,
    pub hsv_s: R64,
    pub hsv_v: R64,
    pub degrees: R64,
    pub translate: R64,
    pub scale: R64,
    pub shear: R64,
    /// Probability of a vertical flip.
    pub flipud: R64,
    /// Probability of a horizontal flip.
    pub fliplr: R64,
    /// Probability of a random quarter-turn rotation.
    pub rotate: R64,
    pub mosaic: R64,
    pub mixup: R64,
    pub mixup_mosaic: R64,
    /// Classes exempt from flips and rotation.
    pub rect_classes: Option<HashSet<usize>>,
    pub crop: Option<CropConfig>,
    pub min_bbox_size: R64,
    pub edge_ratio: R64,
}

/// Random crop options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropConfig {
    /// Crop size in `[height, width]`.
    pub size: (usize, usize),
    #[serde(default = "default_iof_thr")]
    pub iof_thr: R64,
    #[serde(default)]
    pub allow_negative_crop: bool,
}

fn default_iof_thr() -> R64 {
    r64(0.7)
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            img_size: 640,
            hsv_h: r64(0.0138),
            hsv_s: r64(0.664),
            hsv_v: r64(0.464),
            degrees: r64(0.0),
            translate: r64(0.0),
            scale: r64(0.0),
            shear: r64(0.0),
            flipud: r64(0.5),
            fliplr: r64(0.5),
            rotate: r64(0.5),
            mosaic: r64(0.0),
            mixup: r64(0.5),
            mixup_mosaic: r64(0.0),
            rect_classes: None,
            crop: None,
            min_bbox_size: r64(4.0),
            edge_ratio: r64(0.25),
        }
    }
}

impl AugmentConfig {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot open '{}'", path.display()))?;
        let config: Self = json5::from_str(&text)
            .with_context(|| format!("failed to parse '{}'", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every probability lies in `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        let probs = [
            ("flipud", self.flipud),
            ("fliplr", self.fliplr),
            ("rotate", self.rotate),
            ("mosaic", self.mosaic),
            ("mixup", self.mixup),
            ("mixup_mosaic", self.mixup_mosaic),
        ];
        for (name, prob) in probs {
            ensure!(
                (0.0..=1.0).contains(&prob.raw()),
                "{} must be a probability between 0.0 and 1.0, but get {}",
                name,
                prob
            );
        }
        ensure!(self.img_size > 0, "img_size must be positive");
        Ok(())
    }

    pub fn is_rect_class(&self, class: usize) -> bool {
        self.rect_classes
            .as_ref()
            .map(|classes| classes.contains(&class))
            .unwrap_or(false)
    }

    pub fn color_jitter(&self) -> Result<ColorJitter> {
        ColorJitterInit {
            hue_gain: self.hsv_h,
            saturation_gain: self.hsv_s,
            value_gain: self.hsv_v,
        }
        .build()
    }

    pub fn random_affine(&self) -> Result<RandomAffine> {
        RandomAffineInit {
            degrees: self.degrees,
            translate: self.translate,
            scale: self.scale,
            shear: self.shear,
        }
        .build()
    }

    pub fn mosaic_processor(&self) -> Result<MosaicProcessor> {
        MosaicProcessorInit {
            img_size: self.img_size,
            min_bbox_size: self.min_bbox_size,
            edge_ratio: self.edge_ratio,
        }
        .build()
    }

    pub fn random_crop(&self) -> Result<Option<RandomCrop>> {
        self.crop
            .as_ref()
            .map(|crop| {
                RandomCropInit {
                    crop_hw: crop.size,
                    iof_thr: crop.iof_thr,
                    allow_negative_crop: crop.allow_negative_crop,
                }
                .build()
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_partial_config() {
        let config: AugmentConfig = json5::from_str(
            r#"{
                // fields not given fall back to defaults
                img_size: 320,
                flipud: 0.0,
                rect_classes: [9, 11],
                crop: { size: [256, 256] },
            }"#,
        )
        .unwrap();
        config.validate().unwrap();

        assert_eq!(config.img_size, 320);
        assert_eq!(config.flipud, 0.0);
        assert_eq!(config.fliplr, 0.5);
        assert!(config.is_rect_class(11));
        assert!(!config.is_rect_class(10));

        let crop = config.crop.as_ref().unwrap();
        assert_eq!(crop.size, (256, 256));
        assert_eq!(crop.iof_thr, 0.7);
        assert!(!crop.allow_negative_crop);
        assert!(config.random_crop().unwrap().is_some());
    }

    #[test]
    fn reject_bad_probability() {
        let config = AugmentConfig {
            mixup: r64(1.5),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_builds() {
        let config = AugmentConfig::default();
        config.validate().unwrap();
        config.color_jitter().unwrap();
        config.random_affine().unwrap();
        config.mosaic_processor().unwrap();
        assert!(config.random_crop().unwrap().is_none());
    }
}
