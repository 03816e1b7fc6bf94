use anyhow::Result;
use bbox::{OrientedBox, TLBR};
use label::{HbbLabel, Label, ObbLabel};
use ndarray::Array3;
use obb_augment::{image_ops::full, AugmentConfig, AugmentPipeline};
use rand::prelude::*;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAMES: &[&str] = &["yolov6n-finetune-obb.json5", "hbb-mosaic.json5"];

lazy_static::lazy_static! {
    static ref CONFIG_DIR: PathBuf = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("cfg");
    static ref CONFIG_FILES: Vec<PathBuf> = {
        CONFIG_FILE_NAMES.iter().map(|file_name| CONFIG_DIR.join(file_name)).collect()
    };
}

fn obb_labels() -> Vec<ObbLabel> {
    vec![
        Label::new(OrientedBox::try_new(40.0, 30.0, 20.0, 8.0, 15.0).unwrap(), 0),
        Label::new(OrientedBox::try_new(100.0, 70.0, 16.0, 16.0, 170.0).unwrap(), 3),
    ]
}

#[test]
fn load_configs() -> Result<()> {
    CONFIG_FILES.iter().try_for_each(|path| -> Result<_> {
        let config = AugmentConfig::open(path)?;
        config.color_jitter()?;
        config.random_affine()?;
        config.mosaic_processor()?;
        config.random_crop()?;
        AugmentPipeline::from_config(&config)?;
        Ok(())
    })?;
    Ok(())
}

#[test]
fn obb_pipeline_keeps_labels_valid() -> Result<()> {
    let config = AugmentConfig::open(&CONFIG_FILES[0])?;
    assert_eq!(config, AugmentConfig::default());
    let pipeline = AugmentPipeline::from_config(&config)?;
    let mut rng = StdRng::seed_from_u64(2022);

    for _ in 0..16 {
        let image = full(96, 128, [30, 60, 90]);
        let (image, labels) = pipeline.apply_obb(image, obb_labels(), &mut rng)?;
        assert_eq!(image.dim(), (96, 128, 3));
        assert_eq!(labels.len(), 2);

        for (label, orig) in labels.iter().zip(obb_labels()) {
            assert_eq!(label.class, orig.class);
            assert_eq!(label.rect.long(), orig.rect.long());
            assert_eq!(label.rect.short(), orig.rect.short());
            assert!((0.0..180.0).contains(&label.rect.angle()));
            assert!((0.0..=128.0).contains(&label.rect.cx()));
            assert!((0.0..=96.0).contains(&label.rect.cy()));
        }
    }
    Ok(())
}

#[test]
fn same_seed_same_result() -> Result<()> {
    let config = AugmentConfig::open(&CONFIG_FILES[0])?;
    let pipeline = AugmentPipeline::from_config(&config)?;
    let image = Array3::from_shape_fn((64, 64, 3), |(row, col, ch)| (row * 3 + col + ch * 40) as u8);

    let run = |seed| -> Result<_> {
        let mut rng = StdRng::seed_from_u64(seed);
        pipeline.apply_obb(image.clone(), obb_labels(), &mut rng)
    };
    assert_eq!(run(7)?, run(7)?);
    Ok(())
}

#[test]
fn hbb_mosaic_from_config() -> Result<()> {
    let config = AugmentConfig::open(&CONFIG_FILES[1])?;
    assert!(config.is_rect_class(9));
    let mosaic = config.mosaic_processor()?;
    let affine = config.random_affine()?;
    let mut rng = StdRng::seed_from_u64(99);

    let input: Vec<(_, Vec<HbbLabel>)> = (0..4)
        .map(|index| {
            let labels = vec![Label::new(
                TLBR::try_from_xyxy([0.2, 0.2, 0.8, 0.8]).unwrap(),
                index,
            )];
            (full(100, 120, [index as u8 * 50; 3]), labels)
        })
        .collect();
    let (image, labels) = mosaic.forward_hbb(input, &affine, &mut rng)?;

    assert_eq!(image.dim(), (128, 128, 3));
    for label in labels {
        let [x1, y1, x2, y2] = label.rect.xyxy();
        assert!(0.0 <= x1 && x1 < x2 && x2 <= 128.0);
        assert!(0.0 <= y1 && y1 < y2 && y2 <= 128.0);
    }
    Ok(())
}
