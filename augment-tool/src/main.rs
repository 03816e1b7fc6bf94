use anyhow::{Context, Result};
use clap::Parser;
use label::{LabelRow, ObbLabel};
use log::info;
use obb_augment::{
    image_ops::{open_image, save_image},
    AugmentConfig, AugmentPipeline, LetterboxInit, LetterboxPadding, PaddingMode,
};
use prettytable::{cell, row, Table};
use rand::prelude::*;
use std::{
    fs,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Parser)]
enum Opts {
    /// Print the augmentation settings.
    Info {
        /// configuration file
        config_file: PathBuf,
    },
    /// Augment one image and its oriented box labels.
    Augment {
        /// configuration file
        #[clap(long)]
        config_file: PathBuf,
        #[clap(long)]
        image: PathBuf,
        /// label file with rows of `class cx cy long short angle`
        #[clap(long)]
        labels: PathBuf,
        #[clap(long)]
        output_image: PathBuf,
        #[clap(long)]
        output_labels: PathBuf,
        #[clap(long)]
        seed: Option<u64>,
    },
    /// Resize an image to a square with constant padding.
    Letterbox {
        #[clap(long)]
        image: PathBuf,
        #[clap(long, default_value = "640")]
        size: usize,
        #[clap(long)]
        output_image: PathBuf,
    },
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    match Opts::parse() {
        Opts::Info { config_file } => {
            print_info(config_file)?;
        }
        Opts::Augment {
            config_file,
            image,
            labels,
            output_image,
            output_labels,
            seed,
        } => {
            augment(
                config_file,
                image,
                labels,
                output_image,
                output_labels,
                seed,
            )?;
        }
        Opts::Letterbox {
            image,
            size,
            output_image,
        } => {
            letterbox(image, size, output_image)?;
        }
    }

    Ok(())
}

fn print_info(config_file: impl AsRef<Path>) -> Result<()> {
    let config = AugmentConfig::open(config_file)?;

    let mut table = Table::new();
    table.add_row(row!["key", "value"]);
    table.add_row(row!["img_size", config.img_size]);
    table.add_row(row!["hsv_h", config.hsv_h]);
    table.add_row(row!["hsv_s", config.hsv_s]);
    table.add_row(row!["hsv_v", config.hsv_v]);
    table.add_row(row!["degrees", config.degrees]);
    table.add_row(row!["translate", config.translate]);
    table.add_row(row!["scale", config.scale]);
    table.add_row(row!["shear", config.shear]);
    table.add_row(row!["flipud", config.flipud]);
    table.add_row(row!["fliplr", config.fliplr]);
    table.add_row(row!["rotate", config.rotate]);
    table.add_row(row!["mosaic", config.mosaic]);
    table.add_row(row!["mixup", config.mixup]);
    table.add_row(row!["mixup_mosaic", config.mixup_mosaic]);
    table.add_row(row![
        "rect_classes",
        config
            .rect_classes
            .as_ref()
            .map(|classes| format!("{:?}", classes))
            .unwrap_or_else(|| "none".to_string())
    ]);
    table.add_row(row![
        "crop",
        config
            .crop
            .as_ref()
            .map(|crop| format!("{:?}", crop))
            .unwrap_or_else(|| "none".to_string())
    ]);
    table.printstd();

    Ok(())
}

fn augment(
    config_file: impl AsRef<Path>,
    image_file: impl AsRef<Path>,
    label_file: impl AsRef<Path>,
    output_image: impl AsRef<Path>,
    output_labels: impl AsRef<Path>,
    seed: Option<u64>,
) -> Result<()> {
    let config = AugmentConfig::open(config_file)?;
    let pipeline = AugmentPipeline::from_config(&config)?;
    let crop = config.random_crop()?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let image = open_image(image_file)?;
    let labels = load_labels(label_file)?;
    let num_input = labels.len();

    let (image, labels) = pipeline.apply_obb(image, labels, &mut rng)?;
    let (image, labels) = match crop {
        Some(crop) => match crop.forward(&image, &labels, &mut rng)? {
            Some(output) => (output.image, output.labels),
            None => {
                info!("no box survives cropping, keep the uncropped sample");
                (image, labels)
            }
        },
        None => (image, labels),
    };
    info!("{} of {} labels kept", labels.len(), num_input);

    save_image(&image, output_image)?;
    save_labels(&labels, output_labels)?;
    Ok(())
}

fn letterbox(image_file: impl AsRef<Path>, size: usize, output_image: impl AsRef<Path>) -> Result<()> {
    let letterbox = LetterboxInit {
        new_hw: (size, size),
        auto: false,
        ..Default::default()
    }
    .build()?;

    let image = open_image(image_file)?;
    let output = letterbox.forward(&image, PaddingMode::Int)?;
    if let LetterboxPadding::Int { left, top } = output.padding {
        info!("ratio {:.4}, left {}, top {}", output.ratio, left, top);
    }
    save_image(&output.image, output_image)?;
    Ok(())
}

fn load_labels(path: impl AsRef<Path>) -> Result<Vec<ObbLabel>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot open '{}'", path.display()))?;

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            let row: Vec<f64> = line
                .split_whitespace()
                .map(|token| token.parse())
                .collect::<Result<_, _>>()
                .with_context(|| format!("invalid number at line {}", index + 1))?;
            ObbLabel::try_from_row(&row)
                .with_context(|| format!("invalid label at line {}", index + 1))
        })
        .collect()
}

fn save_labels(labels: &[ObbLabel], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = fs::File::create(path)
        .with_context(|| format!("cannot create '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);

    for label in labels {
        let [cx, cy, long, short, angle] = label.rect.params();
        writeln!(
            writer,
            "{} {} {} {} {} {}",
            label.class, cx, cy, long, short, angle
        )?;
    }
    writer.flush()?;
    Ok(())
}
