//! The Mosaic mixing algorithm.

use crate::{
    common::*,
    filter::{filter_box_candidates, Region},
    image_ops::{check_image, full, resize, Image},
    random_affine::RandomAffine,
};

pub const MOSAIC_BORDER: [u8; 3] = [114, 114, 114];

/// Mosaic processor initializer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MosaicProcessorInit {
    /// The output size. The intermediate canvas is twice as large.
    pub img_size: usize,
    /// Oriented boxes with a side not longer than this are dropped.
    pub min_bbox_size: R64,
    /// Fraction of the box sides that must stay inside its tile.
    pub edge_ratio: R64,
}

impl MosaicProcessorInit {
    pub fn build(self) -> Result<MosaicProcessor> {
        let Self {
            img_size,
            min_bbox_size,
            edge_ratio,
        } = self;
        ensure!(img_size > 0, "img_size must be positive");
        ensure!(min_bbox_size >= 0.0, "min_bbox_size must be non-negative");
        ensure!(
            (0.0..=1.0).contains(&edge_ratio.raw()),
            "edge_ratio must be between 0.0 and 1.0"
        );

        Ok(MosaicProcessor {
            img_size,
            min_bbox_size: min_bbox_size.raw(),
            edge_ratio: edge_ratio.raw(),
        })
    }
}

impl Default for MosaicProcessorInit {
    fn default() -> Self {
        Self {
            img_size: 640,
            min_bbox_size: r64(4.0),
            edge_ratio: r64(0.25),
        }
    }
}

/// Where a tile lands on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TilePlacement {
    /// Canvas region in `[x1, y1, x2, y2]`.
    dst: [usize; 4],
    /// Tile region in `[x1, y1, x2, y2]`.
    src: [usize; 4],
}

impl TilePlacement {
    /// Places the `index`-th tile of size `(height, width)` around the pivot.
    ///
    /// Tiles are ordered top-left, top-right, bottom-left and bottom-right, each
    /// touching the pivot with one corner.
    fn new(index: usize, pivot: (usize, usize), canvas_size: usize, tile_hw: (usize, usize)) -> Self {
        let (xc, yc) = pivot;
        let (h, w) = tile_hw;
        let s2 = canvas_size;

        match index {
            0 => {
                let [x1a, y1a, x2a, y2a] = [xc.saturating_sub(w), yc.saturating_sub(h), xc, yc];
                Self {
                    dst: [x1a, y1a, x2a, y2a],
                    src: [w - (x2a - x1a), h - (y2a - y1a), w, h],
                }
            }
            1 => {
                let [x1a, y1a, x2a, y2a] = [xc, yc.saturating_sub(h), (xc + w).min(s2), yc];
                Self {
                    dst: [x1a, y1a, x2a, y2a],
                    src: [0, h - (y2a - y1a), w.min(x2a - x1a), h],
                }
            }
            2 => {
                let [x1a, y1a, x2a, y2a] = [xc.saturating_sub(w), yc, xc, (yc + h).min(s2)];
                Self {
                    dst: [x1a, y1a, x2a, y2a],
                    src: [w - (x2a - x1a), 0, w, (y2a - y1a).min(h)],
                }
            }
            _ => {
                let [x1a, y1a, x2a, y2a] = [xc, yc, (xc + w).min(s2), (yc + h).min(s2)];
                Self {
                    dst: [x1a, y1a, x2a, y2a],
                    src: [0, 0, w.min(x2a - x1a), (y2a - y1a).min(h)],
                }
            }
        }
    }

    /// Offset from tile pixel coordinates to canvas pixel coordinates.
    fn pad(&self) -> (f64, f64) {
        let [x1a, y1a, ..] = self.dst;
        let [x1b, y1b, ..] = self.src;
        (x1a as f64 - x1b as f64, y1a as f64 - y1b as f64)
    }

    fn region(&self) -> Region {
        let [x1a, y1a, x2a, y2a] = self.dst;
        Region {
            x_min: x1a as f64,
            x_max: x2a as f64,
            y_min: y1a as f64,
            y_max: y2a as f64,
        }
    }

    fn paste(&self, canvas: &mut Image, tile: &Image) {
        let [x1a, y1a, x2a, y2a] = self.dst;
        let [x1b, y1b, x2b, y2b] = self.src;
        canvas
            .slice_mut(s![y1a..y2a, x1a..x2a, ..])
            .assign(&tile.slice(s![y1b..y2b, x1b..x2b, ..]));
    }
}

/// Mosaic processor.
#[derive(Debug, Clone)]
pub struct MosaicProcessor {
    img_size: usize,
    min_bbox_size: f64,
    edge_ratio: f64,
}

impl MosaicProcessor {
    pub fn img_size(&self) -> usize {
        self.img_size
    }

    /// Combines 4 images with oriented boxes into an `img_size` square.
    ///
    /// Input boxes are in ratio units of their own image. Output boxes are
    /// in pixel units of the output image.
    pub fn forward_obb<C, R>(
        &self,
        input: Vec<(Image, Vec<Label<OrientedBox<f64>, C>>)>,
        rng: &mut R,
    ) -> Result<(Image, Vec<Label<OrientedBox<f64>, C>>)>
    where
        R: Rng + ?Sized,
    {
        let Self {
            img_size,
            min_bbox_size,
            edge_ratio,
        } = *self;

        let (canvas, labels) = self.compose(input, rng, |placement, (h, w), labels| {
            let (pad_w, pad_h) = placement.pad();
            let labels: Vec<_> = labels
                .into_iter()
                .map(|label| {
                    label.map_rect(|rect| rect.scale_xy(w as f64, h as f64).translate(pad_w, pad_h))
                })
                .collect();
            let rects: Vec<_> = labels.iter().map(|label| label.rect).collect();
            let keep: HashSet<_> =
                filter_box_candidates(&rects, &placement.region(), min_bbox_size, edge_ratio)
                    .into_iter()
                    .collect();

            labels
                .into_iter()
                .enumerate()
                .filter(|(index, _)| keep.contains(index))
                .map(|(_, label)| label)
                .collect()
        })?;

        let image = resize(&canvas, img_size, img_size)?;
        let labels = labels
            .into_iter()
            .map(|label| label.map_rect(|rect| rect.scale(0.5)))
            .collect();

        Ok((image, labels))
    }

    /// Combines 4 images with axis-aligned boxes, followed by a random affine
    /// transform onto an `img_size` square.
    ///
    /// Input boxes are in ratio units of their own image. Output boxes are
    /// in pixel units of the output image.
    pub fn forward_hbb<C, R>(
        &self,
        input: Vec<(Image, Vec<Label<TLBR<f64>, C>>)>,
        affine: &RandomAffine,
        rng: &mut R,
    ) -> Result<(Image, Vec<Label<TLBR<f64>, C>>)>
    where
        C: Copy,
        R: Rng + ?Sized,
    {
        let img_size = self.img_size;
        let canvas_size = (img_size * 2) as f64;

        let (canvas, labels) = self.compose(input, rng, |placement, (h, w), labels| {
            let (pad_w, pad_h) = placement.pad();
            labels
                .into_iter()
                .map(|label| {
                    label.map_rect(|rect| {
                        rect.scale_xy(w as f64, h as f64)
                            .translate(pad_w, pad_h)
                            .clip(canvas_size, canvas_size)
                    })
                })
                .collect()
        })?;

        affine.forward(&canvas, &labels, (img_size, img_size), rng)
    }

    /// Pastes the 4 tiles around a random pivot on a `2 * img_size` canvas.
    ///
    /// `place_labels` maps the labels of a tile onto the canvas given the
    /// placement and the tile size.
    fn compose<L, R, F>(
        &self,
        input: Vec<(Image, Vec<L>)>,
        rng: &mut R,
        mut place_labels: F,
    ) -> Result<(Image, Vec<L>)>
    where
        R: Rng + ?Sized,
        F: FnMut(&TilePlacement, (usize, usize), Vec<L>) -> Vec<L>,
    {
        ensure!(
            input.len() == 4,
            "Mosaic augmentation of current version only supports 4 images, but get {}",
            input.len()
        );
        let shapes: Vec<_> = input
            .iter()
            .map(|(image, _)| check_image(image))
            .collect::<Result<_>>()?;

        let s = self.img_size;
        let canvas_size = s * 2;
        let xc = rng.gen_range((s / 2)..(3 * s / 2));
        let yc = rng.gen_range((s / 2)..(3 * s / 2));
        debug!("mosaic pivot at ({}, {})", xc, yc);

        let mut canvas = full(canvas_size, canvas_size, MOSAIC_BORDER);
        let mut all_labels = vec![];

        for (index, ((image, labels), tile_hw)) in izip!(input, shapes).enumerate() {
            let placement = TilePlacement::new(index, (xc, yc), canvas_size, tile_hw);
            placement.paste(&mut canvas, &image);

            let num_labels = labels.len();
            let placed = place_labels(&placement, tile_hw, labels);
            if num_labels > 0 && placed.is_empty() {
                warn!("mosaic tile {} lost all of its {} boxes", index, num_labels);
            }
            all_labels.extend(placed);
        }

        Ok((canvas, all_labels))
    }
}
