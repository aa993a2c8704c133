use hog_core::ImageView;

use crate::gradient::OrientedGradients;
use crate::{Error, HogGeometry};

/// Fixed algorithm constants of the descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HogParams {
    /// Derivative aperture. Only the centered `[-1, 0, 1]` difference (`1`)
    /// is implemented.
    pub deriv_aperture: u32,
    /// Sigma of the Gaussian weighting applied inside every block, in pixels.
    pub win_sigma: f32,
    /// Clip level of the L2-Hys block normalization.
    pub l2_hys_threshold: f32,
}

impl Default for HogParams {
    fn default() -> Self {
        Self {
            deriv_aperture: 1,
            win_sigma: 8.0,
            l2_hys_threshold: 0.2,
        }
    }
}

impl HogParams {
    fn validate(&self) -> Result<(), Error> {
        if self.deriv_aperture != 1 {
            return Err(Error::InvalidGeometry(format!(
                "unsupported derivative aperture {}",
                self.deriv_aperture
            )));
        }
        if !(self.win_sigma.is_finite() && self.win_sigma > 0.0) {
            return Err(Error::InvalidGeometry(format!(
                "window sigma must be positive, got {}",
                self.win_sigma
            )));
        }
        if !(self.l2_hys_threshold.is_finite() && self.l2_hys_threshold > 0.0) {
            return Err(Error::InvalidGeometry(format!(
                "L2-Hys threshold must be positive, got {}",
                self.l2_hys_threshold
            )));
        }
        Ok(())
    }
}

/// Up to four cell contributions of one block pixel.
#[derive(Debug, Clone, Copy)]
struct PixelTap {
    x: usize,
    y: usize,
    hist_ofs: [usize; 4],
    weight: [f32; 4],
    count: usize,
}

/// HOG descriptor over a single detection window.
///
/// Output layout: blocks column-major (block column outer, block row inner);
/// inside a block, cells column-major; inside a cell, `nbins` bins in
/// ascending orientation. Each block histogram is L2-Hys normalized on its
/// own.
///
/// Working buffers are kept between calls, so repeated [`compute`] calls on
/// same-size windows do not reallocate.
///
/// [`compute`]: HogDescriptor::compute
#[derive(Debug, Clone)]
pub struct HogDescriptor {
    geometry: HogGeometry,
    params: HogParams,
    taps: Vec<PixelTap>,
    gradients: OrientedGradients,
}

impl HogDescriptor {
    pub fn new(geometry: HogGeometry, params: HogParams) -> Result<Self, Error> {
        Self::check(&geometry, &params)?;

        Ok(Self {
            taps: build_block_taps(&geometry, &params),
            geometry,
            params,
            gradients: OrientedGradients::new(),
        })
    }

    /// Every check [`new`](Self::new) performs, without allocating. A pair
    /// that passes here is accepted by `new`.
    pub fn check(geometry: &HogGeometry, params: &HogParams) -> Result<(), Error> {
        geometry.validate()?;
        params.validate()?;
        check_buffer_sizes(geometry)
    }

    pub fn geometry(&self) -> &HogGeometry {
        &self.geometry
    }

    pub fn descriptor_size(&self) -> usize {
        self.geometry.descriptor_size()
    }

    /// Computes the descriptor of `img`, which must be exactly `win_size`.
    pub fn compute(&mut self, img: &ImageView<'_, u8>) -> Result<Vec<f32>, Error> {
        let mut out = Vec::with_capacity(self.descriptor_size());
        self.compute_into(img, &mut out)?;
        Ok(out)
    }

    /// Like [`compute`](Self::compute), writing into `out` (cleared first).
    pub fn compute_into(
        &mut self,
        img: &ImageView<'_, u8>,
        out: &mut Vec<f32>,
    ) -> Result<(), Error> {
        let win = self.geometry.win_size;
        if img.size() != win {
            return Err(Error::WindowSizeMismatch {
                expected: win,
                actual: img.size(),
            });
        }

        let g = self.geometry;
        self.gradients.compute_u8(img, g.nbins);

        let hist_len = g.block_histogram_len();
        let blocks = g.blocks_per_window();
        out.clear();
        out.resize(self.descriptor_size(), 0.0);

        for bx in 0..blocks.width {
            for by in 0..blocks.height {
                let block_idx = bx * blocks.height + by;
                let hist = &mut out[block_idx * hist_len..(block_idx + 1) * hist_len];
                let origin = (bx * g.block_stride.width, by * g.block_stride.height);
                accumulate_block(&self.gradients, &self.taps, origin, hist);
                normalize_l2_hys(hist, self.params.l2_hys_threshold);
            }
        }

        Ok(())
    }
}

/// Every working buffer must be addressable by a single allocation.
fn check_buffer_sizes(g: &HogGeometry) -> Result<(), Error> {
    let fits = |count: usize, elem: usize| {
        count
            .checked_mul(elem)
            .is_some_and(|bytes| bytes <= isize::MAX as usize)
    };
    let buffers = [
        ("block taps", g.block_size.area(), size_of::<PixelTap>()),
        ("gradient planes", g.win_size.area(), size_of::<[f32; 2]>()),
        ("descriptor", g.descriptor_size(), size_of::<f32>()),
    ];
    for (name, count, elem) in buffers {
        if !fits(count, elem) {
            return Err(Error::InvalidGeometry(format!(
                "{name} for window {} do not fit in memory",
                g.win_size
            )));
        }
    }
    Ok(())
}

fn build_block_taps(g: &HogGeometry, params: &HogParams) -> Vec<PixelTap> {
    let cells = g.cells_per_block();
    let bw = g.block_size.width;
    let bh = g.block_size.height;
    let cw = g.cell_size.width as f32;
    let ch = g.cell_size.height as f32;
    let gauss_scale = 1.0 / (2.0 * params.win_sigma * params.win_sigma);

    let mut taps = Vec::with_capacity(bw * bh);
    for y in 0..bh {
        let (cy, wy) = cell_pair(y, ch, cells.height);
        let dy = y as f32 - bh as f32 * 0.5;
        for x in 0..bw {
            let (cx, wx) = cell_pair(x, cw, cells.width);
            let dx = x as f32 - bw as f32 * 0.5;
            let gauss = (-(dx * dx + dy * dy) * gauss_scale).exp();

            let mut tap = PixelTap {
                x,
                y,
                hist_ofs: [0; 4],
                weight: [0.0; 4],
                count: 0,
            };
            for (ix, cell_x) in cx.iter().enumerate() {
                let Some(cell_x) = *cell_x else { continue };
                for (iy, cell_y) in cy.iter().enumerate() {
                    let Some(cell_y) = *cell_y else { continue };
                    let w = wx[ix] * wy[iy] * gauss;
                    if w <= 0.0 {
                        continue;
                    }
                    tap.hist_ofs[tap.count] = (cell_x * cells.height + cell_y) * g.nbins;
                    tap.weight[tap.count] = w;
                    tap.count += 1;
                }
            }
            if tap.count > 0 {
                taps.push(tap);
            }
        }
    }
    taps
}

/// The two cells whose centers bracket pixel `p` along one axis, with their
/// linear weights. Cells outside the block are `None`.
fn cell_pair(p: usize, cell_len: f32, ncells: usize) -> ([Option<usize>; 2], [f32; 2]) {
    let pos = (p as f32 + 0.5) / cell_len - 0.5;
    let lo = pos.floor();
    let t = pos - lo;
    let lo = lo as isize;
    let in_block = |c: isize| (c >= 0 && (c as usize) < ncells).then_some(c as usize);
    ([in_block(lo), in_block(lo + 1)], [1.0 - t, t])
}

fn accumulate_block(
    grad: &OrientedGradients,
    taps: &[PixelTap],
    (ox, oy): (usize, usize),
    hist: &mut [f32],
) {
    for tap in taps {
        let px = ox + tap.x;
        let py = oy + tap.y;
        let [v0, v1] = grad.votes(px, py);
        if v0 == 0.0 && v1 == 0.0 {
            continue;
        }
        let [b0, b1] = grad.bins(px, py);
        for k in 0..tap.count {
            let base = tap.hist_ofs[k];
            let w = tap.weight[k];
            hist[base + b0 as usize] += v0 * w;
            hist[base + b1 as usize] += v1 * w;
        }
    }
}

/// L2 normalization, clipping at `threshold`, then L2 renormalization.
pub fn normalize_l2_hys(hist: &mut [f32], threshold: f32) {
    let sum: f32 = hist.iter().map(|v| v * v).sum();
    let scale = 1.0 / (sum.sqrt() + 0.1 * hist.len() as f32);

    let mut sum = 0.0f32;
    for v in hist.iter_mut() {
        *v = (*v * scale).min(threshold);
        sum += *v * *v;
    }

    let scale = 1.0 / (sum.sqrt() + 1e-3);
    for v in hist.iter_mut() {
        *v *= scale;
    }
}
