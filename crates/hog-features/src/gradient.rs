//! Per-pixel oriented gradients with two-bin orientation voting.
//!
//! Derivatives are centered differences (`[-1, 0, 1]`) with reflect-101
//! borders, so the outermost row/column gets a zero derivative across the
//! border. Orientations are unsigned, folded into `[0, π)`.
//!
//! Bin `k` is centered at `(k + 0.5) * π / nbins`. Every pixel splits its
//! magnitude linearly between the two bins whose centers bracket its
//! orientation; bins wrap around at `π`.

use core::f32::consts::PI;

use hog_core::{BorderMode, Image, ImageView, neighbor_pair};

#[derive(Debug, Clone)]
pub struct OrientedGradients {
    tmp: Image<f32>,
    votes: Vec<[f32; 2]>,
    bins: Vec<[u16; 2]>,
}

impl Default for OrientedGradients {
    fn default() -> Self {
        Self::new()
    }
}

impl OrientedGradients {
    pub fn new() -> Self {
        Self {
            tmp: Image::new_fill(0, 0, 0.0),
            votes: Vec::new(),
            bins: Vec::new(),
        }
    }

    /// Magnitude shares for the two bins of pixel `(x, y)`.
    #[inline]
    pub fn votes(&self, x: usize, y: usize) -> [f32; 2] {
        self.votes[y * self.tmp.width() + x]
    }

    /// The two bins pixel `(x, y)` votes into.
    #[inline]
    pub fn bins(&self, x: usize, y: usize) -> [u16; 2] {
        self.bins[y * self.tmp.width() + x]
    }

    /// Recomputes all planes for `img`. `nbins` must be in `1..=u16::MAX`.
    pub fn compute_u8(&mut self, img: &ImageView<'_, u8>, nbins: usize) {
        debug_assert!(nbins > 0 && nbins <= u16::MAX as usize);
        let w = img.width();
        let h = img.height();
        self.tmp.ensure_size(w, h, 0.0);
        for y in 0..h {
            let dst = self.tmp.row_mut(y);
            for (d, &px) in dst.iter_mut().zip(img.row(y)) {
                *d = px as f32;
            }
        }
        let n = w * h;
        self.votes.resize(n, [0.0; 2]);
        self.bins.resize(n, [0; 2]);
        if n == 0 {
            return;
        }

        let src = self.tmp.data();
        let angle_scale = nbins as f32 / PI;
        let cols: Vec<(usize, usize)> = (0..w)
            .map(|x| neighbor_pair(x, w, BorderMode::Reflect101))
            .collect();

        for y in 0..h {
            let (ym1, yp1) = neighbor_pair(y, h, BorderMode::Reflect101);
            let row = y * w;
            for (x, &(xm1, xp1)) in cols.iter().enumerate() {
                let dx = src[row + xp1] - src[row + xm1];
                let dy = src[yp1 * w + x] - src[ym1 * w + x];
                let mag = (dx * dx + dy * dy).sqrt();

                let mut angle = dy.atan2(dx);
                if angle < 0.0 {
                    angle += PI;
                }
                if angle >= PI {
                    angle -= PI;
                }

                let pos = angle * angle_scale - 0.5;
                let lo = pos.floor();
                let frac = pos - lo;
                let b0 = (lo as isize).rem_euclid(nbins as isize) as usize;
                let b1 = if b0 + 1 == nbins { 0 } else { b0 + 1 };

                let idx = row + x;
                self.votes[idx] = [mag * (1.0 - frac), mag * frac];
                self.bins[idx] = [b0 as u16, b1 as u16];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use hog_core::Image;

    use super::OrientedGradients;

    #[test]
    fn horizontal_ramp_splits_between_first_and_last_bin() {
        let img = Image::from_vec(4, 3, vec![0u8, 10, 20, 30, 0, 10, 20, 30, 0, 10, 20, 30])
            .expect("valid image");
        let mut g = OrientedGradients::new();
        g.compute_u8(&img.as_view(), 9);

        // Interior: dx = 20, dy = 0, orientation 0 sits between bins 8 and 0.
        assert_eq!(g.bins(1, 1), [8, 0]);
        let [a, b] = g.votes(1, 1);
        assert!((a - 10.0).abs() < 1e-5);
        assert!((b - 10.0).abs() < 1e-5);

        // Reflect-101 makes the border derivative vanish.
        assert_eq!(g.votes(0, 1), [0.0, 0.0]);
        assert_eq!(g.votes(3, 1), [0.0, 0.0]);
    }

    #[test]
    fn vertical_ramp_lands_on_center_bin() {
        let img = Image::from_vec(2, 4, vec![0u8, 0, 8, 8, 16, 16, 24, 24]).expect("valid image");
        let mut g = OrientedGradients::new();
        g.compute_u8(&img.as_view(), 9);

        // Orientation π/2 is the center of bin 4 for 9 bins, so one of the two
        // votes carries (almost) the whole magnitude.
        let bins = g.bins(0, 1);
        let votes = g.votes(0, 1);
        let major = if votes[0] >= votes[1] { 0 } else { 1 };
        assert_eq!(bins[major], 4);
        assert!((votes[major] - 16.0).abs() < 1e-3);
        assert!(votes[1 - major].abs() < 1e-3);
    }

    #[test]
    fn negative_gradients_fold_to_unsigned_orientation() {
        let rising = Image::from_vec(3, 1, vec![0u8, 50, 100]).expect("valid image");
        let falling = Image::from_vec(3, 1, vec![100u8, 50, 0]).expect("valid image");

        let mut g_rise = OrientedGradients::new();
        let mut g_fall = OrientedGradients::new();
        g_rise.compute_u8(&rising.as_view(), 6);
        g_fall.compute_u8(&falling.as_view(), 6);

        assert_eq!(g_rise.bins(1, 0), g_fall.bins(1, 0));
        assert_eq!(g_rise.votes(1, 0), g_fall.votes(1, 0));
    }

    #[test]
    fn planes_follow_input_extent() {
        let mut g = OrientedGradients::new();
        g.compute_u8(&Image::new_fill(5, 2, 1u8).as_view(), 9);
        assert_eq!(g.tmp.size(), hog_core::Size2::new(5, 2));
        assert_eq!(g.votes.len(), 10);
        g.compute_u8(&Image::new_fill(0, 0, 1u8).as_view(), 9);
        assert_eq!(g.votes.len(), 0);
    }
}
