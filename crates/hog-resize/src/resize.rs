use hog_core::{BorderMode, Image, ImageView, sample_bilinear_f32, sample_nearest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    Nearest,
    #[default]
    Bilinear,
}

pub fn resize_u8(
    src: &ImageView<'_, u8>,
    width: usize,
    height: usize,
    interp: Interpolation,
) -> Image<u8> {
    let mut dst = Image::new_fill(width, height, 0u8);
    resize_u8_into(src, &mut dst, interp);
    dst
}

/// Resizes `src` into the extent already held by `dst`.
///
/// An empty source leaves `dst` zero-filled.
pub fn resize_u8_into(src: &ImageView<'_, u8>, dst: &mut Image<u8>, interp: Interpolation) {
    let dst_w = dst.width();
    let dst_h = dst.height();
    if dst_w == 0 || dst_h == 0 {
        return;
    }
    if src.width() == 0 || src.height() == 0 {
        dst.data_mut().fill(0);
        return;
    }

    if src.width() == dst_w && src.height() == dst_h {
        copy_rows(src, dst);
        return;
    }

    let xs = source_coords(dst_w, src.width());
    let ys = source_coords(dst_h, src.height());

    match interp {
        Interpolation::Nearest => {
            for (y, &sy) in ys.iter().enumerate() {
                let row = dst.row_mut(y);
                for (out, &sx) in row.iter_mut().zip(&xs) {
                    *out = sample_nearest(src, sx, sy, BorderMode::Clamp);
                }
            }
        }
        Interpolation::Bilinear => {
            for (y, &sy) in ys.iter().enumerate() {
                let row = dst.row_mut(y);
                for (out, &sx) in row.iter_mut().zip(&xs) {
                    let v = sample_bilinear_f32(src, sx, sy, BorderMode::Clamp);
                    *out = saturate_u8(v);
                }
            }
        }
    }
}

fn source_coords(dst_len: usize, src_len: usize) -> Vec<f32> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|d| (((d as f64) + 0.5) * scale - 0.5) as f32)
        .collect()
}

#[inline]
fn saturate_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn copy_rows(src: &ImageView<'_, u8>, dst: &mut Image<u8>) {
    if let Some(contig) = src.as_contiguous_slice() {
        dst.data_mut().copy_from_slice(contig);
        return;
    }
    for y in 0..src.height() {
        dst.row_mut(y).copy_from_slice(src.row(y));
    }
}

#[cfg(test)]
mod tests {
    use hog_core::Image;

    use super::{Interpolation, resize_u8, resize_u8_into};

    fn ramp(width: usize, height: usize) -> Image<u8> {
        let data = (0..width * height).map(|i| (i % 251) as u8).collect();
        Image::from_vec(width, height, data).expect("valid image")
    }

    #[test]
    fn same_size_is_exact_copy() {
        let src = ramp(7, 5);
        for interp in [Interpolation::Bilinear, Interpolation::Nearest] {
            let dst = resize_u8(&src.as_view(), 7, 5, interp);
            assert_eq!(dst, src);
        }
    }

    #[test]
    fn same_size_copy_from_non_contiguous_view() {
        let src = ramp(6, 4);
        let sub = src.as_view().subview(1, 1, 4, 2).expect("valid subview");
        let dst = resize_u8(&sub, 4, 2, Interpolation::Bilinear);
        assert_eq!(dst.data(), &[7, 8, 9, 10, 13, 14, 15, 16]);
    }

    #[test]
    fn bilinear_upscale_2x_on_two_pixels() {
        let src = Image::from_vec(2, 1, vec![0u8, 100]).expect("valid image");
        let dst = resize_u8(&src.as_view(), 4, 1, Interpolation::Bilinear);
        // Mapped x: -0.25, 0.25, 0.75, 1.25 -> clamped blend.
        assert_eq!(dst.data(), &[0, 25, 75, 100]);
    }

    #[test]
    fn bilinear_downscale_2x_averages_pairs() {
        let src = Image::from_vec(4, 2, vec![0u8, 10, 20, 30, 40, 50, 60, 70]).expect("valid");
        let dst = resize_u8(&src.as_view(), 2, 1, Interpolation::Bilinear);
        // Mapped x: 0.5, 2.5; mapped y: 0.5.
        assert_eq!(dst.data(), &[25, 45]);
    }

    #[test]
    fn nearest_picks_closest_center() {
        let src = Image::from_vec(4, 1, vec![1u8, 2, 3, 4]).expect("valid image");
        let dst = resize_u8(&src.as_view(), 2, 1, Interpolation::Nearest);
        // Mapped x: 0.5 -> 1 (round half away from zero), 2.5 -> 3.
        assert_eq!(dst.data(), &[2, 4]);
    }

    #[test]
    fn constant_image_stays_constant() {
        let src = Image::new_fill(13, 9, 77u8);
        let dst = resize_u8(&src.as_view(), 64, 128, Interpolation::Bilinear);
        assert_eq!(dst.width(), 64);
        assert_eq!(dst.height(), 128);
        assert!(dst.data().iter().all(|&v| v == 77));
    }

    #[test]
    fn into_reuses_destination_extent() {
        let src = ramp(10, 10);
        let mut dst = Image::new_fill(3, 2, 0u8);
        resize_u8_into(&src.as_view(), &mut dst, Interpolation::Bilinear);
        assert_eq!(dst.width(), 3);
        assert_eq!(dst.height(), 2);

        let empty = Image::<u8>::new_fill(0, 0, 0);
        let mut dst = Image::new_fill(2, 2, 9u8);
        resize_u8_into(&empty.as_view(), &mut dst, Interpolation::Bilinear);
        assert_eq!(dst.data(), &[0, 0, 0, 0]);
    }
}
