use crate::border::{BorderMode, map_index};
use crate::image::ImageView;

/// Nearest-neighbor read at pixel-center coordinates, round-to-nearest.
///
/// Panics on an empty image.
pub fn sample_nearest<T: Copy>(img: &ImageView<'_, T>, x: f32, y: f32, border: BorderMode) -> T {
    assert!(
        img.width() > 0 && img.height() > 0,
        "cannot sample an empty image"
    );

    let xi = map_index(x.round() as isize, img.width(), border).expect("non-empty axis");
    let yi = map_index(y.round() as isize, img.height(), border).expect("non-empty axis");
    // SAFETY: `map_index` returns indices in `[0, len)` for non-empty axes.
    unsafe { *img.get_unchecked(xi, yi) }
}

/// Floor-based 2x2 bilinear read at pixel-center coordinates.
///
/// Panics on an empty image.
pub fn sample_bilinear_f32<T: Copy + Into<f32>>(
    img: &ImageView<'_, T>,
    x: f32,
    y: f32,
    border: BorderMode,
) -> f32 {
    assert!(
        img.width() > 0 && img.height() > 0,
        "cannot sample an empty image"
    );

    let x0 = x.floor() as isize;
    let y0 = y.floor() as isize;
    let dx = x - x0 as f32;
    let dy = y - y0 as f32;

    let p00 = sample_at_f32(img, x0, y0, border);
    let p10 = sample_at_f32(img, x0 + 1, y0, border);
    let p01 = sample_at_f32(img, x0, y0 + 1, border);
    let p11 = sample_at_f32(img, x0 + 1, y0 + 1, border);

    let top = p00 * (1.0 - dx) + p10 * dx;
    let bottom = p01 * (1.0 - dx) + p11 * dx;
    top * (1.0 - dy) + bottom * dy
}

#[inline]
fn sample_at_f32<T: Copy + Into<f32>>(
    img: &ImageView<'_, T>,
    x: isize,
    y: isize,
    border: BorderMode,
) -> f32 {
    let xi = map_index(x, img.width(), border).expect("mapped x index should exist");
    let yi = map_index(y, img.height(), border).expect("mapped y index should exist");
    // SAFETY: `map_index` returns indices in `[0, len)` for non-empty images.
    unsafe { (*img.get_unchecked(xi, yi)).into() }
}

#[cfg(test)]
mod tests {
    use crate::border::BorderMode;
    use crate::image::Image;
    use crate::sample::{sample_bilinear_f32, sample_nearest};

    #[test]
    fn nearest_on_3x3_with_clamp() {
        let img = Image::from_vec(
            3,
            3,
            vec![
                0u8, 1, 2, // row 0
                10, 11, 12, // row 1
                20, 21, 22, // row 2
            ],
        )
        .expect("valid image");
        let view = img.as_view();

        assert_eq!(sample_nearest(&view, 1.2, 1.6, BorderMode::Clamp), 21);
        assert_eq!(sample_nearest(&view, -2.0, 1.0, BorderMode::Clamp), 10);
        assert_eq!(sample_nearest(&view, 9.0, 9.0, BorderMode::Clamp), 22);
        assert_eq!(sample_nearest(&view, -1.0, 0.0, BorderMode::Reflect101), 1);
    }

    #[test]
    fn bilinear_on_2x2_center_and_clamped_border() {
        let img = Image::from_vec(2, 2, vec![0u8, 10, 20, 30]).expect("valid image");
        let view = img.as_view();

        let center = sample_bilinear_f32(&view, 0.5, 0.5, BorderMode::Clamp);
        assert!((center - 15.0).abs() < 1e-6);

        let neg_clamp = sample_bilinear_f32(&view, -0.25, -0.25, BorderMode::Clamp);
        assert!((neg_clamp - 0.0).abs() < 1e-6);

        let far = sample_bilinear_f32(&view, 3.0, 3.0, BorderMode::Clamp);
        assert!((far - 30.0).abs() < 1e-6);
    }
}
