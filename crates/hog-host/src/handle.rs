use hog_core::{Image, ImageView};
use hog_features::{HogDescriptor, HogGeometry, HogParams};
use hog_resize::{Interpolation, resize_u8_into};
use tracing::{debug, trace};

use crate::HostError;
use crate::config::{BinOrder, HogConfig};
use crate::reorder::apply_bin_order;

/// A constructed descriptor with its working buffers.
///
/// Dropping the handle releases everything it owns.
#[derive(Debug)]
pub struct DescriptorHandle {
    config: HogConfig,
    hog: HogDescriptor,
    window: Image<u8>,
}

impl DescriptorHandle {
    /// Runs every check [`new`](Self::new) performs without allocating.
    pub fn check(config: &HogConfig) -> Result<(), HostError> {
        HogDescriptor::check(&config.geometry()?, &HogParams::default())?;
        Ok(())
    }

    pub fn new(config: &HogConfig) -> Result<Self, HostError> {
        let geometry = config.geometry()?;
        let hog = HogDescriptor::new(geometry, HogParams::default())?;
        let win = geometry.win_size;
        debug!(
            win = %win,
            block = %geometry.block_size,
            stride = %geometry.block_stride,
            cell = %geometry.cell_size,
            nbins = geometry.nbins,
            len = geometry.descriptor_size(),
            "descriptor constructed"
        );

        Ok(Self {
            config: *config,
            hog,
            window: Image::new_fill(win.width, win.height, 0u8),
        })
    }

    pub fn config(&self) -> &HogConfig {
        &self.config
    }

    pub fn geometry(&self) -> &HogGeometry {
        self.hog.geometry()
    }

    pub fn bin_order(&self) -> BinOrder {
        self.config.bin_order
    }

    pub fn descriptor_size(&self) -> usize {
        self.hog.descriptor_size()
    }

    /// Resizes `img` to the window, computes the descriptor and applies the
    /// configured bin order.
    pub fn compute(&mut self, img: &ImageView<'_, u8>) -> Result<Vec<f32>, HostError> {
        if img.width() == 0 || img.height() == 0 {
            return Err(HostError::InvalidImageShape {
                dims: vec![img.height(), img.width()],
            });
        }

        trace!(input = %img.size(), window = %self.window.size(), "compute");
        resize_u8_into(img, &mut self.window, Interpolation::Bilinear);
        let mut features = self.hog.compute(&self.window.as_view())?;
        apply_bin_order(&mut features, self.config.bin_order, self.hog.geometry().nbins);
        Ok(features)
    }
}

impl Drop for DescriptorHandle {
    fn drop(&mut self) {
        debug!(win = %self.hog.geometry().win_size, "descriptor released");
    }
}

#[cfg(test)]
mod tests {
    use hog_core::Image;

    use super::DescriptorHandle;
    use crate::HostError;
    use crate::config::{BinOrder, HogConfig};

    fn config(bin_order: BinOrder) -> HogConfig {
        HogConfig {
            window_size: [32, 16],
            cell_size: [8, 8],
            block_size: [2, 2],
            block_overlap: [1, 1],
            num_bins: 9,
            bin_order,
        }
    }

    fn gradient_image(width: usize, height: usize) -> Image<u8> {
        let data = (0..width * height)
            .map(|i| ((i % width) * 3 + (i / width) * 5) as u8)
            .collect();
        Image::from_vec(width, height, data).expect("valid image")
    }

    #[test]
    fn any_input_size_is_resized_to_window() {
        let mut handle = DescriptorHandle::new(&config(BinOrder::Auto)).expect("valid config");
        assert_eq!(handle.descriptor_size(), 9 * 4 * 3);

        for (w, h) in [(16, 32), (5, 7), (40, 20)] {
            let out = handle
                .compute(&gradient_image(w, h).as_view())
                .expect("valid input");
            assert_eq!(out.len(), handle.descriptor_size());
        }
    }

    #[test]
    fn auto_order_at_nine_bins_reverses_native_runs() {
        let img = gradient_image(16, 32);
        let mut native = DescriptorHandle::new(&config(BinOrder::Native)).expect("valid");
        let mut auto = DescriptorHandle::new(&config(BinOrder::Auto)).expect("valid");

        let a = native.compute(&img.as_view()).expect("valid input");
        let b = auto.compute(&img.as_view()).expect("valid input");
        for (na, au) in a.chunks(9).zip(b.chunks(9)) {
            let reversed: Vec<f32> = na.iter().rev().copied().collect();
            assert_eq!(au, reversed.as_slice());
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        let mut handle = DescriptorHandle::new(&config(BinOrder::Auto)).expect("valid config");
        let empty = Image::<u8>::new_fill(0, 4, 0);
        assert!(matches!(
            handle.compute(&empty.as_view()),
            Err(HostError::InvalidImageShape { .. })
        ));
    }
}
