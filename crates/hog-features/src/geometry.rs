use hog_core::Size2;

use crate::Error;

/// Pixel geometry of a HOG detection window.
///
/// Blocks tile the window with `block_stride` steps; each block is split into
/// `block_size / cell_size` cells and every cell carries `nbins` orientation
/// bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HogGeometry {
    pub win_size: Size2,
    pub block_size: Size2,
    pub block_stride: Size2,
    pub cell_size: Size2,
    pub nbins: usize,
}

impl HogGeometry {
    /// Checks the divisibility relations the descriptor layout depends on.
    pub fn validate(&self) -> Result<(), Error> {
        let named = [
            ("window size", self.win_size),
            ("block size", self.block_size),
            ("block stride", self.block_stride),
            ("cell size", self.cell_size),
        ];
        for (name, size) in named {
            if size.is_empty() {
                return Err(Error::InvalidGeometry(format!(
                    "{name} must be positive, got {size}"
                )));
            }
        }
        if self.nbins == 0 || self.nbins > u16::MAX as usize {
            return Err(Error::InvalidGeometry(format!(
                "nbins must be in 1..={}, got {}",
                u16::MAX,
                self.nbins
            )));
        }

        if !self.block_size.is_multiple_of(self.cell_size) {
            return Err(Error::InvalidGeometry(format!(
                "block size {} is not a multiple of cell size {}",
                self.block_size, self.cell_size
            )));
        }

        let span = self.win_size.checked_sub(self.block_size).ok_or_else(|| {
            Error::InvalidGeometry(format!(
                "block size {} exceeds window size {}",
                self.block_size, self.win_size
            ))
        })?;

        if !span.is_multiple_of(self.block_stride) {
            return Err(Error::InvalidGeometry(format!(
                "window size {} minus block size {} is not a multiple of block stride {}",
                self.win_size, self.block_size, self.block_stride
            )));
        }

        for (name, size) in [("window", self.win_size), ("block", self.block_size)] {
            size.width.checked_mul(size.height).ok_or_else(|| {
                Error::InvalidGeometry(format!("{name} area {size} overflows"))
            })?;
        }
        self.checked_descriptor_size().ok_or_else(|| {
            Error::InvalidGeometry(format!(
                "descriptor length for window {} with {} bins overflows",
                self.win_size, self.nbins
            ))
        })?;

        Ok(())
    }

    fn checked_descriptor_size(&self) -> Option<usize> {
        let cells = self.cells_per_block();
        let blocks = self.blocks_per_window();
        self.nbins
            .checked_mul(cells.width)?
            .checked_mul(cells.height)?
            .checked_mul(blocks.width)?
            .checked_mul(blocks.height)
    }

    /// Number of cells along each axis of one block.
    pub fn cells_per_block(&self) -> Size2 {
        Size2::new(
            self.block_size.width / self.cell_size.width,
            self.block_size.height / self.cell_size.height,
        )
    }

    /// Number of block positions along each axis of the window.
    pub fn blocks_per_window(&self) -> Size2 {
        Size2::new(
            (self.win_size.width - self.block_size.width) / self.block_stride.width + 1,
            (self.win_size.height - self.block_size.height) / self.block_stride.height + 1,
        )
    }

    /// Length of one block's histogram.
    pub fn block_histogram_len(&self) -> usize {
        self.nbins * self.cells_per_block().area()
    }

    /// Length of the descriptor of one window.
    ///
    /// Only meaningful once [`validate`](Self::validate) has passed.
    pub fn descriptor_size(&self) -> usize {
        self.block_histogram_len() * self.blocks_per_window().area()
    }
}

#[cfg(test)]
mod tests {
    use hog_core::Size2;

    use super::HogGeometry;
    use crate::Error;

    fn pedestrian() -> HogGeometry {
        HogGeometry {
            win_size: Size2::new(64, 128),
            block_size: Size2::new(16, 16),
            block_stride: Size2::new(8, 8),
            cell_size: Size2::new(8, 8),
            nbins: 9,
        }
    }

    #[test]
    fn pedestrian_window_layout() {
        let g = pedestrian();
        g.validate().expect("valid geometry");

        assert_eq!(g.cells_per_block(), Size2::new(2, 2));
        assert_eq!(g.blocks_per_window(), Size2::new(7, 15));
        assert_eq!(g.block_histogram_len(), 36);
        assert_eq!(g.descriptor_size(), 3780);
    }

    #[test]
    fn non_square_cells_and_strides() {
        let g = HogGeometry {
            win_size: Size2::new(48, 30),
            block_size: Size2::new(12, 10),
            block_stride: Size2::new(12, 5),
            cell_size: Size2::new(6, 5),
            nbins: 6,
        };
        g.validate().expect("valid geometry");

        // 6 * (12/6) * (10/5) * ((48-12)/12+1) * ((30-10)/5+1)
        assert_eq!(g.descriptor_size(), 6 * 2 * 2 * 4 * 5);
    }

    #[test]
    fn block_equal_to_window_is_one_block() {
        let g = HogGeometry {
            win_size: Size2::new(16, 16),
            block_size: Size2::new(16, 16),
            block_stride: Size2::new(8, 8),
            cell_size: Size2::new(8, 8),
            nbins: 9,
        };
        g.validate().expect("valid geometry");
        assert_eq!(g.blocks_per_window(), Size2::new(1, 1));
        assert_eq!(g.descriptor_size(), 36);
    }

    #[test]
    fn rejects_broken_divisibility() {
        let mut g = pedestrian();
        g.block_stride = Size2::new(7, 8);
        assert!(matches!(g.validate(), Err(Error::InvalidGeometry(_))));

        let mut g = pedestrian();
        g.block_size = Size2::new(12, 16);
        assert!(matches!(g.validate(), Err(Error::InvalidGeometry(_))));

        let mut g = pedestrian();
        g.win_size = Size2::new(8, 128);
        assert!(matches!(g.validate(), Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn rejects_zero_components() {
        let mut g = pedestrian();
        g.nbins = 0;
        assert!(g.validate().is_err());

        let mut g = pedestrian();
        g.nbins = 70_000;
        assert!(g.validate().is_err());

        let mut g = pedestrian();
        g.cell_size = Size2::new(0, 8);
        assert!(g.validate().is_err());
    }

    #[test]
    fn rejects_sizes_that_overflow() {
        let unit = Size2::new(1, 1);
        let g = HogGeometry {
            win_size: Size2::new(usize::MAX / 2 + 1, 2),
            block_size: unit,
            block_stride: unit,
            cell_size: unit,
            nbins: 9,
        };
        assert!(matches!(g.validate(), Err(Error::InvalidGeometry(_))));

        // Window area fits, but the feature count does not.
        let g = HogGeometry {
            win_size: Size2::new(usize::MAX / 4, 1),
            block_size: unit,
            block_stride: unit,
            cell_size: unit,
            nbins: 9,
        };
        assert!(matches!(g.validate(), Err(Error::InvalidGeometry(_))));
    }
}
