//! Host-facing command surface for HOG feature extraction.
//!
//! A [`Session`] owns at most one [`DescriptorHandle`] and routes three
//! commands to it through [`Session::dispatch`]:
//!
//! | command     | argument             | outputs                 |
//! |-------------|----------------------|-------------------------|
//! | `construct` | configuration record | none                    |
//! | `compute`   | `uint8` 2-D matrix   | one `1 x N` `single` row |
//! | `destroy`   | none                 | none                    |
//!
//! Calls fail with a [`HostError`] and leave the session untouched. Calling
//! `compute` without a constructed descriptor is an error, not a no-op.
//! `destroy` is idempotent.
//!
//! The configuration record carries `WindowSize`, `CellSize`, `BlockSize`
//! (cells), `BlockOverlap` (cells) as `[height, width]` pairs, `NumBins`, and
//! optionally `BinOrder`. Typed callers can skip the record and use
//! [`HogConfig`] with [`Session::construct`] directly.
//!
//! Feature values come out in runs of 9 reversed when the descriptor has 9
//! bins (see [`BinOrder`]).

mod config;
mod error;
mod handle;
mod reorder;
mod session;
mod value;

pub use config::{
    BinOrder, FIELD_BIN_ORDER, FIELD_BLOCK_OVERLAP, FIELD_BLOCK_SIZE, FIELD_CELL_SIZE,
    FIELD_NUM_BINS, FIELD_WINDOW_SIZE, HogConfig,
};
pub use error::HostError;
pub use handle::DescriptorHandle;
pub use reorder::{REVERSED_RUN_LEN, apply_bin_order, reverse_runs};
pub use session::{Command, Session};
pub use value::{ElementClass, HostValue, Matrix, MatrixData};
