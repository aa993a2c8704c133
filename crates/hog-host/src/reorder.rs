use crate::config::BinOrder;

/// Run length of the fixed reversal, independent of the bin count.
pub const REVERSED_RUN_LEN: usize = 9;

/// Reverses every complete run of `run` values in place. A trailing partial
/// run is left as is.
pub fn reverse_runs(values: &mut [f32], run: usize) {
    if run < 2 {
        return;
    }
    for chunk in values.chunks_exact_mut(run) {
        chunk.reverse();
    }
}

/// Applies `order` to a freshly computed descriptor with `nbins` bins.
pub fn apply_bin_order(values: &mut [f32], order: BinOrder, nbins: usize) {
    let reverse = match order {
        BinOrder::Auto => nbins == REVERSED_RUN_LEN,
        BinOrder::Legacy => true,
        BinOrder::Native => false,
    };
    if reverse {
        reverse_runs(values, REVERSED_RUN_LEN);
    }
}
