use core::fmt;
use core::str::FromStr;
use std::collections::BTreeMap;

use hog_core::Size2;
use hog_features::HogGeometry;
use serde::{Deserialize, Serialize};

use crate::HostError;
use crate::value::{HostValue, Matrix};

pub const FIELD_WINDOW_SIZE: &str = "WindowSize";
pub const FIELD_CELL_SIZE: &str = "CellSize";
pub const FIELD_BLOCK_SIZE: &str = "BlockSize";
pub const FIELD_BLOCK_OVERLAP: &str = "BlockOverlap";
pub const FIELD_NUM_BINS: &str = "NumBins";
pub const FIELD_BIN_ORDER: &str = "BinOrder";

/// How runs of 9 feature values are reordered after compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinOrder {
    /// Reverse each run of 9 only when the descriptor has 9 bins.
    #[default]
    Auto,
    /// Always reverse each complete run of 9, whatever the bin count.
    Legacy,
    /// Keep the descriptor's native order.
    Native,
}

impl BinOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Legacy => "legacy",
            Self::Native => "native",
        }
    }
}

impl fmt::Display for BinOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for BinOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "legacy" => Ok(Self::Legacy),
            "native" => Ok(Self::Native),
            other => Err(format!(
                "unknown bin order '{other}', expected auto, legacy or native"
            )),
        }
    }
}

/// Descriptor configuration as supplied by a caller.
///
/// Pairs are `[height, width]`. `block_size` and `block_overlap` are counted
/// in cells; [`geometry`](Self::geometry) converts them to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HogConfig {
    pub window_size: [usize; 2],
    pub cell_size: [usize; 2],
    pub block_size: [usize; 2],
    pub block_overlap: [usize; 2],
    pub num_bins: usize,
    #[serde(default)]
    pub bin_order: BinOrder,
}

impl HogConfig {
    /// Pixel geometry, validated.
    pub fn geometry(&self) -> Result<HogGeometry, HostError> {
        let cell = hw(self.cell_size);
        let overflow = |what: &str| {
            hog_features::Error::InvalidGeometry(format!("{what} in pixels overflows"))
        };
        let block = hw(self.block_size)
            .checked_mul(cell)
            .ok_or_else(|| overflow("block size"))?;
        let stride = hw(self.block_overlap)
            .checked_mul(cell)
            .ok_or_else(|| overflow("block overlap"))?;

        let geometry = HogGeometry {
            win_size: hw(self.window_size),
            block_size: block,
            block_stride: stride,
            cell_size: cell,
            nbins: self.num_bins,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Parses the host configuration record.
    ///
    /// Every required field must be present and hold non-negative integers;
    /// integral `double` values are accepted.
    pub fn from_record(fields: &BTreeMap<String, HostValue>) -> Result<Self, HostError> {
        let bin_order = match fields.get(FIELD_BIN_ORDER) {
            None => BinOrder::default(),
            Some(value) => value
                .as_str()
                .ok_or_else(|| {
                    HostError::MissingConfiguration(format!(
                        "field '{FIELD_BIN_ORDER}' must be a string"
                    ))
                })?
                .parse()
                .map_err(|e| {
                    HostError::MissingConfiguration(format!("field '{FIELD_BIN_ORDER}': {e}"))
                })?,
        };

        Ok(Self {
            window_size: read_pair(fields, FIELD_WINDOW_SIZE)?,
            cell_size: read_pair(fields, FIELD_CELL_SIZE)?,
            block_size: read_pair(fields, FIELD_BLOCK_SIZE)?,
            block_overlap: read_pair(fields, FIELD_BLOCK_OVERLAP)?,
            num_bins: read_scalar(fields, FIELD_NUM_BINS)?,
            bin_order,
        })
    }

    /// Host record equivalent of this config, with `double` pairs.
    pub fn to_record(&self) -> HostValue {
        let pair = |p: [usize; 2]| HostValue::from(Matrix::pair_f64(p[0] as f64, p[1] as f64));
        HostValue::record([
            (FIELD_WINDOW_SIZE, pair(self.window_size)),
            (FIELD_CELL_SIZE, pair(self.cell_size)),
            (FIELD_BLOCK_SIZE, pair(self.block_size)),
            (FIELD_BLOCK_OVERLAP, pair(self.block_overlap)),
            (
                FIELD_NUM_BINS,
                Matrix::scalar_f64(self.num_bins as f64).into(),
            ),
            (FIELD_BIN_ORDER, HostValue::string(self.bin_order.as_str())),
        ])
    }
}

fn hw(pair: [usize; 2]) -> Size2 {
    Size2::from_hw(pair[0], pair[1])
}

fn read_integers(
    fields: &BTreeMap<String, HostValue>,
    name: &str,
    count: usize,
) -> Result<Vec<usize>, HostError> {
    let missing = |what: String| HostError::MissingConfiguration(format!("field '{name}' {what}"));

    let value = fields
        .get(name)
        .ok_or_else(|| missing("is required".into()))?;
    let matrix = value
        .as_matrix()
        .ok_or_else(|| missing(format!("must be numeric, got {}", value.kind())))?;
    if matrix.len() != count {
        return Err(missing(format!(
            "must have {count} element(s), got {}",
            matrix.len()
        )));
    }
    let ints = matrix
        .to_integers()
        .ok_or_else(|| missing("must hold integer values".into()))?;

    ints.into_iter()
        .map(|v| usize::try_from(v).map_err(|_| missing(format!("must be non-negative, got {v}"))))
        .collect()
}

fn read_pair(fields: &BTreeMap<String, HostValue>, name: &str) -> Result<[usize; 2], HostError> {
    let v = read_integers(fields, name, 2)?;
    Ok([v[0], v[1]])
}

fn read_scalar(fields: &BTreeMap<String, HostValue>, name: &str) -> Result<usize, HostError> {
    Ok(read_integers(fields, name, 1)?[0])
}
