//! Values exchanged with the host environment.
//!
//! Matrices follow the host convention: `dims[0]` is the row count, storage is
//! column-major (`data[c * rows + r]`).

use core::fmt;
use std::collections::BTreeMap;

use hog_core::{Error, ImageView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementClass {
    U8,
    I32,
    F32,
    F64,
}

impl fmt::Display for ElementClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::U8 => "uint8",
            Self::I32 => "int32",
            Self::F32 => "single",
            Self::F64 => "double",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatrixData {
    U8(Vec<u8>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl MatrixData {
    pub fn class(&self) -> ElementClass {
        match self {
            Self::U8(_) => ElementClass::U8,
            Self::I32(_) => ElementClass::I32,
            Self::F32(_) => ElementClass::F32,
            Self::F64(_) => ElementClass::F64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    dims: Vec<usize>,
    data: MatrixData,
}

impl Matrix {
    /// Checks that `dims` describes exactly `data.len()` elements.
    pub fn new(dims: Vec<usize>, data: MatrixData) -> Result<Self, Error> {
        let expected = dims
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or(Error::SizeMismatch {
                expected: usize::MAX,
                actual: data.len(),
            })?;
        if expected != data.len() {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { dims, data })
    }

    /// `1 x N` single-precision row vector.
    pub fn row_vector_f32(values: Vec<f32>) -> Self {
        Self {
            dims: vec![1, values.len()],
            data: MatrixData::F32(values),
        }
    }

    pub fn scalar_f64(value: f64) -> Self {
        Self {
            dims: vec![1, 1],
            data: MatrixData::F64(vec![value]),
        }
    }

    /// `1 x 2` double row vector, the host's default numeric pair.
    pub fn pair_f64(first: f64, second: f64) -> Self {
        Self {
            dims: vec![1, 2],
            data: MatrixData::F64(vec![first, second]),
        }
    }

    /// Column-major `uint8` matrix with the same rows/cols as `img`.
    pub fn from_image_u8(img: &ImageView<'_, u8>) -> Self {
        let rows = img.height();
        let cols = img.width();
        let mut data = Vec::with_capacity(rows * cols);
        for c in 0..cols {
            for r in 0..rows {
                data.push(img.row(r)[c]);
            }
        }
        Self {
            dims: vec![rows, cols],
            data: MatrixData::U8(data),
        }
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn data(&self) -> &MatrixData {
        &self.data
    }

    pub fn class(&self) -> ElementClass {
        self.data.class()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Elements as integers, in storage order.
    ///
    /// `None` if any floating element is non-finite or has a fractional part.
    pub fn to_integers(&self) -> Option<Vec<i64>> {
        match &self.data {
            MatrixData::U8(v) => Some(v.iter().map(|&x| x as i64).collect()),
            MatrixData::I32(v) => Some(v.iter().map(|&x| x as i64).collect()),
            MatrixData::F32(v) => v.iter().map(|&x| integral(x as f64)).collect(),
            MatrixData::F64(v) => v.iter().map(|&x| integral(x)).collect(),
        }
    }
}

fn integral(x: f64) -> Option<i64> {
    (x.is_finite() && x.fract() == 0.0 && x.abs() < i64::MAX as f64).then_some(x as i64)
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    Str(String),
    Record(BTreeMap<String, HostValue>),
    Matrix(Matrix),
}

impl HostValue {
    pub fn string(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    pub fn record<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, HostValue)>,
    {
        Self::Record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&BTreeMap<String, HostValue>> {
        match self {
            Self::Record(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&Matrix> {
        match self {
            Self::Matrix(m) => Some(m),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Record(_) => "record",
            Self::Matrix(_) => "matrix",
        }
    }
}

impl From<Matrix> for HostValue {
    fn from(m: Matrix) -> Self {
        Self::Matrix(m)
    }
}
