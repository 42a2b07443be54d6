// ============================================================
// Layer 4: Safetensors Payloads
// ============================================================
// Reads and writes the named tensors the pipeline exchanges with
// disk. A sample file holds one tensor under a fixed key
// ("regions" by default):
//
//   class0/clip_001.safetensors
//     └── "regions": U8 [32, 32, 14]   (14 samples, last axis)
//
// Supported input dtypes are U8, U16, F32 and F64; everything is
// converted to f32 on read. Values are little-endian, as the
// safetensors format requires.

use std::{fs, path::Path};

use ndarray::{ArrayD, ArrayViewD, IxDyn};
use safetensors::{tensor::TensorView, Dtype, SafeTensorError, SafeTensors};

use crate::domain::error::{PipelineError, PipelineResult};

/// One tensor ready to be serialised: dtype, shape and raw LE bytes.
#[derive(Debug, Clone)]
pub struct RawTensor {
    dtype: Dtype,
    shape: Vec<usize>,
    bytes: Vec<u8>,
}

impl RawTensor {
    pub fn from_f32(array: ArrayViewD<'_, f32>) -> Self {
        Self {
            dtype: Dtype::F32,
            shape: array.shape().to_vec(),
            bytes: array.iter().flat_map(|v| v.to_le_bytes()).collect(),
        }
    }

    pub fn from_u8(array: ArrayViewD<'_, u8>) -> Self {
        Self {
            dtype: Dtype::U8,
            shape: array.shape().to_vec(),
            bytes: array.iter().copied().collect(),
        }
    }

    pub fn from_i64(values: &[i64]) -> Self {
        Self {
            dtype: Dtype::I64,
            shape: vec![values.len()],
            bytes: values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        }
    }
}

/// Write `tensors` to a single safetensors file at `path`.
pub fn write_tensors(path: &Path, tensors: &[(&str, RawTensor)]) -> PipelineResult<()> {
    let views = tensors
        .iter()
        .map(|(name, t)| {
            TensorView::new(t.dtype, t.shape.clone(), &t.bytes)
                .map(|view| (name.to_string(), view))
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| decode_error(path, e))?;

    let bytes = safetensors::serialize(views, &None).map_err(|e| decode_error(path, e))?;

    fs::write(path, bytes).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the tensor named `key` from `path` as f32.
///
/// Rejects NaN and infinities so later stages can assume finite
/// pixel values.
pub fn read_f32(path: &Path, key: &str) -> PipelineResult<ArrayD<f32>> {
    let bytes = read_file(path)?;
    let tensors = SafeTensors::deserialize(&bytes).map_err(|e| decode_error(path, e))?;
    let view = lookup(&tensors, path, key)?;

    let values: Vec<f32> = match view.dtype() {
        Dtype::U8  => view.data().iter().map(|&b| f32::from(b)).collect(),
        Dtype::U16 => view
            .data()
            .chunks_exact(2)
            .map(|c| f32::from(u16::from_le_bytes([c[0], c[1]])))
            .collect(),
        Dtype::F32 => view
            .data()
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect(),
        Dtype::F64 => view
            .data()
            .chunks_exact(8)
            .map(|c| {
                let mut b = [0u8; 8];
                b.copy_from_slice(c);
                f64::from_le_bytes(b) as f32
            })
            .collect(),
        other => {
            return Err(PipelineError::UnsupportedDtype {
                path:  path.to_path_buf(),
                dtype: format!("{other:?}"),
            })
        }
    };

    if values.iter().any(|v| !v.is_finite()) {
        return Err(invalid(path, "contains NaN or infinite values"));
    }

    ArrayD::from_shape_vec(IxDyn(view.shape()), values)
        .map_err(|e| invalid(path, &e.to_string()))
}

/// Read the I64 tensor named `key` from `path`.
pub fn read_i64(path: &Path, key: &str) -> PipelineResult<Vec<i64>> {
    let bytes = read_file(path)?;
    let tensors = SafeTensors::deserialize(&bytes).map_err(|e| decode_error(path, e))?;
    let view = lookup(&tensors, path, key)?;

    if view.dtype() != Dtype::I64 {
        return Err(PipelineError::UnsupportedDtype {
            path:  path.to_path_buf(),
            dtype: format!("{:?}", view.dtype()),
        });
    }

    Ok(view
        .data()
        .chunks_exact(8)
        .map(|c| {
            let mut b = [0u8; 8];
            b.copy_from_slice(c);
            i64::from_le_bytes(b)
        })
        .collect())
}

fn read_file(path: &Path) -> PipelineResult<Vec<u8>> {
    fs::read(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn lookup<'a>(tensors: &'a SafeTensors<'a>, path: &Path, key: &str) -> PipelineResult<TensorView<'a>> {
    tensors.tensor(key).map_err(|e| match e {
        SafeTensorError::TensorNotFound(_) => PipelineError::MissingKey {
            path: path.to_path_buf(),
            key:  key.to_string(),
        },
        other => decode_error(path, other),
    })
}

fn decode_error(path: &Path, e: SafeTensorError) -> PipelineError {
    PipelineError::Decode {
        path:    path.to_path_buf(),
        message: format!("{e:?}"),
    }
}

fn invalid(path: &Path, reason: &str) -> PipelineError {
    PipelineError::InvalidPayload {
        path:   path.to_path_buf(),
        reason: reason.to_string(),
    }
}
