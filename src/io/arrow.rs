use crate::core::{Double3, Float3, Int3};
use crate::error::LargePosError;
use crate::position::{LargePosition, positions_to_world};
use arrow_array::{Array, Float32Array, Float64Array, Int32Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use rayon::prelude::*;
use std::sync::Arc;

/// Schema of [`PositionsToArrow::to_record_batch`].
pub fn position_schema() -> Schema {
    Schema::new(vec![
        Field::new("position_key", DataType::Utf8, false),
        Field::new("global_x", DataType::Int32, false),
        Field::new("global_y", DataType::Int32, false),
        Field::new("global_z", DataType::Int32, false),
        Field::new("local_x", DataType::Float32, false),
        Field::new("local_y", DataType::Float32, false),
        Field::new("local_z", DataType::Float32, false),
        Field::new("world_x", DataType::Float64, false),
        Field::new("world_y", DataType::Float64, false),
        Field::new("world_z", DataType::Float64, false),
    ])
}

/// Trait for converting collections of [`LargePosition`]s to Arrow.
///
/// Implemented for `[LargePosition]` and `Vec<LargePosition>`.
pub trait PositionsToArrow {
    /// Converts positions to a RecordBatch with key, raw pair, and absolute coordinates.
    fn to_record_batch(&self) -> Result<RecordBatch, LargePosError>;
}

impl PositionsToArrow for [LargePosition] {
    fn to_record_batch(&self) -> Result<RecordBatch, LargePosError> {
        let keys: Vec<String> = self.par_iter().map(LargePosition::to_key).collect();
        let world: Vec<Double3> = positions_to_world(self);

        let keys: StringArray = keys.iter().map(|k| Some(k.as_str())).collect();
        let global = |f: fn(&Int3) -> i32| -> Int32Array {
            self.iter().map(|p| Some(f(&p.global))).collect()
        };
        let local = |f: fn(&Float3) -> f32| -> Float32Array {
            self.iter().map(|p| Some(f(&p.local))).collect()
        };
        let absolute = |f: fn(&Double3) -> f64| -> Float64Array {
            world.iter().map(|w| Some(f(w))).collect()
        };

        RecordBatch::try_new(
            Arc::new(position_schema()),
            vec![
                Arc::new(keys),
                Arc::new(global(|v| v.x)),
                Arc::new(global(|v| v.y)),
                Arc::new(global(|v| v.z)),
                Arc::new(local(|v| v.x)),
                Arc::new(local(|v| v.y)),
                Arc::new(local(|v| v.z)),
                Arc::new(absolute(|v| v.x)),
                Arc::new(absolute(|v| v.y)),
                Arc::new(absolute(|v| v.z)),
            ],
        )
        .map_err(|e| LargePosError::ArrowError(e.to_string()))
    }
}

impl PositionsToArrow for Vec<LargePosition> {
    fn to_record_batch(&self) -> Result<RecordBatch, LargePosError> {
        self.as_slice().to_record_batch()
    }
}

fn column<'b, A: Array + 'static>(
    batch: &'b RecordBatch,
    name: &str,
) -> Result<&'b A, LargePosError> {
    let array = batch
        .column_by_name(name)
        .ok_or_else(|| LargePosError::ArrowError(format!("Column '{}' not found", name)))?;
    if array.null_count() > 0 {
        return Err(LargePosError::ArrowError(format!(
            "Column '{}' contains nulls",
            name
        )));
    }
    array.as_any().downcast_ref::<A>().ok_or_else(|| {
        LargePosError::ArrowError(format!(
            "Column '{}' has type {}",
            name,
            array.data_type()
        ))
    })
}

/// Reads the raw `(global, local)` pairs back from a batch.
///
/// Only the `global_*` and `local_*` columns are used; each pair is validated as in
/// [`LargePosition::try_from_raw_parts`].
pub fn positions_from_record_batch(
    batch: &RecordBatch,
) -> Result<Vec<LargePosition>, LargePosError> {
    let gx = column::<Int32Array>(batch, "global_x")?;
    let gy = column::<Int32Array>(batch, "global_y")?;
    let gz = column::<Int32Array>(batch, "global_z")?;
    let lx = column::<Float32Array>(batch, "local_x")?;
    let ly = column::<Float32Array>(batch, "local_y")?;
    let lz = column::<Float32Array>(batch, "local_z")?;

    (0..batch.num_rows())
        .map(|i| {
            LargePosition::try_from_raw_parts(
                Int3::new(gx.value(i), gy.value(i), gz.value(i)),
                Float3::new(lx.value(i), ly.value(i), lz.value(i)),
            )
        })
        .collect()
}
