use crate::core::Int3;
use crate::error::LargePosError;
use crate::io::parse::{parse_position, parse_world_value};
use crate::position::LargePosition;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};

enum SourceIndices {
    World { x_idx: usize, y_idx: usize, z_idx: usize },
    Position(usize),
}

/// Columns written in front of the passed-through fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionFormat {
    /// `global_x, global_y, global_z, local_x, local_y, local_z`
    #[default]
    Columns,
    /// A single `position_key` column
    Key,
    /// A single `position_json` column holding the raw pair
    Json,
    /// `world_x, world_y, world_z` in double precision
    World,
}

impl PositionFormat {
    fn headers(self) -> &'static [&'static str] {
        match self {
            PositionFormat::Columns => &[
                "global_x", "global_y", "global_z", "local_x", "local_y", "local_z",
            ],
            PositionFormat::Key => &["position_key"],
            PositionFormat::Json => &["position_json"],
            PositionFormat::World => &["world_x", "world_y", "world_z"],
        }
    }

    fn fields(self, position: &LargePosition) -> Result<Vec<String>, LargePosError> {
        Ok(match self {
            PositionFormat::Columns => vec![
                position.global.x.to_string(),
                position.global.y.to_string(),
                position.global.z.to_string(),
                position.local.x.to_string(),
                position.local.y.to_string(),
                position.local.z.to_string(),
            ],
            PositionFormat::Key => vec![position.to_key()],
            PositionFormat::Json => vec![
                serde_json::to_string(position)
                    .map_err(|e| LargePosError::CsvError(e.to_string()))?,
            ],
            PositionFormat::World => {
                let world = position.to_double3();
                vec![world.x.to_string(), world.y.to_string(), world.z.to_string()]
            }
        })
    }
}

#[derive(Debug, Clone)]
pub enum PositionSource {
    /// Three absolute-coordinate columns
    WorldColumns {
        x_column: String,
        y_column: String,
        z_column: String,
    },
    /// One column holding a position key or a JSON position
    PositionColumn(String),
}

#[derive(Debug, Clone)]
pub struct CsvPositionConfig {
    pub source: PositionSource,
    pub exclude_columns: Vec<String>,
    pub output: PositionFormat,
    pub reference_cell: Option<Int3>,
    pub skip_invalid: bool,
}

impl CsvPositionConfig {
    /// Create config for a CSV with absolute x/y/z coordinate columns.
    ///
    /// # Example
    /// ```
    /// use largepos_rs::{CsvPositionConfig, PositionFormat};
    ///
    /// let config = CsvPositionConfig::from_world("x", "y", "z").output(PositionFormat::Key);
    /// ```
    pub fn from_world(
        x_column: impl Into<String>,
        y_column: impl Into<String>,
        z_column: impl Into<String>,
    ) -> Self {
        Self::with_source(PositionSource::WorldColumns {
            x_column: x_column.into(),
            y_column: y_column.into(),
            z_column: z_column.into(),
        })
    }

    /// Create config for a CSV with one column of position keys or JSON positions.
    ///
    /// # Example
    /// ```
    /// use largepos_rs::{CsvPositionConfig, Int3, PositionFormat};
    ///
    /// let config = CsvPositionConfig::from_position("position_key")
    ///     .output(PositionFormat::World)
    ///     .reference_cell(Int3::new(1000, 0, 0));
    /// ```
    pub fn from_position(column: impl Into<String>) -> Self {
        Self::with_source(PositionSource::PositionColumn(column.into()))
    }

    fn with_source(source: PositionSource) -> Self {
        Self {
            source,
            exclude_columns: Vec::new(),
            output: PositionFormat::default(),
            reference_cell: None,
            skip_invalid: false,
        }
    }

    pub fn exclude(mut self, columns: Vec<String>) -> Self {
        self.exclude_columns = columns;
        self
    }

    pub fn output(mut self, format: PositionFormat) -> Self {
        self.output = format;
        self
    }

    // Adds rel_x..z: offsets relative to this cell.
    pub fn reference_cell(mut self, cell: Int3) -> Self {
        self.reference_cell = Some(cell);
        self
    }

    pub fn skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = skip;
        self
    }
}

pub trait CsvToPositions {
    fn to_position_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvPositionConfig,
    ) -> Result<(), LargePosError>;
}

impl<P: AsRef<Path>> CsvToPositions for P {
    fn to_position_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvPositionConfig,
    ) -> Result<(), LargePosError> {
        csv_to_position_csv(self, output_path, config)
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, LargePosError> {
    if name.is_empty() {
        return Err(LargePosError::CsvError(
            "Column name cannot be empty".to_string(),
        ));
    }
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| LargePosError::CsvError(format!("Column '{}' not found", name)))
}

fn field<'r>(record: &'r csv::StringRecord, idx: usize) -> Result<&'r str, LargePosError> {
    record
        .get(idx)
        .ok_or_else(|| LargePosError::CsvError(format!("Missing column at index {}", idx)))
}

fn read_position(
    record: &csv::StringRecord,
    source: &SourceIndices,
) -> Result<LargePosition, LargePosError> {
    match source {
        SourceIndices::World { x_idx, y_idx, z_idx } => {
            let x = parse_world_value(field(record, *x_idx)?)?;
            let y = parse_world_value(field(record, *y_idx)?)?;
            let z = parse_world_value(field(record, *z_idx)?)?;
            LargePosition::from_world(&(x, y, z))
        }
        SourceIndices::Position(idx) => parse_position(field(record, *idx)?),
    }
}

fn position_fields(
    position: &LargePosition,
    config: &CsvPositionConfig,
) -> Result<Vec<String>, LargePosError> {
    let mut row = config.output.fields(position)?;
    if let Some(cell) = config.reference_cell {
        let relative = position.try_to_float3(cell)?;
        row.extend([
            relative.x.to_string(),
            relative.y.to_string(),
            relative.z.to_string(),
        ]);
    }
    Ok(row)
}

/// Converts a CSV file of absolute coordinates or encoded positions to a CSV file of positions.
///
/// Streams rows, so memory use does not grow with the file. The source columns and any
/// excluded columns are dropped, the position columns chosen by [`PositionFormat`] are
/// written first, and every other field is passed through in order.
///
/// A row whose position cannot be built (unparseable value, out-of-range coordinate, offset
/// not representable relative to the reference cell) fails the whole conversion, unless
/// `skip_invalid(true)` is set, in which case it is logged and left out.
///
/// # Example
///
/// ```no_run
/// use largepos_rs::{csv_to_position_csv, CsvPositionConfig, PositionFormat};
///
/// let config = CsvPositionConfig::from_world("x", "y", "z")
///     .exclude(vec!["notes".into()])
///     .output(PositionFormat::Key)
///     .skip_invalid(true);
///
/// csv_to_position_csv("bodies.csv", "positions.csv", &config).unwrap();
/// ```
pub fn csv_to_position_csv(
    csv_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &CsvPositionConfig,
) -> Result<(), LargePosError> {
    let csv_path = csv_path.as_ref();
    let file = File::open(csv_path).map_err(|e| LargePosError::IoError(e.to_string()))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| LargePosError::CsvError(e.to_string()))?
        .clone();

    let (source_indices, mut exclude_indices) = match &config.source {
        PositionSource::WorldColumns {
            x_column,
            y_column,
            z_column,
        } => {
            let x_idx = column_index(&headers, x_column)?;
            let y_idx = column_index(&headers, y_column)?;
            let z_idx = column_index(&headers, z_column)?;
            (
                SourceIndices::World { x_idx, y_idx, z_idx },
                HashSet::from([x_idx, y_idx, z_idx]),
            )
        }
        PositionSource::PositionColumn(column) => {
            let idx = column_index(&headers, column)?;
            (SourceIndices::Position(idx), HashSet::from([idx]))
        }
    };

    for col_name in &config.exclude_columns {
        if let Some(idx) = headers.iter().position(|h| h == col_name) {
            exclude_indices.insert(idx);
        }
    }
    debug!(
        input = %csv_path.display(),
        format = ?config.output,
        dropped = exclude_indices.len(),
        "converting csv"
    );

    let out_file = File::create(output_path).map_err(|e| LargePosError::IoError(e.to_string()))?;
    let mut writer = csv::Writer::from_writer(out_file);

    let mut header_row: Vec<&str> = config.output.headers().to_vec();
    if config.reference_cell.is_some() {
        header_row.extend(["rel_x", "rel_y", "rel_z"]);
    }
    for (i, h) in headers.iter().enumerate() {
        if !exclude_indices.contains(&i) {
            header_row.push(h);
        }
    }
    writer
        .write_record(&header_row)
        .map_err(|e| LargePosError::CsvError(e.to_string()))?;

    let mut written = 0usize;
    let mut skipped = 0usize;
    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(|e| LargePosError::CsvError(e.to_string()))?;

        let converted = read_position(&record, &source_indices)
            .and_then(|position| position_fields(&position, config));
        let mut row = match converted {
            Ok(row) => row,
            Err(err) if config.skip_invalid => {
                warn!(row = line + 1, error = %err, "skipping invalid row");
                skipped += 1;
                continue;
            }
            Err(err) => return Err(err),
        };

        for (i, field) in record.iter().enumerate() {
            if !exclude_indices.contains(&i) {
                row.push(field.to_string());
            }
        }
        writer
            .write_record(&row)
            .map_err(|e| LargePosError::CsvError(e.to_string()))?;
        written += 1;
    }

    writer
        .flush()
        .map_err(|e| LargePosError::IoError(e.to_string()))?;

    info!(rows = written, skipped, "csv conversion complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::AU_DISTANCE;
    use crate::core::{Double3, Float3};
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    fn write_input(lines: &[&str]) -> Result<(TempDir, PathBuf, PathBuf), LargePosError> {
        let dir = tempdir().map_err(|e| LargePosError::IoError(e.to_string()))?;
        let csv_path = dir.path().join("input.csv");
        let output_path = dir.path().join("output.csv");

        let mut file = File::create(&csv_path).map_err(|e| LargePosError::IoError(e.to_string()))?;
        for line in lines {
            writeln!(file, "{}", line).map_err(|e| LargePosError::IoError(e.to_string()))?;
        }
        Ok((dir, csv_path, output_path))
    }

    fn read_output(path: &Path) -> Result<Vec<Vec<String>>, LargePosError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .map_err(|e| LargePosError::CsvError(e.to_string()))?;
        reader
            .records()
            .map(|r| {
                r.map(|rec| rec.iter().map(str::to_string).collect::<Vec<_>>())
                    .map_err(|e| LargePosError::CsvError(e.to_string()))
            })
            .collect()
    }

    #[test]
    fn test_world_columns_to_position_columns() -> Result<(), LargePosError> {
        let (_dir, input, output) = write_input(&[
            "name,x,y,z,kind",
            "probe,1000,2000,-2500,craft",
            "rock,2500,0,0,asteroid",
        ])?;

        let config = CsvPositionConfig::from_world("x", "y", "z");
        csv_to_position_csv(&input, &output, &config)?;

        let rows = read_output(&output)?;
        assert_eq!(
            rows[0],
            [
                "global_x", "global_y", "global_z", "local_x", "local_y", "local_z", "name",
                "kind"
            ]
        );
        assert_eq!(rows[1], ["0", "1", "-1", "1000", "-48", "-452", "probe", "craft"]);
        assert_eq!(rows[2], ["1", "0", "0", "452", "0", "0", "rock", "asteroid"]);
        Ok(())
    }

    #[test]
    fn test_key_output_round_trips() -> Result<(), LargePosError> {
        let far = 29.0 * AU_DISTANCE;
        let (_dir, input, output) = write_input(&["id,x,y,z", &format!("a,{},-17.25,3", far)])?;

        let config = CsvPositionConfig::from_world("x", "y", "z").output(PositionFormat::Key);
        input.to_position_csv(&output, &config)?;

        let rows = read_output(&output)?;
        assert_eq!(rows[0], ["position_key", "id"]);

        let decoded = parse_position(&rows[1][0])?;
        let expected = LargePosition::from_double3(Double3::new(far, -17.25, 3.0));
        assert_eq!(decoded.global, expected.global);
        assert_eq!(decoded, expected);
        Ok(())
    }

    #[test]
    fn test_position_column_to_world() -> Result<(), LargePosError> {
        let pos = LargePosition::from_raw_parts(Int3::new(2, 0, -1), Float3::new(10.0, 0.5, 0.0));
        let json = serde_json::to_string(&pos).map_err(|e| LargePosError::CsvError(e.to_string()))?;
        let (_dir, input, output) = write_input(&[
            "label,pos",
            &format!("keyed,{}", pos.to_key()),
            &format!("json,\"{}\"", json.replace('"', "\"\"")),
        ])?;

        let config = CsvPositionConfig::from_position("pos").output(PositionFormat::World);
        csv_to_position_csv(&input, &output, &config)?;

        let rows = read_output(&output)?;
        assert_eq!(rows[0], ["world_x", "world_y", "world_z", "label"]);
        for row in &rows[1..] {
            assert_eq!(row[..3], ["4106", "0.5", "-2048"]);
        }
        Ok(())
    }

    #[test]
    fn test_json_output() -> Result<(), LargePosError> {
        let (_dir, input, output) = write_input(&["x,y,z", "3000,0,0"])?;

        let config = CsvPositionConfig::from_world("x", "y", "z").output(PositionFormat::Json);
        csv_to_position_csv(&input, &output, &config)?;

        let rows = read_output(&output)?;
        assert_eq!(rows[0], ["position_json"]);
        let parsed = parse_position(&rows[1][0])?;
        assert_eq!(parsed.global, Int3::new(1, 0, 0));
        assert_eq!(parsed.local, Float3::new(952.0, 0.0, 0.0));
        Ok(())
    }

    #[test]
    fn test_reference_cell_adds_relative_columns() -> Result<(), LargePosError> {
        let (_dir, input, output) = write_input(&["x,y,z", "4096,100,-2048"])?;

        let config = CsvPositionConfig::from_world("x", "y", "z")
            .output(PositionFormat::Key)
            .reference_cell(Int3::new(1, 0, 0));
        csv_to_position_csv(&input, &output, &config)?;

        let rows = read_output(&output)?;
        assert_eq!(rows[0], ["position_key", "rel_x", "rel_y", "rel_z"]);
        assert_eq!(rows[1][1..], ["2048", "100", "-2048"]);
        Ok(())
    }

    #[test]
    fn test_invalid_row_aborts_by_default() -> Result<(), LargePosError> {
        let (_dir, input, output) =
            write_input(&["x,y,z", "0,0,0", "1e20,0,0", "not-a-number,0,0"])?;

        let config = CsvPositionConfig::from_world("x", "y", "z");
        let result = csv_to_position_csv(&input, &output, &config);
        assert!(matches!(result, Err(LargePosError::OutOfRange { .. })));
        Ok(())
    }

    #[test]
    fn test_skip_invalid_rows() -> Result<(), LargePosError> {
        let (_dir, input, output) = write_input(&[
            "id,x,y,z",
            "ok,0,0,0",
            "far,1e20,0,0",
            "bad,north,0,0",
            "unrepresentable,40960,0,0",
            "also_ok,-2048,0,0",
        ])?;

        let config = CsvPositionConfig::from_world("x", "y", "z")
            .reference_cell(Int3::ZERO)
            .skip_invalid(true);
        csv_to_position_csv(&input, &output, &config)?;

        let rows = read_output(&output)?;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].last().map(String::as_str), Some("ok"));
        assert_eq!(rows[2].last().map(String::as_str), Some("also_ok"));
        Ok(())
    }

    #[test]
    fn test_exclude_columns() -> Result<(), LargePosError> {
        let (_dir, input, output) =
            write_input(&["id,x,y,z,notes,mass", "1,0,0,0,drop me,5.97e24"])?;

        let config = CsvPositionConfig::from_world("x", "y", "z")
            .output(PositionFormat::World)
            .exclude(vec!["notes".into(), "missing".into()]);
        csv_to_position_csv(&input, &output, &config)?;

        let rows = read_output(&output)?;
        assert_eq!(rows[0], ["world_x", "world_y", "world_z", "id", "mass"]);
        assert_eq!(rows[1], ["0", "0", "0", "1", "5.97e24"]);
        Ok(())
    }

    #[test]
    fn test_missing_and_empty_columns() -> Result<(), LargePosError> {
        let (_dir, input, output) = write_input(&["x,y,z", "0,0,0"])?;

        let config = CsvPositionConfig::from_world("x", "y", "altitude");
        let result = csv_to_position_csv(&input, &output, &config);
        assert!(matches!(result, Err(LargePosError::CsvError(msg)) if msg.contains("altitude")));

        let config = CsvPositionConfig::from_position("");
        assert!(csv_to_position_csv(&input, &output, &config).is_err());
        Ok(())
    }

    #[test]
    fn test_missing_input_file() {
        let config = CsvPositionConfig::from_world("x", "y", "z");
        let result = csv_to_position_csv("does/not/exist.csv", "out.csv", &config);
        assert!(matches!(result, Err(LargePosError::IoError(_))));
    }
}
