pub mod arrow;
pub mod csv;
pub mod parquet;
pub mod parse;

pub use self::arrow::{PositionsToArrow, positions_from_record_batch};
pub use self::csv::{
    CsvPositionConfig, CsvToPositions, PositionFormat, PositionSource, csv_to_position_csv,
};
pub use self::parquet::{PositionsToParquet, read_parquet, write_parquet};
pub use self::parse::{parse_position, parse_position_json, parse_world_value};
