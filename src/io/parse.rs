use crate::error::LargePosError;
use crate::index::decode_position_key;
use crate::position::LargePosition;

/// Parses a position string, auto-detecting JSON or a position key.
///
/// JSON is detected by a leading `{` and must hold the raw pair, as written by
/// `serde_json::to_string(&position)`. Everything else is decoded as a position key.
/// Either way the offset is validated as in [`LargePosition::try_from_raw_parts`].
pub fn parse_position(s: &str) -> Result<LargePosition, LargePosError> {
    let trimmed = s.trim();
    if trimmed.starts_with('{') {
        parse_position_json(trimmed)
    } else {
        decode_position_key(trimmed)
    }
}

/// Parses a JSON object `{"global":{"x":..,"y":..,"z":..},"local":{..}}`.
pub fn parse_position_json(s: &str) -> Result<LargePosition, LargePosError> {
    let raw: LargePosition =
        serde_json::from_str(s).map_err(|e| LargePosError::InvalidPosition(e.to_string()))?;
    LargePosition::try_from_raw_parts(raw.global, raw.local)
}

/// Parses one absolute coordinate value. Surrounding whitespace is ignored.
pub fn parse_world_value(s: &str) -> Result<f64, LargePosError> {
    let trimmed = s.trim();
    trimmed
        .parse()
        .map_err(|_| LargePosError::InvalidPosition(format!("Invalid coordinate: '{}'", trimmed)))
}
