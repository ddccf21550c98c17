use crate::core::constants::{KEY_BYTES, KEY_VERSION};
use crate::core::{Float3, Int3};
use crate::error::LargePosError;
use crate::position::LargePosition;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Generates a compact key for a position's exact `(global, local)` pair.
///
/// The key is a URL-safe Base64 string encoding a 26-byte binary structure.
/// It preserves the representation bit for bit, so two equal positions with
/// different representations produce different keys.
///
/// # Binary Format
///
/// | Offset | Size | Field    | Description                                  |
/// |--------|------|----------|----------------------------------------------|
/// | 0      | 1    | Version  | Key format version (currently 1)            |
/// | 1      | 12   | Global   | Cell index x, y, z as big-endian `i32`       |
/// | 13     | 12   | Local    | Local offset x, y, z as big-endian `f32` bits|
/// | 25     | 1    | Checksum | Wrapping sum of bytes 0-24 for validation    |
///
/// # Example
/// ```
/// use largepos_rs::{Float3, Int3, LargePosition, encode_position_key};
///
/// let pos = LargePosition::from_raw_parts(Int3::new(1, 2, 3), Float3::new(0.5, 0.0, -8.0));
/// let key = encode_position_key(&pos);
/// assert_eq!(key.len(), 35);
/// ```
pub fn encode_position_key(position: &LargePosition) -> String {
    let mut binary_data = Vec::with_capacity(KEY_BYTES);
    binary_data.push(KEY_VERSION);
    for component in [position.global.x, position.global.y, position.global.z] {
        binary_data.extend_from_slice(&component.to_be_bytes());
    }
    for component in [position.local.x, position.local.y, position.local.z] {
        binary_data.extend_from_slice(&component.to_bits().to_be_bytes());
    }

    let checksum: u8 = binary_data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    binary_data.push(checksum);

    URL_SAFE_NO_PAD.encode(&binary_data)
}

/// Decodes a position key back to the exact `(global, local)` pair it was made from.
///
/// # Errors
///
/// - [`LargePosError::Base64DecodeError`] - Invalid Base64 encoding
/// - [`LargePosError::InvalidKeyLength`] - Decoded data is not 26 bytes
/// - [`LargePosError::InvalidChecksum`] - Checksum validation failed
/// - [`LargePosError::UnsupportedVersion`] - Version byte doesn't match current version
/// - [`LargePosError::LargeMovement`] - Local offset is non-finite or beyond `3 * CELL_SIZE`
pub fn decode_position_key(key: &str) -> Result<LargePosition, LargePosError> {
    let binary_data = URL_SAFE_NO_PAD
        .decode(key.trim())
        .map_err(|_| LargePosError::Base64DecodeError)?;

    if binary_data.len() != KEY_BYTES {
        return Err(LargePosError::InvalidKeyLength);
    }

    let (data, checksum_bytes) = binary_data.split_at(KEY_BYTES - 1);
    let checksum = checksum_bytes[0];

    let calculated_checksum: u8 = data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    if calculated_checksum != checksum {
        return Err(LargePosError::InvalidChecksum);
    }

    let version = data[0];
    if version != KEY_VERSION {
        return Err(LargePosError::UnsupportedVersion(version));
    }

    let word = |i: usize| -> Result<[u8; 4], LargePosError> {
        let start = 1 + i * 4;
        data[start..start + 4]
            .try_into()
            .map_err(|_| LargePosError::InvalidKeyLength)
    };

    let global = Int3::new(
        i32::from_be_bytes(word(0)?),
        i32::from_be_bytes(word(1)?),
        i32::from_be_bytes(word(2)?),
    );
    let local = Float3::new(
        f32::from_bits(u32::from_be_bytes(word(3)?)),
        f32::from_bits(u32::from_be_bytes(word(4)?)),
        f32::from_bits(u32::from_be_bytes(word(5)?)),
    );

    LargePosition::try_from_raw_parts(global, local)
}
