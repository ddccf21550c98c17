mod identifier;
mod indexing;

pub use identifier::{decode_position_key, encode_position_key};
pub use indexing::{cell_separation, cell_to_world, world_to_cell};
pub(crate) use indexing::{check_offset, rebase_offset};
