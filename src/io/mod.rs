mod cursor;
mod endian;

pub use cursor::ByteCursor;
pub use endian::{
    read_u16_be, read_u16_le, read_u32_be, read_u32_le, read_u64_be, read_u64_le, ByteOrder,
};
