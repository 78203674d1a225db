use std::io::{self, Read};

use crate::error::ConvertError;

/// Magic number opening an IDX label file (one unsigned byte per item).
pub const LABEL_MAGIC: u32 = 0x0000_0801;

/// Magic number opening an IDX image file (rows x columns bytes per item).
pub const IMAGE_MAGIC: u32 = 0x0000_0803;

/// Parsed header of an image file. The reader is left positioned at byte 16,
/// immediately before the first pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub count: u32,
    pub rows: u32,
    pub columns: u32,
}

impl ImageHeader {
    /// Bytes occupied by one image in the input stream.
    pub fn pixels_per_image(&self) -> usize {
        self.rows as usize * self.columns as usize
    }
}

/// Parsed header of a label file. The reader is left positioned at byte 8,
/// immediately before the first label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelHeader {
    pub count: u32,
}

pub fn read_image_header<R: Read>(reader: &mut R) -> Result<ImageHeader, ConvertError> {
    check_magic(reader, IMAGE_MAGIC)?;
    let count = read_field(reader, "item count")?;
    let rows = read_field(reader, "row count")?;
    let columns = read_field(reader, "column count")?;
    Ok(ImageHeader {
        count,
        rows,
        columns,
    })
}

pub fn read_label_header<R: Read>(reader: &mut R) -> Result<LabelHeader, ConvertError> {
    check_magic(reader, LABEL_MAGIC)?;
    let count = read_field(reader, "item count")?;
    Ok(LabelHeader { count })
}

fn check_magic<R: Read>(reader: &mut R, expected: u32) -> Result<(), ConvertError> {
    let found = read_field(reader, "magic number")?;
    if found != expected {
        return Err(ConvertError::BadMagic { found, expected });
    }
    Ok(())
}

/// All header fields are 32-bit big-endian integers read back to back.
fn read_field<R: Read>(reader: &mut R, field: &'static str) -> Result<u32, ConvertError> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf).map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => ConvertError::TruncatedHeader { field },
        _ => ConvertError::Io(err),
    })?;
    Ok(u32::from_be_bytes(buf))
}
