//! The two conversion routines: image files to pixel CSV, label files to
//! one-hot CSV. Each is a single pass over the input stream; nothing is
//! buffered beyond one item.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, info};

use crate::error::ConvertError;
use crate::header::{read_image_header, read_label_header, ImageHeader, LabelHeader};
use crate::progress::Checkpoints;

/// Number of classes in a one-hot label line.
pub const CLASS_COUNT: usize = 10;

/// Reads an image file from `reader` (positioned at byte 0) and writes one
/// CSV line per image: `rows * columns` decimal pixel values in row-major
/// order, comma-separated, newline-terminated.
///
/// `report` is invoked with percent-complete at quarter checkpoints, and with
/// 100 once the loop finishes (even when the file holds zero images).
pub fn convert_images<R, W, F>(
    reader: &mut R,
    out: &mut W,
    report: F,
) -> Result<ImageHeader, ConvertError>
where
    R: Read,
    W: Write,
    F: FnMut(u8),
{
    let header = read_image_header(reader)?;
    emit_images(reader, &header, out, report)?;
    Ok(header)
}

/// Emits the CSV lines for a stream positioned immediately after the 16-byte
/// image header.
pub fn emit_images<R, W, F>(
    reader: &mut R,
    header: &ImageHeader,
    out: &mut W,
    mut report: F,
) -> Result<(), ConvertError>
where
    R: Read,
    W: Write,
    F: FnMut(u8),
{
    let mut image = vec![0u8; header.pixels_per_image()];
    let mut checkpoints = Checkpoints::new(header.count as u64);

    for index in 0..header.count {
        if let Some(percent) = checkpoints.advance(index as u64) {
            report(percent);
        }
        reader
            .read_exact(&mut image)
            .map_err(|err| truncated(err, index, header.count))?;
        write_pixel_row(out, &image)?;
    }

    report(100);
    Ok(())
}

/// Reads a label file from `reader` (positioned at byte 0) and writes one
/// CSV line per label: ten `0`/`1` tokens with the `1` at the label's index.
///
/// A label byte outside 0-9 produces an all-zero line, not an error; the
/// input domain is trusted.
pub fn convert_labels<R, W, F>(
    reader: &mut R,
    out: &mut W,
    report: F,
) -> Result<LabelHeader, ConvertError>
where
    R: Read,
    W: Write,
    F: FnMut(u8),
{
    let header = read_label_header(reader)?;
    emit_labels(reader, &header, out, report)?;
    Ok(header)
}

/// Emits the one-hot CSV lines for a stream positioned immediately after the
/// 8-byte label header.
pub fn emit_labels<R, W, F>(
    reader: &mut R,
    header: &LabelHeader,
    out: &mut W,
    mut report: F,
) -> Result<(), ConvertError>
where
    R: Read,
    W: Write,
    F: FnMut(u8),
{
    let mut label = [0u8; 1];
    let mut checkpoints = Checkpoints::new(header.count as u64);

    for index in 0..header.count {
        if let Some(percent) = checkpoints.advance(index as u64) {
            report(percent);
        }
        reader
            .read_exact(&mut label)
            .map_err(|err| truncated(err, index, header.count))?;
        write_one_hot_row(out, label[0])?;
    }

    report(100);
    Ok(())
}

/// Converts an image file on disk, logging progress at info level.
pub fn convert_image_file(source: &Path, dest: &Path) -> Result<ImageHeader, ConvertError> {
    info!("Converting {} to {}", source.display(), dest.display());
    let mut reader = open_input(source)?;
    let mut writer = create_output(dest)?;
    let header = convert_images(&mut reader, &mut writer, log_percent)?;
    writer.flush()?;
    debug!(
        "wrote {} lines of {}x{} pixels to {}",
        header.count,
        header.rows,
        header.columns,
        dest.display()
    );
    Ok(header)
}

/// Converts a label file on disk, logging progress at info level.
pub fn convert_label_file(source: &Path, dest: &Path) -> Result<LabelHeader, ConvertError> {
    info!("Converting {} to {}", source.display(), dest.display());
    let mut reader = open_input(source)?;
    let mut writer = create_output(dest)?;
    let header = convert_labels(&mut reader, &mut writer, log_percent)?;
    writer.flush()?;
    debug!("wrote {} one-hot lines to {}", header.count, dest.display());
    Ok(header)
}

// Commas are placed by flat token index: every token except the last is
// followed by one. Equivalent to suppressing the separator at the last
// row/column position, but independent of iteration shape.
fn write_pixel_row<W: Write>(out: &mut W, pixels: &[u8]) -> Result<(), ConvertError> {
    for (position, value) in pixels.iter().enumerate() {
        write!(out, "{}", value)?;
        if position + 1 < pixels.len() {
            out.write_all(b",")?;
        }
    }
    out.write_all(b"\n")?;
    Ok(())
}

fn write_one_hot_row<W: Write>(out: &mut W, label: u8) -> Result<(), ConvertError> {
    for class in 0..CLASS_COUNT {
        let token: &[u8] = if class == label as usize { b"1" } else { b"0" };
        out.write_all(token)?;
        if class + 1 < CLASS_COUNT {
            out.write_all(b",")?;
        }
    }
    out.write_all(b"\n")?;
    Ok(())
}

fn truncated(err: io::Error, index: u32, count: u32) -> ConvertError {
    match err.kind() {
        io::ErrorKind::UnexpectedEof => ConvertError::TruncatedStream { index, count },
        _ => ConvertError::Io(err),
    }
}

fn log_percent(percent: u8) {
    if percent == 100 {
        info!("100% done");
    } else {
        info!("{}%", percent);
    }
}

fn open_input(path: &Path) -> Result<BufReader<File>, ConvertError> {
    let file = File::open(path).map_err(|source| ConvertError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

fn create_output(path: &Path) -> Result<BufWriter<File>, ConvertError> {
    let file = File::create(path).map_err(|source| ConvertError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::header::{IMAGE_MAGIC, LABEL_MAGIC};

    fn image_file(count: u32, rows: u32, columns: u32, pixels: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&IMAGE_MAGIC.to_be_bytes());
        bytes.extend_from_slice(&count.to_be_bytes());
        bytes.extend_from_slice(&rows.to_be_bytes());
        bytes.extend_from_slice(&columns.to_be_bytes());
        bytes.extend_from_slice(pixels);
        bytes
    }

    fn label_file(count: u32, labels: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&LABEL_MAGIC.to_be_bytes());
        bytes.extend_from_slice(&count.to_be_bytes());
        bytes.extend_from_slice(labels);
        bytes
    }

    fn convert_image_bytes(bytes: Vec<u8>) -> (Result<ImageHeader, ConvertError>, String, Vec<u8>) {
        let mut out = Vec::new();
        let mut percents = Vec::new();
        let result = convert_images(&mut Cursor::new(bytes), &mut out, |p| percents.push(p));
        (result, String::from_utf8(out).unwrap(), percents)
    }

    fn convert_label_bytes(bytes: Vec<u8>) -> (Result<LabelHeader, ConvertError>, String, Vec<u8>) {
        let mut out = Vec::new();
        let mut percents = Vec::new();
        let result = convert_labels(&mut Cursor::new(bytes), &mut out, |p| percents.push(p));
        (result, String::from_utf8(out).unwrap(), percents)
    }

    #[test]
    fn test_single_image_line() {
        let (result, csv, _) = convert_image_bytes(image_file(1, 1, 2, &[0x00, 0xFF]));
        result.unwrap();
        assert_eq!(csv, "0,255\n");
    }

    #[test]
    fn test_single_pixel_image() {
        let (result, csv, _) = convert_image_bytes(image_file(1, 1, 1, &[7]));
        result.unwrap();
        assert_eq!(csv, "7\n");
    }

    #[test]
    fn test_images_row_major_order() {
        // Two 2x2 images back to back.
        let pixels = [1, 2, 3, 4, 250, 251, 252, 253];
        let (result, csv, _) = convert_image_bytes(image_file(2, 2, 2, &pixels));
        let header = result.unwrap();
        assert_eq!(header.count, 2);
        assert_eq!(csv, "1,2,3,4\n250,251,252,253\n");
    }

    #[test]
    fn test_image_round_trip() {
        let pixels: Vec<u8> = (0..=255).collect();
        let (result, csv, _) = convert_image_bytes(image_file(4, 8, 8, &pixels));
        result.unwrap();

        let parsed: Vec<u8> = csv
            .lines()
            .flat_map(|line| line.split(','))
            .map(|token| token.parse().unwrap())
            .collect();
        assert_eq!(parsed, pixels);
        assert_eq!(csv.lines().count(), 4);
        for line in csv.lines() {
            assert_eq!(line.split(',').count(), 64);
        }
    }

    #[test]
    fn test_zero_images() {
        let (result, csv, percents) = convert_image_bytes(image_file(0, 28, 28, &[]));
        result.unwrap();
        assert_eq!(csv, "");
        assert_eq!(percents, vec![100]);
    }

    #[test]
    fn test_truncated_image_body() {
        // Declares two 2x2 images but carries only six of eight bytes.
        let (result, _, _) = convert_image_bytes(image_file(2, 2, 2, &[1, 2, 3, 4, 5, 6]));
        assert!(matches!(
            result,
            Err(ConvertError::TruncatedStream { index: 1, count: 2 })
        ));
    }

    #[test]
    fn test_one_hot_line() {
        let (result, csv, _) = convert_label_bytes(label_file(1, &[5]));
        result.unwrap();
        assert_eq!(csv, "0,0,0,0,0,1,0,0,0,0\n");
    }

    #[test]
    fn test_one_hot_all_classes() {
        let labels: Vec<u8> = (0..10).collect();
        let (result, csv, _) = convert_label_bytes(label_file(10, &labels));
        result.unwrap();

        for (label, line) in csv.lines().enumerate() {
            let tokens: Vec<&str> = line.split(',').collect();
            assert_eq!(tokens.len(), CLASS_COUNT);
            for (class, token) in tokens.iter().enumerate() {
                let expected = if class == label { "1" } else { "0" };
                assert_eq!(*token, expected);
            }
        }
    }

    #[test]
    fn test_out_of_range_label_is_all_zeros() {
        let (result, csv, _) = convert_label_bytes(label_file(1, &[0xC8]));
        result.unwrap();
        assert_eq!(csv, "0,0,0,0,0,0,0,0,0,0\n");
    }

    #[test]
    fn test_zero_labels() {
        let (result, csv, percents) = convert_label_bytes(label_file(0, &[]));
        result.unwrap();
        assert_eq!(csv, "");
        assert_eq!(percents, vec![100]);
    }

    #[test]
    fn test_truncated_labels() {
        let (result, _, _) = convert_label_bytes(label_file(3, &[0, 1]));
        assert!(matches!(
            result,
            Err(ConvertError::TruncatedStream { index: 2, count: 3 })
        ));
    }

    #[test]
    fn test_progress_checkpoints() {
        let pixels = vec![0u8; 8];
        let (result, _, percents) = convert_image_bytes(image_file(8, 1, 1, &pixels));
        result.unwrap();
        assert_eq!(percents, vec![25, 50, 75, 100]);
    }

    #[test]
    fn test_label_magic_rejected_for_images() {
        let bytes = label_file(1, &[5]);
        let (result, csv, _) = convert_image_bytes(bytes);
        assert!(matches!(result, Err(ConvertError::BadMagic { .. })));
        assert_eq!(csv, "");
    }
}
