//! Converts IDX-format binary datasets (the MNIST layout: a fixed big-endian
//! header followed by a row-major byte payload) into plain comma-separated
//! text files.
//!
//! Image files become one CSV line per image with a decimal pixel value
//! (0-255) per token; label files become one 10-token one-hot line per label.
//! The converters are single-pass and stream-generic, so they work over any
//! `Read`/`Write` pair; [`dataset`] wires them to the four standard MNIST
//! files on disk.

pub mod convert;
pub mod dataset;
pub mod error;
pub mod header;
pub mod progress;

pub use convert::{convert_image_file, convert_images, convert_label_file, convert_labels};
pub use error::ConvertError;
pub use header::{ImageHeader, LabelHeader, IMAGE_MAGIC, LABEL_MAGIC};
