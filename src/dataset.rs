//! The standard four-file conversion batch.
//!
//! Each conversion is an independent unit of work: it owns its input/output
//! pair, shares nothing with the others, and can run on its own thread. The
//! caller picks sequential or parallel execution.

use std::path::{Path, PathBuf};
use std::thread;

use crate::convert::{convert_image_file, convert_label_file};
use crate::error::ConvertError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    Images,
    Labels,
}

/// One input file to convert and where its CSV goes.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub kind: DatasetKind,
    pub source: PathBuf,
    pub dest: PathBuf,
}

impl Conversion {
    pub fn run(&self) -> Result<(), ConvertError> {
        match self.kind {
            DatasetKind::Images => convert_image_file(&self.source, &self.dest).map(drop),
            DatasetKind::Labels => convert_label_file(&self.source, &self.dest).map(drop),
        }
    }
}

/// The four canonical MNIST conversions: test/train images and labels, with
/// the distribution's file names.
pub fn standard_conversions(input_dir: &Path, output_dir: &Path) -> Vec<Conversion> {
    vec![
        Conversion {
            kind: DatasetKind::Images,
            source: input_dir.join("test-images.idx3-ubyte"),
            dest: output_dir.join("test_images.csv"),
        },
        Conversion {
            kind: DatasetKind::Images,
            source: input_dir.join("train-images.idx3-ubyte"),
            dest: output_dir.join("train_images.csv"),
        },
        Conversion {
            kind: DatasetKind::Labels,
            source: input_dir.join("test-labels.idx1-ubyte"),
            dest: output_dir.join("test_labels.csv"),
        },
        Conversion {
            kind: DatasetKind::Labels,
            source: input_dir.join("train-labels.idx1-ubyte"),
            dest: output_dir.join("train_labels.csv"),
        },
    ]
}

/// Runs conversions one after another; the first failure aborts the rest.
pub fn run_sequential(conversions: &[Conversion]) -> Result<(), ConvertError> {
    for conversion in conversions {
        conversion.run()?;
    }
    Ok(())
}

/// Runs every conversion on its own thread and joins them all. All
/// conversions run to completion or failure; the first error (in batch
/// order) is returned.
pub fn run_parallel(conversions: &[Conversion]) -> Result<(), ConvertError> {
    let results = thread::scope(|scope| {
        let handles: Vec<_> = conversions
            .iter()
            .map(|conversion| scope.spawn(move || conversion.run()))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("conversion thread panicked"))
            .collect::<Vec<_>>()
    });

    for result in results {
        result?;
    }
    Ok(())
}
