//! Checkpoint-based progress reporting.
//!
//! Converters report percent-complete at fixed quarter checkpoints instead of
//! on every item. The checkpoint indices are `total * k / 4` for k = 1..3;
//! 100 percent is reported by the converter itself once its loop finishes, so
//! it fires even for an empty dataset.

/// Tracks which quarter checkpoints have fired for a run of `total` items.
///
/// Checkpoints that coincide for small totals collapse into the highest
/// percentage, so each index fires at most once.
#[derive(Debug)]
pub struct Checkpoints {
    // (item index, percent), strictly increasing by index
    marks: Vec<(u64, u8)>,
    next: usize,
}

impl Checkpoints {
    pub fn new(total: u64) -> Self {
        let mut marks: Vec<(u64, u8)> = Vec::new();
        for k in 1..4u64 {
            let index = total * k / 4;
            let percent = (25 * k) as u8;
            match marks.last_mut() {
                Some(last) if last.0 == index => last.1 = percent,
                _ => marks.push((index, percent)),
            }
        }
        Checkpoints { marks, next: 0 }
    }

    /// Called with each item index in order. Returns the percentage to report
    /// when `index` reaches a checkpoint, skipping past any checkpoints that
    /// collapsed onto an earlier index.
    pub fn advance(&mut self, index: u64) -> Option<u8> {
        let mut fired = None;
        while self.next < self.marks.len() && self.marks[self.next].0 <= index {
            fired = Some(self.marks[self.next].1);
            self.next += 1;
        }
        fired
    }
}
