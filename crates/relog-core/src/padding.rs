//! Sliding-window column padding.
//!
//! Keeps high-cardinality fields visually aligned across lines without
//! letting one historically long value over-pad every later short one.

/// Right-pads values to the widest of the last `N` values seen.
#[derive(Debug, Clone)]
pub struct PaddedColumn {
    history: Vec<usize>,
    index: usize,
    max_width: usize,
}

impl PaddedColumn {
    /// Create a column remembering the last `history_len` widths.
    ///
    /// A zero length is treated as one.
    pub fn new(history_len: usize) -> Self {
        Self {
            history: vec![0; history_len.max(1)],
            index: 0,
            max_width: 0,
        }
    }

    /// Record `value` and return it padded to the current window maximum.
    pub fn next(&mut self, value: &str) -> String {
        let width = value.chars().count();

        self.index = (self.index + 1) % self.history.len();
        let evicted = std::mem::replace(&mut self.history[self.index], width);

        if width >= self.max_width {
            self.max_width = width;
            return value.to_string();
        }
        if evicted == self.max_width {
            self.max_width = self.history.iter().copied().max().unwrap_or(0);
        }

        let mut padded = String::with_capacity(value.len() + self.max_width - width);
        padded.push_str(value);
        padded.extend(std::iter::repeat_n(' ', self.max_width - width));
        padded
    }

    pub fn max_width(&self) -> usize {
        self.max_width
    }
}
