//! Position of the biomarker series inside an input row.

/// Where the fixed-width series lives in a row.
///
/// The layout is a constant of the trained model: the generated feature set is
/// derived from `length`, so inputs that do not match it are rejected rather
/// than producing a different set of columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesLayout {
    /// Index of the first series column.
    pub offset: usize,
    /// Number of series columns.
    pub length: usize,
}

impl SeriesLayout {
    /// Column offset of the series in a preprocessed table.
    pub const OFFSET: usize = 7;
    /// Number of values in every series.
    pub const LENGTH: usize = 20;

    /// The layout every shipped model was trained with.
    pub const STANDARD: Self = Self {
        offset: Self::OFFSET,
        length: Self::LENGTH,
    };

    /// Total number of columns a table must expose.
    pub const fn required_width(self) -> usize {
        self.offset + self.length
    }

    /// Column index range covered by the series.
    pub fn columns(self) -> std::ops::Range<usize> {
        self.offset..self.required_width()
    }
}

impl Default for SeriesLayout {
    fn default() -> Self {
        Self::STANDARD
    }
}
