//! Image quantization: reduce a pixel buffer to a small weighted palette.

mod celebi;
mod wsmeans;
mod wu;

pub use celebi::QuantizerCelebi;
pub use wsmeans::QuantizerWsmeans;
pub use wu::QuantizerWu;

/// Quantized colors with their pixel populations.
///
/// Entries are ordered by population (descending), ties broken by ARGB value,
/// so iteration order never depends on hashing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuantizerResult {
    entries: Vec<(u32, u32)>,
}

impl QuantizerResult {
    pub fn new(entries: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let mut entries: Vec<(u32, u32)> = entries.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        Self { entries }
    }

    pub fn entries(&self) -> &[(u32, u32)] {
        &self.entries
    }

    pub fn colors(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().map(|(argb, _)| *argb)
    }

    pub fn population(&self, argb: u32) -> Option<u32> {
        self.entries.iter().find(|(color, _)| *color == argb).map(|(_, count)| *count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
