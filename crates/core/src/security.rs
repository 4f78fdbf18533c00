use serde::{Deserialize, Serialize};

/// Width of the security codes a stream yields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CodeWidth {
    Three,
    Six,
    Seven,
}

impl CodeWidth {
    pub fn digits(self) -> usize {
        match self {
            CodeWidth::Three => 3,
            CodeWidth::Six => 6,
            CodeWidth::Seven => 7,
        }
    }
}

/// Per-ticket security codes, supplied by production as a finite list and
/// consumed cyclically. The engine treats the values as opaque; report
/// writers format them into online URLs and barcodes.
#[derive(Debug, Clone)]
pub struct SecurityCodes {
    width: CodeWidth,
    codes: Vec<u32>,
    cursor: usize,
}

impl SecurityCodes {
    pub fn new(width: CodeWidth, codes: Vec<u32>) -> Self {
        Self {
            width,
            codes,
            cursor: 0,
        }
    }

    pub fn width(&self) -> CodeWidth {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Next code in sequence, wrapping at the end of the list.
    pub fn next_code(&mut self) -> Option<u32> {
        if self.codes.is_empty() {
            return None;
        }
        let code = self.codes[self.cursor % self.codes.len()];
        self.cursor += 1;
        Some(code)
    }

    /// Zero-padded text form of the next code.
    pub fn next_text(&mut self) -> Option<String> {
        let digits = self.width.digits();
        self.next_code().map(|code| format!("{code:0digits$}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_past_the_end() {
        let mut codes = SecurityCodes::new(CodeWidth::Three, vec![1, 22, 333]);
        let drawn: Vec<u32> = (0..5).filter_map(|_| codes.next_code()).collect();
        assert_eq!(drawn, vec![1, 22, 333, 1, 22]);
    }

    #[test]
    fn pads_to_width() {
        let mut codes = SecurityCodes::new(CodeWidth::Six, vec![42]);
        assert_eq!(codes.next_text().as_deref(), Some("000042"));
    }

    #[test]
    fn empty_stream_yields_nothing() {
        let mut codes = SecurityCodes::new(CodeWidth::Seven, Vec::new());
        assert!(codes.next_code().is_none());
    }
}
