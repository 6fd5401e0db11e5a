//! # Label Fitting
//!
//! Fits variable-length labels into fixed pixel budgets. Measurement is an
//! injected capability ([`TextMeasure`]) supplied by the rendering
//! collaborator; the fitter itself knows nothing about fonts. Because
//! measurement can be expensive (font shaping), the search for the longest
//! fitting prefix is a binary search over prefix length, `O(log n)`
//! measurement calls.

/// Suffix appended to truncated labels.
pub const ELLIPSIS: &str = "...";

/// Pixel-width measurement of arbitrary text in the active font.
pub trait TextMeasure {
    fn text_width(&self, text: &str) -> u32;
}

/// Fit `label` into `max_width` pixels.
///
/// Returns the label unchanged when it already fits. Otherwise returns the
/// longest char-prefix plus [`ELLIPSIS`] that fits, or the ellipsis alone
/// when no prefix fits at all. Already-fitted text is a fixed point.
pub fn fit<M: TextMeasure>(label: &str, measure: &M, max_width: u32) -> String {
    if measure.text_width(label) <= max_width {
        return label.to_owned();
    }

    // Prefix boundaries are in chars, not bytes, so multi-byte labels
    // never split mid-character.
    let chars: Vec<char> = label.chars().collect();
    let mut low = 0usize;
    let mut high = chars.len();
    while low < high {
        let mid = (low + high + 1) / 2;
        let mut candidate: String = chars[..mid].iter().collect();
        candidate.push_str(ELLIPSIS);
        if measure.text_width(&candidate) <= max_width {
            low = mid;
        } else {
            high = mid - 1;
        }
    }

    if low == 0 {
        ELLIPSIS.to_owned()
    } else {
        let mut fitted: String = chars[..low].iter().collect();
        fitted.push_str(ELLIPSIS);
        fitted
    }
}
