//! Purpose: Find the matching close for a `{` or `[` in unstructured log text.
//! Exports: `ScanMode`, `matching_close`.
//! Role: Leaf helper for the legacy-line extractor; no parsing beyond delimiter counting.
//! Invariants: Only the delimiter pair of the start character is counted.
//! Invariants: `ScanMode::Raw` counts every delimiter byte, including ones inside quotes.

/// How delimiters inside quoted literals are treated while scanning.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ScanMode {
    /// Every delimiter byte counts, quoted or not.
    #[default]
    Raw,
    /// Delimiters inside `"..."` or `'...'` literals are ignored; `\` escapes the next byte.
    QuoteAware,
}

/// Byte index of the delimiter closing the one at `start`.
///
/// Returns `None` when `start` is not a `{` or `[`, or when the depth never
/// returns to zero before the end of `text`.
pub fn matching_close(text: &str, start: usize, mode: ScanMode) -> Option<usize> {
    let bytes = text.as_bytes();
    let open = *bytes.get(start)?;
    let close = match open {
        b'{' => b'}',
        b'[' => b']',
        _ => return None,
    };

    let mut depth = 1usize;
    let mut quote: Option<u8> = None;
    let mut escaped = false;
    for (idx, &byte) in bytes.iter().enumerate().skip(start + 1) {
        if mode == ScanMode::QuoteAware {
            if let Some(q) = quote {
                if escaped {
                    escaped = false;
                } else if byte == b'\\' {
                    escaped = true;
                } else if byte == q {
                    quote = None;
                }
                continue;
            }
            if byte == b'"' || byte == b'\'' {
                quote = Some(byte);
                continue;
            }
        }

        if byte == open {
            depth += 1;
        } else if byte == close {
            depth -= 1;
            if depth == 0 {
                return Some(idx);
            }
        }
    }
    None
}
