//! Source template transforms
//!
//! Templates are plain text. Sizes are injected by literal placeholder
//! substitution, and lines carrying a repeat marker are replicated to
//! synthesize inputs that grow exponentially with the benchmark size.

use crate::constants::MAX_REPEAT_SIZE;
use crate::error::{AppError, AppResult};

/// Replace the first occurrence of `placeholder` with `replacement`.
///
/// The match is literal; a template without the placeholder is returned
/// unchanged.
pub fn substitute(text: &str, placeholder: &str, replacement: &str) -> String {
    text.replacen(placeholder, replacement, 1)
}

/// Number of copies a marked line gets for `size`, i.e. `2^size`.
///
/// Sizes above [`MAX_REPEAT_SIZE`] are rejected before anything is allocated.
pub fn repeat_count(size: u32) -> AppResult<usize> {
    if size > MAX_REPEAT_SIZE {
        return Err(AppError::RepeatOverflow(size));
    }
    1usize
        .checked_shl(size)
        .ok_or(AppError::RepeatOverflow(size))
}

/// Replicate every line containing `marker` `times` times in place.
///
/// Other lines keep a single copy and relative order is preserved. The
/// marker stays on the replicated lines. Every output line is
/// newline-terminated.
pub fn repeat_marked_lines(text: &str, marker: &str, times: usize) -> String {
    let mut out = String::with_capacity(text.len());

    for line in text.lines() {
        let copies = if line.contains(marker) { times } else { 1 };
        for _ in 0..copies {
            out.push_str(line);
            out.push('\n');
        }
    }

    out
}

/// Apply the size placeholders and the line repetition for `size`.
pub fn expand(text: &str, placeholders: &[(&str, String)], marker: &str, size: u32) -> AppResult<String> {
    let mut code = text.to_string();
    for (placeholder, replacement) in placeholders {
        code = substitute(&code, placeholder, replacement);
    }
    Ok(repeat_marked_lines(&code, marker, repeat_count(size)?))
}
