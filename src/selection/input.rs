//! Reading the selection line from the user

use crate::error::InputError;
use std::io::{BufRead, Read};

/// Longest accepted selection line, in bytes
pub const MAX_LINE_LEN: usize = 4096;

/// Read one line and split it into whitespace separated tokens
///
/// A blank line yields no tokens. End of input and lines longer than
/// [`MAX_LINE_LEN`] are errors.
pub fn read_selection<R: BufRead>(reader: &mut R) -> Result<Vec<String>, InputError> {
    let mut buf = Vec::new();
    let read = reader
        .by_ref()
        .take(MAX_LINE_LEN as u64 + 1)
        .read_until(b'\n', &mut buf)?;

    if read == 0 {
        return Err(InputError::EndOfInput);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    } else if read > MAX_LINE_LEN {
        return Err(InputError::LineTooLong {
            limit: MAX_LINE_LEN,
        });
    }

    Ok(String::from_utf8_lossy(&buf)
        .split_whitespace()
        .map(str::to_string)
        .collect())
}
