use std::io::{BufRead, Write};

use crate::error::TidyError;
use crate::utils;

/// Ask `question` and read one line. Only a case-insensitive "yes" counts;
/// anything else, including end of input, is a no.
pub fn confirm<R, W>(input: &mut R, out: &mut W, question: &str) -> Result<bool, TidyError>
where
    R: BufRead,
    W: Write,
{
    write!(out, "{question}").map_err(TidyError::Console)?;
    out.flush().map_err(TidyError::Console)?;

    let mut line = String::new();
    let read = input.read_line(&mut line).map_err(TidyError::Console)?;
    if read == 0 {
        return Ok(false);
    }
    Ok(utils::strip_line_ending(&line).eq_ignore_ascii_case("yes"))
}
