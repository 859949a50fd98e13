//! Line-oriented console input
//!
//! Every prompt in the program is "print, flush, read one line". End of input
//! is surfaced as `None` so callers can decide how to wind down.

use std::io::{self, BufRead, Write};

/// Strip one trailing line terminator (`\n` or `\r\n`) and nothing else.
pub fn strip_line_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Read one line, returning `None` at end of input.
pub fn read_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut buffer = String::new();
    if reader.read_line(&mut buffer)? == 0 {
        return Ok(None);
    }
    Ok(Some(strip_line_terminator(&buffer).to_string()))
}

/// Print `prompt` without a newline, flush, then read the reply.
pub fn prompt_line<R: BufRead, W: Write>(
    reader: &mut R,
    out: &mut W,
    prompt: &str,
) -> io::Result<Option<String>> {
    write!(out, "{prompt}")?;
    out.flush()?;
    read_line(reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn strips_unix_and_windows_terminators() {
        assert_eq!(strip_line_terminator("hello\n"), "hello");
        assert_eq!(strip_line_terminator("hello\r\n"), "hello");
        assert_eq!(strip_line_terminator("hello"), "hello");
    }

    #[test]
    fn keeps_surrounding_whitespace() {
        assert_eq!(strip_line_terminator("  exit  \n"), "  exit  ");
    }

    #[test]
    fn read_line_reports_end_of_input() {
        let mut reader = Cursor::new("first\nsecond");
        assert_eq!(read_line(&mut reader).unwrap(), Some("first".to_string()));
        assert_eq!(read_line(&mut reader).unwrap(), Some("second".to_string()));
        assert_eq!(read_line(&mut reader).unwrap(), None);
    }

    #[test]
    fn empty_line_is_not_end_of_input() {
        let mut reader = Cursor::new("\n");
        assert_eq!(read_line(&mut reader).unwrap(), Some(String::new()));
    }

    #[test]
    fn prompt_line_writes_prompt_before_reading() {
        let mut reader = Cursor::new("42\n");
        let mut out = Vec::new();
        let reply = prompt_line(&mut reader, &mut out, "Pick: ").unwrap();
        assert_eq!(reply.as_deref(), Some("42"));
        assert_eq!(String::from_utf8(out).unwrap(), "Pick: ");
    }
}
