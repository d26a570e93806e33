//! LineSource - ordered, one-at-a-time reader of the tap output

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::trace;

/// One line of input with its position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputLine {
    /// 1-based line number
    pub number: u64,
    /// Line content without the trailing newline
    pub text: String,
}

/// Reads the input stream line by line
///
/// Lines are yielded strictly in arrival order; the next line is only read
/// when the caller asks for it.
pub struct LineSource<R> {
    lines: Lines<R>,
    line_count: u64,
    byte_count: u64,
}

impl LineSource<BufReader<Stdin>> {
    /// Source reading the process standard input
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_count: 0,
            byte_count: 0,
        }
    }

    /// Read the next line, `None` once the input is exhausted
    ///
    /// # Errors
    /// Returns IO errors, including invalid UTF-8.
    pub async fn next_line(&mut self) -> std::io::Result<Option<InputLine>> {
        let Some(text) = self.lines.next_line().await? else {
            return Ok(None);
        };
        // Tolerate CRLF producers
        let text = match text.strip_suffix('\r') {
            Some(stripped) => stripped.to_string(),
            None => text,
        };

        self.line_count += 1;
        self.byte_count += text.len() as u64 + 1;
        trace!(line = self.line_count, bytes = text.len(), "Line read");

        Ok(Some(InputLine {
            number: self.line_count,
            text,
        }))
    }

    /// Lines read so far
    pub fn line_count(&self) -> u64 {
        self.line_count
    }

    /// Approximate bytes read so far (content plus newline)
    pub fn byte_count(&self) -> u64 {
        self.byte_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lines_in_order_with_numbers() {
        let input: &[u8] = b"first\nsecond\r\nthird";
        let mut source = LineSource::new(input);

        let mut seen = Vec::new();
        while let Some(line) = source.next_line().await.unwrap() {
            seen.push((line.number, line.text));
        }

        assert_eq!(
            seen,
            vec![
                (1, "first".to_string()),
                (2, "second".to_string()),
                (3, "third".to_string()),
            ]
        );
        assert_eq!(source.line_count(), 3);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let input: &[u8] = b"";
        let mut source = LineSource::new(input);
        assert!(source.next_line().await.unwrap().is_none());
        assert_eq!(source.line_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_line_is_yielded() {
        let input: &[u8] = b"a\n\nb\n";
        let mut source = LineSource::new(input);
        source.next_line().await.unwrap();
        let blank = source.next_line().await.unwrap().unwrap();
        assert_eq!(blank.number, 2);
        assert!(blank.text.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_io_error() {
        let input: &[u8] = b"\xff\xfe\n";
        let mut source = LineSource::new(input);
        assert!(source.next_line().await.is_err());
    }
}
