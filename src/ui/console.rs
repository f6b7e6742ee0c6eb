//! Line-oriented terminal widgets.

use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Reads answers from `input` and writes the page to `output`.
///
/// Generic so the interaction loop can be driven by a script in tests.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Show `label` and read one line.
    ///
    /// Returns `None` at end of input. The line terminator is stripped;
    /// everything else is returned as typed.
    pub async fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label} ")?;
        self.output.flush()?;

        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw).await? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }

        // Invalid UTF-8 is replaced rather than ending the session.
        let mut line = String::from_utf8_lossy(&raw).into_owned();
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    /// Write one line of page text.
    pub fn line(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.output, "{}", text.as_ref())
    }

    /// Write an empty line.
    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.output)
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
