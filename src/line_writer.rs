use std::io;

const CRLF: [u8; 2] = [b'\r', b'\n'];
const LF: [u8; 1] = [b'\n'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineBreak {
    Crlf,
    Lf,
}

impl AsRef<[u8]> for LineBreak {
    fn as_ref(&self) -> &[u8] {
        match self {
            LineBreak::Crlf => &CRLF[..],
            LineBreak::Lf => &LF[..],
        }
    }
}

/// A `Write` implementation that splits any written bytes into lines of at most `N` bytes.
///
/// A line break is only inserted once more data follows a full line, so a full last line is
/// not followed by an empty one. Call [`LineWriter::finish`] to terminate the last line.
#[derive(Debug)]
pub struct LineWriter<W: io::Write, const N: usize> {
    inner: W,
    line_break: LineBreak,
    /// Bytes written on the current line.
    line_len: usize,
}

impl<W: io::Write, const N: usize> LineWriter<W, N> {
    pub fn new(inner: W, line_break: LineBreak) -> Self {
        LineWriter {
            inner,
            line_break,
            line_len: 0,
        }
    }

    /// Terminates a started line and returns the wrapped writer.
    pub fn finish(mut self) -> io::Result<W> {
        if self.line_len > 0 {
            self.inner.write_all(self.line_break.as_ref())?;
            self.line_len = 0;
        }
        Ok(self.inner)
    }
}

impl<W: io::Write, const N: usize> io::Write for LineWriter<W, N> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut rest = buf;
        while !rest.is_empty() {
            if self.line_len == N {
                self.inner.write_all(self.line_break.as_ref())?;
                self.line_len = 0;
            }
            let take = rest.len().min(N - self.line_len);
            self.inner.write_all(&rest[..take])?;
            self.line_len += take;
            rest = &rest[take..];
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
