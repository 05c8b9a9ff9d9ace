/*!
The lines module turns a raw byte stream into a sequence of lines split on a
configurable delimiter byte. It reads in blocks, tracks the byte offset and
1-based number of every line it produces, and never buffers more than the one
line it is currently assembling.
*/

use std::io;

use memchr::memchr;

/// The initial size of the internal read buffer. The buffer grows when a
/// single line exceeds it.
const BLOCK_SIZE: usize = 8 * (1 << 10);

/// A single line produced by a `LineSplitter`.
///
/// `bytes` never contains the delimiter. When CR stripping is enabled and the
/// line ended with `\r` before its delimiter, the `\r` is dropped from
/// `bytes` as well, but `offset` arithmetic for subsequent lines still
/// accounts for every byte of the source.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Line {
    /// 1-based line number with respect to the configured delimiter.
    pub number: u64,
    /// Byte offset of the first byte of this line in the source.
    pub offset: u64,
    /// The line's contents, without its delimiter.
    pub bytes: Vec<u8>,
    /// Whether the line was followed by a delimiter in the source. Only the
    /// final line of a source can lack one.
    pub has_terminator: bool,
}

/// LineSplitter is a streaming line reader over any `io::Read`.
pub struct LineSplitter<R> {
    rdr: R,
    buf: Vec<u8>,
    pos: usize,
    end: usize,
    offset: u64,
    number: u64,
    eol: u8,
    strip_cr: bool,
    eof: bool,
}

impl<R: io::Read> LineSplitter<R> {
    /// Create a new splitter over `rdr` that splits lines on the `eol` byte.
    pub fn new(rdr: R, eol: u8, strip_cr: bool) -> LineSplitter<R> {
        LineSplitter {
            rdr: rdr,
            buf: vec![0; BLOCK_SIZE],
            pos: 0,
            end: 0,
            offset: 0,
            number: 0,
            eol: eol,
            strip_cr: strip_cr,
            eof: false,
        }
    }

    /// Return the next line, or `None` once the source is exhausted.
    ///
    /// A source that does not end with a delimiter still yields its trailing
    /// bytes as a final line.
    pub fn next_line(&mut self) -> io::Result<Option<Line>> {
        loop {
            if let Some(i) = memchr(self.eol, &self.buf[self.pos..self.end]) {
                let line = self.make_line(self.pos + i, true);
                self.pos += i + 1;
                return Ok(Some(line));
            }
            if self.eof {
                if self.pos < self.end {
                    let end = self.end;
                    let line = self.make_line(end, false);
                    self.pos = self.end;
                    return Ok(Some(line));
                }
                return Ok(None);
            }
            self.fill()?;
        }
    }

    fn make_line(&mut self, line_end: usize, has_terminator: bool) -> Line {
        let raw_len = (line_end - self.pos) as u64;
        let mut bytes = self.buf[self.pos..line_end].to_vec();
        if self.strip_cr && bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        self.number += 1;
        let line = Line {
            number: self.number,
            offset: self.offset,
            bytes: bytes,
            has_terminator: has_terminator,
        };
        self.offset += raw_len + if has_terminator { 1 } else { 0 };
        line
    }

    fn fill(&mut self) -> io::Result<()> {
        // Shift the pending partial line to the front of the buffer so that
        // there is room to read more.
        if self.pos > 0 {
            self.buf.copy_within(self.pos..self.end, 0);
            self.end -= self.pos;
            self.pos = 0;
        }
        if self.end == self.buf.len() {
            // The pending line is bigger than the buffer.
            let len = self.buf.len();
            self.buf.resize(len * 2, 0);
        }
        let n = self.rdr.read(&mut self.buf[self.end..])?;
        if n == 0 {
            self.eof = true;
        }
        self.end += n;
        Ok(())
    }
}
