/*!
The printer composes each emitted record into its final byte sequence:
filename, line number and byte offset headers, the separator families, the
line payload with its match spans wrapped in color, and the trailing
delimiter.

Note that we ignore all write errors. Printers are only ever used for writes
to stdout or writes to memory, neither of which commonly fail, and grep has
nowhere useful to report a failing stdout anyway.
*/

use std::io::{self, Write};

use crate::color::{Palette, sgr, sgr_reset};
use crate::results::{Record, Role};

/// The separator strings used to compose output records.
///
/// Matched lines and context lines each have their own family: grep joins
/// header fields to a matched line with `:` and to a context line with `-`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Separators {
    /// Between the last header field and a matched line.
    pub result: Vec<u8>,
    /// Between the filename and the line number of a matched line.
    pub name_num: Vec<u8>,
    /// Before the byte offset of a matched line.
    pub name_byte: Vec<u8>,
    /// Between the last header field and a context line.
    pub context_result: Vec<u8>,
    /// Between the filename and the line number of a context line.
    pub context_name_num: Vec<u8>,
    /// Before the byte offset of a context line.
    pub context_name_byte: Vec<u8>,
    /// Between disjoint context groups. `None` suppresses the separator
    /// record entirely.
    pub group: Option<Vec<u8>>,
}

impl Default for Separators {
    fn default() -> Separators {
        Separators {
            result: b":".to_vec(),
            name_num: b":".to_vec(),
            name_byte: b":".to_vec(),
            context_result: b"-".to_vec(),
            context_name_num: b"-".to_vec(),
            context_name_byte: b"-".to_vec(),
            group: Some(b"--".to_vec()),
        }
    }
}

impl Separators {
    /// Append a tab to the result separators. This is what `--initial-tab`
    /// means for this implementation; it is applied once at config time.
    pub fn with_initial_tab(mut self) -> Separators {
        self.result.push(b'\t');
        self.context_result.push(b'\t');
        self
    }
}

/// The start sequences for each color role, pre-rendered from a palette so
/// the hot path only concatenates byte strings. Everything is empty when
/// coloring is off.
#[derive(Clone, Debug, Default)]
struct Styles {
    filename: Vec<u8>,
    line_number: Vec<u8>,
    byte_offset: Vec<u8>,
    separator: Vec<u8>,
    selected_match: Vec<u8>,
    context_match: Vec<u8>,
    selected_line: Vec<u8>,
    context_line: Vec<u8>,
    reset: Vec<u8>,
    no_reset_eol: bool,
}

impl Styles {
    fn new(palette: &Palette, color: bool) -> Styles {
        if !color {
            return Styles::default();
        }
        Styles {
            filename: sgr(&palette.filename),
            line_number: sgr(&palette.line_number),
            byte_offset: sgr(&palette.byte_offset),
            separator: sgr(&palette.separator),
            selected_match: sgr(&palette.selected_match),
            context_match: sgr(&palette.context_match),
            selected_line: sgr(&palette.selected_line),
            context_line: sgr(&palette.context_line),
            reset: sgr_reset(),
            no_reset_eol: palette.no_reset,
        }
    }
}

/// Printer encapsulates all output logic for searching.
pub struct Printer<W> {
    /// The underlying writer.
    wtr: W,
    /// Pre-rendered color sequences.
    styles: Styles,
    /// The end-of-line terminator appended to every record.
    eol: u8,
    /// The separator strings in effect.
    seps: Separators,
    /// Whether to prefix each record with the file name.
    with_filename: bool,
    /// Whether to show 1-based line numbers.
    line_number: bool,
    /// Whether to show the byte offset of each line (or of each match).
    byte_offset: bool,
    /// Whether to print only the matching spans, one record each.
    only_matching: bool,
    /// Whether to append a NUL byte after the final header separator.
    null_after_header: bool,
    /// Whether to flush after every record.
    line_buffered: bool,
}

impl<W: io::Write> Printer<W> {
    /// Create a new printer that writes to wtr, uncolored and with grep's
    /// default separators.
    pub fn new(wtr: W) -> Printer<W> {
        Printer {
            wtr: wtr,
            styles: Styles::default(),
            eol: b'\n',
            seps: Separators::default(),
            with_filename: false,
            line_number: false,
            byte_offset: false,
            only_matching: false,
            null_after_header: false,
            line_buffered: false,
        }
    }

    /// Color output using the given palette.
    pub fn palette(mut self, palette: &Palette, color: bool) -> Printer<W> {
        self.styles = Styles::new(palette, color);
        self
    }

    /// Set the end-of-line terminator. The default is `\n`.
    pub fn eol(mut self, eol: u8) -> Printer<W> {
        self.eol = eol;
        self
    }

    /// Replace the separator family.
    pub fn separators(mut self, seps: Separators) -> Printer<W> {
        self.seps = seps;
        self
    }

    /// When set, each record is prefixed with the file name it came from.
    pub fn with_filename(mut self, yes: bool) -> Printer<W> {
        self.with_filename = yes;
        self
    }

    /// When set, each record is prefixed with its 1-based line number.
    pub fn line_number(mut self, yes: bool) -> Printer<W> {
        self.line_number = yes;
        self
    }

    /// When set, each record carries the byte offset of its line, or of
    /// each match when only-matching is also set.
    pub fn byte_offset(mut self, yes: bool) -> Printer<W> {
        self.byte_offset = yes;
        self
    }

    /// When set, only the matching spans are printed, one record per span.
    pub fn only_matching(mut self, yes: bool) -> Printer<W> {
        self.only_matching = yes;
        self
    }

    /// When set, a NUL byte follows the final header separator of each
    /// record.
    pub fn null_after_header(mut self, yes: bool) -> Printer<W> {
        self.null_after_header = yes;
        self
    }

    /// When set, the underlying writer is flushed after every record.
    pub fn line_buffered(mut self, yes: bool) -> Printer<W> {
        self.line_buffered = yes;
        self
    }

    /// Flushes the underlying writer and returns it.
    pub fn into_inner(mut self) -> W {
        let _ = self.wtr.flush();
        self.wtr
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) {
        let _ = self.wtr.flush();
    }

    /// Write one output record.
    pub fn write_record(&mut self, rec: &Record) {
        match rec.role {
            Role::GroupSeparator => self.write_group_separator(),
            Role::Match if self.only_matching => self.write_only_matching(rec),
            // Context lines have no spans to print in only-matching mode.
            _ if self.only_matching => {}
            _ => self.write_line(rec),
        }
        if self.line_buffered {
            let _ = self.wtr.flush();
        }
    }

    /// Prints the given path on a record of its own, e.g. for
    /// files-with-matches output.
    pub fn path(&mut self, path: &std::path::Path) {
        let name = path.to_string_lossy();
        write_colored(
            &mut self.wtr, &self.styles.filename, &self.styles.reset,
            name.as_bytes(),
        );
        if self.null_after_header {
            let _ = self.wtr.write_all(b"\x00");
        } else {
            let _ = self.wtr.write_all(&[self.eol]);
        }
        if self.line_buffered {
            let _ = self.wtr.flush();
        }
    }

    /// Prints the given path and the count of its selected lines.
    pub fn path_count(&mut self, path: &std::path::Path, count: u64) {
        if self.with_filename {
            let name = path.to_string_lossy();
            write_colored(
                &mut self.wtr, &self.styles.filename, &self.styles.reset,
                name.as_bytes(),
            );
            write_colored(
                &mut self.wtr, &self.styles.separator, &self.styles.reset,
                &self.seps.result,
            );
            if self.null_after_header {
                let _ = self.wtr.write_all(b"\x00");
            }
        }
        let _ = self.wtr.write_all(count.to_string().as_bytes());
        let _ = self.wtr.write_all(&[self.eol]);
        if self.line_buffered {
            let _ = self.wtr.flush();
        }
    }

    /// Prints the note emitted for a binary file with a match.
    pub fn binary_matched(&mut self, path: &std::path::Path) {
        let msg = format!("{}: binary file matches", path.display());
        let _ = self.wtr.write_all(msg.as_bytes());
        let _ = self.wtr.write_all(&[self.eol]);
        if self.line_buffered {
            let _ = self.wtr.flush();
        }
    }

    fn write_group_separator(&mut self) {
        let sep = match self.seps.group {
            None => return,
            Some(ref sep) => sep.clone(),
        };
        write_colored(
            &mut self.wtr, &self.styles.separator, &self.styles.reset, &sep,
        );
        let _ = self.wtr.write_all(&[self.eol]);
    }

    fn write_line(&mut self, rec: &Record) {
        self.write_header(rec, rec.offset);
        let (matched, text) = if rec.is_context() {
            (&self.styles.context_match, &self.styles.context_line)
        } else {
            (&self.styles.selected_match, &self.styles.selected_line)
        };
        write_spans(
            &mut self.wtr,
            matched,
            text,
            &self.styles.reset,
            self.styles.no_reset_eol,
            &rec.bytes,
            &rec.spans,
        );
        let _ = self.wtr.write_all(&[self.eol]);
    }

    fn write_only_matching(&mut self, rec: &Record) {
        for &(s, e) in &rec.spans {
            if s == e {
                continue;
            }
            self.write_header(rec, rec.offset + s as u64);
            write_colored(
                &mut self.wtr,
                &self.styles.selected_match,
                &self.styles.reset,
                &rec.bytes[s..e],
            );
            let _ = self.wtr.write_all(&[self.eol]);
        }
    }

    /// Writes the header fields and the final header separator. Returns
    /// nothing; when no header field is enabled, nothing is written.
    fn write_header(&mut self, rec: &Record, offset: u64) {
        let context = rec.is_context();
        let (sep_nn, sep_nb, sep_result) = if context {
            (
                self.seps.context_name_num.clone(),
                self.seps.context_name_byte.clone(),
                self.seps.context_result.clone(),
            )
        } else {
            (
                self.seps.name_num.clone(),
                self.seps.name_byte.clone(),
                self.seps.result.clone(),
            )
        };
        let mut any = false;
        if self.with_filename {
            let name = rec.path.to_string_lossy().into_owned();
            write_colored(
                &mut self.wtr, &self.styles.filename, &self.styles.reset,
                name.as_bytes(),
            );
            any = true;
        }
        if self.line_number {
            if any {
                write_colored(
                    &mut self.wtr, &self.styles.separator, &self.styles.reset,
                    &sep_nn,
                );
            }
            write_colored(
                &mut self.wtr, &self.styles.line_number, &self.styles.reset,
                rec.number.to_string().as_bytes(),
            );
            any = true;
        }
        if self.byte_offset {
            if any {
                write_colored(
                    &mut self.wtr, &self.styles.separator, &self.styles.reset,
                    &sep_nb,
                );
            }
            write_colored(
                &mut self.wtr, &self.styles.byte_offset, &self.styles.reset,
                offset.to_string().as_bytes(),
            );
            any = true;
        }
        if any {
            write_colored(
                &mut self.wtr, &self.styles.separator, &self.styles.reset,
                &sep_result,
            );
            if self.null_after_header {
                let _ = self.wtr.write_all(b"\x00");
            }
        }
    }
}

/// Write `buf` wrapped in the given start sequence and reset. When the start
/// sequence is empty (no color for the role, or color off), the bytes are
/// written bare.
fn write_colored<W: Write>(wtr: &mut W, start: &[u8], reset: &[u8], buf: &[u8]) {
    if buf.is_empty() {
        return;
    }
    if start.is_empty() {
        let _ = wtr.write_all(buf);
        return;
    }
    let _ = wtr.write_all(start);
    let _ = wtr.write_all(buf);
    let _ = wtr.write_all(reset);
}

/// Write a line payload, wrapping each match span in the match color and the
/// rest in the line color. The final reset is suppressed when the palette's
/// `ne` capability is set.
fn write_spans<W: Write>(
    wtr: &mut W,
    matched: &[u8],
    text: &[u8],
    reset: &[u8],
    no_reset_eol: bool,
    bytes: &[u8],
    spans: &[(usize, usize)],
) {
    let mut last = 0;
    for &(s, e) in spans {
        if s == e {
            continue;
        }
        write_colored(wtr, text, reset, &bytes[last..s]);
        write_colored(wtr, matched, reset, &bytes[s..e]);
        last = e;
    }
    let tail = &bytes[last..];
    if tail.is_empty() {
        return;
    }
    if text.is_empty() {
        let _ = wtr.write_all(tail);
        return;
    }
    let _ = wtr.write_all(text);
    let _ = wtr.write_all(tail);
    if !no_reset_eol {
        let _ = wtr.write_all(reset);
    }
}
