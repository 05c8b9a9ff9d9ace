/*!
The search_stream module drives a single source end to end: it sniffs for
binary content, streams the source through the line splitter and the matcher,
interleaves matches with before/after context through a small state machine,
and hands every emission to the printer or the capture list.
*/

use std::collections::VecDeque;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use log::debug;
use memchr::memchr;

use crate::lines::{Line, LineSplitter};
use crate::pattern::Matcher;
use crate::printer::Printer;
use crate::results::{FileSummary, Note, Record, Results, Role};

/// The number of prefix bytes inspected for binary detection.
const PEEK_SIZE: usize = 8 * (1 << 10);

/// How binary looking sources are treated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BinaryMode {
    /// Search, but replace any line output with a single note that the
    /// binary file matches. The default.
    Binary,
    /// Treat the source as ordinary text.
    Text,
    /// Skip binary sources entirely.
    WithoutMatch,
}

impl Default for BinaryMode {
    fn default() -> BinaryMode {
        BinaryMode::Binary
    }
}

/// Which shape of per-source output is produced.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutputMode {
    /// Every selected line (with any context). The default.
    Lines,
    /// Only the count of selected lines.
    Count,
    /// Only the names of sources with a selected line.
    FilesWithMatches,
    /// Only the names of sources without a selected line.
    FilesWithoutMatch,
}

impl Default for OutputMode {
    fn default() -> OutputMode {
        OutputMode::Lines
    }
}

/// Options bundles the per-run knobs shared by every source.
#[derive(Clone, Debug)]
pub struct Options {
    pub before_context: usize,
    pub after_context: usize,
    pub invert_match: bool,
    pub max_count: Option<u64>,
    pub quiet: bool,
    pub binary: BinaryMode,
    pub output: OutputMode,
    pub eol: u8,
    pub strip_cr: bool,
    /// Whether group separator records are produced at all. The printer
    /// knows the separator's bytes; the window only decides placement.
    pub group_separator: bool,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            before_context: 0,
            after_context: 0,
            invert_match: false,
            max_count: None,
            quiet: false,
            binary: BinaryMode::default(),
            output: OutputMode::default(),
            eol: b'\n',
            strip_cr: false,
            group_separator: true,
        }
    }
}

impl Options {
    /// Returns true if and only if the given match count means the search
    /// of a source should stop.
    fn hit_max_count(&self, count: u64) -> bool {
        self.max_count.map_or(false, |max| count >= max)
    }
}

/// Searcher runs sources through the matcher and the context window,
/// emitting to the printer or to the capture list.
pub struct Searcher<'a, W: io::Write> {
    opts: &'a Options,
    matcher: &'a Matcher,
    printer: &'a mut Printer<W>,
    capture: bool,
}

impl<'a, W: io::Write> Searcher<'a, W> {
    pub fn new(
        opts: &'a Options,
        matcher: &'a Matcher,
        printer: &'a mut Printer<W>,
        capture: bool,
    ) -> Searcher<'a, W> {
        Searcher {
            opts: opts,
            matcher: matcher,
            printer: printer,
            capture: capture,
        }
    }

    /// Search one source. The path is used for display only; stdin passes
    /// its label here.
    ///
    /// Returns true when the whole run should stop, which only happens in
    /// quiet mode once something matched.
    pub fn search<R: Read>(
        &mut self,
        results: &mut Results,
        path: &Path,
        rdr: R,
    ) -> io::Result<bool> {
        let records_start = results.records.len();
        let scan = Scan {
            opts: self.opts,
            matcher: self.matcher,
            printer: &mut *self.printer,
            results: results,
            capture: self.capture,
            path: path.to_path_buf(),
            records_start: records_start,
            before: VecDeque::new(),
            remaining_after: 0,
            selected: 0,
            last_emitted: 0,
            suppress: false,
        };
        scan.run(rdr)
    }
}

struct Scan<'a, W: io::Write> {
    opts: &'a Options,
    matcher: &'a Matcher,
    printer: &'a mut Printer<W>,
    results: &'a mut Results,
    capture: bool,
    path: PathBuf,
    records_start: usize,
    /// The ring of pending before-context lines.
    before: VecDeque<Line>,
    /// How many more lines may be emitted as after-context.
    remaining_after: usize,
    /// Selected lines so far.
    selected: u64,
    /// The line number of the last emitted line; zero before any emission.
    /// Drives group separator placement.
    last_emitted: u64,
    /// True when line output is replaced by a binary-file note.
    suppress: bool,
}

impl<'a, W: io::Write> Scan<'a, W> {
    fn run<R: Read>(mut self, mut rdr: R) -> io::Result<bool> {
        let peek = read_peek(&mut rdr)?;
        let binary = self.opts.eol != b'\x00'
            && memchr(b'\x00', &peek).is_some();
        if binary {
            match self.opts.binary {
                BinaryMode::WithoutMatch => {
                    debug!("{}: skipping binary file", self.path.display());
                    return Ok(false);
                }
                BinaryMode::Binary => self.suppress = true,
                BinaryMode::Text => {}
            }
        }
        let rdr = io::Cursor::new(peek).chain(rdr);
        let mut splitter =
            LineSplitter::new(rdr, self.opts.eol, self.opts.strip_cr);
        while let Some(line) = splitter.next_line()? {
            let is_match =
                self.matcher.is_match(&line.bytes) != self.opts.invert_match;
            if is_match {
                self.selected += 1;
                let answered = self.opts.quiet || match self.opts.output {
                    OutputMode::FilesWithMatches
                    | OutputMode::FilesWithoutMatch => true,
                    _ => false,
                };
                if answered {
                    break;
                }
                if self.emitting() {
                    self.drain_before(line.number);
                    let spans = if self.opts.invert_match {
                        vec![]
                    } else {
                        self.matcher.find_spans(&line.bytes)
                    };
                    self.emit(Role::Match, &line, spans);
                }
                self.remaining_after = self.opts.after_context;
                if self.opts.hit_max_count(self.selected) {
                    if self.emitting() {
                        self.drain_after(&mut splitter)?;
                    }
                    break;
                }
            } else if self.remaining_after > 0 {
                if self.emitting() {
                    self.emit(Role::AfterContext, &line, vec![]);
                }
                self.remaining_after -= 1;
            } else if self.opts.before_context > 0 && self.emitting() {
                if self.before.len() == self.opts.before_context {
                    self.before.pop_front();
                }
                self.before.push_back(line);
            }
        }
        Ok(self.finish())
    }

    /// Whether line records are produced at all for this source.
    fn emitting(&self) -> bool {
        !self.suppress
            && !self.opts.quiet
            && self.opts.output == OutputMode::Lines
    }

    /// Emit the pending before-context lines, placing a group separator
    /// first when the upcoming emission does not abut the previous one.
    fn drain_before(&mut self, match_number: u64) {
        let first = self.before.front().map_or(match_number, |l| l.number);
        self.maybe_group_separator(first);
        while let Some(line) = self.before.pop_front() {
            let rec = Record {
                path: self.path.clone(),
                number: line.number,
                offset: line.offset,
                bytes: line.bytes,
                spans: vec![],
                role: Role::BeforeContext,
            };
            self.last_emitted = rec.number;
            self.push(rec);
        }
    }

    /// Emit trailing after-context once the selected-line limit is hit,
    /// then give up on the source.
    fn drain_after<R: Read>(
        &mut self,
        splitter: &mut LineSplitter<io::Chain<io::Cursor<Vec<u8>>, R>>,
    ) -> io::Result<()> {
        while self.remaining_after > 0 {
            match splitter.next_line()? {
                None => break,
                Some(line) => {
                    self.emit(Role::AfterContext, &line, vec![]);
                    self.remaining_after -= 1;
                }
            }
        }
        Ok(())
    }

    fn maybe_group_separator(&mut self, next_number: u64) {
        if !self.opts.group_separator {
            return;
        }
        if self.opts.before_context == 0 && self.opts.after_context == 0 {
            return;
        }
        if self.last_emitted == 0 || next_number <= self.last_emitted + 1 {
            return;
        }
        self.push(Record {
            path: self.path.clone(),
            number: 0,
            offset: 0,
            bytes: vec![],
            spans: vec![],
            role: Role::GroupSeparator,
        });
    }

    fn emit(&mut self, role: Role, line: &Line, spans: Vec<(usize, usize)>) {
        self.last_emitted = line.number;
        self.push(Record {
            path: self.path.clone(),
            number: line.number,
            offset: line.offset,
            bytes: line.bytes.clone(),
            spans: spans,
            role: role,
        });
    }

    fn push(&mut self, rec: Record) {
        if self.capture {
            self.results.records.push(rec);
        } else {
            self.printer.write_record(&rec);
        }
    }

    /// Record the per-source summary and any end-of-source output.
    /// Returns true when the whole run should stop.
    fn finish(self) -> bool {
        let matched = self.selected > 0;
        if self.suppress && matched {
            self.results.info.push(Note::new(
                &self.path,
                "binary file matches",
            ));
            if !self.capture
                && !self.opts.quiet
                && self.opts.output == OutputMode::Lines
            {
                self.printer.binary_matched(&self.path);
            }
        }
        if !self.capture && !self.opts.quiet {
            match self.opts.output {
                OutputMode::Lines => {}
                OutputMode::Count => {
                    self.printer.path_count(&self.path, self.selected);
                }
                OutputMode::FilesWithMatches => {
                    if matched {
                        self.printer.path(&self.path);
                    }
                }
                OutputMode::FilesWithoutMatch => {
                    if !matched {
                        self.printer.path(&self.path);
                    }
                }
            }
        }
        let records = if self.capture
            && self.results.records.len() > self.records_start
        {
            Some((self.records_start, self.results.records.len() - 1))
        } else {
            None
        };
        self.results.files.push(FileSummary {
            path: self.path,
            matched: matched,
            count: self.selected,
            records: records,
        });
        self.opts.quiet && matched
    }
}

/// Read up to `PEEK_SIZE` bytes for binary sniffing. Short reads are
/// retried so that a pipe delivering one byte at a time still gets a fair
/// classification.
fn read_peek<R: Read>(rdr: &mut R) -> io::Result<Vec<u8>> {
    let mut buf = vec![0; PEEK_SIZE];
    let mut filled = 0;
    while filled < buf.len() {
        let n = rdr.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    buf.truncate(filled);
    Ok(buf)
}
