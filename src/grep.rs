/*!
The grep module is the embeddable surface over the engine: a builder holding
every tunable, a compiled `Grep` value, and `execute`, which runs the
traversal → scanner → printer pipeline over all configured inputs and
returns the aggregated results.
*/

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::color::{ColorChoice, Palette};
use crate::pattern::{Dialect, Matcher, MatcherBuilder};
use crate::printer::{Printer, Separators};
use crate::results::{Note, Results};
use crate::search_stream::{BinaryMode, Options, OutputMode, Searcher};
use crate::walk::{DirAction, FileFilter, Source, Walker};
use crate::{Error, Result};

/// A builder for a search run.
///
/// Patterns and inputs are required (a lone `-` or an empty path list with
/// the default stream enabled counts as an input); everything else has
/// grep's defaults.
#[derive(Clone, Debug)]
pub struct GrepBuilder {
    patterns: Vec<String>,
    paths: Vec<PathBuf>,
    dialect: Dialect,
    ignore_case: bool,
    word_regexp: bool,
    line_regexp: bool,
    invert_match: bool,
    max_count: Option<u64>,
    before_context: usize,
    after_context: usize,
    output: OutputMode,
    binary: BinaryMode,
    directories: DirAction,
    include: Vec<String>,
    exclude: Vec<String>,
    exclude_dir: Vec<String>,
    label: String,
    eol: u8,
    strip_cr: bool,
    color: ColorChoice,
    color_env: Option<String>,
    tty: bool,
    quiet: bool,
    no_messages: bool,
    with_filename: bool,
    line_number: bool,
    byte_offset: bool,
    only_matching: bool,
    line_buffered: bool,
    initial_tab: bool,
    null_after_header: bool,
    separators: Separators,
    stdin: bool,
}

impl Default for GrepBuilder {
    fn default() -> GrepBuilder {
        GrepBuilder {
            patterns: vec![],
            paths: vec![],
            dialect: Dialect::Basic,
            ignore_case: false,
            word_regexp: false,
            line_regexp: false,
            invert_match: false,
            max_count: None,
            before_context: 0,
            after_context: 0,
            output: OutputMode::Lines,
            binary: BinaryMode::Binary,
            directories: DirAction::Read,
            include: vec![],
            exclude: vec![],
            exclude_dir: vec![],
            label: "(standard input)".to_string(),
            eol: b'\n',
            strip_cr: false,
            color: ColorChoice::Auto,
            color_env: None,
            tty: false,
            quiet: false,
            no_messages: false,
            with_filename: false,
            line_number: false,
            byte_offset: false,
            only_matching: false,
            line_buffered: false,
            initial_tab: false,
            null_after_header: false,
            separators: Separators::default(),
            stdin: false,
        }
    }
}

impl GrepBuilder {
    pub fn new() -> GrepBuilder {
        GrepBuilder::default()
    }

    /// Add one pattern. Patterns combine disjunctively.
    pub fn pattern<S: Into<String>>(mut self, pattern: S) -> GrepBuilder {
        self.patterns.push(pattern.into());
        self
    }

    /// Add one input path. `-` denotes the default stream.
    pub fn path<P: AsRef<Path>>(mut self, path: P) -> GrepBuilder {
        self.paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Set the pattern dialect. The default is the basic dialect.
    pub fn dialect(mut self, dialect: Dialect) -> GrepBuilder {
        self.dialect = dialect;
        self
    }

    /// If enabled, patterns match case insensitively.
    pub fn ignore_case(mut self, yes: bool) -> GrepBuilder {
        self.ignore_case = yes;
        self
    }

    /// If enabled, patterns only match at word boundaries.
    pub fn word_regexp(mut self, yes: bool) -> GrepBuilder {
        self.word_regexp = yes;
        self
    }

    /// If enabled, patterns must match entire lines.
    pub fn line_regexp(mut self, yes: bool) -> GrepBuilder {
        self.line_regexp = yes;
        self
    }

    /// If enabled, lines that do *not* match are selected.
    pub fn invert_match(mut self, yes: bool) -> GrepBuilder {
        self.invert_match = yes;
        self
    }

    /// Stop searching a source once this many lines were selected. Context
    /// lines do not count against the limit.
    pub fn max_count(mut self, count: Option<u64>) -> GrepBuilder {
        self.max_count = count;
        self
    }

    /// The number of context lines to show before each match.
    pub fn before_context(mut self, count: usize) -> GrepBuilder {
        self.before_context = count;
        self
    }

    /// The number of context lines to show after each match.
    pub fn after_context(mut self, count: usize) -> GrepBuilder {
        self.after_context = count;
        self
    }

    /// Select the per-source output shape: lines, a count, or file names.
    pub fn output_mode(mut self, mode: OutputMode) -> GrepBuilder {
        self.output = mode;
        self
    }

    /// Set the binary file policy.
    pub fn binary_mode(mut self, mode: BinaryMode) -> GrepBuilder {
        self.binary = mode;
        self
    }

    /// Set what to do with directory inputs.
    pub fn directories(mut self, action: DirAction) -> GrepBuilder {
        self.directories = action;
        self
    }

    /// Only search files whose basename matches the glob. May be given
    /// multiple times; any match admits the file.
    pub fn include<S: Into<String>>(mut self, glob: S) -> GrepBuilder {
        self.include.push(glob.into());
        self
    }

    /// Skip files whose basename matches the glob.
    pub fn exclude<S: Into<String>>(mut self, glob: S) -> GrepBuilder {
        self.exclude.push(glob.into());
        self
    }

    /// Skip directories whose basename matches the glob during recursion.
    pub fn exclude_dir<S: Into<String>>(mut self, glob: S) -> GrepBuilder {
        self.exclude_dir.push(glob.into());
        self
    }

    /// The display name of the default stream.
    pub fn label<S: Into<String>>(mut self, label: S) -> GrepBuilder {
        self.label = label.into();
        self
    }

    /// The line delimiter, for input and output both. The default is `\n`;
    /// NUL turns off binary detection.
    pub fn eol(mut self, eol: u8) -> GrepBuilder {
        self.eol = eol;
        self
    }

    /// If enabled, a `\r` preceding the delimiter is stripped from the
    /// line's contents. Offsets still count it.
    pub fn strip_cr(mut self, yes: bool) -> GrepBuilder {
        self.strip_cr = yes;
        self
    }

    /// When to color output.
    pub fn color(mut self, choice: ColorChoice) -> GrepBuilder {
        self.color = choice;
        self
    }

    /// Seed the palette from a `GREP_COLORS` style string. The caller reads
    /// the environment; this type never does.
    pub fn color_env<S: Into<String>>(mut self, spec: S) -> GrepBuilder {
        self.color_env = Some(spec.into());
        self
    }

    /// Tell the engine whether the sink is a terminal, for resolving the
    /// auto color choice.
    pub fn tty(mut self, yes: bool) -> GrepBuilder {
        self.tty = yes;
        self
    }

    /// If enabled, don't show any output and stop the whole run after the
    /// first selected line.
    pub fn quiet(mut self, yes: bool) -> GrepBuilder {
        self.quiet = yes;
        self
    }

    /// If enabled, suppress error messages on the error sink. Errors are
    /// still recorded in the returned results.
    pub fn no_messages(mut self, yes: bool) -> GrepBuilder {
        self.no_messages = yes;
        self
    }

    /// If enabled, each record is prefixed with the file name it came from.
    pub fn with_filename(mut self, yes: bool) -> GrepBuilder {
        self.with_filename = yes;
        self
    }

    /// If enabled, each record is prefixed with its 1-based line number.
    pub fn line_number(mut self, yes: bool) -> GrepBuilder {
        self.line_number = yes;
        self
    }

    /// If enabled, each record carries a byte offset: the line's, or each
    /// match's with only-matching.
    pub fn byte_offset(mut self, yes: bool) -> GrepBuilder {
        self.byte_offset = yes;
        self
    }

    /// If enabled, print only the matching spans, one record per span.
    pub fn only_matching(mut self, yes: bool) -> GrepBuilder {
        self.only_matching = yes;
        self
    }

    /// If enabled, the sink is flushed after every record.
    pub fn line_buffered(mut self, yes: bool) -> GrepBuilder {
        self.line_buffered = yes;
        self
    }

    /// If enabled, a tab is appended to the result separators.
    pub fn initial_tab(mut self, yes: bool) -> GrepBuilder {
        self.initial_tab = yes;
        self
    }

    /// If enabled, a NUL byte follows the final header separator of each
    /// record.
    pub fn null_after_header(mut self, yes: bool) -> GrepBuilder {
        self.null_after_header = yes;
        self
    }

    /// Replace the whole separator family. The library takes raw bytes;
    /// escape decoding is the command line's business.
    pub fn separators(mut self, seps: Separators) -> GrepBuilder {
        self.separators = seps;
        self
    }

    /// Set the group separator, or suppress it with `None`.
    pub fn group_separator(mut self, sep: Option<Vec<u8>>) -> GrepBuilder {
        self.separators.group = sep;
        self
    }

    /// If enabled, an empty path list falls back to the default stream.
    pub fn stdin(mut self, yes: bool) -> GrepBuilder {
        self.stdin = yes;
        self
    }

    /// Compile the configuration. Pattern and glob problems, an empty
    /// pattern list and a missing input are all reported here, before any
    /// scanning begins.
    pub fn build(self) -> Result<Grep> {
        if self.patterns.is_empty() {
            return Err(Error::NoPatterns);
        }
        if self.paths.is_empty() && !self.stdin {
            return Err(Error::NoInputs);
        }
        let matcher = MatcherBuilder::new()
            .dialect(self.dialect)
            .ignore_case(self.ignore_case)
            .word_regexp(self.word_regexp)
            .line_regexp(self.line_regexp)
            .build(&self.patterns)?;
        let filter =
            FileFilter::new(&self.include, &self.exclude, &self.exclude_dir)?;
        let palette = match self.color_env {
            Some(ref spec) => Palette::from_env(spec),
            None => Palette::default(),
        }
        .resolved();
        let mut separators = self.separators.clone();
        if self.initial_tab {
            separators = separators.with_initial_tab();
        }
        let opts = Options {
            before_context: self.before_context,
            after_context: self.after_context,
            invert_match: self.invert_match,
            max_count: self.max_count,
            quiet: self.quiet,
            binary: self.binary,
            output: self.output,
            eol: self.eol,
            strip_cr: self.strip_cr,
            group_separator: separators.group.is_some(),
        };
        Ok(Grep {
            matcher: matcher,
            filter: filter,
            palette: palette,
            separators: separators,
            color: self.color.should_color(self.tty),
            opts: opts,
            paths: self.paths,
            directories: self.directories,
            label: self.label,
            quiet: self.quiet,
            no_messages: self.no_messages,
            with_filename: self.with_filename,
            line_number: self.line_number,
            byte_offset: self.byte_offset,
            only_matching: self.only_matching,
            line_buffered: self.line_buffered,
            null_after_header: self.null_after_header,
        })
    }
}

/// A compiled search, ready to execute any number of times.
#[derive(Clone, Debug)]
pub struct Grep {
    matcher: Matcher,
    filter: FileFilter,
    palette: Palette,
    separators: Separators,
    color: bool,
    opts: Options,
    paths: Vec<PathBuf>,
    directories: DirAction,
    label: String,
    quiet: bool,
    no_messages: bool,
    with_filename: bool,
    line_number: bool,
    byte_offset: bool,
    only_matching: bool,
    line_buffered: bool,
    null_after_header: bool,
}

impl Grep {
    /// Run the search, writing output to stdout.
    ///
    /// With `capture` set, records land in the returned results instead of
    /// the sink, and nothing is written at all.
    pub fn execute(&self, capture: bool) -> Result<Results> {
        let stdout = io::stdout();
        let mut wtr = io::BufWriter::new(stdout.lock());
        let results = self.execute_to(&mut wtr, capture)?;
        let _ = wtr.flush();
        Ok(results)
    }

    /// Like `execute`, but writes to the given sink.
    pub fn execute_to<W: io::Write>(
        &self,
        wtr: &mut W,
        capture: bool,
    ) -> Result<Results> {
        let mut results = Results::default();
        let mut printer = self.printer(wtr);
        let walker =
            Walker::new(&self.filter, self.directories, self.no_messages);
        let sources = if self.paths.is_empty() {
            vec![Source::Stdin]
        } else {
            walker.walk(&self.paths, &mut results)
        };
        let mut searcher =
            Searcher::new(&self.opts, &self.matcher, &mut printer, capture);
        for source in sources {
            let stop = match source {
                Source::Stdin => {
                    let stdin = io::stdin();
                    let lock = stdin.lock();
                    let label = Path::new(&self.label);
                    match searcher.search(&mut results, label, lock) {
                        Ok(stop) => stop,
                        Err(err) => {
                            self.error(&mut results, label, &err);
                            false
                        }
                    }
                }
                Source::File(path) => match self.open(&path, &mut results) {
                    None => false,
                    Some(file) => {
                        debug!("searching {}", path.display());
                        match searcher.search(&mut results, &path, file) {
                            Ok(stop) => stop,
                            Err(err) => {
                                self.error(&mut results, &path, &err);
                                false
                            }
                        }
                    }
                },
            };
            if stop {
                break;
            }
        }
        drop(searcher);
        printer.flush();
        Ok(results)
    }

    /// Returns true if and only if this search runs in quiet mode, which
    /// makes a match trump any recorded error in the exit code.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    fn open(&self, path: &Path, results: &mut Results) -> Option<File> {
        match fs::metadata(path) {
            Ok(ref md) if md.is_dir() => {
                self.error_msg(results, path, "Is a directory");
                None
            }
            _ => match File::open(path) {
                Ok(file) => Some(file),
                Err(err) => {
                    self.error(results, path, &err);
                    None
                }
            },
        }
    }

    fn error(&self, results: &mut Results, path: &Path, err: &io::Error) {
        self.error_msg(results, path, &err.to_string());
    }

    fn error_msg(&self, results: &mut Results, path: &Path, msg: &str) {
        if !self.no_messages {
            eprintln!("rep: {}: {}", path.display(), msg);
        }
        results.errors.push(Note::new(path, msg));
    }

    fn printer<W: io::Write>(&self, wtr: W) -> Printer<W> {
        Printer::new(wtr)
            .palette(&self.palette, self.color)
            .eol(self.opts.eol)
            .separators(self.separators.clone())
            .with_filename(self.with_filename)
            .line_number(self.line_number)
            .byte_offset(self.byte_offset)
            .only_matching(self.only_matching)
            .null_after_header(self.null_after_header)
            .line_buffered(self.line_buffered)
    }
}
