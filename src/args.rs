/*!
The args module turns parsed command line matches into a compiled `Grep`. It
is the only place that reads the environment (for `GREP_COLORS`) and probes
the terminal; the engine itself gets plain values.
*/

use std::env;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process;

use rep::{
    BinaryMode, ColorChoice, Dialect, DirAction, Error, Grep, GrepBuilder,
    OutputMode, unescape,
};

use crate::app;

/// Parse the command line arguments for this process.
///
/// If a usage error occurred, print it and exit with grep's configuration
/// error code. Also initializes the global logger.
pub fn parse() -> rep::Result<Grep> {
    let matches = match app::app().get_matches_safe() {
        Ok(matches) => matches,
        Err(err) => {
            if err.use_stderr() {
                eprintln!("{}", err);
                process::exit(2);
            }
            // --help and --version go to stdout with a zero exit.
            err.exit();
        }
    };
    init_logger(matches.is_present("debug"));
    ArgMatches(matches).to_grep()
}

fn init_logger(debug: bool) {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new().filter_level(level).init();
}

/// A thin wrapper over clap's matches with typed accessors.
struct ArgMatches<'a>(clap::ArgMatches<'a>);

impl<'a> ArgMatches<'a> {
    fn to_grep(&self) -> rep::Result<Grep> {
        let paths = self.paths();
        let recursing = match self.directories() {
            DirAction::Recurse | DirAction::RecurseFollow => true,
            _ => false,
        };
        let mut builder = GrepBuilder::new()
            .dialect(self.dialect())
            .ignore_case(self.0.is_present("ignore-case"))
            .word_regexp(self.0.is_present("word-regexp"))
            .line_regexp(self.0.is_present("line-regexp"))
            .invert_match(self.0.is_present("invert-match"))
            .max_count(self.u64_of("max-count")?)
            .before_context(self.before_context()?)
            .after_context(self.after_context()?)
            .output_mode(self.output_mode())
            .binary_mode(self.binary_mode())
            .directories(self.directories())
            .eol(self.eol())
            .strip_cr(self.0.is_present("crlf"))
            .color(self.color_choice())
            .tty(atty::is(atty::Stream::Stdout))
            .quiet(self.0.is_present("quiet"))
            .no_messages(self.0.is_present("no-messages"))
            .with_filename(self.with_filename(&paths, recursing))
            .line_number(self.0.is_present("line-number"))
            .byte_offset(self.0.is_present("byte-offset"))
            .only_matching(self.0.is_present("only-matching"))
            .line_buffered(self.0.is_present("line-buffered"))
            .initial_tab(self.0.is_present("initial-tab"))
            .null_after_header(self.0.is_present("null"))
            .stdin(true);
        for pattern in self.patterns()? {
            builder = builder.pattern(pattern);
        }
        for path in paths {
            builder = builder.path(path);
        }
        for glob in self.values_of("include") {
            builder = builder.include(glob);
        }
        for glob in self.values_of("exclude") {
            builder = builder.exclude(glob);
        }
        for glob in self.values_of("exclude-dir") {
            builder = builder.exclude_dir(glob);
        }
        if let Some(label) = self.0.value_of("label") {
            builder = builder.label(label);
        }
        if let Ok(spec) = env::var("GREP_COLORS") {
            builder = builder.color_env(spec);
        }
        if self.0.is_present("no-group-separator") {
            builder = builder.group_separator(None);
        } else if let Some(sep) = self.0.value_of("group-separator") {
            builder = builder.group_separator(Some(unescape(sep)));
        }
        builder.build()
    }

    /// Returns true if patterns came from `-e` or `-f`, in which case the
    /// positional pattern slot actually holds a path.
    fn explicit_patterns(&self) -> bool {
        self.0.is_present("regexp") || self.0.is_present("file")
    }

    fn patterns(&self) -> rep::Result<Vec<String>> {
        let mut patterns = vec![];
        if let Some(vals) = self.0.values_of("regexp") {
            for val in vals {
                if val.is_empty() {
                    // An empty pattern selects every line.
                    patterns.push(String::new());
                } else {
                    patterns.extend(val.lines().map(str::to_string));
                }
            }
        }
        if let Some(files) = self.0.values_of("file") {
            for file in files {
                let rdr = io::BufReader::new(File::open(file)?);
                for line in rdr.lines() {
                    patterns.push(line?);
                }
            }
        }
        if !self.explicit_patterns() {
            if let Some(val) = self.0.value_of("pattern") {
                if val.is_empty() {
                    patterns.push(String::new());
                } else {
                    patterns.extend(val.lines().map(str::to_string));
                }
            }
        }
        Ok(patterns)
    }

    fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .0
            .values_of_os("path")
            .map(|vals| vals.map(PathBuf::from).collect())
            .unwrap_or_else(Vec::new);
        if self.explicit_patterns() {
            if let Some(first) = self.0.value_of_os("pattern") {
                paths.insert(0, PathBuf::from(first));
            }
        }
        paths
    }

    fn values_of(&self, name: &str) -> Vec<String> {
        self.0
            .values_of(name)
            .map(|vals| vals.map(str::to_string).collect())
            .unwrap_or_else(Vec::new)
    }

    fn dialect(&self) -> Dialect {
        if self.0.is_present("extended-regexp") {
            Dialect::Extended
        } else if self.0.is_present("fixed-strings") {
            Dialect::Fixed
        } else if self.0.is_present("perl-regexp") {
            Dialect::Perl
        } else {
            Dialect::Basic
        }
    }

    fn output_mode(&self) -> OutputMode {
        if self.0.is_present("count") {
            OutputMode::Count
        } else if self.0.is_present("files-with-matches") {
            OutputMode::FilesWithMatches
        } else if self.0.is_present("files-without-match") {
            OutputMode::FilesWithoutMatch
        } else {
            OutputMode::Lines
        }
    }

    fn binary_mode(&self) -> BinaryMode {
        if self.0.is_present("text") {
            BinaryMode::Text
        } else if self.0.is_present("binary-without-match") {
            BinaryMode::WithoutMatch
        } else {
            match self.0.value_of("binary-files") {
                Some("text") => BinaryMode::Text,
                Some("without-match") => BinaryMode::WithoutMatch,
                _ => BinaryMode::Binary,
            }
        }
    }

    fn directories(&self) -> DirAction {
        if self.0.is_present("dereference-recursive") {
            DirAction::RecurseFollow
        } else if self.0.is_present("recursive") {
            DirAction::Recurse
        } else {
            match self.0.value_of("directories") {
                Some("recurse") => DirAction::Recurse,
                Some("skip") => DirAction::Skip,
                _ => DirAction::Read,
            }
        }
    }

    fn with_filename(&self, paths: &[PathBuf], recursing: bool) -> bool {
        if self.0.is_present("with-filename") {
            true
        } else if self.0.is_present("no-filename") {
            false
        } else {
            paths.len() > 1 || recursing
        }
    }

    fn color_choice(&self) -> ColorChoice {
        if !self.0.is_present("color") {
            // grep's default: no color unless asked.
            return ColorChoice::Never;
        }
        match self.0.value_of("color") {
            Some("always") => ColorChoice::Always,
            Some("never") => ColorChoice::Never,
            _ => ColorChoice::Auto,
        }
    }

    fn eol(&self) -> u8 {
        if self.0.is_present("null-data") {
            b'\x00'
        } else {
            b'\n'
        }
    }

    fn u64_of(&self, name: &str) -> rep::Result<Option<u64>> {
        match self.0.value_of(name) {
            None => Ok(None),
            Some(val) => val.parse().map(Some).map_err(|_| {
                Error::Config(format!("invalid numeric argument '{}'", val))
            }),
        }
    }

    fn usize_of(&self, name: &str) -> rep::Result<Option<usize>> {
        match self.0.value_of(name) {
            None => Ok(None),
            Some(val) => val.parse().map(Some).map_err(|_| {
                Error::Config(format!("invalid numeric argument '{}'", val))
            }),
        }
    }

    fn before_context(&self) -> rep::Result<usize> {
        let both = self.usize_of("context")?.unwrap_or(0);
        Ok(self.usize_of("before-context")?.unwrap_or(both))
    }

    fn after_context(&self) -> rep::Result<usize> {
        let both = self.usize_of("context")?.unwrap_or(0);
        Ok(self.usize_of("after-context")?.unwrap_or(both))
    }
}
