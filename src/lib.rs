/*!
rep is a line oriented search engine faithful to the classic grep interface,
usable as a library and as a command line tool over the same code.

The pipeline is traversal → per-source scanner → line splitter → matcher →
context window → printer, with results aggregated into a single value. A
search is configured through `GrepBuilder` and run with `Grep::execute`:

```no_run
use rep::GrepBuilder;

# fn example() -> rep::Result<()> {
let grep = GrepBuilder::new()
    .pattern("et")
    .path("a.txt")
    .line_number(true)
    .build()?;
let results = grep.execute(false)?;
assert!(results.any_match());
# Ok(()) }
```
*/

use std::error;
use std::fmt;
use std::io;
use std::result;

pub use crate::color::{ColorChoice, Palette};
pub use crate::grep::{Grep, GrepBuilder};
pub use crate::lines::{Line, LineSplitter};
pub use crate::pattern::{Dialect, Matcher, MatcherBuilder};
pub use crate::printer::{Printer, Separators};
pub use crate::results::{FileSummary, Note, Record, Results, Role};
pub use crate::search_stream::{BinaryMode, Options, OutputMode, Searcher};
pub use crate::unescape::unescape;
pub use crate::walk::{DirAction, FileFilter, Source, Walker};

mod color;
mod grep;
mod lines;
mod pattern;
mod printer;
mod results;
mod search_stream;
mod unescape;
mod walk;

pub type Result<T> = result::Result<T, Error>;

/// Error describes the fatal configuration errors reported before any
/// scanning begins. Per-source I/O problems are not fatal; they are
/// recorded in the returned `Results` instead.
#[derive(Debug)]
pub enum Error {
    /// No patterns were provided.
    NoPatterns,
    /// No paths were provided and the default stream is not enabled.
    NoInputs,
    /// A pattern failed to compile.
    Regex(regex::Error),
    /// An include/exclude glob failed to compile.
    Glob(globset::Error),
    /// A configuration input (e.g. a pattern file) could not be read.
    Io(io::Error),
    /// Any other configuration problem, e.g. a malformed numeric argument.
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::NoPatterns => write!(f, "no pattern given"),
            Error::NoInputs => write!(f, "no files or streams to search"),
            Error::Regex(ref err) => err.fmt(f),
            Error::Glob(ref err) => err.fmt(f),
            Error::Io(ref err) => err.fmt(f),
            Error::Config(ref msg) => write!(f, "{}", msg),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Regex(ref err) => Some(err),
            Error::Glob(ref err) => Some(err),
            Error::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Error {
        Error::Regex(err)
    }
}

impl From<globset::Error> for Error {
    fn from(err: globset::Error) -> Error {
        Error::Glob(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}
