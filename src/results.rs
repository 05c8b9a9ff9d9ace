/*!
The results module defines the value returned by a run: per-file summaries,
optionally captured output records, informational notes and errors. One run
owns one `Results`; everything is recorded in emission order.
*/

use std::path::{Path, PathBuf};

/// How an emitted record relates to the match that produced it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    /// A selected line.
    Match,
    /// A line shown because it precedes a selected line.
    BeforeContext,
    /// A line shown because it follows a selected line.
    AfterContext,
    /// The marker between disjoint context groups. Carries no line data.
    GroupSeparator,
}

/// A single emitted output record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    /// The originating file path, or the label of the default stream.
    pub path: PathBuf,
    /// 1-based line number. Zero for group separators.
    pub number: u64,
    /// Byte offset of the line's first byte in its source.
    pub offset: u64,
    /// The line's contents, without its terminator.
    pub bytes: Vec<u8>,
    /// Match spans within `bytes`, sorted and non-overlapping. Empty for
    /// context records and for inverted matches.
    pub spans: Vec<(usize, usize)>,
    pub role: Role,
}

impl Record {
    /// Returns true if and only if this record is a context line.
    pub fn is_context(&self) -> bool {
        match self.role {
            Role::BeforeContext | Role::AfterContext => true,
            Role::Match | Role::GroupSeparator => false,
        }
    }
}

/// The outcome of searching one source.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileSummary {
    pub path: PathBuf,
    /// Whether any line was selected.
    pub matched: bool,
    /// The number of selected lines, bounded by max count when set.
    pub count: u64,
    /// When capturing, the inclusive range of indices into the captured
    /// record list that belong to this source.
    pub records: Option<(usize, usize)>,
}

/// A message attached to a path: an informational note or an error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Note {
    pub path: PathBuf,
    pub message: String,
}

impl Note {
    pub fn new<P: AsRef<Path>, S: Into<String>>(path: P, message: S) -> Note {
        Note {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }
}

/// Everything one run produced, in emission order.
#[derive(Clone, Debug, Default)]
pub struct Results {
    /// One summary per searched source, in search order.
    pub files: Vec<FileSummary>,
    /// Captured output records. Empty unless capturing was requested.
    pub records: Vec<Record>,
    /// Informational notes, e.g. a binary file that matched.
    pub info: Vec<Note>,
    /// Per-source and traversal errors. A run keeps going past these.
    pub errors: Vec<Note>,
}

impl Results {
    /// Returns true if and only if any source had a selected line.
    pub fn any_match(&self) -> bool {
        self.files.iter().any(|f| f.matched)
    }

    /// The total number of selected lines across all sources.
    pub fn total_count(&self) -> u64 {
        self.files.iter().map(|f| f.count).sum()
    }

    /// The captured records belonging to the given summary.
    pub fn file_records(&self, summary: &FileSummary) -> &[Record] {
        match summary.records {
            None => &[],
            Some((start, end)) => &self.records[start..end + 1],
        }
    }

    /// grep's exit code contract: 2 if any error was recorded, otherwise 0
    /// if anything matched, otherwise 1.
    pub fn exit_code(&self) -> i32 {
        if !self.errors.is_empty() {
            2
        } else if self.any_match() {
            0
        } else {
            1
        }
    }
}
