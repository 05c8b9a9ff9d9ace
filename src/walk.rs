/*!
The walk module expands the user-supplied path list into an ordered list of
sources. Directories are handled according to the configured action, children
are visited in lexicographic order, and the include/exclude/exclude-dir glob
lists decide which files are searched at all.
*/

use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use walkdir::WalkDir;

use crate::results::{Note, Results};
use crate::Result;

/// What to do when an input path names a directory.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DirAction {
    /// Treat the directory like a file, which reports an error when the
    /// scanner tries to read it. The default, matching grep.
    Read,
    /// Search every file beneath it.
    Recurse,
    /// Like Recurse, but follow symbolic links. Link cycles halt the
    /// affected branch with a note.
    RecurseFollow,
    /// Ignore it.
    Skip,
}

impl Default for DirAction {
    fn default() -> DirAction {
        DirAction::Read
    }
}

/// A single search input produced by traversal.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Source {
    /// The default stream, displayed under the configured label.
    Stdin,
    File(PathBuf),
}

/// The compiled include/exclude policy. All globs are tested against path
/// basenames.
#[derive(Clone, Debug)]
pub struct FileFilter {
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
    exclude_dir: Option<GlobSet>,
}

impl FileFilter {
    /// Compile the three glob lists. An empty include list admits every
    /// file; empty exclude lists reject nothing.
    pub fn new(
        include: &[String],
        exclude: &[String],
        exclude_dir: &[String],
    ) -> Result<FileFilter> {
        Ok(FileFilter {
            include: build_set(include)?,
            exclude: build_set(exclude)?,
            exclude_dir: build_set(exclude_dir)?,
        })
    }

    /// Returns true if and only if a file with this path should be
    /// searched.
    pub fn accepts_file(&self, path: &Path) -> bool {
        let name = match path.file_name() {
            None => return true,
            Some(name) => Path::new(name),
        };
        if let Some(ref include) = self.include {
            if !include.is_match(name) {
                return false;
            }
        }
        if let Some(ref exclude) = self.exclude {
            if exclude.is_match(name) {
                return false;
            }
        }
        true
    }

    /// Returns true if and only if recursion should skip this directory.
    pub fn skips_dir(&self, path: &Path) -> bool {
        let name = match path.file_name() {
            None => return false,
            Some(name) => Path::new(name),
        };
        match self.exclude_dir {
            None => false,
            Some(ref exclude) => exclude.is_match(name),
        }
    }
}

fn build_set(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(Some(builder.build()?))
}

/// Walker turns user paths into sources.
pub struct Walker<'a> {
    filter: &'a FileFilter,
    action: DirAction,
    no_messages: bool,
}

impl<'a> Walker<'a> {
    pub fn new(
        filter: &'a FileFilter,
        action: DirAction,
        no_messages: bool,
    ) -> Walker<'a> {
        Walker {
            filter: filter,
            action: action,
            no_messages: no_messages,
        }
    }

    /// Expand the path list in order. Traversal problems are recorded on
    /// `results` and never abort the walk.
    pub fn walk(
        &self,
        paths: &[PathBuf],
        results: &mut Results,
    ) -> Vec<Source> {
        let mut sources = vec![];
        for path in paths {
            if path.as_os_str() == "-" {
                sources.push(Source::Stdin);
                continue;
            }
            let md = match fs::metadata(path) {
                Ok(md) => md,
                Err(err) => {
                    self.error(results, path, &err.to_string());
                    continue;
                }
            };
            if md.is_dir() {
                match self.action {
                    DirAction::Skip => {
                        results.info.push(Note::new(path, "is a directory"));
                    }
                    DirAction::Read => {
                        sources.push(Source::File(path.clone()));
                    }
                    DirAction::Recurse | DirAction::RecurseFollow => {
                        self.recurse(path, results, &mut sources);
                    }
                }
            } else if self.filter.accepts_file(path) {
                sources.push(Source::File(path.clone()));
            }
        }
        sources
    }

    fn recurse(
        &self,
        root: &Path,
        results: &mut Results,
        sources: &mut Vec<Source>,
    ) {
        let follow = self.action == DirAction::RecurseFollow;
        let mut it = WalkDir::new(root)
            .follow_links(follow)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
            .into_iter();
        loop {
            let entry = match it.next() {
                None => break,
                Some(Ok(entry)) => entry,
                Some(Err(err)) => {
                    let path = err
                        .path()
                        .map(|p| p.to_path_buf())
                        .unwrap_or_else(|| root.to_path_buf());
                    if err.loop_ancestor().is_some() {
                        // A cycle only halts the branch it was found on.
                        results.info.push(Note::new(
                            &path,
                            "recursive directory loop",
                        ));
                    } else {
                        let msg = err
                            .io_error()
                            .map(|e| e.to_string())
                            .unwrap_or_else(|| err.to_string());
                        self.error(results, &path, &msg);
                    }
                    continue;
                }
            };
            if entry.file_type().is_dir() {
                if entry.depth() > 0 && self.filter.skips_dir(entry.path()) {
                    debug!("{}: excluded directory", entry.path().display());
                    it.skip_current_dir();
                }
                continue;
            }
            if !entry.file_type().is_file() {
                // Sockets, fifos and unfollowed symlinks are not searched.
                debug!("{}: skipping non regular file", entry.path().display());
                continue;
            }
            if self.filter.accepts_file(entry.path()) {
                sources.push(Source::File(entry.into_path()));
            }
        }
    }

    fn error(&self, results: &mut Results, path: &Path, msg: &str) {
        if !self.no_messages {
            eprintln!("rep: {}: {}", path.display(), msg);
        }
        results.errors.push(Note::new(path, msg));
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::FileFilter;

    fn filter(
        include: &[&str],
        exclude: &[&str],
        exclude_dir: &[&str],
    ) -> FileFilter {
        let own = |pats: &[&str]| -> Vec<String> {
            pats.iter().map(|s| s.to_string()).collect()
        };
        FileFilter::new(&own(include), &own(exclude), &own(exclude_dir))
            .unwrap()
    }

    #[test]
    fn empty_filter_accepts_everything() {
        let f = filter(&[], &[], &[]);
        assert!(f.accepts_file(Path::new("dir/a.log")));
        assert!(!f.skips_dir(Path::new("dir/sub")));
    }

    #[test]
    fn include_restricts() {
        let f = filter(&["*.log"], &[], &[]);
        assert!(f.accepts_file(Path::new("dir/a.log")));
        assert!(!f.accepts_file(Path::new("dir/b.tmp")));
    }

    #[test]
    fn exclude_rejects() {
        let f = filter(&[], &["*.tmp"], &[]);
        assert!(f.accepts_file(Path::new("a.log")));
        assert!(!f.accepts_file(Path::new("b.tmp")));
    }

    #[test]
    fn exclude_wins_over_include() {
        let f = filter(&["*.log"], &["secret*"], &[]);
        assert!(f.accepts_file(Path::new("a.log")));
        assert!(!f.accepts_file(Path::new("secret.log")));
    }

    #[test]
    fn globs_match_basenames_only() {
        let f = filter(&["*.log"], &[], &[]);
        // The directory part plays no role in the decision.
        assert!(f.accepts_file(Path::new("deep/nested/dir/a.log")));
    }

    #[test]
    fn exclude_dir_matches_directory_names() {
        let f = filter(&[], &[], &["sub", "target*"]);
        assert!(f.skips_dir(Path::new("root/sub")));
        assert!(f.skips_dir(Path::new("root/target-debug")));
        assert!(!f.skips_dir(Path::new("root/src")));
    }

    #[test]
    fn bad_glob_is_an_error() {
        assert!(
            FileFilter::new(&["[".to_string()], &[], &[]).is_err()
        );
    }
}
