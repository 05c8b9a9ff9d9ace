use clap::{App, AppSettings, Arg};

const ABOUT: &str = "
rep searches the given files (or standard input) for lines matching the
given patterns and prints them, optionally with surrounding context, file
names, line numbers, byte offsets and color markup.

Project home page: https://github.com/BurntSushi/rep";

const USAGE: &str = "
    rep [OPTIONS] <pattern> [<path>...]
    rep [OPTIONS] [-e PATTERN | -f PATTERNFILE]... [<path>...]";

/// Build the command line application.
///
/// `-h` is grep's no-filename flag, so help gets `-?` instead.
pub fn app() -> App<'static, 'static> {
    let flag = |name: &'static str| Arg::with_name(name).long(name);
    App::new("rep")
        .version(env!("CARGO_PKG_VERSION"))
        .about(ABOUT)
        .usage(USAGE)
        .help_short("?")
        .max_term_width(100)
        .setting(AppSettings::UnifiedHelpMessage)
        .arg(Arg::with_name("pattern")
            .required_unless_one(&["regexp", "file"])
            .help("The patterns to search for, one per line."))
        .arg(Arg::with_name("path")
            .multiple(true)
            .help("Files and directories to search. Use - for standard \
                   input."))
        .arg(Arg::with_name("regexp")
            .short("e").long("regexp")
            .value_name("PATTERN")
            .takes_value(true).multiple(true).number_of_values(1)
            .allow_hyphen_values(true)
            .help("A pattern to search for. May be given multiple times."))
        .arg(Arg::with_name("file")
            .short("f").long("file")
            .value_name("PATTERNFILE")
            .takes_value(true).multiple(true).number_of_values(1)
            .help("Read patterns from a file, one per line."))
        .arg(flag("extended-regexp").short("E")
            .overrides_with_all(&[
                "fixed-strings", "basic-regexp", "perl-regexp",
            ])
            .help("Patterns are extended regular expressions."))
        .arg(flag("fixed-strings").short("F")
            .overrides_with_all(&[
                "extended-regexp", "basic-regexp", "perl-regexp",
            ])
            .help("Patterns are literal strings."))
        .arg(flag("basic-regexp").short("G")
            .overrides_with_all(&[
                "extended-regexp", "fixed-strings", "perl-regexp",
            ])
            .help("Patterns are basic regular expressions. The default."))
        .arg(flag("perl-regexp").short("P")
            .overrides_with_all(&[
                "extended-regexp", "fixed-strings", "basic-regexp",
            ])
            .help("Patterns are perl style regular expressions, as \
                   supported by the host regex engine."))
        .arg(flag("ignore-case").short("i")
            .help("Match case insensitively."))
        .arg(flag("word-regexp").short("w")
            .help("Only match at word boundaries."))
        .arg(flag("line-regexp").short("x")
            .help("Only match whole lines."))
        .arg(flag("invert-match").short("v")
            .help("Select the lines that do not match."))
        .arg(flag("max-count").short("m")
            .value_name("NUM").takes_value(true)
            .help("Stop searching a file after NUM selected lines."))
        .arg(flag("byte-offset").short("b")
            .help("Print the byte offset of each line (or match)."))
        .arg(flag("line-number").short("n")
            .help("Print 1-based line numbers."))
        .arg(flag("with-filename").short("H")
            .overrides_with("no-filename")
            .help("Print the file name with each record."))
        .arg(flag("no-filename").short("h")
            .overrides_with("with-filename")
            .help("Never print file names."))
        .arg(flag("only-matching").short("o")
            .help("Print only the matching parts, one per line."))
        .arg(flag("quiet").short("q").alias("silent")
            .help("Print nothing; exit 0 at the first match."))
        .arg(flag("no-messages").short("s")
            .help("Suppress error messages about unreadable files."))
        .arg(flag("count").short("c")
            .overrides_with_all(&[
                "files-with-matches", "files-without-match",
            ])
            .help("Print only a count of selected lines per file."))
        .arg(flag("files-with-matches").short("l")
            .overrides_with_all(&["count", "files-without-match"])
            .help("Print only the names of files with selected lines."))
        .arg(flag("files-without-match").short("L")
            .overrides_with_all(&["count", "files-with-matches"])
            .help("Print only the names of files without selected lines."))
        .arg(flag("after-context").short("A")
            .value_name("NUM").takes_value(true)
            .help("Show NUM lines after each match."))
        .arg(flag("before-context").short("B")
            .value_name("NUM").takes_value(true)
            .help("Show NUM lines before each match."))
        .arg(flag("context").short("C")
            .value_name("NUM").takes_value(true)
            .help("Show NUM lines around each match."))
        .arg(flag("text").short("a")
            .help("Treat binary files as text."))
        .arg(Arg::with_name("binary-without-match").short("I")
            .help("Skip binary files."))
        .arg(flag("binary-files")
            .value_name("TYPE").takes_value(true)
            .possible_values(&["binary", "text", "without-match"])
            .help("How to handle binary files."))
        .arg(flag("directories").short("d")
            .value_name("ACTION").takes_value(true)
            .possible_values(&["read", "recurse", "skip"])
            .help("How to handle directory inputs."))
        .arg(flag("recursive").short("r")
            .help("Search directories recursively."))
        .arg(flag("dereference-recursive").short("R")
            .help("Like -r, but follow symbolic links."))
        .arg(flag("include")
            .value_name("GLOB")
            .takes_value(true).multiple(true).number_of_values(1)
            .help("Only search files whose base name matches GLOB."))
        .arg(flag("exclude")
            .value_name("GLOB")
            .takes_value(true).multiple(true).number_of_values(1)
            .help("Skip files whose base name matches GLOB."))
        .arg(flag("exclude-dir")
            .value_name("GLOB")
            .takes_value(true).multiple(true).number_of_values(1)
            .help("Skip directories whose base name matches GLOB."))
        .arg(flag("label")
            .value_name("LABEL").takes_value(true)
            .help("Display LABEL as the name of standard input."))
        .arg(flag("line-buffered")
            .help("Flush output after every line."))
        .arg(flag("initial-tab").short("T")
            .help("Put a tab between the line headers and the line."))
        .arg(flag("null").short("Z")
            .help("Print a NUL byte after each file name header."))
        .arg(flag("null-data").short("z")
            .help("Lines are NUL terminated, on input and output."))
        .arg(flag("crlf")
            .help("Strip a carriage return preceding the line terminator."))
        .arg(flag("color")
            .visible_alias("colour")
            .value_name("WHEN")
            .takes_value(true).min_values(0).max_values(1)
            .require_equals(true)
            .possible_values(&["auto", "always", "never"])
            .help("When to color output [default: never; --color alone \
                   means auto]."))
        .arg(flag("group-separator")
            .value_name("SEP").takes_value(true)
            .overrides_with("no-group-separator")
            .help("Print SEP between disjoint context groups. C style \
                   escapes are decoded."))
        .arg(flag("no-group-separator")
            .overrides_with("group-separator")
            .help("Don't print a separator between context groups."))
        .arg(flag("debug")
            .help("Show debug messages."))
}
