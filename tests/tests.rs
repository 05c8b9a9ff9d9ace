/*!
This module contains *integration* tests. Their purpose is to test the CLI
interface. Namely, that passing a flag does what it says on the tin.

Tests for more fine grained behavior (like the searcher or the globber)
should be unit tests in their respective modules.
*/

#![allow(dead_code, unused_imports)]

use std::process::Command;

use crate::workdir::WorkDir;

mod hay;

macro_rules! sherlock {
    ($name:ident, $fun:expr) => {
        sherlock!($name, "Sherlock", $fun);
    };
    ($name:ident, $query:expr, $fun:expr) => {
        sherlock!($name, $query, "sherlock", $fun);
    };
    ($name:ident, $query:expr, $path:expr, $fun:expr) => {
        #[test]
        fn $name() {
            let wd = WorkDir::new(stringify!($name));
            wd.create("sherlock", hay::SHERLOCK);
            let mut cmd = wd.command();
            cmd.arg($query).arg($path);
            $fun(wd, cmd);
        }
    };
}

macro_rules! clean {
    ($name:ident, $query:expr, $path:expr, $fun:expr) => {
        #[test]
        fn $name() {
            let wd = WorkDir::new(stringify!($name));
            let mut cmd = wd.command();
            cmd.arg($query).arg($path);
            $fun(wd, cmd);
        }
    };
}

sherlock!(single_file, |wd: WorkDir, mut cmd| {
    let lines: String = wd.stdout(&mut cmd);
    let expected = "\
For the Doctor Watsons of this world, as opposed to the Sherlock
be, to a very large extent, the result of luck. Sherlock Holmes
";
    assert_eq!(lines, expected);
});

sherlock!(line_numbers, |wd: WorkDir, mut cmd: Command| {
    cmd.arg("-n");
    let lines: String = wd.stdout(&mut cmd);
    let expected = "\
1:For the Doctor Watsons of this world, as opposed to the Sherlock
3:be, to a very large extent, the result of luck. Sherlock Holmes
";
    assert_eq!(lines, expected);
});

sherlock!(with_filename, |wd: WorkDir, mut cmd: Command| {
    cmd.arg("-H");
    let lines: String = wd.stdout(&mut cmd);
    let expected = "\
sherlock:For the Doctor Watsons of this world, as opposed to the Sherlock
sherlock:be, to a very large extent, the result of luck. Sherlock Holmes
";
    assert_eq!(lines, expected);
});

sherlock!(inverted, |wd: WorkDir, mut cmd: Command| {
    cmd.arg("-v");
    let lines: String = wd.stdout(&mut cmd);
    let expected = "\
Holmeses, success in the province of detective work must always
can extract a clew from a wisp of straw or a flake of cigar ash;
but Doctor Watson has to have it taken out for him and dusted,
and exhibited clearly, with a label attached.
";
    assert_eq!(lines, expected);
});

sherlock!(case_insensitive, "sherlock", |wd: WorkDir, mut cmd: Command| {
    cmd.arg("-i");
    let lines: String = wd.stdout(&mut cmd);
    let expected = "\
For the Doctor Watsons of this world, as opposed to the Sherlock
be, to a very large extent, the result of luck. Sherlock Holmes
";
    assert_eq!(lines, expected);
});

sherlock!(word_regexp, "as", |wd: WorkDir, mut cmd: Command| {
    cmd.arg("-w").arg("-n");
    let lines: String = wd.stdout(&mut cmd);
    let expected = "\
1:For the Doctor Watsons of this world, as opposed to the Sherlock
";
    assert_eq!(lines, expected);
});

sherlock!(count, |wd: WorkDir, mut cmd: Command| {
    cmd.arg("-c");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "2\n");
});

sherlock!(files_with_matches, |wd: WorkDir, mut cmd: Command| {
    cmd.arg("-l");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "sherlock\n");
});

sherlock!(files_without_match, "zzzz", |wd: WorkDir, mut cmd: Command| {
    cmd.arg("-L");
    // No line is selected, so the exit code is 1, but the file name is
    // still printed.
    let o = cmd.output().unwrap();
    assert_eq!(Some(1), o.status.code());
    assert_eq!(String::from_utf8_lossy(&o.stdout), "sherlock\n");
});

sherlock!(max_count, |wd: WorkDir, mut cmd: Command| {
    cmd.arg("-m1");
    let lines: String = wd.stdout(&mut cmd);
    let expected = "\
For the Doctor Watsons of this world, as opposed to the Sherlock
";
    assert_eq!(lines, expected);
});

sherlock!(quiet_is_quiet, |wd: WorkDir, mut cmd: Command| {
    cmd.arg("-q");
    let o = cmd.output().unwrap();
    assert_eq!(Some(0), o.status.code());
    assert!(o.stdout.is_empty());
});

sherlock!(no_match_exits_one, "zzzz", |wd: WorkDir, mut cmd: Command| {
    wd.assert_exit_code(1, &mut cmd);
});

clean!(missing_file_exits_two, "foo", "nope.txt",
|wd: WorkDir, mut cmd: Command| {
    wd.assert_exit_code(2, &mut cmd);
});

clean!(missing_file_message_suppressed, "foo", "nope.txt",
|wd: WorkDir, mut cmd: Command| {
    cmd.arg("-s");
    let o = cmd.output().unwrap();
    // The exit code still reports the failure; only the message goes away.
    assert_eq!(Some(2), o.status.code());
    assert!(o.stderr.is_empty());
});

clean!(basic_dialect_default, "et", "a.txt",
|wd: WorkDir, mut cmd: Command| {
    wd.create("a.txt", "alpha\nbeta\ngamma\n");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "beta\n");
});

clean!(filename_and_line_number, "et", "a.txt",
|wd: WorkDir, mut cmd: Command| {
    wd.create("a.txt", "alpha\nbeta\ngamma\n");
    cmd.arg("-H").arg("-n");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "a.txt:2:beta\n");
});

clean!(basic_dialect_literal_operators, "a+b", "ops.txt",
|wd: WorkDir, mut cmd: Command| {
    // In the basic dialect, + is an ordinary character.
    wd.create("ops.txt", "a+b\naab\n");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "a+b\n");
});

clean!(extended_dialect, "ab+", "ops.txt",
|wd: WorkDir, mut cmd: Command| {
    wd.create("ops.txt", "a+b\nabbb\n");
    cmd.arg("-E");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "abbb\n");
});

clean!(fixed_strings, "a.c|d", "fix.txt",
|wd: WorkDir, mut cmd: Command| {
    wd.create("fix.txt", "a.c|d\nabcd\n");
    cmd.arg("-F");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "a.c|d\n");
});

clean!(line_regexp, "beta", "a.txt", |wd: WorkDir, mut cmd: Command| {
    wd.create("a.txt", "beta\nbetamax\n");
    cmd.arg("-x");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "beta\n");
});

clean!(multiple_explicit_patterns, "-e", "alpha",
|wd: WorkDir, mut cmd: Command| {
    // The positional slot after -e is a path, not a pattern.
    wd.create("a.txt", "alpha\nbeta\ngamma\n");
    cmd.arg("-e").arg("gamma").arg("a.txt");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "alpha\ngamma\n");
});

clean!(pattern_file, "-f", "pats",
|wd: WorkDir, mut cmd: Command| {
    wd.create("pats", "alpha\ngamma\n");
    wd.create("a.txt", "alpha\nbeta\ngamma\n");
    cmd.arg("a.txt");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "alpha\ngamma\n");
});

clean!(context_window, "L4", "ctx.txt", |wd: WorkDir, mut cmd: Command| {
    wd.create("ctx.txt", "L1\nL2\nL3\nL4\nL5\nL6\nL7\n");
    cmd.arg("-B1").arg("-A1").arg("-n");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "3-L3\n4:L4\n5-L5\n");
});

clean!(context_group_separator, "hit", "ctx.txt",
|wd: WorkDir, mut cmd: Command| {
    wd.create("ctx.txt", "hit\nx\nx\nx\nx\nhit\n");
    cmd.arg("-C1");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "hit\nx\n--\nx\nhit\n");
});

clean!(custom_group_separator, "hit", "ctx.txt",
|wd: WorkDir, mut cmd: Command| {
    wd.create("ctx.txt", "hit\nx\nx\nx\nx\nhit\n");
    cmd.arg("-C1").arg("--group-separator=@@");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "hit\nx\n@@\nx\nhit\n");
});

clean!(no_group_separator, "hit", "ctx.txt",
|wd: WorkDir, mut cmd: Command| {
    wd.create("ctx.txt", "hit\nx\nx\nx\nx\nhit\n");
    cmd.arg("-C1").arg("--no-group-separator");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "hit\nx\nx\nhit\n");
});

clean!(max_count_flushes_trailing_context, "hit", "m.txt",
|wd: WorkDir, mut cmd: Command| {
    wd.create("m.txt", "l1\nhit\nx3\nx4\nhit\nx6\nx7\nx8\nx9\nx10\n");
    cmd.arg("-m1").arg("-A2").arg("-n");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "2:hit\n3-x3\n4-x4\n");
});

clean!(byte_offset, "et", "a.txt", |wd: WorkDir, mut cmd: Command| {
    wd.create("a.txt", "alpha\nbeta\ngamma\n");
    cmd.arg("-b");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "6:beta\n");
});

clean!(only_matching_with_offsets, "et", "a.txt",
|wd: WorkDir, mut cmd: Command| {
    wd.create("a.txt", "alpha\nbeta\ngamma\n");
    cmd.arg("-o").arg("-b");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "7:et\n");
});

clean!(binary_file_matches, "hi", "bin", |wd: WorkDir, mut cmd: Command| {
    wd.create_bytes("bin", b"hi\x00\nfoo\nhi\n");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "bin: binary file matches\n");
});

clean!(binary_as_text, "foo", "bin", |wd: WorkDir, mut cmd: Command| {
    wd.create_bytes("bin", b"hi\x00\nfoo\nhi\n");
    cmd.arg("-a");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "foo\n");
});

clean!(binary_skipped, "hi", "bin", |wd: WorkDir, mut cmd: Command| {
    wd.create_bytes("bin", b"hi\x00\nhi\n");
    cmd.arg("-I");
    // The file is skipped entirely: no output, no match, exit 1.
    let o = cmd.output().unwrap();
    assert_eq!(Some(1), o.status.code());
    assert!(o.stdout.is_empty());
});

clean!(null_data, "bar", "z.bin", |wd: WorkDir, mut cmd: Command| {
    wd.create_bytes("z.bin", b"foo\x00bar\x00");
    cmd.arg("-z");
    let o = wd.output(&mut cmd);
    assert_eq!(&o.stdout, b"bar\x00");
});

clean!(null_after_filename, "et", "a.txt",
|wd: WorkDir, mut cmd: Command| {
    wd.create("a.txt", "alpha\nbeta\n");
    cmd.arg("-H").arg("-Z");
    let o = wd.output(&mut cmd);
    assert_eq!(&o.stdout, b"a.txt:\x00beta\n");
});

clean!(recursive_with_filters, "hit", ".", |wd: WorkDir, mut cmd: Command| {
    wd.create("a.log", "hit\n");
    wd.create("b.tmp", "hit\n");
    wd.create_dir("sub");
    wd.create("sub/c.log", "hit\n");
    cmd.arg("-r").arg("--include").arg("*.log")
        .arg("--exclude-dir").arg("sub");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "./a.log:hit\n");
});

clean!(recursive_exclude, "hit", ".", |wd: WorkDir, mut cmd: Command| {
    wd.create("a.log", "hit\n");
    wd.create("b.tmp", "hit\n");
    cmd.arg("-r").arg("--exclude").arg("*.tmp");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "./a.log:hit\n");
});

clean!(directory_input_is_an_error, "foo", ".",
|wd: WorkDir, mut cmd: Command| {
    wd.create("a.txt", "foo\n");
    wd.assert_exit_code(2, &mut cmd);
});

clean!(directories_skip, "foo", ".", |wd: WorkDir, mut cmd: Command| {
    wd.create("a.txt", "foo\n");
    cmd.arg("-d").arg("skip");
    // The lone directory input is skipped, so nothing is searched.
    wd.assert_exit_code(1, &mut cmd);
});

clean!(color_always, "et", "a.txt", |wd: WorkDir, mut cmd: Command| {
    wd.create("a.txt", "beta\n");
    cmd.arg("--color=always");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "b\x1b[01;31met\x1b[0ma\n");
});

clean!(grep_colors_palette, "et", "a.txt",
|wd: WorkDir, mut cmd: Command| {
    wd.create("a.txt", "beta\n");
    cmd.arg("--color=always").env("GREP_COLORS", "ms=01;32");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "b\x1b[01;32met\x1b[0ma\n");
});

clean!(color_auto_is_off_for_pipes, "et", "a.txt",
|wd: WorkDir, mut cmd: Command| {
    wd.create("a.txt", "beta\n");
    cmd.arg("--color=auto");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "beta\n");
});

clean!(initial_tab, "et", "a.txt", |wd: WorkDir, mut cmd: Command| {
    wd.create("a.txt", "beta\n");
    cmd.arg("-n").arg("-T");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "1:\tbeta\n");
});

#[test]
fn stdin_with_label() {
    let wd = WorkDir::new("stdin_with_label");
    let mut cmd = wd.command();
    cmd.arg("-H").arg("--label").arg("box").arg("et");
    let o = wd.pipe(&mut cmd, "alpha\nbeta\n");
    assert_eq!(String::from_utf8_lossy(&o.stdout), "box:beta\n");
}

#[test]
fn stdin_is_the_default_source() {
    let wd = WorkDir::new("stdin_is_the_default_source");
    let mut cmd = wd.command();
    cmd.arg("et");
    let o = wd.pipe(&mut cmd, "alpha\nbeta\n");
    assert_eq!(String::from_utf8_lossy(&o.stdout), "beta\n");
}

#[test]
fn dash_means_stdin() {
    let wd = WorkDir::new("dash_means_stdin");
    wd.create("a.txt", "gamma\n");
    let mut cmd = wd.command();
    cmd.arg("-H").arg("et").arg("-").arg("a.txt");
    let o = wd.pipe(&mut cmd, "beta\n");
    assert_eq!(
        String::from_utf8_lossy(&o.stdout),
        "(standard input):beta\na.txt:gamma\n",
    );
}

#[test]
#[cfg(unix)]
fn symlinked_directories_need_dereference() {
    let wd = WorkDir::new("symlinked_directories_need_dereference");
    wd.create_dir("real");
    wd.create("real/f.txt", "hit\n");
    wd.link_dir("real", "link");

    let mut cmd = wd.command();
    cmd.arg("-r").arg("hit").arg(".");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "./real/f.txt:hit\n");

    let mut cmd = wd.command();
    cmd.arg("-R").arg("hit").arg(".");
    let lines: String = wd.stdout(&mut cmd);
    assert_eq!(lines, "./link/f.txt:hit\n./real/f.txt:hit\n");
}
