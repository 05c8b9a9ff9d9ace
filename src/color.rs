/*!
The color module decides whether output should be colored at all and what the
colors are.

The palette is grep's `GREP_COLORS` contract: a colon separated list of
`capability=sgr-params` pairs. Parsing is a pure function from that string to
a palette value, which is then threaded through the configuration. Nothing in
here touches the process environment.
*/

use std::mem;

/// When to color output.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ColorChoice {
    /// Color if and only if the sink is a terminal.
    Auto,
    /// Color regardless of the sink.
    Always,
    /// Never color.
    Never,
}

impl Default for ColorChoice {
    fn default() -> ColorChoice {
        ColorChoice::Auto
    }
}

impl ColorChoice {
    /// Resolve the choice against the sink. The caller supplies whether the
    /// sink is a terminal; a capture buffer never is.
    pub fn should_color(self, sink_is_tty: bool) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => sink_is_tty,
        }
    }
}

/// The resolved mapping of color roles to ANSI SGR parameter strings.
///
/// An empty parameter string means "no markup for this role". The field
/// names follow grep's capability names: `ms`, `mc`, `sl`, `cx`, `fn`, `ln`,
/// `bn`, `se`, plus the `rv` and `ne` booleans.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Palette {
    /// Matching text in a selected line (`ms`).
    pub selected_match: String,
    /// Matching text in a context line (`mc`).
    pub context_match: String,
    /// Non-matching text in a selected line (`sl`).
    pub selected_line: String,
    /// Non-matching text in a context line (`cx`).
    pub context_line: String,
    /// File names (`fn`).
    pub filename: String,
    /// Line numbers (`ln`).
    pub line_number: String,
    /// Byte offsets (`bn`).
    pub byte_offset: String,
    /// Separators between fields and between context groups (`se`).
    pub separator: String,
    /// Swap the selected and context roles (`rv`).
    pub reverse: bool,
    /// Suppress the reset sequence at end of line (`ne`).
    pub no_reset: bool,
}

impl Default for Palette {
    fn default() -> Palette {
        Palette {
            selected_match: "01;31".to_string(),
            context_match: "01;31".to_string(),
            selected_line: String::new(),
            context_line: String::new(),
            filename: "35".to_string(),
            line_number: "32".to_string(),
            byte_offset: "32".to_string(),
            separator: "36".to_string(),
            reverse: false,
            no_reset: false,
        }
    }
}

impl Palette {
    /// Parse a `GREP_COLORS` style string on top of the default palette.
    ///
    /// Unknown capabilities and malformed values are ignored silently. The
    /// `mt` capability sets both `ms` and `mc`.
    pub fn from_env(spec: &str) -> Palette {
        let mut palette = Palette::default();
        for item in spec.split(':') {
            let (key, value) = match item.find('=') {
                Some(i) => (&item[..i], Some(&item[i + 1..])),
                None => (item, None),
            };
            match (key, value) {
                ("rv", None) => palette.reverse = true,
                ("ne", None) => palette.no_reset = true,
                (key, Some(value)) if is_sgr_params(value) => {
                    match key {
                        "mt" => {
                            palette.selected_match = value.to_string();
                            palette.context_match = value.to_string();
                        }
                        "ms" => palette.selected_match = value.to_string(),
                        "mc" => palette.context_match = value.to_string(),
                        "sl" => palette.selected_line = value.to_string(),
                        "cx" => palette.context_line = value.to_string(),
                        "fn" => palette.filename = value.to_string(),
                        "ln" => palette.line_number = value.to_string(),
                        "bn" => palette.byte_offset = value.to_string(),
                        "se" => palette.separator = value.to_string(),
                        _ => {}
                    }
                }
                _ => {}
            }
        }
        palette
    }

    /// Fold the `rv` flag into the role fields, so that downstream stages
    /// never branch on it.
    pub fn resolved(mut self) -> Palette {
        if self.reverse {
            mem::swap(&mut self.selected_line, &mut self.context_line);
            mem::swap(&mut self.selected_match, &mut self.context_match);
            self.reverse = false;
        }
        self
    }
}

/// Render the SGR start sequence for the given parameter string, or nothing
/// when the parameters are empty.
pub fn sgr(params: &str) -> Vec<u8> {
    if params.is_empty() {
        vec![]
    } else {
        format!("\x1b[{}m", params).into_bytes()
    }
}

/// The SGR reset sequence.
pub fn sgr_reset() -> Vec<u8> {
    b"\x1b[0m".to_vec()
}

fn is_sgr_params(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_digit() || b == b';')
}
