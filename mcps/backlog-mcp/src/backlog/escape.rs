//! Quoting for shell-interpreted command lines
//!
//! Only meaningful when the spawn goes through a shell. A direct spawn hands
//! each argument to the child verbatim, so quoting there would turn the
//! quote characters into part of the value. [`super::invocation`] pairs the
//! two decisions; nothing else should call [`escape`].

/// Which interpreter will parse the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellFlavor {
    /// `sh -c`
    Posix,
    /// `cmd.exe /d /s /c`
    Cmd,
}

impl ShellFlavor {
    pub fn host() -> Self {
        if cfg!(windows) {
            ShellFlavor::Cmd
        } else {
            ShellFlavor::Posix
        }
    }
}

fn needs_quoting(arg: &str) -> bool {
    arg.chars().any(|c| {
        c.is_whitespace() || matches!(c, ';' | '|' | '&' | '`' | '$' | '(' | ')' | '\\' | '\'' | '"')
    })
}

/// Quote `arg` so `flavor` parses it back as a single word
///
/// Safe tokens come back unchanged. POSIX uses single quotes with each
/// embedded `'` written as `'\''`; cmd uses double quotes with embedded `"`
/// doubled.
pub fn escape(arg: &str, flavor: ShellFlavor) -> String {
    if !needs_quoting(arg) {
        return arg.to_string();
    }

    match flavor {
        ShellFlavor::Cmd => format!("\"{}\"", arg.replace('"', "\"\"")),
        ShellFlavor::Posix => format!("'{}'", arg.replace('\'', "'\\''")),
    }
}
