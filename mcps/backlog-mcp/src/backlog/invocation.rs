//! How the backlog executable is launched
//!
//! Windows installs the CLI as a `.cmd` batch file, which only runs through
//! `cmd.exe`; everywhere else the executable is spawned directly. Shell use
//! and argument escaping are both derived from one [`InvocationMode`] value
//! so they cannot disagree.

use std::process::Stdio;

use tokio::process::Command;

use super::escape::{escape, ShellFlavor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationMode {
    /// argv goes to the OS untouched
    Direct,
    /// A single command line, escaped for the given shell
    Shell(ShellFlavor),
}

impl InvocationMode {
    pub fn for_host() -> Self {
        if cfg!(windows) {
            InvocationMode::Shell(ShellFlavor::Cmd)
        } else {
            InvocationMode::Direct
        }
    }

    pub fn uses_shell(self) -> bool {
        matches!(self, InvocationMode::Shell(_))
    }

    /// Command line the shell will parse, or `None` for a direct spawn
    pub fn command_line<S: AsRef<str>>(self, program: &str, args: &[S]) -> Option<String> {
        let InvocationMode::Shell(flavor) = self else {
            return None;
        };

        let program = match flavor {
            ShellFlavor::Cmd if program.starts_with('"') => program.to_string(),
            _ => escape(program, flavor),
        };

        let mut line = program;
        for arg in args {
            line.push(' ');
            line.push_str(&escape(arg.as_ref(), flavor));
        }
        Some(line)
    }

    /// Build the child process with piped output and the given working directory
    pub fn command<S: AsRef<str>>(
        self,
        program: &str,
        args: &[S],
        cwd: &std::path::Path,
    ) -> Command {
        let mut cmd = match self.command_line(program, args) {
            None => {
                let mut cmd = Command::new(program);
                cmd.args(args.iter().map(AsRef::as_ref));
                cmd
            }
            Some(line) => match self {
                InvocationMode::Shell(ShellFlavor::Cmd) => cmd_exe(&line),
                _ => {
                    let mut cmd = Command::new("sh");
                    cmd.arg("-c").arg(line);
                    cmd
                }
            },
        };

        cmd.current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

fn cmd_exe(line: &str) -> Command {
    let mut cmd = Command::new("cmd.exe");
    cmd.args(["/d", "/s", "/c"]);

    #[cfg(windows)]
    {
        cmd.raw_arg(format!("\"{}\"", line));
        cmd.creation_flags(0x0800_0000); // CREATE_NO_WINDOW
    }
    #[cfg(not(windows))]
    cmd.arg(line);

    cmd
}
