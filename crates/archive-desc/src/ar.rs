// crates/archive-desc/src/ar.rs
use std::io::{self, Stdout, Write};
use std::path::Path;
use std::process::Command;

use crate::{ArchiveError, Result};

/// Replace-or-insert members.
pub const REPLACE_FLAG: &str = "-r";

/// Something that packs `members` into the archive at `output`.
pub trait Archiver {
    fn archive(&mut self, output: &Path, members: &[String]) -> Result<()>;
}

/// The system `ar`, run synchronously with inherited stdio.
///
/// Before each run the output path is written to `trace` (stdout by default)
/// as a build log line.
#[derive(Debug)]
pub struct ArTool<W: Write = Stdout> {
    program: String,
    trace: W,
}

impl ArTool<Stdout> {
    pub fn new(program: impl Into<String>) -> Self {
        Self::with_trace(program, io::stdout())
    }
}

impl<W: Write> ArTool<W> {
    pub fn with_trace(program: impl Into<String>, trace: W) -> Self {
        Self {
            program: program.into(),
            trace,
        }
    }

    pub fn trace(&self) -> &W {
        &self.trace
    }

    /// `<ar> -r <output> <members...>`
    pub fn command(&self, output: &Path, members: &[String]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(REPLACE_FLAG).arg(output).args(members);
        cmd
    }
}

impl Default for ArTool<Stdout> {
    fn default() -> Self {
        Self::new("ar")
    }
}

impl<W: Write> Archiver for ArTool<W> {
    fn archive(&mut self, output: &Path, members: &[String]) -> Result<()> {
        writeln!(self.trace, "{}", output.display())
            .and_then(|()| self.trace.flush())
            .map_err(ArchiveError::Trace)?;

        let status = self
            .command(output, members)
            .status()
            .map_err(|source| ArchiveError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if !status.success() {
            return Err(ArchiveError::ArchiverFailed {
                program: self.program.clone(),
                output: output.to_path_buf(),
                status,
            });
        }
        Ok(())
    }
}
