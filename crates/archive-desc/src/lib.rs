// crates/archive-desc/src/lib.rs
//! Descriptor-driven static archive assembly.
//!
//! Every archive target in the build tree has a `<name>.desc` file next to
//! its objects. A descriptor either lists object files (`OBJECTS = ...`) or
//! other archives whose descriptors must be resolved first (`LIBS = ...`).
//! [`make_archive`] resolves one top-level entry into a plan of leaf
//! archives and hands each one to an [`Archiver`].

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use thiserror::Error;

pub mod ar;
pub mod desc;
pub mod expand;
pub mod libs;

pub use ar::{ArTool, Archiver};
pub use desc::{parse_descriptor, read_descriptor, Descriptor, DescriptorKind};
pub use expand::{ArchivePlan, Expander, LeafArchive};
pub use libs::{ArchiveSpec, LIBS};

// ==================== 错误类型 ====================
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Could not open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} does not appear to be a .a.desc file (first line: {line:?})", .path.display())]
    Format { path: PathBuf, line: String },
    #[error("Unexpected object prefix: {member} is not under {}", .root.display())]
    UnexpectedPrefix { member: String, root: PathBuf },
    #[error("Archive reference has no file name: {0}")]
    InvalidMember(String),
    #[error("Descriptor cycle through {}", .0.display())]
    Cycle(PathBuf),
    #[error("Failed to execute '{program}'. Is it installed?")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("Could not write build trace: {0}")]
    Trace(#[source] io::Error),
    #[error("'{program}' failed for {} ({status})", .output.display())]
    ArchiverFailed {
        program: String,
        output: PathBuf,
        status: ExitStatus,
    },
}

pub type Result<T> = std::result::Result<T, ArchiveError>;

// ==================== 入口 ====================

/// Resolve `spec` under `root` and build every leaf archive it reaches.
///
/// The whole descriptor tree is read before the first archiver call, so a
/// malformed descriptor or a bad `LIBS` member leaves this entry untouched.
pub fn make_archive(root: &Path, spec: &ArchiveSpec, archiver: &mut dyn Archiver) -> Result<ArchivePlan> {
    let plan = Expander::new(root).plan(Path::new(spec.dir), spec.name)?;
    for leaf in &plan.leaves {
        log::info!(
            "{} <- {} members from {}",
            leaf.output.display(),
            leaf.members.len(),
            leaf.descriptor.display()
        );
        archiver.archive(&leaf.output, &leaf.members)?;
    }
    Ok(plan)
}

/// Build every entry of `specs` in order, stopping at the first error.
pub fn make_archives(root: &Path, specs: &[ArchiveSpec], archiver: &mut dyn Archiver) -> Result<()> {
    for spec in specs {
        log::debug!("building {}{}", spec.dir, spec.name);
        make_archive(root, spec, archiver)?;
    }
    Ok(())
}
