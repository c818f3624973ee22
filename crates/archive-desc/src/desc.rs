// crates/archive-desc/src/desc.rs
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::{ArchiveError, Result};

/// Tag of descriptors that compose other archives.
pub const LIBS_TAG: &str = "LIBS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    /// Members are object files packed directly into the archive.
    Objects,
    /// Members are other archives, each with its own descriptor.
    Libs,
}

impl DescriptorKind {
    /// Only an exact `LIBS` is special; every other tag is a flat object list.
    pub fn from_tag(tag: &str) -> Self {
        if tag == LIBS_TAG {
            DescriptorKind::Libs
        } else {
            DescriptorKind::Objects
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub tag: String,
    pub kind: DescriptorKind,
    pub members: Vec<String>,
}

fn line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Z]+) = (.*)").expect("descriptor pattern"))
}

/// Parse the text of a descriptor. `path` is only used for error messages.
///
/// Only the first line counts:
///
/// ```text
/// OBJECTS = foo.o bar.o
/// ```
pub fn parse_descriptor(path: &Path, text: &str) -> Result<Descriptor> {
    let line = text.lines().next().unwrap_or("");
    let caps = line_re().captures(line).ok_or_else(|| ArchiveError::Format {
        path: path.to_path_buf(),
        line: line.to_string(),
    })?;

    let tag = caps[1].to_string();
    let members = caps[2].split_whitespace().map(str::to_string).collect();
    Ok(Descriptor {
        kind: DescriptorKind::from_tag(&tag),
        tag,
        members,
    })
}

/// Read and parse a descriptor. Bytes past the first line are never decoded.
pub fn read_descriptor(path: &Path) -> Result<Descriptor> {
    let file = File::open(path).map_err(|source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut first = Vec::new();
    BufReader::new(file)
        .read_until(b'\n', &mut first)
        .map_err(|source| ArchiveError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let text = String::from_utf8(first).map_err(|e| ArchiveError::Format {
        path: path.to_path_buf(),
        line: String::from_utf8_lossy(e.as_bytes()).trim_end().to_string(),
    })?;

    let desc = parse_descriptor(path, &text)?;
    log::debug!("{}: {} with {} members", path.display(), desc.tag, desc.members.len());
    Ok(desc)
}
