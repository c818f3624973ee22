// crates/archive-desc/src/expand.rs
use std::path::{Path, PathBuf};

use crate::desc::{read_descriptor, DescriptorKind};
use crate::{ArchiveError, Result};

/// One archive built straight from object files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafArchive {
    /// The `.desc` file the members came from.
    pub descriptor: PathBuf,
    /// `<root>/dist/lib/<name>`
    pub output: PathBuf,
    pub members: Vec<String>,
}

/// Leaf archives reachable from one descriptor, in descriptor order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchivePlan {
    pub leaves: Vec<LeafArchive>,
}

impl ArchivePlan {
    /// Flattened member list across all leaves. Duplicates are kept.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.leaves.iter().flat_map(|l| l.members.iter().map(String::as_str))
    }
}

pub struct Expander<'a> {
    root: &'a Path,
}

impl<'a> Expander<'a> {
    pub fn new(root: &'a Path) -> Self {
        Self { root }
    }

    pub fn descriptor_path(&self, dir: &Path, name: &str) -> PathBuf {
        self.root.join(dir).join(format!("{name}.desc"))
    }

    pub fn output_path(&self, name: &str) -> PathBuf {
        self.root.join("dist").join("lib").join(name)
    }

    /// Split a `LIBS` member into (directory relative to root, archive name).
    pub fn split_member(&self, member: &str) -> Result<(PathBuf, String)> {
        // "/obj/sub/" names a directory, not an archive
        if member.ends_with(std::path::is_separator) {
            return Err(ArchiveError::InvalidMember(member.to_string()));
        }
        let rest = Path::new(member)
            .strip_prefix(self.root)
            .map_err(|_| ArchiveError::UnexpectedPrefix {
                member: member.to_string(),
                root: self.root.to_path_buf(),
            })?;
        let name = rest
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ArchiveError::InvalidMember(member.to_string()))?;
        let dir = rest.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok((dir, name.to_string()))
    }

    /// Resolve `<root>/<dir>/<name>.desc` down to its leaf archives.
    pub fn plan(&self, dir: &Path, name: &str) -> Result<ArchivePlan> {
        let mut plan = ArchivePlan::default();
        let mut active = Vec::new();
        self.expand_into(dir, name, &mut active, &mut plan)?;
        Ok(plan)
    }

    fn expand_into(
        &self,
        dir: &Path,
        name: &str,
        active: &mut Vec<PathBuf>,
        plan: &mut ArchivePlan,
    ) -> Result<()> {
        let path = self.descriptor_path(dir, name);
        if active.contains(&path) {
            return Err(ArchiveError::Cycle(path));
        }

        let desc = read_descriptor(&path)?;
        match desc.kind {
            DescriptorKind::Libs => {
                // LIBS 只描述组合关系，本身不产出归档
                active.push(path);
                for member in &desc.members {
                    let (sub_dir, sub_name) = self.split_member(member)?;
                    log::debug!("{name}: descending into {}", sub_dir.join(&sub_name).display());
                    self.expand_into(&sub_dir, &sub_name, active, plan)?;
                }
                active.pop();
            }
            DescriptorKind::Objects => plan.leaves.push(LeafArchive {
                output: self.output_path(name),
                members: desc.members,
                descriptor: path,
            }),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::write_desc;

    #[test]
    fn objects_descriptor_is_a_single_leaf() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        write_desc(root, "x/libx.a.desc", "OBJECTS = a.o b.o\n");

        let plan = Expander::new(root).plan(Path::new("x/"), "libx.a").unwrap();
        assert_eq!(
            plan.leaves,
            vec![LeafArchive {
                descriptor: root.join("x/libx.a.desc"),
                output: root.join("dist/lib/libx.a"),
                members: vec!["a.o".into(), "b.o".into()],
            }]
        );
    }

    #[test]
    fn split_member_strips_root() {
        let ex = Expander::new(Path::new("/obj"));
        let (dir, name) = ex.split_member("/obj/sub/libsub.a").unwrap();
        assert_eq!(dir, Path::new("sub"));
        assert_eq!(name, "libsub.a");
        assert_eq!(ex.descriptor_path(&dir, &name), Path::new("/obj/sub/libsub.a.desc"));
    }

    #[test]
    fn split_member_at_root_level() {
        let ex = Expander::new(Path::new("/obj/"));
        let (dir, name) = ex.split_member("/obj/libtop.a").unwrap();
        assert_eq!(dir, Path::new(""));
        assert_eq!(ex.descriptor_path(&dir, &name), Path::new("/obj/libtop.a.desc"));
    }

    #[test]
    fn split_member_rejects_foreign_prefix() {
        let ex = Expander::new(Path::new("/obj"));
        for m in ["/other/libsub.a", "/objx/libsub.a", "sub/libsub.a"] {
            let err = ex.split_member(m).unwrap_err();
            assert!(matches!(err, ArchiveError::UnexpectedPrefix { .. }), "{m}");
        }
    }

    #[test]
    fn split_member_rejects_bare_root() {
        let ex = Expander::new(Path::new("/obj"));
        let err = ex.split_member("/obj").unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidMember(_)));
    }

    #[test]
    fn split_member_rejects_trailing_separator() {
        let ex = Expander::new(Path::new("/obj"));
        let err = ex.split_member("/obj/sub/").unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidMember(ref m) if m == "/obj/sub/"), "{err}");
    }

    #[test]
    fn output_path_layout() {
        let ex = Expander::new(Path::new("/obj"));
        assert_eq!(ex.output_path("libx.a"), Path::new("/obj/dist/lib/libx.a"));
    }

    #[test]
    fn nested_libs_flatten_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        let r = root.display();
        write_desc(root, "top/libtop.a.desc", &format!("LIBS = {r}/mid/libmid.a {r}/c/libc.a\n"));
        write_desc(root, "mid/libmid.a.desc", &format!("LIBS = {r}/a/liba.a {r}/b/libb.a {r}/a/liba.a\n"));
        write_desc(root, "a/liba.a.desc", "OBJECTS = a1.o a2.o\n");
        write_desc(root, "b/libb.a.desc", "OBJECTS = b.o\n");
        write_desc(root, "c/libc.a.desc", "OBJECTS = c.o\n");

        let plan = Expander::new(root).plan(Path::new("top/"), "libtop.a").unwrap();
        let outputs: Vec<_> = plan.leaves.iter().map(|l| l.output.clone()).collect();
        assert_eq!(
            outputs,
            vec![
                root.join("dist/lib/liba.a"),
                root.join("dist/lib/libb.a"),
                root.join("dist/lib/liba.a"),
                root.join("dist/lib/libc.a"),
            ]
        );
        assert_eq!(plan.members().collect::<Vec<_>>(), ["a1.o", "a2.o", "b.o", "a1.o", "a2.o", "c.o"]);
    }

    #[test]
    fn missing_nested_descriptor() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        write_desc(root, "top/libtop.a.desc", &format!("LIBS = {}/gone/libgone.a\n", root.display()));

        let err = Expander::new(root).plan(Path::new("top/"), "libtop.a").unwrap_err();
        match err {
            ArchiveError::Io { path, .. } => assert_eq!(path, root.join("gone/libgone.a.desc")),
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn cycle_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        let r = root.display();
        write_desc(root, "a/liba.a.desc", &format!("LIBS = {r}/b/libb.a\n"));
        write_desc(root, "b/libb.a.desc", &format!("LIBS = {r}/a/liba.a\n"));

        let err = Expander::new(root).plan(Path::new("a"), "liba.a").unwrap_err();
        assert!(matches!(err, ArchiveError::Cycle(_)), "{err}");
    }
}
