//! Primitive filesystem operations shared by the record, tree diff and
//! reconciler.
//!
//! Symlinks are *followed* when copying and comparing (the link target's
//! content is materialised in the destination) and *unlinked* when removing,
//! so removal never reaches outside the destination tree.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{ModError, Result};

/// Copy `src` (a file or a whole directory tree) into `dst_dir`, keeping its
/// base name, and return the path of the copy.
///
/// An existing entry with the same name in `dst_dir` is replaced.
///
/// # Errors
///
/// Returns [`ModError::Io`] if `src` has no file name or any filesystem
/// operation fails.
pub fn copy_entry(src: &Path, dst_dir: &Path) -> Result<PathBuf> {
    let name = src.file_name().ok_or_else(|| ModError::Io {
        op: "copy",
        path: src.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
    })?;
    let dst = dst_dir.join(name);
    replace_entry(src, &dst)?;
    Ok(dst)
}

/// Make `dst` a copy of `src`, removing whatever currently lives at `dst`
/// when its kind (file or directory) differs or `src` is a directory.
///
/// # Errors
///
/// Returns [`ModError::Io`] if removal or copying fails.
pub fn replace_entry(src: &Path, dst: &Path) -> Result<()> {
    if src.is_dir() {
        remove_entry(dst)?;
        copy_dir_recursive(src, dst)
    } else {
        if dst.is_dir() {
            remove_entry(dst)?;
        }
        fs::copy(src, dst).map_err(ModError::io("copy", src))?;
        Ok(())
    }
}

/// Recursively copy a directory tree.
///
/// # Errors
///
/// Returns [`ModError::Io`] if the destination directory cannot be created, a
/// source entry cannot be read, or a file cannot be copied.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst).map_err(ModError::io("create directory", dst))?;
    for entry in fs::read_dir(src).map_err(ModError::io("read directory", src))? {
        let entry = entry.map_err(ModError::io("read directory", src))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path).map_err(ModError::io("copy", &src_path))?;
        }
    }
    Ok(())
}

/// Remove a file, symlink or directory tree. A missing path is not an error.
///
/// # Errors
///
/// Returns [`ModError::Io`] if the path exists but cannot be removed.
pub fn remove_entry(path: &Path) -> Result<()> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(ModError::io("inspect", path)(e)),
    };
    if meta.is_dir() {
        fs::remove_dir_all(path).map_err(ModError::io("remove", path))
    } else {
        fs::remove_file(path).map_err(ModError::io("remove", path))
    }
}

/// Byte-for-byte comparison of two files.
///
/// # Errors
///
/// Returns [`ModError::Io`] if either file cannot be read.
pub fn files_equal(a: &Path, b: &Path) -> Result<bool> {
    let len_a = fs::metadata(a).map_err(ModError::io("inspect", a))?.len();
    let len_b = fs::metadata(b).map_err(ModError::io("inspect", b))?.len();
    if len_a != len_b {
        return Ok(false);
    }
    let left = fs::read(a).map_err(ModError::io("read", a))?;
    let right = fs::read(b).map_err(ModError::io("read", b))?;
    Ok(left == right)
}

/// Replace `path` with `contents` by writing a hidden sibling first and
/// renaming it into place, so an interrupted write leaves the previous file
/// intact.
///
/// # Errors
///
/// Returns [`ModError::Io`] if the temporary file cannot be written or renamed.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let name = path
        .file_name()
        .map_or_else(|| "record".into(), |n| n.to_string_lossy().into_owned());
    let tmp = path.with_file_name(format!(".{name}.tmp"));
    fs::write(&tmp, contents).map_err(ModError::io("write", &tmp))?;
    fs::rename(&tmp, path).map_err(ModError::io("rename", path))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn copies_files_and_subdirectories() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();

        fs::write(src.path().join("a.txt"), b"aaa").unwrap();
        fs::create_dir(src.path().join("sub")).unwrap();
        fs::write(src.path().join("sub/b.txt"), b"bbb").unwrap();

        let target = dst.path().join("out");
        copy_dir_recursive(src.path(), &target).unwrap();

        assert_eq!(fs::read(target.join("a.txt")).unwrap(), b"aaa");
        assert_eq!(fs::read(target.join("sub/b.txt")).unwrap(), b"bbb");
    }

    #[test]
    fn copy_entry_keeps_base_name() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        let file = src.path().join("userChrome.css");
        fs::write(&file, "a {}").unwrap();

        let copied = copy_entry(&file, dst.path()).unwrap();
        assert_eq!(copied, dst.path().join("userChrome.css"));
        assert_eq!(fs::read_to_string(copied).unwrap(), "a {}");
    }

    #[test]
    fn copy_entry_replaces_existing_directory() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        let assets = src.path().join("ASSETS");
        fs::create_dir(&assets).unwrap();
        fs::write(assets.join("new.svg"), "new").unwrap();
        fs::create_dir(dst.path().join("ASSETS")).unwrap();
        fs::write(dst.path().join("ASSETS/stale.svg"), "old").unwrap();

        copy_entry(&assets, dst.path()).unwrap();
        assert!(dst.path().join("ASSETS/new.svg").exists());
        assert!(!dst.path().join("ASSETS/stale.svg").exists());
    }

    #[test]
    fn replace_entry_swaps_directory_for_file() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        fs::write(src.path().join("x"), "file").unwrap();
        fs::create_dir(dst.path().join("x")).unwrap();

        replace_entry(&src.path().join("x"), &dst.path().join("x")).unwrap();
        assert!(dst.path().join("x").is_file());
    }

    #[test]
    fn remove_entry_handles_files_dirs_and_absence() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.css");
        let tree = dir.path().join("tree");
        fs::write(&file, "").unwrap();
        fs::create_dir_all(tree.join("nested")).unwrap();
        fs::write(tree.join("nested/b"), "").unwrap();

        remove_entry(&file).unwrap();
        remove_entry(&tree).unwrap();
        remove_entry(&dir.path().join("never-existed")).unwrap();

        assert!(!file.exists());
        assert!(!tree.exists());
    }

    #[cfg(unix)]
    #[test]
    fn remove_entry_unlinks_symlink_without_touching_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "").unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        remove_entry(&link).unwrap();
        assert!(link.symlink_metadata().is_err());
        assert!(target.join("keep").exists());
    }

    #[cfg(unix)]
    #[test]
    fn copy_materialises_symlinked_files_and_directories() {
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("real.css"), "linked").unwrap();
        fs::create_dir(outside.path().join("icons")).unwrap();
        fs::write(outside.path().join("icons/tab.svg"), "<svg/>").unwrap();

        let src = tempfile::tempdir().unwrap();
        let bundle = src.path().join("ASSETS");
        fs::create_dir(&bundle).unwrap();
        std::os::unix::fs::symlink(outside.path().join("real.css"), bundle.join("style.css"))
            .unwrap();
        std::os::unix::fs::symlink(outside.path().join("icons"), bundle.join("icons")).unwrap();
        std::os::unix::fs::symlink(outside.path().join("real.css"), src.path().join("top.css"))
            .unwrap();

        let dst = tempfile::tempdir().unwrap();
        let copied = copy_entry(&bundle, dst.path()).unwrap();
        let top = copy_entry(&src.path().join("top.css"), dst.path()).unwrap();

        for path in [copied.join("style.css"), copied.join("icons"), top.clone()] {
            assert!(
                !path.symlink_metadata().unwrap().file_type().is_symlink(),
                "{} is still a symlink",
                path.display()
            );
        }
        assert_eq!(fs::read_to_string(copied.join("style.css")).unwrap(), "linked");
        assert_eq!(fs::read_to_string(copied.join("icons/tab.svg")).unwrap(), "<svg/>");
        assert_eq!(fs::read_to_string(top).unwrap(), "linked");
    }

    #[test]
    fn files_equal_compares_content() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        let c = dir.path().join("c");
        fs::write(&a, "same").unwrap();
        fs::write(&b, "same").unwrap();
        fs::write(&c, "diff").unwrap();

        assert!(files_equal(&a, &b).unwrap());
        assert!(!files_equal(&a, &c).unwrap());
    }

    #[test]
    fn write_atomic_replaces_content_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("record.json");
        fs::write(&path, "old").unwrap();

        write_atomic(&path, b"new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(!dir.path().join(".record.json.tmp").exists());
    }
}
