//! Per-entry materialisation for tar and zip archives.
//!
//! Entries are written in archive order. Nothing is written through a
//! symlink, so a link planted by an earlier entry cannot redirect later ones
//! outside the destination. An entry whose output path already exists
//! (checked without following symlinks) is skipped, which makes
//! repeated extraction into the same directory a no-op and lets an
//! interrupted extraction resume.

use super::ExtractionError;
use log::{debug, trace};
use std::borrow::Cow;
use std::fs;
use std::io::{self, Read, Seek};
use std::path::{Component, Path, PathBuf};

/// Default permission bits for files whose archive entry carries none.
const DEFAULT_FILE_MODE: u32 = 0o644;
/// Default permission bits for directories whose archive entry carries none.
const DEFAULT_DIR_MODE: u32 = 0o755;

/// What an archive entry materialises as.
#[derive(Debug, Clone, PartialEq, Eq)]
enum EntryKind {
    Directory,
    File,
    /// A symbolic link whose target is written verbatim.
    Symlink(PathBuf),
    /// A hard link to another entry, relative to the install directory.
    HardLink(PathBuf),
}

/// Unpack every tar entry from `reader` into `dest`.
///
/// Returns the number of entries materialised.
pub(super) fn unpack_tar<R: Read>(reader: R, dest: &Path) -> Result<usize, ExtractionError> {
    let mut archive = tar::Archive::new(reader);
    let mut materialised = 0;

    for entry_result in archive.entries()? {
        let mut entry = entry_result?;
        let entry_path = entry.path()?.into_owned();
        let header = entry.header();
        let mode = header.mode().ok();
        let kind = match header.entry_type() {
            tar::EntryType::Directory => EntryKind::Directory,
            tar::EntryType::Regular | tar::EntryType::Continuous => EntryKind::File,
            tar::EntryType::Symlink => EntryKind::Symlink(link_target(&entry)?),
            tar::EntryType::Link => EntryKind::HardLink(link_target(&entry)?),
            other => {
                debug!("skipping {other:?} entry {}", entry_path.display());
                continue;
            }
        };

        if materialise(dest, &entry_path, &kind, mode, &mut entry)? {
            materialised += 1;
        }
    }

    Ok(materialised)
}

/// Unpack every zip entry from `reader` into `dest`.
///
/// Returns the number of entries materialised.
pub(super) fn unpack_zip<R: Read + Seek>(reader: R, dest: &Path) -> Result<usize, ExtractionError> {
    let mut archive = zip::ZipArchive::new(reader).map_err(io::Error::other)?;
    let mut materialised = 0;

    for index in 0..archive.len() {
        let mut file = archive.by_index(index).map_err(io::Error::other)?;
        let Some(entry_path) = file.enclosed_name() else {
            return Err(ExtractionError::PathTraversal {
                path: file.name().to_owned(),
            });
        };
        let mode = file.unix_mode();
        let kind = if file.is_dir() {
            EntryKind::Directory
        } else if file.is_symlink() {
            let mut target = String::new();
            file.read_to_string(&mut target)?;
            EntryKind::Symlink(PathBuf::from(target))
        } else {
            EntryKind::File
        };

        if materialise(dest, &entry_path, &kind, mode, &mut file)? {
            materialised += 1;
        }
    }

    Ok(materialised)
}

fn link_target<R: Read>(entry: &tar::Entry<'_, R>) -> Result<PathBuf, ExtractionError> {
    entry
        .link_name()?
        .map(Cow::into_owned)
        .ok_or_else(|| {
            ExtractionError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                "link entry without a target",
            ))
        })
}

/// Write one entry under `dest`, returning `false` if its path already
/// exists.
fn materialise(
    dest: &Path,
    entry_path: &Path,
    kind: &EntryKind,
    mode: Option<u32>,
    contents: &mut dyn Read,
) -> Result<bool, ExtractionError> {
    validate_entry_path(entry_path)?;
    reject_linked_ancestors(dest, entry_path)?;
    let out_path = dest.join(entry_path);
    if path_exists(&out_path)? {
        trace!("{} already present; skipping", out_path.display());
        return Ok(false);
    }

    match kind {
        EntryKind::Directory => {
            create_dir(&out_path, mode.unwrap_or(DEFAULT_DIR_MODE))?;
        }
        EntryKind::File => {
            create_parent(&out_path)?;
            let mut file = create_new_file(&out_path, mode.unwrap_or(DEFAULT_FILE_MODE))?;
            io::copy(contents, &mut file)?;
        }
        EntryKind::Symlink(target) => {
            create_parent(&out_path)?;
            create_symlink(target, &out_path)?;
        }
        EntryKind::HardLink(target) => {
            validate_entry_path(target)?;
            reject_linked_ancestors(dest, target)?;
            create_parent(&out_path)?;
            fs::hard_link(dest.join(target), &out_path)?;
        }
    }

    debug!("extracted {}", entry_path.display());
    Ok(true)
}

/// Validate that an entry path does not escape the destination directory
/// via `..` components or absolute paths.
pub(super) fn validate_entry_path(path: &Path) -> Result<(), ExtractionError> {
    let escapes = path.is_absolute()
        || path.components().any(|component| {
            matches!(
                component,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
    if escapes {
        return Err(ExtractionError::PathTraversal {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

/// Reject `entry_path` if a directory above it inside `dest` is a symlink.
///
/// An earlier entry may have planted a link (for example `escape -> /etc`);
/// writing `escape/passwd` through it would land outside `dest`.
fn reject_linked_ancestors(dest: &Path, entry_path: &Path) -> Result<(), ExtractionError> {
    let mut ancestor = dest.to_path_buf();
    let mut components = entry_path.components().peekable();
    while let Some(component) = components.next() {
        if components.peek().is_none() {
            break;
        }
        ancestor.push(component);
        match fs::symlink_metadata(&ancestor) {
            Ok(metadata) if metadata.file_type().is_symlink() => {
                return Err(ExtractionError::PathTraversal {
                    path: entry_path.display().to_string(),
                });
            }
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

/// Whether anything exists at `path`, without following symlinks.
fn path_exists(path: &Path) -> io::Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

fn create_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) => fs::create_dir_all(parent),
        None => Ok(()),
    }
}

#[cfg(unix)]
fn create_dir(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new()
        .recursive(true)
        .mode(mode & 0o7777)
        .create(path)
}

#[cfg(not(unix))]
fn create_dir(path: &Path, _mode: u32) -> io::Result<()> {
    fs::create_dir_all(path)
}

#[cfg(unix)]
fn create_new_file(path: &Path, mode: u32) -> io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(mode & 0o7777)
        .open(path)
}

#[cfg(not(unix))]
fn create_new_file(path: &Path, _mode: u32) -> io::Result<fs::File> {
    fs::OpenOptions::new().write(true).create_new(true).open(path)
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

#[cfg(not(any(unix, windows)))]
fn create_symlink(_target: &Path, link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("symbolic links are not supported here: {}", link.display()),
    ))
}

#[cfg(test)]
#[path = "entries_tests.rs"]
mod tests;
