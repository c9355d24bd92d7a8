use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use crate::error::FileError;
use crate::model::TranslationGroup;
use crate::naming;

/// Write `content` to `path` atomically: the data goes to a hidden sibling
/// temp file first, which is then renamed over the destination.
///
/// An existing destination keeps its permissions. The temp file is removed if
/// any step fails.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<(), FileError> {
    let tmp = write_temp_sibling(path, content)?;
    tmp.persist(path).map_err(|err| FileError::Io {
        context: "failed to rename temp file to",
        path: path.to_path_buf(),
        source: err.error,
    })?;
    Ok(())
}

/// Create a new language variant of `group` by copying its source file.
///
/// The new file is `<directory>/<language>.<base name>.xlf`. Content is copied
/// verbatim. Fails if the language code is malformed, the group has no
/// `"default"` source file, or the target already exists.
pub fn add_language(group: &TranslationGroup, language: &str) -> Result<PathBuf, FileError> {
    if !naming::is_language_code(language) {
        return Err(FileError::InvalidLanguage(language.to_string()));
    }
    let source = group
        .source_file()
        .ok_or_else(|| FileError::NoSourceFile(group.display_name().to_string()))?;

    let target = group
        .directory()
        .join(format!("{language}.{}.xlf", group.base_name()));
    if target.exists() {
        return Err(FileError::AlreadyExists(target));
    }

    let content = fs::read(&source.path).map_err(|source_err| FileError::Io {
        context: "failed to read template",
        path: source.path.clone(),
        source: source_err,
    })?;

    let tmp = write_temp_sibling(&target, &content)?;
    // No-clobber: another writer may have created the target meanwhile.
    tmp.persist_noclobber(&target).map_err(|err| {
        if err.error.kind() == std::io::ErrorKind::AlreadyExists {
            FileError::AlreadyExists(target.clone())
        } else {
            FileError::Io {
                context: "failed to rename temp file to",
                path: target.clone(),
                source: err.error,
            }
        }
    })?;

    info!(
        group = group.display_name(),
        language,
        path = %target.display(),
        "language file created"
    );
    Ok(target)
}

fn write_temp_sibling(path: &Path, content: &[u8]) -> Result<NamedTempFile, FileError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let io_err = |context: &'static str| {
        move |source: std::io::Error| FileError::Io {
            context,
            path: path.to_path_buf(),
            source,
        }
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".xliff-ws-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(io_err("failed to create temp file for"))?;

    tmp.write_all(content)
        .map_err(io_err("failed to write temp file for"))?;
    tmp.as_file()
        .sync_all()
        .map_err(io_err("failed to flush temp file for"))?;

    let permissions = match fs::metadata(path) {
        Ok(meta) => meta.permissions(),
        Err(_) => default_permissions(tmp.as_file())
            .map_err(io_err("failed to read temp file permissions for"))?,
    };
    tmp.as_file()
        .set_permissions(permissions)
        .map_err(io_err("failed to set permissions for"))?;

    Ok(tmp)
}

/// Permissions for a file that did not exist before: temp files are created
/// owner-only, regular files are expected to be world-readable.
#[cfg(unix)]
fn default_permissions(_file: &fs::File) -> std::io::Result<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Ok(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions(file: &fs::File) -> std::io::Result<fs::Permissions> {
    Ok(file.metadata()?.permissions())
}
