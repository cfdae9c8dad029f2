use std::path::{Component, Path};

const SEP: &str = "/";

/// Compute the archive-relative name for a file at `path`.
///
/// If `base_dir` is given, the name is the path of `path` relative to it, so a directory add
/// preserves the tree structure beneath the directory without the directory's own name. With no
/// base, the name is just the final path component, so a single-file add strips any leading
/// directories.
///
/// Names always use `/` separators, whatever the host OS uses, so archives stay portable across
/// the platforms that read and write them.
pub fn entry_name(path: &Path, base_dir: Option<&Path>) -> crate::Result<String> {
    let relative = match base_dir {
        Some(base) => path
            .strip_prefix(base)
            .map_err(|_| crate::Error::InvalidArgs {
                reason: format!(
                    "The path `{}` is not inside the base directory `{}`.",
                    path.to_string_lossy(),
                    base.to_string_lossy(),
                ),
            })?
            .to_path_buf(),
        None => path
            .file_name()
            .map(Into::into)
            .ok_or_else(|| crate::Error::InvalidArgs {
                reason: format!("The path `{}` has no filename.", path.to_string_lossy()),
            })?,
    };

    let mut segments = Vec::new();

    for component in relative.components() {
        match component {
            Component::Normal(segment) => {
                segments.push(segment.to_str().ok_or_else(|| crate::Error::InvalidArgs {
                    reason: format!(
                        "The path `{}` is not valid Unicode.",
                        path.to_string_lossy()
                    ),
                })?);
            }
            Component::CurDir => {}
            _ => {
                return Err(crate::Error::InvalidArgs {
                    reason: format!(
                        "The path `{}` cannot be made archive-relative.",
                        path.to_string_lossy()
                    ),
                })
            }
        }
    }

    if segments.is_empty() {
        return Err(crate::Error::InvalidArgs {
            reason: format!(
                "The path `{}` produces an empty archive name.",
                path.to_string_lossy()
            ),
        });
    }

    Ok(segments.join(SEP))
}
