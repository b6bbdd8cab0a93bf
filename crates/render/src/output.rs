use crate::config::{OutputMode, OutputOptions};
use crate::error::{RenderError, Result};
use refdoc_model::GroupVersionDetails;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Render and write the documents of an output mode, returning the files
/// written.
///
/// `single` renders every group version into one document; `group` renders
/// one document per API group into `<group>.<extension>`.
pub(crate) fn write_documents<F>(
    options: &OutputOptions,
    extension: &str,
    groups: &[GroupVersionDetails],
    mut render: F,
) -> Result<Vec<PathBuf>>
where
    F: FnMut(&[&GroupVersionDetails]) -> Result<String>,
{
    match options.mode {
        OutputMode::Single => {
            let path = out_file_path(&options.path, false, &format!("out.{extension}"))?;
            let all: Vec<&GroupVersionDetails> = groups.iter().collect();
            write_file(&path, &render(&all)?)?;
            Ok(vec![path])
        }
        OutputMode::Group => {
            let mut by_group: BTreeMap<&str, Vec<&GroupVersionDetails>> = BTreeMap::new();
            for details in groups {
                by_group
                    .entry(details.group_version.group.as_str())
                    .or_default()
                    .push(details);
            }

            let mut written = Vec::with_capacity(by_group.len());
            for (group, members) in by_group {
                let path = out_file_path(&options.path, true, &format!("{group}.{extension}"))?;
                write_file(&path, &render(&members)?)?;
                written.push(path);
            }
            Ok(written)
        }
    }
}

/// File to write: `default_name` inside `path` when it is an existing
/// directory, otherwise `path` itself. With `expect_dir`, `path` must be an
/// existing directory.
pub(crate) fn out_file_path(path: &Path, expect_dir: bool, default_name: &str) -> Result<PathBuf> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => return Ok(path.join(default_name)),
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(RenderError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    if expect_dir {
        return Err(RenderError::NotADirectory(path.to_path_buf()));
    }
    Ok(path.to_path_buf())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Wrote {}", path.display());
    Ok(())
}
