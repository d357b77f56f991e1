//! `#include "..."` expansion of shader source text.

use {
    crate::{
        error::{Error, Result},
        vfs::FileSystem,
    },
    fnv::FnvHashMap,
    log::trace,
    parking_lot::Mutex,
    regex::Regex,
    std::{
        path::{Path, PathBuf},
        sync::OnceLock,
    },
};

fn include_regex() -> &'static Regex {
    static INCLUDE: OnceLock<Regex> = OnceLock::new();

    INCLUDE.get_or_init(|| {
        Regex::new(r#"(?m)^[ \t]*#[ \t]*include[ \t]+"([A-Za-z0-9/._\-]+)"[ \t]*"#)
            .expect("Invalid include pattern")
    })
}

/// Finds include files by probing an ordered list of search directories.
pub struct IncludeResolver<'a> {
    fs: &'a dyn FileSystem,
    resolved: Mutex<FnvHashMap<String, PathBuf>>,
    search_paths: Vec<PathBuf>,
}

impl<'a> IncludeResolver<'a> {
    pub fn new<P>(fs: &'a dyn FileSystem, search_paths: impl IntoIterator<Item = P>) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            fs,
            resolved: Default::default(),
            search_paths: search_paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn file_system(&self) -> &'a dyn FileSystem {
        self.fs
    }

    /// Returns `search_path/include_name` for the first search path where that file exists.
    pub fn resolve(&self, include_name: &str) -> Result<PathBuf> {
        if let Some(path) = self.resolved.lock().get(include_name) {
            return Ok(path.clone());
        }

        let path = self
            .search_paths
            .iter()
            .map(|search_path| search_path.join(include_name))
            .find(|path| self.fs.exists(path))
            .ok_or_else(|| Error::IncludeResolution {
                name: include_name.to_owned(),
            })?;

        trace!("Resolved include `{include_name}` to {}", path.display());

        self.resolved
            .lock()
            .insert(include_name.to_owned(), path.clone());

        Ok(path)
    }
}

/// Recursively replaces every include directive in `source` with the expanded contents of the
/// file it names.
pub fn expand_includes(resolver: &IncludeResolver, source: &str) -> Result<String> {
    expand(resolver, source, &mut vec![])
}

/// Reads and expands the file at `path`, which becomes the root of the include stack.
pub fn expand_file(resolver: &IncludeResolver, path: &Path) -> Result<String> {
    let source = resolver.file_system().read_to_string(path)?;

    expand(resolver, &source, &mut vec![path.to_path_buf()])
}

fn expand(resolver: &IncludeResolver, source: &str, stack: &mut Vec<PathBuf>) -> Result<String> {
    let mut expanded = source.to_owned();

    // Each pass replaces the first directive; included text is already expanded so it never
    // matches again
    let mut search_from = 0;
    while let Some(captures) = include_regex().captures(&expanded[search_from..]) {
        let Some(directive) = captures.get(0) else {
            break;
        };
        let start = search_from + directive.start();
        let end = search_from + directive.end();
        let path = resolver.resolve(&captures[1])?;

        if stack.contains(&path) {
            return Err(Error::IncludeCycle { path });
        }

        let contents = resolver.file_system().read_to_string(&path)?;

        stack.push(path);
        let contents = expand(resolver, &contents, stack)?;
        stack.pop();

        expanded.replace_range(start..end, &contents);
        search_from = start + contents.len();
    }

    Ok(expanded)
}
