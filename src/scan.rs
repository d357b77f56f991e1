//! Discovery of the define sets used by a tree of shader sources.
//!
//! Every `#ifdef NAME` found in a file becomes the define `NAME=1`; each file contributes one
//! variant holding all of its defines.

use {
    crate::{define::Define, error::Result, vfs::FileSystem},
    log::{error, info, warn},
    regex::Regex,
    serde::{Deserialize, Serialize},
    std::{
        collections::BTreeSet,
        path::{Path, PathBuf},
        sync::OnceLock,
    },
    walkdir::WalkDir,
};

/// File name suffixes of shader stages, combined with `glsl` and `hlsl`.
pub const SHADER_STAGE_EXTENSIONS: [&str; 14] = [
    "vert", "tesc", "tese", "geom", "frag", "comp", "rchit", "rahit", "rmiss", "rint", "rcall",
    "rgen", "task", "mesh",
];

/// The defines of one variant, unique and ordered by name then value.
pub type VariantDefines = BTreeSet<Define>;

fn ifdef_regex() -> &'static Regex {
    static IFDEF: OnceLock<Regex> = OnceLock::new();

    IFDEF.get_or_init(|| Regex::new("#ifdef +([A-Za-z0-9_]+)").expect("Invalid ifdef pattern"))
}

/// `true` for `*.<stage>.glsl`, `*.<stage>.hlsl` and `*.h` files.
pub fn is_shader_path(path: &Path) -> bool {
    let Some(file_name) = path.file_name().and_then(|file_name| file_name.to_str()) else {
        return false;
    };

    file_name.ends_with(".h")
        || ["glsl", "hlsl"].into_iter().any(|language| {
            SHADER_STAGE_EXTENSIONS
                .iter()
                .any(|stage| file_name.ends_with(&format!(".{stage}.{language}")))
        })
}

/// Recursively finds shader sources below `shader_dir`, in path order.
pub fn collect_shader_paths(shader_dir: &Path) -> Vec<PathBuf> {
    let mut res = WalkDir::new(shader_dir)
        .into_iter()
        .filter_map(|entry| {
            entry
                .map_err(|err| warn!("Unable to read shader directory: {err}"))
                .ok()
        })
        .filter(|entry| entry.file_type().is_file() && is_shader_path(entry.path()))
        .map(|entry| entry.into_path())
        .collect::<Vec<_>>();
    res.sort();
    res
}

/// Collects the define of every `#ifdef` in `source`.
pub fn shader_variant(source: &str) -> VariantDefines {
    ifdef_regex()
        .captures_iter(source)
        .filter_map(|captures| captures.get(1))
        .map(|name| Define {
            name: name.as_str().to_owned(),
            value: "1".to_owned(),
        })
        .collect()
}

/// Reads each file and returns the distinct variants found; unreadable files are logged and
/// skipped.
pub fn collect_variants(fs: &dyn FileSystem, shader_paths: &[PathBuf]) -> BTreeSet<VariantDefines> {
    let mut res = BTreeSet::new();

    for path in shader_paths {
        info!("Processing file: {}", path.display());

        match fs.read_to_string(path) {
            Ok(source) => {
                res.insert(shader_variant(&source));
            }
            Err(err) => error!("{err}"),
        }
    }

    info!("Unique shader variants: {}", res.len());

    res
}

#[derive(Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct VariantsFile {
    pub variants: Vec<VariantEntry>,
}

#[derive(Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct VariantEntry {
    pub defines: Vec<String>,
}

impl VariantsFile {
    pub fn new(variants: &BTreeSet<VariantDefines>) -> Self {
        Self {
            variants: variants
                .iter()
                .map(|defines| VariantEntry {
                    defines: defines
                        .iter()
                        .map(|Define { name, value }| format!("{name}={value}"))
                        .collect(),
                })
                .collect(),
        }
    }

    /// Pretty JSON indented by four spaces.
    pub fn to_json(&self) -> Result<String> {
        let mut buf = vec![];
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);

        self.serialize(&mut serializer)?;

        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
