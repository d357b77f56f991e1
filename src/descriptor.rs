use {
    crate::{
        codegen::snake_to_pascal,
        config::{CompilerConfig, CompilerConfigBuilder},
        define::resolve_defines,
        error::{Error, Result},
        resource::ShaderResources,
        stage::{ShaderType, SourceLanguage},
        variant::ShaderVariant,
        vfs::FileSystem,
    },
    serde::{Deserialize, Serialize},
    serde_json::Value,
    std::{
        collections::BTreeMap,
        path::{Path, PathBuf},
    },
};

/// Type names generated files cannot declare for a shader.
const RESERVED_NAMES: &[&str] = &["CompilerConfig", "Self"];

/// The JSON form of a shader declaration.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ShaderDeclaration {
    pub name: String,
    pub language: String,
    pub path: PathBuf,
    pub entry_point: String,
    #[serde(rename = "type")]
    pub ty: ShaderType,
    #[serde(default)]
    pub include_folders: Vec<PathBuf>,
    #[serde(default)]
    pub defines: Vec<String>,
    #[serde(default)]
    pub variant_defines: Vec<String>,
}

impl ShaderDeclaration {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One shader's compilation unit: where its source lives, how to compile it, and after compiling,
/// every variant produced along with the merged resources of all of them.
#[derive(Clone, Debug)]
pub struct ShaderDescriptor {
    pub name: String,
    pub language: SourceLanguage,
    pub path: PathBuf,
    pub entry_point: String,
    pub ty: ShaderType,
    pub include_folders: Vec<PathBuf>,
    pub defines: Vec<String>,
    pub variant_defines: Vec<String>,

    /// Compiled variants keyed by [`CompilerConfig::hash`].
    pub variants: BTreeMap<u64, ShaderVariant>,

    /// The union of the resources of every variant in `variants`.
    pub resources: ShaderResources,
}

impl ShaderDescriptor {
    /// Validates a declaration; the stage must be a recognized one and the name must be usable as
    /// an identifier in generated code.
    pub fn from_declaration(decl: ShaderDeclaration) -> Result<Self> {
        if !decl.ty.is_known() {
            return Err(Error::UnknownShaderType(decl.ty.to_string()));
        }

        if !is_identifier(&decl.name) {
            return Err(Error::InvalidShaderName(decl.name));
        }

        Ok(Self {
            name: decl.name,
            language: SourceLanguage::from_tag(&decl.language),
            path: decl.path,
            entry_point: decl.entry_point,
            ty: decl.ty,
            include_folders: decl.include_folders,
            defines: decl.defines,
            variant_defines: decl.variant_defines,
            variants: Default::default(),
            resources: Default::default(),
        })
    }

    /// Parses a JSON declaration, keeping the original `type` text for diagnostics.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        let ty = value
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_default();
        let decl: ShaderDeclaration = serde_json::from_value(value)?;

        if !decl.ty.is_known() {
            return Err(Error::UnknownShaderType(ty));
        }

        Self::from_declaration(decl)
    }

    /// Reads a JSON declaration from `schema_path`; relative source and include paths are taken
    /// relative to the directory holding the schema.
    pub fn read(fs: &dyn FileSystem, schema_path: &Path) -> Result<Self> {
        let mut res = Self::from_json(&fs.read_to_string(schema_path)?)?;

        if let Some(base) = schema_path.parent() {
            res.path = base.join(&res.path);

            for include_folder in &mut res.include_folders {
                *include_folder = base.join(&*include_folder);
            }
        }

        Ok(res)
    }

    /// A configuration for this shader with the base defines applied, then `subset`.
    pub fn config<S>(&self, subset: &[S]) -> Result<CompilerConfig>
    where
        S: AsRef<str>,
    {
        let base = self.defines.iter().map(String::as_str).collect::<Vec<_>>();
        let subset = subset.iter().map(AsRef::as_ref).collect::<Vec<_>>();

        Ok(CompilerConfigBuilder::new(self.ty)
            .defines(resolve_defines(&base, &subset)?)
            .entry_point(self.entry_point.as_str())
            .build())
    }

    /// The compiled variant matching `config`.
    pub fn variant(&self, config: &CompilerConfig) -> Result<&ShaderVariant> {
        let hash = config.hash();

        self.variants.get(&hash).ok_or(Error::UnknownVariant(hash))
    }
}

/// Accepts `[a-z_][a-z0-9_]*` names which still start with a letter after their leading underscores
/// are removed, so the `PascalCase` form is an identifier too.
fn is_identifier(name: &str) -> bool {
    name.trim_start_matches('_')
        .starts_with(|c: char| c.is_ascii_lowercase())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && !RESERVED_NAMES.contains(&snake_to_pascal(name).as_str())
}
