use {
    crate::stage::ShaderType,
    derive_builder::{Builder, UninitializedFieldError},
    fnv::FnvHasher,
    std::{collections::BTreeMap, hash::Hasher},
};

/// The concrete input of one compile: a stage, an entry point and a resolved define mapping.
///
/// The hash of a configuration identifies the shader variant it produces, both inside the compiler
/// and inside generated code which selects variants at runtime.
#[derive(Builder, Clone, Debug, Eq, PartialEq)]
#[builder(
    build_fn(private, name = "fallible_build", error = "CompilerConfigBuilderError"),
    pattern = "owned"
)]
pub struct CompilerConfig {
    /// Macro definitions, unique by name.
    #[builder(default)]
    pub defines: BTreeMap<String, String>,

    /// The name of the entry point function.
    ///
    /// The default value is `main`.
    #[builder(default = "\"main\".to_owned()", setter(into))]
    pub entry_point: String,

    pub stage: ShaderType,
}

impl CompilerConfig {
    #[allow(clippy::new_ret_no_self)]
    pub fn new(stage: ShaderType) -> CompilerConfigBuilder {
        CompilerConfigBuilder::new(stage)
    }

    /// Returns a 64-bit FNV-1a hash of the stage, the defines (in name order) and the entry point.
    ///
    /// The value does not depend on the insertion order of the defines and is stable between
    /// processes, platforms and compiler versions.
    pub fn hash(&self) -> u64 {
        let mut hasher = FnvHasher::default();

        hasher.write(self.stage.as_str().as_bytes());
        hasher.write_u8(0);

        for (name, value) in &self.defines {
            hasher.write(name.as_bytes());
            hasher.write_u8(b'=');
            hasher.write(value.as_bytes());
            hasher.write_u8(0);
        }

        hasher.write_u8(0);
        hasher.write(self.entry_point.as_bytes());

        hasher.finish()
    }

    /// The defines as sorted `NAME=VALUE` strings.
    pub fn define_strings(&self) -> Vec<String> {
        self.defines
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect()
    }
}

// HACK: https://github.com/colin-kiegel/rust-derive-builder/issues/56
impl CompilerConfigBuilder {
    pub fn new(stage: ShaderType) -> Self {
        Self::default().stage(stage)
    }

    /// Defines a single macro, replacing any previous value of the same name.
    pub fn define(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defines
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());

        self
    }

    pub fn build(self) -> CompilerConfig {
        self.fallible_build()
            .expect("All required fields set at initialization")
    }
}

impl From<CompilerConfigBuilder> for CompilerConfig {
    fn from(builder: CompilerConfigBuilder) -> Self {
        builder.build()
    }
}

#[derive(Debug)]
struct CompilerConfigBuilderError;

impl From<UninitializedFieldError> for CompilerConfigBuilderError {
    fn from(_: UninitializedFieldError) -> Self {
        Self
    }
}
