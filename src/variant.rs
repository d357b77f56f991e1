use {
    crate::{
        compiler::{ShaderCompiler, ShaderSource},
        config::CompilerConfig,
        error::{Error, Result},
        reflect::ShaderReflector,
        resource::ShaderResources,
    },
    log::{error, info},
};

/// The SPIR-V and reflected interface of one compiled configuration of a shader.
#[derive(Clone, Debug, PartialEq)]
pub struct ShaderVariant {
    /// The [`CompilerConfig::hash`] of the configuration this variant was compiled with.
    pub hash: u64,

    /// Sorted `NAME=VALUE` strings of every define applied to this variant.
    pub defines: Vec<String>,

    pub resources: ShaderResources,
    pub spirv: Vec<u32>,
}

/// Compiles and reflects a single configuration of `source`.
pub fn compile_variant(
    compiler: &dyn ShaderCompiler,
    reflector: &dyn ShaderReflector,
    source: &ShaderSource,
    config: &CompilerConfig,
) -> Result<ShaderVariant> {
    let defines = config.define_strings();

    info!("Compiling {} [{}]", source.file_name, defines.join(", "));

    let spirv = compiler.compile(source, config).map_err(|message| {
        error!("{message}");

        Error::Compile {
            variant: defines.clone(),
            message,
        }
    })?;

    let resources = reflector
        .reflect(&spirv, &config.entry_point)
        .map_err(|message| Error::Reflection {
            variant: defines.clone(),
            message,
        })?;

    Ok(ShaderVariant {
        hash: config.hash(),
        defines,
        resources,
        spirv,
    })
}
