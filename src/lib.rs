//! _Shader Variants_ compiles every define-combination of a shader into SPIR-V, reflects the
//! resource interface of each result and generates source code which embeds the words behind a
//! typed accessor.
//!
//! A shader is declared in JSON:
//!
//! ```json
//! {
//!     "name": "basic_fragment",
//!     "language": "glsl",
//!     "path": "basic.frag",
//!     "entry_point": "main",
//!     "type": "Fragment",
//!     "include_folders": ["include"],
//!     "defines": ["QUALITY=2"],
//!     "variant_defines": ["USE_TEXTURE", "USE_SHADOWS"]
//! }
//! ```
//!
//! The optional `variant_defines` are enumerated as a power set, so the declaration above produces
//! four variants. Each variant is identified by the hash of its [`CompilerConfig`], which is stable
//! across processes and platforms.
//!
//! # Usage
//!
//! ```no_run
//! use shader_variants::prelude::*;
//!
//! # fn main() -> Result<(), Error> {
//! let fs = OsFileSystem;
//! let pipeline = Pipeline::new(PipelineInfo::new().jobs(4))?;
//! let mut descriptor = ShaderDescriptor::read(&fs, "shaders/basic.json".as_ref())?;
//!
//! pipeline.compile_and_reflect_shader(&mut descriptor, &fs)?;
//!
//! let source = generate(&descriptor, HeaderLanguage::Rust)?;
//! # Ok(()) }
//! ```
//!
//! Generated Rust code selects a variant at runtime:
//!
//! ```ignore
//! let config = CompilerConfig::new(ShaderType::Fragment)
//!     .define("USE_TEXTURE", "1")
//!     .define("QUALITY", "2")
//!     .build();
//! let spirv: &'static [u32] = shaders::BasicFragment.get_variant(&config)?;
//! ```
//!
//! # Features
//!
//! The default `compiler` feature enables everything which compiles, reflects and generates
//! shaders. Programs which only embed generated Rust need [`CompilerConfig`], [`ShaderType`] and
//! [`UnknownVariantError`], which are available with `default-features = false`.
//!
//! # Logging
//!
//! All diagnostics go through the [`log`](https://docs.rs/log) facade. The binaries initialize
//! `pretty_env_logger`, so `RUST_LOG=debug` shows each variant as it compiles and the source of any
//! shader which fails to compile.

#[cfg(feature = "compiler")]
pub mod cache;
#[cfg(feature = "compiler")]
pub mod codegen;
#[cfg(feature = "compiler")]
pub mod compiler;
pub mod config;
pub mod define;
#[cfg(feature = "compiler")]
pub mod descriptor;
#[cfg(feature = "compiler")]
pub mod include;
#[cfg(feature = "compiler")]
pub mod pipeline;
#[cfg(feature = "compiler")]
pub mod reflect;
#[cfg(feature = "compiler")]
pub mod resource;
#[cfg(feature = "compiler")]
pub mod scan;
pub mod stage;
#[cfg(feature = "compiler")]
pub mod variant;
#[cfg(feature = "compiler")]
pub mod vfs;

mod error;

pub use self::{
    config::{CompilerConfig, CompilerConfigBuilder},
    error::{Error, Result, UnknownVariantError},
    stage::ShaderType,
};

/// Things which are used in almost every program which compiles shaders.
#[cfg(feature = "compiler")]
pub mod prelude {
    pub use super::{
        cache::ShaderCache,
        codegen::{generate, HeaderLanguage},
        config::{CompilerConfig, CompilerConfigBuilder},
        descriptor::{ShaderDeclaration, ShaderDescriptor},
        error::{Error, Result, UnknownVariantError},
        pipeline::{Pipeline, PipelineInfo, PipelineInfoBuilder},
        resource::{DataType, ResourceKind, ShaderResource, ShaderResources},
        stage::{ShaderType, SourceLanguage},
        variant::ShaderVariant,
        vfs::{FileSystem, MemoryFileSystem, OsFileSystem},
    };
}

#[cfg(feature = "compiler")]
use {
    self::{
        codegen::{generate, HeaderLanguage},
        descriptor::ShaderDescriptor,
        pipeline::Pipeline,
        vfs::FileSystem,
    },
    log::{error, info},
    std::path::Path,
};

/// Compiles the shader declared by `schema` and writes generated source to `output`.
#[cfg(feature = "compiler")]
///
/// On failure the error and whatever part of the descriptor was built are logged before the error
/// is returned.
pub fn run(
    fs: &dyn FileSystem,
    pipeline: &Pipeline,
    schema: &Path,
    output: &Path,
    language: HeaderLanguage,
) -> Result<ShaderDescriptor> {
    let mut descriptor = ShaderDescriptor::read(fs, schema).map_err(|err| {
        error!("Unable to read {}: {err}", schema.display());

        err
    })?;

    let res = pipeline
        .compile_and_reflect_shader(&mut descriptor, fs)
        .and_then(|_| generate(&descriptor, language))
        .and_then(|source| fs.write_file(output, source.as_bytes()));

    if let Err(err) = res {
        error!("{err}");
        error!("{descriptor:#?}");

        return Err(err);
    }

    info!(
        "Wrote {} variant{} of {} to {}",
        descriptor.variants.len(),
        if descriptor.variants.len() == 1 { "" } else { "s" },
        descriptor.name,
        output.display()
    );

    Ok(descriptor)
}
