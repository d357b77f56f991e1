pub use shaderc::OptimizationLevel;

use {
    crate::{
        config::CompilerConfig,
        stage::{ShaderType, SourceLanguage},
    },
    log::{debug, error},
    shaderc::{CompileOptions, Compiler, EnvVersion, ShaderKind, SpirvVersion, TargetEnv},
};

/// The source of one shader after include expansion, shared by every variant compile.
#[derive(Clone, Copy, Debug)]
pub struct ShaderSource<'a> {
    pub file_name: &'a str,
    pub language: SourceLanguage,
    pub text: &'a str,
}

/// Turns shader source into SPIR-V words for one configuration.
pub trait ShaderCompiler: Sync {
    /// Returns the compiled words, or the compiler's own diagnostic text.
    fn compile(&self, source: &ShaderSource, config: &CompilerConfig) -> Result<Vec<u32>, String>;
}

/// Compiles GLSL and HLSL through `shaderc`.
pub struct ShadercCompiler {
    compiler: Compiler,
    optimization_level: Option<OptimizationLevel>,
    warnings_as_errors: bool,
}

impl ShadercCompiler {
    pub fn new() -> Result<Self, String> {
        let compiler = Compiler::new().ok_or_else(|| {
            error!("Unable to initialize shaderc");

            "unable to initialize shaderc".to_owned()
        })?;

        Ok(Self {
            compiler,
            optimization_level: None,
            warnings_as_errors: false,
        })
    }

    pub fn optimization_level(mut self, level: OptimizationLevel) -> Self {
        self.optimization_level = Some(level);
        self
    }

    pub fn warnings_as_errors(mut self, warnings_as_errors: bool) -> Self {
        self.warnings_as_errors = warnings_as_errors;
        self
    }
}

impl ShaderCompiler for ShadercCompiler {
    fn compile(&self, source: &ShaderSource, config: &CompilerConfig) -> Result<Vec<u32>, String> {
        let shader_kind = shader_kind(config.stage)
            .ok_or_else(|| format!("no compiler stage for {}", config.stage))?;

        let mut options = CompileOptions::new().ok_or_else(|| {
            error!("Unable to initialize compiler options");

            "unable to initialize compiler options".to_owned()
        })?;

        for (name, value) in &config.defines {
            options.add_macro_definition(name, Some(value.as_str()));
        }

        options.set_target_env(TargetEnv::Vulkan, EnvVersion::Vulkan1_2 as _);
        options.set_target_spirv(SpirvVersion::V1_5);
        options.set_source_language(match source.language {
            SourceLanguage::Glsl => shaderc::SourceLanguage::GLSL,
            SourceLanguage::Hlsl => shaderc::SourceLanguage::HLSL,
        });

        if let Some(level) = self.optimization_level {
            options.set_optimization_level(level);
        }

        if self.warnings_as_errors {
            options.set_warnings_as_errors();
        }

        let artifact = self
            .compiler
            .compile_into_spirv(
                source.text,
                shader_kind,
                source.file_name,
                &config.entry_point,
                Some(&options),
            )
            .map_err(|err| {
                error!("Unable to compile shader {}", source.file_name);

                for (line_index, line) in source.text.split('\n').enumerate() {
                    debug!("{}: {line}", line_index + 1);
                }

                err.to_string()
            })?;

        if artifact.get_num_warnings() > 0 {
            debug!("{}", artifact.get_warning_messages());
        }

        Ok(artifact.as_binary().to_vec())
    }
}

/// Maps a stage onto the compiler's stage; the sentinel has no mapping.
pub fn shader_kind(stage: ShaderType) -> Option<ShaderKind> {
    Some(match stage {
        ShaderType::Vertex => ShaderKind::Vertex,
        ShaderType::Fragment => ShaderKind::Fragment,
        ShaderType::Compute => ShaderKind::Compute,
        ShaderType::Geometry => ShaderKind::Geometry,
        ShaderType::TessellationControl => ShaderKind::TessControl,
        ShaderType::TessellationEvaluation => ShaderKind::TessEvaluation,
        ShaderType::RayGeneration => ShaderKind::RayGeneration,
        ShaderType::Intersection => ShaderKind::Intersection,
        ShaderType::AnyHit => ShaderKind::AnyHit,
        ShaderType::ClosestHit => ShaderKind::ClosestHit,
        ShaderType::Miss => ShaderKind::Miss,
        ShaderType::Callable => ShaderKind::Callable,
        ShaderType::Task => ShaderKind::Task,
        ShaderType::Mesh => ShaderKind::Mesh,
        ShaderType::Unknown => return None,
    })
}
