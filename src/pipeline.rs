use {
    crate::{
        compiler::{OptimizationLevel, ShaderCompiler, ShaderSource, ShadercCompiler},
        define::combinations,
        descriptor::ShaderDescriptor,
        error::{Error, Result},
        include::{expand_file, IncludeResolver},
        reflect::{ShaderReflector, SpirqReflector},
        variant::{compile_variant, ShaderVariant},
        vfs::FileSystem,
    },
    derive_builder::{Builder, UninitializedFieldError},
    log::{debug, error, info},
    rayon::{prelude::*, ThreadPool, ThreadPoolBuilder},
};

/// Settings of a [`Pipeline`].
#[derive(Builder, Clone, Debug, Default)]
#[builder(
    build_fn(private, name = "fallible_build", error = "PipelineInfoBuilderError"),
    derive(Debug),
    pattern = "owned"
)]
pub struct PipelineInfo {
    /// The number of worker threads variants are compiled on.
    ///
    /// The default value lets `rayon` pick one thread per logical CPU.
    #[builder(default, setter(strip_option))]
    pub jobs: Option<usize>,

    /// Sets the optimization level of the default compiler.
    #[builder(default, setter(strip_option))]
    pub optimization_level: Option<OptimizationLevel>,

    /// Sets the default compiler to treat all warnings as errors.
    #[builder(default)]
    pub warnings_as_errors: bool,
}

impl PipelineInfo {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> PipelineInfoBuilder {
        PipelineInfoBuilder::default()
    }
}

// HACK: https://github.com/colin-kiegel/rust-derive-builder/issues/56
impl PipelineInfoBuilder {
    pub fn build(self) -> PipelineInfo {
        self.fallible_build()
            .expect("All required fields set at initialization")
    }
}

impl From<PipelineInfoBuilder> for PipelineInfo {
    fn from(builder: PipelineInfoBuilder) -> Self {
        builder.build()
    }
}

#[derive(Debug)]
struct PipelineInfoBuilderError;

impl From<UninitializedFieldError> for PipelineInfoBuilderError {
    fn from(_: UninitializedFieldError) -> Self {
        Self
    }
}

/// Expands, compiles and reflects every variant of a shader on a bounded pool of workers.
pub struct Pipeline {
    compiler: Box<dyn ShaderCompiler + Send>,
    pool: ThreadPool,
    reflector: Box<dyn ShaderReflector + Send>,
}

impl Pipeline {
    /// Creates a pipeline using `shaderc` and `spirq`.
    pub fn new(info: impl Into<PipelineInfo>) -> Result<Self> {
        let info = info.into();
        let mut compiler = ShadercCompiler::new()
            .map_err(|message| Error::Compile {
                variant: vec![],
                message,
            })?
            .warnings_as_errors(info.warnings_as_errors);

        if let Some(level) = info.optimization_level {
            compiler = compiler.optimization_level(level);
        }

        Self::with_collaborators(info, compiler, SpirqReflector)
    }

    pub fn with_collaborators(
        info: impl Into<PipelineInfo>,
        compiler: impl ShaderCompiler + Send + 'static,
        reflector: impl ShaderReflector + Send + 'static,
    ) -> Result<Self> {
        let info = info.into();
        let mut pool = ThreadPoolBuilder::new()
            .thread_name(|idx| format!("shader-compiler-{idx}"));

        if let Some(jobs) = info.jobs {
            pool = pool.num_threads(jobs);
        }

        let pool = pool.build().map_err(|err| {
            error!("Unable to create worker pool");

            Error::ThreadPool(err)
        })?;

        debug!("Compiling on {} threads", pool.current_num_threads());

        Ok(Self {
            compiler: Box::new(compiler),
            pool,
            reflector: Box::new(reflector),
        })
    }

    pub fn jobs(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Compiles every define-combination of `descriptor`, storing the variants and the merged
    /// resources of all of them in the descriptor.
    ///
    /// Nothing is stored unless every variant compiles and reflects.
    pub fn compile_and_reflect_shader(
        &self,
        descriptor: &mut ShaderDescriptor,
        fs: &dyn FileSystem,
    ) -> Result<()> {
        let resolver = IncludeResolver::new(fs, &descriptor.include_folders);
        let text = expand_file(&resolver, &descriptor.path)?;
        let configs = combinations(&descriptor.variant_defines)?
            .iter()
            .map(|subset| descriptor.config(subset))
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Compiling {} ({} variant{})",
            descriptor.name,
            configs.len(),
            if configs.len() == 1 { "" } else { "s" }
        );

        let file_name = descriptor.path.to_string_lossy().into_owned();
        let source = ShaderSource {
            file_name: &file_name,
            language: descriptor.language,
            text: &text,
        };
        let compiler = self.compiler.as_ref();
        let reflector = self.reflector.as_ref();
        let variants = self.pool.install(|| {
            configs
                .par_iter()
                .map(|config| compile_variant(compiler, reflector, &source, config))
                .collect::<Result<Vec<ShaderVariant>>>()
        })?;

        for variant in variants {
            descriptor.resources.merge(variant.resources.clone());
            descriptor.variants.insert(variant.hash, variant);
        }

        Ok(())
    }
}
