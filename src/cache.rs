//! Runtime access to compiled shader variants.

use {
    crate::{
        config::CompilerConfig,
        descriptor::ShaderDescriptor,
        error::{Error, Result},
        pipeline::Pipeline,
        vfs::FileSystem,
    },
    fnv::FnvHashMap,
    log::{debug, info},
    parking_lot::Mutex,
    std::sync::Arc,
};

type VariantKey = (String, u64);

enum Strategy {
    Offline,
    Online {
        descriptors: Mutex<FnvHashMap<String, ShaderDescriptor>>,
        fs: Box<dyn FileSystem + Send>,
        pipeline: Pipeline,
    },
}

/// Loads shader variants by name and configuration.
///
/// An offline cache only serves variants registered up front, usually from generated code. An
/// online cache additionally compiles declared shaders the first time one of their variants is
/// requested.
pub struct ShaderCache {
    strategy: Strategy,
    variants: Mutex<FnvHashMap<VariantKey, Arc<[u32]>>>,
}

impl ShaderCache {
    pub fn offline() -> Self {
        Self {
            strategy: Strategy::Offline,
            variants: Default::default(),
        }
    }

    pub fn online(pipeline: Pipeline, fs: impl FileSystem + Send + 'static) -> Self {
        Self {
            strategy: Strategy::Online {
                descriptors: Default::default(),
                fs: Box::new(fs),
                pipeline,
            },
            variants: Default::default(),
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self.strategy, Strategy::Online { .. })
    }

    /// Adds the words of one precompiled variant.
    pub fn register(&self, name: impl Into<String>, hash: u64, spirv: impl Into<Arc<[u32]>>) {
        self.variants
            .lock()
            .insert((name.into(), hash), spirv.into());
    }

    /// Declares a shader which an online cache compiles on first use.
    ///
    /// Returns `false` for offline caches, which cannot compile.
    pub fn declare(&self, descriptor: ShaderDescriptor) -> bool {
        match &self.strategy {
            Strategy::Offline => false,
            Strategy::Online { descriptors, .. } => {
                descriptors
                    .lock()
                    .insert(descriptor.name.clone(), descriptor);

                true
            }
        }
    }

    pub fn load(&self, name: &str, config: &CompilerConfig) -> Result<Arc<[u32]>> {
        let hash = config.hash();
        let key = (name.to_owned(), hash);

        if let Some(spirv) = self.variants.lock().get(&key) {
            return Ok(Arc::clone(spirv));
        }

        let Strategy::Online {
            descriptors,
            fs,
            pipeline,
        } = &self.strategy
        else {
            return Err(Error::UnknownVariant(hash));
        };

        let mut descriptors = descriptors.lock();
        let descriptor = descriptors
            .get_mut(name)
            .ok_or(Error::UnknownVariant(hash))?;

        if descriptor.variants.is_empty() {
            info!("Compiling shader {name} on first use");

            pipeline.compile_and_reflect_shader(descriptor, fs.as_ref())?;

            let mut variants = self.variants.lock();
            for (&hash, variant) in &descriptor.variants {
                variants.insert((name.to_owned(), hash), variant.spirv.as_slice().into());
            }
        } else {
            debug!("Shader {name} already compiled");
        }

        self.variants
            .lock()
            .get(&key)
            .cloned()
            .ok_or(Error::UnknownVariant(hash))
    }
}
