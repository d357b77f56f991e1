use {
    crate::define::MAX_VARIANT_DEFINES,
    std::{
        error::Error as StdError,
        fmt::{Display, Formatter},
        io::Error as IoError,
        path::PathBuf,
    },
};

pub type Result<T> = std::result::Result<T, Error>;

/// Everything which can stop a shader from being compiled, reflected or generated.
#[derive(Debug)]
pub enum Error {
    /// The external compiler rejected one variant of the shader.
    Compile {
        /// The resolved `NAME=VALUE` defines of the failing variant.
        variant: Vec<String>,
        message: String,
    },

    /// A struct type contains itself, directly or through other structs.
    CyclicStruct(String),

    /// Writing generated text failed.
    Fmt,

    /// An `#include` chain leads back to a file which is still being expanded.
    IncludeCycle { path: PathBuf },

    /// No search path contains the requested include.
    IncludeResolution { name: String },

    /// A shader name which cannot be used as an identifier in generated code.
    InvalidShaderName(String),

    /// A define string contains more than one `=`.
    InvalidDefine(String),

    Io { path: PathBuf, source: IoError },

    #[cfg(feature = "compiler")]
    Json(serde_json::Error),

    /// The reflector could not process the SPIR-V of one variant.
    Reflection {
        variant: Vec<String>,
        message: String,
    },

    /// The worker pool could not be started.
    #[cfg(feature = "compiler")]
    ThreadPool(rayon::ThreadPoolBuildError),

    /// A shader declares more variant defines than can be enumerated.
    TooManyVariantDefines(usize),

    /// The declared shader `type` is not a recognized stage.
    UnknownShaderType(String),

    /// A variant hash which matches nothing that was compiled.
    UnknownVariant(u64),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: IoError) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compile { variant, message } => {
                write!(f, "compile failed for variant [{}]: {message}", variant.join(", "))
            }
            Self::CyclicStruct(type_name) => write!(f, "cyclic struct reference: {type_name}"),
            Self::Fmt => f.write_str("unable to format generated source"),
            Self::IncludeCycle { path } => write!(f, "include cycle at {}", path.display()),
            Self::IncludeResolution { name } => write!(f, "failed to resolve include: {name}"),
            Self::InvalidDefine(define) => write!(f, "invalid define: {define}"),
            Self::InvalidShaderName(name) => write!(f, "invalid shader name: {name:?}"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            #[cfg(feature = "compiler")]
            Self::Json(err) => write!(f, "invalid shader schema: {err}"),
            Self::Reflection { variant, message } => write!(
                f,
                "reflection failed for variant [{}]: {message}",
                variant.join(", ")
            ),
            #[cfg(feature = "compiler")]
            Self::ThreadPool(err) => write!(f, "unable to start worker pool: {err}"),
            Self::TooManyVariantDefines(count) => write!(
                f,
                "too many variant defines: {count} (at most {MAX_VARIANT_DEFINES})"
            ),
            Self::UnknownShaderType(ty) => write!(f, "unknown shader type: {ty}"),
            Self::UnknownVariant(hash) => write!(f, "invalid shader variant: {hash}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            #[cfg(feature = "compiler")]
            Self::Json(err) => Some(err),
            #[cfg(feature = "compiler")]
            Self::ThreadPool(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::fmt::Error> for Error {
    fn from(_: std::fmt::Error) -> Self {
        Self::Fmt
    }
}

#[cfg(feature = "compiler")]
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Returned by generated `get_variant` accessors when the requested configuration was never
/// compiled.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UnknownVariantError {
    pub hash: u64,
}

impl Display for UnknownVariantError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid shader variant: {}", self.hash)
    }
}

impl StdError for UnknownVariantError {}

impl From<UnknownVariantError> for Error {
    fn from(err: UnknownVariantError) -> Self {
        Self::UnknownVariant(err.hash)
    }
}
