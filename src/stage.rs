use {
    log::warn,
    serde::{Deserialize, Serialize},
    std::{
        fmt::{Display, Formatter},
        str::FromStr,
    },
};

/// The pipeline stage a shader runs on.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(from = "String", into = "&'static str")]
pub enum ShaderType {
    Vertex,
    Fragment,
    Compute,
    Geometry,
    TessellationControl,
    TessellationEvaluation,
    RayGeneration,
    Intersection,
    AnyHit,
    ClosestHit,
    Miss,
    Callable,
    Task,
    Mesh,

    /// Sentinel for unrecognized names; never compiled.
    Unknown,
}

impl ShaderType {
    pub const ALL: [Self; 14] = [
        Self::Vertex,
        Self::Fragment,
        Self::Compute,
        Self::Geometry,
        Self::TessellationControl,
        Self::TessellationEvaluation,
        Self::RayGeneration,
        Self::Intersection,
        Self::AnyHit,
        Self::ClosestHit,
        Self::Miss,
        Self::Callable,
        Self::Task,
        Self::Mesh,
    ];

    /// Parses the exact stage name, returning [`ShaderType::Unknown`] for anything else.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == name)
            .unwrap_or(Self::Unknown)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vertex => "Vertex",
            Self::Fragment => "Fragment",
            Self::Compute => "Compute",
            Self::Geometry => "Geometry",
            Self::TessellationControl => "TessellationControl",
            Self::TessellationEvaluation => "TessellationEvaluation",
            Self::RayGeneration => "RayGeneration",
            Self::Intersection => "Intersection",
            Self::AnyHit => "AnyHit",
            Self::ClosestHit => "ClosestHit",
            Self::Miss => "Miss",
            Self::Callable => "Callable",
            Self::Task => "Task",
            Self::Mesh => "Mesh",
            Self::Unknown => "Unknown",
        }
    }

    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }

    /// Guesses the stage from a file name such as `foo.frag` or `foo.frag.glsl`.
    pub fn guess_from_extension(file_name: &str) -> Self {
        file_name
            .split('.')
            .skip(1)
            .map(|ext| match ext {
                "vert" => Self::Vertex,
                "frag" => Self::Fragment,
                "comp" => Self::Compute,
                "geom" => Self::Geometry,
                "tesc" => Self::TessellationControl,
                "tese" => Self::TessellationEvaluation,
                "rgen" => Self::RayGeneration,
                "rint" => Self::Intersection,
                "rahit" => Self::AnyHit,
                "rchit" => Self::ClosestHit,
                "rmiss" => Self::Miss,
                "rcall" => Self::Callable,
                "task" => Self::Task,
                "mesh" => Self::Mesh,
                _ => Self::Unknown,
            })
            .find(|ty| ty.is_known())
            .unwrap_or(Self::Unknown)
    }
}

impl Display for ShaderType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ShaderType {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<ShaderType> for &'static str {
    fn from(ty: ShaderType) -> Self {
        ty.as_str()
    }
}

impl FromStr for ShaderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::from_name(s) {
            Self::Unknown => Err(s.to_owned()),
            ty => Ok(ty),
        }
    }
}

/// The language a shader source file is written in.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SourceLanguage {
    #[default]
    Glsl,
    Hlsl,
}

impl SourceLanguage {
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "glsl" => Self::Glsl,
            "hlsl" => Self::Hlsl,
            _ => {
                warn!("Unrecognized shader language `{tag}`, assuming GLSL");

                Self::Glsl
            }
        }
    }
}
