//! Source generation for compiled shaders.
//!
//! A generated file embeds the SPIR-V of every variant of one shader, declares the reflected struct
//! types of its resources, and provides a `get_variant` accessor which selects words by
//! [`CompilerConfig::hash`](crate::CompilerConfig::hash).

mod cpp;
mod rust;

use {
    crate::{descriptor::ShaderDescriptor, error::Result},
    std::{
        fmt::{Display, Formatter},
        path::Path,
        str::FromStr,
    },
};

/// The number of SPIR-V words written on each line of a variant array.
const WORDS_PER_LINE: usize = 8;

/// The language of generated source.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum HeaderLanguage {
    #[default]
    Cpp,
    Rust,
}

impl HeaderLanguage {
    /// `.rs` files are Rust; anything else is C++.
    pub fn from_output_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("rs") => Self::Rust,
            _ => Self::Cpp,
        }
    }
}

impl Display for HeaderLanguage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Cpp => "cpp",
            Self::Rust => "rust",
        })
    }
}

impl FromStr for HeaderLanguage {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "c++" | "cpp" | "cxx" => Ok(Self::Cpp),
            "rs" | "rust" => Ok(Self::Rust),
            _ => Err(format!("unsupported header language `{s}` (expected `rust` or `cpp`)")),
        }
    }
}

/// Returns the source text for a compiled `descriptor`.
pub fn generate(descriptor: &ShaderDescriptor, language: HeaderLanguage) -> Result<String> {
    match language {
        HeaderLanguage::Cpp => cpp::generate(descriptor),
        HeaderLanguage::Rust => rust::generate(descriptor),
    }
}

/// Converts `snake_case` into `PascalCase`: the first character and every character after an
/// underscore are upper-cased and the underscores are removed.
pub fn snake_to_pascal(snake: &str) -> String {
    let mut pascal = String::with_capacity(snake.len());
    let mut upper = true;

    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            pascal.extend(c.to_uppercase());
            upper = false;
        } else {
            pascal.push(c);
        }
    }

    pascal
}

/// The `PascalCase` name of a reflected struct, with a trailing underscore when it would clash
/// with a name the generated file declares itself.
fn struct_name(type_name: &str, reserved: &[&str]) -> String {
    let mut name = snake_to_pascal(type_name);

    if reserved.contains(&name.as_str()) {
        name.push('_');
    }

    name
}

/// Splits SPIR-V into hex-formatted lines.
fn word_lines(spirv: &[u32]) -> impl Iterator<Item = String> + '_ {
    spirv.chunks(WORDS_PER_LINE).map(|words| {
        words
            .iter()
            .map(|word| format!("0x{word:08x},"))
            .collect::<Vec<_>>()
            .join(" ")
    })
}
