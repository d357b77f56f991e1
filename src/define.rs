use {
    crate::error::{Error, Result},
    std::collections::BTreeMap,
};

/// A preprocessor macro definition written as `NAME` or `NAME=VALUE`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Define {
    pub name: String,
    pub value: String,
}

impl Define {
    /// Splits on `=`; a bare name has the value `1`. More than one `=` is an error.
    pub fn parse(define: &str) -> Result<Self> {
        let mut parts = define.split('=');
        let name = parts.next().unwrap_or_default();
        let value = parts.next().unwrap_or("1");

        if parts.next().is_some() {
            return Err(Error::InvalidDefine(define.to_owned()));
        }

        Ok(Self {
            name: name.to_owned(),
            value: value.to_owned(),
        })
    }
}

/// The largest number of variant defines a shader may declare; each one doubles the number of
/// variants compiled.
pub const MAX_VARIANT_DEFINES: usize = 16;

/// Returns all `2^N` subsets of `variant_defines` in binary counting order: subset `i` holds
/// `variant_defines[j]` when bit `j` of `i` is set, so the first subset is always empty.
///
/// More than [`MAX_VARIANT_DEFINES`] defines is an error.
pub fn combinations<T>(variant_defines: &[T]) -> Result<Vec<Vec<T>>>
where
    T: Clone,
{
    if variant_defines.len() > MAX_VARIANT_DEFINES {
        return Err(Error::TooManyVariantDefines(variant_defines.len()));
    }

    Ok((0..1usize << variant_defines.len())
        .map(|i| {
            variant_defines
                .iter()
                .enumerate()
                .filter(|(j, _)| i & (1 << j) != 0)
                .map(|(_, define)| define.clone())
                .collect()
        })
        .collect())
}

/// Applies `base` and then `subset` into one mapping, so subset defines override base defines of
/// the same name.
pub fn resolve_defines<S>(base: &[S], subset: &[S]) -> Result<BTreeMap<String, String>>
where
    S: AsRef<str>,
{
    let mut defines = BTreeMap::new();

    for define in base.iter().chain(subset) {
        let Define { name, value } = Define::parse(define.as_ref())?;
        defines.insert(name, value);
    }

    Ok(defines)
}
