use {
    super::{snake_to_pascal, struct_name, word_lines},
    crate::{
        define::resolve_defines,
        descriptor::ShaderDescriptor,
        error::Result,
        resource::{DataType, ScalarType, StructType},
    },
    log::warn,
    std::fmt::Write,
};

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "if", "impl", "in", "let",
    "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return",
    "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use",
    "virtual", "where", "while", "yield",
];

/// Names declared next to the reflected structs.
const RESERVED: &[&str] = &["UnknownType"];

pub(super) fn generate(descriptor: &ShaderDescriptor) -> Result<String> {
    let class_name = snake_to_pascal(&descriptor.name);
    let const_prefix = descriptor.name.to_ascii_uppercase();
    let mod_name = field_name(&descriptor.name);
    let base_defines = resolve_defines(&descriptor.defines, &[])?;
    let mut res = String::new();

    writeln!(res, "// DO NOT EDIT")?;
    writeln!(
        res,
        "// This file was generated by the shader compiler from `{}`",
        descriptor.name
    )?;
    writeln!(res)?;
    writeln!(
        res,
        "#[allow(clippy::all, dead_code, non_camel_case_types, non_snake_case)]"
    )?;
    writeln!(res, "pub mod shaders {{")?;
    writeln!(res, "    use shader_variants::{{")?;
    writeln!(
        res,
        "        CompilerConfig, CompilerConfigBuilder, ShaderType, UnknownVariantError,"
    )?;
    writeln!(res, "    }};")?;
    writeln!(res)?;

    for (hash, variant) in &descriptor.variants {
        let symbol = format!("{const_prefix}__{hash}");

        writeln!(res, "    // {}", defines_comment(&variant.defines))?;
        writeln!(
            res,
            "    pub const {symbol}: [u32; {}] = [",
            variant.spirv.len()
        )?;

        for line in word_lines(&variant.spirv) {
            writeln!(res, "        {line}")?;
        }

        writeln!(res, "    ];")?;
        writeln!(
            res,
            "    pub const {symbol}_SIZE: usize = {};",
            variant.spirv.len()
        )?;
        writeln!(res)?;
    }

    writeln!(res, "    pub mod {mod_name} {{")?;
    writeln!(res, "        /// Used to represent poorly reflected types.")?;
    writeln!(res, "        pub type UnknownType = u32;")?;

    for ty in descriptor.resources.structs_in_topological_order()? {
        write_struct(&mut res, ty)?;
    }

    writeln!(res, "    }}")?;
    writeln!(res)?;
    writeln!(res, "    #[derive(Clone, Copy, Debug, Default)]")?;
    writeln!(res, "    pub struct {class_name};")?;
    writeln!(res)?;
    writeln!(res, "    impl {class_name} {{")?;
    writeln!(
        res,
        "        /// Stage, entry point and base defines; add variant defines to select a variant."
    )?;
    writeln!(res, "        pub fn config(&self) -> CompilerConfigBuilder {{")?;
    writeln!(
        res,
        "            CompilerConfig::new(ShaderType::{})",
        descriptor.ty.as_str()
    )?;
    writeln!(
        res,
        "                .entry_point({:?})",
        descriptor.entry_point
    )?;

    for (name, value) in &base_defines {
        writeln!(res, "                .define({name:?}, {value:?})")?;
    }

    writeln!(res, "        }}")?;
    writeln!(res)?;
    writeln!(res, "        pub fn get_variant(")?;
    writeln!(res, "            &self,")?;
    writeln!(res, "            variant: &CompilerConfig,")?;
    writeln!(
        res,
        "        ) -> Result<&'static [u32], UnknownVariantError> {{"
    )?;
    writeln!(res, "            match variant.hash() {{")?;

    for hash in descriptor.variants.keys() {
        writeln!(
            res,
            "                {hash} => Ok(&{const_prefix}__{hash}),"
        )?;
    }

    writeln!(
        res,
        "                hash => Err(UnknownVariantError {{ hash }}),"
    )?;
    writeln!(res, "            }}")?;
    writeln!(res, "        }}")?;
    writeln!(res, "    }}")?;
    writeln!(res, "}}")?;

    Ok(res)
}

fn defines_comment(defines: &[String]) -> String {
    if defines.is_empty() {
        "(no defines)".to_owned()
    } else {
        defines.join(", ")
    }
}

fn write_struct(res: &mut String, ty: &StructType) -> Result<()> {
    let struct_name = struct_name(&ty.type_name, RESERVED);

    writeln!(res)?;
    writeln!(res, "        #[derive(Clone, Copy, Debug)]")?;
    writeln!(res, "        #[repr(C)]")?;
    writeln!(res, "        pub struct {struct_name} {{")?;

    for member in &ty.members {
        writeln!(
            res,
            "            pub {}: {},",
            field_name(&member.name),
            type_name(&member.ty, &struct_name, &member.name)
        )?;
    }

    writeln!(res, "        }}")?;

    Ok(())
}

fn field_name(name: &str) -> String {
    match name {
        "" => "unknown".to_owned(),
        "crate" | "self" | "Self" | "super" => format!("{name}_"),
        name if KEYWORDS.contains(&name) => format!("r#{name}"),
        name => name.to_owned(),
    }
}

fn scalar_name(ty: ScalarType) -> &'static str {
    match ty {
        // GLSL booleans occupy 32 bits in interface blocks
        ScalarType::Bool => "u32",
        ScalarType::Int {
            width: 8,
            signed: true,
        } => "i8",
        ScalarType::Int {
            width: 8,
            signed: false,
        } => "u8",
        ScalarType::Int {
            width: 16,
            signed: true,
        } => "i16",
        ScalarType::Int {
            width: 16,
            signed: false,
        } => "u16",
        ScalarType::Int {
            width: 64,
            signed: true,
        } => "i64",
        ScalarType::Int {
            width: 64,
            signed: false,
        } => "u64",
        ScalarType::Int { signed: true, .. } => "i32",
        ScalarType::Int { signed: false, .. } => "u32",
        ScalarType::Float { width: 16 } => "u16",
        ScalarType::Float { width: 64 } => "f64",
        ScalarType::Float { .. } => "f32",
    }
}

fn type_name(ty: &DataType, struct_name: &str, member_name: &str) -> String {
    match ty {
        DataType::Scalar(scalar) => scalar_name(*scalar).to_owned(),
        DataType::Vector { scalar, components } => {
            format!("[{}; {components}]", scalar_name(*scalar))
        }
        DataType::Matrix {
            scalar,
            rows,
            columns,
        } => format!("[[{}; {columns}]; {rows}]", scalar_name(*scalar)),
        DataType::Array { element, count } => format!(
            "[{}; {}]",
            type_name(element, struct_name, member_name),
            count.unwrap_or_default()
        ),
        DataType::Struct(ty) => super::struct_name(&ty.type_name, RESERVED),
        DataType::Unknown => {
            warn!("Unsupported type of member {struct_name}::{member_name}");

            "UnknownType".to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            resource::{ResourceKind, ShaderResource, ShaderResources, StructMember},
            variant::ShaderVariant,
        },
    };

    fn descriptor() -> ShaderDescriptor {
        let mut descriptor = ShaderDescriptor::from_json(
            r#"{
                "name": "basic_fragment",
                "language": "glsl",
                "path": "basic.frag",
                "entry_point": "main",
                "type": "Fragment"
            }"#,
        )
        .unwrap();

        for (hash, defines) in [(7u64, vec![]), (3, vec!["USE_TEXTURE=1".to_owned()])] {
            descriptor.variants.insert(
                hash,
                ShaderVariant {
                    hash,
                    defines,
                    resources: Default::default(),
                    spirv: vec![0x0723_0203, hash as u32],
                },
            );
        }

        let light = StructType {
            type_name: "light".to_owned(),
            members: vec![
                StructMember {
                    name: "color".to_owned(),
                    offset: Some(0),
                    ty: DataType::Vector {
                        scalar: ScalarType::Float { width: 32 },
                        components: 4,
                    },
                },
                StructMember {
                    name: "type".to_owned(),
                    offset: Some(16),
                    ty: DataType::Unknown,
                },
            ],
        };
        let material = StructType {
            type_name: "Material".to_owned(),
            members: vec![
                StructMember {
                    name: "transform".to_owned(),
                    offset: Some(0),
                    ty: DataType::Matrix {
                        scalar: ScalarType::Float { width: 32 },
                        rows: 4,
                        columns: 3,
                    },
                },
                StructMember {
                    name: "lights".to_owned(),
                    offset: Some(48),
                    ty: DataType::Array {
                        element: Box::new(DataType::Struct(light)),
                        count: Some(2),
                    },
                },
            ],
        };

        descriptor.resources = ShaderResources::new([ShaderResource::new(
            "material",
            ResourceKind::BufferUniform,
            DataType::Struct(material),
        )
        .with_binding(0, 0)]);

        descriptor
    }

    #[test]
    fn variant_arrays_in_hash_order() {
        let res = generate(&descriptor()).unwrap();
        let first = res.find("BASIC_FRAGMENT__3:").unwrap();
        let second = res.find("BASIC_FRAGMENT__7:").unwrap();

        assert!(first < second);
        assert!(res.contains("pub const BASIC_FRAGMENT__3_SIZE: usize = 2;"));
        assert!(res.contains("// USE_TEXTURE=1"));
        assert!(res.contains("// (no defines)"));
        assert!(res.contains("0x07230203, 0x00000003,"));
    }

    #[test]
    fn accessor_matches_every_variant() {
        let res = generate(&descriptor()).unwrap();

        assert!(res.contains("pub struct BasicFragment;"));
        assert!(res.contains("3 => Ok(&BASIC_FRAGMENT__3),"));
        assert!(res.contains("7 => Ok(&BASIC_FRAGMENT__7),"));
        assert!(res.contains("hash => Err(UnknownVariantError { hash }),"));
    }

    #[test]
    fn structs_are_declared_dependencies_first() {
        let res = generate(&descriptor()).unwrap();
        let light = res.find("pub struct Light {").unwrap();
        let material = res.find("pub struct Material {").unwrap();

        assert!(light < material);
        assert!(res.contains("pub transform: [[f32; 3]; 4],"));
        assert!(res.contains("pub lights: [Light; 2],"));
        assert!(res.contains("pub color: [f32; 4],"));
        assert!(res.contains("pub r#type: UnknownType,"));
    }

    #[test]
    fn config_carries_base_defines() {
        let mut descriptor = descriptor();
        descriptor.defines = vec!["QUALITY=2".to_owned(), "FAST".to_owned()];

        let res = generate(&descriptor).unwrap();

        assert!(res.contains("pub fn config(&self) -> CompilerConfigBuilder {"));
        assert!(res.contains("CompilerConfig::new(ShaderType::Fragment)"));
        assert!(res.contains(".entry_point(\"main\")"));
        assert!(res.contains(".define(\"FAST\", \"1\")"));
        assert!(res.contains(".define(\"QUALITY\", \"2\")"));
    }

    #[test]
    fn reserved_names_are_avoided() {
        let mut descriptor = descriptor();
        descriptor.name = "type".to_owned();
        descriptor.resources = ShaderResources::new([ShaderResource::new(
            "params",
            ResourceKind::PushConstant,
            DataType::Struct(StructType {
                type_name: "UnknownType".to_owned(),
                members: vec![],
            }),
        )]);

        let res = generate(&descriptor).unwrap();

        assert!(res.contains("pub mod r#type {"));
        assert!(res.contains("pub struct UnknownType_ {"));
        assert!(res.contains("pub struct Type;"));
    }

    #[test]
    fn field_names() {
        assert_eq!(field_name("color"), "color");
        assert_eq!(field_name("match"), "r#match");
        assert_eq!(field_name("self"), "self_");
        assert_eq!(field_name(""), "unknown");
    }

    #[test]
    fn scalar_names() {
        assert_eq!(scalar_name(ScalarType::Bool), "u32");
        assert_eq!(
            scalar_name(ScalarType::Int {
                width: 32,
                signed: true
            }),
            "i32"
        );
        assert_eq!(scalar_name(ScalarType::Float { width: 64 }), "f64");
    }
}
