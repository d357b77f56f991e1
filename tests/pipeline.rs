use {
    shader_variants::{
        codegen::{generate, HeaderLanguage},
        compiler::{ShaderCompiler, ShaderSource},
        define::combinations,
        prelude::*,
        reflect::ShaderReflector,
        resource::{ScalarType, StructMember, StructType},
        run,
    },
    std::path::Path,
};

/// Encodes the stage and defines of a compile as words.
struct Mock;

impl ShaderCompiler for Mock {
    fn compile(
        &self,
        source: &ShaderSource,
        config: &CompilerConfig,
    ) -> std::result::Result<Vec<u32>, String> {
        if source.text.contains("syntax error") {
            return Err(format!("{}:1: error: syntax error", source.file_name));
        }

        let mut words = vec![0x0723_0203];
        words.extend(
            config
                .define_strings()
                .join(";")
                .bytes()
                .map(u32::from),
        );

        Ok(words)
    }
}

/// Reports a material buffer, plus a texture when the words say `USE_TEXTURE` was defined.
struct MockReflector;

impl ShaderReflector for MockReflector {
    fn reflect(&self, spirv: &[u32], _: &str) -> std::result::Result<ShaderResources, String> {
        let defines = spirv[1..]
            .iter()
            .map(|&word| word as u8 as char)
            .collect::<String>();
        let light = StructType {
            type_name: "Light".to_owned(),
            members: vec![StructMember {
                name: "color".to_owned(),
                offset: Some(0),
                ty: DataType::Vector {
                    scalar: ScalarType::Float { width: 32 },
                    components: 4,
                },
            }],
        };
        let material = StructType {
            type_name: "Material".to_owned(),
            members: vec![StructMember {
                name: "light".to_owned(),
                offset: Some(0),
                ty: DataType::Struct(light),
            }],
        };
        let mut resources = vec![ShaderResource::new(
            "material",
            ResourceKind::BufferUniform,
            DataType::Struct(material),
        )
        .with_binding(0, 0)];

        if defines.contains("USE_TEXTURE=1") {
            resources.push(
                ShaderResource::new("tex", ResourceKind::ImageSampler, DataType::Unknown)
                    .with_binding(0, 1),
            );
        }

        Ok(ShaderResources::new(resources))
    }
}

const SCHEMA: &str = r#"{
    "name": "basic_fragment",
    "language": "glsl",
    "path": "basic.frag",
    "entry_point": "main",
    "type": "Fragment",
    "include_folders": ["include"],
    "defines": ["QUALITY=1"],
    "variant_defines": ["USE_TEXTURE", "QUALITY=2"]
}"#;

fn pipeline() -> Pipeline {
    Pipeline::with_collaborators(PipelineInfo::new().jobs(4), Mock, MockReflector).unwrap()
}

fn file_system(source: &str) -> MemoryFileSystem {
    MemoryFileSystem::new()
        .with_file("shaders/basic.json", SCHEMA)
        .with_file("shaders/basic.frag", source)
        .with_file("shaders/include/common.glsl", "// common")
}

#[test]
fn compiles_every_variant() {
    let fs = file_system("#include \"common.glsl\"\nvoid main() {}");
    let descriptor = run(
        &fs,
        &pipeline(),
        Path::new("shaders/basic.json"),
        Path::new("out/basic.hpp"),
        HeaderLanguage::Cpp,
    )
    .unwrap();

    assert_eq!(descriptor.variants.len(), 4);

    for subset in combinations(&descriptor.variant_defines).unwrap() {
        let config = descriptor.config(&subset).unwrap();
        let variant = descriptor.variant(&config).unwrap();

        assert_eq!(variant.hash, config.hash());
        assert_eq!(variant.defines, config.define_strings());
    }

    // Base QUALITY=1 is overridden by the variant define
    let config = descriptor.config(&["QUALITY=2"]).unwrap();

    assert_eq!(config.define_strings(), ["QUALITY=2"]);
}

#[test]
fn resources_are_merged() {
    let fs = file_system("void main() {}");
    let descriptor = run(
        &fs,
        &pipeline(),
        Path::new("shaders/basic.json"),
        Path::new("out/basic.rs"),
        HeaderLanguage::Rust,
    )
    .unwrap();

    assert_eq!(descriptor.resources.len(), 2);
    assert_eq!(
        descriptor.resources.get("tex").unwrap().kind,
        ResourceKind::ImageSampler
    );

    let structs = descriptor
        .resources
        .structs_in_topological_order()
        .unwrap()
        .into_iter()
        .map(|ty| ty.type_name.as_str())
        .collect::<Vec<_>>();

    assert_eq!(structs, ["Light", "Material"]);
}

#[test]
fn writes_header() {
    let fs = file_system("void main() {}");
    let descriptor = run(
        &fs,
        &pipeline(),
        Path::new("shaders/basic.json"),
        Path::new("out/basic.hpp"),
        HeaderLanguage::Cpp,
    )
    .unwrap();
    let header = String::from_utf8(fs.get("out/basic.hpp").unwrap()).unwrap();

    assert!(header.contains("class BasicFragment"));
    assert_eq!(header.matches("\t\t\tcase ").count(), 4);

    for hash in descriptor.variants.keys() {
        assert!(header.contains(&format!("constexpr uint32_t BasicFragment__{hash}[]")));
    }

    assert!(header.find("struct Light").unwrap() < header.find("struct Material").unwrap());
}

#[test]
fn generated_rust_matches_variants() {
    let fs = file_system("void main() {}");
    let mut descriptor = ShaderDescriptor::read(&fs, Path::new("shaders/basic.json")).unwrap();

    pipeline()
        .compile_and_reflect_shader(&mut descriptor, &fs)
        .unwrap();

    let source = generate(&descriptor, HeaderLanguage::Rust).unwrap();

    for (hash, variant) in &descriptor.variants {
        assert!(source.contains(&format!(
            "pub const BASIC_FRAGMENT__{hash}: [u32; {}]",
            variant.spirv.len()
        )));
        assert!(source.contains(&format!("{hash} => Ok(&BASIC_FRAGMENT__{hash}),")));
    }
}

#[test]
fn cache_round_trip() {
    let fs = file_system("void main() {}");
    let mut descriptor = ShaderDescriptor::read(&fs, Path::new("shaders/basic.json")).unwrap();

    pipeline()
        .compile_and_reflect_shader(&mut descriptor, &fs)
        .unwrap();

    let cache = ShaderCache::offline();

    for (&hash, variant) in &descriptor.variants {
        cache.register(&descriptor.name, hash, variant.spirv.clone());
    }

    for subset in combinations(&descriptor.variant_defines).unwrap() {
        let config = descriptor.config(&subset).unwrap();

        assert_eq!(
            &*cache.load(&descriptor.name, &config).unwrap(),
            descriptor.variant(&config).unwrap().spirv.as_slice()
        );
    }

    let unused = CompilerConfig::new(ShaderType::Fragment)
        .define("UNUSED", "1")
        .build();

    assert!(matches!(
        cache.load(&descriptor.name, &unused),
        Err(Error::UnknownVariant(_))
    ));
}

#[test]
fn compile_failure_writes_nothing() {
    let fs = file_system("syntax error");
    let res = run(
        &fs,
        &pipeline(),
        Path::new("shaders/basic.json"),
        Path::new("out/basic.hpp"),
        HeaderLanguage::Cpp,
    );

    assert!(matches!(res, Err(Error::Compile { .. })));
    assert!(fs.get("out/basic.hpp").is_none());
}

#[test]
fn missing_include_fails() {
    let fs = file_system("#include \"missing.glsl\"\nvoid main() {}");
    let res = run(
        &fs,
        &pipeline(),
        Path::new("shaders/basic.json"),
        Path::new("out/basic.hpp"),
        HeaderLanguage::Cpp,
    );

    match res {
        Err(Error::IncludeResolution { name }) => assert_eq!(name, "missing.glsl"),
        other => panic!("{other:?}"),
    }
}

#[test]
fn unknown_type_fails() {
    let fs = MemoryFileSystem::new().with_file(
        "shader.json",
        SCHEMA.replace("Fragment", "Pixel"),
    );
    let res = run(
        &fs,
        &pipeline(),
        Path::new("shader.json"),
        Path::new("out.hpp"),
        HeaderLanguage::Cpp,
    );

    assert!(matches!(res, Err(Error::UnknownShaderType(ty)) if ty == "Pixel"));
}

#[test]
fn missing_schema_fails() {
    let res = run(
        &MemoryFileSystem::new(),
        &pipeline(),
        Path::new("shader.json"),
        Path::new("out.hpp"),
        HeaderLanguage::Cpp,
    );

    assert!(matches!(res, Err(Error::Io { .. })));
}

/// Compiles a real shader with `shaderc` and reflects it with `spirq`.
#[test]
fn end_to_end() {
    let _ = pretty_env_logger::try_init();

    let fs = MemoryFileSystem::new()
        .with_file(
            "basic.json",
            r#"{
                "name": "basic_fragment",
                "language": "glsl",
                "path": "basic.frag",
                "entry_point": "main",
                "type": "Fragment",
                "variant_defines": ["USE_TEXTURE"]
            }"#,
        )
        .with_file(
            "basic.frag",
            r#"#version 450

layout(set = 0, binding = 0) uniform Material {
    vec4 albedo;
} material;

#ifdef USE_TEXTURE
layout(set = 0, binding = 1) uniform sampler2D tex;
#endif

layout(location = 0) out vec4 color;

void main() {
    color = material.albedo;
#ifdef USE_TEXTURE
    color *= texture(tex, vec2(0.5));
#endif
}
"#,
        );
    let pipeline = Pipeline::new(PipelineInfo::new().jobs(2)).unwrap();
    let descriptor = run(
        &fs,
        &pipeline,
        Path::new("basic.json"),
        Path::new("basic.hpp"),
        HeaderLanguage::Cpp,
    )
    .unwrap();

    assert_eq!(descriptor.variants.len(), 2);

    let plain = descriptor.config::<&str>(&[]).unwrap();
    let textured = descriptor.config(&["USE_TEXTURE"]).unwrap();

    assert_ne!(plain.hash(), textured.hash());
    assert_eq!(descriptor.variant(&textured).unwrap().defines, ["USE_TEXTURE=1"]);

    for variant in descriptor.variants.values() {
        assert!(!variant.spirv.is_empty());
        assert_eq!(variant.spirv[0], 0x0723_0203);
    }

    let material = descriptor.resources.get("material").unwrap();

    assert_eq!(material.kind, ResourceKind::BufferUniform);
    assert_eq!((material.set, material.binding), (Some(0), Some(0)));

    let tex = descriptor.resources.get("tex").unwrap();

    assert_eq!(tex.kind, ResourceKind::ImageSampler);
    assert_eq!(tex.binding, Some(1));
    assert!(descriptor
        .variant(&plain)
        .unwrap()
        .resources
        .get("tex")
        .is_none());

    let header = String::from_utf8(fs.get("basic.hpp").unwrap()).unwrap();

    assert_eq!(header.matches("constexpr uint32_t BasicFragment__").count(), 2);
    assert_eq!(header.matches("\t\t\tcase ").count(), 2);
    assert!(header.contains("get_variant"));
    assert!(header.contains("struct Material"));
}
