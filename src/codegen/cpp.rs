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

/// 64-bit FNV-1a parameters, matching [`CompilerConfig::hash`](crate::CompilerConfig::hash).
const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

pub(super) fn generate(descriptor: &ShaderDescriptor) -> Result<String> {
    let class_name = snake_to_pascal(&descriptor.name);
    let reserved = [class_name.as_str(), "CompilerConfig", "UnknownType"];
    let base_defines = resolve_defines(&descriptor.defines, &[])?;
    let mut res = String::new();

    writeln!(res, "#pragma once")?;
    writeln!(res)?;
    writeln!(res, "/* DO NOT EDIT */")?;
    writeln!(res, "/* This file was generated by the shader compiler */")?;
    writeln!(res)?;
    writeln!(res, "#include <array>")?;
    writeln!(res, "#include <cstddef>")?;
    writeln!(res, "#include <cstdint>")?;
    writeln!(res, "#include <map>")?;
    writeln!(res, "#include <stdexcept>")?;
    writeln!(res, "#include <string>")?;
    writeln!(res, "#include <vector>")?;
    writeln!(res)?;
    writeln!(res, "namespace shaders")?;
    writeln!(res, "{{")?;
    writeln!(res)?;
    write_compiler_config(&mut res)?;
    writeln!(res)?;
    writeln!(res, "// clang-format off")?;

    for (hash, variant) in &descriptor.variants {
        let symbol = format!("{class_name}__{hash}");

        writeln!(
            res,
            "\t// {}",
            if variant.defines.is_empty() {
                "(no defines)".to_owned()
            } else {
                variant.defines.join(", ")
            }
        )?;
        writeln!(res, "\tconstexpr uint32_t {symbol}[] = {{")?;

        for line in word_lines(&variant.spirv) {
            writeln!(res, "\t\t{line}")?;
        }

        writeln!(res, "\t}};")?;
        writeln!(
            res,
            "\tconstexpr size_t {symbol}_size = {};",
            variant.spirv.len()
        )?;
        writeln!(res)?;
    }

    writeln!(res, "// clang-format on")?;
    writeln!(res)?;
    writeln!(res, "class {class_name}")?;
    writeln!(res, "{{")?;
    writeln!(res, "  public:")?;
    writeln!(
        res,
        "\tusing UnknownType = uint32_t;        // used to represent poorly reflected types"
    )?;

    for ty in descriptor.resources.structs_in_topological_order()? {
        write_struct(&mut res, ty, &reserved)?;
    }

    writeln!(res)?;
    writeln!(
        res,
        "\t// Stage, entry point and base defines of this shader; add variant defines to select one"
    )?;
    writeln!(res, "\tstatic CompilerConfig config()")?;
    writeln!(res, "\t{{")?;
    writeln!(res, "\t\tCompilerConfig res;")?;
    writeln!(
        res,
        "\t\tres.stage = {};",
        string_literal(descriptor.ty.as_str())
    )?;
    writeln!(
        res,
        "\t\tres.entry_point = {};",
        string_literal(&descriptor.entry_point)
    )?;

    for (name, value) in &base_defines {
        writeln!(
            res,
            "\t\tres.defines[{}] = {};",
            string_literal(name),
            string_literal(value)
        )?;
    }

    writeln!(res, "\t\treturn res;")?;
    writeln!(res, "\t}}")?;
    writeln!(res)?;
    writeln!(
        res,
        "\tstd::vector<uint32_t> get_variant(const CompilerConfig &variant) const"
    )?;
    writeln!(res, "\t{{")?;
    writeln!(res, "\t\tswitch (variant.hash())")?;
    writeln!(res, "\t\t{{")?;

    for hash in descriptor.variants.keys() {
        let symbol = format!("{class_name}__{hash}");

        writeln!(res, "\t\t\tcase {hash}ull:")?;
        writeln!(
            res,
            "\t\t\t\treturn std::vector<uint32_t>({symbol}, {symbol} + {symbol}_size);"
        )?;
    }

    writeln!(res, "\t\t\tdefault:")?;
    writeln!(
        res,
        "\t\t\t\tthrow std::runtime_error(\"Invalid shader variant\");"
    )?;
    writeln!(res, "\t\t}}")?;
    writeln!(res, "\t}}")?;
    writeln!(res, "}};")?;
    writeln!(res)?;
    writeln!(res, "}}        // namespace shaders")?;

    Ok(res)
}

/// Declares the variant selector shared by every generated header.
fn write_compiler_config(res: &mut String) -> Result<()> {
    writeln!(res, "#ifndef SHADERS_COMPILER_CONFIG")?;
    writeln!(res, "#define SHADERS_COMPILER_CONFIG")?;
    writeln!(res)?;
    writeln!(res, "struct CompilerConfig")?;
    writeln!(res, "{{")?;
    writeln!(res, "\tstd::string                        stage;")?;
    writeln!(res, "\tstd::map<std::string, std::string> defines;")?;
    writeln!(res, "\tstd::string                        entry_point = \"main\";")?;
    writeln!(res)?;
    writeln!(res, "\t// 64-bit FNV-1a of the stage, the sorted defines and the entry point")?;
    writeln!(res, "\tuint64_t hash() const")?;
    writeln!(res, "\t{{")?;
    writeln!(res, "\t\tuint64_t res   = 0x{FNV_OFFSET_BASIS:016x}ull;")?;
    writeln!(res, "\t\tauto     write = [&res](const std::string &bytes) {{")?;
    writeln!(res, "\t\t\tfor (unsigned char byte : bytes)")?;
    writeln!(res, "\t\t\t{{")?;
    writeln!(res, "\t\t\t\tres = (res ^ byte) * 0x{FNV_PRIME:016x}ull;")?;
    writeln!(res, "\t\t\t}}")?;
    writeln!(res, "\t\t}};")?;
    writeln!(res, "\t\tconst std::string nul(1, '\\0');")?;
    writeln!(res)?;
    writeln!(res, "\t\twrite(stage);")?;
    writeln!(res, "\t\twrite(nul);")?;
    writeln!(res, "\t\tfor (const auto &define : defines)")?;
    writeln!(res, "\t\t{{")?;
    writeln!(res, "\t\t\twrite(define.first);")?;
    writeln!(res, "\t\t\twrite(\"=\");")?;
    writeln!(res, "\t\t\twrite(define.second);")?;
    writeln!(res, "\t\t\twrite(nul);")?;
    writeln!(res, "\t\t}}")?;
    writeln!(res, "\t\twrite(nul);")?;
    writeln!(res, "\t\twrite(entry_point);")?;
    writeln!(res)?;
    writeln!(res, "\t\treturn res;")?;
    writeln!(res, "\t}}")?;
    writeln!(res, "}};")?;
    writeln!(res)?;
    writeln!(res, "#endif")?;

    Ok(())
}

/// Quotes `s` as a C++ string literal.
fn string_literal(s: &str) -> String {
    let mut res = String::with_capacity(s.len() + 2);
    res.push('"');

    for c in s.chars() {
        match c {
            '"' | '\\' => {
                res.push('\\');
                res.push(c);
            }
            '\n' => res.push_str("\\n"),
            c => res.push(c),
        }
    }

    res.push('"');
    res
}

fn write_struct(res: &mut String, ty: &StructType, reserved: &[&str]) -> Result<()> {
    let struct_name = struct_name(&ty.type_name, reserved);

    writeln!(res)?;
    writeln!(res, "\tstruct {struct_name}")?;
    writeln!(res, "\t{{")?;

    for member in &ty.members {
        let name = if member.name.is_empty() {
            "unknown"
        } else {
            &member.name
        };

        writeln!(
            res,
            "\t\t{} {name};",
            type_name(&member.ty, &struct_name, name, reserved)
        )?;
    }

    writeln!(res, "\t}};")?;

    Ok(())
}

fn scalar_name(ty: ScalarType) -> &'static str {
    match ty {
        ScalarType::Bool => "bool",
        ScalarType::Int {
            width: 8,
            signed: true,
        } => "int8_t",
        ScalarType::Int {
            width: 8,
            signed: false,
        } => "uint8_t",
        ScalarType::Int {
            width: 16,
            signed: true,
        } => "int16_t",
        ScalarType::Int {
            width: 16,
            signed: false,
        } => "uint16_t",
        ScalarType::Int {
            width: 64,
            signed: true,
        } => "int64_t",
        ScalarType::Int {
            width: 64,
            signed: false,
        } => "uint64_t",
        ScalarType::Int { signed: true, .. } => "int32_t",
        ScalarType::Int { signed: false, .. } => "uint32_t",
        ScalarType::Float { width: 16 } => "uint16_t",
        ScalarType::Float { width: 64 } => "double",
        ScalarType::Float { .. } => "float",
    }
}

fn type_name(ty: &DataType, struct_name: &str, member_name: &str, reserved: &[&str]) -> String {
    match ty {
        DataType::Scalar(scalar) => scalar_name(*scalar).to_owned(),
        DataType::Vector { scalar, components } => {
            format!("std::array<{}, {components}>", scalar_name(*scalar))
        }
        DataType::Matrix {
            scalar,
            rows,
            columns,
        } => format!(
            "std::array<std::array<{}, {columns}>, {rows}>",
            scalar_name(*scalar)
        ),
        DataType::Array { element, count } => format!(
            "std::array<{}, {}>",
            type_name(element, struct_name, member_name, reserved),
            count.unwrap_or_default()
        ),
        DataType::Struct(ty) => super::struct_name(&ty.type_name, reserved),
        DataType::Unknown => {
            warn!("Unsupported type of member {struct_name}::{member_name}");

            "UnknownType".to_owned()
        }
    }
}
