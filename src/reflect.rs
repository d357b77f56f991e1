use {
    crate::resource::{
        DataType, Qualifiers, ResourceKind, ScalarType, ShaderResource, ShaderResources,
        StructMember, StructType,
    },
    log::{error, trace, warn},
    spirq::{
        ty::{AccessType, DescriptorType, ScalarType as SpirqScalarType, Type},
        var::Variable,
        ReflectConfig,
    },
};

/// Extracts the resource interface of one entry point from compiled SPIR-V.
pub trait ShaderReflector: Sync {
    /// Returns the resources, or a diagnostic describing why the words could not be reflected.
    fn reflect(&self, spirv: &[u32], entry_point: &str) -> Result<ShaderResources, String>;
}

/// Reflects SPIR-V using `spirq`.
///
/// Resources are reported whether or not the entry point statically uses them.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpirqReflector;

impl ShaderReflector for SpirqReflector {
    fn reflect(&self, spirv: &[u32], entry_point: &str) -> Result<ShaderResources, String> {
        let entry_points = ReflectConfig::new()
            .spv(spirv)
            .ref_all_rscs(true)
            .reflect()
            .map_err(|err| {
                error!("Unable to reflect spirv");

                format!("{err:?}")
            })?;
        let entry_point = entry_points
            .into_iter()
            .find(|candidate| candidate.name == entry_point)
            .ok_or_else(|| {
                error!("Entry point not found");

                format!("entry point `{entry_point}` not found")
            })?;

        Ok(entry_point.vars.iter().filter_map(resource).collect())
    }
}

fn resource(var: &Variable) -> Option<ShaderResource> {
    let res = match var {
        Variable::Input { name, location, ty } => {
            let mut res = ShaderResource::new(
                name.clone().unwrap_or_default(),
                ResourceKind::Input,
                data_type(ty, "Input"),
            );
            res.location = Some(location.loc());
            res
        }
        Variable::Output { name, location, ty } => {
            let mut res = ShaderResource::new(
                name.clone().unwrap_or_default(),
                ResourceKind::Output,
                data_type(ty, "Output"),
            );
            res.location = Some(location.loc());
            res
        }
        Variable::Descriptor {
            name,
            desc_bind,
            desc_ty,
            ty,
            nbind,
        } => {
            let name = name.clone().unwrap_or_default();
            let (kind, access) = descriptor_kind(desc_ty);
            let mut res = ShaderResource::new(name.as_str(), kind, data_type(ty, &name))
                .with_binding(desc_bind.set(), desc_bind.bind());

            res.qualifiers = access.map(qualifiers).unwrap_or(Qualifiers::empty());
            res.array_size = (*nbind != 1).then_some(*nbind);
            res.size = size_of(ty);

            if let DescriptorType::InputAttachment(index) = desc_ty {
                res.input_attachment_index = Some(*index);
            }

            res
        }
        Variable::PushConstant { name, ty } => {
            let name = name.clone().unwrap_or_default();
            let mut res = ShaderResource::new(
                name.as_str(),
                ResourceKind::PushConstant,
                data_type(ty, &name),
            );

            res.offset = match ty {
                Type::Struct(ty) => ty
                    .members
                    .iter()
                    .filter_map(|member| member.offset)
                    .min()
                    .map(|offset| offset as u32),
                _ => None,
            };
            res.size = size_of(ty);
            res
        }
        Variable::SpecConstant { name, spec_id, ty } => {
            let name = name.clone().unwrap_or_default();
            let mut res = ShaderResource::new(
                name.as_str(),
                ResourceKind::SpecializationConstant,
                data_type(ty, &name),
            );
            res.constant_id = Some(*spec_id);
            res.size = size_of(ty);
            res
        }
        #[allow(unreachable_patterns)]
        _ => return None,
    };

    trace!(
        "Resource {} {:?} ({:?}.{:?})",
        res.name,
        res.kind,
        res.set,
        res.binding
    );

    Some(res)
}

fn descriptor_kind(desc_ty: &DescriptorType) -> (ResourceKind, Option<&AccessType>) {
    match desc_ty {
        DescriptorType::AccelStruct() => (ResourceKind::AccelerationStructure, None),
        DescriptorType::CombinedImageSampler() => (ResourceKind::ImageSampler, None),
        DescriptorType::InputAttachment(_) => (ResourceKind::InputAttachment, None),
        DescriptorType::SampledImage() => (ResourceKind::Image, None),
        DescriptorType::Sampler() => (ResourceKind::Sampler, None),
        DescriptorType::StorageBuffer(access) => (ResourceKind::BufferStorage, Some(access)),
        DescriptorType::StorageImage(access) => (ResourceKind::ImageStorage, Some(access)),
        DescriptorType::StorageTexelBuffer(access) => {
            (ResourceKind::StorageTexelBuffer, Some(access))
        }
        DescriptorType::UniformBuffer() => (ResourceKind::BufferUniform, None),
        DescriptorType::UniformTexelBuffer() => (ResourceKind::UniformTexelBuffer, None),
    }
}

fn qualifiers(access: &AccessType) -> Qualifiers {
    match access {
        AccessType::ReadOnly => Qualifiers::NON_WRITABLE,
        AccessType::WriteOnly => Qualifiers::NON_READABLE,
        AccessType::ReadWrite => Qualifiers::empty(),
    }
}

fn size_of(ty: &Type) -> Option<u32> {
    ty.nbyte().map(|size| size as u32)
}

fn scalar_type(ty: &SpirqScalarType) -> Option<ScalarType> {
    Some(match ty {
        SpirqScalarType::Boolean => ScalarType::Bool,
        SpirqScalarType::Integer { bits, is_signed } => ScalarType::Int {
            width: *bits,
            signed: *is_signed,
        },
        SpirqScalarType::Float { bits } => ScalarType::Float { width: *bits },
        _ => return None,
    })
}

/// Converts a reflected type; `fallback_name` names anonymous structs.
fn data_type(ty: &Type, fallback_name: &str) -> DataType {
    match ty {
        Type::Scalar(scalar) => scalar_type(scalar)
            .map(DataType::Scalar)
            .unwrap_or(DataType::Unknown),
        Type::Vector(vector) => scalar_type(&vector.scalar_ty)
            .map(|scalar| DataType::Vector {
                scalar,
                components: vector.nscalar,
            })
            .unwrap_or(DataType::Unknown),
        Type::Matrix(matrix) => scalar_type(&matrix.vector_ty.scalar_ty)
            .map(|scalar| DataType::Matrix {
                scalar,
                rows: matrix.vector_ty.nscalar,
                columns: matrix.nvector,
            })
            .unwrap_or(DataType::Unknown),
        Type::Array(array) => DataType::Array {
            element: Box::new(data_type(&array.element_ty, fallback_name)),
            count: array.nelement,
        },
        Type::Struct(ty) => {
            let type_name = ty.name.clone().unwrap_or_else(|| {
                warn!("Anonymous struct named after `{fallback_name}`");

                fallback_name.to_owned()
            });
            let members = ty
                .members
                .iter()
                .enumerate()
                .map(|(idx, member)| {
                    let name = member.name.clone().unwrap_or_else(|| format!("member{idx}"));
                    let ty = data_type(&member.ty, &name);

                    StructMember {
                        name,
                        offset: member.offset.map(|offset| offset as u32),
                        ty,
                    }
                })
                .collect();

            DataType::Struct(StructType { type_name, members })
        }
        _ => DataType::Unknown,
    }
}
