//! The reflected interface of a shader: bindings, push constants, specialization constants and
//! stage inputs/outputs, along with the data types they carry.

use {
    crate::error::{Error, Result},
    bitflags::bitflags,
    log::warn,
    std::collections::{btree_map::Entry, BTreeMap},
};

/// A numeric or boolean value.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ScalarType {
    Bool,
    Int { width: u32, signed: bool },
    Float { width: u32 },
}

/// The shape of a reflected value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataType {
    Scalar(ScalarType),
    Vector {
        scalar: ScalarType,
        components: u32,
    },
    Matrix {
        scalar: ScalarType,
        rows: u32,
        columns: u32,
    },

    /// `count` is `None` for runtime-sized arrays.
    Array {
        element: Box<DataType>,
        count: Option<u32>,
    },
    Struct(StructType),

    /// Reflection could not classify this type (images, pointers and so on).
    Unknown,
}

impl DataType {
    pub fn as_struct(&self) -> Option<&StructType> {
        match self {
            Self::Struct(ty) => Some(ty),
            _ => None,
        }
    }

    /// Type names of structs this type refers to directly, looking through arrays.
    fn struct_dependencies<'a>(&'a self, deps: &mut Vec<&'a str>) {
        match self {
            Self::Struct(ty) => deps.push(&ty.type_name),
            Self::Array { element, .. } => element.struct_dependencies(deps),
            _ => (),
        }
    }

    fn collect_structs<'a>(&'a self, structs: &mut BTreeMap<&'a str, &'a StructType>) {
        match self {
            Self::Struct(ty) => {
                match structs.entry(&ty.type_name) {
                    Entry::Occupied(mut existing) => {
                        if *existing.get() != ty {
                            warn!("Conflicting layouts for struct {}", ty.type_name);
                        }

                        existing.insert(ty);
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(ty);
                    }
                }

                for member in &ty.members {
                    member.ty.collect_structs(structs);
                }
            }
            Self::Array { element, .. } => element.collect_structs(structs),
            _ => (),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StructType {
    pub type_name: String,
    pub members: Vec<StructMember>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StructMember {
    pub name: String,

    /// Byte offset within the parent struct, when the struct has an explicit layout.
    pub offset: Option<u32>,
    pub ty: DataType,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ResourceKind {
    Input,
    Output,
    InputAttachment,
    Image,
    ImageSampler,
    ImageStorage,
    Sampler,
    BufferUniform,
    BufferStorage,
    UniformTexelBuffer,
    StorageTexelBuffer,
    AccelerationStructure,
    PushConstant,
    SpecializationConstant,
}

bitflags! {
    /// Access qualifiers of storage resources.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct Qualifiers: u32 {
        const NON_READABLE = 1;
        const NON_WRITABLE = 2;
    }
}

/// One reflected interface element.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ShaderResource {
    pub name: String,
    pub kind: ResourceKind,
    pub qualifiers: Qualifiers,
    pub ty: DataType,
    pub set: Option<u32>,
    pub binding: Option<u32>,
    pub location: Option<u32>,
    pub input_attachment_index: Option<u32>,
    pub array_size: Option<u32>,
    pub offset: Option<u32>,
    pub size: Option<u32>,
    pub constant_id: Option<u32>,
}

/// Set, binding, the kind and location of unbound resources, and name.
pub type ResourceKey<'a> = (
    Option<u32>,
    Option<u32>,
    Option<(ResourceKind, Option<u32>)>,
    &'a str,
);

impl ShaderResource {
    pub fn new(name: impl Into<String>, kind: ResourceKind, ty: DataType) -> Self {
        Self {
            name: name.into(),
            kind,
            qualifiers: Qualifiers::empty(),
            ty,
            set: None,
            binding: None,
            location: None,
            input_attachment_index: None,
            array_size: None,
            offset: None,
            size: None,
            constant_id: None,
        }
    }

    pub fn with_binding(mut self, set: u32, binding: u32) -> Self {
        self.set = Some(set);
        self.binding = Some(binding);
        self
    }

    /// Resources with equal keys describe the same interface element in different variants.
    ///
    /// Stage inputs and outputs have no set or binding; their kind and location identify them.
    pub fn key(&self) -> ResourceKey<'_> {
        let unbound = (self.set.is_none() && self.binding.is_none())
            .then_some((self.kind, self.location));

        (self.set, self.binding, unbound, &self.name)
    }
}

/// A set of resources, unique by [`ShaderResource::key`], in first-seen order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ShaderResources {
    resources: Vec<ShaderResource>,
}

impl ShaderResources {
    pub fn new(resources: impl IntoIterator<Item = ShaderResource>) -> Self {
        let mut res = Self::default();
        res.merge(Self {
            resources: resources.into_iter().collect(),
        });

        res
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShaderResource> {
        self.resources.iter()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn get(&self, name: &str) -> Option<&ShaderResource> {
        self.resources.iter().find(|resource| resource.name == name)
    }

    /// Returns the union of `lhs` and `rhs`.
    pub fn merged(lhs: &Self, rhs: Self) -> Self {
        let mut res = lhs.clone();
        res.merge(rhs);
        res
    }

    /// Adds every resource of `other`; a resource with the same key as an existing one replaces
    /// it in place.
    pub fn merge(&mut self, other: Self) {
        for resource in other.resources {
            match self
                .resources
                .iter_mut()
                .find(|existing| existing.key() == resource.key())
            {
                Some(existing) => {
                    if *existing != resource {
                        warn!(
                            "Resource {} ({:?}.{:?}) differs between variants, using the later one",
                            resource.name, resource.set, resource.binding
                        );
                    }

                    *existing = resource;
                }
                None => self.resources.push(resource),
            }
        }
    }

    /// Every distinct struct type reachable from these resources, keyed by type name.
    pub fn structs(&self) -> BTreeMap<&str, &StructType> {
        let mut structs = BTreeMap::new();

        for resource in &self.resources {
            resource.ty.collect_structs(&mut structs);
        }

        structs
    }

    /// Every distinct struct type, ordered so that each struct follows the structs its members
    /// use.
    pub fn structs_in_topological_order(&self) -> Result<Vec<&StructType>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }

        fn visit<'a>(
            type_name: &'a str,
            structs: &BTreeMap<&'a str, &'a StructType>,
            marks: &mut BTreeMap<&'a str, Mark>,
            res: &mut Vec<&'a StructType>,
        ) -> Result<()> {
            match marks.get(type_name) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::Visiting) => return Err(Error::CyclicStruct(type_name.to_owned())),
                None => (),
            }

            let Some(&ty) = structs.get(type_name) else {
                return Ok(());
            };

            marks.insert(type_name, Mark::Visiting);

            let mut deps = vec![];
            for member in &ty.members {
                member.ty.struct_dependencies(&mut deps);
            }

            for dep in deps {
                visit(dep, structs, marks, res)?;
            }

            marks.insert(type_name, Mark::Done);
            res.push(ty);

            Ok(())
        }

        let structs = self.structs();
        let mut marks = BTreeMap::new();
        let mut res = Vec::with_capacity(structs.len());

        for type_name in structs.keys() {
            visit(type_name, &structs, &mut marks, &mut res)?;
        }

        Ok(res)
    }
}

impl FromIterator<ShaderResource> for ShaderResources {
    fn from_iter<T: IntoIterator<Item = ShaderResource>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a ShaderResources {
    type Item = &'a ShaderResource;
    type IntoIter = std::slice::Iter<'a, ShaderResource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}
