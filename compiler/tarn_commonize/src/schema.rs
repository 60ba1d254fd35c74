//! Serializable metadata schema.
//!
//! The commonizer's output: per dimension index, a list of module
//! structures with ordered fragments keyed by package path. This is the
//! metadata sink; an external writer layer decides the byte format, so
//! everything here just derives serde.

use serde::{Deserialize, Serialize};

/// One module's metadata for one dimension index.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ModuleMetadata {
    pub name: String,
    /// Ordered fragments, one per package (ancestor-complete after
    /// empty-fragment synthesis).
    pub fragments: Vec<FragmentMetadata>,
}

/// One package's slice of a module.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct FragmentMetadata {
    pub package_fq_name: String,
    pub classes: Vec<ClassMetadata>,
    pub package: PackageMetadata,
}

impl FragmentMetadata {
    /// Fragment with no members, synthesized for missing intermediate
    /// packages.
    pub fn empty(package_fq_name: String) -> Self {
        FragmentMetadata {
            package_fq_name,
            classes: Vec::new(),
            package: PackageMetadata::default(),
        }
    }
}

/// Non-class members of a package fragment.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub type_aliases: Vec<TypeAliasMetadata>,
    pub functions: Vec<FunctionMetadata>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ClassMetadata {
    pub name: String,
    pub type_parameters: Vec<TypeParameterMetadata>,
    pub supertypes: Vec<TypeMetadata>,
    /// Set on common-slot declarations, which each target is expected to
    /// actualize.
    pub is_expect: bool,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TypeAliasMetadata {
    pub name: String,
    pub type_parameters: Vec<TypeParameterMetadata>,
    pub underlying: TypeMetadata,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct FunctionMetadata {
    pub name: String,
    pub return_type: TypeMetadata,
    pub receiver_parameter_type: Option<TypeMetadata>,
    pub type_parameters: Vec<TypeParameterMetadata>,
    pub value_parameters: Vec<ValueParameterMetadata>,
    pub annotations: Vec<AnnotationMetadata>,
    pub is_expect: bool,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ValueParameterMetadata {
    pub name: String,
    pub ty: TypeMetadata,
    pub vararg_element_type: Option<TypeMetadata>,
    pub annotations: Vec<AnnotationMetadata>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TypeParameterMetadata {
    pub name: String,
    pub variance: VarianceMetadata,
    pub upper_bounds: Vec<TypeMetadata>,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum VarianceMetadata {
    Invariant,
    In,
    Out,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct AnnotationMetadata {
    pub class_fq_name: String,
}

/// A serialized type.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TypeMetadata {
    pub classifier: TypeClassifierMetadata,
    pub arguments: Vec<TypeProjectionMetadata>,
    pub nullable: bool,
    /// The alias form of an expanded type (present when a type alias was
    /// replaced by its underlying type).
    pub abbreviation: Option<Box<TypeMetadata>>,
    /// Upper bound of a platform-flexible type.
    pub flexible_upper_bound: Option<Box<TypeMetadata>>,
}

impl TypeMetadata {
    /// Plain classifier type without arguments or bounds.
    pub fn plain(classifier: TypeClassifierMetadata) -> Self {
        TypeMetadata {
            classifier,
            arguments: Vec::new(),
            nullable: false,
            abbreviation: None,
            flexible_upper_bound: None,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum TypeClassifierMetadata {
    Class(String),
    TypeAlias(String),
    TypeParameter(u16),
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum TypeProjectionMetadata {
    Star,
    Argument {
        variance: VarianceMetadata,
        ty: TypeMetadata,
    },
}
