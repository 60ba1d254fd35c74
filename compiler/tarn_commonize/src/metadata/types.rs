//! Type building.
//!
//! Converts commonizer types into serializable [`TypeMetadata`],
//! optionally expanding type aliases. Expansion replaces the alias
//! classifier with its (recursively expanded) underlying type and
//! attaches the alias form as the abbreviation; keeping emits the alias
//! classifier directly.

use tarn_ir::StringInterner;

use crate::decl::{ClassifierId, SimpleType, Type, TypeProjection, Variance};
use crate::metadata::context::{ResolvedClassifier, TargetContext};
use crate::schema::{
    TypeClassifierMetadata, TypeMetadata, TypeProjectionMetadata, VarianceMetadata,
};

/// Alias chains deeper than this indicate a cycle in the input.
const MAX_ALIAS_DEPTH: usize = 32;

/// Type-parameter scope of the declaration owning the type being built.
#[derive(Copy, Clone, Debug)]
pub(crate) struct TypeScope {
    pub type_parameter_count: usize,
}

pub(crate) fn build_type(
    ty: &Type,
    ctx: &TargetContext<'_>,
    interner: &StringInterner,
    scope: TypeScope,
    expand_aliases: bool,
) -> TypeMetadata {
    build_type_at(ty, ctx, interner, scope, expand_aliases, 0)
}

fn build_type_at(
    ty: &Type,
    ctx: &TargetContext<'_>,
    interner: &StringInterner,
    scope: TypeScope,
    expand_aliases: bool,
    depth: usize,
) -> TypeMetadata {
    match ty {
        Type::Simple(simple) => {
            build_simple_type(simple, ctx, interner, scope, expand_aliases, depth)
        }
        Type::Flexible { lower, upper } => {
            let mut meta = build_simple_type(lower, ctx, interner, scope, expand_aliases, depth);
            meta.flexible_upper_bound = Some(Box::new(build_simple_type(
                upper,
                ctx,
                interner,
                scope,
                expand_aliases,
                depth,
            )));
            meta
        }
    }
}

fn build_simple_type(
    ty: &SimpleType,
    ctx: &TargetContext<'_>,
    interner: &StringInterner,
    scope: TypeScope,
    expand_aliases: bool,
    depth: usize,
) -> TypeMetadata {
    match &ty.classifier {
        ClassifierId::Class(fq_name) => TypeMetadata {
            classifier: TypeClassifierMetadata::Class(interner.resolve(*fq_name).to_owned()),
            arguments: build_arguments(ty, ctx, interner, scope, expand_aliases, depth),
            nullable: ty.nullable,
            abbreviation: None,
            flexible_upper_bound: None,
        },

        ClassifierId::TypeParameter(index) => {
            let index = *index;
            assert!(
                (index as usize) < scope.type_parameter_count,
                "type parameter index {index} out of range ({} declared)",
                scope.type_parameter_count
            );
            TypeMetadata {
                classifier: TypeClassifierMetadata::TypeParameter(index),
                arguments: Vec::new(),
                nullable: ty.nullable,
                abbreviation: None,
                flexible_upper_bound: None,
            }
        }

        ClassifierId::TypeAlias(fq_name) => {
            let alias = match ctx.resolve_classifier(*fq_name) {
                Some(ResolvedClassifier::TypeAlias(alias)) => alias,
                // An alias reference that resolves to a class (or to
                // nothing visible from this target) is emitted as a
                // plain class type.
                Some(ResolvedClassifier::Class(_)) | None => {
                    return TypeMetadata {
                        classifier: TypeClassifierMetadata::Class(
                            interner.resolve(*fq_name).to_owned(),
                        ),
                        arguments: build_arguments(ty, ctx, interner, scope, expand_aliases, depth),
                        nullable: ty.nullable,
                        abbreviation: None,
                        flexible_upper_bound: None,
                    };
                }
            };

            let abbreviation = TypeMetadata {
                classifier: TypeClassifierMetadata::TypeAlias(
                    interner.resolve(*fq_name).to_owned(),
                ),
                arguments: build_arguments(ty, ctx, interner, scope, expand_aliases, depth),
                nullable: ty.nullable,
                abbreviation: None,
                flexible_upper_bound: None,
            };

            if expand_aliases {
                assert!(
                    depth < MAX_ALIAS_DEPTH,
                    "type alias expansion exceeded depth {MAX_ALIAS_DEPTH} at `{}` (alias cycle?)",
                    interner.resolve(*fq_name)
                );
                // The underlying type's parameters are the alias's own.
                let alias_scope = TypeScope {
                    type_parameter_count: alias.type_parameters.len(),
                };
                let mut expanded = build_type_at(
                    &alias.underlying,
                    ctx,
                    interner,
                    alias_scope,
                    expand_aliases,
                    depth + 1,
                );
                expanded.nullable |= ty.nullable;
                expanded.abbreviation = Some(Box::new(abbreviation));
                expanded
            } else {
                abbreviation
            }
        }
    }
}

fn build_arguments(
    ty: &SimpleType,
    ctx: &TargetContext<'_>,
    interner: &StringInterner,
    scope: TypeScope,
    expand_aliases: bool,
    depth: usize,
) -> Vec<TypeProjectionMetadata> {
    ty.arguments
        .iter()
        .map(|projection| match projection {
            TypeProjection::Star => TypeProjectionMetadata::Star,
            TypeProjection::Argument { variance, ty } => TypeProjectionMetadata::Argument {
                variance: build_variance(*variance),
                ty: build_type_at(ty, ctx, interner, scope, expand_aliases, depth),
            },
        })
        .collect()
}

pub(crate) fn build_variance(variance: Variance) -> VarianceMetadata {
    match variance {
        Variance::Invariant => VarianceMetadata::Invariant,
        Variance::In => VarianceMetadata::In,
        Variance::Out => VarianceMetadata::Out,
    }
}
