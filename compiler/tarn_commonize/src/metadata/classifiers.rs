//! Classifier metadata building.
//!
//! Class nodes produce classes; type-alias nodes produce a *mixed*
//! classifier output, because a commonized alias surfaces in the common
//! slot as an expect class rather than an alias. The package visitor
//! dispatches each output to the right fragment section.

use tarn_ir::StringInterner;

use crate::decl::{ClassDecl, TypeAliasDecl};
use crate::merged::{ClassNode, TypeAliasNode};
use crate::metadata::context::{TargetContext, VisitingContext};
use crate::metadata::functions::build_type_parameter;
use crate::metadata::types::{build_type, TypeScope};
use crate::schema::{ClassMetadata, TypeAliasMetadata};

/// Per-index classifier output of a type-alias node.
#[derive(Debug)]
pub(crate) enum ClassifierOutput {
    Class(ClassMetadata),
    TypeAlias(TypeAliasMetadata),
}

pub(crate) fn build_classes(
    node: &ClassNode,
    ctx: &VisitingContext<'_>,
    index_of_common: usize,
    expand_aliases: bool,
) -> Vec<Option<ClassMetadata>> {
    let dimension = node.declarations.dimension();
    let mut classes: Vec<Option<ClassMetadata>> = Vec::with_capacity(dimension);
    for index in 0..dimension {
        classes.push(node.declarations.get(index).map(|class| {
            build_class(
                class,
                ctx.target_context(index),
                ctx.interner,
                expand_aliases,
                index == index_of_common,
            )
        }));
    }
    classes
}

fn build_class(
    class: &ClassDecl,
    target: &TargetContext<'_>,
    interner: &StringInterner,
    expand_aliases: bool,
    is_expect: bool,
) -> ClassMetadata {
    let scope = TypeScope {
        type_parameter_count: class.type_parameters.len(),
    };
    ClassMetadata {
        name: interner.resolve(class.name).to_owned(),
        type_parameters: class
            .type_parameters
            .iter()
            .map(|tp| build_type_parameter(tp, target, interner, scope, expand_aliases))
            .collect(),
        supertypes: class
            .supertypes
            .iter()
            .map(|supertype| build_type(supertype, target, interner, scope, expand_aliases))
            .collect(),
        is_expect,
    }
}

/// Build a type-alias node's classifier outputs: aliases for target
/// slots, an expect class for the common slot.
pub(crate) fn build_type_aliases(
    node: &TypeAliasNode,
    ctx: &VisitingContext<'_>,
    index_of_common: usize,
    expand_aliases: bool,
) -> Vec<Option<ClassifierOutput>> {
    let dimension = node.declarations.dimension();
    let mut outputs: Vec<Option<ClassifierOutput>> = Vec::with_capacity(dimension);
    for index in 0..dimension {
        outputs.push(node.declarations.get(index).map(|alias| {
            let target = ctx.target_context(index);
            if index == index_of_common {
                ClassifierOutput::Class(lift_alias_to_class(
                    alias,
                    target,
                    ctx.interner,
                    expand_aliases,
                ))
            } else {
                ClassifierOutput::TypeAlias(build_type_alias(
                    alias,
                    target,
                    ctx.interner,
                    expand_aliases,
                ))
            }
        }));
    }
    outputs
}

fn build_type_alias(
    alias: &TypeAliasDecl,
    target: &TargetContext<'_>,
    interner: &StringInterner,
    expand_aliases: bool,
) -> TypeAliasMetadata {
    let scope = TypeScope {
        type_parameter_count: alias.type_parameters.len(),
    };
    TypeAliasMetadata {
        name: interner.resolve(alias.name).to_owned(),
        type_parameters: alias
            .type_parameters
            .iter()
            .map(|tp| build_type_parameter(tp, target, interner, scope, expand_aliases))
            .collect(),
        underlying: build_type(&alias.underlying, target, interner, scope, expand_aliases),
    }
}

/// The common slot of an alias node surfaces as an expect class with the
/// alias's name and parameters.
fn lift_alias_to_class(
    alias: &TypeAliasDecl,
    target: &TargetContext<'_>,
    interner: &StringInterner,
    expand_aliases: bool,
) -> ClassMetadata {
    let scope = TypeScope {
        type_parameter_count: alias.type_parameters.len(),
    };
    ClassMetadata {
        name: interner.resolve(alias.name).to_owned(),
        type_parameters: alias
            .type_parameters
            .iter()
            .map(|tp| build_type_parameter(tp, target, interner, scope, expand_aliases))
            .collect(),
        supertypes: Vec::new(),
        is_expect: true,
    }
}
