//! Function metadata building.

use tarn_ir::StringInterner;

use crate::decl::{AnnotationDecl, FunctionDecl, TypeParameterDecl, ValueParameterDecl};
use crate::merged::FunctionNode;
use crate::metadata::context::{TargetContext, VisitingContext};
use crate::metadata::types::{build_type, build_variance, TypeScope};
use crate::schema::{
    AnnotationMetadata, FunctionMetadata, TypeParameterMetadata, ValueParameterMetadata,
};

/// Build one function's metadata per dimension index. The common slot is
/// flagged `is_expect`.
pub(crate) fn build_functions(
    node: &FunctionNode,
    ctx: &VisitingContext<'_>,
    index_of_common: usize,
    expand_aliases: bool,
) -> Vec<Option<FunctionMetadata>> {
    let dimension = node.declarations.dimension();
    let mut functions: Vec<Option<FunctionMetadata>> = Vec::with_capacity(dimension);
    for index in 0..dimension {
        functions.push(node.declarations.get(index).map(|function| {
            build_function(
                function,
                ctx.target_context(index),
                ctx.interner,
                expand_aliases,
                index == index_of_common,
            )
        }));
    }
    functions
}

fn build_function(
    function: &FunctionDecl,
    target: &TargetContext<'_>,
    interner: &StringInterner,
    expand_aliases: bool,
    is_expect: bool,
) -> FunctionMetadata {
    let scope = TypeScope {
        type_parameter_count: function.type_parameters.len(),
    };

    FunctionMetadata {
        name: interner.resolve(function.name).to_owned(),
        return_type: build_type(&function.return_type, target, interner, scope, expand_aliases),
        receiver_parameter_type: function
            .extension_receiver
            .as_ref()
            .map(|receiver| build_type(receiver, target, interner, scope, expand_aliases)),
        type_parameters: function
            .type_parameters
            .iter()
            .map(|tp| build_type_parameter(tp, target, interner, scope, expand_aliases))
            .collect(),
        value_parameters: function
            .value_parameters
            .iter()
            .map(|vp| build_value_parameter(vp, target, interner, scope, expand_aliases))
            .collect(),
        annotations: function
            .annotations
            .iter()
            .map(|annotation| build_annotation(annotation, interner))
            .collect(),
        is_expect,
    }
}

pub(crate) fn build_type_parameter(
    parameter: &TypeParameterDecl,
    target: &TargetContext<'_>,
    interner: &StringInterner,
    scope: TypeScope,
    expand_aliases: bool,
) -> TypeParameterMetadata {
    TypeParameterMetadata {
        name: interner.resolve(parameter.name).to_owned(),
        variance: build_variance(parameter.variance),
        upper_bounds: parameter
            .upper_bounds
            .iter()
            .map(|bound| build_type(bound, target, interner, scope, expand_aliases))
            .collect(),
    }
}

fn build_value_parameter(
    parameter: &ValueParameterDecl,
    target: &TargetContext<'_>,
    interner: &StringInterner,
    scope: TypeScope,
    expand_aliases: bool,
) -> ValueParameterMetadata {
    ValueParameterMetadata {
        name: interner.resolve(parameter.name).to_owned(),
        ty: build_type(&parameter.ty, target, interner, scope, expand_aliases),
        vararg_element_type: parameter
            .vararg_element_type
            .as_ref()
            .map(|element| build_type(element, target, interner, scope, expand_aliases)),
        annotations: parameter
            .annotations
            .iter()
            .map(|annotation| build_annotation(annotation, interner))
            .collect(),
    }
}

pub(crate) fn build_annotation(
    annotation: &AnnotationDecl,
    interner: &StringInterner,
) -> AnnotationMetadata {
    AnnotationMetadata {
        class_fq_name: interner.resolve(annotation.class_fq_name).to_owned(),
    }
}
