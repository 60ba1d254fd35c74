//! Metadata building.
//!
//! Visits the merged tree bottom-up and produces, per dimension index,
//! a list of serializable module structures: members are built first,
//! absorbed into package fragments, fragments into modules. Missing
//! intermediate packages are synthesized as empty fragments before
//! modules are assembled, so every target's package hierarchy is
//! complete.

mod classifiers;
mod context;
mod fragments;
mod functions;
mod modules;
mod types;

use tarn_ir::StringInterner;

use crate::decl::Target;
use crate::merged::{ModuleNode, PackageNode, RootNode};
use crate::schema::{FragmentMetadata, ModuleMetadata};

use classifiers::{build_classes, build_type_aliases, ClassifierOutput};
use context::VisitingContext;
use fragments::{add_empty_fragments, build_fragments};
use functions::build_functions;
use modules::build_modules;

/// How type aliases surface in built types.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum AliasExpansion {
    /// Keep the alias classifier, annotated with its use-site arguments.
    #[default]
    Keep,
    /// Replace the alias with its recursively expanded underlying type,
    /// attaching the alias form as the abbreviation.
    Expand,
}

/// Metadata build configuration.
#[derive(Copy, Clone, Debug, Default)]
pub struct BuildOptions {
    pub alias_expansion: AliasExpansion,
}

/// One dimension's worth of output: a target's modules, or the common
/// modules when `target` is `None`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DimensionMetadata {
    pub target: Option<Target>,
    pub modules: Vec<ModuleMetadata>,
}

/// Build serializable metadata for every dimension of the merged tree.
///
/// The result has one entry per target, in input order, followed by the
/// common entry (`target: None`).
pub fn build_metadata(
    root: &RootNode,
    interner: &StringInterner,
    options: BuildOptions,
) -> Vec<DimensionMetadata> {
    let ctx = VisitingContext::new(root, interner);
    let expand_aliases = options.alias_expansion == AliasExpansion::Expand;
    let dimension = root.dimension();

    tracing::debug!(
        dimension,
        modules = root.modules.len(),
        ?options,
        "building commonized metadata"
    );

    let mut all_modules: Vec<Vec<ModuleMetadata>> = vec![Vec::new(); dimension];
    for module in &root.modules {
        let built = visit_module(module, root, &ctx, expand_aliases);
        for (index, module_metadata) in built.into_iter().enumerate() {
            if let Some(module_metadata) = module_metadata {
                all_modules[index].push(module_metadata);
            }
        }
    }

    let mut result: Vec<DimensionMetadata> = Vec::with_capacity(dimension);
    for (index, modules) in all_modules.into_iter().enumerate() {
        let target = root.targets.get(index).copied();
        result.push(DimensionMetadata { target, modules });
    }
    result
}

fn visit_module(
    module: &ModuleNode,
    root: &RootNode,
    ctx: &VisitingContext<'_>,
    expand_aliases: bool,
) -> Vec<Option<ModuleMetadata>> {
    let dimension = root.dimension();
    let mut all_fragments: Vec<Vec<FragmentMetadata>> = vec![Vec::new(); dimension];

    for package in &module.packages {
        let fragments = visit_package(package, root, ctx, expand_aliases);
        for (index, fragment) in fragments.into_iter().enumerate() {
            if let Some(fragment) = fragment {
                all_fragments[index].push(fragment);
            }
        }
    }

    add_empty_fragments(&mut all_fragments);

    build_modules(module, all_fragments, ctx.interner)
}

fn visit_package(
    package: &PackageNode,
    root: &RootNode,
    ctx: &VisitingContext<'_>,
    expand_aliases: bool,
) -> Vec<Option<FragmentMetadata>> {
    let dimension = root.dimension();
    let index_of_common = root.index_of_common();

    let mut all_classes = vec![Vec::new(); dimension];
    for class_node in &package.classes {
        let built = build_classes(class_node, ctx, index_of_common, expand_aliases);
        for (index, class) in built.into_iter().enumerate() {
            if let Some(class) = class {
                all_classes[index].push(class);
            }
        }
    }

    // Alias nodes yield mixed classifier outputs: aliases for target
    // slots, lifted expect classes for the common slot.
    let mut all_type_aliases = vec![Vec::new(); dimension];
    for alias_node in &package.type_aliases {
        let built = build_type_aliases(alias_node, ctx, index_of_common, expand_aliases);
        for (index, output) in built.into_iter().enumerate() {
            match output {
                None => {}
                Some(ClassifierOutput::Class(class)) => all_classes[index].push(class),
                Some(ClassifierOutput::TypeAlias(alias)) => all_type_aliases[index].push(alias),
            }
        }
    }

    let mut all_functions = vec![Vec::new(); dimension];
    for function_node in &package.functions {
        let built = build_functions(function_node, ctx, index_of_common, expand_aliases);
        for (index, function) in built.into_iter().enumerate() {
            if let Some(function) = function {
                all_functions[index].push(function);
            }
        }
    }

    build_fragments(package, all_classes, all_type_aliases, all_functions, ctx.interner)
}

#[cfg(test)]
mod tests;
