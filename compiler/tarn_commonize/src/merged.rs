//! The merged declaration tree.
//!
//! One node per declaration name, each holding one slot per target plus
//! one common slot (the node's dimension). [`merge`] builds the tree
//! from per-target inputs: target slots are filled with the matching
//! declarations, and the common slot is computed where every target
//! carries a structurally equal declaration.
//!
//! Input problems (no targets, duplicate target names) are
//! [`CommonizeError`]s; everything past the boundary panics on
//! inconsistency, because that is a merge bug.

use rustc_hash::FxHashMap;
use tarn_ir::Name;

use crate::decl::{ClassDecl, FunctionDecl, ModuleDecl, PackageDecl, Target, TypeAliasDecl};
use crate::error::CommonizeError;
use crate::group::CommonizedGroup;

/// Merge input: one target's full declaration tree.
#[derive(Clone, Debug)]
pub struct TargetDeclarations {
    pub target: Target,
    pub modules: Vec<ModuleDecl>,
}

/// Root of the merged tree.
#[derive(Debug)]
pub struct RootNode {
    pub targets: Vec<Target>,
    pub modules: Vec<ModuleNode>,
}

impl RootNode {
    /// Slot count per node: one per target plus the common slot.
    pub fn dimension(&self) -> usize {
        self.targets.len() + 1
    }

    /// Index of the common slot (always the last).
    pub fn index_of_common(&self) -> usize {
        self.targets.len()
    }
}

/// Module identity payload (a module has no content besides members).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ModuleInfo {
    pub name: Name,
}

/// Package identity payload.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PackageInfo {
    pub fq_name: Name,
}

#[derive(Debug)]
pub struct ModuleNode {
    pub declarations: CommonizedGroup<ModuleInfo>,
    pub packages: Vec<PackageNode>,
}

#[derive(Debug)]
pub struct PackageNode {
    pub declarations: CommonizedGroup<PackageInfo>,
    pub classes: Vec<ClassNode>,
    pub type_aliases: Vec<TypeAliasNode>,
    pub functions: Vec<FunctionNode>,
}

#[derive(Debug)]
pub struct ClassNode {
    pub declarations: CommonizedGroup<ClassDecl>,
}

#[derive(Debug)]
pub struct TypeAliasNode {
    pub declarations: CommonizedGroup<TypeAliasDecl>,
}

#[derive(Debug)]
pub struct FunctionNode {
    pub declarations: CommonizedGroup<FunctionDecl>,
}

/// Build the merged tree from per-target declaration trees.
pub fn merge(inputs: Vec<TargetDeclarations>) -> Result<RootNode, CommonizeError> {
    if inputs.is_empty() {
        return Err(CommonizeError::EmptyTargets);
    }
    let mut seen: FxHashMap<Name, ()> = FxHashMap::default();
    for input in &inputs {
        if seen.insert(input.target.name, ()).is_some() {
            return Err(CommonizeError::DuplicateTarget(format!(
                "{:?}",
                input.target.name
            )));
        }
    }

    let targets: Vec<Target> = inputs.iter().map(|input| input.target).collect();
    let dimension = targets.len() + 1;
    let index_of_common = targets.len();

    tracing::debug!(targets = targets.len(), "merging target declaration trees");

    // Group modules by name, preserving first-encounter order.
    let module_groups = group_by(&inputs, |input| {
        input.modules.iter().map(|module| (module.name, module))
    });

    let modules = module_groups
        .into_iter()
        .map(|(name, per_target)| {
            merge_module(name, &per_target, dimension, index_of_common)
        })
        .collect();

    Ok(RootNode { targets, modules })
}

fn merge_module(
    name: Name,
    per_target: &[Option<&ModuleDecl>],
    dimension: usize,
    index_of_common: usize,
) -> ModuleNode {
    let mut declarations = CommonizedGroup::new(dimension);
    for (index, module) in per_target.iter().enumerate() {
        if module.is_some() {
            declarations.set(index, ModuleInfo { name });
        }
    }
    if per_target.iter().all(Option::is_some) {
        declarations.set(index_of_common, ModuleInfo { name });
    }

    let package_groups = group_by(per_target, |module| {
        module
            .iter()
            .flat_map(|m| m.packages.iter().map(|p| (p.fq_name, p)))
    });

    let packages = package_groups
        .into_iter()
        .map(|(fq_name, pkgs)| merge_package(fq_name, &pkgs, dimension, index_of_common))
        .collect();

    ModuleNode {
        declarations,
        packages,
    }
}

fn merge_package(
    fq_name: Name,
    per_target: &[Option<&PackageDecl>],
    dimension: usize,
    index_of_common: usize,
) -> PackageNode {
    let mut declarations = CommonizedGroup::new(dimension);
    for (index, package) in per_target.iter().enumerate() {
        if package.is_some() {
            declarations.set(index, PackageInfo { fq_name });
        }
    }
    if per_target.iter().all(Option::is_some) {
        declarations.set(index_of_common, PackageInfo { fq_name });
    }

    let classes = group_by(per_target, |package| {
        package
            .iter()
            .flat_map(|p| p.classes.iter().map(|c| (c.name, c)))
    })
    .into_iter()
    .map(|(_, decls)| ClassNode {
        declarations: merge_declarations(&decls, dimension, index_of_common),
    })
    .collect();

    let type_aliases = group_by(per_target, |package| {
        package
            .iter()
            .flat_map(|p| p.type_aliases.iter().map(|a| (a.name, a)))
    })
    .into_iter()
    .map(|(_, decls)| TypeAliasNode {
        declarations: merge_declarations(&decls, dimension, index_of_common),
    })
    .collect();

    let functions = group_by(per_target, |package| {
        package
            .iter()
            .flat_map(|p| p.functions.iter().map(|f| (f.name, f)))
    })
    .into_iter()
    .map(|(_, decls)| FunctionNode {
        declarations: merge_declarations(&decls, dimension, index_of_common),
    })
    .collect();

    PackageNode {
        declarations,
        classes,
        type_aliases,
        functions,
    }
}

/// Fill target slots from per-target declarations; the common slot is
/// occupied only when every target carries a structurally equal
/// declaration.
fn merge_declarations<T: Clone + PartialEq>(
    per_target: &[Option<&T>],
    dimension: usize,
    index_of_common: usize,
) -> CommonizedGroup<T> {
    let mut group = CommonizedGroup::new(dimension);
    for (index, decl) in per_target.iter().enumerate() {
        if let Some(decl) = decl {
            group.set(index, (*decl).clone());
        }
    }

    let mut candidates = per_target.iter();
    if let Some(Some(first)) = candidates.next() {
        if per_target.iter().all(|decl| *decl == Some(*first)) {
            group.set(index_of_common, (*first).clone());
        }
    }
    group
}

/// Group items produced per input slot by name, preserving
/// first-encounter order. The result rows are parallel to the input
/// slots: `row[i]` is the item of that name in slot `i`, if any.
fn group_by<'a, S, T: ?Sized, F, I>(slots: &'a [S], items: F) -> Vec<(Name, Vec<Option<&'a T>>)>
where
    F: Fn(&'a S) -> I,
    I: Iterator<Item = (Name, &'a T)>,
{
    let mut order: Vec<Name> = Vec::new();
    let mut index_by_name: FxHashMap<Name, usize> = FxHashMap::default();
    let mut rows: Vec<Vec<Option<&'a T>>> = Vec::new();

    for (slot_index, slot) in slots.iter().enumerate() {
        for (name, item) in items(slot) {
            let row = match index_by_name.get(&name) {
                Some(&row) => row,
                None => {
                    index_by_name.insert(name, order.len());
                    order.push(name);
                    rows.push(vec![None; slots.len()]);
                    rows.len() - 1
                }
            };
            rows[row][slot_index] = Some(item);
        }
    }

    order.into_iter().zip(rows).collect()
}

#[cfg(test)]
mod tests;
