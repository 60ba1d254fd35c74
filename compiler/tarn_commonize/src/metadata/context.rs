//! Per-target build context.
//!
//! Each dimension index gets a [`TargetContext`] carrying the classifier
//! index used to resolve type-alias references during expansion, plus
//! whether the index is the common slot.

use rustc_hash::FxHashMap;
use tarn_ir::{Name, StringInterner};

use crate::decl::{ClassDecl, TypeAliasDecl};
use crate::merged::RootNode;

/// A classifier found by fully-qualified lookup.
#[derive(Copy, Clone, Debug)]
pub enum ResolvedClassifier<'a> {
    Class(&'a ClassDecl),
    TypeAlias(&'a TypeAliasDecl),
}

/// Build context for the whole tree.
pub struct VisitingContext<'a> {
    pub interner: &'a StringInterner,
    target_contexts: Vec<TargetContext<'a>>,
}

impl<'a> VisitingContext<'a> {
    /// Index every target's classifiers for resolution.
    pub fn new(root: &'a RootNode, interner: &'a StringInterner) -> Self {
        let dimension = root.dimension();
        let index_of_common = root.index_of_common();

        let mut classifier_indices: Vec<FxHashMap<Name, ResolvedClassifier<'a>>> =
            vec![FxHashMap::default(); dimension];

        for module in &root.modules {
            for package in &module.packages {
                for class_node in &package.classes {
                    for (index, class) in class_node.declarations.iter_occupied() {
                        let fq = qualified_name(interner, package_fq(package, index), class.name);
                        classifier_indices[index].insert(fq, ResolvedClassifier::Class(class));
                    }
                }
                for alias_node in &package.type_aliases {
                    for (index, alias) in alias_node.declarations.iter_occupied() {
                        let fq = qualified_name(interner, package_fq(package, index), alias.name);
                        classifier_indices[index].insert(fq, ResolvedClassifier::TypeAlias(alias));
                    }
                }
            }
        }

        let target_contexts = classifier_indices
            .into_iter()
            .enumerate()
            .map(|(index, classifiers)| TargetContext {
                index,
                is_common: index == index_of_common,
                classifiers,
            })
            .collect();

        VisitingContext {
            interner,
            target_contexts,
        }
    }

    pub fn target_context(&self, index: usize) -> &TargetContext<'a> {
        &self.target_contexts[index]
    }
}

/// Build context for one dimension index.
pub struct TargetContext<'a> {
    pub index: usize,
    pub is_common: bool,
    classifiers: FxHashMap<Name, ResolvedClassifier<'a>>,
}

impl<'a> TargetContext<'a> {
    /// Resolve a classifier by fully-qualified name.
    pub fn resolve_classifier(&self, fq_name: Name) -> Option<ResolvedClassifier<'a>> {
        self.classifiers.get(&fq_name).copied()
    }
}

fn package_fq(package: &crate::merged::PackageNode, index: usize) -> Option<Name> {
    package
        .declarations
        .get(index)
        .map(|info| info.fq_name)
}

/// `package.member` (or just `member` for the root package).
fn qualified_name(interner: &StringInterner, package: Option<Name>, member: Name) -> Name {
    match package {
        Some(package) if package != Name::EMPTY => {
            let qualified = format!(
                "{}.{}",
                interner.resolve(package),
                interner.resolve(member)
            );
            interner.intern(&qualified)
        }
        _ => member,
    }
}
