//! Fragment assembly and empty-fragment synthesis.

use rustc_hash::FxHashSet;
use tarn_ir::StringInterner;

use crate::merged::PackageNode;
use crate::schema::{
    ClassMetadata, FragmentMetadata, FunctionMetadata, PackageMetadata, TypeAliasMetadata,
};

/// Assemble one package's fragments: one per occupied dimension slot,
/// absorbing the member metadata accumulated for that index.
pub(crate) fn build_fragments(
    package: &PackageNode,
    mut all_classes: Vec<Vec<ClassMetadata>>,
    mut all_type_aliases: Vec<Vec<TypeAliasMetadata>>,
    mut all_functions: Vec<Vec<FunctionMetadata>>,
    interner: &StringInterner,
) -> Vec<Option<FragmentMetadata>> {
    let dimension = package.declarations.dimension();
    let mut fragments: Vec<Option<FragmentMetadata>> = Vec::with_capacity(dimension);
    for index in 0..dimension {
        fragments.push(package.declarations.get(index).map(|info| FragmentMetadata {
            package_fq_name: interner.resolve(info.fq_name).to_owned(),
            classes: std::mem::take(&mut all_classes[index]),
            package: PackageMetadata {
                type_aliases: std::mem::take(&mut all_type_aliases[index]),
                functions: std::mem::take(&mut all_functions[index]),
            },
        }));
    }
    fragments
}

/// Synthesize empty fragments for missing intermediate packages so every
/// dimension's package hierarchy is ancestor-complete: if `a.b.c` has a
/// fragment, `a.b` and `a` must too.
pub(crate) fn add_empty_fragments(all_fragments: &mut [Vec<FragmentMetadata>]) {
    for fragments in all_fragments {
        let existing: FxHashSet<String> = fragments
            .iter()
            .map(|fragment| fragment.package_fq_name.clone())
            .collect();

        let mut missing: FxHashSet<String> = FxHashSet::default();
        for fq_name in &existing {
            for (dot_index, ch) in fq_name.char_indices() {
                if ch == '.' {
                    let parent = &fq_name[..dot_index];
                    if !existing.contains(parent) {
                        missing.insert(parent.to_owned());
                    }
                }
            }
        }

        let mut missing: Vec<String> = missing.into_iter().collect();
        missing.sort_unstable();
        for fq_name in missing {
            fragments.push(FragmentMetadata::empty(fq_name));
        }
    }
}
