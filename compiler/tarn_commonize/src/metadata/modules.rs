//! Module metadata assembly.

use tarn_ir::StringInterner;

use crate::merged::ModuleNode;
use crate::schema::{FragmentMetadata, ModuleMetadata};

/// Assemble one module's metadata per occupied dimension slot, absorbing
/// the fragments accumulated for each index.
pub(crate) fn build_modules(
    module: &ModuleNode,
    mut all_fragments: Vec<Vec<FragmentMetadata>>,
    interner: &StringInterner,
) -> Vec<Option<ModuleMetadata>> {
    let dimension = module.declarations.dimension();
    let mut modules: Vec<Option<ModuleMetadata>> = Vec::with_capacity(dimension);
    for index in 0..dimension {
        modules.push(module.declarations.get(index).map(|info| ModuleMetadata {
            name: interner.resolve(info.name).to_owned(),
            fragments: std::mem::take(&mut all_fragments[index]),
        }));
    }
    modules
}
