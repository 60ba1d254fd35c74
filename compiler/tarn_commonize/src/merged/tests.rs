use pretty_assertions::assert_eq;

use tarn_ir::StringInterner;

use crate::decl::{
    ClassifierId, FunctionDecl, ModuleDecl, PackageDecl, SimpleType, Target, Type,
};
use crate::error::CommonizeError;
use crate::merged::{merge, TargetDeclarations};

fn function(interner: &StringInterner, name: &str, return_class: &str) -> FunctionDecl {
    FunctionDecl {
        name: interner.intern(name),
        return_type: Type::Simple(SimpleType::plain(ClassifierId::Class(
            interner.intern(return_class),
        ))),
        extension_receiver: None,
        type_parameters: Vec::new(),
        value_parameters: Vec::new(),
        annotations: Vec::new(),
    }
}

fn target_input(
    interner: &StringInterner,
    target: &str,
    functions: Vec<FunctionDecl>,
) -> TargetDeclarations {
    TargetDeclarations {
        target: Target {
            name: interner.intern(target),
        },
        modules: vec![ModuleDecl {
            name: interner.intern("core"),
            packages: vec![PackageDecl {
                fq_name: interner.intern("io"),
                classes: Vec::new(),
                type_aliases: Vec::new(),
                functions,
            }],
        }],
    }
}

#[test]
fn empty_input_is_an_error() {
    assert!(matches!(
        merge(Vec::new()),
        Err(CommonizeError::EmptyTargets)
    ));
}

#[test]
fn duplicate_target_is_an_error() {
    let interner = StringInterner::new();
    let a = target_input(&interner, "linux", Vec::new());
    let b = target_input(&interner, "linux", Vec::new());
    assert!(matches!(
        merge(vec![a, b]),
        Err(CommonizeError::DuplicateTarget(_))
    ));
}

#[test]
fn equal_declarations_occupy_the_common_slot() {
    let interner = StringInterner::new();
    let a = target_input(&interner, "linux", vec![function(&interner, "read", "Buffer")]);
    let b = target_input(&interner, "macos", vec![function(&interner, "read", "Buffer")]);

    let root = match merge(vec![a, b]) {
        Ok(root) => root,
        Err(err) => panic!("merge failed: {err}"),
    };
    assert_eq!(root.dimension(), 3);
    assert_eq!(root.index_of_common(), 2);

    let node = &root.modules[0].packages[0].functions[0];
    assert_eq!(node.declarations.dimension(), 3);
    assert!(node.declarations.get(0).is_some());
    assert!(node.declarations.get(1).is_some());
    assert!(
        node.declarations.get(root.index_of_common()).is_some(),
        "identical declarations commonize"
    );
}

#[test]
fn diverging_declarations_leave_the_common_slot_empty() {
    let interner = StringInterner::new();
    let a = target_input(&interner, "linux", vec![function(&interner, "read", "Buffer")]);
    let b = target_input(&interner, "macos", vec![function(&interner, "read", "Chunk")]);

    let root = match merge(vec![a, b]) {
        Ok(root) => root,
        Err(err) => panic!("merge failed: {err}"),
    };
    let node = &root.modules[0].packages[0].functions[0];
    assert!(node.declarations.get(0).is_some());
    assert!(node.declarations.get(1).is_some());
    assert!(node.declarations.get(root.index_of_common()).is_none());
}

#[test]
fn declarations_missing_from_one_target_do_not_commonize() {
    let interner = StringInterner::new();
    let a = target_input(&interner, "linux", vec![function(&interner, "read", "Buffer")]);
    let b = target_input(&interner, "macos", Vec::new());

    let root = match merge(vec![a, b]) {
        Ok(root) => root,
        Err(err) => panic!("merge failed: {err}"),
    };
    let node = &root.modules[0].packages[0].functions[0];
    assert!(node.declarations.get(0).is_some());
    assert!(node.declarations.get(1).is_none(), "absent for macos");
    assert!(node.declarations.get(root.index_of_common()).is_none());

    // Both targets still share the module and package nodes.
    assert!(root.modules[0]
        .declarations
        .get(root.index_of_common())
        .is_some());
}
