use pretty_assertions::assert_eq;

use tarn_ir::StringInterner;

use crate::decl::{
    ClassDecl, ClassifierId, FunctionDecl, ModuleDecl, PackageDecl, SimpleType, Target, Type,
    TypeAliasDecl, TypeParameterDecl, Variance,
};
use crate::merged::{merge, RootNode, TargetDeclarations};
use crate::metadata::{build_metadata, AliasExpansion, BuildOptions};
use crate::schema::{ModuleMetadata, TypeClassifierMetadata};

fn class_type(interner: &StringInterner, fq_name: &str) -> Type {
    Type::Simple(SimpleType::plain(ClassifierId::Class(
        interner.intern(fq_name),
    )))
}

fn simple_function(interner: &StringInterner, name: &str, return_type: Type) -> FunctionDecl {
    FunctionDecl {
        name: interner.intern(name),
        return_type,
        extension_receiver: None,
        type_parameters: Vec::new(),
        value_parameters: Vec::new(),
        annotations: Vec::new(),
    }
}

fn package(interner: &StringInterner, fq_name: &str) -> PackageDecl {
    PackageDecl {
        fq_name: interner.intern(fq_name),
        classes: Vec::new(),
        type_aliases: Vec::new(),
        functions: Vec::new(),
    }
}

fn input(interner: &StringInterner, target: &str, packages: Vec<PackageDecl>) -> TargetDeclarations {
    TargetDeclarations {
        target: Target {
            name: interner.intern(target),
        },
        modules: vec![ModuleDecl {
            name: interner.intern("core"),
            packages,
        }],
    }
}

fn merged(inputs: Vec<TargetDeclarations>) -> RootNode {
    match merge(inputs) {
        Ok(root) => root,
        Err(err) => panic!("merge failed: {err}"),
    }
}

fn fragment_names(module: &ModuleMetadata) -> Vec<&str> {
    module
        .fragments
        .iter()
        .map(|fragment| fragment.package_fq_name.as_str())
        .collect()
}

#[test]
fn missing_intermediate_packages_are_synthesized_per_target() {
    let interner = StringInterner::new();
    let a = input(&interner, "linux", vec![package(&interner, "a.b.c")]);
    let b = input(&interner, "macos", vec![package(&interner, "a.b")]);
    let root = merged(vec![a, b]);

    let output = build_metadata(&root, &interner, BuildOptions::default());
    assert_eq!(output.len(), 3, "two targets plus common");

    let linux = &output[0].modules[0];
    let macos = &output[1].modules[0];

    // Both targets end up with a (possibly empty) `a.b` fragment.
    assert!(fragment_names(linux).contains(&"a.b"));
    assert!(fragment_names(macos).contains(&"a.b"));
    // And every ancestor exists.
    assert!(fragment_names(linux).contains(&"a"));
    assert!(fragment_names(macos).contains(&"a"));

    // Neither package is shared, so the common module has no fragments.
    assert_eq!(output[2].target, None);
    assert!(fragment_names(&output[2].modules[0]).is_empty());
}

#[test]
fn common_functions_are_expect_declarations() {
    let interner = StringInterner::new();
    let make = |target: &str| {
        let mut pkg = package(&interner, "io");
        pkg.functions
            .push(simple_function(&interner, "read", class_type(&interner, "Buffer")));
        input(&interner, target, vec![pkg])
    };
    let root = merged(vec![make("linux"), make("macos")]);
    let output = build_metadata(&root, &interner, BuildOptions::default());

    let target_fn = &output[0].modules[0].fragments[0].package.functions[0];
    assert_eq!(target_fn.name, "read");
    assert!(!target_fn.is_expect);

    let common_fn = &output[2].modules[0].fragments[0].package.functions[0];
    assert_eq!(common_fn.name, "read");
    assert!(common_fn.is_expect, "common declarations are expect");
}

fn alias_fixture(interner: &StringInterner) -> RootNode {
    // `io.Path` aliases `io.Text`; a function returns the alias.
    let make = |target: &str| {
        let mut pkg = package(interner, "io");
        pkg.classes.push(ClassDecl {
            name: interner.intern("Text"),
            type_parameters: Vec::new(),
            supertypes: Vec::new(),
        });
        pkg.type_aliases.push(TypeAliasDecl {
            name: interner.intern("Path"),
            type_parameters: Vec::new(),
            underlying: class_type(interner, "io.Text"),
        });
        pkg.functions.push(simple_function(
            interner,
            "open",
            Type::Simple(SimpleType::plain(ClassifierId::TypeAlias(
                interner.intern("io.Path"),
            ))),
        ));
        input(interner, target, vec![pkg])
    };
    merged(vec![make("linux"), make("macos")])
}

#[test]
fn keeping_aliases_emits_the_alias_classifier() {
    let interner = StringInterner::new();
    let root = alias_fixture(&interner);
    let output = build_metadata(
        &root,
        &interner,
        BuildOptions {
            alias_expansion: AliasExpansion::Keep,
        },
    );

    let return_type = &output[0].modules[0].fragments[0].package.functions[0].return_type;
    assert_eq!(
        return_type.classifier,
        TypeClassifierMetadata::TypeAlias("io.Path".to_owned())
    );
    assert_eq!(return_type.abbreviation, None);
}

#[test]
fn expanding_aliases_attaches_the_abbreviation() {
    let interner = StringInterner::new();
    let root = alias_fixture(&interner);
    let output = build_metadata(
        &root,
        &interner,
        BuildOptions {
            alias_expansion: AliasExpansion::Expand,
        },
    );

    let return_type = &output[0].modules[0].fragments[0].package.functions[0].return_type;
    assert_eq!(
        return_type.classifier,
        TypeClassifierMetadata::Class("io.Text".to_owned()),
        "alias replaced by its underlying type"
    );
    let Some(abbreviation) = &return_type.abbreviation else {
        panic!("expanded type must carry its abbreviation");
    };
    assert_eq!(
        abbreviation.classifier,
        TypeClassifierMetadata::TypeAlias("io.Path".to_owned())
    );
}

#[test]
fn commonized_aliases_surface_as_expect_classes() {
    let interner = StringInterner::new();
    let root = alias_fixture(&interner);
    let output = build_metadata(&root, &interner, BuildOptions::default());

    // Target dimensions keep the alias in the package section.
    let linux_fragment = &output[0].modules[0].fragments[0];
    assert_eq!(linux_fragment.package.type_aliases.len(), 1);
    assert_eq!(linux_fragment.package.type_aliases[0].name, "Path");

    // The common dimension lifts it to an expect class alongside Text.
    let common_fragment = &output[2].modules[0].fragments[0];
    assert!(common_fragment.package.type_aliases.is_empty());
    let mut class_names: Vec<&str> = common_fragment
        .classes
        .iter()
        .map(|class| class.name.as_str())
        .collect();
    class_names.sort_unstable();
    assert_eq!(class_names, vec!["Path", "Text"]);
    assert!(common_fragment.classes.iter().all(|class| class.is_expect));
}

#[test]
fn metadata_serializes_to_a_portable_structure() {
    let interner = StringInterner::new();
    let mut pkg = package(&interner, "io");
    pkg.functions
        .push(simple_function(&interner, "read", class_type(&interner, "Buffer")));
    let root = merged(vec![input(&interner, "linux", vec![pkg])]);
    let output = build_metadata(&root, &interner, BuildOptions::default());

    let json = match serde_json::to_value(&output[0].modules) {
        Ok(json) => json,
        Err(err) => panic!("serialization failed: {err}"),
    };
    assert_eq!(json[0]["name"], "core");
    assert_eq!(json[0]["fragments"][0]["package_fq_name"], "io");
    assert_eq!(
        json[0]["fragments"][0]["package"]["functions"][0]["name"],
        "read"
    );
}

#[test]
#[should_panic(expected = "type parameter index 2 out of range")]
fn out_of_range_type_parameter_is_fatal() {
    let interner = StringInterner::new();
    let mut pkg = package(&interner, "io");
    pkg.functions.push(FunctionDecl {
        name: interner.intern("broken"),
        return_type: Type::Simple(SimpleType::plain(ClassifierId::TypeParameter(2))),
        extension_receiver: None,
        type_parameters: vec![TypeParameterDecl {
            name: interner.intern("T"),
            variance: Variance::Invariant,
            upper_bounds: Vec::new(),
        }],
        value_parameters: Vec::new(),
        annotations: Vec::new(),
    });
    let root = merged(vec![input(&interner, "linux", vec![pkg])]);
    let _ = build_metadata(&root, &interner, BuildOptions::default());
}
