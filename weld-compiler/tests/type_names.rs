use proptest::prelude::*;
use weld_compiler::{
    ClassDescriptor, ClassKind, ClassNode, FqName, ModuleContext, ModuleOptions, PropertyDescriptor,
    PropertyNode, ResolvedType, SourceId, SymbolTable, SyntaxFile, TypeRefNode,
};

/// A type written once and rendered for both front-ends.
#[derive(Debug, Clone)]
enum Shape {
    Named(&'static str),
    List(Box<Shape>),
    Map(Box<Shape>, Box<Shape>),
    Lambda(Vec<Shape>, Box<Shape>),
    Nullable(Box<Shape>),
    Variable,
}

fn syntax(shape: &Shape) -> TypeRefNode {
    match shape {
        Shape::Named(name) => TypeRefNode::simple(*name),
        Shape::List(element) => TypeRefNode::generic("List", vec![syntax(element)]),
        Shape::Map(key, value) => TypeRefNode::generic("Map", vec![syntax(key), syntax(value)]),
        Shape::Lambda(parameters, result) => {
            TypeRefNode::lambda(parameters.iter().map(syntax).collect(), syntax(result))
        }
        Shape::Nullable(inner) => syntax(inner).nullable(),
        Shape::Variable => TypeRefNode::simple("T"),
    }
}

fn symbol(shape: &Shape) -> ResolvedType {
    match shape {
        Shape::Named(name) => ResolvedType::class(format!("kotlin.{name}")),
        Shape::List(element) => ResolvedType::generic("kotlin.collections.List", vec![symbol(element)]),
        Shape::Map(key, value) => {
            ResolvedType::generic("kotlin.collections.Map", vec![symbol(key), symbol(value)])
        }
        Shape::Lambda(parameters, result) => {
            ResolvedType::function(parameters.iter().map(symbol).collect(), symbol(result))
        }
        Shape::Nullable(inner) => symbol(inner).nullable(),
        Shape::Variable => ResolvedType::type_parameter("T"),
    }
}

fn shapes() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        Just(Shape::Named("String")),
        Just(Shape::Named("Int")),
        Just(Shape::Named("Unit")),
        Just(Shape::Variable),
    ];
    leaf.prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(|element| Shape::List(Box::new(element))),
            (inner.clone(), inner.clone())
                .prop_map(|(key, value)| Shape::Map(Box::new(key), Box::new(value))),
            (proptest::collection::vec(inner.clone(), 0..3), inner.clone())
                .prop_map(|(parameters, result)| Shape::Lambda(parameters, Box::new(result))),
            inner.prop_map(|inner| Shape::Nullable(Box::new(inner))),
        ]
    })
}

fn module_for(shape: &Shape) -> ModuleContext {
    let mut holder = ClassNode::new("Holder", ClassKind::Class);
    holder.type_parameters = vec!["T".to_string()];
    holder
        .properties
        .push(PropertyNode::new("value", syntax(shape)));
    let mut file = SyntaxFile::new(SourceId(0), "src/main/kotlin/app/Holder.kt", "app");
    file.classes.push(holder);

    let mut symbols = SymbolTable::with_builtins();
    let mut descriptor = ClassDescriptor::new("lib", "Holder", ClassKind::Class);
    descriptor.type_parameters = vec!["T".to_string()];
    descriptor
        .properties
        .push(PropertyDescriptor::new("value", symbol(shape)));
    symbols.insert(descriptor);

    ModuleContext::new(ModuleOptions::default(), vec![file], symbols)
}

proptest! {
    /// A type spelled in source and the same type reported by the symbol front-end normalize to
    /// the same canonical name.
    #[test]
    fn both_front_ends_produce_the_same_type_name(shape in shapes()) {
        let module = module_for(&shape);
        let from_syntax = module
            .class_reference(&FqName::new("app.Holder"))
            .expect("syntax holder")
            .properties()[0]
            .declared_type_name_or_null();
        let from_symbol = module
            .class_reference(&FqName::new("lib.Holder"))
            .expect("symbol holder")
            .properties()[0]
            .declared_type_name_or_null();

        prop_assert!(from_syntax.is_some(), "syntax type should resolve for {:?}", shape);
        prop_assert_eq!(from_syntax, from_symbol);
    }
}
