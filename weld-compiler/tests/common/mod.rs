#![allow(dead_code)]

use weld_compiler::{
    AnnotationDescriptor, AnnotationEntry, ArgumentExpr, ClassDescriptor, ClassKind, ClassNode,
    ClassReference, ConstantArgument, ConstantValue, FqName, FunctionDescriptor, FunctionNode,
    ImportDirective, ModuleContext, ModuleOptions, ParameterNode, PropertyDescriptor,
    PropertyNode, ResolvedType, SourceId, SourceSpan, SymbolTable, SyntaxFile, TypeRefNode,
    ValueArgument, ValueParameterDescriptor,
};

pub const APP_PATH: &str = "src/main/kotlin/app/Bindings.kt";

pub fn span(line: usize) -> SourceSpan {
    SourceSpan::new(line, 1, line, 40)
}

pub fn class_literal(name: &str) -> ArgumentExpr {
    ArgumentExpr::ClassLiteral(TypeRefNode::simple(name))
}

pub fn entry(name: &str, arguments: Vec<ValueArgument>, line: usize) -> AnnotationEntry {
    let mut entry = AnnotationEntry::new(name, arguments);
    entry.span = span(line);
    entry
}

pub fn kclass() -> ResolvedType {
    ResolvedType::generic("kotlin.reflect.KClass", vec![ResolvedType::Star])
}

pub fn annotation_class(
    package: &str,
    name: &str,
    parameters: Vec<(&str, ResolvedType)>,
) -> ClassDescriptor {
    let mut descriptor = ClassDescriptor::new(package, name, ClassKind::AnnotationClass);
    descriptor.constructors.push(FunctionDescriptor::constructor(
        parameters
            .into_iter()
            .map(|(name, ty)| ValueParameterDescriptor::new(name, ty))
            .collect(),
    ));
    descriptor
}

fn marked(mut descriptor: ClassDescriptor, marker: &str) -> ClassDescriptor {
    descriptor
        .annotations
        .push(AnnotationDescriptor::new(marker, Vec::new()));
    descriptor
}

/// Builtins plus the annotation library and scope markers the fixtures refer to.
pub fn library_symbols() -> SymbolTable {
    let mut symbols = SymbolTable::with_builtins();

    let mut kclass_descriptor = ClassDescriptor::new("kotlin.reflect", "KClass", ClassKind::Interface);
    kclass_descriptor.type_parameters = vec!["T".to_string()];
    symbols.insert(kclass_descriptor);

    for name in ["ContributesBinding", "ContributesMultibinding"] {
        symbols.insert(annotation_class(
            "weld.annotations",
            name,
            vec![
                ("scope", kclass()),
                ("boundType", kclass()),
                ("replaces", ResolvedType::generic("kotlin.Array", vec![kclass()])),
            ],
        ));
    }
    for (package, name) in [
        ("weld.annotations", "MergeComponent"),
        ("weld.annotations", "MergeSubcomponent"),
        ("weld.annotations.compat", "MergeInterfaces"),
        ("weld.annotations.compat", "MergeModules"),
    ] {
        symbols.insert(annotation_class(package, name, vec![("scope", kclass())]));
    }

    symbols.insert(annotation_class("javax.inject", "Qualifier", Vec::new()));
    symbols.insert(annotation_class("javax.inject", "Scope", Vec::new()));
    symbols.insert(annotation_class("dagger", "MapKey", Vec::new()));
    symbols.insert(marked(
        annotation_class(
            "javax.inject",
            "Named",
            vec![("value", ResolvedType::class("kotlin.String"))],
        ),
        "javax.inject.Qualifier",
    ));
    symbols.insert(marked(
        annotation_class("javax.inject", "Singleton", Vec::new()),
        "javax.inject.Scope",
    ));
    symbols.insert(marked(
        annotation_class(
            "dagger.multibindings",
            "StringKey",
            vec![("value", ResolvedType::class("kotlin.String"))],
        ),
        "dagger.MapKey",
    ));

    symbols.insert(ClassDescriptor::new(
        "kotlin.annotation",
        "AnnotationRetention",
        ClassKind::EnumClass,
    ));
    symbols.insert(annotation_class(
        "kotlin.annotation",
        "Retention",
        vec![(
            "value",
            ResolvedType::class("kotlin.annotation.AnnotationRetention"),
        )],
    ));

    symbols.insert(ClassDescriptor::new("app.scopes", "AppScope", ClassKind::Class));
    symbols.insert(ClassDescriptor::new("app.scopes", "UserScope", ClassKind::Class));
    symbols
}

fn located<T>(mut node: T, line: usize, set: impl FnOnce(&mut T, SourceSpan)) -> T {
    set(&mut node, span(line));
    node
}

/// `package app` with
///
/// ```text
/// abstract class Base<T> {
///   val current: T?
///   fun bind(value: T, listener: (T) -> Unit, @Named("base") tag: String): T
/// }
/// abstract class Middle<S> : Base<List<S>>()
/// class Impl : Middle<String>()
/// interface Repository
/// @ContributesBinding(scope = AppScope::class, boundType = Repository::class)
/// class RealRepository : Repository
/// ```
pub fn app_file() -> SyntaxFile {
    let mut file = SyntaxFile::new(SourceId(0), APP_PATH, "app");
    file.imports = vec![
        ImportDirective::new("weld.annotations.ContributesBinding"),
        ImportDirective::new("weld.annotations.ContributesMultibinding"),
        ImportDirective::aliased("weld.annotations.MergeComponent", "Merge"),
        ImportDirective::star("app.scopes"),
        ImportDirective::new("javax.inject.Named"),
        ImportDirective::new("javax.inject.Singleton"),
        ImportDirective::new("dagger.multibindings.StringKey"),
    ];

    let mut base = located(ClassNode::new("Base", ClassKind::Class), 10, |node, span| {
        node.span = span
    });
    base.is_abstract = true;
    base.type_parameters = vec!["T".to_string()];
    base.properties.push(located(
        PropertyNode::new("current", TypeRefNode::simple("T").nullable()),
        11,
        |node, span| node.span = span,
    ));
    let mut tag = ParameterNode::new("tag", TypeRefNode::simple("String"));
    tag.annotations.push(entry(
        "Named",
        vec![ValueArgument::positional(ArgumentExpr::String(
            "base".to_string(),
        ))],
        12,
    ));
    let mut bind = located(
        FunctionNode::new(
            "bind",
            vec![
                located(
                    ParameterNode::new("value", TypeRefNode::simple("T")),
                    12,
                    |node, span| node.span = span,
                ),
                ParameterNode::new(
                    "listener",
                    TypeRefNode::lambda(vec![TypeRefNode::simple("T")], TypeRefNode::simple("Unit")),
                ),
                tag,
            ],
        ),
        12,
        |node, span| node.span = span,
    );
    bind.return_type = Some(TypeRefNode::simple("T"));
    base.functions.push(bind);

    let mut middle = ClassNode::new("Middle", ClassKind::Class);
    middle.is_abstract = true;
    middle.type_parameters = vec!["S".to_string()];
    middle.super_types.push(TypeRefNode::generic(
        "Base",
        vec![TypeRefNode::generic("List", vec![TypeRefNode::simple("S")])],
    ));

    let mut implementation = located(ClassNode::new("Impl", ClassKind::Class), 20, |node, span| {
        node.span = span
    });
    implementation.super_types.push(TypeRefNode::generic(
        "Middle",
        vec![TypeRefNode::simple("String")],
    ));

    let repository = ClassNode::new("Repository", ClassKind::Interface);

    let mut real_repository = located(
        ClassNode::new("RealRepository", ClassKind::Class),
        31,
        |node, span| node.span = span,
    );
    real_repository
        .super_types
        .push(TypeRefNode::simple("Repository"));
    real_repository.annotations.push(entry(
        "ContributesBinding",
        vec![
            ValueArgument::named("scope", class_literal("AppScope")),
            ValueArgument::named("boundType", class_literal("Repository")),
        ],
        30,
    ));

    file.classes = vec![base, middle, implementation, repository, real_repository];
    file
}

/// Symbol-front-end descriptors equivalent to the generic classes of [`app_file`].
pub fn app_descriptors() -> Vec<ClassDescriptor> {
    let mut base = ClassDescriptor::new("app", "Base", ClassKind::Class);
    base.is_abstract = true;
    base.type_parameters = vec!["T".to_string()];
    base.properties.push(PropertyDescriptor::new(
        "current",
        ResolvedType::type_parameter("T").nullable(),
    ));
    let mut tag = ValueParameterDescriptor::new("tag", ResolvedType::class("kotlin.String"));
    tag.annotations.push(AnnotationDescriptor::new(
        "javax.inject.Named",
        vec![ConstantArgument::new(
            "value",
            ConstantValue::String("base".to_string()),
        )],
    ));
    let mut bind = FunctionDescriptor::new(
        "bind",
        vec![
            ValueParameterDescriptor::new("value", ResolvedType::type_parameter("T")),
            ValueParameterDescriptor::new(
                "listener",
                ResolvedType::function(
                    vec![ResolvedType::type_parameter("T")],
                    ResolvedType::class("kotlin.Unit"),
                ),
            ),
            tag,
        ],
    );
    bind.return_type = Some(ResolvedType::type_parameter("T"));
    base.functions.push(bind);

    let mut middle = ClassDescriptor::new("app", "Middle", ClassKind::Class);
    middle.is_abstract = true;
    middle.type_parameters = vec!["S".to_string()];
    middle.super_types.push(ResolvedType::generic(
        "app.Base",
        vec![ResolvedType::generic(
            "kotlin.collections.List",
            vec![ResolvedType::type_parameter("S")],
        )],
    ));

    let mut implementation = ClassDescriptor::new("app", "Impl", ClassKind::Class);
    implementation
        .super_types
        .push(ResolvedType::generic("app.Middle", vec![ResolvedType::class("kotlin.String")]));

    vec![base, middle, implementation]
}

pub fn module_with(options: ModuleOptions, files: Vec<SyntaxFile>, symbols: SymbolTable) -> ModuleContext {
    ModuleContext::new(options, files, symbols)
}

/// The application file compiled against the library symbols.
pub fn app_module() -> ModuleContext {
    module_with(ModuleOptions::default(), vec![app_file()], library_symbols())
}

/// The application file plus symbol descriptors for the same classes, so both variants of each
/// generic class are available.
pub fn mirrored_module() -> ModuleContext {
    let mut symbols = library_symbols();
    for descriptor in app_descriptors() {
        symbols.insert(descriptor);
    }
    module_with(ModuleOptions::default(), vec![app_file()], symbols)
}

/// A file in package `app` containing only `classes`, with the same imports as [`app_file`].
pub fn file_with(path: &str, classes: Vec<ClassNode>) -> SyntaxFile {
    let mut file = app_file();
    file.path = path.into();
    file.id = SourceId(1);
    file.classes = classes;
    file
}

pub fn class<'m>(module: &'m ModuleContext, fq_name: &str) -> ClassReference<'m> {
    module
        .class_reference(&FqName::new(fq_name))
        .unwrap_or_else(|error| panic!("{fq_name} should resolve: {error}"))
}

pub fn syntax_class<'m>(module: &'m ModuleContext, fq_name: &str) -> ClassReference<'m> {
    module
        .syntax_class_reference_or_null(&FqName::new(fq_name))
        .unwrap_or_else(|| panic!("{fq_name} should have a syntax declaration"))
}

pub fn symbol_class<'m>(module: &'m ModuleContext, fq_name: &str) -> ClassReference<'m> {
    module
        .symbol_class_reference_or_null(&FqName::new(fq_name))
        .unwrap_or_else(|| panic!("{fq_name} should have a descriptor"))
}
