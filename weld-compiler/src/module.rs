use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use crate::error::{CompilationError, CompilationResult};
use crate::names::FqName;
use crate::options::ModuleOptions;
use crate::reference::{ClassData, ClassKey, ClassReference, ClassSource, SyntaxClassKey};
use crate::symbols::SymbolTable;
use crate::syntax::{ClassNode, SyntaxFile};

/// How often each memoized collection was computed. Apart from `type_scopes`, every counter
/// grows at most once per reference, however often the accessor is called.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionCounts {
    pub class_references: usize,
    pub super_types: usize,
    pub functions: usize,
    pub constructors: usize,
    pub properties: usize,
    pub parameters: usize,
    pub annotations: usize,
    pub annotation_arguments: usize,
    /// Import scopes built for resolving syntax type usages.
    pub type_scopes: usize,
}

/// One compilation module: both front-end inputs plus every cache derived from them. Caches are
/// write-once and live exactly as long as the module. Hosts compiling several modules at the
/// same time create one context per module.
pub struct ModuleContext {
    options: ModuleOptions,
    files: Vec<SyntaxFile>,
    symbols: SymbolTable,
    syntax_index: HashMap<FqName, SyntaxClassKey>,
    syntax_order: Vec<SyntaxClassKey>,
    class_cache: RefCell<HashMap<ClassKey, Rc<ClassData>>>,
    counts: Cell<ResolutionCounts>,
}

impl ModuleContext {
    pub fn new(options: ModuleOptions, files: Vec<SyntaxFile>, symbols: SymbolTable) -> Self {
        let mut syntax_index = HashMap::new();
        let mut syntax_order = Vec::new();
        for (file_index, file) in files.iter().enumerate() {
            for (class_index, class) in file.classes.iter().enumerate() {
                index_class(
                    &mut syntax_index,
                    &mut syntax_order,
                    file_index,
                    vec![class_index],
                    &file.package,
                    class,
                );
            }
        }
        debug!(
            module = %options.module_name,
            files = files.len(),
            syntax_classes = syntax_order.len(),
            descriptors = symbols.len(),
            "created module context"
        );

        Self {
            options,
            files,
            symbols,
            syntax_index,
            syntax_order,
            class_cache: RefCell::new(HashMap::new()),
            counts: Cell::new(ResolutionCounts::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.options.module_name
    }

    pub fn options(&self) -> &ModuleOptions {
        &self.options
    }

    pub fn files(&self) -> &[SyntaxFile] {
        &self.files
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn resolution_counts(&self) -> ResolutionCounts {
        self.counts.get()
    }

    pub(crate) fn record(&self, update: impl FnOnce(&mut ResolutionCounts)) {
        let mut counts = self.counts.get();
        update(&mut counts);
        self.counts.set(counts);
    }

    pub fn class_exists(&self, fq_name: &FqName) -> bool {
        self.syntax_index.contains_key(fq_name) || self.symbols.contains(fq_name)
    }

    /// Looks up a class by name, preferring a declaration in this module's sources over a
    /// descriptor.
    pub fn class_reference_or_null(&self, fq_name: &FqName) -> Option<ClassReference<'_>> {
        self.syntax_class_reference_or_null(fq_name)
            .or_else(|| self.symbol_class_reference_or_null(fq_name))
    }

    pub fn class_reference(&self, fq_name: &FqName) -> CompilationResult<ClassReference<'_>> {
        self.class_reference_or_null(fq_name)
            .ok_or_else(|| CompilationError::new(format!("Couldn't resolve class {fq_name}.")))
    }

    pub fn syntax_class_reference_or_null(&self, fq_name: &FqName) -> Option<ClassReference<'_>> {
        let key = self.syntax_index.get(fq_name)?.clone();
        self.class_for_key(ClassKey::Syntax(key), fq_name)
    }

    pub fn symbol_class_reference_or_null(&self, fq_name: &FqName) -> Option<ClassReference<'_>> {
        if !self.symbols.contains(fq_name) {
            return None;
        }
        self.class_for_key(ClassKey::Symbol(fq_name.clone()), fq_name)
    }

    /// Every class declared in the module's sources, nested classes included, in declaration
    /// order.
    pub fn syntax_classes(&self) -> impl Iterator<Item = ClassReference<'_>> + '_ {
        self.syntax_order.iter().filter_map(|key| {
            let (_, chain) = self.syntax_chain(key)?;
            let (fq_name, _) = chain.last()?;
            self.class_for_key(ClassKey::Syntax(key.clone()), fq_name)
        })
    }

    pub(crate) fn class_for_key(&self, key: ClassKey, fq_name: &FqName) -> Option<ClassReference<'_>> {
        let source = self.class_source(&key)?;
        let data = self
            .class_cache
            .borrow_mut()
            .entry(key)
            .or_insert_with_key(|key| {
                self.record(|counts| counts.class_references += 1);
                debug!(class = %fq_name, syntax = matches!(key, ClassKey::Syntax(_)), "created class reference");
                Rc::new(ClassData::new(fq_name.clone(), key.clone()))
            })
            .clone();
        Some(ClassReference::new(self, data, source))
    }

    fn class_source(&self, key: &ClassKey) -> Option<ClassSource<'_>> {
        match key {
            ClassKey::Syntax(key) => {
                let file = self.files.get(key.file)?;
                let node = class_at(&file.classes, &key.path)?;
                Some(ClassSource::Syntax { file, node })
            }
            ClassKey::Symbol(fq_name) => self.symbols.get(fq_name).map(ClassSource::Symbol),
        }
    }

    /// The file of a syntax class and the classes enclosing it, outermost first, ending with
    /// the class itself.
    pub(crate) fn syntax_chain(
        &self,
        key: &SyntaxClassKey,
    ) -> Option<(&SyntaxFile, Vec<(FqName, &ClassNode)>)> {
        let file = self.files.get(key.file)?;
        let mut chain = Vec::with_capacity(key.path.len());
        let mut fq_name = file.package.clone();
        let mut classes = &file.classes;
        for &index in &key.path {
            let node = classes.get(index)?;
            fq_name = fq_name.child(&node.name);
            chain.push((fq_name.clone(), node));
            classes = &node.nested;
        }
        Some((file, chain))
    }
}

fn class_at<'a>(classes: &'a [ClassNode], path: &[usize]) -> Option<&'a ClassNode> {
    let (first, rest) = path.split_first()?;
    let node = classes.get(*first)?;
    if rest.is_empty() {
        Some(node)
    } else {
        class_at(&node.nested, rest)
    }
}

fn index_class(
    index: &mut HashMap<FqName, SyntaxClassKey>,
    order: &mut Vec<SyntaxClassKey>,
    file: usize,
    path: Vec<usize>,
    parent: &FqName,
    class: &ClassNode,
) {
    let fq_name = parent.child(&class.name);
    let key = SyntaxClassKey {
        file,
        path: path.clone(),
    };
    if index.contains_key(&fq_name) {
        debug!(class = %fq_name, "ignoring redeclared class");
    } else {
        index.insert(fq_name.clone(), key.clone());
        order.push(key);
    }

    for (nested_index, nested) in class.nested.iter().enumerate() {
        let mut nested_path = path.clone();
        nested_path.push(nested_index);
        index_class(index, order, file, nested_path, &fq_name, nested);
    }
}
