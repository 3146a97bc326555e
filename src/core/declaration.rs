//! Class declaration records handed to rules.
//!
//! These are plain data: the PHP scanner builds them from source text and the
//! rewriter applies decisions back onto the text. Rules only read them.

use super::names::QualifiedName;

/// Canonical name of PHPUnit's class coverage attribute.
pub const COVERS_CLASS: &str = "PHPUnit\\Framework\\Attributes\\CoversClass";

/// Canonical name of PHPUnit's method coverage attribute.
pub const COVERS_METHOD: &str = "PHPUnit\\Framework\\Attributes\\CoversMethod";

/// One argument of an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationArg {
    /// `Foo\Bar::class`, resolved against the file's namespace and imports.
    ClassRef(QualifiedName),
    /// A string literal, unquoted.
    Str(String),
    /// Any other expression, kept verbatim.
    Other(String),
}

impl AnnotationArg {
    pub fn as_class_ref(&self) -> Option<&QualifiedName> {
        match self {
            AnnotationArg::ClassRef(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationArg::Str(value) => Some(value),
            _ => None,
        }
    }
}

/// A single attribute use, e.g. `CoversClass(Foo::class)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationUse {
    /// Canonical (import-resolved) attribute class name.
    pub kind: QualifiedName,
    pub args: Vec<AnnotationArg>,
}

impl AnnotationUse {
    pub fn new(kind: QualifiedName, args: Vec<AnnotationArg>) -> Self {
        Self { kind, args }
    }

    /// `CoversClass(<class>::class)`
    pub fn covers_class(class: &QualifiedName) -> Self {
        Self::new(
            QualifiedName::parse(COVERS_CLASS),
            vec![AnnotationArg::ClassRef(class.clone())],
        )
    }

    /// `CoversMethod(<class>::class, '<method>')`
    pub fn covers_method(class: &QualifiedName, method: &str) -> Self {
        Self::new(
            QualifiedName::parse(COVERS_METHOD),
            vec![
                AnnotationArg::ClassRef(class.clone()),
                AnnotationArg::Str(method.to_string()),
            ],
        )
    }

    pub fn is_kind(&self, canonical: &str) -> bool {
        self.kind == QualifiedName::parse(canonical)
    }

    pub fn first_arg(&self) -> Option<&AnnotationArg> {
        self.args.first()
    }
}

/// One `#[...]` block. PHP allows several attributes per group.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnnotationGroup {
    pub annotations: Vec<AnnotationUse>,
}

impl AnnotationGroup {
    pub fn new(annotations: Vec<AnnotationUse>) -> Self {
        Self { annotations }
    }

    pub fn single(annotation: AnnotationUse) -> Self {
        Self {
            annotations: vec![annotation],
        }
    }
}

/// A named class declaration as seen by rules.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassDeclaration {
    /// Short class name. `None` when the scanner could not resolve one.
    pub simple_name: Option<String>,
    /// Enclosing namespace. The global namespace is `Some(QualifiedName::root())`.
    pub namespace: Option<QualifiedName>,
    pub annotation_groups: Vec<AnnotationGroup>,
}

impl ClassDeclaration {
    pub fn new(
        simple_name: impl Into<String>,
        namespace: QualifiedName,
        annotation_groups: Vec<AnnotationGroup>,
    ) -> Self {
        Self {
            simple_name: Some(simple_name.into()),
            namespace: Some(namespace),
            annotation_groups,
        }
    }

    /// Fully qualified class name (namespace + simple name).
    pub fn full_name(&self) -> Option<QualifiedName> {
        let name = self.simple_name.as_deref()?;
        let namespace = self.namespace.as_ref()?;
        Some(namespace.join(name))
    }

    /// All attribute uses across every group, in source order.
    pub fn annotations(&self) -> impl Iterator<Item = &AnnotationUse> {
        self.annotation_groups
            .iter()
            .flat_map(|group| group.annotations.iter())
    }
}
