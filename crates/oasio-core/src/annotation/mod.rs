//! Annotation facade: read-only annotation instances, their targets, and
//! lookup over an indexed class graph.

mod index;
pub mod names;

use indexmap::IndexMap;

pub use index::{ClassIndex, ClassInfo, FieldInfo, MethodInfo, MethodParameterInfo};

/// Primitive Java types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
}

/// A resolved Java type as seen by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Primitive(Primitive),
    Class(String),
    Parameterized {
        raw: String,
        arguments: Vec<TypeRef>,
    },
    Array(Box<TypeRef>),
    Void,
}

impl TypeRef {
    pub fn class(name: impl Into<String>) -> Self {
        TypeRef::Class(name.into())
    }

    pub fn parameterized(raw: impl Into<String>, arguments: Vec<TypeRef>) -> Self {
        TypeRef::Parameterized {
            raw: raw.into(),
            arguments,
        }
    }

    pub fn array(component: TypeRef) -> Self {
        TypeRef::Array(Box::new(component))
    }

    /// Fully-qualified raw class name, for class and parameterized types.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            TypeRef::Class(name) | TypeRef::Parameterized { raw: name, .. } => Some(name),
            _ => None,
        }
    }

    /// Class name without its package or enclosing class.
    pub fn simple_name(&self) -> Option<&str> {
        self.class_name()
            .map(|name| name.rsplit(['.', '$']).next().unwrap_or(name))
    }

    pub fn arguments(&self) -> &[TypeRef] {
        match self {
            TypeRef::Parameterized { arguments, .. } => arguments,
            _ => &[],
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(
            self.class_name(),
            Some(
                "java.util.Optional"
                    | "java.util.OptionalInt"
                    | "java.util.OptionalLong"
                    | "java.util.OptionalDouble"
            )
        )
    }

    /// Type wrapped by an `Optional`, or `self` for anything else.
    pub fn unwrap_optional(&self) -> TypeRef {
        match self.class_name() {
            Some("java.util.OptionalInt") => TypeRef::Primitive(Primitive::Int),
            Some("java.util.OptionalLong") => TypeRef::Primitive(Primitive::Long),
            Some("java.util.OptionalDouble") => TypeRef::Primitive(Primitive::Double),
            Some("java.util.Optional") => self
                .arguments()
                .first()
                .cloned()
                .unwrap_or_else(|| TypeRef::class("java.lang.Object")),
            _ => self.clone(),
        }
    }
}

/// A literal carried by an annotation member.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// Enum constant name, e.g. `PATH`.
    Enum(String),
    Class(TypeRef),
    Nested(AnnotationInstance),
    Array(Vec<AnnotationValue>),
}

impl From<&str> for AnnotationValue {
    fn from(value: &str) -> Self {
        AnnotationValue::String(value.to_string())
    }
}

impl From<String> for AnnotationValue {
    fn from(value: String) -> Self {
        AnnotationValue::String(value)
    }
}

impl From<bool> for AnnotationValue {
    fn from(value: bool) -> Self {
        AnnotationValue::Boolean(value)
    }
}

impl From<i64> for AnnotationValue {
    fn from(value: i64) -> Self {
        AnnotationValue::Integer(value)
    }
}

impl From<f64> for AnnotationValue {
    fn from(value: f64) -> Self {
        AnnotationValue::Float(value)
    }
}

impl From<AnnotationInstance> for AnnotationValue {
    fn from(value: AnnotationInstance) -> Self {
        AnnotationValue::Nested(value)
    }
}

impl From<TypeRef> for AnnotationValue {
    fn from(value: TypeRef) -> Self {
        AnnotationValue::Class(value)
    }
}

impl From<Vec<AnnotationInstance>> for AnnotationValue {
    fn from(values: Vec<AnnotationInstance>) -> Self {
        AnnotationValue::Array(values.into_iter().map(AnnotationValue::Nested).collect())
    }
}

impl From<Vec<&str>> for AnnotationValue {
    fn from(values: Vec<&str>) -> Self {
        AnnotationValue::Array(values.into_iter().map(AnnotationValue::from).collect())
    }
}

/// Reference to a method by declaring class and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodRef {
    pub class: String,
    pub name: String,
}

impl MethodRef {
    pub fn new(class: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            name: name.into(),
        }
    }

    pub fn parameter(&self, position: usize) -> AnnotationTarget {
        AnnotationTarget::MethodParameter {
            method: self.clone(),
            position,
        }
    }
}

/// What an annotation decorates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnnotationTarget {
    Class(String),
    Field { class: String, name: String },
    Method(MethodRef),
    MethodParameter { method: MethodRef, position: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Class,
    Field,
    Method,
    MethodParameter,
}

impl AnnotationTarget {
    pub fn kind(&self) -> TargetKind {
        match self {
            AnnotationTarget::Class(_) => TargetKind::Class,
            AnnotationTarget::Field { .. } => TargetKind::Field,
            AnnotationTarget::Method(_) => TargetKind::Method,
            AnnotationTarget::MethodParameter { .. } => TargetKind::MethodParameter,
        }
    }

    /// Class declaring the target.
    pub fn class_name(&self) -> &str {
        match self {
            AnnotationTarget::Class(name) => name,
            AnnotationTarget::Field { class, .. } => class,
            AnnotationTarget::Method(method) => &method.class,
            AnnotationTarget::MethodParameter { method, .. } => &method.class,
        }
    }

    /// Method owning a method parameter target.
    pub fn parameter_method(&self) -> Option<&MethodRef> {
        match self {
            AnnotationTarget::MethodParameter { method, .. } => Some(method),
            _ => None,
        }
    }
}

impl std::fmt::Display for AnnotationTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnnotationTarget::Class(name) => write!(f, "{name}"),
            AnnotationTarget::Field { class, name } => write!(f, "{class}.{name}"),
            AnnotationTarget::Method(method) => write!(f, "{}#{}", method.class, method.name),
            AnnotationTarget::MethodParameter { method, position } => {
                write!(f, "{}#{}[{position}]", method.class, method.name)
            }
        }
    }
}

/// One occurrence of a source annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationInstance {
    pub name: String,
    pub target: Option<AnnotationTarget>,
    pub values: IndexMap<String, AnnotationValue>,
}

impl AnnotationInstance {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: None,
            values: IndexMap::new(),
        }
    }

    /// Add a member value.
    pub fn with(mut self, member: &str, value: impl Into<AnnotationValue>) -> Self {
        self.values.insert(member.to_string(), value.into());
        self
    }

    /// Add an enum-constant member value.
    pub fn with_enum(self, member: &str, constant: &str) -> Self {
        self.with(member, AnnotationValue::Enum(constant.to_string()))
    }

    pub fn on(mut self, target: AnnotationTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    pub fn value(&self, member: &str) -> Option<&AnnotationValue> {
        self.values.get(member)
    }

    pub fn string_value(&self, member: &str) -> Option<&str> {
        match self.value(member)? {
            AnnotationValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn bool_value(&self, member: &str) -> Option<bool> {
        match self.value(member)? {
            AnnotationValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn i64_value(&self, member: &str) -> Option<i64> {
        match self.value(member)? {
            AnnotationValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn f64_value(&self, member: &str) -> Option<f64> {
        match self.value(member)? {
            AnnotationValue::Float(f) => Some(*f),
            AnnotationValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn enum_value(&self, member: &str) -> Option<&str> {
        match self.value(member)? {
            AnnotationValue::Enum(constant) => Some(constant),
            _ => None,
        }
    }

    pub fn class_value(&self, member: &str) -> Option<&TypeRef> {
        match self.value(member)? {
            AnnotationValue::Class(ty) => Some(ty),
            _ => None,
        }
    }

    /// Array member of strings. A single string counts as a one-element array.
    pub fn string_array(&self, member: &str) -> Option<Vec<&str>> {
        match self.value(member)? {
            AnnotationValue::String(s) => Some(vec![s.as_str()]),
            AnnotationValue::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|item| match item {
                        AnnotationValue::String(s) => Some(s.as_str()),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn class_array(&self, member: &str) -> Option<Vec<&TypeRef>> {
        match self.value(member)? {
            AnnotationValue::Class(ty) => Some(vec![ty]),
            AnnotationValue::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|item| match item {
                        AnnotationValue::Class(ty) => Some(ty),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn nested(&self, member: &str) -> Option<&AnnotationInstance> {
        match self.value(member)? {
            AnnotationValue::Nested(nested) => Some(nested),
            _ => None,
        }
    }

    /// Array member of nested annotations; `None` when the member is absent.
    pub fn nested_array(&self, member: &str) -> Option<Vec<&AnnotationInstance>> {
        match self.value(member)? {
            AnnotationValue::Nested(nested) => Some(vec![nested]),
            AnnotationValue::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|item| match item {
                        AnnotationValue::Nested(nested) => Some(nested),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Copy of this annotation attached to `target`.
    pub fn retargeted(&self, target: Option<&AnnotationTarget>) -> AnnotationInstance {
        AnnotationInstance {
            target: target.cloned(),
            ..self.clone()
        }
    }
}

/// Lookup of annotations by target, supplied by the scanning layer.
pub trait AnnotationLookup {
    /// Annotations declared directly on `target`.
    fn annotations(&self, target: &AnnotationTarget) -> &[AnnotationInstance];

    fn get_annotation(&self, target: &AnnotationTarget, name: &str) -> Option<&AnnotationInstance> {
        self.annotations(target).iter().find(|a| a.is(name))
    }

    fn get_any_annotation(
        &self,
        target: &AnnotationTarget,
        names: &[&str],
    ) -> Option<&AnnotationInstance> {
        self.annotations(target)
            .iter()
            .find(|a| names.contains(&a.name.as_str()))
    }

    fn has_annotation(&self, target: &AnnotationTarget, name: &str) -> bool {
        self.get_annotation(target, name).is_some()
    }

    /// The bare annotation followed by the contents of its container, in order.
    fn get_repeatable_annotation(
        &self,
        target: &AnnotationTarget,
        name: &str,
        container: &str,
    ) -> Vec<AnnotationInstance> {
        let mut found: Vec<AnnotationInstance> = self
            .get_annotation(target, name)
            .into_iter()
            .cloned()
            .collect();
        if let Some(wrapper) = self.get_annotation(target, container) {
            let retarget = wrapper.target.as_ref();
            found.extend(
                wrapper
                    .nested_array("value")
                    .unwrap_or_default()
                    .into_iter()
                    .map(|nested| nested.retargeted(retarget)),
            );
        }
        found
    }
}
