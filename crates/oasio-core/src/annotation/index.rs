use std::collections::HashSet;

use indexmap::IndexMap;

use super::{AnnotationInstance, AnnotationLookup, AnnotationTarget, MethodRef, TypeRef};

/// In-memory class graph with annotations attached to their targets.
#[derive(Debug, Clone, Default)]
pub struct ClassIndex {
    classes: IndexMap<String, ClassInfo>,
}

/// An indexed class or interface.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassInfo {
    pub name: String,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    pub annotations: Vec<AnnotationInstance>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub name: String,
    pub ty: TypeRef,
    pub annotations: Vec<AnnotationInstance>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
    pub name: String,
    pub parameters: Vec<MethodParameterInfo>,
    pub return_type: TypeRef,
    pub annotations: Vec<AnnotationInstance>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodParameterInfo {
    /// Source name, when compiled with parameter names.
    pub name: Option<String>,
    pub ty: TypeRef,
    pub annotations: Vec<AnnotationInstance>,
}

impl ClassInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            superclass: None,
            interfaces: Vec::new(),
            annotations: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn annotation(mut self, annotation: AnnotationInstance) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn field(mut self, field: FieldInfo) -> Self {
        self.fields.push(field);
        self
    }

    pub fn method(mut self, method: MethodInfo) -> Self {
        self.methods.push(method);
        self
    }

    pub fn find_field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn find_method(&self, name: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|m| m.name == name)
    }
}

impl FieldInfo {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            annotations: Vec::new(),
        }
    }

    pub fn annotation(mut self, annotation: AnnotationInstance) -> Self {
        self.annotations.push(annotation);
        self
    }
}

impl MethodInfo {
    pub fn new(name: impl Into<String>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_type,
            annotations: Vec::new(),
        }
    }

    pub fn parameter(mut self, parameter: MethodParameterInfo) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn annotation(mut self, annotation: AnnotationInstance) -> Self {
        self.annotations.push(annotation);
        self
    }
}

impl MethodParameterInfo {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: Some(name.into()),
            ty,
            annotations: Vec::new(),
        }
    }

    pub fn unnamed(ty: TypeRef) -> Self {
        Self {
            name: None,
            ty,
            annotations: Vec::new(),
        }
    }

    pub fn annotation(mut self, annotation: AnnotationInstance) -> Self {
        self.annotations.push(annotation);
        self
    }
}

fn attach(annotations: &mut [AnnotationInstance], target: &AnnotationTarget) {
    for annotation in annotations {
        annotation.target = Some(target.clone());
    }
}

impl ClassIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a class, attaching every declared annotation to its target.
    pub fn add(&mut self, mut class: ClassInfo) {
        let name = class.name.clone();
        attach(&mut class.annotations, &AnnotationTarget::Class(name.clone()));
        for field in &mut class.fields {
            let target = AnnotationTarget::Field {
                class: name.clone(),
                name: field.name.clone(),
            };
            attach(&mut field.annotations, &target);
        }
        for method in &mut class.methods {
            let method_ref = MethodRef::new(name.clone(), method.name.clone());
            attach(&mut method.annotations, &AnnotationTarget::Method(method_ref.clone()));
            for (position, parameter) in method.parameters.iter_mut().enumerate() {
                attach(&mut parameter.annotations, &method_ref.parameter(position));
            }
        }
        self.classes.insert(name, class);
    }

    pub fn with(mut self, class: ClassInfo) -> Self {
        self.add(class);
        self
    }

    pub fn class(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.get(name)
    }

    pub fn method(&self, method: &MethodRef) -> Option<&MethodInfo> {
        self.class(&method.class)?.find_method(&method.name)
    }

    pub fn field(&self, class: &str, name: &str) -> Option<&FieldInfo> {
        self.class(class)?.find_field(name)
    }

    pub fn method_parameter(
        &self,
        method: &MethodRef,
        position: usize,
    ) -> Option<&MethodParameterInfo> {
        self.method(method)?.parameters.get(position)
    }

    /// The class followed by its indexed superclasses, nearest first.
    pub fn inheritance_chain(&self, name: &str) -> Vec<&ClassInfo> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut next = self.class(name);
        while let Some(class) = next {
            if !seen.insert(class.name.as_str()) {
                break;
            }
            chain.push(class);
            next = class.superclass.as_deref().and_then(|s| self.class(s));
        }
        chain
    }

    /// Directly implemented interfaces that are indexed.
    pub fn interfaces(&self, class: &ClassInfo) -> Vec<&ClassInfo> {
        class
            .interfaces
            .iter()
            .filter_map(|name| self.class(name))
            .collect()
    }

    /// Every annotation declared in a class: on the class, its fields, its
    /// methods and their parameters.
    pub fn all_annotations(&self, name: &str) -> Vec<&AnnotationInstance> {
        let Some(class) = self.class(name) else {
            return Vec::new();
        };
        let mut all: Vec<&AnnotationInstance> = class.annotations.iter().collect();
        for field in &class.fields {
            all.extend(field.annotations.iter());
        }
        for method in &class.methods {
            all.extend(method.annotations.iter());
            for parameter in &method.parameters {
                all.extend(parameter.annotations.iter());
            }
        }
        all
    }

    /// Annotations on a method followed by those on its parameters.
    pub fn method_and_parameter_annotations(&self, method: &MethodRef) -> Vec<&AnnotationInstance> {
        let Some(info) = self.method(method) else {
            return Vec::new();
        };
        let mut all: Vec<&AnnotationInstance> = info.annotations.iter().collect();
        for parameter in &info.parameters {
            all.extend(parameter.annotations.iter());
        }
        all
    }

    /// Methods overridden by `method` in superclasses and interfaces, most
    /// distant ancestor first. Matching is by name and arity.
    pub fn overridden_methods(&self, method: &MethodRef) -> Vec<MethodRef> {
        let Some(info) = self.method(method) else {
            return Vec::new();
        };
        let arity = info.parameters.len();
        let mut found = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut pending: Vec<&ClassInfo> = Vec::new();
        if let Some(class) = self.class(&method.class) {
            seen.insert(class.name.as_str());
            pending.extend(class.superclass.as_deref().and_then(|s| self.class(s)));
            pending.extend(self.interfaces(class));
        }
        while !pending.is_empty() {
            let class = pending.remove(0);
            if !seen.insert(class.name.as_str()) {
                continue;
            }
            if class
                .methods
                .iter()
                .any(|m| m.name == method.name && m.parameters.len() == arity)
            {
                found.push(MethodRef::new(class.name.clone(), method.name.clone()));
            }
            pending.extend(class.superclass.as_deref().and_then(|s| self.class(s)));
            pending.extend(self.interfaces(class));
        }
        found.reverse();
        found
    }
}

impl AnnotationLookup for ClassIndex {
    fn annotations(&self, target: &AnnotationTarget) -> &[AnnotationInstance] {
        let found = match target {
            AnnotationTarget::Class(name) => self.class(name).map(|c| c.annotations.as_slice()),
            AnnotationTarget::Field { class, name } => {
                self.field(class, name).map(|f| f.annotations.as_slice())
            }
            AnnotationTarget::Method(method) => {
                self.method(method).map(|m| m.annotations.as_slice())
            }
            AnnotationTarget::MethodParameter { method, position } => self
                .method_parameter(method, *position)
                .map(|p| p.annotations.as_slice()),
        };
        found.unwrap_or(&[])
    }
}
