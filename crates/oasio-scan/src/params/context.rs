use oasio_core::annotation::{AnnotationTarget, TargetKind, TypeRef};
use oasio_core::model::{In, Parameter, Style};
use serde_json::Value;

use crate::jaxrs::FrameworkParameter;

/// One logical parameter being assembled from framework and OpenAPI
/// annotations during a single scan pass.
#[derive(Debug, Clone, Default)]
pub(crate) struct ParameterContext {
    pub name: Option<String>,
    pub location: Option<In>,
    pub style: Option<Style>,
    pub oai_param: Option<Parameter>,
    pub framework: Option<FrameworkParameter>,
    pub default_value: Option<Value>,
    pub target: Option<AnnotationTarget>,
    pub target_type: Option<TypeRef>,
}

impl ParameterContext {
    /// Key under which this context is currently found. Computed from the
    /// live fields, so renaming a context re-keys it.
    pub fn key(&self) -> ParameterKey {
        match self.oai_param.as_ref().and_then(|p| p.reference.clone()) {
            Some(reference) => ParameterKey::Reference(reference),
            None => ParameterKey::named(self.name.clone(), self.location, self.style),
        }
    }

    /// Whether `target` is the element this context was read from. A method
    /// target also claims the contexts of its own parameters.
    pub fn has_same_target(&self, target: &AnnotationTarget, name: Option<&str>) -> bool {
        let Some(own) = self.target.as_ref() else {
            return false;
        };
        let name_matches = match (self.name.as_deref(), name) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        };
        if own == target {
            return name_matches || target.kind() != TargetKind::Method;
        }
        if name_matches
            && target.kind() == TargetKind::Method
            && let AnnotationTarget::MethodParameter { method, .. } = own
        {
            return *target == AnnotationTarget::Method(method.clone());
        }
        false
    }
}

/// Identity of a parameter within one scan pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParameterKey {
    /// `@Parameter(ref = ...)`; equal only to the same reference.
    Reference(String),
    Named {
        name: Option<String>,
        location: Option<In>,
        style: Option<Style>,
    },
    /// Nothing to key on. Never equal to any key, itself included.
    Unkeyed,
}

impl ParameterKey {
    pub fn named(name: Option<String>, location: Option<In>, style: Option<Style>) -> Self {
        if name.is_none() && location.is_none() && style.is_none() {
            ParameterKey::Unkeyed
        } else {
            ParameterKey::Named {
                name,
                location,
                style,
            }
        }
    }

    /// Key of an OpenAPI parameter; the style defaults from the location.
    pub fn of_parameter(param: &Parameter) -> Self {
        match &param.reference {
            Some(reference) => ParameterKey::Reference(reference.clone()),
            None => ParameterKey::named(
                param.name.clone(),
                param.location,
                param.style.or(param.location.map(Style::default_for)),
            ),
        }
    }

    pub fn matches(&self, other: &ParameterKey) -> bool {
        !matches!(self, ParameterKey::Unkeyed) && self == other
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            ParameterKey::Named { name, .. } => name.as_deref(),
            _ => None,
        }
    }

    pub fn location(&self) -> Option<In> {
        match self {
            ParameterKey::Named { location, .. } => *location,
            _ => None,
        }
    }

    pub fn style(&self) -> Option<Style> {
        match self {
            ParameterKey::Named { style, .. } => *style,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oasio_core::annotation::MethodRef;

    #[test]
    fn test_unkeyed_never_matches() {
        let unkeyed = ParameterKey::named(None, None, None);
        assert_eq!(unkeyed, ParameterKey::Unkeyed);
        assert!(!unkeyed.matches(&ParameterKey::Unkeyed));

        let query = ParameterKey::named(Some("q".into()), Some(In::Query), Some(Style::Form));
        assert!(query.matches(&query.clone()));
    }

    #[test]
    fn test_parameter_key_defaults_style() {
        let param = Parameter {
            name: Some("q".into()),
            location: Some(In::Query),
            ..Parameter::default()
        };
        assert_eq!(
            ParameterKey::of_parameter(&param),
            ParameterKey::named(Some("q".into()), Some(In::Query), Some(Style::Form))
        );
        let reference = Parameter {
            reference: Some("#/components/parameters/Trace".into()),
            ..param
        };
        assert!(matches!(ParameterKey::of_parameter(&reference), ParameterKey::Reference(_)));
    }

    #[test]
    fn test_method_target_claims_its_parameters() {
        let method = MethodRef::new("api.Items", "get");
        let context = ParameterContext {
            name: Some("id".into()),
            target: Some(method.parameter(0)),
            ..ParameterContext::default()
        };
        let on_method = AnnotationTarget::Method(method.clone());
        assert!(context.has_same_target(&on_method, Some("id")));
        assert!(!context.has_same_target(&on_method, Some("other")));
        assert!(context.has_same_target(&method.parameter(0), Some("renamed")));
    }
}
