//! JAX-RS annotations and the parameter kinds they declare.
//!
//! Every JAX-RS name is recognised in both the `javax.ws.rs` and the
//! `jakarta.ws.rs` namespace. RESTEasy and RESTEasy Reactive parameter
//! annotations map onto the same kinds.

use oasio_core::annotation::{
    AnnotationInstance, AnnotationLookup, AnnotationTarget, ClassIndex, MethodRef, Primitive,
    TargetKind, TypeRef,
};
use oasio_core::model::{HttpMethod, In, Style};

const NAMESPACES: [&str; 2] = ["javax.ws.rs.", "jakarta.ws.rs."];

macro_rules! jaxrs_names {
    ($($name:ident => $simple:literal),+ $(,)?) => {
        $(pub const $name: [&str; 2] = [
            concat!("javax.ws.rs.", $simple),
            concat!("jakarta.ws.rs.", $simple),
        ];)+
    };
}

jaxrs_names! {
    PATH => "Path",
    CONSUMES => "Consumes",
    PRODUCES => "Produces",
    DEFAULT_VALUE => "DefaultValue",
    PATH_SEGMENT => "core.PathSegment",
}

pub const PART_TYPE: [&str; 2] = [
    "org.jboss.resteasy.annotations.providers.multipart.PartType",
    "org.jboss.resteasy.reactive.PartType",
];

pub const APPLICATION_FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// How a framework annotation binds a request value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameworkParameter {
    /// `None` for form fields and bean aggregates.
    pub location: Option<In>,
    pub style: Option<Style>,
    pub default_style: Option<Style>,
    /// Form media type implied by the annotation.
    pub media_type: Option<&'static str>,
}

impl FrameworkParameter {
    const fn new(
        location: Option<In>,
        style: Option<Style>,
        default_style: Option<Style>,
        media_type: Option<&'static str>,
    ) -> Self {
        Self {
            location,
            style,
            default_style,
            media_type,
        }
    }

    /// Explicit style, else the default for the location.
    pub fn effective_style(&self) -> Option<Style> {
        self.style.or(self.location.map(Style::default_for))
    }
}

pub const PATH_PARAM: FrameworkParameter =
    FrameworkParameter::new(Some(In::Path), None, Some(Style::Simple), None);
pub const MATRIX_PARAM: FrameworkParameter =
    FrameworkParameter::new(
        Some(In::Path),
        Some(Style::Matrix),
        Some(Style::Matrix),
        None,
    );
pub const QUERY_PARAM: FrameworkParameter =
    FrameworkParameter::new(Some(In::Query), None, Some(Style::Form), None);
pub const FORM_PARAM: FrameworkParameter =
    FrameworkParameter::new(None, Some(Style::Form), Some(Style::Form), None);
pub const HEADER_PARAM: FrameworkParameter =
    FrameworkParameter::new(Some(In::Header), None, Some(Style::Simple), None);
pub const COOKIE_PARAM: FrameworkParameter =
    FrameworkParameter::new(Some(In::Cookie), None, Some(Style::Form), None);
pub const BEAN_PARAM: FrameworkParameter = FrameworkParameter::new(None, None, None, None);
pub const MULTIPART_FORM: FrameworkParameter =
    FrameworkParameter::new(None, None, None, Some(MULTIPART_FORM_DATA));

static PARAMETERS: &[(&str, FrameworkParameter)] = &[
    ("javax.ws.rs.PathParam", PATH_PARAM),
    ("jakarta.ws.rs.PathParam", PATH_PARAM),
    ("javax.ws.rs.MatrixParam", MATRIX_PARAM),
    ("jakarta.ws.rs.MatrixParam", MATRIX_PARAM),
    ("javax.ws.rs.QueryParam", QUERY_PARAM),
    ("jakarta.ws.rs.QueryParam", QUERY_PARAM),
    ("javax.ws.rs.FormParam", FORM_PARAM),
    ("jakarta.ws.rs.FormParam", FORM_PARAM),
    ("javax.ws.rs.HeaderParam", HEADER_PARAM),
    ("jakarta.ws.rs.HeaderParam", HEADER_PARAM),
    ("javax.ws.rs.CookieParam", COOKIE_PARAM),
    ("jakarta.ws.rs.CookieParam", COOKIE_PARAM),
    ("javax.ws.rs.BeanParam", BEAN_PARAM),
    ("jakarta.ws.rs.BeanParam", BEAN_PARAM),
    ("org.jboss.resteasy.annotations.jaxrs.PathParam", PATH_PARAM),
    ("org.jboss.resteasy.annotations.jaxrs.MatrixParam", MATRIX_PARAM),
    ("org.jboss.resteasy.annotations.jaxrs.QueryParam", QUERY_PARAM),
    ("org.jboss.resteasy.annotations.jaxrs.FormParam", FORM_PARAM),
    ("org.jboss.resteasy.annotations.jaxrs.HeaderParam", HEADER_PARAM),
    ("org.jboss.resteasy.annotations.jaxrs.CookieParam", COOKIE_PARAM),
    ("org.jboss.resteasy.annotations.providers.multipart.MultipartForm", MULTIPART_FORM),
    ("org.jboss.resteasy.reactive.RestPath", PATH_PARAM),
    ("org.jboss.resteasy.reactive.RestMatrix", MATRIX_PARAM),
    ("org.jboss.resteasy.reactive.RestQuery", QUERY_PARAM),
    ("org.jboss.resteasy.reactive.RestForm", FORM_PARAM),
    ("org.jboss.resteasy.reactive.RestHeader", HEADER_PARAM),
    ("org.jboss.resteasy.reactive.RestCookie", COOKIE_PARAM),
    ("org.jboss.resteasy.reactive.MultipartForm", MULTIPART_FORM),
];

/// The parameter kind declared by a framework annotation.
pub fn framework_parameter(annotation_name: &str) -> Option<FrameworkParameter> {
    PARAMETERS
        .iter()
        .find(|(name, _)| *name == annotation_name)
        .map(|(_, parameter)| *parameter)
}

pub fn is_framework_parameter(annotation_name: &str) -> bool {
    framework_parameter(annotation_name).is_some()
}

/// The HTTP method bound by `@GET`, `@POST` and the like.
pub fn http_method(annotation_name: &str) -> Option<HttpMethod> {
    let simple = NAMESPACES
        .iter()
        .find_map(|ns| annotation_name.strip_prefix(ns))?;
    match simple {
        "GET" => Some(HttpMethod::Get),
        "PUT" => Some(HttpMethod::Put),
        "POST" => Some(HttpMethod::Post),
        "DELETE" => Some(HttpMethod::Delete),
        "HEAD" => Some(HttpMethod::Head),
        "OPTIONS" => Some(HttpMethod::Options),
        "PATCH" => Some(HttpMethod::Patch),
        _ => None,
    }
}

/// Any annotation from the JAX-RS namespaces or a framework parameter.
pub fn contains_jaxrs_annotations(annotations: &[AnnotationInstance]) -> bool {
    annotations.iter().any(|a| {
        is_framework_parameter(&a.name) || NAMESPACES.iter().any(|ns| a.name.starts_with(ns))
    })
}

/// `@Path` value without its leading and trailing slash; empty when absent.
fn path_value(annotation: Option<&AnnotationInstance>) -> String {
    let Some(value) = annotation.and_then(|a| a.string_value("value")) else {
        return String::new();
    };
    let value = value.strip_prefix('/').unwrap_or(value);
    value.strip_suffix('/').unwrap_or(value).to_string()
}

/// The method followed by the methods it overrides, nearest first.
pub fn ancestry(index: &ClassIndex, method: &MethodRef) -> Vec<MethodRef> {
    let mut chain = vec![method.clone()];
    chain.extend(index.overridden_methods(method).into_iter().rev());
    chain
}

pub fn class_path(index: &ClassIndex, class: &str) -> String {
    let target = AnnotationTarget::Class(class.to_string());
    path_value(index.get_any_annotation(&target, &PATH))
}

/// `@Path` of a method, inherited from the nearest overridden method
/// that declares one.
pub fn method_path_segment(index: &ClassIndex, method: &MethodRef) -> String {
    let path = ancestry(index, method)
        .into_iter()
        .find_map(|m| index.get_any_annotation(&AnnotationTarget::Method(m), &PATH));
    path_value(path)
}

/// Class path joined with the method path.
pub fn method_path(index: &ClassIndex, method: &MethodRef) -> String {
    let class = class_path(index, &method.class);
    let segment = method_path_segment(index, method);
    if segment.is_empty() {
        class
    } else {
        format!("{class}/{segment}")
    }
}

/// Path a parameter declared on `target` belongs to.
pub fn full_path_of(index: &ClassIndex, target: &AnnotationTarget) -> Option<String> {
    match target {
        AnnotationTarget::Field { class, .. } => Some(class_path(index, class)),
        AnnotationTarget::Method(method) | AnnotationTarget::MethodParameter { method, .. } => {
            Some(method_path(index, method))
        }
        AnnotationTarget::Class(_) => None,
    }
}

/// Last segment of the full path, without template braces.
pub fn last_path_segment_of(index: &ClassIndex, target: &AnnotationTarget) -> Option<String> {
    let full = full_path_of(index, target)?;
    let last = full.rsplit('/').next().unwrap_or_default();
    let last = last
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .unwrap_or(last);
    Some(last.to_string())
}

/// Methods carrying an HTTP method annotation, directly or inherited.
pub fn is_resource_method(index: &ClassIndex, method: &MethodRef) -> bool {
    ancestry(index, method).into_iter().any(|m| {
        index
            .annotations(&AnnotationTarget::Method(m))
            .iter()
            .any(|a| http_method(&a.name).is_some())
    })
}

/// `@Path` without an HTTP method, returning a resource class.
pub fn is_sub_resource_locator(index: &ClassIndex, method: &MethodRef) -> bool {
    let Some(info) = index.method(method) else {
        return false;
    };
    let returns_class = matches!(
        info.return_type,
        TypeRef::Class(_) | TypeRef::Parameterized { .. }
    );
    let target = AnnotationTarget::Method(method.clone());
    returns_class
        && index.get_any_annotation(&target, &PATH).is_some()
        && !info
            .annotations
            .iter()
            .any(|a| http_method(&a.name).is_some())
}

/// Declared type of a field, setter argument or method parameter.
pub fn type_of(index: &ClassIndex, target: &AnnotationTarget) -> Option<TypeRef> {
    match target {
        AnnotationTarget::Field { class, name } => index.field(class, name).map(|f| f.ty.clone()),
        AnnotationTarget::Method(method) => {
            let info = index.method(method)?;
            match info.parameters.as_slice() {
                [setter] => Some(setter.ty.clone()),
                _ => None,
            }
        }
        AnnotationTarget::MethodParameter { method, position } => index
            .method_parameter(method, *position)
            .map(|p| p.ty.clone()),
        AnnotationTarget::Class(_) => None,
    }
}

pub fn is_path_segment(ty: &TypeRef) -> bool {
    ty.class_name()
        .is_some_and(|name| PATH_SEGMENT.contains(&name))
}

/// `java.beans.Introspector` rules: `URL` stays, `Name` becomes `name`.
fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) if first.is_uppercase() && second.is_uppercase() => {
            name.to_string()
        }
        (Some(first), _) => first.to_lowercase().chain(name.chars().skip(1)).collect(),
        (None, _) => String::new(),
    }
}

/// Parameter name: the annotation value, else the name of the field,
/// method parameter or bean property it decorates.
pub fn param_name(index: &ClassIndex, annotation: &AnnotationInstance) -> Option<String> {
    if let Some(value) = annotation.string_value("value").filter(|v| !v.is_empty()) {
        return Some(value.to_string());
    }
    match annotation.target.as_ref()? {
        AnnotationTarget::Field { name, .. } => Some(name.clone()),
        AnnotationTarget::MethodParameter { method, position } => {
            index.method_parameter(method, *position)?.name.clone()
        }
        AnnotationTarget::Method(method) => {
            let info = index.method(method)?;
            if info.parameters.len() != 1 {
                return None;
            }
            Some(match info.name.strip_prefix("set") {
                Some(property) => decapitalize(property),
                None => info.name.clone(),
            })
        }
        AnnotationTarget::Class(_) => None,
    }
}

/// `@DefaultValue` on `target`, parsed for primitive targets. A value that
/// does not parse is kept as the raw string.
pub fn default_value(index: &ClassIndex, target: &AnnotationTarget) -> Option<serde_json::Value> {
    let raw = index
        .get_any_annotation(target, &DEFAULT_VALUE)?
        .string_value("value")?;
    let fallback = serde_json::Value::String(raw.to_string());
    let Some(TypeRef::Primitive(primitive)) = type_of(index, target) else {
        return Some(fallback);
    };
    match primitive_value(primitive, raw) {
        Some(value) => Some(value),
        None => {
            log::warn!(
                "invalid default value `{raw}` for {} parameter {target}",
                format!("{primitive:?}").to_lowercase()
            );
            Some(fallback)
        }
    }
}

fn primitive_value(primitive: Primitive, raw: &str) -> Option<serde_json::Value> {
    use serde_json::Value;
    match primitive {
        Primitive::Boolean => Some(Value::Bool(raw.eq_ignore_ascii_case("true"))),
        Primitive::Char => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Value::String(c.to_string())),
                _ => None,
            }
        }
        // A one-character default is the character's code, so "5" is 53.
        Primitive::Byte => match raw.as_bytes() {
            [byte] => Some(Value::from(*byte as i8)),
            _ => None,
        },
        Primitive::Short | Primitive::Int | Primitive::Long => {
            raw.trim().parse::<i64>().ok().map(Value::from)
        }
        Primitive::Float | Primitive::Double => raw
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
    }
}

/// RESTEasy `@PartType` content type on `target`.
pub fn part_type(index: &ClassIndex, target: &AnnotationTarget) -> Option<String> {
    index
        .get_any_annotation(target, &PART_TYPE)?
        .string_value("value")
        .map(str::to_string)
}

/// Whether a field, setter or non-resource method parameter carries a
/// parameter annotation that a bean or resource class contributes.
pub fn is_bean_property_param(index: &ClassIndex, annotation: &AnnotationInstance) -> bool {
    let Some(target) = annotation.target.as_ref() else {
        return false;
    };
    let has_parameters = |annotations: &[AnnotationInstance]| {
        annotations.iter().any(|a| crate::is_parameter(&a.name))
    };
    let method = match target {
        AnnotationTarget::Method(method) | AnnotationTarget::MethodParameter { method, .. } => {
            method
        }
        AnnotationTarget::Field { .. } => return has_parameters(index.annotations(target)),
        AnnotationTarget::Class(_) => return false,
    };
    // A setter contributes only when it takes exactly one value.
    let setter_ok = target.kind() != TargetKind::Method || type_of(index, target).is_some();
    setter_ok
        && !is_resource_method(index, method)
        && has_parameters(index.annotations(target))
        && !is_sub_resource_locator(index, method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oasio_core::annotation::{ClassInfo, MethodInfo, MethodParameterInfo};

    fn index() -> ClassIndex {
        ClassIndex::new().with(
            ClassInfo::new("api.Widgets")
                .annotation(AnnotationInstance::new(PATH[1]).with("value", "/widgets/"))
                .method(
                    MethodInfo::new("get", TypeRef::Void)
                        .annotation(AnnotationInstance::new("jakarta.ws.rs.GET"))
                        .annotation(AnnotationInstance::new(PATH[0]).with("value", "{id}"))
                        .parameter(
                            MethodParameterInfo::new("count", TypeRef::Primitive(Primitive::Int))
                                .annotation(
                                    AnnotationInstance::new(DEFAULT_VALUE[0]).with("value", "ten"),
                                ),
                        ),
                )
                .method(
                    MethodInfo::new("parts", TypeRef::class("api.Parts"))
                        .annotation(AnnotationInstance::new(PATH[0]).with("value", "parts")),
                )
                .method(
                    MethodInfo::new("setPageSize", TypeRef::Void)
                        .parameter(MethodParameterInfo::unnamed(TypeRef::Primitive(Primitive::Int)))
                        .annotation(AnnotationInstance::new("javax.ws.rs.QueryParam")),
                ),
        )
    }

    #[test]
    fn test_framework_parameter_table() {
        assert_eq!(framework_parameter("jakarta.ws.rs.QueryParam"), Some(QUERY_PARAM));
        assert_eq!(
            framework_parameter("org.jboss.resteasy.reactive.RestMatrix"),
            Some(MATRIX_PARAM)
        );
        assert_eq!(PATH_PARAM.effective_style(), Some(Style::Simple));
        assert_eq!(COOKIE_PARAM.effective_style(), Some(Style::Form));
        assert_eq!(BEAN_PARAM.effective_style(), None);
        assert_eq!(http_method("javax.ws.rs.PATCH"), Some(HttpMethod::Patch));
        assert_eq!(http_method("javax.ws.rs.Path"), None);
    }

    #[test]
    fn test_paths() {
        let index = index();
        let get = MethodRef::new("api.Widgets", "get");
        assert_eq!(class_path(&index, "api.Widgets"), "widgets");
        assert_eq!(method_path(&index, &get), "widgets/{id}");
        assert_eq!(last_path_segment_of(&index, &get.parameter(0)).as_deref(), Some("id"));
    }

    #[test]
    fn test_method_classification() {
        let index = index();
        assert!(is_resource_method(&index, &MethodRef::new("api.Widgets", "get")));
        assert!(is_sub_resource_locator(&index, &MethodRef::new("api.Widgets", "parts")));
        assert!(!is_sub_resource_locator(&index, &MethodRef::new("api.Widgets", "get")));
    }

    #[test]
    fn test_param_name_from_setter() {
        let index = index();
        let setter = index
            .method(&MethodRef::new("api.Widgets", "setPageSize"))
            .unwrap();
        assert_eq!(param_name(&index, &setter.annotations[0]).as_deref(), Some("pageSize"));
        assert_eq!(decapitalize("URL"), "URL");
    }

    #[test]
    fn test_unparsable_default_keeps_raw_string() {
        let _ = env_logger::builder().is_test(true).try_init();
        let index = index();
        let target = MethodRef::new("api.Widgets", "get").parameter(0);
        assert_eq!(
            default_value(&index, &target),
            Some(serde_json::Value::String("ten".into()))
        );
        assert_eq!(
            primitive_value(Primitive::Long, "42"),
            Some(serde_json::Value::from(42))
        );
    }

    #[test]
    fn test_byte_default_is_character_code() {
        assert_eq!(
            primitive_value(Primitive::Byte, "5"),
            Some(serde_json::Value::from(53))
        );
        assert_eq!(primitive_value(Primitive::Byte, "12"), None);
    }
}
