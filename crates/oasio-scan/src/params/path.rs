//! Path template handling: `{name: regex}` variables and matrix segments.

use std::collections::HashSet;

use oasio_core::model::{In, Parameter, SchemaType, Style};
use once_cell::sync::Lazy;
use regex::Regex;

/// `{name: regex}`, where the regex may itself hold `{m,n}` quantifiers.
static TEMPLATE_PARAM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{[ \t]*(\w[\w\.-]*)[ \t]*:[ \t]*((?:[^{}]|\{[^{}]+\})+)\}")
        .expect("template parameter pattern is valid")
});

static TEMPLATE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{[ \t]*(\w[\w\.-]*)[ \t]*[}:]").expect("template name pattern is valid")
});

/// Variable names used in a path template, in order of appearance.
pub fn template_names(path: &str) -> Vec<String> {
    TEMPLATE_NAME
        .captures_iter(path)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// A plain (non-matrix) path parameter named `name`.
pub fn same_path_parameter(param: &Parameter, name: &str) -> bool {
    param.name.as_deref() == Some(name)
        && param.location == Some(In::Path)
        && param.style != Some(Style::Matrix)
}

/// Whether a path parameter is bound by `path`. Matrix parameters may also
/// name a whole literal segment.
pub fn parameter_in_path(name: Option<&str>, style: Option<Style>, path: Option<&str>) -> bool {
    let (Some(name), Some(path)) = (name, path) else {
        return true;
    };
    if template_names(path).iter().any(|n| n == name) {
        return true;
    }
    style == Some(Style::Matrix) && path.split('/').any(|segment| segment == name)
}

fn pattern_eligible(param: &Parameter) -> bool {
    param.location == Some(In::Path)
        && param.style != Some(Style::Matrix)
        && param.schema.as_ref().is_some_and(|s| {
            let schema = s.borrow();
            schema.schema_type == Some(SchemaType::String) && schema.pattern.is_none()
        })
}

/// End offset of the last path segment equal to `segment`.
fn segment_end(path: &str, segment: &str) -> Option<usize> {
    let mut offset = 0;
    let mut found = None;
    for part in path.split('/') {
        if part == segment {
            found = Some(offset + part.len());
        }
        offset += part.len() + 1;
    }
    found
}

/// Render `segment` as a path: `{name: regex}` variables lose their regex,
/// which moves to the matching string path parameter, and matrix parameters
/// get a template variable after their segment.
pub fn generate_path(
    segment: &str,
    parameters: &mut [&mut Parameter],
    processed_matrix_segments: &mut HashSet<String>,
) -> String {
    let mut path = if segment.is_empty() {
        String::new()
    } else {
        format!("/{segment}")
    };

    while let Some((range, name, pattern)) = TEMPLATE_PARAM.captures(&path).and_then(|c| {
        Some((
            c.get(0)?.range(),
            c.get(1)?.as_str().trim().to_string(),
            c.get(2)?.as_str().trim().to_string(),
        ))
    }) {
        for param in parameters.iter() {
            if same_path_parameter(param, &name)
                && pattern_eligible(param)
                && let Some(schema) = &param.schema
            {
                schema.borrow_mut().pattern = Some(pattern.clone());
            }
        }
        log::debug!("path variable `{name}` restricted to `{pattern}`");
        path.replace_range(range, &format!("{{{name}}}"));
    }

    for param in parameters.iter_mut() {
        if param.style != Some(Style::Matrix) {
            continue;
        }
        let Some(segment) = param.name.clone() else {
            continue;
        };
        if processed_matrix_segments.contains(&segment) {
            continue;
        }
        let variable = format!("{{{segment}}}");
        if let Some(at) = path.rfind(&variable) {
            // A path variable already owns the segment name.
            let renamed = format!("{segment}Matrix");
            log::debug!("matrix parameter `{segment}` renamed to `{renamed}`");
            path.insert_str(at + variable.len(), &format!("{{{renamed}}}"));
            processed_matrix_segments.insert(renamed.clone());
            param.name = Some(renamed);
        } else if let Some(at) = segment_end(&path, &segment) {
            path.insert_str(at, &variable);
        } else {
            continue;
        }
        processed_matrix_segments.insert(segment);
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use oasio_core::model::{Schema, SchemaNode};

    fn path_param(name: &str, style: Option<Style>, schema: Option<Schema>) -> Parameter {
        Parameter {
            name: Some(name.into()),
            location: Some(In::Path),
            style,
            schema: schema.map(SchemaNode::new),
            ..Parameter::default()
        }
    }

    #[test]
    fn test_template_names() {
        assert_eq!(
            template_names("/items/{id}/{ version : v\\d+}/{a.b-c}"),
            vec!["id", "version", "a.b-c"]
        );
        assert!(template_names("/items").is_empty());
    }

    #[test]
    fn test_parameter_in_path() {
        assert!(parameter_in_path(Some("id"), None, Some("items/{id}")));
        assert!(parameter_in_path(Some("id"), None, Some("items/{id: \\d+}")));
        assert!(!parameter_in_path(Some("id"), None, Some("items/id")));
        assert!(parameter_in_path(Some("colors"), Some(Style::Matrix), Some("shop/colors")));
        assert!(!parameter_in_path(Some("color"), Some(Style::Matrix), Some("shop/colors")));
        assert!(parameter_in_path(None, None, Some("items")));
    }

    #[test]
    fn test_pattern_moves_to_string_parameter() {
        let mut id = path_param("id", None, Some(Schema::of_type(SchemaType::String)));
        let mut count = path_param("n", None, Some(Schema::of_type(SchemaType::Integer)));
        let mut processed = HashSet::new();
        let path = generate_path(
            "items/{id: [a-z]{2,4}}/{n:\\d+}",
            &mut [&mut id, &mut count],
            &mut processed,
        );
        assert_eq!(path, "/items/{id}/{n}");
        let schema = id.schema.as_ref().unwrap().borrow();
        assert_eq!(schema.pattern.as_deref(), Some("[a-z]{2,4}"));
        assert_eq!(count.schema.as_ref().unwrap().borrow().pattern, None);
    }

    #[test]
    fn test_matrix_segment_insertion() {
        let mut processed = HashSet::new();
        let mut colliding = path_param("id", Some(Style::Matrix), None);
        assert_eq!(
            generate_path("widgets/{id}", &mut [&mut colliding], &mut processed),
            "/widgets/{id}{idMatrix}"
        );
        assert_eq!(colliding.name.as_deref(), Some("idMatrix"));

        let mut literal = path_param("colors", Some(Style::Matrix), None);
        assert_eq!(
            generate_path("shop/colors", &mut [&mut literal], &mut processed),
            "/shop/colors{colors}"
        );

        let mut missing = path_param("size", Some(Style::Matrix), None);
        assert_eq!(
            generate_path("shop", &mut [&mut missing], &mut processed),
            "/shop"
        );
        assert!(!processed.contains("size"));
    }
}
