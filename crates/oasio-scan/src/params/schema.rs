use indexmap::IndexMap;
use oasio_core::OasioConfig;
use oasio_core::annotation::{AnnotationInstance, AnnotationLookup, names};
use oasio_core::model::{Encoding, MediaType, Merge, Parameter, Schema, SchemaNode};

use crate::constraints::ConstraintOutcome;
use crate::context::ScanContext;
use crate::jaxrs;

/// Schemas of a parameter: its own schema, else one per media type.
pub fn parameter_schemas(param: &Parameter) -> Vec<SchemaNode> {
    if let Some(schema) = &param.schema {
        return vec![schema.clone()];
    }
    param
        .content
        .iter()
        .flat_map(|content| content.media_types.values())
        .filter_map(|media_type| media_type.schema.clone())
        .collect()
}

pub fn has_schema(param: &Parameter) -> bool {
    !parameter_schemas(param).is_empty()
}

/// Give `param` a schema: directly, or on every media type of its content
/// that has none. Empty content gets the configured request media types.
pub fn set_parameter_schema(param: &mut Parameter, schema: SchemaNode, config: &OasioConfig) {
    let Some(content) = param.content.as_mut() else {
        param.schema = Some(schema);
        return;
    };
    if content.media_types.is_empty() {
        let media_types = config
            .default_consumes
            .clone()
            .unwrap_or_else(|| vec!["*/*".to_string()]);
        for name in media_types {
            content.media_types.insert(name, MediaType::default());
        }
    }
    for media_type in content.media_types.values_mut() {
        if media_type.schema.is_none() {
            media_type.schema = Some(schema.clone());
        }
    }
}

/// Apply the validation constraints in `annotations`, honouring the
/// configuration switch.
pub fn constrain(
    scan: &ScanContext<'_>,
    annotations: &[AnnotationInstance],
    schema: &mut Schema,
) -> ConstraintOutcome {
    if !scan.config.bean_validation {
        return ConstraintOutcome::default();
    }
    scan.constraints.apply(annotations, schema)
}

/// Add one property to `schema` per annotated parameter in `params`, typed
/// from `@Schema` when `schema_annotation_supported`, else from the Java
/// type. `@PartType` content types go to `encodings`.
pub fn set_schema_properties(
    scan: &ScanContext<'_>,
    schema: &SchemaNode,
    mut encodings: Option<&mut IndexMap<String, Encoding>>,
    params: &IndexMap<String, AnnotationInstance>,
    schema_annotation_supported: bool,
) {
    let index = scan.index;
    for (name, annotation) in params {
        let target = annotation.target.as_ref();
        let ty = target.and_then(|t| jaxrs::type_of(index, t));
        let schema_annotation = target
            .filter(|_| schema_annotation_supported)
            .and_then(|t| index.get_annotation(t, names::SCHEMA));
        let property = match schema_annotation {
            Some(annotation) => scan.models.read_schema(annotation),
            None => ty.as_ref().and_then(|t| scan.models.type_to_schema(t)),
        };
        // Hidden, or nothing to describe.
        let Some(property) = property else {
            continue;
        };

        if let (Some(encodings), Some(target)) = (encodings.as_deref_mut(), target)
            && let Some(content_type) = jaxrs::part_type(index, target)
        {
            encodings.insert(
                name.clone(),
                Encoding {
                    content_type: Some(content_type),
                    ..Encoding::default()
                },
            );
        }

        {
            let mut property = property.borrow_mut();
            if property.default_value.is_none() {
                property.default_value = target.and_then(|t| jaxrs::default_value(index, t));
            }
            let annotations = target.map(|t| index.annotations(t)).unwrap_or_default();
            if constrain(scan, annotations, &mut property).required {
                schema.borrow_mut().add_required(name);
            }
            if property.nullable.is_none() && ty.as_ref().is_some_and(|t| t.is_optional()) {
                property.nullable = Some(true);
            }
        }

        let existing = schema
            .borrow()
            .properties
            .as_ref()
            .and_then(|properties| properties.get(name).cloned());
        let property = match existing {
            Some(mut existing) => {
                existing.merge(property);
                existing
            }
            None => property,
        };
        schema.borrow_mut().add_property(name.clone(), property);
    }
}
