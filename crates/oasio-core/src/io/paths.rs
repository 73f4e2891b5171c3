use indexmap::IndexMap;

use crate::annotation::{AnnotationInstance, AnnotationTarget, names};
use crate::json::JsonIo;
use crate::model::{
    Callback, HttpMethod, Operation, PathItem, Paths, Reference, ReferenceType, is_extension,
};

use super::{
    AnnotationReader, CallbackIo, CallbackOperationIo, JsonReader, JsonWriter, ModelIo,
    ObjectReader, ObjectWriter, OperationIo, PathItemIo, PathsIo, REF, annotation_key,
    annotation_ref, string_member, write_reference,
};

impl<J: JsonIo> JsonReader<J> for PathsIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> Paths {
        let json = self.json();
        let path_items = self.context().path_items();
        let mut paths = Paths {
            extensions: ObjectReader::new(json, node).extensions(),
            ..Paths::default()
        };
        for (path, value) in json.entries(node) {
            if is_extension(&path) {
                continue;
            }
            if let Some(object) = json.as_object(value) {
                paths
                    .path_items
                    .insert(path.into_owned(), path_items.read_object(object));
            }
        }
        paths
    }
}

impl<J: JsonIo> JsonWriter<J> for PathsIo<'_, J> {
    fn write(&self, model: &Paths) -> Option<J::Value> {
        let path_items = self.context().path_items();
        let mut out = ObjectWriter::new(self.json());
        for (path, item) in &model.path_items {
            out.node(path, path_items.write(item));
        }
        out.extensions(model.extensions.as_ref());
        Some(out.build())
    }
}

impl<J: JsonIo> JsonReader<J> for PathItemIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> PathItem {
        let ctx = self.context();
        let operations = ctx.operations();
        let r = ObjectReader::new(self.json(), node);
        let mut item = PathItem {
            reference: r.reference(),
            summary: r.string("summary"),
            description: r.string("description"),
            servers: ctx.servers().read_list(node, "servers"),
            parameters: ctx.parameters().read_list(node, "parameters"),
            extensions: r.extensions(),
            ..PathItem::default()
        };
        for method in HttpMethod::VALUES {
            *item.operation_mut(*method) = operations.read_property(node, method.as_str());
        }
        item
    }
}

impl<J: JsonIo> JsonWriter<J> for PathItemIo<'_, J> {
    /// Path items keep their siblings beside `$ref` in every version.
    fn write(&self, model: &PathItem) -> Option<J::Value> {
        let ctx = self.context();
        let operations = ctx.operations();
        let mut out = ObjectWriter::new(self.json());
        out.string(REF, model.reference());
        out.string("summary", model.summary.as_deref());
        out.string("description", model.description.as_deref());
        for (method, operation) in model.operations() {
            out.node(method.as_str(), operations.write(operation));
        }
        out.node("parameters", ctx.parameters().write_list(model.parameters.as_deref()));
        out.node("servers", ctx.servers().write_list(model.servers.as_deref()));
        out.extensions(model.extensions.as_ref());
        Some(out.build())
    }
}

impl<J: JsonIo> AnnotationReader<J> for OperationIo<'_, J> {
    const ANNOTATION: &'static str = names::OPERATION;

    /// Only the descriptive members; the rest of an operation comes from
    /// the annotations beside `@Operation`.
    fn read_annotation(&self, annotation: &AnnotationInstance) -> Operation {
        Operation {
            summary: string_member(annotation, "summary"),
            description: string_member(annotation, "description"),
            operation_id: string_member(annotation, "operationId"),
            deprecated: annotation.bool_value("deprecated"),
            extensions: self.context().extensions().read_extensible(annotation),
            ..Operation::default()
        }
    }
}

impl<J: JsonIo> OperationIo<'_, J> {
    /// Whether `target` carries `@Operation(hidden = true)`.
    pub fn is_hidden(&self, target: &AnnotationTarget) -> bool {
        self.context()
            .annotations()
            .and_then(|lookup| lookup.get_annotation(target, Self::ANNOTATION))
            .and_then(|a| a.bool_value("hidden"))
            .unwrap_or(false)
    }
}

impl<J: JsonIo> JsonReader<J> for OperationIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> Operation {
        let ctx = self.context();
        let r = ObjectReader::new(self.json(), node);
        Operation {
            tags: r.strings("tags"),
            summary: r.string("summary"),
            description: r.string("description"),
            external_docs: ctx.external_docs().read_property(node, "externalDocs"),
            operation_id: r.string("operationId"),
            parameters: ctx.parameters().read_list(node, "parameters"),
            request_body: ctx.request_bodies().read_property(node, "requestBody"),
            responses: ctx.responses().read_property(node, "responses"),
            callbacks: ctx.callbacks().read_map_property(node, "callbacks"),
            deprecated: r.boolean("deprecated"),
            security: ctx.security_requirements().read_list(node, "security"),
            servers: ctx.servers().read_list(node, "servers"),
            extensions: r.extensions(),
        }
    }
}

impl<J: JsonIo> JsonWriter<J> for OperationIo<'_, J> {
    fn write(&self, model: &Operation) -> Option<J::Value> {
        let ctx = self.context();
        let mut out = ObjectWriter::new(self.json());
        out.strings("tags", model.tags.as_deref());
        out.string("summary", model.summary.as_deref());
        out.string("description", model.description.as_deref());
        out.node("externalDocs", ctx.external_docs().write_opt(model.external_docs.as_ref()));
        out.string("operationId", model.operation_id.as_deref());
        out.node("parameters", ctx.parameters().write_list(model.parameters.as_deref()));
        out.node("requestBody", ctx.request_bodies().write_opt(model.request_body.as_ref()));
        out.node("responses", ctx.responses().write_opt(model.responses.as_ref()));
        out.node("callbacks", ctx.callbacks().write_map(model.callbacks.as_ref()));
        out.boolean("deprecated", model.deprecated);
        out.node(
            "security",
            ctx.security_requirements()
                .write_requirements(model.security.as_deref()),
        );
        out.node("servers", ctx.servers().write_list(model.servers.as_deref()));
        out.extensions(model.extensions.as_ref());
        Some(out.build())
    }
}

impl<J: JsonIo> AnnotationReader<J> for CallbackOperationIo<'_, J> {
    const ANNOTATION: &'static str = names::CALLBACK_OPERATION;

    /// A `@CallbackOperation` is a complete operation plus its HTTP method.
    fn read_annotation(&self, annotation: &AnnotationInstance) -> (Option<HttpMethod>, Operation) {
        let ctx = self.context();
        let method = annotation
            .string_value("method")
            .and_then(|m| HttpMethod::from_wire(&m.to_ascii_lowercase()));
        let tags: Vec<String> = annotation
            .nested_array("tags")
            .unwrap_or_default()
            .into_iter()
            .filter_map(|tag| annotation_key(tag, "name"))
            .collect();
        let mut security = ctx
            .security_requirements()
            .read_nested_list(annotation, "security")
            .unwrap_or_default();
        security.extend(
            ctx.security_requirements()
                .read_nested_sets(annotation, "securitySets")
                .unwrap_or_default(),
        );
        let operation = Operation {
            tags: (!tags.is_empty()).then_some(tags),
            summary: string_member(annotation, "summary"),
            description: string_member(annotation, "description"),
            external_docs: ctx.external_docs().read_nested(annotation, "externalDocs"),
            operation_id: string_member(annotation, "operationId"),
            parameters: annotation
                .nested_array("parameters")
                .map(|p| ctx.parameters().read_annotation_list(p))
                .filter(|p| !p.is_empty()),
            request_body: ctx.request_bodies().read_nested(annotation, "requestBody"),
            responses: annotation
                .nested_array("responses")
                .filter(|r| !r.is_empty())
                .map(|r| ctx.responses().read_annotation_list(r)),
            callbacks: None,
            deprecated: annotation.bool_value("deprecated"),
            security: (!security.is_empty()).then_some(security),
            servers: ctx.servers().read_nested_list(annotation, "servers"),
            extensions: ctx.extensions().read_extensible(annotation),
        };
        (method, operation)
    }
}

impl<J: JsonIo> CallbackOperationIo<'_, J> {
    /// Operations keyed by method into one path item; entries without a
    /// method are skipped.
    pub fn read_path_item<'x>(
        &self,
        annotations: impl IntoIterator<Item = &'x AnnotationInstance>,
    ) -> PathItem {
        let mut item = PathItem::default();
        for annotation in annotations {
            match self.read_annotation(annotation) {
                (Some(method), operation) => *item.operation_mut(method) = Some(operation),
                (None, _) => log::debug!("@CallbackOperation without a method skipped"),
            }
        }
        item
    }
}

impl<J: JsonIo> AnnotationReader<J> for CallbackIo<'_, J> {
    const ANNOTATION: &'static str = names::CALLBACK;

    fn read_annotation(&self, annotation: &AnnotationInstance) -> Callback {
        let ctx = self.context();
        let mut path_items = IndexMap::new();
        if let Some(expression) = string_member(annotation, "callbackUrlExpression") {
            let operations = annotation.nested_array("operations").unwrap_or_default();
            path_items.insert(expression, ctx.callback_operations().read_path_item(operations));
        }
        Callback {
            reference: annotation_ref(annotation, ReferenceType::Callback),
            path_items,
            extensions: ctx.extensions().read_extensible(annotation),
        }
    }
}

impl<J: JsonIo> CallbackIo<'_, J> {
    /// `@Callback` annotations on `target`, bare or inside `@Callbacks`.
    pub fn read_target_callbacks(
        &self,
        target: &AnnotationTarget,
    ) -> Option<IndexMap<String, Callback>> {
        let annotations = self.repeatable_annotations(target);
        let callbacks = self.read_annotation_map(&annotations);
        (!callbacks.is_empty()).then_some(callbacks)
    }
}

impl<J: JsonIo> JsonReader<J> for CallbackIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> Callback {
        let json = self.json();
        let path_items = self.context().path_items();
        let r = ObjectReader::new(json, node);
        let mut callback = Callback {
            reference: r.reference(),
            extensions: r.extensions(),
            ..Callback::default()
        };
        for (expression, value) in json.entries(node) {
            if is_extension(&expression) || expression == REF {
                continue;
            }
            if let Some(object) = json.as_object(value) {
                callback
                    .path_items
                    .insert(expression.into_owned(), path_items.read_object(object));
            }
        }
        callback
    }
}

impl<J: JsonIo> JsonWriter<J> for CallbackIo<'_, J> {
    fn write(&self, model: &Callback) -> Option<J::Value> {
        let ctx = self.context();
        if let Some(reference) = model.reference() {
            return Some(write_reference(ctx, reference, None, None));
        }
        let path_items = ctx.path_items();
        let mut out = ObjectWriter::new(self.json());
        for (expression, item) in &model.path_items {
            out.node(expression, path_items.write(item));
        }
        out.extensions(model.extensions.as_ref());
        Some(out.build())
    }
}
