//! Parameter reconciliation: merges framework parameter annotations with
//! OpenAPI `@Parameter` annotations into the parameters of one operation.
//!
//! Parameters declared on the resource class become path item parameters.
//! Parameters declared on the resource method, or on the methods it
//! overrides, become operation parameters. Form parameters are collected
//! into a request body schema and matrix parameters into one object schema
//! per path segment.

mod context;
mod path;
mod resource;
mod schema;

use std::collections::HashSet;

use indexmap::IndexMap;
use oasio_core::annotation::{
    AnnotationInstance, AnnotationLookup, AnnotationTarget, MethodRef, TargetKind, names,
};
use oasio_core::model::{
    Content, In, MediaType, Merge, Parameter, Schema, SchemaNode, SchemaType, Style,
};

use crate::context::ScanContext;
use crate::jaxrs::{self, FrameworkParameter};
use context::{ParameterContext, ParameterKey};

pub use resource::ResourceParameters;

const IGNORED_HEADERS: [&str; 3] = ["accept", "authorization", "content-type"];

pub struct ParameterProcessor<'s, 'a> {
    scan: &'s ScanContext<'a>,
    params: Vec<ParameterContext>,
    form_params: IndexMap<String, AnnotationInstance>,
    form_media_type: Option<&'static str>,
    /// Matrix parameters by the path segment they qualify.
    matrix_params: IndexMap<String, IndexMap<String, AnnotationInstance>>,
    processed_matrix_segments: HashSet<String>,
    /// Order declared by `@Parameters`, as (name, location).
    preferred_order: Vec<(Option<String>, Option<In>)>,
}

impl<'s, 'a> ParameterProcessor<'s, 'a> {
    fn new(scan: &'s ScanContext<'a>) -> Self {
        Self {
            scan,
            params: Vec::new(),
            form_params: IndexMap::new(),
            form_media_type: None,
            matrix_params: IndexMap::new(),
            processed_matrix_segments: HashSet::new(),
            preferred_order: Vec::new(),
        }
    }

    /// Reconcile the parameters of `resource_method` as exposed through
    /// `resource_class`, which may be a subclass of the declaring class.
    pub fn process(
        scan: &'s ScanContext<'a>,
        resource_class: &str,
        resource_method: &MethodRef,
    ) -> ResourceParameters {
        let mut processor = Self::new(scan);
        let mut parameters = ResourceParameters::default();

        processor.process_path_parameters(resource_class, resource_method, &mut parameters);
        processor.reset();
        processor.process_operation_parameters(resource_method, &mut parameters);
        processor.process_finalize(resource_class, resource_method, &mut parameters);
        parameters
    }

    fn reset(&mut self) {
        self.params.clear();
        self.form_params.clear();
        self.matrix_params.clear();
    }

    fn process_path_parameters(
        &mut self,
        resource_class: &str,
        method: &MethodRef,
        parameters: &mut ResourceParameters,
    ) {
        self.read_parameters_inherited(&method.class, None, false);
        if resource_class != method.class {
            // The concrete class may refine, but not add, class parameters.
            self.read_parameters(resource_class, None, true);
        }
        parameters.path_item_parameters = self.parameters(method);
    }

    fn process_operation_parameters(
        &mut self,
        method: &MethodRef,
        parameters: &mut ResourceParameters,
    ) {
        let index = self.scan.index;
        let mut methods = index.overridden_methods(method);
        methods.push(method.clone());
        let infos: Vec<_> = methods.iter().filter_map(|m| index.method(m)).collect();

        for info in &infos {
            for annotation in info.parameters.iter().flat_map(|p| &p.annotations) {
                if is_oai_parameter(annotation) {
                    self.read_parameter_annotation(annotation, false);
                } else {
                    self.read_annotated_type(annotation, None, false);
                }
            }
        }
        for info in &infos {
            for annotation in info.annotations.iter().filter(|a| is_oai_parameter(a)) {
                self.read_parameter_annotation(annotation, false);
            }
        }
        parameters.operation_parameters = self.parameters(method);
    }

    fn process_finalize(
        &mut self,
        resource_class: &str,
        method: &MethodRef,
        parameters: &mut ResourceParameters,
    ) {
        let index = self.scan.index;
        let class_segment = jaxrs::class_path(index, resource_class);
        let method_segment = jaxrs::method_path_segment(index, method);
        let (path_item_path, operation_path) = {
            let mut all = parameters.all_parameters_mut();
            let processed = &mut self.processed_matrix_segments;
            (
                path::generate_path(&class_segment, &mut all, processed),
                path::generate_path(&method_segment, &mut all, processed),
            )
        };
        parameters.path_item_path = path_item_path;
        parameters.operation_path = operation_path;
        for param in parameters.all_parameters() {
            if param.style == Some(Style::Matrix)
                && let Some(name) = param
                    .name
                    .as_deref()
                    .filter(|n| !self.processed_matrix_segments.contains(*n))
            {
                log::warn!(
                    "no path segment `{name}` for matrix parameters of {}#{}",
                    method.class,
                    method.name
                );
            }
        }

        for name in parameters.path_parameter_template_names() {
            if parameters
                .all_parameters()
                .iter()
                .any(|p| path::same_path_parameter(p, &name))
            {
                continue;
            }
            let Some(context) = self.unannotated_path_parameter(method, &name) else {
                continue;
            };
            if let Some(param) = self.map_parameter(method, &context) {
                parameters.operation_parameters.push(param);
            }
        }

        // Matrix parameters may have been renamed.
        parameters.sort(&self.preferred_order);
        parameters.form_body_content = self.form_body_content();
    }

    /// Index of the context `key` refers to: by key, else by annotated
    /// target, else by name and style when either location is unknown.
    fn find_context(&self, key: &ParameterKey, target: Option<&AnnotationTarget>) -> Option<usize> {
        if let Some(found) = self.params.iter().position(|c| key.matches(&c.key())) {
            return Some(found);
        }
        if let Some(target) = target
            && let Some(found) = self
                .params
                .iter()
                .position(|c| c.has_same_target(target, key.name()))
        {
            return Some(found);
        }
        if matches!(key, ParameterKey::Named { .. }) {
            return self.params.iter().position(|c| {
                (c.location.is_none() || key.location().is_none())
                    && c.name.as_deref() == key.name()
                    && c.style == key.style()
            });
        }
        None
    }

    /// Merge one parameter source into its context. The OpenAPI parameter
    /// merges with newer values winning; the framework parameter and its
    /// default are kept from the first source that had one.
    fn read_parameter(
        &mut self,
        key: ParameterKey,
        oai_param: Option<Parameter>,
        framework: Option<FrameworkParameter>,
        default_value: Option<serde_json::Value>,
        target: Option<&AnnotationTarget>,
        overrides_only: bool,
    ) {
        let index = self.scan.index;
        let position = match self.find_context(&key, target) {
            Some(found) => found,
            None if overrides_only => return,
            None => {
                self.params.push(ParameterContext::default());
                self.params.len() - 1
            }
        };
        let context = &mut self.params[position];

        let key_name = key.name().map(str::to_string);
        let oai_name_override = oai_param.is_some()
            && key_name.is_some()
            && key_name != context.name
            && context.location != Some(In::Path);
        if context.name.is_none() || oai_name_override {
            context.name = key_name;
        }
        if context.location.is_none() {
            context.location = key.location();
        }
        if context.style.is_none() {
            context.style = key.style();
        }
        context.oai_param.merge(oai_param);
        if context.framework.is_none() {
            context.framework = framework;
            context.default_value = default_value;
        }
        let refresh_target = context
            .target
            .as_ref()
            .is_none_or(|t| t.kind() == TargetKind::Method);
        if refresh_target {
            context.target = target.cloned();
            context.target_type = target.and_then(|t| jaxrs::type_of(index, t));
        }
    }

    fn read_parameter_annotation(&mut self, annotation: &AnnotationInstance, overrides_only: bool) {
        if annotation.is(names::PARAMETERS) {
            for nested in annotation.nested_array("value").unwrap_or_default() {
                let nested = nested.retargeted(annotation.target.as_ref());
                let param = self.scan.models.read_parameter(&nested);
                let preferred = (param.name.clone(), param.location);
                if !self.preferred_order.contains(&preferred) {
                    self.preferred_order.push(preferred);
                }
                self.read_oai_parameter(param, nested.target.as_ref(), overrides_only);
            }
        } else if annotation.is(names::PARAMETER) {
            let param = self.scan.models.read_parameter(annotation);
            self.read_oai_parameter(param, annotation.target.as_ref(), overrides_only);
        }
    }

    fn read_oai_parameter(
        &mut self,
        param: Parameter,
        target: Option<&AnnotationTarget>,
        overrides_only: bool,
    ) {
        let key = ParameterKey::of_parameter(&param);
        self.read_parameter(key, Some(param), None, None, target, overrides_only);
    }

    fn read_annotated_type(
        &mut self,
        annotation: &AnnotationInstance,
        bean: Option<&AnnotationInstance>,
        overrides_only: bool,
    ) {
        if is_oai_parameter(annotation) {
            self.read_parameter_annotation(annotation, overrides_only);
        } else if let Some(framework) = jaxrs::framework_parameter(&annotation.name) {
            self.read_framework(annotation, framework, bean, overrides_only);
        }
    }

    fn read_framework(
        &mut self,
        annotation: &AnnotationInstance,
        framework: FrameworkParameter,
        bean: Option<&AnnotationInstance>,
        overrides_only: bool,
    ) {
        let index = self.scan.index;
        let target = annotation.target.as_ref();
        let target_type = target.and_then(|t| jaxrs::type_of(index, t));

        if framework.style == Some(Style::Form) {
            if let Some(name) = jaxrs::param_name(index, annotation) {
                self.form_params.insert(name, annotation.clone());
            }
            self.read_framework_parameter(annotation, framework, overrides_only);
        } else if framework.style == Some(Style::Matrix) {
            // Keyed by the segment the bean, or the parameter, is bound to.
            let segment = bean
                .and_then(|b| b.target.as_ref())
                .or(target)
                .and_then(|t| jaxrs::last_path_segment_of(index, t));
            if let (Some(segment), Some(name)) = (segment, jaxrs::param_name(index, annotation)) {
                self.matrix_params
                    .entry(segment)
                    .or_default()
                    .insert(name, annotation.clone());
            }
        } else if framework.location == Some(In::Path)
            && target_type.as_ref().is_some_and(jaxrs::is_path_segment)
        {
            if let Some(segment) = jaxrs::param_name(index, annotation) {
                self.matrix_params.entry(segment).or_default();
            }
        } else if framework.location.is_some() {
            self.read_framework_parameter(annotation, framework, overrides_only);
        } else if target.is_some() {
            // @BeanParam or @MultipartForm
            self.set_media_type(framework);
            let bean_type = target_type.map(|t| t.unwrap_optional());
            if let Some(class) = bean_type.as_ref().and_then(|t| t.class_name())
                && index.class(class).is_some()
            {
                self.read_parameters_inherited(class, Some(annotation), overrides_only);
            }
        }
    }

    fn read_framework_parameter(
        &mut self,
        annotation: &AnnotationInstance,
        framework: FrameworkParameter,
        overrides_only: bool,
    ) {
        let index = self.scan.index;
        let target = annotation.target.as_ref();
        let key = ParameterKey::named(
            jaxrs::param_name(index, annotation),
            framework.location,
            framework.effective_style(),
        );
        let default_value = target.and_then(|t| jaxrs::default_value(index, t));
        self.read_parameter(
            key,
            None,
            Some(framework),
            default_value,
            target,
            overrides_only,
        );
    }

    fn set_media_type(&mut self, framework: FrameworkParameter) {
        if self.form_media_type.is_none() {
            self.form_media_type = framework.media_type;
        }
    }

    /// Read a class and its ancestors, most distant first, each class after
    /// its interfaces.
    fn read_parameters_inherited(
        &mut self,
        class: &str,
        bean: Option<&AnnotationInstance>,
        overrides_only: bool,
    ) {
        let index = self.scan.index;
        for ancestor in index.inheritance_chain(class).into_iter().rev() {
            for interface in index.interfaces(ancestor) {
                self.read_parameters(&interface.name, bean, overrides_only);
            }
            self.read_parameters(&ancestor.name, bean, overrides_only);
        }
    }

    fn read_parameters(
        &mut self,
        class: &str,
        bean: Option<&AnnotationInstance>,
        overrides_only: bool,
    ) {
        let index = self.scan.index;
        for annotation in index.all_annotations(class) {
            if crate::is_parameter(&annotation.name)
                && jaxrs::is_bean_property_param(index, annotation)
            {
                self.read_annotated_type(annotation, bean, overrides_only);
            }
        }
    }

    /// Parameters of the contexts read so far, sorted by location and name.
    fn parameters(&mut self, method: &MethodRef) -> Vec<Parameter> {
        self.map_matrix_parameters();
        let mut parameters: Vec<Parameter> = self
            .params
            .iter()
            .filter_map(|context| self.map_parameter(method, context))
            .collect();
        parameters.sort_by(|a, b| {
            a.location
                .cmp(&b.location)
                .then_with(|| a.name.cmp(&b.name))
        });
        parameters
    }

    /// One matrix parameter per segment with an object schema holding each
    /// matrix value as a property.
    fn map_matrix_parameters(&mut self) {
        let matrix_params = std::mem::take(&mut self.matrix_params);
        for (segment, annotations) in &matrix_params {
            let found = self.params.iter().position(|c| {
                c.oai_param
                    .as_ref()
                    .is_some_and(|p| p.style == Some(Style::Matrix))
                    && c.name.as_deref() == Some(segment.as_str())
            });
            let position = found.unwrap_or_else(|| {
                self.params.push(ParameterContext {
                    name: Some(segment.clone()),
                    location: Some(In::Path),
                    style: Some(Style::Matrix),
                    framework: Some(jaxrs::MATRIX_PARAM),
                    oai_param: Some(Parameter {
                        style: Some(Style::Matrix),
                        explode: Some(true),
                        ..Parameter::default()
                    }),
                    ..ParameterContext::default()
                });
                self.params.len() - 1
            });

            let schemas = {
                let param = self.params[position]
                    .oai_param
                    .get_or_insert_with(Parameter::default);
                let mut schemas = schema::parameter_schemas(param);
                if schemas.is_empty() {
                    let object = SchemaNode::new(Schema::of_type(SchemaType::Object));
                    schema::set_parameter_schema(param, object, self.scan.config);
                    schemas = schema::parameter_schemas(param);
                }
                schemas
            };
            for node in &schemas {
                schema::set_schema_properties(self.scan, node, None, annotations, false);
            }
        }
        self.matrix_params = matrix_params;
    }

    /// A path template variable bound to a method argument by name alone.
    fn unannotated_path_parameter(
        &self,
        method: &MethodRef,
        name: &str,
    ) -> Option<ParameterContext> {
        let info = self.scan.index.method(method)?;
        let (position, argument) = info
            .parameters
            .iter()
            .enumerate()
            .find(|(_, p)| {
                p.name.as_deref() == Some(name)
                    && !jaxrs::contains_jaxrs_annotations(&p.annotations)
            })?;
        Some(ParameterContext {
            name: Some(name.to_string()),
            location: jaxrs::PATH_PARAM.location,
            style: jaxrs::PATH_PARAM.style,
            framework: Some(jaxrs::PATH_PARAM),
            target: Some(method.parameter(position)),
            target_type: Some(argument.ty.clone()),
            ..ParameterContext::default()
        })
    }

    fn map_parameter(&self, method: &MethodRef, context: &ParameterContext) -> Option<Parameter> {
        let scan = self.scan;
        let index = scan.index;
        let mut param = context.oai_param.clone().unwrap_or_default();
        param.name = context.name.clone();
        if param.location.is_none() {
            param.location = context.location;
        }
        if self.is_ignored(&param, method) {
            log::debug!(
                "ignoring parameter {:?} in {:?} of {}#{}",
                param.name,
                param.location,
                method.class,
                method.name
            );
            return None;
        }

        if param.location == Some(In::Path) {
            param.required = Some(true);
        }
        if param.style.is_none() {
            param.style = context.framework.and_then(|f| f.style);
        }
        if param.reference.is_none()
            && !schema::has_schema(&param)
            && let Some(node) = context
                .target_type
                .as_ref()
                .and_then(|t| scan.models.type_to_schema(t))
        {
            schema::set_parameter_schema(&mut param, node, scan.config);
        }
        if let Some(target) = &context.target {
            if param.deprecated.is_none() && index.has_annotation(target, names::DEPRECATED) {
                param.deprecated = Some(true);
            }
            if param.extensions.is_none() {
                param.extensions = scan.models.read_extensions(target);
            }
        }
        self.augment_schemas(&mut param, context);
        if param.required.is_none()
            && context
                .target_type
                .as_ref()
                .is_some_and(|t| t.is_optional())
        {
            param.required = Some(false);
        }
        if context.oai_param.is_some() && context.framework.is_none() && param.reference.is_none() {
            log::warn!(
                "@Parameter {:?} in {:?} on {}#{} has no matching framework parameter",
                param.name,
                param.location,
                method.class,
                method.name
            );
        }
        Some(param)
    }

    fn is_ignored(&self, param: &Parameter, method: &MethodRef) -> bool {
        if param.location.is_none() && param.reference.is_none() {
            // Never bound to a request value.
            return true;
        }
        if param.hidden {
            return true;
        }
        let name = param.name.as_deref();
        if name.is_none_or(|n| n.trim().is_empty()) && param.reference.is_none() {
            return true;
        }
        if param.location == Some(In::Path) {
            let full_path = jaxrs::method_path(self.scan.index, method);
            if !path::parameter_in_path(name, param.style, Some(&full_path)) {
                return true;
            }
        }
        param.location == Some(In::Header)
            && name.is_some_and(|n| IGNORED_HEADERS.contains(&n.to_ascii_lowercase().as_str()))
    }

    /// Apply defaults and validation constraints to every schema of `param`.
    fn augment_schemas(&self, param: &mut Parameter, context: &ParameterContext) {
        let mut required = false;
        if let Some(node) = param.schema.take() {
            let (node, node_required) = self.augment_schema(node, param.name.as_deref(), context);
            param.schema = Some(node);
            required |= node_required;
        }
        let name = param.name.clone();
        if let Some(content) = param.content.as_mut() {
            for media_type in content.media_types.values_mut() {
                if let Some(node) = media_type.schema.take() {
                    let (node, node_required) = self.augment_schema(node, name.as_deref(), context);
                    media_type.schema = Some(node);
                    required |= node_required;
                }
            }
        }
        if required && param.required.is_none() {
            param.required = Some(true);
        }
    }

    /// A bare `$ref` is never modified: defaults and constraints go to a
    /// local schema typed like the referenced one, and when that local
    /// schema gained anything the result is `allOf: [$ref, local]`.
    fn augment_schema(
        &self,
        node: SchemaNode,
        name: Option<&str>,
        context: &ParameterContext,
    ) -> (SchemaNode, bool) {
        let scan = self.scan;
        let annotations = context
            .target
            .as_ref()
            .map(|t| scan.index.annotations(t))
            .unwrap_or_default();

        let reference = {
            let current = node.borrow();
            current
                .reference
                .clone()
                .filter(|_| current.is_bare_reference())
        };
        let Some(reference) = reference else {
            let required = {
                let mut current = node.borrow_mut();
                let outcome = schema::constrain(scan, annotations, &mut current);
                if current.default_value.is_none() {
                    current.default_value = context.default_value.clone();
                }
                outcome.required
            };
            return (node, required);
        };

        let mut local = Schema {
            schema_type: self.referenced_type(&reference, name, context),
            ..Schema::default()
        };
        let outcome = schema::constrain(scan, annotations, &mut local);
        let mut changed = outcome.changed;
        if local.default_value.is_none() && context.default_value.is_some() {
            local.default_value = context.default_value.clone();
            changed = true;
        }
        if !changed {
            return (node, outcome.required);
        }
        local.schema_type = None;
        let composed = Schema {
            all_of: Some(vec![node, SchemaNode::new(local)]),
            ..Schema::default()
        };
        (SchemaNode::new(composed), outcome.required)
    }

    /// Type of the referenced component, else a guess from the Java type.
    fn referenced_type(
        &self,
        reference: &str,
        name: Option<&str>,
        context: &ParameterContext,
    ) -> Option<SchemaType> {
        if let Some(component) = self.scan.components.and_then(|c| c.schema(reference)) {
            return component.borrow().schema_type;
        }
        log::warn!(
            "schema {reference} of {name:?} is unresolvable, inferring type from {:?}",
            context.target_type
        );
        context
            .target_type
            .as_ref()
            .and_then(|t| self.scan.models.type_to_schema(t))
            .and_then(|node| node.borrow().schema_type)
    }

    fn form_body_content(&self) -> Option<Content> {
        if self.form_params.is_empty() {
            return None;
        }
        let node = SchemaNode::new(Schema::of_type(SchemaType::Object));
        let mut encodings = IndexMap::new();
        schema::set_schema_properties(
            self.scan,
            &node,
            Some(&mut encodings),
            &self.form_params,
            true,
        );
        let media_type = MediaType {
            schema: Some(node),
            encoding: (!encodings.is_empty()).then_some(encodings),
            ..MediaType::default()
        };

        let media_types = match &self.scan.consumes {
            Some(consumes) if !consumes.is_empty() => consumes.clone(),
            _ => vec![
                self.form_media_type
                    .unwrap_or(jaxrs::APPLICATION_FORM_URLENCODED)
                    .to_string(),
            ],
        };
        let mut content = Content::default();
        for name in media_types {
            content.media_types.insert(name, media_type.clone());
        }
        Some(content)
    }
}

fn is_oai_parameter(annotation: &AnnotationInstance) -> bool {
    annotation.is(names::PARAMETER) || annotation.is(names::PARAMETERS)
}
