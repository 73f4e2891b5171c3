use indexmap::IndexMap;

use crate::annotation::{AnnotationInstance, AnnotationTarget, names};
use crate::json::JsonIo;
use crate::model::{
    OAuthFlow, OAuthFlows, Reference, ReferenceType, SecurityRequirement, SecurityScheme,
    SecuritySchemeIn, SecuritySchemeType,
};

use super::{
    AnnotationReader, JsonReader, JsonWriter, ModelIo, OAuthFlowIo, OAuthFlowsIo, ObjectReader,
    ObjectWriter, SecurityRequirementIo, SecuritySchemeIo, annotation_key, annotation_ref,
    string_member, strings_member, write_reference,
};

impl<J: JsonIo> AnnotationReader<J> for SecuritySchemeIo<'_, J> {
    const ANNOTATION: &'static str = names::SECURITY_SCHEME;

    fn read_annotation(&self, annotation: &AnnotationInstance) -> SecurityScheme {
        let ctx = self.context();
        SecurityScheme {
            reference: annotation_ref(annotation, ReferenceType::SecurityScheme),
            scheme_type: annotation
                .enum_value("type")
                .and_then(SecuritySchemeType::from_constant),
            description: string_member(annotation, "description"),
            name: string_member(annotation, "apiKeyName"),
            location: annotation
                .enum_value("in")
                .and_then(SecuritySchemeIn::from_constant),
            scheme: string_member(annotation, "scheme"),
            bearer_format: string_member(annotation, "bearerFormat"),
            flows: ctx.oauth_flows().read_nested(annotation, "flows"),
            open_id_connect_url: string_member(annotation, "openIdConnectUrl"),
            extensions: ctx.extensions().read_extensible(annotation),
        }
    }

    fn annotation_name(&self, annotation: &AnnotationInstance) -> Option<String> {
        annotation_key(annotation, "securitySchemeName")
    }
}

impl<J: JsonIo> JsonReader<J> for SecuritySchemeIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> SecurityScheme {
        let r = ObjectReader::new(self.json(), node);
        SecurityScheme {
            reference: r.reference(),
            scheme_type: r
                .string("type")
                .and_then(|t| SecuritySchemeType::from_wire(&t)),
            description: r.string("description"),
            name: r.string("name"),
            location: r.string("in").and_then(|l| SecuritySchemeIn::from_wire(&l)),
            scheme: r.string("scheme"),
            bearer_format: r.string("bearerFormat"),
            flows: self.context().oauth_flows().read_property(node, "flows"),
            open_id_connect_url: r.string("openIdConnectUrl"),
            extensions: r.extensions(),
        }
    }
}

impl<J: JsonIo> JsonWriter<J> for SecuritySchemeIo<'_, J> {
    fn write(&self, model: &SecurityScheme) -> Option<J::Value> {
        let ctx = self.context();
        if let Some(reference) = model.reference() {
            return Some(write_reference(ctx, reference, None, model.description.as_deref()));
        }
        let mut out = ObjectWriter::new(self.json());
        out.string("type", model.scheme_type.map(|t| t.as_str()));
        out.string("description", model.description.as_deref());
        out.string("name", model.name.as_deref());
        out.string("in", model.location.map(|l| l.as_str()));
        out.string("scheme", model.scheme.as_deref());
        out.string("bearerFormat", model.bearer_format.as_deref());
        out.node("flows", ctx.oauth_flows().write_opt(model.flows.as_ref()));
        out.string("openIdConnectUrl", model.open_id_connect_url.as_deref());
        out.extensions(model.extensions.as_ref());
        Some(out.build())
    }
}

const FLOW_KINDS: [&str; 4] = ["implicit", "password", "clientCredentials", "authorizationCode"];

impl<J: JsonIo> AnnotationReader<J> for OAuthFlowsIo<'_, J> {
    const ANNOTATION: &'static str = names::OAUTH_FLOWS;

    fn read_annotation(&self, annotation: &AnnotationInstance) -> OAuthFlows {
        let ctx = self.context();
        let flow = |kind: &str| ctx.oauth_flow().read_nested(annotation, kind);
        OAuthFlows {
            implicit: flow(FLOW_KINDS[0]),
            password: flow(FLOW_KINDS[1]),
            client_credentials: flow(FLOW_KINDS[2]),
            authorization_code: flow(FLOW_KINDS[3]),
            extensions: ctx.extensions().read_extensible(annotation),
        }
    }
}

impl<J: JsonIo> JsonReader<J> for OAuthFlowsIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> OAuthFlows {
        let flow_io = self.context().oauth_flow();
        let flow = |kind: &str| flow_io.read_property(node, kind);
        OAuthFlows {
            implicit: flow(FLOW_KINDS[0]),
            password: flow(FLOW_KINDS[1]),
            client_credentials: flow(FLOW_KINDS[2]),
            authorization_code: flow(FLOW_KINDS[3]),
            extensions: ObjectReader::new(self.json(), node).extensions(),
        }
    }
}

impl<J: JsonIo> JsonWriter<J> for OAuthFlowsIo<'_, J> {
    fn write(&self, model: &OAuthFlows) -> Option<J::Value> {
        let flow_io = self.context().oauth_flow();
        let mut out = ObjectWriter::new(self.json());
        let flows = [
            &model.implicit,
            &model.password,
            &model.client_credentials,
            &model.authorization_code,
        ];
        for (kind, flow) in FLOW_KINDS.iter().zip(flows) {
            out.node(kind, flow_io.write_opt(flow.as_ref()));
        }
        out.extensions(model.extensions.as_ref());
        Some(out.build())
    }
}

impl<J: JsonIo> AnnotationReader<J> for OAuthFlowIo<'_, J> {
    const ANNOTATION: &'static str = names::OAUTH_FLOW;

    fn read_annotation(&self, annotation: &AnnotationInstance) -> OAuthFlow {
        // `@OAuthScope` entries; a scope without a description maps to "".
        let scopes = annotation.nested_array("scopes").map(|scopes| {
            scopes
                .into_iter()
                .filter_map(|scope| {
                    let name = string_member(scope, "name")?;
                    let description = scope.string_value("description").unwrap_or_default();
                    Some((name, description.to_string()))
                })
                .collect::<IndexMap<_, _>>()
        });
        OAuthFlow {
            authorization_url: string_member(annotation, "authorizationUrl"),
            token_url: string_member(annotation, "tokenUrl"),
            refresh_url: string_member(annotation, "refreshUrl"),
            scopes: scopes.filter(|s| !s.is_empty()),
            extensions: self.context().extensions().read_extensible(annotation),
        }
    }
}

impl<J: JsonIo> JsonReader<J> for OAuthFlowIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> OAuthFlow {
        let r = ObjectReader::new(self.json(), node);
        OAuthFlow {
            authorization_url: r.string("authorizationUrl"),
            token_url: r.string("tokenUrl"),
            refresh_url: r.string("refreshUrl"),
            scopes: r.string_map("scopes"),
            extensions: r.extensions(),
        }
    }
}

impl<J: JsonIo> JsonWriter<J> for OAuthFlowIo<'_, J> {
    fn write(&self, model: &OAuthFlow) -> Option<J::Value> {
        let mut out = ObjectWriter::new(self.json());
        out.string("authorizationUrl", model.authorization_url.as_deref());
        out.string("tokenUrl", model.token_url.as_deref());
        out.string("refreshUrl", model.refresh_url.as_deref());
        out.string_map("scopes", model.scopes.as_ref());
        out.extensions(model.extensions.as_ref());
        Some(out.build())
    }
}

impl<J: JsonIo> AnnotationReader<J> for SecurityRequirementIo<'_, J> {
    const ANNOTATION: &'static str = names::SECURITY_REQUIREMENT;

    /// A single scheme and its scopes.
    fn read_annotation(&self, annotation: &AnnotationInstance) -> SecurityRequirement {
        let mut requirement = SecurityRequirement::default();
        add_scheme(&mut requirement, annotation);
        requirement
    }
}

fn add_scheme(requirement: &mut SecurityRequirement, annotation: &AnnotationInstance) {
    let Some(name) = string_member(annotation, "name") else {
        log::debug!("@SecurityRequirement without a name ignored");
        return;
    };
    let scopes = strings_member(annotation, "scopes").unwrap_or_default();
    requirement.schemes.insert(name, scopes);
}

impl<J: JsonIo> SecurityRequirementIo<'_, J> {
    /// One requirement from every `@SecurityRequirement` in a
    /// `@SecurityRequirementsSet`; an empty set means security is optional.
    pub fn read_set(&self, set: &AnnotationInstance) -> SecurityRequirement {
        let mut requirement = SecurityRequirement::default();
        for annotation in set.nested_array("value").unwrap_or_default() {
            add_scheme(&mut requirement, annotation);
        }
        requirement
    }

    /// A `securitySets` member of `@OpenAPIDefinition` or `@Operation`.
    pub fn read_nested_sets(
        &self,
        parent: &AnnotationInstance,
        member: &str,
    ) -> Option<Vec<SecurityRequirement>> {
        let sets = parent.nested_array(member).filter(|s| !s.is_empty())?;
        Some(sets.into_iter().map(|set| self.read_set(set)).collect())
    }

    /// Requirements declared on `target`: single requirements first, then sets.
    pub fn read_target_requirements(
        &self,
        target: &AnnotationTarget,
    ) -> Option<Vec<SecurityRequirement>> {
        let mut requirements: Vec<SecurityRequirement> = self
            .repeatable_annotations(target)
            .iter()
            .map(|a| self.read_annotation(a))
            .collect();
        if let Some(lookup) = self.context().annotations() {
            let sets = lookup.get_repeatable_annotation(
                target,
                names::SECURITY_REQUIREMENTS_SET,
                names::SECURITY_REQUIREMENTS_SETS,
            );
            requirements.extend(sets.iter().map(|set| self.read_set(set)));
        }
        (!requirements.is_empty()).then_some(requirements)
    }

    /// A `security` array. Unlike other lists an empty one is written, since
    /// it removes inherited requirements.
    pub fn write_requirements(
        &self,
        requirements: Option<&[SecurityRequirement]>,
    ) -> Option<J::Value> {
        let requirements = requirements?;
        let json = self.json();
        let mut array = json.create_array();
        for requirement in requirements {
            if let Some(node) = self.write(requirement) {
                json.add(&mut array, node);
            }
        }
        Some(json.build_array(array))
    }
}

impl<J: JsonIo> JsonReader<J> for SecurityRequirementIo<'_, J> {
    fn read_object(&self, node: &J::Object) -> SecurityRequirement {
        let json = self.json();
        let mut requirement = SecurityRequirement::default();
        for (name, value) in json.entries(node) {
            let scopes = json
                .as_array(value)
                .map(|array| {
                    json.elements(array)
                        .into_iter()
                        .filter_map(|scope| json.as_string(scope))
                        .collect()
                })
                .unwrap_or_default();
            requirement.schemes.insert(name.into_owned(), scopes);
        }
        requirement
    }
}

impl<J: JsonIo> JsonWriter<J> for SecurityRequirementIo<'_, J> {
    fn write(&self, model: &SecurityRequirement) -> Option<J::Value> {
        let mut out = ObjectWriter::new(self.json());
        for (name, scopes) in &model.schemes {
            out.strings(name, Some(scopes));
        }
        Some(out.build())
    }
}
