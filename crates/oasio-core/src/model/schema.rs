use std::cell::{Ref, RefCell, RefMut};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::{Number, Value};

use super::{Extensions, ExternalDocumentation, model_enum};

model_enum! {
    pub enum SchemaType {
        Integer => "integer",
        Number => "number",
        Boolean => "boolean",
        String => "string",
        Object => "object",
        Array => "array",
        Null => "null",
    }
}

/// JSON Schema as used by OpenAPI.
///
/// Bounds follow 3.1: `exclusive_minimum`/`exclusive_maximum` are numbers.
/// Readers and writers translate to the 3.0 boolean form. `nullable` is
/// written as a `"null"` type entry in 3.1.
#[derive(Clone, Default)]
pub struct Schema {
    pub reference: Option<String>,
    pub format: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub default_value: Option<Value>,
    pub multiple_of: Option<Number>,
    pub maximum: Option<Number>,
    pub exclusive_maximum: Option<Number>,
    pub minimum: Option<Number>,
    pub exclusive_minimum: Option<Number>,
    pub max_length: Option<i64>,
    pub min_length: Option<i64>,
    pub pattern: Option<String>,
    pub max_items: Option<i64>,
    pub min_items: Option<i64>,
    pub unique_items: Option<bool>,
    pub max_properties: Option<i64>,
    pub min_properties: Option<i64>,
    pub required: Option<Vec<String>>,
    pub enumeration: Option<Vec<Value>>,
    pub schema_type: Option<SchemaType>,
    pub items: Option<SchemaNode>,
    pub all_of: Option<Vec<SchemaNode>>,
    pub properties: Option<IndexMap<String, SchemaNode>>,
    pub additional_properties: Option<AdditionalProperties>,
    pub read_only: Option<bool>,
    pub xml: Option<Xml>,
    pub external_docs: Option<ExternalDocumentation>,
    pub example: Option<Value>,
    pub one_of: Option<Vec<SchemaNode>>,
    pub any_of: Option<Vec<SchemaNode>>,
    pub not: Option<SchemaNode>,
    pub discriminator: Option<Discriminator>,
    pub nullable: Option<bool>,
    pub write_only: Option<bool>,
    pub deprecated: Option<bool>,
    pub extensions: Option<Extensions>,
}

impl Schema {
    pub fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    pub fn reference_to(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            ..Self::default()
        }
    }

    /// A `$ref` with no other field set.
    pub fn is_bare_reference(&self) -> bool {
        self.reference.is_some()
            && Schema {
                reference: None,
                ..self.clone()
            } == Schema::default()
    }

    pub fn add_property(&mut self, name: impl Into<String>, schema: SchemaNode) {
        self.properties
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), schema);
    }

    pub fn add_required(&mut self, name: &str) {
        let required = self.required.get_or_insert_with(Vec::new);
        if !required.iter().any(|r| r == name) {
            required.push(name.to_string());
        }
    }

    /// Child schemas in traversal order.
    pub fn children(&self) -> Vec<SchemaNode> {
        let mut children = Vec::new();
        children.extend(self.items.iter().cloned());
        for list in [&self.all_of, &self.one_of, &self.any_of].into_iter().flatten() {
            children.extend(list.iter().cloned());
        }
        children.extend(self.not.iter().cloned());
        if let Some(properties) = &self.properties {
            children.extend(properties.values().cloned());
        }
        if let Some(AdditionalProperties::Schema(schema)) = &self.additional_properties {
            children.push(schema.clone());
        }
        children
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(SchemaNode),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Discriminator {
    pub property_name: Option<String>,
    pub mapping: Option<IndexMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Xml {
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub prefix: Option<String>,
    pub attribute: Option<bool>,
    pub wrapped: Option<bool>,
    pub extensions: Option<Extensions>,
}

/// Shared, mutable handle to a [`Schema`].
///
/// Cloning the handle shares the schema; the graph may be cyclic. Equality
/// and `Debug` are guarded against cycles. Cyclic graphs are not freed.
#[derive(Clone, Default)]
pub struct SchemaNode(Rc<RefCell<Schema>>);

impl SchemaNode {
    pub fn new(schema: Schema) -> Self {
        SchemaNode(Rc::new(RefCell::new(schema)))
    }

    pub fn borrow(&self) -> Ref<'_, Schema> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Schema> {
        self.0.borrow_mut()
    }

    /// Identity of the shared schema, for visited sets.
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    pub fn ptr_eq(&self, other: &SchemaNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Copy the whole reachable graph, preserving sharing and cycles.
    pub fn deep_copy(&self) -> SchemaNode {
        let mut copies = HashMap::new();
        self.copy_into(&mut copies)
    }

    fn copy_into(&self, copies: &mut HashMap<usize, SchemaNode>) -> SchemaNode {
        if let Some(copy) = copies.get(&self.id()) {
            return copy.clone();
        }
        let copy = SchemaNode::new(Schema::default());
        copies.insert(self.id(), copy.clone());
        let mut schema = self.borrow().clone();
        let mut relink = |node: &mut SchemaNode| *node = node.copy_into(copies);
        schema.items.iter_mut().for_each(&mut relink);
        schema.not.iter_mut().for_each(&mut relink);
        for list in [&mut schema.all_of, &mut schema.one_of, &mut schema.any_of]
            .into_iter()
            .flatten()
        {
            list.iter_mut().for_each(&mut relink);
        }
        if let Some(properties) = &mut schema.properties {
            properties.values_mut().for_each(&mut relink);
        }
        if let Some(AdditionalProperties::Schema(node)) = &mut schema.additional_properties {
            relink(node);
        }
        *copy.borrow_mut() = schema;
        copy
    }
}

impl From<Schema> for SchemaNode {
    fn from(schema: Schema) -> Self {
        SchemaNode::new(schema)
    }
}

/// Applies `$apply!(field)` to each field that holds no schema.
macro_rules! plain_fields {
    ($apply:ident) => {
        $apply!(
            reference, format, title, description, default_value, multiple_of, maximum,
            exclusive_maximum, minimum, exclusive_minimum, max_length, min_length, pattern,
            max_items, min_items, unique_items, max_properties, min_properties, required,
            enumeration, schema_type, read_only, xml, external_docs, example, discriminator,
            nullable, write_only, deprecated, extensions
        )
    };
}

/// Node pairs under comparison; a pair seen again is assumed equal.
type Compared = HashSet<(usize, usize)>;

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.eq_with(other, &mut Compared::new())
    }
}

impl PartialEq for SchemaNode {
    fn eq(&self, other: &Self) -> bool {
        self.eq_with(other, &mut Compared::new())
    }
}

impl Schema {
    fn eq_with(&self, other: &Schema, compared: &mut Compared) -> bool {
        macro_rules! same {
            ($($field:ident),+) => {
                $(self.$field == other.$field)&&+
            };
        }
        plain_fields!(same)
            && nodes_eq(self.items.as_ref(), other.items.as_ref(), compared)
            && nodes_eq(self.not.as_ref(), other.not.as_ref(), compared)
            && lists_eq(&self.all_of, &other.all_of, compared)
            && lists_eq(&self.one_of, &other.one_of, compared)
            && lists_eq(&self.any_of, &other.any_of, compared)
            && match (&self.properties, &other.properties) {
                (Some(a), Some(b)) => {
                    a.len() == b.len()
                        && a.iter().all(|(name, node)| {
                            b.get(name)
                                .is_some_and(|theirs| node.eq_with(theirs, compared))
                        })
                }
                (a, b) => a.is_none() && b.is_none(),
            }
            && match (&self.additional_properties, &other.additional_properties) {
                (Some(AdditionalProperties::Schema(a)), Some(AdditionalProperties::Schema(b))) => {
                    a.eq_with(b, compared)
                }
                (a, b) => a == b,
            }
    }
}

fn nodes_eq(a: Option<&SchemaNode>, b: Option<&SchemaNode>, compared: &mut Compared) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.eq_with(b, compared),
        (a, b) => a.is_none() && b.is_none(),
    }
}

fn lists_eq(
    a: &Option<Vec<SchemaNode>>,
    b: &Option<Vec<SchemaNode>>,
    compared: &mut Compared,
) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| a.eq_with(b, compared))
        }
        (a, b) => a.is_none() && b.is_none(),
    }
}

impl SchemaNode {
    fn eq_with(&self, other: &SchemaNode, compared: &mut Compared) -> bool {
        if self.ptr_eq(other) || !compared.insert((self.id(), other.id())) {
            return true;
        }
        match (self.0.try_borrow(), other.0.try_borrow()) {
            (Ok(a), Ok(b)) => a.eq_with(&b, compared),
            _ => false,
        }
    }
}

/// A schema value paired with the nodes already being formatted.
struct Tracked<'a, T> {
    value: &'a T,
    formatting: &'a RefCell<HashSet<usize>>,
}

impl<'a, T> Tracked<'a, T> {
    fn with<'b, U>(&self, value: &'b U) -> Tracked<'b, U>
    where
        'a: 'b,
    {
        Tracked {
            value,
            formatting: self.formatting,
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatting = RefCell::new(HashSet::new());
        let tracked = Tracked {
            value: self,
            formatting: &formatting,
        };
        fmt::Debug::fmt(&tracked, f)
    }
}

impl fmt::Debug for SchemaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatting = RefCell::new(HashSet::new());
        let tracked = Tracked {
            value: self,
            formatting: &formatting,
        };
        fmt::Debug::fmt(&tracked, f)
    }
}

impl fmt::Debug for Tracked<'_, SchemaNode> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.value.id();
        if !self.formatting.borrow_mut().insert(id) {
            return write!(f, "SchemaNode(<cycle {id:#x}>)");
        }
        let result = match self.value.0.try_borrow() {
            Ok(schema) => fmt::Debug::fmt(&self.with(&*schema), f),
            Err(_) => f.write_str("SchemaNode(<borrowed>)"),
        };
        self.formatting.borrow_mut().remove(&id);
        result
    }
}

impl fmt::Debug for Tracked<'_, Vec<SchemaNode>> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.value.iter().map(|node| self.with(node)))
            .finish()
    }
}

impl fmt::Debug for Tracked<'_, IndexMap<String, SchemaNode>> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.value
                    .iter()
                    .map(|(name, node)| (name, self.with(node))),
            )
            .finish()
    }
}

impl fmt::Debug for Tracked<'_, AdditionalProperties> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            AdditionalProperties::Bool(allowed) => f.debug_tuple("Bool").field(allowed).finish(),
            AdditionalProperties::Schema(node) => {
                f.debug_tuple("Schema").field(&self.with(node)).finish()
            }
        }
    }
}

/// Only fields that are set are listed.
impl fmt::Debug for Tracked<'_, Schema> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let schema = self.value;
        let mut out = f.debug_struct("Schema");
        macro_rules! set {
            ($($field:ident),+) => {
                $(if let Some(value) = &schema.$field {
                    out.field(stringify!($field), value);
                })+
            };
        }
        plain_fields!(set);
        if let Some(items) = &schema.items {
            out.field("items", &self.with(items));
        }
        for (name, list) in [
            ("all_of", &schema.all_of),
            ("one_of", &schema.one_of),
            ("any_of", &schema.any_of),
        ] {
            if let Some(list) = list {
                out.field(name, &self.with(list));
            }
        }
        if let Some(not) = &schema.not {
            out.field("not", &self.with(not));
        }
        if let Some(properties) = &schema.properties {
            out.field("properties", &self.with(properties));
        }
        if let Some(additional) = &schema.additional_properties {
            out.field("additional_properties", &self.with(additional));
        }
        out.finish()
    }
}
