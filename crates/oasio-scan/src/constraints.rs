//! Bean-validation constraints applied to parameter and property schemas.

use oasio_core::annotation::AnnotationInstance;
use oasio_core::model::{AdditionalProperties, Schema, SchemaType};
use serde_json::Number;

/// Result of applying constraints to one schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstraintOutcome {
    /// A schema field was set.
    pub changed: bool,
    /// The annotated value must be present.
    pub required: bool,
}

/// Translates validation annotations into schema restrictions.
pub trait ConstraintScanner {
    /// Apply the constraints found in `annotations` to `schema`. Values
    /// already present on the schema are never replaced.
    fn apply(&self, annotations: &[AnnotationInstance], schema: &mut Schema) -> ConstraintOutcome;
}

const PACKAGES: [&str; 2] = ["javax.validation.constraints.", "jakarta.validation.constraints."];
const DEFAULT_GROUPS: [&str; 2] = [
    "javax.validation.groups.Default",
    "jakarta.validation.groups.Default",
];

/// Jakarta and javax bean validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BeanValidationScanner;

/// Annotations that apply to the default validation group.
struct Constraints<'a> {
    annotations: &'a [AnnotationInstance],
}

impl<'a> Constraints<'a> {
    fn get(&self, simple: &str) -> Option<&'a AnnotationInstance> {
        self.annotations.iter().find(|a| {
            PACKAGES
                .iter()
                .any(|p| a.name.strip_prefix(p) == Some(simple))
                && in_default_group(a)
        })
    }
}

fn in_default_group(constraint: &AnnotationInstance) -> bool {
    match constraint.class_array("groups") {
        None => true,
        Some(groups) => {
            groups.is_empty()
                || groups
                    .iter()
                    .any(|g| g.class_name().is_some_and(|n| DEFAULT_GROUPS.contains(&n)))
        }
    }
}

/// Tracks whether any field was set.
#[derive(Default)]
struct Changes(bool);

impl Changes {
    fn set<T>(&mut self, slot: &mut Option<T>, value: T) {
        if slot.is_none() {
            *slot = Some(value);
            self.0 = true;
        }
    }
}

impl ConstraintScanner for BeanValidationScanner {
    fn apply(&self, annotations: &[AnnotationInstance], schema: &mut Schema) -> ConstraintOutcome {
        let Some(schema_type) = schema.schema_type else {
            return ConstraintOutcome::default();
        };
        if schema.reference.is_some() {
            return ConstraintOutcome::default();
        }
        let constraints = Constraints { annotations };
        let mut changes = Changes::default();
        let mut required = false;

        match schema_type {
            SchemaType::Array => {
                required |= not_null(&constraints, schema, &mut changes);
                if let Some(size) = constraints.get("Size") {
                    size_bounds(
                        size,
                        &mut schema.min_items,
                        &mut schema.max_items,
                        &mut changes,
                    );
                }
                if constraints.get("NotEmpty").is_some() {
                    changes.set(&mut schema.min_items, 1);
                    required = true;
                }
            }
            SchemaType::Boolean => {
                required |= not_null(&constraints, schema, &mut changes);
            }
            SchemaType::Integer | SchemaType::Number => {
                decimal_bounds(&constraints, schema, &mut changes);
                digits(&constraints, schema, &mut changes);
                integer_bounds(&constraints, schema, &mut changes);
                required |= not_null(&constraints, schema, &mut changes);
                sign_bounds(&constraints, schema, &mut changes);
            }
            SchemaType::Object => {
                required |= not_null(&constraints, schema, &mut changes);
                if allows_additional_properties(schema) {
                    if let Some(size) = constraints.get("Size") {
                        size_bounds(
                            size,
                            &mut schema.min_properties,
                            &mut schema.max_properties,
                            &mut changes,
                        );
                    }
                    if constraints.get("NotEmpty").is_some() {
                        changes.set(&mut schema.min_properties, 1);
                        required = true;
                    }
                }
            }
            SchemaType::String => {
                decimal_bounds(&constraints, schema, &mut changes);
                digits(&constraints, schema, &mut changes);
                if constraints.get("NotBlank").is_some() {
                    changes.set(&mut schema.nullable, false);
                    changes.set(&mut schema.pattern, "\\S".to_string());
                    required = true;
                }
                required |= not_null(&constraints, schema, &mut changes);
                if let Some(size) = constraints.get("Size") {
                    size_bounds(
                        size,
                        &mut schema.min_length,
                        &mut schema.max_length,
                        &mut changes,
                    );
                }
                if constraints.get("NotEmpty").is_some() {
                    changes.set(&mut schema.nullable, false);
                    changes.set(&mut schema.min_length, 1);
                    required = true;
                }
                if let Some(regexp) = constraints
                    .get("Pattern")
                    .and_then(|p| p.string_value("regexp"))
                {
                    changes.set(&mut schema.pattern, regexp.to_string());
                }
            }
            SchemaType::Null => {}
        }

        ConstraintOutcome {
            changed: changes.0,
            required,
        }
    }
}

fn not_null(constraints: &Constraints<'_>, schema: &mut Schema, changes: &mut Changes) -> bool {
    if constraints.get("NotNull").is_none() {
        return false;
    }
    changes.set(&mut schema.nullable, false);
    true
}

fn size_bounds(
    size: &AnnotationInstance,
    min: &mut Option<i64>,
    max: &mut Option<i64>,
    changes: &mut Changes,
) {
    if let Some(value) = size.i64_value("min") {
        changes.set(min, value);
    }
    if let Some(value) = size.i64_value("max") {
        changes.set(max, value);
    }
}

/// `DecimalMin`/`DecimalMax`; a non-inclusive bound becomes exclusive.
fn decimal_bounds(constraints: &Constraints<'_>, schema: &mut Schema, changes: &mut Changes) {
    let bounds = [
        ("DecimalMax", &mut schema.maximum, &mut schema.exclusive_maximum),
        ("DecimalMin", &mut schema.minimum, &mut schema.exclusive_minimum),
    ];
    for (name, inclusive_slot, exclusive_slot) in bounds {
        let Some(constraint) = constraints.get(name) else {
            continue;
        };
        if inclusive_slot.is_some() || exclusive_slot.is_some() {
            continue;
        }
        let raw = constraint.string_value("value").unwrap_or_default();
        let Ok(value) = raw.trim().parse::<Number>() else {
            log::debug!("ignoring @{name}(\"{raw}\"): not a number");
            continue;
        };
        if constraint.bool_value("inclusive") == Some(false) {
            changes.set(exclusive_slot, value);
        } else {
            changes.set(inclusive_slot, value);
        }
    }
}

/// `Digits(integer, fraction)` as a decimal pattern.
fn digits(constraints: &Constraints<'_>, schema: &mut Schema, changes: &mut Changes) {
    let Some(constraint) = constraints.get("Digits") else {
        return;
    };
    let integer = constraint.i64_value("integer").unwrap_or(0);
    let fraction = constraint.i64_value("fraction").unwrap_or(0);
    let mut pattern = String::from("^");
    if integer > 0 {
        pattern.push_str("\\d");
        if integer > 1 {
            pattern.push_str(&format!("{{1,{integer}}}"));
        }
    }
    if fraction > 0 {
        pattern.push_str("([.]\\d");
        if fraction > 1 {
            pattern.push_str(&format!("{{1,{fraction}}}"));
        }
        pattern.push_str(")?");
    }
    pattern.push('$');
    changes.set(&mut schema.pattern, pattern);
}

fn integer_bounds(constraints: &Constraints<'_>, schema: &mut Schema, changes: &mut Changes) {
    if schema.exclusive_maximum.is_none()
        && let Some(max) = constraints.get("Max").and_then(|c| c.i64_value("value"))
    {
        changes.set(&mut schema.maximum, Number::from(max));
    }
    if schema.exclusive_minimum.is_none()
        && let Some(min) = constraints.get("Min").and_then(|c| c.i64_value("value"))
    {
        changes.set(&mut schema.minimum, Number::from(min));
    }
}

/// `Positive`, `PositiveOrZero`, `Negative` and `NegativeOrZero`.
fn sign_bounds(constraints: &Constraints<'_>, schema: &mut Schema, changes: &mut Changes) {
    if schema.exclusive_minimum.is_none() {
        if constraints.get("Positive").is_some() {
            changes.set(&mut schema.minimum, Number::from(1));
        }
        if constraints.get("PositiveOrZero").is_some() {
            changes.set(&mut schema.minimum, Number::from(0));
        }
    }
    if schema.exclusive_maximum.is_none() {
        if constraints.get("Negative").is_some() {
            changes.set(&mut schema.maximum, Number::from(-1));
        }
        if constraints.get("NegativeOrZero").is_some() {
            changes.set(&mut schema.maximum, Number::from(0));
        }
    }
}

fn allows_additional_properties(schema: &Schema) -> bool {
    match &schema.additional_properties {
        Some(AdditionalProperties::Bool(allowed)) => *allowed,
        Some(AdditionalProperties::Schema(_)) => true,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oasio_core::annotation::TypeRef;

    fn constraint(simple: &str) -> AnnotationInstance {
        AnnotationInstance::new(format!("jakarta.validation.constraints.{simple}"))
    }

    #[test]
    fn test_string_constraints() {
        let annotations = vec![
            constraint("NotNull"),
            constraint("Size").with("min", 2i64).with("max", 16i64),
        ];
        let mut schema = Schema::of_type(SchemaType::String);
        let outcome = BeanValidationScanner.apply(&annotations, &mut schema);
        assert_eq!(
            outcome,
            ConstraintOutcome {
                changed: true,
                required: true
            }
        );
        assert_eq!(schema.min_length, Some(2));
        assert_eq!(schema.max_length, Some(16));
        assert_eq!(schema.nullable, Some(false));
    }

    #[test]
    fn test_existing_values_are_kept() {
        let annotations =
            vec![AnnotationInstance::new("javax.validation.constraints.Max").with("value", 10i64)];
        let mut schema = Schema {
            maximum: Some(Number::from(5)),
            ..Schema::of_type(SchemaType::Integer)
        };
        let outcome = BeanValidationScanner.apply(&annotations, &mut schema);
        assert!(!outcome.changed);
        assert_eq!(schema.maximum, Some(Number::from(5)));
    }

    #[test]
    fn test_exclusive_decimal_bound() {
        let annotations = vec![
            constraint("DecimalMin")
                .with("value", "0.5")
                .with("inclusive", false),
            constraint("Positive"),
        ];
        let mut schema = Schema::of_type(SchemaType::Number);
        BeanValidationScanner.apply(&annotations, &mut schema);
        assert_eq!(schema.exclusive_minimum, Some("0.5".parse().unwrap()));
        assert_eq!(schema.minimum, None);
    }

    #[test]
    fn test_non_default_group_is_ignored() {
        let annotations = vec![constraint("NotNull").with("groups", TypeRef::class("api.Create"))];
        let mut schema = Schema::of_type(SchemaType::Boolean);
        let outcome = BeanValidationScanner.apply(&annotations, &mut schema);
        assert_eq!(outcome, ConstraintOutcome::default());
    }

    #[test]
    fn test_untyped_and_reference_schemas_are_skipped() {
        let annotations = vec![constraint("NotNull")];
        let mut untyped = Schema::default();
        assert_eq!(
            BeanValidationScanner.apply(&annotations, &mut untyped),
            ConstraintOutcome::default()
        );
        let mut reference = Schema::reference_to("#/components/schemas/Pet");
        reference.schema_type = Some(SchemaType::Object);
        assert_eq!(
            BeanValidationScanner.apply(&annotations, &mut reference),
            ConstraintOutcome::default()
        );
    }

    #[test]
    fn test_digits_pattern() {
        let annotations = vec![
            constraint("Digits")
                .with("integer", 3i64)
                .with("fraction", 2i64),
        ];
        let mut schema = Schema::of_type(SchemaType::String);
        BeanValidationScanner.apply(&annotations, &mut schema);
        assert_eq!(schema.pattern.as_deref(), Some("^\\d{1,3}([.]\\d{1,2})?$"));
    }
}
