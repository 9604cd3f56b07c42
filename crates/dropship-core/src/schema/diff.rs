//! Structural containment diff between two schema models.

use serde::{Deserialize, Serialize};

use super::introspect::SchemaModel;

/// Which kind of structural element is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingCategory {
    Enum,
    Model,
}

/// One structural element present in the existing schema but absent from
/// the incoming one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingItem {
    pub category: MissingCategory,

    /// Enum or model name.
    pub entity: String,

    /// Missing value/field, or `None` when the whole entity is missing.
    pub item: Option<String>,

    /// Human-readable explanation shown to the operator.
    pub message: String,
}

impl MissingItem {
    fn entity_missing(category: MissingCategory, entity: &str) -> Self {
        let noun = match category {
            MissingCategory::Enum => "enum",
            MissingCategory::Model => "model",
        };
        Self {
            category,
            entity: entity.to_string(),
            item: None,
            message: format!("{noun} {entity} is missing"),
        }
    }

    fn item_missing(category: MissingCategory, entity: &str, item: &str) -> Self {
        let (noun, member) = match category {
            MissingCategory::Enum => ("enum", "value"),
            MissingCategory::Model => ("model", "field"),
        };
        Self {
            category,
            entity: entity.to_string(),
            item: Some(item.to_string()),
            message: format!("{noun} {entity} is missing {member} {item}"),
        }
    }
}

/// Report every named element of `existing` that `incoming` lacks.
///
/// An empty result means the incoming schema is a structural superset of
/// the existing one, so overwriting loses nothing. The diff is asymmetric by
/// design: elements only present in the incoming schema are additions and
/// never block an overwrite.
pub fn containment_diff(existing: &SchemaModel, incoming: &SchemaModel) -> Vec<MissingItem> {
    let mut missing = Vec::new();

    for (name, values) in &existing.enums {
        match incoming.enums.get(name) {
            None => missing.push(MissingItem::entity_missing(MissingCategory::Enum, name)),
            Some(incoming_values) => {
                for value in values.difference(incoming_values) {
                    missing.push(MissingItem::item_missing(MissingCategory::Enum, name, value));
                }
            }
        }
    }

    for (name, fields) in &existing.models {
        match incoming.models.get(name) {
            None => missing.push(MissingItem::entity_missing(MissingCategory::Model, name)),
            Some(incoming_fields) => {
                for field in fields.difference(incoming_fields) {
                    missing.push(MissingItem::item_missing(
                        MissingCategory::Model,
                        name,
                        field,
                    ));
                }
            }
        }
    }

    missing
}

#[cfg(test)]
mod tests {
    use super::super::introspect::introspect;
    use super::*;

    const EXISTING: &str = "\
enum Role {
  USER
  ADMIN
}

model User {
  id    Int    @id
  email String
  role  Role
}
";

    #[test]
    fn test_identical_schemas_have_empty_diff() {
        let existing = introspect(EXISTING).unwrap();
        let incoming = introspect(EXISTING).unwrap();
        assert!(containment_diff(&existing, &incoming).is_empty());
    }

    #[test]
    fn test_strict_superset_has_empty_diff() {
        let incoming_text = "\
enum Role {
  USER
  ADMIN
  AUDITOR
}

model User {
  id        Int    @id
  email     String
  role      Role
  createdAt String
}

model Session {
  id Int @id
}
";
        let existing = introspect(EXISTING).unwrap();
        let incoming = introspect(incoming_text).unwrap();
        assert!(containment_diff(&existing, &incoming).is_empty());
    }

    #[test]
    fn test_one_missing_enum_value_one_entry() {
        let incoming_text = "\
enum Role {
  USER
}

model User {
  id    Int    @id
  email String
  role  Role
}
";
        let existing = introspect(EXISTING).unwrap();
        let incoming = introspect(incoming_text).unwrap();
        let missing = containment_diff(&existing, &incoming);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].category, MissingCategory::Enum);
        assert_eq!(missing[0].entity, "Role");
        assert_eq!(missing[0].item.as_deref(), Some("ADMIN"));
    }

    #[test]
    fn test_whole_model_missing() {
        let incoming_text = "\
enum Role {
  USER
  ADMIN
}
";
        let existing = introspect(EXISTING).unwrap();
        let incoming = introspect(incoming_text).unwrap();
        let missing = containment_diff(&existing, &incoming);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].category, MissingCategory::Model);
        assert!(missing[0].item.is_none());
        assert_eq!(missing[0].message, "model User is missing");
    }

    #[test]
    fn test_shrunk_but_complete_schema_is_safe() {
        // Fewer lines than EXISTING once comments/formatting collapse, but
        // structurally complete. The line-count heuristic this replaces
        // would have flagged it.
        let incoming_text =
            "enum Role {\n  USER\n  ADMIN\n}\nmodel User {\n  id Int\n  email String\n  role Role\n}\n";
        let existing = introspect(EXISTING).unwrap();
        let incoming = introspect(incoming_text).unwrap();
        assert!(containment_diff(&existing, &incoming).is_empty());
    }

    #[test]
    fn test_missing_field_and_missing_value_both_reported() {
        let incoming_text = "\
enum Role {
  USER
}

model User {
  id   Int  @id
  role Role
}
";
        let existing = introspect(EXISTING).unwrap();
        let incoming = introspect(incoming_text).unwrap();
        let missing = containment_diff(&existing, &incoming);
        assert_eq!(missing.len(), 2);
        assert!(missing
            .iter()
            .any(|m| m.category == MissingCategory::Enum && m.item.as_deref() == Some("ADMIN")));
        assert!(missing
            .iter()
            .any(|m| m.category == MissingCategory::Model && m.item.as_deref() == Some("email")));
    }
}
