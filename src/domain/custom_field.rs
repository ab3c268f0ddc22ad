//! Tenant-defined extra attributes attached to talents and contacts.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{CustomFieldId, CustomFieldName, TenantId, TypeConstraintError};

/// Record kind a custom field is attached to.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CustomFieldEntity {
    Talent,
    Person,
}

impl CustomFieldEntity {
    pub fn as_str(self) -> &'static str {
        match self {
            CustomFieldEntity::Talent => "talent",
            CustomFieldEntity::Person => "person",
        }
    }
}

impl Display for CustomFieldEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomFieldEntity {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "talent" => Ok(CustomFieldEntity::Talent),
            "person" => Ok(CustomFieldEntity::Person),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown custom field entity `{other}`"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CustomFieldType {
    Text,
    Number,
    Date,
    Boolean,
    Select,
}

impl CustomFieldType {
    pub const ALL: [CustomFieldType; 5] = [
        CustomFieldType::Text,
        CustomFieldType::Number,
        CustomFieldType::Date,
        CustomFieldType::Boolean,
        CustomFieldType::Select,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CustomFieldType::Text => "text",
            CustomFieldType::Number => "number",
            CustomFieldType::Date => "date",
            CustomFieldType::Boolean => "boolean",
            CustomFieldType::Select => "select",
        }
    }
}

impl Display for CustomFieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomFieldType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CustomFieldType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| {
                TypeConstraintError::InvalidValue(format!("unknown custom field type `{s}`"))
            })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CustomField {
    pub id: CustomFieldId,
    pub tenant_id: TenantId,
    pub entity: CustomFieldEntity,
    pub name: CustomFieldName,
    pub field_type: CustomFieldType,
    /// Allowed values; only meaningful for [`CustomFieldType::Select`].
    pub options: Vec<String>,
    pub is_required: bool,
    pub created_at: NaiveDateTime,
}

impl CustomField {
    /// Validates and normalizes a raw value for this field.
    ///
    /// Returns `Ok(None)` when an optional field is left blank, meaning the
    /// stored value should be cleared.
    pub fn normalize_value(&self, raw: &str) -> Result<Option<String>, TypeConstraintError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return if self.is_required {
                Err(TypeConstraintError::InvalidValue(format!(
                    "{} is required",
                    self.name
                )))
            } else {
                Ok(None)
            };
        }

        let invalid = || {
            TypeConstraintError::InvalidValue(format!(
                "`{trimmed}` is not a valid {} for {}",
                self.field_type, self.name
            ))
        };

        let normalized = match self.field_type {
            CustomFieldType::Text => {
                let cleaned = ammonia::clean(trimmed).trim().to_string();
                if cleaned.is_empty() {
                    return Err(invalid());
                }
                cleaned
            }
            CustomFieldType::Number => {
                let number: f64 = trimmed.replace(',', ".").parse().map_err(|_| invalid())?;
                if !number.is_finite() {
                    return Err(invalid());
                }
                number.to_string()
            }
            CustomFieldType::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map_err(|_| invalid())?
                .format("%Y-%m-%d")
                .to_string(),
            CustomFieldType::Boolean => match trimmed.to_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => "true".to_string(),
                "false" | "no" | "0" | "off" => "false".to_string(),
                _ => return Err(invalid()),
            },
            CustomFieldType::Select => self
                .options
                .iter()
                .find(|option| option.as_str() == trimmed)
                .cloned()
                .ok_or_else(invalid)?,
        };

        Ok(Some(normalized))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewCustomField {
    pub tenant_id: TenantId,
    pub entity: CustomFieldEntity,
    pub name: CustomFieldName,
    pub field_type: CustomFieldType,
    pub options: Vec<String>,
    pub is_required: bool,
}

impl NewCustomField {
    /// Builds a definition; select fields must declare at least one option.
    pub fn try_new(
        tenant_id: TenantId,
        entity: CustomFieldEntity,
        name: CustomFieldName,
        field_type: CustomFieldType,
        options: Vec<String>,
        is_required: bool,
    ) -> Result<Self, TypeConstraintError> {
        let mut cleaned: Vec<String> = Vec::new();
        for option in options {
            let option = ammonia::clean(option.trim()).trim().to_string();
            if !option.is_empty() && !cleaned.contains(&option) {
                cleaned.push(option);
            }
        }

        let options = match field_type {
            CustomFieldType::Select if cleaned.is_empty() => {
                return Err(TypeConstraintError::InvalidValue(
                    "select fields need at least one option".to_string(),
                ));
            }
            CustomFieldType::Select => cleaned,
            _ => Vec::new(),
        };

        Ok(Self {
            tenant_id,
            entity,
            name,
            field_type,
            options,
            is_required,
        })
    }
}

/// Stored value of a custom field for one record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomFieldValue {
    pub field_id: CustomFieldId,
    pub entity_id: i32,
    pub value: String,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;

    pub(crate) fn build_field(
        id: i32,
        name: &str,
        field_type: CustomFieldType,
        options: &[&str],
        is_required: bool,
    ) -> CustomField {
        CustomField {
            id: CustomFieldId::new(id).expect("valid id"),
            tenant_id: TenantId::new(1).expect("valid tenant"),
            entity: CustomFieldEntity::Talent,
            name: CustomFieldName::new(name).expect("valid name"),
            field_type,
            options: options.iter().map(|o| o.to_string()).collect(),
            is_required,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn blank_values_clear_optional_fields_only() {
        let optional = build_field(1, "Notes", CustomFieldType::Text, &[], false);
        let required = build_field(2, "Source", CustomFieldType::Text, &[], true);

        assert_eq!(optional.normalize_value("   "), Ok(None));
        assert!(required.normalize_value("").is_err());
    }

    #[test]
    fn numbers_accept_decimal_comma() {
        let field = build_field(1, "Salary", CustomFieldType::Number, &[], false);

        assert_eq!(field.normalize_value("1500,5"), Ok(Some("1500.5".to_string())));
        assert_eq!(field.normalize_value("42"), Ok(Some("42".to_string())));
        assert!(field.normalize_value("a lot").is_err());
        assert!(field.normalize_value("inf").is_err());
    }

    #[test]
    fn dates_must_be_iso() {
        let field = build_field(1, "Available from", CustomFieldType::Date, &[], false);

        assert_eq!(
            field.normalize_value("2025-02-03"),
            Ok(Some("2025-02-03".to_string()))
        );
        assert!(field.normalize_value("03.02.2025").is_err());
        assert!(field.normalize_value("2025-02-30").is_err());
    }

    #[test]
    fn booleans_are_normalized() {
        let field = build_field(1, "Relocation", CustomFieldType::Boolean, &[], false);

        assert_eq!(field.normalize_value("Yes"), Ok(Some("true".to_string())));
        assert_eq!(field.normalize_value("off"), Ok(Some("false".to_string())));
        assert!(field.normalize_value("maybe").is_err());
    }

    #[test]
    fn select_accepts_declared_options() {
        let field = build_field(
            1,
            "Seniority",
            CustomFieldType::Select,
            &["Junior", "Senior"],
            false,
        );

        assert_eq!(field.normalize_value(" Senior "), Ok(Some("Senior".to_string())));
        assert!(field.normalize_value("Lead").is_err());
    }

    #[test]
    fn text_is_sanitized() {
        let field = build_field(1, "Notes", CustomFieldType::Text, &[], false);

        assert_eq!(
            field.normalize_value("<b>Great</b> fit<script>x</script>"),
            Ok(Some("<b>Great</b> fit".to_string()))
        );
    }

    #[test]
    fn select_definition_requires_options() {
        let result = NewCustomField::try_new(
            TenantId::new(1).expect("valid tenant"),
            CustomFieldEntity::Person,
            CustomFieldName::new("Tier").expect("valid name"),
            CustomFieldType::Select,
            vec!["  ".to_string()],
            false,
        );
        assert!(result.is_err());

        let field = NewCustomField::try_new(
            TenantId::new(1).expect("valid tenant"),
            CustomFieldEntity::Person,
            CustomFieldName::new("Tier").expect("valid name"),
            CustomFieldType::Select,
            vec!["Gold".to_string(), " Gold ".to_string(), "Silver".to_string()],
            false,
        )
        .expect("valid definition");
        assert_eq!(field.options, vec!["Gold", "Silver"]);
    }

    #[test]
    fn entity_and_type_parse() {
        assert_eq!("talent".parse::<CustomFieldEntity>(), Ok(CustomFieldEntity::Talent));
        assert_eq!("select".parse::<CustomFieldType>(), Ok(CustomFieldType::Select));
        assert!("company".parse::<CustomFieldEntity>().is_err());
    }
}
