//! Forms for custom field definitions and values.

use serde::Deserialize;
use validator::Validate;

use crate::domain::custom_field::{
    CustomField, CustomFieldEntity, CustomFieldType, CustomFieldValue, NewCustomField,
};
use crate::domain::types::{CustomFieldName, TenantId};
use crate::forms::{FormError, checkbox};

#[derive(Debug, Deserialize, Validate)]
pub struct AddCustomFieldForm {
    pub entity: String,
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    pub field_type: String,
    /// One option per line, used by select fields.
    #[serde(default)]
    pub options: String,
    #[serde(default)]
    pub is_required: Option<String>,
}

impl AddCustomFieldForm {
    pub fn into_new_field(self, tenant_id: TenantId) -> Result<NewCustomField, FormError> {
        self.validate()?;
        let entity = self
            .entity
            .parse::<CustomFieldEntity>()
            .map_err(|e| FormError::InvalidCustomField(e.to_string()))?;
        let field_type = self
            .field_type
            .parse::<CustomFieldType>()
            .map_err(|e| FormError::InvalidCustomField(e.to_string()))?;
        let name = CustomFieldName::new(ammonia::clean(self.name.trim()))
            .map_err(|_| FormError::InvalidName)?;
        let options = self.options.lines().map(str::to_string).collect();

        NewCustomField::try_new(
            tenant_id,
            entity,
            name,
            field_type,
            options,
            checkbox(&self.is_required),
        )
        .map_err(|e| FormError::InvalidCustomField(e.to_string()))
    }
}

/// Values of every custom field of one record, submitted as repeated
/// `field_id`/`value` pairs. Parsed with `serde_html_form`.
#[derive(Debug, Default, Deserialize)]
pub struct CustomValuesForm {
    #[serde(default)]
    pub field_id: Vec<i32>,
    #[serde(default)]
    pub value: Vec<String>,
}

impl CustomValuesForm {
    pub fn from_body(body: &[u8]) -> Result<Self, FormError> {
        serde_html_form::from_bytes(body).map_err(|e| FormError::InvalidCustomField(e.to_string()))
    }

    /// Validates the submitted values against the definitions.
    ///
    /// Fields missing from the submission are treated as blank, so required
    /// fields must always be present.
    pub fn into_values(
        self,
        fields: &[CustomField],
        entity_id: i32,
    ) -> Result<Vec<CustomFieldValue>, FormError> {
        let submitted: Vec<(i32, String)> = self.field_id.into_iter().zip(self.value).collect();

        let mut values = Vec::new();
        for field in fields {
            let raw = submitted
                .iter()
                .find(|(id, _)| *id == field.id.get())
                .map(|(_, value)| value.as_str())
                .unwrap_or_default();
            let normalized = field
                .normalize_value(raw)
                .map_err(|e| FormError::InvalidCustomField(e.to_string()))?;
            if let Some(value) = normalized {
                values.push(CustomFieldValue {
                    field_id: field.id,
                    entity_id,
                    value,
                });
            }
        }

        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::custom_field::tests::build_field;

    #[test]
    fn add_form_builds_select_field() {
        let form = AddCustomFieldForm {
            entity: "talent".to_string(),
            name: "Seniority".to_string(),
            field_type: "select".to_string(),
            options: "Junior\n\nSenior\nJunior".to_string(),
            is_required: Some("on".to_string()),
        };
        let field = form
            .into_new_field(TenantId::new(1).expect("valid tenant"))
            .expect("valid field");

        assert_eq!(field.options, vec!["Junior", "Senior"]);
        assert!(field.is_required);
    }

    #[test]
    fn add_form_rejects_unknown_type() {
        let form = AddCustomFieldForm {
            entity: "talent".to_string(),
            name: "Salary".to_string(),
            field_type: "money".to_string(),
            options: String::new(),
            is_required: None,
        };
        assert!(form.into_new_field(TenantId::new(1).expect("valid tenant")).is_err());
    }

    #[test]
    fn repeated_pairs_are_parsed_from_body() {
        let body = b"field_id=1&value=yes&field_id=2&value=2024-02-29";
        let form = CustomValuesForm::from_body(body).expect("valid body");
        assert_eq!(form.field_id, vec![1, 2]);

        let fields = vec![
            build_field(1, "Remote", CustomFieldType::Boolean, &[], false),
            build_field(2, "Available", CustomFieldType::Date, &[], false),
            build_field(3, "Notes", CustomFieldType::Text, &[], false),
        ];
        let values = form.into_values(&fields, 10).expect("valid values");

        assert_eq!(values.len(), 2);
        assert_eq!(values[0].value, "true");
        assert_eq!(values[1].value, "2024-02-29");
        assert!(values.iter().all(|v| v.entity_id == 10));
    }

    #[test]
    fn missing_required_value_fails() {
        let fields = vec![build_field(1, "Source", CustomFieldType::Text, &[], true)];
        let result = CustomValuesForm::default().into_values(&fields, 1);
        assert!(matches!(result, Err(FormError::InvalidCustomField(_))));
    }
}
