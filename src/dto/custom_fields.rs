//! DTOs pairing custom field definitions with stored values.

use serde::Serialize;

use crate::domain::custom_field::{CustomField, CustomFieldValue};

#[derive(Debug, Serialize)]
pub struct CustomFieldRow {
    pub field: CustomField,
    pub value: Option<String>,
}

impl CustomFieldRow {
    /// Joins definitions with the values of one record, keeping definition
    /// order.
    pub fn join(fields: Vec<CustomField>, values: &[CustomFieldValue]) -> Vec<Self> {
        fields
            .into_iter()
            .map(|field| {
                let value = values
                    .iter()
                    .find(|v| v.field_id == field.id)
                    .map(|v| v.value.clone());
                Self { field, value }
            })
            .collect()
    }
}

pub struct CustomFieldsPageData {
    pub talent_fields: Vec<CustomField>,
    pub person_fields: Vec<CustomField>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::custom_field::CustomFieldType;
    use crate::domain::custom_field::tests::build_field;
    use crate::domain::types::CustomFieldId;

    #[test]
    fn join_keeps_missing_values_empty() {
        let fields = vec![
            build_field(1, "Seniority", CustomFieldType::Text, &[], false),
            build_field(2, "Remote", CustomFieldType::Boolean, &[], false),
        ];
        let values = vec![CustomFieldValue {
            field_id: CustomFieldId::new(2).expect("valid id"),
            entity_id: 5,
            value: "true".to_string(),
        }];

        let rows = CustomFieldRow::join(fields, &values);

        assert_eq!(rows[0].value, None);
        assert_eq!(rows[1].value.as_deref(), Some("true"));
    }
}
