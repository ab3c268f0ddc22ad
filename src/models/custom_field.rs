//! Diesel models for custom field definitions and values.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::custom_field::{
    CustomField as DomainCustomField, CustomFieldValue as DomainCustomFieldValue,
    NewCustomField as DomainNewCustomField,
};
use crate::domain::types::{CustomFieldId, CustomFieldName, TenantId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::custom_fields)]
/// Diesel model for [`crate::domain::custom_field::CustomField`].
pub struct CustomField {
    pub id: i32,
    pub tenant_id: i32,
    pub entity_type: String,
    pub name: String,
    pub field_type: String,
    /// JSON array of allowed values.
    pub options: String,
    pub is_required: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::custom_fields)]
pub struct NewCustomField<'a> {
    pub tenant_id: i32,
    pub entity_type: &'static str,
    pub name: &'a str,
    pub field_type: &'static str,
    pub options: String,
    pub is_required: bool,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, Associations)]
#[diesel(belongs_to(CustomField, foreign_key = field_id))]
#[diesel(table_name = crate::schema::custom_field_values)]
pub struct CustomFieldValue {
    pub field_id: i32,
    pub entity_id: i32,
    pub value: String,
}

impl TryFrom<CustomField> for DomainCustomField {
    type Error = TypeConstraintError;

    fn try_from(field: CustomField) -> Result<Self, Self::Error> {
        let options: Vec<String> = serde_json::from_str(&field.options)
            .map_err(|e| TypeConstraintError::InvalidValue(format!("custom field options: {e}")))?;
        Ok(Self {
            id: CustomFieldId::try_from(field.id)?,
            tenant_id: TenantId::try_from(field.tenant_id)?,
            entity: field.entity_type.parse()?,
            name: CustomFieldName::new(field.name)?,
            field_type: field.field_type.parse()?,
            options,
            is_required: field.is_required,
            created_at: field.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewCustomField> for NewCustomField<'a> {
    fn from(field: &'a DomainNewCustomField) -> Self {
        Self {
            tenant_id: field.tenant_id.get(),
            entity_type: field.entity.as_str(),
            name: field.name.as_str(),
            field_type: field.field_type.as_str(),
            options: serde_json::Value::from(field.options.clone()).to_string(),
            is_required: field.is_required,
        }
    }
}

impl TryFrom<CustomFieldValue> for DomainCustomFieldValue {
    type Error = TypeConstraintError;

    fn try_from(value: CustomFieldValue) -> Result<Self, Self::Error> {
        Ok(Self {
            field_id: CustomFieldId::try_from(value.field_id)?,
            entity_id: value.entity_id,
            value: value.value,
        })
    }
}

impl From<&DomainCustomFieldValue> for CustomFieldValue {
    fn from(value: &DomainCustomFieldValue) -> Self {
        Self {
            field_id: value.field_id.get(),
            entity_id: value.entity_id,
            value: value.value.clone(),
        }
    }
}
