//! Repository implementation for tenant custom fields and their values.

use diesel::{Connection, prelude::*};

use crate::{
    domain::{
        custom_field::{CustomField, CustomFieldEntity, CustomFieldValue, NewCustomField},
        types::{CustomFieldId, TenantId},
    },
    models::custom_field::{
        CustomField as DbCustomField, CustomFieldValue as DbCustomFieldValue,
        NewCustomField as DbNewCustomField,
    },
    repository::{
        CustomFieldReader, CustomFieldWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl CustomFieldReader for DieselRepository {
    fn list_custom_fields(
        &self,
        tenant_id: TenantId,
        entity: CustomFieldEntity,
    ) -> RepositoryResult<Vec<CustomField>> {
        use crate::schema::custom_fields;

        let mut conn = self.conn()?;
        let rows = custom_fields::table
            .filter(custom_fields::tenant_id.eq(tenant_id.get()))
            .filter(custom_fields::entity_type.eq(entity.as_str()))
            .order((custom_fields::name.asc(), custom_fields::id.asc()))
            .load::<DbCustomField>(&mut conn)?;

        rows.into_iter()
            .map(|row| CustomField::try_from(row).map_err(RepositoryError::from))
            .collect()
    }

    fn list_custom_field_values(
        &self,
        tenant_id: TenantId,
        entity: CustomFieldEntity,
        entity_id: i32,
    ) -> RepositoryResult<Vec<CustomFieldValue>> {
        use crate::schema::{custom_field_values, custom_fields};

        let mut conn = self.conn()?;
        let rows = custom_field_values::table
            .inner_join(custom_fields::table)
            .filter(custom_fields::tenant_id.eq(tenant_id.get()))
            .filter(custom_fields::entity_type.eq(entity.as_str()))
            .filter(custom_field_values::entity_id.eq(entity_id))
            .order(custom_fields::name.asc())
            .select(DbCustomFieldValue::as_select())
            .load::<DbCustomFieldValue>(&mut conn)?;

        rows.into_iter()
            .map(|row| CustomFieldValue::try_from(row).map_err(RepositoryError::from))
            .collect()
    }
}

impl CustomFieldWriter for DieselRepository {
    fn create_custom_field(&self, field: &NewCustomField) -> RepositoryResult<CustomField> {
        use crate::schema::custom_fields;

        let mut conn = self.conn()?;
        let db_field: DbNewCustomField = field.into();

        let row = diesel::insert_into(custom_fields::table)
            .values(&db_field)
            .get_result::<DbCustomField>(&mut conn)?;

        Ok(CustomField::try_from(row)?)
    }

    fn delete_custom_field(&self, id: CustomFieldId, tenant_id: TenantId) -> RepositoryResult<()> {
        use crate::schema::{custom_field_values, custom_fields};

        let mut conn = self.conn()?;

        conn.transaction::<(), diesel::result::Error, _>(|conn| {
            let deleted = diesel::delete(
                custom_fields::table
                    .filter(custom_fields::id.eq(id.get()))
                    .filter(custom_fields::tenant_id.eq(tenant_id.get())),
            )
            .execute(conn)?;
            if deleted == 0 {
                return Err(diesel::result::Error::NotFound);
            }

            diesel::delete(
                custom_field_values::table.filter(custom_field_values::field_id.eq(id.get())),
            )
            .execute(conn)?;

            Ok(())
        })
        .map_err(RepositoryError::from)
    }

    fn replace_custom_field_values(
        &self,
        tenant_id: TenantId,
        entity: CustomFieldEntity,
        entity_id: i32,
        values: &[CustomFieldValue],
    ) -> RepositoryResult<usize> {
        use crate::schema::{custom_field_values, custom_fields};

        let mut conn = self.conn()?;
        let rows: Vec<DbCustomFieldValue> = values.iter().map(Into::into).collect();

        conn.transaction::<usize, diesel::result::Error, _>(|conn| {
            let entity_fields = custom_fields::table
                .filter(custom_fields::tenant_id.eq(tenant_id.get()))
                .filter(custom_fields::entity_type.eq(entity.as_str()))
                .select(custom_fields::id);
            diesel::delete(
                custom_field_values::table
                    .filter(custom_field_values::entity_id.eq(entity_id))
                    .filter(custom_field_values::field_id.eq_any(entity_fields)),
            )
            .execute(conn)?;

            let mut inserted = 0;
            for row in &rows {
                inserted += diesel::insert_into(custom_field_values::table)
                    .values(row)
                    .execute(conn)?;
            }
            Ok(inserted)
        })
        .map_err(RepositoryError::from)
    }
}
