//! Repository implementation for talents.

use chrono::Utc;
use diesel::{Connection, dsl::count_star, prelude::*};

use crate::{
    domain::{
        custom_field::CustomFieldEntity,
        talent::{NewTalent, Talent, TalentStatus, UpdateTalent},
        types::{PublicId, TalentId, TenantId},
    },
    models::{
        custom_field::CustomFieldValue as DbCustomFieldValue,
        talent::{
            NewTalent as DbNewTalent, Talent as DbTalent, UpdateTalent as DbUpdateTalent,
            parse_status_counts,
        },
    },
    repository::{
        DieselRepository, TalentImportRow, TalentListQuery, TalentReader, TalentWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

fn into_domain(db_talents: Vec<DbTalent>) -> RepositoryResult<Vec<Talent>> {
    db_talents
        .into_iter()
        .map(|talent| Talent::try_from(talent).map_err(RepositoryError::from))
        .collect()
}

impl TalentReader for DieselRepository {
    fn get_talent_by_id(
        &self,
        id: TalentId,
        tenant_id: TenantId,
    ) -> RepositoryResult<Option<Talent>> {
        use crate::schema::talents;

        let mut conn = self.conn()?;
        let db_talent = talents::table
            .filter(talents::id.eq(id.get()))
            .filter(talents::tenant_id.eq(tenant_id.get()))
            .first::<DbTalent>(&mut conn)
            .optional()?;

        db_talent
            .map(Talent::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn get_talent_by_public_id(
        &self,
        public_id: PublicId,
        tenant_id: TenantId,
    ) -> RepositoryResult<Option<Talent>> {
        use crate::schema::talents;

        let mut conn = self.conn()?;
        let db_talent = talents::table
            .filter(talents::public_id.eq(public_id.as_bytes().as_slice()))
            .filter(talents::tenant_id.eq(tenant_id.get()))
            .first::<DbTalent>(&mut conn)
            .optional()?;

        db_talent
            .map(Talent::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_talents(&self, query: TalentListQuery) -> RepositoryResult<(usize, Vec<Talent>)> {
        use crate::schema::talents;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = talents::table
                .filter(talents::tenant_id.eq(query.tenant_id.get()))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(status) = &query.status {
                items = items.filter(talents::status.eq(status.to_string()));
            }

            let term = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty());
            if let Some(term) = term {
                let pattern = format!("%{term}%");
                items = items.filter(
                    talents::name
                        .like(pattern.clone())
                        .or(talents::email.like(pattern.clone()))
                        .or(talents::phone.like(pattern.clone()))
                        .or(talents::headline.like(pattern.clone()))
                        .or(talents::location.like(pattern)),
                );
            }

            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order((talents::created_at.desc(), talents::id.desc()));
        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let talents = into_domain(items.load::<DbTalent>(&mut conn)?)?;

        Ok((total, talents))
    }

    fn count_talents_by_status(
        &self,
        tenant_id: TenantId,
    ) -> RepositoryResult<Vec<(TalentStatus, usize)>> {
        use crate::schema::talents;

        let mut conn = self.conn()?;
        let rows = talents::table
            .filter(talents::tenant_id.eq(tenant_id.get()))
            .group_by(talents::status)
            .select((talents::status, count_star()))
            .load::<(String, i64)>(&mut conn)?;

        Ok(parse_status_counts(rows))
    }

    fn list_recent_talents(
        &self,
        tenant_id: TenantId,
        limit: usize,
    ) -> RepositoryResult<Vec<Talent>> {
        use crate::schema::talents;

        let mut conn = self.conn()?;
        let db_talents = talents::table
            .filter(talents::tenant_id.eq(tenant_id.get()))
            .order((talents::created_at.desc(), talents::id.desc()))
            .limit(limit as i64)
            .load::<DbTalent>(&mut conn)?;

        into_domain(db_talents)
    }
}

impl TalentWriter for DieselRepository {
    fn create_talent(&self, new_talent: &NewTalent) -> RepositoryResult<Talent> {
        use crate::schema::talents;

        let mut conn = self.conn()?;
        let db_new_talent: DbNewTalent = new_talent.into();

        let db_talent = diesel::insert_into(talents::table)
            .values(&db_new_talent)
            .get_result::<DbTalent>(&mut conn)?;

        Ok(Talent::try_from(db_talent)?)
    }

    fn import_talents(&self, rows: &[TalentImportRow]) -> RepositoryResult<usize> {
        use crate::schema::{custom_field_values, talents};

        let mut conn = self.conn()?;

        conn.transaction::<usize, diesel::result::Error, _>(|conn| {
            let mut created = 0;
            for row in rows {
                let db_new_talent: DbNewTalent = (&row.talent).into();
                let inserted = diesel::insert_or_ignore_into(talents::table)
                    .values(&db_new_talent)
                    .execute(conn)?;
                if inserted == 0 {
                    continue;
                }
                created += 1;

                if row.custom_values.is_empty() {
                    continue;
                }
                let talent_id = talents::table
                    .filter(talents::public_id.eq(row.talent.public_id.as_bytes().as_slice()))
                    .select(talents::id)
                    .first::<i32>(conn)?;
                let values: Vec<DbCustomFieldValue> = row
                    .custom_values
                    .iter()
                    .map(|(field_id, value)| DbCustomFieldValue {
                        field_id: field_id.get(),
                        entity_id: talent_id,
                        value: value.clone(),
                    })
                    .collect();
                for value in &values {
                    diesel::insert_into(custom_field_values::table)
                        .values(value)
                        .execute(conn)?;
                }
            }
            Ok(created)
        })
        .map_err(RepositoryError::from)
    }

    fn update_talent(
        &self,
        id: TalentId,
        tenant_id: TenantId,
        updates: &UpdateTalent,
    ) -> RepositoryResult<Talent> {
        use crate::schema::talents;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateTalent = updates.into();

        let db_talent = diesel::update(
            talents::table
                .filter(talents::id.eq(id.get()))
                .filter(talents::tenant_id.eq(tenant_id.get())),
        )
        .set(&db_updates)
        .get_result::<DbTalent>(&mut conn)?;

        Ok(Talent::try_from(db_talent)?)
    }

    fn set_talent_status(
        &self,
        id: TalentId,
        tenant_id: TenantId,
        status: TalentStatus,
    ) -> RepositoryResult<Talent> {
        use crate::schema::talents;

        let mut conn = self.conn()?;

        let db_talent = diesel::update(
            talents::table
                .filter(talents::id.eq(id.get()))
                .filter(talents::tenant_id.eq(tenant_id.get())),
        )
        .set((
            talents::status.eq(status.to_string()),
            talents::updated_at.eq(Utc::now().naive_utc()),
        ))
        .get_result::<DbTalent>(&mut conn)?;

        Ok(Talent::try_from(db_talent)?)
    }

    fn delete_talent(&self, id: TalentId, tenant_id: TenantId) -> RepositoryResult<()> {
        use crate::schema::{custom_field_values, custom_fields, talents};

        let mut conn = self.conn()?;

        conn.transaction::<(), diesel::result::Error, _>(|conn| {
            let deleted = diesel::delete(
                talents::table
                    .filter(talents::id.eq(id.get()))
                    .filter(talents::tenant_id.eq(tenant_id.get())),
            )
            .execute(conn)?;
            if deleted == 0 {
                return Err(diesel::result::Error::NotFound);
            }

            let talent_fields = custom_fields::table
                .filter(custom_fields::tenant_id.eq(tenant_id.get()))
                .filter(custom_fields::entity_type.eq(CustomFieldEntity::Talent.as_str()))
                .select(custom_fields::id);
            diesel::delete(
                custom_field_values::table
                    .filter(custom_field_values::entity_id.eq(id.get()))
                    .filter(custom_field_values::field_id.eq_any(talent_fields)),
            )
            .execute(conn)?;

            Ok(())
        })
        .map_err(RepositoryError::from)
    }
}
