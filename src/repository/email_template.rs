//! Repository implementation for global email templates.

use diesel::prelude::*;

use crate::{
    domain::{
        email_template::{EmailTemplate, NewEmailTemplate, UpdateEmailTemplate},
        types::EmailTemplateId,
    },
    models::email_template::{
        EmailTemplate as DbEmailTemplate, NewEmailTemplate as DbNewEmailTemplate,
        UpdateEmailTemplate as DbUpdateEmailTemplate,
    },
    repository::{
        DieselRepository, EmailTemplateReader, EmailTemplateWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl EmailTemplateReader for DieselRepository {
    fn get_email_template(&self, id: EmailTemplateId) -> RepositoryResult<Option<EmailTemplate>> {
        use crate::schema::global_email_templates;

        let mut conn = self.conn()?;
        let template = global_email_templates::table
            .find(id.get())
            .first::<DbEmailTemplate>(&mut conn)
            .optional()?;

        template
            .map(EmailTemplate::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_email_templates(&self, active_only: bool) -> RepositoryResult<Vec<EmailTemplate>> {
        use crate::schema::global_email_templates;

        let mut conn = self.conn()?;
        let mut items = global_email_templates::table.into_boxed::<diesel::sqlite::Sqlite>();
        if active_only {
            items = items.filter(global_email_templates::is_active.eq(true));
        }

        items
            .order((
                global_email_templates::category.asc(),
                global_email_templates::name.asc(),
            ))
            .load::<DbEmailTemplate>(&mut conn)?
            .into_iter()
            .map(|template| EmailTemplate::try_from(template).map_err(RepositoryError::from))
            .collect()
    }
}

impl EmailTemplateWriter for DieselRepository {
    fn create_email_template(
        &self,
        template: &NewEmailTemplate,
    ) -> RepositoryResult<EmailTemplate> {
        use crate::schema::global_email_templates;

        let mut conn = self.conn()?;
        let db_template: DbNewEmailTemplate = template.into();

        let row = diesel::insert_into(global_email_templates::table)
            .values(&db_template)
            .get_result::<DbEmailTemplate>(&mut conn)?;

        Ok(EmailTemplate::try_from(row)?)
    }

    fn update_email_template(
        &self,
        id: EmailTemplateId,
        updates: &UpdateEmailTemplate,
    ) -> RepositoryResult<EmailTemplate> {
        use crate::schema::global_email_templates;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateEmailTemplate = updates.into();

        let row = diesel::update(global_email_templates::table.find(id.get()))
            .set(&db_updates)
            .get_result::<DbEmailTemplate>(&mut conn)?;

        Ok(EmailTemplate::try_from(row)?)
    }
}
