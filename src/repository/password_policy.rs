use diesel::prelude::*;

use crate::{
    domain::{password_policy::PasswordPolicy, types::TenantId},
    models::password_policy::{
        PasswordPolicy as DbPasswordPolicy, SavePasswordPolicy as DbSavePasswordPolicy,
    },
    repository::{
        DieselRepository, PasswordPolicyReader, PasswordPolicyWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl PasswordPolicyReader for DieselRepository {
    fn get_password_policy(&self, tenant_id: TenantId) -> RepositoryResult<Option<PasswordPolicy>> {
        use crate::schema::password_policy_enforcement;

        let mut conn = self.conn()?;
        let row = password_policy_enforcement::table
            .find(tenant_id.get())
            .first::<DbPasswordPolicy>(&mut conn)
            .optional()?;

        row.map(PasswordPolicy::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }
}

impl PasswordPolicyWriter for DieselRepository {
    fn save_password_policy(&self, policy: &PasswordPolicy) -> RepositoryResult<PasswordPolicy> {
        use crate::schema::password_policy_enforcement;

        let mut conn = self.conn()?;
        let row: DbSavePasswordPolicy = policy.into();

        let saved = diesel::insert_into(password_policy_enforcement::table)
            .values(&row)
            .on_conflict(password_policy_enforcement::tenant_id)
            .do_update()
            .set(&row)
            .get_result::<DbPasswordPolicy>(&mut conn)?;

        Ok(PasswordPolicy::try_from(saved)?)
    }
}
