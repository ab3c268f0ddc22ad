//! Global email templates and draft generation.

use serde::Serialize;
use tera::{Context, Tera};

use crate::domain::email_template::{
    EmailDraft, EmailTemplate, NewEmailTemplate, RecipientContext, SenderContext,
    UpdateEmailTemplate,
};
use crate::domain::types::{EmailTemplateId, TenantId};
use crate::dto::email::TemplatesPageData;
use crate::forms::email::{
    AddTemplateForm, EditTemplateForm, GenerateEmailForm, GenerateEmailPayload, Recipient,
};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{
    EmailTemplateReader, EmailTemplateWriter, PersonReader, TalentReader, TenantReader,
};
use crate::services::{ServiceError, ServiceResult, check_role, ensure_role};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_PLATFORM_ROLE};

/// Variables a template may reference.
pub const PLACEHOLDERS: [&str; 9] = [
    "recipient.name",
    "recipient.first_name",
    "recipient.email",
    "recipient.headline",
    "recipient.company",
    "recipient.position",
    "sender.name",
    "sender.email",
    "tenant.name",
];

#[derive(Serialize)]
struct TenantContext {
    name: String,
}

fn build_context(
    recipient: &RecipientContext,
    sender: &SenderContext,
    tenant_name: &str,
) -> Context {
    let mut context = Context::new();
    context.insert("recipient", recipient);
    context.insert("sender", sender);
    context.insert(
        "tenant",
        &TenantContext {
            name: tenant_name.to_string(),
        },
    );
    context
}

fn sample_context() -> Context {
    let recipient = RecipientContext {
        email: Some("ada@example.com".to_string()),
        headline: Some("Staff Engineer".to_string()),
        company: Some("Analytical Engines".to_string()),
        position: Some("CTO".to_string()),
        ..RecipientContext::new("Ada Lovelace")
    };
    let sender = SenderContext {
        name: "Grace Hopper".to_string(),
        email: "grace@example.com".to_string(),
    };
    build_context(&recipient, &sender, "Acme")
}

fn render(source: &str, context: &Context) -> Result<String, tera::Error> {
    Tera::one_off(source, context, false)
}

/// Renders subject and body against sample data so syntax errors and
/// unknown placeholders are caught on save.
fn check_template(subject: &str, body: &str) -> ServiceResult<()> {
    let context = sample_context();
    for (part, source) in [("тема", subject), ("текст", body)] {
        render(source, &context).map_err(|err| {
            log::warn!("Rejected email template {part}: {err:?}");
            ServiceError::Form(format!("Ошибка в шаблоне ({part}): {err}"))
        })?;
    }
    Ok(())
}

fn duplicate_name(err: ServiceError, name: &str) -> ServiceError {
    match err {
        ServiceError::Conflict(_) => ServiceError::Form(format!("Шаблон «{name}» уже существует.")),
        other => other,
    }
}

/// Platform operators see inactive templates as well.
pub fn load_templates_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
) -> ServiceResult<TemplatesPageData>
where
    R: EmailTemplateReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let active_only = !check_role(SERVICE_PLATFORM_ROLE, &user.roles);
    let templates = repo.list_email_templates(active_only).map_err(|err| {
        log::error!("Failed to list email templates: {err}");
        err
    })?;

    Ok(TemplatesPageData {
        templates,
        placeholders: PLACEHOLDERS.to_vec(),
    })
}

pub fn get_template<R>(
    repo: &R,
    user: &AuthenticatedUser,
    template_id: i32,
) -> ServiceResult<EmailTemplate>
where
    R: EmailTemplateReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    repo.get_email_template(EmailTemplateId::new(template_id)?)?
        .ok_or(ServiceError::NotFound)
}

pub fn create_template<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddTemplateForm,
) -> ServiceResult<EmailTemplate>
where
    R: EmailTemplateWriter + ?Sized,
{
    ensure_role(user, SERVICE_PLATFORM_ROLE)?;

    let template = NewEmailTemplate::try_from(form)?;
    check_template(template.subject.as_str(), template.body.as_str())?;

    repo.create_email_template(&template).map_err(|err| {
        log::error!("Failed to create email template: {err}");
        duplicate_name(err.into(), template.name.as_str())
    })
}

pub fn update_template<R>(
    repo: &R,
    user: &AuthenticatedUser,
    template_id: i32,
    form: EditTemplateForm,
) -> ServiceResult<EmailTemplate>
where
    R: EmailTemplateWriter + ?Sized,
{
    ensure_role(user, SERVICE_PLATFORM_ROLE)?;

    let updates = UpdateEmailTemplate::try_from(form)?;
    check_template(updates.subject.as_str(), updates.body.as_str())?;

    repo.update_email_template(EmailTemplateId::new(template_id)?, &updates)
        .map_err(|err| {
            log::error!("Failed to update email template: {err}");
            ServiceError::from(err)
        })
}

pub fn deactivate_template<R>(
    repo: &R,
    user: &AuthenticatedUser,
    template_id: i32,
) -> ServiceResult<EmailTemplate>
where
    R: EmailTemplateReader + EmailTemplateWriter + ?Sized,
{
    ensure_role(user, SERVICE_PLATFORM_ROLE)?;

    let id = EmailTemplateId::new(template_id)?;
    let template = repo.get_email_template(id)?.ok_or(ServiceError::NotFound)?;
    let updates = UpdateEmailTemplate {
        category: template.category,
        subject: template.subject,
        body: template.body,
        is_active: false,
    };

    repo.update_email_template(id, &updates).map_err(|err| {
        log::error!("Failed to deactivate email template: {err}");
        ServiceError::from(err)
    })
}

fn recipient_context<R>(
    repo: &R,
    tenant_id: TenantId,
    recipient: Recipient,
    company: Option<String>,
) -> ServiceResult<RecipientContext>
where
    R: TalentReader + PersonReader + ?Sized,
{
    match recipient {
        Recipient::Talent(id) => {
            let talent = repo
                .get_talent_by_id(id, tenant_id)?
                .ok_or(ServiceError::NotFound)?;
            Ok(RecipientContext {
                email: talent.email.map(String::from),
                headline: talent.headline,
                company,
                ..RecipientContext::new(talent.name.as_str())
            })
        }
        Recipient::Person(id) => {
            let person = repo
                .get_person_by_id(id, tenant_id)?
                .ok_or(ServiceError::NotFound)?;
            let company = match company {
                Some(company) => Some(company),
                None => repo
                    .list_relationships(person.id, tenant_id)?
                    .into_iter()
                    .next()
                    .map(|rel| rel.company_name.into_inner()),
            };
            Ok(RecipientContext {
                email: person.email.map(String::from),
                position: person.position,
                company,
                ..RecipientContext::new(person.name.as_str())
            })
        }
    }
}

/// Renders an active template for a talent or a contact person of the
/// user's tenant.
pub fn generate_email<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: GenerateEmailForm,
) -> ServiceResult<EmailDraft>
where
    R: EmailTemplateReader + TalentReader + PersonReader + TenantReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let payload = GenerateEmailPayload::try_from(form)?;
    let tenant_id = user.tenant()?;

    let template = repo
        .get_email_template(payload.template_id)?
        .ok_or(ServiceError::NotFound)?;
    if !template.is_active {
        return Err(ServiceError::Form("Шаблон отключен.".to_string()));
    }

    let tenant = repo
        .get_tenant_by_id(tenant_id)?
        .ok_or(ServiceError::NotFound)?;
    let recipient = recipient_context(repo, tenant_id, payload.recipient, payload.company)?;
    let sender = SenderContext {
        name: user.name.clone(),
        email: user.email.clone(),
    };
    let context = build_context(&recipient, &sender, tenant.name.as_str());

    let render_part = |source: &str| {
        render(source, &context).map_err(|err| {
            log::error!("Failed to render email template #{}: {err:?}", template.id);
            ServiceError::Internal(err.to_string())
        })
    };
    let subject = render_part(template.subject.as_str())?;
    let body = render_part(template.body.as_str())?;

    Ok(EmailDraft {
        template_id: template.id,
        to: recipient.email,
        subject,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_placeholders_pass() {
        let body = PLACEHOLDERS
            .iter()
            .map(|p| format!("{{{{ {p} }}}}"))
            .collect::<Vec<_>>()
            .join("\n");
        assert!(check_template("Hello {{ recipient.first_name }}", &body).is_ok());
    }

    #[test]
    fn unknown_placeholder_is_rejected() {
        let result = check_template("Hi", "Salary: {{ recipient.salary }}");
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn syntax_errors_are_rejected() {
        let result = check_template("Hi {{ recipient.name", "Body");
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn rendering_does_not_escape_html() {
        let context = sample_context();
        let out = render("{{ sender.name }} <{{ sender.email }}>", &context).expect("renders");
        assert_eq!(out, "Grace Hopper <grace@example.com>");
    }
}

#[cfg(all(test, feature = "test-mocks"))]
mod mock_tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::talent::TalentStatus;
    use crate::domain::tenant::Tenant;
    use crate::domain::types::{
        ContactEmail, TemplateBody, TemplateCategory, TemplateName, TemplateSubject, TenantName,
        TenantSlug,
    };
    use crate::repository::mock::MockRepository;
    use crate::services::contacts::tests::{build_person, build_relationship};
    use crate::services::talents::tests::build_talent;
    use crate::services::test_support::{platform_user, viewer_user};

    fn build_template(id: i32, is_active: bool) -> EmailTemplate {
        let now = Utc::now().naive_utc();
        EmailTemplate {
            id: EmailTemplateId::new(id).expect("valid id"),
            name: TemplateName::new("Intro").expect("valid name"),
            category: TemplateCategory::new("outreach").expect("valid category"),
            subject: TemplateSubject::new("Hello {{ recipient.first_name }}")
                .expect("valid subject"),
            body: TemplateBody::new(
                "{{ recipient.company }} x {{ tenant.name }}\n-- {{ sender.name }}",
            )
            .expect("valid body"),
            is_active,
            created_at: now,
            updated_at: now,
        }
    }

    fn build_tenant() -> Tenant {
        let now = Utc::now().naive_utc();
        Tenant {
            id: TenantId::new(42).expect("valid id"),
            name: TenantName::new("Acme").expect("valid name"),
            slug: TenantSlug::new("acme").expect("valid slug"),
            domain: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn form(recipient_type: &str, company: Option<&str>) -> GenerateEmailForm {
        GenerateEmailForm {
            template_id: 1,
            recipient_type: recipient_type.to_string(),
            recipient_id: 3,
            company: company.map(str::to_string),
        }
    }

    #[test]
    fn person_draft_uses_first_company() {
        let mut repo = MockRepository::new();
        repo.expect_get_email_template()
            .returning(|_| Ok(Some(build_template(1, true))));
        repo.expect_get_tenant_by_id()
            .returning(|_| Ok(Some(build_tenant())));
        repo.expect_get_person_by_id().returning(|id, _| {
            let mut person = build_person(id.get(), "Grace Hopper");
            person.email = Some(ContactEmail::new("grace@navy.mil").expect("valid email"));
            Ok(Some(person))
        });
        repo.expect_list_relationships()
            .returning(|person_id, _| Ok(vec![build_relationship(1, person_id.get(), "Initech")]));

        let draft = generate_email(&repo, &viewer_user(), form("person", None)).expect("draft");

        assert_eq!(draft.to.as_deref(), Some("grace@navy.mil"));
        assert_eq!(draft.subject, "Hello Grace");
        assert_eq!(draft.body, "Initech x Acme\n-- Test User");
    }

    #[test]
    fn talent_draft_uses_company_override() {
        let mut repo = MockRepository::new();
        repo.expect_get_email_template()
            .returning(|_| Ok(Some(build_template(1, true))));
        repo.expect_get_tenant_by_id()
            .returning(|_| Ok(Some(build_tenant())));
        repo.expect_get_talent_by_id()
            .returning(|id, _| Ok(Some(build_talent(id.get(), "Ada Lovelace", TalentStatus::New))));

        let draft =
            generate_email(&repo, &viewer_user(), form("talent", Some("Globex"))).expect("draft");

        assert_eq!(draft.subject, "Hello Ada");
        assert!(draft.body.starts_with("Globex x Acme"));
    }

    #[test]
    fn inactive_template_is_refused() {
        let mut repo = MockRepository::new();
        repo.expect_get_email_template()
            .returning(|_| Ok(Some(build_template(1, false))));
        repo.expect_get_tenant_by_id().times(0);

        let result = generate_email(&repo, &viewer_user(), form("talent", None));

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn creating_templates_needs_platform_role() {
        let mut repo = MockRepository::new();
        repo.expect_create_email_template()
            .times(1)
            .returning(|_| Ok(build_template(2, true)));

        let form = || AddTemplateForm {
            name: "Intro".to_string(),
            category: "outreach".to_string(),
            subject: "Hello {{ recipient.first_name }}".to_string(),
            body: "Regards, {{ sender.name }}".to_string(),
        };

        assert!(matches!(
            create_template(&repo, &viewer_user(), form()),
            Err(ServiceError::Unauthorized)
        ));
        assert!(create_template(&repo, &platform_user(), form()).is_ok());
    }

    #[test]
    fn deactivation_keeps_content() {
        let mut repo = MockRepository::new();
        repo.expect_get_email_template()
            .returning(|_| Ok(Some(build_template(1, true))));
        repo.expect_update_email_template()
            .withf(|_, updates| !updates.is_active && updates.category.as_str() == "outreach")
            .times(1)
            .returning(|_, _| Ok(build_template(1, false)));

        let template = deactivate_template(&repo, &platform_user(), 1).expect("deactivated");

        assert!(!template.is_active);
    }
}
