//! Forms for talent records and the CSV import.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;
use validator::Validate;

use crate::domain::custom_field::CustomField;
use crate::domain::talent::{NewTalent, TalentStatus, UpdateTalent};
use crate::domain::types::{TalentName, TenantId};
use crate::forms::{FormError, non_blank, parse_email, parse_phone};
use crate::repository::TalentImportRow;

#[derive(Debug, Deserialize, Validate)]
pub struct AddTalentForm {
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl AddTalentForm {
    pub fn into_new_talent(self, tenant_id: TenantId) -> Result<NewTalent, FormError> {
        self.validate()?;
        Ok(NewTalent::new(
            tenant_id,
            TalentName::new(self.name).map_err(|_| FormError::InvalidName)?,
            parse_email(self.email)?,
            parse_phone(self.phone)?,
            self.headline,
            self.location,
        ))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditTalentForm {
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub status: String,
}

impl TryFrom<EditTalentForm> for UpdateTalent {
    type Error = FormError;

    fn try_from(form: EditTalentForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let status = form
            .status
            .parse::<TalentStatus>()
            .map_err(|_| FormError::InvalidStatus)?;
        Ok(UpdateTalent::new(
            TalentName::new(form.name).map_err(|_| FormError::InvalidName)?,
            parse_email(form.email)?,
            parse_phone(form.phone)?,
            form.headline,
            form.location,
            status,
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct TalentStatusForm {
    pub status: String,
}

impl TryFrom<TalentStatusForm> for TalentStatus {
    type Error = FormError;

    fn try_from(form: TalentStatusForm) -> Result<Self, Self::Error> {
        form.status.parse().map_err(|_| FormError::InvalidStatus)
    }
}

#[derive(MultipartForm)]
pub struct UploadTalentsForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

impl UploadTalentsForm {
    /// Opens the uploaded file for reading from the start.
    pub fn open(&self) -> Result<File, FormError> {
        self.csv
            .file
            .reopen()
            .map_err(|e| FormError::InvalidCsv(e.to_string()))
    }
}

/// Rows accepted from a CSV file plus the number of rejected lines.
#[derive(Debug)]
pub struct TalentCsv {
    pub rows: Vec<TalentImportRow>,
    pub rejected: usize,
}

enum Column {
    Name,
    Email,
    Phone,
    Headline,
    Location,
    Custom(usize),
    Ignored,
}

/// Reads talents from CSV with a header row.
///
/// Known columns are `name`, `email`, `phone`, `headline` and `location`.
/// Any other column whose header matches a talent custom field by name is
/// stored as that field's value. Rows with an invalid name, email or phone
/// are rejected, as are rows lacking a valid value for a required field;
/// invalid optional values are dropped from their row.
pub fn parse_talents_csv<R: Read>(
    reader: R,
    tenant_id: TenantId,
    fields: &[CustomField],
) -> Result<TalentCsv, FormError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let by_name: HashMap<String, usize> = fields
        .iter()
        .enumerate()
        .map(|(idx, field)| (field.name.as_str().to_lowercase(), idx))
        .collect();

    let headers = rdr
        .headers()
        .map_err(|e| FormError::InvalidCsv(e.to_string()))?
        .clone();
    let columns: Vec<Column> = headers
        .iter()
        .map(|header| match header.to_lowercase().as_str() {
            "name" => Column::Name,
            "email" => Column::Email,
            "phone" => Column::Phone,
            "headline" => Column::Headline,
            "location" => Column::Location,
            other => match by_name.get(other) {
                Some(idx) => Column::Custom(*idx),
                None => {
                    log::warn!("Ignoring unknown CSV column `{header}`");
                    Column::Ignored
                }
            },
        })
        .collect();

    if !columns.iter().any(|c| matches!(c, Column::Name)) {
        return Err(FormError::InvalidCsv("missing `name` column".to_string()));
    }

    let mut rows = Vec::new();
    let mut rejected = 0;

    for (line, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| FormError::InvalidCsv(e.to_string()))?;

        let mut name = String::new();
        let mut email = None;
        let mut phone = None;
        let mut headline = None;
        let mut location = None;
        let mut raw_custom = Vec::new();

        for (column, value) in columns.iter().zip(record.iter()) {
            match column {
                Column::Name => name = value.to_string(),
                Column::Email => email = Some(value.to_string()),
                Column::Phone => phone = Some(value.to_string()),
                Column::Headline => headline = Some(value.to_string()),
                Column::Location => location = Some(value.to_string()),
                Column::Custom(idx) => raw_custom.push((*idx, value)),
                Column::Ignored => {}
            }
        }

        let talent = match NewTalent::try_new(
            tenant_id.get(),
            name,
            non_blank(email),
            non_blank(phone),
            headline,
            location,
        ) {
            Ok(talent) => talent,
            Err(err) => {
                log::warn!("Skipping CSV line {}: {err}", line + 2);
                rejected += 1;
                continue;
            }
        };

        let mut custom_values = Vec::new();
        let mut missing_required = None;
        for (idx, field) in fields.iter().enumerate() {
            let raw = raw_custom
                .iter()
                .find(|(column, _)| *column == idx)
                .map(|(_, value)| *value);
            if raw.is_none() && !field.is_required {
                continue;
            }
            match field.normalize_value(raw.unwrap_or_default()) {
                Ok(Some(value)) => custom_values.push((field.id, value)),
                Ok(None) => {}
                Err(err) if field.is_required => {
                    missing_required = Some(err);
                    break;
                }
                Err(err) => {
                    log::warn!("Dropping `{}` on CSV line {}: {err}", field.name, line + 2);
                }
            }
        }
        if let Some(err) = missing_required {
            log::warn!("Skipping CSV line {}: {err}", line + 2);
            rejected += 1;
            continue;
        }

        rows.push(TalentImportRow {
            talent,
            custom_values,
        });
    }

    Ok(TalentCsv { rows, rejected })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::custom_field::CustomFieldType;
    use crate::domain::custom_field::tests::build_field;

    fn tenant() -> TenantId {
        TenantId::new(1).expect("valid tenant")
    }

    #[test]
    fn parses_known_columns() {
        let data = "name,email,phone,headline,location\n\
                    Ada Lovelace,ADA@example.com,+14155552671,Engineer,London\n";

        let csv = parse_talents_csv(data.as_bytes(), tenant(), &[]).expect("valid csv");

        assert_eq!(csv.rows.len(), 1);
        assert_eq!(csv.rejected, 0);
        let talent = &csv.rows[0].talent;
        assert_eq!(talent.name.as_str(), "Ada Lovelace");
        assert_eq!(talent.email.as_ref().map(|e| e.as_str()), Some("ada@example.com"));
        assert_eq!(talent.phone.as_ref().map(|p| p.as_str()), Some("+14155552671"));
        assert_eq!(talent.location.as_deref(), Some("London"));
    }

    #[test]
    fn missing_name_column_is_an_error() {
        let data = "email\nada@example.com\n";
        assert!(matches!(
            parse_talents_csv(data.as_bytes(), tenant(), &[]),
            Err(FormError::InvalidCsv(_))
        ));
    }

    #[test]
    fn invalid_rows_are_counted_and_skipped() {
        let data = "name,email\n,nobody@example.com\nGrace,not-an-email\nLinus,\n";

        let csv = parse_talents_csv(data.as_bytes(), tenant(), &[]).expect("valid csv");

        assert_eq!(csv.rows.len(), 1);
        assert_eq!(csv.rejected, 2);
        assert_eq!(csv.rows[0].talent.name.as_str(), "Linus");
    }

    #[test]
    fn unknown_columns_map_to_custom_fields() {
        let seniority = build_field(
            7,
            "Seniority",
            CustomFieldType::Select,
            &["Junior", "Senior"],
            false,
        );
        let years = build_field(8, "Years", CustomFieldType::Number, &[], false);
        let data = "name,seniority,years,hobby\nAda,Senior,abc,chess\n";

        let csv = parse_talents_csv(data.as_bytes(), tenant(), &[seniority, years])
            .expect("valid csv");

        let values = &csv.rows[0].custom_values;
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].0.get(), 7);
        assert_eq!(values[0].1, "Senior");
    }

    #[test]
    fn rows_without_required_values_are_rejected() {
        let years = build_field(8, "Years", CustomFieldType::Number, &[], true);
        let data = "name,years
Ada,
Grace,abc
Linus,12
";

        let csv = parse_talents_csv(data.as_bytes(), tenant(), &[years]).expect("valid csv");

        assert_eq!(csv.rejected, 2);
        assert_eq!(csv.rows.len(), 1);
        assert_eq!(csv.rows[0].talent.name.as_str(), "Linus");
        assert_eq!(csv.rows[0].custom_values[0].1, "12");
    }

    #[test]
    fn required_field_without_column_rejects_every_row() {
        let years = build_field(8, "Years", CustomFieldType::Number, &[], true);
        let data = "name,email
Ada,ada@example.com
Grace,
";

        let csv = parse_talents_csv(data.as_bytes(), tenant(), &[years]).expect("valid csv");

        assert!(csv.rows.is_empty());
        assert_eq!(csv.rejected, 2);
    }

    #[test]
    fn status_form_parses() {
        let status = TalentStatus::try_from(TalentStatusForm {
            status: "Placed".to_string(),
        });
        assert_eq!(status.ok(), Some(TalentStatus::Placed));
    }
}
