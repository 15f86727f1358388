use chrono::{DateTime, Utc};
use rust_xlsxwriter::Workbook;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::database::entities::form_submissions;
use crate::errors::SubmissionError;

/// Optional filters for a submissions export. All absent means everything.
#[derive(Clone, Debug, Default)]
pub struct ExportFilter {
    pub locale: Option<String>,
    pub form_id: Option<i32>,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
}

/// Serialises matching submissions into an XLSX workbook for download.
#[derive(Clone)]
pub struct ExportService {
    db: DatabaseConnection,
}

const COLUMNS: [&str; 10] = [
    "id",
    "code",
    "formId",
    "locale",
    "salesforceStatus",
    "errorMessage",
    "payload",
    "salesforceResponse",
    "createdAt",
    "updatedAt",
];

impl ExportService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// One row per matching submission, columns from the submission record's
    /// own fields. Zero matches still yields a workbook with the header row.
    pub async fn export_submissions(
        &self,
        filter: ExportFilter,
    ) -> Result<Vec<u8>, SubmissionError> {
        let mut query = form_submissions::Entity::find()
            .order_by_asc(form_submissions::Column::CreatedAt);
        if let Some(locale) = &filter.locale {
            query = query.filter(form_submissions::Column::Locale.eq(locale));
        }
        if let Some(form_id) = filter.form_id {
            query = query.filter(form_submissions::Column::FormId.eq(form_id));
        }
        if let Some(from) = filter.from_date {
            query = query.filter(form_submissions::Column::CreatedAt.gte(from));
        }
        if let Some(to) = filter.to_date {
            query = query.filter(form_submissions::Column::CreatedAt.lte(to));
        }

        let submissions = query.all(&self.db).await?;

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Form Submissions")?;

        for (col, header) in COLUMNS.iter().enumerate() {
            worksheet.write_string(0, col as u16, *header)?;
        }

        for (index, submission) in submissions.iter().enumerate() {
            let row = (index + 1) as u32;
            worksheet.write_number(row, 0, submission.id as f64)?;
            worksheet.write_string(row, 1, &submission.code)?;
            worksheet.write_number(row, 2, submission.form_id as f64)?;
            worksheet.write_string(row, 3, &submission.locale)?;
            worksheet.write_string(row, 4, &submission.salesforce_status)?;
            if let Some(message) = &submission.error_message {
                worksheet.write_string(row, 5, message)?;
            }
            worksheet.write_string(row, 6, submission.payload.to_string())?;
            if let Some(response) = &submission.salesforce_response {
                worksheet.write_string(row, 7, response.to_string())?;
            }
            worksheet.write_string(row, 8, submission.created_at.to_rfc3339())?;
            worksheet.write_string(row, 9, submission.updated_at.to_rfc3339())?;
        }

        Ok(workbook.save_to_buffer()?)
    }
}
