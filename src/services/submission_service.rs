use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::entities::{form_submissions, salesforce_forms, SubmissionStatus};
use crate::errors::SubmissionError;

pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Incoming submission body. `form` is accepted as an alias for `formId`
/// because the host convention names the relation, not the column.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionData {
    #[serde(alias = "form")]
    pub form_id: i32,
    pub payload: serde_json::Value,
    #[serde(default)]
    pub locale: Option<String>,
}

/// Patch applied after the forwarding attempt. The generated `code` is not
/// part of this struct, so a client-supplied code is dropped before applying.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPatch {
    #[serde(default)]
    pub salesforce_status: Option<SubmissionStatus>,
    #[serde(default)]
    pub salesforce_response: Option<serde_json::Value>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// A page of submissions plus the total row count.
pub struct SubmissionPage {
    pub results: Vec<form_submissions::Model>,
    pub total: u64,
}

/// Stores end-user form posts and their forwarding status patch-backs.
#[derive(Clone)]
pub struct SubmissionService {
    db: DatabaseConnection,
}

impl SubmissionService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Persist a new submission with a fresh unique code and pending status.
    pub async fn create_submission(
        &self,
        data: SubmissionData,
    ) -> Result<form_submissions::Model, SubmissionError> {
        salesforce_forms::Entity::find_by_id(data.form_id)
            .one(&self.db)
            .await?
            .ok_or(SubmissionError::FormNotFound(data.form_id))?;

        let now = Utc::now();
        let submission = form_submissions::ActiveModel {
            form_id: Set(data.form_id),
            code: Set(Uuid::new_v4().to_string()),
            payload: Set(data.payload),
            salesforce_response: Set(None),
            salesforce_status: Set(SubmissionStatus::Pending.as_str().to_string()),
            error_message: Set(None),
            locale: Set(data.locale.unwrap_or_else(|| "en".to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(submission.insert(&self.db).await?)
    }

    /// Newest-first page of submissions plus the total count.
    pub async fn list_submissions(
        &self,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<SubmissionPage, SubmissionError> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);
        let offset = offset.unwrap_or(0);

        let results = form_submissions::Entity::find()
            .order_by_desc(form_submissions::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await?;

        let total = form_submissions::Entity::find().count(&self.db).await?;

        Ok(SubmissionPage { results, total })
    }

    pub async fn get_submission(
        &self,
        id: i32,
    ) -> Result<form_submissions::Model, SubmissionError> {
        form_submissions::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(SubmissionError::NotFound(id))
    }

    pub async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<form_submissions::Model, SubmissionError> {
        form_submissions::Entity::find()
            .filter(form_submissions::Column::Code.eq(code))
            .one(&self.db)
            .await?
            .ok_or_else(|| SubmissionError::CodeNotFound(code.to_string()))
    }

    pub async fn update_submission(
        &self,
        id: i32,
        patch: SubmissionPatch,
    ) -> Result<form_submissions::Model, SubmissionError> {
        let submission = self.get_submission(id).await?;
        self.apply_patch(submission, patch).await
    }

    /// Patch by generated code; the code itself stays immutable.
    pub async fn update_submission_by_code(
        &self,
        code: &str,
        patch: SubmissionPatch,
    ) -> Result<form_submissions::Model, SubmissionError> {
        let submission = self.find_by_code(code).await?;
        self.apply_patch(submission, patch).await
    }

    pub async fn delete_submission(&self, id: i32) -> Result<(), SubmissionError> {
        let result = form_submissions::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(SubmissionError::NotFound(id));
        }

        Ok(())
    }

    async fn apply_patch(
        &self,
        submission: form_submissions::Model,
        patch: SubmissionPatch,
    ) -> Result<form_submissions::Model, SubmissionError> {
        let mut active: form_submissions::ActiveModel = submission.into();

        if let Some(status) = patch.salesforce_status {
            active.salesforce_status = Set(status.as_str().to_string());
        }
        if let Some(response) = patch.salesforce_response {
            active.salesforce_response = Set(Some(response));
        }
        if let Some(message) = patch.error_message {
            active.error_message = Set(Some(message));
        }

        Ok(active.set_updated_at().update(&self.db).await?)
    }
}
