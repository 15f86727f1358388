use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

/// One end-user form post: the submitted payload, the forwarding outcome, and
/// a generated `code` used for idempotent lookup/update independent of the
/// numeric id. `code` never changes after creation.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "form_submissions")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub form_id: i32,
    #[sea_orm(unique)]
    pub code: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub payload: serde_json::Value, // Submitted field name -> value
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub salesforce_response: Option<serde_json::Value>,
    pub salesforce_status: String,
    pub error_message: Option<String>,
    pub locale: String,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::salesforce_forms::Entity",
        from = "Column::FormId",
        to = "super::salesforce_forms::Column::Id",
        on_delete = "Cascade"
    )]
    SalesforceForms,
}

impl Related<super::salesforce_forms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SalesforceForms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub fn set_updated_at(mut self) -> Self {
        self.updated_at = Set(chrono::Utc::now());
        self
    }
}

/// Forwarding state of a submission. Starts `pending`; patched to `success`
/// or `error` after the forwarding attempt reports back.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Success,
    Error,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Success => "success",
            SubmissionStatus::Error => "error",
        }
    }
}

impl Default for SubmissionStatus {
    fn default() -> Self {
        SubmissionStatus::Pending
    }
}
