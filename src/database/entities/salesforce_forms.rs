use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

/// Admin-defined mapping between a front-end form and a CRM lead-capture
/// endpoint. `form_name` is unique within a locale (enforced by a database
/// unique index as well as the service-level check).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "salesforce_forms")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub form_key: String,
    pub form_name: String,
    pub endpoint_url: String,
    pub oid: String,
    pub ret_url: Option<String>,
    pub active: bool,
    pub locale: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub field_configs: serde_json::Value, // Ordered field descriptor array
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::form_submissions::Entity")]
    FormSubmissions,
}

impl Related<super::form_submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FormSubmissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub fn new() -> Self {
        Self {
            id: ActiveValue::NotSet,
            form_key: ActiveValue::NotSet,
            form_name: ActiveValue::NotSet,
            endpoint_url: ActiveValue::NotSet,
            oid: ActiveValue::NotSet,
            ret_url: ActiveValue::NotSet,
            active: Set(true),
            locale: Set("en".to_string()),
            field_configs: Set(serde_json::Value::Array(Vec::new())),
            created_at: Set(chrono::Utc::now()),
            updated_at: Set(chrono::Utc::now()),
        }
    }

    pub fn set_updated_at(mut self) -> Self {
        self.updated_at = Set(chrono::Utc::now());
        self
    }
}
