use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use serde::Deserialize;

use crate::database::entities::salesforce_forms;
use crate::errors::FormError;
use crate::fields;

pub const DEFAULT_LOCALE: &str = "en";

/// Incoming form fields for create/update. Updates are full replacements,
/// matching the admin UI's save behaviour.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    pub form_key: String,
    pub form_name: String,
    pub endpoint_url: String,
    pub oid: String,
    #[serde(default)]
    pub ret_url: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default = "empty_configs")]
    pub field_configs: serde_json::Value,
}

fn empty_configs() -> serde_json::Value {
    serde_json::Value::Array(Vec::new())
}

/// CRUD over salesforce forms with locale-scoped name uniqueness.
#[derive(Clone)]
pub struct FormService {
    db: DatabaseConnection,
}

impl FormService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a form. Fails with a validation error when another form already
    /// uses the same name in the target locale.
    pub async fn create_form(
        &self,
        data: FormData,
        locale: Option<&str>,
    ) -> Result<salesforce_forms::Model, FormError> {
        let locale = locale.unwrap_or(DEFAULT_LOCALE).to_string();

        fields::parse_configs(&data.field_configs)?;
        self.check_name_available(&data.form_name, &locale, None)
            .await?;

        let form = salesforce_forms::ActiveModel {
            form_key: Set(data.form_key),
            form_name: Set(data.form_name.clone()),
            endpoint_url: Set(data.endpoint_url),
            oid: Set(data.oid),
            ret_url: Set(data.ret_url),
            active: Set(data.active.unwrap_or(true)),
            locale: Set(locale.clone()),
            field_configs: Set(data.field_configs),
            ..salesforce_forms::ActiveModel::new()
        };

        form.insert(&self.db)
            .await
            .map_err(|e| Self::map_insert_err(e, &data.form_name, &locale))
    }

    /// Update a form, re-running the uniqueness check against every record
    /// except the one being updated.
    pub async fn update_form(
        &self,
        id: i32,
        data: FormData,
        locale: Option<&str>,
    ) -> Result<salesforce_forms::Model, FormError> {
        let locale = locale.unwrap_or(DEFAULT_LOCALE).to_string();

        let form = salesforce_forms::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(FormError::NotFound(id))?;

        fields::parse_configs(&data.field_configs)?;
        self.check_name_available(&data.form_name, &locale, Some(id))
            .await?;

        let mut active_form: salesforce_forms::ActiveModel = form.into();
        active_form.form_key = Set(data.form_key);
        active_form.form_name = Set(data.form_name.clone());
        active_form.endpoint_url = Set(data.endpoint_url);
        active_form.oid = Set(data.oid);
        active_form.ret_url = Set(data.ret_url);
        if let Some(active) = data.active {
            active_form.active = Set(active);
        }
        active_form.locale = Set(locale.clone());
        active_form.field_configs = Set(data.field_configs);

        active_form
            .set_updated_at()
            .update(&self.db)
            .await
            .map_err(|e| Self::map_insert_err(e, &data.form_name, &locale))
    }

    /// List forms, optionally scoped to a locale, newest first.
    pub async fn list_forms(
        &self,
        locale: Option<&str>,
    ) -> Result<Vec<salesforce_forms::Model>, FormError> {
        let mut query = salesforce_forms::Entity::find()
            .order_by_desc(salesforce_forms::Column::UpdatedAt);
        if let Some(locale) = locale {
            query = query.filter(salesforce_forms::Column::Locale.eq(locale));
        }
        Ok(query.all(&self.db).await?)
    }

    pub async fn get_form(&self, id: i32) -> Result<salesforce_forms::Model, FormError> {
        salesforce_forms::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(FormError::NotFound(id))
    }

    /// Active forms only, optionally locale-filtered.
    pub async fn find_active(
        &self,
        locale: Option<&str>,
    ) -> Result<Vec<salesforce_forms::Model>, FormError> {
        let mut query = salesforce_forms::Entity::find()
            .filter(salesforce_forms::Column::Active.eq(true))
            .order_by_desc(salesforce_forms::Column::UpdatedAt);
        if let Some(locale) = locale {
            query = query.filter(salesforce_forms::Column::Locale.eq(locale));
        }
        Ok(query.all(&self.db).await?)
    }

    /// First active form with the given name, used by the public content API.
    pub async fn find_by_form_name(
        &self,
        form_name: &str,
        locale: Option<&str>,
    ) -> Result<salesforce_forms::Model, FormError> {
        let mut query = salesforce_forms::Entity::find()
            .filter(salesforce_forms::Column::FormName.eq(form_name))
            .filter(salesforce_forms::Column::Active.eq(true));
        if let Some(locale) = locale {
            query = query.filter(salesforce_forms::Column::Locale.eq(locale));
        }
        query
            .one(&self.db)
            .await?
            .ok_or_else(|| FormError::NameNotFound(form_name.to_string()))
    }

    /// Hard delete; 404 if absent.
    pub async fn delete_form(&self, id: i32) -> Result<(), FormError> {
        let result = salesforce_forms::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(FormError::NotFound(id));
        }

        Ok(())
    }

    async fn check_name_available(
        &self,
        form_name: &str,
        locale: &str,
        exclude_id: Option<i32>,
    ) -> Result<(), FormError> {
        let mut query = salesforce_forms::Entity::find()
            .filter(salesforce_forms::Column::FormName.eq(form_name))
            .filter(salesforce_forms::Column::Locale.eq(locale));
        if let Some(id) = exclude_id {
            query = query.filter(salesforce_forms::Column::Id.ne(id));
        }

        if query.one(&self.db).await?.is_some() {
            return Err(FormError::AlreadyExists {
                name: form_name.to_string(),
                locale: locale.to_string(),
            });
        }
        Ok(())
    }

    /// A unique-index violation means a concurrent writer won the race after
    /// our pre-check; surface it as the same 400 contract.
    fn map_insert_err(err: sea_orm::DbErr, form_name: &str, locale: &str) -> FormError {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => FormError::AlreadyExists {
                name: form_name.to_string(),
                locale: locale.to_string(),
            },
            _ => FormError::Database(err),
        }
    }
}
