//! Category Model

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, ErrorCode};

/// Owner-defined menu grouping, optionally nested under a parent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub parent_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Category {
    pub fn new(id: i64, owner_id: i64, data: CategoryCreate, now: i64) -> Self {
        Self {
            id,
            owner_id,
            name: data.name.trim().to_string(),
            image: data.image.unwrap_or_default(),
            parent_id: data.parent_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, data: CategoryUpdate, now: i64) {
        if let Some(name) = data.name {
            self.name = name.trim().to_string();
        }
        if let Some(image) = data.image {
            self.image = image;
        }
        if let Some(parent_id) = data.parent_id {
            self.parent_id = parent_id;
        }
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CategoryCreate {
    pub name: String,
    pub image: Option<String>,
    pub parent_id: Option<i64>,
}

impl CategoryCreate {
    pub fn validate(&self) -> AppResult<()> {
        validate_name(&self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub image: Option<String>,
    /// Absent: unchanged. `null`: move to top level.
    #[serde(default, with = "double_option")]
    pub parent_id: Option<Option<i64>>,
}

impl CategoryUpdate {
    pub fn validate(&self) -> AppResult<()> {
        match &self.name {
            Some(name) => validate_name(name),
            None => Ok(()),
        }
    }
}

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(
            AppError::with_message(ErrorCode::RequiredField, "Please provide category name")
                .with_detail("field", "name"),
        );
    }
    Ok(())
}

/// Distinguishes an absent field from an explicit `null`
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Option<i64>>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(inner) => inner.serialize(s),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Option<i64>>, D::Error> {
        Option::<i64>::deserialize(d).map(Some)
    }
}
