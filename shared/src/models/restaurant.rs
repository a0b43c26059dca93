//! Restaurant Model

use serde::{Deserialize, Serialize};

use super::opening_hours::{OpeningHours, validate_opening_hours};
use crate::error::{AppError, AppResult, ErrorCode};

/// Lifecycle status of the business entity
///
/// Stored as lowercase TEXT.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestaurantStatus {
    #[default]
    Inactive,
    Pending,
    Active,
    Rejected,
    Suspended,
}

impl RestaurantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Rejected => "rejected",
            Self::Suspended => "suspended",
        }
    }

    /// Only active restaurants follow their opening hours automatically
    pub fn is_schedulable(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Whether the owner may (re)submit legal documents for review
    pub fn can_submit_verification(&self) -> bool {
        matches!(self, Self::Inactive | Self::Pending | Self::Rejected)
    }
}

/// Unknown status text read from storage
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown restaurant status: {0}")]
pub struct InvalidStatus(pub String);

impl std::str::FromStr for RestaurantStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inactive" => Ok(Self::Inactive),
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "rejected" => Ok(Self::Rejected),
            "suspended" => Ok(Self::Suspended),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for RestaurantStatus {
    type Error = InvalidStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for RestaurantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default = "default_state")]
    pub state: String,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

fn default_state() -> String {
    "Kerala".to_string()
}

impl Default for Address {
    fn default() -> Self {
        Self {
            street: None,
            city: None,
            state: default_state(),
            zip_code: None,
            coordinates: None,
        }
    }
}

/// Legal documents submitted for verification (numbers + uploaded file URLs)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegalDocs {
    pub fssai_license_number: Option<String>,
    pub fssai_certificate_url: Option<String>,
    pub gst_number: Option<String>,
    pub gst_certificate_url: Option<String>,
    pub trade_license_number: Option<String>,
    pub trade_license_url: Option<String>,
    pub health_certificate_url: Option<String>,
    pub pan_number: Option<String>,
}

impl LegalDocs {
    /// FSSAI licence number is mandatory before review
    pub fn has_fssai_license(&self) -> bool {
        self.fssai_license_number
            .as_deref()
            .is_some_and(|n| !n.trim().is_empty())
    }
}

/// Restaurant entity
///
/// Nested documents (address, legal docs, opening hours) are JSONB columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    #[cfg_attr(feature = "db", sqlx(json))]
    pub address: Address,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    #[cfg_attr(feature = "db", sqlx(json))]
    pub legal_docs: LegalDocs,
    #[serde(default)]
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub status: RestaurantStatus,
    pub verification_notes: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub num_reviews: i32,
    /// Live availability shown to customers
    #[serde(default)]
    pub is_open: bool,
    /// Owner-asserted availability; suspends automatic scheduling
    #[serde(default)]
    pub is_manual_override: bool,
    #[serde(default)]
    #[cfg_attr(feature = "db", sqlx(json))]
    pub opening_hours: Vec<OpeningHours>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Restaurant {
    /// Build a new inactive restaurant from a create payload
    pub fn new(id: i64, owner_id: i64, data: RestaurantCreate, now: i64) -> Self {
        Self {
            id,
            owner_id,
            name: data.name.trim().to_string(),
            description: data.description,
            address: data.address.unwrap_or_default(),
            contact_number: data.contact_number,
            email: data.email,
            image: data.image,
            legal_docs: data.legal_docs.unwrap_or_default(),
            status: RestaurantStatus::Inactive,
            verification_notes: None,
            rating: 0.0,
            num_reviews: 0,
            is_open: false,
            is_manual_override: false,
            opening_hours: data.opening_hours.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Subject to automatic open/close control
    pub fn is_schedule_eligible(&self) -> bool {
        self.status.is_schedulable() && !self.is_manual_override
    }

    /// Apply a profile update in place.
    ///
    /// Changing `is_open` to a value different from the stored one engages
    /// the manual override in the same write. Returns `true` when
    /// availability changed.
    pub fn apply_update(&mut self, data: RestaurantUpdate, now: i64) -> bool {
        if let Some(name) = data.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = data.description {
            self.description = Some(description);
        }
        if let Some(address) = data.address {
            self.address = address;
        }
        if let Some(contact_number) = data.contact_number {
            self.contact_number = Some(contact_number);
        }
        if let Some(email) = data.email {
            self.email = Some(email);
        }
        if let Some(image) = data.image {
            self.image = Some(image);
        }
        if let Some(legal_docs) = data.legal_docs {
            self.legal_docs = legal_docs;
        }
        if let Some(opening_hours) = data.opening_hours {
            self.opening_hours = opening_hours;
        }

        let mut availability_changed = false;
        if let Some(is_open) = data.is_open
            && is_open != self.is_open
        {
            self.is_open = is_open;
            self.is_manual_override = true;
            availability_changed = true;
        }

        self.updated_at = now;
        availability_changed
    }
}

/// Create restaurant payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RestaurantCreate {
    pub name: String,
    pub description: Option<String>,
    pub address: Option<Address>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    pub legal_docs: Option<LegalDocs>,
    pub opening_hours: Option<Vec<OpeningHours>>,
}

impl RestaurantCreate {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::with_message(
                ErrorCode::RequiredField,
                "Restaurant name is required",
            )
            .with_detail("field", "name"));
        }
        if let Some(hours) = &self.opening_hours {
            validate_opening_hours(hours)?;
        }
        Ok(())
    }
}

/// Update restaurant payload
///
/// `status` is only accepted so that it can be refused explicitly;
/// lifecycle status changes go through verification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<Address>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    pub legal_docs: Option<LegalDocs>,
    pub opening_hours: Option<Vec<OpeningHours>>,
    pub is_open: Option<bool>,
    pub status: Option<RestaurantStatus>,
}

impl RestaurantUpdate {
    pub fn validate(&self) -> AppResult<()> {
        if self.status.is_some() {
            return Err(AppError::new(ErrorCode::StatusNotEditable));
        }
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err(AppError::with_message(
                ErrorCode::RequiredField,
                "Restaurant name cannot be empty",
            )
            .with_detail("field", "name"));
        }
        if let Some(hours) = &self.opening_hours {
            validate_opening_hours(hours)?;
        }
        Ok(())
    }
}
