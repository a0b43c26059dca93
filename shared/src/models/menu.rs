//! Menu Item Model
//!
//! Items live in the owner's pool and are linked to any number of the
//! owner's restaurants.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, ErrorCode};

/// Priced size or portion of an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuVariant {
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    #[cfg_attr(feature = "db", sqlx(json))]
    pub variants: Vec<MenuVariant>,
    #[serde(default)]
    pub image: String,
    pub category: String,
    pub is_veg: bool,
    pub is_active: bool,
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Restaurants serving this item
    #[serde(default)]
    pub restaurant_ids: Vec<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl MenuItem {
    pub fn new(id: i64, owner_id: i64, data: MenuItemCreate, now: i64) -> Self {
        Self {
            id,
            owner_id,
            name: data.name.trim().to_string(),
            description: data.description,
            price: data.price,
            variants: data.variants.unwrap_or_default(),
            image: data.image.unwrap_or_default(),
            category: data.category.trim().to_string(),
            is_veg: data.is_veg.unwrap_or(true),
            is_active: data.is_active.unwrap_or(true),
            ingredients: data.ingredients.unwrap_or_default(),
            restaurant_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, data: MenuItemUpdate, now: i64) {
        if let Some(name) = data.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = data.description {
            self.description = description;
        }
        if let Some(price) = data.price {
            self.price = price;
        }
        if let Some(variants) = data.variants {
            self.variants = variants;
        }
        if let Some(image) = data.image {
            self.image = image;
        }
        if let Some(category) = data.category {
            self.category = category.trim().to_string();
        }
        if let Some(is_veg) = data.is_veg {
            self.is_veg = is_veg;
        }
        if let Some(is_active) = data.is_active {
            self.is_active = is_active;
        }
        if let Some(ingredients) = data.ingredients {
            self.ingredients = ingredients;
        }
        self.updated_at = now;
    }

    /// Listed on `restaurant_id`'s public menu
    pub fn is_served_at(&self, restaurant_id: i64) -> bool {
        self.is_active && self.restaurant_ids.contains(&restaurant_id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MenuItemCreate {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub variants: Option<Vec<MenuVariant>>,
    pub image: Option<String>,
    pub category: String,
    pub is_veg: Option<bool>,
    pub is_active: Option<bool>,
    pub ingredients: Option<Vec<String>>,
}

impl MenuItemCreate {
    pub fn validate(&self) -> AppResult<()> {
        required("name", &self.name)?;
        required("description", &self.description)?;
        required("category", &self.category)?;
        validate_price("price", self.price)?;
        if let Some(variants) = &self.variants {
            validate_variants(variants)?;
        }
        Ok(())
    }
}

/// Partial update; restaurant links change only through assignment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub variants: Option<Vec<MenuVariant>>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub is_veg: Option<bool>,
    pub is_active: Option<bool>,
    pub ingredients: Option<Vec<String>>,
}

impl MenuItemUpdate {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            required("name", name)?;
        }
        if let Some(description) = &self.description {
            required("description", description)?;
        }
        if let Some(category) = &self.category {
            required("category", category)?;
        }
        if let Some(price) = self.price {
            validate_price("price", price)?;
        }
        if let Some(variants) = &self.variants {
            validate_variants(variants)?;
        }
        Ok(())
    }
}

/// Body of `PUT /menu/{id}/assign-restaurants`; replaces the whole link set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AssignRestaurants {
    pub restaurant_ids: Vec<i64>,
}

impl AssignRestaurants {
    /// Ids in first-seen order, duplicates dropped
    pub fn distinct_ids(&self) -> Vec<i64> {
        let mut ids = Vec::with_capacity(self.restaurant_ids.len());
        for id in &self.restaurant_ids {
            if !ids.contains(id) {
                ids.push(*id);
            }
        }
        ids
    }
}

fn required(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(
            AppError::with_message(ErrorCode::RequiredField, format!("{field} is required"))
                .with_detail("field", field),
        );
    }
    Ok(())
}

fn validate_price(field: &str, price: f64) -> AppResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(
            AppError::with_message(ErrorCode::ValueOutOfRange, "Price must be zero or more")
                .with_detail("field", field),
        );
    }
    Ok(())
}

fn validate_variants(variants: &[MenuVariant]) -> AppResult<()> {
    for (i, variant) in variants.iter().enumerate() {
        required(&format!("variants[{i}].name"), &variant.name)?;
        validate_price(&format!("variants[{i}].price"), variant.price)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn biryani() -> MenuItemCreate {
        MenuItemCreate {
            name: " Chicken Biryani ".to_string(),
            description: "Thalassery style".to_string(),
            price: 220.0,
            category: "Mains".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn new_item_defaults() {
        let item = MenuItem::new(1, 9, biryani(), 100);
        assert_eq!(item.name, "Chicken Biryani");
        assert!(item.is_veg);
        assert!(item.is_active);
        assert!(item.restaurant_ids.is_empty());
        assert!(!item.is_served_at(5));
    }

    #[test]
    fn create_validation() {
        assert!(biryani().validate().is_ok());

        let mut bad = biryani();
        bad.price = -1.0;
        assert_eq!(bad.validate().unwrap_err().code, ErrorCode::ValueOutOfRange);

        let mut bad = biryani();
        bad.category = "  ".to_string();
        let err = bad.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.details.unwrap()["field"], "category");

        let mut bad = biryani();
        bad.variants = Some(vec![MenuVariant {
            name: "Full".to_string(),
            price: f64::NAN,
        }]);
        assert_eq!(bad.validate().unwrap_err().code, ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn update_keeps_unset_fields() {
        let mut item = MenuItem::new(1, 9, biryani(), 100);
        item.apply_update(
            MenuItemUpdate {
                price: Some(240.0),
                is_active: Some(false),
                ..Default::default()
            },
            200,
        );
        assert_eq!(item.price, 240.0);
        assert!(!item.is_active);
        assert_eq!(item.category, "Mains");
        assert_eq!(item.updated_at, 200);
    }

    #[test]
    fn assignment_dedupes_in_order() {
        let assign: AssignRestaurants =
            serde_json::from_str(r#"{"restaurantIds":[3,1,3,2,1]}"#).unwrap();
        assert_eq!(assign.distinct_ids(), vec![3, 1, 2]);
        assert!(serde_json::from_str::<AssignRestaurants>(r#"{"restaurant_ids":[1]}"#).is_err());
    }
}
