//! Product domain models.
//!
//! Products are immutable from the cart's point of view: a cart line keeps
//! the copy it was given at add-time, and later catalog changes never reach
//! it.

use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{MartError, Result};

/// Stable product identifier.
///
/// The backend is loose about whether ids travel as JSON numbers or strings,
/// so the id is normalized to text on the way in and always compared as
/// text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(ProductId(n.to_string())),
            Raw::Text(s) if !s.is_empty() => Ok(ProductId(s)),
            Raw::Text(_) => Err(de::Error::custom("product id must not be empty")),
        }
    }
}

/// Seller attribution attached to a product listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerInfo {
    pub username: String,
}

/// A sellable item as published in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unit price in whole rupiah. No minor units.
    pub price: u64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub quality_grade: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub harvest_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweetness_brix: Option<f32>,
    /// Remaining stock. Absent when the seller does not track it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<SellerInfo>,
}

/// Image payload attached to a seller submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub mime: String,
    pub filename: String,
}

/// A seller's new-product submission, validated before any network call.
#[derive(Debug, Clone, Default)]
pub struct NewProductForm {
    pub name: String,
    /// Unit price in whole rupiah.
    pub price: u64,
    pub category: String,
    pub description: String,
    pub origin: String,
    pub harvest_date: Option<NaiveDate>,
    pub sweetness_brix: Option<f32>,
    pub stock: Option<u32>,
    pub quality_grade: Option<String>,
    pub image: Option<ImageUpload>,
}

impl NewProductForm {
    /// Rejects incomplete submissions.
    ///
    /// Runs entirely locally; a failing form must never reach the network.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(MartError::validation("product name is required"));
        }
        if self.price == 0 {
            return Err(MartError::validation("price must be greater than zero"));
        }
        if self.category.trim().is_empty() {
            return Err(MartError::validation("category is required"));
        }
        if self.description.trim().is_empty() {
            return Err(MartError::validation("description is required"));
        }
        if let Some(image) = &self.image {
            if image.bytes.is_empty() {
                return Err(MartError::validation("image upload is empty"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> NewProductForm {
        NewProductForm {
            name: "Emerald Musk Melon".to_string(),
            price: 125_000,
            category: "Standard".to_string(),
            description: "Classic green melon with a strong musk aroma".to_string(),
            origin: "Banyuwangi".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_product_id_accepts_number_or_string() {
        let from_number: ProductId = serde_json::from_str("7").unwrap();
        let from_string: ProductId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.as_str(), "7");
    }

    #[test]
    fn test_product_id_compares_as_text() {
        assert_eq!(ProductId::from(42u64), ProductId::from("42"));
        assert_ne!(ProductId::from(42u64), ProductId::from("042"));
    }

    #[test]
    fn test_product_deserializes_wire_shape() {
        let json = r#"{
            "id": 2,
            "name": "Emerald Musk Melon",
            "description": "Classic green melon",
            "price": 125000,
            "category": "Standard",
            "qualityGrade": "A",
            "rating": 4.7,
            "reviewCount": 85,
            "imageUrl": "https://example.com/melon.jpg",
            "origin": "Banyuwangi, Jawa Timur",
            "harvestDate": "2024-03-20",
            "sweetnessBrix": 15,
            "stock": 100
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::from("2"));
        assert_eq!(product.price, 125_000);
        assert_eq!(product.quality_grade, "A");
        assert_eq!(product.stock, Some(100));
        assert_eq!(
            product.harvest_date,
            Some(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap())
        );
    }

    #[test]
    fn test_product_tolerates_missing_optional_fields() {
        let json = r#"{"id": "x-1", "name": "Golden Apollo", "price": 65000}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.stock.is_none());
        assert!(product.seller.is_none());
        assert_eq!(product.category, "");
    }

    #[test]
    fn test_form_validation_accepts_complete_form() {
        assert!(sample_form().validate().is_ok());
    }

    #[test]
    fn test_form_validation_rejects_missing_name() {
        let mut form = sample_form();
        form.name = "  ".to_string();
        assert!(form.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_form_validation_rejects_zero_price() {
        let mut form = sample_form();
        form.price = 0;
        assert!(form.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_form_validation_rejects_empty_image() {
        let mut form = sample_form();
        form.image = Some(ImageUpload {
            bytes: Vec::new(),
            mime: "image/jpeg".to_string(),
            filename: "melon.jpg".to_string(),
        });
        assert!(form.validate().is_err());
    }
}
