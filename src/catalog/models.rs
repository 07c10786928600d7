//! Product Catalog Models
//! Mission: Define the product entity, request validation, and response projections

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product record as stored
#[derive(Debug, Clone)]
pub struct Product {
    pub id: i64,
    pub product_name: String,
    pub category: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock_quantity: i64,
    pub supplier: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for create/update operations
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub product_name: String,
    pub category: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock_quantity: i64,
    pub supplier: Option<String>,
}

/// Product create/update request body.
///
/// Every field is optional at the serde layer so that missing fields surface
/// as field-level validation errors instead of a deserialization failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock_quantity: Option<i64>,
    pub supplier: Option<String>,
}

impl ProductRequest {
    /// Validate the request, returning the parsed product fields or the full
    /// list of field errors.
    pub fn validate(&self) -> Result<NewProduct, Vec<FieldError>> {
        let mut errors = Vec::new();

        match &self.product_name {
            Some(name) if !name.trim().is_empty() => {
                let len = name.chars().count();
                if !(2..=255).contains(&len) {
                    errors.push(FieldError::new(
                        "productName",
                        "Product name must be between 2 and 255 characters",
                    ));
                }
            }
            _ => errors.push(FieldError::new("productName", "Product name is required")),
        }

        match &self.category {
            Some(category) if !category.trim().is_empty() => {
                if category.chars().count() > 100 {
                    errors.push(FieldError::new(
                        "category",
                        "Category must not exceed 100 characters",
                    ));
                }
            }
            _ => errors.push(FieldError::new("category", "Category is required")),
        }

        match self.price {
            None => errors.push(FieldError::new("price", "Price is required")),
            Some(price) => {
                if price < Decimal::new(1, 2) {
                    errors.push(FieldError::new("price", "Price must be greater than 0"));
                } else if price.normalize().scale() > 2
                    || price.trunc() > Decimal::from(99_999_999u32)
                {
                    errors.push(FieldError::new(
                        "price",
                        "Price must have at most 8 digits before decimal and 2 after",
                    ));
                }
            }
        }

        match self.stock_quantity {
            None => errors.push(FieldError::new("stockQuantity", "Stock quantity is required")),
            Some(quantity) if quantity < 0 => {
                errors.push(FieldError::new("stockQuantity", "Stock quantity must be >= 0"));
            }
            Some(_) => {}
        }

        if let Some(supplier) = &self.supplier {
            if supplier.chars().count() > 255 {
                errors.push(FieldError::new(
                    "supplier",
                    "Supplier must not exceed 255 characters",
                ));
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewProduct {
            product_name: self.product_name.clone().unwrap_or_default(),
            category: self.category.clone().unwrap_or_default(),
            description: self.description.clone(),
            price: self.price.unwrap_or_default(),
            stock_quantity: self.stock_quantity.unwrap_or_default(),
            supplier: self.supplier.clone(),
        })
    }
}

/// Product response projection
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i64,
    pub product_name: String,
    pub category: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock_quantity: i64,
    pub supplier: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductResponse {
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            product_name: product.product_name.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
            price: product.price,
            stock_quantity: product.stock_quantity,
            supplier: product.supplier.clone(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// A bounded slice of a larger result set with pagination metadata
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: i64,
    pub size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    /// Map the content slice into another projection, keeping the metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

/// Field-level validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Error envelope for validation failures
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
    pub status: u16,
    pub timestamp: i64,
}

impl ErrorResponse {
    pub fn new(message: &str, errors: Vec<FieldError>, status: u16) -> Self {
        Self {
            message: message.to_string(),
            errors,
            status,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}
