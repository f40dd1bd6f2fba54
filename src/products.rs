//! Products

use serde::{Deserialize, Serialize};

use crate::ids::TypedId;

/// Product identifier
pub type ProductId = TypedId<Product>;

/// A menu item available for ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog-assigned identifier
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Short description
    pub description: String,

    /// Unit price in whole taka
    pub price: u64,

    /// Image URL
    pub image: String,

    /// Category label
    pub category: String,

    /// Listed ingredients, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,

    /// Preparation time in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparation_time: Option<u32>,

    /// Featured in the popular list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_popular: Option<bool>,
}

impl Product {
    /// Whether the product is flagged as popular.
    #[must_use]
    pub fn popular(&self) -> bool {
        self.is_popular.unwrap_or(false)
    }
}

/// Category Id
pub type CategoryId = TypedId<Category>;

/// A menu category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category identifier
    pub id: CategoryId,

    /// Category name, matched against [`Product::category`]
    pub name: String,

    /// Emoji icon
    pub icon: String,

    /// Image URL
    pub image: String,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn optional_fields_are_omitted_when_absent() -> TestResult {
        let product = Product {
            id: ProductId::new("fries"),
            name: "Fries".to_string(),
            description: "Crispy".to_string(),
            price: 100,
            image: String::new(),
            category: "Burgers".to_string(),
            ingredients: None,
            preparation_time: None,
            is_popular: None,
        };

        let json = serde_json::to_value(&product)?;

        assert!(json.get("ingredients").is_none(), "ingredients should be omitted");
        assert!(json.get("preparationTime").is_none(), "preparationTime should be omitted");
        assert!(!product.popular());

        Ok(())
    }
}
