//! Catalog

use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::products::{Category, Product, ProductId};

const MENU_FIXTURE: &str = include_str!("../fixtures/menu.yml");

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Two products share an id
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(ProductId),

    /// A product names a category that is not listed
    #[error("Product {product} references unknown category {category}")]
    UnknownCategory {
        /// Offending product
        product: ProductId,
        /// Category label on the product
        category: String,
    },
}

#[derive(Debug, Deserialize)]
struct MenuFixture {
    categories: Vec<Category>,
    products: Vec<Product>,
}

/// Read-only product listing.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
    products: Vec<Product>,
    index: FxHashMap<ProductId, usize>,
}

impl Catalog {
    /// Load the bundled menu.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled fixture is malformed.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_yaml(MENU_FIXTURE)
    }

    /// Parse a menu from YAML with `categories` and `products` lists.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed, a product id repeats, or
    /// a product points at a category that is not listed.
    pub fn from_yaml(contents: &str) -> Result<Self, CatalogError> {
        let fixture: MenuFixture = serde_norway::from_str(contents)?;

        let mut index = FxHashMap::default();

        for (position, product) in fixture.products.iter().enumerate() {
            if !fixture
                .categories
                .iter()
                .any(|category| category.name == product.category)
            {
                return Err(CatalogError::UnknownCategory {
                    product: product.id.clone(),
                    category: product.category.clone(),
                });
            }

            if index.insert(product.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
        }

        Ok(Self {
            categories: fixture.categories,
            products: fixture.products,
            index,
        })
    }

    /// All categories in menu order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// All products in menu order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    pub fn find(&self, id: &str) -> Option<&Product> {
        self.index
            .get(id)
            .and_then(|position| self.products.get(*position))
    }

    /// Products flagged as popular.
    pub fn popular(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|product| product.popular())
    }

    /// Products in `category` (all categories when `None`) whose name
    /// contains `query`, ignoring case.
    pub fn filter<'a>(
        &'a self,
        category: Option<&'a str>,
        query: &str,
    ) -> impl Iterator<Item = &'a Product> + use<'a> {
        let query = query.to_lowercase();

        self.products.iter().filter(move |product| {
            let matches_category = category.is_none_or(|category| product.category == category);

            matches_category && product.name.to_lowercase().contains(&query)
        })
    }
}
