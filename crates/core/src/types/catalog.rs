//! Records delivered by the catalog feeds.
//!
//! Field names on the wire are the catalog backend's Spanish column names;
//! the Rust side uses English names and serde renames.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::id::{LooseText, ProductId, deserialize_text};
use super::price::Price;

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "Nombre", deserialize_with = "deserialize_text")]
    pub name: String,
}

impl Category {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A product brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    #[serde(rename = "Nombre", deserialize_with = "deserialize_text")]
    pub name: String,
}

impl Brand {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A catalog product.
///
/// Every field is optional on the wire. Text fields accept `null`, and a
/// record without `id_page` gets a position id from [`assign_missing_ids`],
/// so an incomplete record still lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "id_page", default)]
    pub id: ProductId,
    #[serde(rename = "Nombre", default, deserialize_with = "deserialize_text")]
    pub name: String,
    #[serde(rename = "Marca", default, deserialize_with = "deserialize_text")]
    pub brand: String,
    #[serde(rename = "Descripcion", default, deserialize_with = "deserialize_text")]
    pub description: String,
    #[serde(rename = "Categoria", default, deserialize_with = "deserialize_text")]
    pub category: String,
    #[serde(rename = "Dimensiones", default)]
    pub dimensions: LooseText,
    #[serde(rename = "Peso", default)]
    pub weight: LooseText,
    #[serde(rename = "Precio", default)]
    pub price: Price,
    #[serde(rename = "Imagen", default, deserialize_with = "deserialize_text")]
    pub image_url: String,
    #[serde(rename = "Ficha", default, deserialize_with = "deserialize_text")]
    pub technical_sheet_url: String,
}

impl Product {
    /// Minimal product with the fields the filters look at.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        category: impl Into<String>,
        brand: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            brand: brand.into(),
            description: String::new(),
            category: category.into(),
            dimensions: LooseText::default(),
            weight: LooseText::default(),
            price: Price::absent(),
            image_url: String::new(),
            technical_sheet_url: String::new(),
        }
    }

    /// Whether the product has a technical sheet link worth offering.
    #[must_use]
    pub fn has_technical_sheet(&self) -> bool {
        !self.technical_sheet_url.trim().is_empty()
    }
}

/// Give products without an `id_page` an id derived from their feed position.
///
/// Position ids look like `item-3` (zero-based) and skip any id the feed
/// already uses, so they stay stable for a given feed and never collide.
pub fn assign_missing_ids(products: &mut [Product]) {
    let taken: HashSet<String> = products
        .iter()
        .filter(|product| !product.id.is_empty())
        .map(|product| product.id.as_str().to_string())
        .collect();

    for (index, product) in products.iter_mut().enumerate() {
        if !product.id.is_empty() {
            continue;
        }
        let mut candidate = format!("item-{index}");
        while taken.contains(&candidate) {
            candidate.push('_');
        }
        product.id = ProductId::new(candidate);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_product_from_feed_record() {
        let json = r#"{
            "id_page": "bomba-x200",
            "Nombre": "Bomba Industrial X200",
            "Marca": "Parker",
            "Descripcion": "Bomba de engranes",
            "Categoria": "Bombas",
            "Dimensiones": "30 x 20 x 15 cm",
            "Peso": 12.5,
            "Precio": 19.5,
            "Imagen": "https://cdn.example.mx/x200.png",
            "Ficha": "https://cdn.example.mx/x200.pdf"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.id, ProductId::new("bomba-x200"));
        assert_eq!(product.brand, "Parker");
        assert_eq!(product.weight.as_str(), "12.5");
        assert_eq!(product.price.amount(), Some(Decimal::new(195, 1)));
        assert!(product.has_technical_sheet());
    }

    #[test]
    fn test_product_with_missing_fields() {
        let json = r#"{ "id_page": 9, "Nombre": "Válvula", "Precio": null }"#;

        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.id.as_str(), "9");
        assert!(product.description.is_empty());
        assert_eq!(product.price.amount(), None);
        assert!(!product.has_technical_sheet());
    }

    #[test]
    fn test_product_with_null_text_fields() {
        let json = r#"{
            "id_page": "7",
            "Nombre": "Cilindro",
            "Marca": null,
            "Descripcion": null,
            "Categoria": null,
            "Imagen": null,
            "Ficha": null
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.name, "Cilindro");
        assert!(product.brand.is_empty());
        assert!(product.description.is_empty());
        assert!(product.category.is_empty());
        assert!(product.image_url.is_empty());
        assert!(!product.has_technical_sheet());
    }

    #[test]
    fn test_product_without_id_gets_position_id() {
        let json = r#"[
            { "Nombre": "Manguera" },
            { "id_page": "item-0", "Nombre": "Conector" },
            { "id_page": null, "Nombre": "Filtro" }
        ]"#;

        let mut products: Vec<Product> = serde_json::from_str(json).unwrap();
        assign_missing_ids(&mut products);

        assert_eq!(products[0].id.as_str(), "item-0_");
        assert_eq!(products[1].id.as_str(), "item-0");
        assert_eq!(products[2].id.as_str(), "item-2");
    }

    #[test]
    fn test_category_and_brand_wire_names() {
        let category: Category = serde_json::from_str(r#"{"Nombre":"Válvulas"}"#).unwrap();
        let brand: Brand = serde_json::from_str(r#"{"Nombre":"Acme"}"#).unwrap();

        assert_eq!(category, Category::new("Válvulas"));
        assert_eq!(brand, Brand::new("Acme"));
    }
}
