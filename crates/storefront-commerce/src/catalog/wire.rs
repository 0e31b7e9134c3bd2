//! Catalog wire records.
//!
//! Shapes of the JSON bodies returned by `GET products` and
//! `GET products/{id}`. Field names are camelCase on the wire and prices are
//! decimal strings. Collections the server may omit default to empty.

use crate::ids::{OptionId, OptionValueId, ProductId, VariantId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Product summary from the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: ProductId,
    pub name: String,
    pub default_variant: DefaultVariantPriceDto,
    #[serde(default)]
    pub product_images: Vec<ProductImageUrlDto>,
}

/// Default variant as embedded in a product summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DefaultVariantPriceDto {
    pub price: Money,
}

/// Bare image reference in a product summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductImageUrlDto {
    pub url: String,
}

/// Full product record from the detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailDto {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub default_variant: DefaultVariantIdDto,
    #[serde(default)]
    pub product_variants: Vec<ProductVariantDto>,
    #[serde(default)]
    pub product_images: Vec<ProductImageDto>,
    #[serde(default)]
    pub product_options: Vec<ProductOptionDto>,
    #[serde(default)]
    pub option_value_images: Vec<OptionValueImageDto>,
}

/// Default variant reference in a product detail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DefaultVariantIdDto {
    pub id: VariantId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariantDto {
    pub id: VariantId,
    pub quantity: u32,
    pub price: Money,
    #[serde(default)]
    pub variant_images: Vec<ProductImageDto>,
    #[serde(default)]
    pub variant_options: Vec<VariantOptionDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductImageDto {
    pub url: String,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VariantOptionDto {
    pub product_variant_id: VariantId,
    pub option_value_id: OptionValueId,
    pub option_value: OptionValueDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OptionValueDto {
    pub id: OptionValueId,
    pub name: String,
    #[serde(default)]
    pub position: i32,
    pub option: OptionDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OptionDto {
    pub id: OptionId,
    pub name: String,
    #[serde(default)]
    pub public_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductOptionDto {
    pub option_id: OptionId,
    pub position: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OptionValueImageDto {
    pub product_id: ProductId,
    pub url: String,
    pub option_value_id: OptionValueId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_summary_without_images() {
        let dto: ProductDto = serde_json::from_str(
            r#"{"id":"p-1","name":"Tee","defaultVariant":{"price":"19.90"}}"#,
        )
        .unwrap();

        assert_eq!(dto.default_variant.price, Money::from_cents(1990));
        assert!(dto.product_images.is_empty());
    }

    #[test]
    fn test_detail_accepts_null_description() {
        let dto: ProductDetailDto = serde_json::from_str(
            r#"{
                "id": "p-1",
                "name": "Tee",
                "description": null,
                "defaultVariant": {"id": "pv-1"},
                "productVariants": [],
                "productImages": [{"url": "a.png", "position": 1, "isPrimary": true}]
            }"#,
        )
        .unwrap();

        assert_eq!(dto.description, None);
        assert!(dto.product_images[0].is_primary);
        assert!(dto.option_value_images.is_empty());
    }
}
