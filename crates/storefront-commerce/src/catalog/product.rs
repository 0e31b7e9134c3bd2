//! Product and variant types.
//!
//! These are the UI-shaped entities produced by the catalog mapper. They are
//! immutable snapshots of what the server returned; selection state lives in
//! [`crate::catalog::VariantSelector`], never on the entities themselves.

use crate::ids::{OptionId, OptionValueId, ProductId, VariantId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product summary for list display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Price of the default variant.
    pub price: Money,
    /// First product image in server order, or empty.
    pub image_url: String,
}

/// Full product data for the detail screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductDetail {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Full description, empty when the server sends none.
    pub description: String,
    /// Variant shown when the product is first opened.
    pub default_variant_id: VariantId,
    /// Purchasable variants in server order.
    pub variants: Vec<ProductVariant>,
    /// Gallery images: primary images first, then the rest, each by position.
    pub image_urls: Vec<String>,
    /// Display position of each option axis.
    pub product_options: Vec<ProductOption>,
    /// Images bound to option values (swatches).
    pub option_value_images: Vec<OptionValueImage>,
}

impl ProductDetail {
    /// Look up a variant by id.
    pub fn variant(&self, id: &VariantId) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| &v.id == id)
    }

    /// Number of distinct option axes referenced by the variants.
    pub fn option_axis_count(&self) -> usize {
        let mut seen: Vec<&OptionId> = Vec::new();
        for vo in self.variants.iter().flat_map(|v| v.variant_options.iter()) {
            if !seen.contains(&&vo.option_value.option.id) {
                seen.push(&vo.option_value.option.id);
            }
        }
        seen.len()
    }
}

/// A purchasable variant (one value per option axis).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductVariant {
    /// Unique variant identifier.
    pub id: VariantId,
    /// Units in stock.
    pub quantity: u32,
    /// Unit price.
    pub price: Money,
    /// Variant images ordered by position.
    pub images: Vec<ProductImage>,
    /// Option values that define this variant.
    pub variant_options: Vec<VariantOption>,
}

impl ProductVariant {
    /// Check if this variant carries the given option value.
    pub fn has_option_value(&self, value_id: &OptionValueId) -> bool {
        self.variant_options
            .iter()
            .any(|vo| &vo.option_value_id == value_id)
    }

    /// Ids of every option value on this variant.
    pub fn option_value_ids(&self) -> impl Iterator<Item = &OptionValueId> {
        self.variant_options.iter().map(|vo| &vo.option_value_id)
    }

    /// The value this variant carries on one option axis.
    pub fn value_for_option(&self, option_id: &OptionId) -> Option<&OptionValue> {
        self.variant_options
            .iter()
            .map(|vo| &vo.option_value)
            .find(|value| &value.option.id == option_id)
    }

    /// Check if this variant is in stock.
    pub fn is_in_stock(&self) -> bool {
        self.quantity > 0
    }

    /// Build the variant name from its option values (e.g., "Red / L").
    pub fn build_name(&self) -> String {
        if self.variant_options.is_empty() {
            "Default".to_string()
        } else {
            self.variant_options
                .iter()
                .map(|vo| vo.option_value.name.as_str())
                .collect::<Vec<_>>()
                .join(" / ")
        }
    }
}

/// Binds a variant to one option value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariantOption {
    /// Owning variant.
    pub product_variant_id: VariantId,
    /// Selected option value.
    pub option_value_id: OptionValueId,
    /// The resolved option value.
    pub option_value: OptionValue,
}

/// A concrete choice within an option axis (e.g., "Red").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionValue {
    /// Unique option value identifier.
    pub id: OptionValueId,
    /// Display name.
    pub name: String,
    /// Sort position within the axis.
    pub position: i32,
    /// The axis this value belongs to.
    pub option: OptionType,
}

/// One option axis (e.g., "Color").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct OptionType {
    /// Unique option identifier.
    pub id: OptionId,
    /// Internal name.
    pub name: String,
    /// Label shown to shoppers.
    pub public_label: String,
}

/// Display position of an option axis on a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductOption {
    /// The option axis.
    pub option_id: OptionId,
    /// Zero-based display position.
    pub position: i32,
}

/// Image bound to an option value, scoped to a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptionValueImage {
    /// Owning product.
    pub product_id: ProductId,
    /// Image URL.
    pub url: String,
    /// Option value the image illustrates.
    pub option_value_id: OptionValueId,
}

/// A product or variant image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductImage {
    /// Image URL.
    pub url: String,
    /// Sort position.
    pub position: i32,
    /// Whether this is a primary image.
    pub is_primary: bool,
}
