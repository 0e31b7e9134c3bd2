//! Cart wire records and request bodies.

use crate::catalog::wire::ProductOptionDto;
use crate::ids::{CartId, OptionId, OptionValueId, ProductId, VariantId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Cart with nested product detail, as returned with `details=true`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartDto {
    pub id: CartId,
    #[serde(default)]
    pub cart_items: Vec<CartItemDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItemDto {
    pub quantity: u32,
    pub cart_id: CartId,
    pub product_variant_id: VariantId,
    pub product_variant: CartProductVariantDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartProductVariantDto {
    pub quantity: u32,
    pub price: Money,
    pub product: CartProductDto,
    #[serde(default)]
    pub variant_options: Vec<CartVariantOptionDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartProductDto {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub product_options: Vec<ProductOptionDto>,
    #[serde(default)]
    pub option_value_images: Vec<CartOptionValueImageDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartOptionValueImageDto {
    pub url: String,
    pub option_value_id: OptionValueId,
    pub option_value: CartOptionValueDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartOptionValueDto {
    pub option: CartOptionDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartOptionDto {
    pub id: OptionId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartVariantOptionDto {
    pub option_value_id: OptionValueId,
    pub option_value: CartOptionValueWithNameDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartOptionValueWithNameDto {
    pub name: String,
    pub option: CartOptionDto,
}

/// Body of `POST cart/items`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartItemAddRequest {
    pub quantity: u32,
    pub product_variant_id: VariantId,
}

/// Body of `PATCH cart/items/{variantId}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartItemQuantityUpdateRequest {
    pub quantity: u32,
    pub cart_id: CartId,
}

/// One entry of a batch update. `quantity` is the target quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartItemUpdateRequest {
    pub quantity: u32,
    pub product_variant_id: VariantId,
    pub cart_id: CartId,
}

/// Body of `PATCH cart/items`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartItemBatchUpdateRequest {
    pub cart_item_list: Vec<CartItemUpdateRequest>,
}
