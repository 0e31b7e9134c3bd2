//! Catalog mapper: wire records to catalog entities.
//!
//! Every function here is total. Missing optional data degrades to an empty
//! string or list.

use super::product::{
    OptionType, OptionValue, OptionValueImage, Product, ProductDetail, ProductImage,
    ProductOption, ProductVariant, VariantOption,
};
use super::wire::{
    OptionDto, OptionValueDto, OptionValueImageDto, ProductDetailDto, ProductDto,
    ProductImageDto, ProductOptionDto, ProductVariantDto, VariantOptionDto,
};

/// Map a list entry. The thumbnail is the first image in server order.
pub fn to_product(dto: ProductDto) -> Product {
    let image_url = dto
        .product_images
        .into_iter()
        .next()
        .map(|image| image.url)
        .unwrap_or_default();

    Product {
        id: dto.id,
        name: dto.name,
        price: dto.default_variant.price,
        image_url,
    }
}

/// Map a list response.
pub fn to_products(dtos: Vec<ProductDto>) -> Vec<Product> {
    dtos.into_iter().map(to_product).collect()
}

/// Map a product detail.
pub fn to_product_detail(dto: ProductDetailDto) -> ProductDetail {
    ProductDetail {
        id: dto.id,
        name: dto.name,
        description: dto.description.unwrap_or_default(),
        default_variant_id: dto.default_variant.id,
        variants: dto
            .product_variants
            .into_iter()
            .map(to_product_variant)
            .collect(),
        image_urls: gallery_order(dto.product_images)
            .into_iter()
            .map(|image| image.url)
            .collect(),
        product_options: dto
            .product_options
            .into_iter()
            .map(to_product_option)
            .collect(),
        option_value_images: dto
            .option_value_images
            .into_iter()
            .map(to_option_value_image)
            .collect(),
    }
}

/// Primary images first, then the rest; each group by position.
fn gallery_order(images: Vec<ProductImageDto>) -> Vec<ProductImageDto> {
    let (mut primary, mut rest): (Vec<_>, Vec<_>) =
        images.into_iter().partition(|image| image.is_primary);
    primary.sort_by_key(|image| image.position);
    rest.sort_by_key(|image| image.position);
    primary.extend(rest);
    primary
}

fn to_product_variant(dto: ProductVariantDto) -> ProductVariant {
    let mut images: Vec<ProductImage> = dto.variant_images.into_iter().map(to_image).collect();
    images.sort_by_key(|image| image.position);

    ProductVariant {
        id: dto.id,
        quantity: dto.quantity,
        price: dto.price,
        images,
        variant_options: dto
            .variant_options
            .into_iter()
            .map(to_variant_option)
            .collect(),
    }
}

fn to_image(dto: ProductImageDto) -> ProductImage {
    ProductImage {
        url: dto.url,
        position: dto.position,
        is_primary: dto.is_primary,
    }
}

fn to_variant_option(dto: VariantOptionDto) -> VariantOption {
    VariantOption {
        product_variant_id: dto.product_variant_id,
        option_value_id: dto.option_value_id,
        option_value: to_option_value(dto.option_value),
    }
}

fn to_option_value(dto: OptionValueDto) -> OptionValue {
    OptionValue {
        id: dto.id,
        name: dto.name,
        position: dto.position,
        option: to_option(dto.option),
    }
}

fn to_option(dto: OptionDto) -> OptionType {
    OptionType {
        id: dto.id,
        name: dto.name,
        public_label: dto.public_label,
    }
}

/// Shared with the cart mapper, which embeds the same record.
pub(crate) fn to_product_option(dto: ProductOptionDto) -> ProductOption {
    ProductOption {
        option_id: dto.option_id,
        position: dto.position,
    }
}

fn to_option_value_image(dto: OptionValueImageDto) -> OptionValueImage {
    OptionValueImage {
        product_id: dto.product_id,
        url: dto.url,
        option_value_id: dto.option_value_id,
    }
}
