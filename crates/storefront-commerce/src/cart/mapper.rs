//! Cart mapper: wire records to cart entities, and pending writes to request
//! bodies.

use super::cart::{
    Cart, CartItem, CartItemAndSelection, CartItemUpdate, CartOptionValueImage, CartProduct,
    CartProductVariant, CartVariantOption,
};
use super::wire::{
    CartDto, CartItemDto, CartItemUpdateRequest, CartOptionValueImageDto, CartProductDto,
    CartProductVariantDto, CartVariantOptionDto,
};
use crate::catalog::to_product_option;

/// Map a cart. Every line starts unchecked.
pub fn to_cart(dto: CartDto) -> Cart {
    Cart {
        id: dto.id,
        items: dto
            .cart_items
            .into_iter()
            .map(to_cart_item_and_selection)
            .collect(),
    }
}

fn to_cart_item_and_selection(dto: CartItemDto) -> CartItemAndSelection {
    CartItemAndSelection {
        cart_item: CartItem {
            cart_id: dto.cart_id,
            quantity: dto.quantity,
            product_variant_id: dto.product_variant_id,
            product_variant: to_cart_product_variant(dto.product_variant),
        },
        is_checked: false,
    }
}

fn to_cart_product_variant(dto: CartProductVariantDto) -> CartProductVariant {
    CartProductVariant {
        quantity: dto.quantity,
        price: dto.price,
        product: to_cart_product(dto.product),
        variant_options: dto
            .variant_options
            .into_iter()
            .map(to_cart_variant_option)
            .collect(),
    }
}

fn to_cart_product(dto: CartProductDto) -> CartProduct {
    CartProduct {
        id: dto.id,
        name: dto.name,
        product_options: dto
            .product_options
            .into_iter()
            .map(to_product_option)
            .collect(),
        option_value_images: dto
            .option_value_images
            .into_iter()
            .map(to_cart_option_value_image)
            .collect(),
    }
}

fn to_cart_option_value_image(dto: CartOptionValueImageDto) -> CartOptionValueImage {
    CartOptionValueImage {
        url: dto.url,
        option_value_id: dto.option_value_id,
        option_id: dto.option_value.option.id,
    }
}

fn to_cart_variant_option(dto: CartVariantOptionDto) -> CartVariantOption {
    CartVariantOption {
        option_value_id: dto.option_value_id,
        option_id: dto.option_value.option.id,
        name: dto.option_value.name,
    }
}

/// Batch entry for a pending write; the target quantity is sent.
pub fn to_cart_item_update_request(update: &CartItemUpdate) -> CartItemUpdateRequest {
    CartItemUpdateRequest {
        quantity: update.new_quantity,
        product_variant_id: update.product_variant_id.clone(),
        cart_id: update.cart_id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{CartId, OptionId, VariantId};
    use crate::money::Money;

    const CART_JSON: &str = r#"{
        "id": "cart-1",
        "cartItems": [
            {
                "quantity": 3,
                "cartId": "cart-1",
                "productVariantId": "pv-wm",
                "productVariant": {
                    "quantity": 5,
                    "price": "49.90",
                    "product": {
                        "id": "p-1",
                        "name": "Linen Shirt",
                        "productOptions": [
                            {"optionId": "color", "position": 0},
                            {"optionId": "size", "position": 1}
                        ],
                        "optionValueImages": [
                            {"url": "white.png", "optionValueId": "white", "optionValue": {"option": {"id": "color"}}}
                        ]
                    },
                    "variantOptions": [
                        {"optionValueId": "white", "optionValue": {"name": "White", "option": {"id": "color"}}},
                        {"optionValueId": "m", "optionValue": {"name": "M", "option": {"id": "size"}}}
                    ]
                }
            }
        ]
    }"#;

    #[test]
    fn test_to_cart_preserves_fields() {
        let dto: CartDto = serde_json::from_str(CART_JSON).unwrap();
        let cart = to_cart(dto);

        assert_eq!(cart.id, CartId::new("cart-1"));
        let line = &cart.items[0];
        assert!(!line.is_checked);
        assert_eq!(line.cart_item.quantity, 3);
        assert_eq!(line.cart_item.product_variant_id, VariantId::new("pv-wm"));
        assert_eq!(line.cart_item.stock(), 5);
        assert_eq!(line.cart_item.product_variant.price, Money::from_cents(4990));
        assert_eq!(line.cart_item.variant_label(), "White / M");
        assert_eq!(
            line.cart_item.product_variant.product.option_value_images[0].option_id,
            OptionId::new("color")
        );
    }

    #[test]
    fn test_mapped_names_survive_reserialization() {
        let dto: CartDto = serde_json::from_str(CART_JSON).unwrap();
        let cart = to_cart(dto.clone());

        let json = serde_json::to_value(&cart).unwrap();
        let names: Vec<&str> = json["items"][0]["cart_item"]["product_variant"]["variant_options"]
            .as_array()
            .unwrap()
            .iter()
            .map(|vo| vo["name"].as_str().unwrap())
            .collect();
        let wire_names: Vec<&str> = dto.cart_items[0]
            .product_variant
            .variant_options
            .iter()
            .map(|vo| vo.option_value.name.as_str())
            .collect();

        assert_eq!(names, wire_names);
        assert_eq!(json["id"], "cart-1");
        assert_eq!(json["items"][0]["cart_item"]["quantity"], 3);
    }

    #[test]
    fn test_empty_cart() {
        let dto: CartDto = serde_json::from_str(r#"{"id":"cart-1","cartItems":[]}"#).unwrap();
        assert!(to_cart(dto).is_empty());
    }

    #[test]
    fn test_update_request_sends_target_quantity() {
        let update = CartItemUpdate {
            product_variant_id: VariantId::new("pv-1"),
            new_quantity: 5,
            previous_quantity: 3,
            cart_id: CartId::new("cart-1"),
        };

        let request = to_cart_item_update_request(&update);
        assert_eq!(request.quantity, 5);
        assert_eq!(request.product_variant_id, VariantId::new("pv-1"));
    }
}
