//! Cart and cart item types.

use std::collections::HashMap;

use crate::catalog::ProductOption;
use crate::ids::{CartId, OptionId, OptionValueId, ProductId, VariantId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A shopper's cart as last reported by the server, plus local selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Unique cart identifier.
    pub id: CartId,
    /// Cart lines in server order.
    pub items: Vec<CartItemAndSelection>,
}

impl Cart {
    /// Find the line for a variant.
    pub fn find_item(&self, variant_id: &VariantId) -> Option<&CartItemAndSelection> {
        self.items
            .iter()
            .find(|item| &item.cart_item.product_variant_id == variant_id)
    }

    fn find_item_mut(&mut self, variant_id: &VariantId) -> Option<&mut CartItemAndSelection> {
        self.items
            .iter_mut()
            .find(|item| &item.cart_item.product_variant_id == variant_id)
    }

    /// Quantity of a variant in the cart, if present.
    pub fn quantity_of(&self, variant_id: &VariantId) -> Option<u32> {
        self.find_item(variant_id).map(|item| item.cart_item.quantity)
    }

    /// Number of cart lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of price x quantity over checked lines.
    pub fn selected_subtotal(&self) -> Money {
        self.items
            .iter()
            .filter(|item| item.is_checked)
            .map(|item| item.cart_item.line_total())
            .sum()
    }

    /// Set one line's quantity. Returns false if the variant is not in the cart.
    pub fn set_quantity(&mut self, variant_id: &VariantId, quantity: u32) -> bool {
        match self.find_item_mut(variant_id) {
            Some(item) => {
                item.cart_item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Reset every line named in `quantities`; other lines are untouched.
    pub fn restore_quantities(&mut self, quantities: &HashMap<VariantId, u32>) {
        for item in self.items.iter_mut() {
            if let Some(quantity) = quantities.get(&item.cart_item.product_variant_id) {
                item.cart_item.quantity = *quantity;
            }
        }
    }

    /// Check or uncheck one line. Returns false if the variant is not in the cart.
    pub fn set_checked(&mut self, variant_id: &VariantId, is_checked: bool) -> bool {
        match self.find_item_mut(variant_id) {
            Some(item) => {
                item.is_checked = is_checked;
                true
            }
            None => false,
        }
    }
}

/// A cart line and whether it is checked for the subtotal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItemAndSelection {
    pub cart_item: CartItem,
    /// Always false when loaded from the server.
    pub is_checked: bool,
}

/// A cart line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Owning cart.
    pub cart_id: CartId,
    /// Units in the cart.
    pub quantity: u32,
    /// Variant in the line.
    pub product_variant_id: VariantId,
    /// Denormalized variant data.
    pub product_variant: CartProductVariant,
}

impl CartItem {
    /// Units in stock for this line's variant.
    pub fn stock(&self) -> u32 {
        self.product_variant.quantity
    }

    /// Price x quantity.
    pub fn line_total(&self) -> Money {
        self.product_variant.price.times(self.quantity)
    }

    /// Whether the quantity stepper may decrease.
    pub fn can_decrease(&self) -> bool {
        self.quantity > 1
    }

    /// Whether the quantity stepper may increase.
    pub fn can_increase(&self) -> bool {
        self.quantity < self.stock()
    }

    /// Option value names in axis display order (e.g., "White / M").
    pub fn variant_label(&self) -> String {
        let positions: HashMap<&OptionId, i32> = self
            .product_variant
            .product
            .product_options
            .iter()
            .map(|po| (&po.option_id, po.position))
            .collect();

        let mut options: Vec<&CartVariantOption> =
            self.product_variant.variant_options.iter().collect();
        options.sort_by_key(|vo| positions.get(&vo.option_id).copied().unwrap_or(i32::MAX));

        options
            .iter()
            .map(|vo| vo.name.as_str())
            .collect::<Vec<_>>()
            .join(" / ")
    }

    /// Swatch for the line: the image bound to the first axis value.
    pub fn image_url(&self) -> Option<&str> {
        let product = &self.product_variant.product;
        let first_axis = product
            .product_options
            .iter()
            .min_by_key(|po| po.position)?;
        let value = self
            .product_variant
            .variant_options
            .iter()
            .find(|vo| vo.option_id == first_axis.option_id)?;
        product
            .option_value_images
            .iter()
            .find(|img| img.option_value_id == value.option_value_id)
            .map(|img| img.url.as_str())
    }
}

/// Variant data embedded in a cart line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartProductVariant {
    /// Units in stock.
    pub quantity: u32,
    /// Unit price.
    pub price: Money,
    pub product: CartProduct,
    pub variant_options: Vec<CartVariantOption>,
}

/// Product data embedded in a cart line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartProduct {
    pub id: ProductId,
    pub name: String,
    pub product_options: Vec<ProductOption>,
    pub option_value_images: Vec<CartOptionValueImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartOptionValueImage {
    pub url: String,
    pub option_value_id: OptionValueId,
    pub option_id: OptionId,
}

/// An option value a cart line's variant carries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartVariantOption {
    pub option_value_id: OptionValueId,
    pub option_id: OptionId,
    /// Display name (e.g., "White").
    pub name: String,
}

/// A pending quantity write for one cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemUpdate {
    pub product_variant_id: VariantId,
    /// Target quantity.
    pub new_quantity: u32,
    /// Quantity shown before this write.
    pub previous_quantity: u32,
    pub cart_id: CartId,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn item(variant: &str, quantity: u32, stock: u32, cents: i64) -> CartItemAndSelection {
        CartItemAndSelection {
            cart_item: CartItem {
                cart_id: CartId::new("cart-1"),
                quantity,
                product_variant_id: VariantId::new(variant),
                product_variant: CartProductVariant {
                    quantity: stock,
                    price: Money::from_cents(cents),
                    product: CartProduct {
                        id: ProductId::new("p-1"),
                        name: "Linen Shirt".to_string(),
                        product_options: vec![
                            ProductOption {
                                option_id: OptionId::new("size"),
                                position: 1,
                            },
                            ProductOption {
                                option_id: OptionId::new("color"),
                                position: 0,
                            },
                        ],
                        option_value_images: vec![CartOptionValueImage {
                            url: "white.png".to_string(),
                            option_value_id: OptionValueId::new("white"),
                            option_id: OptionId::new("color"),
                        }],
                    },
                    variant_options: vec![
                        CartVariantOption {
                            option_value_id: OptionValueId::new("m"),
                            option_id: OptionId::new("size"),
                            name: "M".to_string(),
                        },
                        CartVariantOption {
                            option_value_id: OptionValueId::new("white"),
                            option_id: OptionId::new("color"),
                            name: "White".to_string(),
                        },
                    ],
                },
            },
            is_checked: false,
        }
    }

    pub fn cart(items: Vec<CartItemAndSelection>) -> Cart {
        Cart {
            id: CartId::new("cart-1"),
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{cart, item};
    use super::*;

    #[test]
    fn test_selected_subtotal_counts_checked_only() {
        let mut cart = cart(vec![item("a", 2, 5, 1050), item("b", 1, 5, 999)]);
        assert_eq!(cart.selected_subtotal(), Money::ZERO);

        assert!(cart.set_checked(&VariantId::new("a"), true));
        assert_eq!(cart.selected_subtotal(), Money::from_cents(2100));

        cart.set_checked(&VariantId::new("b"), true);
        assert_eq!(cart.selected_subtotal(), Money::from_cents(3099));
        assert!(!cart.set_checked(&VariantId::new("zzz"), true));
    }

    #[test]
    fn test_set_and_restore_quantities() {
        let mut cart = cart(vec![item("a", 2, 5, 100), item("b", 1, 5, 100)]);
        assert!(cart.set_quantity(&VariantId::new("a"), 4));
        assert!(cart.set_quantity(&VariantId::new("b"), 3));

        let mut previous = HashMap::new();
        previous.insert(VariantId::new("a"), 2);
        cart.restore_quantities(&previous);

        assert_eq!(cart.quantity_of(&VariantId::new("a")), Some(2));
        assert_eq!(cart.quantity_of(&VariantId::new("b")), Some(3));
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_variant_label_follows_axis_order() {
        let line = item("a", 1, 5, 100);
        assert_eq!(line.cart_item.variant_label(), "White / M");
        assert_eq!(line.cart_item.image_url(), Some("white.png"));
    }

    #[test]
    fn test_stepper_bounds() {
        let line = item("a", 1, 2, 100).cart_item;
        assert!(!line.can_decrease());
        assert!(line.can_increase());

        let full = item("a", 2, 2, 100).cart_item;
        assert!(full.can_decrease());
        assert!(!full.can_increase());
    }
}
