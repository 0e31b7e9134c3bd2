//! Variant selection engine.
//!
//! A product's variants form a grid over its option axes (e.g. Color x Size).
//! The selector presents that grid as a list of [`PvOption`]s, tracks which
//! value is selected on each axis, and resolves the selection to a concrete
//! [`ProductVariant`].
//!
//! Axis 0 is the master axis: choosing a value there snaps every axis to the
//! first variant carrying that value and recomputes which values on the other
//! axes are reachable. Choosing a value on any other axis only changes that
//! axis and then looks for the variant matching the full selection.
//!
//! The top-down filtering only holds for up to [`MAX_OPTION_AXES`] axes;
//! products with more are rejected rather than resolved incorrectly.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut selector = VariantSelector::new(product)?;
//! selector.select_option_value(0, &color_id, &black_id)?;
//! selector.increase_quantity();
//! println!("{}", selector.current_price());
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::product::{ProductDetail, ProductVariant};
use crate::error::CommerceError;
use crate::ids::{OptionId, OptionValueId, VariantId};
use crate::money::Money;

/// Largest number of option axes the selector can resolve.
pub const MAX_OPTION_AXES: usize = 2;

/// One option axis as presented to the shopper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PvOption {
    /// Option identifier.
    pub id: OptionId,
    /// Internal option name.
    pub name: String,
    /// Label shown to shoppers.
    pub public_label: String,
    /// Values ordered by their position.
    pub values: Vec<PvOptionValue>,
}

impl PvOption {
    /// The selected value on this axis.
    pub fn selected(&self) -> Option<&PvOptionValue> {
        self.values.iter().find(|v| v.is_selected)
    }

    fn selected_index(&self) -> Option<usize> {
        self.values.iter().position(|v| v.is_selected)
    }

    /// Index of the value a variant carries on this axis.
    ///
    /// Values are deduplicated by name, so a variant may reference a sibling
    /// id that was folded into an earlier entry; fall back to the name.
    fn index_for(&self, variant: &ProductVariant) -> Option<usize> {
        let vo = variant
            .variant_options
            .iter()
            .find(|vo| vo.option_value.option.id == self.id)?;
        self.values
            .iter()
            .position(|v| v.id == vo.option_value_id)
            .or_else(|| {
                self.values
                    .iter()
                    .position(|v| v.name == vo.option_value.name)
            })
    }
}

/// One value on an option axis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PvOptionValue {
    /// Option value identifier.
    pub id: OptionValueId,
    /// Display name.
    pub name: String,
    /// Sort position.
    pub position: i32,
    /// Swatch image. Only axis 0 values carry one.
    pub image_url: String,
    /// Whether this value is part of the active variant.
    pub is_selected: bool,
    /// Whether this value is reachable from the axis 0 selection.
    pub is_within_selection: bool,
}

/// Quantity, stock ceiling and variant for an add-to-cart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAdd {
    pub quantity: u32,
    pub stock: u32,
    pub product_variant_id: VariantId,
}

/// Price of `quantity` units of a variant, at full precision.
pub fn current_price(variant: &ProductVariant, quantity: u32) -> Money {
    variant.price.times(quantity)
}

/// Selection state for one loaded product.
#[derive(Debug, Clone)]
pub struct VariantSelector {
    product: ProductDetail,
    options: Vec<PvOption>,
    active: usize,
    main_image_url: String,
    quantity: u32,
}

impl VariantSelector {
    /// Start from the product's default variant.
    pub fn new(product: ProductDetail) -> Result<Self, CommerceError> {
        let default_variant_id = product.default_variant_id.clone();
        Self::initialize(product, &default_variant_id)
    }

    /// Start from a specific variant.
    pub fn initialize(
        product: ProductDetail,
        variant_id: &VariantId,
    ) -> Result<Self, CommerceError> {
        let active = product
            .variants
            .iter()
            .position(|v| &v.id == variant_id)
            .ok_or_else(|| CommerceError::DefaultVariantMissing(variant_id.to_string()))?;

        let mut options = build_option_list(&product)?;
        mark_selected(&mut options, &product.variants[active])?;
        attach_option_images(&mut options, &product)?;
        mark_within_selection(&mut options, &product);

        let main_image_url = main_image(&options, &product);

        tracing::debug!(
            product_id = %product.id,
            variant_id = %variant_id,
            axes = options.len(),
            "Initialized variant selection"
        );

        Ok(Self {
            product,
            options,
            active,
            main_image_url,
            quantity: 1,
        })
    }

    /// Handle a tap on an option value.
    ///
    /// On success the active variant changes and the pending quantity resets
    /// to 1. On error nothing changes.
    pub fn select_option_value(
        &mut self,
        axis_index: usize,
        option_id: &OptionId,
        value_id: &OptionValueId,
    ) -> Result<&ProductVariant, CommerceError> {
        let axis = self
            .options
            .get(axis_index)
            .filter(|option| &option.id == option_id)
            .ok_or_else(|| CommerceError::UnknownOptionAxis(option_id.to_string()))?;
        let value_index = axis
            .values
            .iter()
            .position(|v| &v.id == value_id)
            .ok_or_else(|| CommerceError::UnknownOptionValue(value_id.to_string()))?;

        let mut options = self.options.clone();
        let active = if axis_index == 0 {
            let axis = &options[0];
            let representative = self
                .product
                .variants
                .iter()
                .position(|v| axis.index_for(v) == Some(value_index))
                .ok_or_else(|| CommerceError::NoVariantForValue(value_id.to_string()))?;

            mark_selected(&mut options, &self.product.variants[representative])?;
            mark_within_selection(&mut options, &self.product);
            representative
        } else {
            for (i, value) in options[axis_index].values.iter_mut().enumerate() {
                value.is_selected = i == value_index;
            }
            resolve_variant(&options, &self.product)?
        };

        self.options = options;
        self.active = active;
        self.main_image_url = main_image(&self.options, &self.product);
        self.quantity = 1;

        let variant = &self.product.variants[self.active];
        tracing::debug!(
            product_id = %self.product.id,
            variant_id = %variant.id,
            axis = axis_index,
            "Selected option value"
        );
        Ok(variant)
    }

    /// The loaded product.
    pub fn product(&self) -> &ProductDetail {
        &self.product
    }

    /// Option axes in display order.
    pub fn options(&self) -> &[PvOption] {
        &self.options
    }

    /// The variant matching the current selection.
    pub fn active_variant(&self) -> &ProductVariant {
        &self.product.variants[self.active]
    }

    /// Image for the active variant's axis 0 value.
    pub fn main_image_url(&self) -> &str {
        &self.main_image_url
    }

    /// Units to add to the cart.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Increase the pending quantity unless it already equals stock.
    pub fn increase_quantity(&mut self) -> u32 {
        if self.quantity < self.active_variant().quantity {
            self.quantity += 1;
        }
        self.quantity
    }

    /// Decrease the pending quantity, never below 1.
    pub fn decrease_quantity(&mut self) -> u32 {
        if self.quantity > 1 {
            self.quantity -= 1;
        }
        self.quantity
    }

    /// Set the pending quantity directly (1..=stock).
    pub fn set_quantity(&mut self, quantity: u32) -> Result<(), CommerceError> {
        if quantity == 0 || quantity > self.active_variant().quantity {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        self.quantity = quantity;
        Ok(())
    }

    /// Price of the pending quantity of the active variant.
    pub fn current_price(&self) -> Money {
        current_price(self.active_variant(), self.quantity)
    }

    /// What an add-to-cart tap should send.
    pub fn pending_add(&self) -> PendingAdd {
        let variant = self.active_variant();
        PendingAdd {
            quantity: self.quantity,
            stock: variant.quantity,
            product_variant_id: variant.id.clone(),
        }
    }
}

/// Group variant option values by axis, deduplicated by name, and order
/// axes and values by their configured positions.
fn build_option_list(product: &ProductDetail) -> Result<Vec<PvOption>, CommerceError> {
    let mut options: Vec<PvOption> = Vec::new();

    for vo in product.variants.iter().flat_map(|v| v.variant_options.iter()) {
        let value = &vo.option_value;
        let idx = match options.iter().position(|o| o.id == value.option.id) {
            Some(idx) => idx,
            None => {
                options.push(PvOption {
                    id: value.option.id.clone(),
                    name: value.option.name.clone(),
                    public_label: value.option.public_label.clone(),
                    values: Vec::new(),
                });
                options.len() - 1
            }
        };

        let values = &mut options[idx].values;
        if !values.iter().any(|v| v.name == value.name) {
            values.push(PvOptionValue {
                id: value.id.clone(),
                name: value.name.clone(),
                position: value.position,
                image_url: String::new(),
                is_selected: false,
                is_within_selection: false,
            });
        }
    }

    if options.len() > MAX_OPTION_AXES {
        return Err(CommerceError::UnsupportedOptionAxes {
            found: options.len(),
            supported: MAX_OPTION_AXES,
        });
    }

    let positions: HashMap<&OptionId, i32> = product
        .product_options
        .iter()
        .map(|po| (&po.option_id, po.position))
        .collect();

    let mut keyed = Vec::with_capacity(options.len());
    for mut option in options {
        let position = *positions
            .get(&option.id)
            .ok_or_else(|| CommerceError::MissingOptionPosition(option.id.to_string()))?;
        option.values.sort_by_key(|v| v.position);
        keyed.push((position, option));
    }
    keyed.sort_by_key(|(position, _)| *position);

    Ok(keyed.into_iter().map(|(_, option)| option).collect())
}

/// Select, on every axis, the value the variant carries.
fn mark_selected(options: &mut [PvOption], variant: &ProductVariant) -> Result<(), CommerceError> {
    for option in options.iter_mut() {
        let selected = option.index_for(variant);
        for (i, value) in option.values.iter_mut().enumerate() {
            value.is_selected = Some(i) == selected;
        }
        if selected.is_none() {
            return Err(CommerceError::IncompleteSelection(option.id.to_string()));
        }
    }
    Ok(())
}

fn attach_option_images(
    options: &mut [PvOption],
    product: &ProductDetail,
) -> Result<(), CommerceError> {
    let Some(first) = options.first_mut() else {
        return Ok(());
    };

    for value in first.values.iter_mut() {
        let image = product
            .option_value_images
            .iter()
            .find(|img| img.option_value_id == value.id && img.product_id == product.id)
            .ok_or_else(|| CommerceError::MissingOptionValueImage(value.id.to_string()))?;
        value.image_url = image.url.clone();
    }
    Ok(())
}

/// Recompute reachability from the axis 0 selection.
fn mark_within_selection(options: &mut [PvOption], product: &ProductDetail) {
    let Some((first, rest)) = options.split_first_mut() else {
        return;
    };

    for value in first.values.iter_mut() {
        value.is_within_selection = true;
    }

    let selected = first.selected_index();
    let reachable: Vec<&ProductVariant> = product
        .variants
        .iter()
        .filter(|v| selected.is_some() && first.index_for(v) == selected)
        .collect();

    for option in rest.iter_mut() {
        let indices: Vec<usize> = reachable.iter().filter_map(|v| option.index_for(v)).collect();
        for (i, value) in option.values.iter_mut().enumerate() {
            value.is_within_selection = indices.contains(&i);
        }
    }
}

/// Find the variant whose option values are exactly the current selection.
fn resolve_variant(options: &[PvOption], product: &ProductDetail) -> Result<usize, CommerceError> {
    let selected: Vec<Option<usize>> = options.iter().map(PvOption::selected_index).collect();

    product
        .variants
        .iter()
        .position(|variant| {
            variant.variant_options.len() == options.len()
                && options
                    .iter()
                    .zip(&selected)
                    .all(|(option, sel)| sel.is_some() && option.index_for(variant) == *sel)
        })
        .ok_or_else(|| {
            let ids: Vec<&str> = options
                .iter()
                .filter_map(|o| o.selected().map(|v| v.id.as_str()))
                .collect();
            CommerceError::NoMatchingVariant(ids.join(", "))
        })
}

fn main_image(options: &[PvOption], product: &ProductDetail) -> String {
    match options.first() {
        Some(first) => first
            .selected()
            .map(|v| v.image_url.clone())
            .unwrap_or_default(),
        None => product.image_urls.first().cloned().unwrap_or_default(),
    }
}
