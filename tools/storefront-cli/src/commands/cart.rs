//! Cart inspection and edits.

use anyhow::{bail, Result};
use serde::Serialize;
use storefront_commerce::cart::Cart;
use storefront_commerce::ids::VariantId;
use storefront_commerce::money::Money;
use storefront_sync::{CartEngine, LoadOutcome, RemoveOutcome};

use super::{CartArgs, CartCommand};
use crate::context::Context;
use crate::output::{stepper, stock_badge};

const WIDTHS: [usize; 6] = [3, 24, 20, 7, 12, 14];

#[derive(Serialize)]
struct CartReport<'a> {
    cart: Option<&'a Cart>,
    selected_subtotal: Money,
}

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    if !ctx.is_signed_in() {
        bail!("Sign in required: set session.access_token or STOREFRONT_ACCESS_TOKEN");
    }

    let engine = ctx.cart_engine()?;
    match engine.load().await {
        LoadOutcome::Loaded => {}
        LoadOutcome::SignedOut => bail!("Sign in required"),
        LoadOutcome::Failed | LoadOutcome::Superseded => bail!("Could not load cart"),
    }

    match args.command {
        CartCommand::Show { checked } => {
            check_lines(&engine, &checked, ctx);
            print_cart(&engine, ctx);
        }
        CartCommand::Set { variant, quantity } => {
            let variant = VariantId::new(variant);
            let Some(current) = engine.cart().and_then(|c| c.quantity_of(&variant)) else {
                bail!("{} is not in the cart", variant);
            };
            if !engine.update_quantity(&variant, quantity, current) {
                bail!("Quantity {} is not allowed for {}", quantity, variant);
            }
            engine.flush().await;
            // A failed batch rolls the line back.
            if engine.cart().and_then(|c| c.quantity_of(&variant)) != Some(quantity) {
                bail!("Could not update cart");
            }
            print_cart(&engine, ctx);
        }
        CartCommand::Remove { variant } => {
            let variant = VariantId::new(variant);
            match engine.remove_item(&variant).await {
                RemoveOutcome::Removed => print_cart(&engine, ctx),
                RemoveOutcome::Ignored => bail!("{} is not in the cart", variant),
                RemoveOutcome::Failed | RemoveOutcome::Superseded => {
                    bail!("Could not remove {}", variant)
                }
            }
        }
        CartCommand::Checkout { checked } => {
            check_lines(&engine, &checked, ctx);
            ctx.output.kv("subtotal", &ctx.price(engine.selected_subtotal()));
            engine.checkout();
        }
    }

    Ok(())
}

fn check_lines(engine: &CartEngine, checked: &[String], ctx: &Context) {
    for variant in checked {
        let variant = VariantId::new(variant.as_str());
        if !engine.toggle_selection(&variant, true) {
            ctx.output.warn(&format!("{} is not in the cart", variant));
        }
    }
}

fn print_cart(engine: &CartEngine, ctx: &Context) {
    let cart = engine.cart();

    if ctx.output.is_json() {
        ctx.output.json(&CartReport {
            cart: cart.as_ref(),
            selected_subtotal: engine.selected_subtotal(),
        });
        return;
    }

    let Some(cart) = cart.filter(|c| !c.is_empty()) else {
        ctx.output.info("Cart is empty");
        return;
    };

    ctx.output.header(&format!("Cart ({} items)", cart.item_count()));
    ctx.output.table_row(&["", "VARIANT", "OPTIONS", "QTY", "TOTAL", "STOCK"], &WIDTHS);
    for line in &cart.items {
        let item = &line.cart_item;
        let mark = if line.is_checked { "[x]" } else { "[ ]" };
        ctx.output.table_row(
            &[
                mark,
                item.product_variant_id.as_str(),
                &item.variant_label(),
                &stepper(item),
                &ctx.price(item.line_total()),
                &stock_badge(item.stock()),
            ],
            &WIDTHS,
        );
    }
    ctx.output.kv("subtotal", &ctx.price(engine.selected_subtotal()));
}
