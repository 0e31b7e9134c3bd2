//! Product detail and variant selection.

use anyhow::{anyhow, bail, Context as _, Result};
use console::style;
use serde::Serialize;
use storefront_commerce::catalog::{ProductVariant, PvOption};
use storefront_commerce::ids::{OptionId, OptionValueId, ProductId};
use storefront_commerce::money::Money;
use storefront_sync::{load_product, AddOutcome, ProductDetailView, ViewError};

use super::ProductArgs;
use crate::context::Context;
use crate::output::stock_badge;

#[derive(Serialize)]
struct ProductReport<'a> {
    id: &'a ProductId,
    name: &'a str,
    description: &'a str,
    options: &'a [PvOption],
    variant: &'a ProductVariant,
    main_image_url: &'a str,
    quantity: u32,
    total: Money,
}

/// Run the product command.
pub async fn run(args: ProductArgs, ctx: &Context) -> Result<()> {
    let api = ctx.catalog_api()?;
    let id = ProductId::new(args.id.trim());

    let mut view = match load_product(&api, &id).await {
        Ok(view) => view,
        Err(ViewError::ProductNotFound(id)) => bail!("No matching product: {}", id),
        Err(e) => return Err(e).context("Failed to load product"),
    };

    for selection in &args.select {
        let (axis, option_id, value_id) = resolve_selection(view.selector().options(), selection)?;
        view.select(axis, &option_id, &value_id)
            .with_context(|| format!("Cannot select {}", selection))?;
    }
    if args.quantity != 1 {
        view.set_quantity(args.quantity)
            .with_context(|| format!("Only {} in stock", view.active_variant().quantity))?;
    }

    print_product(&view, ctx);

    if args.add {
        add_to_cart(&view, ctx).await?;
    }
    Ok(())
}

/// Turn `option=value` into axis index, option id and value id. Options and
/// values match by id, name or label, ignoring case.
fn resolve_selection(
    options: &[PvOption],
    selection: &str,
) -> Result<(usize, OptionId, OptionValueId)> {
    let (option, value) = selection
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected OPTION=VALUE, got '{}'", selection))?;
    let (option, value) = (option.trim(), value.trim());

    let (axis, pv_option) = options
        .iter()
        .enumerate()
        .find(|(_, o)| {
            o.id.as_str().eq_ignore_ascii_case(option)
                || o.name.eq_ignore_ascii_case(option)
                || o.public_label.eq_ignore_ascii_case(option)
        })
        .ok_or_else(|| anyhow!("Unknown option '{}'", option))?;

    let pv_value = pv_option
        .values
        .iter()
        .find(|v| v.id.as_str().eq_ignore_ascii_case(value) || v.name.eq_ignore_ascii_case(value))
        .ok_or_else(|| anyhow!("Unknown value '{}' for {}", value, pv_option.public_label))?;

    Ok((axis, pv_option.id.clone(), pv_value.id.clone()))
}

fn print_product(view: &ProductDetailView, ctx: &Context) {
    let product = view.product();
    let variant = view.active_variant();

    if ctx.output.is_json() {
        ctx.output.json(&ProductReport {
            id: &product.id,
            name: &product.name,
            description: &product.description,
            options: view.selector().options(),
            variant,
            main_image_url: view.selector().main_image_url(),
            quantity: view.quantity(),
            total: view.current_price(),
        });
        return;
    }

    ctx.output.header(&product.name);
    if !product.description.is_empty() {
        println!("  {}", product.description);
    }

    for option in view.selector().options() {
        let values: Vec<String> = option
            .values
            .iter()
            .map(|v| {
                if v.is_selected {
                    style(format!("[{}]", v.name)).bold().to_string()
                } else if v.is_within_selection {
                    v.name.clone()
                } else {
                    style(&v.name).dim().strikethrough().to_string()
                }
            })
            .collect();
        ctx.output.kv(&option.public_label, &values.join("  "));
    }

    ctx.output.kv("variant", variant.id.as_str());
    ctx.output.kv("price", &ctx.price(variant.price));
    ctx.output.kv("stock", &stock_badge(variant.quantity));
    ctx.output.kv("quantity", &view.quantity().to_string());
    ctx.output.kv("total", &ctx.price(view.current_price()));
    if !view.selector().main_image_url().is_empty() {
        ctx.output.kv("image", view.selector().main_image_url());
    }
}

async fn add_to_cart(view: &ProductDetailView, ctx: &Context) -> Result<()> {
    if !ctx.is_signed_in() {
        bail!("Sign in required: set session.access_token or STOREFRONT_ACCESS_TOKEN");
    }

    let engine = ctx.cart_engine()?;
    engine.load().await;
    match view.add_to_cart(&engine).await {
        AddOutcome::Added | AddOutcome::Ignored => Ok(()),
        AddOutcome::MaxQuantityExceeded { stock } => {
            bail!("Cart already holds the maximum quantity ({})", stock)
        }
        AddOutcome::SignInRequired => bail!("Sign in required"),
        AddOutcome::Failed | AddOutcome::Superseded => bail!("Could not add to cart"),
    }
}
