//! Product listing and search.

use anyhow::{bail, Result};
use storefront_sync::{LoadStatus, SearchStatus};

use super::ProductsArgs;
use crate::context::Context;

/// Run the products command.
pub async fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let mut catalog = ctx.catalog()?;

    match args.query.as_deref().map(str::trim) {
        Some(query) if !query.is_empty() => {
            catalog.enter_search_mode();
            catalog.set_search_input(query);
            if catalog.submit_search().await == SearchStatus::Failure {
                bail!("Search failed");
            }
        }
        _ => {
            if catalog.load().await == LoadStatus::Failure {
                bail!("Could not load products");
            }
        }
    }

    let products = catalog.visible_products();
    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    if products.is_empty() {
        ctx.output.info("No products found");
        return Ok(());
    }

    ctx.output.header("Products");
    ctx.output.table_row(&["ID", "NAME", "PRICE"], &[24, 32, 12]);
    for product in products {
        ctx.output.table_row(
            &[product.id.as_str(), &product.name, &ctx.price(product.price)],
            &[24, 32, 12],
        );
    }

    Ok(())
}
