//! Product detail view.

use storefront_commerce::catalog::{ProductDetail, ProductVariant, VariantSelector};
use storefront_commerce::error::CommerceError;
use storefront_commerce::ids::{OptionId, OptionValueId, ProductId};
use storefront_commerce::money::Money;
use storefront_data::CatalogApi;

use crate::engine::{AddOutcome, CartEngine};
use crate::error::ViewError;

/// Fetch a product and open it at its default variant.
pub async fn load_product(
    api: &dyn CatalogApi,
    id: &ProductId,
) -> Result<ProductDetailView, ViewError> {
    let product = api
        .get_product(id)
        .await?
        .ok_or_else(|| ViewError::ProductNotFound(id.clone()))?;
    ProductDetailView::open(product)
}

/// A loaded product, its variant selection and the quantity to add.
#[derive(Debug, Clone)]
pub struct ProductDetailView {
    selector: VariantSelector,
}

impl ProductDetailView {
    /// Open a product at its default variant.
    pub fn open(product: ProductDetail) -> Result<Self, ViewError> {
        let product_id = product.id.clone();
        let selector = VariantSelector::new(product).map_err(|e| {
            tracing::error!(%product_id, error = %e, "Product data is inconsistent");
            ViewError::Catalog(e)
        })?;
        Ok(Self { selector })
    }

    pub fn selector(&self) -> &VariantSelector {
        &self.selector
    }

    pub fn product(&self) -> &ProductDetail {
        self.selector.product()
    }

    pub fn active_variant(&self) -> &ProductVariant {
        self.selector.active_variant()
    }

    /// Pick a value on one axis.
    pub fn select(
        &mut self,
        axis_index: usize,
        option_id: &OptionId,
        value_id: &OptionValueId,
    ) -> Result<&ProductVariant, CommerceError> {
        let product_id = self.selector.product().id.clone();
        self.selector
            .select_option_value(axis_index, option_id, value_id)
            .inspect_err(|e| {
                if e.is_data_integrity() {
                    tracing::error!(
                        %product_id,
                        %option_id,
                        %value_id,
                        error = %e,
                        "Selection failed"
                    );
                }
            })
    }

    pub fn quantity(&self) -> u32 {
        self.selector.quantity()
    }

    pub fn increase_quantity(&mut self) -> u32 {
        self.selector.increase_quantity()
    }

    pub fn decrease_quantity(&mut self) -> u32 {
        self.selector.decrease_quantity()
    }

    pub fn set_quantity(&mut self, quantity: u32) -> Result<(), CommerceError> {
        self.selector.set_quantity(quantity)
    }

    /// Price of the quantity to add.
    pub fn current_price(&self) -> Money {
        self.selector.current_price()
    }

    /// Add the active variant at the chosen quantity.
    pub async fn add_to_cart(&self, cart: &CartEngine) -> AddOutcome {
        cart.add_selection(&self.selector).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use storefront_commerce::catalog::wire::ProductDetailDto;
    use storefront_commerce::catalog::{to_product_detail, Product};
    use storefront_data::FetchError;

    fn tee() -> ProductDetail {
        let value = |id: &str, name: &str, position: i32| {
            json!({
                "id": id,
                "name": name,
                "position": position,
                "option": {"id": "size", "name": "size", "publicLabel": "Size"}
            })
        };
        let variant = |id: &str, value_id: &str, name: &str, position: i32, stock: u32| {
            json!({
                "id": id,
                "quantity": stock,
                "price": "19.90",
                "variantImages": [],
                "variantOptions": [{
                    "productVariantId": id,
                    "optionValueId": value_id,
                    "optionValue": value(value_id, name, position)
                }]
            })
        };
        let dto: ProductDetailDto = serde_json::from_value(json!({
            "id": "p-tee",
            "name": "Tee",
            "defaultVariant": {"id": "pv-s"},
            "productVariants": [
                variant("pv-s", "s", "S", 0, 2),
                variant("pv-m", "m", "M", 1, 0)
            ],
            "productImages": [{"url": "tee.png", "position": 0, "isPrimary": true}],
            "productOptions": [{"optionId": "size", "position": 0}],
            "optionValueImages": [
                {"productId": "p-tee", "url": "s.png", "optionValueId": "s"},
                {"productId": "p-tee", "url": "m.png", "optionValueId": "m"}
            ]
        }))
        .unwrap();
        to_product_detail(dto)
    }

    struct FakeCatalog(Option<ProductDetail>);

    #[async_trait]
    impl CatalogApi for FakeCatalog {
        async fn list_products(&self, _query: Option<&str>) -> Result<Vec<Product>, FetchError> {
            Ok(vec![])
        }

        async fn get_product(&self, _id: &ProductId) -> Result<Option<ProductDetail>, FetchError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_load_product_opens_default_variant() {
        let view = load_product(&FakeCatalog(Some(tee())), &ProductId::new("p-tee"))
            .await
            .unwrap();

        assert_eq!(view.active_variant().id.as_str(), "pv-s");
        assert_eq!(view.selector().main_image_url(), "s.png");
        assert_eq!(view.quantity(), 1);
    }

    #[tokio::test]
    async fn test_missing_product() {
        let err = load_product(&FakeCatalog(None), &ProductId::new("p-404"))
            .await
            .unwrap_err();
        assert!(matches!(err, ViewError::ProductNotFound(_)));
        assert_eq!(err.user_message(), "No matching product.");
    }

    #[test]
    fn test_inconsistent_product_is_rejected() {
        let mut product = tee();
        product.product_options.clear();
        let err = ProductDetailView::open(product).unwrap_err();
        assert!(matches!(
            err,
            ViewError::Catalog(CommerceError::MissingOptionPosition(_))
        ));
    }

    #[test]
    fn test_quantity_stepper_is_bounded_by_stock() {
        let mut view = ProductDetailView::open(tee()).unwrap();
        assert_eq!(view.increase_quantity(), 2);
        assert_eq!(view.increase_quantity(), 2);
        assert_eq!(view.current_price().to_string(), "39.80");

        assert_eq!(view.decrease_quantity(), 1);
        assert_eq!(view.decrease_quantity(), 1);
        assert!(view.set_quantity(3).is_err());
    }

    #[test]
    fn test_select_resets_quantity() {
        let mut view = ProductDetailView::open(tee()).unwrap();
        view.increase_quantity();

        let variant = view
            .select(0, &OptionId::new("size"), &OptionValueId::new("m"))
            .unwrap();
        assert_eq!(variant.id.as_str(), "pv-m");
        assert_eq!(view.quantity(), 1);
        assert_eq!(view.selector().main_image_url(), "m.png");

        assert!(view
            .select(0, &OptionId::new("size"), &OptionValueId::new("xl"))
            .is_err());
    }
}
