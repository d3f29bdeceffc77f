use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{Product, ProductCreate};
use crate::product_actor::ProductError;

/// Client for the product catalog. `get_product` is the lookup used when a line
/// item is added or edited.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

crate::impl_basic_client!(ProductClient, Product, ProductError, product);

impl ProductClient {
    #[instrument(skip(self, product), fields(product_name = %product.name))]
    pub async fn create_product(&self, product: Product) -> Result<Product, ProductError> {
        debug!("Sending request");
        let payload = ProductCreate {
            name: product.name,
            rate: product.rate,
            units: product.units,
        };
        self.inner.create(payload).await.map_err(ProductError::from)
    }
}
