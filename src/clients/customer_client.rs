use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::customer_actor::CustomerError;
use crate::domain::{Customer, CustomerCreate};

/// Client for the customer directory.
#[derive(Clone)]
pub struct CustomerClient {
    inner: ResourceClient<Customer>,
}

crate::impl_basic_client!(CustomerClient, Customer, CustomerError, customer);

impl CustomerClient {
    #[instrument(skip(self, customer), fields(customer_name = %customer.name))]
    pub async fn create_customer(&self, customer: Customer) -> Result<Customer, CustomerError> {
        debug!("Sending request");
        let payload = CustomerCreate {
            name: customer.name,
            phone: customer.phone,
        };
        self.inner.create(payload).await.map_err(CustomerError::from)
    }
}
