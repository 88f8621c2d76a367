use std::str::FromStr;

use catalog_types::{ErrorResponse, Product, ProductDraft};
use tracing::info;

use crate::{Error, Result};

pub struct CatalogClient {
    url: String,
}

impl CatalogClient {
    pub fn new(url: impl AsRef<str>) -> Result<Self> {
        Self::from_str(url.as_ref())
    }

    pub async fn create_product(&self, draft: &ProductDraft) -> Result<Product> {
        let url = surf::Url::from_str(&format!("{}/v1/products", self.url))?;
        info!(target = "catalog-client", "URL is: {:?}", url);

        let mut response = surf::post(url).body_json(draft)?.await?;
        if response.status().is_success() {
            Ok(response.body_json::<Product>().await?)
        } else {
            let payload: ErrorResponse = response.body_json().await?;
            Err(Error::Api {
                status: u16::from(response.status()),
                message: payload.error,
            })
        }
    }

    pub async fn get_product(&self, name: &str) -> Result<Product> {
        let url = surf::Url::from_str(&format!("{}/v1/products/{}", self.url, name))?;
        info!(target = "catalog-client", "URL is: {:?}", url);

        let mut response = surf::get(url).await?;
        if response.status().is_success() {
            Ok(response.body_json::<Product>().await?)
        } else {
            let payload: ErrorResponse = response.body_json().await?;
            Err(Error::Api {
                status: u16::from(response.status()),
                message: payload.error,
            })
        }
    }
}

impl FromStr for CatalogClient {
    type Err = Error;

    fn from_str(str: &str) -> Result<Self> {
        Ok(Self {
            url: str.to_owned(),
        })
    }
}

impl<S> From<S> for CatalogClient
where
    S: Into<std::net::SocketAddr>,
{
    fn from(socket: S) -> Self {
        Self {
            url: format!("http://{}", socket.into()),
        }
    }
}
