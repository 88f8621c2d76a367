use std::{net::SocketAddr, path::PathBuf};

use catalog_storage::CatalogDatabase;
use catalog_types::CatalogError;
use futures::future::select_all;
use tokio::task::JoinHandle;
use tracing::error;

use crate::{
    api_server::{router, start_api_server, start_tls_server},
    Error,
};

pub struct CatalogService {
    pub api_address: SocketAddr,
    pub tls_address: SocketAddr,
    tasks: Vec<JoinHandle<Result<(), CatalogError>>>,
}

impl CatalogService {
    pub async fn new(
        api_listener: SocketAddr,
        tls_listener: SocketAddr,
        cert_path: PathBuf,
        key_path: PathBuf,
        db: CatalogDatabase,
    ) -> Result<Self, Error> {
        // Both listeners serve the same routing table.
        let router = router(db);

        let (api_address, api_server_handle) =
            start_api_server(api_listener, router.clone()).await?;

        let (tls_address, tls_server_handle) =
            start_tls_server(tls_listener, &cert_path, &key_path, router).await?;

        let tasks = vec![api_server_handle, tls_server_handle];

        Ok(Self {
            api_address,
            tls_address,
            tasks,
        })
    }

    /// Runs until the first listener task terminates. A listener that stops
    /// with an error takes the whole service down with it.
    pub async fn run(self) -> Result<(), Error> {
        let (result, _, _) = select_all(self.tasks).await;

        match result {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                error!(target: "catalog-core", "Listener terminated: {}", e);
                Err(e.into())
            }
            Err(e) => {
                error!(target: "catalog-core", "Listener task failed: {}", e);
                Err(e.into())
            }
        }
    }
}
