use crate::authentication::{AuthProvider, HostedAuth, MockAuth};
use crate::conf::{Backend, Conf};
use crate::store::{ContentStore, HostedClient, HostedStore, MockStore};
use anyhow::Context;
use std::sync::Arc;

/// The data access surface of the site, built once at startup.
///
/// Which backend sits behind it is decided here and nowhere else;
/// the rest of the program only sees the two trait objects.
pub struct Site {
    store: Arc<dyn ContentStore>,
    auth: Arc<dyn AuthProvider>,
}

impl Site {
    pub fn build(conf: &Conf) -> anyhow::Result<Self> {
        let (store, auth): (Arc<dyn ContentStore>, Arc<dyn AuthProvider>) = match conf.backend {
            Backend::Mock => {
                tracing::info!("Using the seeded mock backend");
                (
                    Arc::new(MockStore::new(&conf.mock)),
                    Arc::new(MockAuth::new(&conf.mock)?),
                )
            }
            Backend::Hosted => {
                let hosted = conf
                    .hosted
                    .as_ref()
                    .context("Backend is Hosted but the [hosted] section is not configured")?;
                tracing::info!("Using the hosted backend at {}", hosted.base_url);

                let client = Arc::new(HostedClient::new(hosted)?);
                (
                    Arc::new(HostedStore::new(client.clone())),
                    Arc::new(HostedAuth::new(client)),
                )
            }
        };

        Ok(Self { store, auth })
    }

    pub fn store(&self) -> Arc<dyn ContentStore> {
        self.store.clone()
    }

    pub fn auth(&self) -> Arc<dyn AuthProvider> {
        self.auth.clone()
    }
}
