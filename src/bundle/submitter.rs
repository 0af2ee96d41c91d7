//! Bundle submission.

use std::sync::Arc;

use crate::auth::CredentialStore;
use crate::bundle::types::{Bundle, BundleSubmissionHandle};
use crate::error::BundleResult;
use crate::observability::metrics;
use crate::relay::BundleRelay;

/// Sends assembled bundles over the relay transport.
///
/// Does not wait for the relay's verdict; that is the reconciler's job.
#[derive(Clone)]
pub struct BundleSubmitter {
    relay: Arc<dyn BundleRelay>,
    credentials: Option<CredentialStore>,
}

impl BundleSubmitter {
    pub fn new(relay: Arc<dyn BundleRelay>, credentials: Option<CredentialStore>) -> Self {
        Self { relay, credentials }
    }

    /// Submit `bundle` and return the handle used to track it.
    ///
    /// Fails with an unauthenticated transport error when a credential store
    /// is configured but holds no valid credential.
    pub async fn submit(&self, bundle: &Bundle) -> BundleResult<BundleSubmissionHandle> {
        let authorization = self
            .credentials
            .as_ref()
            .map(CredentialStore::authorization)
            .transpose()?;

        let ack = self.relay.send_bundle(bundle, authorization.as_deref()).await?;
        metrics::record_bundle_submitted(bundle.len());

        tracing::info!(
            bundle_id = ack.bundle_id.as_deref().unwrap_or(&ack.acknowledgement),
            transactions = bundle.len(),
            first_signature = ?bundle.signatures().first(),
            "Bundle submitted"
        );

        Ok(BundleSubmissionHandle::new(
            ack.acknowledgement,
            bundle.signatures().to_vec(),
            ack.bundle_id,
        ))
    }
}

impl std::fmt::Debug for BundleSubmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundleSubmitter")
            .field("authenticated", &self.credentials.is_some())
            .finish()
    }
}
