use std::sync::Arc;

use crate::{Credentials, Request, Result};

/// Attaches authentication material to a built request.
///
/// Called exactly once per call, before the first attempt. The signed
/// request is then replayed unchanged by every retry, so a signature must not
/// depend on anything that varies between attempts.
///
/// Return [`AdsApiError::Signing`](crate::AdsApiError::Signing) to reject a
/// request.
pub trait Signer: Send + Sync {
    fn sign(&self, request: Request, credentials: &Credentials, domain: &str) -> Result<Request>;
}

impl<S: Signer + ?Sized> Signer for Arc<S> {
    fn sign(&self, request: Request, credentials: &Credentials, domain: &str) -> Result<Request> {
        (**self).sign(request, credentials, domain)
    }
}
