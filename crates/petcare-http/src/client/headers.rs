//! Standard headers attached to every gateway request.

use crate::types::{ApiRequest, Credential};

pub const ACCEPT: &str = "Accept";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const AUTHORIZATION: &str = "Authorization";
pub const APPLICATION_JSON: &str = "application/json";

/// Add JSON negotiation headers and, for authorized requests, the bearer token.
///
/// Public requests never carry `Authorization`, even if one was set by hand.
pub fn decorate(mut request: ApiRequest, credential: Option<&Credential>) -> ApiRequest {
    request = request.with_header(ACCEPT, APPLICATION_JSON);
    if request.has_body() {
        request = request.with_header(CONTENT_TYPE, APPLICATION_JSON);
    }

    request
        .headers
        .retain(|k, _| !k.eq_ignore_ascii_case(AUTHORIZATION));
    if request.authorized {
        if let Some(credential) = credential {
            request = request.with_header(AUTHORIZATION, credential.bearer());
        }
    }
    request
}
