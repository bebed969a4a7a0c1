//! The fixed-response request handler.
//!
//! Every request gets the same answer: status 200 and a body of ten `X`
//! bytes. Method and target are ignored on purpose, so non-idempotent
//! methods such as POST or DELETE get that same 200 as well. The handler sets
//! no headers; `content-length`, `date` and `connection` are whatever hyper
//! adds when it writes the response.

use std::convert::Infallible;

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Request, Response, StatusCode};

/// Number of bytes in the fixed body.
pub const FIXED_BODY_LEN: usize = 10;

/// The byte the fixed body is made of.
pub const FIXED_BODY_BYTE: u8 = b'X';

/// The fixed body.
pub static FIXED_BODY: [u8; FIXED_BODY_LEN] = [FIXED_BODY_BYTE; FIXED_BODY_LEN];

/// Build the fixed response.
pub fn build_fixed_response() -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(&FIXED_BODY)));
    *response.status_mut() = StatusCode::OK;
    response
}

/// Service function handed to hyper for every request on a connection.
pub async fn fixed_response<B>(req: Request<B>) -> Result<Response<Full<Bytes>>, Infallible> {
    tracing::debug!(
        method = %req.method(),
        path = %req.uri().path(),
        version = ?req.version(),
        "Serving fixed response"
    );
    Ok(build_fixed_response())
}
