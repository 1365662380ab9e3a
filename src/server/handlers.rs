//! The six REST operations.
//!
//! Each handler negotiates the wire format first so that even error
//! replies carry the right `X-Operation` tag, then maps onto the core
//! index/store calls.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;

use super::response::{
    plain, render, unsupported_type, Format, LookupEntry, Operation, StatusBody, VerifyBody,
};
use super::AppState;
use crate::addr::{parse_ipv4, Cidr};
use crate::index::PrefixIndex;

/// `GET /` — liveness probe.
pub(super) async fn status(headers: HeaderMap) -> Response {
    let op = Operation::Status;
    let format = match Format::negotiate(&headers) {
        Ok(format) => format,
        Err(requested) => return unsupported_type(op, &requested),
    };
    render(op, format, &StatusBody { status: "OK" })
}

/// `POST /` — batch lookup, one IP per line of the URL-encoded body.
pub(super) async fn batch_lookup(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let op = Operation::BatchLookup;
    let format = match Format::negotiate(&headers) {
        Ok(format) => format,
        Err(requested) => return unsupported_type(op, &requested),
    };

    let decoded = match urlencoding::decode(&body) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => {
            return plain(
                op,
                StatusCode::BAD_REQUEST,
                "malformed percent-encoding in request body\n".to_string(),
            )
        }
    };

    let index = state.index.read();
    let results: Vec<LookupEntry> = decoded
        .split(['\r', '\n'])
        .filter(|line| !line.is_empty())
        .map(|ip| lookup_entry(&index, ip))
        .collect();
    drop(index);

    render(op, format, &results)
}

/// `GET /{ip}` — single lookup; the body is a one-element batch answer.
pub(super) async fn single_lookup(
    State(state): State<AppState>,
    Path(ip): Path<String>,
    headers: HeaderMap,
) -> Response {
    let op = Operation::SingleLookup;
    let format = match Format::negotiate(&headers) {
        Ok(format) => format,
        Err(requested) => return unsupported_type(op, &requested),
    };

    let results = vec![lookup_entry(&state.index.read(), &ip)];
    render(op, format, &results)
}

/// `GET /{ip}/{prefix}` — exact-prefix membership.
pub(super) async fn verify(
    State(state): State<AppState>,
    Path((ip, prefix)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let op = Operation::Verify;
    let format = match Format::negotiate(&headers) {
        Ok(format) => format,
        Err(requested) => return unsupported_type(op, &requested),
    };
    let cidr = match parse_path_cidr(op, &ip, &prefix) {
        Ok(cidr) => cidr,
        Err(response) => return *response,
    };

    let present = state.index.read().has(cidr);
    render(op, format, &verify_body(cidr, present))
}

/// `PUT /{ip}/{prefix}` — insert and commit.
pub(super) async fn add(
    State(state): State<AppState>,
    Path((ip, prefix)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let op = Operation::Add;
    let format = match Format::negotiate(&headers) {
        Ok(format) => format,
        Err(requested) => return unsupported_type(op, &requested),
    };
    let cidr = match parse_path_cidr(op, &ip, &prefix) {
        Ok(cidr) => cidr,
        Err(response) => return *response,
    };

    let mut index = state.index.write();
    index.put(cidr);
    if let Some(response) = commit(op, &state, &index) {
        return response;
    }
    let present = index.has(cidr);
    drop(index);

    render(op, format, &verify_body(cidr, present))
}

/// `DELETE /{ip}/{prefix}` — remove and commit.
pub(super) async fn remove(
    State(state): State<AppState>,
    Path((ip, prefix)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let op = Operation::Delete;
    let format = match Format::negotiate(&headers) {
        Ok(format) => format,
        Err(requested) => return unsupported_type(op, &requested),
    };
    let cidr = match parse_path_cidr(op, &ip, &prefix) {
        Ok(cidr) => cidr,
        Err(response) => return *response,
    };

    let mut index = state.index.write();
    index.del(cidr);
    if let Some(response) = commit(op, &state, &index) {
        return response;
    }
    let present = index.has(cidr);
    drop(index);

    render(op, format, &verify_body(cidr, present))
}

fn lookup_entry(index: &PrefixIndex, ip: &str) -> LookupEntry {
    match parse_ipv4(ip) {
        Ok(addr) => LookupEntry {
            ip: ip.to_string(),
            valid: true,
            cidrs: index.lookup(addr).iter().map(|c| c.to_string()).collect(),
        },
        Err(_) => LookupEntry {
            ip: ip.to_string(),
            valid: false,
            cidrs: Vec::new(),
        },
    }
}

fn verify_body(cidr: Cidr, present: bool) -> VerifyBody {
    VerifyBody {
        cidr: cidr.to_string(),
        valid: true,
        present,
    }
}

fn parse_path_cidr(op: Operation, ip: &str, prefix: &str) -> Result<Cidr, Box<Response>> {
    format!("{}/{}", ip, prefix).parse::<Cidr>().map_err(|e| {
        Box::new(plain(
            op,
            StatusCode::BAD_REQUEST,
            format!("{}\n", e),
        ))
    })
}

/// Persist under the held write lock; `Some` is the error response.
fn commit(op: Operation, state: &AppState, index: &PrefixIndex) -> Option<Response> {
    match state.store.commit(index) {
        Ok(()) => None,
        Err(e) => {
            log::error!("commit to {} failed: {}", state.store.path().display(), e);
            Some(plain(
                op,
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("commit failed: {}\n", e),
            ))
        }
    }
}
