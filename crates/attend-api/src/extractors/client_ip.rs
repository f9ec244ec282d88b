//! Client address extractor
//!
//! Forwarding headers are honored only when the connecting peer is one of
//! the configured trusted proxies (`TRUSTED_PROXIES`). Otherwise the peer
//! address is the client.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap},
};

use crate::state::AppState;

const FORWARDED_FOR: &str = "x-forwarded-for";
const REAL_IP: &str = "x-real-ip";

/// Client address used as the rate-limit key. `"unknown"` when the peer
/// address is not available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        let trusted = &app_state.config().rate_limit.trusted_proxies;
        Ok(Self(resolve(&parts.headers, peer, trusted)))
    }
}

fn resolve(headers: &HeaderMap, peer: Option<IpAddr>, trusted: &[IpAddr]) -> String {
    let Some(peer) = peer else {
        return "unknown".to_string();
    };
    if !trusted.contains(&peer) {
        return peer.to_string();
    }

    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    // Rightmost hop that is not one of our proxies
    if let Some(chain) = header(FORWARDED_FOR) {
        let hop = chain
            .rsplit(',')
            .map(str::trim)
            .filter(|hop| !hop.is_empty())
            .map(str::parse::<IpAddr>)
            .find(|hop| !matches!(hop, Ok(ip) if trusted.contains(ip)));
        match hop {
            Some(Ok(ip)) => return ip.to_string(),
            Some(Err(_)) => return peer.to_string(),
            None => {}
        }
    }

    header(REAL_IP)
        .and_then(|v| v.trim().parse::<IpAddr>().ok())
        .unwrap_or(peer)
        .to_string()
}
