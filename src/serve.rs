//! Development server.
//!
//! A `tiny_http` loop on the main thread. Every request is routed and rendered
//! on the spot, so edited article bodies show up on reload; new or renamed
//! articles appear once the index snapshot is refreshed (see
//! `[index] refresh_secs`). Ctrl+C unblocks the loop and the server exits.

use crate::routes;
use crate::site::{Rendered, Site};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tiny_http::{Header, Request, Response, Server, StatusCode};
use tracing::{error, info, warn};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("invalid host address {0:?}")]
    InvalidHost(String),
    #[error("failed to bind after {attempts} attempts (ports {first}-{last}): {reason}")]
    Bind {
        attempts: u16,
        first: u16,
        last: u16,
        reason: String,
    },
    #[error("failed to set Ctrl+C handler: {0}")]
    Signal(#[from] ctrlc::Error),
    #[error("invalid header {0}")]
    Header(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What to send back for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub location: Option<String>,
    pub body: String,
}

/// Serve `site` until Ctrl+C.
pub fn serve(site: &Site, host: &str, port: u16) -> Result<(), ServeError> {
    let interface: IpAddr = host
        .parse()
        .map_err(|_| ServeError::InvalidHost(host.to_string()))?;
    let (server, addr) = try_bind_port(interface, port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        info!("shutting down");
        server_for_signal.unblock();
    })?;

    info!(index = ?site.index().policy(), "serving http://{addr}");

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(site, request) {
            warn!(error = %e, "request error");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(
    interface: IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr), ServeError> {
    let mut last_error = String::new();
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);
        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    info!("port {base_port} in use, using {port} instead");
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = e.to_string(),
        }
    }
    Err(ServeError::Bind {
        attempts: max_retries,
        first: base_port,
        last: base_port.saturating_add(max_retries.saturating_sub(1)),
        reason: last_error,
    })
}

// ============================================================================
// Request Handling
// ============================================================================

/// Route and render one URL. Never fails: render errors become a 500 page.
pub fn resolve(site: &Site, url: &str) -> Reply {
    let route = routes::parse_route(url, site.config());
    match site.render(&route) {
        Ok(Rendered::Html(markup)) => Reply {
            status: 200,
            location: None,
            body: markup.into_string(),
        },
        Ok(Rendered::Redirect(to)) => Reply {
            status: 307,
            body: format!("Redirecting to {to}"),
            location: Some(to),
        },
        Ok(Rendered::NotFound(markup)) => Reply {
            status: 404,
            location: None,
            body: markup.into_string(),
        },
        Err(e) => {
            error!(url, error = %e, "render failed");
            Reply {
                status: 500,
                location: None,
                body: site.error_page(route.lang(), &e).into_string(),
            }
        }
    }
}

fn handle_request(site: &Site, request: Request) -> Result<(), ServeError> {
    let started = Instant::now();
    let method = request.method().to_string();
    let url = request.url().to_string();

    let reply = resolve(site, &url);
    let status = reply.status;

    let mut response = Response::from_string(reply.body)
        .with_status_code(StatusCode(reply.status))
        .with_header(header("Content-Type", "text/html; charset=utf-8")?);
    if let Some(location) = &reply.location {
        response.add_header(header("Location", location)?);
    }
    request.respond(response)?;

    info!(
        %method,
        %url,
        status,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    Ok(())
}

fn header(name: &str, value: &str) -> Result<Header, ServeError> {
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .map_err(|()| ServeError::Header(format!("{name}: {value}")))
}
