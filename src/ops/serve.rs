//! Development server.
//!
//! Every request is answered from the in-memory bundles and static indexes
//! of the registry. Nothing is written to disk.

use std::path::Path;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use crate::core::app::{App, AppRegistry};
use crate::ops::html::HtmlContext;
use crate::resolver::requirements::ALL;

/// Content types by extension.
pub mod types {
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const CSS: &str = "text/css; charset=utf-8";
    pub const JAVASCRIPT: &str = "text/javascript; charset=utf-8";
    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const OCTET_STREAM: &str = "application/octet-stream";
}

/// Content type of a public path.
pub fn content_type(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("html" | "htm") => types::HTML,
        Some("css") => types::CSS,
        Some("js") => types::JAVASCRIPT,
        Some("png") => types::PNG,
        Some("jpg" | "jpeg") => types::JPEG,
        Some("gif") => types::GIF,
        Some("txt") => types::PLAIN,
        _ => types::OCTET_STREAM,
    }
}

/// A response body and its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Served {
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

/// Resolve a request path.
///
/// `/` renders the shared page, `/<app>` the page of an app and
/// `/static/...` an artifact or static asset. Anything else is `None`.
pub fn lookup(registry: &AppRegistry, path: &str) -> Result<Option<Served>> {
    let path = path.split(['?', '#']).next().unwrap_or_default();

    if path.starts_with("/static/") {
        return lookup_static(registry, path);
    }

    let name = path.trim_matches('/');
    if name.is_empty() || registry.is_app(name) {
        let app = registry.app_for(if name.is_empty() { ALL } else { name })?;
        let page = HtmlContext::new(&app).render()?;
        return Ok(Some(Served {
            content_type: types::HTML,
            body: page.into_bytes(),
        }));
    }

    Ok(None)
}

fn lookup_static(registry: &AppRegistry, path: &str) -> Result<Option<Served>> {
    let names = std::iter::once(ALL).chain(registry.app_names());

    for name in names {
        let app = registry.app_for(name)?;
        if let Some(served) = find_in_app(&app, path)? {
            return Ok(Some(served));
        }
    }

    Ok(None)
}

fn find_in_app(app: &App, path: &str) -> Result<Option<Served>> {
    if let Some(artifact) = app.find_artifact(path)? {
        return Ok(Some(Served {
            content_type: content_type(path),
            body: artifact.content.clone().into_bytes(),
        }));
    }

    if let Some(record) = app.find_static_by_destination(path) {
        let body = std::fs::read(&record.source)
            .with_context(|| format!("failed to read {}", record.source.display()))?;
        return Ok(Some(Served {
            content_type: content_type(path),
            body,
        }));
    }

    Ok(None)
}

/// Serve the registry until the process is stopped.
pub fn serve(registry: &AppRegistry, addr: &str) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", addr, e))?;

    tracing::info!("serving on http://{}", addr);

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(registry, request) {
            tracing::error!("request error: {:#}", e);
        }
    }

    Ok(())
}

fn handle_request(registry: &AppRegistry, request: Request) -> Result<()> {
    let url = request.url().to_string();
    tracing::debug!("{} {}", request.method(), url);

    if !matches!(request.method(), Method::Get | Method::Head) {
        return send_body(request, 405, types::PLAIN, b"405 Method Not Allowed".to_vec());
    }

    match lookup(registry, &url) {
        Ok(Some(served)) => send_body(request, 200, served.content_type, served.body),
        Ok(None) => send_body(request, 404, types::PLAIN, b"404 Not Found".to_vec()),
        Err(e) => {
            let body = format!("500 Internal Server Error\n\n{:#}", e);
            send_body(request, 500, types::PLAIN, body.into_bytes())?;
            Err(e)
        }
    }
}

fn send_body(request: Request, status: u16, content_type: &'static str, body: Vec<u8>) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type));
    request.respond(response)?;
    Ok(())
}

fn make_header(name: &'static str, value: &'static str) -> Header {
    // both sides are static ASCII
    Header::from_bytes(name.as_bytes(), value.as_bytes()).unwrap()
}
