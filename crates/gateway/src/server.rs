use std::{
    net::{IpAddr, SocketAddr},
    path::Path,
    sync::Arc,
};

use {
    axum::{
        Json, Router,
        body::{Body, Bytes},
        extract::{FromRequest, Multipart, Request, State},
        http::{HeaderMap, HeaderValue, Method, Uri, header::CONTENT_TYPE},
        response::IntoResponse,
        routing::get,
    },
    herald_config::HeraldConfig,
    tower_http::{services::ServeFile, trace::TraceLayer},
    tracing::{debug, info},
};

use crate::{
    registry::AddressRegistry,
    request::{
        DispatchRequest, clean_path, is_form_content_type, is_multipart_content_type,
        reads_form_body,
    },
    resolver::{RequestResolver, ResolveError},
    response::ResponseBody,
    services::live_dispatchers,
    state::GatewayState,
};

// ── Server startup ───────────────────────────────────────────────────────────

/// Build the gateway router (shared between production startup and tests).
///
/// Every path without its own route is a notification endpoint.
pub fn build_gateway_app(state: Arc<GatewayState>, public_dir: &Path) -> Router {
    Router::new()
        .route("/health", get(health_handler).fallback(notify_handler))
        .route_service(
            "/favicon.ico",
            ServeFile::new(public_dir.join("favicon.ico")),
        )
        .route_service("/robots.txt", ServeFile::new(public_dir.join("robots.txt")))
        .fallback(notify_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn start_gateway(config: &HeraldConfig, bind: &str, port: u16) -> anyhow::Result<()> {
    let registry = Arc::new(AddressRegistry::from_config(config));
    let dispatchers = live_dispatchers(config)?;
    let state = GatewayState::new(RequestResolver::new(Arc::clone(&registry), dispatchers));

    let app = build_gateway_app(Arc::clone(&state), &config.public_dir);

    let addr = SocketAddr::new(bind.parse::<IpAddr>()?, port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Startup banner.
    let lines = [
        format!("herald gateway v{}", state.version),
        format!("listening on {}", listener.local_addr()?),
        format!("{} addresses registered", registry.len()),
        format!("mail template: {}", config.template_path.display()),
    ];
    let width = lines.iter().map(|l| l.len()).max().unwrap_or(0) + 4;
    info!("┌{}┐", "─".repeat(width));
    for line in &lines {
        info!("│  {:<w$}│", line, w = width - 2);
    }
    info!("└{}┘", "─".repeat(width));

    axum::serve(listener, app).await?;
    Ok(())
}

// ── Notification flow ────────────────────────────────────────────────────────

/// Turn one parsed request into its reply, launching dispatch when the
/// request is a POST for a registered address.
///
/// A missing address is reported before the method is checked.
pub fn handle_notification(
    resolver: &RequestResolver,
    method: &Method,
    path: &str,
    request: &DispatchRequest,
) -> ResponseBody {
    let result = match request.address_name() {
        None => Err(ResolveError::MissingAddress),
        Some(_) if *method != Method::POST => Err(ResolveError::MethodNotAllowed {
            method: method.to_string(),
        }),
        Some(_) => resolver
            .resolve(request)
            .map(|resolved| resolved.address.enabled_channels.clone()),
    };

    match result {
        Ok(handlers) => ResponseBody::ok(method, path, handlers),
        Err(e) => {
            debug!(%method, path, error = %e, "request not dispatched");
            ResponseBody::from_error(&e, method, path)
        },
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn notify_handler(
    State(state): State<Arc<GatewayState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> ResponseBody {
    let path = clean_path(uri.path());
    let request = parse_request(&method, &uri, &headers, body).await;

    let response = handle_notification(&state.resolver, &method, &path, &request);
    debug!(
        code = response.status.code,
        detail = %response.status.message,
        handlers = ?response.meta.handlers,
        "notification response"
    );
    response
}

/// Collect request fields from the query string and, depending on content
/// type and method, the body.
async fn parse_request(
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    body: Bytes,
) -> DispatchRequest {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if is_form_content_type(content_type) {
        let form_body = reads_form_body(method).then_some(body.as_ref());
        return DispatchRequest::from_form(uri.query(), form_body);
    }
    if is_multipart_content_type(content_type) {
        let fields = match multipart_fields(content_type, body).await {
            Ok(fields) => fields,
            Err(e) => {
                debug!(error = %e, "unreadable multipart body");
                Vec::new()
            },
        };
        return DispatchRequest::from_multipart(uri.query(), fields);
    }
    DispatchRequest::from_form(uri.query(), None)
}

/// Text fields of a multipart body, in order. File parts are skipped.
async fn multipart_fields(
    content_type: &str,
    body: Bytes,
) -> anyhow::Result<Vec<(String, String)>> {
    let mut req = Request::new(Body::from(body));
    req.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_str(content_type)?);
    let mut multipart = Multipart::from_request(req, &()).await?;

    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        fields.push((name, field.text().await?));
    }
    Ok(fields)
}

async fn health_handler(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": state.version,
        "addresses": state.resolver.registry().len(),
    }))
}
