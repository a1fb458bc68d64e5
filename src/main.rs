use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use http::{header::CONTENT_TYPE, Method, StatusCode};
use serde_json::Value;
use wren::host::{HostHandler, PassThrough, Routing};
use wren::middleware::{AllowedMethods, BoxedMiddleware, MetricsMiddleware, TracingMiddleware};
use wren::routes::{self, Meta, MethodMap, Pipeline, Route};
use wren::runtime_config::RoutingConfig;
use wren::telemetry::{init_logging_with_config, LogConfig};
use wren::{handler_fn, response, Bindings, Body, ConnInfo, Context, Request, Response};

/// Build a sample route table and push canned requests through it
#[derive(Parser)]
#[command(name = "wren-demo")]
#[command(about = "Wren routing smoke test", long_about = None)]
struct Cli {
    /// Host target: server (deno, connection) or worker (cloudflare, bindings)
    #[arg(short, long, env = "WREN_TARGET")]
    target: Option<String>,

    /// TOML configuration file; `--target` takes precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty debug logging instead of the `WREN_LOG_*` settings
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

struct Probe {
    method: Method,
    uri: &'static str,
    content_type: Option<&'static str>,
    body: &'static str,
    status: StatusCode,
    contains: &'static str,
}

impl Probe {
    fn new(method: Method, uri: &'static str, status: StatusCode, contains: &'static str) -> Self {
        Self {
            method,
            uri,
            content_type: None,
            body: "",
            status,
            contains,
        }
    }

    fn with_body(mut self, content_type: &'static str, body: &'static str) -> Self {
        self.content_type = Some(content_type);
        self.body = body;
        self
    }

    fn request(&self) -> anyhow::Result<Request> {
        let mut builder = http::Request::builder()
            .method(self.method.clone())
            .uri(self.uri);
        if let Some(ct) = self.content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        Ok(builder.body(Body::from(self.body))?)
    }
}

fn params_json(ctx: &Context) -> Response {
    response::json(&Value::Object(ctx.params.clone()))
}

fn sample_routes() -> Vec<Route> {
    let list_users = handler_fn(|_req, ctx: Context| async move { Ok(params_json(&ctx)) });
    let create_user = handler_fn(|_req, ctx: Context| async move {
        let name = ctx.param_str("name").unwrap_or("anonymous").to_string();
        Ok(response::created(format!("created {name}")))
    });
    let show_user = handler_fn(|_req, ctx: Context| async move { Ok(params_json(&ctx)) });
    let health = handler_fn(|_req, _ctx| async { Ok(response::no_content()) });
    let files = handler_fn(|_req, ctx: Context| async move {
        Ok(response::ok(ctx.param_str("path").unwrap_or_default().to_string()))
    });
    let whoami = handler_fn(|_req, ctx: Context| async move {
        let who = match (&ctx.conn_info, ctx.bindings.get::<String>("GREETING")) {
            (Some(conn), _) => format!("server {}", conn.remote_addr),
            (None, Some(greeting)) => format!("worker {greeting}"),
            (None, None) => "worker".to_string(),
        };
        Ok(response::ok(who))
    });
    let only_get: BoxedMiddleware = Arc::new(AllowedMethods::new([Method::GET]));

    vec![
        Route::new(
            "/users",
            MethodMap::new()
                .get(list_users)
                .post(create_user)
                .with_meta(Meta::summary("List or create users")),
        ),
        routes::get("/users/:id", show_user).with_meta(Meta::summary("Show a user")),
        routes::get("/health", health),
        Route::new("/files/*path", Pipeline::new([only_get], files)),
        Route::new("/whoami", whoami),
    ]
}

fn probes() -> Vec<Probe> {
    vec![
        Probe::new(Method::GET, "/health", StatusCode::NO_CONTENT, ""),
        Probe::new(Method::GET, "/users?limit=10&active=", StatusCode::OK, r#""limit":10"#),
        Probe::new(Method::POST, "/users", StatusCode::CREATED, "created ann")
            .with_body("application/json", r#"{"name":"ann"}"#),
        Probe::new(Method::POST, "/users", StatusCode::CREATED, "created bob")
            .with_body("application/x-www-form-urlencoded", "name=bob"),
        Probe::new(Method::GET, "/users/42?id=7", StatusCode::OK, r#""id":"42""#),
        Probe::new(Method::DELETE, "/users/42", StatusCode::NOT_FOUND, "Not Found"),
        Probe::new(Method::GET, "/files/docs/readme.md", StatusCode::OK, "docs/readme.md"),
        Probe::new(Method::POST, "/files/docs/readme.md", StatusCode::METHOD_NOT_ALLOWED, ""),
        Probe::new(Method::PUT, "/whoami", StatusCode::OK, ""),
        Probe::new(Method::GET, "/does/not/exist", StatusCode::NOT_FOUND, "Not Found"),
    ]
}

async fn send(host: &HostHandler, req: Request) -> anyhow::Result<Response> {
    let res = match host {
        HostHandler::Server(server) => {
            let addr: SocketAddr = "127.0.0.1:8080".parse()?;
            let conn = ConnInfo {
                local_addr: addr,
                remote_addr: "127.0.0.1:54321".parse()?,
            };
            server.call(req, conn).await
        }
        HostHandler::Worker(worker) => {
            let bindings = Bindings::new().with("GREETING", String::from("hello"));
            worker.call(req, bindings, Arc::new(PassThrough)).await
        }
    };
    res.map_err(|e| anyhow::anyhow!(e))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::default_dev()
    } else {
        LogConfig::from_env()
    };
    let _log_guard = init_logging_with_config(&log_config)?;

    let mut config = match &cli.config {
        Some(path) => RoutingConfig::from_toml_file(path)?,
        None => RoutingConfig::from_env(),
    };
    if let Some(target) = cli.target {
        config.target = target;
    }

    let metrics = MetricsMiddleware::new();
    let global: Vec<BoxedMiddleware> = vec![Arc::new(TracingMiddleware), Arc::new(metrics.clone())];
    let host = Routing::from_config(sample_routes(), global, &config)
        .with_context(|| format!("building routing for target '{}'", config.target))?;

    println!("target: {}", host.target());
    for info in host.describe() {
        let summary = info.meta.summary.as_deref().unwrap_or("-");
        println!("  {:<6} {:<16} {}", info.method, info.path, summary);
    }

    let mut failures = 0;
    for probe in probes() {
        let res = send(&host, probe.request()?).await?;
        let status = res.status();
        let body = res.into_body().collect().await?;
        let body = String::from_utf8_lossy(&body);

        if status == probe.status && body.contains(probe.contains) {
            println!("✅ {} {} → {} {}", probe.method, probe.uri, status.as_u16(), body);
        } else {
            failures += 1;
            println!(
                "❌ {} {} → {} {} (expected: {} containing {:?})",
                probe.method,
                probe.uri,
                status.as_u16(),
                body,
                probe.status.as_u16(),
                probe.contains
            );
        }
    }

    println!(
        "requests: {} | not found: {} | avg latency: {:?}",
        metrics.request_count(),
        metrics.not_found_count(),
        metrics.average_latency()
    );

    anyhow::ensure!(failures == 0, "{failures} probe(s) failed");
    Ok(())
}
