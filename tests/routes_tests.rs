use std::sync::{Arc, Mutex};

use http::Method;
use wren::middleware::{from_fn, BoxedMiddleware, Next};
use wren::router::{HttpMethod, RouteMethod};
use wren::routes::{self, build_routes, Meta, MethodMap, Pipeline, Route, RouteOptions};
use wren::{handler_fn, response, BoxedHandler, Context, Error, Request};

mod common;
use common::{body_string, capture_logs, context, request};

type Trail = Arc<Mutex<Vec<String>>>;

fn recorder(trail: &Trail, name: &'static str) -> BoxedMiddleware {
    let trail = Arc::clone(trail);
    from_fn(move |req: Request, ctx: Context, next: Next| {
        let trail = Arc::clone(&trail);
        async move {
            trail.lock().unwrap().push(name.to_string());
            next.call(req, ctx).await
        }
    })
}

fn named(name: &'static str) -> BoxedHandler {
    handler_fn(move |_req, _ctx| async move { Ok(response::ok(name)) })
}

#[test]
fn test_method_map_registers_each_recognized_key() {
    let table = build_routes([Route::new(
        "/users",
        MethodMap::new()
            .get(named("list"))
            .post(named("create"))
            .on("FETCH", named("bogus"))
            .on("get", named("lowercase")),
    )])
    .unwrap();

    let registered: Vec<String> = table
        .describe()
        .iter()
        .map(|r| format!("{} {}", r.method, r.path))
        .collect();
    assert_eq!(registered, ["GET /users", "POST /users"]);
    assert!(table.entries(RouteMethod::Any).is_empty());
}

#[test]
fn test_unrecognized_key_is_logged_and_discarded() {
    let (logs, _guard) = capture_logs();
    let table = build_routes([Route::new(
        "/users",
        MethodMap::new().get(named("list")).on("HEAD", named("head")),
    )])
    .unwrap();

    assert_eq!(table.len(), 1);
    let output = logs.contents();
    assert!(output.contains("Discarding unrecognized method key"), "{output}");
    assert!(output.contains("HEAD"), "{output}");
}

#[test]
fn test_pipeline_and_bare_handler_register_under_any() {
    let table = build_routes([
        Route::new("/health", named("health")),
        Route::new("/admin", Pipeline::new([], named("admin"))),
    ])
    .unwrap();

    assert_eq!(table.entries(RouteMethod::Any).len(), 2);
    for method in [Method::GET, Method::DELETE, Method::OPTIONS] {
        assert!(table.find(&method, "/health").is_some());
        assert!(table.find(&method, "/admin").is_some());
    }
}

#[test]
fn test_nested_child_is_registered_after_parent() {
    let table = build_routes([
        routes::get("/a", named("a")).with_child(
            routes::get("/a/b", named("b")).with_child(routes::get("/c", named("c"))),
        ),
        routes::get("/d", named("d")),
    ])
    .unwrap();

    let paths: Vec<&str> = table.describe().iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, ["/a", "/a/b", "/c", "/d"]);
}

#[test]
fn test_first_malformed_template_fails_the_build() {
    let err = build_routes([
        routes::get("/ok", named("ok")),
        routes::get("/files/*rest/more", named("bad")),
        routes::get("no-slash", named("worse")),
    ])
    .err()
    .unwrap();

    assert!(
        matches!(err, Error::InvalidPattern { ref template, .. } if template == "/files/*rest/more")
    );
}

#[tokio::test]
async fn test_shared_middleware_runs_before_method_pipeline() {
    let trail: Trail = Arc::default();
    let map = MethodMap::new()
        .with_middleware(recorder(&trail, "shared-1"))
        .with_middleware(recorder(&trail, "shared-2"))
        .get(Pipeline::new([recorder(&trail, "own")], named("list")))
        .post(named("create"));
    let table = build_routes([Route::new("/users", map)]).unwrap();

    let found = table.find(&Method::GET, "/users").unwrap();
    let res = found
        .handler
        .call(request(Method::GET, "/users"), context())
        .await
        .unwrap();
    assert_eq!(body_string(res).await, "list");
    assert_eq!(*trail.lock().unwrap(), ["shared-1", "shared-2", "own"]);

    trail.lock().unwrap().clear();
    let found = table.find(&Method::POST, "/users").unwrap();
    found
        .handler
        .call(request(Method::POST, "/users"), context())
        .await
        .unwrap();
    assert_eq!(*trail.lock().unwrap(), ["shared-1", "shared-2"]);
}

#[tokio::test]
async fn test_route_options_wrap_endpoint_pipeline() {
    let trail: Trail = Arc::default();
    let route = routes::route(
        HttpMethod::Put,
        "/items/:id",
        Pipeline::new([recorder(&trail, "own")], named("update")),
        RouteOptions {
            middleware: vec![recorder(&trail, "outer")],
            meta: Meta::summary("Update an item"),
        },
    );
    let table = build_routes([route]).unwrap();

    let info = &table.describe()[0];
    assert_eq!(info.method, RouteMethod::Exact(HttpMethod::Put));
    assert_eq!(info.meta.summary.as_deref(), Some("Update an item"));

    let found = table.find(&Method::PUT, "/items/9").unwrap();
    found
        .handler
        .call(request(Method::PUT, "/items/9"), context())
        .await
        .unwrap();
    assert_eq!(*trail.lock().unwrap(), ["outer", "own"]);
}

#[tokio::test]
async fn test_route_middleware_wraps_any_unit() {
    let trail: Trail = Arc::default();
    let table = build_routes([Route::new(
        "/wrapped",
        Pipeline::new([recorder(&trail, "pipeline")], named("inner")),
    )
    .with_middleware(recorder(&trail, "route"))])
    .unwrap();

    let found = table.find(&Method::PATCH, "/wrapped").unwrap();
    found
        .handler
        .call(request(Method::PATCH, "/wrapped"), context())
        .await
        .unwrap();
    assert_eq!(*trail.lock().unwrap(), ["route", "pipeline"]);
}

#[test]
fn test_meta_is_shared_by_every_method_of_a_mapping() {
    let table = build_routes([Route::new(
        "/pets",
        MethodMap::new()
            .get(named("list"))
            .delete(named("purge"))
            .with_meta(Meta::summary("Pets")),
    )])
    .unwrap();

    for info in table.describe() {
        assert_eq!(info.meta.summary.as_deref(), Some("Pets"));
    }
    let json = serde_json::to_value(table.describe()).unwrap();
    assert_eq!(json[0]["method"], "GET");
    assert_eq!(json[1]["method"], "DELETE");
    assert_eq!(json[0]["meta"]["summary"], "Pets");
}

#[test]
fn test_duplicate_key_keeps_the_later_endpoint() {
    let first = named("first");
    let second = named("second");
    let table = build_routes([Route::new(
        "/dup",
        MethodMap::new().get(Arc::clone(&first)).get(Arc::clone(&second)),
    )])
    .unwrap();

    assert_eq!(table.len(), 1);
    let found = table.find(&Method::GET, "/dup").unwrap();
    assert!(Arc::ptr_eq(&found.handler, &second));
}
