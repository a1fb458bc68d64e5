use std::sync::Arc;

use http::Method;
use wren::router::{HttpMethod, Pattern, RouteMethod, RouteTable};
use wren::routes::Meta;
use wren::{handler_fn, response, BoxedHandler, Error};

fn named(name: &'static str) -> BoxedHandler {
    handler_fn(move |_req, _ctx| async move { Ok(response::ok(name)) })
}

fn zoo_table() -> (RouteTable, Vec<(&'static str, BoxedHandler)>) {
    let handlers = vec![
        ("root_handler", named("root_handler")),
        ("get_animals", named("get_animals")),
        ("create_animal", named("create_animal")),
        ("get_animal", named("get_animal")),
        ("update_animal", named("update_animal")),
        ("delete_animal", named("delete_animal")),
        ("animal_toy", named("animal_toy")),
        ("static_asset", named("static_asset")),
    ];
    let h = |name: &str| {
        handlers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, h)| Arc::clone(h))
            .unwrap()
    };
    let meta = Arc::new(Meta::default());
    let mut table = RouteTable::new();
    for (method, path, name) in [
        (RouteMethod::from(HttpMethod::Get), "/", "root_handler"),
        (HttpMethod::Get.into(), "/zoo/animals", "get_animals"),
        (HttpMethod::Post.into(), "/zoo/animals", "create_animal"),
        (HttpMethod::Get.into(), "/zoo/animals/:id", "get_animal"),
        (HttpMethod::Put.into(), "/zoo/animals/:id", "update_animal"),
        (HttpMethod::Delete.into(), "/zoo/animals/:id", "delete_animal"),
        (HttpMethod::Get.into(), "/zoo/animals/:id/toys/:toy_id", "animal_toy"),
        (RouteMethod::Any, "/static/*path", "static_asset"),
    ] {
        table.add(method, path, h(name), Arc::clone(&meta)).unwrap();
    }
    (table, handlers)
}

fn assert_route_match(method: Method, path: &str, expected: &str) {
    let (table, handlers) = zoo_table();
    let found = table
        .find(&method, path)
        .unwrap_or_else(|| panic!("{method} {path} should match"));
    let expected_handler = &handlers.iter().find(|(n, _)| *n == expected).unwrap().1;
    assert!(
        Arc::ptr_eq(&found.handler, expected_handler),
        "{method} {path} matched {} instead of {expected}",
        found.template
    );
}

#[test]
fn test_router_root() {
    assert_route_match(Method::GET, "/", "root_handler");
}

#[test]
fn test_router_get_animals() {
    assert_route_match(Method::GET, "/zoo/animals", "get_animals");
}

#[test]
fn test_router_post_animals() {
    assert_route_match(Method::POST, "/zoo/animals", "create_animal");
}

#[test]
fn test_router_get_animal_by_id() {
    assert_route_match(Method::GET, "/zoo/animals/123", "get_animal");
    let (table, _) = zoo_table();
    let found = table.find(&Method::GET, "/zoo/animals/123").unwrap();
    assert_eq!(found.get_path_param("id"), Some("123"));
}

#[test]
fn test_router_put_and_delete_animal() {
    assert_route_match(Method::PUT, "/zoo/animals/7", "update_animal");
    assert_route_match(Method::DELETE, "/zoo/animals/7", "delete_animal");
}

#[test]
fn test_router_nested_params_in_template_order() {
    let (table, _) = zoo_table();
    let found = table.find(&Method::GET, "/zoo/animals/12/toys/ball").unwrap();
    let names: Vec<&str> = found.path_params.iter().map(|(k, _)| k.as_ref()).collect();
    assert_eq!(names, ["id", "toy_id"]);
    assert_eq!(found.get_path_param("toy_id"), Some("ball"));
}

#[test]
fn test_router_any_bucket_serves_every_method() {
    for method in [Method::GET, Method::POST, Method::HEAD, Method::TRACE] {
        assert_route_match(method, "/static/css/site.css", "static_asset");
    }
    let (table, _) = zoo_table();
    let found = table.find(&Method::GET, "/static/css/site.css").unwrap();
    assert_eq!(found.get_path_param("path"), Some("css/site.css"));
    assert_eq!(found.method, RouteMethod::Any);
}

#[test]
fn test_router_unknown_path_and_method() {
    let (table, _) = zoo_table();
    assert!(table.find(&Method::GET, "/does/not/exist").is_none());
    assert!(table.find(&Method::PATCH, "/zoo/animals/1").is_none());
    assert!(table.find(&Method::GET, "/zoo/animals/").is_none());
    assert!(table.find(&Method::GET, "/zoo/animals/1/").is_none());
}

#[test]
fn test_router_matches_bare_paths_only() {
    let (table, _) = zoo_table();
    // Callers strip the query string before lookup.
    assert!(table.find(&Method::GET, "/zoo/animals?limit=1").is_none());
    assert!(table.find(&Method::GET, "/zoo/animals").is_some());
}

#[test]
fn test_pattern_round_trip_through_public_api() {
    let pattern = Pattern::compile("/shops/:shop/items/:item").unwrap();
    assert_eq!(pattern.template(), "/shops/:shop/items/:item");
    let params = pattern.matches("/shops/s1/items/i2").unwrap();
    assert_eq!(params[0].1, "s1");
    assert_eq!(params[1].1, "i2");
    assert!(!pattern.is_match("/shops/s1/items"));
}

#[test]
fn test_malformed_template_is_rejected_at_registration() {
    let mut table = RouteTable::new();
    let err = table
        .add(
            RouteMethod::Any,
            "/users/:",
            named("broken"),
            Arc::new(Meta::default()),
        )
        .unwrap_err();
    assert!(matches!(err, Error::InvalidPattern { ref template, .. } if template == "/users/:"));
    assert!(table.is_empty());
}
