use std::sync::Arc;

use http::Method;

use super::{HttpMethod, RouteMethod, RouteTable};
use crate::handler::{handler_fn, BoxedHandler};
use crate::response;
use crate::routes::Meta;

fn marker(name: &'static str) -> BoxedHandler {
    handler_fn(move |_req, _ctx| async move { Ok(response::ok(name)) })
}

fn add(table: &mut RouteTable, method: RouteMethod, path: &str, handler: &BoxedHandler) {
    table
        .add(method, path, Arc::clone(handler), Arc::new(Meta::default()))
        .unwrap();
}

#[test]
fn test_exact_method_bucket_wins_over_any() {
    let any = marker("any");
    let get = marker("get");
    let mut table = RouteTable::new();
    add(&mut table, RouteMethod::Any, "/items", &any);
    add(&mut table, HttpMethod::Get.into(), "/items", &get);

    let found = table.find(&Method::GET, "/items").unwrap();
    assert!(Arc::ptr_eq(&found.handler, &get));
    assert_eq!(found.method, RouteMethod::Exact(HttpMethod::Get));

    let found = table.find(&Method::POST, "/items").unwrap();
    assert!(Arc::ptr_eq(&found.handler, &any));
    assert_eq!(found.method, RouteMethod::Any);
}

#[test]
fn test_registration_order_beats_specificity() {
    let general = marker("general");
    let specific = marker("specific");
    let mut table = RouteTable::new();
    add(&mut table, HttpMethod::Get.into(), "/users/:id", &general);
    add(&mut table, HttpMethod::Get.into(), "/users/me", &specific);

    let found = table.find(&Method::GET, "/users/me").unwrap();
    assert!(Arc::ptr_eq(&found.handler, &general));
    assert_eq!(found.get_path_param("id"), Some("me"));
}

#[test]
fn test_unbucketed_method_only_consults_any() {
    let get = marker("get");
    let any = marker("any");
    let mut table = RouteTable::new();
    add(&mut table, HttpMethod::Get.into(), "/trace", &get);
    assert!(table.find(&Method::TRACE, "/trace").is_none());

    add(&mut table, RouteMethod::Any, "/trace", &any);
    let found = table.find(&Method::TRACE, "/trace").unwrap();
    assert!(Arc::ptr_eq(&found.handler, &any));
}

#[test]
fn test_no_match_returns_none() {
    let mut table = RouteTable::new();
    add(&mut table, HttpMethod::Get.into(), "/a", &marker("a"));
    assert!(table.find(&Method::GET, "/b").is_none());
    assert!(table.find(&Method::DELETE, "/a").is_none());
}

#[test]
fn test_invalid_template_is_rejected_by_add() {
    let mut table = RouteTable::new();
    let err = table
        .add(RouteMethod::Any, "/a/:", marker("a"), Arc::new(Meta::default()))
        .unwrap_err();
    assert!(matches!(err, crate::Error::InvalidPattern { .. }));
    assert!(table.is_empty());
}

#[test]
fn test_describe_lists_registrations_in_order() {
    let mut table = RouteTable::new();
    add(&mut table, HttpMethod::Post.into(), "/b", &marker("b"));
    add(&mut table, RouteMethod::Any, "/a", &marker("a"));
    add(&mut table, HttpMethod::Get.into(), "/c", &marker("c"));

    let listed: Vec<String> = table
        .describe()
        .iter()
        .map(|r| format!("{} {}", r.method, r.path))
        .collect();
    assert_eq!(listed, vec!["POST /b", "ANY /a", "GET /c"]);
    assert_eq!(table.len(), 3);
    assert_eq!(table.entries(RouteMethod::Any).len(), 1);
    assert!(table.entries(HttpMethod::Put.into()).is_empty());
}
