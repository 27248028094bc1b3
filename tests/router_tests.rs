//! Route matching through the public API: method, security and path
//! conditions, first-match precedence and the verb override.

use roundabout::{Callback, Dispatch, IncomingRequest, Router, RouterConfig};

mod common;
use common::handlers::tagged;

fn zoo_router() -> Router<String> {
    let mut router = Router::new();
    router.get("/", tagged("root")).unwrap();
    router.get("/zoo/animals", tagged("list_animals")).unwrap();
    router.post("/zoo/animals", tagged("create_animal")).unwrap();
    router.get("/zoo/animals/([0-9]+)", tagged("get_animal")).unwrap();
    router.put("/zoo/animals/([0-9]+)", tagged("update_animal")).unwrap();
    router.delete("/zoo/animals/([0-9]+)", tagged("delete_animal")).unwrap();
    router.get_secure("/zoo/keepers/([a-z]+)", tagged("get_keeper")).unwrap();
    router.post_secure("/login", tagged("login")).unwrap();
    router.put_secure("/zoo/keepers/([a-z]+)", tagged("update_keeper")).unwrap();
    router.delete_secure("/zoo/keepers/([a-z]+)", tagged("fire_keeper")).unwrap();
    router
}

fn assert_route_match(router: &Router<String>, req: IncomingRequest, expected: &str) {
    match router.run(&req).unwrap() {
        Dispatch::Handled(out) => assert_eq!(out, expected, "handler mismatch for {req:?}"),
        Dispatch::NoMatch => assert_eq!(expected, "<none>", "expected a route to match {req:?}"),
    }
}

fn plain(method: &str, uri: &str) -> IncomingRequest {
    IncomingRequest::new(method, uri, false)
}

fn tls(method: &str, uri: &str) -> IncomingRequest {
    IncomingRequest::new(method, uri, true)
}

#[test]
fn test_router_root() {
    assert_route_match(&zoo_router(), plain("GET", "/"), "root()");
}

#[test]
fn test_router_verbs_on_collection() {
    let router = zoo_router();
    assert_route_match(&router, plain("GET", "/zoo/animals"), "list_animals()");
    assert_route_match(&router, plain("POST", "/zoo/animals"), "create_animal()");
    assert_route_match(&router, plain("PATCH", "/zoo/animals"), "<none>");
}

#[test]
fn test_router_captures_path_params() {
    let router = zoo_router();
    assert_route_match(&router, plain("GET", "/zoo/animals/42"), "get_animal(42)");
    assert_route_match(&router, plain("PUT", "/zoo/animals/42"), "update_animal(42)");
    assert_route_match(&router, plain("DELETE", "/zoo/animals/42"), "delete_animal(42)");
    assert_route_match(&router, plain("GET", "/zoo/animals/abc"), "<none>");
}

#[test]
fn test_router_secure_routes() {
    let router = zoo_router();
    assert_route_match(&router, tls("GET", "/zoo/keepers/sam"), "get_keeper(sam)");
    assert_route_match(&router, plain("GET", "/zoo/keepers/sam"), "<none>");
    assert_route_match(&router, tls("PUT", "/zoo/keepers/sam"), "update_keeper(sam)");
    assert_route_match(&router, tls("DELETE", "/zoo/keepers/sam"), "fire_keeper(sam)");
}

#[test]
fn test_router_insecure_route_rejects_tls() {
    assert_route_match(&zoo_router(), tls("GET", "/zoo/animals"), "<none>");
}

#[test]
fn test_post_secure_login_over_plain_transport_is_no_match() {
    let router = zoo_router();
    assert_route_match(&router, plain("POST", "/login"), "<none>");
    assert_route_match(&router, tls("POST", "/login"), "login()");
}

#[test]
fn test_users_example() {
    let mut router = Router::new();
    router
        .get(
            "/users/([0-9]+)",
            Callback::direct(|p: &[String]| format!("handler({})", p[0])),
        )
        .unwrap();
    let req = plain("GET", "/users/42");

    let matched = router.route(&req).unwrap();
    assert_eq!(matched.params.as_slice(), ["42"]);
    assert_eq!(
        router.run(&req).unwrap(),
        Dispatch::Handled("handler(42)".to_string())
    );
}

#[test]
fn test_empty_router_is_no_match() {
    let router: Router<String> = Router::new();
    assert!(router.is_empty());
    for req in [plain("GET", "/"), tls("POST", "/anything"), plain("DELETE", "/x?method=get")] {
        assert_eq!(router.run(&req).unwrap(), Dispatch::NoMatch);
    }
}

#[test]
fn test_first_registered_route_wins() {
    let mut router = Router::new();
    router.get("/pages/(.+)", tagged("first")).unwrap();
    router.get("/pages/([0-9]+)", tagged("second")).unwrap();
    assert_route_match(&router, plain("GET", "/pages/7"), "first(7)");
}

#[test]
fn test_later_route_never_invoked_after_match() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let calls = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&calls);
    let mut router: Router<&'static str> = Router::new();
    router.get("/same", Callback::direct(|_: &[String]| "first")).unwrap();
    router
        .get(
            "/same",
            Callback::direct(move |_: &[String]| {
                counted.fetch_add(1, Ordering::SeqCst);
                "second"
            }),
        )
        .unwrap();

    assert_eq!(router.run(&plain("GET", "/same")).unwrap(), Dispatch::Handled("first"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_query_override_selects_delete_route() {
    let mut delete_only: Router<String> = Router::new();
    delete_only.delete("/items/([0-9]+)", tagged("delete")).unwrap();
    let mut get_only: Router<String> = Router::new();
    get_only.get("/items/([0-9]+)", tagged("get")).unwrap();

    let req = plain("GET", "/items/9?method=delete");
    assert_eq!(
        delete_only.run(&req).unwrap(),
        Dispatch::Handled("delete(9)".to_string())
    );
    // The real GET verb still matches a GET route; the override only adds a
    // second way to match, it does not hide the request method.
    assert_eq!(get_only.run(&req).unwrap(), Dispatch::Handled("get(9)".to_string()));

    let post = plain("POST", "/items/9?method=delete");
    let mut get_only_strict: Router<String> = Router::new();
    get_only_strict.get("/items/([0-9]+)", tagged("get")).unwrap();
    assert_eq!(get_only_strict.run(&post).unwrap(), Dispatch::NoMatch);
    assert_eq!(
        delete_only.run(&post).unwrap(),
        Dispatch::Handled("delete(9)".to_string())
    );
}

#[test]
fn test_override_precedence_follows_registration_order() {
    let mut router: Router<String> = Router::new();
    router.get("/items/([0-9]+)", tagged("get")).unwrap();
    router.delete("/items/([0-9]+)", tagged("delete")).unwrap();
    assert_route_match(&router, plain("GET", "/items/1?method=delete"), "get(1)");

    let mut router: Router<String> = Router::new();
    router.delete("/items/([0-9]+)", tagged("delete")).unwrap();
    router.get("/items/([0-9]+)", tagged("get")).unwrap();
    assert_route_match(&router, plain("GET", "/items/1?method=delete"), "delete(1)");
}

#[test]
fn test_override_can_be_renamed_or_disabled() {
    let config = RouterConfig {
        method_override: true,
        override_param: "_method".to_string(),
    };
    let mut router: Router<String> = Router::new().with_config(config);
    router.put("/doc", tagged("put")).unwrap();
    assert_route_match(&router, plain("POST", "/doc?_method=put"), "put()");
    assert_route_match(&router, plain("POST", "/doc?method=put"), "<none>");

    let mut router: Router<String> = Router::new().with_config(RouterConfig {
        method_override: false,
        ..RouterConfig::default()
    });
    router.put("/doc", tagged("put")).unwrap();
    assert_route_match(&router, plain("POST", "/doc?method=put"), "<none>");
}

#[test]
fn test_bind_stores_caller_supplied_method_and_security() {
    let mut router: Router<String> = Router::new();
    router.bind("/a", "POST", true, tagged("a")).unwrap();
    router.put_secure("/b", tagged("b")).unwrap();
    router.delete("/c", tagged("c")).unwrap();

    let stored: Vec<(&str, bool)> = router
        .routes()
        .iter()
        .map(|r| (r.method(), r.is_secure()))
        .collect();
    assert_eq!(stored, vec![("post", true), ("put", true), ("delete", false)]);
}

#[test]
fn test_http_request_routes_directly() {
    let router = zoo_router();
    let req = http::Request::builder()
        .method(http::Method::DELETE)
        .uri("https://zoo.example/zoo/keepers/kim")
        .body(())
        .unwrap();
    assert_eq!(
        router.run(&req).unwrap(),
        Dispatch::Handled("fire_keeper(kim)".to_string())
    );
}
