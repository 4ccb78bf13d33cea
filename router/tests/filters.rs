use std::sync::{Arc, Mutex};

use switchyard::{
    BoxFilter, Builder, Error, Filter, FilterExt, Handler, Method, Next, Request, ResponseExt,
    StatusCode, box_filter,
    bytes::Bytes,
    filter_fn,
    filters::{catch_all, trace},
    handler_fn, request,
    security::{ApiKeySecurity, Security},
    then,
};

type Log = Arc<Mutex<Vec<String>>>;

fn recording(name: &'static str, log: Log) -> BoxFilter<Bytes> {
    box_filter(filter_fn(move |req: Request<Bytes>, next: Next<Bytes>| {
        let log = log.clone();
        async move {
            log.lock().unwrap().push(format!("{} pre", name));
            let resp = next.run(req).await;
            log.lock().unwrap().push(format!("{} post", name));
            resp
        }
    }))
}

#[derive(Debug)]
struct Boom;

impl std::fmt::Display for Boom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("boom")
    }
}

impl std::error::Error for Boom {}

#[tokio::test]
async fn builder_filters_run_as_an_onion() {
    let log: Log = Default::default();

    let mut builder = Builder::<Bytes>::new();
    builder
        .filter(recording("outer", log.clone()))
        .filter(recording("inner", log.clone()))
        .get(
            "/",
            handler_fn({
                let log = log.clone();
                move |_req: Request<Bytes>| {
                    let log = log.clone();
                    async move {
                        log.lock().unwrap().push("handler".to_string());
                        Ok::<_, Error>("ok")
                    }
                }
            }),
        )
        .expect("route");
    let router = builder.build();

    router
        .call(request(Method::GET, "/").expect("request"))
        .await
        .expect("response");

    assert_eq!(
        *log.lock().unwrap(),
        vec!["outer pre", "inner pre", "handler", "inner post", "outer post"]
    );
}

#[tokio::test]
async fn then_is_associative_over_boxed_handlers() {
    let left: Log = Default::default();
    let right: Log = Default::default();

    let terminal = || {
        switchyard::box_handler(handler_fn(|_req: Request<Bytes>| async move {
            Ok::<_, Error>("done")
        }))
    };

    let a = then(
        then(recording("f1", left.clone()), recording("f2", left.clone())),
        recording("f3", left.clone()),
    )
    .wrap(terminal());
    let b = then(
        recording("f1", right.clone()),
        then(recording("f2", right.clone()), recording("f3", right.clone())),
    )
    .wrap(terminal());

    let a = a
        .call(request(Method::GET, "/").expect("request"))
        .await
        .expect("a");
    let b = b
        .call(request(Method::GET, "/").expect("request"))
        .await
        .expect("b");

    assert_eq!(a.status(), b.status());
    assert_eq!(a.body_string(), b.body_string());
    assert_eq!(*left.lock().unwrap(), *right.lock().unwrap());
}

#[tokio::test]
async fn failures_propagate_until_caught() {
    let failing = || {
        handler_fn(|_req: Request<Bytes>| async move {
            Err::<&'static str, _>(Boom)
        })
    };

    let mut builder = Builder::<Bytes>::new();
    builder
        .filter(trace())
        .get("/boom", failing())
        .expect("route");
    let router = builder.build();

    let err = router
        .call(request(Method::GET, "/boom").expect("request"))
        .await
        .expect_err("failure");
    assert!(err.is::<Boom>());

    let mut builder = Builder::<Bytes>::new();
    builder
        .filter(catch_all::<Bytes>().then(trace()))
        .get("/boom", failing())
        .expect("route");
    let router = builder.build();

    let resp = router
        .call(request(Method::GET, "/boom").expect("request"))
        .await
        .expect("response");
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn filtering_a_router_does_not_change_routing() {
    let mut builder = Builder::<Bytes>::new();
    builder
        .get(
            "/public",
            handler_fn(|_req: Request<Bytes>| async move { Ok::<_, Error>("public") }),
        )
        .expect("route");
    let plain = builder.build();

    let secured = plain
        .clone()
        .with_filter(ApiKeySecurity::query("key", |key| key == "s3cret").filter());

    for path in ["/public", "/missing"] {
        let plain_match = plain.match_route(&Method::GET, path);
        let secured_match = secured.match_route(&Method::GET, path);
        assert_eq!(plain_match.is_found(), secured_match.is_found());
        assert_eq!(plain_match.template(), secured_match.template());
    }

    let resp = secured
        .call(request(Method::GET, "/public").expect("request"))
        .await
        .expect("response");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = secured
        .call(request(Method::GET, "/public?key=s3cret").expect("request"))
        .await
        .expect("response");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.body_string(), "public");
}
