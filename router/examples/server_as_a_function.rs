use switchyard::{
    Builder, Error, Handler, Method, Request, RequestExt, ResponseExt, StatusCode,
    bytes::Bytes,
    filters::{catch_all, trace},
    handler_fn, request,
    security::{BasicAuthSecurity, Credentials, Security},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let admin_credentials = Credentials::new("admin", "hunter2");
    let security = BasicAuthSecurity::new("switchyard", admin_credentials.clone())?;

    let mut admin = Builder::<Bytes>::new();
    admin.get(
        "/stats",
        handler_fn(|_req: Request<Bytes>| async move { Ok::<_, Error>("all systems nominal") }),
    )?;
    let admin = admin.build().with_filter(security.filter());

    let mut builder = Builder::<Bytes>::new();
    builder
        .filter(catch_all())
        .filter(trace())
        .get(
            "/greet/{name}",
            handler_fn(|req: Request<Bytes>| async move {
                let name = req.path_param("name").unwrap_or("stranger");
                let greeting = req.query("greeting").unwrap_or_else(|| "Hello".to_string());
                Ok::<_, Error>(format!("{}, {}!", greeting, name))
            }),
        )?
        .mount("/admin", admin)?
        .any(
            "/echo",
            handler_fn(|req: Request<Bytes>| async move {
                Ok::<_, Error>((StatusCode::OK, req.into_body()))
            }),
        )?;

    let app = builder.build();

    let requests = vec![
        request(Method::GET, "/greet/ada")?.with_query("greeting", "Hi")?,
        request(Method::GET, "/admin/stats")?,
        request(Method::GET, "/admin/stats")?
            .with_header("authorization", admin_credentials.basic_auth_header())?,
        request::<()>(Method::POST, "/echo")?.with_body(Bytes::from("ping")),
        request(Method::GET, "/nowhere")?,
    ];

    for req in requests {
        let line = format!("{} {}", req.method(), req.uri());
        let resp = app.call(req).await?;
        println!(
            "{} -> {} {} {:?}",
            line,
            resp.status().as_u16(),
            resp.reason().unwrap_or_default(),
            resp.body_string()
        );
    }

    Ok(())
}
