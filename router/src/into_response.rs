use bytes::Bytes;
use http::{HeaderValue, Response, StatusCode, header::CONTENT_TYPE};

pub trait IntoResponse<B> {
    fn into_response(self) -> Response<B>;
}

impl<B> IntoResponse<B> for Response<B> {
    fn into_response(self) -> Response<B> {
        self
    }
}

impl<B: Default> IntoResponse<B> for StatusCode {
    fn into_response(self) -> Response<B> {
        let mut resp = Response::new(B::default());
        *resp.status_mut() = self;
        resp
    }
}

impl<B> IntoResponse<B> for &'static str
where
    B: From<&'static str>,
{
    fn into_response(self) -> Response<B> {
        text(B::from(self))
    }
}

impl<B> IntoResponse<B> for String
where
    B: From<String>,
{
    fn into_response(self) -> Response<B> {
        text(B::from(self))
    }
}

impl<B> IntoResponse<B> for Bytes
where
    B: From<Bytes>,
{
    fn into_response(self) -> Response<B> {
        let mut resp = Response::new(B::from(self));
        resp.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/octet-stream"),
        );
        resp
    }
}

impl<B, T> IntoResponse<B> for (StatusCode, T)
where
    T: IntoResponse<B>,
{
    fn into_response(self) -> Response<B> {
        let mut resp = self.1.into_response();
        *resp.status_mut() = self.0;
        resp
    }
}

fn text<B>(body: B) -> Response<B> {
    let mut resp = Response::new(body);
    resp.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    resp
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn text_bodies_are_tagged_as_plain_text() {
        let resp: Response<Bytes> = (StatusCode::CREATED, "made it").into_response();

        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(resp.body(), &Bytes::from("made it"));
        assert_eq!(
            resp.headers().get(CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn status_codes_have_empty_bodies() {
        let resp: Response<Bytes> = StatusCode::NO_CONTENT.into_response();

        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(resp.body().is_empty());
        assert!(resp.headers().is_empty());
    }
}
