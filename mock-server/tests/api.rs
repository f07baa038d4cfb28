use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Fields};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn form_request(uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            http::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(body.to_string())
        .unwrap()
}

// --- echo ---

#[tokio::test]
async fn echo_decodes_query_string() {
    let resp = app()
        .oneshot(get("/echo?q=a%20b&hl=pt-BR&plus=1%2B1"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let fields: Fields = body_json(resp).await;
    assert_eq!(fields["q"], "a b");
    assert_eq!(fields["hl"], "pt-BR");
    assert_eq!(fields["plus"], "1+1");
}

#[tokio::test]
async fn echo_without_query_is_empty() {
    let resp = app().oneshot(get("/echo")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let fields: Fields = body_json(resp).await;
    assert!(fields.is_empty());
}

#[tokio::test]
async fn echo_decodes_form_body() {
    let resp = app()
        .oneshot(form_request("/echo", "name=S%C3%A3o%20Paulo&n=2"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let fields: Fields = body_json(resp).await;
    assert_eq!(fields["name"], "São Paulo");
    assert_eq!(fields["n"], "2");
}

#[tokio::test]
async fn echo_rejects_non_form_post() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/echo")
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(r#"{"a":"1"}"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

// --- canned replies ---

#[tokio::test]
async fn ok_replies_with_plain_ok() {
    let resp = app().oneshot(get("/ok")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await, "ok");
}

#[tokio::test]
async fn ok_accepts_form_post() {
    let resp = app().oneshot(form_request("/ok", "a=1")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await, "ok");
}

#[tokio::test]
async fn status_route_replies_with_requested_code() {
    for code in [201u16, 404, 500, 503] {
        let resp = app()
            .oneshot(get(&format!("/status/{code}")))
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), code);
        assert_eq!(body_bytes(resp).await, format!("status {code}"));
    }
}

#[tokio::test]
async fn status_route_rejects_non_numeric_code() {
    let resp = app().oneshot(get("/status/teapot")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn slow_route_eventually_replies() {
    let resp = app().oneshot(get("/slow/10")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await, "ok");
}

// --- search ---

#[tokio::test]
async fn search_summarizes_query() {
    let resp = app()
        .oneshot(get("/search?hl=pt-BR&output=search&q=teste"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_bytes(resp).await,
        "results for teste (hl=pt-BR, output=search)"
    );
}

#[tokio::test]
async fn search_without_q_is_bad_request() {
    let resp = app().oneshot(get("/search?hl=pt-BR")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
