//! Integration tests for the `reqwest` transport.
//!
//! A tiny hand-rolled HTTP/1.1 responder captures the raw request so we
//! can check exactly which headers went over the wire.

#[cfg(feature = "http")]
mod http {
    use ooth_transport::{Credentials, HttpRequest, HttpTransport, ReqwestTransport};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one request per entry of `replies`, in order, each on its
    /// own connection. Every reply is `(extra header lines, body)`.
    /// Returns the raw request heads (request line + headers) received.
    async fn serve(
        replies: Vec<(&'static str, &'static str)>,
    ) -> (String, tokio::task::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = listener.local_addr().expect("should have addr");

        let handle = tokio::spawn(async move {
            let mut heads = Vec::new();
            for (extra, body) in replies {
                let (mut stream, _) = listener.accept().await.expect("should accept");
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = stream.read(&mut chunk).await.expect("should read");
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                }
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n{extra}content-length: {}\r\nconnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                stream
                    .write_all(response.as_bytes())
                    .await
                    .expect("should write");
                heads.push(String::from_utf8_lossy(&buf).to_lowercase());
            }
            heads
        });

        (format!("http://{addr}"), handle)
    }

    /// Serves exactly one request with `body`.
    async fn serve_once(body: &'static str) -> (String, tokio::task::JoinHandle<Vec<String>>) {
        serve(vec![("", body)]).await
    }

    #[tokio::test]
    async fn test_explicit_cookie_header_is_sent_without_jar() {
        let (base, server) = serve_once(r#"{"user":null}"#).await;
        let transport = ReqwestTransport::new().expect("should build");

        let response = transport
            .send(
                HttpRequest::get(format!("{base}/status"))
                    .header("Cookie", "sid=abc")
                    .credentials(Credentials::Omit),
            )
            .await
            .expect("request should succeed");

        assert_eq!(response.status, 200);
        assert_eq!(response.body, br#"{"user":null}"#);

        let head = server.await.unwrap().remove(0);
        assert!(head.starts_with("get /status"), "got: {head}");
        assert!(head.contains("cookie: sid=abc"), "got: {head}");
    }

    #[tokio::test]
    async fn test_post_sends_json_body_headers() {
        let (base, server) = serve_once(r#"{"status":"ok"}"#).await;
        let transport = ReqwestTransport::new().expect("should build");

        let response = transport
            .send(
                HttpRequest::post(format!("{base}/local/login"))
                    .json_body(br#"{"username":"u"}"#.to_vec()),
            )
            .await
            .expect("request should succeed");

        assert!(response.is_success());
        let head = server.await.unwrap().remove(0);
        assert!(head.starts_with("post /local/login"), "got: {head}");
        assert!(head.contains("content-type: application/json"), "got: {head}");
    }

    #[tokio::test]
    async fn test_ambient_credentials_replay_jar_cookies() {
        let (base, server) = serve(vec![
            ("set-cookie: sid=abc; Path=/\r\n", r#"{"status":"ok"}"#),
            ("", r#"{"user":null}"#),
            ("", r#"{"user":null}"#),
        ])
        .await;
        let transport = ReqwestTransport::new().expect("should build");

        transport
            .send(HttpRequest::post(format!("{base}/local/login")).credentials(Credentials::Include))
            .await
            .expect("login should succeed");
        transport
            .send(HttpRequest::get(format!("{base}/status")).credentials(Credentials::Include))
            .await
            .expect("status should succeed");
        transport
            .send(HttpRequest::get(format!("{base}/status")).credentials(Credentials::Omit))
            .await
            .expect("status should succeed");

        let heads = server.await.unwrap();
        assert!(!heads[0].contains("cookie:"), "got: {}", heads[0]);
        assert!(heads[1].contains("cookie: sid=abc"), "got: {}", heads[1]);
        assert!(!heads[2].contains("cookie:"), "got: {}", heads[2]);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_request_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let transport = ReqwestTransport::new().expect("should build");

        let result = transport
            .send(HttpRequest::get(format!("http://{addr}/status")))
            .await;

        assert!(matches!(
            result,
            Err(ooth_transport::TransportError::Request(_))
        ));
    }
}
