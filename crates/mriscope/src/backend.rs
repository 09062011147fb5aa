//! Typed client for the classifier service.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ClientError, Result};
use crate::preview::SelectedFile;

/// Body of `POST /upload`. The service answers validation failures with a
/// 4xx status and an `error` field, so both shapes share one type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadReply {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
}

/// Body of `GET /get_tumor_info`.
#[derive(Debug, Clone, Deserialize)]
pub struct TumorInfo {
    pub info: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthForm {
    Signup,
    Login,
}

impl AuthForm {
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Signup => "/signup",
            Self::Login => "/login",
        }
    }
}

#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct AuthBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    username: Option<String>,
}

/// Outcome of `/signup` or `/login` that reached the service.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthReply {
    /// HTTP status was 2xx.
    pub ok: bool,
    pub message: Option<String>,
    pub username: Option<String>,
}

pub trait Backend {
    fn classify(&self, file: &SelectedFile) -> Result<UploadReply>;

    fn tumor_info(&self, label: &str) -> Result<TumorInfo>;

    fn authenticate(&self, form: AuthForm, credentials: &Credentials) -> Result<AuthReply>;
}

pub struct HttpBackend {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Self {
            agent: config.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Backend for HttpBackend {
    fn classify(&self, file: &SelectedFile) -> Result<UploadReply> {
        let boundary = multipart_boundary();
        let body = encode_multipart(&boundary, "file", file);
        info!(file = %file.name, bytes = file.bytes.len(), "uploading for classification");

        let mut response = self
            .agent
            .post(&self.url("/upload"))
            .header(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .send(&body[..])?;
        debug!(status = response.status().as_u16(), "upload answered");

        decode(response.body_mut())
    }

    fn tumor_info(&self, label: &str) -> Result<TumorInfo> {
        info!(label, "fetching tumor info");
        let mut response = self
            .agent
            .get(&self.url("/get_tumor_info"))
            .query("tumor_type", label)
            .call()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }
        decode(response.body_mut())
    }

    fn authenticate(&self, form: AuthForm, credentials: &Credentials) -> Result<AuthReply> {
        info!(endpoint = form.endpoint(), username = %credentials.username, "submitting credentials");
        let mut response = self
            .agent
            .post(&self.url(form.endpoint()))
            .send_json(credentials)?;

        let ok = response.status().is_success();
        let body: AuthBody = decode(response.body_mut())?;
        Ok(AuthReply {
            ok,
            message: body.message,
            username: body.username,
        })
    }
}

/// Parse a JSON body, quoting its start when it is not JSON.
fn decode<T: DeserializeOwned>(body: &mut ureq::Body) -> Result<T> {
    let text = body.read_to_string()?;
    serde_json::from_str(&text).map_err(|e| {
        let snippet: String = text.chars().take(80).collect();
        ClientError::Decode(format!("{e} in {snippet:?}"))
    })
}

fn multipart_boundary() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("----mriscope{nanos:x}")
}

/// Encode `file` as the only part of a `multipart/form-data` body.
fn encode_multipart(boundary: &str, field: &str, file: &SelectedFile) -> Vec<u8> {
    let filename = file.name.replace('"', "%22");
    let mut body = Vec::with_capacity(file.bytes.len() + 256);
    body.extend_from_slice(
        format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: {}\r\n\r\n",
            file.mime
        )
        .as_bytes(),
    );
    body.extend_from_slice(&file.bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::JoinHandle;

    /// Answer exactly one request with `status` and a JSON `body`, returning
    /// the raw request text.
    fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = stream.read(&mut chunk).unwrap();
                request.extend_from_slice(&chunk[..n]);
                if let Some(end) = find_head_end(&request) {
                    let head = String::from_utf8_lossy(&request[..end]).to_lowercase();
                    let complete = if head.contains("transfer-encoding: chunked") {
                        request.ends_with(b"0\r\n\r\n")
                    } else {
                        let length = head
                            .lines()
                            .find_map(|l| l.strip_prefix("content-length:"))
                            .and_then(|v| v.trim().parse::<usize>().ok())
                            .unwrap_or(0);
                        request.len() >= end + length
                    };
                    if complete {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let reply = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(reply.as_bytes()).unwrap();
            String::from_utf8_lossy(&request).to_string()
        });
        (format!("http://{addr}"), handle)
    }

    fn find_head_end(buf: &[u8]) -> Option<usize> {
        buf.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4)
    }

    #[test]
    fn test_url_join_strips_trailing_slash() {
        let backend = HttpBackend::new("http://localhost:5000/", Duration::from_secs(1));
        assert_eq!(backend.url("/upload"), "http://localhost:5000/upload");
    }

    #[test]
    fn test_multipart_layout() {
        let file = SelectedFile::from_bytes("scan.png".into(), b"PNGDATA".to_vec());
        let body = encode_multipart("XYZ", "file", &file);
        let text = String::from_utf8(body).unwrap();
        assert!(text.starts_with("--XYZ\r\n"));
        assert!(text.contains("name=\"file\"; filename=\"scan.png\""));
        assert!(text.contains("Content-Type: image/png\r\n\r\nPNGDATA\r\n"));
        assert!(text.ends_with("\r\n--XYZ--\r\n"));
    }

    #[test]
    fn test_multipart_escapes_quotes_in_filename() {
        let file = SelectedFile::from_bytes("a\"b.png".into(), Vec::new());
        let text = String::from_utf8(encode_multipart("B", "file", &file)).unwrap();
        assert!(text.contains("filename=\"a%22b.png\""));
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("alice", "hunter2");
        let shown = format!("{creds:?}");
        assert!(shown.contains("alice"));
        assert!(!shown.contains("hunter2"));
        assert!(creds.is_complete());
        assert!(!Credentials::new("alice", "").is_complete());
    }

    #[test]
    fn test_tumor_info_sends_query() {
        let (base, server) = serve_once("200 OK", r#"{"tumor_type":"GLIOMA","info":"glial"}"#);
        let backend = HttpBackend::new(&base, Duration::from_secs(5));
        let info = backend.tumor_info("GLIOMA").unwrap();
        assert_eq!(info.info, "glial");
        let request = server.join().unwrap();
        assert!(request.starts_with("GET /get_tumor_info?tumor_type=GLIOMA "));
    }

    #[test]
    fn test_tumor_info_rejects_error_status() {
        let (base, server) = serve_once("500 Internal Server Error", r#"{"info":"x"}"#);
        let backend = HttpBackend::new(&base, Duration::from_secs(5));
        let err = backend.tumor_info("GLIOMA").unwrap_err();
        assert!(matches!(err, ClientError::Status(500)));
        server.join().unwrap();
    }

    #[test]
    fn test_upload_error_body_parsed_despite_status() {
        let (base, server) = serve_once("400 Bad Request", r#"{"error":"Invalid file format"}"#);
        let backend = HttpBackend::new(&base, Duration::from_secs(5));
        let file = SelectedFile::from_bytes("notes.txt".into(), b"hello".to_vec());
        let reply = backend.classify(&file).unwrap();
        assert_eq!(reply.error.as_deref(), Some("Invalid file format"));
        assert!(reply.result.is_none());
        let request = server.join().unwrap();
        assert!(request.starts_with("POST /upload "));
        assert!(request.contains("multipart/form-data; boundary=----mriscope"));
        assert!(request.contains("hello"));
    }

    #[test]
    fn test_auth_failure_keeps_message() {
        let (base, server) = serve_once(
            "401 Unauthorized",
            r#"{"status":"error","message":"Incorrect password"}"#,
        );
        let backend = HttpBackend::new(&base, Duration::from_secs(5));
        let reply = backend
            .authenticate(AuthForm::Login, &Credentials::new("alice", "nope"))
            .unwrap();
        assert!(!reply.ok);
        assert_eq!(reply.message.as_deref(), Some("Incorrect password"));
        let request = server.join().unwrap();
        assert!(request.starts_with("POST /login "));
        let body = &request[find_head_end(request.as_bytes()).unwrap()..];
        let sent: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(sent["username"], "alice");
        assert_eq!(sent["password"], "nope");
    }

    #[test]
    fn test_undecodable_body_is_decode_error() {
        let (base, server) = serve_once("200 OK", "<html>oops</html>");
        let backend = HttpBackend::new(&base, Duration::from_secs(5));
        let file = SelectedFile::from_bytes("a.png".into(), Vec::new());
        assert!(matches!(
            backend.classify(&file),
            Err(ClientError::Decode(_))
        ));
        server.join().unwrap();
    }

    #[test]
    fn test_decode_error_quotes_body() {
        let (base, server) = serve_once("200 OK", "<html>oops</html>");
        let backend = HttpBackend::new(&base, Duration::from_secs(5));
        match backend.tumor_info("GLIOMA") {
            Err(ClientError::Decode(message)) => assert!(message.contains("<html>oops</html>")),
            other => panic!("expected decode error, got {other:?}"),
        }
        server.join().unwrap();
    }
}
