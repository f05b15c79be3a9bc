use super::backend::StorageBackend;
use super::Record;
use crate::error::{StoreError, StoreResult};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use std::time::Duration;

/// Cloud storage: each record is a JSON document at `{base_url}/{record}`.
///
/// `GET` returning 404 means the record was never written. Any transport
/// failure or other non-success status is reported as `Unavailable`.
pub struct RemoteBackend {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl RemoteBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Unavailable(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn record_url(&self, record: Record) -> String {
        format!("{}/{}", self.base_url, record.key())
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl StorageBackend for RemoteBackend {
    fn read_record(&self, record: Record) -> StoreResult<Option<String>> {
        let url = self.record_url(record);
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .map_err(|e| StoreError::Unavailable(format!("GET {}: {}", url, e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(StoreError::Unavailable(format!(
                "GET {} returned HTTP {}",
                url, status
            )));
        }

        response
            .text()
            .map(Some)
            .map_err(|e| StoreError::Unavailable(format!("GET {}: {}", url, e)))
    }

    fn write_record(&self, record: Record, body: &str) -> StoreResult<()> {
        let url = self.record_url(record);
        let response = self
            .authorize(self.client.put(&url))
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .map_err(|e| StoreError::Unavailable(format!("PUT {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Unavailable(format!(
                "PUT {} returned HTTP {}",
                url, status
            )));
        }
        Ok(())
    }

    fn location(&self) -> String {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve exactly one HTTP response on a random local port and hand back
    /// the base URL plus a handle yielding the raw request.
    fn serve_once(response: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = stream.read(&mut buf).unwrap();
                request.extend_from_slice(&buf[..n]);
                if n == 0 || request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });
        (format!("http://{}/journal/", addr), handle)
    }

    #[test]
    fn record_url_strips_trailing_slash() {
        let backend =
            RemoteBackend::new("https://example.test/db/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            backend.record_url(Record::Diaries),
            "https://example.test/db/diaries"
        );
    }

    #[test]
    fn missing_document_reads_as_none() {
        let (url, server) =
            serve_once("HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
        let backend = RemoteBackend::new(url, Duration::from_secs(5)).unwrap();

        assert_eq!(backend.read_record(Record::Pets).unwrap(), None);
        let request = server.join().unwrap();
        assert!(request.starts_with("GET /journal/pets "));
    }

    #[test]
    fn existing_document_body_is_returned_with_token() {
        let (url, server) = serve_once(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 2\r\nconnection: close\r\n\r\n[]",
        );
        let backend = RemoteBackend::new(url, Duration::from_secs(5))
            .unwrap()
            .with_token("s3cret");

        assert_eq!(
            backend.read_record(Record::Notes).unwrap(),
            Some("[]".to_string())
        );
        let request = server.join().unwrap().to_ascii_lowercase();
        assert!(request.contains("authorization: bearer s3cret"));
    }

    #[test]
    fn server_error_is_unavailable() {
        let (url, server) = serve_once(
            "HTTP/1.1 503 Service Unavailable\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        );
        let backend = RemoteBackend::new(url, Duration::from_secs(5)).unwrap();

        let err = backend.read_record(Record::Stats).unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        server.join().unwrap();
    }

    #[test]
    fn unreachable_host_is_unavailable() {
        // Bind then drop to get a port nothing listens on.
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let url = format!("http://127.0.0.1:{}", port);
        let backend = RemoteBackend::new(url, Duration::from_secs(2)).unwrap();

        let err = backend.write_record(Record::Pets, "[]").unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
