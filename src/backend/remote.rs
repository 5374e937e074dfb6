//! Remote item backend - a PostgREST table (Supabase REST API)
//!
//! Every mutating call asks for `return=representation` so the caller can
//! adopt the row the store actually holds.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::backend::{BackendStatus, ItemBackend};
use crate::config::RemoteSettings;
use crate::error::{MissionError, MissionResult};
use crate::models::{Item, ItemId, NewItem};

/// Column holding the owning category key
const CATEGORY_COLUMN: &str = "system_key";

pub struct RemoteBackend {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    table: String,
}

/// Error body PostgREST sends with non-2xx responses
#[derive(Debug, Deserialize)]
struct ApiError {
    message: Option<String>,
    details: Option<String>,
}

impl RemoteBackend {
    pub fn new(settings: RemoteSettings) -> Self {
        RemoteBackend {
            client: create_client(settings.timeout),
            base_url: settings.url,
            anon_key: settings.anon_key,
            table: settings.table,
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    /// Attach auth headers shared by every call
    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
            .header("Accept", "application/json")
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> MissionResult<reqwest::Response> {
        let resp = self.authorize(builder).send().await.map_err(describe_send_error)?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        Err(MissionError::Backend(describe_status_error(status.as_u16(), &body)))
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: reqwest::RequestBuilder) -> MissionResult<T> {
        let resp = self.send(builder).await?;
        resp.json::<T>()
            .await
            .map_err(|e| MissionError::Backend(format!("Unexpected response: {}", e)))
    }
}

#[async_trait]
impl ItemBackend for RemoteBackend {
    fn status(&self) -> BackendStatus {
        BackendStatus::Remote {
            url: self.base_url.clone(),
        }
    }

    async fn list_items(&self, category_key: &str) -> MissionResult<Vec<Item>> {
        let builder = self.client.get(self.table_url()).query(&[
            ("select", "*".to_string()),
            (CATEGORY_COLUMN, format!("eq.{}", category_key)),
            ("order", "created_at.desc".to_string()),
        ]);
        self.send_json(builder).await
    }

    async fn insert_item(&self, category_key: &str, title: &str) -> MissionResult<Item> {
        let row = NewItem {
            category_key,
            title,
            completed: false,
        };
        let builder = self
            .client
            .post(self.table_url())
            .query(&[("select", "*")])
            .header("Prefer", "return=representation")
            .json(&[row]);
        let rows: Vec<Item> = self.send_json(builder).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| MissionError::Backend(String::from("Insert returned no row")))
    }

    async fn set_completed(&self, id: &ItemId, completed: bool) -> MissionResult<Item> {
        let builder = self
            .client
            .patch(self.table_url())
            .query(&[("id", format!("eq.{}", id)), ("select", "*".to_string())])
            .header("Prefer", "return=representation")
            .json(&serde_json::json!({ "completed": completed }));
        let rows: Vec<Item> = self.send_json(builder).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| MissionError::NotFound(id.clone()))
    }

    async fn delete_item(&self, id: &ItemId) -> MissionResult<()> {
        let builder = self
            .client
            .delete(self.table_url())
            .query(&[("id", format!("eq.{}", id))]);
        self.send(builder).await?;
        Ok(())
    }

    async fn purge_category(&self, category_key: &str) -> MissionResult<usize> {
        let builder = self
            .client
            .delete(self.table_url())
            .query(&[(CATEGORY_COLUMN, format!("eq.{}", category_key))])
            .header("Prefer", "return=representation");
        let rows: Vec<serde_json::Value> = self.send_json(builder).await?;
        Ok(rows.len())
    }
}

fn describe_send_error(e: reqwest::Error) -> MissionError {
    let msg = if e.is_timeout() {
        "Request timed out".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        format!("Request failed: {}", e)
    };
    MissionError::Backend(msg)
}

/// Prefer the API's own message; fall back to status and raw body
fn describe_status_error(status: u16, body: &str) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(ApiError {
            message: Some(message),
            details,
        }) => match details {
            Some(details) if !details.is_empty() => format!("{} ({})", message, details),
            _ => message,
        },
        _ if body.trim().is_empty() => format!("HTTP {}", status),
        _ => format!("HTTP {}: {}", status, body.trim()),
    }
}

/// Create an HTTP client with the configured timeout
pub fn create_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve a single canned response and hand back the raw request head
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            let head_end = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
                if n == 0 {
                    break buf.len();
                }
            };
            let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
            let content_length = head
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            while buf.len() < head_end + content_length {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&buf).to_string()
        });

        (format!("http://{}", addr), handle)
    }

    fn backend(url: String) -> RemoteBackend {
        RemoteBackend::new(RemoteSettings {
            url,
            anon_key: String::from("anon"),
            table: String::from("items"),
            timeout: Duration::from_secs(5),
        })
    }

    #[tokio::test]
    async fn test_list_items_filters_and_orders() {
        let body = r#"[{"id":2,"system_key":"reminders","title":"milk","completed":false,"created_at":"2024-05-02T00:00:00+00:00"},
                       {"id":1,"system_key":"reminders","title":"eggs","completed":true,"created_at":"2024-05-01T00:00:00+00:00"}]"#;
        let (url, handle) = serve_once("200 OK", body).await;

        let items = backend(url).list_items("reminders").await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "milk");

        let request = handle.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("GET /rest/v1/items?"));
        assert!(request_line.contains("system_key=eq.reminders"));
        assert!(request_line.contains("order=created_at.desc"));
        assert!(request.to_lowercase().contains("apikey: anon"));
    }

    #[tokio::test]
    async fn test_toggle_adopts_returned_row() {
        let body = r#"[{"id":7,"system_key":"tasks","title":"call","completed":true,"created_at":"2024-05-02T00:00:00Z"}]"#;
        let (url, handle) = serve_once("200 OK", body).await;

        let item = backend(url).set_completed(&ItemId::Number(7), true).await.unwrap();
        assert!(item.completed);

        let request = handle.await.unwrap();
        assert!(request.starts_with("PATCH /rest/v1/items?id=eq.7"));
        assert!(request.contains(r#"{"completed":true}"#));
    }

    #[tokio::test]
    async fn test_toggle_missing_row_is_not_found() {
        let (url, _handle) = serve_once("200 OK", "[]").await;
        let id = ItemId::Number(7);
        assert_eq!(
            backend(url).set_completed(&id, true).await,
            Err(MissionError::NotFound(id))
        );
    }

    #[tokio::test]
    async fn test_insert_sends_category_column() {
        let body = r#"[{"id":"a1","system_key":"reminders","title":"milk","completed":false,"created_at":"2024-05-02T00:00:00Z"}]"#;
        let (url, handle) = serve_once("201 Created", body).await;

        let item = backend(url).insert_item("reminders", "milk").await.unwrap();
        assert_eq!(item.id, ItemId::Text("a1".into()));

        let request = handle.await.unwrap();
        assert!(request.starts_with("POST /rest/v1/items"));
        assert!(request.contains(r#""system_key":"reminders""#));
        assert!(request.to_lowercase().contains("prefer: return=representation"));
    }

    #[tokio::test]
    async fn test_purge_counts_deleted_rows() {
        let body = r#"[{"id":1,"system_key":"shopping","title":"bread","completed":false,"created_at":"2024-05-01T00:00:00Z"},
                       {"id":2,"system_key":"shopping","title":"milk","completed":true,"created_at":"2024-05-02T00:00:00Z"}]"#;
        let (url, handle) = serve_once("200 OK", body).await;

        assert_eq!(backend(url).purge_category("shopping").await, Ok(2));

        let request = handle.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("DELETE /rest/v1/items?"));
        assert!(request_line.contains("system_key=eq.shopping"));
        assert!(!request_line.contains("id=eq."));
        assert!(request.to_lowercase().contains("prefer: return=representation"));
    }

    #[tokio::test]
    async fn test_delete_targets_single_row() {
        let (url, handle) = serve_once("204 No Content", "").await;

        assert_eq!(backend(url).delete_item(&ItemId::Number(42)).await, Ok(()));

        let request = handle.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("DELETE /rest/v1/items?id=eq.42 "));
        assert!(request.to_lowercase().contains("authorization: bearer anon"));
    }

    #[tokio::test]
    async fn test_error_body_becomes_backend_error() {
        let body = r#"{"code":"42501","message":"permission denied for table items","details":null}"#;
        let (url, _handle) = serve_once("401 Unauthorized", body).await;
        assert_eq!(
            backend(url).delete_item(&ItemId::Number(1)).await,
            Err(MissionError::Backend("permission denied for table items".into()))
        );
    }

    #[test]
    fn test_describe_status_error_without_json() {
        assert_eq!(describe_status_error(502, ""), "HTTP 502");
        assert_eq!(describe_status_error(500, "boom\n"), "HTTP 500: boom");
    }
}
