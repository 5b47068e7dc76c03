use crate::error::Result;
use reqwest::header::CONTENT_TYPE;
use reqwest::Response;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Fully read HTTP response
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// e.g. `HTTP/1.1 404 Not Found`
    pub status_line: String,
    /// Header names are lowercase
    pub headers: HashMap<String, String>,
    pub content_type: Option<String>,
    pub body: String,
    pub url: String,
}

impl ApiResponse {
    /// Read status, headers and body out of a reqwest response
    pub async fn read(response: Response) -> Result<Self> {
        let status = response.status();
        let status_line = format!(
            "{:?} {} {}",
            response.version(),
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        )
        .trim_end()
        .to_string();
        let url = response.url().to_string();

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value_str) = value.to_str() {
                headers.insert(name.to_string(), value_str.to_string());
            }
        }
        let content_type = headers.get(CONTENT_TYPE.as_str()).cloned();

        let body = response.text().await?;

        Ok(Self {
            status: status.as_u16(),
            status_line,
            headers,
            content_type,
            body,
            url,
        })
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|content_type| content_type.contains("application/json"))
    }

    /// Deserialize the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::response;
    use serde_json::Value;

    #[test]
    fn test_success_range() {
        assert!(response(200, None, "").is_success());
        assert!(response(204, None, "").is_success());
        assert!(!response(301, None, "").is_success());
        assert!(!response(404, None, "").is_success());
    }

    #[test]
    fn test_json_detection_and_decoding() {
        let ok = response(200, Some("application/json; charset=utf-8"), r#"{"id": 3}"#);
        assert!(ok.is_json());
        assert_eq!(ok.json::<Value>().unwrap()["id"], 3);
        assert_eq!(ok.header("Content-Type"), Some("application/json; charset=utf-8"));

        let html = response(502, Some("text/html"), "<html>bad gateway</html>");
        assert!(!html.is_json());
        assert!(html.json::<Value>().is_err());
    }
}
