//! HTTP adapter: Implementation of `Predictor` against the prediction API.
//!
//! Issues a single `POST {base}/predict` with the JSON-encoded input.
//! Error responses carry `{"detail": ...}`, which becomes the error message.

use std::time::Duration;

use crate::domain::{PredictionInput, PredictionResult};
use crate::ports::{PredictionError, Predictor, DEFAULT_PREDICTION_ERROR};

/// Blocking HTTP client for the prediction service.
pub struct HttpPredictor {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpPredictor {
    /// Create a client for the service rooted at `base_url`.
    ///
    /// `timeout` of `None` waits indefinitely.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built (e.g. TLS backend).
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, PredictionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PredictionError::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/predict", base_url.trim_end_matches('/')),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Predictor for HttpPredictor {
    fn predict(&self, input: &PredictionInput) -> Result<PredictionResult, PredictionError> {
        tracing::debug!("POST {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(input)
            .send()
            .map_err(|e| PredictionError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| PredictionError::Network(e.to_string()))?;

        tracing::debug!(status, bytes = body.len(), "Prediction service responded");
        interpret_response(status, &body)
    }
}

/// Map a raw status and body to a prediction or an error.
fn interpret_response(status: u16, body: &str) -> Result<PredictionResult, PredictionError> {
    if (200..300).contains(&status) {
        return serde_json::from_str(body)
            .map_err(|e| PredictionError::InvalidResponse(e.to_string()));
    }

    let message = error_detail(body).unwrap_or_else(|| DEFAULT_PREDICTION_ERROR.to_string());
    Err(PredictionError::Service(message))
}

/// Pull the `detail` field out of an error body.
///
/// Request validation failures report `detail` as a list of objects with a
/// `msg` field; those messages are joined.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{sample_input, RiskLevel};
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve exactly one request with the given status line and body.
    /// Returns the base URL and a handle yielding the received request body.
    fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Should bind");
        let addr = listener.local_addr().expect("Should have addr");

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().expect("Should accept");
            let mut reader = BufReader::new(stream.try_clone().expect("Should clone"));

            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).expect("Should read header");
                let trimmed = line.trim_end();
                if trimmed.is_empty() {
                    break;
                }
                if let Some((name, value)) = trimmed.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().expect("Should parse length");
                    }
                }
            }

            let mut request_body = vec![0u8; content_length];
            reader.read_exact(&mut request_body).expect("Should read body");

            let mut stream = stream;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).expect("Should respond");
            String::from_utf8(request_body).expect("Should be utf8")
        });

        (format!("http://{addr}"), handle)
    }

    #[test]
    fn test_success_response() {
        let result = interpret_response(
            200,
            r#"{"risk":"low","probability":23.4,"message":"Low risk","timestamp":"2025-01-01T00:00:00Z"}"#,
        )
        .expect("Should parse");

        assert_eq!(result.risk, RiskLevel::Low);
        assert!((result.probability - 23.4).abs() < f64::EPSILON);
        assert_eq!(result.message, "Low risk");
    }

    #[test]
    fn test_detail_becomes_message() {
        let err = interpret_response(500, r#"{"detail":"Error making prediction: boom"}"#)
            .expect_err("Should fail");
        assert_eq!(err, PredictionError::Service("Error making prediction: boom".to_string()));
        assert_eq!(err.to_string(), "Error making prediction: boom");
    }

    #[test]
    fn test_validation_detail_list() {
        let body = r#"{"detail":[{"loc":["body","age"],"msg":"Age must be between 1 and 120 years"}]}"#;
        let err = interpret_response(422, body).expect_err("Should fail");
        assert_eq!(err.to_string(), "Age must be between 1 and 120 years");
    }

    #[test]
    fn test_missing_detail_uses_fallback() {
        let err = interpret_response(502, "<html>Bad Gateway</html>").expect_err("Should fail");
        assert_eq!(err.to_string(), DEFAULT_PREDICTION_ERROR);
    }

    #[test]
    fn test_malformed_success_body() {
        let err = interpret_response(200, r#"{"risk":"low"}"#).expect_err("Should fail");
        assert!(matches!(err, PredictionError::InvalidResponse(_)));
    }

    #[test]
    fn test_endpoint_join() {
        let predictor = HttpPredictor::new("http://localhost:8000/", None).expect("Should build");
        assert_eq!(predictor.endpoint(), "http://localhost:8000/predict");
    }

    #[test]
    fn test_round_trip_against_local_server() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"risk":"high","probability":77.0,"message":"High risk of heart disease","timestamp":"2025-01-01T00:00:00"}"#,
        );

        let predictor =
            HttpPredictor::new(&base, Some(Duration::from_secs(5))).expect("Should build");
        let result = predictor.predict(&sample_input()).expect("Should predict");
        assert!(result.risk.is_high());

        let sent = server.join().expect("Server thread should finish");
        let sent: serde_json::Value = serde_json::from_str(&sent).expect("Should be JSON");
        assert_eq!(sent["restECG"], "Normal");
        assert_eq!(sent["cholesterol"], 250.0);
    }

    #[test]
    fn test_service_error_against_local_server() {
        let (base, server) =
            serve_once("500 Internal Server Error", r#"{"detail":"model offline"}"#);

        let predictor =
            HttpPredictor::new(&base, Some(Duration::from_secs(5))).expect("Should build");
        let err = predictor.predict(&sample_input()).expect_err("Should fail");
        assert_eq!(err, PredictionError::Service("model offline".to_string()));

        server.join().expect("Server thread should finish");
    }

    #[test]
    fn test_connection_refused_is_network_error() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("Should bind");
            listener.local_addr().expect("Should have addr")
        };

        let predictor = HttpPredictor::new(&format!("http://{addr}"), Some(Duration::from_secs(5)))
            .expect("Should build");
        let err = predictor.predict(&sample_input()).expect_err("Should fail");
        assert!(matches!(err, PredictionError::Network(_)));
    }
}
