//! HTTP question bank client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::instrument;

use quizkit_core::model::WireQuestion;
use quizkit_core::traits::{FetchOutcome, QuestionSource};

use crate::error::{from_send_error, BankError};

pub const DEFAULT_BASE_URL: &str = "https://dev.faceittools.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const SUCCESS: &str = "success";

/// Question bank reached over HTTP.
///
/// Searches `GET {base_url}/questions/fetch_questions/{query}`.
pub struct HttpQuestionBank {
    base_url: Url,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpQuestionBank {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BankError> {
        let base_url =
            Url::parse(base_url).map_err(|e| BankError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(BankError::InvalidUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BankError::Network(e.to_string()))?;

        Ok(Self {
            base_url,
            timeout_secs: timeout.as_secs(),
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The search URL for `query`, with the query percent-encoded as a single
    /// path segment.
    pub fn endpoint(&self, query: &str) -> Result<Url, BankError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| BankError::InvalidUrl(self.base_url.to_string()))?;
            segments
                .pop_if_empty()
                .extend(["questions", "fetch_questions", query]);
        }
        Ok(url)
    }
}

impl std::fmt::Debug for HttpQuestionBank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpQuestionBank")
            .field("base_url", &self.base_url.as_str())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Deserialize)]
struct BankResponse {
    status: String,
    #[serde(default)]
    questions: Option<serde_json::Value>,
}

#[async_trait]
impl QuestionSource for HttpQuestionBank {
    fn name(&self) -> &str {
        "faceit"
    }

    #[instrument(skip(self), fields(bank = %self.base_url))]
    async fn fetch(&self, query: &str) -> Result<FetchOutcome, BankError> {
        let url = self.endpoint(query)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| from_send_error(e, self.timeout_secs))?;

        match response.status() {
            StatusCode::NO_CONTENT => {
                tracing::debug!("question bank has no results");
                Ok(FetchOutcome::NoResults)
            }
            StatusCode::OK => {
                let body = response
                    .text()
                    .await
                    .map_err(|e| from_send_error(e, self.timeout_secs))?;
                let decoded: BankResponse =
                    serde_json::from_str(&body).map_err(|e| BankError::Decode(e.to_string()))?;

                if decoded.status != SUCCESS {
                    return Err(BankError::Protocol {
                        status: decoded.status,
                    });
                }

                let questions: Vec<WireQuestion> = match decoded.questions {
                    Some(value) => serde_json::from_value(value)
                        .map_err(|e| BankError::Decode(e.to_string()))?,
                    None => Vec::new(),
                };
                tracing::debug!(count = questions.len(), "fetched questions");
                Ok(FetchOutcome::Questions(questions))
            }
            status => Err(BankError::Transport {
                status: status.as_u16(),
            }),
        }
    }
}

/// Fetch several queries concurrently and concatenate the results in query
/// order. Fails on the first error; `NoResults` only if every query had none.
pub async fn fetch_all(
    source: &dyn QuestionSource,
    queries: &[String],
) -> Result<FetchOutcome, BankError> {
    let outcomes =
        futures::future::try_join_all(queries.iter().map(|query| source.fetch(query))).await?;

    if outcomes.iter().all(|o| matches!(o, FetchOutcome::NoResults)) {
        return Ok(FetchOutcome::NoResults);
    }

    let questions = outcomes
        .into_iter()
        .flat_map(|outcome| match outcome {
            FetchOutcome::Questions(questions) => questions,
            FetchOutcome::NoResults => Vec::new(),
        })
        .collect();
    Ok(FetchOutcome::Questions(questions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn bank(server: &MockServer) -> HttpQuestionBank {
        HttpQuestionBank::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    fn success_body() -> serde_json::Value {
        json!({
            "status": "success",
            "questions": [
                {
                    "type": "MULTIPLE_CHOICE",
                    "body": "What is the derivative of sin(x)?",
                    "answers": ["-cos(x)", "tan(x)", "cos(x)"],
                    "answer": ["cos(x)"]
                },
                { "type": "NUMERIC", "body": "What is 6 * 7?", "answer": "42" }
            ]
        })
    }

    #[test]
    fn endpoint_encodes_query_as_segment() {
        let bank = HttpQuestionBank::new("https://example.com/api/", Duration::from_secs(1)).unwrap();
        let url = bank.endpoint("sin x/cos").unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/api/questions/fetch_questions/sin%20x%2Fcos"
        );
    }

    #[test]
    fn invalid_base_url() {
        let err = HttpQuestionBank::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, BankError::InvalidUrl(_)));

        let err = HttpQuestionBank::new("mailto:someone@example.com", Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, BankError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/questions/fetch_questions/derivatives"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
            .mount(&server)
            .await;

        let outcome = bank(&server).fetch("derivatives").await.unwrap();
        assert_eq!(outcome.len(), 2);
        assert_eq!(outcome.questions()[1].kind, "NUMERIC");
        assert_eq!(outcome.into_pool().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn fetch_encoded_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/questions/fetch_questions/sin%20x"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = bank(&server).fetch("sin x").await.unwrap();
        assert_eq!(outcome.len(), 2);
    }

    #[tokio::test]
    async fn fetch_no_content_is_empty_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let outcome = bank(&server).fetch("nothing").await.unwrap();
        assert_eq!(outcome, FetchOutcome::NoResults);
        assert!(outcome.is_empty());
    }

    #[tokio::test]
    async fn fetch_non_success_status_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "status": "error" })),
            )
            .mount(&server)
            .await;

        let err = bank(&server).fetch("q").await.unwrap_err();
        assert!(matches!(err, BankError::Protocol { ref status } if status == "error"));
        assert_eq!(err.status(), Some(200));
    }

    #[tokio::test]
    async fn fetch_server_error_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = bank(&server).fetch("q").await.unwrap_err();
        assert!(matches!(err, BankError::Transport { status: 500 }));
    }

    #[tokio::test]
    async fn fetch_not_found_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = bank(&server).fetch("q").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn fetch_invalid_json_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = bank(&server).fetch("q").await.unwrap_err();
        assert!(matches!(err, BankError::Decode(_)));
    }

    #[tokio::test]
    async fn fetch_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(success_body())
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let bank = HttpQuestionBank::new(&server.uri(), Duration::from_millis(100)).unwrap();
        let err = bank.fetch("slow").await.unwrap_err();
        assert!(matches!(err, BankError::Timeout(_)));
    }

    #[tokio::test]
    async fn fetch_all_concatenates_in_query_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/questions/fetch_questions/first"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "questions": [{ "type": "TEXT", "body": "first" }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/questions/fetch_questions/empty"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/questions/fetch_questions/second"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "questions": [{ "type": "TEXT", "body": "second" }]
            })))
            .mount(&server)
            .await;

        let bank = bank(&server);
        let queries = vec!["first".to_string(), "empty".to_string(), "second".to_string()];
        let outcome = fetch_all(&bank, &queries).await.unwrap();
        let bodies: Vec<&str> = outcome.questions().iter().map(|q| q.body.as_str()).collect();
        assert_eq!(bodies, vec!["first", "second"]);

        let none = fetch_all(&bank, &["empty".to_string()]).await.unwrap();
        assert_eq!(none, FetchOutcome::NoResults);
    }
}
