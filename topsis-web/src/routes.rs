//! HTTP surface: a single form page. `GET /` renders it, `POST /` takes a CSV
//! upload plus weights, impacts and a recipient address, ranks the table and
//! emails the result. Any validation failure is rendered back on the page and
//! nothing is sent.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use lettre::message::Mailbox;
use thiserror::Error;

use topsis::{rank_table, RawTable};

use crate::mailer::{MailError, ResultMailer};

#[derive(Clone)]
pub struct AppState {
    pub mailer: Arc<dyn ResultMailer>,
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/", get(form).post(submit)).with_state(state)
}

#[derive(Debug, Error)]
enum SubmitError {
    #[error("a CSV input file is required")]
    MissingFile,

    #[error("weights, impacts and a recipient address are all required")]
    MissingField,

    #[error("only .csv uploads are supported")]
    UnsupportedUpload,

    #[error("input file is not valid UTF-8 text")]
    BadEncoding,

    #[error("recipient is not a valid email address")]
    BadRecipient,

    #[error("malformed form submission")]
    MalformedForm,

    #[error(transparent)]
    Topsis(#[from] topsis::Error),

    #[error(transparent)]
    Mail(#[from] MailError),
}

async fn form() -> Html<String> {
    Html(page(None))
}

async fn submit(State(state): State<AppState>, multipart: Multipart) -> Html<String> {
    match process(&state, multipart).await {
        Ok(recipient) => {
            tracing::info!(%recipient, "result emailed");
            Html(page(Some(&format!("Result emailed to {recipient}."))))
        }
        Err(error) => {
            tracing::warn!(%error, "submission rejected");
            Html(page(Some(&format!("Error: {error}"))))
        }
    }
}

async fn process(state: &AppState, mut multipart: Multipart) -> Result<Mailbox, SubmitError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut weights: Option<String> = None;
    let mut impacts: Option<String> = None;
    let mut email: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| SubmitError::MalformedForm)?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| SubmitError::MalformedForm)?;
                file = Some((filename, data.to_vec()));
            }
            Some("weights") => {
                weights = Some(field.text().await.map_err(|_| SubmitError::MalformedForm)?)
            }
            Some("impacts") => {
                impacts = Some(field.text().await.map_err(|_| SubmitError::MalformedForm)?)
            }
            Some("email") => {
                email = Some(field.text().await.map_err(|_| SubmitError::MalformedForm)?)
            }
            _ => {}
        }
    }

    let (filename, data) = file
        .filter(|(filename, data)| !filename.is_empty() && !data.is_empty())
        .ok_or(SubmitError::MissingFile)?;
    if !filename.to_ascii_lowercase().ends_with(".csv") {
        return Err(SubmitError::UnsupportedUpload);
    }
    let weights = nonempty(weights).ok_or(SubmitError::MissingField)?;
    let impacts = nonempty(impacts).ok_or(SubmitError::MissingField)?;
    let email = nonempty(email).ok_or(SubmitError::MissingField)?;
    let recipient: Mailbox = email.parse().map_err(|_| SubmitError::BadRecipient)?;

    let text = String::from_utf8(data).map_err(|_| SubmitError::BadEncoding)?;
    let result = rank_table(&RawTable::parse(&text)?, &weights, &impacts)?;

    state
        .mailer
        .send_result(recipient.clone(), result.to_csv())
        .await?;
    Ok(recipient)
}

fn nonempty(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn page(notice: Option<&str>) -> String {
    let notice = notice
        .map(|text| format!("<p class=\"notice\">{text}</p>"))
        .unwrap_or_default();
    format!(
        r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>TOPSIS ranking</title>
<style>
body {{ font-family: sans-serif; max-width: 36rem; margin: 3rem auto; }}
label {{ display: block; margin-top: 1rem; }}
.notice {{ border: 1px solid #888; padding: 0.5rem; }}
</style>
</head>
<body>
<h1>TOPSIS ranking</h1>
{notice}
<p>Upload a CSV table (identifier column plus numeric criteria columns).
The ranked result is emailed to you as an attachment.</p>
<form method="post" action="/" enctype="multipart/form-data">
<label>Input file <input type="file" name="file" accept=".csv" required></label>
<label>Weights (e.g. 1,1,2) <input type="text" name="weights" required></label>
<label>Impacts (e.g. +,+,-) <input type="text" name="impacts" required></label>
<label>Email <input type="email" name="email" required></label>
<button type="submit">Rank and email</button>
</form>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use std::sync::Mutex;
    use tower::ServiceExt;

    const BOUNDARY: &str = "test-boundary";

    #[derive(Default)]
    struct MockMailer {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl ResultMailer for MockMailer {
        async fn send_result(&self, to: Mailbox, csv: String) -> Result<(), MailError> {
            if self.fail {
                return Err(MailError::Send("smtp relay unavailable".to_string()));
            }
            self.sent.lock().unwrap().push((to.to_string(), csv));
            Ok(())
        }
    }

    fn app(mock: Arc<MockMailer>) -> Router {
        router(AppState {
            mailer: mock as Arc<dyn ResultMailer>,
        })
    }

    fn field_part(name: &str, value: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
    }

    fn file_part(filename: &str, content: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: text/csv\r\n\r\n{content}\r\n"
        )
    }

    fn submission(filename: &str, csv: &str, weights: &str, impacts: &str, email: &str) -> Request<Body> {
        let body = format!(
            "{}{}{}{}--{BOUNDARY}--\r\n",
            file_part(filename, csv),
            field_part("weights", weights),
            field_part("impacts", impacts),
            field_part("email", email),
        );
        Request::builder()
            .method("POST")
            .uri("/")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    const CSV: &str = "Model,Price,Storage,Camera\nM1,250,16,12\nM2,200,16,8\nM3,300,32,16\n";

    #[tokio::test]
    async fn form_page_renders() {
        let app = app(Arc::new(MockMailer::default()));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let text = body_text(response).await;
        assert!(text.contains("<form"));
        assert!(text.contains("name=\"weights\""));
    }

    #[tokio::test]
    async fn valid_submission_emails_the_ranked_table() {
        let mock = Arc::new(MockMailer::default());
        let app = app(mock.clone());

        let response = app
            .oneshot(submission("input.csv", CSV, "1,1,1", "-,+,+", "user@example.com"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let text = body_text(response).await;
        assert!(text.contains("Result emailed to"), "page: {text}");

        let sent = mock.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "user@example.com");
        assert!(sent[0]
            .1
            .starts_with("Model,Price,Storage,Camera,Topsis Score,Rank\n"));
        assert_eq!(sent[0].1.lines().count(), 4);
    }

    #[tokio::test]
    async fn invalid_impacts_are_rejected_without_sending() {
        let mock = Arc::new(MockMailer::default());
        let app = app(mock.clone());

        let response = app
            .oneshot(submission("input.csv", CSV, "1,1,1", "+,*,-", "user@example.com"))
            .await
            .unwrap();

        let text = body_text(response).await;
        assert!(text.contains("Error:"), "page: {text}");
        assert!(mock.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_recipient_is_rejected_without_sending() {
        let mock = Arc::new(MockMailer::default());
        let app = app(mock.clone());

        let response = app
            .oneshot(submission("input.csv", CSV, "1,1,1", "-,+,+", "not-an-address"))
            .await
            .unwrap();

        let text = body_text(response).await;
        assert!(text.contains("Error: recipient"), "page: {text}");
        assert!(mock.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_csv_upload_is_rejected() {
        let mock = Arc::new(MockMailer::default());
        let app = app(mock.clone());

        let response = app
            .oneshot(submission("data.xlsx", CSV, "1,1,1", "-,+,+", "user@example.com"))
            .await
            .unwrap();

        let text = body_text(response).await;
        assert!(text.contains("only .csv uploads"), "page: {text}");
        assert!(mock.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn mailer_failure_is_reported() {
        let mock = Arc::new(MockMailer {
            fail: true,
            ..MockMailer::default()
        });
        let app = app(mock.clone());

        let response = app
            .oneshot(submission("input.csv", CSV, "1,1,1", "-,+,+", "user@example.com"))
            .await
            .unwrap();

        let text = body_text(response).await;
        assert!(text.contains("failed to send result email"), "page: {text}");
        assert!(mock.sent.lock().unwrap().is_empty());
    }
}
