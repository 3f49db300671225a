//! Leaderboard reporter over the browser `fetch` API

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::leaderboard::{
    LeaderboardEntry, ReportError, ScoreReporter, ScoreSubmission, SubmitResponse,
};
use crate::settings::Settings;

/// Talks JSON to the leaderboard server
#[derive(Debug, Clone)]
pub struct FetchReporter {
    submit_url: String,
    leaderboard_url: String,
}

impl FetchReporter {
    pub fn new(submit_url: impl Into<String>, leaderboard_url: impl Into<String>) -> Self {
        Self {
            submit_url: submit_url.into(),
            leaderboard_url: leaderboard_url.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.submit_url.clone(), settings.leaderboard_url.clone())
    }

    /// Run a request and return (HTTP status, ok flag, body text)
    async fn send(&self, request: Request) -> Result<(u16, bool, String), ReportError> {
        let window = web_sys::window().ok_or_else(|| ReportError::Network("no window".into()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_error)?;
        let resp: Response = resp_value.dyn_into().map_err(js_error)?;

        let text_promise = resp.text().map_err(js_error)?;
        let text = JsFuture::from(text_promise)
            .await
            .map_err(js_error)?
            .as_string()
            .unwrap_or_default();

        Ok((resp.status(), resp.ok(), text))
    }
}

impl ScoreReporter for FetchReporter {
    async fn submit(&self, submission: &ScoreSubmission) -> Result<SubmitResponse, ReportError> {
        let body = serde_json::to_string(submission)?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(&body));

        let request = Request::new_with_str_and_init(&self.submit_url, &opts).map_err(js_error)?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(js_error)?;

        let (status, ok, text) = self.send(request).await?;
        log::debug!("Score submission answered with HTTP {}", status);

        // Error responses still carry a JSON status/message body
        match serde_json::from_str::<SubmitResponse>(&text) {
            Ok(response) => Ok(response),
            Err(_) if !ok => Err(ReportError::Http { status }),
            Err(e) => Err(e.into()),
        }
    }

    async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ReportError> {
        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::Cors);

        let request =
            Request::new_with_str_and_init(&self.leaderboard_url, &opts).map_err(js_error)?;
        let (status, ok, text) = self.send(request).await?;
        if !ok {
            return Err(ReportError::Http { status });
        }
        Ok(serde_json::from_str(&text)?)
    }
}

fn js_error(value: JsValue) -> ReportError {
    let msg = value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value));
    ReportError::Network(msg)
}
