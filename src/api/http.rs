//! Blocking HTTP client for the review backend.
//!
//! One request, one response: nothing is retried and nothing is queued.
//! The session travels as a `Cookie` header captured at login.
use super::ReviewApi;
use crate::account::{EmailVerification, PasswordSetup};
use crate::decision::transfer::{TransferApproval, TransferDocumentRejection, TransferRejection};
use crate::decision::{DecisionPayload, DocumentStatusUpdate};
use crate::error::{Result, ReviewError};
use crate::model::{
    ApplicationForReview, ApplicationSummary, ApprovalAudit, CofoDocument, GovernorTransferList,
    OwnershipTransfer, TransferEnvelope,
};
use crate::session::{cookie_header, Actor, UserEnvelope};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use ureq::http::Response;
use ureq::{Agent, Body, RequestBuilder};

/// Actor and (possibly rotated) cookie returned by login or refresh.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub actor: Actor,
    pub cookie: Option<String>,
}

pub struct HttpApi {
    base_url: String,
    agent: Agent,
    cookie: Option<String>,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: Agent::new_with_config(config),
            cookie: None,
        }
    }

    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    fn authorize<B>(&self, request: RequestBuilder<B>) -> RequestBuilder<B> {
        match self.cookie.as_deref() {
            Some(cookie) => request.header("Cookie", cookie),
            None => request,
        }
    }

    pub(crate) fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.authorize(self.agent.get(&self.url(path)));
        let response = check("GET", path, request.call())?;
        decode(path, response)
    }

    /// POST and decode the body when it has the expected shape.
    ///
    /// The request was accepted once the status is 2xx, so an unexpected
    /// body only yields `None`.
    fn post_json_lenient<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>> {
        let request = self.authorize(self.agent.post(&self.url(path)));
        let response = check("POST", path, request.send_json(body))?;
        Ok(decode_accepted(path, response))
    }

    fn post_json_ack<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let request = self.authorize(self.agent.post(&self.url(path)));
        check("POST", path, request.send_json(body))?;
        Ok(())
    }

    fn post_empty_ack(&self, path: &str) -> Result<()> {
        let request = self.authorize(self.agent.post(&self.url(path)));
        check("POST", path, request.send_empty())?;
        Ok(())
    }

    /// Log in with email/password and capture the session cookie.
    ///
    /// Bad credentials are a request error, not a session error.
    pub fn login(&self, email: &str, password: &str) -> Result<Authenticated> {
        let path = "/internal-users/login";
        let body = serde_json::json!({ "email": email, "password": password });
        let mut response = self
            .agent
            .post(&self.url(path))
            .send_json(&body)
            .map_err(ReviewError::from)?;
        let status = response.status().as_u16();
        tracing::debug!(method = "POST", path, status, "backend response");
        if !(200..300).contains(&status) {
            let text = response.body_mut().read_to_string().unwrap_or_default();
            return Err(ReviewError::Request {
                status: Some(status),
                message: backend_message(&text).unwrap_or_else(|| "Login failed".to_string()),
            });
        }
        let cookie = response_cookie(&response);
        let envelope: UserEnvelope = decode(path, response)?;
        let actor = envelope
            .user
            .ok_or_else(|| ReviewError::Request {
                status: Some(status),
                message: "Login failed".to_string(),
            })?;
        Ok(Authenticated { actor, cookie })
    }

    /// Re-read the actor bound to the current cookie.
    pub fn refresh_session(&self) -> Result<Authenticated> {
        let path = "/internal-users/session";
        let request = self.authorize(self.agent.get(&self.url(path)));
        let response = check("GET", path, request.call())?;
        let cookie = response_cookie(&response);
        let envelope: UserEnvelope = decode(path, response)?;
        let actor = envelope
            .user
            .ok_or_else(|| ReviewError::session("session expired; run `cofo-review login`"))?;
        Ok(Authenticated { actor, cookie })
    }

    /// Trade an emailed verification token for a password-setup token.
    pub fn verify_email(&self, token: &str) -> Result<EmailVerification> {
        let path = "/internal-users/verify";
        let url = format!("{}?token={}", self.url(path), urlencoding::encode(token));
        let response = check("GET", path, self.agent.get(&url).call())?;
        decode(path, response)
    }

    /// Set the first password; returns the backend's message, if any.
    pub fn set_password(&self, setup: &PasswordSetup) -> Result<Option<String>> {
        let path = "/internal-users/set-password";
        let request = self.agent.post(&self.url(path));
        let mut response = check("POST", path, request.send_json(setup))?;
        let text = response.body_mut().read_to_string().unwrap_or_default();
        Ok(backend_message(&text))
    }

    pub fn logout(&self) -> Result<()> {
        let path = "/internal-users/logout";
        let request = self.authorize(self.agent.get(&self.url(path)));
        check("GET", path, request.call())?;
        Ok(())
    }
}

impl ReviewApi for HttpApi {
    fn reviewer_applications(&self) -> Result<Vec<ApplicationSummary>> {
        self.get_json("/internal-users/reviewer/applications")
    }

    fn application_for_review(&self, application_id: &str) -> Result<ApplicationForReview> {
        self.get_json(&format!(
            "/internal-users/review/{}",
            urlencoding::encode(application_id)
        ))
    }

    fn submit_decision(
        &self,
        application_id: &str,
        payload: &DecisionPayload,
    ) -> Result<Option<ApprovalAudit>> {
        self.post_json_lenient(
            &format!("/cofo/review/{}", urlencoding::encode(application_id)),
            payload,
        )
    }

    fn update_document_status(
        &self,
        document_id: &str,
        update: &DocumentStatusUpdate,
    ) -> Result<Option<CofoDocument>> {
        self.post_json_lenient(
            &format!(
                "/internal-users/approve-document/{}",
                urlencoding::encode(document_id)
            ),
            update,
        )
    }

    fn governor_transfers(&self) -> Result<GovernorTransferList> {
        self.get_json("/ownership/governor/list")
    }

    fn transfer_for_review(&self, transfer_id: &str) -> Result<OwnershipTransfer> {
        let envelope: TransferEnvelope = self.get_json(&format!(
            "/ownership/governor/review/{}",
            urlencoding::encode(transfer_id)
        ))?;
        Ok(envelope.transfer)
    }

    fn approve_transfer(&self, transfer_id: &str, approval: &TransferApproval) -> Result<()> {
        self.post_json_ack(
            &format!("/ownership/{}/approve", urlencoding::encode(transfer_id)),
            approval,
        )
    }

    fn reject_transfer(&self, transfer_id: &str, rejection: &TransferRejection) -> Result<()> {
        self.post_json_ack(
            &format!("/ownership/{}/reject", urlencoding::encode(transfer_id)),
            rejection,
        )
    }

    fn approve_transfer_document(&self, document_id: &str) -> Result<()> {
        self.post_empty_ack(&format!(
            "/ownership/document/{}/approve",
            urlencoding::encode(document_id)
        ))
    }

    fn reject_transfer_document(
        &self,
        document_id: &str,
        rejection: &TransferDocumentRejection,
    ) -> Result<()> {
        self.post_json_ack(
            &format!("/ownership/document/{}/reject", urlencoding::encode(document_id)),
            rejection,
        )
    }
}

fn check(
    method: &str,
    path: &str,
    result: std::result::Result<Response<Body>, ureq::Error>,
) -> Result<Response<Body>> {
    let mut response = result.map_err(|err| {
        tracing::warn!(method, path, error = %err, "backend unreachable");
        ReviewError::from(err)
    })?;
    let status = response.status().as_u16();
    tracing::debug!(method, path, status, "backend response");
    if (200..300).contains(&status) {
        return Ok(response);
    }
    let text = response.body_mut().read_to_string().unwrap_or_default();
    Err(error_for_status(status, &text))
}

fn decode<T: DeserializeOwned>(path: &str, mut response: Response<Body>) -> Result<T> {
    let text = response.body_mut().read_to_string()?;
    serde_json::from_str(&text).map_err(|err| ReviewError::InvalidResponse {
        path: path.to_string(),
        message: err.to_string(),
    })
}

fn decode_accepted<T: DeserializeOwned>(path: &str, response: Response<Body>) -> Option<T> {
    match decode(path, response) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(path, error = %err, "request accepted but response body not understood");
            None
        }
    }
}

fn response_cookie(response: &Response<Body>) -> Option<String> {
    cookie_header(
        response
            .headers()
            .get_all("set-cookie")
            .iter()
            .filter_map(|value| value.to_str().ok()),
    )
}

/// Map a non-2xx status to the error taxonomy.
pub(crate) fn error_for_status(status: u16, body: &str) -> ReviewError {
    let message = backend_message(body);
    match status {
        401 | 403 => ReviewError::Session(match message {
            Some(message) => format!("{message}; run `cofo-review login`"),
            None => "session expired; run `cofo-review login`".to_string(),
        }),
        _ => ReviewError::Request {
            status: Some(status),
            message: message.unwrap_or_else(|| format!("request failed with status {status}")),
        },
    }
}

/// Pull a human message out of a JSON error body (`message` or `error`).
pub(crate) fn backend_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"].iter().find_map(|key| {
        value
            .get(key)?
            .as_str()
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(str::to_string)
    })
}

pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
