use async_trait::async_trait;
use tokio::sync::Mutex;

use camgate_core::{AppError, AppResult};

use crate::{HttpRequest, HttpResponse, HttpTransport};

enum Reply {
    Respond { status: u16, body: String },
    TimeOut(String),
}

pub(crate) struct RecordingTransport {
    reply: Reply,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    pub(crate) fn responding(status: u16, body: &str) -> Self {
        Self {
            reply: Reply::Respond {
                status,
                body: body.to_owned(),
            },
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn timing_out(message: &str) -> Self {
        Self {
            reply: Reply::TimeOut(message.to_owned()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) async fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn post(&self, request: HttpRequest) -> AppResult<HttpResponse> {
        self.requests.lock().await.push(request);

        match &self.reply {
            Reply::Respond { status, body } => Ok(HttpResponse {
                status: *status,
                body: body.as_bytes().to_vec(),
            }),
            Reply::TimeOut(message) => Err(AppError::Timeout(message.clone())),
        }
    }
}
