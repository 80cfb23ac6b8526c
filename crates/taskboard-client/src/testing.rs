//! Test doubles shared by the unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use serde::Serialize;

use crate::collection::Page;
use crate::error::{ApiError, ApiResult};
use crate::http::{ApiRequest, ApiResponse, Transport};
use crate::models::{Project, Task};

enum Reply {
    Ready(ApiResult<ApiResponse>),
    Deferred(oneshot::Receiver<ApiResult<ApiResponse>>),
}

#[derive(Default)]
struct Script {
    replies: VecDeque<Reply>,
    requests: Vec<ApiRequest>,
}

/// Scripted transport: replies are handed out in FIFO order and every
/// request is recorded.
#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    script: Rc<RefCell<Script>>,
}

/// A reply the test releases later, to control resolution order.
pub(crate) struct DeferredReply(oneshot::Sender<ApiResult<ApiResponse>>);

impl DeferredReply {
    pub(crate) fn resolve(self, status: u16, body: &str) {
        let _ = self.0.send(Ok(ApiResponse::new(status, body)));
    }

    pub(crate) fn resolve_json<B: Serialize>(self, status: u16, body: &B) {
        let body = serde_json::to_string(body).expect("serializable test body");
        let _ = self.0.send(Ok(ApiResponse::new(status, body)));
    }
}

impl MockTransport {
    pub(crate) fn reply(&self, status: u16, body: &str) {
        self.push(Reply::Ready(Ok(ApiResponse::new(status, body))));
    }

    pub(crate) fn reply_json<B: Serialize>(&self, status: u16, body: &B) {
        let body = serde_json::to_string(body).expect("serializable test body");
        self.reply(status, &body);
    }

    pub(crate) fn fail(&self, err: ApiError) {
        self.push(Reply::Ready(Err(err)));
    }

    pub(crate) fn defer(&self) -> DeferredReply {
        let (tx, rx) = oneshot::channel();
        self.push(Reply::Deferred(rx));
        DeferredReply(tx)
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.script.borrow().requests.clone()
    }

    pub(crate) fn last_request(&self) -> Option<ApiRequest> {
        self.script.borrow().requests.last().cloned()
    }

    fn push(&self, reply: Reply) {
        self.script.borrow_mut().replies.push_back(reply);
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn execute(&self, request: &ApiRequest) -> ApiResult<ApiResponse> {
        let reply = {
            let mut script = self.script.borrow_mut();
            script.requests.push(request.clone());
            script.replies.pop_front()
        };
        match reply {
            Some(Reply::Ready(result)) => result,
            Some(Reply::Deferred(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(ApiError::Transport("deferred reply dropped".into()))),
            None => Err(ApiError::Transport(format!(
                "no reply scripted for {} {}",
                request.method.as_str(),
                request.path
            ))),
        }
    }
}

pub(crate) fn project(id: i64, title: &str) -> Project {
    Project {
        id,
        title: title.to_string(),
        description: Some(format!("{title} description")),
        total_tasks: 4,
        completed_tasks: 1,
        progress_percentage: 25,
    }
}

pub(crate) fn task(id: i64, title: &str) -> Task {
    Task {
        id,
        title: title.to_string(),
        description: None,
        due_date: None,
        completed: false,
    }
}

pub(crate) fn page_of<T>(content: Vec<T>, total_elements: u64) -> Page<T> {
    Page {
        content,
        total_pages: total_elements.div_ceil(10) as u32,
        total_elements,
        first: true,
        last: total_elements <= 10,
        number: 0,
    }
}
