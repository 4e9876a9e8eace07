//! Scripted in-memory server for tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use super::{ApiError, ApiRequest, ApiResponse, Method, Transport};

#[derive(Debug, Clone)]
enum Scripted {
    Reply { status: u16, body: String },
    Unreachable,
}

#[derive(Default)]
struct FakeState {
    routes: HashMap<(Method, String), VecDeque<Scripted>>,
    /// Last reply served per route, repeated once its queue runs dry.
    served: HashMap<(Method, String), Scripted>,
    requests: Vec<ApiRequest>,
}

/// Clones share state, so a test can keep a handle after boxing one into an `ApiClient`.
///
/// Replies queued for a route are consumed in order; the last one served
/// repeats until another is queued. Unscripted routes answer 404.
#[derive(Clone, Default)]
pub(crate) struct FakeTransport {
    state: Rc<RefCell<FakeState>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: Method, path: &str, scripted: Scripted) -> &Self {
        self.state
            .borrow_mut()
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .push_back(scripted);
        self
    }

    pub(crate) fn respond(
        &self,
        method: Method,
        path: &str,
        status: u16,
        body: serde_json::Value,
    ) -> &Self {
        self.push(
            method,
            path,
            Scripted::Reply {
                status,
                body: body.to_string(),
            },
        )
    }

    pub(crate) fn unreachable(&self, method: Method, path: &str) -> &Self {
        self.push(method, path, Scripted::Unreachable)
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.state.borrow().requests.clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.state.borrow().requests.len()
    }

    pub(crate) fn last_request(&self) -> Option<ApiRequest> {
        self.state.borrow().requests.last().cloned()
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut state = self.state.borrow_mut();
        state.requests.push(request.clone());

        let key = (request.method, request.path.clone());
        let next = state.routes.get_mut(&key).and_then(VecDeque::pop_front);
        let scripted = match next {
            Some(reply) => {
                state.served.insert(key, reply.clone());
                Some(reply)
            }
            None => state.served.get(&key).cloned(),
        };

        match scripted {
            Some(Scripted::Reply { status, body }) => Ok(ApiResponse { status, body }),
            Some(Scripted::Unreachable) => Err(ApiError::Transport("connection refused".into())),
            None => Ok(ApiResponse {
                status: 404,
                body: r#"{"message":"not found"}"#.into(),
            }),
        }
    }
}
