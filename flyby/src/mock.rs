use crate::fetch::{AssetRequest, AssetSource};
use std::cell::RefCell;
use thiserror::Error;

/// Answers every request with the same canned body or failure, and remembers
/// the URLs it was asked for.
pub struct MockSource {
    response: Result<String, MockSourceError>,
    requests: RefCell<Vec<String>>,
}

#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct MockSourceError(pub String);

impl MockSource {
    pub fn body(body: impl Into<String>) -> Self {
        Self {
            response: Ok(body.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Err(MockSourceError(message.into())),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Full URLs of every request made so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl AssetSource for MockSource {
    type Error = MockSourceError;

    fn fetch(&self, request: &AssetRequest) -> Result<String, Self::Error> {
        self.requests
            .borrow_mut()
            .push(request.url().to_string());

        self.response.clone()
    }
}
