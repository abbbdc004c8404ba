//! Background render thread
//!
//! Lets the caller start a render loop and keep its own thread free. The
//! worker owns a [`CancelToken`]; stopping it cancels and joins.

use std::thread::{self, JoinHandle};

use crate::cancel::CancelToken;

/// Handle to a render loop running on its own thread
pub struct RenderWorker<T> {
    cancel: CancelToken,
    handle: JoinHandle<T>,
}

impl<T: Send + 'static> RenderWorker<T> {
    /// Spawn `render` on a named thread
    ///
    /// `render` receives the token it must poll.
    pub fn spawn<F>(name: &str, render: F) -> std::io::Result<Self>
    where
        F: FnOnce(CancelToken) -> T + Send + 'static,
    {
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let handle = thread::Builder::new()
            .name(name.to_owned())
            .spawn(move || render(token))?;
        log::debug!("render worker `{name}` started");
        Ok(Self { cancel, handle })
    }

    /// Token shared with the render loop
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Request cancellation and wait for the loop to return
    pub fn stop(self) -> thread::Result<T> {
        self.cancel.cancel();
        self.join()
    }

    /// Wait for the loop to return on its own
    pub fn join(self) -> thread::Result<T> {
        self.handle.join()
    }
}
