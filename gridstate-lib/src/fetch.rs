//! Request bookkeeping shared by the async table variants.
//!
//! Every fetch a table issues gets a monotonically increasing id. Only the
//! most recently issued id may apply its response; anything older resolved
//! too late and is dropped.

use tokio::task::AbortHandle;
use tokio::task::JoinHandle;

/// Identifier of an issued fetch.
pub type RequestId = u64;

/// Tracks the latest issued request id.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct RequestGuard {
    latest: RequestId,
}

impl RequestGuard {
    /// Issues a new id, superseding every earlier one.
    pub fn issue(&mut self) -> RequestId {
        self.latest += 1;
        self.latest
    }

    /// Returns `true` if `id` is the latest issued id.
    pub fn is_current(&self, id: RequestId) -> bool {
        id == self.latest
    }
}

/// Handle to a spawned fetch.
///
/// Dropping the ticket detaches the task; the fetch still runs and applies
/// its result. Await [`FetchTicket::wait`] to know when it settled.
#[derive(Debug)]
#[must_use = "drop the ticket to detach, or call `wait` to await the fetch"]
pub struct FetchTicket {
    id: RequestId,
    handle: JoinHandle<()>,
}

impl FetchTicket {
    pub(crate) fn new(id: RequestId, handle: JoinHandle<()>) -> Self {
        Self { id, handle }
    }

    /// Returns the request id.
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Waits until the fetch settled (applied, discarded, or superseded).
    ///
    /// A panic inside the fetch collaborator is resumed here.
    pub async fn wait(self) {
        if let Err(err) = self.handle.await {
            if err.is_panic() {
                std::panic::resume_unwind(err.into_panic());
            }
        }
    }

    pub(crate) fn abort_handle(&self) -> AbortHandle {
        self.handle.abort_handle()
    }
}
