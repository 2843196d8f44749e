//! Response channel type shared by every request enum.

use tokio::sync::oneshot;

/// The one-shot sender a request handler answers through.
pub type Response<T, E> = oneshot::Sender<Result<T, E>>;
