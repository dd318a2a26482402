use std::future::Future;

use futures_util::future::{FusedFuture, FutureExt};
use tokio::sync::watch;

/// Runs `fetch` for the current value of `params` and for every later value,
/// handing each completed result to `apply`.
///
/// A new parameter value replaces the in-flight fetch; the superseded future
/// is dropped and its result never reaches `apply`. Returns once the
/// parameter channel is closed and nothing is pending, or with the first
/// error returned by `apply`.
pub async fn switch_to_latest<P, T, E, F, Fut, A>(
    mut params: watch::Receiver<P>,
    mut fetch: F,
    mut apply: A,
) -> Result<(), E>
where
    P: Clone,
    F: FnMut(P) -> Fut,
    Fut: Future<Output = T>,
    A: FnMut(T) -> Result<(), E>,
{
    let first = params.borrow_and_update().clone();
    let pending = fetch(first).fuse();
    tokio::pin!(pending);
    let mut open = true;

    loop {
        tokio::select! {
            biased;

            changed = params.changed(), if open => match changed {
                Ok(()) => {
                    let next = params.borrow_and_update().clone();
                    if !pending.is_terminated() {
                        tracing::debug!("route parameters changed; discarding in-flight fetch");
                    }
                    pending.set(fetch(next).fuse());
                }
                Err(_) => open = false,
            },
            output = &mut pending, if !pending.is_terminated() => apply(output)?,
            else => return Ok(()),
        }
    }
}
