use std::future::Future;

use futures::FutureExt;
use tokio::runtime::Handle;
use tracing::{debug, error};

use crate::driver::HashDriver;
use crate::error::HashError;
use crate::models::HashResult;
use crate::reader::ChunkReader;

/// Run `driver` to completion on tokio's blocking pool.
///
/// The work is scheduled immediately; the returned future only waits for it.
/// Dropping the future does not stop the run, its result is simply lost.
/// Must be called from within a tokio runtime.
pub fn run_offloaded<R>(mut driver: HashDriver<R>) -> impl Future<Output = Result<HashResult, HashError>> + Send + 'static
where
    R: ChunkReader + Send + 'static,
{
    let handle = Handle::current();
    let join = tokio::task::spawn_blocking(move || {
        let result = handle.block_on(driver.run());
        debug!(state = ?driver.state(), ok = result.is_ok(), "background run ended");
        result
    });

    join.map(|joined| match joined {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "background hashing task did not complete");
            Err(HashError::Offload(e.to_string()))
        }
    })
}
