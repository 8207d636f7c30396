//! Bounded fan-out over a worker pool.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use rayon::prelude::*;
use rayon::ThreadPool;

use crate::errors::WorkerError;

/// Run `f` over every item on `pool`, returning results in item order.
///
/// A panic inside one task is caught and reported as a [`WorkerError`] for
/// that item; the other tasks still run to completion.
pub fn fan_out<T, R, F>(pool: &ThreadPool, items: &[T], f: F) -> Vec<Result<R, WorkerError>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    pool.install(|| {
        items
            .par_iter()
            .enumerate()
            .map(|(index, item)| {
                catch_unwind(AssertUnwindSafe(|| f(item))).map_err(|payload| WorkerError {
                    index,
                    message: panic_message(payload.as_ref()),
                })
            })
            .collect()
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> std::string::String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<std::string::String>() {
        message.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}
