use std::future::Future;

use tokio::task::JoinHandle;

use crate::{logging, utils::logging::Type};

pub struct AsyncHandler;

impl AsyncHandler {
    /// Spawn onto the ambient tokio runtime. Without one the task is logged
    /// and dropped instead of panicking.
    pub fn spawn<F, Fut, T>(f: F) -> Option<JoinHandle<T>>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => Some(handle.spawn(f())),
            Err(_) => {
                logging!(warn, Type::Refresh, "没有可用的 tokio 运行时，跳过后台任务");
                None
            }
        }
    }
}
