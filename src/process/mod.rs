mod async_handler;

pub use self::async_handler::AsyncHandler;
