use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Node,
    Subscription,
    Refresh,
    Config,
    Sort,
    Dedup,
    Setup,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Node => write!(f, "[Node]"),
            Type::Subscription => write!(f, "[Subscription]"),
            Type::Refresh => write!(f, "[Refresh]"),
            Type::Config => write!(f, "[Config]"),
            Type::Sort => write!(f, "[Sort]"),
            Type::Dedup => write!(f, "[Dedup]"),
            Type::Setup => write!(f, "[Setup]"),
        }
    }
}

/// 带类别前缀的日志宏，第三个参数为 `true` 时同时输出到控制台
#[macro_export]
macro_rules! logging {
    ($level:ident, $type:expr, true, $($arg:tt)*) => {
        println!("{} {}", $type, format_args!($($arg)*));
        log::$level!(target: "app", "{} {}", $type, format_args!($($arg)*));
    };

    ($level:ident, $type:expr, false, $($arg:tt)*) => {
        log::$level!(target: "app", "{} {}", $type, format_args!($($arg)*));
    };

    ($level:ident, $type:expr, $($arg:tt)*) => {
        log::$level!(target: "app", "{} {}", $type, format_args!($($arg)*));
    };
}

#[macro_export]
macro_rules! logging_error {
    ($type:expr, true, $($arg:tt)*) => {
        eprintln!("{} {}", $type, format_args!($($arg)*));
        log::error!(target: "app", "{} {}", $type, format_args!($($arg)*));
    };

    ($type:expr, false, $($arg:tt)*) => {
        log::error!(target: "app", "{} {}", $type, format_args!($($arg)*));
    };

    ($type:expr, $($arg:tt)*) => {
        log::error!(target: "app", "{} {}", $type, format_args!($($arg)*));
    };
}
