pub mod canonical;
pub mod collate;
pub mod country;
pub mod help;
pub mod init;
pub mod logging;
pub mod region;
