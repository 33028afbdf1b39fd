pub mod common;
pub mod diff;
pub mod init;
pub mod platforms;
pub mod preset;
pub mod serve;
pub mod show;
pub mod status;
pub mod sync;
pub mod update;
