// 駆動する側アダプター（対話画面）

pub mod cli;

pub use cli::{Cli, CliError};
