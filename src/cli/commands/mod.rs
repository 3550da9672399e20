//! One module per subcommand.  Each exposes an `execute` function
//! called from `main`.

pub mod add;
pub mod completions;
pub mod edit;
pub mod export;
pub mod get;
pub mod import_cmd;
pub mod init;
pub mod list;
pub mod note;
pub mod remove;
pub mod rotate;
