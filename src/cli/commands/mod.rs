//! One module per subcommand.

pub mod add;
pub mod delete;
pub mod get;
pub mod ls;
pub mod new;
pub mod passwd;
pub mod shell;
pub mod show;
