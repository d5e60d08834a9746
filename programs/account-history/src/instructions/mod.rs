pub mod initialize;
pub mod update;
pub mod initialize_account_close;
pub mod resolve_account_close;

pub use initialize::*;
pub use update::*;
pub use initialize_account_close::*;
pub use resolve_account_close::*;
