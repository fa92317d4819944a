pub mod inspect;
pub mod pack;
pub mod rank;
pub mod resolve;

pub use inspect::inspect_command;
pub use pack::pack_command;
pub use rank::rank_command;
pub use resolve::resolve_command;
