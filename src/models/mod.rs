pub mod chain;
pub mod nft;
pub mod notification;
pub mod position;

pub use chain::*;
pub use nft::*;
pub use notification::*;
pub use position::*;
