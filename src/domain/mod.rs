mod company;
mod invoice;
mod ledger;
mod money;
mod validate;

pub use company::*;
pub use invoice::*;
pub use ledger::*;
pub use money::*;
pub use validate::*;
