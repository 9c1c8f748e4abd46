mod dmarc;
mod dns;
mod email;
mod query;
mod zone;

pub use dmarc::*;
pub use dns::*;
pub use email::*;
pub use query::*;
pub use zone::*;
