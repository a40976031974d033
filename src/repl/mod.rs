//! Interactive chat front end

mod session;

pub use session::ChatRepl;
