pub mod dates;
pub mod gate;
pub mod matcher;
pub mod redact;
