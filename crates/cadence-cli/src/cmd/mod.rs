pub mod day;
pub mod init;
pub mod nudge;
pub mod rep;
pub mod rollover;
pub mod roster;
pub mod streak;
pub mod week;
