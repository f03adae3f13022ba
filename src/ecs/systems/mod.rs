pub mod actions;
pub mod claims;
pub mod notices;
pub mod ownership;
pub mod sieges;
