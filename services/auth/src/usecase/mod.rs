pub mod login;
pub mod recovery;
pub mod register;
pub mod token;
