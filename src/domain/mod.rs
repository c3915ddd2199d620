pub mod alphabet;
pub mod code;
pub mod error;
pub mod lookup;
pub mod rules;
pub mod verify;
