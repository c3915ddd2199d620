pub mod console;
pub mod gamepad;
pub mod indicator;
pub mod input;
pub mod sound;
