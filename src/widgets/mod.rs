pub mod controls;
pub mod debug;
pub mod fib_strip;
pub mod text_input;
