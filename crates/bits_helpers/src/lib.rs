mod bit;
pub use bit::*;

pub mod floating_label;
pub mod input;
pub mod window_resizing;

mod ribbit_communication;
pub use ribbit_communication::*;

#[cfg(not(target_arch = "wasm32"))]
mod ribbit_simulation;
