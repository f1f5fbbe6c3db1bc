pub mod blit;
pub mod context;
pub mod framebuffer;
pub mod interp;
pub mod pipeline;
