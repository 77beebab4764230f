#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

mod avatar;
mod config;
mod context;
mod error;
mod physics;
mod projects;
mod reveal;
mod rotator;
mod telemetry;

#[cfg(target_arch = "wasm32")]
mod browser;
#[cfg(target_arch = "wasm32")]
mod frontend;

#[cfg(test)]
mod testing;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("This project is frontend-only. Run `trunk serve` or `trunk build --release`.");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    frontend::run();
}
