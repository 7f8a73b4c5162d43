// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The native presentation collaborator contract.
//!
//! Everything behind this trait is out of scope for the core: window and GL
//! context creation, rasterization, font files, and the blocking run loop
//! that produces input events. The core only consumes the operations below
//! and passes opaque handles through.

use arbor_router::RawEvent;
use arbor_scene::RenderHandle;

/// Opaque font token resolved by the platform.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct FontHandle(pub u64);

/// Operations the native presentation layer must provide.
///
/// Implementations are expected to be single-threaded and re-entrant-free:
/// [`Platform::run_loop`] delivers one event at a time and returns only when
/// the application shuts down.
pub trait Platform {
    /// Current window size in device pixels.
    fn window_size(&self) -> (f64, f64);

    /// Device-pixel-to-logical-unit scale factor.
    fn dpi_scale(&self) -> f64 {
        1.0
    }

    /// Create the native window.
    fn create_window(&mut self, width: f64, height: f64);

    /// Display the tree whose root carries `handle`; `None` clears the
    /// display. The handle is opaque to the core.
    fn set_root(&mut self, handle: Option<RenderHandle>);

    /// Resolve a previously registered font by name.
    fn resolve_font(&self, name: &str) -> Option<FontHandle>;

    /// Register a custom font from a file path.
    fn register_font(&mut self, name: &str, path: &str);

    /// Enter the blocking event loop, invoking `callback` once per raw
    /// event until the loop ends.
    fn run_loop(&mut self, callback: &mut dyn FnMut(RawEvent));
}
