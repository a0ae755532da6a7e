// Module exports for pure logic
pub mod host;                // Host engine seam + test fake
pub mod navigation;          // Address-bar normalization
pub mod protocol;            // Commands and events
pub mod runtime;             // Coordinator and UI loops
pub mod shortcuts;           // Key and menu accelerators
pub mod tabs;                // Coordinator: registry + active view
pub mod ui;                  // UI Controller mirror
