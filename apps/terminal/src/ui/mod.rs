//! Full-screen terminal front end.
//!
//! The main thread renders and reads keys; the backend worker runs the
//! session and reports back through the console channel.
//!
//! ```text
//! ┌ Terminal Archives ───────────────────────────────────────┐
//! │ // Welcome to the Terminal Archives.                     │
//! │ // Connected. 12 papers found in the database.           │
//! │ system@archives:~$ ready                                 │
//! │        ┌ Search the archives ─────────────┐              │
//! │        │ math 2020                        │              │
//! │        └──────────────────────────────────┘              │
//! └──────────────────────────────────────────────────────────┘
//!  Ctrl+K search · Esc close · Enter submit · q quit
//! ```

pub mod app;
pub mod input;
pub mod log;
pub mod modal;
pub mod render;

pub use app::run;
