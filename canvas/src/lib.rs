//! Scene model and direct-manipulation engine for the structboard whiteboard.
//!
//! This crate is headless. It owns everything that happens between a raw
//! pointer/keyboard event and a mutation of the scene: the element store,
//! snapshot undo/redo, hit-testing, marquee selection, the drag and
//! drop-to-delete gestures, and the literal parser used to seed data-structure
//! widgets. The host (a GUI shell or the `structboard` replay driver) feeds
//! events in and reacts to the returned [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EngineCore`]: event handlers, commands, clipboard |
//! | [`config`] | [`config::BoardConfig`]: viewport, delete zone, history depth |
//! | [`doc`] | Element types and the ordered in-memory store |
//! | [`history`] | Full-snapshot undo/redo stacks |
//! | [`geom`] | Points and axis-aligned bounding boxes |
//! | [`hit`] | Per-kind bounds, point hit-testing, marquee selection |
//! | [`input`] | Tools, modifiers, UI state and the gesture state machine |
//! | [`zone`] | Bottom-right drop-to-delete region |
//! | [`literal`] | `[1,2]` / `[[1,2],[3,4]]` literal parsing |
//! | [`widgets`] | Array, grid, linked-list and deque widgets |
//! | [`consts`] | Shared numeric constants (padding, cell sizes, defaults) |

pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod history;
pub mod hit;
pub mod input;
pub mod literal;
pub mod widgets;
pub mod zone;
