//! Model backends
//!
//! Each backend is feature-gated and implements [`crate::ModelLoader`].

#[cfg(feature = "pocket-tts")]
pub mod pocket_tts;
