//! Email category classification head.
//!
//! Sentence embeddings come from an external encoder; this module owns the
//! small network that maps an embedding to a category label.

pub mod head;

pub use head::{ClassifierHead, DenseLayer, Projection};
