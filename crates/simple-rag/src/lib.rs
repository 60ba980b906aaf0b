//! Simple RAG - retrieval-augmented-generation over HTTP
//!
//! Accepts documents, embeds them through a remote embedding API, stores them
//! in a remote vector index, and answers questions from the nearest matches.

pub mod server;
