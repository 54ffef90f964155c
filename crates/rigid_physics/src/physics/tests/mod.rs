//! End-to-end scenarios over the whole pipeline
