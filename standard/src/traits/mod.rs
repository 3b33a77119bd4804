//! Exports interfaces to allow developers to adapt their own compression implementations
//! for use with the batch builder.

pub mod compression;
