//! The mesh: points, springs, triangles, frontiers and electrical elements
//! (spec §4.1–§4.5, components C1–C5). Each submodule owns one SoA store;
//! [`crate::ship::Ship`] is the only thing that holds all of them together
//! and drives the per-tick ordering between them.

pub mod electrical;
pub mod frontier;
pub mod point;
pub mod spring;
pub mod triangle;
