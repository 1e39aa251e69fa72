//! trip-lens: LLM analysis of psychedelic trip reports with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
