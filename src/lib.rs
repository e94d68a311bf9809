//! Stockroom: a command-line inventory console over `reconcile_engine`.
//!
//! # Example
//! ```rust
//! use reconcile_engine::{MemoryStorage, Reconciler, Schema};
//! use stockroom::console::{parse_assignments, render, Console};
//!
//! let mut console = Console::new(MemoryStorage::new(), Reconciler::new(Schema::inventory()));
//! let fields = parse_assignments(&["name=Drill".to_string(), "quantity=5".to_string()]).unwrap();
//! console.add(fields).unwrap();
//!
//! assert_eq!(render::listing(&console.snapshot().unwrap()), "* Drill\n");
//! ```

pub mod config;
pub mod console;
