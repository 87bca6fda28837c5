//! This project implements fully-dynamic undirected graph connectivity using
//! the Holm-de Lichtenberg-Thorup (HDT) scheme. It supports arbitrary
//! interleaving of edge insertion, edge deletion, and connectivity queries,
//! each in amortized O(lg² n) time or better. See [LevelStructure].
//!
//! ## Usage
//!
//! ```
//! use dynamic_connectivity::LevelStructure;
//!
//! let mut g: LevelStructure<u32> = LevelStructure::new();
//! g.link(1, 2);
//! g.link(2, 3);
//! g.link(1, 3);
//! assert!(g.connected(1, 2));
//! g.cut(1, 2);
//! assert!(g.connected(1, 2)); // still reachable via 3
//! g.cut(1, 3);
//! g.cut(2, 3);
//! assert!(!g.connected(1, 2));
//! ```
//!
//! You can see example usage at `src/bin/demo.rs` and run it with `cargo run`.
//!
//! ## Implementation
//!
//! The structure is layered in three pieces, bottom to top:
//! - A balanced sequence tree ([bst_seq]), an AVL tree over an implicit
//!   sequence addressed by position, supporting merge/split in O(lg n) and a
//!   subtree-aggregated boolean annotation for output-sensitive enumeration.
//! - An Euler-Tour Forest ([euler_tour]) built on top of it, representing
//!   each tree in a forest as one cyclic sequence of directed half-edge
//!   tokens.
//! - A level structure ([level_structure]) stacking `O(lg n)` Euler-Tour
//!   Forests, one per level, classifying each edge as spanning or auxiliary
//!   at its level and running the HDT replacement search on spanning-edge
//!   deletion.
//!
//! Vertices are any `Copy + Eq + Hash + Ord + Debug` type the caller chooses;
//! unmentioned vertices are materialized lazily on first use, there is no
//! separate vertex-insertion call.
//!
//! ## Testing
//!
//! Run the tests using:
//!
//! ```skip
//! cargo test
//! ```
//!
//! Add `-- --ignored` to run the stress tests (which run indefinitely with
//! random data until they fail). Use `cargo bench` to see the benchmarks.
pub mod bst_seq;
pub mod euler_tour;
pub mod level_structure;

pub use euler_tour::EulerTourForest;
pub use level_structure::LevelStructure;
