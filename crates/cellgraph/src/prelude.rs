//! Prelude module - common imports for cellgraph users
//!
//! ```rust
//! use cellgraph::prelude::*;
//! ```

pub use crate::{
    // Graph construction and output
    build,
    build_with_options,
    to_dot,
    write_dot,
    DependencyGraph,
    GraphOptions,
    SheetScope,

    // Main types
    Cell,
    CellKind,
    Workbook,
    Worksheet,

    // Error types
    Error,
    Result,

    // Extension traits
    SheetResolver,
    WorkbookExt,
};
