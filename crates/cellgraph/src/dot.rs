//! Graphviz DOT output

use crate::graph::DependencyGraph;
use std::fmt::{self, Write};

/// Render the graph as a DOT digraph
///
/// The output has no trailing newline; an empty graph is `digraph G {\n}`.
pub fn to_dot(graph: &DependencyGraph) -> String {
    let mut out = String::with_capacity(16 + graph.edge_count() * 32);
    // Writing into a String cannot fail
    let _ = write_dot(graph, &mut out);
    out
}

/// Write the graph as a DOT digraph into any `fmt::Write`
pub fn write_dot<W: Write>(graph: &DependencyGraph, mut out: W) -> fmt::Result {
    out.write_str("digraph G {\n")?;
    for (source, target) in graph.edges() {
        out.write_char('"')?;
        write_escaped(&mut out, source)?;
        out.write_str("\" -> \"")?;
        write_escaped(&mut out, target)?;
        out.write_str("\";\n")?;
    }
    out.write_char('}')
}

/// Escape a node id for use inside a double-quoted DOT string
fn write_escaped<W: Write>(out: &mut W, id: &str) -> fmt::Result {
    for c in id.chars() {
        if c == '"' || c == '\\' {
            out.write_char('\\')?;
        }
        out.write_char(c)?;
    }
    Ok(())
}
