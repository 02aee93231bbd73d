//! Graph interchange format (feature `io-graph`).
//!
//! Line-oriented text:
//!
//! ```text
//! <num_nodes>
//! <node payload as JSON>      // one line per node, file order = index
//! <num_arcs>
//! <src> <tgt> <arc payload as JSON>
//! ```
//!
//! Node indices are 0-based and implicit in file order, so re-reading
//! produces an isomorphic graph with the identical index-to-node mapping.
//! Payloads are Serde-encoded JSON documents, one per line.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::graph::{Graph, NodeId, NodeMap};

/// Write `g` in the interchange format. Returns the number of nodes
/// written.
///
/// # Errors
/// Returns an error when the writer fails or a payload cannot be
/// serialized.
pub fn write_graph<G, W>(g: &G, mut w: W) -> Result<usize>
where
    G: Graph,
    G::NodeInfo: Serialize,
    G::ArcInfo: Serialize,
    W: Write,
{
    writeln!(w, "{}", g.num_nodes()).context("write node count")?;
    let mut index = NodeMap::for_graph(g);
    for (i, n) in g.nodes().enumerate() {
        index.insert(n, i);
        let payload =
            serde_json::to_string(g.node(n)).with_context(|| format!("serialize node #{i}"))?;
        writeln!(w, "{payload}").with_context(|| format!("write node #{i}"))?;
    }
    writeln!(w, "{}", g.num_arcs()).context("write arc count")?;
    for (i, a) in g.arcs().enumerate() {
        let s = index[g.src(a)];
        let t = index[g.tgt(a)];
        let payload =
            serde_json::to_string(g.arc(a)).with_context(|| format!("serialize arc #{i}"))?;
        writeln!(w, "{s} {t} {payload}").with_context(|| format!("write arc #{i}"))?;
    }
    w.flush().context("flush graph output")?;
    Ok(g.num_nodes())
}

/// Read a graph in the interchange format. Returns the graph plus the
/// file-order node ids (`result.1[i]` is the node that was at index `i`).
///
/// # Errors
/// Returns an error on malformed input; the message names the offending
/// line.
pub fn read_graph<G, R>(r: R) -> Result<(G, Vec<NodeId>)>
where
    G: Graph + Default,
    G::NodeInfo: DeserializeOwned,
    G::ArcInfo: DeserializeOwned,
    R: BufRead,
{
    let mut lines = r.lines().enumerate();
    let mut next_line = || -> Result<(usize, String)> {
        for (i, line) in lines.by_ref() {
            let line = line.with_context(|| format!("read line {}", i + 1))?;
            if !line.trim().is_empty() {
                return Ok((i + 1, line));
            }
        }
        bail!("unexpected end of input")
    };

    let mut g = G::default();

    let (ln, header) = next_line()?;
    let num_nodes: usize =
        header.trim().parse().with_context(|| format!("parse node count at line {ln}"))?;
    let mut ids = Vec::with_capacity(num_nodes);
    for _ in 0..num_nodes {
        let (ln, line) = next_line()?;
        let info: G::NodeInfo = serde_json::from_str(line.trim())
            .with_context(|| format!("parse node payload at line {ln}"))?;
        ids.push(g.insert_node(info));
    }

    let (ln, header) = next_line()?;
    let num_arcs: usize =
        header.trim().parse().with_context(|| format!("parse arc count at line {ln}"))?;
    for _ in 0..num_arcs {
        let (ln, line) = next_line()?;
        let mut parts = line.trim().splitn(3, ' ');
        let (Some(s), Some(t), Some(payload)) = (parts.next(), parts.next(), parts.next()) else {
            bail!("malformed arc at line {ln}: expected `<src> <tgt> <payload>`");
        };
        let s: usize = s.parse().with_context(|| format!("parse arc source at line {ln}"))?;
        let t: usize = t.parse().with_context(|| format!("parse arc target at line {ln}"))?;
        if s >= ids.len() || t >= ids.len() {
            bail!("arc endpoint out of range at line {ln}");
        }
        let info: G::ArcInfo = serde_json::from_str(payload)
            .with_context(|| format!("parse arc payload at line {ln}"))?;
        g.insert_arc(ids[s], ids[t], info)
            .with_context(|| format!("insert arc from line {ln}"))?;
    }

    Ok((g, ids))
}

/// Write `g` to a file, creating parent directories as needed.
pub fn write_graph_to_path<G>(g: &G, path: impl AsRef<Path>) -> Result<usize>
where
    G: Graph,
    G::NodeInfo: Serialize,
    G::ArcInfo: Serialize,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
    }
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_graph(g, BufWriter::new(f))
}

/// Read a graph from a file.
pub fn read_graph_from_path<G>(path: impl AsRef<Path>) -> Result<(G, Vec<NodeId>)>
where
    G: Graph + Default,
    G::NodeInfo: DeserializeOwned,
    G::ArcInfo: DeserializeOwned,
{
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    read_graph(BufReader::new(f))
}
