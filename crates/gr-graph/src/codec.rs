//! Binary graph persistence.
//!
//! # File layout (big-endian)
//!
//! ```text
//! tile_count: u32
//! directory, tile_count entries:
//!     tile_x: i16, tile_y: i16, byte_offset: u32, byte_len: u32
//! tile blocks, each at data_start + byte_offset:
//!     node_count: u32
//!     per node:  osm_id: i64, lat_e6: i32, lon_e6: i32, edge_count: u32
//!     per edge:  target_osm_id: i64, distance_m: u16, max_speed_kmh: u8
//! ```
//!
//! `data_start` is the first byte after the directory; offsets are relative
//! to it.  Tiles are written sorted by key, so output is deterministic for a
//! given graph and offsets ascend monotonically.
//!
//! # Partial loads
//!
//! [`load_bbox`] reads only the directory, tests every tile's rectangular
//! extent against the requested box, and decodes just the intersecting
//! blocks, seeking past the rest via their declared lengths.  The cost is
//! O(tile count) for the directory scan plus the size of the decoded tiles —
//! never proportional to the total node count of the file.  Edges whose
//! target sits in a skipped tile are dropped as expected boundary artifacts.
//!
//! # Failure policy
//!
//! Any structural inconsistency (truncated header, tile span past
//! end-of-file, block content disagreeing with its declared length, unknown
//! edge target on a full load) aborts the load with an error; a partially
//! built graph is never returned.  Writing is not atomic — callers wanting
//! atomic replacement should write to a temporary file and rename.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use tracing::{debug, info};

use gr_core::{BoundingBox, GeoPoint, TileKey};

use crate::error::{GraphError, GraphResult};
use crate::store::{DecodedNode, EdgeMeta, GraphStore};

/// Bytes per directory entry: tile_x + tile_y + offset + length.
const DIR_ENTRY_LEN: u64 = 2 + 2 + 4 + 4;

// ── Save ──────────────────────────────────────────────────────────────────────

/// Serialize `graph` to `path` in the canonical tile format.
pub fn save(graph: &GraphStore, path: &Path) -> GraphResult<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    save_to(graph, &mut out)?;
    out.flush()?;
    info!(
        path = %path.display(),
        tiles = graph.tiles().tile_count(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph saved"
    );
    Ok(())
}

/// Serialize `graph` to an arbitrary writer.
///
/// Two-pass: every tile payload is encoded to an in-memory buffer first so
/// directory offsets are known before any data is emitted.
pub fn save_to<W: Write>(graph: &GraphStore, out: &mut W) -> GraphResult<()> {
    let mut tiles: Vec<(TileKey, &[gr_core::NodeId])> = graph.tiles().iter().collect();
    tiles.sort_unstable_by_key(|&(key, _)| key);

    // Pass 1: encode payloads, record directory entries.
    let mut payload = Vec::new();
    let mut directory = Vec::with_capacity(tiles.len());
    for (key, ids) in &tiles {
        let offset = payload.len() as u32;
        encode_tile(graph, ids, &mut payload)?;
        let len = payload.len() as u32 - offset;
        directory.push((*key, offset, len));
    }

    // Pass 2: header, directory, payloads.
    out.write_u32::<BigEndian>(directory.len() as u32)?;
    for &(key, offset, len) in &directory {
        // Valid coordinates keep tile keys far inside i16 range at the
        // configured tile size; the store rejects invalid coordinates.
        debug_assert!(key.x <= i16::MAX as i32 && key.y <= i16::MAX as i32);
        out.write_i16::<BigEndian>(key.x as i16)?;
        out.write_i16::<BigEndian>(key.y as i16)?;
        out.write_u32::<BigEndian>(offset)?;
        out.write_u32::<BigEndian>(len)?;
    }
    out.write_all(&payload)?;
    Ok(())
}

/// Encode one tile block: node count, then each node with its adjacency.
fn encode_tile(
    graph: &GraphStore,
    ids: &[gr_core::NodeId],
    out: &mut Vec<u8>,
) -> GraphResult<()> {
    out.write_u32::<BigEndian>(ids.len() as u32)?;
    for &id in ids {
        let pos = graph.pos(id);
        out.write_i64::<BigEndian>(graph.osm_id(id))?;
        out.write_i32::<BigEndian>(pos.lat_e6)?;
        out.write_i32::<BigEndian>(pos.lon_e6)?;
        out.write_u32::<BigEndian>(graph.out_degree(id) as u32)?;
        for (to, meta) in graph.out_edges(id) {
            out.write_i64::<BigEndian>(graph.osm_id(to))?;
            out.write_u16::<BigEndian>(meta.distance_m)?;
            out.write_u8(meta.max_speed_kmh)?;
        }
    }
    Ok(())
}

// ── Load ──────────────────────────────────────────────────────────────────────

/// Load the whole graph from `path`.
///
/// The result contains exactly the node and edge set that was saved: ids and
/// coordinates are exact, metadata is exact because quantization already
/// happened at build time.
pub fn load(path: &Path) -> GraphResult<GraphStore> {
    load_impl(path, None)
}

/// Load only the tiles whose extent intersects `bbox`.
pub fn load_bbox(path: &Path, bbox: &BoundingBox) -> GraphResult<GraphStore> {
    load_impl(path, Some(bbox))
}

fn load_impl(path: &Path, filter: Option<&BoundingBox>) -> GraphResult<GraphStore> {
    let file = File::open(path)?;
    let file_len = file.metadata()?.len();
    let mut input = BufReader::new(file);

    let tile_count = read_u32(&mut input, "header")?;
    let data_start = 4 + tile_count as u64 * DIR_ENTRY_LEN;
    if data_start > file_len {
        return Err(GraphError::malformed("directory runs past end of file"));
    }

    // Directory scan: O(tile count), independent of graph size.
    let mut directory = Vec::with_capacity(tile_count as usize);
    for _ in 0..tile_count {
        let x = read_i16(&mut input, "directory")?;
        let y = read_i16(&mut input, "directory")?;
        let offset = read_u32(&mut input, "directory")?;
        let len = read_u32(&mut input, "directory")?;

        let key = TileKey { x: x as i32, y: y as i32 };
        let end = data_start
            .checked_add(offset as u64)
            .and_then(|s| s.checked_add(len as u64))
            .ok_or_else(|| GraphError::malformed(format!("{key}: byte span overflows")))?;
        if end > file_len {
            return Err(GraphError::malformed(format!(
                "{key}: declared span [{offset}, +{len}) runs past end of file"
            )));
        }
        directory.push((key, offset, len));
    }

    let mut nodes = Vec::new();
    let mut skipped = 0usize;
    for &(key, offset, len) in &directory {
        if filter.is_some_and(|bbox| !key.intersects(bbox)) {
            skipped += 1;
            continue;
        }
        input.seek(SeekFrom::Start(data_start + offset as u64))?;
        decode_tile(&mut input, key, len, &mut nodes)?;
    }
    if skipped > 0 {
        debug!(skipped, total = directory.len(), "skipped tiles outside bounding box");
    }

    let graph = GraphStore::from_decoded(nodes, filter.is_some())?;
    info!(
        path = %path.display(),
        tiles = directory.len() - skipped,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        partial = filter.is_some(),
        "graph loaded"
    );
    Ok(graph)
}

/// Decode one tile block of exactly `len` bytes into `nodes`.
fn decode_tile<R: Read>(
    input: &mut R,
    key: TileKey,
    len: u32,
    nodes: &mut Vec<DecodedNode>,
) -> GraphResult<()> {
    // Read the declared span up front; a block that decodes to more or fewer
    // bytes than declared is corrupt.
    let mut block = vec![0u8; len as usize];
    input
        .read_exact(&mut block)
        .map_err(|e| map_eof(e, &format!("{key}: tile data")))?;
    let mut cursor = &block[..];

    let node_count = read_u32(&mut cursor, "tile block")?;
    for _ in 0..node_count {
        let osm_id = cursor
            .read_i64::<BigEndian>()
            .map_err(|e| map_eof(e, &format!("{key}: node record")))?;
        let lat_e6 = read_i32(&mut cursor, "node record")?;
        let lon_e6 = read_i32(&mut cursor, "node record")?;
        let edge_count = read_u32(&mut cursor, "node record")?;

        let mut edges = Vec::with_capacity(edge_count.min(1024) as usize);
        for _ in 0..edge_count {
            let target = cursor
                .read_i64::<BigEndian>()
                .map_err(|e| map_eof(e, &format!("{key}: edge record")))?;
            let distance_m = cursor
                .read_u16::<BigEndian>()
                .map_err(|e| map_eof(e, &format!("{key}: edge record")))?;
            let max_speed_kmh = cursor
                .read_u8()
                .map_err(|e| map_eof(e, &format!("{key}: edge record")))?;
            edges.push((target, EdgeMeta { distance_m, max_speed_kmh }));
        }

        nodes.push(DecodedNode {
            osm_id,
            pos: GeoPoint::from_e6(lat_e6, lon_e6),
            edges,
        });
    }

    if !cursor.is_empty() {
        return Err(GraphError::malformed(format!(
            "{key}: {} trailing bytes after declared content",
            cursor.len()
        )));
    }
    Ok(())
}

// ── Read helpers ──────────────────────────────────────────────────────────────

/// Truncation while reading a structural field is corruption, not plain I/O.
fn map_eof(e: io::Error, what: &str) -> GraphError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        GraphError::malformed(format!("truncated {what}"))
    } else {
        GraphError::Io(e)
    }
}

fn read_u32<R: Read>(r: &mut R, what: &str) -> GraphResult<u32> {
    r.read_u32::<BigEndian>().map_err(|e| map_eof(e, what))
}

fn read_i32<R: Read>(r: &mut R, what: &str) -> GraphResult<i32> {
    r.read_i32::<BigEndian>().map_err(|e| map_eof(e, what))
}

fn read_i16<R: Read>(r: &mut R, what: &str) -> GraphResult<i16> {
    r.read_i16::<BigEndian>().map_err(|e| map_eof(e, what))
}
