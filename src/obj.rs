use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{info, warn};
use math::hcm::{point3, Point3};
use shape::TriangleSoup;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: malformed vertex: {text:?}")]
    MalformedVertex { line: usize, text: String },
    #[error("line {line}: malformed face: {text:?}")]
    MalformedFace { line: usize, text: String },
    #[error("line {line}: vertex index {index} out of range (mesh has {count} vertices)")]
    IndexOutOfRange {
        line: usize,
        index: i64,
        count: usize,
    },
}

/// Fan-triangulates one polygon face given as an ordered list of vertex
/// indices: an n-vertex face becomes n-2 triangles, every one sharing the
/// face's first vertex. Faces with fewer than 3 vertices produce nothing.
pub fn fan_triangulate(face: &[usize]) -> Vec<[usize; 3]> {
    if face.len() < 3 {
        return vec![];
    }
    (1..face.len() - 1)
        .map(|i| [face[0], face[i], face[i + 1]])
        .collect()
}

/// Maps one raw OBJ face index to a 0-based vertex offset. OBJ indices are
/// 1-based; negative values count back from the last vertex. `None` for zero
/// or out-of-range values.
fn resolve_index(raw: i64, count: usize) -> Option<usize> {
    if raw > 0 && raw as usize <= count {
        Some(raw as usize - 1)
    } else if raw < 0 && (-raw) as usize <= count {
        Some(count - (-raw) as usize)
    } else {
        None
    }
}

/// Loads a Wavefront OBJ file into a flat triangle soup.
pub fn load_obj(path: &Path) -> Result<TriangleSoup, MeshError> {
    let file = File::open(path).map_err(|source| MeshError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let soup = parse_obj(BufReader::new(file))?;
    info!(
        "loaded {} triangles from {}",
        soup.triangle_count(),
        path.display()
    );
    Ok(soup)
}

/// Parses the OBJ subset the tracer consumes: `v` position lines and `f`
/// faces. Only the position slot of `i/j/k` face tokens is used; texture and
/// normal streams don't feed anything downstream. Faces are collected first
/// and resolved against the complete vertex list, then fan-triangulated into
/// the flat soup, so the multiple-of-3 invariant holds by construction.
pub fn parse_obj(reader: impl BufRead) -> Result<TriangleSoup, MeshError> {
    let mut vertices: Vec<Point3> = vec![];
    // Raw 1-based/negative indices, kept with their line number for errors.
    let mut faces: Vec<(usize, Vec<i64>)> = vec![];
    let mut skipped: HashSet<String> = HashSet::new();

    for (i, line) in reader.lines().enumerate() {
        let number = i + 1;
        let line = line.map_err(|source| MeshError::Io {
            path: String::from("<input>"),
            source,
        })?;
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            None => continue,
            Some("v") => {
                let mut component = || {
                    tokens
                        .next()
                        .and_then(|tok| tok.parse::<f32>().ok())
                        .ok_or_else(|| MeshError::MalformedVertex {
                            line: number,
                            text: line.clone(),
                        })
                };
                let (x, y, z) = (component()?, component()?, component()?);
                vertices.push(point3(x, y, z));
            }
            Some("f") => {
                let raw = tokens
                    .map(|tok| {
                        // "i", "i/j", "i/j/k" and "i//k" all start with the
                        // position index.
                        tok.split('/')
                            .next()
                            .and_then(|first| first.parse::<i64>().ok())
                            .ok_or_else(|| MeshError::MalformedFace {
                                line: number,
                                text: line.clone(),
                            })
                    })
                    .collect::<Result<Vec<i64>, MeshError>>()?;
                if raw.len() < 3 {
                    return Err(MeshError::MalformedFace {
                        line: number,
                        text: line.clone(),
                    });
                }
                faces.push((number, raw));
            }
            Some(head) if head.starts_with('#') => continue,
            Some(head) => {
                if skipped.insert(head.to_string()) {
                    warn!("ignoring unsupported obj element {:?}", head);
                }
            }
        }
    }

    let mut positions = Vec::new();
    for (number, raw) in faces {
        let resolved = raw
            .iter()
            .map(|&index| {
                resolve_index(index, vertices.len()).ok_or(MeshError::IndexOutOfRange {
                    line: number,
                    index,
                    count: vertices.len(),
                })
            })
            .collect::<Result<Vec<usize>, MeshError>>()?;
        for [a, b, c] in fan_triangulate(&resolved) {
            positions.push(vertices[a]);
            positions.push(vertices[b]);
            positions.push(vertices[c]);
        }
    }
    Ok(TriangleSoup::new(positions))
}
