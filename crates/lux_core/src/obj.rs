//! Wavefront OBJ mesh parser.
//!
//! Only the subset needed for shading is read:
//!
//! - `v x y z` - vertex positions
//! - `vn x y z` - vertex normals, paired with positions by index
//! - `f a b c ...` - faces; `a`, `a/t`, `a//n` and `a/t/n` forms, negative
//!   (relative) indices, polygons fan-triangulated
//!
//! Every other statement (`vt`, `o`, `g`, `s`, `usemtl`, ...) is ignored.

use std::path::Path;

use lux_math::DVec3;
use thiserror::Error;

use crate::mesh::Mesh;

/// Errors that can occur during OBJ parsing.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Normal count ({normals}) doesn't match vertex count ({positions})")]
    MismatchedNormals { positions: usize, normals: usize },
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Read and parse an OBJ file.
pub fn load_obj<P: AsRef<Path>>(path: P) -> ParseResult<Mesh> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let mesh = parse_obj(&content)?;

    log::info!(
        "Loaded {:?}: {} vertices, {} triangles",
        path,
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    Ok(mesh)
}

/// Parse OBJ text into a mesh.
///
/// Normals, when present, must come one per position. Files without normals
/// get smooth normals computed from the faces.
pub fn parse_obj(content: &str) -> ParseResult<Mesh> {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut faces: Vec<(usize, Vec<i64>)> = Vec::new();

    for (i, raw) in content.lines().enumerate() {
        let line = i + 1;
        let mut tokens = raw.split_whitespace();

        match tokens.next() {
            Some("v") => positions.push(parse_vec3(&mut tokens, line)?),
            Some("vn") => normals.push(parse_vec3(&mut tokens, line)?),
            Some("f") => {
                let indices = tokens
                    .map(|token| parse_face_index(token, line))
                    .collect::<ParseResult<Vec<_>>>()?;
                if indices.len() < 3 {
                    return Err(ParseError::Parse {
                        line,
                        message: format!("face needs at least 3 vertices, got {}", indices.len()),
                    });
                }
                faces.push((line, indices));
            }
            _ => {}
        }
    }

    if !normals.is_empty() && normals.len() != positions.len() {
        return Err(ParseError::MismatchedNormals {
            positions: positions.len(),
            normals: normals.len(),
        });
    }

    let mut indices = Vec::with_capacity(faces.len() * 3);
    for (line, face) in faces {
        let resolved: Option<Vec<u32>> = face
            .iter()
            .map(|&index| resolve_index(index, positions.len()))
            .collect();

        let Some(resolved) = resolved else {
            log::warn!(
                "Skipping face at line {} with out-of-range indices {:?} (vertex count: {})",
                line,
                face,
                positions.len()
            );
            continue;
        };

        for k in 1..resolved.len() - 1 {
            indices.extend_from_slice(&[resolved[0], resolved[k], resolved[k + 1]]);
        }
    }

    let normals = (!normals.is_empty()).then_some(normals);
    let mut mesh = Mesh::new(positions, indices, normals);
    mesh.ensure_normals();
    Ok(mesh)
}

fn parse_vec3<'a>(tokens: &mut impl Iterator<Item = &'a str>, line: usize) -> ParseResult<DVec3> {
    let mut v = [0.0; 3];
    for component in &mut v {
        let token = tokens.next().ok_or_else(|| ParseError::Parse {
            line,
            message: "expected 3 components".to_string(),
        })?;
        *component = token.parse().map_err(|_| ParseError::Parse {
            line,
            message: format!("invalid number '{token}'"),
        })?;
    }
    Ok(DVec3::from_array(v))
}

/// The position index of a face vertex token, still 1-based / relative.
fn parse_face_index(token: &str, line: usize) -> ParseResult<i64> {
    let position = token.split('/').next().unwrap_or(token);
    position.parse().map_err(|_| ParseError::Parse {
        line,
        message: format!("invalid face index '{token}'"),
    })
}

/// Convert a 1-based or negative (relative) OBJ index to a 0-based one.
fn resolve_index(index: i64, count: usize) -> Option<u32> {
    let count = count as i64;
    let resolved = match index {
        i if i > 0 => i - 1,
        i if i < 0 => count + i,
        _ => return None,
    };
    (0..count)
        .contains(&resolved)
        .then(|| u32::try_from(resolved).ok())
        .flatten()
}
