//! ASCII PLY point clouds of guide curves.
//!
//! Each control point is one vertex carrying `x y z anchor curve_id
//! layer_id`. `anchor` is 1 on the root of a mesh-bound curve. Layers
//! travel as header comments:
//!
//! ```text
//! comment layer 2 "Fringe" 0.9 0.75 0.22 1
//! ```
//!
//! The reader also accepts files from other tools: without `curve_id` the
//! points are split at `anchor` flags, and without either the whole file
//! is one curve.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info, warn};
use hairguide_guides::{HairCurve, HairGuideSet, Layer};
use hairguide_math::Vec3;
use hairguide_types::constants::SMOOTH_SAMPLES_PER_SEGMENT;
use hairguide_types::{HairError, HairResult, LayerId};

/// Colour given to layers whose comment omits one.
const DEFAULT_LAYER_COLOR: [f32; 3] = [0.90, 0.75, 0.22];

/// How curves are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlyExportOptions {
    /// Write the Catmull-Rom presentation instead of the control points.
    pub smooth: bool,
    /// Catmull-Rom samples per segment when `smooth` is set.
    pub samples_per_segment: usize,
}

impl Default for PlyExportOptions {
    fn default() -> Self {
        Self {
            smooth: false,
            samples_per_segment: SMOOTH_SAMPLES_PER_SEGMENT,
        }
    }
}

/// One curve read from a PLY file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlyCurve {
    /// Points in file order, root first.
    pub points: Vec<Vec3>,
    /// Index of the first point flagged as anchor.
    pub anchor: Option<usize>,
    /// First non-zero `layer_id` seen on the curve's points.
    pub layer: LayerId,
}

/// Contents of a PLY file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlyDocument {
    /// Curves in file order.
    pub curves: Vec<PlyCurve>,
    /// Layers declared in header comments, by ascending id.
    pub layers: Vec<Layer>,
}

// ─── Export ───────────────────────────────────────────────────

/// Writes every visible curve with at least two points. Returns the
/// number of curves written; exporting nothing is an error.
pub fn write_ply<W: Write>(guides: &HairGuideSet, opts: &PlyExportOptions, mut w: W) -> HairResult<usize> {
    let exported: Vec<(&HairCurve, Vec<Vec3>)> = guides
        .curves()
        .iter()
        .enumerate()
        .filter(|(i, c)| guides.is_curve_visible(*i) && c.points.len() >= 2)
        .map(|(_, c)| {
            let points = if opts.smooth {
                c.smooth_points(opts.samples_per_segment)
            } else {
                c.points.clone()
            };
            (c, points)
        })
        .collect();
    if exported.is_empty() {
        return Err(HairError::InvalidCurve(
            "no visible curves with at least 2 points to export".into(),
        ));
    }
    let vertex_count: usize = exported.iter().map(|(_, p)| p.len()).sum();

    writeln!(w, "ply")?;
    writeln!(w, "format ascii 1.0")?;
    writeln!(w, "comment hairguide guide curves")?;
    for layer in guides.layers() {
        let [r, g, b] = layer.color;
        writeln!(
            w,
            "comment layer {} \"{}\" {} {} {} {}",
            layer.id.0,
            layer.name.replace('"', "'"),
            r,
            g,
            b,
            u8::from(layer.visible)
        )?;
    }
    writeln!(w, "element vertex {}", vertex_count)?;
    for prop in ["float x", "float y", "float z", "uchar anchor", "int curve_id", "int layer_id"] {
        writeln!(w, "property {}", prop)?;
    }
    writeln!(w, "end_header")?;

    for (curve_id, (curve, points)) in exported.iter().enumerate() {
        for (i, p) in points.iter().enumerate() {
            let anchor = u8::from(i == 0 && curve.is_bound());
            writeln!(w, "{} {} {} {} {} {}", p.x, p.y, p.z, anchor, curve_id, curve.layer.0)?;
        }
    }
    w.flush()?;
    Ok(exported.len())
}

/// Writes the guides to a PLY file at `path`.
pub fn export_ply(guides: &HairGuideSet, opts: &PlyExportOptions, path: &Path) -> HairResult<usize> {
    let file = File::create(path)?;
    let curves = write_ply(guides, opts, BufWriter::new(file))?;
    info!(path = %path.display(), curves, smooth = opts.smooth, "PLY exported");
    Ok(curves)
}

// ─── Import ───────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Header {
    ascii: bool,
    vertex_count: usize,
    properties: Vec<String>,
    layers: BTreeMap<u16, Layer>,
    end_line: usize,
}

impl Header {
    fn property(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p == name)
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> HairError {
    HairError::Parse {
        line,
        message: message.into(),
    }
}

/// Parses `comment layer <id> "<name>" r g b visible`. Everything after
/// the id is optional.
fn parse_layer_comment(rest: &str) -> Option<Layer> {
    let rest = rest.trim_start();
    let id_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let id: u16 = rest[..id_end].parse().ok()?;
    let rest = rest[id_end..].trim_start();

    let (name, tail) = if let Some(quoted) = rest.strip_prefix('"') {
        match quoted.find('"') {
            Some(end) => (&quoted[..end], &quoted[end + 1..]),
            None => (quoted, ""),
        }
    } else {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        (&rest[..end], &rest[end..])
    };

    let mut values = tail.split_whitespace();
    let mut color = DEFAULT_LAYER_COLOR;
    for c in &mut color {
        match values.next().and_then(|v| v.parse().ok()) {
            Some(v) => *c = v,
            None => break,
        }
    }
    let visible = values
        .next()
        .and_then(|v| v.parse::<i32>().ok())
        .map_or(true, |v| v != 0);

    let name = if name.is_empty() {
        format!("Layer {}", id)
    } else {
        name.to_string()
    };
    let mut layer = Layer::new(LayerId(id), name, color);
    layer.visible = visible;
    Some(layer)
}

fn read_header<R: BufRead>(lines: &mut std::iter::Enumerate<std::io::Lines<R>>) -> HairResult<Header> {
    let mut header = Header::default();
    let mut saw_ply = false;
    let mut in_vertex = false;

    for (index, line) in lines {
        let number = index + 1;
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !saw_ply {
            if line != "ply" {
                return Err(parse_error(number, "Not a PLY file"));
            }
            saw_ply = true;
            continue;
        }

        if let Some(format) = line.strip_prefix("format ") {
            header.ascii = format.contains("ascii");
        } else if let Some(rest) = line.strip_prefix("comment layer ") {
            match parse_layer_comment(rest) {
                Some(layer) => {
                    header.layers.insert(layer.id.0, layer);
                }
                None => debug!(line = number, "ignoring malformed layer comment"),
            }
        } else if let Some(count) = line.strip_prefix("element vertex ") {
            header.vertex_count = count
                .trim()
                .parse()
                .map_err(|_| parse_error(number, format!("invalid vertex count '{}'", count.trim())))?;
            header.properties.clear();
            in_vertex = true;
        } else if line.starts_with("element ") {
            in_vertex = false;
        } else if let Some(prop) = line.strip_prefix("property ") {
            if in_vertex {
                if let Some(name) = prop.split_whitespace().nth(1) {
                    header.properties.push(name.to_string());
                }
            }
        } else if line == "end_header" {
            header.end_line = number;
            return Ok(header);
        }
    }

    if !saw_ply {
        return Err(parse_error(1, "Not a PLY file"));
    }
    Err(parse_error(0, "missing end_header"))
}

/// Collects points into curves according to what the file provides.
#[derive(Default)]
struct CurveBuilder {
    by_id: BTreeMap<i64, PlyCurve>,
    finished: Vec<PlyCurve>,
    current: PlyCurve,
}

impl CurveBuilder {
    fn push_into(curve: &mut PlyCurve, p: Vec3, anchor: bool, layer: u16) {
        if anchor && curve.anchor.is_none() {
            curve.anchor = Some(curve.points.len());
        }
        if curve.layer == LayerId::DEFAULT && layer != 0 {
            curve.layer = LayerId(layer);
        }
        curve.points.push(p);
    }

    fn finish(mut self) -> Vec<PlyCurve> {
        let mut curves = if self.by_id.is_empty() {
            self.finished.push(self.current);
            self.finished
        } else {
            self.by_id.into_values().collect()
        };
        curves.retain(|c| c.points.len() >= 2);
        curves
    }
}

/// Parses an ASCII PLY stream.
pub fn read_ply<R: BufRead>(reader: R) -> HairResult<PlyDocument> {
    let mut lines = reader.lines().enumerate();
    let header = read_header(&mut lines)?;

    if !header.ascii {
        return Err(parse_error(header.end_line, "Only ASCII PLY is supported"));
    }
    if header.vertex_count == 0 {
        return Err(parse_error(header.end_line, "PLY has no vertices"));
    }
    let (Some(ix), Some(iy), Some(iz)) = (
        header.property("x"),
        header.property("y"),
        header.property("z"),
    ) else {
        return Err(parse_error(header.end_line, "PLY is missing x/y/z properties"));
    };
    let i_anchor = header.property("anchor");
    let i_curve = header.property("curve_id");
    let i_layer = header.property("layer_id");
    let split_at_anchors = i_curve.is_none() && i_anchor.is_some();

    let mut builder = CurveBuilder::default();
    let mut read = 0;
    for (index, line) in lines.by_ref() {
        if read == header.vertex_count {
            break;
        }
        let number = index + 1;
        let line = line?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        read += 1;
        if tokens.len() < 3 {
            debug!(line = number, "skipping short vertex line");
            continue;
        }

        let float = |i: usize| -> HairResult<f32> {
            tokens.get(i).map_or(Ok(0.0), |t| {
                t.parse()
                    .map_err(|_| parse_error(number, format!("invalid number '{}'", t)))
            })
        };
        let int = |i: Option<usize>| -> HairResult<i64> {
            match i.and_then(|i| tokens.get(i)) {
                None => Ok(0),
                Some(t) => t
                    .parse()
                    .map_err(|_| parse_error(number, format!("invalid integer '{}'", t))),
            }
        };

        let p = Vec3::new(float(ix)?, float(iy)?, float(iz)?);
        let anchor = int(i_anchor)? == 1;
        let layer = u16::try_from(int(i_layer)?).unwrap_or(0);

        if i_curve.is_some() {
            let id = int(i_curve)?;
            let curve = builder.by_id.entry(id).or_default();
            CurveBuilder::push_into(curve, p, anchor, layer);
        } else {
            if split_at_anchors && anchor && !builder.current.points.is_empty() {
                let done = std::mem::take(&mut builder.current);
                builder.finished.push(done);
            }
            CurveBuilder::push_into(&mut builder.current, p, anchor, layer);
        }
    }
    if read < header.vertex_count {
        warn!(
            expected = header.vertex_count,
            read, "PLY ended before all declared vertices"
        );
    }

    let curves = builder.finish();
    if curves.is_empty() {
        return Err(parse_error(header.end_line, "No curves found"));
    }
    Ok(PlyDocument {
        curves,
        layers: header.layers.into_values().collect(),
    })
}

/// Reads the PLY file at `path`.
pub fn import_ply(path: &Path) -> HairResult<PlyDocument> {
    let file = File::open(path)?;
    let doc = read_ply(BufReader::new(file))?;
    info!(
        path = %path.display(),
        curves = doc.curves.len(),
        layers = doc.layers.len(),
        "PLY imported"
    );
    Ok(doc)
}
