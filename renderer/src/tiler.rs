// quill/renderer/src/tiler.rs
//
// Copyright © 2026 The Quill Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The tiler: subdivides transformed paths into a grid of cells and buckets
//! each cell as outside, interior span, or boundary tile.
//!
//! Winding bookkeeping: every curve is walked as a flattened polyline in
//! fixed-point cell coordinates. Each crossing of a horizontal grid line
//! records a signed `Intersection` on that line; prefix sums along a line
//! yield the winding at every tile's top-left corner, which is the winding of
//! the whole left edge within the row (crossings at a curve's minimum y count,
//! at its maximum they do not, so junction hand-offs stay consistent). The
//! fragment shader completes the picture by counting crossings of the ray
//! from the fragment to the tile's left edge against the tile's curve list.

use crate::drawable::{CurvesKind, Drawable, TileVertex, TILE_BANDS};
use crate::paint::PaintType;
use quill_content::cubic_path::CubicMultipath;
use quill_content::fill::FillRule;
use quill_content::flatten;
use quill_content::quadratic_path::QuadraticPath;
use quill_geometry::fixed::F24P8;
use quill_geometry::rect::RectD;
use quill_geometry::vector::{vec2d, vec2i, Vector2D, Vector2F, Vector2I};
use smallvec::SmallVec;

/// Device pixels per tile at the selected level of detail.
pub const TILE_SIDE: f64 = 16.0;

/// Scene-space size of a level-0 tile.
const BASE_CELL_SIZE: f64 = 256.0;

/// Deepest subdivision of the tiling pyramid.
pub const MAX_LOD: u8 = 20;

/// A band directory entry must index curves with a byte.
const MAX_CURVES_PER_TILE: usize = 255;

/// Paint-related data stamped into the emitted vertices.
#[derive(Clone, Copy, Debug)]
pub struct TileAttributes {
    pub color: [u8; 4],
    pub paint_type: PaintType,
    pub blend_mode: u8,
    pub is_even_odd: bool,
}

#[derive(Clone, Copy, Debug)]
struct Intersection {
    /// Crossing position along the grid line, in cell units.
    x: f64,
    sign: i8,
}

#[derive(Clone, Copy, Debug)]
struct TiledCurve {
    points: [Vector2D; 4],
    kind: CurvesKind,
}

impl TiledCurve {
    #[inline]
    fn last_point(&self) -> Vector2D {
        match self.kind {
            CurvesKind::Cubic => self.points[3],
            _ => self.points[2],
        }
    }
}

#[derive(Clone, Default)]
struct Cell {
    curves: SmallVec<[u16; 8]>,
}

pub struct Tiler {
    zoom: f64,
    visible: RectD,
    cell_size: f64,
    lod: u8,
    flattening_tolerance: f64,

    grid_origin: Vector2D,
    grid_size: Vector2I,

    // Per-path scratch, reused across draws.
    curves: Vec<TiledCurve>,
    cells: Vec<Cell>,
    intersections: Vec<Vec<Intersection>>,
    polyline: Vec<Vector2D>,
    tile_offset: Vector2I,
    tile_size: Vector2I,
}

impl Tiler {
    pub fn new() -> Tiler {
        Tiler {
            zoom: 1.0,
            visible: RectD::default(),
            cell_size: BASE_CELL_SIZE,
            lod: 0,
            flattening_tolerance: 0.25,
            grid_origin: Vector2D::default(),
            grid_size: Vector2I::default(),
            curves: vec![],
            cells: vec![],
            intersections: vec![],
            polyline: vec![],
            tile_offset: Vector2I::default(),
            tile_size: Vector2I::default(),
        }
    }

    /// Reconfigures the grid for a frame. Tiles come out roughly
    /// [`TILE_SIDE`] device pixels across at the chosen pyramid level.
    pub fn setup(&mut self, zoom: f64, visible: RectD, flattening_tolerance: f64) {
        let ideal = TILE_SIDE / zoom;
        let level = (BASE_CELL_SIZE / ideal).log2().round();
        self.lod = level.max(0.0).min(MAX_LOD as f64) as u8;
        self.cell_size = BASE_CELL_SIZE / (1 << self.lod as u32) as f64;
        self.zoom = zoom;
        self.visible = visible;
        self.flattening_tolerance = flattening_tolerance;

        // The grid covers a small margin beyond the viewport so cached
        // drawables survive sub-tile camera jitter.
        let padded = visible.dilate(self.cell_size * 2.0);
        self.grid_origin = vec2d((padded.min.x / self.cell_size).floor() * self.cell_size,
                                 (padded.min.y / self.cell_size).floor() * self.cell_size);
        let span = padded.max - self.grid_origin;
        self.grid_size = vec2i((span.x / self.cell_size).ceil() as i32 + 1,
                               (span.y / self.cell_size).ceil() as i32 + 1);
    }

    #[inline]
    pub fn base_cell_size(&self) -> f64 {
        BASE_CELL_SIZE
    }

    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    #[inline]
    pub fn lod(&self) -> u8 {
        self.lod
    }

    /// Tiles a monotone cubic multipath (a fill) into the drawable.
    pub fn tile_cubic(&mut self,
                      path: &CubicMultipath,
                      bounding_rect: &RectD,
                      rule: FillRule,
                      attributes: &TileAttributes,
                      drawable: &mut Drawable) {
        self.curves.clear();
        for range in path.subpath_ranges() {
            let points = &path.path.points[range];
            let mut i = 0;
            while i + 3 < points.len() {
                self.curves.push(TiledCurve {
                    points: [points[i], points[i + 1], points[i + 2], points[i + 3]],
                    kind: CurvesKind::Cubic,
                });
                i += 3;
            }
        }
        self.tile_curves(bounding_rect, rule, attributes, drawable);
    }

    /// Tiles quadratic fill contours (a stroke) into the drawable.
    pub fn tile_quadratic(&mut self,
                          contours: &[QuadraticPath],
                          bounding_rect: &RectD,
                          rule: FillRule,
                          attributes: &TileAttributes,
                          drawable: &mut Drawable) {
        self.curves.clear();
        for contour in contours {
            for index in 0..contour.len() {
                let curve = contour.curve(index);
                self.curves.push(TiledCurve {
                    points: [curve.p0, curve.p1, curve.p2, Vector2D::default()],
                    kind: CurvesKind::Quadratic,
                });
            }
        }
        self.tile_curves(bounding_rect, rule, attributes, drawable);
    }

    fn tile_curves(&mut self,
                   bounding_rect: &RectD,
                   rule: FillRule,
                   attributes: &TileAttributes,
                   drawable: &mut Drawable) {
        if self.curves.is_empty() {
            return;
        }
        if self.curves.len() > u16::max_value() as usize {
            warn!("path has {} curves; truncating to 65535", self.curves.len());
            self.curves.truncate(u16::max_value() as usize);
        }

        // Outside bucket: nothing visible, or a degenerate point/line rect.
        let padded = self.visible.dilate(self.cell_size * 2.0);
        let clipped = match bounding_rect.intersection(&padded) {
            Some(clipped) => clipped,
            None => return,
        };
        if clipped.width() == 0.0 || clipped.height() == 0.0 {
            return;
        }

        let tile_min = self.cell_of(clipped.min);
        let tile_max = self.cell_of(clipped.max) + vec2i(1, 1);
        let tile_min = tile_min.max(Vector2I::default());
        let tile_max = tile_max.min(self.grid_size);
        self.tile_offset = tile_min;
        self.tile_size = tile_max - tile_min;
        if self.tile_size.x <= 0 || self.tile_size.y <= 0 {
            return;
        }

        let cell_count = self.tile_size.x as usize * self.tile_size.y as usize;
        self.cells.clear();
        self.cells.resize(cell_count, Cell::default());
        self.intersections.clear();
        self.intersections.resize(self.tile_size.y as usize + 1, vec![]);

        self.walk_curves();
        self.emit(rule, attributes, drawable);
        debug!("tiled {} curves into {} tiles / {} fills",
               self.curves.len(),
               drawable.tiles.len() / 4,
               drawable.fills.len() / 4);
    }

    #[inline]
    fn cell_of(&self, p: Vector2D) -> Vector2I {
        vec2i(((p.x - self.grid_origin.x) / self.cell_size).floor() as i32,
              ((p.y - self.grid_origin.y) / self.cell_size).floor() as i32)
    }

    /// Scene coordinates of a cell's min corner, the cell given in grid
    /// coordinates.
    #[inline]
    fn cell_origin(&self, cell: Vector2I) -> Vector2D {
        self.grid_origin + cell.to_f64() * self.cell_size
    }

    /// Converts a scene point to quantized cell-unit coordinates relative to
    /// the tile range origin.
    #[inline]
    fn to_cell_units(&self, p: Vector2D) -> Vector2D {
        let origin = self.cell_origin(self.tile_offset);
        let local = (p - origin) / self.cell_size;
        vec2d(F24P8::from_f64(local.x).to_f64(), F24P8::from_f64(local.y).to_f64())
    }

    fn walk_curves(&mut self) {
        let tolerance = self.flattening_tolerance / self.zoom;
        for curve_index in 0..self.curves.len() {
            let curve = self.curves[curve_index];

            let mut polyline = std::mem::replace(&mut self.polyline, vec![]);
            polyline.clear();
            polyline.push(self.to_cell_units(curve.points[0]));
            match curve.kind {
                CurvesKind::Cubic => {
                    let cubic = quill_content::bezier::CubicBezier::new(curve.points[0],
                                                                        curve.points[1],
                                                                        curve.points[2],
                                                                        curve.points[3]);
                    let this = &*self;
                    flatten::flatten_cubic(&cubic, tolerance, &mut |p| {
                        polyline.push(this.to_cell_units(p));
                    });
                }
                CurvesKind::Quadratic => {
                    if curve.points[1] != curve.points[2] {
                        let quad = quill_content::bezier::QuadraticBezier::new(curve.points[0],
                                                                               curve.points[1],
                                                                               curve.points[2]);
                        let cubic = quad.to_cubic();
                        let this = &*self;
                        flatten::flatten_cubic(&cubic, tolerance, &mut |p| {
                            polyline.push(this.to_cell_units(p));
                        });
                    }
                }
                CurvesKind::None => {}
            }
            polyline.push(self.to_cell_units(curve.last_point()));

            for i in 1..polyline.len() {
                self.walk_segment(polyline[i - 1], polyline[i], curve_index as u16);
            }
            self.polyline = polyline;
        }
    }

    /// Records the horizontal grid line crossings of one polyline segment and
    /// marks every cell it passes through. Coordinates are cell units
    /// relative to the tile range.
    fn walk_segment(&mut self, a: Vector2D, b: Vector2D, curve: u16) {
        // Crossings, with the min-y-inclusive / max-y-exclusive convention.
        let (min_y, max_y) = if a.y < b.y { (a.y, b.y) } else { (b.y, a.y) };
        if min_y < max_y {
            let sign = if b.y > a.y { -1 } else { 1 };
            let dxdy = (b.x - a.x) / (b.y - a.y);
            let first_line = min_y.ceil().max(0.0);
            let last_line = max_y.min(self.tile_size.y as f64 + 1.0);
            let mut line = first_line;
            while line < last_line {
                if line < max_y {
                    let row = line as i32;
                    if row >= 0 && row <= self.tile_size.y {
                        let x = a.x + dxdy * (line - a.y);
                        self.intersections[row as usize].push(Intersection { x, sign });
                    }
                }
                line += 1.0;
            }
        }

        // Cell marking via grid traversal.
        let mut cell = vec2i(a.x.floor() as i32, a.y.floor() as i32);
        let end_cell = vec2i(b.x.floor() as i32, b.y.floor() as i32);
        self.mark_cell(cell, curve);

        let delta = b - a;
        let step = vec2i(if delta.x > 0.0 { 1 } else { -1 }, if delta.y > 0.0 { 1 } else { -1 });
        let mut t_max_x = if delta.x == 0.0 {
            f64::INFINITY
        } else {
            let next = if delta.x > 0.0 { cell.x as f64 + 1.0 } else { cell.x as f64 };
            (next - a.x) / delta.x
        };
        let mut t_max_y = if delta.y == 0.0 {
            f64::INFINITY
        } else {
            let next = if delta.y > 0.0 { cell.y as f64 + 1.0 } else { cell.y as f64 };
            (next - a.y) / delta.y
        };
        let t_delta_x = if delta.x == 0.0 { f64::INFINITY } else { (1.0 / delta.x).abs() };
        let t_delta_y = if delta.y == 0.0 { f64::INFINITY } else { (1.0 / delta.y).abs() };

        let mut guard = (self.tile_size.x + self.tile_size.y) as usize * 4 + 8;
        while cell != end_cell && guard > 0 {
            guard -= 1;
            if t_max_x < t_max_y {
                t_max_x += t_delta_x;
                cell.x += step.x;
            } else {
                t_max_y += t_delta_y;
                cell.y += step.y;
            }
            self.mark_cell(cell, curve);
            if t_max_x > 1.0 && t_max_y > 1.0 && cell != end_cell {
                // Numeric drift; land on the end cell directly.
                self.mark_cell(end_cell, curve);
                break;
            }
        }
    }

    fn mark_cell(&mut self, cell: Vector2I, curve: u16) {
        if cell.x < 0 || cell.y < 0 || cell.x >= self.tile_size.x || cell.y >= self.tile_size.y {
            return;
        }
        let index = cell.y as usize * self.tile_size.x as usize + cell.x as usize;
        let curves = &mut self.cells[index].curves;
        if curves.last() != Some(&curve) {
            curves.push(curve);
        }
    }

    /// Converts the per-cell bookkeeping into spans and boundary tiles on the
    /// drawable.
    fn emit(&mut self, rule: FillRule, attributes: &TileAttributes, drawable: &mut Drawable) {
        drawable.lod = self.lod;

        for j in 0..self.tile_size.y {
            let mut row = std::mem::replace(&mut self.intersections[j as usize], vec![]);
            row.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap());

            let mut next_crossing = 0;
            let mut winding = 0i32;
            let mut span_start: Option<i32> = None;

            for i in 0..self.tile_size.x {
                let left_edge = i as f64;
                while next_crossing < row.len() && row[next_crossing].x < left_edge {
                    winding += row[next_crossing].sign as i32;
                    next_crossing += 1;
                }

                let cell_index = j as usize * self.tile_size.x as usize + i as usize;
                if self.cells[cell_index].curves.is_empty() {
                    if rule.includes(winding) {
                        if span_start.is_none() {
                            span_start = Some(i);
                        }
                    } else {
                        self.flush_span(&mut span_start, i, j, attributes, drawable);
                    }
                } else {
                    self.flush_span(&mut span_start, i, j, attributes, drawable);
                    self.emit_boundary_tile(vec2i(i, j), winding, attributes, drawable);
                }
            }
            self.flush_span(&mut span_start, self.tile_size.x, j, attributes, drawable);
        }
    }

    /// Emits the pending run of interior cells as one quad.
    fn flush_span(&mut self,
                  span_start: &mut Option<i32>,
                  end: i32,
                  j: i32,
                  attributes: &TileAttributes,
                  drawable: &mut Drawable) {
        let start = match span_start.take() {
            Some(start) => start,
            None => return,
        };
        let min = self.cell_origin(self.tile_offset + vec2i(start, j));
        let max = self.cell_origin(self.tile_offset + vec2i(end, j + 1));
        let tex_coords = quad_tex_coords(&drawable.bounding_rect, min, max);
        let attr_1 =
            crate::drawable::FillVertex::create_attr_1(attributes.blend_mode,
                                                       attributes.paint_type);
        let attr_2 = crate::drawable::FillVertex::create_attr_2(0, 0);
        drawable.push_fill(min.to_f32(), max.to_f32(), attributes.color, &tex_coords, attr_1,
                           attr_2);
    }

    fn emit_boundary_tile(&mut self,
                          cell: Vector2I,
                          winding: i32,
                          attributes: &TileAttributes,
                          drawable: &mut Drawable) {
        let cell_index = cell.y as usize * self.tile_size.x as usize + cell.x as usize;
        let mut curve_indices: SmallVec<[u16; 8]> =
            std::mem::replace(&mut self.cells[cell_index].curves, SmallVec::new());
        curve_indices.sort();
        curve_indices.dedup();
        if curve_indices.len() > MAX_CURVES_PER_TILE {
            warn!("boundary tile overflows {} curves; truncating", MAX_CURVES_PER_TILE);
            curve_indices.truncate(MAX_CURVES_PER_TILE);
        }

        let tile_origin = self.cell_origin(self.tile_offset + cell);
        let inv_cell = 1.0 / self.cell_size;

        // Tile-local curve records, sorted by their minimum y so each band
        // maps to a compact index range.
        let mut local: SmallVec<[([Vector2F; 4], f32, f32); 8]> = SmallVec::new();
        let kind = self.curves[curve_indices[0] as usize].kind;
        for &curve_index in &curve_indices {
            let curve = &self.curves[curve_index as usize];
            let point_count = if curve.kind == CurvesKind::Cubic { 4 } else { 3 };
            let mut points = [Vector2F::default(); 4];
            let mut y_min = f32::INFINITY;
            let mut y_max = f32::NEG_INFINITY;
            for p in 0..point_count {
                let local_point = ((curve.points[p] - tile_origin) * inv_cell).to_f32();
                points[p] = local_point;
                y_min = y_min.min(local_point.y);
                y_max = y_max.max(local_point.y);
            }
            local.push((points, y_min, y_max));
        }
        local.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());

        let curves_offset = drawable.curve_records();
        if curves_offset + local.len().max(TILE_BANDS) >= 1 << 20 {
            warn!("drawable curve blob overflows the 20-bit offset; dropping tile");
            return;
        }

        for (points, _, _) in &local {
            drawable.push_curve4(points[0], points[1], points[2], points[3]);
        }

        // The band directory: one (first, count) entry per horizontal slice.
        let band_height = 1.0 / TILE_BANDS as f32;
        for band in 0..TILE_BANDS {
            let band_min = band as f32 * band_height;
            let band_max = band_min + band_height;
            let mut first = 0usize;
            let mut last = 0usize;
            let mut found = false;
            for (index, &(_, y_min, y_max)) in local.iter().enumerate() {
                if y_min >= band_max {
                    break;
                }
                if y_max <= band_min {
                    continue;
                }
                if !found {
                    first = index;
                    found = true;
                }
                last = index + 1;
            }
            let count = if found { last - first } else { 0 };
            drawable.bands.push(((first as u16) << 8) | count as u16);
        }

        // Keep the curve records and band slots in lockstep so a tile's band
        // directory always lives at its curves offset.
        for _ in local.len()..TILE_BANDS {
            drawable.push_curve4(Vector2F::default(),
                                 Vector2F::default(),
                                 Vector2F::default(),
                                 Vector2F::default());
        }
        for _ in TILE_BANDS..local.len() {
            drawable.bands.push(0);
        }
        debug_assert_eq!(drawable.curve_records(), drawable.bands.len());

        let min = tile_origin;
        let max = self.cell_origin(self.tile_offset + cell + vec2i(1, 1));
        let tex_coords = quad_tex_coords(&drawable.bounding_rect, min, max);

        let winding = winding.max(-32768).min(32767);
        let attr_1 = TileVertex::create_attr_1(attributes.blend_mode,
                                               attributes.paint_type,
                                               curves_offset as u32);
        let attr_2 =
            TileVertex::create_attr_2(0, kind, attributes.is_even_odd, 0);
        let attr_3 = TileVertex::create_attr_3(winding, local.len() as u16);
        drawable.push_tile(min.to_f32(),
                           max.to_f32(),
                           Vector2F::default(),
                           Vector2F { x: 1.0, y: 1.0 },
                           &tex_coords,
                           attributes.color,
                           attr_1,
                           attr_2,
                           attr_3);
    }
}

/// Paint texture coordinates of a quad, normalized over the drawable bounds.
fn quad_tex_coords(bounds: &RectD, min: Vector2D, max: Vector2D) -> [Vector2F; 4] {
    let size = bounds.size();
    let scale = vec2d(if size.x > 0.0 { 1.0 / size.x } else { 0.0 },
                      if size.y > 0.0 { 1.0 / size.y } else { 0.0 });
    let lo = vec2d((min.x - bounds.min.x) * scale.x, (min.y - bounds.min.y) * scale.y).to_f32();
    let hi = vec2d((max.x - bounds.min.x) * scale.x, (max.y - bounds.min.y) * scale.y).to_f32();
    [lo, Vector2F { x: hi.x, y: lo.y }, hi, Vector2F { x: lo.x, y: hi.y }]
}

/// A CPU mirror of the tile fragment shader, used to validate the tiler's
/// winding bookkeeping.
#[cfg(any(test, feature = "debug_overlay"))]
pub fn evaluate_winding_at(drawable: &Drawable, p: Vector2D) -> Option<i32> {
    use quill_content::bezier::CubicBezier;

    for quad in drawable.tiles.chunks(4) {
        let min = quad[0].position.to_f64();
        let max = quad[2].position.to_f64();
        if p.x < min.x || p.x >= max.x || p.y < min.y || p.y >= max.y {
            continue;
        }

        let vertex = &quad[0];
        let offset = vertex.curves_offset() as usize;
        let count = vertex.curves_count() as usize;
        let kind = (vertex.attr_2 >> 10) & 3;
        let mut winding = vertex.winding();

        let local = vec2d((p.x - min.x) / (max.x - min.x), (p.y - min.y) / (max.y - min.y));
        let band = ((local.y * TILE_BANDS as f64) as usize).min(TILE_BANDS - 1);
        let entry = drawable.bands[offset + band];
        let first = (entry >> 8) as usize;
        let band_count = (entry & 0xff) as usize;
        debug_assert!(first + band_count <= count);

        for record in first..first + band_count {
            let base = (offset + record) * 4;
            let p0 = drawable.curves[base].to_f64();
            let p1 = drawable.curves[base + 1].to_f64();
            let p2 = drawable.curves[base + 2].to_f64();
            let is_cubic = kind == CurvesKind::Cubic as u32;
            let end = if is_cubic { drawable.curves[base + 3].to_f64() } else { p2 };

            let (y0, y3) = (p0.y, end.y);
            if y0 == y3 {
                continue;
            }
            let (y_min, y_max, sign) = if y3 > y0 { (y0, y3, -1) } else { (y3, y0, 1) };
            if local.y < y_min || local.y >= y_max {
                continue;
            }
            let x = if is_cubic {
                let curve = CubicBezier::new(p0, p1, p2, end);
                quill_content::cubic_path::monotone_x_at_y(&curve, local.y)
            } else {
                let quad_curve = quill_content::bezier::QuadraticBezier::new(p0, p1, p2);
                quadratic_x_at_y(&quad_curve, local.y)
            };
            if x >= 0.0 && x < local.x {
                winding += sign;
            }
        }
        return Some(winding);
    }
    None
}

#[cfg(any(test, feature = "debug_overlay"))]
fn quadratic_x_at_y(curve: &quill_content::bezier::QuadraticBezier, y: f64) -> f64 {
    let a = curve.p0.y - 2.0 * curve.p1.y + curve.p2.y;
    let b = 2.0 * (curve.p1.y - curve.p0.y);
    let c = curve.p0.y - y;
    let t = if a.abs() < 1e-12 {
        -c / b
    } else {
        let mut roots = [0.0; 2];
        let count = quill_content::bezier::solve_quadratic(a, b, c, &mut roots);
        match count {
            0 => 0.5,
            _ => {
                if roots[0] >= -1e-9 && roots[0] <= 1.0 + 1e-9 {
                    roots[0]
                } else {
                    roots[1]
                }
            }
        }
    };
    let t = t.max(0.0).min(1.0);
    let u = 1.0 - t;
    u * u * curve.p0.x + 2.0 * u * t * curve.p1.x + t * t * curve.p2.x
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawable::Drawable;
    use quill_content::cubic_path::CubicPath;

    fn attrs() -> TileAttributes {
        TileAttributes {
            color: [255, 0, 0, 255],
            paint_type: PaintType::Color,
            blend_mode: 0,
            is_even_odd: false,
        }
    }

    fn tiler_for_viewport() -> Tiler {
        let mut tiler = Tiler::new();
        tiler.setup(1.0, RectD::new(vec2d(0.0, 0.0), vec2d(800.0, 600.0)), 0.25);
        tiler
    }

    fn triangle() -> CubicMultipath {
        let mut path = CubicPath::new();
        path.move_to(vec2d(0.0, 0.0));
        path.line_to(vec2d(100.0, 0.0));
        path.line_to(vec2d(50.0, 100.0));
        path.close();
        CubicMultipath::from(path)
    }

    fn tile_multipath(tiler: &mut Tiler, path: &CubicMultipath, rule: FillRule) -> Drawable {
        let bounds = path.path.bounding_rect();
        let mut drawable = Drawable::new(bounds, bounds);
        tiler.tile_cubic(path, &bounds, rule, &attrs(), &mut drawable);
        drawable
    }

    /// The winding at a probe point, whichever bucket it landed in.
    fn winding_at(drawable: &Drawable, p: Vector2D, rule: FillRule) -> Option<i32> {
        if let Some(winding) = evaluate_winding_at(drawable, p) {
            return Some(winding);
        }
        // Span quads report inclusion only; map to a rule-satisfying token.
        for quad in drawable.fills.chunks(4) {
            let min = quad[0].position.to_f64();
            let max = quad[2].position.to_f64();
            if p.x >= min.x && p.x < max.x && p.y >= min.y && p.y < max.y {
                return Some(if rule == FillRule::EvenOdd { 1 } else { i32::max_value() });
            }
        }
        None
    }

    #[test]
    fn test_cell_size_tracks_zoom() {
        let mut tiler = Tiler::new();
        tiler.setup(1.0, RectD::new(vec2d(0.0, 0.0), vec2d(100.0, 100.0)), 0.25);
        assert_eq!(tiler.cell_size(), 16.0);
        let lod_at_1 = tiler.lod();
        tiler.setup(4.0, RectD::new(vec2d(0.0, 0.0), vec2d(100.0, 100.0)), 0.25);
        assert_eq!(tiler.cell_size(), 4.0);
        assert_eq!(tiler.lod(), lod_at_1 + 2);
    }

    #[test]
    fn test_triangle_winding_matches_reference() {
        let mut tiler = tiler_for_viewport();
        let path = triangle();
        let drawable = tile_multipath(&mut tiler, &path, FillRule::NonZero);
        assert!(!drawable.tiles.is_empty());

        for ix in 0..24 {
            for iy in 0..24 {
                let p = vec2d(ix as f64 * 4.37 + 0.53, iy as f64 * 4.71 + 0.41);
                let expected = path.winding_of(p);
                match winding_at(&drawable, p, FillRule::NonZero) {
                    Some(winding) if winding == i32::max_value() => {
                        assert_ne!(expected, 0, "span covered an exterior point {:?}", p)
                    }
                    Some(winding) => {
                        assert_eq!(winding, expected, "winding mismatch at {:?}", p)
                    }
                    None => assert_eq!(expected, 0, "missing coverage at {:?}", p),
                }
            }
        }
    }

    #[test]
    fn test_interior_spans_coalesce() {
        let mut tiler = tiler_for_viewport();
        let mut path = CubicPath::new();
        path.move_to(vec2d(0.0, 0.0));
        path.line_to(vec2d(256.0, 0.0));
        path.line_to(vec2d(256.0, 256.0));
        path.line_to(vec2d(0.0, 256.0));
        path.close();
        let path = CubicMultipath::from(path);
        let drawable = tile_multipath(&mut tiler, &path, FillRule::NonZero);

        // A large axis-aligned square produces interior spans.
        assert!(!drawable.fills.is_empty());
        // One quad per interior row at most: spans coalesce horizontally.
        let interior_rows = 256 / 16;
        assert!(drawable.fills.len() / 4 <= interior_rows);

        // Every span quad is wholly interior.
        for quad in drawable.fills.chunks(4) {
            let min = quad[0].position.to_f64();
            let max = quad[2].position.to_f64();
            let center = (min + max) * 0.5;
            assert_eq!(path.winding_of(center).abs(), 1);
        }
    }

    #[test]
    fn test_offscreen_path_emits_nothing() {
        let mut tiler = tiler_for_viewport();
        let mut path = CubicPath::new();
        path.move_to(vec2d(2000.0, 2000.0));
        path.line_to(vec2d(2100.0, 2000.0));
        path.line_to(vec2d(2050.0, 2100.0));
        path.close();
        let path = CubicMultipath::from(path);
        let drawable = tile_multipath(&mut tiler, &path, FillRule::NonZero);
        assert!(drawable.is_empty());
    }

    #[test]
    fn test_double_wound_region_rules_differ() {
        // Two nested same-direction squares: the inner region has winding 2,
        // filled under NonZero but not under EvenOdd.
        let mut multi = CubicMultipath::new();
        for &inset in &[0.0, 32.0] {
            let mut ring = CubicPath::new();
            ring.move_to(vec2d(inset, inset));
            ring.line_to(vec2d(160.0 - inset, inset));
            ring.line_to(vec2d(160.0 - inset, 160.0 - inset));
            ring.line_to(vec2d(inset, 160.0 - inset));
            ring.close();
            multi.push_subpath(&ring);
        }

        let probe = vec2d(80.3, 80.7);
        assert_eq!(multi.winding_of(probe).abs(), 2);

        let mut tiler = tiler_for_viewport();
        let bounds = multi.path.bounding_rect();

        let mut non_zero = Drawable::new(bounds, bounds);
        tiler.tile_cubic(&multi, &bounds, FillRule::NonZero, &attrs(), &mut non_zero);
        let mut even_odd_attrs = attrs();
        even_odd_attrs.is_even_odd = true;
        let mut even_odd = Drawable::new(bounds, bounds);
        tiler.tile_cubic(&multi, &bounds, FillRule::EvenOdd, &even_odd_attrs, &mut even_odd);

        let covered = |drawable: &Drawable, rule| match winding_at(drawable, probe, rule) {
            Some(w) if w == i32::max_value() => true,
            Some(w) => rule == FillRule::EvenOdd && w % 2 != 0 ||
                rule == FillRule::NonZero && w != 0,
            None => false,
        };
        assert!(covered(&non_zero, FillRule::NonZero));
        assert!(!covered(&even_odd, FillRule::EvenOdd));
    }

    #[test]
    fn test_bowtie_windings() {
        let mut path = CubicPath::new();
        path.move_to(vec2d(0.0, 0.0));
        path.line_to(vec2d(100.0, 100.0));
        path.line_to(vec2d(100.0, 0.0));
        path.line_to(vec2d(0.0, 100.0));
        path.close();
        let path = CubicMultipath::from(path);

        let mut tiler = tiler_for_viewport();
        let drawable = tile_multipath(&mut tiler, &path, FillRule::NonZero);

        // The left and right lobes wind oppositely; above and below the
        // crossing is outside.
        for &(p, expected) in &[(vec2d(10.3, 50.4), 1),
                                (vec2d(89.7, 50.6), -1),
                                (vec2d(50.2, 10.9), 0),
                                (vec2d(50.1, 89.3), 0)] {
            assert_eq!(path.winding_of(p), expected);
            match winding_at(&drawable, p, FillRule::NonZero) {
                Some(w) if w == i32::max_value() => assert_ne!(expected, 0),
                Some(w) => assert_eq!(w, expected, "at {:?}", p),
                None => assert_eq!(expected, 0, "at {:?}", p),
            }
        }
    }

    #[test]
    fn test_band_directory_lockstep() {
        let mut tiler = tiler_for_viewport();
        let path = triangle();
        let drawable = tile_multipath(&mut tiler, &path, FillRule::NonZero);

        assert_eq!(drawable.curve_records(), drawable.bands.len());
        for quad in drawable.tiles.chunks(4) {
            let vertex = &quad[0];
            let offset = vertex.curves_offset() as usize;
            let count = vertex.curves_count() as usize;
            // Padded allocation keeps the directory in range.
            assert!(offset + count.max(TILE_BANDS) <= drawable.curve_records());
            for band in 0..TILE_BANDS {
                let entry = drawable.bands[offset + band];
                let first = (entry >> 8) as usize;
                let band_count = (entry & 0xff) as usize;
                assert!(first + band_count <= count);
            }
        }
    }

    #[test]
    fn test_stroke_contours_tile() {
        use quill_content::stroke::{stroke_to_fill, StrokeStyle};

        let mut spine = QuadraticPath::new();
        spine.move_to(vec2d(10.0, 40.0));
        spine.line_to(vec2d(200.0, 40.0));
        let contours = stroke_to_fill(&spine, &StrokeStyle::new(10.0), 0.1);

        let mut tiler = tiler_for_viewport();
        let bounds = RectD::new(vec2d(10.0, 35.0), vec2d(200.0, 45.0));
        let mut drawable = Drawable::new(bounds, bounds);
        tiler.tile_quadratic(&contours, &bounds, FillRule::NonZero, &attrs(), &mut drawable);
        assert!(!drawable.is_empty());

        // Points inside the stroke rectangle are covered.
        for &p in &[vec2d(100.3, 40.2), vec2d(50.7, 37.1)] {
            match winding_at(&drawable, p, FillRule::NonZero) {
                Some(w) if w == i32::max_value() => {}
                Some(w) => assert_ne!(w, 0, "at {:?}", p),
                None => panic!("stroke interior uncovered at {:?}", p),
            }
        }
        // Points clearly outside are not.
        match winding_at(&drawable, vec2d(100.0, 60.0), FillRule::NonZero) {
            Some(w) if w != i32::max_value() => assert_eq!(w, 0),
            Some(_) => panic!("span covered an exterior point"),
            None => {}
        }
    }
}
