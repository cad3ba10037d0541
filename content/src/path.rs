// quill/content/src/path.rs
//
// Copyright © 2026 The Quill Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The editable path representation used throughout the editor.
//!
//! A path is an ordered sequence of traversal commands over a compact control
//! point array. Commands are packed as 2-bit tags, four to a byte. A path
//! holds a single subpath: the first command is always `Move`, and `move_to`
//! is only legal on an empty path.

use crate::bezier::{CubicBezier, QuadraticBezier};
use crate::cubic_path::CubicPath;
use crate::quadratic_path::QuadraticPath;
use crate::stroke::{LineJoin, StrokeStyle};
use crate::fill::FillRule;
use quill_geometry::rect::{RectD, RectF};
use quill_geometry::transform2d::Transform2D;
use quill_geometry::util::GEOMETRIC_EPSILON;
use quill_geometry::vector::{vec2d, Vector2D, Vector2F};
use std::collections::HashSet;

/// Sentinel point index of the incoming editing handle.
pub const IN_HANDLE: usize = usize::max_value() - 1;
/// Sentinel point index of the outgoing editing handle.
pub const OUT_HANDLE: usize = usize::max_value() - 2;

/// Sample count factor used when refitting a removed vertex's neighborhood.
const FIT_RESOLUTION: usize = 16;

/// A path traversal command, stored as a 2-bit tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathCommand {
    Move = 0,
    Line = 1,
    Quadratic = 2,
    Cubic = 3,
}

impl PathCommand {
    #[inline]
    fn from_bits(bits: u8) -> PathCommand {
        match bits & 0b11 {
            0 => PathCommand::Move,
            1 => PathCommand::Line,
            2 => PathCommand::Quadratic,
            _ => PathCommand::Cubic,
        }
    }

    /// How many control points the command consumes.
    #[inline]
    pub fn point_span(self) -> usize {
        match self {
            PathCommand::Move | PathCommand::Line => 1,
            PathCommand::Quadratic => 2,
            PathCommand::Cubic => 3,
        }
    }
}

/// One segment of a path, as seen by the forward and reverse iterators.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Segment {
    Line(Vector2F, Vector2F),
    Quadratic(Vector2F, Vector2F, Vector2F),
    Cubic(Vector2F, Vector2F, Vector2F, Vector2F),
}

impl Segment {
    #[inline]
    pub fn from_point(&self) -> Vector2F {
        match *self {
            Segment::Line(p0, _) | Segment::Quadratic(p0, _, _) | Segment::Cubic(p0, _, _, _) => p0,
        }
    }

    #[inline]
    pub fn to_point(&self) -> Vector2F {
        match *self {
            Segment::Line(_, p1) => p1,
            Segment::Quadratic(_, _, p2) => p2,
            Segment::Cubic(_, _, _, p3) => p3,
        }
    }

    /// All control points coincide.
    pub fn is_point(&self) -> bool {
        match *self {
            Segment::Line(p0, p1) => p0 == p1,
            Segment::Quadratic(p0, p1, p2) => p0 == p1 && p1 == p2,
            Segment::Cubic(p0, p1, p2, p3) => p0 == p1 && p1 == p2 && p2 == p3,
        }
    }

    /// The segment as a double-precision cubic.
    pub fn to_cubic(&self) -> CubicBezier {
        match *self {
            Segment::Line(p0, p1) => {
                let (p0, p1) = (p0.to_f64(), p1.to_f64());
                CubicBezier::new(p0, p1, p1, p1)
            }
            Segment::Quadratic(p0, p1, p2) => {
                QuadraticBezier::new(p0.to_f64(), p1.to_f64(), p2.to_f64()).to_cubic()
            }
            Segment::Cubic(p0, p1, p2, p3) => {
                CubicBezier::new(p0.to_f64(), p1.to_f64(), p2.to_f64(), p3.to_f64())
            }
        }
    }

    #[inline]
    pub fn sample(&self, t: f64) -> Vector2D {
        self.to_cubic().sample(t)
    }

    pub fn bounding_rect(&self) -> RectD {
        self.to_cubic().bounding_rect()
    }
}

/// A vertex with the indices of its incoming and outgoing handles.
///
/// Open-path endpoints report the path-level editing handles through the
/// [`IN_HANDLE`] and [`OUT_HANDLE`] sentinels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexNode {
    pub vertex: usize,
    pub in_handle: Option<usize>,
    pub out_handle: Option<usize>,
    /// The vertex that closes the subpath, if this vertex ends a closed one.
    pub close_vertex: Option<usize>,
    pub in_command: Option<usize>,
    pub out_command: Option<usize>,
}

/// See the module documentation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    commands: Vec<u8>,
    points: Vec<Vector2F>,
    command_count: usize,
    closed: bool,
    in_handle: Vector2F,
    out_handle: Vector2F,
}

impl Path {
    #[inline]
    pub fn new() -> Path {
        Path::default()
    }

    /// A path with fewer than two control points is empty. An empty path may
    /// still hold the single point of its initial `Move`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.len() < 2
    }

    /// A path with no control points at all.
    #[inline]
    pub fn is_vacant(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        !self.is_empty() && self.closed
    }

    /// The number of segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.command_count.saturating_sub(1)
    }

    #[inline]
    pub fn command_count(&self) -> usize {
        self.command_count
    }

    pub fn points(&self) -> &[Vector2F] {
        &self.points
    }

    /// The number of control points, optionally counting the editing handles.
    pub fn points_len(&self, include_handles: bool) -> usize {
        let mut len = self.points.len();
        if include_handles {
            if self.has_in_handle() {
                len += 1;
            }
            if self.has_out_handle() {
                len += 1;
            }
        }
        len
    }

    #[inline]
    pub fn has_in_handle(&self) -> bool {
        !self.is_vacant() && !self.closed && self.in_handle != self.points[0]
    }

    #[inline]
    pub fn has_out_handle(&self) -> bool {
        !self.is_vacant() && !self.closed && self.out_handle != *self.points.last().unwrap()
    }

    pub fn set_in_handle(&mut self, p: Vector2F) {
        self.in_handle = p;
    }

    pub fn set_out_handle(&mut self, p: Vector2F) {
        self.out_handle = p;
    }

    /// The control point at `point_index`, accepting the handle sentinels.
    pub fn point_at(&self, point_index: usize) -> Vector2F {
        match point_index {
            IN_HANDLE => self.in_handle,
            OUT_HANDLE => self.out_handle,
            _ => self.points[point_index],
        }
    }

    #[inline]
    pub fn command(&self, index: usize) -> PathCommand {
        debug_assert!(index < self.command_count);
        PathCommand::from_bits(self.commands[index / 4] >> (6 - (index % 4) * 2))
    }

    /// The index of the first point consumed by the command.
    fn command_first_point(&self, command_index: usize) -> usize {
        let mut point_index = 0;
        for index in 0..command_index {
            point_index += self.command(index).point_span();
        }
        point_index
    }

    // Command packing

    fn push_command(&mut self, command: PathCommand) {
        if self.command_count % 4 == 0 {
            self.commands.push(0);
        }
        let byte = &mut self.commands[self.command_count / 4];
        let shift = 6 - (self.command_count % 4) * 2;
        *byte = (*byte & !(0b11 << shift)) | ((command as u8) << shift);
        self.command_count += 1;
    }

    fn decoded_commands(&self) -> Vec<PathCommand> {
        (0..self.command_count).map(|index| self.command(index)).collect()
    }

    fn encode_commands(&mut self, commands: &[PathCommand]) {
        self.commands.clear();
        self.command_count = 0;
        for &command in commands {
            self.push_command(command);
        }
    }

    fn insert_command(&mut self, index: usize, command: PathCommand) {
        let mut commands = self.decoded_commands();
        commands.insert(index, command);
        self.encode_commands(&commands);
    }

    fn replace_command(&mut self, index: usize, command: PathCommand) {
        let mut commands = self.decoded_commands();
        commands[index] = command;
        self.encode_commands(&commands);
    }

    fn remove_command(&mut self, index: usize) {
        let mut commands = self.decoded_commands();
        commands.remove(index);
        self.encode_commands(&commands);
    }

    // Construction

    /// Moves the cursor. Legal only on an empty or vacant path; on an
    /// empty-after-move path the sole point is replaced.
    pub fn move_to(&mut self, p: Vector2F) {
        debug_assert!(self.is_empty(), "move_to is only legal on an empty path");
        if self.is_vacant() {
            self.points.push(p);
            self.push_command(PathCommand::Move);
        } else {
            self.points[0] = p;
        }
        self.in_handle = p;
        self.out_handle = p;
    }

    /// Appends (or, with `reverse`, prepends) a line segment. A no-op when
    /// the new point equals the current endpoint.
    pub fn line_to(&mut self, p: Vector2F, reverse: bool) {
        debug_assert!(!self.is_vacant());
        if !reverse {
            if *self.points.last().unwrap() == p {
                return;
            }
            self.points.push(p);
            self.push_command(PathCommand::Line);
            self.out_handle = p;
        } else {
            if self.points[0] == p {
                return;
            }
            self.points.insert(0, p);
            self.insert_command(1, PathCommand::Line);
            self.in_handle = p;
        }
    }

    pub fn quadratic_to(&mut self, control: Vector2F, p: Vector2F, reverse: bool) {
        debug_assert!(!self.is_vacant());
        if !reverse {
            self.points.push(control);
            self.points.push(p);
            self.push_command(PathCommand::Quadratic);
            self.out_handle = p;
        } else {
            self.points.insert(0, control);
            self.points.insert(0, p);
            self.insert_command(1, PathCommand::Quadratic);
            self.in_handle = p;
        }
    }

    /// Appends a cubic segment; folds to a line when both controls coincide
    /// with the respective endpoints.
    pub fn cubic_to(&mut self, control_1: Vector2F, control_2: Vector2F, p: Vector2F, reverse: bool) {
        debug_assert!(!self.is_vacant());
        if !reverse {
            let p0 = *self.points.last().unwrap();
            if control_1 == p0 && control_2 == p {
                return self.line_to(p, false);
            }
            self.points.push(control_1);
            self.points.push(control_2);
            self.points.push(p);
            self.push_command(PathCommand::Cubic);
            self.out_handle = p;
        } else {
            let p0 = self.points[0];
            if control_2 == p0 && control_1 == p {
                return self.line_to(p, true);
            }
            self.points.insert(0, control_1);
            self.points.insert(0, control_2);
            self.points.insert(0, p);
            self.insert_command(1, PathCommand::Cubic);
            self.in_handle = p;
        }
    }

    /// Closes the path, connecting the last point to the first. When editing
    /// handles are present the closing segment is a cubic through them,
    /// otherwise a line.
    pub fn close(&mut self) {
        if self.is_empty() || self.closed {
            return;
        }
        let first = self.points[0];
        if self.has_out_handle() || self.has_in_handle() {
            let (c1, c2) = (self.out_handle, self.in_handle);
            self.cubic_to(c1, c2, first, false);
        } else if *self.points.last().unwrap() != first {
            self.line_to(first, false);
        }
        self.closed = true;
    }

    // Shape helpers

    pub fn rect(&mut self, origin: Vector2F, size: Vector2F) {
        self.move_to(origin);
        self.line_to(Vector2F { x: origin.x + size.x, y: origin.y }, false);
        self.line_to(origin + size, false);
        self.line_to(Vector2F { x: origin.x, y: origin.y + size.y }, false);
        self.close();
    }

    pub fn ellipse(&mut self, center: Vector2F, radius: Vector2F) {
        // Circular arc approximation constant.
        const KAPPA: f32 = 0.552_284_8;
        let (rx, ry) = (radius.x, radius.y);
        let (cx, cy) = (center.x, center.y);
        self.move_to(Vector2F { x: cx + rx, y: cy });
        self.cubic_to(Vector2F { x: cx + rx, y: cy + ry * KAPPA },
                      Vector2F { x: cx + rx * KAPPA, y: cy + ry },
                      Vector2F { x: cx, y: cy + ry },
                      false);
        self.cubic_to(Vector2F { x: cx - rx * KAPPA, y: cy + ry },
                      Vector2F { x: cx - rx, y: cy + ry * KAPPA },
                      Vector2F { x: cx - rx, y: cy },
                      false);
        self.cubic_to(Vector2F { x: cx - rx, y: cy - ry * KAPPA },
                      Vector2F { x: cx - rx * KAPPA, y: cy - ry },
                      Vector2F { x: cx, y: cy - ry },
                      false);
        self.cubic_to(Vector2F { x: cx + rx * KAPPA, y: cy - ry },
                      Vector2F { x: cx + rx, y: cy - ry * KAPPA },
                      Vector2F { x: cx + rx, y: cy },
                      false);
        self.closed = true;
    }

    pub fn circle(&mut self, center: Vector2F, radius: f32) {
        self.ellipse(center, Vector2F::splat(radius));
    }

    pub fn round_rect(&mut self, origin: Vector2F, size: Vector2F, radius: f32) {
        let r = radius.min(size.x * 0.5).min(size.y * 0.5);
        if r <= 0.0 {
            return self.rect(origin, size);
        }
        const KAPPA: f32 = 0.552_284_8;
        let k = r * (1.0 - KAPPA);
        let (x0, y0) = (origin.x, origin.y);
        let (x1, y1) = (origin.x + size.x, origin.y + size.y);
        self.move_to(vec2f_(x0 + r, y0));
        self.line_to(vec2f_(x1 - r, y0), false);
        self.cubic_to(vec2f_(x1 - k, y0), vec2f_(x1, y0 + k), vec2f_(x1, y0 + r), false);
        self.line_to(vec2f_(x1, y1 - r), false);
        self.cubic_to(vec2f_(x1, y1 - k), vec2f_(x1 - k, y1), vec2f_(x1 - r, y1), false);
        self.line_to(vec2f_(x0 + r, y1), false);
        self.cubic_to(vec2f_(x0 + k, y1), vec2f_(x0, y1 - k), vec2f_(x0, y1 - r), false);
        self.line_to(vec2f_(x0, y0 + r), false);
        self.cubic_to(vec2f_(x0, y0 + k), vec2f_(x0 + k, y0), vec2f_(x0 + r, y0), false);
        self.closed = true;
    }

    // Iteration

    /// Iterates the segments in order. `Move` commands after the first do not
    /// occur; clients see only segments.
    pub fn segments(&self) -> Segments {
        Segments { path: self, command_index: 1, point_index: 1 }
    }

    /// Iterates the segments in reverse order, with each segment's direction
    /// flipped.
    pub fn segments_reversed(&self) -> ReverseSegments {
        ReverseSegments { path: self, command_index: self.command_count, point_index: self.points.len() }
    }

    // Vertex queries

    /// A point is a vertex when it is the destination of a command.
    pub fn is_vertex(&self, point_index: usize) -> bool {
        if point_index >= self.points.len() {
            return false;
        }
        let mut next = 0;
        for index in 0..self.command_count {
            next += self.command(index).point_span();
            if next - 1 == point_index {
                return true;
            }
            if next > point_index {
                return false;
            }
        }
        false
    }

    #[inline]
    pub fn is_handle(&self, point_index: usize) -> bool {
        !self.is_vertex(point_index)
    }

    /// Whether the point is the first or last vertex of an open path.
    pub fn is_open_end(&self, point_index: usize) -> bool {
        !self.closed && (point_index == 0 || point_index + 1 == self.points.len())
    }

    /// The indices of all vertex control points, excluding a closing vertex
    /// that duplicates the first.
    pub fn vertex_indices(&self) -> Vec<usize> {
        let mut indices = vec![];
        let mut next = 0;
        for index in 0..self.command_count {
            next += self.command(index).point_span();
            indices.push(next - 1);
        }
        if self.closed {
            indices.pop();
        }
        indices
    }

    /// The vertex node that the given control point belongs to.
    pub fn node_at(&self, point_index: usize) -> VertexNode {
        debug_assert!(point_index < self.points.len());

        // Locate the command consuming the point and the owning vertex.
        let mut first_point = 0;
        let mut vertex = point_index;
        let mut vertex_command = 0;
        for index in 0..self.command_count {
            let span = self.command(index).point_span();
            if point_index < first_point + span {
                let offset = point_index - first_point;
                let is_first_control_of_curve =
                    offset == 0 && span > 1;
                if offset + 1 == span {
                    // The destination vertex itself.
                    vertex = point_index;
                    vertex_command = index;
                } else if is_first_control_of_curve {
                    // Outgoing handle of the previous vertex.
                    vertex = first_point - 1;
                    vertex_command = index - 1;
                } else {
                    // Incoming handle of this command's vertex.
                    vertex = first_point + span - 1;
                    vertex_command = index;
                }
                break;
            }
            first_point += span;
        }

        let in_command = if vertex_command == 0 { None } else { Some(vertex_command) };
        let out_command =
            if vertex_command + 1 < self.command_count { Some(vertex_command + 1) } else { None };

        let in_handle = match in_command {
            Some(command) if self.command(command) != PathCommand::Line &&
                self.command(command) != PathCommand::Move => Some(vertex - 1),
            Some(_) => None,
            None if self.has_in_handle() => Some(IN_HANDLE),
            None => None,
        };
        let out_handle = match out_command {
            Some(command) if self.command(command) != PathCommand::Line => {
                Some(self.command_first_point(command))
            }
            Some(_) => None,
            None if self.has_out_handle() => Some(OUT_HANDLE),
            None => None,
        };

        let close_vertex = if self.closed && vertex + 1 == self.points.len() {
            Some(0)
        } else {
            None
        };

        VertexNode { vertex, in_handle, out_handle, close_vertex, in_command, out_command }
    }

    /// Translates a control point. Translating a vertex drags its attached
    /// handles along.
    pub fn translate(&mut self, point_index: usize, delta: Vector2F) {
        match point_index {
            IN_HANDLE => self.in_handle += delta,
            OUT_HANDLE => self.out_handle += delta,
            _ => {
                if self.is_vertex(point_index) {
                    let node = self.node_at(point_index);
                    for handle in [node.in_handle, node.out_handle].iter().filter_map(|h| *h) {
                        match handle {
                            IN_HANDLE => self.in_handle += delta,
                            OUT_HANDLE => self.out_handle += delta,
                            index => self.points[index] += delta,
                        }
                    }
                    self.points[point_index] += delta;
                    if let Some(close_vertex) = self.node_at(point_index).close_vertex {
                        self.points[close_vertex] += delta;
                    }
                } else {
                    self.points[point_index] += delta;
                }
            }
        }
    }

    // Editing

    /// Splits the segment at parameter `t`, returning the index of the newly
    /// inserted vertex. A line inserts one point, a quadratic two (the new
    /// vertex is the subdivision midpoint), a cubic three.
    pub fn split(&mut self, segment_index: usize, t: f32) -> usize {
        let command_index = segment_index + 1;
        debug_assert!(command_index < self.command_count);
        let first_point = self.command_first_point(command_index);
        let p0 = self.points[first_point - 1];
        let t = t as f64;

        match self.command(command_index) {
            PathCommand::Move => unreachable!("single-subpath invariant"),
            PathCommand::Line => {
                let p1 = self.points[first_point];
                let mid = p0.to_f64().lerp(p1.to_f64(), t).to_f32();
                self.points.insert(first_point, mid);
                self.insert_command(command_index, PathCommand::Line);
                first_point
            }
            PathCommand::Quadratic => {
                let curve = QuadraticBezier::new(p0.to_f64(),
                                                 self.points[first_point].to_f64(),
                                                 self.points[first_point + 1].to_f64());
                let (mid, q1, q2) = curve.split_point(t);
                self.points[first_point] = q1.to_f32();
                self.points.insert(first_point + 1, q2.to_f32());
                self.points.insert(first_point + 1, mid.to_f32());
                self.insert_command(command_index, PathCommand::Quadratic);
                first_point + 1
            }
            PathCommand::Cubic => {
                let curve = CubicBezier::new(p0.to_f64(),
                                             self.points[first_point].to_f64(),
                                             self.points[first_point + 1].to_f64(),
                                             self.points[first_point + 2].to_f64());
                let (left, right) = curve.split(t);
                self.points[first_point] = left.p1.to_f32();
                self.points[first_point + 1] = left.p2.to_f32();
                self.points.insert(first_point + 2, right.p2.to_f32());
                self.points.insert(first_point + 2, right.p1.to_f32());
                self.points.insert(first_point + 2, left.p3.to_f32());
                self.insert_command(command_index, PathCommand::Cubic);
                first_point + 2
            }
        }
    }

    /// Converts the command to a line, dropping its control points.
    pub fn to_line(&mut self, command_index: usize) {
        debug_assert!(command_index > 0 && command_index < self.command_count);
        let first_point = self.command_first_point(command_index);
        match self.command(command_index) {
            PathCommand::Move | PathCommand::Line => {}
            PathCommand::Quadratic => {
                self.points.remove(first_point);
                self.replace_command(command_index, PathCommand::Line);
            }
            PathCommand::Cubic => {
                self.points.drain(first_point..first_point + 2);
                self.replace_command(command_index, PathCommand::Line);
            }
        }
    }

    /// Converts the command to a shape-preserving cubic. Returns the updated
    /// index of `reference_point`, which may shift as control points are
    /// inserted before it.
    pub fn to_cubic(&mut self, command_index: usize, reference_point: usize) -> usize {
        debug_assert!(command_index > 0 && command_index < self.command_count);
        let first_point = self.command_first_point(command_index);
        let p0 = self.points[first_point - 1];
        let mut inserted = 0;
        match self.command(command_index) {
            PathCommand::Move | PathCommand::Cubic => {}
            PathCommand::Line => {
                let p1 = self.points[first_point];
                let c1 = p0.to_f64().lerp(p1.to_f64(), 1.0 / 3.0).to_f32();
                let c2 = p0.to_f64().lerp(p1.to_f64(), 2.0 / 3.0).to_f32();
                self.points.insert(first_point, c2);
                self.points.insert(first_point, c1);
                self.replace_command(command_index, PathCommand::Cubic);
                inserted = 2;
            }
            PathCommand::Quadratic => {
                let control = self.points[first_point].to_f64();
                let p2 = self.points[first_point + 1].to_f64();
                let cubic = QuadraticBezier::new(p0.to_f64(), control, p2).to_cubic();
                self.points[first_point] = cubic.p1.to_f32();
                self.points.insert(first_point + 1, cubic.p2.to_f32());
                inserted = 1;
            }
        }
        if reference_point >= first_point && reference_point < self.points.len() {
            reference_point + inserted
        } else {
            reference_point
        }
    }

    /// Removes a control point.
    ///
    /// Removing a handle degrades its segment by one degree. Removing a
    /// vertex joins its two segments: with `keep_shape` the joined segment is
    /// a cubic least-squares fit to samples of the originals, otherwise a
    /// line.
    pub fn remove(&mut self, point_index: usize, keep_shape: bool) {
        debug_assert!(point_index < self.points.len());

        if self.is_handle(point_index) {
            let command_index = self.command_of_point(point_index);
            match self.command(command_index) {
                PathCommand::Quadratic => self.to_line(command_index),
                PathCommand::Cubic => {
                    self.points.remove(point_index);
                    self.replace_command(command_index, PathCommand::Quadratic);
                }
                _ => {}
            }
            return;
        }

        let node = self.node_at(point_index);
        let in_command = node.in_command;
        let out_command = node.out_command;

        match (in_command, out_command) {
            (Some(command), None) => {
                // The last vertex: drop its incoming segment.
                let first_point = self.command_first_point(command);
                let span = self.command(command).point_span();
                self.points.drain(first_point..first_point + span);
                self.remove_command(command);
            }
            (None, Some(command)) => {
                // The first vertex: drop the outgoing segment's controls and
                // the old start; its destination becomes the new start.
                let first_point = self.command_first_point(command);
                let span = self.command(command).point_span();
                self.points.drain(first_point - 1..first_point + span - 1);
                self.remove_command(command);
            }
            (Some(in_command), Some(out_command)) => {
                let in_first = self.command_first_point(in_command);
                let samples = if keep_shape {
                    Some(self.sample_segment_pair(in_command, out_command))
                } else {
                    None
                };

                // Remove both segments' points, keeping the new endpoint.
                let out_span = self.command(out_command).point_span();
                let in_span = self.command(in_command).point_span();
                self.points.drain(in_first..in_first + in_span + out_span - 1);
                self.remove_command(out_command);
                self.remove_command(in_command);

                match samples {
                    None => self.insert_command(in_command, PathCommand::Line),
                    Some(samples) => {
                        let p0 = samples[0];
                        let p3 = *samples.last().unwrap();
                        let (c1, c2) = fit_cubic(&samples, p0, p3);
                        self.points.insert(in_first, c2.to_f32());
                        self.points.insert(in_first, c1.to_f32());
                        self.insert_command(in_command, PathCommand::Cubic);
                    }
                }
            }
            (None, None) => {
                // The lone move point.
                self.points.clear();
                self.commands.clear();
                self.command_count = 0;
                self.closed = false;
            }
        }
    }

    fn command_of_point(&self, point_index: usize) -> usize {
        let mut first_point = 0;
        for index in 0..self.command_count {
            let span = self.command(index).point_span();
            if point_index < first_point + span {
                return index;
            }
            first_point += span;
        }
        self.command_count - 1
    }

    /// Samples the two segments around a vertex for shape-preserving removal.
    fn sample_segment_pair(&self, in_command: usize, out_command: usize) -> Vec<Vector2D> {
        let mut samples = Vec::with_capacity(2 * FIT_RESOLUTION + 2);
        for &command in &[in_command, out_command] {
            let segment = self.segment_at_command(command);
            let cubic = segment.to_cubic();
            for i in 0..=FIT_RESOLUTION {
                if command == out_command && i == 0 {
                    continue;
                }
                samples.push(cubic.sample(i as f64 / FIT_RESOLUTION as f64));
            }
        }
        samples
    }

    fn segment_at_command(&self, command_index: usize) -> Segment {
        let first_point = self.command_first_point(command_index);
        let p0 = self.points[first_point - 1];
        match self.command(command_index) {
            PathCommand::Move => unreachable!("single-subpath invariant"),
            PathCommand::Line => Segment::Line(p0, self.points[first_point]),
            PathCommand::Quadratic => {
                Segment::Quadratic(p0, self.points[first_point], self.points[first_point + 1])
            }
            PathCommand::Cubic => Segment::Cubic(p0,
                                                 self.points[first_point],
                                                 self.points[first_point + 1],
                                                 self.points[first_point + 2]),
        }
    }

    // Bounds and hit testing

    /// Exact tight bounds via monotone extrema.
    pub fn bounding_rect(&self) -> RectD {
        let mut rect: Option<RectD> = None;
        for segment in self.segments() {
            let segment_rect = segment.bounding_rect();
            rect = Some(match rect {
                None => segment_rect,
                Some(rect) => rect.union_rect(&segment_rect),
            });
        }
        rect.unwrap_or_else(|| match self.points.first() {
            Some(&p) => RectD::from_points(p.to_f64(), p.to_f64()),
            None => RectD::default(),
        })
    }

    /// Exact tight bounds in the transformed space.
    pub fn bounding_rect_transformed(&self, transform: &Transform2D) -> RectD {
        let mut rect: Option<RectD> = None;
        for segment in self.segments() {
            let cubic = segment.to_cubic();
            let transformed = CubicBezier::new(*transform * cubic.p0,
                                               *transform * cubic.p1,
                                               *transform * cubic.p2,
                                               *transform * cubic.p3);
            let segment_rect = transformed.bounding_rect();
            rect = Some(match rect {
                None => segment_rect,
                Some(rect) => rect.union_rect(&segment_rect),
            });
        }
        rect.unwrap_or_else(|| match self.points.first() {
            Some(&p) => {
                let p = *transform * p;
                RectD::from_points(p, p)
            }
            None => RectD::default(),
        })
    }

    /// The convex hull of all control points: fast but loose.
    pub fn approx_bounding_rect(&self) -> RectF {
        if self.points.is_empty() {
            return RectF::default();
        }
        let mut rect = RectF::from_points(self.points[0], self.points[0]);
        for &p in &self.points[1..] {
            rect = rect.union_point(p);
        }
        rect
    }

    /// Whether `p` (in scene space) hits the filled interior, the stroked
    /// region, a control vertex, or (with `deep`) any handle, within
    /// `threshold / zoom`.
    pub fn is_point_inside_path(&self,
                                p: Vector2F,
                                fill: Option<FillRule>,
                                stroke: Option<&StrokeStyle>,
                                transform: &Transform2D,
                                threshold: f64,
                                zoom: f64,
                                deep: bool)
                                -> bool {
        if self.is_empty() {
            return false;
        }
        let p = p.to_f64();
        let distance = threshold / zoom;

        // Vertices (and handles when deep).
        for point_index in 0..self.points.len() {
            if !deep && !self.is_vertex(point_index) {
                continue;
            }
            if (*transform * self.points[point_index] - p).length() <= distance {
                return true;
            }
        }
        if deep && self.has_in_handle() && (*transform * self.in_handle - p).length() <= distance {
            return true;
        }
        if deep && self.has_out_handle() && (*transform * self.out_handle - p).length() <= distance {
            return true;
        }

        if let Some(stroke) = stroke {
            let radius = stroke.width * 0.5 + distance;
            for segment in self.segments() {
                if segment_square_distance(&segment, transform, p) <= radius * radius {
                    return true;
                }
            }
            // Miter tips stick out up to `miter_limit` radii past the vertex.
            if stroke.join == LineJoin::Miter {
                let miter_radius = stroke.width * 0.5 * stroke.miter_limit + distance;
                for &index in &self.vertex_indices() {
                    if (*transform * self.points[index] - p).length() <= miter_radius {
                        return true;
                    }
                }
            }
        }

        if let Some(rule) = fill {
            let cubic_path = self.to_cubic_path(transform, true);
            if rule.includes(cubic_path.winding_of(p)) {
                return true;
            }
        }

        false
    }

    /// Whether the path intersects the rect. Short-circuits on the
    /// approximate bounds, then prunes each segment by de Casteljau interval
    /// subdivision. Optionally collects the vertex indices inside the rect.
    pub fn intersects(&self,
                      rect: &RectD,
                      transform: &Transform2D,
                      mut indices: Option<&mut HashSet<usize>>)
                      -> bool {
        let approx = self.approx_bounding_rect().to_f64();
        if !(*transform * approx).intersects(rect) {
            return false;
        }

        let mut hit = false;

        if let Some(ref mut indices) = indices {
            let mut next = 0;
            for index in 0..self.command_count {
                next += self.command(index).point_span();
                let vertex = next - 1;
                if rect.contains_point(*transform * self.points[vertex]) {
                    indices.insert(vertex);
                    hit = true;
                }
            }
        }

        for segment in self.segments() {
            let cubic = segment.to_cubic();
            let transformed = CubicBezier::new(*transform * cubic.p0,
                                               *transform * cubic.p1,
                                               *transform * cubic.p2,
                                               *transform * cubic.p3);
            if cubic_intersects_rect(&transformed, rect, 0) {
                if indices.is_none() {
                    return true;
                }
                hit = true;
            }
        }

        hit
    }

    // Conversion

    /// Transforms the path into a monotone cubic path. With `close`, open
    /// paths receive their implicit closure (as required for filling).
    pub fn to_cubic_path(&self, transform: &Transform2D, close: bool) -> CubicPath {
        let mut cubic_path = CubicPath::new();
        if self.is_vacant() {
            return cubic_path;
        }
        cubic_path.move_to(*transform * self.points[0]);
        for segment in self.segments() {
            match segment {
                Segment::Line(_, p1) => cubic_path.line_to(*transform * p1),
                Segment::Quadratic(_, p1, p2) => {
                    cubic_path.quadratic_to(*transform * p1, *transform * p2)
                }
                Segment::Cubic(_, p1, p2, p3) => {
                    cubic_path.cubic_to(*transform * p1, *transform * p2, *transform * p3)
                }
            }
        }
        if close {
            cubic_path.close();
        }
        cubic_path
    }

    /// Transforms the path into a quadratic path, approximating cubics to
    /// within `tolerance`.
    pub fn to_quadratic_path(&self, transform: &Transform2D, tolerance: f64) -> QuadraticPath {
        let mut quadratic_path = QuadraticPath::new();
        if self.is_vacant() {
            return quadratic_path;
        }
        quadratic_path.move_to(*transform * self.points[0]);
        for segment in self.segments() {
            match segment {
                Segment::Line(_, p1) => quadratic_path.line_to(*transform * p1),
                Segment::Quadratic(_, p1, p2) => {
                    quadratic_path.quadratic_to(*transform * p1, *transform * p2)
                }
                Segment::Cubic(p0, p1, p2, p3) => {
                    let cubic = CubicBezier::new(*transform * p0,
                                                 *transform * p1,
                                                 *transform * p2,
                                                 *transform * p3);
                    if cubic.is_line(GEOMETRIC_EPSILON) {
                        quadratic_path.line_to(cubic.p3);
                    } else {
                        cubic.approximate_with_quadratics(tolerance, &mut |q| {
                            quadratic_path.quadratic_to(q.p1, q.p2);
                        });
                    }
                }
            }
        }
        quadratic_path
    }
}

#[inline]
fn vec2f_(x: f32, y: f32) -> Vector2F {
    Vector2F { x, y }
}

fn segment_square_distance(segment: &Segment, transform: &Transform2D, p: Vector2D) -> f64 {
    let cubic = segment.to_cubic();
    let transformed = CubicBezier::new(*transform * cubic.p0,
                                       *transform * cubic.p1,
                                       *transform * cubic.p2,
                                       *transform * cubic.p3);
    let mut min = f64::INFINITY;
    let mut last = transformed.p0;
    const STEPS: usize = 32;
    for i in 1..=STEPS {
        let q = transformed.sample(i as f64 / STEPS as f64);
        let d = quill_geometry::line_segment::LineSegmentD::new(last, q).square_distance_to(p);
        if d < min {
            min = d;
        }
        last = q;
    }
    min
}

fn cubic_intersects_rect(curve: &CubicBezier, rect: &RectD, depth: u8) -> bool {
    let hull = RectD::from_points(curve.p0, curve.p1)
        .union_point(curve.p2)
        .union_point(curve.p3);
    if !hull.intersects(rect) && !rect.contains_rect(&hull) {
        return false;
    }
    if rect.contains_point(curve.p0) || rect.contains_point(curve.p3) {
        return true;
    }
    if depth >= crate::bezier::MAX_RECURSION || hull.width().max(hull.height()) < GEOMETRIC_EPSILON
    {
        // The hull overlaps the rect and is no longer separable.
        return true;
    }
    let (left, right) = curve.split(0.5);
    cubic_intersects_rect(&left, rect, depth + 1) || cubic_intersects_rect(&right, rect, depth + 1)
}

/// Least-squares fit of a cubic's control points to `samples`, holding the
/// endpoints fixed, with chord-length parameterization.
fn fit_cubic(samples: &[Vector2D], p0: Vector2D, p3: Vector2D) -> (Vector2D, Vector2D) {
    // Chord-length parameters.
    let mut ts = Vec::with_capacity(samples.len());
    let mut total = 0.0;
    ts.push(0.0);
    for window in samples.windows(2) {
        total += (window[1] - window[0]).length();
        ts.push(total);
    }
    if total <= GEOMETRIC_EPSILON {
        return (p0, p3);
    }
    for t in &mut ts {
        *t /= total;
    }

    // Normal equations for the two free control points.
    let (mut a11, mut a12, mut a22) = (0.0, 0.0, 0.0);
    let (mut bx1, mut by1, mut bx2, mut by2) = (0.0, 0.0, 0.0, 0.0);
    for (&t, &sample) in ts.iter().zip(samples.iter()) {
        let u = 1.0 - t;
        let b0 = u * u * u;
        let b1 = 3.0 * u * u * t;
        let b2 = 3.0 * u * t * t;
        let b3 = t * t * t;
        let rhs = sample - p0 * b0 - p3 * b3;
        a11 += b1 * b1;
        a12 += b1 * b2;
        a22 += b2 * b2;
        bx1 += b1 * rhs.x;
        by1 += b1 * rhs.y;
        bx2 += b2 * rhs.x;
        by2 += b2 * rhs.y;
    }
    let det = a11 * a22 - a12 * a12;
    if det.abs() <= GEOMETRIC_EPSILON {
        let third = (p3 - p0) * (1.0 / 3.0);
        return (p0 + third, p3 - third);
    }
    let inv = 1.0 / det;
    let c1 = vec2d((a22 * bx1 - a12 * bx2) * inv, (a22 * by1 - a12 * by2) * inv);
    let c2 = vec2d((a11 * bx2 - a12 * bx1) * inv, (a11 * by2 - a12 * by1) * inv);
    (c1, c2)
}

/// Forward segment iterator. Skips `Move` commands after the first.
pub struct Segments<'a> {
    path: &'a Path,
    command_index: usize,
    point_index: usize,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        if self.command_index >= self.path.command_count {
            return None;
        }
        let points = &self.path.points;
        let p0 = points[self.point_index - 1];
        let command = self.path.command(self.command_index);
        let segment = match command {
            PathCommand::Move => unreachable!("single-subpath invariant"),
            PathCommand::Line => Segment::Line(p0, points[self.point_index]),
            PathCommand::Quadratic => {
                Segment::Quadratic(p0, points[self.point_index], points[self.point_index + 1])
            }
            PathCommand::Cubic => Segment::Cubic(p0,
                                                 points[self.point_index],
                                                 points[self.point_index + 1],
                                                 points[self.point_index + 2]),
        };
        self.point_index += command.point_span();
        self.command_index += 1;
        Some(segment)
    }
}

/// Reverse segment iterator; mirrors the forward one.
pub struct ReverseSegments<'a> {
    path: &'a Path,
    command_index: usize,
    point_index: usize,
}

impl<'a> Iterator for ReverseSegments<'a> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        if self.command_index <= 1 {
            return None;
        }
        self.command_index -= 1;
        let command = self.path.command(self.command_index);
        self.point_index -= command.point_span();
        let points = &self.path.points;
        let p0 = points[self.point_index - 1];
        Some(match command {
            PathCommand::Move => unreachable!("single-subpath invariant"),
            PathCommand::Line => Segment::Line(points[self.point_index], p0),
            PathCommand::Quadratic => {
                Segment::Quadratic(points[self.point_index + 1], points[self.point_index], p0)
            }
            PathCommand::Cubic => Segment::Cubic(points[self.point_index + 2],
                                                 points[self.point_index + 1],
                                                 points[self.point_index],
                                                 p0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_geometry::vector::vec2f;

    fn triangle() -> Path {
        let mut path = Path::new();
        path.move_to(vec2f(0.0, 0.0));
        path.line_to(vec2f(100.0, 0.0), false);
        path.line_to(vec2f(50.0, 100.0), false);
        path.close();
        path
    }

    #[test]
    fn test_first_command_is_move() {
        let path = triangle();
        assert_eq!(path.command(0), PathCommand::Move);
        assert!(path.is_closed());
    }

    #[test]
    fn test_segment_round_trip() {
        let mut path = Path::new();
        path.move_to(vec2f(0.0, 0.0));
        path.line_to(vec2f(10.0, 0.0), false);
        path.quadratic_to(vec2f(15.0, 5.0), vec2f(10.0, 10.0), false);
        path.cubic_to(vec2f(5.0, 15.0), vec2f(0.0, 15.0), vec2f(0.0, 10.0), false);

        let segments: Vec<_> = path.segments().collect();

        let mut rebuilt = Path::new();
        rebuilt.move_to(segments[0].from_point());
        for segment in &segments {
            match *segment {
                Segment::Line(_, p1) => rebuilt.line_to(p1, false),
                Segment::Quadratic(_, p1, p2) => rebuilt.quadratic_to(p1, p2, false),
                Segment::Cubic(_, p1, p2, p3) => rebuilt.cubic_to(p1, p2, p3, false),
            }
        }

        let rebuilt_segments: Vec<_> = rebuilt.segments().collect();
        assert_eq!(segments, rebuilt_segments);
    }

    #[test]
    fn test_reverse_iterator_mirrors() {
        let path = triangle();
        let forward: Vec<_> = path.segments().collect();
        let mut reversed: Vec<_> = path.segments_reversed().collect();
        reversed.reverse();
        assert_eq!(forward.len(), reversed.len());
        for (f, r) in forward.iter().zip(reversed.iter()) {
            assert_eq!(f.from_point(), r.to_point());
            assert_eq!(f.to_point(), r.from_point());
        }
    }

    #[test]
    fn test_line_to_duplicate_is_noop() {
        let mut path = Path::new();
        path.move_to(vec2f(1.0, 1.0));
        path.line_to(vec2f(1.0, 1.0), false);
        assert!(path.is_empty());
    }

    #[test]
    fn test_cubic_folds_to_line() {
        let mut path = Path::new();
        path.move_to(vec2f(0.0, 0.0));
        path.cubic_to(vec2f(0.0, 0.0), vec2f(10.0, 0.0), vec2f(10.0, 0.0), false);
        assert_eq!(path.command(1), PathCommand::Line);
    }

    #[test]
    fn test_reverse_prepend() {
        let mut path = Path::new();
        path.move_to(vec2f(10.0, 0.0));
        path.line_to(vec2f(20.0, 0.0), false);
        path.line_to(vec2f(0.0, 0.0), true);
        let segments: Vec<_> = path.segments().collect();
        assert_eq!(segments[0], Segment::Line(vec2f(0.0, 0.0), vec2f(10.0, 0.0)));
        assert_eq!(segments[1], Segment::Line(vec2f(10.0, 0.0), vec2f(20.0, 0.0)));
    }

    #[test]
    fn test_split_line() {
        let mut path = triangle();
        let new_vertex = path.split(0, 0.5);
        assert_eq!(path.points()[new_vertex], vec2f(50.0, 0.0));
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn test_split_cubic_inserts_three() {
        let mut path = Path::new();
        path.move_to(vec2f(0.0, 0.0));
        path.cubic_to(vec2f(0.0, 50.0), vec2f(100.0, 50.0), vec2f(100.0, 0.0), false);
        let point_count = path.points().len();
        let new_vertex = path.split(0, 0.5);
        assert_eq!(path.points().len(), point_count + 3);
        assert!(path.is_vertex(new_vertex));
        // The split point lies on the original curve.
        let expected = CubicBezier::new(vec2d(0.0, 0.0),
                                        vec2d(0.0, 50.0),
                                        vec2d(100.0, 50.0),
                                        vec2d(100.0, 0.0))
            .sample(0.5);
        assert!((path.points()[new_vertex].to_f64() - expected).length() < 1e-4);
    }

    #[test]
    fn test_to_line_and_to_cubic() {
        let mut path = Path::new();
        path.move_to(vec2f(0.0, 0.0));
        path.quadratic_to(vec2f(5.0, 10.0), vec2f(10.0, 0.0), false);
        path.to_cubic(1, 0);
        assert_eq!(path.command(1), PathCommand::Cubic);
        // Degree elevation preserves shape.
        let segment = path.segments().next().unwrap();
        let expected = QuadraticBezier::new(vec2d(0.0, 0.0), vec2d(5.0, 10.0), vec2d(10.0, 0.0));
        for i in 0..=8 {
            let t = i as f64 / 8.0;
            assert!((segment.sample(t) - expected.sample(t)).length() < 1e-4);
        }

        path.to_line(1);
        assert_eq!(path.command(1), PathCommand::Line);
        assert_eq!(path.points().len(), 2);
    }

    #[test]
    fn test_remove_vertex_keep_shape() {
        let mut path = Path::new();
        path.move_to(vec2f(0.0, 0.0));
        path.line_to(vec2f(50.0, 50.0), false);
        path.line_to(vec2f(100.0, 0.0), false);
        path.remove(1, true);
        assert_eq!(path.len(), 1);
        let segment = path.segments().next().unwrap();
        assert_eq!(segment.from_point(), vec2f(0.0, 0.0));
        assert_eq!(segment.to_point(), vec2f(100.0, 0.0));
        // The fitted cubic passes near the removed corner's flanks.
        let mid = segment.sample(0.5);
        assert!(mid.y > 25.0);
    }

    #[test]
    fn test_remove_vertex_as_line() {
        let mut path = triangle();
        path.remove(1, false);
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_bounding_rect_exact_vs_approx() {
        let mut path = Path::new();
        path.move_to(vec2f(0.0, 0.0));
        path.cubic_to(vec2f(0.0, 100.0), vec2f(100.0, 100.0), vec2f(100.0, 0.0), false);
        let exact = path.bounding_rect();
        let approx = path.approx_bounding_rect().to_f64();
        assert!((exact.max.y - 75.0).abs() < 1e-6);
        assert!(approx.max.y >= exact.max.y);
        assert!(approx.contains_rect(&exact));
    }

    #[test]
    fn test_node_at() {
        let mut path = Path::new();
        path.move_to(vec2f(0.0, 0.0));
        path.cubic_to(vec2f(0.0, 10.0), vec2f(10.0, 10.0), vec2f(10.0, 0.0), false);
        path.line_to(vec2f(20.0, 0.0), false);

        let node = path.node_at(3);
        assert_eq!(node.vertex, 3);
        assert_eq!(node.in_handle, Some(2));
        assert_eq!(node.out_handle, None);
        assert_eq!(node.in_command, Some(1));
        assert_eq!(node.out_command, Some(2));

        // A handle resolves to its owning vertex.
        let handle_node = path.node_at(2);
        assert_eq!(handle_node.vertex, 3);
    }

    #[test]
    fn test_vertex_classification() {
        let mut path = Path::new();
        path.move_to(vec2f(0.0, 0.0));
        path.quadratic_to(vec2f(5.0, 10.0), vec2f(10.0, 0.0), false);
        assert!(path.is_vertex(0));
        assert!(path.is_handle(1));
        assert!(path.is_vertex(2));
        assert!(path.is_open_end(0));
        assert!(path.is_open_end(2));
        assert!(!path.is_open_end(1));
    }

    #[test]
    fn test_is_point_inside_fill() {
        let path = triangle();
        let transform = Transform2D::identity();
        assert!(path.is_point_inside_path(vec2f(50.0, 30.0),
                                          Some(FillRule::NonZero),
                                          None,
                                          &transform,
                                          0.0,
                                          1.0,
                                          false));
        assert!(!path.is_point_inside_path(vec2f(200.0, 30.0),
                                           Some(FillRule::NonZero),
                                           None,
                                           &transform,
                                           0.0,
                                           1.0,
                                           false));
    }

    #[test]
    fn test_is_point_inside_stroke() {
        let mut path = Path::new();
        path.move_to(vec2f(0.0, 0.0));
        path.line_to(vec2f(100.0, 0.0), false);
        let transform = Transform2D::identity();
        let stroke = StrokeStyle::new(10.0);
        assert!(path.is_point_inside_path(vec2f(50.0, 4.0),
                                          None,
                                          Some(&stroke),
                                          &transform,
                                          0.0,
                                          1.0,
                                          false));
        assert!(!path.is_point_inside_path(vec2f(50.0, 8.0),
                                           None,
                                           Some(&stroke),
                                           &transform,
                                           0.0,
                                           1.0,
                                           false));
    }

    #[test]
    fn test_intersects_rect() {
        let path = triangle();
        let transform = Transform2D::identity();
        let mut indices = HashSet::new();
        assert!(path.intersects(&RectD::new(vec2d(-10.0, -10.0), vec2d(10.0, 10.0)),
                                &transform,
                                Some(&mut indices)));
        assert!(indices.contains(&0));
        assert!(!path.intersects(&RectD::new(vec2d(200.0, 200.0), vec2d(300.0, 300.0)),
                                 &transform,
                                 None));
        // A rect inside the triangle but away from the outline.
        assert!(!path.intersects(&RectD::new(vec2d(45.0, 30.0), vec2d(55.0, 40.0)),
                                 &transform,
                                 None));
    }

    #[test]
    fn test_close_with_handles_emits_cubic() {
        let mut path = Path::new();
        path.move_to(vec2f(0.0, 0.0));
        path.line_to(vec2f(10.0, 0.0), false);
        path.set_out_handle(vec2f(15.0, 5.0));
        path.set_in_handle(vec2f(-5.0, 5.0));
        path.close();
        assert!(path.is_closed());
        let last = path.segments().last().unwrap();
        match last {
            Segment::Cubic(_, c1, c2, p3) => {
                assert_eq!(c1, vec2f(15.0, 5.0));
                assert_eq!(c2, vec2f(-5.0, 5.0));
                assert_eq!(p3, vec2f(0.0, 0.0));
            }
            _ => panic!("expected a closing cubic"),
        }
    }

    #[test]
    fn test_translate_vertex_drags_handles() {
        let mut path = Path::new();
        path.move_to(vec2f(0.0, 0.0));
        path.cubic_to(vec2f(3.0, 10.0), vec2f(7.0, 10.0), vec2f(10.0, 0.0), false);
        path.line_to(vec2f(20.0, 0.0), false);
        path.translate(3, vec2f(1.0, 2.0));
        assert_eq!(path.points()[3], vec2f(11.0, 2.0));
        assert_eq!(path.points()[2], vec2f(8.0, 12.0));
        // The other curve handle stays put.
        assert_eq!(path.points()[1], vec2f(3.0, 10.0));
    }
}
