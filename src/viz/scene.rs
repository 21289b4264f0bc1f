//! Retained scene graph: the drawing surface every renderer writes into.
//!
//! Nodes are addressed by [`NodeId`] and may carry a class (for selection) and a
//! data key (for [`Scene::join`], the keyed enter/update/exit diff). Geometry
//! updates mutate nodes in place, so element counts only change when data does.

use crate::color::Color;
use crate::models::{Point, Size};
use ahash::AHashMap;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSeg {
    MoveTo(Point),
    LineTo(Point),
    CubicTo(Point, Point, Point),
    Close,
}

/// Path geometry, kept as segments so it can be emitted as SVG `d` or flattened.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    segs: Vec<PathSeg>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.segs.push(PathSeg::MoveTo(p));
        self
    }

    pub fn line_to(&mut self, p: Point) -> &mut Self {
        self.segs.push(PathSeg::LineTo(p));
        self
    }

    pub fn cubic_to(&mut self, c1: Point, c2: Point, p: Point) -> &mut Self {
        self.segs.push(PathSeg::CubicTo(c1, c2, p));
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.segs.push(PathSeg::Close);
        self
    }

    /// Start a new subpath through `points` with straight segments.
    pub fn polyline(&mut self, points: &[Point]) -> &mut Self {
        if let Some((first, rest)) = points.split_first() {
            self.move_to(*first);
            for p in rest {
                self.line_to(*p);
            }
        }
        self
    }

    pub fn segments(&self) -> &[PathSeg] {
        &self.segs
    }

    pub fn is_empty(&self) -> bool {
        self.segs.is_empty()
    }

    /// SVG path data string, two decimals per coordinate.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        for seg in &self.segs {
            let _ = match seg {
                PathSeg::MoveTo(p) => write!(out, "M{:.2},{:.2}", p.x, p.y),
                PathSeg::LineTo(p) => write!(out, "L{:.2},{:.2}", p.x, p.y),
                PathSeg::CubicTo(a, b, p) => write!(
                    out,
                    "C{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
                    a.x, a.y, b.x, b.y, p.x, p.y
                ),
                PathSeg::Close => write!(out, "Z"),
            };
        }
        out
    }

    /// Polylines approximating each subpath (`steps` samples per cubic), with their closed flag.
    pub fn flatten(&self, steps: usize) -> Vec<(Vec<Point>, bool)> {
        let steps = steps.max(1);
        let mut out: Vec<(Vec<Point>, bool)> = Vec::new();
        let mut cur: Vec<Point> = Vec::new();
        for seg in &self.segs {
            match *seg {
                PathSeg::MoveTo(p) => {
                    if !cur.is_empty() {
                        out.push((std::mem::take(&mut cur), false));
                    }
                    cur.push(p);
                }
                PathSeg::LineTo(p) => cur.push(p),
                PathSeg::CubicTo(c1, c2, p) => {
                    let p0 = cur.last().copied().unwrap_or(c1);
                    for i in 1..=steps {
                        let t = i as f64 / steps as f64;
                        cur.push(cubic_point(p0, c1, c2, p, t));
                    }
                }
                PathSeg::Close => {
                    if !cur.is_empty() {
                        out.push((std::mem::take(&mut cur), true));
                    }
                }
            }
        }
        if !cur.is_empty() {
            out.push((cur, false));
        }
        out
    }
}

pub fn cubic_point(p0: Point, c1: Point, c2: Point, p1: Point, t: f64) -> Point {
    let u = 1.0 - t;
    let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
    Point::new(
        a * p0.x + b * c1.x + c * c2.x + d * p1.x,
        a * p0.y + b * c1.y + c * c2.y + d * p1.y,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    Start,
    #[default]
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Group,
    Path(PathData),
    Circle { center: Point, radius: f64 },
    Line { from: Point, to: Point },
    Rect { origin: Point, size: Size },
    Text {
        pos: Point,
        content: String,
        anchor: Anchor,
        /// Degrees, clockwise, around `pos`.
        rotate: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub fill: Option<Color>,
    pub fill_opacity: f64,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub font_size: f64,
    pub bold: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: None,
            fill_opacity: 1.0,
            stroke: None,
            stroke_width: 1.0,
            font_size: 10.0,
            bold: false,
        }
    }
}

impl Style {
    pub fn filled(color: Color) -> Self {
        Self {
            fill: Some(color),
            ..Self::default()
        }
    }

    pub fn stroked(color: Color, width: f64) -> Self {
        Self {
            stroke: Some(color),
            stroke_width: width,
            ..Self::default()
        }
    }

    pub fn text(color: Color, font_size: f64) -> Self {
        Self {
            fill: Some(color),
            font_size,
            ..Self::default()
        }
    }

    pub fn with_stroke(mut self, color: Color, width: f64) -> Self {
        self.stroke = Some(color);
        self.stroke_width = width;
        self
    }

    pub fn with_fill_opacity(mut self, opacity: f64) -> Self {
        self.fill_opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// Translate-then-scale transform of a node relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate: Point,
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translate: Point { x: 0.0, y: 0.0 },
        scale: 1.0,
    };

    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            translate: Point::new(x, y),
            scale: 1.0,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.translate.x + p.x * self.scale,
            self.translate.y + p.y * self.scale,
        )
    }

    /// `self` applied inside `outer`.
    pub fn within(&self, outer: &Transform) -> Transform {
        Transform {
            translate: outer.apply(self.translate),
            scale: self.scale * outer.scale,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    pub class: Option<String>,
    pub key: Option<String>,
    pub element: Element,
    pub style: Style,
    pub transform: Transform,
}

impl Node {
    pub fn new(element: Element) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            class: None,
            key: None,
            element,
            style: Style::default(),
            transform: Transform::IDENTITY,
        }
    }

    pub fn group() -> Self {
        Self::new(Element::Group)
    }

    pub fn path(data: PathData) -> Self {
        Self::new(Element::Path(data))
    }

    pub fn circle(center: Point, radius: f64) -> Self {
        Self::new(Element::Circle { center, radius })
    }

    pub fn line(from: Point, to: Point) -> Self {
        Self::new(Element::Line { from, to })
    }

    pub fn rect(origin: Point, size: Size) -> Self {
        Self::new(Element::Rect { origin, size })
    }

    pub fn text(pos: Point, content: impl Into<String>, anchor: Anchor) -> Self {
        Self::new(Element::Text {
            pos,
            content: content.into(),
            anchor,
            rotate: 0.0,
        })
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.class = Some(class.to_string());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class.as_deref() == Some(class)
    }

    pub fn text_content(&self) -> Option<&str> {
        match &self.element {
            Element::Text { content, .. } => Some(content),
            _ => None,
        }
    }
}

/// Result of [`Scene::join`]: indices into the key list that need new nodes,
/// existing nodes matched to keys, and how many stale nodes were removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Join {
    pub enter: Vec<usize>,
    pub update: Vec<(usize, NodeId)>,
    pub exit: usize,
}

#[derive(Debug, Clone)]
pub struct Scene {
    size: Size,
    root: NodeId,
    next_id: u64,
    nodes: AHashMap<NodeId, Node>,
}

impl Scene {
    pub fn new(size: Size) -> Self {
        let root = NodeId(0);
        let mut nodes = AHashMap::new();
        nodes.insert(root, Node::group());
        Self {
            size: size.sanitized(),
            root,
            next_id: 1,
            nodes,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size.sanitized();
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes, not counting the root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Append `node` as the last child of `parent` (the root if `parent` is gone).
    pub fn append(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let parent = if self.nodes.contains_key(&parent) {
            parent
        } else {
            log::debug!("append to missing node {parent:?}, using root");
            self.root
        };
        let id = NodeId(self.next_id);
        self.next_id += 1;
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.insert(id, node);
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        id
    }

    /// Remove a node and its subtree. The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root {
            return false;
        }
        let Some(node) = self.nodes.remove(&id) else {
            return false;
        };
        if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|c| *c != id);
        }
        let mut stack = node.children;
        while let Some(child) = stack.pop() {
            if let Some(n) = self.nodes.remove(&child) {
                stack.extend(n.children);
            }
        }
        true
    }

    pub fn clear_children(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self.children(id).to_vec();
        for c in children {
            self.remove(c);
        }
    }

    /// Direct children of `parent` carrying `class`, in order.
    pub fn select_class(&self, parent: NodeId, class: &str) -> Vec<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .filter(|c| self.nodes.get(c).is_some_and(|n| n.has_class(class)))
            .collect()
    }

    /// Every node in the scene carrying `class`, in draw order.
    pub fn select_all(&self, class: &str) -> Vec<NodeId> {
        self.walk()
            .into_iter()
            .filter(|(id, _)| self.nodes.get(id).is_some_and(|n| n.has_class(class)))
            .map(|(id, _)| id)
            .collect()
    }

    pub fn count_class(&self, class: &str) -> usize {
        self.nodes.values().filter(|n| n.has_class(class)).count()
    }

    pub fn set_element(&mut self, id: NodeId, element: Element) {
        if let Some(n) = self.nodes.get_mut(&id) {
            n.element = element;
        }
    }

    pub fn set_transform(&mut self, id: NodeId, transform: Transform) {
        if let Some(n) = self.nodes.get_mut(&id) {
            n.transform = transform;
        }
    }

    /// Depth-first draw order (parents before children), with accumulated transforms.
    /// The root itself is not listed.
    pub fn walk(&self) -> Vec<(NodeId, Transform)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(NodeId, Transform)> = self
            .children(self.root)
            .iter()
            .rev()
            .map(|c| (*c, Transform::IDENTITY))
            .collect();
        while let Some((id, outer)) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            let world = node.transform.within(&outer);
            out.push((id, world));
            stack.extend(node.children.iter().rev().map(|c| (*c, world)));
        }
        out
    }

    /// Keyed diff of `parent`'s `class` children against `keys`.
    ///
    /// Matching nodes are reported in `update`; unmatched and duplicate-keyed nodes
    /// are removed; the caller creates nodes for every index in `enter`.
    pub fn join<K: AsRef<str>>(&mut self, parent: NodeId, class: &str, keys: &[K]) -> Join {
        let mut existing: AHashMap<String, NodeId> = AHashMap::new();
        let mut stale: Vec<NodeId> = Vec::new();
        for id in self.select_class(parent, class) {
            match self.nodes.get(&id).and_then(|n| n.key.clone()) {
                Some(k) if !existing.contains_key(&k) => {
                    existing.insert(k, id);
                }
                _ => stale.push(id),
            }
        }
        let mut join = Join::default();
        for (i, key) in keys.iter().enumerate() {
            match existing.remove(key.as_ref()) {
                Some(id) => join.update.push((i, id)),
                None => join.enter.push(i),
            }
        }
        stale.extend(existing.into_values());
        join.exit = stale.len();
        for id in stale {
            self.remove(id);
        }
        join
    }
}
