//! GLO model tree definitions
//!
//! A [`GloFile`] owns its objects, each object owns its animations and a
//! forest of root meshes, and each mesh owns its keyframes, geometry and the
//! optional `child`/`next` sub-meshes that encode the hierarchy in
//! left-child/right-sibling form.

use std::borrow::Cow;
use std::fmt;

use serde::{Serialize, Serializer};

use super::{ANIM_NAME_LEN, MESH_NAME_LEN, TEXTURE_NAME_LEN};

/// Fixed-capacity, NUL-padded name field.
///
/// The full buffer is kept so that bytes after the first NUL survive a binary
/// round trip. A name that fills the buffer has no terminator.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedName<const N: usize>([u8; N]);

/// Mesh name field (24 bytes).
pub type MeshName = FixedName<MESH_NAME_LEN>;
/// Animation name field (24 bytes).
pub type AnimName = FixedName<ANIM_NAME_LEN>;
/// Texture name field (16 bytes).
pub type TextureName = FixedName<TEXTURE_NAME_LEN>;

impl<const N: usize> FixedName<N> {
    /// Build a name from a string, truncated to `N` bytes and zero-padded.
    pub fn new(name: &str) -> Self {
        let mut buf = [0u8; N];
        let bytes = c_str(name.as_bytes());
        let len = bytes.len().min(N);
        buf[..len].copy_from_slice(&bytes[..len]);
        Self(buf)
    }

    /// Wrap a raw buffer as read from disk.
    pub const fn from_raw(raw: [u8; N]) -> Self {
        Self(raw)
    }

    /// Build a name from unquoted text content. `None` if it does not fit.
    pub fn from_text(text: &[u8]) -> Option<Self> {
        if text.len() > N {
            return None;
        }
        let mut buf = [0u8; N];
        buf[..text.len()].copy_from_slice(text);
        Some(Self(buf))
    }

    /// Copy with every byte after the first NUL cleared.
    pub fn normalized(&self) -> Self {
        let mut buf = [0u8; N];
        let bytes = self.as_bytes();
        buf[..bytes.len()].copy_from_slice(bytes);
        Self(buf)
    }

    /// The full raw buffer, padding included.
    pub const fn raw(&self) -> &[u8; N] {
        &self.0
    }

    /// The bytes before the first NUL.
    pub fn as_bytes(&self) -> &[u8] {
        c_str(&self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0[0] == 0
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// Compare against `other` the way a bounded C string compare does:
    /// at most `N` bytes, stopping at the first NUL.
    pub fn matches(&self, other: &str) -> bool {
        let other = other.as_bytes();
        for i in 0..N {
            let a = self.0[i];
            let b = other.get(i).copied().unwrap_or(0);
            if a != b {
                return false;
            }
            if a == 0 {
                return true;
            }
        }
        true
    }
}

impl<const N: usize> Default for FixedName<N> {
    fn default() -> Self {
        Self([0u8; N])
    }
}

impl<const N: usize> fmt::Display for FixedName<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl<const N: usize> fmt::Debug for FixedName<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string_lossy())
    }
}

impl<const N: usize> Serialize for FixedName<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string_lossy())
    }
}

fn c_str(bytes: &[u8]) -> &[u8] {
    let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    &bytes[..len]
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl Quat {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

/// Packed RGBA color. Byte order in the file is R, G, B, A.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(u32::from_le_bytes([r, g, b, a]))
    }

    pub const fn r(self) -> u8 {
        self.0.to_le_bytes()[0]
    }

    pub const fn g(self) -> u8 {
        self.0.to_le_bytes()[1]
    }

    pub const fn b(self) -> u8 {
        self.0.to_le_bytes()[2]
    }

    pub const fn a(self) -> u8 {
        self.0.to_le_bytes()[3]
    }
}

/// A keyframe on one transform track.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Keyframe<T> {
    pub time: i32,
    pub value: T,
}

/// Translation keyframe.
pub type MoveKey = Keyframe<Vec3>;
/// Scale keyframe.
pub type ScaleKey = Keyframe<Vec3>;
/// Rotation keyframe.
pub type RotateKey = Keyframe<Quat>;

impl<T> Keyframe<T> {
    pub const fn new(time: i32, value: T) -> Self {
        Self { time, value }
    }
}

/// One face corner: an index into the mesh's vertices plus its own UV.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VertexRef {
    pub index: u16,
    pub uv: Vec2,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GloFace {
    pub texture: TextureName,
    pub color: Color,
    pub flags: u16,
    pub vrefs: [VertexRef; 3],
}

/// Camera-facing billboard.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GloSprite {
    pub texture: TextureName,
    pub color: Color,
    pub position: Vec3,
    pub size: Vec2,
    pub flags: u16,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GloAnim {
    pub name: AnimName,
    pub start: i32,
    pub end: i32,
    pub flags: u32,
    pub speed: f32,
}

/// A mesh node.
///
/// `child` starts a nested hierarchy below this mesh and `next` continues the
/// list this mesh belongs to. The presence of each link is the `Option`
/// itself; it is written to disk as a 16-bit 0/1 flag ahead of the payload.
///
/// Traversals and teardown keep their own work lists, so long `next` lists
/// and deep `child` chains never grow the call stack. The derived `Clone`,
/// `PartialEq` and `Debug` do recurse through both links.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GloMesh {
    pub name: MeshName,
    pub move_keys: Vec<MoveKey>,
    pub scale_keys: Vec<ScaleKey>,
    pub rotate_keys: Vec<RotateKey>,
    pub vertices: Vec<Vec3>,
    pub faces: Vec<GloFace>,
    pub sprites: Vec<GloSprite>,
    /// Translucency code, opaque to the codec.
    pub xlu: u16,
    pub flags: u16,
    pub child: Option<Box<GloMesh>>,
    pub next: Option<Box<GloMesh>>,
}

impl GloMesh {
    /// Create an empty mesh with the given name.
    pub fn new(name: &str) -> Self {
        Self::named(MeshName::new(name))
    }

    /// Create an empty mesh from a raw name field.
    pub fn named(name: MeshName) -> Self {
        Self {
            name,
            move_keys: Vec::new(),
            scale_keys: Vec::new(),
            rotate_keys: Vec::new(),
            vertices: Vec::new(),
            faces: Vec::new(),
            sprites: Vec::new(),
            xlu: 0,
            flags: 0,
            child: None,
            next: None,
        }
    }

    pub fn has_child(&self) -> bool {
        self.child.is_some()
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Visit this mesh and every mesh reachable through `child` and `next`,
    /// depth-first: self, then the child subtree, then the next subtree.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a GloMesh)) {
        let mut pending = vec![self];
        while let Some(mesh) = pending.pop() {
            visit(mesh);
            // Child goes on top so its subtree is finished before `next`
            if let Some(next) = mesh.next.as_deref() {
                pending.push(next);
            }
            if let Some(child) = mesh.child.as_deref() {
                pending.push(child);
            }
        }
    }

    /// Mutable form of [`GloMesh::walk`].
    ///
    /// Links are followed after `visit` returns, so a visitor that replaces
    /// `child` or `next` sees the new subtree visited.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut GloMesh)) {
        let mut pending = vec![self];
        while let Some(mesh) = pending.pop() {
            visit(mesh);
            let GloMesh { child, next, .. } = mesh;
            if let Some(next) = next.as_deref_mut() {
                pending.push(next);
            }
            if let Some(child) = child.as_deref_mut() {
                pending.push(child);
            }
        }
    }
}

impl Drop for GloMesh {
    fn drop(&mut self) {
        let mut pending: Vec<Box<GloMesh>> = Vec::new();
        pending.extend(self.child.take());
        pending.extend(self.next.take());
        while let Some(mut mesh) = pending.pop() {
            pending.extend(mesh.child.take());
            pending.extend(mesh.next.take());
        }
    }
}

/// An object: animations plus a forest of independently rooted mesh trees.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GloObject {
    pub anims: Vec<GloAnim>,
    pub meshes: Vec<GloMesh>,
}

impl GloObject {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A whole GLO file. The header is implied: magic `GLO\0`, version 1.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GloFile {
    pub objects: Vec<GloObject>,
}

impl GloFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every mesh in the file, depth-first in file order.
    pub fn for_each_mesh<'a>(&'a self, mut visit: impl FnMut(&'a GloMesh)) {
        for object in &self.objects {
            for mesh in &object.meshes {
                mesh.walk(&mut visit);
            }
        }
    }

    pub fn for_each_mesh_mut(&mut self, mut visit: impl FnMut(&mut GloMesh)) {
        for object in &mut self.objects {
            for mesh in &mut object.meshes {
                mesh.walk_mut(&mut visit);
            }
        }
    }
}
