//! GLO binary model format
//!
//! Binary layout (little-endian, no padding between fields):
//! ```text
//! header   magic "GLO\0" (4) + version u16
//! file     header + u16 object count + objects
//! object   u16 anim count + anims (40 bytes each) + u16 mesh count + meshes
//! mesh     name (24)
//!          u16 count + N x (i32 time + 3 x f32)      move keys
//!          u16 count + N x (i32 time + 3 x f32)      scale keys
//!          u16 count + N x (i32 time + 4 x f32)      rotate keys
//!          u16 count + N x 3 x f32                   vertices
//!          u16 count + N x face (52 bytes)
//!          u16 count + N x sprite (42 bytes)
//!          u16 xlu + u16 flags
//!          u16 has_child [+ mesh]  u16 has_next [+ mesh]
//! ```
//! Child and next meshes are stored inline and depth-first; mesh subtrees
//! carry no length prefix.

mod document;
mod editor;
mod inspect;
mod reader;
mod writer;

pub use document::{
    AnimName, Color, FixedName, GloAnim, GloFace, GloFile, GloMesh, GloObject, GloSprite,
    Keyframe, MeshName, MoveKey, Quat, RotateKey, ScaleKey, TextureName, Vec2, Vec3, VertexRef,
};
pub use inspect::GloSummary;
pub use reader::{parse_glo_bytes, read_glo};
pub use writer::{serialize_glo, write_glo};

/// Header magic, NUL included.
pub const GLO_MAGIC: [u8; 4] = *b"GLO\0";

/// The only supported format version.
pub const GLO_VERSION: u16 = 0x0001;

/// Version string written in text banners.
pub const GLO_VERSION_STR: &str = "0.1";

pub const MESH_NAME_LEN: usize = 24;
pub const ANIM_NAME_LEN: usize = 24;
pub const TEXTURE_NAME_LEN: usize = 16;

/// Size of an animation record (name + start + end + flags + speed).
pub const ANIM_SIZE: usize = ANIM_NAME_LEN + 16;
/// Size of a move/scale keyframe record.
pub const VEC3_KEY_SIZE: usize = 4 + 12;
/// Size of a rotate keyframe record.
pub const QUAT_KEY_SIZE: usize = 4 + 16;
pub const VERTEX_SIZE: usize = 12;
/// Size of a face corner (index + uv).
pub const VREF_SIZE: usize = 2 + 8;
pub const FACE_SIZE: usize = TEXTURE_NAME_LEN + 4 + 2 + 3 * VREF_SIZE;
pub const SPRITE_SIZE: usize = TEXTURE_NAME_LEN + 4 + 12 + 8 + 2;

/// Most levels of `child` links the decoders accept, the root mesh being
/// level 1. Meshes joined by `next` share a level.
pub const MAX_MESH_DEPTH: usize = 512;
