//! GLO binary reading
//!
//! Every read is checked against the bytes left in the buffer, and every
//! count is checked against the smallest size its records can occupy before
//! anything is allocated, so damaged files fail with
//! [`Error::TruncatedInput`] instead of over-reading.

use super::document::{
    Color, FixedName, GloAnim, GloFace, GloFile, GloMesh, GloObject, GloSprite, Keyframe, Quat,
    Vec2, Vec3, VertexRef,
};
use super::{
    ANIM_SIZE, FACE_SIZE, GLO_MAGIC, GLO_VERSION, MAX_MESH_DEPTH, QUAT_KEY_SIZE, SPRITE_SIZE,
    VEC3_KEY_SIZE, VERTEX_SIZE,
};
use crate::error::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

/// Smallest possible object: two empty counts.
const MIN_OBJECT_SIZE: usize = 4;
/// Smallest possible mesh: name, six empty counts, xlu, flags, two clear links.
const MIN_MESH_SIZE: usize = super::MESH_NAME_LEN + 6 * 2 + 4 * 2;

/// Read a GLO file from disk
///
/// # Errors
/// Returns an error if the file cannot be read or is not a valid GLO file.
pub fn read_glo<P: AsRef<Path>>(path: P) -> Result<GloFile> {
    let mut file = File::open(path)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    parse_glo_bytes(&buffer)
}

/// Parse GLO data from bytes
///
/// The whole buffer must be consumed; trailing bytes are rejected so that
/// every accepted buffer re-encodes to itself.
///
/// # Errors
/// Returns [`Error::InvalidGloMagic`] or [`Error::UnsupportedGloVersion`] for a
/// bad header, [`Error::TruncatedInput`] if the data ends early,
/// [`Error::InvalidLinkFlag`] / [`Error::NestingTooDeep`] for a malformed mesh
/// hierarchy and [`Error::TrailingData`] if bytes are left over.
pub fn parse_glo_bytes(data: &[u8]) -> Result<GloFile> {
    let mut reader = GloReader::new(data);

    let magic: [u8; 4] = reader.read_array()?;
    if magic != GLO_MAGIC {
        return Err(Error::InvalidGloMagic(magic));
    }

    let version = reader.read_u16()?;
    if version != GLO_VERSION {
        return Err(Error::UnsupportedGloVersion { version });
    }

    let num_objects = reader.read_count(MIN_OBJECT_SIZE)?;
    let mut objects = Vec::with_capacity(num_objects);
    for _ in 0..num_objects {
        objects.push(read_object(&mut reader)?);
    }

    if reader.remaining() > 0 {
        return Err(Error::TrailingData {
            offset: reader.position(),
            remaining: reader.remaining(),
        });
    }

    tracing::debug!("Decoded GLO: {} objects, {} bytes", objects.len(), data.len());
    Ok(GloFile { objects })
}

fn read_object(reader: &mut GloReader<'_>) -> Result<GloObject> {
    let num_anims = reader.read_count(ANIM_SIZE)?;
    let mut anims = Vec::with_capacity(num_anims);
    for _ in 0..num_anims {
        anims.push(GloAnim {
            name: reader.read_name()?,
            start: reader.read_i32()?,
            end: reader.read_i32()?,
            flags: reader.read_u32()?,
            speed: reader.read_f32()?,
        });
    }

    let num_meshes = reader.read_count(MIN_MESH_SIZE)?;
    let mut meshes = Vec::with_capacity(num_meshes);
    for _ in 0..num_meshes {
        meshes.push(read_mesh(reader)?);
    }

    tracing::debug!("Object: {} anims, {} root meshes", anims.len(), meshes.len());
    Ok(GloObject { anims, meshes })
}

/// Read one root mesh with everything linked below it.
///
/// `siblings` is the list being read at the current `child` depth and
/// `parents` holds the lists above it, each ending with the mesh whose child
/// is being read. Only `child` links add a level, so long `next` lists cost
/// no depth.
fn read_mesh(reader: &mut GloReader<'_>) -> Result<GloMesh> {
    let mut parents: Vec<Vec<GloMesh>> = Vec::new();
    let mut siblings: Vec<GloMesh> = Vec::new();
    loop {
        siblings.push(read_mesh_body(reader)?);
        if reader.read_link_flag()? {
            if parents.len() + 1 >= MAX_MESH_DEPTH {
                return Err(Error::NestingTooDeep { limit: MAX_MESH_DEPTH });
            }
            parents.push(std::mem::take(&mut siblings));
            continue;
        }

        // The last mesh is complete; close lists until one continues
        while !reader.read_link_flag()? {
            let head = link_siblings(std::mem::take(&mut siblings));
            match parents.pop() {
                Some(mut above) => {
                    if let Some(parent) = above.last_mut() {
                        parent.child = head.map(Box::new);
                    }
                    siblings = above;
                }
                // Every list holds a mesh before it can be closed
                None => return Ok(head.unwrap_or_default()),
            }
        }
    }
}

/// Chain a sibling list through `next`, first mesh at the head.
fn link_siblings(mut siblings: Vec<GloMesh>) -> Option<GloMesh> {
    let mut head = siblings.pop()?;
    while let Some(mut previous) = siblings.pop() {
        previous.next = Some(Box::new(head));
        head = previous;
    }
    Some(head)
}

/// Read a mesh up to, not including, its `has_child` flag.
fn read_mesh_body(reader: &mut GloReader<'_>) -> Result<GloMesh> {
    let mut mesh = GloMesh::named(reader.read_name()?);

    let num_move_keys = reader.read_count(VEC3_KEY_SIZE)?;
    mesh.move_keys.reserve_exact(num_move_keys);
    for _ in 0..num_move_keys {
        mesh.move_keys.push(Keyframe::new(reader.read_i32()?, reader.read_vec3()?));
    }

    let num_scale_keys = reader.read_count(VEC3_KEY_SIZE)?;
    mesh.scale_keys.reserve_exact(num_scale_keys);
    for _ in 0..num_scale_keys {
        mesh.scale_keys.push(Keyframe::new(reader.read_i32()?, reader.read_vec3()?));
    }

    let num_rotate_keys = reader.read_count(QUAT_KEY_SIZE)?;
    mesh.rotate_keys.reserve_exact(num_rotate_keys);
    for _ in 0..num_rotate_keys {
        mesh.rotate_keys.push(Keyframe::new(reader.read_i32()?, reader.read_quat()?));
    }

    let num_vertices = reader.read_count(VERTEX_SIZE)?;
    mesh.vertices.reserve_exact(num_vertices);
    for _ in 0..num_vertices {
        mesh.vertices.push(reader.read_vec3()?);
    }

    let num_faces = reader.read_count(FACE_SIZE)?;
    mesh.faces.reserve_exact(num_faces);
    for _ in 0..num_faces {
        mesh.faces.push(read_face(reader)?);
    }

    let num_sprites = reader.read_count(SPRITE_SIZE)?;
    mesh.sprites.reserve_exact(num_sprites);
    for _ in 0..num_sprites {
        mesh.sprites.push(GloSprite {
            texture: reader.read_name()?,
            color: Color(reader.read_u32()?),
            position: reader.read_vec3()?,
            size: reader.read_vec2()?,
            flags: reader.read_u16()?,
        });
    }

    mesh.xlu = reader.read_u16()?;
    mesh.flags = reader.read_u16()?;
    Ok(mesh)
}

fn read_face(reader: &mut GloReader<'_>) -> Result<GloFace> {
    let texture = reader.read_name()?;
    let color = Color(reader.read_u32()?);
    let flags = reader.read_u16()?;
    let mut vrefs = [VertexRef::default(); 3];
    for vref in &mut vrefs {
        vref.index = reader.read_u16()?;
        vref.uv = reader.read_vec2()?;
    }
    Ok(GloFace {
        texture,
        color,
        flags,
        vrefs,
    })
}

/// Bounds-checked little-endian reader over an in-memory buffer.
struct GloReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> GloReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    fn remaining(&self) -> usize {
        self.cursor.get_ref().len().saturating_sub(self.position())
    }

    fn require(&self, needed: usize) -> Result<()> {
        let available = self.remaining();
        if needed > available {
            return Err(Error::TruncatedInput {
                offset: self.position(),
                needed,
                available,
            });
        }
        Ok(())
    }

    /// Read a 16-bit count and check that `count` records of at least
    /// `record_size` bytes can still follow.
    fn read_count(&mut self, record_size: usize) -> Result<usize> {
        let count = self.read_u16()? as usize;
        self.require(count * record_size)?;
        Ok(count)
    }

    /// Read a `has_child`/`has_next` flag.
    fn read_link_flag(&mut self) -> Result<bool> {
        let offset = self.position();
        match self.read_u16()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(Error::InvalidLinkFlag { value, offset }),
        }
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.require(N)?;
        let mut buf = [0u8; N];
        self.cursor.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn read_name<const N: usize>(&mut self) -> Result<FixedName<N>> {
        Ok(FixedName::from_raw(self.read_array()?))
    }

    fn read_u16(&mut self) -> Result<u16> {
        self.require(2)?;
        Ok(self.cursor.read_u16::<LittleEndian>()?)
    }

    fn read_i32(&mut self) -> Result<i32> {
        self.require(4)?;
        Ok(self.cursor.read_i32::<LittleEndian>()?)
    }

    fn read_u32(&mut self) -> Result<u32> {
        self.require(4)?;
        Ok(self.cursor.read_u32::<LittleEndian>()?)
    }

    fn read_f32(&mut self) -> Result<f32> {
        self.require(4)?;
        Ok(self.cursor.read_f32::<LittleEndian>()?)
    }

    fn read_vec2(&mut self) -> Result<Vec2> {
        Ok(Vec2::new(self.read_f32()?, self.read_f32()?))
    }

    fn read_vec3(&mut self) -> Result<Vec3> {
        Ok(Vec3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }

    fn read_quat(&mut self) -> Result<Quat> {
        Ok(Quat::new(
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use byteorder::WriteBytesExt;

    fn header(out: &mut Vec<u8>) {
        out.extend_from_slice(b"GLO\0");
        out.write_u16::<LittleEndian>(1).unwrap();
    }

    fn empty_mesh(out: &mut Vec<u8>, name: &str, has_child: u16, has_next: u16) {
        let mut raw = [0u8; 24];
        raw[..name.len()].copy_from_slice(name.as_bytes());
        out.extend_from_slice(&raw);
        for _ in 0..6 {
            out.write_u16::<LittleEndian>(0).unwrap();
        }
        out.write_u16::<LittleEndian>(0).unwrap(); // xlu
        out.write_u16::<LittleEndian>(0).unwrap(); // flags
        out.write_u16::<LittleEndian>(has_child).unwrap();
        if has_child == 0 {
            out.write_u16::<LittleEndian>(has_next).unwrap();
        }
    }

    #[test]
    fn test_empty_file() {
        let mut data = Vec::new();
        header(&mut data);
        data.write_u16::<LittleEndian>(0).unwrap();
        let glo = parse_glo_bytes(&data).unwrap();
        assert!(glo.objects.is_empty());
    }

    #[test]
    fn test_bad_magic() {
        let data = b"GLB\0\x01\x00\x00\x00";
        let err = parse_glo_bytes(data).unwrap_err();
        assert!(matches!(err, Error::InvalidGloMagic(m) if &m == b"GLB\0"));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_bad_version() {
        let data = b"GLO\0\x02\x00\x00\x00";
        let err = parse_glo_bytes(data).unwrap_err();
        assert!(matches!(err, Error::UnsupportedGloVersion { version: 2 }));
    }

    #[test]
    fn test_truncated_header() {
        let err = parse_glo_bytes(b"GL").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Truncated);
    }

    #[test]
    fn test_count_beyond_buffer() {
        let mut data = Vec::new();
        header(&mut data);
        data.write_u16::<LittleEndian>(1).unwrap(); // objects
        data.write_u16::<LittleEndian>(500).unwrap(); // anims, none present
        data.write_u16::<LittleEndian>(0).unwrap(); // meshes
        let err = parse_glo_bytes(&data).unwrap_err();
        assert!(matches!(
            err,
            Error::TruncatedInput { offset: 10, needed: 20000, available: 2 }
        ));
    }

    #[test]
    fn test_child_and_next_links() {
        let mut data = Vec::new();
        header(&mut data);
        data.write_u16::<LittleEndian>(1).unwrap(); // objects
        data.write_u16::<LittleEndian>(0).unwrap(); // anims
        data.write_u16::<LittleEndian>(1).unwrap(); // meshes
        // root -> child "arm" (no links), then root.next "leg"
        empty_mesh(&mut data, "root", 1, 0);
        empty_mesh(&mut data, "arm", 0, 0);
        data.write_u16::<LittleEndian>(1).unwrap(); // root has_next
        empty_mesh(&mut data, "leg", 0, 0);

        let glo = parse_glo_bytes(&data).unwrap();
        let root = &glo.objects[0].meshes[0];
        assert!(root.name.matches("root"));
        assert!(root.child.as_ref().unwrap().name.matches("arm"));
        assert!(root.next.as_ref().unwrap().name.matches("leg"));
        assert!(!root.child.as_ref().unwrap().has_next());
    }

    #[test]
    fn test_invalid_link_flag() {
        let mut data = Vec::new();
        header(&mut data);
        data.write_u16::<LittleEndian>(1).unwrap();
        data.write_u16::<LittleEndian>(0).unwrap();
        data.write_u16::<LittleEndian>(1).unwrap();
        empty_mesh(&mut data, "root", 0, 7);
        let err = parse_glo_bytes(&data).unwrap_err();
        assert!(matches!(err, Error::InvalidLinkFlag { value: 7, .. }));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut data = Vec::new();
        header(&mut data);
        data.write_u16::<LittleEndian>(0).unwrap();
        data.push(0xAB);
        let err = parse_glo_bytes(&data).unwrap_err();
        assert!(matches!(err, Error::TrailingData { offset: 8, remaining: 1 }));
    }

    #[test]
    fn test_nesting_limit() {
        let mut data = Vec::new();
        header(&mut data);
        data.write_u16::<LittleEndian>(1).unwrap();
        data.write_u16::<LittleEndian>(0).unwrap();
        data.write_u16::<LittleEndian>(1).unwrap();
        for _ in 0..=MAX_MESH_DEPTH {
            empty_mesh(&mut data, "m", 1, 0);
        }
        let err = parse_glo_bytes(&data).unwrap_err();
        assert!(matches!(err, Error::NestingTooDeep { limit: MAX_MESH_DEPTH }));
    }

    #[test]
    fn test_deepest_allowed_chain() {
        let mut data = Vec::new();
        header(&mut data);
        data.write_u16::<LittleEndian>(1).unwrap();
        data.write_u16::<LittleEndian>(0).unwrap();
        data.write_u16::<LittleEndian>(1).unwrap();
        for _ in 1..MAX_MESH_DEPTH {
            empty_mesh(&mut data, "m", 1, 0);
        }
        empty_mesh(&mut data, "leaf", 0, 0);
        // Each level closes with has_next = 0
        for _ in 1..MAX_MESH_DEPTH {
            data.write_u16::<LittleEndian>(0).unwrap();
        }

        let glo = parse_glo_bytes(&data).unwrap();
        assert_eq!(glo.summary().max_depth, MAX_MESH_DEPTH);
    }

    #[test]
    fn test_long_sibling_list() {
        let mut data = Vec::new();
        header(&mut data);
        data.write_u16::<LittleEndian>(1).unwrap();
        data.write_u16::<LittleEndian>(0).unwrap();
        data.write_u16::<LittleEndian>(1).unwrap();
        for i in 0..1000 {
            let has_next = u16::from(i < 999);
            empty_mesh(&mut data, &format!("m{i}"), 0, has_next);
        }

        let glo = parse_glo_bytes(&data).unwrap();
        let root = &glo.objects[0].meshes[0];
        let mut names = Vec::new();
        root.walk(&mut |mesh| names.push(mesh.name.to_string()));
        assert_eq!(names.len(), 1000);
        assert_eq!(names[999], "m999");
        assert!(!root.has_child());
    }
}
