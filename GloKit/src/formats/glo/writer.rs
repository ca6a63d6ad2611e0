//! GLO binary writing

use super::document::{GloFace, GloFile, GloMesh, GloObject, Quat, Vec2, Vec3};
use super::{GLO_MAGIC, GLO_VERSION};
use crate::error::{Error, Result};
use byteorder::{LittleEndian, WriteBytesExt};
use std::path::Path;

/// Write a GLO file to disk
///
/// # Errors
/// Returns an error if a sequence is too long for its count field or the file
/// cannot be written.
pub fn write_glo<P: AsRef<Path>>(doc: &GloFile, path: P) -> Result<()> {
    let bytes = serialize_glo(doc)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Serialize a GLO model to bytes
///
/// Field order mirrors [`parse_glo_bytes`](super::parse_glo_bytes) exactly.
///
/// # Errors
/// Returns [`Error::TooManyItems`] if any sequence holds more than 65535 items.
pub fn serialize_glo(doc: &GloFile) -> Result<Vec<u8>> {
    let mut output = Vec::new();

    output.extend_from_slice(&GLO_MAGIC);
    output.write_u16::<LittleEndian>(GLO_VERSION)?;

    write_count(&mut output, doc.objects.len(), "objects")?;
    for object in &doc.objects {
        write_object(&mut output, object)?;
    }

    tracing::debug!("Encoded GLO: {} objects, {} bytes", doc.objects.len(), output.len());
    Ok(output)
}

fn write_object(output: &mut Vec<u8>, object: &GloObject) -> Result<()> {
    write_count(output, object.anims.len(), "animations")?;
    for anim in &object.anims {
        output.extend_from_slice(anim.name.raw());
        output.write_i32::<LittleEndian>(anim.start)?;
        output.write_i32::<LittleEndian>(anim.end)?;
        output.write_u32::<LittleEndian>(anim.flags)?;
        output.write_f32::<LittleEndian>(anim.speed)?;
    }

    write_count(output, object.meshes.len(), "meshes")?;
    for mesh in &object.meshes {
        write_mesh(output, mesh)?;
    }
    Ok(())
}

/// Pending work while writing a mesh tree: a mesh still to be written, or a
/// mesh whose child subtree is done and whose `has_next` flag comes next.
enum Pending<'a> {
    Mesh(&'a GloMesh),
    Next(&'a GloMesh),
}

fn write_mesh(output: &mut Vec<u8>, root: &GloMesh) -> Result<()> {
    let mut pending = vec![Pending::Mesh(root)];
    while let Some(task) = pending.pop() {
        match task {
            Pending::Mesh(mesh) => {
                write_mesh_body(output, mesh)?;
                output.write_u16::<LittleEndian>(u16::from(mesh.has_child()))?;
                pending.push(Pending::Next(mesh));
                if let Some(child) = mesh.child.as_deref() {
                    pending.push(Pending::Mesh(child));
                }
            }
            Pending::Next(mesh) => {
                output.write_u16::<LittleEndian>(u16::from(mesh.has_next()))?;
                if let Some(next) = mesh.next.as_deref() {
                    pending.push(Pending::Mesh(next));
                }
            }
        }
    }
    Ok(())
}

fn write_mesh_body(output: &mut Vec<u8>, mesh: &GloMesh) -> Result<()> {
    output.extend_from_slice(mesh.name.raw());

    write_count(output, mesh.move_keys.len(), "move keys")?;
    for key in &mesh.move_keys {
        output.write_i32::<LittleEndian>(key.time)?;
        write_vec3(output, key.value)?;
    }

    write_count(output, mesh.scale_keys.len(), "scale keys")?;
    for key in &mesh.scale_keys {
        output.write_i32::<LittleEndian>(key.time)?;
        write_vec3(output, key.value)?;
    }

    write_count(output, mesh.rotate_keys.len(), "rotate keys")?;
    for key in &mesh.rotate_keys {
        output.write_i32::<LittleEndian>(key.time)?;
        write_quat(output, key.value)?;
    }

    write_count(output, mesh.vertices.len(), "vertices")?;
    for vertex in &mesh.vertices {
        write_vec3(output, *vertex)?;
    }

    write_count(output, mesh.faces.len(), "faces")?;
    for face in &mesh.faces {
        write_face(output, face)?;
    }

    write_count(output, mesh.sprites.len(), "sprites")?;
    for sprite in &mesh.sprites {
        output.extend_from_slice(sprite.texture.raw());
        output.write_u32::<LittleEndian>(sprite.color.0)?;
        write_vec3(output, sprite.position)?;
        write_vec2(output, sprite.size)?;
        output.write_u16::<LittleEndian>(sprite.flags)?;
    }

    output.write_u16::<LittleEndian>(mesh.xlu)?;
    output.write_u16::<LittleEndian>(mesh.flags)?;
    Ok(())
}

fn write_face(output: &mut Vec<u8>, face: &GloFace) -> Result<()> {
    output.extend_from_slice(face.texture.raw());
    output.write_u32::<LittleEndian>(face.color.0)?;
    output.write_u16::<LittleEndian>(face.flags)?;
    for vref in &face.vrefs {
        output.write_u16::<LittleEndian>(vref.index)?;
        write_vec2(output, vref.uv)?;
    }
    Ok(())
}

fn write_count(output: &mut Vec<u8>, len: usize, what: &'static str) -> Result<()> {
    let count = u16::try_from(len).map_err(|_| Error::TooManyItems { what, count: len })?;
    output.write_u16::<LittleEndian>(count)?;
    Ok(())
}

fn write_vec2(output: &mut Vec<u8>, v: Vec2) -> Result<()> {
    output.write_f32::<LittleEndian>(v.x)?;
    output.write_f32::<LittleEndian>(v.y)?;
    Ok(())
}

fn write_vec3(output: &mut Vec<u8>, v: Vec3) -> Result<()> {
    output.write_f32::<LittleEndian>(v.x)?;
    output.write_f32::<LittleEndian>(v.y)?;
    output.write_f32::<LittleEndian>(v.z)?;
    Ok(())
}

fn write_quat(output: &mut Vec<u8>, q: Quat) -> Result<()> {
    output.write_f32::<LittleEndian>(q.x)?;
    output.write_f32::<LittleEndian>(q.y)?;
    output.write_f32::<LittleEndian>(q.z)?;
    output.write_f32::<LittleEndian>(q.w)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::document::{Color, GloAnim, GloSprite, Keyframe, TextureName, VertexRef};
    use super::super::{
        ANIM_SIZE, FACE_SIZE, QUAT_KEY_SIZE, SPRITE_SIZE, VEC3_KEY_SIZE, VERTEX_SIZE,
        parse_glo_bytes,
    };
    use super::*;

    fn sample_mesh() -> GloMesh {
        let mut mesh = GloMesh::new("body");
        mesh.move_keys.push(Keyframe::new(0, Vec3::new(1.0, 2.0, 3.0)));
        mesh.scale_keys.push(Keyframe::new(5, Vec3::new(1.0, 1.0, 1.0)));
        mesh.rotate_keys.push(Keyframe::new(10, Quat::new(0.0, 0.0, 0.0, 1.0)));
        mesh.vertices = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        mesh.faces.push(GloFace {
            texture: TextureName::new("skin"),
            color: Color::from_rgba(255, 255, 255, 255),
            flags: 0x0010,
            vrefs: [
                VertexRef { index: 0, uv: Vec2::new(0.0, 0.0) },
                VertexRef { index: 1, uv: Vec2::new(1.0, 0.0) },
                VertexRef { index: 2, uv: Vec2::new(0.0, 1.0) },
            ],
        });
        mesh.sprites.push(GloSprite {
            texture: TextureName::new("glow"),
            color: Color(0x80FF_FFFF),
            position: Vec3::new(0.0, 2.0, 0.0),
            size: Vec2::new(0.5, 0.5),
            flags: 1,
        });
        mesh.xlu = 0x00FF;
        mesh
    }

    #[test]
    fn test_record_sizes() {
        let mut glo = GloFile::new();
        let mut object = GloObject::new();
        object.anims.push(GloAnim::default());
        object.meshes.push(sample_mesh());
        glo.objects.push(object);

        let bytes = serialize_glo(&glo).unwrap();
        let mesh_size = 24
            + 2 + VEC3_KEY_SIZE
            + 2 + VEC3_KEY_SIZE
            + 2 + QUAT_KEY_SIZE
            + 2 + 3 * VERTEX_SIZE
            + 2 + FACE_SIZE
            + 2 + SPRITE_SIZE
            + 2 + 2 + 2 + 2;
        assert_eq!(bytes.len(), 6 + 2 + 2 + ANIM_SIZE + 2 + mesh_size);
        assert_eq!(&bytes[..6], b"GLO\0\x01\x00");
    }

    #[test]
    fn test_roundtrip_model() {
        let mut root = sample_mesh();
        root.child = Some(Box::new(GloMesh::new("arm")));
        root.next = Some(Box::new(sample_mesh()));
        let mut object = GloObject::new();
        object.meshes.push(root);
        object.meshes.push(GloMesh::new("tail"));
        let glo = GloFile { objects: vec![object, GloObject::new()] };

        let bytes = serialize_glo(&glo).unwrap();
        let decoded = parse_glo_bytes(&bytes).unwrap();
        assert_eq!(decoded, glo);
        assert_eq!(serialize_glo(&decoded).unwrap(), bytes);
    }

    #[test]
    fn test_too_many_items() {
        let mut mesh = GloMesh::new("dense");
        mesh.vertices = vec![Vec3::default(); 70_000];
        let mut object = GloObject::new();
        object.meshes.push(mesh);
        let glo = GloFile { objects: vec![object] };

        let err = serialize_glo(&glo).unwrap_err();
        assert!(matches!(err, Error::TooManyItems { what: "vertices", count: 70_000 }));
    }

    #[test]
    fn test_long_links_roundtrip() {
        let mut siblings: Option<Box<GloMesh>> = None;
        for i in 0..5000 {
            let mut mesh = GloMesh::new(&format!("s{i}"));
            mesh.next = siblings;
            siblings = Some(Box::new(mesh));
        }
        let mut chain = GloMesh::new("leaf");
        for _ in 1..crate::formats::glo::MAX_MESH_DEPTH {
            let mut parent = GloMesh::new("joint");
            parent.child = Some(Box::new(chain));
            chain = parent;
        }
        chain.next = siblings;

        let mut object = GloObject::new();
        object.meshes.push(chain);
        let glo = GloFile { objects: vec![object] };

        let bytes = serialize_glo(&glo).unwrap();
        let decoded = parse_glo_bytes(&bytes).unwrap();
        assert_eq!(decoded.summary().meshes, 5000 + 512);
        assert_eq!(serialize_glo(&decoded).unwrap(), bytes);
    }
}
