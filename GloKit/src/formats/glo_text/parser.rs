//! Recursive-descent parser for the GLO text format
//!
//! ```text
//! file      := object*
//! object    := "object" "{" anim* ("mesh" mesh)* "}"
//! anim      := "anim" string int int hex32 float
//! mesh      := string hex16 hex16 "{" movekey* scalekey* rotatekey*
//!              vertex* face* sprite* ["child" mesh] ["next" mesh] "}"
//! movekey   := "movekey" int float float float
//! scalekey  := "scalekey" int float float float
//! rotatekey := "rotatekey" int float float float float
//! vertex    := "vertex" float float float
//! face      := "face" string hex32 hex16 "{" vref vref vref "}"
//! vref      := "vref" int float float
//! sprite    := "sprite" string hex32 hex16 float float float float float
//! ```

use std::fs;
use std::io;
use std::path::Path;

use super::tokenizer::{Token, Tokenizer};
use crate::error::{Error, Result};
use crate::formats::glo::{
    Color, FixedName, GloAnim, GloFace, GloFile, GloMesh, GloObject, GloSprite, Keyframe,
    MAX_MESH_DEPTH, Quat, Vec2, Vec3, VertexRef,
};

/// Largest number of items any sequence can hold.
const MAX_ITEMS: usize = u16::MAX as usize;

/// Read a GLO text file from disk
///
/// # Errors
/// Returns an error if the file cannot be read, is empty, or does not parse.
pub fn read_glo_text<P: AsRef<Path>>(path: P) -> Result<GloFile> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    if data.is_empty() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("file is empty: {}", path.display()),
        )));
    }
    parse_glo_text(&data)
}

/// Parse GLO text from bytes
///
/// An empty buffer, or one holding only comments, is a file with no objects.
///
/// # Errors
/// Returns [`Error::Parse`] with the offending line number on any grammar or
/// field-format mismatch.
pub fn parse_glo_text(data: &[u8]) -> Result<GloFile> {
    let mut parser = TextParser::new(data);
    let glo = parser.parse_file()?;
    tracing::debug!("Parsed GLO text: {} objects, {} bytes", glo.objects.len(), data.len());
    Ok(glo)
}

struct TextParser<'a> {
    tokens: Tokenizer<'a>,
}

impl<'a> TextParser<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            tokens: Tokenizer::new(data),
        }
    }

    // ========================================================================
    // Token plumbing
    // ========================================================================

    /// Consume the next token. `what` names the expected token in the end of
    /// input error.
    fn next_token(&mut self, what: &str) -> Result<Token<'a>> {
        match self.tokens.next() {
            Some(token) => token,
            None => Err(Error::parse(
                self.tokens.line(),
                format!("unexpected end of input, expected {what}"),
            )),
        }
    }

    /// Consume the next token if it is `keyword`.
    fn accept(&mut self, keyword: &str) -> Result<bool> {
        let matched = match self.tokens.peek() {
            None => false,
            Some(Ok(token)) => token.is(keyword),
            // Surface the scan error through next()
            Some(Err(_)) => true,
        };
        if matched {
            self.next_token(keyword)?;
        }
        Ok(matched)
    }

    fn expect(&mut self, keyword: &str, message: &str) -> Result<()> {
        let token = self.next_token(&format!("'{keyword}'"))?;
        if token.is(keyword) {
            Ok(())
        } else {
            Err(Error::parse(token.line, message))
        }
    }

    fn name<const N: usize>(&mut self) -> Result<FixedName<N>> {
        let token = self.next_token("string")?;
        let text = token.text;
        if !token.is_string() || text.len() < 2 || text[text.len() - 1] != b'"' {
            return Err(Error::parse(token.line, "expected string"));
        }
        FixedName::from_text(&text[1..text.len() - 1])
            .ok_or_else(|| Error::parse(token.line, format!("string too long, max {N}")))
    }

    fn field<T>(
        &mut self,
        field: &str,
        owner: &str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T> {
        let token = self.next_token(&format!("'{field}' for '{owner}'"))?;
        std::str::from_utf8(token.text)
            .ok()
            .and_then(parse)
            .ok_or_else(|| Error::parse(token.line, format!("bad '{field}' for '{owner}'")))
    }

    fn int(&mut self, field: &str, owner: &str) -> Result<i32> {
        self.field(field, owner, |s| s.parse().ok())
    }

    fn float(&mut self, field: &str, owner: &str) -> Result<f32> {
        self.field(field, owner, |s| s.parse().ok())
    }

    fn hex16(&mut self, field: &str, owner: &str) -> Result<u16> {
        self.field(field, owner, |s| parse_hex(s).and_then(|v| u16::try_from(v).ok()))
    }

    fn hex32(&mut self, field: &str, owner: &str) -> Result<u32> {
        self.field(field, owner, parse_hex)
    }

    fn vec3(&mut self, owner: &str) -> Result<Vec3> {
        Ok(Vec3::new(
            self.float("x", owner)?,
            self.float("y", owner)?,
            self.float("z", owner)?,
        ))
    }

    // ========================================================================
    // Grammar
    // ========================================================================

    fn parse_file(&mut self) -> Result<GloFile> {
        let mut objects = Vec::new();
        while let Some(token) = self.tokens.next() {
            let token = token?;
            if !token.is("object") {
                return Err(Error::parse(token.line, "expected 'object'"));
            }
            push_item(&objects, "objects", token.line)?;
            let object = self.parse_object()?;
            objects.push(object);
        }
        Ok(GloFile { objects })
    }

    fn parse_object(&mut self) -> Result<GloObject> {
        self.expect("{", "expected '{' after 'object'")?;
        let mut object = GloObject::new();

        while self.accept("anim")? {
            push_item(&object.anims, "anims", self.tokens.line())?;
            let anim = GloAnim {
                name: self.name()?,
                start: self.int("start", "anim")?,
                end: self.int("end", "anim")?,
                flags: self.hex32("flags", "anim")?,
                speed: self.float("speed", "anim")?,
            };
            object.anims.push(anim);
        }

        while self.accept("mesh")? {
            push_item(&object.meshes, "meshes", self.tokens.line())?;
            let mesh = self.parse_mesh()?;
            object.meshes.push(mesh);
        }

        self.expect("}", "object not closed")?;
        Ok(object)
    }

    /// Parse a mesh and everything linked inside it.
    ///
    /// `parents` holds the enclosing open meshes, innermost last. A parent
    /// waits in [`Stage::Next`] while its child is open and in
    /// [`Stage::Close`] while its next is open. Only `child` links count
    /// towards the depth limit.
    fn parse_mesh(&mut self) -> Result<GloMesh> {
        let mut parents: Vec<OpenMesh> = Vec::new();
        let mut current = OpenMesh::new(self.parse_mesh_body()?, 0);
        loop {
            match current.stage {
                Stage::Child => {
                    current.stage = Stage::Next;
                    if self.accept("child")? {
                        let depth = current.depth + 1;
                        if depth >= MAX_MESH_DEPTH {
                            return Err(Error::parse(
                                self.tokens.line(),
                                format!("mesh nested deeper than {MAX_MESH_DEPTH} levels"),
                            ));
                        }
                        let child = OpenMesh::new(self.parse_mesh_body()?, depth);
                        parents.push(std::mem::replace(&mut current, child));
                    }
                }
                Stage::Next => {
                    current.stage = Stage::Close;
                    if self.accept("next")? {
                        let next = OpenMesh::new(self.parse_mesh_body()?, current.depth);
                        parents.push(std::mem::replace(&mut current, next));
                    }
                }
                Stage::Close => {
                    self.expect("}", "mesh not closed")?;
                    let Some(mut parent) = parents.pop() else {
                        return Ok(current.mesh);
                    };
                    let link = Some(Box::new(current.mesh));
                    match parent.stage {
                        Stage::Close => parent.mesh.next = link,
                        Stage::Child | Stage::Next => parent.mesh.child = link,
                    }
                    current = parent;
                }
            }
        }
    }

    /// Parse a mesh header and its items, up to any `child`/`next`.
    fn parse_mesh_body(&mut self) -> Result<GloMesh> {
        let mut mesh = GloMesh::named(self.name()?);
        mesh.xlu = self.hex16("xlu", "mesh")?;
        mesh.flags = self.hex16("flags", "mesh")?;
        self.expect("{", "expected '{'")?;

        while self.accept("movekey")? {
            push_item(&mesh.move_keys, "movekeys", self.tokens.line())?;
            let time = self.int("time", "keyframe")?;
            mesh.move_keys.push(Keyframe::new(time, self.vec3("keyframe")?));
        }
        while self.accept("scalekey")? {
            push_item(&mesh.scale_keys, "scalekeys", self.tokens.line())?;
            let time = self.int("time", "keyframe")?;
            mesh.scale_keys.push(Keyframe::new(time, self.vec3("keyframe")?));
        }
        while self.accept("rotatekey")? {
            push_item(&mesh.rotate_keys, "rotatekeys", self.tokens.line())?;
            let time = self.int("time", "keyframe")?;
            let rotation = Quat::new(
                self.float("x", "keyframe")?,
                self.float("y", "keyframe")?,
                self.float("z", "keyframe")?,
                self.float("w", "keyframe")?,
            );
            mesh.rotate_keys.push(Keyframe::new(time, rotation));
        }
        while self.accept("vertex")? {
            push_item(&mesh.vertices, "vertices", self.tokens.line())?;
            let vertex = self.vec3("vertex")?;
            mesh.vertices.push(vertex);
        }
        while self.accept("face")? {
            push_item(&mesh.faces, "faces", self.tokens.line())?;
            let face = self.parse_face()?;
            mesh.faces.push(face);
        }
        while self.accept("sprite")? {
            push_item(&mesh.sprites, "sprites", self.tokens.line())?;
            let sprite = GloSprite {
                texture: self.name()?,
                color: Color(self.hex32("color", "sprite")?),
                flags: self.hex16("flags", "sprite")?,
                position: Vec3::new(
                    self.float("x pos", "sprite")?,
                    self.float("y pos", "sprite")?,
                    self.float("z pos", "sprite")?,
                ),
                size: Vec2::new(
                    self.float("x size", "sprite")?,
                    self.float("y size", "sprite")?,
                ),
            };
            mesh.sprites.push(sprite);
        }

        Ok(mesh)
    }

    fn parse_face(&mut self) -> Result<GloFace> {
        let texture = self.name()?;
        let color = Color(self.hex32("color", "face")?);
        let flags = self.hex16("flags", "face")?;
        self.expect("{", "expected '{'")?;

        let mut vrefs = [VertexRef::default(); 3];
        for vref in &mut vrefs {
            self.expect("vref", "expected 'vref'")?;
            vref.index = self.field("index", "vref", parse_index)?;
            vref.uv = Vec2::new(self.float("u", "vref")?, self.float("v", "vref")?);
        }

        self.expect("}", "face vrefs not closed")?;
        Ok(GloFace {
            texture,
            color,
            flags,
            vrefs,
        })
    }
}

/// Which link of an open text mesh is parsed next.
#[derive(Clone, Copy)]
enum Stage {
    Child,
    Next,
    Close,
}

/// A mesh whose body is parsed but whose closing `}` is not.
struct OpenMesh {
    mesh: GloMesh,
    stage: Stage,
    /// `child` levels below the root mesh.
    depth: usize,
}

impl OpenMesh {
    fn new(mesh: GloMesh, depth: usize) -> Self {
        Self {
            mesh,
            stage: Stage::Child,
            depth,
        }
    }
}

/// Reject the item that would overflow a 16-bit count.
fn push_item<T>(items: &[T], what: &str, line: usize) -> Result<()> {
    if items.len() >= MAX_ITEMS {
        return Err(Error::parse(line, format!("too many {what}, max {MAX_ITEMS}")));
    }
    Ok(())
}

/// Hexadecimal with an optional `0x` prefix.
fn parse_hex(text: &str) -> Option<u32> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Decimal vertex index. Negative values wrap to their 16-bit pattern.
fn parse_index(text: &str) -> Option<u16> {
    let value: i32 = text.parse().ok()?;
    if let Ok(index) = u16::try_from(value) {
        return Some(index);
    }
    i16::try_from(value)
        .ok()
        .map(|signed| u16::from_ne_bytes(signed.to_ne_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const SAMPLE: &str = r#"; sample.glt - 0.1

object {
	anim "walk" 0 30 00000001 1.5
	mesh "Body" 00ff 0002 {
		movekey 0 1 2 3
		scalekey 0 1 1 1
		rotatekey 10 0 0 0 1
		vertex 0 0 0
		vertex 1 0 0
		vertex 0 1 0
		face "skin" FF00FF80 0010 {
			vref 0 0 0
			vref 1 1 0
			vref 2 0 1
		}
		sprite "glow" 80FFFFFF 0001 0 2 0 0.5 0.25
		child "Arm" 0000 0000 {
		}
		next "Leg" 0000 0000 {
		}
	}
}
"#;

    fn line_of(err: &Error) -> usize {
        match err {
            Error::Parse { line, .. } => *line,
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_sample() {
        let glo = parse_glo_text(SAMPLE.as_bytes()).unwrap();
        assert_eq!(glo.objects.len(), 1);
        let object = &glo.objects[0];

        let anim = &object.anims[0];
        assert!(anim.name.matches("walk"));
        assert_eq!((anim.start, anim.end, anim.flags), (0, 30, 1));
        assert_eq!(anim.speed, 1.5);

        let body = &object.meshes[0];
        assert!(body.name.matches("Body"));
        assert_eq!(body.xlu, 0x00FF);
        assert_eq!(body.flags, 0x0002);
        assert_eq!(body.move_keys[0], Keyframe::new(0, Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(body.rotate_keys[0].value, Quat::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(body.vertices.len(), 3);

        let face = &body.faces[0];
        assert!(face.texture.matches("skin"));
        assert_eq!(face.color, Color(0xFF00_FF80));
        assert_eq!(face.flags, 0x0010);
        assert_eq!(face.vrefs[1].index, 1);
        assert_eq!(face.vrefs[2].uv, Vec2::new(0.0, 1.0));

        let sprite = &body.sprites[0];
        assert_eq!(sprite.position, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(sprite.size, Vec2::new(0.5, 0.25));

        assert!(body.child.as_ref().unwrap().name.matches("Arm"));
        assert!(body.next.as_ref().unwrap().name.matches("Leg"));
    }

    #[test]
    fn test_empty_text() {
        assert!(parse_glo_text(b"").unwrap().objects.is_empty());
        assert!(parse_glo_text(b"; only a banner\n").unwrap().objects.is_empty());
    }

    #[test]
    fn test_bad_xlu_reports_line() {
        let text = "object {\n\tmesh \"m\" zz 0000 {\n\t}\n}\n";
        let err = parse_glo_text(text.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(line_of(&err), 2);
        assert!(err.to_string().contains("bad 'xlu' for 'mesh'"));
    }

    #[test]
    fn test_hex_field_width() {
        let text = "object { mesh \"m\" 10000 0000 { } }";
        let err = parse_glo_text(text.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("'xlu'"));

        let text = "object { mesh \"m\" 0xFFFF 0x0 { } }";
        let mesh = &parse_glo_text(text.as_bytes()).unwrap().objects[0].meshes[0];
        assert_eq!((mesh.xlu, mesh.flags), (0xFFFF, 0));
    }

    #[test]
    fn test_mesh_not_closed() {
        let text = "object {\nmesh \"m\" 0000 0000 {\nvertex 0 0 0\n}\n";
        let err = parse_glo_text(text.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("'}'"));
    }

    #[test]
    fn test_items_out_of_order_fail() {
        // Vertex after face ends the vertex loop, so the mesh is not closed
        let text = "object { mesh \"m\" 0000 0000 {\n\
                    face \"t\" 0 0 { vref 0 0 0 vref 0 0 0 vref 0 0 0 }\n\
                    vertex 0 0 0\n} }";
        let err = parse_glo_text(text.as_bytes()).unwrap_err();
        assert_eq!(line_of(&err), 3);
        assert!(err.to_string().contains("mesh not closed"));
    }

    #[test]
    fn test_face_needs_three_vrefs() {
        let text = "object { mesh \"m\" 0000 0000 {\nface \"t\" 0 0 { vref 0 0 0 vref 0 0 0 }\n} }";
        let err = parse_glo_text(text.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("expected 'vref'"));
    }

    #[test]
    fn test_string_capacity() {
        let exact = "object { mesh \"0123456789abcdefghijklmn\" 0000 0000 { } }";
        let mesh = &parse_glo_text(exact.as_bytes()).unwrap().objects[0].meshes[0];
        assert_eq!(mesh.name.raw(), b"0123456789abcdefghijklmn");

        let long = "object { mesh \"0123456789abcdefghijklmno\" 0000 0000 { } }";
        let err = parse_glo_text(long.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("string too long, max 24"));
    }

    #[test]
    fn test_expected_string() {
        let err = parse_glo_text(b"object { mesh Body 0000 0000 { } }").unwrap_err();
        assert!(err.to_string().contains("expected string"));
    }

    #[test]
    fn test_top_level_garbage() {
        let err = parse_glo_text(b"object { }\nstray").unwrap_err();
        assert_eq!(line_of(&err), 2);
        assert!(err.to_string().contains("expected 'object'"));
    }

    #[test]
    fn test_negative_vref_index_wraps() {
        assert_eq!(parse_index("-1"), Some(0xFFFF));
        assert_eq!(parse_index("65535"), Some(0xFFFF));
        assert_eq!(parse_index("-32768"), Some(0x8000));
        assert_eq!(parse_index("65536"), None);
        assert_eq!(parse_index("-32769"), None);
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("00ff"), Some(0xFF));
        assert_eq!(parse_hex("0XAbC"), Some(0xABC));
        assert_eq!(parse_hex("FFFFFFFF"), Some(u32::MAX));
        assert_eq!(parse_hex("+1"), None);
        assert_eq!(parse_hex("0x"), None);
        assert_eq!(parse_hex("100000000"), None);
    }

    #[test]
    fn test_read_empty_file_is_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = read_glo_text(file.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    /// A root mesh with `children` nested `child` meshes, fully closed.
    fn child_chain(children: usize) -> String {
        let mut text = String::from("object {\nmesh \"root\" 0 0 {\n");
        for _ in 0..children {
            text.push_str("child \"m\" 0 0 {\n");
        }
        for _ in 0..=children {
            text.push_str("}\n");
        }
        text.push_str("}\n");
        text
    }

    #[test]
    fn test_nesting_limit() {
        let glo = parse_glo_text(child_chain(MAX_MESH_DEPTH - 1).as_bytes()).unwrap();
        assert_eq!(glo.summary().max_depth, MAX_MESH_DEPTH);

        let err = parse_glo_text(child_chain(MAX_MESH_DEPTH).as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(line_of(&err), MAX_MESH_DEPTH + 2);
        assert!(err.to_string().contains("nested deeper than 512 levels"));
    }

    #[test]
    fn test_long_next_list() {
        let mut text = String::from("object {\nmesh \"m0\" 0 0 {\n");
        for i in 1..1000 {
            text.push_str(&format!("next \"m{i}\" 0 0 {{\n"));
        }
        for _ in 0..1000 {
            text.push_str("}\n");
        }
        text.push_str("}\n");

        let glo = parse_glo_text(text.as_bytes()).unwrap();
        let summary = glo.summary();
        assert_eq!(summary.meshes, 1000);
        assert_eq!(summary.max_depth, 1);
    }

    #[test]
    fn test_links_attach_to_their_parent() {
        let text = "object { mesh \"a\" 0 0 { child \"b\" 0 0 { next \"c\" 0 0 { } } next \"d\" 0 0 { } } }";
        let glo = parse_glo_text(text.as_bytes()).unwrap();
        let a = &glo.objects[0].meshes[0];
        let b = a.child.as_ref().unwrap();
        assert!(b.name.matches("b"));
        assert!(b.next.as_ref().unwrap().name.matches("c"));
        assert!(a.next.as_ref().unwrap().name.matches("d"));
        assert!(!a.next.as_ref().unwrap().has_child());
    }

    #[test]
    fn test_item_count_limit() {
        let mut text = String::from("object {\nmesh \"m\" 0 0 {\n");
        for _ in 0..MAX_ITEMS {
            text.push_str("vertex 0 0 0\n");
        }
        let mesh_end = "}\n}\n";

        let full = format!("{text}{mesh_end}");
        let glo = parse_glo_text(full.as_bytes()).unwrap();
        assert_eq!(glo.objects[0].meshes[0].vertices.len(), MAX_ITEMS);

        let over = format!("{text}vertex 0 0 0\n{mesh_end}");
        let err = parse_glo_text(over.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(line_of(&err), MAX_ITEMS + 3);
        assert!(err.to_string().contains("too many vertices, max 65535"));
    }
}
