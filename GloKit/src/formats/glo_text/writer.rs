//! GLO text printing
//!
//! One item per line, one tab per nesting level, hex fields zero-padded to
//! their width. Floats use the shortest text that reads back to the same
//! value, so text written here parses to an identical tree.

use std::path::Path;

use crate::error::Result;
use crate::formats::glo::{GLO_VERSION_STR, GloFace, GloFile, GloMesh, GloObject, VertexRef};

/// Write a GLO model as text, with the file name in the banner comment
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_glo_text<P: AsRef<Path>>(doc: &GloFile, path: P) -> Result<()> {
    let path = path.as_ref();
    let banner = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    std::fs::write(path, serialize_glo_text(doc, Some(&banner)))?;
    Ok(())
}

/// Print a GLO model as text
///
/// `banner` becomes a leading `; <banner> - 0.1` comment line.
#[must_use]
pub fn serialize_glo_text(doc: &GloFile, banner: Option<&str>) -> Vec<u8> {
    let mut printer = TextPrinter::default();
    if let Some(banner) = banner {
        printer.line(&format!("; {banner} - {GLO_VERSION_STR}"));
        printer.line("");
    }
    for object in &doc.objects {
        printer.object(object);
    }
    tracing::debug!("Printed GLO text: {} objects, {} bytes", doc.objects.len(), printer.out.len());
    printer.out
}

enum Print<'a> {
    Open(&'static str, &'a GloMesh),
    Close,
}

#[derive(Default)]
struct TextPrinter {
    out: Vec<u8>,
    depth: usize,
}

impl TextPrinter {
    fn indent(&mut self) {
        self.out.extend(std::iter::repeat_n(b'\t', self.depth));
    }

    fn push(&mut self, text: &str) {
        self.out.extend_from_slice(text.as_bytes());
    }

    /// A quoted name. Raw bytes go out unchanged.
    fn push_name(&mut self, name: &[u8]) {
        self.out.push(b'"');
        self.out.extend_from_slice(name);
        self.out.push(b'"');
    }

    fn line(&mut self, text: &str) {
        if !text.is_empty() {
            self.indent();
            self.push(text);
        }
        self.out.push(b'\n');
    }

    fn close(&mut self) {
        self.depth -= 1;
        self.line("}");
    }

    fn object(&mut self, object: &GloObject) {
        self.line("object {");
        self.depth += 1;
        for anim in &object.anims {
            self.indent();
            self.push("anim ");
            self.push_name(anim.name.as_bytes());
            self.push(&format!(
                " {} {} {:08X} {}\n",
                anim.start, anim.end, anim.flags, anim.speed
            ));
        }
        for mesh in &object.meshes {
            self.mesh("mesh", mesh);
        }
        self.close();
    }

    /// Print a mesh tree. `child` and `next` nest inside their parent's
    /// braces; the work list keeps long lists off the call stack.
    fn mesh(&mut self, keyword: &'static str, root: &GloMesh) {
        let mut pending = vec![Print::Open(keyword, root)];
        while let Some(task) = pending.pop() {
            match task {
                Print::Open(keyword, mesh) => {
                    self.mesh_body(keyword, mesh);
                    pending.push(Print::Close);
                    if let Some(next) = mesh.next.as_deref() {
                        pending.push(Print::Open("next", next));
                    }
                    if let Some(child) = mesh.child.as_deref() {
                        pending.push(Print::Open("child", child));
                    }
                }
                Print::Close => self.close(),
            }
        }
    }

    /// Header line and items of one mesh, leaving its brace open.
    fn mesh_body(&mut self, keyword: &str, mesh: &GloMesh) {
        self.indent();
        self.push(keyword);
        self.push(" ");
        self.push_name(mesh.name.as_bytes());
        self.push(&format!(" {:04X} {:04X} {{\n", mesh.xlu, mesh.flags));
        self.depth += 1;

        for key in &mesh.move_keys {
            let v = key.value;
            self.line(&format!("movekey {} {} {} {}", key.time, v.x, v.y, v.z));
        }
        for key in &mesh.scale_keys {
            let v = key.value;
            self.line(&format!("scalekey {} {} {} {}", key.time, v.x, v.y, v.z));
        }
        for key in &mesh.rotate_keys {
            let q = key.value;
            self.line(&format!("rotatekey {} {} {} {} {}", key.time, q.x, q.y, q.z, q.w));
        }
        for v in &mesh.vertices {
            self.line(&format!("vertex {} {} {}", v.x, v.y, v.z));
        }
        for face in &mesh.faces {
            self.face(face);
        }
        for sprite in &mesh.sprites {
            self.indent();
            self.push("sprite ");
            self.push_name(sprite.texture.as_bytes());
            let (p, s) = (sprite.position, sprite.size);
            self.push(&format!(
                " {:08X} {:04X} {} {} {} {} {}\n",
                sprite.color.0, sprite.flags, p.x, p.y, p.z, s.x, s.y
            ));
        }
    }

    fn face(&mut self, face: &GloFace) {
        self.indent();
        self.push("face ");
        self.push_name(face.texture.as_bytes());
        self.push(&format!(" {:08X} {:04X} {{\n", face.color.0, face.flags));
        self.depth += 1;
        for VertexRef { index, uv } in &face.vrefs {
            self.line(&format!("vref {index} {} {}", uv.x, uv.y));
        }
        self.close();
    }
}
