//! GLO editing operations
//!
//! Provides in-place edits and queries over a loaded model:
//! - Rename a texture reference on faces and sprites
//! - Collect textures whose UVs rely on wrapping
//! - Delete root meshes by name

use super::document::{GloFile, GloMesh, GloObject, TextureName, Vec2};

// ============================================================================
// Texture renaming
// ============================================================================

impl GloMesh {
    /// Rename texture `from` to `to` on this mesh's faces and sprites, then on
    /// the `child` subtree, then on the `next` subtree.
    ///
    /// Names are compared over at most the field capacity, and `to` is
    /// truncated to it.
    ///
    /// # Returns
    /// The number of faces and sprites rewritten
    pub fn rename_texture(&mut self, from: &str, to: &str) -> usize {
        let replacement = TextureName::new(to);
        let mut renamed = 0;
        self.walk_mut(&mut |mesh| {
            for face in &mut mesh.faces {
                if face.texture.matches(from) {
                    face.texture = replacement;
                    renamed += 1;
                }
            }
            for sprite in &mut mesh.sprites {
                if sprite.texture.matches(from) {
                    sprite.texture = replacement;
                    renamed += 1;
                }
            }
        });
        renamed
    }
}

impl GloFile {
    /// Rename a texture on every mesh of every object.
    ///
    /// # Returns
    /// The number of faces and sprites rewritten (0 if nothing matched)
    pub fn rename_texture(&mut self, from: &str, to: &str) -> usize {
        let renamed = self
            .objects
            .iter_mut()
            .flat_map(|object| object.meshes.iter_mut())
            .map(|mesh| mesh.rename_texture(from, to))
            .sum();
        tracing::debug!("Renamed texture {from:?} -> {to:?} on {renamed} primitives");
        renamed
    }

    // ========================================================================
    // Wrap detection
    // ========================================================================

    /// Textures referenced by at least one face corner with U or V above 1.0.
    ///
    /// The result is deduplicated and sorted by raw name bytes.
    pub fn wrapped_textures(&self) -> Vec<TextureName> {
        let mut textures: Vec<TextureName> = Vec::new();
        self.for_each_mesh(|mesh| {
            for face in &mesh.faces {
                // One out-of-range corner is enough to flag the face
                if face.vrefs.iter().any(|vref| exceeds_unit(vref.uv)) {
                    insert_sorted(&mut textures, face.texture);
                }
            }
        });
        textures
    }

    // ========================================================================
    // Mesh deletion
    // ========================================================================

    /// Delete root meshes named `name` from every object.
    ///
    /// # Returns
    /// The total number of root meshes removed
    pub fn delete_meshes_named(&mut self, name: &str) -> usize {
        self.objects
            .iter_mut()
            .map(|object| object.delete_meshes_named(name))
            .sum()
    }
}

impl GloObject {
    /// Remove every root mesh whose name matches `name`, dropping its whole
    /// subtree. Remaining meshes keep their order. Meshes reachable only
    /// through `child`/`next` are never removed.
    ///
    /// # Returns
    /// The number of meshes removed
    pub fn delete_meshes_named(&mut self, name: &str) -> usize {
        let before = self.meshes.len();
        self.meshes.retain(|mesh| !mesh.name.matches(name));
        let removed = before - self.meshes.len();
        if removed > 0 {
            tracing::debug!("Deleted {removed} root meshes named {name:?}");
        }
        removed
    }
}

fn exceeds_unit(uv: Vec2) -> bool {
    uv.x > 1.0 || uv.y > 1.0
}

fn insert_sorted(list: &mut Vec<TextureName>, texture: TextureName) {
    let texture = texture.normalized();
    if let Err(pos) = list.binary_search(&texture) {
        list.insert(pos, texture);
    }
}
