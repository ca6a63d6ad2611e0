//! Model statistics for display and JSON export

use serde::Serialize;

use super::document::{GloFile, GloMesh, TextureName};

/// Aggregate counts over a whole model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GloSummary {
    pub objects: usize,
    pub anims: usize,
    /// Every mesh, root or nested.
    pub meshes: usize,
    pub root_meshes: usize,
    /// Longest `child` chain below a root, the root counting as 1.
    pub max_depth: usize,
    pub move_keys: usize,
    pub scale_keys: usize,
    pub rotate_keys: usize,
    pub vertices: usize,
    pub faces: usize,
    pub sprites: usize,
    /// Distinct textures used by faces and sprites, sorted.
    pub textures: Vec<TextureName>,
    /// Names of the animations in file order.
    pub anim_names: Vec<String>,
}

impl GloFile {
    /// Count everything in the model.
    #[must_use]
    pub fn summary(&self) -> GloSummary {
        let mut summary = GloSummary {
            objects: self.objects.len(),
            ..GloSummary::default()
        };

        for object in &self.objects {
            summary.anims += object.anims.len();
            summary
                .anim_names
                .extend(object.anims.iter().map(|anim| anim.name.to_string()));
            summary.root_meshes += object.meshes.len();
            for mesh in &object.meshes {
                summary.max_depth = summary.max_depth.max(child_depth(mesh));
            }
        }

        self.for_each_mesh(|mesh| {
            summary.meshes += 1;
            summary.move_keys += mesh.move_keys.len();
            summary.scale_keys += mesh.scale_keys.len();
            summary.rotate_keys += mesh.rotate_keys.len();
            summary.vertices += mesh.vertices.len();
            summary.faces += mesh.faces.len();
            summary.sprites += mesh.sprites.len();
            let textures = mesh
                .faces
                .iter()
                .map(|face| face.texture)
                .chain(mesh.sprites.iter().map(|sprite| sprite.texture));
            for texture in textures {
                let texture = texture.normalized();
                if let Err(pos) = summary.textures.binary_search(&texture) {
                    summary.textures.insert(pos, texture);
                }
            }
        });

        summary
    }
}

/// Depth of the `child` hierarchy under `mesh`. `next` siblings share their
/// parent's level.
fn child_depth(mesh: &GloMesh) -> usize {
    let mut deepest = 0;
    let mut pending = vec![(mesh, 1)];
    while let Some((current, level)) = pending.pop() {
        deepest = deepest.max(level);
        if let Some(next) = current.next.as_deref() {
            pending.push((next, level));
        }
        if let Some(child) = current.child.as_deref() {
            pending.push((child, level + 1));
        }
    }
    deepest
}
