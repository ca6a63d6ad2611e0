//! CLI command for model statistics

use std::path::Path;

use super::load_model;

/// Print a summary of a model, as a table or as JSON
pub fn execute(path: &Path, json: bool) -> anyhow::Result<()> {
    let doc = load_model(path)?;
    let summary = doc.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("GLO Model: {}", path.display());
    println!("==========");
    println!("Objects:     {}", summary.objects);
    println!("Animations:  {}", summary.anims);
    println!(
        "Meshes:      {} ({} root, depth {})",
        summary.meshes, summary.root_meshes, summary.max_depth
    );
    println!(
        "Keyframes:   {} move, {} scale, {} rotate",
        summary.move_keys, summary.scale_keys, summary.rotate_keys
    );
    println!("Vertices:    {}", summary.vertices);
    println!("Faces:       {}", summary.faces);
    println!("Sprites:     {}", summary.sprites);

    if !summary.anim_names.is_empty() {
        println!();
        println!("Animations:");
        for name in &summary.anim_names {
            println!("  - {name}");
        }
    }

    if !summary.textures.is_empty() {
        println!();
        println!("Textures ({}):", summary.textures.len());
        for texture in &summary.textures {
            println!("  - {texture}");
        }
    }

    Ok(())
}
