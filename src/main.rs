//! `notecanvas` - inspect canvas documents from the command line.
//!
//! ```text
//! notecanvas inspect <document.json>
//! notecanvas fetch <id>
//! ```

use anyhow::{Context, Result, bail};
use notecanvas::persistence::{HttpPersistence, PersistenceService};
use notecanvas::settings::Settings;
use notecanvas::wire::Document;
use notecanvas::{Scene, logging};
use std::path::Path;

fn main() -> Result<()> {
    let settings = Settings::load();
    logging::init(&settings.log_filter);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [cmd, path] if cmd == "inspect" => inspect(Path::new(path)),
        [cmd, id] if cmd == "fetch" => fetch(&settings, id),
        _ => bail!("usage: notecanvas inspect <document.json> | notecanvas fetch <id>"),
    }
}

fn inspect(path: &Path) -> Result<()> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let doc = Document::from_json(&json).with_context(|| format!("parsing {}", path.display()))?;
    print_summary(&doc);
    Ok(())
}

fn fetch(settings: &Settings, id: &str) -> Result<()> {
    let api = HttpPersistence::from_settings(&settings.api)?;
    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    let doc = runtime
        .block_on(api.get_document(id))
        .with_context(|| format!("fetching {id} from {}", api.base_url()))?;
    print_summary(&doc);
    Ok(())
}

fn print_summary(doc: &Document) {
    let scene = Scene::from_serializable(&doc.elements);
    println!("{} ({})", doc.title, doc.id);
    println!("  canvas      {}x{} {}", doc.width, doc.height, doc.background_color);
    println!("  strokes     {}", scene.stroke_count());
    println!("  texts       {}", scene.text_count());
    println!("  images      {}", scene.image_count());
    println!("  passthrough {}", scene.passthrough().len());
    println!("  files       {}", doc.files.len());
    for stroke in scene.strokes() {
        println!("  {} {}", stroke.id(), stroke.render_path());
    }
}
