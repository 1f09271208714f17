//! Print the OpenAPI document.
//!
//! Emits JSON by default; pass `--yaml` for YAML output.
//!
//! # Examples
//! ```sh
//! cargo run --manifest-path backend/Cargo.toml --bin openapi-dump -- --yaml
//! ```

use backend::doc::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let doc = ApiDoc::openapi();
    let rendered = if std::env::args().any(|arg| arg == "--yaml") {
        doc.to_yaml()?
    } else {
        doc.to_json()?
    };
    println!("{rendered}");
    Ok(())
}
