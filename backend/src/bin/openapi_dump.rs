//! Write the OpenAPI document as pretty JSON to stdout, or to the path given
//! as the first argument.

use std::io::Write as _;

use color_eyre::eyre::{Context, Result};
use swift_parcel::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<()> {
    color_eyre::install()?;
    let document = ApiDoc::openapi()
        .to_pretty_json()
        .wrap_err("failed to serialise OpenAPI document")?;
    match std::env::args_os().nth(1) {
        Some(path) => std::fs::write(&path, document)
            .wrap_err_with(|| format!("failed to write {}", path.to_string_lossy())),
        None => writeln!(std::io::stdout().lock(), "{document}").wrap_err("failed to write stdout"),
    }
}
