pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Load a structured input from `--input <file>` or, failing that, piped stdin.
pub fn read_structured<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_input(path);
    }
    if let Some(data) = stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }
    Err(format!("--input <file.json|file.yaml> or stdin required for {what}").into())
}
