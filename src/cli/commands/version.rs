//! Version command implementation.

use crate::error::Result;
use serde::Serialize;

#[derive(Serialize)]
struct VersionOutput<'a> {
    name: &'a str,
    version: &'a str,
    build: &'a str,
}

const fn build_kind() -> &'static str {
    if cfg!(debug_assertions) {
        "dev"
    } else {
        "release"
    }
}

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let output = VersionOutput {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        build: build_kind(),
    };

    if json {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{} version {} ({})", output.name, output.version, output.build);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_json_shape() {
        let output = VersionOutput {
            name: "mkbench",
            version: "0.1.0",
            build: build_kind(),
        };
        let value = serde_json::to_value(&output).expect("json");
        assert_eq!(value["name"], "mkbench");
        assert_eq!(value["version"], "0.1.0");
        assert!(matches!(value["build"].as_str(), Some("dev" | "release")));
    }
}
