//! Version command

use super::CliResult;

/// Source commit, when the build provides one
const BUILD_COMMIT: Option<&str> = option_env!("KEVA_BUILD_COMMIT");

fn version_line() -> String {
    match BUILD_COMMIT {
        Some(commit) => format!("keva {} ({})", env!("CARGO_PKG_VERSION"), commit),
        None => format!("keva {}", env!("CARGO_PKG_VERSION")),
    }
}

pub fn execute() -> CliResult {
    println!("{}", version_line());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_line_names_the_tool() {
        assert!(version_line().starts_with("keva 0."));
    }
}
