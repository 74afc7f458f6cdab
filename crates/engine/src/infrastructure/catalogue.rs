//! Catalogue loading.

use std::path::Path;

use babel_domain::Catalogue;

use crate::use_cases::SheetError;

/// Catalogue shipped with the engine.
pub const BUNDLED_CATALOGUE: &str = include_str!("../../data/catalogue.json");

/// Parses and validates catalogue JSON.
pub fn parse_catalogue(json: &str) -> Result<Catalogue, SheetError> {
    let catalogue: Catalogue = serde_json::from_str(json)?;
    catalogue.validate()?;
    Ok(catalogue)
}

/// Loads the catalogue at `path`, or the bundled one.
pub fn load_catalogue(path: Option<&Path>) -> Result<Catalogue, SheetError> {
    let catalogue = match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading catalogue");
            parse_catalogue(&std::fs::read_to_string(path)?)?
        }
        None => parse_catalogue(BUNDLED_CATALOGUE)?,
    };
    tracing::info!(
        playbooks = catalogue.playbooks.len(),
        crews = catalogue.crews.len(),
        factions = catalogue.all_factions().count(),
        "Catalogue loaded"
    );
    Ok(catalogue)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn bundled_catalogue_is_valid() {
        let catalogue = parse_catalogue(BUNDLED_CATALOGUE).expect("bundled catalogue parses");
        assert!(catalogue.playbook("hacker").is_some());
        assert!(catalogue.crew("runners").is_some());
        assert!(catalogue.all_factions().count() > 0);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"playbooks": {{"face": {{"title": "Face", "actions": {{"sway": 2}}}}}}}}"#
        )
        .expect("write catalogue");

        let catalogue = load_catalogue(Some(file.path())).expect("catalogue loads");
        assert_eq!(
            catalogue.playbook("face").map(|p| p.title.as_str()),
            Some("Face")
        );
        assert!(catalogue.crews.is_empty());
    }

    #[test]
    fn rejects_invalid_tiers() {
        let json = r#"{"factions": [{"name": "Corps", "key": "corps",
            "factions": [{"name": "The Council", "tier": 9}]}]}"#;
        assert!(matches!(parse_catalogue(json), Err(SheetError::Domain(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_catalogue(Some(Path::new("/nonexistent/catalogue.json")))
            .expect_err("file is missing");
        assert!(matches!(err, SheetError::CatalogueIo(_)));
    }
}
