use crate::error::GeneratorError;
use crate::listing::{Dictionaries, ExpertAdvisor};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub fn load_dictionaries(path: impl AsRef<Path>) -> Result<Dictionaries, GeneratorError> {
    read_json(path.as_ref())
}

pub fn load_listings(path: impl AsRef<Path>) -> Result<Vec<ExpertAdvisor>, GeneratorError> {
    read_json(path.as_ref())
}

/// Writes `listings` as pretty-printed JSON, replacing any existing file.
pub fn save_listings(
    listings: &[ExpertAdvisor],
    path: impl AsRef<Path>,
) -> Result<(), GeneratorError> {
    let path = path.as_ref();
    let io_err = |source| GeneratorError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    serde_json::to_writer_pretty(&mut writer, listings).map_err(|source| GeneratorError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_err)?;

    tracing::info!(path = %path.display(), count = listings.len(), "Saved listings");
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, GeneratorError> {
    let file = File::open(path).map_err(|source| GeneratorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| GeneratorError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::ListingGenerator;
    use configuration::GeneratorSettings;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::path::PathBuf;

    fn scratch_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tradeflow-{}-{name}", std::process::id()))
    }

    #[test]
    fn saved_listings_can_be_read_back() {
        let settings = GeneratorSettings {
            count: 2,
            ..GeneratorSettings::default()
        };
        let mut dicts = Dictionaries {
            names: vec!["Trend Rider".into(), "Mean Machine".into()],
            creators: vec!["A".into(), "B".into()],
            descriptions: vec!["x".into(), "y".into()],
        };
        let listings = ListingGenerator::new(&settings, StdRng::seed_from_u64(1))
            .generate(&mut dicts)
            .unwrap();

        let path = scratch_file("listings.json");
        save_listings(&listings, &path).unwrap();
        let loaded = load_listings(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name, listings[0].name);
        assert_eq!(
            loaded[0].performance.data.len(),
            listings[0].performance.data.len()
        );
    }

    #[test]
    fn dictionaries_load_from_json() {
        let path = scratch_file("dictionaries.json");
        std::fs::write(
            &path,
            r#"{ "names": ["One"], "creators": ["Two"], "descriptions": ["Three"] }"#,
        )
        .unwrap();
        let dicts = load_dictionaries(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(dicts.names, vec!["One".to_string()]);
    }

    #[test]
    fn missing_file_reports_its_path() {
        let path = scratch_file("does-not-exist.json");
        let err = load_dictionaries(&path).unwrap_err();
        assert!(matches!(err, GeneratorError::Io { .. }));
        assert!(err.to_string().contains("does-not-exist.json"));
    }

    #[test]
    fn listings_with_empty_history_are_rejected() {
        let path = scratch_file("bad-listings.json");
        std::fs::write(
            &path,
            r#"[{ "id": 1, "name": "n", "creator": "c", "description": "d", "price": 0,
                 "stars": 3, "reviews": 10, "image": "n.png", "historical_data": "n.json",
                 "performance": { "roi": 5.0, "risk_level": "Low", "win_rate": 60,
                                  "data": [] } }]"#,
        )
        .unwrap();
        let err = load_listings(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, GeneratorError::Json { .. }));
    }
}
