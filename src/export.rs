use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ScrapeError;
use crate::models::BusinessCollection;

/// File stem for a search query: whitespace runs become single underscores.
pub fn file_stem(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Serialize the collection as CSV with a header row, in collection order.
pub fn to_csv_bytes(businesses: &BusinessCollection, path: &Path) -> Result<Vec<u8>, ScrapeError> {
    let export_err = |source: csv::Error| ScrapeError::Export {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(Vec::new());

    if businesses.is_empty() {
        writer.write_record(HEADER).map_err(export_err)?;
    }
    for business in businesses {
        writer.serialize(business).map_err(export_err)?;
    }

    writer
        .into_inner()
        .map_err(|e| export_err(csv::Error::from(e.into_error())))
}

const HEADER: [&str; 7] = [
    "name",
    "address",
    "website",
    "reviews_average",
    "reviews_count",
    "category",
    "coordinate",
];

/// Write `<output_dir>/<file_stem(query)>.csv`, replacing any previous file.
pub async fn save_csv(
    businesses: &BusinessCollection,
    output_dir: &Path,
    query: &str,
) -> Result<PathBuf, ScrapeError> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|source| ScrapeError::Io {
            path: output_dir.to_path_buf(),
            source,
        })?;

    let path = output_dir.join(format!("{}.csv", file_stem(query)));
    let bytes = to_csv_bytes(businesses, &path)?;

    tokio::fs::write(&path, bytes)
        .await
        .map_err(|source| ScrapeError::Io {
            path: path.clone(),
            source,
        })?;

    info!("💾 Saved {} businesses to {}", businesses.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Business;

    fn sample() -> BusinessCollection {
        vec![
            Business {
                name: "Yellow Cafe".to_string(),
                address: "Jalan Pantai Cenang".to_string(),
                website: String::new(),
                reviews_average: Some(4.5),
                reviews_count: 1234,
                category: "Cafe".to_string(),
                coordinate: String::new(),
            },
            Business {
                name: "Orkid Ria".to_string(),
                ..Business::default()
            },
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn file_stem_collapses_whitespace() {
        assert_eq!(file_stem("langkawi cenang restaurant"), "langkawi_cenang_restaurant");
        assert_eq!(file_stem("  kuah \t  seafood "), "kuah_seafood");
    }

    #[test]
    fn csv_has_header_and_rows_in_order() {
        let bytes = to_csv_bytes(&sample(), Path::new("out.csv")).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(
            lines[0],
            "name,address,website,reviews_average,reviews_count,category,coordinate"
        );
        assert_eq!(lines[1], "Yellow Cafe,Jalan Pantai Cenang,,4.5,1234,Cafe,");
        assert_eq!(lines[2], "Orkid Ria,,,,0,,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_collection_still_writes_header() {
        let bytes = to_csv_bytes(&BusinessCollection::new(), Path::new("out.csv")).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text.trim_end(),
            "name,address,website,reviews_average,reviews_count,category,coordinate"
        );
    }

    #[tokio::test]
    async fn save_csv_creates_directory_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("data").join("raw");

        let path = save_csv(&sample(), &output_dir, "langkawi cenang restaurant")
            .await
            .unwrap();
        assert_eq!(path, output_dir.join("langkawi_cenang_restaurant.csv"));

        let single: BusinessCollection = vec![Business::default()].into_iter().collect();
        save_csv(&single, &output_dir, "langkawi cenang restaurant")
            .await
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 2);
    }
}
