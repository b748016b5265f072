//! Hand-off artifacts between pipeline stages.
//!
//! Layout: `{dir}/ft_auctions.json`, `{dir}/ft_subject_earnings.json`,
//! `{dir}/ft_subject_earnings.csv`, each JSON artifact with a
//! `{name}.meta.json` sidecar (record count, blake3 content hash, source
//! label, written-at timestamp).
//!
//! Writes are atomic: write to .tmp, rename into place. The content hash lets
//! a re-run against unchanged inputs be verified as byte-identical.

use crate::error::ArtifactError;
use crate::model::{AuctionsByType, EarningStat};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const AUCTIONS_FILE: &str = "ft_auctions.json";
const EARNINGS_FILE: &str = "ft_subject_earnings.json";
const EARNINGS_CSV_FILE: &str = "ft_subject_earnings.csv";

/// Metadata sidecar for one JSON artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMeta {
    pub record_count: usize,
    pub data_hash: String,
    pub source: String,
    pub written_at: chrono::NaiveDateTime,
}

/// Directory-backed artifact store.
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn auctions_path(&self) -> PathBuf {
        self.dir.join(AUCTIONS_FILE)
    }

    pub fn earnings_path(&self) -> PathBuf {
        self.dir.join(EARNINGS_FILE)
    }

    pub fn earnings_csv_path(&self) -> PathBuf {
        self.dir.join(EARNINGS_CSV_FILE)
    }

    /// Persist the auction listing artifact.
    pub fn write_auctions(&self, auctions: &AuctionsByType) -> Result<PathBuf, ArtifactError> {
        let record_count = auctions.values().map(Vec::len).sum();
        self.write_json(AUCTIONS_FILE, auctions, record_count, "auctions")
    }

    /// Load the auction listing artifact in full.
    pub fn read_auctions(&self) -> Result<AuctionsByType, ArtifactError> {
        self.read_json(&self.auctions_path())
    }

    /// Persist the enriched earnings artifact.
    pub fn write_earnings(&self, stats: &[EarningStat]) -> Result<PathBuf, ArtifactError> {
        self.write_json(EARNINGS_FILE, &stats, stats.len(), "earnings")
    }

    /// Load the enriched earnings artifact in full.
    pub fn read_earnings(&self) -> Result<Vec<EarningStat>, ArtifactError> {
        self.read_json(&self.earnings_path())
    }

    /// Render the enriched earnings to strict tabular CSV for the warehouse
    /// stage. Every record must carry the full field set.
    pub fn export_earnings_csv(&self, stats: &[EarningStat]) -> Result<PathBuf, ArtifactError> {
        if stats.is_empty() {
            return Err(ArtifactError::Empty);
        }

        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.write_record([
            "entityId",
            "entityType",
            "allEarningsAmountInWei",
            "startTimestamp",
            "endTimestamp",
            "entitySymbol",
        ])?;
        for stat in stats {
            let symbol = stat
                .entity_symbol
                .as_deref()
                .ok_or_else(|| ArtifactError::Unenriched {
                    entity_id: stat.entity_id.clone(),
                })?;
            wtr.write_record([
                stat.entity_id.as_str(),
                stat.entity_type.as_str(),
                stat.all_earnings_amount_in_wei.as_str(),
                stat.start_timestamp.as_str(),
                stat.end_timestamp.as_str(),
                symbol,
            ])?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| ArtifactError::Io {
                path: EARNINGS_CSV_FILE.to_string(),
                source: e.into_error(),
            })?;

        let path = self.earnings_csv_path();
        self.write_atomic(&path, &bytes)?;
        Ok(path)
    }

    fn write_json<T: Serialize>(
        &self,
        name: &str,
        value: &T,
        record_count: usize,
        source: &str,
    ) -> Result<PathBuf, ArtifactError> {
        let bytes = serde_json::to_vec(value)?;
        let path = self.dir.join(name);
        self.write_atomic(&path, &bytes)?;

        let meta = ArtifactMeta {
            record_count,
            data_hash: blake3::hash(&bytes).to_hex().to_string(),
            source: source.to_string(),
            written_at: chrono::Local::now().naive_local(),
        };
        let meta_path = self.dir.join(format!("{name}.meta.json"));
        let meta_bytes = serde_json::to_vec_pretty(&meta)?;
        self.write_atomic(&meta_path, &meta_bytes)?;

        Ok(path)
    }

    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T, ArtifactError> {
        let text = fs::read_to_string(path).map_err(|e| ArtifactError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<(), ArtifactError> {
        fs::create_dir_all(&self.dir).map_err(|e| ArtifactError::Io {
            path: self.dir.display().to_string(),
            source: e,
        })?;

        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, bytes).map_err(|e| ArtifactError::Io {
            path: tmp_path.display().to_string(),
            source: e,
        })?;
        fs::rename(&tmp_path, path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            ArtifactError::Io {
                path: path.display().to_string(),
                source: e,
            }
        })
    }
}
