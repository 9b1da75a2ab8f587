//! Single-file storage for trained pipelines.
//!
//! Layout:
//!
//! ```text
//! magic "VRCT" | version (major, minor) | payload length (u64 LE) | payload
//! ```
//!
//! The payload is a bincode-encoded [`PipelineArtifact`]. Readers reject any
//! major version other than [`FORMAT_VERSION`].

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VeracityError};
use crate::ml::naive_bayes::NaiveBayesClassifier;
use crate::ml::tfidf::TfIdfVectorizer;
use crate::pipeline::{PipelineConfig, TrainedPipeline};

/// Artifact file magic number.
pub const MAGIC: &[u8; 4] = b"VRCT";

/// Major version of the artifact format.
pub const FORMAT_VERSION: u8 = 1;

const FORMAT_MINOR_VERSION: u8 = 0;

/// Serialized form of a [`TrainedPipeline`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineArtifact {
    /// Version of the crate that wrote the artifact.
    pub crate_version: String,
    /// Configuration the pipeline was trained with.
    pub config: PipelineConfig,
    /// Fitted vectorizer.
    pub vectorizer: TfIdfVectorizer,
    /// Trained classifier.
    pub classifier: NaiveBayesClassifier,
}

impl PipelineArtifact {
    /// Capture a trained pipeline.
    pub fn from_pipeline(pipeline: &TrainedPipeline) -> Self {
        PipelineArtifact {
            crate_version: crate::VERSION.to_string(),
            config: pipeline.config().clone(),
            vectorizer: pipeline.vectorizer().clone(),
            classifier: pipeline.classifier().clone(),
        }
    }

    /// Rebuild the pipeline.
    pub fn into_pipeline(self) -> Result<TrainedPipeline> {
        TrainedPipeline::from_parts(self.config, self.vectorizer, self.classifier)
    }

    /// Write the artifact.
    pub fn write_to<W: Write>(&self, output: &mut W) -> Result<()> {
        let payload = bincode::serde::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| {
                VeracityError::serialization(format!("Failed to serialize pipeline: {e}"))
            })?;

        output.write_all(MAGIC)?;
        output.write_all(&[FORMAT_VERSION, FORMAT_MINOR_VERSION])?;
        output.write_all(&(payload.len() as u64).to_le_bytes())?;
        output.write_all(&payload)?;
        output.flush()?;
        Ok(())
    }

    /// Read an artifact written by [`write_to`](Self::write_to).
    pub fn read_from<R: Read>(input: &mut R) -> Result<Self> {
        let mut magic = [0u8; 4];
        input.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(VeracityError::invalid_input(
                "not a trained pipeline file (bad magic number)",
            ));
        }

        let mut version = [0u8; 2];
        input.read_exact(&mut version)?;
        if version[0] != FORMAT_VERSION {
            return Err(VeracityError::invalid_input(format!(
                "unsupported pipeline format version {}.{}",
                version[0], version[1]
            )));
        }

        let mut len_bytes = [0u8; 8];
        input.read_exact(&mut len_bytes)?;
        let len = u64::from_le_bytes(len_bytes) as usize;

        let mut payload = Vec::new();
        input.take(len as u64).read_to_end(&mut payload)?;
        if payload.len() != len {
            return Err(VeracityError::serialization(format!(
                "truncated pipeline file: expected {len} payload bytes, found {}",
                payload.len()
            )));
        }

        let (artifact, _): (PipelineArtifact, _) =
            bincode::serde::decode_from_slice(&payload, bincode::config::standard()).map_err(
                |e| VeracityError::serialization(format!("Failed to deserialize pipeline: {e}")),
            )?;
        Ok(artifact)
    }
}

impl TrainedPipeline {
    /// Save the pipeline to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut output = BufWriter::new(File::create(path)?);
        PipelineArtifact::from_pipeline(self).write_to(&mut output)?;
        info!("Saved trained pipeline to {}", path.display());
        Ok(())
    }

    /// Load a pipeline saved with [`save`](Self::save).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            VeracityError::invalid_input(format!(
                "cannot open pipeline file {}: {e}",
                path.display()
            ))
        })?;

        let artifact = PipelineArtifact::read_from(&mut BufReader::new(file))?;
        info!(
            "Loaded trained pipeline from {} (written by version {})",
            path.display(),
            artifact.crate_version
        );
        artifact.into_pipeline()
    }
}
