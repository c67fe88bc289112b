//! Clinical Transcript Analysis for Healthcare EMR
//!
//! Turns a free-text clinical transcript into a structured report using
//! deterministic keyword and pattern matching over a fixed medical lexicon.
//!
//! # Pipeline
//!
//! 1. **Segmentation** - sentences with offsets, optionally from an upstream segmenter
//! 2. **Entity extraction** - symptoms, conditions, medications, procedures
//! 3. **Attribute resolution** - location, duration, severity and status per entity
//! 4. **Classification** - aggregate severity and urgency with confidence and evidence
//! 5. **Risk factors and observations** - per-sentence cue detection
//! 6. **Treatments** - follow-up guidance for every symptom mention
//!
//! # Features
//!
//! - Pure and deterministic: identical input yields an identical report apart from `generatedAt`
//! - Pluggable segmenter, recognizer and attribute resolvers with built-in fallbacks
//! - Replaceable lexicon loaded from JSON
//! - PHI-safe logging: transcripts are fingerprinted, never logged verbatim
//! - Parallel batch analysis
//!
//! # Example Usage
//!
//! ```rust
//! use transcript_analysis::{AnalysisEngine, SeverityLevel, UrgencyLevel};
//!
//! # fn example() -> Result<(), transcript_analysis::AnalysisError> {
//! let engine = AnalysisEngine::default();
//! let report = engine.analyze("Patient reports chest pain since this morning.")?;
//!
//! assert_eq!(report.urgency.level, UrgencyLevel::Emergency);
//! assert_eq!(report.severity.level, SeverityLevel::Mild);
//! println!("{}", report.to_json_pretty()?);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod attributes;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod entity;
pub mod error;
pub mod extractor;
pub mod history;
pub mod lexicon;
pub mod observations;
pub mod recommendations;
pub mod report;
pub mod risk;
pub mod segmenter;

pub use classifier::{ClassificationResult, ConfidencePolicy, SeverityAssessment, UrgencyAssessment};
pub use config::AnalysisConfig;
pub use engine::AnalysisEngine;
pub use entity::{AttributeUpdate, DurationKind, Entity, EntityDuration, EntityStatus};
pub use error::{AnalysisError, AnalysisResult};
pub use history::MedicalHistoryEntry;
pub use lexicon::{
    EntityCategory, HistoryCategory, Lexicon, LexiconDefinition, ObservationCategory, RiskCategory,
    SeverityLevel, UrgencyLevel,
};
pub use observations::Observation;
pub use recommendations::{FollowUp, Treatment};
pub use report::AnalysisReport;
pub use risk::RiskFactor;
pub use segmenter::{EntityRecognizer, EntitySpan, Sentence, SentenceSegmenter};
