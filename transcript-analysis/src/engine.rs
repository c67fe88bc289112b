use std::sync::Arc;

use chrono::Utc;
use logger_redacted::{redactor_for, LoggerConfig, PhiRedactor};
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::attributes::{self, AttributeResolver};
use crate::classifier::{AggregateClassifier, SeverityAssessment, UrgencyAssessment};
use crate::config::AnalysisConfig;
use crate::entity::Entity;
use crate::error::{AnalysisError, AnalysisResult};
use crate::extractor::EntityExtractor;
use crate::history::{self, MedicalHistoryEntry};
use crate::lexicon::Lexicon;
use crate::observations::{self, Observation};
use crate::recommendations::{self, Treatment};
use crate::report::{AnalysisReport, ReportParts};
use crate::risk::{self, RiskFactor};
use crate::segmenter::{self, EntityRecognizer, Sentence, SentenceSegmenter};

/// Stateless transcript analysis over an injected, immutable lexicon.
///
/// Holds no per-call state, so one engine can serve concurrent callers.
pub struct AnalysisEngine {
    lexicon: Arc<Lexicon>,
    config: AnalysisConfig,
    segmenter: Option<Box<dyn SentenceSegmenter>>,
    recognizer: Option<Box<dyn EntityRecognizer>>,
    resolvers: Vec<Box<dyn AttributeResolver>>,
    redactor: Option<PhiRedactor>,
}

impl AnalysisEngine {
    /// Engine with default configuration and the built-in splitter
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self::build(lexicon, AnalysisConfig::default())
    }

    /// # Errors
    ///
    /// Fails when the configuration does not validate.
    pub fn with_config(lexicon: Arc<Lexicon>, config: AnalysisConfig) -> AnalysisResult<Self> {
        config.validate()?;
        Ok(Self::build(lexicon, config))
    }

    /// Build from configuration, loading the lexicon file when one is configured
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration or an unreadable or invalid lexicon file.
    pub fn from_config(config: AnalysisConfig) -> AnalysisResult<Self> {
        let lexicon = match &config.lexicon_path {
            Some(path) => {
                info!(path = %path.display(), "Loading lexicon definition");
                Arc::new(Lexicon::load(path)?)
            }
            None => Lexicon::standard(),
        };
        Self::with_config(lexicon, config)
    }

    fn build(lexicon: Arc<Lexicon>, config: AnalysisConfig) -> Self {
        Self {
            lexicon,
            config,
            segmenter: None,
            recognizer: None,
            resolvers: attributes::default_resolvers(),
            redactor: redactor_for(&LoggerConfig::default()),
        }
    }

    /// Follow the logger's redaction switch for transcript snippets in debug logs
    pub fn with_logger_config(mut self, logger: &LoggerConfig) -> Self {
        self.redactor = redactor_for(logger);
        self
    }

    /// Use an upstream sentence segmenter, falling back to the built-in one when it fails
    pub fn with_segmenter(mut self, segmenter: Box<dyn SentenceSegmenter>) -> Self {
        self.segmenter = Some(segmenter);
        self
    }

    /// Merge entity spans from an upstream recognizer into lexicon matches
    pub fn with_recognizer(mut self, recognizer: Box<dyn EntityRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    /// Append a resolver to the attribute chain; it runs after the standard four
    pub fn with_resolver(mut self, resolver: Box<dyn AttributeResolver>) -> Self {
        self.resolvers.push(resolver);
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn segment(&self, transcript: &str) -> Vec<Sentence> {
        segmenter::segment_with_fallback(self.segmenter.as_deref(), transcript)
    }

    /// Raw lexicon (and recognizer) matches, before attribute resolution
    pub fn extract(&self, transcript: &str) -> Vec<Entity> {
        let sentences = self.segment(transcript);
        self.extractor().extract(transcript, &sentences)
    }

    /// Run the attribute resolver chain over one entity
    pub fn resolve_attributes(&self, entity: Entity) -> Entity {
        attributes::enrich(&self.resolvers, &self.lexicon, entity)
    }

    pub fn classify_severity(&self, transcript: &str) -> SeverityAssessment {
        self.classifier().classify_severity(transcript)
    }

    pub fn classify_urgency(&self, transcript: &str) -> UrgencyAssessment {
        self.classifier().classify_urgency(transcript)
    }

    pub fn identify_risk_factors(&self, transcript: &str) -> Vec<RiskFactor> {
        risk::identify_risk_factors(&self.lexicon, &self.segment(transcript))
    }

    pub fn extract_observations(&self, transcript: &str) -> Vec<Observation> {
        observations::extract_observations(&self.lexicon, &self.segment(transcript))
    }

    pub fn extract_medical_history(&self, transcript: &str) -> Vec<MedicalHistoryEntry> {
        history::extract_medical_history(&self.lexicon, &self.segment(transcript))
    }

    /// Treatments for every symptom mention, from a fresh pass over the transcript
    pub fn suggest_treatments(&self, transcript: &str) -> Vec<Treatment> {
        let sentences = self.segment(transcript);
        let entities = self.enriched_entities(transcript, &sentences);
        let classifier = self.classifier();
        recommendations::suggest_treatments(
            &entities,
            classifier.classify_severity(transcript).level,
            classifier.classify_urgency(transcript).level,
            &recommendations::transcript_precautions(transcript),
        )
    }

    /// Full analysis of one transcript
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InputTooLarge`] when the transcript exceeds the
    /// configured length bound. Absence of matches is never an error.
    #[instrument(skip_all, fields(transcript = %PhiRedactor::fingerprint(transcript)))]
    pub fn analyze(&self, transcript: &str) -> AnalysisResult<AnalysisReport> {
        self.check_length(transcript)?;

        let sentences = self.segment(transcript);
        let entities = self.enriched_entities(transcript, &sentences);

        let classifier = self.classifier();
        let severity = classifier.classify_severity(transcript);
        let urgency = classifier.classify_urgency(transcript);

        let risk_factors = risk::identify_risk_factors(&self.lexicon, &sentences);
        let observations = observations::extract_observations(&self.lexicon, &sentences);

        let precautions = recommendations::transcript_precautions(transcript);
        let treatments =
            recommendations::suggest_treatments(&entities, severity.level, urgency.level, &precautions);

        for factor in &risk_factors {
            debug!(
                category = ?factor.category,
                severity = %factor.severity,
                context = %self.loggable(&factor.context),
                "Risk factor identified"
            );
        }
        info!(
            sentences = sentences.len(),
            entities = entities.len(),
            risk_factors = risk_factors.len(),
            severity = %severity.level,
            urgency = %urgency.level,
            "Transcript analysed"
        );

        Ok(AnalysisReport::assemble(
            ReportParts {
                entities,
                risk_factors,
                severity,
                urgency,
                treatments,
                observations,
            },
            Utc::now(),
        ))
    }

    /// Analyse raw bytes from a collaborator
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidInput`] when the bytes are not UTF-8
    /// text; no partial analysis is attempted.
    pub fn analyze_bytes(&self, transcript: &[u8]) -> AnalysisResult<AnalysisReport> {
        let text = std::str::from_utf8(transcript).map_err(|e| {
            let err = AnalysisError::InvalidInput(format!("transcript is not UTF-8 text: {}", e));
            warn!(code = err.code(), "Transcript rejected");
            err
        })?;
        self.analyze(text)
    }

    /// Analyse independent transcripts in parallel, preserving input order
    pub fn analyze_batch<S>(&self, transcripts: &[S]) -> Vec<AnalysisResult<AnalysisReport>>
    where
        S: AsRef<str> + Sync,
    {
        transcripts
            .par_iter()
            .map(|transcript| self.analyze(transcript.as_ref()))
            .collect()
    }

    fn enriched_entities(&self, transcript: &str, sentences: &[Sentence]) -> Vec<Entity> {
        self.extractor()
            .extract(transcript, sentences)
            .into_iter()
            .map(|entity| self.resolve_attributes(entity))
            .collect()
    }

    fn extractor(&self) -> EntityExtractor<'_> {
        EntityExtractor::new(&self.lexicon).with_recognizer(self.recognizer.as_deref())
    }

    fn classifier(&self) -> AggregateClassifier<'_> {
        AggregateClassifier::new(&self.lexicon, self.config.confidence_policy())
    }

    fn check_length(&self, transcript: &str) -> AnalysisResult<()> {
        let Some(limit) = self.config.max_transcript_chars else {
            return Ok(());
        };
        let length = transcript.chars().count();
        if length > limit {
            let err = AnalysisError::InputTooLarge { length, limit };
            warn!(code = err.code(), length, limit, "Transcript rejected");
            return Err(err);
        }
        Ok(())
    }

    fn loggable(&self, text: &str) -> String {
        match &self.redactor {
            Some(redactor) => redactor.redact(text),
            None => text.to_string(),
        }
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new(Lexicon::standard())
    }
}
