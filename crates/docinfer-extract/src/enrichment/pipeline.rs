use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use docinfer_ai::{BackendProbe, MetadataAnalyzer, OllamaProbe, OllamaProvider, PromptSet};
use docinfer_core::{BatchError, BatchResult, DocinferConfig, ExtractionConfig, MetadataResult};
use tracing::{debug, info, warn};

use crate::enrichment::merge::merge;
use crate::error::Result;
use crate::pdf::{self, EmbeddedExtraction, TextExtraction};

pub const NO_TEXT_WARNING: &str = "No extractable text found - AI summary unavailable";
pub const AI_FAILED_WARNING: &str = "AI analysis failed - showing embedded metadata only";

pub fn unavailable_warning(model: &str) -> String {
    format!("Ollama not available or model '{model}' not found. Run: ollama pull {model}")
}

pub trait FileMetadataExtractor: Send + Sync {
    fn extract_embedded(&self, path: &Path) -> Result<EmbeddedExtraction>;
    fn extract_text(&self, path: &Path, max_pages: usize) -> Result<TextExtraction>;
}

struct DefaultFileMetadataExtractor;

impl FileMetadataExtractor for DefaultFileMetadataExtractor {
    fn extract_embedded(&self, path: &Path) -> Result<EmbeddedExtraction> {
        pdf::extract_embedded(path)
    }

    fn extract_text(&self, path: &Path, max_pages: usize) -> Result<TextExtraction> {
        pdf::extract_text(path, max_pages)
    }
}

/// Receives one `advance` per file of a batch, whatever the file's outcome.
pub trait ProgressObserver {
    fn start(&self, _total: usize) {}
    fn advance(&self, file: &Path);
    fn finish(&self) {}
}

pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn advance(&self, _file: &Path) {}
}

/// Whether AI analysis runs for the current file or batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiRoute {
    /// Turned off by configuration.
    Disabled,
    /// Enabled, but the backend or model is missing.
    Unavailable,
    Ready,
}

struct AiStage {
    probe: Arc<dyn BackendProbe>,
    analyzer: MetadataAnalyzer,
}

/// Embedded extraction, optional AI analysis and reconciliation for PDFs.
pub struct EnrichmentPipeline {
    config: ExtractionConfig,
    ai: Option<AiStage>,
    file_metadata_extractor: Arc<dyn FileMetadataExtractor>,
}

impl EnrichmentPipeline {
    pub fn new(
        config: ExtractionConfig,
        probe: Arc<dyn BackendProbe>,
        analyzer: MetadataAnalyzer,
    ) -> Self {
        Self {
            config,
            ai: Some(AiStage { probe, analyzer }),
            file_metadata_extractor: Arc::new(DefaultFileMetadataExtractor),
        }
    }

    /// A pipeline that never contacts the AI backend.
    pub fn embedded_only(config: ExtractionConfig) -> Self {
        Self {
            config,
            ai: None,
            file_metadata_extractor: Arc::new(DefaultFileMetadataExtractor),
        }
    }

    /// Production pipeline talking to Ollama as configured.
    pub fn from_config(config: &DocinferConfig) -> docinfer_ai::Result<Self> {
        let extraction = config.extraction.clone();
        if extraction.skip_ai {
            return Ok(Self::embedded_only(extraction));
        }

        let provider = OllamaProvider::new(config.ollama.base_url.clone(), extraction.timeout())?;
        let probe = OllamaProbe::from_config(&config.ollama);
        let analyzer = MetadataAnalyzer::new(
            Arc::new(provider),
            PromptSet::from_config(&config.prompts),
            &extraction,
        );
        Ok(Self::new(extraction, Arc::new(probe), analyzer))
    }

    pub fn with_file_extractor(mut self, extractor: Arc<dyn FileMetadataExtractor>) -> Self {
        self.file_metadata_extractor = extractor;
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn ai_enabled(&self) -> bool {
        self.ai.is_some()
    }

    /// Probe the backend. Every call runs the inventory command again.
    pub fn check_ai(&self) -> AiRoute {
        match &self.ai {
            None => AiRoute::Disabled,
            Some(stage) if stage.probe.is_backend_available(stage.analyzer.model()) => {
                AiRoute::Ready
            }
            Some(_) => AiRoute::Unavailable,
        }
    }

    /// Process one PDF; extraction errors are returned to the caller.
    ///
    /// AI problems never fail the call. They end up as warnings on the result.
    pub fn process_file(&self, path: &Path) -> Result<MetadataResult> {
        let mut result = self.extract_embedded(path)?;
        let Some(stage) = &self.ai else {
            return Ok(result);
        };

        let Some(text) = self.read_text(path, &mut result) else {
            return Ok(result);
        };

        if stage.probe.is_backend_available(stage.analyzer.model()) {
            analyze_into(&stage.analyzer, &text, &mut result);
        } else {
            result.add_warning(unavailable_warning(stage.analyzer.model()));
        }
        Ok(result)
    }

    /// Process every file of a directory, checking AI availability once up front.
    pub fn process_directory(
        &self,
        directory: &Path,
        files: &[PathBuf],
        progress: &dyn ProgressObserver,
    ) -> BatchResult {
        let route = self.check_ai();
        self.process_batch(directory, files, route, progress)
    }

    /// Process a batch with an availability decision the caller already made.
    ///
    /// A failing or panicking file is recorded in `errors` and the batch moves on.
    pub fn process_batch(
        &self,
        directory: &Path,
        files: &[PathBuf],
        route: AiRoute,
        progress: &dyn ProgressObserver,
    ) -> BatchResult {
        if route == AiRoute::Unavailable {
            info!(
                model = %self.config.model,
                "AI backend unavailable, processing batch with embedded metadata only"
            );
        }
        let stage = self.ai.as_ref().filter(|_| route == AiRoute::Ready);

        let mut results = Vec::with_capacity(files.len());
        let mut errors = Vec::new();
        progress.start(files.len());

        for path in files {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.process_one(path, stage)));
            match outcome {
                Ok(Ok(result)) => results.push(result),
                Ok(Err(err)) => {
                    debug!(path = %path.display(), "file failed: {err}");
                    errors.push(batch_error(path, err.to_string()));
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    warn!(path = %path.display(), "file processing panicked: {message}");
                    errors.push(batch_error(path, message));
                }
            }
            progress.advance(path);
        }

        progress.finish();
        let batch = BatchResult::new(directory, results, errors);
        info!(
            total = batch.total_files,
            successful = batch.successful,
            failed = batch.failed,
            "batch complete"
        );
        batch
    }

    fn process_one(&self, path: &Path, stage: Option<&AiStage>) -> Result<MetadataResult> {
        let mut result = self.extract_embedded(path)?;
        if let Some(stage) = stage
            && let Some(text) = self.read_text(path, &mut result)
        {
            analyze_into(&stage.analyzer, &text, &mut result);
        }
        Ok(result)
    }

    fn extract_embedded(&self, path: &Path) -> Result<MetadataResult> {
        let extraction = self.file_metadata_extractor.extract_embedded(path)?;
        Ok(MetadataResult::new(
            path,
            extraction.page_count,
            extraction.metadata,
            extraction.warnings,
        ))
    }

    /// Page text for the analyzer, or `None` with a warning recorded.
    fn read_text(&self, path: &Path, result: &mut MetadataResult) -> Option<String> {
        let max_pages = self.config.max_pages;
        match self.file_metadata_extractor.extract_text(path, max_pages) {
            Ok(extraction) => {
                result.pages_analyzed = extraction.pages_read.min(result.page_count);
                if extraction.is_blank() {
                    result.add_warning(NO_TEXT_WARNING);
                    None
                } else {
                    Some(extraction.text)
                }
            }
            Err(err) => {
                result.add_warning(format!("Text extraction failed: {err}"));
                None
            }
        }
    }
}

fn analyze_into(analyzer: &MetadataAnalyzer, text: &str, result: &mut MetadataResult) {
    match analyzer.analyze(text) {
        Ok(ai) => {
            result.embedded = merge(&result.embedded, &ai);
            result.ai_generated = Some(ai);
        }
        Err(err) => result.add_warning(format!("{AI_FAILED_WARNING} ({err})")),
    }
}

fn batch_error(path: &Path, error: String) -> BatchError {
    BatchError {
        file: path.display().to_string(),
        error,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("internal error: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("internal error: {message}")
    } else {
        "internal error".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use docinfer_ai::{AiError, MetadataGenerator, StructuredRequest};
    use docinfer_core::EmbeddedMetadata;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    use super::*;
    use crate::error::ExtractError;
    use crate::test_support::{PdfFixture, write_corrupt, write_pdf};

    struct FixtureProbe {
        available: bool,
        calls: AtomicUsize,
    }

    impl FixtureProbe {
        fn new(available: bool) -> Arc<Self> {
            Arc::new(Self {
                available,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl BackendProbe for FixtureProbe {
        fn is_backend_running(&self) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.available
        }

        fn is_model_present(&self, _model: &str) -> bool {
            self.available
        }
    }

    struct FixtureGenerator {
        answer: Option<Value>,
        calls: AtomicUsize,
    }

    impl MetadataGenerator for FixtureGenerator {
        fn generate(&self, _request: &StructuredRequest) -> docinfer_ai::Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer
                .clone()
                .ok_or_else(|| AiError::Unavailable("connection refused".to_string()))
        }
    }

    fn generator(answer: Option<Value>) -> Arc<FixtureGenerator> {
        Arc::new(FixtureGenerator {
            answer,
            calls: AtomicUsize::new(0),
        })
    }

    fn gelman_answer() -> Value {
        json!({
            "summary": "A comprehensive treatment of Bayesian methods. Covers modeling and computation.",
            "keywords": ["bayesian", "statistics", "mcmc"],
            "category": "bayesian-statistics",
            "suggested_filename": "bayesian-data-analysis-gelman-2013.pdf"
        })
    }

    fn pipeline(
        probe: Arc<FixtureProbe>,
        generator: Arc<FixtureGenerator>,
    ) -> EnrichmentPipeline {
        let config = ExtractionConfig::default();
        let analyzer = MetadataAnalyzer::new(generator, PromptSet::default(), &config);
        EnrichmentPipeline::new(config, probe, analyzer)
    }

    /// Extractor returning canned values, with an optional panic on one file name.
    struct FixtureExtractor {
        text: String,
        panic_on: Option<&'static str>,
    }

    impl FileMetadataExtractor for FixtureExtractor {
        fn extract_embedded(&self, path: &Path) -> Result<EmbeddedExtraction> {
            let name = path.file_name().unwrap().to_string_lossy();
            if Some(name.as_ref()) == self.panic_on {
                panic!("parser bug on {name}");
            }
            if name.starts_with("bad") {
                return Err(ExtractError::Format("bad xref table".to_string()));
            }
            Ok(EmbeddedExtraction {
                metadata: EmbeddedMetadata::default(),
                page_count: 4,
                warnings: Vec::new(),
            })
        }

        fn extract_text(&self, _path: &Path, max_pages: usize) -> Result<TextExtraction> {
            Ok(TextExtraction {
                text: self.text.clone(),
                pages_read: max_pages.min(4),
            })
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl ProgressObserver for RecordingProgress {
        fn start(&self, total: usize) {
            self.events.lock().unwrap().push(format!("start {total}"));
        }

        fn advance(&self, file: &Path) {
            let name = file.file_name().unwrap().to_string_lossy().into_owned();
            self.events.lock().unwrap().push(name);
        }

        fn finish(&self) {
            self.events.lock().unwrap().push("finish".to_string());
        }
    }

    #[test]
    fn single_file_merges_ai_metadata() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scan.pdf");
        write_pdf(&path, &PdfFixture::with_pages(&["Bayesian Data Analysis", "Chapter 1"]));

        let probe = FixtureProbe::new(true);
        let generator = generator(Some(gelman_answer()));
        let result = pipeline(probe, generator.clone()).process_file(&path).unwrap();

        assert_eq!(result.page_count, 2);
        assert_eq!(result.pages_analyzed, 2);
        assert_eq!(result.embedded.title.as_deref(), Some("Bayesian Data Analysis"));
        assert_eq!(result.embedded.author.as_deref(), Some("gelman"));
        assert_eq!(result.embedded.subject.as_deref(), Some("bayesian-statistics"));
        let ai = result.ai_generated.unwrap();
        assert_eq!(ai.keywords, vec!["#bayesian", "#statistics", "#mcmc"]);
        assert!(result.warnings.is_empty());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn single_file_reports_unavailable_backend() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("paper.pdf");
        write_pdf(&path, &PdfFixture::with_pages(&["Some text"]));

        let generator = generator(Some(gelman_answer()));
        let result = pipeline(FixtureProbe::new(false), generator.clone())
            .process_file(&path)
            .unwrap();

        assert!(result.ai_generated.is_none());
        assert_eq!(
            result.warnings,
            vec![
                "Ollama not available or model 'gemma3:4b' not found. Run: ollama pull gemma3:4b"
                    .to_string()
            ]
        );
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn single_file_ai_failure_degrades_to_warning() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("paper.pdf");
        write_pdf(&path, &PdfFixture::with_pages(&["Some text"]));

        let result = pipeline(FixtureProbe::new(true), generator(None))
            .process_file(&path)
            .unwrap();

        assert!(result.ai_generated.is_none());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].starts_with(AI_FAILED_WARNING));
        assert!(result.embedded.is_empty());
    }

    #[test]
    fn blank_text_skips_probe_and_analysis() {
        let probe = FixtureProbe::new(true);
        let generator = generator(Some(gelman_answer()));
        let pipeline = pipeline(probe.clone(), generator.clone()).with_file_extractor(Arc::new(
            FixtureExtractor {
                text: "  \n ".to_string(),
                panic_on: None,
            },
        ));

        let result = pipeline.process_file(Path::new("blank.pdf")).unwrap();
        assert_eq!(result.warnings, vec![NO_TEXT_WARNING.to_string()]);
        assert_eq!(result.pages_analyzed, 4);
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn single_file_extraction_error_propagates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.pdf");
        write_corrupt(&path);

        let err = EnrichmentPipeline::embedded_only(ExtractionConfig::default())
            .process_file(&path)
            .unwrap_err();
        assert!(matches!(err, ExtractError::Format(_)));
    }

    #[test]
    fn embedded_only_pipeline_never_reads_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("paper.pdf");
        write_pdf(&path, &PdfFixture::with_pages(&["Some text", "More"]));

        let pipeline = EnrichmentPipeline::embedded_only(ExtractionConfig::default());
        assert!(!pipeline.ai_enabled());
        assert_eq!(pipeline.check_ai(), AiRoute::Disabled);

        let result = pipeline.process_file(&path).unwrap();
        assert_eq!(result.page_count, 2);
        assert_eq!(result.pages_analyzed, 0);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn batch_with_one_corrupt_file_keeps_going() {
        let dir = TempDir::new().unwrap();
        write_pdf(&dir.path().join("a.pdf"), &PdfFixture::with_pages(&["First"]));
        write_corrupt(&dir.path().join("b.pdf"));
        write_pdf(&dir.path().join("c.pdf"), &PdfFixture::with_pages(&["Third"]));

        let files = crate::find_pdfs(dir.path()).unwrap();
        let progress = RecordingProgress::default();
        let batch = EnrichmentPipeline::embedded_only(ExtractionConfig::default())
            .process_directory(dir.path(), &files, &progress);

        assert_eq!(batch.total_files, 3);
        assert_eq!(batch.successful, 2);
        assert_eq!(batch.failed, 1);
        assert_eq!(batch.results.len(), batch.successful);
        assert_eq!(batch.errors.len(), batch.failed);
        assert!(batch.errors[0].file.ends_with("b.pdf"));
        assert!(batch.errors[0].error.starts_with("Invalid or corrupted PDF"));
        assert_eq!(
            *progress.events.lock().unwrap(),
            vec!["start 3", "a.pdf", "b.pdf", "c.pdf", "finish"]
        );
    }

    #[test]
    fn batch_probes_once_and_isolates_panics() {
        let probe = FixtureProbe::new(true);
        let generator = generator(Some(gelman_answer()));
        let pipeline = pipeline(probe.clone(), generator.clone()).with_file_extractor(Arc::new(
            FixtureExtractor {
                text: "Bayesian Data Analysis".to_string(),
                panic_on: Some("boom.pdf"),
            },
        ));
        let files: Vec<PathBuf> = ["a.pdf", "bad.pdf", "boom.pdf", "d.pdf"]
            .iter()
            .map(PathBuf::from)
            .collect();

        let batch = pipeline.process_directory(Path::new("/papers"), &files, &NoProgress);

        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
        assert_eq!(batch.successful, 2);
        assert_eq!(batch.failed, 2);
        assert_eq!(batch.successful + batch.failed, batch.total_files);
        assert!(batch.errors[1].error.contains("parser bug on boom.pdf"));
        for result in &batch.results {
            assert_eq!(result.embedded.author.as_deref(), Some("gelman"));
            assert!(result.pages_analyzed <= result.page_count.min(10));
        }
    }

    #[test]
    fn batch_with_unavailable_backend_is_embedded_only() {
        let probe = FixtureProbe::new(false);
        let generator = generator(Some(gelman_answer()));
        let pipeline = pipeline(probe.clone(), generator.clone()).with_file_extractor(Arc::new(
            FixtureExtractor {
                text: "text".to_string(),
                panic_on: None,
            },
        ));
        let files = vec![PathBuf::from("a.pdf"), PathBuf::from("b2.pdf")];

        let batch = pipeline.process_directory(Path::new("/papers"), &files, &NoProgress);

        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(batch.successful, 2);
        assert!(batch.results.iter().all(|r| r.ai_generated.is_none()));
        assert!(batch.results.iter().all(|r| r.warnings.is_empty()));
        assert!(batch.results.iter().all(|r| r.pages_analyzed == 0));
    }

    #[test]
    fn batch_ai_failure_is_a_warning_not_an_error() {
        let pipeline = pipeline(FixtureProbe::new(true), generator(None)).with_file_extractor(
            Arc::new(FixtureExtractor {
                text: "text".to_string(),
                panic_on: None,
            }),
        );
        let files = vec![PathBuf::from("a.pdf")];

        let batch = pipeline.process_batch(Path::new("/papers"), &files, AiRoute::Ready, &NoProgress);

        assert_eq!(batch.successful, 1);
        assert!(batch.results[0].warnings[0].starts_with(AI_FAILED_WARNING));
    }
}
