//! Background worker for network calls and document analysis.
//!
//! Runs the prediction request (and the simulated analysis delay) off the
//! TUI thread so the event loop keeps drawing. The worker never touches the
//! history store; recording happens on the UI thread when `Complete` arrives.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::application::PredictionService;
use crate::domain::{PredictionInput, PredictionResult, UploadedDocument};
use crate::ports::{DocumentAnalyzer, Predictor, ResultStore};

/// Which step of a job failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedStage {
    Analysis,
    Prediction,
}

/// Progress updates from the worker.
#[derive(Debug, Clone)]
pub enum WorkerProgress {
    /// Reading the uploaded documents
    Analyzing,
    /// Values extracted from documents, about to be submitted
    Extracted(PredictionInput),
    /// Waiting for the prediction service
    Submitting,
    /// Prediction received
    Complete {
        result: PredictionResult,
        input: PredictionInput,
    },
    /// Job stopped with an error
    Failed { stage: FailedStage, message: String },
}

impl WorkerProgress {
    /// Whether this is the last message of a job.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Failed { .. })
    }
}

/// Shown when the worker thread exits without reporting an outcome.
pub const WORKER_STOPPED_MESSAGE: &str = "The background task stopped unexpectedly.";

/// Handle to a running worker.
pub struct WorkerHandle {
    /// Receiver for progress updates
    pub progress_rx: Receiver<WorkerProgress>,
    _handle: JoinHandle<()>,
    /// Stage a lost worker is reported against
    stage: FailedStage,
    finished: bool,
}

impl WorkerHandle {
    fn new(
        progress_rx: Receiver<WorkerProgress>,
        handle: JoinHandle<()>,
        stage: FailedStage,
    ) -> Self {
        Self {
            progress_rx,
            _handle: handle,
            stage,
            finished: false,
        }
    }

    /// Try to receive the next progress update (non-blocking).
    ///
    /// A worker that goes away before its final message yields a synthetic
    /// `Failed` for the stage it had reached.
    pub fn try_recv(&mut self) -> Option<WorkerProgress> {
        match self.progress_rx.try_recv() {
            Ok(progress) => {
                match &progress {
                    WorkerProgress::Extracted(_) | WorkerProgress::Submitting => {
                        self.stage = FailedStage::Prediction;
                    }
                    p if p.is_terminal() => self.finished = true,
                    _ => {}
                }
                Some(progress)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) if self.finished => None,
            Err(TryRecvError::Disconnected) => {
                tracing::error!("Worker exited during {:?} without a result", self.stage);
                self.finished = true;
                Some(WorkerProgress::Failed {
                    stage: self.stage,
                    message: WORKER_STOPPED_MESSAGE.to_string(),
                })
            }
        }
    }
}

/// Spawns background jobs.
pub struct PredictionWorker;

impl PredictionWorker {
    /// Submit validated input in the background.
    pub fn spawn_prediction<P, S>(
        service: PredictionService<P, S>,
        input: PredictionInput,
    ) -> WorkerHandle
    where
        P: Predictor + 'static,
        S: ResultStore + 'static,
    {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::run_prediction(&service, input, &tx);
        });

        WorkerHandle::new(rx, handle, FailedStage::Prediction)
    }

    /// Analyze documents, then submit the extracted values.
    ///
    /// `delay` is applied before extraction to mimic processing time.
    pub fn spawn_analysis<P, S, A>(
        service: PredictionService<P, S>,
        analyzer: Arc<A>,
        documents: Vec<UploadedDocument>,
        delay: Duration,
    ) -> WorkerHandle
    where
        P: Predictor + 'static,
        S: ResultStore + 'static,
        A: DocumentAnalyzer + 'static,
    {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let _ = tx.send(WorkerProgress::Analyzing);
            thread::sleep(delay);

            match analyzer.analyze(&documents) {
                Ok(input) => {
                    let _ = tx.send(WorkerProgress::Extracted(input.clone()));
                    Self::run_prediction(&service, input, &tx);
                }
                Err(e) => {
                    let _ = tx.send(WorkerProgress::Failed {
                        stage: FailedStage::Analysis,
                        message: e.to_string(),
                    });
                }
            }
        });

        WorkerHandle::new(rx, handle, FailedStage::Analysis)
    }

    fn run_prediction<P, S>(
        service: &PredictionService<P, S>,
        input: PredictionInput,
        tx: &Sender<WorkerProgress>,
    ) where
        P: Predictor,
        S: ResultStore,
    {
        let _ = tx.send(WorkerProgress::Submitting);

        let message = match service.predict(&input) {
            Ok(result) => WorkerProgress::Complete { result, input },
            Err(e) => WorkerProgress::Failed {
                stage: FailedStage::Prediction,
                message: e.to_string(),
            },
        };
        let _ = tx.send(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryKeyValueStore;
    use crate::adapters::SimulatedDocumentAnalyzer;
    use crate::application::LocalResultStore;
    use crate::domain::{sample_input, sample_result, DocumentKind};
    use crate::ports::PredictionError;

    struct FixedPredictor(Result<PredictionResult, PredictionError>);

    impl Predictor for FixedPredictor {
        fn predict(&self, _input: &PredictionInput) -> Result<PredictionResult, PredictionError> {
            self.0.clone()
        }
    }

    fn service(
        response: Result<PredictionResult, PredictionError>,
    ) -> PredictionService<FixedPredictor, LocalResultStore<MemoryKeyValueStore>> {
        PredictionService::new(
            Arc::new(FixedPredictor(response)),
            Arc::new(LocalResultStore::new(MemoryKeyValueStore::new())),
        )
    }

    fn drain(handle: WorkerHandle) -> Vec<WorkerProgress> {
        let mut messages = Vec::new();
        while let Ok(msg) = handle.progress_rx.recv_timeout(Duration::from_secs(5)) {
            let done = msg.is_terminal();
            messages.push(msg);
            if done {
                break;
            }
        }
        messages
    }

    #[test]
    fn test_prediction_job_completes() {
        let svc = service(Ok(sample_result()));
        let messages = drain(PredictionWorker::spawn_prediction(svc.clone(), sample_input()));

        assert!(matches!(messages[0], WorkerProgress::Submitting));
        match messages.last().expect("Should have messages") {
            WorkerProgress::Complete { result, input } => {
                assert_eq!(result, &sample_result());
                assert_eq!(input, &sample_input());
            }
            other => panic!("Unexpected final message: {other:?}"),
        }
        assert!(svc.history().is_empty(), "Worker must not record history");
    }

    #[test]
    fn test_prediction_job_reports_failure() {
        let svc = service(Err(PredictionError::Network("connection refused".to_string())));
        let messages = drain(PredictionWorker::spawn_prediction(svc, sample_input()));

        match messages.last().expect("Should have messages") {
            WorkerProgress::Failed { stage, message } => {
                assert_eq!(*stage, FailedStage::Prediction);
                assert_eq!(message, "connection refused");
            }
            other => panic!("Unexpected final message: {other:?}"),
        }
    }

    #[test]
    fn test_analysis_job_extracts_then_submits() {
        let docs = vec![UploadedDocument {
            path: "ecg.pdf".into(),
            kind: DocumentKind::Pdf,
            size_bytes: 10,
        }];
        let handle = PredictionWorker::spawn_analysis(
            service(Ok(sample_result())),
            Arc::new(SimulatedDocumentAnalyzer::with_seed(7)),
            docs,
            Duration::ZERO,
        );
        let messages = drain(handle);

        assert!(matches!(messages[0], WorkerProgress::Analyzing));
        assert!(matches!(messages[1], WorkerProgress::Extracted(_)));
        assert!(matches!(messages[2], WorkerProgress::Submitting));
        assert!(matches!(messages[3], WorkerProgress::Complete { .. }));
    }

    struct PanickingPredictor;

    impl Predictor for PanickingPredictor {
        fn predict(&self, _input: &PredictionInput) -> Result<PredictionResult, PredictionError> {
            panic!("predictor crashed");
        }
    }

    #[test]
    fn test_lost_worker_reports_failure() {
        let svc = PredictionService::new(
            Arc::new(PanickingPredictor),
            Arc::new(LocalResultStore::new(MemoryKeyValueStore::new())),
        );
        let mut handle = PredictionWorker::spawn_prediction(svc, sample_input());

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        let mut messages = Vec::new();
        while std::time::Instant::now() < deadline {
            match handle.try_recv() {
                Some(msg) => {
                    let done = msg.is_terminal();
                    messages.push(msg);
                    if done {
                        break;
                    }
                }
                None => thread::sleep(Duration::from_millis(10)),
            }
        }

        match messages.last().expect("Should have messages") {
            WorkerProgress::Failed { stage, message } => {
                assert_eq!(*stage, FailedStage::Prediction);
                assert_eq!(message, WORKER_STOPPED_MESSAGE);
            }
            other => panic!("Unexpected final message: {other:?}"),
        }
        assert!(handle.try_recv().is_none(), "Loss is reported once");
    }

    #[test]
    fn test_analysis_without_documents_fails() {
        let handle = PredictionWorker::spawn_analysis(
            service(Ok(sample_result())),
            Arc::new(SimulatedDocumentAnalyzer::with_seed(7)),
            Vec::new(),
            Duration::ZERO,
        );
        let messages = drain(handle);

        match messages.last().expect("Should have messages") {
            WorkerProgress::Failed { stage, .. } => assert_eq!(*stage, FailedStage::Analysis),
            other => panic!("Unexpected final message: {other:?}"),
        }
    }
}
