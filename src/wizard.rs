//! The import wizard state machine: upload, mapping, validation, processing,
//! plus the always-available history.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use log::info;

use crate::config::ImporterConfig;
use crate::error::ImportError;
use crate::history::ImportHistory;
use crate::models::{ColumnMapping, ImportJob, ImportUser, ParsedTable, SourceFile, ValidationIssue};
use crate::runner::{self, JobContext, RowSink};
use crate::{intake, mapping, parse, validation};

/// Pipeline position. Linear and back-navigable; history is orthogonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Upload,
    Mapping,
    Validation,
    Processing,
}

impl WizardStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Mapping => "mapping",
            Self::Validation => "validation",
            Self::Processing => "processing",
        }
    }
}

pub struct ImportWizard {
    config: ImporterConfig,
    step: WizardStep,
    user: Option<ImportUser>,
    file: Option<SourceFile>,
    table: Option<ParsedTable>,
    mappings: Vec<ColumnMapping>,
    issues: Vec<ValidationIssue>,
    job: Option<Arc<Mutex<ImportJob>>>,
    history: Arc<Mutex<ImportHistory>>,
    // Bumped on reset; a processing run captured the previous value and must
    // stop without mutating anything once the values differ.
    generation: Arc<AtomicU64>,
}

impl ImportWizard {
    pub fn new(config: ImporterConfig) -> Self {
        Self::with_history(config, ImportHistory::new())
    }

    pub fn with_history(config: ImporterConfig, history: ImportHistory) -> Self {
        Self {
            config,
            step: WizardStep::Upload,
            user: None,
            file: None,
            table: None,
            mappings: Vec::new(),
            issues: Vec::new(),
            job: None,
            history: Arc::new(Mutex::new(history)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Caller identity, carried for contextual logging only; it does not
    /// affect pipeline behavior.
    pub fn with_user(mut self, user: ImportUser) -> Self {
        self.user = Some(user);
        self
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn source_file(&self) -> Option<&SourceFile> {
        self.file.as_ref()
    }

    pub fn table(&self) -> Option<&ParsedTable> {
        self.table.as_ref()
    }

    pub fn mappings(&self) -> &[ColumnMapping] {
        &self.mappings
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Intake checks, parse, auto-map, advance to the mapping step.
    /// Selecting a new file replaces any previous selection.
    pub fn select_file(&mut self, path: &Path, mime: Option<&str>) -> Result<()> {
        if self.step == WizardStep::Processing {
            return Err(ImportError::InvalidStep {
                step: self.step.as_str(),
                action: "select_file",
            }
            .into());
        }
        let file = intake::accept_file(path, mime, &self.config.intake)?;
        let table = parse::parse_source(&file)?;
        let mappings = mapping::build_mappings(table.header());
        info!(
            "Parsed {}: {} data rows, {} columns",
            file.name,
            table.row_count(),
            table.header().len()
        );
        self.file = Some(file);
        self.table = Some(table);
        self.mappings = mappings;
        self.issues.clear();
        self.job = None;
        self.step = WizardStep::Mapping;
        Ok(())
    }

    /// Bind a source column to a catalog field. Any stored issues are
    /// discarded; they are recomputed on the next validation run.
    pub fn map_column(&mut self, column: &str, field_key: &str) -> Result<()> {
        self.ensure_mapping_editable("map_column")?;
        mapping::bind(&mut self.mappings, column, field_key)?;
        self.issues.clear();
        self.step = WizardStep::Mapping;
        Ok(())
    }

    pub fn unmap_column(&mut self, column: &str) -> Result<()> {
        self.ensure_mapping_editable("unmap_column")?;
        mapping::unbind(&mut self.mappings, column)?;
        self.issues.clear();
        self.step = WizardStep::Mapping;
        Ok(())
    }

    fn ensure_mapping_editable(&self, action: &'static str) -> Result<(), ImportError> {
        match self.step {
            WizardStep::Mapping | WizardStep::Validation => Ok(()),
            _ => Err(ImportError::InvalidStep {
                step: self.step.as_str(),
                action,
            }),
        }
    }

    /// Run the single validation pass and advance to the validation step.
    /// Gated on at least one mapping targeting a required field.
    pub fn run_validation(&mut self) -> Result<&[ValidationIssue]> {
        let table = match (&self.step, &self.table) {
            (WizardStep::Mapping | WizardStep::Validation, Some(table)) => table,
            _ => {
                return Err(ImportError::InvalidStep {
                    step: self.step.as_str(),
                    action: "run_validation",
                }
                .into());
            }
        };
        if !mapping::has_required_mapping(&self.mappings) {
            return Err(ImportError::NoRequiredMapping.into());
        }
        self.issues = validation::validate_table(table, &self.mappings);
        info!(
            "Validation: {} errors, {} warnings over {} rows",
            validation::error_count(&self.issues),
            validation::warning_count(&self.issues),
            table.row_count()
        );
        self.step = WizardStep::Validation;
        Ok(&self.issues)
    }

    /// Create the job and start the processing run. Warnings do not block;
    /// any error-severity issue does.
    pub fn start_import(
        &mut self,
        sink: Box<dyn RowSink>,
    ) -> Result<tokio::task::JoinHandle<()>> {
        if self.step != WizardStep::Validation {
            return Err(ImportError::InvalidStep {
                step: self.step.as_str(),
                action: "start_import",
            }
            .into());
        }
        let errors = validation::error_count(&self.issues);
        if errors > 0 {
            return Err(ImportError::BlockingErrors(errors).into());
        }
        let (table, file) = match (&self.table, &self.file) {
            (Some(t), Some(f)) => (t.clone(), f),
            _ => {
                return Err(ImportError::InvalidStep {
                    step: self.step.as_str(),
                    action: "start_import",
                }
                .into());
            }
        };

        let job = ImportJob::new(file.name.clone(), table.row_count(), self.issues.clone());
        match &self.user {
            Some(user) => info!(
                "Import {} started by {} ({} rows)",
                job.id, user.name, job.total_rows
            ),
            None => info!("Import {} started ({} rows)", job.id, job.total_rows),
        }
        let job = Arc::new(Mutex::new(job));
        self.job = Some(job.clone());
        self.step = WizardStep::Processing;

        let ctx = JobContext {
            job,
            history: self.history.clone(),
            generation: self.generation.clone(),
            run_generation: self.generation.load(Ordering::SeqCst),
            table,
            mappings: self.mappings.clone(),
            cfg: self.config.processing.clone(),
        };
        Ok(tokio::spawn(runner::run_job(ctx, sink)))
    }

    /// Snapshot of the current job, if any.
    pub fn current_job(&self) -> Option<ImportJob> {
        self.job
            .as_ref()
            .map(|j| j.lock().expect("job lock poisoned").clone())
    }

    /// Shared handle to the current job, for read-only display by callers.
    pub fn job_handle(&self) -> Option<Arc<Mutex<ImportJob>>> {
        self.job.clone()
    }

    /// Snapshot of the history list.
    pub fn history(&self) -> ImportHistory {
        self.history.lock().expect("history lock poisoned").clone()
    }

    /// Clear the pipeline back to the upload step. An in-flight processing
    /// run observes the generation bump and stops without further writes.
    /// History is never cleared by reset.
    pub fn reset(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.file = None;
        self.table = None;
        self.mappings.clear();
        self.issues.clear();
        self.job = None;
        self.step = WizardStep::Upload;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProcessingConfig;
    use crate::models::{JobStatus, Severity};
    use crate::runner::NoopSink;
    use std::io::Write;
    use std::time::Duration;

    const DEMO_CSV: &str = "\
Nombre,SKU,Precio,Stock,Categoría,Descripción
Smartphone Galaxy,SGX-001,799.99,25,Electrónicos,Smartphone con cámara triple
Auriculares Bluetooth,ABT-002,199.99,50,Electrónicos,Auriculares inalámbricos
Camiseta Vintage,CVT-003,29.99,100,Moda,Camiseta de algodón vintage
";

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn fast_wizard(tick_ms: u64, rows_per_tick: usize) -> ImportWizard {
        let mut cfg = ImporterConfig::default();
        cfg.processing = ProcessingConfig {
            tick_ms,
            rows_per_tick,
        };
        ImportWizard::new(cfg)
    }

    #[tokio::test]
    async fn end_to_end_clean_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "productos.csv", DEMO_CSV);
        let mut wizard = fast_wizard(1, 1);

        wizard.select_file(&path, None).unwrap();
        assert_eq!(wizard.step(), WizardStep::Mapping);
        let mapped: Vec<Option<&str>> = wizard
            .mappings()
            .iter()
            .map(|m| m.target_field.as_deref())
            .collect();
        assert_eq!(
            mapped,
            vec![
                Some("name"),
                Some("sku"),
                Some("price"),
                Some("stock"),
                Some("category"),
                Some("description"),
            ]
        );

        let issues = wizard.run_validation().unwrap();
        assert!(issues.is_empty());
        assert_eq!(wizard.step(), WizardStep::Validation);

        let handle = wizard.start_import(Box::new(NoopSink)).unwrap();
        assert_eq!(wizard.step(), WizardStep::Processing);
        handle.await.unwrap();

        let job = wizard.current_job().unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.progress, 100);
        assert_eq!(job.error_rows, 0);
        assert_eq!(job.success_rows, 3);
        let history = wizard.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history.jobs()[0].status, JobStatus::Completed);
    }

    #[tokio::test]
    async fn validation_errors_block_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "con_errores.csv",
            "Nombre,SKU,Precio,Stock\n,ERR-004,precio_invalido,-5\n",
        );
        let mut wizard = fast_wizard(1, 10);
        wizard.select_file(&path, None).unwrap();
        let issues = wizard.run_validation().unwrap().to_vec();
        assert!(issues.iter().any(|i| i.severity == Severity::Error));

        let err = wizard.start_import(Box::new(NoopSink)).unwrap_err();
        let err = err.downcast::<ImportError>().unwrap();
        assert!(matches!(err, ImportError::BlockingErrors(3)));
        assert_eq!(wizard.step(), WizardStep::Validation);
    }

    #[tokio::test]
    async fn reset_during_processing_stops_further_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let mut content = String::from("Nombre,SKU,Precio,Stock\n");
        for i in 0..200 {
            content.push_str(&format!("Producto {i},SKU-{i},9.99,5\n"));
        }
        let path = write_file(&dir, "grande.csv", &content);

        let mut wizard = fast_wizard(10, 1);
        wizard.select_file(&path, None).unwrap();
        wizard.run_validation().unwrap();
        let handle = wizard.start_import(Box::new(NoopSink)).unwrap();
        let job = wizard.job_handle().unwrap();

        tokio::time::sleep(Duration::from_millis(35)).await;
        wizard.reset();
        assert_eq!(wizard.step(), WizardStep::Upload);
        assert!(wizard.current_job().is_none());

        // The run observes the generation bump and stops; once it has, take a
        // snapshot and verify nothing moves it to a terminal state.
        handle.await.unwrap();
        let after = job.lock().unwrap().clone();
        assert_eq!(after.status, JobStatus::Processing);
        assert!(after.progress < 100);
        assert!(after.processed_rows < after.total_rows);
        assert!(after.completed_at.is_none());
        // The abandoned run never lands in history.
        assert!(wizard.history().is_empty());
    }

    #[tokio::test]
    async fn rejected_file_keeps_upload_step() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "notas.txt", "no es un csv");
        let mut wizard = fast_wizard(1, 10);
        assert!(wizard.select_file(&path, None).is_err());
        assert_eq!(wizard.step(), WizardStep::Upload);
        assert!(wizard.table().is_none());
    }

    #[tokio::test]
    async fn oversized_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grande.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"a,b\n").unwrap();
        f.write_all(&vec![b'x'; 1024 * 1024 + 1]).unwrap();
        drop(f);

        let mut cfg = ImporterConfig::default();
        cfg.intake.max_file_mb = 1;
        let mut wizard = ImportWizard::new(cfg);
        assert!(wizard.select_file(&path, None).is_err());
        assert_eq!(wizard.step(), WizardStep::Upload);
    }

    #[tokio::test]
    async fn mapping_edit_discards_issues() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "productos.csv", DEMO_CSV);
        let mut wizard = fast_wizard(1, 10);
        wizard.select_file(&path, None).unwrap();
        wizard.run_validation().unwrap();
        assert_eq!(wizard.step(), WizardStep::Validation);

        wizard.unmap_column("Descripción").unwrap();
        assert_eq!(wizard.step(), WizardStep::Mapping);
        assert!(wizard.issues().is_empty());
        // Back-navigation: re-validate after the edit.
        wizard.run_validation().unwrap();
        assert_eq!(wizard.step(), WizardStep::Validation);
    }

    #[tokio::test]
    async fn validation_requires_a_required_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "raro.csv", "Columna rara,Otra\nx,y\n");
        let mut wizard = fast_wizard(1, 10);
        wizard.select_file(&path, None).unwrap();
        let err = wizard.run_validation().unwrap_err();
        let err = err.downcast::<ImportError>().unwrap();
        assert!(matches!(err, ImportError::NoRequiredMapping));
        assert_eq!(wizard.step(), WizardStep::Mapping);
    }
}
