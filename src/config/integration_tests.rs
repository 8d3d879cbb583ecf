// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

#[cfg(test)]
mod integration_tests {
    use std::fs;
    use std::path::Path;

    use crate::config::consts::DEFAULT_PIPELINE;
    use crate::config::{RuntimeBuilder, Strategy};
    use crate::errors::{ConfigError, FailureStrategy};

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// A two-pipeline project with a local overlay
    fn spaceflights(root: &Path) {
        write(
            root,
            "conduit.toml",
            r#"
[project]
name = "spaceflights"

[runner]
strategy = "parallel"
max_concurrency = 2
failure_strategy = "continue_on_error"
"#,
        );
        write(
            root,
            "conf/base/catalog.yml",
            r#"
companies:
  type: csv
  filepath: data/01_raw/companies.csv
preprocessed_companies:
  type: csv
  filepath: data/02_intermediate/preprocessed_companies.csv
"#,
        );
        write(
            root,
            "conf/local/catalog.yml",
            r#"
preprocessed_companies:
  type: csv
  filepath: data/02_intermediate/local_companies.csv
"#,
        );
        write(root, "conf/base/parameters.yml", "preview:\n  rows: 1\n");
        write(root, "conf/local/parameters.yml", "preview:\n  rows: 2\n");
        write(
            root,
            "conf/base/pipelines/data_processing.yml",
            r#"
steps:
  - name: preprocess_companies
    func: head
    inputs: [companies, "params:preview.rows"]
    outputs: preprocessed_companies
    tags: [preprocessing]
"#,
        );
        write(
            root,
            "conf/base/pipelines/reporting.yml",
            r#"
steps:
  - name: company_report
    func: row_count
    inputs: preprocessed_companies
    outputs: company_shape
"#,
        );
        write(
            root,
            "data/01_raw/companies.csv",
            "id,company_rating\n3888,100%\n46728,\n34618,38%\n",
        );
    }

    #[test]
    fn test_runtime_reads_settings_and_pipelines() {
        let dir = tempfile::tempdir().unwrap();
        spaceflights(dir.path());

        let runtime = RuntimeBuilder::from_project(dir.path(), None).unwrap();
        assert_eq!(runtime.env, "local");
        assert_eq!(runtime.settings.project.name, "spaceflights");
        assert_eq!(runtime.settings.runner.strategy, Strategy::Parallel);
        assert_eq!(runtime.failure_strategy, FailureStrategy::ContinueOnError);
        assert_eq!(runtime.runner.name(), "ParallelRunner");

        assert_eq!(
            runtime.pipelines.names(),
            vec!["data_processing", "reporting", DEFAULT_PIPELINE]
        );
        let default = runtime.pipelines.get(DEFAULT_PIPELINE).unwrap();
        assert_eq!(
            default.step_names(),
            vec!["preprocess_companies", "company_report"]
        );
    }

    #[test]
    fn test_runtime_catalog_holds_parameters() {
        let dir = tempfile::tempdir().unwrap();
        spaceflights(dir.path());

        let runtime = RuntimeBuilder::from_project(dir.path(), None).unwrap();
        let names = runtime.catalog.list();
        assert!(names.contains(&"companies"));
        assert!(names.contains(&"parameters"));
        assert!(names.contains(&"params:preview"));
        assert!(names.contains(&"params:preview.rows"));
    }

    #[tokio::test]
    async fn test_environment_overlay_changes_the_run() {
        let dir = tempfile::tempdir().unwrap();
        spaceflights(dir.path());

        let runtime = RuntimeBuilder::from_project(dir.path(), None).unwrap();
        let pipeline = runtime.pipelines.get(DEFAULT_PIPELINE).unwrap();
        let report = runtime
            .runner
            .run_with_strategy(pipeline, runtime.catalog.clone(), runtime.failure_strategy)
            .await
            .unwrap();
        assert!(report.is_success());
        assert!(report.free_outputs.contains_key("company_shape"));

        let local = fs::read_to_string(
            dir.path()
                .join("data/02_intermediate/local_companies.csv"),
        )
        .unwrap();
        assert_eq!(local, "id,company_rating\n3888,100%\n46728,\n");
        assert!(!dir
            .path()
            .join("data/02_intermediate/preprocessed_companies.csv")
            .exists());

        let base = RuntimeBuilder::new(dir.path()).env("base").build().unwrap();
        let pipeline = base.pipelines.get("data_processing").unwrap();
        base.runner.run(pipeline, base.catalog.clone()).await.unwrap();

        let written = fs::read_to_string(
            dir.path()
                .join("data/02_intermediate/preprocessed_companies.csv"),
        )
        .unwrap();
        assert_eq!(written, "id,company_rating\n3888,100%\n");
    }

    #[test]
    fn test_missing_settings_is_not_a_project() {
        let dir = tempfile::tempdir().unwrap();
        let result = RuntimeBuilder::from_project(dir.path(), None);
        assert!(matches!(result, Err(ConfigError::NotAProject(_))));
    }

    #[test]
    fn test_invalid_pipeline_reports_every_problem() {
        let dir = tempfile::tempdir().unwrap();
        spaceflights(dir.path());
        write(
            dir.path(),
            "conf/base/pipelines/broken.yml",
            r#"
steps:
  - name: train
    func: train_model
    inputs: model_input
    outputs: model
  - name: train
    func: identity
    inputs: model_input
    outputs: other_model
"#,
        );

        let err = RuntimeBuilder::from_project(dir.path(), None)
            .err()
            .expect("broken pipeline should fail");
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_pipeline_name() {
        let dir = tempfile::tempdir().unwrap();
        spaceflights(dir.path());
        let runtime = RuntimeBuilder::from_project(dir.path(), Some("local")).unwrap();
        let err = runtime.pipelines.get("data_science").unwrap_err();
        assert_eq!(err.to_string(), "Pipeline 'data_science' is not registered");
    }
}
