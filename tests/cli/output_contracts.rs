use spaark_loader::tooling::cli::Commands;
use spaark_loader::ApiError;

use crate::cli::support::{context, sample_app};

#[test]
fn resolve_json_contract_has_required_fields() {
    let app = sample_app();
    let mut cli = context(app.path());

    let output = cli
        .execute(&Commands::Resolve {
            name: "Spaark.Core.Output.StdOutput".to_string(),
            format: "json".to_string(),
        })
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(
        parsed.get("name").and_then(|v| v.as_str()),
        Some("Spaark.Core.Output.StdOutput")
    );
    assert_eq!(parsed.get("kind").and_then(|v| v.as_str()), Some("class"));
    assert!(parsed
        .get("source")
        .and_then(|v| v.as_str())
        .map(|s| s.ends_with("stdoutput.unit.toml"))
        .unwrap_or(false));
    let attempts = parsed.get("attempts").and_then(|v| v.as_array()).unwrap();
    assert_eq!(attempts.len(), 1);
    assert_eq!(
        attempts[0].get("outcome").and_then(|v| v.as_str()),
        Some("loaded")
    );
}

#[test]
fn resolve_unknown_unit_is_an_error() {
    let app = sample_app();
    let mut cli = context(app.path());
    let err = cli
        .execute(&Commands::Resolve {
            name: "Zzz.Foo".to_string(),
            format: "text".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::UnitNotFound(ref name) if name == "Zzz.Foo"));
}

#[test]
fn model_text_prints_resolved_name() {
    let app = sample_app();
    let mut cli = context(app.path());
    let output = cli
        .execute(&Commands::Model {
            name: "User".to_string(),
            scope: None,
            format: "text".to_string(),
        })
        .unwrap();
    assert_eq!(output.to_lowercase(), "app.model.user");
}

#[test]
fn path_reports_unit_and_holder_files() {
    let app = sample_app();
    let mut cli = context(app.path());
    let output = cli
        .execute(&Commands::Path {
            name: "App.Status.Active".to_string(),
        })
        .unwrap();
    let unit_file = app.path().join("status").join("active.unit.toml");
    let holder_file = app.path().join("status.unit.toml");
    assert!(output.contains(&unit_file.display().to_string()));
    assert!(output.contains(&holder_file.display().to_string()));
}

#[test]
fn registry_json_contract_has_required_fields() {
    let app = sample_app();
    let mut cli = context(app.path());
    let output = cli
        .execute(&Commands::Registry {
            format: "json".to_string(),
        })
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(
        parsed.get("priority").and_then(|v| v.as_str()),
        Some("application_first")
    );
    let roots = parsed.get("roots").and_then(|v| v.as_array()).unwrap();
    let prefixes: Vec<&str> = roots
        .iter()
        .filter_map(|r| r.get("prefix").and_then(|v| v.as_str()))
        .collect();
    assert_eq!(prefixes, vec!["app", "spaark"]);

    let models = parsed.get("model_namespaces").and_then(|v| v.as_array()).unwrap();
    assert_eq!(models.len(), 2);
    assert_eq!(
        models[0].get("origin").and_then(|v| v.as_str()),
        Some("application")
    );
}

#[test]
fn registry_text_lists_roots() {
    let app = sample_app();
    let mut cli = context(app.path());
    let output = cli
        .execute(&Commands::Registry {
            format: "text".to_string(),
        })
        .unwrap();
    assert!(output.contains("Namespace roots"));
    assert!(output.contains("spaark"));
    assert!(output.contains("Spaark.Core.Model"));
}

#[test]
fn inspect_shows_methods_and_single_method() {
    let app = sample_app();
    let mut cli = context(app.path());

    let output = cli
        .execute(&Commands::Inspect {
            name: "Spaark.Core.Output.StdOutput".to_string(),
            method: None,
            format: "text".to_string(),
        })
        .unwrap();
    assert!(output.starts_with("class Spaark.Core.Output.StdOutput"));
    assert!(output.contains("page"));
    assert!(output.contains("private"));

    let output = cli
        .execute(&Commands::Inspect {
            name: "Spaark.Core.Output.StdOutput".to_string(),
            method: Some("PAGE".to_string()),
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed.get("name").and_then(|v| v.as_str()), Some("page"));
    assert_eq!(parsed.get("visibility").and_then(|v| v.as_str()), Some("public"));
    assert_eq!(parsed.get("static").and_then(|v| v.as_bool()), Some(false));
}

#[test]
fn validate_json_reports_each_unit_file() {
    let app = sample_app();
    let mut cli = context(app.path());
    let output = cli
        .execute(&Commands::Validate {
            format: "json".to_string(),
        })
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    let entries = parsed.get("entries").and_then(|v| v.as_array()).unwrap();
    assert_eq!(entries.len(), 4);

    let status_of = |name: &str| -> Option<String> {
        entries
            .iter()
            .find(|e| e.get("name").and_then(|v| v.as_str()) == Some(name))
            .and_then(|e| e.get("status").and_then(|v| v.as_str()).map(str::to_string))
    };
    assert_eq!(
        status_of("spaark.core.output.stdoutput").as_deref(),
        Some("loaded")
    );
    assert_eq!(status_of("app.model.user").as_deref(), Some("loaded"));
    assert_eq!(
        status_of("app.model.ghost").as_deref(),
        Some("definition_mismatch")
    );
    assert_eq!(status_of("app.legacy").as_deref(), Some("deprecated"));
}

#[test]
fn validate_text_summarises_failures() {
    let app = sample_app();
    let mut cli = context(app.path());
    let output = cli
        .execute(&Commands::Validate {
            format: "text".to_string(),
        })
        .unwrap();
    assert!(output.contains("2 of 4 units failed to load."));
}
