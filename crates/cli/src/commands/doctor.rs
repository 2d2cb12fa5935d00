use serde::Serialize;

use procure_api::ApiClient;
use procure_app::{AppStore, FileStorage};
use procure_core::config::AppConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub async fn run(config: AppConfig, json_output: bool) -> anyhow::Result<()> {
    let report = build_report(&config).await;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render_human(&report));
    }

    if report.overall_status == CheckStatus::Fail {
        anyhow::bail!("one or more readiness checks failed");
    }
    Ok(())
}

async fn build_report(config: &AppConfig) -> DoctorReport {
    let mut checks = Vec::new();

    checks.push(DoctorCheck {
        name: "config_validation",
        status: CheckStatus::Pass,
        details: format!("configuration loaded, backend `{}`", config.api.base_url),
    });

    checks.push(check_state_file(config).await);
    checks.push(check_backend_reachability(config).await);

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

async fn check_state_file(config: &AppConfig) -> DoctorCheck {
    match FileStorage::open(&config.storage.state_path).await {
        Ok(storage) => {
            let session = match AppStore::stored_tokens(&storage).await {
                Ok(Some(_)) => "a stored session",
                Ok(None) => "no stored session",
                Err(_) => "an unreadable session entry",
            };
            DoctorCheck {
                name: "state_file",
                status: CheckStatus::Pass,
                details: format!(
                    "`{}` is readable with {session}",
                    config.storage.state_path.display()
                ),
            }
        }
        Err(error) => DoctorCheck {
            name: "state_file",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

async fn check_backend_reachability(config: &AppConfig) -> DoctorCheck {
    let client = match ApiClient::new(&config.api) {
        Ok(client) => client,
        Err(error) => {
            return DoctorCheck {
                name: "backend_reachability",
                status: CheckStatus::Fail,
                details: format!("could not build http client: {error}"),
            };
        }
    };

    match client.ping().await {
        Ok(status) => DoctorCheck {
            name: "backend_reachability",
            status: CheckStatus::Pass,
            details: format!("`{}` answered with http {status}", config.api.base_url),
        },
        Err(error) => DoctorCheck {
            name: "backend_reachability",
            status: CheckStatus::Fail,
            details: format!("`{}` is unreachable: {error}", config.api.base_url),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
