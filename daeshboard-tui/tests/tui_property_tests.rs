use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use daeshboard_core::{NavInput, NotifyFailure, SourceAdapter, TabId};
use daeshboard_tui::config::{ConfigError, DashboardConfig, Repo};
use daeshboard_tui::keys::{map_key, KeyAction};
use daeshboard_tui::sources::alerts::{Alert, AlertmanagerAlerts};
use daeshboard_tui::sources::github::{
    issue_items, pull_request_items, workflow_run_items, Issue, PullRequest, WorkflowRunPage,
};
use daeshboard_tui::sources::build_sources;
use proptest::prelude::*;
use std::io::Write;
use std::time::Duration;

const BASE_CONFIG: &str = r#"
repos = ["octo/cat", "octo/dog"]
tabs = ["prs", "issues", "alerts", "workflows"]
poll_interval_ms = 10000
request_timeout_ms = 5000
log_path = "tmp/daeshboard.log"

[alerts]
server = "https://alertmanager.example"
receiver = "team a"

[retry]
initial_ms = 250
max_ms = 5000
multiplier = 1.5
escalate_after = 3

[notifications]
enabled = true
escalate_failures = false
"#;

fn base_config() -> DashboardConfig {
    BASE_CONFIG.parse().unwrap()
}

fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

fn repo() -> Repo {
    "octo/cat".parse().unwrap()
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn base_config_is_valid() {
    let config = base_config();
    config.validate().unwrap();
    assert_eq!(config.repos.len(), 2);
    assert_eq!(config.tab_order().unwrap().len(), 4);
    assert_eq!(config.notify_failure(), NotifyFailure::LogAndContinue);
}

#[test]
fn config_maps_to_poller_settings() {
    let poller = base_config().poller_config();
    assert_eq!(poller.interval, Duration::from_secs(10));
    assert_eq!(poller.retry.initial, Duration::from_millis(250));
    assert_eq!(poller.retry.max, Duration::from_secs(5));
    assert_eq!(poller.retry.escalate_after, 3);
}

#[test]
fn minimal_config_uses_defaults() {
    let config: DashboardConfig = r#"
repos = ["octo/cat"]
tabs = ["prs", "workflows"]
"#
    .parse()
    .unwrap();
    config.validate().unwrap();
    assert_eq!(config.poll_interval_ms, 10_000);
    assert_eq!(config.retry.escalate_after, 5);
    assert!(config.notifications.enabled);
    assert!(config.github_token.is_none());
}

#[test]
fn config_rejects_unknown_fields() {
    let result = format!("{BASE_CONFIG}\nunknown = 1\n").parse::<DashboardConfig>();
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn config_rejects_malformed_repo() {
    let result = BASE_CONFIG
        .replace(r#""octo/dog""#, r#""dog""#)
        .parse::<DashboardConfig>();
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn config_rejects_duplicate_tabs() {
    let mut config = base_config();
    config.tabs = vec![TabId::Prs, TabId::Prs];
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { field: "tabs", .. })
    ));
}

#[test]
fn config_rejects_empty_tabs() {
    let mut config = base_config();
    config.tabs.clear();
    assert!(config.validate().is_err());
}

#[test]
fn github_tabs_need_repos() {
    let mut config = base_config();
    config.repos.clear();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { field: "repos", .. })
    ));

    config.tabs = vec![TabId::Alerts];
    config.validate().unwrap();
}

#[test]
fn alerts_tab_needs_server() {
    let mut config = base_config();
    config.alerts = None;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { field: "alerts", .. })
    ));

    let mut config = base_config();
    if let Some(alerts) = config.alerts.as_mut() {
        alerts.server = "  ".to_string();
    }
    assert!(config.validate().is_err());
}

#[test]
fn config_rejects_zero_intervals() {
    let mut config = base_config();
    config.poll_interval_ms = 0;
    assert!(config.validate().is_err());

    let mut config = base_config();
    config.request_timeout_ms = 0;
    assert!(config.validate().is_err());
}

#[test]
fn config_rejects_zero_escalation() {
    let mut config = base_config();
    config.retry.escalate_after = 0;
    assert!(config.validate().is_err());
}

#[test]
fn escalating_notifications_map_to_policy() {
    let mut config = base_config();
    config.notifications.escalate_failures = true;
    assert_eq!(config.notify_failure(), NotifyFailure::Escalate);
}

#[test]
fn config_loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(BASE_CONFIG.as_bytes()).unwrap();
    let config = DashboardConfig::from_path(file.path()).unwrap();
    assert_eq!(config.alerts.unwrap().receiver, "team a");
}

#[test]
fn missing_config_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = DashboardConfig::from_path(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn sources_follow_tab_order() {
    let mut config = base_config();
    config.tabs = vec![TabId::Workflows, TabId::Alerts];
    let sources = build_sources(&config, reqwest::Client::new()).unwrap();
    let tabs: Vec<TabId> = sources.iter().map(|(tab, _)| *tab).collect();
    assert_eq!(tabs, vec![TabId::Workflows, TabId::Alerts]);
    assert_eq!(sources[0].1.name(), "github-workflow-runs");
    assert_eq!(sources[1].1.name(), "alertmanager");
}

// ============================================================================
// Key mapping
// ============================================================================

#[test]
fn quit_keys() {
    for event in [
        key(KeyCode::Char('q'), KeyModifiers::NONE),
        key(KeyCode::Esc, KeyModifiers::NONE),
        key(KeyCode::Char('c'), KeyModifiers::CONTROL),
    ] {
        assert_eq!(map_key(event), Some(KeyAction::Quit));
    }
}

#[test]
fn ctrl_r_refreshes_without_nav_input() {
    let action = map_key(key(KeyCode::Char('r'), KeyModifiers::CONTROL));
    assert_eq!(action, Some(KeyAction::Refresh));
    assert_eq!(action.and_then(KeyAction::nav_input), None);
}

#[test]
fn enter_and_space_activate() {
    assert_eq!(
        map_key(key(KeyCode::Enter, KeyModifiers::NONE)),
        Some(KeyAction::Activate)
    );
    assert_eq!(
        map_key(key(KeyCode::Char(' '), KeyModifiers::NONE)),
        Some(KeyAction::Activate)
    );
}

#[test]
fn key_release_is_ignored() {
    let mut event = key(KeyCode::Char('q'), KeyModifiers::NONE);
    event.kind = KeyEventKind::Release;
    assert_eq!(map_key(event), None);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn keybinding_digit_jumps_to_tab(digit in 0u8..=9u8) {
        let ch = char::from(b'0' + digit);
        let action = map_key(key(KeyCode::Char(ch), KeyModifiers::NONE));
        let expected = if digit == 0 {
            None
        } else {
            Some(KeyAction::JumpToTab(digit as usize - 1))
        };
        prop_assert_eq!(action, expected);
    }

    #[test]
    fn navigation_keys_consistent(scheme in 0usize..3) {
        let (left, right, up, down) = match scheme {
            0 => (KeyCode::Char('h'), KeyCode::Char('l'), KeyCode::Char('k'), KeyCode::Char('j')),
            1 => (KeyCode::Char('a'), KeyCode::Char('d'), KeyCode::Char('w'), KeyCode::Char('s')),
            _ => (KeyCode::Left, KeyCode::Right, KeyCode::Up, KeyCode::Down),
        };
        let nav = |code| map_key(key(code, KeyModifiers::NONE)).and_then(KeyAction::nav_input);
        prop_assert_eq!(nav(left), Some(NavInput::MoveTabLeft));
        prop_assert_eq!(nav(right), Some(NavInput::MoveTabRight));
        prop_assert_eq!(nav(up), Some(NavInput::MoveItemUp));
        prop_assert_eq!(nav(down), Some(NavInput::MoveItemDown));
    }

    #[test]
    fn unbound_letters_do_nothing(ch in "[bcefgimnoprtuvxyz]") {
        let ch = ch.chars().next().unwrap();
        prop_assert_eq!(map_key(key(KeyCode::Char(ch), KeyModifiers::NONE)), None);
    }
}

// ============================================================================
// Source parsing and formatting
// ============================================================================

#[test]
fn pull_requests_are_newest_first() {
    let pulls: Vec<PullRequest> = serde_json::from_str(
        r#"[
            {"title": "old", "html_url": "https://github.com/octo/cat/pull/1", "created_at": "2024-01-01T00:00:00Z", "user": {"login": "x"}},
            {"title": "new", "html_url": "https://github.com/octo/cat/pull/2", "created_at": "2024-02-01T00:00:00Z"}
        ]"#,
    )
    .unwrap();
    let items = pull_request_items(&repo(), pulls);
    assert_eq!(items[0].value, "octo/cat: new");
    assert_eq!(items[0].url.as_deref(), Some("https://github.com/octo/cat/pull/2"));
    assert_eq!(items[1].value, "octo/cat: old");
}

#[test]
fn issues_skip_pull_requests() {
    let issues: Vec<Issue> = serde_json::from_str(
        r#"[
            {"title": "bug", "html_url": "https://github.com/octo/cat/issues/3", "created_at": "2024-01-01T00:00:00Z"},
            {"title": "pr", "html_url": "https://github.com/octo/cat/pull/4", "created_at": "2024-03-01T00:00:00Z", "pull_request": {"url": "x"}}
        ]"#,
    )
    .unwrap();
    let items = issue_items(&repo(), issues);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].value, "octo/cat: bug");
}

#[test]
fn workflow_runs_fall_back_to_status() {
    let page: WorkflowRunPage = serde_json::from_str(
        r#"{"total_count": 2, "workflow_runs": [
            {"name": "CI", "html_url": "https://github.com/octo/cat/actions/runs/1", "status": "completed", "conclusion": "success"},
            {"name": "Deploy", "html_url": "https://github.com/octo/cat/actions/runs/2", "status": "in_progress", "conclusion": null}
        ]}"#,
    )
    .unwrap();
    let items = workflow_run_items(&repo(), page.workflow_runs);
    assert_eq!(items[0].value, "[success] octo/cat: CI");
    assert_eq!(items[1].value, "[in_progress] octo/cat: Deploy");
}

#[test]
fn alerts_link_to_filtered_ui() {
    let config = base_config();
    let source = AlertmanagerAlerts::new(reqwest::Client::new(), config.alerts.as_ref().unwrap())
        .unwrap();
    assert_eq!(
        source.api_url(),
        "https://alertmanager.example/api/v2/alerts?receiver=team+a&silenced=false&inhibited=false"
    );
    assert_eq!(
        source.ui_url(),
        "https://alertmanager.example/#/alerts?receiver=team+a&silenced=false&inhibited=false"
    );

    let alerts: Vec<Alert> = serde_json::from_str(
        r#"[
            {"annotations": {"description": "disk full"}, "startsAt": "2024-01-01T00:00:00Z", "labels": {}},
            {"annotations": {}, "startsAt": "2024-05-01T00:00:00.123Z"}
        ]"#,
    )
    .unwrap();
    let items = source.items(alerts);
    assert_eq!(items[0].value, "");
    assert_eq!(items[1].value, "disk full");
    assert_eq!(items[1].url.as_deref(), Some(source.ui_url()));
}

#[test]
fn alerts_reject_unparseable_server() {
    let mut config = base_config();
    if let Some(alerts) = config.alerts.as_mut() {
        alerts.server = "not a url".to_string();
    }
    assert!(AlertmanagerAlerts::new(reqwest::Client::new(), config.alerts.as_ref().unwrap()).is_err());
}
