use crate::domain::model::{ActionKind, SyncAction, SyncReport};
use crate::utils::error::Result;

/// One stdout line for `action`, or `None` when the action is only logged.
///
/// A stopped replenish is reported through `tracing::warn!` and the
/// `stopped_for_space` flag, not as a line.
pub fn action_line(action: &SyncAction, dry_run: bool) -> Option<String> {
    if action.kind == ActionKind::SkipNoSpace {
        return None;
    }
    let prefix = if dry_run { "[dry-run] " } else { "" };
    Some(format!("{}{} {}", prefix, action.kind.label(), action.file_name))
}

pub fn action_lines(report: &SyncReport) -> Vec<String> {
    report
        .actions
        .iter()
        .filter_map(|action| action_line(action, report.dry_run))
        .collect()
}

/// Pretty JSON form of the report for `--json`.
pub fn render_json(report: &SyncReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn action(kind: ActionKind, name: &str) -> SyncAction {
        SyncAction {
            kind,
            file_name: name.to_string(),
            source: PathBuf::from("/host").join(name),
            destination: Some(PathBuf::from("/player").join(name)),
            bytes: 10,
        }
    }

    fn sample_report(dry_run: bool) -> SyncReport {
        let mut report = SyncReport::new(dry_run);
        report.record(action(ActionKind::Archive, "old.mp3"));
        report.record(action(ActionKind::Remove, "bad.mp3"));
        report.record(action(ActionKind::Copy, "new.mp3"));
        report.record(action(ActionKind::SkipNoSpace, "huge.mp3"));
        report.finish();
        report
    }

    #[test]
    fn test_live_lines() {
        assert_eq!(
            action_lines(&sample_report(false)),
            vec!["ARCHIVE old.mp3", "REMOVE bad.mp3", "COPY new.mp3"]
        );
    }

    #[test]
    fn test_dry_run_lines_are_prefixed() {
        assert_eq!(
            action_lines(&sample_report(true)),
            vec![
                "[dry-run] ARCHIVE old.mp3",
                "[dry-run] REMOVE bad.mp3",
                "[dry-run] COPY new.mp3"
            ]
        );
    }

    #[test]
    fn test_no_space_is_not_printed() {
        assert_eq!(action_line(&action(ActionKind::SkipNoSpace, "huge.mp3"), false), None);
    }

    #[test]
    fn test_json_carries_counts_and_actions() {
        let json = render_json(&sample_report(true)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["dry_run"], true);
        assert_eq!(value["archived"], 1);
        assert_eq!(value["removed"], 1);
        assert_eq!(value["copied"], 1);
        assert_eq!(value["stopped_for_space"], true);
        assert_eq!(value["actions"].as_array().unwrap().len(), 4);
        assert_eq!(value["actions"][2]["file_name"], "new.mp3");
    }
}
