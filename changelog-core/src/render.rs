use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use tera::Context;

use crate::config::TimeZoneConfig;
use crate::error::Result;
use crate::model::ReportModel;
use crate::template::TemplateSet;

const PREAMBLE: &str = "preamble";
const ROW: &str = "row";

pub const DEFAULT_PREAMBLE: &str = r#"[{{ ProjectName }}]({{ ProjectURL }}) Deployment<br>
{{ Timestamps }} <br>
[Diff: {{ StartCommitID }}...{{ EndCommitID }}]({{ DiffURL }}) <br>
Authors: {{ Authors }}
<br>
"#;

pub const DEFAULT_ROW: &str = "|[{{ CommitID }}]({{ CommitURL }})|{{ CommitAuthor }}|{{ CommitMessage }}|";

pub const TABLE_HEADER: &str = "
| Commit | Author | Message |
| ------ | ------ | ------- |
";

/// Format of the generation time, e.g. `05-March-2024 14-00-00`
const TIMESTAMP_FORMAT: &str = "%d-%B-%Y %H-%M-%S";

/// Layout of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportTemplates {
    /// Block above the table. Placeholders: `ProjectName`, `ProjectURL`,
    /// `Timestamps`, `StartCommitID`, `EndCommitID`, `DiffURL`, `Authors`.
    pub preamble: String,
    /// One table row. Placeholders: `CommitID`, `CommitURL`,
    /// `CommitAuthor`, `CommitMessage`.
    pub row: String,
}

impl Default for ReportTemplates {
    fn default() -> Self {
        Self {
            preamble: DEFAULT_PREAMBLE.to_string(),
            row: DEFAULT_ROW.to_string(),
        }
    }
}

pub struct Renderer {
    templates: TemplateSet,
    zones: Vec<(String, FixedOffset)>,
}

impl Renderer {
    pub fn new(templates: &ReportTemplates, zones: &[TimeZoneConfig]) -> Result<Self> {
        let mut set = TemplateSet::new();
        set.add(PREAMBLE, &templates.preamble)?;
        set.add(ROW, &templates.row)?;

        let zones = zones
            .iter()
            .map(|zone| Ok((zone.label.clone(), zone.offset()?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            templates: set,
            zones,
        })
    }

    /// Render the whole report. Nothing is returned unless every template
    /// rendered.
    pub fn render(&self, model: &ReportModel) -> Result<String> {
        let mut out = String::new();

        let mut context = Context::new();
        context.insert("ProjectName", &model.project_name);
        context.insert("ProjectURL", &model.project_url);
        context.insert("Timestamps", &self.timestamps(&model.generated_at));
        context.insert("StartCommitID", &model.start_id.to_string());
        context.insert("EndCommitID", &model.end_id.to_string());
        context.insert("DiffURL", &model.diff_url);
        context.insert("Authors", &model.author_list());

        let preamble = self.templates.render(PREAMBLE, &context)?;
        out.push_str(preamble.trim_end());
        out.push('\n');
        out.push_str(TABLE_HEADER);

        for row in &model.rows {
            let mut context = Context::new();
            context.insert("CommitID", &row.short_id);
            context.insert("CommitURL", &row.url);
            context.insert("CommitAuthor", &escape_cell(&row.author));
            context.insert("CommitMessage", &escape_cell(&row.summary));

            let line = self.templates.render(ROW, &context)?;
            out.push_str(line.trim_end_matches('\n'));
            out.push('\n');
        }

        Ok(out)
    }

    fn timestamps(&self, at: &DateTime<Utc>) -> String {
        self.zones
            .iter()
            .map(|(label, offset)| {
                format!("{} {}", at.with_timezone(offset).format(TIMESTAMP_FORMAT), label)
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Keep cell text from closing the table column early
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChangelogError;
    use crate::model::ReportRow;
    use chrono::TimeZone;
    use graph::ObjectId;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn oid(n: u8) -> ObjectId {
        ObjectId::from_bytes([n; 20])
    }

    fn zones() -> Vec<TimeZoneConfig> {
        vec![TimeZoneConfig::new("IST", 330), TimeZoneConfig::new("WIB", 420)]
    }

    fn model() -> ReportModel {
        let row = |n: u8, author: &str, summary: &str| ReportRow {
            id: oid(n),
            short_id: oid(n).to_string()[..8].to_string(),
            url: format!("https://example.com/svc/commit/{}", oid(n)),
            author: author.to_string(),
            summary: summary.to_string(),
        };

        ReportModel {
            project_name: "svc".to_string(),
            project_url: "https://example.com/svc".to_string(),
            start_id: oid(1),
            end_id: oid(3),
            diff_url: "https://example.com/svc/compare/a...b".to_string(),
            authors: BTreeSet::from(["bob".to_string(), "alice".to_string()]),
            generated_at: Utc.with_ymd_and_hms(2024, 3, 5, 8, 30, 0).unwrap(),
            rows: vec![row(3, "bob", "Allow a | b"), row(2, "alice", "Add parser")],
        }
    }

    #[test]
    fn test_render_default_report() {
        let renderer = Renderer::new(&ReportTemplates::default(), &zones()).unwrap();
        let text = renderer.render(&model()).unwrap();

        let expected = format!(
            "[svc](https://example.com/svc) Deployment<br>
05-March-2024 14-00-00 IST, 05-March-2024 15-30-00 WIB <br>
[Diff: {start}...{end}](https://example.com/svc/compare/a...b) <br>
Authors: alice, bob
<br>

| Commit | Author | Message |
| ------ | ------ | ------- |
|[03030303](https://example.com/svc/commit/{end})|bob|Allow a \\| b|
|[02020202](https://example.com/svc/commit/{two})|alice|Add parser|
",
            start = oid(1),
            end = oid(3),
            two = oid(2),
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_custom_templates() {
        let templates = ReportTemplates {
            preamble: "# {{ ProjectName }} ({{ Authors }})".to_string(),
            row: "|{{ CommitID }}|{{ CommitMessage }}|".to_string(),
        };
        let renderer = Renderer::new(&templates, &[]).unwrap();
        let text = renderer.render(&model()).unwrap();

        assert_eq!(
            text,
            "# svc (alice, bob)\n\n| Commit | Author | Message |\n| ------ | ------ | ------- |\n|03030303|Allow a \\| b|\n|02020202|Add parser|\n"
        );
    }

    #[test]
    fn test_empty_chain_renders_header_only() {
        let mut model = model();
        model.rows.clear();
        model.authors.clear();
        let renderer = Renderer::new(&ReportTemplates::default(), &zones()).unwrap();

        let text = renderer.render(&model).unwrap();
        assert!(text.contains("Authors: \n"));
        assert!(text.ends_with("| ------ | ------ | ------- |\n"));
    }

    #[test]
    fn test_undefined_placeholder_fails() {
        let templates = ReportTemplates {
            row: "|{{ CommitHash }}|".to_string(),
            ..ReportTemplates::default()
        };
        let renderer = Renderer::new(&templates, &zones()).unwrap();

        let err = renderer.render(&model()).unwrap_err();
        assert!(matches!(err, ChangelogError::Render { template, .. } if template == "row"));
    }
}
