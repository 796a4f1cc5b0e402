use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use graph::{HistoryStore, ObjectId};
use tera::Context;
use tracing::debug;

use crate::config::Config;
use crate::error::{ChangelogError, Result};
use crate::template::TemplateSet;

const DIFF_URL: &str = "diff_url";
const COMMIT_URL: &str = "commit_url";

/// How much of a commit hash the report shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashWidth {
    Full,
    Digits(usize),
}

impl HashWidth {
    /// Positive counts truncate, zero or negative keep everything
    pub fn from_digits(digits: i64) -> Self {
        if digits <= 0 {
            HashWidth::Full
        } else {
            HashWidth::Digits(usize::try_from(digits).unwrap_or(usize::MAX))
        }
    }

    /// Leading characters of `id`; widths past the end return all of it
    pub fn truncate<'a>(&self, id: &'a str) -> &'a str {
        match self {
            HashWidth::Full => id,
            HashWidth::Digits(width) => match id.char_indices().nth(*width) {
                Some((end, _)) => &id[..end],
                None => id,
            },
        }
    }
}

/// One line of the commit table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub id: ObjectId,
    pub short_id: String,
    pub url: String,
    pub author: String,
    pub summary: String,
}

/// Everything the renderer needs, resolved and formatted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportModel {
    pub project_name: String,
    pub project_url: String,
    pub start_id: ObjectId,
    pub end_id: ObjectId,
    pub diff_url: String,
    pub authors: BTreeSet<String>,
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<ReportRow>,
}

impl ReportModel {
    /// Distinct authors joined for display
    pub fn author_list(&self) -> String {
        self.authors.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    }
}

/// Turns a commit chain into a [`ReportModel`]
pub struct ReportBuilder {
    project_name: String,
    project_url: String,
    hash_width: HashWidth,
    urls: TemplateSet,
}

impl ReportBuilder {
    pub fn new(config: &Config) -> Result<Self> {
        let mut urls = TemplateSet::new();
        urls.add(DIFF_URL, &config.diff_url_template)?;
        urls.add(COMMIT_URL, &config.commit_url_template)?;

        Ok(Self {
            project_name: config.project_name.clone(),
            project_url: config.project_repo_url.clone(),
            hash_width: config.hash_width(),
            urls,
        })
    }

    pub fn build<S: HistoryStore + ?Sized>(
        &self,
        store: &S,
        chain: &[ObjectId],
        start: &ObjectId,
        end: &ObjectId,
        generated_at: DateTime<Utc>,
    ) -> Result<ReportModel> {
        let diff_url = self.diff_url(start, end)?;

        let mut authors = BTreeSet::new();
        let mut rows = Vec::with_capacity(chain.len());
        for id in chain {
            let commit = store.find_commit(id)?.ok_or(ChangelogError::Lookup(*id))?;
            let full_id = commit.id.to_string();

            authors.insert(commit.author.clone());
            rows.push(ReportRow {
                id: commit.id,
                short_id: self.hash_width.truncate(&full_id).to_string(),
                url: self.commit_url(&full_id)?,
                summary: commit.summary().to_string(),
                author: commit.author,
            });
        }
        debug!("report has {} rows by {} authors", rows.len(), authors.len());

        Ok(ReportModel {
            project_name: self.project_name.clone(),
            project_url: self.project_url.clone(),
            start_id: *start,
            end_id: *end,
            diff_url,
            authors,
            generated_at,
            rows,
        })
    }

    fn diff_url(&self, start: &ObjectId, end: &ObjectId) -> Result<String> {
        let mut context = Context::new();
        context.insert("StartCommitID", &start.to_string());
        context.insert("EndCommitID", &end.to_string());
        self.urls.render(DIFF_URL, &context)
    }

    fn commit_url(&self, id: &str) -> Result<String> {
        let mut context = Context::new();
        context.insert("CommitID", id);
        self.urls.render(COMMIT_URL, &context)
    }
}
