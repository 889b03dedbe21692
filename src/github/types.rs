use serde::Deserialize;

/// Subset of `GET /repos/{owner}/{repo}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepoDetails {
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Branch {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitEntry {
    pub commit: CommitBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitBody {
    pub message: String,
}

impl CommitEntry {
    pub fn headline(&self) -> &str {
        self.commit.message.split('\n').next().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Comparison {
    #[serde(default)]
    pub ahead_by: u64,
    #[serde(default)]
    pub behind_by: u64,
}
