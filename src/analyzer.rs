use crate::config::Config;
use crate::error::Result;
use crate::fork::ForkRecord;
use crate::github::client::{ApiClient, Transport};
use crate::github::types::{Branch, CommitEntry, Comparison, RepoDetails};

const MAX_BRANCHES: usize = 100;
const MAX_RECENT_COMMITS: usize = 10;

pub struct ForkAnalyzer<T> {
    client: ApiClient<T>,
    config: Config,
}

impl<T: Transport> ForkAnalyzer<T> {
    pub fn new(client: ApiClient<T>, config: &Config) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    /// Never fails: a missing repository becomes an error record. Sleeps for
    /// the throttle interval before returning.
    pub async fn analyze(&self, owner: &str) -> ForkRecord {
        let record = match self.collect(owner).await {
            Ok(record) => record.finalize(),
            Err(e) => ForkRecord::failed(owner, e),
        };
        tokio::time::sleep(self.config.throttle()).await;
        record
    }

    async fn collect(&self, owner: &str) -> Result<ForkRecord> {
        let repo_path = format!("/repos/{owner}/{}", self.config.project);
        let details: RepoDetails = self.client.fetch_as(&repo_path).await?;

        let mut record = ForkRecord::new(owner, self.config.fork_url(owner));
        record.stars = details.stargazers_count;
        record.description = details.description.unwrap_or_default();
        record.created_at = details.created_at.unwrap_or_default();
        record.updated_at = details.updated_at.unwrap_or_default();

        match self
            .client
            .fetch_as::<Vec<Branch>>(&format!("{repo_path}/branches?per_page={MAX_BRANCHES}"))
            .await
        {
            Ok(branches) => record.set_branches(branches.into_iter().map(|b| b.name)),
            Err(e) => tracing::warn!(owner, "Error fetching branches: {e}"),
        }

        match self
            .client
            .fetch_as::<Vec<CommitEntry>>(&format!(
                "{repo_path}/commits?per_page={MAX_RECENT_COMMITS}"
            ))
            .await
        {
            Ok(commits) => {
                record.recent_commits = commits
                    .iter()
                    .take(MAX_RECENT_COMMITS)
                    .map(|c| c.headline().to_string())
                    .collect();
            }
            Err(e) => tracing::warn!(owner, "Error fetching commits: {e}"),
        }

        // Diverged or renamed default branches make this fail routinely.
        let compare_path = format!(
            "/repos/{up}/{project}/compare/{up}:main...{owner}:main",
            up = self.config.upstream_owner,
            project = self.config.project,
        );
        match self.client.fetch_as::<Comparison>(&compare_path).await {
            Ok(cmp) => {
                record.ahead_by = cmp.ahead_by;
                record.behind_by = cmp.behind_by;
            }
            Err(e) => tracing::trace!(owner, "comparison unavailable: {e}"),
        }

        Ok(record)
    }
}
