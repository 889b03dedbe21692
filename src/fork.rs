use std::cmp::Ordering;

pub const DEFAULT_BRANCHES: &[&str] = &["main", "master"];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ForkRecord {
    pub owner: String,
    pub url: String,
    pub stars: u64,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
    pub custom_branches: Vec<String>,
    pub branch_count: usize,
    pub ahead_by: u64,
    pub behind_by: u64,
    pub recent_commits: Vec<String>,
    pub interesting: bool,
    pub error: Option<String>,
}

impl ForkRecord {
    pub fn new(owner: &str, url: String) -> Self {
        Self {
            owner: owner.to_string(),
            url,
            ..Self::default()
        }
    }

    /// Record for an owner whose repository could not be fetched at all.
    pub fn failed(owner: &str, error: impl ToString) -> Self {
        Self {
            owner: owner.to_string(),
            error: Some(error.to_string()),
            ..Self::default()
        }
    }

    pub fn set_branches<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.custom_branches = names
            .into_iter()
            .map(Into::into)
            .filter(|name| !DEFAULT_BRANCHES.contains(&name.as_str()))
            .collect();
        self.branch_count = self.custom_branches.len();
    }

    pub fn is_interesting(&self) -> bool {
        self.error.is_none() && (self.branch_count > 0 || self.ahead_by > 0 || self.stars > 0)
    }

    pub fn finalize(mut self) -> Self {
        self.interesting = self.is_interesting();
        self
    }

    pub fn worth_investigating(&self) -> bool {
        self.stars >= 5 || self.ahead_by >= 5 || self.branch_count >= 2
    }

    pub fn rank_key(&self) -> (u64, u64, usize) {
        (self.stars, self.ahead_by, self.branch_count)
    }
}

/// Descending by stars, then commits ahead, then custom branch count.
pub fn by_rank(a: &&ForkRecord, b: &&ForkRecord) -> Ordering {
    b.rank_key().cmp(&a.rank_key())
}
