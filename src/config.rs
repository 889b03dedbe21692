use crate::error::{ForkScoutError, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[rustfmt::skip]
const DEFAULT_OWNERS: &[&str] = &[
    "MorpheusEMH", "pichimail", "amal-irgashev", "adilsarfraz02", "CCwithAi",
    "xjayk", "sdamarketing", "dodabuilt", "threatseeker", "maxcp-dd",
    "tahoery", "BruceICzw", "zxx2112", "Simpl3Jack", "Illgot",
    "ahao0150", "ktisakib", "uvtechnologyins", "148K", "jagannathsunani66-svg",
    "omarfattah44", "keysemails", "ramarivera", "Connorbelez", "badibadey",
    "nainishshafi", "ak56434189-sketch", "azpublic", "yarstann", "yeasin2002",
    "xxw-xp", "okisdev", "fixcode-h", "aiob3", "a3my",
    "TbusOS", "narvinIR", "aakash4dev", "0x-m1cro", "zhenbah",
    "nilskroe", "anhdd-kuro", "appdirectory", "Godzizizilla", "mariomile",
    "berkipekoglu", "hvnvibz", "mows333", "rawhit-r", "tylergraydev",
    "w159", "royashoya", "premanand8800", "maxthraxx", "GoraAI",
    "JoziGila", "sandriaas", "crazyboyonline", "felix-zoe", "reham00025",
    "078sky", "heshangcode", "okgoodok123", "ChrisPei", "CodeHourra",
    "kazhuyo", "cleardry", "prathamdby", "CorentinLumineau", "krmao",
    "ronkaldes", "pete1313", "wushanru", "Abouzeid", "MaTriXy",
    "AbdullahTerro", "phoxiao", "ca-x", "Wikiup", "mibotech-ai",
    "hongshancapital", "TheMorganAlistair", "seanly", "mjbin888", "Stoplossking1",
    "ahmedaarab103", "Ahmedalsadi-1", "codemeasandwich", "ishimwekevinfounder", "Frank-III",
    "chujianyun", "newstart0514", "hadimousavi79", "RandomSynergy17", "wiobip",
    "kaallliiii6", "a25varshney", "fuzz2410", "katrinavassell", "gitjfmd",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub owners: Vec<String>,
    pub upstream_owner: String,
    pub project: String,
    pub api_base: String,
    pub web_base: String,
    pub output_path: PathBuf,
    pub user_agent: String,
    pub rate_limit_wait_secs: u64,
    pub throttle_millis: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            owners: DEFAULT_OWNERS.iter().map(|o| o.to_string()).collect(),
            upstream_owner: "21st-dev".to_string(),
            project: "1code".to_string(),
            api_base: "https://api.github.com".to_string(),
            web_base: "https://github.com".to_string(),
            output_path: PathBuf::from("FORK_ANALYSIS_REPORT.md"),
            user_agent: "fork-scout".to_string(),
            rate_limit_wait_secs: 60,
            throttle_millis: 500,
        }
    }
}

impl Config {
    pub fn load(config_path: Option<PathBuf>) -> Self {
        let (config, warnings) = Self::resolve(config_path);
        for warning in warnings {
            eprintln!("warning: {warning}");
        }
        config
    }

    /// Layers defaults, the TOML file and `FORK_SCOUT_*` env vars. Problems
    /// never fail the load; they come back as warnings.
    pub fn resolve(config_path: Option<PathBuf>) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();
        let explicit = config_path.is_some();
        let config_file =
            config_path.unwrap_or_else(|| config_dir().join("fork-scout").join("config.toml"));

        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if config_file.exists() {
            figment = figment.merge(Toml::file(&config_file));
        } else if explicit {
            warnings.push(format!(
                "config file {} not found, ignoring it",
                config_file.display()
            ));
        }

        figment = figment.merge(Env::prefixed("FORK_SCOUT_"));

        let config = match figment.extract() {
            Ok(config) => config,
            Err(e) => {
                warnings.push(format!("config parse error, using defaults: {e}"));
                Config::default()
            }
        };
        (config, warnings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.project.trim().is_empty() {
            return Err(ForkScoutError::Config("project must not be empty".into()));
        }
        if self.upstream_owner.trim().is_empty() {
            return Err(ForkScoutError::Config(
                "upstream_owner must not be empty".into(),
            ));
        }
        if let Some(blank) = self.owners.iter().position(|o| o.trim().is_empty()) {
            return Err(ForkScoutError::Config(format!(
                "owner at position {blank} is empty"
            )));
        }
        Ok(())
    }

    pub fn rate_limit_wait(&self) -> Duration {
        Duration::from_secs(self.rate_limit_wait_secs)
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_millis)
    }

    pub fn fork_url(&self, owner: &str) -> String {
        format!(
            "{}/{}/{}",
            self.web_base.trim_end_matches('/'),
            owner,
            self.project
        )
    }
}

pub fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from("."))
}
