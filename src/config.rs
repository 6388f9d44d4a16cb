//! Selector rule sets and fetch settings.
//!
//! Rules map a field name to a CSS selector. They can be built in code, loaded
//! from a YAML mapping, or patched from `FIELD=SELECTOR` command-line
//! overrides. Field order is preserved everywhere because it becomes the CSV
//! column order.
//!
//! ```yaml
//! title: title
//! date:
//!   selector: "meta[property='article:published_time'], meta[name='date'], time[datetime]"
//!   attrs: [content, datetime]
//!   prefer_attrs: true
//! ```

use std::path::Path;

use scraper::Selector;
use serde_yaml::Value;
use tracing::{debug, info, instrument};

use crate::error::ConfigError;

pub const DEFAULT_USER_AGENT: &str = concat!("webspider/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client settings shared by every fetch.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// One field of a rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorRule {
    pub field: String,
    pub selector: String,
    /// Attributes consulted, in order, when the matched element has no text.
    pub attrs: Vec<String>,
    /// Read `attrs` before the element text, which then becomes the fallback.
    /// Set for machine-readable attributes such as `<time datetime>`, whose
    /// text is usually a human-readable rendering of the same value.
    pub prefer_attrs: bool,
}

impl SelectorRule {
    pub fn new(field: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            selector: selector.into(),
            attrs: Vec::new(),
            prefer_attrs: false,
        }
    }

    pub fn with_attrs<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attrs = attrs.into_iter().map(Into::into).collect();
        self
    }

    pub fn prefer_attrs(mut self) -> Self {
        self.prefer_attrs = true;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        Selector::parse(&self.selector)
            .map(|_| ())
            .map_err(|e| ConfigError::InvalidSelector {
                field: self.field.clone(),
                selector: self.selector.clone(),
                message: e.to_string(),
            })
    }
}

/// Ordered, validated mapping of field name to selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorRules {
    rules: Vec<SelectorRule>,
}

impl SelectorRules {
    /// Build a rule set, rejecting duplicate field names and unparsable selectors.
    pub fn new(rules: Vec<SelectorRule>) -> Result<Self, ConfigError> {
        let mut set = Self::default();
        for rule in rules {
            set.push(rule)?;
        }
        Ok(set)
    }

    /// The page title, publication date and description of a typical article page.
    pub fn defaults() -> Self {
        Self {
            rules: vec![
                SelectorRule::new("title", "title"),
                SelectorRule::new(
                    "date",
                    "meta[property='article:published_time'], meta[name='date'], time[datetime]",
                )
                .with_attrs(["content", "datetime"])
                .prefer_attrs(),
                SelectorRule::new("description", "meta[name='description']")
                    .with_attrs(["content"]),
            ],
        }
    }

    fn push(&mut self, rule: SelectorRule) -> Result<(), ConfigError> {
        if self.rules.iter().any(|r| r.field == rule.field) {
            return Err(ConfigError::DuplicateField(rule.field));
        }
        rule.validate()?;
        self.rules.push(rule);
        Ok(())
    }

    /// Replace the rule for an existing field in place, or append a new one.
    pub fn upsert(&mut self, rule: SelectorRule) -> Result<(), ConfigError> {
        rule.validate()?;
        match self.rules.iter_mut().find(|r| r.field == rule.field) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
        Ok(())
    }

    /// Apply a `FIELD=SELECTOR` override from the command line.
    pub fn apply_override(&mut self, raw: &str) -> Result<(), ConfigError> {
        let (field, selector) = raw
            .split_once('=')
            .map(|(f, s)| (f.trim(), s.trim()))
            .filter(|(f, s)| !f.is_empty() && !s.is_empty())
            .ok_or_else(|| ConfigError::MalformedOverride(raw.to_string()))?;
        self.upsert(SelectorRule::new(field, selector))
    }

    /// Parse a YAML mapping of `field: selector` or
    /// `field: {selector, attrs, prefer_attrs}`.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let Value::Mapping(mapping) = serde_yaml::from_str::<Value>(yaml)? else {
            return Err(ConfigError::NotAMapping);
        };

        let mut rules = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let field = match key {
                Value::String(s) => s,
                other => serde_yaml::to_string(&other)?.trim().to_string(),
            };
            let rule = match value {
                Value::String(selector) => SelectorRule::new(field, selector),
                Value::Mapping(_) => {
                    let spec: RuleSpec = serde_yaml::from_value(value)
                        .map_err(|_| ConfigError::InvalidRule {
                            field: field.clone(),
                        })?;
                    let mut rule = SelectorRule::new(field, spec.selector).with_attrs(spec.attrs);
                    rule.prefer_attrs = spec.prefer_attrs;
                    rule
                }
                _ => return Err(ConfigError::InvalidRule { field }),
            };
            rules.push(rule);
        }
        Self::new(rules)
    }

    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let rules = Self::from_yaml_str(&yaml)?;
        info!(fields = rules.len(), "Loaded selector rules");
        debug!(fields = ?rules.fields().collect::<Vec<_>>(), "Rule fields");
        Ok(rules)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectorRule> {
        self.rules.iter()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.field.as_str())
    }

    pub fn get(&self, field: &str) -> Option<&SelectorRule> {
        self.rules.iter().find(|r| r.field == field)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[derive(Debug, serde::Deserialize)]
struct RuleSpec {
    selector: String,
    #[serde(default)]
    attrs: Vec<String>,
    #[serde(default)]
    prefer_attrs: bool,
}
