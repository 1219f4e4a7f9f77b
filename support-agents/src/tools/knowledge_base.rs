//! Troubleshooting guide and knowledge-base index, and the knowledge-base tools over them.

use std::collections::BTreeSet;
use std::fmt;

use async_trait::async_trait;
use llm_client::ToolSpec;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{string_param, title_case, Lookup, Tool};
use crate::error::ToolError;

pub const DEFAULT_MAX_RESULTS: usize = 3;
const SEARCH_SHOWN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Low,
    Medium,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "Low"),
            Severity::Medium => write!(f, "Medium"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TroubleshootingEntry {
    pub key: &'static str,
    pub title: &'static str,
    pub solution: &'static str,
    pub severity: Severity,
}

const OVERHEATING: &str = "**Common Causes & Solutions:**

1. **Check Ventilation**
   - Ensure device vents are not blocked
   - Clean dust from fans and vents using compressed air
   - Use device on hard, flat surfaces for better airflow

2. **Monitor Resource Usage**
   - Close unnecessary applications
   - Check Task Manager/Activity Monitor for high CPU usage
   - Update drivers and software

3. **Environmental Factors**
   - Keep device away from direct sunlight
   - Ensure room temperature is below 80°F (27°C)
   - Consider using a cooling pad for laptops

4. **Hardware Issues**
   - Thermal paste may need replacement (professional service)
   - Internal fans might be failing
   - Battery swelling can cause overheating";

const BATTERY: &str = "**Battery Optimization Steps:**

1. **Check Battery Health**
   - iOS: Settings > Battery > Battery Health
   - Android: Settings > Battery > Battery Usage
   - Windows: powercfg /batteryreport

2. **Optimize Settings**
   - Reduce screen brightness
   - Turn off location services for unused apps
   - Disable background app refresh
   - Use power saving mode

3. **Update Software**
   - Install latest OS updates
   - Update all applications
   - Reset network settings if needed

4. **Hardware Considerations**
   - Battery may need replacement after 2-3 years
   - Avoid extreme temperatures
   - Don't let battery completely drain regularly";

const CONNECTIVITY: &str = "**WiFi/Bluetooth Troubleshooting:**

1. **Basic Troubleshooting**
   - Restart device and router
   - Forget and reconnect to network
   - Check if other devices have same issue

2. **Network Settings**
   - Reset network settings
   - Update network drivers
   - Check for interference (2.4GHz vs 5GHz)

3. **Advanced Solutions**
   - Update router firmware
   - Change DNS settings (8.8.8.8, 1.1.1.1)
   - Check for IP conflicts

4. **Hardware Issues**
   - WiFi antenna may be damaged
   - Bluetooth module might need replacement
   - Contact support for hardware diagnostics";

const PERFORMANCE: &str = "**Performance Optimization:**

1. **Storage Management**
   - Free up disk space (keep 15% free minimum)
   - Run disk cleanup utilities
   - Move files to external storage

2. **Memory Optimization**
   - Close unused applications
   - Restart device regularly
   - Check for memory leaks in apps

3. **Software Maintenance**
   - Update operating system
   - Update all drivers
   - Run antivirus scan
   - Disable startup programs

4. **Hardware Upgrades**
   - Consider RAM upgrade
   - SSD upgrade for better performance
   - Check if hardware meets software requirements";

pub const GENERAL_GUIDELINES: &str = "**General Technical Support Guidelines:**

1. **First Steps**
   - Restart the device
   - Check for software updates
   - Verify all connections are secure

2. **Common Issues**
   - Overheating: Check ventilation and clean vents
   - Battery issues: Optimize power settings
   - Connectivity: Restart router and device
   - Performance: Free up storage space

3. **When to Contact Support**
   - Hardware damage or defects
   - Issues persist after troubleshooting
   - Device under warranty needs service

For specific technical issues, contact our technical support team.";

fn words(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Troubleshooting articles keyed by problem area.
#[derive(Debug, Clone)]
pub struct TroubleshootingGuide {
    entries: Vec<TroubleshootingEntry>,
}

impl TroubleshootingGuide {
    pub fn new(entries: Vec<TroubleshootingEntry>) -> Self {
        Self { entries }
    }

    pub fn standard() -> Self {
        Self::new(vec![
            TroubleshootingEntry {
                key: "overheating",
                title: "Device Overheating Issues",
                solution: OVERHEATING,
                severity: Severity::Medium,
            },
            TroubleshootingEntry {
                key: "battery",
                title: "Battery Drain and Performance Issues",
                solution: BATTERY,
                severity: Severity::Low,
            },
            TroubleshootingEntry {
                key: "connectivity",
                title: "Wireless Connectivity Problems",
                solution: CONNECTIVITY,
                severity: Severity::Medium,
            },
            TroubleshootingEntry {
                key: "performance",
                title: "Slow Performance and Lag Issues",
                solution: PERFORMANCE,
                severity: Severity::Medium,
            },
        ])
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.key).collect()
    }

    /// Entries whose key appears in the query, or whose title shares a whole word with it.
    /// Generic words like "issues" and "problems" count, so broad queries match broadly.
    pub fn search(&self, query: &str, max_results: usize) -> Lookup<Vec<&TroubleshootingEntry>> {
        let query_lower = query.to_lowercase();
        let query_words = words(query);
        let matches: Vec<&TroubleshootingEntry> = self
            .entries
            .iter()
            .filter(|entry| {
                query_lower.contains(entry.key)
                    || !words(entry.title).is_disjoint(&query_words)
            })
            .take(max_results)
            .collect();
        if matches.is_empty() {
            Lookup::NotFound {
                available: self.keys(),
            }
        } else {
            Lookup::Found(matches)
        }
    }
}

/// Article titles per knowledge-base category.
#[derive(Debug, Clone)]
pub struct KnowledgeBaseIndex {
    categories: Vec<(&'static str, Vec<&'static str>)>,
}

impl KnowledgeBaseIndex {
    pub fn new(categories: Vec<(&'static str, Vec<&'static str>)>) -> Self {
        Self { categories }
    }

    pub fn standard() -> Self {
        Self::new(vec![
            (
                "hardware",
                vec![
                    "CPU overheating solutions",
                    "RAM upgrade compatibility",
                    "Hard drive replacement procedures",
                    "Graphics card troubleshooting",
                    "Power supply diagnostics",
                ],
            ),
            (
                "software",
                vec![
                    "Operating system optimization",
                    "Driver update procedures",
                    "Application compatibility issues",
                    "Security software configuration",
                    "System restore procedures",
                ],
            ),
            (
                "network",
                vec![
                    "WiFi connectivity troubleshooting",
                    "Ethernet connection issues",
                    "VPN setup and configuration",
                    "Firewall configuration",
                    "Network speed optimization",
                ],
            ),
            (
                "general",
                vec![
                    "Device maintenance schedules",
                    "Warranty information and claims",
                    "Data backup procedures",
                    "Security best practices",
                    "Performance monitoring tools",
                ],
            ),
        ])
    }

    pub fn categories(&self) -> Vec<&'static str> {
        self.categories.iter().map(|(name, _)| *name).collect()
    }

    /// Articles of `category` containing any word of `topic`. `NotFound` only for an unknown
    /// category; a known category with no hits is `Found(vec![])`.
    pub fn search(&self, topic: &str, category: &str) -> Lookup<Vec<&'static str>> {
        let category = category.trim().to_lowercase();
        let Some((_, articles)) = self.categories.iter().find(|(name, _)| *name == category)
        else {
            return Lookup::NotFound {
                available: self.categories(),
            };
        };
        let topic_words: Vec<String> = topic.split_whitespace().map(str::to_lowercase).collect();
        let matching = articles
            .iter()
            .copied()
            .filter(|article| {
                let article = article.to_lowercase();
                topic_words.iter().any(|word| article.contains(word.as_str()))
            })
            .collect();
        Lookup::Found(matching)
    }
}

#[derive(Debug, Deserialize)]
struct TechnicalSupportArgs {
    query: String,
    #[serde(default)]
    max_results: Option<usize>,
}

/// `get_technical_support(query, max_results = 3)`.
pub struct GetTechnicalSupport {
    guide: TroubleshootingGuide,
}

impl GetTechnicalSupport {
    pub const NAME: &'static str = "get_technical_support";

    pub fn new(guide: TroubleshootingGuide) -> Self {
        Self { guide }
    }

    pub fn render(&self, query: &str, max_results: usize) -> String {
        let entries = match self.guide.search(query, max_results.max(1)) {
            Lookup::Found(entries) => entries,
            Lookup::NotFound { .. } => return GENERAL_GUIDELINES.to_string(),
        };
        let sections: Vec<String> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                format!(
                    "**{}. {}**\nSeverity: {}\n\n{}\n",
                    i + 1,
                    entry.title,
                    entry.severity,
                    entry.solution
                )
            })
            .collect();
        let separator = format!("\n{}\n\n", "-".repeat(50));
        format!(
            "**Technical Support Information:**\n\n{}\n\
             If these steps don't resolve the issue, please contact technical support for further assistance.",
            sections.join(separator.as_str())
        )
    }
}

#[async_trait]
impl Tool for GetTechnicalSupport {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: Self::NAME.to_string(),
            description: "Get technical support information and troubleshooting steps.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": string_param("The technical support query"),
                    "max_results": {
                        "type": "integer",
                        "description": "Maximum number of articles to return",
                        "default": DEFAULT_MAX_RESULTS,
                    },
                },
                "required": ["query"],
            }),
        }
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let args: TechnicalSupportArgs =
            serde_json::from_value(args).map_err(|e| ToolError::invalid(Self::NAME, e))?;
        Ok(self.render(&args.query, args.max_results.unwrap_or(DEFAULT_MAX_RESULTS)))
    }
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    topic: String,
    #[serde(default)]
    category: Option<String>,
}

/// `search_knowledge_base(topic, category = "general")`.
pub struct SearchKnowledgeBase {
    index: KnowledgeBaseIndex,
}

impl SearchKnowledgeBase {
    pub const NAME: &'static str = "search_knowledge_base";
    pub const DEFAULT_CATEGORY: &'static str = "general";

    pub fn new(index: KnowledgeBaseIndex) -> Self {
        Self { index }
    }

    pub fn render(&self, topic: &str, category: &str) -> String {
        match self.index.search(topic, category) {
            Lookup::NotFound { available } => format!(
                "Category '{}' not found. Available categories: {}",
                category,
                available.join(", ")
            ),
            Lookup::Found(matching) if matching.is_empty() => format!(
                "No knowledge base entries found for '{}' in category '{}'",
                topic, category
            ),
            Lookup::Found(matching) => {
                let mut out = format!(
                    "**Knowledge Base Results for '{}' in {}:**\n\n",
                    topic,
                    title_case(category)
                );
                for (i, article) in matching.iter().take(SEARCH_SHOWN).enumerate() {
                    out.push_str(&format!("{}. {}\n", i + 1, article));
                }
                out.push_str(&format!(
                    "\nFound {} relevant entries. Use get_technical_support for detailed solutions.",
                    matching.len()
                ));
                out
            }
        }
    }
}

#[async_trait]
impl Tool for SearchKnowledgeBase {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: Self::NAME.to_string(),
            description: "Search the technical knowledge base for articles on a topic.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "topic": string_param("The topic to search for"),
                    "category": {
                        "type": "string",
                        "enum": ["general", "hardware", "software", "network"],
                        "default": Self::DEFAULT_CATEGORY,
                    },
                },
                "required": ["topic"],
            }),
        }
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let args: SearchArgs =
            serde_json::from_value(args).map_err(|e| ToolError::invalid(Self::NAME, e))?;
        let category = args.category.as_deref().unwrap_or(Self::DEFAULT_CATEGORY);
        Ok(self.render(&args.topic, category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_in_query_matches() {
        let guide = TroubleshootingGuide::standard();
        let entries = guide.search("My laptop keeps overheating", 3).found().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "overheating");
    }

    #[test]
    fn title_word_matches_and_max_results_caps() {
        let guide = TroubleshootingGuide::standard();
        // "issues" appears in three titles.
        let entries = guide.search("any known issues?", 2).found().unwrap();
        let keys: Vec<&str> = entries.iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["overheating", "battery"]);
    }

    #[test]
    fn no_match_falls_back_to_general_guidelines() {
        let tool = GetTechnicalSupport::new(TroubleshootingGuide::standard());
        assert_eq!(tool.render("my screen flickers", 3), GENERAL_GUIDELINES);
    }

    #[tokio::test]
    async fn technical_support_renders_articles() {
        let tool = GetTechnicalSupport::new(TroubleshootingGuide::standard());
        let text = tool.call(json!({ "query": "battery drains fast" })).await.unwrap();
        assert!(text.starts_with("**Technical Support Information:**"));
        assert!(text.contains("**1. Battery Drain and Performance Issues**"));
        assert!(text.contains("Severity: Low"));
    }

    #[test]
    fn knowledge_base_search_counts_all_matches() {
        let tool = SearchKnowledgeBase::new(KnowledgeBaseIndex::standard());
        let text = tool.render("configuration", "network");
        assert!(text.contains("1. VPN setup and configuration"));
        assert!(text.contains("2. Firewall configuration"));
        assert!(text.contains("Found 2 relevant entries."));
    }

    #[test]
    fn knowledge_base_unknown_category() {
        let tool = SearchKnowledgeBase::new(KnowledgeBaseIndex::standard());
        assert_eq!(
            tool.render("wifi", "firmware"),
            "Category 'firmware' not found. Available categories: hardware, software, network, general"
        );
    }

    #[tokio::test]
    async fn knowledge_base_defaults_to_general() {
        let tool = SearchKnowledgeBase::new(KnowledgeBaseIndex::standard());
        let text = tool.call(json!({ "topic": "warranty" })).await.unwrap();
        assert!(text.contains("in General:"));
        assert!(text.contains("1. Warranty information and claims"));

        let none = tool.call(json!({ "topic": "laser" })).await.unwrap();
        assert_eq!(
            none,
            "No knowledge base entries found for 'laser' in category 'general'"
        );
    }
}
