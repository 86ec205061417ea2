//! Role presets for the four reasoning stages
//!
//! Roles differ only in their instructions, output length and tool access;
//! the pipeline treats them uniformly.

use agent_core::RoleConfig;

/// Name of the web search tool the research role may call
pub const WEB_SEARCH_TOOL: &str = "web_search";

/// Qualitative research on news, trends and analyst opinion
pub fn research() -> RoleConfig {
    RoleConfig::new(
        "research",
        "You are an investment research specialist. Collect and summarize key qualitative data.",
    )
    .with_rules([
        "Use the web_search tool for research",
        "Keep summary under 800 tokens",
        "Focus on: market trends, news, analyst opinions, industry outlook",
        "Include only top 3 most relevant sources with dates",
        "Format with markdown headings",
        "Highlight red flags or exceptional positives",
        "Never provide investment advice",
    ])
    .token_budget(800)
    .with_tool(WEB_SEARCH_TOOL)
}

/// Quantitative analysis of a market snapshot
pub fn finance() -> RoleConfig {
    RoleConfig::new(
        "finance",
        "You are a certified financial analyst. Analyze quantitative market data.",
    )
    .with_rules([
        "Focus on: valuation ratios, profitability, growth, financial health",
        "Compare to industry averages when possible",
        "Keep under 800 tokens",
        "Use simple language with markdown formatting",
        "Highlight concerning metrics in **bold**",
        "Include key financial trends from historical data",
        "Never provide investment advice",
    ])
    .token_budget(800)
}

/// Synthesis of the qualitative and quantitative findings
pub fn synthesis() -> RoleConfig {
    RoleConfig::new(
        "synthesis",
        "You are a senior investment strategist. Provide objective evaluation.",
    )
    .with_rules([
        "Consider both qualitative and quantitative factors",
        "Structure with: Strengths, Weaknesses, Risks, Opportunities",
        "Keep under 800 tokens",
        "Use probabilities not absolutes",
        "Disclose data limitations",
        "Don't repeat information from other analysts",
        "No investment recommendations - just analysis",
    ])
    .token_budget(800)
}

/// Editorial compilation of the final client-ready report
pub fn editorial() -> RoleConfig {
    RoleConfig::new(
        "editorial",
        "You are a financial editor creating client-ready reports.",
    )
    .with_rules([
        "Combine all inputs into one coherent report",
        "Maintain original meaning but improve clarity",
        "Keep under 1500 tokens",
        "Structure: Executive Summary (3 sentences), Key Findings (bulleted), \
         Qualitative Analysis, Quantitative Analysis, Risk Assessment, Final Thoughts",
        "Professional but accessible language",
        "Include disclaimer and date",
    ])
    .token_budget(1500)
    .max_tokens(2048)
}

/// The four roles a pipeline run uses
#[derive(Debug, Clone, PartialEq)]
pub struct RoleSet {
    pub research: RoleConfig,
    pub finance: RoleConfig,
    pub synthesis: RoleConfig,
    pub editorial: RoleConfig,
}

impl Default for RoleSet {
    fn default() -> Self {
        Self {
            research: research(),
            finance: finance(),
            synthesis: synthesis(),
            editorial: editorial(),
        }
    }
}
