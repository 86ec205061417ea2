//! Pipeline orchestrator
//!
//! Runs one query through extraction, research, the optional quantitative
//! stage, synthesis and editorial compilation. Stages run strictly in
//! sequence because each prompt is built from earlier outputs.
//!
//! Failure policy:
//! - nothing extracted: failed run with no stages
//! - research, synthesis or editorial failure: the run stops and fails,
//!   keeping the stages recorded so far
//! - market data or finance failure: recorded as a `failed` quantitative
//!   stage and the run continues

use crate::config::InvestConfig;
use crate::error::{InvestError, Result};
use crate::extractor::EntityExtractor;
use crate::market::{MarketDataGateway, YahooFinanceGateway};
use crate::observer::{NoopObserver, PipelineObserver, PipelineStep};
use crate::prompts;
use crate::result::{PipelineResult, Stage, StageResult};
use crate::roles::RoleSet;
use crate::tools::TavilySearchTool;
use agent_core::{ReasoningCapability, RoleConfig};
use agent_llm::LLMProvider;
use agent_runtime::{AgentExecutor, LlmCapability};
use agent_tools::ToolRegistry;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, error, info, info_span, warn};

/// Error recorded when a query names neither a company nor a ticker
pub const EXTRACTION_FAILED: &str = "no company or ticker identified";

/// Drives the staged analysis for one query at a time
///
/// The orchestrator holds no per-run state; concurrent `run` calls are
/// independent.
pub struct PipelineOrchestrator {
    extractor: EntityExtractor,
    capability: Arc<dyn ReasoningCapability>,
    gateway: Arc<dyn MarketDataGateway>,
    roles: RoleSet,
    observer: Arc<dyn PipelineObserver>,
}

impl PipelineOrchestrator {
    pub fn builder() -> PipelineOrchestratorBuilder {
        PipelineOrchestratorBuilder::default()
    }

    /// Orchestrator with the production collaborators
    pub fn from_config(config: &InvestConfig, provider: Arc<dyn LLMProvider>) -> Result<Self> {
        Self::builder_from_config(config, provider)?.build()
    }

    /// Builder pre-wired with an LLM-backed capability (with the web search
    /// tool) and the Yahoo Finance gateway
    pub fn builder_from_config(
        config: &InvestConfig,
        provider: Arc<dyn LLMProvider>,
    ) -> Result<PipelineOrchestratorBuilder> {
        let registry = Arc::new(ToolRegistry::new());
        registry.register(Arc::new(TavilySearchTool::new(config)?));

        let executor = AgentExecutor::builder()
            .provider(provider)
            .tool_registry(registry)
            .model(&config.model)
            .max_iterations(config.max_iterations)
            .default_temperature(config.temperature)
            .build()?;

        Ok(Self::builder()
            .capability(Arc::new(LlmCapability::new(executor)))
            .gateway(Arc::new(YahooFinanceGateway::from_config(config)?)))
    }

    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    /// Run the pipeline for `query`
    ///
    /// Never fails: every outcome, including fatal stage failures, is
    /// reported through the returned record.
    pub async fn run(&self, query: &str) -> PipelineResult {
        let entities = self.extractor.extract(query);
        let Some(company) = entities.display_company() else {
            warn!(query, "No company or ticker found in query");
            return PipelineResult::extraction_failed(EXTRACTION_FAILED);
        };

        let mut result = PipelineResult::new(company, entities.ticker.clone());
        let span = info_span!(
            "pipeline",
            run_id = %result.run_id,
            company = %result.company,
            ticker = result.ticker.as_deref().unwrap_or("-"),
        );

        async {
            info!("Pipeline started");
            self.observer
                .on_run_started(&result.company, result.ticker.as_deref());

            let started = Instant::now();
            match self.run_stages(&mut result).await {
                Ok(report) => result.succeed(report),
                Err(e) => {
                    error!(error = %e, "Pipeline failed");
                    result.fail(e.to_string());
                }
            }

            info!(
                status = ?result.status,
                stages = result.stages.len(),
                duration_ms = started.elapsed().as_millis() as u64,
                "Pipeline finished"
            );
            result
        }
        .instrument(span)
        .await
    }

    /// Fatal failures propagate; the quantitative stage never fails here
    async fn run_stages(&self, result: &mut PipelineResult) -> Result<String> {
        let research = self
            .generate(
                PipelineStep::Research,
                &prompts::research(&result.company)?,
                &self.roles.research,
            )
            .await?;
        result.record_stage(
            Stage::QualitativeResearch,
            StageResult::completed(research.clone()),
        );

        let quantitative = self.quantitative_stage(result.ticker.as_deref()).await;
        let quantitative_output = quantitative.output.clone();
        result.record_stage(Stage::QuantitativeAnalysis, quantitative);

        let analysis = self
            .generate(
                PipelineStep::InvestmentAnalysis,
                &prompts::investment_analysis(&research, &quantitative_output)?,
                &self.roles.synthesis,
            )
            .await?;
        result.record_stage(
            Stage::InvestmentAnalysis,
            StageResult::completed(analysis.clone()),
        );

        let report_date = result.timestamp.format("%Y-%m-%d").to_string();
        self.generate(
            PipelineStep::Editorial,
            &prompts::editorial(&research, &quantitative_output, &analysis, &report_date)?,
            &self.roles.editorial,
        )
        .await
    }

    async fn quantitative_stage(&self, ticker: Option<&str>) -> StageResult {
        let Some(ticker) = ticker else {
            info!(stage = %Stage::QuantitativeAnalysis, "No ticker, skipping");
            return StageResult::skipped(prompts::SKIPPED_QUANTITATIVE);
        };

        self.observer.on_stage_started(PipelineStep::MarketData);
        let fetched = self.gateway.fetch(ticker).await;
        self.observer
            .on_stage_finished(PipelineStep::MarketData, fetched.is_ok());

        let snapshot = match fetched {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(ticker, error = %e, "Market data unavailable, continuing without it");
                return StageResult::failed(e.to_string());
            }
        };

        let analysis = match prompts::quantitative(&snapshot) {
            Ok(prompt) => {
                self.generate(PipelineStep::QuantitativeAnalysis, &prompt, &self.roles.finance)
                    .await
            }
            Err(e) => Err(e),
        };

        match analysis {
            Ok(text) => StageResult::completed(text).with_raw_data(snapshot),
            Err(e) => {
                warn!(ticker, error = %e, "Quantitative analysis failed, continuing");
                StageResult::failed(e.to_string())
            }
        }
    }

    async fn generate(&self, step: PipelineStep, prompt: &str, role: &RoleConfig) -> Result<String> {
        self.observer.on_stage_started(step);
        let started = Instant::now();
        let outcome = self.capability.generate(prompt, role).await;
        self.observer.on_stage_finished(step, outcome.is_ok());

        match &outcome {
            Ok(text) => info!(
                stage = %step,
                duration_ms = started.elapsed().as_millis() as u64,
                output_length = text.len(),
                "Stage completed"
            ),
            Err(e) => warn!(stage = %step, error = %e, "Stage failed"),
        }

        outcome.map_err(InvestError::from)
    }
}

/// Builder for PipelineOrchestrator
#[derive(Default)]
pub struct PipelineOrchestratorBuilder {
    capability: Option<Arc<dyn ReasoningCapability>>,
    gateway: Option<Arc<dyn MarketDataGateway>>,
    roles: Option<RoleSet>,
    observer: Option<Arc<dyn PipelineObserver>>,
}

impl PipelineOrchestratorBuilder {
    /// Set the reasoning capability shared by all four roles
    pub fn capability(mut self, capability: Arc<dyn ReasoningCapability>) -> Self {
        self.capability = Some(capability);
        self
    }

    /// Set the market data gateway
    pub fn gateway(mut self, gateway: Arc<dyn MarketDataGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Override the role presets
    pub fn roles(mut self, roles: RoleSet) -> Self {
        self.roles = Some(roles);
        self
    }

    /// Set the progress observer
    pub fn observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn build(self) -> Result<PipelineOrchestrator> {
        let capability = self
            .capability
            .ok_or_else(|| InvestError::Config("reasoning capability not set".to_string()))?;
        let gateway = self
            .gateway
            .ok_or_else(|| InvestError::Config("market data gateway not set".to_string()))?;

        Ok(PipelineOrchestrator {
            extractor: EntityExtractor::new()?,
            capability,
            gateway,
            roles: self.roles.unwrap_or_default(),
            observer: self.observer.unwrap_or_else(|| Arc::new(NoopObserver)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{MarketSnapshot, MockMarketDataGateway};
    use crate::result::{PipelineStatus, StageStatus};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Capability that answers per role and records every prompt
    #[derive(Default)]
    struct RoleEcho {
        fail_role: Option<&'static str>,
        prompts: Mutex<Vec<(String, String)>>,
    }

    impl RoleEcho {
        fn failing(role: &'static str) -> Self {
            Self {
                fail_role: Some(role),
                ..Self::default()
            }
        }

        fn prompt_for(&self, role: &str) -> Option<String> {
            self.prompts
                .lock()
                .unwrap()
                .iter()
                .find(|(r, _)| r == role)
                .map(|(_, p)| p.clone())
        }

        fn roles_called(&self) -> Vec<String> {
            self.prompts.lock().unwrap().iter().map(|(r, _)| r.clone()).collect()
        }
    }

    #[async_trait]
    impl ReasoningCapability for RoleEcho {
        async fn generate(&self, prompt: &str, role: &RoleConfig) -> agent_core::Result<String> {
            self.prompts
                .lock()
                .unwrap()
                .push((role.name.clone(), prompt.to_string()));
            if self.fail_role == Some(role.name.as_str()) {
                return Err(agent_core::Error::capability(&role.name, "model unavailable"));
            }
            Ok(format!("{} output", role.name))
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    fn orchestrator(
        capability: Arc<RoleEcho>,
        gateway: MockMarketDataGateway,
    ) -> PipelineOrchestrator {
        PipelineOrchestrator::builder()
            .capability(capability)
            .gateway(Arc::new(gateway))
            .build()
            .unwrap()
    }

    fn gateway_returning_snapshot() -> MockMarketDataGateway {
        let mut gateway = MockMarketDataGateway::new();
        gateway
            .expect_fetch()
            .times(1)
            .returning(|ticker| Ok(MarketSnapshot::new(ticker)));
        gateway
    }

    #[tokio::test]
    async fn test_full_run_with_ticker() {
        let capability = Arc::new(RoleEcho::default());
        let pipeline = orchestrator(capability.clone(), gateway_returning_snapshot());

        let result = pipeline.run("Analyze Tesla's financial position (TSLA)").await;

        assert_eq!(result.status, PipelineStatus::Success);
        assert_eq!(result.company, "Tesla's financial position");
        assert_eq!(result.ticker.as_deref(), Some("TSLA"));
        assert_eq!(result.final_report.as_deref(), Some("editorial output"));
        assert!(result.stages.values().all(|s| s.status == StageStatus::Completed));

        let quant = result.stage(Stage::QuantitativeAnalysis).unwrap();
        assert_eq!(quant.output, "finance output");
        assert_eq!(quant.raw_data.as_ref().map(|s| s.ticker.as_str()), Some("TSLA"));

        assert_eq!(
            capability.roles_called(),
            vec!["research", "finance", "synthesis", "editorial"]
        );
        assert!(
            capability
                .prompt_for("finance")
                .unwrap()
                .starts_with("Analyze these financial metrics:")
        );
        let editorial = capability.prompt_for("editorial").unwrap();
        assert!(editorial.contains("research output"));
        assert!(editorial.contains("finance output"));
        assert!(editorial.contains("synthesis output"));
        assert!(editorial.contains(&result.timestamp.format("%Y-%m-%d").to_string()));
    }

    #[tokio::test]
    async fn test_no_ticker_skips_quantitative_without_fetch() {
        let capability = Arc::new(RoleEcho::default());
        let mut gateway = MockMarketDataGateway::new();
        gateway.expect_fetch().never();
        let pipeline = orchestrator(capability.clone(), gateway);

        let result = pipeline.run("Research on NVIDIA Corporation").await;

        assert!(result.is_success());
        let quant = result.stage(Stage::QuantitativeAnalysis).unwrap();
        assert_eq!(quant.status, StageStatus::Skipped);
        assert_eq!(quant.output, prompts::SKIPPED_QUANTITATIVE);
        assert!(
            capability
                .prompt_for("synthesis")
                .unwrap()
                .contains(prompts::SKIPPED_QUANTITATIVE)
        );
        assert_eq!(capability.roles_called(), vec!["research", "synthesis", "editorial"]);
    }

    #[tokio::test]
    async fn test_gateway_failure_is_not_fatal() {
        let capability = Arc::new(RoleEcho::default());
        let mut gateway = MockMarketDataGateway::new();
        gateway
            .expect_fetch()
            .returning(|_| Err(InvestError::MarketData("Yahoo Finance error: HTTP 404".to_string())));
        let pipeline = orchestrator(capability.clone(), gateway);

        let result = pipeline.run("Evaluate Apple stock (AAPL)").await;

        assert!(result.is_success());
        let quant = result.stage(Stage::QuantitativeAnalysis).unwrap();
        assert_eq!(quant.status, StageStatus::Failed);
        assert_eq!(
            quant.output,
            "Failed to fetch market data: Yahoo Finance error: HTTP 404"
        );
        assert!(quant.raw_data.is_none());
        // the failure message flows into the downstream prompts
        assert!(capability.prompt_for("editorial").unwrap().contains("HTTP 404"));
    }

    #[tokio::test]
    async fn test_finance_failure_is_not_fatal() {
        let capability = Arc::new(RoleEcho::failing("finance"));
        let pipeline = orchestrator(capability, gateway_returning_snapshot());

        let result = pipeline.run("Analyze TSLA").await;

        assert!(result.is_success());
        let quant = result.stage(Stage::QuantitativeAnalysis).unwrap();
        assert_eq!(quant.status, StageStatus::Failed);
        assert_eq!(quant.output, "finance capability failed: model unavailable");
        assert!(quant.raw_data.is_none());
    }

    #[tokio::test]
    async fn test_research_failure_aborts_with_no_stages() {
        let capability = Arc::new(RoleEcho::failing("research"));
        let mut gateway = MockMarketDataGateway::new();
        gateway.expect_fetch().never();
        let pipeline = orchestrator(capability.clone(), gateway);

        let result = pipeline.run("Analyze Tesla (TSLA)").await;

        assert_eq!(result.status, PipelineStatus::Failed);
        assert_eq!(
            result.error.as_deref(),
            Some("research capability failed: model unavailable")
        );
        assert!(result.stages.is_empty());
        assert!(result.final_report.is_none());
        assert_eq!(capability.roles_called(), vec!["research"]);
    }

    #[tokio::test]
    async fn test_synthesis_failure_keeps_earlier_stages() {
        let capability = Arc::new(RoleEcho::failing("synthesis"));
        let pipeline = orchestrator(capability.clone(), gateway_returning_snapshot());

        let result = pipeline.run("Analyze Tesla (TSLA)").await;

        assert_eq!(result.status, PipelineStatus::Failed);
        assert_eq!(result.stages.len(), 2);
        assert!(result.stage(Stage::InvestmentAnalysis).is_none());
        assert!(!capability.roles_called().contains(&"editorial".to_string()));
    }

    #[tokio::test]
    async fn test_editorial_failure_keeps_all_stages() {
        let capability = Arc::new(RoleEcho::failing("editorial"));
        let pipeline = orchestrator(capability, gateway_returning_snapshot());

        let result = pipeline.run("Analyze Tesla (TSLA)").await;

        assert_eq!(result.status, PipelineStatus::Failed);
        assert_eq!(result.stages.len(), 3);
        assert!(result.final_report.is_none());
    }

    #[tokio::test]
    async fn test_extraction_failure() {
        let capability = Arc::new(RoleEcho::default());
        let mut gateway = MockMarketDataGateway::new();
        gateway.expect_fetch().never();
        let pipeline = orchestrator(capability.clone(), gateway);

        let result = pipeline.run("xyz").await;

        assert_eq!(result.status, PipelineStatus::Failed);
        assert_eq!(result.error.as_deref(), Some(EXTRACTION_FAILED));
        assert!(result.stages.is_empty());
        assert!(capability.roles_called().is_empty());
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl PipelineObserver for Recorder {
        fn on_run_started(&self, company: &str, ticker: Option<&str>) {
            self.0
                .lock()
                .unwrap()
                .push(format!("start {company} {}", ticker.unwrap_or("-")));
        }

        fn on_stage_started(&self, step: PipelineStep) {
            self.0.lock().unwrap().push(format!("> {step}"));
        }

        fn on_stage_finished(&self, step: PipelineStep, succeeded: bool) {
            self.0.lock().unwrap().push(format!("< {step} {succeeded}"));
        }
    }

    #[tokio::test]
    async fn test_observer_sees_steps_in_order() {
        let recorder = Arc::new(Recorder::default());
        let pipeline = PipelineOrchestrator::builder()
            .capability(Arc::new(RoleEcho::default()))
            .gateway(Arc::new(gateway_returning_snapshot()))
            .observer(recorder.clone())
            .build()
            .unwrap();

        pipeline.run("Analyze Tesla (TSLA)").await;

        let events = recorder.0.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                "start Tesla TSLA",
                "> research",
                "< research true",
                "> market_data",
                "< market_data true",
                "> quantitative_analysis",
                "< quantitative_analysis true",
                "> investment_analysis",
                "< investment_analysis true",
                "> editorial",
                "< editorial true",
            ]
        );
    }

    #[test]
    fn test_builder_requires_collaborators() {
        assert!(PipelineOrchestrator::builder().build().is_err());
        assert!(
            PipelineOrchestrator::builder()
                .capability(Arc::new(RoleEcho::default()))
                .build()
                .is_err()
        );
    }
}
