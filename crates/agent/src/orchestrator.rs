//! The Plan -> Execute -> Observe -> Decide control loop.

use std::sync::Arc;

use codeact_config::{AppConfig, EmptyCompletionPolicy, LoopPolicy};
use codeact_core::{
    Error, EventStream, ExecutionSession, KnowledgeRetriever, Message, Provider, ProviderRequest,
    Result,
};
use tracing::{debug, error, info, warn};

use crate::error_tracker::ErrorTracker;
use crate::extract::extract_code_block;
use crate::knowledge_injector::KnowledgeInjector;
use crate::planner::Planner;
use crate::prompts::{STRATEGY_OVERRIDE_DIRECTIVE, system_prompt};

/// Where the orchestrator currently is in a run's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    Planning,
    Running,
    Terminated,
}

/// How a run ended, for runs that ended without a transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The agent executed its completion sentinel.
    Completed,
    /// The model stopped producing actionable code.
    Stalled,
}

/// Drives a single task from planning through termination.
///
/// One orchestrator serves one run. Whatever happens inside the loop, the
/// execution session is shut down exactly once before `run` returns.
pub struct Orchestrator {
    provider: Arc<dyn Provider>,
    session: Arc<dyn ExecutionSession>,
    injector: KnowledgeInjector,
    planner: Planner,
    model: String,
    loop_temperature: f32,
    max_tokens: Option<u32>,
    policy: LoopPolicy,
    event_stream: EventStream,
    error_tracker: ErrorTracker,
    state: RunState,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn Provider>,
        session: Arc<dyn ExecutionSession>,
        retriever: Arc<dyn KnowledgeRetriever>,
        config: &AppConfig,
    ) -> Self {
        let injector = KnowledgeInjector::new(
            retriever,
            config.policy.knowledge_triggers.clone(),
            config.knowledge.top_k,
        );
        let planner = Planner::new(
            provider.clone(),
            config.llm.model.clone(),
            config.llm.planner_temperature,
            config.llm.max_tokens,
        );
        Self {
            provider,
            session,
            injector,
            planner,
            model: config.llm.model.clone(),
            loop_temperature: config.llm.loop_temperature,
            max_tokens: config.llm.max_tokens,
            policy: config.policy.clone(),
            event_stream: EventStream::new(),
            error_tracker: ErrorTracker::new(config.policy.repeat_failure_threshold),
            state: RunState::Init,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn event_stream(&self) -> &EventStream {
        &self.event_stream
    }

    /// Consumes the orchestrator, handing back the session for callers that
    /// manage its lifecycle across runs.
    pub fn into_session(self) -> Arc<dyn ExecutionSession> {
        self.session
    }

    /// Runs the task to termination. The session is shut down on every path
    /// out of the loop; a loop error takes precedence over a shutdown error,
    /// which is then only logged.
    pub async fn run(&mut self, task: &str) -> Result<RunOutcome> {
        let loop_result = self.run_inner(task).await;

        let shutdown_result = self.session.shutdown().await;
        self.state = RunState::Terminated;

        match (loop_result, shutdown_result) {
            (Ok(outcome), Ok(())) => Ok(outcome),
            (Ok(_), Err(e)) => {
                error!(error = %e, "session shutdown failed after a clean run");
                Err(e.into())
            }
            (Err(e), Ok(())) => Err(e),
            (Err(loop_err), Err(shutdown_err)) => {
                warn!(error = %shutdown_err, "session shutdown failed while unwinding");
                Err(loop_err)
            }
        }
    }

    async fn run_inner(&mut self, task: &str) -> Result<RunOutcome> {
        let kernel_id = self.session.start().await?;
        info!(%kernel_id, "execution session ready");

        self.state = RunState::Planning;
        self.event_stream.append(Message::system(system_prompt(
            &self.policy.plan_path,
            &self.policy.completion_sentinel,
        )));

        let context = self.injector.maybe_inject(task, &mut self.event_stream).await?;

        let plan = self.planner.create_plan(task, &context).await?;
        info!(plan_lines = plan.lines().count(), "plan created");

        self.event_stream
            .append(Message::user(format!("The objective is: {task}.")));

        self.state = RunState::Running;
        let mut code = plan_bootstrap_code(&self.policy.plan_path, &plan);

        loop {
            debug!(code_len = code.len(), "executing code fragment");
            let output = self.session.execute(&code).await?;

            let mut observation = format!(
                "STDOUT:\n{}\n\nSTDERR:\n{}",
                output.stdout, output.stderr
            );
            if self.error_tracker.observe(&output.stderr) {
                warn!("identical failure repeated, injecting strategy change directive");
                observation.push_str("\n\n");
                observation.push_str(STRATEGY_OVERRIDE_DIRECTIVE);
            }

            self.event_stream
                .append(Message::assistant(format!("```python\n{code}\n```")));
            self.event_stream
                .append(Message::user(format!("Execution result:\n{observation}")));

            // Checked after recording so the transcript always ends with the
            // final action and its observation.
            if code.contains(&self.policy.completion_sentinel) {
                info!("completion sentinel executed, run finished");
                return Ok(RunOutcome::Completed);
            }

            code = match self.next_code().await? {
                Some(next) => next,
                None => {
                    warn!("model produced no actionable code, terminating run");
                    return Ok(RunOutcome::Stalled);
                }
            };
        }
    }

    /// Asks the model for the next action over the full event stream and
    /// extracts the code block. Applies the configured empty-completion
    /// policy before giving up.
    async fn next_code(&mut self) -> Result<Option<String>> {
        if let Some(code) = self.request_code().await? {
            return Ok(Some(code));
        }
        match self.policy.on_empty_completion {
            EmptyCompletionPolicy::Terminate => Ok(None),
            EmptyCompletionPolicy::RetryOnce => {
                debug!("no code block in completion, retrying once");
                self.request_code().await
            }
        }
    }

    async fn request_code(&mut self) -> Result<Option<String>> {
        let mut request =
            ProviderRequest::new(&self.model, self.event_stream.all(), self.loop_temperature);
        request.max_tokens = self.max_tokens;
        let response = self
            .provider
            .complete(request)
            .await
            .map_err(Error::from)?;
        // A fence with an empty interior is as unactionable as no fence at
        // all; both flow through the empty-completion policy.
        Ok(extract_code_block(&response.content).filter(|code| !code.is_empty()))
    }
}

/// The first fragment every run executes: it persists the plan to the
/// working directory so later cycles can read and update it.
fn plan_bootstrap_code(plan_path: &str, plan: &str) -> String {
    format!(
        "import os\nos.makedirs(os.path.dirname(\"{plan_path}\") or \".\", exist_ok=True)\nwith open(\"{plan_path}\", \"w\") as f:\n    f.write(\"\"\"{plan}\"\"\")\nprint(\"Plan saved to {plan_path}\")"
    )
}
